// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Settings used to build a [`crate::LogsApi`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Company in the target URL `https://{company}.logicmonitor.com`
    pub company: String,
    pub access_id: String,
    pub access_key: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Enables verbose HTTP client tracing
    pub debugging: bool,
    /// Replaces `https://{company}.logicmonitor.com/rest` when set
    pub base_url: Option<String>,
}

impl ClientConfig {
    #[must_use]
    pub fn new(
        company: impl Into<String>,
        access_id: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        ClientConfig {
            company: company.into(),
            access_id: access_id.into(),
            access_key: access_key.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            debugging: false,
            base_url: None,
        }
    }

    /// Base URL all API resource paths are appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.logicmonitor.com/rest", self.company),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::new("", "", "")
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("company", &self.company)
            .field("access_id", &self.access_id)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("debugging", &self.debugging)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
