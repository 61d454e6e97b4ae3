// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use lm_logs::{LogEntry, LogResponse, LogsApi, ResponseHeaders, REQUEST_ID_HEADER};

/// Body of an ingest response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Parsed(LogResponse),
    /// Raw text of a failed response, or the error when nothing was received.
    Raw(String),
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Parsed(response) => write!(f, "{response}"),
            ResponseBody::Raw(text) => f.write_str(text),
        }
    }
}

/// Result of one batch submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub success: bool,
    /// 0 when no response was received.
    pub status_code: u16,
    pub headers: ResponseHeaders,
    pub body: ResponseBody,
}

impl DispatchOutcome {
    /// Request id reported by the server, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        request_id(&self.headers)
    }
}

/// Sends the whole batch in one request and classifies the result.
///
/// Failures are captured in the outcome instead of being returned as errors;
/// nothing is retried.
pub async fn submit(api: &LogsApi, entries: &[LogEntry]) -> DispatchOutcome {
    match api.ingest(entries).await {
        Ok(response) => DispatchOutcome {
            success: response.data.success,
            status_code: response.status_code,
            headers: response.headers,
            body: ResponseBody::Parsed(response.data),
        },
        Err(e) => DispatchOutcome {
            success: false,
            status_code: e.code(),
            headers: e.response_headers(),
            body: ResponseBody::Raw(e.response_body()),
        },
    }
}

/// First value of the request id header, matched ignoring case.
#[must_use]
pub fn request_id(headers: &ResponseHeaders) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(REQUEST_ID_HEADER))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}
