// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the resource mapping property on the wire.
pub const RESOURCE_ID_FIELD: &str = "_lm.resourceId";

/// A single log entry accepted by `/log/ingest`.
///
/// `metadata` is flattened into the entry object, so every key in it becomes a
/// top-level field next to `message` and `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    /// Epoch milliseconds. The server assigns the ingestion time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Properties used to map the entry onto a monitored resource.
    #[serde(
        rename = "_lm.resourceId",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub resource_id: BTreeMap<String, String>,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

impl LogEntry {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        LogEntry {
            message: message.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_resource_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.resource_id.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Body returned by `/log/ingest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-entry rejections reported on partial success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

impl fmt::Display for LogResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}
