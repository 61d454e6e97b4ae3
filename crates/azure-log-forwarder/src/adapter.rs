// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Conversion of Azure log events into LogicMonitor log entries.
//!
//! Azure exports resource and activity logs to Event Hubs as objects holding
//! a `records` array, each record being one log line:
//!
//! ```json
//! {"records": [{"time": "2024-01-15T10:30:00.1234567Z",
//!               "resourceId": "/SUBSCRIPTIONS/.../SITES/MY-APP",
//!               "category": "FunctionAppLogs",
//!               "properties": {"message": "Executed 'Functions.Http'"}}]}
//! ```
//!
//! Objects without a `records` array are treated as a single record.
//!
//! # Malformed fields
//!
//! A bad field never drops the record or its siblings:
//! - timestamp: the invocation's fallback timestamp
//! - message: the whole record as compact JSON
//! - resource id: left out, so the entry is not mapped to a resource
//!
//! Non-object elements of `records` are skipped.

use lm_logs::LogEntry;
use serde_json::{Map, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Key of the nested records array.
pub const RECORDS_KEY: &str = "records";
/// Resource mapping property holding the Azure resource id.
pub const AZURE_RESOURCE_ID_PROPERTY: &str = "system.azure.resourceid";

const TIMESTAMP_KEYS: [&str; 3] = ["time", "timeStamp", "timestamp"];
const RESOURCE_ID_KEYS: [&str; 2] = ["resourceId", "resourceID"];
const PROPERTIES_KEY: &str = "properties";
const PROPERTY_MESSAGE_KEYS: [&str; 4] = ["log", "Log", "message", "Message"];
const MESSAGE_KEYS: [&str; 2] = ["message", "msg"];
/// Field names with a meaning on the wire, never copied as metadata.
const RESERVED_KEYS: [&str; 2] = ["timestamp", lm_logs::model::RESOURCE_ID_FIELD];

#[derive(Debug, Clone, Copy)]
pub struct LogEventAdapter {
    fallback_timestamp: i64,
}

impl LogEventAdapter {
    /// `fallback_timestamp` is given to records without a usable time, in epoch
    /// milliseconds.
    #[must_use]
    pub fn new(fallback_timestamp: i64) -> Self {
        LogEventAdapter { fallback_timestamp }
    }

    /// Adapter whose fallback is the current time.
    #[must_use]
    pub fn now() -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        LogEventAdapter::new(i64::try_from(millis).unwrap_or(i64::MAX))
    }

    /// Converts one event into its log entries, in record order.
    #[must_use]
    pub fn adapt(&self, event: &Map<String, Value>) -> Vec<LogEntry> {
        match event.get(RECORDS_KEY) {
            Some(Value::Array(records)) => records
                .iter()
                .filter_map(Value::as_object)
                .map(|record| self.create_entry(record))
                .collect(),
            _ => vec![self.create_entry(event)],
        }
    }

    fn create_entry(&self, record: &Map<String, Value>) -> LogEntry {
        let mut entry = LogEntry::new(message(record))
            .with_timestamp(timestamp(record).unwrap_or(self.fallback_timestamp));

        if let Some(resource_id) = first_string(record, &RESOURCE_ID_KEYS) {
            entry = entry.with_resource_property(AZURE_RESOURCE_ID_PROPERTY, resource_id.to_lowercase());
        }

        for (key, value) in record {
            if is_consumed(key) {
                continue;
            }
            match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                    entry.metadata.insert(key.clone(), value.clone());
                }
                Value::Null | Value::Array(_) | Value::Object(_) => {}
            }
        }
        entry
    }
}

fn message(record: &Map<String, Value>) -> String {
    record
        .get(PROPERTIES_KEY)
        .and_then(Value::as_object)
        .and_then(|properties| first_string(properties, &PROPERTY_MESSAGE_KEYS))
        .or_else(|| first_string(record, &MESSAGE_KEYS))
        .map_or_else(|| Value::Object(record.clone()).to_string(), str::to_string)
}

fn timestamp(record: &Map<String, Value>) -> Option<i64> {
    let value = TIMESTAMP_KEYS.iter().find_map(|key| record.get(*key))?;
    match value {
        Value::String(text) => {
            let parsed = OffsetDateTime::parse(text.trim(), &Rfc3339).ok()?;
            i64::try_from(parsed.unix_timestamp_nanos() / 1_000_000).ok()
        }
        Value::Number(number) => number.as_i64().filter(|millis| *millis >= 0),
        _ => None,
    }
}

/// First value among `keys` that is a non-blank string.
fn first_string<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|value| !value.trim().is_empty())
}

fn is_consumed(key: &str) -> bool {
    key == RECORDS_KEY
        || key == PROPERTIES_KEY
        || TIMESTAMP_KEYS.contains(&key)
        || RESOURCE_ID_KEYS.contains(&key)
        || MESSAGE_KEYS.contains(&key)
        || RESERVED_KEYS.contains(&key)
}
