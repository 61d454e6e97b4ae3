// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use lm_logs::LogEntry;
use rayon::prelude::*;
use serde_json::Value;

use crate::adapter::LogEventAdapter;

/// Turns a delivered event batch into one batch of log entries.
///
/// Only JSON objects are adapted; any other element is stream noise and is
/// dropped. Events are adapted in parallel, and the collected batch keeps the
/// input order: entries of the same event stay together and in record order.
#[must_use]
pub fn process_events(events: &[Value], adapter: &LogEventAdapter) -> Vec<LogEntry> {
    events
        .par_iter()
        .filter_map(|event| match event {
            Value::Object(record) => Some(record),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                None
            }
        })
        .flat_map_iter(|record| adapter.adapt(record))
        .collect()
}
