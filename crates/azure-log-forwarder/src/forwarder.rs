// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One invocation of the forwarder: adapt the delivered events, submit them
//! as a single batch and log the outcome.
//!
//! ```text
//!   delivered events ──> process_events ──> (empty? log and stop)
//!                                               │
//!                              LazyLogsApi::get ┴──> submit ──> log outcome
//! ```

use std::sync::Arc;

use serde_json::Value;
use tracing::Level;

use crate::adapter::LogEventAdapter;
use crate::client::LazyLogsApi;
use crate::context::{log, ExecutionContext};
use crate::dispatch::{self, DispatchOutcome};
use crate::error::ForwarderError;
use crate::pipeline::process_events;

#[derive(Debug, Clone)]
pub struct LogForwarder {
    api: Arc<LazyLogsApi>,
}

impl LogForwarder {
    #[must_use]
    pub fn new(api: Arc<LazyLogsApi>) -> Self {
        LogForwarder { api }
    }

    /// Forwards one delivered batch.
    ///
    /// Returns `Ok(None)` when nothing was left to send. A failed submission is
    /// logged and returned as an unsuccessful outcome; only client setup
    /// failures are errors.
    pub async fn forward<C>(
        &self,
        log_events: &[Value],
        context: &C,
    ) -> Result<Option<DispatchOutcome>, ForwarderError>
    where
        C: ExecutionContext + ?Sized,
    {
        self.forward_with(log_events, &LogEventAdapter::now(), context)
            .await
    }

    pub async fn forward_with<C>(
        &self,
        log_events: &[Value],
        adapter: &LogEventAdapter,
        context: &C,
    ) -> Result<Option<DispatchOutcome>, ForwarderError>
    where
        C: ExecutionContext + ?Sized,
    {
        let entries = process_events(log_events, adapter);
        if entries.is_empty() {
            log(context, Level::INFO, || "No entries to send".to_string());
            return Ok(None);
        }

        log(context, Level::INFO, || {
            format!("Sending {} log entries", entries.len())
        });
        log(context, Level::TRACE, || {
            format!(
                "Request body: {}",
                serde_json::to_string(&entries).unwrap_or_default()
            )
        });

        let api = self.api.get().await?;
        let outcome = dispatch::submit(api, &entries).await;
        log_outcome(context, &outcome);
        Ok(Some(outcome))
    }
}

fn log_outcome<C>(context: &C, outcome: &DispatchOutcome)
where
    C: ExecutionContext + ?Sized,
{
    let (summary_level, body_level) = if outcome.success {
        (Level::INFO, Level::TRACE)
    } else {
        (Level::WARN, Level::WARN)
    };
    log(context, summary_level, || {
        format!(
            "Received: status = {}, id = {}",
            outcome.status_code,
            outcome.request_id().unwrap_or("none")
        )
    });
    log(context, body_level, || {
        format!("Response body: {}", outcome.body)
    });
}
