// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Invocation context and correlated logging.
//!
//! Every line written for an invocation has the form
//! `[<function name>][<invocation id>] <message>` so that lines of concurrent
//! invocations can be told apart in the Function App logs.

use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, trace, warn, Level};

/// What the host provides to one invocation.
pub trait ExecutionContext: Send + Sync {
    fn function_name(&self) -> &str;
    fn invocation_id(&self) -> &str;

    /// Whether lines at `level` are kept. Disabled lines are never formatted.
    fn is_enabled(&self, _level: Level) -> bool {
        true
    }

    /// Writes an already correlated line.
    fn write(&self, level: Level, line: String);
}

/// Logs `message` tagged with the function name and invocation id.
pub fn log<C, F>(context: &C, level: Level, message: F)
where
    C: ExecutionContext + ?Sized,
    F: FnOnce() -> String,
{
    if !context.is_enabled(level) {
        return;
    }
    let line = format!(
        "[{}][{}] {}",
        context.function_name(),
        context.invocation_id(),
        message()
    );
    context.write(level, line);
}

/// Context of an invocation received from the Functions host.
///
/// Lines go to `tracing` and are also kept, so they can be handed back to the
/// host in the invocation response.
#[derive(Debug)]
pub struct InvocationContext {
    function_name: String,
    invocation_id: String,
    max_level: LevelFilter,
    lines: Mutex<Vec<String>>,
}

impl InvocationContext {
    #[must_use]
    pub fn new(
        function_name: impl Into<String>,
        invocation_id: impl Into<String>,
        max_level: LevelFilter,
    ) -> Self {
        InvocationContext {
            function_name: function_name.into(),
            invocation_id: invocation_id.into(),
            max_level,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Lines written so far, in order.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        match self.lines.into_inner() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ExecutionContext for InvocationContext {
    fn function_name(&self) -> &str {
        &self.function_name
    }

    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    fn is_enabled(&self, level: Level) -> bool {
        self.max_level >= level
    }

    fn write(&self, level: Level, line: String) {
        match level {
            Level::ERROR => error!("{line}"),
            Level::WARN => warn!("{line}"),
            Level::INFO => info!("{line}"),
            Level::DEBUG => debug!("{line}"),
            _ => trace!("{line}"),
        }
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_line_format() {
        let context = InvocationContext::new("LogForwarder", "1234-abcd", LevelFilter::INFO);
        log(&context, Level::INFO, || "Sending 3 log entries".to_string());

        assert_eq!(
            context.into_lines(),
            vec!["[LogForwarder][1234-abcd] Sending 3 log entries"]
        );
    }

    #[test]
    fn test_disabled_levels_are_not_formatted() {
        let context = InvocationContext::new("f", "i", LevelFilter::INFO);
        log(&context, Level::TRACE, || {
            panic!("message of a disabled level must not be built")
        });
        log(&context, Level::WARN, || "kept".to_string());

        assert_eq!(context.into_lines(), vec!["[f][i] kept"]);
    }

    #[test]
    fn test_trace_level_keeps_everything() {
        let context = InvocationContext::new("f", "i", LevelFilter::TRACE);
        log(&context, Level::TRACE, || "body".to_string());
        log(&context, Level::ERROR, || "bad".to_string());

        assert_eq!(context.into_lines(), vec!["[f][i] body", "[f][i] bad"]);
    }

    #[test]
    #[traced_test]
    fn test_lines_are_emitted_through_tracing() {
        let context = InvocationContext::new("LogForwarder", "inv-7", LevelFilter::INFO);
        log(&context, Level::WARN, || "Received: status = 500, id = none".to_string());

        assert!(logs_contain(
            "[LogForwarder][inv-7] Received: status = 500, id = none"
        ));
    }
}
