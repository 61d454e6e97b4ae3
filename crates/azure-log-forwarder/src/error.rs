// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Operator misconfiguration detected while reading settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors that abort an invocation.
///
/// Bad input data and failed submissions are reported through the invocation
/// log instead, so only client setup failures show up here.
#[derive(Debug, thiserror::Error)]
pub enum ForwarderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create LogicMonitor API client: {0}")]
    Client(#[from] lm_logs::BuildError),
}
