// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::api::ResponseHeaders;

/// Failure to build the underlying HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("received HTTP {status}")]
    Status {
        status: u16,
        headers: ResponseHeaders,
        body: String,
    },

    /// The status line arrived but the body could not be read.
    #[error("failed to read response body with HTTP {status}: {source}")]
    Body {
        status: u16,
        headers: ResponseHeaders,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response with HTTP {status}: {source}")]
    Decode {
        status: u16,
        headers: ResponseHeaders,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status code, or 0 when no response was received.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Status { status, .. }
            | ApiError::Decode { status, .. }
            | ApiError::Body { status, .. } => *status,
            ApiError::Transport(e) => e.status().map_or(0, |s| s.as_u16()),
            ApiError::Serialization(_) => 0,
        }
    }

    /// Response headers, empty when no response was received.
    #[must_use]
    pub fn response_headers(&self) -> ResponseHeaders {
        match self {
            ApiError::Status { headers, .. }
            | ApiError::Decode { headers, .. }
            | ApiError::Body { headers, .. } => headers.clone(),
            ApiError::Transport(_) | ApiError::Serialization(_) => ResponseHeaders::new(),
        }
    }

    /// Raw response body, or the error description when no body was received.
    #[must_use]
    pub fn response_body(&self) -> String {
        match self {
            ApiError::Status { body, .. } | ApiError::Decode { body, .. } => body.clone(),
            ApiError::Body { .. } | ApiError::Transport(_) | ApiError::Serialization(_) => {
                self.to_string()
            }
        }
    }
}
