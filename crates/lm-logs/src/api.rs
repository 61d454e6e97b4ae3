// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the Logs ingestion endpoint.
//!
//! A [`LogsApi`] holds one `reqwest::Client` configured with the connect and
//! read timeouts from [`ClientConfig`], and signs every request with LMv1.
//! It performs exactly one request per call and never retries.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::auth::Lmv1Signer;
use crate::config::ClientConfig;
use crate::error::{ApiError, BuildError};
use crate::model::{LogEntry, LogResponse};

/// Resource path of the ingestion endpoint, relative to the base URL.
pub const INGEST_PATH: &str = "/log/ingest";

/// Response header carrying the server-side request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const CLIENT_USER_AGENT: &str = concat!("lm-logs-rust/", env!("CARGO_PKG_VERSION"));

/// Header name to all of its values, as received.
pub type ResponseHeaders = HashMap<String, Vec<String>>;

/// Decoded response with its HTTP metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub headers: ResponseHeaders,
    pub data: T,
}

#[derive(Debug, Clone)]
pub struct LogsApi {
    client: reqwest::Client,
    base_url: String,
    signer: Lmv1Signer,
    debugging: bool,
}

impl LogsApi {
    pub fn new(config: ClientConfig) -> Result<Self, BuildError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .connection_verbose(config.debugging)
            .user_agent(CLIENT_USER_AGENT)
            .build()?;

        Ok(LogsApi {
            client,
            base_url: config.base_url(),
            signer: Lmv1Signer::new(config.access_id, config.access_key),
            debugging: config.debugging,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `entries` as a single batch to `/log/ingest`.
    ///
    /// Any non-2xx status is returned as [`ApiError::Status`] together with the
    /// response headers and raw body, so callers can still report the request id.
    pub async fn ingest(
        &self,
        entries: &[LogEntry],
    ) -> Result<ApiResponse<LogResponse>, ApiError> {
        let body = serde_json::to_vec(entries).map_err(ApiError::Serialization)?;
        self.post(INGEST_PATH, body).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        resource_path: &str,
        body: Vec<u8>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = format!("{}{}", self.base_url, resource_path);
        let authorization = self.signer.authorization("POST", &body, resource_path);

        if self.debugging {
            info!(
                "POST {url} request body: {}",
                String::from_utf8_lossy(&body)
            );
        }

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = header_values(response.headers());
        let text = match response.text().await {
            Ok(text) => text,
            Err(source) => {
                return Err(ApiError::Body {
                    status: status.as_u16(),
                    headers,
                    source,
                })
            }
        };

        if self.debugging {
            info!("POST {url} response {}: {text}", status.as_u16());
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                headers,
                body: text,
            });
        }

        match serde_json::from_str(&text) {
            Ok(data) => Ok(ApiResponse {
                status_code: status.as_u16(),
                headers,
                data,
            }),
            Err(source) => Err(ApiError::Decode {
                status: status.as_u16(),
                headers,
                body: text,
                source,
            }),
        }
    }
}

/// Groups header values by name. Non UTF-8 values are replaced lossily.
#[must_use]
pub fn header_values(headers: &HeaderMap) -> ResponseHeaders {
    let mut values = ResponseHeaders::new();
    for (name, value) in headers {
        values
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    values
}
