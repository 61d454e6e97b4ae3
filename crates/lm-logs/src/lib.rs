// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client for the LogicMonitor Logs ingestion API.
//!
//! - [`model`]: wire types sent to and received from `/log/ingest`
//! - [`auth`]: LMv1 request signing
//! - [`config`]: settings used to build a [`LogsApi`]
//! - [`api`]: the HTTP client performing the ingest call
//! - [`error`]: build and request errors

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod model;

pub use api::{ApiResponse, LogsApi, ResponseHeaders, INGEST_PATH, REQUEST_ID_HEADER};
pub use config::ClientConfig;
pub use error::{ApiError, BuildError};
pub use model::{LogEntry, LogResponse};
