// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Forwards Azure log events delivered from Event Hubs to LogicMonitor.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod adapter;
pub mod client;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod forwarder;
pub mod host;
pub mod logger;
pub mod pipeline;

pub use adapter::LogEventAdapter;
pub use client::LazyLogsApi;
pub use context::{ExecutionContext, InvocationContext};
pub use dispatch::{DispatchOutcome, ResponseBody};
pub use error::{ConfigError, ForwarderError};
pub use forwarder::LogForwarder;
pub use host::ForwarderServer;
