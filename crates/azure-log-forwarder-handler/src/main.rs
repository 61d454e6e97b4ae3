// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use azure_log_forwarder::{
    config::{self, HostConfig},
    logger::Formatter, ForwarderServer, LazyLogsApi, LogForwarder,
};

#[tokio::main]
pub async fn main() {
    // Logging is not up yet, so a bad host setting is reported once it is.
    let (host_config, host_config_error) = match HostConfig::from_env() {
        Ok(host) => (host, None),
        Err(e) => (HostConfig::default(), Some(e)),
    };

    let env_filter = host_config.log_filter(config::client_debugging_from_env());

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_ansi(false)
        .event_format(Formatter)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    if let Some(e) = host_config_error {
        error!("Error reading handler configuration: {e}");
        return;
    }

    let forwarder = LogForwarder::new(Arc::new(LazyLogsApi::from_env()));
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, host_config.port));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Unable to bind handler port {addr}: {e}");
            return;
        }
    };

    info!(
        "Log forwarder listening on {addr}, route /{}",
        host_config.function_name
    );
    let server = Arc::new(ForwarderServer::new(forwarder, host_config));
    if let Err(e) = server.serve(listener).await {
        error!("Log forwarder stopped: {e}");
    }
}
