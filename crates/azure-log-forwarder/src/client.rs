// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Debug;
use std::sync::Arc;

use lm_logs::{ClientConfig, LogsApi};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config;
use crate::error::{ConfigError, ForwarderError};

pub type ConfigLoaderFn = Arc<dyn Fn() -> Result<ClientConfig, ConfigError> + Send + Sync>;

/// Process-wide [`LogsApi`], built on first use.
///
/// Settings are read lazily so the host can finish populating the environment
/// before the first invocation. Concurrent first callers wait on the same
/// initialization and all of them get the same instance. A failed build leaves
/// the cell empty, so every later invocation reports the error again.
pub struct LazyLogsApi {
    loader: ConfigLoaderFn,
    api: OnceCell<LogsApi>,
}

impl LazyLogsApi {
    #[must_use]
    pub fn new(loader: ConfigLoaderFn) -> Self {
        LazyLogsApi {
            loader,
            api: OnceCell::new(),
        }
    }

    /// Reads settings from the process environment on first use.
    #[must_use]
    pub fn from_env() -> Self {
        LazyLogsApi::new(Arc::new(config::client_config_from_env))
    }

    /// Uses an already built client config.
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        LazyLogsApi::new(Arc::new(move || Ok(config.clone())))
    }

    pub async fn get(&self) -> Result<&LogsApi, ForwarderError> {
        self.api
            .get_or_try_init(|| async {
                let config = (self.loader)()?;
                debug!("Configuring LogicMonitor API client: {config:?}");
                Ok::<_, ForwarderError>(LogsApi::new(config)?)
            })
            .await
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.api.initialized()
    }
}

impl Debug for LazyLogsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyLogsApi")
            .field("api", &self.api.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_loader(calls: Arc<AtomicUsize>) -> ConfigLoaderFn {
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ClientConfig::new("acme", "id", "key"))
        })
    }

    #[tokio::test]
    async fn test_not_built_until_first_use() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = LazyLogsApi::new(counting_loader(Arc::clone(&calls)));

        assert!(!lazy.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let api = lazy.get().await.unwrap();
        assert_eq!(api.base_url(), "https://acme.logicmonitor.com/rest");
        assert!(lazy.is_initialized());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_callers_share_one_client() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = Arc::new(LazyLogsApi::new(counting_loader(Arc::clone(&calls))));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                tokio::spawn(async move {
                    let api = lazy.get().await.unwrap();
                    std::ptr::from_ref(api) as usize
                })
            })
            .collect();

        let mut addresses = Vec::new();
        for handle in handles {
            addresses.push(handle.await.unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[tokio::test]
    async fn test_config_error_propagates_and_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy = LazyLogsApi::new(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ConfigError::InvalidSetting {
                name: config::PARAMETER_READ_TIMEOUT,
                value: "abc".to_string(),
                reason: "expected a positive number of milliseconds".to_string(),
            })
        }));

        assert!(matches!(lazy.get().await, Err(ForwarderError::Config(_))));
        assert!(matches!(lazy.get().await, Err(ForwarderError::Config(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!lazy.is_initialized());
    }
}
