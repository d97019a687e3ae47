use std::sync::Arc;
use std::time::Duration;

use payroll_completion::{CompletionApi, CompletionConfig};
use payroll_opendata::PayrollApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). It holds no
/// per-request data; every handler invocation is independent.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Payroll dataset client.
    pub payroll: Arc<PayrollApi>,
    /// Completion API client; `None` when no API key is configured.
    pub completion: Option<Arc<CompletionApi>>,
}

impl AppState {
    /// Build the upstream clients from configuration.
    ///
    /// Both clients share one connection pool with the configured connect
    /// timeout. No total request timeout is set, since summary bodies are
    /// streamed for as long as the completion API keeps generating.
    pub fn from_config(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.upstream_connect_timeout_secs))
            .build()?;

        let payroll = PayrollApi::with_client(client.clone(), config.payroll_api_base.clone());

        let completion = config.summary.api_key.clone().map(|api_key| {
            Arc::new(CompletionApi::with_client(
                client,
                CompletionConfig {
                    api_base: config.summary.api_base.clone(),
                    api_key,
                    model: config.summary.model.clone(),
                    max_tokens: config.summary.max_tokens,
                },
            ))
        });

        Ok(Self {
            config: Arc::new(config),
            payroll: Arc::new(payroll),
            completion,
        })
    }
}
