use payroll_completion::{DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use payroll_opendata::DEFAULT_PAYROLL_API_BASE;

/// Server configuration loaded from environment variables.
///
/// All fields except the completion API key have defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Time allowed until response headers are sent, in seconds (default: `30`).
    /// Streamed summary bodies are not bounded by this.
    pub request_timeout_secs: u64,
    /// Connect timeout for upstream HTTP calls, in seconds (default: `10`).
    pub upstream_connect_timeout_secs: u64,
    /// Payroll dataset endpoint.
    pub payroll_api_base: String,
    /// Path the job summary endpoint is mounted at (default: `/api/job-summary`).
    pub job_summary_path: String,
    /// Completion API settings for job summaries.
    pub summary: SummaryConfig,
}

/// Completion API settings.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    /// `None` disables the summary endpoint (it answers 500).
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                                  |
    /// |---------------------------------|------------------------------------------|
    /// | `HOST`                          | `0.0.0.0`                                |
    /// | `PORT`                          | `3000`                                   |
    /// | `CORS_ORIGINS`                  | `http://localhost:3001`                  |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                                     |
    /// | `UPSTREAM_CONNECT_TIMEOUT_SECS` | `10`                                     |
    /// | `PAYROLL_API_BASE`              | NYC open-data payroll dataset            |
    /// | `JOB_SUMMARY_PATH`              | `/api/job-summary`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upstream_connect_timeout_secs: u64 = std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("UPSTREAM_CONNECT_TIMEOUT_SECS must be a valid u64");

        let payroll_api_base =
            std::env::var("PAYROLL_API_BASE").unwrap_or_else(|_| DEFAULT_PAYROLL_API_BASE.into());

        let job_summary_path = normalize_path(
            &std::env::var("JOB_SUMMARY_PATH").unwrap_or_else(|_| "/api/job-summary".into()),
        );

        let summary = SummaryConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            upstream_connect_timeout_secs,
            payroll_api_base,
            job_summary_path,
            summary,
        }
    }
}

impl SummaryConfig {
    /// Load completion settings from environment variables.
    ///
    /// | Env Var             | Default                     |
    /// |---------------------|-----------------------------|
    /// | `OPENAI_API_BASE`   | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`      | `gpt-4o-mini`               |
    /// | `OPENAI_MAX_TOKENS` | `400`                       |
    /// | `OPENAI_API_KEY`    | *(none)*                    |
    pub fn from_env() -> Self {
        let api_base = std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let max_tokens: u32 = std::env::var("OPENAI_MAX_TOKENS")
            .unwrap_or_else(|_| DEFAULT_MAX_TOKENS.to_string())
            .parse()
            .expect("OPENAI_MAX_TOKENS must be a valid u32");

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            api_base,
            model,
            max_tokens,
            api_key,
        }
    }
}

/// Ensure a route path starts with `/` and has no trailing slash.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
