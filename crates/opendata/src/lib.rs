//! HTTP client for the NYC open-data payroll dataset.
//!
//! Wraps the dataset's query API (`$select`, `$where`, `$order`, `$limit`,
//! `$offset`) using [`reqwest`] and decodes the rows into
//! [`PayrollRecord`]s.

use payroll_core::payroll::PayrollRecord;
use serde_json::Value;

/// Default dataset endpoint for citywide payroll data.
pub const DEFAULT_PAYROLL_API_BASE: &str = "https://data.cityofnewyork.us/resource/k397-673e.json";

/// Fiscal year every query is pinned to.
pub const FISCAL_YEAR: &str = "2024";

/// Maximum rows requested per fetch.
pub const PAGE_LIMIT: u32 = 5000;

/// Columns requested from the dataset.
pub const SELECT_FIELDS: &str = "fiscal_year,agency_name,title_description,regular_gross_paid";

/// Errors from the payroll API layer.
#[derive(Debug, thiserror::Error)]
pub enum PayrollApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The dataset returned a non-2xx status code.
    #[error("Payroll API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not a JSON array of row objects.
    #[error("Unexpected payroll response format")]
    UnexpectedFormat,
}

impl PayrollApiError {
    /// Message safe to show to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Request(_) | Self::ApiError { .. } => "Failed to fetch data",
            Self::UnexpectedFormat => "Unexpected payroll response format",
        }
    }
}

/// HTTP client for the payroll dataset.
pub struct PayrollApi {
    client: reqwest::Client,
    base_url: String,
}

impl PayrollApi {
    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch up to [`PAGE_LIMIT`] rows for [`FISCAL_YEAR`], highest gross
    /// pay first, optionally restricted to one agency.
    pub async fn fetch_records(
        &self,
        agency: Option<&str>,
    ) -> Result<Vec<PayrollRecord>, PayrollApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&query_params(agency))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;
        let records = decode_records(&body)?;

        tracing::debug!(
            rows = records.len(),
            agency = agency.unwrap_or(""),
            "Fetched payroll rows"
        );
        Ok(records)
    }

    /// Return the response unchanged on success, or an
    /// [`PayrollApiError::ApiError`] carrying the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PayrollApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PayrollApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Build the dataset query string parameters.
pub fn query_params(agency: Option<&str>) -> Vec<(&'static str, String)> {
    let mut clauses = vec![format!("fiscal_year='{FISCAL_YEAR}'")];
    if let Some(agency) = agency {
        clauses.push(format!("agency_name='{}'", escape_literal(agency)));
    }

    vec![
        ("$select", SELECT_FIELDS.to_string()),
        ("$order", "regular_gross_paid DESC".to_string()),
        ("$limit", PAGE_LIMIT.to_string()),
        ("$offset", "0".to_string()),
        ("$where", clauses.join(" AND ")),
    ]
}

/// Escape a string literal for a `$where` clause by doubling single quotes.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Decode a response body that must be a JSON array of row objects.
pub fn decode_records(body: &[u8]) -> Result<Vec<PayrollRecord>, PayrollApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| PayrollApiError::UnexpectedFormat)?;
    if !value.is_array() {
        return Err(PayrollApiError::UnexpectedFormat);
    }
    serde_json::from_value(value).map_err(|_| PayrollApiError::UnexpectedFormat)
}
