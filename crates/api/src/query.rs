//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Optional agency filter (`?agency=`). Blank values mean "all agencies".
#[derive(Debug, Default, Deserialize)]
pub struct AgencyFilterParams {
    pub agency: Option<String>,
}

impl AgencyFilterParams {
    /// The trimmed filter, or `None` when absent or blank.
    pub fn agency(&self) -> Option<&str> {
        self.agency
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Free-text search over the agency menu (`?search=`).
#[derive(Debug, Default, Deserialize)]
pub struct AgencySearchParams {
    #[serde(default)]
    pub search: String,
}
