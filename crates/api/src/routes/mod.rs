pub mod health;
pub mod job_summary;
pub mod roles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /roles          aggregated roles, highest pay first (?agency=)
/// /agencies       agency filter menu (?search=)
/// ```
///
/// The streamed job summary lives outside this tree at a configurable path;
/// see [`job_summary::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(roles::router())
}
