//! Route definitions for the payroll role table.

use axum::routing::get;
use axum::Router;

use crate::handlers::roles;
use crate::state::AppState;

/// Payroll routes mounted under `/api/v1`.
///
/// ```text
/// GET    /roles             -> list_roles
/// GET    /agencies          -> list_agencies
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/roles", get(roles::list_roles))
        .route("/agencies", get(roles::list_agencies))
}
