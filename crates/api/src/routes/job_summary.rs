use axum::routing::post;
use axum::Router;

use crate::handlers::job_summary;
use crate::state::AppState;

/// Mount the streamed job summary at `path` (root level, NOT under `/api/v1`).
///
/// ```text
/// POST   {path}             -> stream_job_summary
/// ```
pub fn router(path: &str) -> Router<AppState> {
    Router::new().route(path, post(job_summary::stream_job_summary))
}
