//! Shared response envelope types for API handlers.
//!
//! JSON responses use a `{ "data": ... }` envelope. The streamed job summary
//! is the one exception: it answers with a plain-text body.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: page }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
