//! Streaming job summary proxy.
//!
//! Forwards a role descriptor to the completion API as a prompt and relays
//! the generated text back as a plain-text stream.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use payroll_core::job_summary::{
    build_prompt, JobDescriptor, SUMMARY_SYSTEM_PROMPT, SUMMARY_TEMPERATURE,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Returned when no completion API key is configured.
pub const MISSING_API_KEY_MESSAGE: &str = "OPENAI_API_KEY is not configured";

/// POST {JOB_SUMMARY_PATH}
///
/// Body: `{ title, agency?, payMin?, payMax?, count? }`.
///
/// - 500 when no API key is configured (checked before the body).
/// - 400 when the body is not a JSON object with a non-blank `title`.
/// - 502 when the completion API cannot be reached or rejects the request.
/// - 200 with a `text/plain` body streamed as fragments arrive. A failure
///   after that point aborts the body.
pub async fn stream_job_summary(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Response> {
    let Some(completion) = state.completion.clone() else {
        return Err(AppError::Configuration(MISSING_API_KEY_MESSAGE.to_string()));
    };

    let job = JobDescriptor::from_json_bytes(&body)?;
    let request =
        completion.chat_request(SUMMARY_SYSTEM_PROMPT, build_prompt(&job), SUMMARY_TEMPERATURE);

    tracing::info!(
        title = %job.title,
        agency = %job.agency,
        model = completion.model(),
        "Requesting job summary"
    );

    let fragments = completion.stream_chat(&request).await?;

    let title = job.title;
    let text = fragments.map(move |fragment| {
        fragment.inspect_err(|err| {
            tracing::error!(title = %title, error = %err, "Job summary stream failed");
        })
    });

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Body::from_stream(text),
    )
        .into_response())
}
