//! Request handlers.
//!
//! Handlers call the upstream clients held in [`AppState`](crate::state::AppState),
//! run the pure logic from `payroll_core`, and map failures via
//! [`AppError`](crate::error::AppError).

pub mod job_summary;
pub mod roles;
