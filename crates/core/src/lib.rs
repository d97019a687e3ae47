//! Payroll explorer domain logic.
//!
//! Pure, I/O-free building blocks shared by the HTTP clients and the API
//! server: payroll record aggregation, salary formatting, job summary prompt
//! construction, streamed completion decoding, and the dashboard state model.

pub mod agency;
pub mod dashboard;
pub mod error;
pub mod job_summary;
pub mod payroll;
pub mod salary;
pub mod sse;
