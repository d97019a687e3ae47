//! Job summary request normalization and prompt construction.
//!
//! The summary endpoint accepts a loosely-typed JSON descriptor of an
//! aggregated role. Only `title` is mandatory; every other field is parsed on
//! a best-effort basis and silently becomes `None` when it is unusable.

use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::payroll::parse_decimal;
use crate::salary::format_usd;

/// System instruction sent ahead of every summary prompt.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant helping New Yorkers understand \
city government job titles. You summarize their responsibilities factually and concisely.";

/// Sampling temperature for summary generation.
pub const SUMMARY_TEMPERATURE: f32 = 0.4;

/// Agency sentence used when the request names no agency.
pub const DEFAULT_AGENCY_CLAUSE: &str = "This role is part of NYC government.";

/// A normalized job summary request.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    /// Trimmed, non-empty job title.
    pub title: String,
    /// Trimmed agency name; empty when absent.
    pub agency: String,
    pub pay_min: Option<f64>,
    pub pay_max: Option<f64>,
    /// Headcount. Finite numbers are kept as sent, including fractions.
    pub count: Option<f64>,
}

impl JobDescriptor {
    /// Parse and normalize a raw request body.
    ///
    /// Fails with [`CoreError::Validation`] when the body is not JSON, is not
    /// an object, or lacks a non-blank string `title`.
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, CoreError> {
        let payload: Value = serde_json::from_slice(body)
            .map_err(|_| CoreError::Validation("Invalid JSON payload".to_string()))?;

        match payload {
            Value::Object(fields) => Self::from_fields(&fields),
            _ => Err(CoreError::Validation(
                "Request body must be an object".to_string(),
            )),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, CoreError> {
        let title = fields
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::Validation("Missing or invalid 'title'".to_string()))?;

        let agency = fields
            .get("agency")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();

        Ok(Self {
            title: title.to_string(),
            agency: agency.to_string(),
            pay_min: fields.get("payMin").and_then(parse_money),
            pay_max: fields.get("payMax").and_then(parse_money),
            count: fields.get("count").and_then(parse_count),
        })
    }
}

/// Accept a finite JSON number or a non-blank numeric string.
pub fn parse_money(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) if !s.trim().is_empty() => parse_decimal(s),
        _ => None,
    }
}

/// Accept a finite JSON number or a string with a leading integer.
pub fn parse_count(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) if !s.trim().is_empty() => parse_leading_integer(s),
        _ => None,
    }
}

fn parse_leading_integer(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let sign_len = usize::from(matches!(s.as_bytes().first(), Some(b'+' | b'-')));
    let digit_len = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digit_len == 0 {
        return None;
    }
    s[..sign_len + digit_len].parse().ok()
}

/// Build the user prompt for a job summary.
///
/// The salary sentence appears only when both bounds are known; the
/// headcount sentence only when a count is known.
pub fn build_prompt(job: &JobDescriptor) -> String {
    let agency_clause = if job.agency.is_empty() {
        DEFAULT_AGENCY_CLAUSE.to_string()
    } else {
        format!("The role is part of the {}.", job.agency)
    };

    let salary_clause = match (job.pay_min, job.pay_max) {
        (Some(min), Some(max)) => format!(
            "The typical salary range is {} to {}.",
            format_usd(min),
            format_usd(max)
        ),
        _ => String::new(),
    };

    let headcount_clause = job
        .count
        .map(|n| format!(" About {n} employees currently hold this role."))
        .unwrap_or_default();

    format!(
        "Write a concise, plain-English overview of the NYC civil service job title \"{title}\".\n\
         {agency_clause}\n\
         {salary_clause}{headcount_clause}\n\
         Focus on typical responsibilities, who the role serves, and any teamwork or public \
         impact. Keep it factual and avoid speculation. Aim for 3 short paragraphs or fewer.",
        title = job.title,
    )
}
