//! Compact salary formatting for table cells and prompts.

/// Magnitude suffixes, largest first.
const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Shown when a range bound is NaN or infinite.
pub const SALARY_UNAVAILABLE: &str = "Salary unavailable";

/// Format a dollar amount as whole-dollar US currency with thousands
/// separators, e.g. `$85,000` or `-$12`.
pub fn format_usd(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Format a salary compactly: `$950`, `$1.5K`, `$85K`, `$2.3M`.
///
/// Values of a thousand or more are scaled to the largest fitting unit, with
/// one decimal below 10 of that unit and none above. A trailing `.0` is
/// dropped. Non-finite input renders as `$0`.
pub fn format_salary(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }

    let abs = value.abs();
    for (unit, suffix) in UNITS {
        if abs >= unit {
            let scaled = value / unit;
            let precision = if scaled.abs() >= 10.0 { 0 } else { 1 };
            let formatted = format!("{scaled:.precision$}");
            let formatted = formatted.strip_suffix(".0").unwrap_or(&formatted);
            return format!("${formatted}{suffix}");
        }
    }

    format_usd(value)
}

/// Format a pay range as `"$40K - $85K"`.
///
/// Bounds are reordered if needed. When they are within a dollar of each
/// other only a single value is shown.
pub fn format_salary_range(min: f64, max: f64) -> String {
    if !min.is_finite() || !max.is_finite() {
        return SALARY_UNAVAILABLE.to_string();
    }

    let (low, high) = (min.min(max), min.max(max));
    if (high - low).abs() < 1.0 {
        return format_salary(high);
    }

    format!("{} - {}", format_salary(low), format_salary(high))
}
