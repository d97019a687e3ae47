//! Payroll records and the agency/title aggregation pass.
//!
//! Raw rows from the open-data payroll source are grouped by
//! `(agency_name, title_description)`. Each group tracks its observed pay
//! bounds and headcount, and the finished list is ordered by highest pay.

use std::collections::BTreeSet;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One raw row from the upstream payroll source.
///
/// Every field is read leniently: a missing key, `null` or any other
/// non-scalar becomes an empty string and numbers keep their JSON text. A
/// row whose `regular_gross_paid` then fails to parse is dropped during
/// aggregation without affecting the rest of the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub fiscal_year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub agency_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub regular_gross_paid: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// A job title within an agency, with its observed pay range and headcount.
///
/// Serialized in camelCase so a client can post a row straight back to the
/// job summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRole {
    pub agency_name: String,
    pub title_description: String,
    pub pay_min: f64,
    pub pay_max: f64,
    pub count: u32,
}

/// Result of one aggregation fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolesPage {
    /// Roles sorted by `pay_max` descending.
    pub roles: Vec<AggregatedRole>,
    /// Distinct agencies in the raw response. Only populated for unfiltered
    /// fetches; a filtered response would drop every other agency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agencies: Option<Vec<String>>,
}

impl RolesPage {
    /// Build a page from raw records, collecting the agency list only when
    /// no agency filter was applied upstream.
    pub fn from_records(records: &[PayrollRecord], filtered: bool) -> Self {
        Self {
            roles: aggregate_roles(records),
            agencies: (!filtered).then(|| distinct_agencies(records)),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the leading decimal number of `raw`, ignoring leading whitespace
/// and any trailing text.
///
/// Returns `None` when no digits are found or the value is not finite.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_in = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_in(end);
    end += int_digits;

    let mut mantissa_digits = int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digits_in(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_in(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Running state for one `(agency, title)` group.
struct RoleAccumulator {
    agency_name: String,
    title_description: String,
    /// Smallest positive pay seen, or `+inf` while none has been seen.
    pay_min: f64,
    pay_max: f64,
    count: u32,
}

impl RoleAccumulator {
    fn new(record: &PayrollRecord, pay: f64) -> Self {
        Self {
            agency_name: record.agency_name.clone(),
            title_description: record.title_description.clone(),
            pay_min: if pay > 0.0 { pay } else { f64::INFINITY },
            pay_max: pay,
            count: 1,
        }
    }

    fn observe(&mut self, pay: f64) {
        self.count += 1;
        if pay > self.pay_max {
            self.pay_max = pay;
        }
        if pay > 0.0 && pay < self.pay_min {
            self.pay_min = pay;
        }
    }

    fn finish(self) -> AggregatedRole {
        // Without a positive observation `pay_max <= 0`, and flooring at zero
        // would put `pay_min` above it for negative-only groups.
        let pay_min = if self.pay_min.is_finite() {
            self.pay_min
        } else {
            self.pay_max
        };
        AggregatedRole {
            agency_name: self.agency_name,
            title_description: self.title_description,
            pay_min,
            pay_max: self.pay_max,
            count: self.count,
        }
    }
}

/// Group payroll records into roles keyed by `(agency_name, title_description)`.
///
/// Records whose gross pay does not parse to a finite number are dropped
/// entirely. Non-positive pay never lowers `pay_min` below the smallest
/// positive observation. A group with no positive pay at all reports
/// `pay_min == pay_max` rather than the literal `max(pay_max, 0)` floor,
/// which would exceed `pay_max` for negative-only groups. The result is
/// sorted by `pay_max` descending, with ties kept in first-encounter order.
pub fn aggregate_roles(records: &[PayrollRecord]) -> Vec<AggregatedRole> {
    let mut grouped: IndexMap<(&str, &str), RoleAccumulator> = IndexMap::new();

    for record in records {
        let Some(pay) = parse_decimal(&record.regular_gross_paid) else {
            continue;
        };

        match grouped.entry((
            record.agency_name.as_str(),
            record.title_description.as_str(),
        )) {
            Entry::Occupied(mut entry) => entry.get_mut().observe(pay),
            Entry::Vacant(entry) => {
                entry.insert(RoleAccumulator::new(record, pay));
            }
        }
    }

    let mut roles: Vec<AggregatedRole> = grouped
        .into_values()
        .map(RoleAccumulator::finish)
        .collect();
    // `sort_by` is stable, which keeps encounter order for equal maxima.
    roles.sort_by(|a, b| b.pay_max.total_cmp(&a.pay_max));
    roles
}

/// Distinct agency names in `records`, sorted lexicographically.
///
/// Every record counts here, including ones with unparseable pay.
pub fn distinct_agencies(records: &[PayrollRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.agency_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(agency: &str, title: &str, pay: &str) -> PayrollRecord {
        PayrollRecord {
            fiscal_year: "2024".to_string(),
            agency_name: agency.to_string(),
            title_description: title.to_string(),
            regular_gross_paid: pay.to_string(),
        }
    }

    // -- parse_decimal --

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_decimal("85000.50"), Some(85000.5));
        assert_eq!(parse_decimal("  -10"), Some(-10.0));
        assert_eq!(parse_decimal(".5"), Some(0.5));
        assert_eq!(parse_decimal("1e3"), Some(1000.0));
    }

    #[test]
    fn parses_leading_number_and_ignores_suffix() {
        assert_eq!(parse_decimal("123abc"), Some(123.0));
        assert_eq!(parse_decimal("42e"), Some(42.0));
    }

    #[test]
    fn rejects_non_numeric_and_non_finite() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("1e400"), None);
    }

    // -- aggregate_roles --

    #[test]
    fn single_record_has_equal_bounds() {
        let roles = aggregate_roles(&[record("POLICE", "Officer", "75000")]);

        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].pay_min, 75000.0);
        assert_eq!(roles[0].pay_max, 75000.0);
        assert_eq!(roles[0].count, 1);
    }

    #[test]
    fn non_positive_pay_never_lowers_minimum() {
        let roles = aggregate_roles(&[
            record("POLICE", "Officer", "50000"),
            record("POLICE", "Officer", "-10"),
        ]);

        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].pay_min, 50000.0);
        assert_eq!(roles[0].pay_max, 50000.0);
        assert_eq!(roles[0].count, 2);
    }

    #[test]
    fn positive_pay_after_non_positive_sets_minimum() {
        let roles = aggregate_roles(&[
            record("PARKS", "Gardener", "0"),
            record("PARKS", "Gardener", "30000"),
            record("PARKS", "Gardener", "45000"),
        ]);

        assert_eq!(roles[0].pay_min, 30000.0);
        assert_eq!(roles[0].pay_max, 45000.0);
        assert_eq!(roles[0].count, 3);
    }

    #[test]
    fn all_non_positive_falls_back_to_maximum() {
        let zero = aggregate_roles(&[record("A", "T", "0"), record("A", "T", "-5")]);
        assert_eq!(zero[0].pay_min, 0.0);
        assert_eq!(zero[0].pay_max, 0.0);

        let negative = aggregate_roles(&[record("A", "T", "-5"), record("A", "T", "-20")]);
        assert_eq!(negative[0].pay_max, -5.0);
        assert_eq!(negative[0].pay_min, -5.0);
    }

    #[test]
    fn unparseable_pay_is_dropped_from_count() {
        let roles = aggregate_roles(&[
            record("HEALTH", "Nurse", "90000"),
            record("HEALTH", "Nurse", "n/a"),
            record("HEALTH", "Nurse", ""),
            record("HEALTH", "Nurse", "80000"),
        ]);

        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].count, 2);
        assert_eq!(roles[0].pay_min, 80000.0);
        assert_eq!(roles[0].pay_max, 90000.0);
    }

    #[test]
    fn group_with_only_invalid_pay_is_absent() {
        let roles = aggregate_roles(&[
            record("HEALTH", "Nurse", "oops"),
            record("FIRE", "Firefighter", "60000"),
        ]);

        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].agency_name, "FIRE");
    }

    #[test]
    fn key_components_do_not_collide() {
        let roles = aggregate_roles(&[
            record("A__B", "C", "100"),
            record("A", "B__C", "200"),
        ]);

        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn sorted_by_max_descending_with_stable_ties() {
        let roles = aggregate_roles(&[
            record("X", "First", "50000"),
            record("Y", "Top", "120000"),
            record("Z", "Second", "50000"),
            record("W", "Low", "1000"),
        ]);

        let titles: Vec<&str> = roles.iter().map(|r| r.title_description.as_str()).collect();
        assert_eq!(titles, vec!["Top", "First", "Second", "Low"]);
    }

    #[test]
    fn min_never_exceeds_max() {
        let records: Vec<PayrollRecord> = ["10", "-3", "0", "-7.5", "99999", "abc", "-1e3", "-2", "x", "-9"]
            .iter()
            .enumerate()
            .map(|(i, pay)| record(if i % 2 == 0 { "A" } else { "B" }, "T", pay))
            .collect();

        for role in aggregate_roles(&records) {
            assert!(role.pay_min <= role.pay_max, "{role:?}");
            assert!(role.count >= 1);
        }
    }

    #[test]
    fn empty_input_yields_no_roles() {
        assert!(aggregate_roles(&[]).is_empty());
    }

    // -- distinct_agencies / RolesPage --

    #[test]
    fn agencies_are_distinct_and_sorted() {
        let agencies = distinct_agencies(&[
            record("POLICE", "Officer", "1"),
            record("FIRE", "Firefighter", "bad"),
            record("POLICE", "Detective", "2"),
            record("EDUCATION", "Teacher", "3"),
        ]);

        assert_eq!(agencies, vec!["EDUCATION", "FIRE", "POLICE"]);
    }

    #[test]
    fn filtered_page_has_no_agency_list() {
        let records = [record("POLICE", "Officer", "1")];

        assert!(RolesPage::from_records(&records, true).agencies.is_none());
        assert_eq!(
            RolesPage::from_records(&records, false).agencies,
            Some(vec!["POLICE".to_string()])
        );
    }

    #[test]
    fn record_deserializes_with_missing_columns() {
        let record: PayrollRecord =
            serde_json::from_str(r#"{"agency_name":"POLICE","title_description":"Officer"}"#)
                .unwrap();

        assert_eq!(record.regular_gross_paid, "");
        assert!(aggregate_roles(&[record]).is_empty());
    }

    #[test]
    fn record_accepts_null_and_numeric_columns() {
        let record: PayrollRecord = serde_json::from_str(
            r#"{"fiscal_year":2024,"agency_name":"POLICE","title_description":null,"regular_gross_paid":85000.5}"#,
        )
        .unwrap();

        assert_eq!(record.fiscal_year, "2024");
        assert_eq!(record.title_description, "");
        assert_eq!(record.regular_gross_paid, "85000.5");

        let null_pay: PayrollRecord =
            serde_json::from_str(r#"{"agency_name":"POLICE","regular_gross_paid":null}"#).unwrap();
        assert_eq!(null_pay.regular_gross_paid, "");
    }

    #[test]
    fn role_serializes_in_camel_case() {
        let role = AggregatedRole {
            agency_name: "POLICE".into(),
            title_description: "Officer".into(),
            pay_min: 1.0,
            pay_max: 2.0,
            count: 3,
        };

        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["agencyName"], "POLICE");
        assert_eq!(json["titleDescription"], "Officer");
        assert_eq!(json["payMin"], 1.0);
        assert_eq!(json["count"], 3);
    }
}
