//! Agency filter menu helpers.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Label of the menu entry that clears the agency filter.
pub const ALL_AGENCIES_LABEL: &str = "All Agencies";

/// Badge for the "All Agencies" entry.
pub const ALL_AGENCIES_BADGE: &str = "\u{1F5FD}";

/// Badge for agencies no rule matches.
pub const DEFAULT_AGENCY_BADGE: &str = "\u{1F3E2}";

/// Keyword rules, checked in order. First match wins.
static BADGE_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"POLICE|LAW ENFORCEMENT|SPECIAL NARC", "\u{1F693}"),
        (r"FIRE|SANITATION|EMERGENCY", "\u{1F692}"),
        (r"EDUCATION|SCHOOL|COLLEGE|UNIVERSITY|PEDAGOGICAL", "\u{1F393}"),
        (r"TRANSPORT|TAXI|LIMOUSINE", "\u{1F687}"),
        (r"PARKS|RECREATION|ENVIRONMENT|WATER", "\u{1F333}"),
        (r"HEALTH|HOSPITAL|HYGIENE|MENTAL", "\u{1F3E5}"),
        (r"HOUSING|HOMELESS|SHELTER", "\u{1F3E0}"),
        (r"FINANCE|BUDGET|TREASURY|TAX|REVENUE", "\u{1F4B0}"),
        (r"CULTURAL|MUSEUM|ARTS|CULTURE", "\u{1F3AD}"),
        (r"TECH|INNOVATION|INFORMATION|CYBER", "\u{1F4BE}"),
        (
            r"JUSTICE|COURT|TRIAL|PROBATION|CORRECTION|LEGAL|ATTORNEY|COMMISSION",
            "\u{2696}\u{FE0F}",
        ),
        (r"VETERAN|MILITARY", "\u{1F396}\u{FE0F}"),
        (r"MAYOR|COUNCIL|COMPTROLLER|OMB", "\u{1F3DB}\u{FE0F}"),
    ]
    .into_iter()
    .map(|(pattern, badge)| {
        let re = Regex::new(&format!("(?i){pattern}")).expect("valid badge pattern");
        (re, badge)
    })
    .collect()
});

/// Pick an emoji badge for an agency name.
pub fn agency_badge(agency: &str) -> &'static str {
    if agency.is_empty() {
        return ALL_AGENCIES_BADGE;
    }
    BADGE_RULES
        .iter()
        .find(|(re, _)| re.is_match(agency))
        .map(|(_, badge)| *badge)
        .unwrap_or(DEFAULT_AGENCY_BADGE)
}

/// One entry of the agency filter menu. An empty `value` means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgencyOption {
    pub label: String,
    pub value: String,
    pub badge: &'static str,
}

/// Build the menu: "All Agencies" first, then each agency in the given order.
pub fn agency_options(agencies: &[String]) -> Vec<AgencyOption> {
    std::iter::once(AgencyOption {
        label: ALL_AGENCIES_LABEL.to_string(),
        value: String::new(),
        badge: ALL_AGENCIES_BADGE,
    })
    .chain(agencies.iter().map(|agency| AgencyOption {
        label: agency.clone(),
        value: agency.clone(),
        badge: agency_badge(agency),
    }))
    .collect()
}

/// Keep options whose label contains `query`, case-insensitively.
/// A blank query keeps everything.
pub fn filter_agency_options(options: Vec<AgencyOption>, query: &str) -> Vec<AgencyOption> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return options;
    }
    options
        .into_iter()
        .filter(|option| option.label.to_lowercase().contains(&query))
        .collect()
}
