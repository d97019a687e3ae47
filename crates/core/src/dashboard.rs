//! Dashboard view state and its transitions.
//!
//! A UI owns one [`DashboardState`] and feeds it the outcome of every fetch.
//! Responses can arrive out of order, so each transition checks that it
//! still belongs to the latest request before touching visible state:
//!
//! - Role list fetches and job detail requests each carry a [`RequestToken`]
//!   from their own monotonically increasing [`RequestGeneration`].
//! - Selecting a filter supersedes every earlier role fetch, even one made
//!   for the same filter. Closing the panel or requesting another role
//!   supersedes every earlier detail request.

use crate::payroll::{AggregatedRole, RolesPage};

// ---------------------------------------------------------------------------
// Request generations
// ---------------------------------------------------------------------------

/// Identifies one dispatched job detail request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Monotonic counter handing out [`RequestToken`]s.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: u64,
}

impl RequestGeneration {
    /// Start a new request, superseding all earlier ones.
    pub fn dispatch(&mut self) -> RequestToken {
        self.current += 1;
        RequestToken(self.current)
    }

    /// Supersede all outstanding requests without starting a new one.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The job detail panel for one selected role.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDetailsPanel {
    pub role: AggregatedRole,
    /// Summary text received so far; `None` until the first fragment.
    pub summary: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub roles: Vec<AggregatedRole>,
    /// Agency menu entries, taken only from unfiltered fetches.
    pub agencies: Vec<String>,
    pub agency_filter: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub details: Option<JobDetailsPanel>,
    roles_generation: RequestGeneration,
    details_generation: RequestGeneration,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    // -- role list --

    /// Switch the agency filter and start loading. The current roles stay
    /// visible until the new page arrives. The initial load is
    /// `select_agency(None)`.
    pub fn select_agency(&mut self, agency: Option<String>) -> RequestToken {
        self.agency_filter = normalize_filter(agency);
        self.loading = true;
        self.error = None;
        self.roles_generation.dispatch()
    }

    /// Apply a fetched page. Returns `false` if a newer fetch has started
    /// since `token` was issued.
    pub fn roles_loaded(&mut self, token: RequestToken, page: RolesPage) -> bool {
        if !self.roles_generation.is_current(token) {
            return false;
        }
        self.roles = page.roles;
        if self.agency_filter.is_none() {
            if let Some(agencies) = page.agencies {
                self.agencies = agencies;
            }
        }
        self.loading = false;
        self.error = None;
        true
    }

    /// Record a failed fetch. Previously loaded roles are kept.
    pub fn roles_failed(&mut self, token: RequestToken, message: impl Into<String>) -> bool {
        if !self.roles_generation.is_current(token) {
            return false;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }

    // -- job details --

    /// Open the detail panel for `role` in its pending state.
    pub fn request_details(&mut self, role: AggregatedRole) -> RequestToken {
        let token = self.details_generation.dispatch();
        self.details = Some(JobDetailsPanel {
            role,
            summary: None,
            loading: true,
            error: None,
        });
        token
    }

    /// Append a streamed summary fragment.
    pub fn summary_fragment(&mut self, token: RequestToken, text: &str) -> bool {
        let Some(panel) = self.current_panel(token) else {
            return false;
        };
        panel.summary.get_or_insert_with(String::new).push_str(text);
        true
    }

    /// Mark the summary stream as finished.
    pub fn summary_completed(&mut self, token: RequestToken) -> bool {
        let Some(panel) = self.current_panel(token) else {
            return false;
        };
        panel.loading = false;
        true
    }

    /// Replace the pending panel content with an error.
    pub fn summary_failed(&mut self, token: RequestToken, message: impl Into<String>) -> bool {
        let Some(panel) = self.current_panel(token) else {
            return false;
        };
        panel.summary = None;
        panel.loading = false;
        panel.error = Some(message.into());
        true
    }

    /// Close the panel and discard any response still in flight.
    pub fn close_details(&mut self) {
        self.details_generation.invalidate();
        self.details = None;
    }

    fn current_panel(&mut self, token: RequestToken) -> Option<&mut JobDetailsPanel> {
        if !self.details_generation.is_current(token) {
            return None;
        }
        self.details.as_mut()
    }
}

fn normalize_filter(filter: Option<String>) -> Option<String> {
    filter.filter(|f| !f.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(title: &str) -> AggregatedRole {
        AggregatedRole {
            agency_name: "POLICE".into(),
            title_description: title.into(),
            pay_min: 50000.0,
            pay_max: 90000.0,
            count: 4,
        }
    }

    fn page(titles: &[&str], agencies: Option<&[&str]>) -> RolesPage {
        RolesPage {
            roles: titles.iter().map(|t| role(t)).collect(),
            agencies: agencies.map(|a| a.iter().map(|s| s.to_string()).collect()),
        }
    }

    // -- RequestGeneration --

    #[test]
    fn newer_dispatch_supersedes_older() {
        let mut generation = RequestGeneration::default();
        let first = generation.dispatch();
        let second = generation.dispatch();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));

        generation.invalidate();
        assert!(!generation.is_current(second));
    }

    // -- role list --

    #[test]
    fn unfiltered_load_sets_roles_and_agencies() {
        let mut state = DashboardState::new();
        assert!(state.loading);

        let token = state.select_agency(None);
        assert!(state.roles_loaded(token, page(&["Officer"], Some(&["FIRE", "POLICE"][..]))));

        assert!(!state.loading);
        assert_eq!(state.roles.len(), 1);
        assert_eq!(state.agencies, vec!["FIRE", "POLICE"]);
    }

    #[test]
    fn filtered_load_keeps_agency_list() {
        let mut state = DashboardState::new();
        let initial = state.select_agency(None);
        state.roles_loaded(initial, page(&["Officer"], Some(&["FIRE", "POLICE"][..])));

        let police = state.select_agency(Some("POLICE".into()));
        assert!(state.loading);
        assert_eq!(state.roles.len(), 1, "roles stay visible while loading");

        state.roles_loaded(police, page(&["Officer", "Detective"], Some(&["POLICE"][..])));

        assert_eq!(state.roles.len(), 2);
        assert_eq!(state.agencies, vec!["FIRE", "POLICE"]);
    }

    #[test]
    fn stale_filter_response_is_dropped() {
        let mut state = DashboardState::new();
        let fire = state.select_agency(Some("FIRE".into()));
        let police = state.select_agency(Some("POLICE".into()));

        assert!(!state.roles_loaded(fire, page(&["Firefighter"], None)));
        assert!(state.roles.is_empty());
        assert!(state.loading);

        assert!(state.roles_loaded(police, page(&["Officer"], None)));
        assert_eq!(state.roles[0].title_description, "Officer");
    }

    #[test]
    fn reselecting_a_filter_drops_its_earlier_fetch() {
        let mut state = DashboardState::new();
        let first_fire = state.select_agency(Some("FIRE".into()));
        state.select_agency(Some("POLICE".into()));
        let second_fire = state.select_agency(Some("FIRE".into()));

        assert!(!state.roles_loaded(first_fire, page(&["Old"], None)));
        assert!(!state.roles_failed(first_fire, "timed out"));
        assert!(state.roles.is_empty());
        assert_eq!(state.error, None);

        assert!(state.roles_loaded(second_fire, page(&["Firefighter"], None)));
        assert_eq!(state.roles[0].title_description, "Firefighter");
    }

    #[test]
    fn blank_filter_means_unfiltered() {
        let mut state = DashboardState::new();
        let token = state.select_agency(Some("   ".into()));

        assert_eq!(state.agency_filter, None);
        assert!(state.roles_loaded(token, page(&[], Some(&["A"][..]))));
        assert_eq!(state.agencies, vec!["A"]);
    }

    #[test]
    fn failure_keeps_previous_roles() {
        let mut state = DashboardState::new();
        let initial = state.select_agency(None);
        state.roles_loaded(initial, page(&["Officer"], None));
        let reload = state.select_agency(None);

        assert!(state.roles_failed(reload, "Failed to fetch data"));

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch data"));
        assert_eq!(state.roles.len(), 1);
    }

    // -- job details --

    #[test]
    fn fragments_accumulate_progressively() {
        let mut state = DashboardState::new();
        let token = state.request_details(role("Officer"));

        assert!(state.details.as_ref().unwrap().loading);
        assert!(state.summary_fragment(token, "Patrols "));
        assert!(state.summary_fragment(token, "streets."));
        assert!(state.summary_completed(token));

        let panel = state.details.as_ref().unwrap();
        assert_eq!(panel.summary.as_deref(), Some("Patrols streets."));
        assert!(!panel.loading);
    }

    #[test]
    fn only_latest_details_request_is_applied() {
        let mut state = DashboardState::new();
        let first = state.request_details(role("Officer"));
        let second = state.request_details(role("Detective"));

        assert!(!state.summary_fragment(first, "stale"));
        assert!(!state.summary_failed(first, "boom"));
        assert!(state.summary_fragment(second, "fresh"));

        let panel = state.details.as_ref().unwrap();
        assert_eq!(panel.role.title_description, "Detective");
        assert_eq!(panel.summary.as_deref(), Some("fresh"));
        assert_eq!(panel.error, None);
    }

    #[test]
    fn failure_replaces_pending_state() {
        let mut state = DashboardState::new();
        let token = state.request_details(role("Officer"));
        state.summary_fragment(token, "partial");

        assert!(state.summary_failed(token, "upstream down"));

        let panel = state.details.as_ref().unwrap();
        assert_eq!(panel.summary, None);
        assert!(!panel.loading);
        assert_eq!(panel.error.as_deref(), Some("upstream down"));
    }

    #[test]
    fn closing_discards_in_flight_response() {
        let mut state = DashboardState::new();
        let token = state.request_details(role("Officer"));
        state.close_details();

        assert!(!state.summary_fragment(token, "late"));
        assert!(!state.summary_completed(token));
        assert!(state.details.is_none());
    }
}
