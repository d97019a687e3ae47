//! Handlers for the aggregated role table and the agency filter menu.

use axum::extract::{Query, State};
use axum::Json;
use payroll_core::agency::{agency_options, filter_agency_options, AgencyOption};
use payroll_core::payroll::{distinct_agencies, AggregatedRole, RolesPage};
use payroll_core::salary::format_salary_range;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::{AgencyFilterParams, AgencySearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One table row: an aggregated role plus its display-ready pay range.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRow {
    #[serde(flatten)]
    pub role: AggregatedRole,
    pub salary_range: String,
}

impl From<AggregatedRole> for RoleRow {
    fn from(role: AggregatedRole) -> Self {
        let salary_range = format_salary_range(role.pay_min, role.pay_max);
        Self { role, salary_range }
    }
}

/// Payload of `GET /api/v1/roles`.
#[derive(Debug, Serialize)]
pub struct RolesResponse {
    /// The agency filter that was applied, if any.
    pub agency: Option<String>,
    pub roles: Vec<RoleRow>,
    /// Present only for unfiltered requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agencies: Option<Vec<String>>,
}

impl RolesResponse {
    fn new(page: RolesPage, agency: Option<&str>) -> Self {
        Self {
            agency: agency.map(str::to_string),
            roles: page.roles.into_iter().map(RoleRow::from).collect(),
            agencies: page.agencies,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/roles?agency=
///
/// Fetches one page of payroll rows and aggregates them by agency and title,
/// highest pay first.
pub async fn list_roles(
    State(state): State<AppState>,
    Query(params): Query<AgencyFilterParams>,
) -> AppResult<Json<DataResponse<RolesResponse>>> {
    let agency = params.agency();
    let records = state.payroll.fetch_records(agency).await?;
    let page = RolesPage::from_records(&records, agency.is_some());

    tracing::info!(
        agency = agency.unwrap_or(""),
        rows = records.len(),
        roles = page.roles.len(),
        "Aggregated payroll roles"
    );

    Ok(Json(DataResponse {
        data: RolesResponse::new(page, agency),
    }))
}

/// GET /api/v1/agencies?search=
///
/// Returns the agency filter menu built from an unfiltered fetch.
pub async fn list_agencies(
    State(state): State<AppState>,
    Query(params): Query<AgencySearchParams>,
) -> AppResult<Json<DataResponse<Vec<AgencyOption>>>> {
    let records = state.payroll.fetch_records(None).await?;
    let options = filter_agency_options(agency_options(&distinct_agencies(&records)), &params.search);

    Ok(Json(DataResponse { data: options }))
}
