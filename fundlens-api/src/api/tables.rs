//! Report data endpoints
//!
//! `GET /api/v1/transaction-data` returns the raw aggregate rows;
//! `GET /api/v1/data-table` returns the display-ready table structure.
//! Both always answer HTTP 200: a store failure is logged and served as an
//! empty result, which is what the front-end tables expect.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::warn;

use fundlens_common::reports::{run_report, Report, TableType};
use fundlens_common::table::{render_table, DataTable};
use fundlens_common::Criteria;

use crate::AppState;

/// Default row cap per response
const DEFAULT_PER_PAGE: usize = 200;

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

/// Query parameters shared by both report endpoints.
///
/// Filter parameters keep the hyphenated names the front-end sends.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub table_type: Option<String>,

    pub donors: Option<String>,

    #[serde(rename = "think-tanks")]
    pub think_tanks: Option<String>,

    pub years: Option<String>,

    #[serde(rename = "donor-types")]
    pub donor_types: Option<String>,

    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl ReportQuery {
    fn criteria(&self) -> Criteria {
        Criteria::normalize(
            self.think_tanks.as_deref(),
            self.donors.as_deref(),
            self.years.as_deref(),
            self.donor_types.as_deref(),
        )
    }
}

/// Run the requested report, degrading any failure to an empty result
async fn compute_report(state: &AppState, query: &ReportQuery) -> (TableType, Criteria, Report) {
    let table_type = TableType::parse(query.table_type.as_deref());
    let criteria = query.criteria();

    let report = match run_report(&state.db, table_type, &criteria).await {
        Ok(mut report) => {
            report.truncate(query.per_page);
            report
        }
        Err(e) => {
            warn!("Report query failed ({}): {}", table_type.as_str(), e);
            Report::empty(table_type)
        }
    };

    (table_type, criteria, report)
}

/// GET /api/v1/transaction-data
///
/// Returns the aggregate for the requested table type as a JSON array.
pub async fn get_transaction_data(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Json<Report> {
    let (_, _, report) = compute_report(&state, &query).await;
    Json(report)
}

/// GET /api/v1/data-table
///
/// Returns the display-ready table (caption, columns, rows).
pub async fn get_data_table(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Json<DataTable> {
    let (_, criteria, report) = compute_report(&state, &query).await;
    Json(render_table(&report, &criteria))
}
