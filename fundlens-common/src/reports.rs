//! Report facade
//!
//! Maps a table type plus normalized criteria onto one store fetch, the
//! extraction pass, and the matching aggregation. Errors are real here;
//! the HTTP layer decides how to degrade them.

use crate::aggregate::{
    self, ArchiveRow, DonorArchiveRow, DonorBreakdownRow, ThinkTankBreakdownRow, TopTenRow,
    TOP_TEN_DEFAULT,
};
use crate::criteria::Criteria;
use crate::db::store;
use crate::extract;
use crate::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// The five report table types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableType {
    SingleThinkTank,
    SingleDonor,
    ThinkTankArchive,
    DonorArchive,
    TopTen,
}

impl TableType {
    /// Parse a table type selector.
    ///
    /// Unknown or missing values silently fall back to the default
    /// (`single-think-tank`) rather than erroring, matching the behavior
    /// the front-end tables rely on.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("single-think-tank") => Self::SingleThinkTank,
            Some("single-donor") => Self::SingleDonor,
            Some("think-tank-archive") => Self::ThinkTankArchive,
            Some("donor-archive") => Self::DonorArchive,
            Some("top-10") => Self::TopTen,
            _ => Self::SingleThinkTank,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleThinkTank => "single-think-tank",
            Self::SingleDonor => "single-donor",
            Self::ThinkTankArchive => "think-tank-archive",
            Self::DonorArchive => "donor-archive",
            Self::TopTen => "top-10",
        }
    }
}

/// A computed report, serializing as a JSON array of rows
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    SingleThinkTank(Vec<DonorBreakdownRow>),
    SingleDonor(Vec<ThinkTankBreakdownRow>),
    ThinkTankArchive(Vec<ArchiveRow>),
    DonorArchive(Vec<DonorArchiveRow>),
    TopTen(Vec<TopTenRow>),
}

impl Report {
    /// Empty report of the given type
    pub fn empty(table_type: TableType) -> Self {
        match table_type {
            TableType::SingleThinkTank => Self::SingleThinkTank(Vec::new()),
            TableType::SingleDonor => Self::SingleDonor(Vec::new()),
            TableType::ThinkTankArchive => Self::ThinkTankArchive(Vec::new()),
            TableType::DonorArchive => Self::DonorArchive(Vec::new()),
            TableType::TopTen => Self::TopTen(Vec::new()),
        }
    }

    pub fn table_type(&self) -> TableType {
        match self {
            Self::SingleThinkTank(_) => TableType::SingleThinkTank,
            Self::SingleDonor(_) => TableType::SingleDonor,
            Self::ThinkTankArchive(_) => TableType::ThinkTankArchive,
            Self::DonorArchive(_) => TableType::DonorArchive,
            Self::TopTen(_) => TableType::TopTen,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::SingleThinkTank(rows) => rows.len(),
            Self::SingleDonor(rows) => rows.len(),
            Self::ThinkTankArchive(rows) => rows.len(),
            Self::DonorArchive(rows) => rows.len(),
            Self::TopTen(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only the first `limit` rows
    pub fn truncate(&mut self, limit: usize) {
        match self {
            Self::SingleThinkTank(rows) => rows.truncate(limit),
            Self::SingleDonor(rows) => rows.truncate(limit),
            Self::ThinkTankArchive(rows) => rows.truncate(limit),
            Self::DonorArchive(rows) => rows.truncate(limit),
            Self::TopTen(rows) => rows.truncate(limit),
        }
    }
}

/// Run one report: fetch matching records, extract, aggregate.
///
/// Every call recomputes from a fresh full scan; there is no cached
/// aggregate state.
pub async fn run_report(
    pool: &SqlitePool,
    table_type: TableType,
    criteria: &Criteria,
) -> Result<Report> {
    let raw = store::fetch_raw_records(pool, criteria).await?;
    let donor_index = store::load_donor_index(pool).await?;
    let transactions = extract::extract(&raw, &donor_index);

    let report = match table_type {
        TableType::SingleThinkTank => {
            Report::SingleThinkTank(aggregate::donor_breakdown(&transactions))
        }
        TableType::SingleDonor => {
            Report::SingleDonor(aggregate::think_tank_breakdown(&transactions))
        }
        TableType::ThinkTankArchive => {
            let scores = store::load_transparency_scores(pool).await?;
            Report::ThinkTankArchive(aggregate::think_tank_archive(&transactions, &scores))
        }
        TableType::DonorArchive => Report::DonorArchive(aggregate::donor_archive(&transactions)),
        TableType::TopTen => Report::TopTen(aggregate::top_ten(&transactions, TOP_TEN_DEFAULT)),
    };

    Ok(report)
}
