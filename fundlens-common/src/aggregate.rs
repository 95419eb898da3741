//! Report aggregation
//!
//! The five table operations share one group-and-accumulate shape: group
//! transactions under a stable slug key, sum `amount_calc`, keep the first
//! seen value for display metadata, and emit rows in ascending key order.
//! All operations are pure over extracted transactions; empty input yields
//! an empty result, never an error.

use crate::models::{Transaction, LIST_DELIMITER};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Default row count for the top-10 report
pub const TOP_TEN_DEFAULT: usize = 10;

/// Transparency score lookup, keyed by think tank slug.
///
/// Scores live on the think tank entity, not on transactions; the archive
/// report looks them up while seeding rows. Implemented for a plain map so
/// tests can inject fixed scores.
pub trait ScoreLookup {
    /// Score for the given slug, 0 when absent
    fn score(&self, think_tank_slug: &str) -> i64;
}

impl ScoreLookup for HashMap<String, i64> {
    fn score(&self, think_tank_slug: &str) -> i64 {
        self.get(think_tank_slug).copied().unwrap_or(0)
    }
}

/// One donor row in a single-think-tank breakdown
#[derive(Debug, Clone, Serialize)]
pub struct DonorBreakdownRow {
    pub donor_name: String,
    pub donor_slug: String,
    pub amount_calc: i64,
    pub donor_type: String,
    pub source: Option<String>,
    pub donor_link: Option<String>,
}

/// One think tank row in a single-donor breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ThinkTankBreakdownRow {
    pub think_tank_name: String,
    pub think_tank_slug: String,
    pub amount_calc: i64,
    pub donor_type: String,
    pub source: Option<String>,
}

/// One think tank row in the archive matrix
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveRow {
    pub think_tank_name: String,
    pub think_tank_slug: String,
    /// Summed amount per donor type name; every row exposes the same keys
    pub donor_types: BTreeMap<String, i64>,
    pub transparency_score: i64,
}

/// One donor row in the donor archive
#[derive(Debug, Clone, Serialize)]
pub struct DonorArchiveRow {
    pub donor_name: String,
    pub donor_slug: String,
    pub amount_calc: i64,
    /// Deduplicated, insertion-ordered, comma-joined donation years
    pub year: String,
    pub donor_type: String,
    pub donor_link: Option<String>,
}

/// One row in the top-10 ranking
#[derive(Debug, Clone, Serialize)]
pub struct TopTenRow {
    pub think_tank_name: String,
    pub amount_calc: i64,
}

/// Donor breakdown for one think tank: group by donor slug path, sum
/// amounts, keep first-seen display metadata. Rows come out sorted by
/// donor slug ascending.
pub fn donor_breakdown(transactions: &[Transaction]) -> Vec<DonorBreakdownRow> {
    let mut rows: BTreeMap<String, DonorBreakdownRow> = BTreeMap::new();

    for tx in transactions {
        // Donor-grouped report: records without a donor cannot be attributed
        let Some(donor) = &tx.donor else { continue };

        match rows.entry(donor.slug_path.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().amount_calc += tx.amount_calc;
            }
            Entry::Vacant(entry) => {
                entry.insert(DonorBreakdownRow {
                    donor_name: donor.name_path.clone(),
                    donor_slug: donor.slug_path.clone(),
                    amount_calc: tx.amount_calc,
                    donor_type: tx.donor_type.clone(),
                    source: tx.source.clone(),
                    donor_link: donor.link.clone(),
                });
            }
        }
    }

    rows.into_values().collect()
}

/// Think tank breakdown for one donor: symmetric to [`donor_breakdown`],
/// grouped by think tank slug.
pub fn think_tank_breakdown(transactions: &[Transaction]) -> Vec<ThinkTankBreakdownRow> {
    let mut rows: BTreeMap<String, ThinkTankBreakdownRow> = BTreeMap::new();

    for tx in transactions {
        match rows.entry(tx.think_tank_slug.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().amount_calc += tx.amount_calc;
            }
            Entry::Vacant(entry) => {
                entry.insert(ThinkTankBreakdownRow {
                    think_tank_name: tx.think_tank_name.clone(),
                    think_tank_slug: tx.think_tank_slug.clone(),
                    amount_calc: tx.amount_calc,
                    donor_type: tx.donor_type.clone(),
                    source: tx.source.clone(),
                });
            }
        }
    }

    rows.into_values().collect()
}

/// Think tank archive: one row per think tank with a donor-type amount
/// matrix and the entity's transparency score.
///
/// After the accumulation pass, every donor type seen anywhere in the
/// result is backfilled with 0 on every row, so all rows expose the same
/// column set.
pub fn think_tank_archive(
    transactions: &[Transaction],
    scores: &dyn ScoreLookup,
) -> Vec<ArchiveRow> {
    let mut rows: BTreeMap<String, ArchiveRow> = BTreeMap::new();

    for tx in transactions {
        let row = rows
            .entry(tx.think_tank_slug.clone())
            .or_insert_with(|| ArchiveRow {
                think_tank_name: tx.think_tank_name.clone(),
                think_tank_slug: tx.think_tank_slug.clone(),
                donor_types: BTreeMap::new(),
                transparency_score: scores.score(&tx.think_tank_slug),
            });

        for type_name in &tx.donor_type_names {
            *row.donor_types.entry(type_name.clone()).or_insert(0) += tx.amount_calc;
        }
    }

    // Column union: every row exposes every donor type seen in the result
    let all_types: Vec<String> = rows
        .values()
        .flat_map(|row| row.donor_types.keys().cloned())
        .collect();
    for row in rows.values_mut() {
        for type_name in &all_types {
            row.donor_types.entry(type_name.clone()).or_insert(0);
        }
    }

    rows.into_values().collect()
}

struct DonorArchiveAcc {
    donor_name: String,
    amount_calc: i64,
    years: Vec<String>,
    donor_type: String,
    donor_link: Option<String>,
}

/// Donor archive: totals per donor across all matching years.
///
/// Donation years merge into a deduplicated, insertion-ordered list per
/// donor; metadata is first-write-wins as in the other reports.
pub fn donor_archive(transactions: &[Transaction]) -> Vec<DonorArchiveRow> {
    let mut rows: BTreeMap<String, DonorArchiveAcc> = BTreeMap::new();

    for tx in transactions {
        let Some(donor) = &tx.donor else { continue };

        let acc = rows
            .entry(donor.slug_path.clone())
            .or_insert_with(|| DonorArchiveAcc {
                donor_name: donor.name_path.clone(),
                amount_calc: 0,
                years: Vec::new(),
                donor_type: tx.donor_type.clone(),
                donor_link: donor.link.clone(),
            });

        acc.amount_calc += tx.amount_calc;
        if let Some(year) = &tx.donation_year {
            if !acc.years.iter().any(|y| y == year) {
                acc.years.push(year.clone());
            }
        }
    }

    rows.into_iter()
        .map(|(slug, acc)| DonorArchiveRow {
            donor_name: acc.donor_name,
            donor_slug: slug,
            amount_calc: acc.amount_calc,
            year: acc.years.join(LIST_DELIMITER),
            donor_type: acc.donor_type,
            donor_link: acc.donor_link,
        })
        .collect()
}

/// Top think tanks by total received amount.
///
/// Groups by display name (the one report keyed by name rather than slug),
/// sorts by amount descending with name ascending as the tiebreak, and
/// truncates to `limit`.
pub fn top_ten(transactions: &[Transaction], limit: usize) -> Vec<TopTenRow> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for tx in transactions {
        *totals.entry(tx.think_tank_name.clone()).or_insert(0) += tx.amount_calc;
    }

    let mut rows: Vec<TopTenRow> = totals
        .into_iter()
        .map(|(think_tank_name, amount_calc)| TopTenRow {
            think_tank_name,
            amount_calc,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.amount_calc
            .cmp(&a.amount_calc)
            .then_with(|| a.think_tank_name.cmp(&b.think_tank_name))
    });
    rows.truncate(limit);
    rows
}
