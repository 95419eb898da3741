//! Raw record extraction
//!
//! Turns store records into [`Transaction`]s: resolves the donor
//! parent-chain into name/slug paths, picks the think tank term, joins
//! donor type names into a display string, and coerces amounts.

use crate::models::{
    DonorIndex, DonorPath, RawRecord, Transaction, LIST_DELIMITER, NAME_PATH_DELIMITER,
    SLUG_PATH_DELIMITER,
};
use tracing::debug;

/// Upper bound on donor chain depth, guards against a parent_id cycle
const MAX_CHAIN_DEPTH: usize = 16;

/// Extract transactions from raw store records.
///
/// Records without a think tank assignment are skipped (they cannot be
/// attributed in any report). Records without a donor assignment are kept
/// with `donor = None`; donor-grouped aggregations drop them later.
pub fn extract(records: &[RawRecord], donors: &DonorIndex) -> Vec<Transaction> {
    records
        .iter()
        .filter_map(|record| extract_one(record, donors))
        .collect()
}

fn extract_one(record: &RawRecord, donors: &DonorIndex) -> Option<Transaction> {
    // First term wins; the store orders term lists by id ascending
    let think_tank = match record.think_tanks.first() {
        Some(term) => term,
        None => {
            debug!("Skipping transaction {}: no think tank term", record.id);
            return None;
        }
    };

    let donor_type_names: Vec<String> = record
        .donor_types
        .iter()
        .map(|t| t.name.clone())
        .collect();
    let donor_type = donor_type_names.join(LIST_DELIMITER);

    Some(Transaction {
        id: record.id,
        donor: resolve_donor_path(&record.donor_ids, donors),
        think_tank_name: think_tank.name.clone(),
        think_tank_slug: think_tank.slug.clone(),
        donation_year: record.donation_year.clone(),
        donor_type,
        donor_type_names,
        amount_calc: record.amount_calc.unwrap_or(0),
        source: record.source.clone(),
    })
}

/// Resolve the first assigned donor term into a root-to-leaf path.
///
/// Walks `parent_id` upward from the leaf and reverses, so "Parent Corp"
/// with child "Subsidiary" yields name path "Parent Corp > Subsidiary" and
/// slug path "parent-corp>subsidiary".
pub fn resolve_donor_path(donor_ids: &[i64], donors: &DonorIndex) -> Option<DonorPath> {
    let leaf_id = *donor_ids.first()?;
    let leaf = donors.get(&leaf_id)?;

    let mut chain = vec![leaf];
    let mut current = leaf;
    while let Some(parent_id) = current.parent_id {
        if chain.len() >= MAX_CHAIN_DEPTH {
            debug!("Donor chain for term {} exceeds depth cap", leaf_id);
            break;
        }
        match donors.get(&parent_id) {
            Some(parent) => {
                chain.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    chain.reverse();

    let name_path = chain
        .iter()
        .map(|d| d.name.as_str())
        .collect::<Vec<_>>()
        .join(NAME_PATH_DELIMITER);
    let slug_path = chain
        .iter()
        .map(|d| d.slug.as_str())
        .collect::<Vec<_>>()
        .join(SLUG_PATH_DELIMITER);

    Some(DonorPath {
        name_path,
        slug_path,
        link: leaf.link.clone(),
    })
}
