//! Record store models

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Delimiter between donor names in a hierarchy path ("Parent > Subsidiary")
pub const NAME_PATH_DELIMITER: &str = " > ";

/// Delimiter between donor slugs in a group key ("parent>subsidiary")
pub const SLUG_PATH_DELIMITER: &str = ">";

/// Delimiter for multi-valued display fields (donor types, years)
pub const LIST_DELIMITER: &str = ", ";

/// A taxonomy-style term reference (think tank or donor type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A donor term, hierarchical via `parent_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorTerm {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub link: Option<String>,
}

/// All donor terms keyed by id, for parent-chain walking
pub type DonorIndex = HashMap<i64, DonorTerm>;

/// One transaction as fetched from the store, terms unresolved.
///
/// Term lists are ordered by term id ascending so that "first term wins"
/// resolution is deterministic.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub id: i64,
    /// Assigned donor term ids, lowest id first
    pub donor_ids: Vec<i64>,
    /// Assigned think tank terms, lowest id first
    pub think_tanks: Vec<TermRef>,
    /// Assigned donor type terms, lowest id first
    pub donor_types: Vec<TermRef>,
    pub donation_year: Option<String>,
    pub amount_calc: Option<i64>,
    pub source: Option<String>,
}

/// Resolved donor identity for one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorPath {
    /// Display chain from root ancestor to leaf, e.g. "Parent Corp > Subsidiary"
    pub name_path: String,
    /// Slug chain used as a stable group key, e.g. "parent-corp>subsidiary"
    pub slug_path: String,
    /// Link of the leaf donor, if any
    pub link: Option<String>,
}

/// One extracted donation event, ready for aggregation.
///
/// Records without a think tank assignment never become a `Transaction`
/// (skip-on-missing); a missing donor leaves `donor` as `None` and the
/// donor-grouped reports skip the record instead.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub donor: Option<DonorPath>,
    pub think_tank_name: String,
    pub think_tank_slug: String,
    pub donation_year: Option<String>,
    /// Display names of all donor type terms, comma-joined
    pub donor_type: String,
    /// Individual donor type names, for per-type bucketing in the archive
    pub donor_type_names: Vec<String>,
    /// Canonical integer amount; 0 when the store field is absent
    pub amount_calc: i64,
    pub source: Option<String>,
}
