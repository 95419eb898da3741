//! Record store adapter
//!
//! One synchronous fetch-all per report: published transactions matching
//! the criteria, with their term assignments ordered by term id ascending
//! so downstream first-wins resolution is deterministic. The adapter never
//! mutates the store.

use crate::criteria::Criteria;
use crate::models::{DonorIndex, DonorTerm, RawRecord, TermRef};
use crate::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Fetch all published transactions matching the criteria.
///
/// A donor criterion matches the named donor or any descendant in the
/// donor hierarchy. Unknown slugs match nothing; the result is simply
/// empty.
pub async fn fetch_raw_records(pool: &SqlitePool, criteria: &Criteria) -> Result<Vec<RawRecord>> {
    let mut sql = String::from(
        "SELECT t.id, t.donation_year, t.amount_calc, t.source \
         FROM transactions t WHERE t.status = 'published'",
    );
    let mut binds: Vec<String> = Vec::new();

    if let Some(slug) = &criteria.think_tank {
        sql.push_str(
            " AND EXISTS (SELECT 1 FROM transaction_think_tanks x \
             JOIN think_tanks k ON k.id = x.think_tank_id \
             WHERE x.transaction_id = t.id AND k.slug = ?)",
        );
        binds.push(slug.clone());
    }

    if let Some(slug) = &criteria.donor {
        // Donor filter includes descendants of the named donor
        let lineage = donor_lineage_ids(pool, slug).await?;
        let id_list = lineage
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if id_list.is_empty() {
            return Ok(Vec::new());
        }
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM transaction_donors x \
             WHERE x.transaction_id = t.id AND x.donor_id IN ({}))",
            id_list
        ));
    }

    if let Some(year) = &criteria.donation_year {
        sql.push_str(" AND t.donation_year = ?");
        binds.push(year.clone());
    }

    if let Some(slug) = &criteria.donor_type {
        sql.push_str(
            " AND EXISTS (SELECT 1 FROM transaction_donor_types x \
             JOIN donor_types dt ON dt.id = x.donor_type_id \
             WHERE x.transaction_id = t.id AND dt.slug = ?)",
        );
        binds.push(slug.clone());
    }

    sql.push_str(" ORDER BY t.id");

    let mut query =
        sqlx::query_as::<_, (i64, Option<String>, Option<i64>, Option<String>)>(&sql);
    for bind in &binds {
        query = query.bind(bind);
    }
    let transactions = query.fetch_all(pool).await?;

    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    // Term assignments are small tables; fetch them whole rather than
    // per-transaction
    let donor_assignments = load_donor_assignments(pool).await?;
    let think_tank_assignments = load_think_tank_assignments(pool).await?;
    let donor_type_assignments = load_donor_type_assignments(pool).await?;

    let records = transactions
        .into_iter()
        .map(|(id, donation_year, amount_calc, source)| RawRecord {
            id,
            donor_ids: donor_assignments.get(&id).cloned().unwrap_or_default(),
            think_tanks: think_tank_assignments.get(&id).cloned().unwrap_or_default(),
            donor_types: donor_type_assignments.get(&id).cloned().unwrap_or_default(),
            donation_year,
            amount_calc,
            source,
        })
        .collect();

    Ok(records)
}

/// The donor with the given slug plus all descendants, as term ids
async fn donor_lineage_ids(pool: &SqlitePool, slug: &str) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        WITH RECURSIVE lineage(id) AS (
            SELECT id FROM donors WHERE slug = ?
            UNION ALL
            SELECT d.id FROM donors d JOIN lineage l ON d.parent_id = l.id
        )
        SELECT id FROM lineage
        "#,
    )
    .bind(slug)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

async fn load_donor_assignments(pool: &SqlitePool) -> Result<HashMap<i64, Vec<i64>>> {
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT x.transaction_id, x.donor_id FROM transaction_donors x \
         ORDER BY x.transaction_id, x.donor_id",
    )
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
    for (transaction_id, donor_id) in rows {
        map.entry(transaction_id).or_default().push(donor_id);
    }
    Ok(map)
}

async fn load_think_tank_assignments(pool: &SqlitePool) -> Result<HashMap<i64, Vec<TermRef>>> {
    let rows = sqlx::query_as::<_, (i64, i64, String, String)>(
        "SELECT x.transaction_id, k.id, k.name, k.slug \
         FROM transaction_think_tanks x \
         JOIN think_tanks k ON k.id = x.think_tank_id \
         ORDER BY x.transaction_id, k.id",
    )
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<i64, Vec<TermRef>> = HashMap::new();
    for (transaction_id, id, name, slug) in rows {
        map.entry(transaction_id)
            .or_default()
            .push(TermRef { id, name, slug });
    }
    Ok(map)
}

async fn load_donor_type_assignments(pool: &SqlitePool) -> Result<HashMap<i64, Vec<TermRef>>> {
    let rows = sqlx::query_as::<_, (i64, i64, String, String)>(
        "SELECT x.transaction_id, dt.id, dt.name, dt.slug \
         FROM transaction_donor_types x \
         JOIN donor_types dt ON dt.id = x.donor_type_id \
         ORDER BY x.transaction_id, dt.id",
    )
    .fetch_all(pool)
    .await?;

    let mut map: HashMap<i64, Vec<TermRef>> = HashMap::new();
    for (transaction_id, id, name, slug) in rows {
        map.entry(transaction_id)
            .or_default()
            .push(TermRef { id, name, slug });
    }
    Ok(map)
}

/// All donor terms keyed by id, for parent-chain walking
pub async fn load_donor_index(pool: &SqlitePool) -> Result<DonorIndex> {
    let rows = sqlx::query_as::<_, (i64, String, String, Option<i64>, Option<String>)>(
        "SELECT id, name, slug, parent_id, link FROM donors",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, slug, parent_id, link)| {
            (
                id,
                DonorTerm {
                    id,
                    name,
                    slug,
                    parent_id,
                    link,
                },
            )
        })
        .collect())
}

/// Transparency scores keyed by think tank slug
pub async fn load_transparency_scores(pool: &SqlitePool) -> Result<HashMap<String, i64>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT slug, transparency_score FROM think_tanks",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}
