//! Cumulative denormalized data recomputation
//!
//! After a bulk import, each donor and think tank carries a cumulative
//! `amount_calc` total and an `undisclosed` flag (true iff the entity had
//! contributing transactions and every one has `disclosed = 'no'`). These
//! are written as entity metadata for listing pages; the report
//! aggregation never reads them.

use fundlens_common::Result;
use sqlx::SqlitePool;
use tracing::info;

/// One recomputed entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CumulativeUpdate {
    pub slug: String,
    pub name: String,
    pub amount_calc: i64,
    pub undisclosed: bool,
}

/// Recompute donor and think tank cumulative data in one pass
pub async fn recompute_all(pool: &SqlitePool, dry_run: bool) -> Result<Vec<CumulativeUpdate>> {
    let mut updates = recompute_donor_data(pool, dry_run).await?;
    updates.extend(recompute_think_tank_data(pool, dry_run).await?);
    Ok(updates)
}

/// Recompute cumulative totals and undisclosed flags for all donors.
///
/// A donor's total covers transactions assigned to the donor or to any
/// descendant in the hierarchy, counted once each. With `dry_run` the
/// computation and logging run but nothing is written.
pub async fn recompute_donor_data(pool: &SqlitePool, dry_run: bool) -> Result<Vec<CumulativeUpdate>> {
    let donors = sqlx::query_as::<_, (i64, String, String)>("SELECT id, name, slug FROM donors")
        .fetch_all(pool)
        .await?;

    let mut updates = Vec::with_capacity(donors.len());
    for (id, name, slug) in donors {
        let lineage = donor_lineage(pool, id).await?;
        let id_list = lineage
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let (count, total, disclosed_count) = sqlx::query_as::<_, (i64, i64, i64)>(&format!(
            "SELECT COUNT(t.id), COALESCE(SUM(COALESCE(t.amount_calc, 0)), 0), \
             COALESCE(SUM(CASE WHEN t.disclosed != 'no' THEN 1 ELSE 0 END), 0) \
             FROM transactions t \
             WHERE t.status = 'published' AND t.id IN \
             (SELECT DISTINCT x.transaction_id FROM transaction_donors x \
              WHERE x.donor_id IN ({}))",
            id_list
        ))
        .fetch_one(pool)
        .await?;

        let undisclosed = count > 0 && disclosed_count == 0;
        info!(
            "donor {}: amount_calc={} undisclosed={}{}",
            slug,
            total,
            undisclosed,
            if dry_run { " (dry run)" } else { "" }
        );

        if !dry_run {
            sqlx::query("UPDATE donors SET amount_calc = ?, undisclosed = ? WHERE id = ?")
                .bind(total)
                .bind(undisclosed as i64)
                .bind(id)
                .execute(pool)
                .await?;
        }

        updates.push(CumulativeUpdate {
            slug,
            name,
            amount_calc: total,
            undisclosed,
        });
    }

    Ok(updates)
}

/// Recompute cumulative totals and undisclosed flags for all think tanks
pub async fn recompute_think_tank_data(
    pool: &SqlitePool,
    dry_run: bool,
) -> Result<Vec<CumulativeUpdate>> {
    let think_tanks =
        sqlx::query_as::<_, (i64, String, String)>("SELECT id, name, slug FROM think_tanks")
            .fetch_all(pool)
            .await?;

    let mut updates = Vec::with_capacity(think_tanks.len());
    for (id, name, slug) in think_tanks {
        let (count, total, disclosed_count) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COUNT(t.id), COALESCE(SUM(COALESCE(t.amount_calc, 0)), 0), \
             COALESCE(SUM(CASE WHEN t.disclosed != 'no' THEN 1 ELSE 0 END), 0) \
             FROM transactions t \
             JOIN transaction_think_tanks x ON x.transaction_id = t.id \
             WHERE t.status = 'published' AND x.think_tank_id = ?",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        let undisclosed = count > 0 && disclosed_count == 0;
        info!(
            "think tank {}: amount_calc={} undisclosed={}{}",
            slug,
            total,
            undisclosed,
            if dry_run { " (dry run)" } else { "" }
        );

        if !dry_run {
            sqlx::query("UPDATE think_tanks SET amount_calc = ?, undisclosed = ? WHERE id = ?")
                .bind(total)
                .bind(undisclosed as i64)
                .bind(id)
                .execute(pool)
                .await?;
        }

        updates.push(CumulativeUpdate {
            slug,
            name,
            amount_calc: total,
            undisclosed,
        });
    }

    Ok(updates)
}

/// The donor plus all descendants, by id
async fn donor_lineage(pool: &SqlitePool, donor_id: i64) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        WITH RECURSIVE lineage(id) AS (
            SELECT ?
            UNION ALL
            SELECT d.id FROM donors d JOIN lineage l ON d.parent_id = l.id
        )
        SELECT id FROM lineage
        "#,
    )
    .bind(donor_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}
