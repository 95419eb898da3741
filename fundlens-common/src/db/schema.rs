//! Record store schema
//!
//! Entities mirror the source taxonomy model: hierarchical donors, think
//! tanks with a stored transparency score, donor types, and transactions
//! linked to each through join tables (a transaction may carry several
//! terms per taxonomy). `amount_calc` on donors/think tanks is the
//! denormalized cumulative total maintained by the CLI, never read during
//! report aggregation.

use crate::Result;
use sqlx::SqlitePool;

/// Create all tables if they do not exist (idempotent)
pub async fn create_all(pool: &SqlitePool) -> Result<()> {
    create_donor_types_table(pool).await?;
    create_donors_table(pool).await?;
    create_think_tanks_table(pool).await?;
    create_transactions_table(pool).await?;
    create_link_tables(pool).await?;
    Ok(())
}

async fn create_donor_types_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS donor_types (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_donors_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS donors (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            parent_id INTEGER REFERENCES donors(id),
            link TEXT,
            amount_calc INTEGER NOT NULL DEFAULT 0,
            undisclosed INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_think_tanks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS think_tanks (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            transparency_score INTEGER NOT NULL DEFAULT 0,
            amount_calc INTEGER NOT NULL DEFAULT 0,
            undisclosed INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_transactions_table(pool: &SqlitePool) -> Result<()> {
    // amount/amount_min/amount_max are the raw disclosure fields;
    // only amount_calc feeds aggregation
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY,
            donation_year TEXT,
            amount INTEGER,
            amount_min INTEGER,
            amount_max INTEGER,
            amount_calc INTEGER,
            source TEXT,
            disclosed TEXT NOT NULL DEFAULT 'yes',
            status TEXT NOT NULL DEFAULT 'published'
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_link_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transaction_donors (
            transaction_id INTEGER NOT NULL REFERENCES transactions(id),
            donor_id INTEGER NOT NULL REFERENCES donors(id),
            PRIMARY KEY (transaction_id, donor_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transaction_think_tanks (
            transaction_id INTEGER NOT NULL REFERENCES transactions(id),
            think_tank_id INTEGER NOT NULL REFERENCES think_tanks(id),
            PRIMARY KEY (transaction_id, think_tank_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transaction_donor_types (
            transaction_id INTEGER NOT NULL REFERENCES transactions(id),
            donor_type_id INTEGER NOT NULL REFERENCES donor_types(id),
            PRIMARY KEY (transaction_id, donor_type_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
