//! Integration tests for the record store adapter and report facade,
//! running against a seeded in-memory database.

use fundlens_common::db::{self, store};
use fundlens_common::reports::{run_report, Report, TableType};
use fundlens_common::Criteria;
use sqlx::SqlitePool;

/// Seed a small fixture set:
///
/// - donor types: Foreign Government, U.S. Government, Pentagon Contractor
/// - donors: acme (with child acme-labs), beta
/// - think tanks: alpha (score 4), gamma (score 0)
/// - transactions:
///   1) alpha <- acme,   2022, Foreign Government, 100
///   2) alpha <- acme,   2022, Foreign Government, 50
///   3) alpha <- beta,   2021, U.S. Government,    30
///   4) gamma <- acme-labs, 2022, Pentagon Contractor, 20
///   5) draft transaction that must never appear
async fn seed(pool: &SqlitePool) {
    for (id, name, slug) in [
        (1, "Foreign Government", "foreign-government"),
        (2, "U.S. Government", "us-government"),
        (3, "Pentagon Contractor", "pentagon-contractor"),
    ] {
        sqlx::query("INSERT INTO donor_types (id, name, slug) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(slug)
            .execute(pool)
            .await
            .unwrap();
    }

    sqlx::query(
        "INSERT INTO donors (id, name, slug, parent_id, link) VALUES
         (1, 'Acme', 'acme', NULL, 'https://example.com/acme'),
         (2, 'Acme Labs', 'acme-labs', 1, NULL),
         (3, 'Beta', 'beta', NULL, NULL)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO think_tanks (id, name, slug, transparency_score) VALUES
         (1, 'Alpha Institute', 'alpha', 4),
         (2, 'Gamma Center', 'gamma', 0)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO transactions (id, donation_year, amount_calc, source, status) VALUES
         (1, '2022', 100, 'https://example.com/src1', 'published'),
         (2, '2022', 50, NULL, 'published'),
         (3, '2021', 30, NULL, 'published'),
         (4, '2022', 20, NULL, 'published'),
         (5, '2022', 999, NULL, 'draft')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO transaction_donors (transaction_id, donor_id) VALUES
         (1, 1), (2, 1), (3, 3), (4, 2), (5, 1)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO transaction_think_tanks (transaction_id, think_tank_id) VALUES
         (1, 1), (2, 1), (3, 1), (4, 2), (5, 1)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO transaction_donor_types (transaction_id, donor_type_id) VALUES
         (1, 1), (2, 1), (3, 2), (4, 3), (5, 1)",
    )
    .execute(pool)
    .await
    .unwrap();
}

async fn seeded_pool() -> SqlitePool {
    let pool = db::connect_memory().await.unwrap();
    seed(&pool).await;
    pool
}

#[tokio::test]
async fn test_fetch_excludes_unpublished() {
    let pool = seeded_pool().await;
    let records = store::fetch_raw_records(&pool, &Criteria::default())
        .await
        .unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.id != 5));
}

#[tokio::test]
async fn test_fetch_filters_by_think_tank() {
    let pool = seeded_pool().await;
    let criteria = Criteria {
        think_tank: Some("gamma".to_string()),
        ..Default::default()
    };
    let records = store::fetch_raw_records(&pool, &criteria).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 4);
}

#[tokio::test]
async fn test_fetch_filters_by_year_and_type() {
    let pool = seeded_pool().await;
    let criteria = Criteria {
        donation_year: Some("2022".to_string()),
        donor_type: Some("foreign-government".to_string()),
        ..Default::default()
    };
    let records = store::fetch_raw_records(&pool, &criteria).await.unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_donor_filter_includes_descendants() {
    let pool = seeded_pool().await;
    let criteria = Criteria {
        donor: Some("acme".to_string()),
        ..Default::default()
    };
    let records = store::fetch_raw_records(&pool, &criteria).await.unwrap();
    // acme's own transactions (1, 2) plus the acme-labs one (4)
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
}

#[tokio::test]
async fn test_unknown_slug_matches_nothing() {
    let pool = seeded_pool().await;
    let criteria = Criteria {
        donor: Some("no-such-donor".to_string()),
        ..Default::default()
    };
    let records = store::fetch_raw_records(&pool, &criteria).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_single_think_tank_report() {
    let pool = seeded_pool().await;
    let criteria = Criteria {
        think_tank: Some("alpha".to_string()),
        ..Default::default()
    };
    let report = run_report(&pool, TableType::SingleThinkTank, &criteria)
        .await
        .unwrap();

    let Report::SingleThinkTank(rows) = report else {
        panic!("wrong report shape");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].donor_slug, "acme");
    assert_eq!(rows[0].amount_calc, 150);
    assert_eq!(rows[0].donor_type, "Foreign Government");
    assert_eq!(rows[0].source.as_deref(), Some("https://example.com/src1"));
    assert_eq!(rows[1].donor_slug, "beta");
    assert_eq!(rows[1].amount_calc, 30);
}

#[tokio::test]
async fn test_single_donor_report_uses_hierarchy() {
    let pool = seeded_pool().await;
    let criteria = Criteria {
        donor: Some("acme".to_string()),
        ..Default::default()
    };
    let report = run_report(&pool, TableType::SingleDonor, &criteria)
        .await
        .unwrap();

    let Report::SingleDonor(rows) = report else {
        panic!("wrong report shape");
    };
    // acme gave to alpha directly and to gamma via acme-labs
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].think_tank_slug, "alpha");
    assert_eq!(rows[0].amount_calc, 150);
    assert_eq!(rows[1].think_tank_slug, "gamma");
    assert_eq!(rows[1].amount_calc, 20);
}

#[tokio::test]
async fn test_think_tank_archive_report() {
    let pool = seeded_pool().await;
    let report = run_report(&pool, TableType::ThinkTankArchive, &Criteria::default())
        .await
        .unwrap();

    let Report::ThinkTankArchive(rows) = report else {
        panic!("wrong report shape");
    };
    assert_eq!(rows.len(), 2);

    let alpha = &rows[0];
    assert_eq!(alpha.think_tank_slug, "alpha");
    assert_eq!(alpha.transparency_score, 4);
    assert_eq!(alpha.donor_types["Foreign Government"], 150);
    assert_eq!(alpha.donor_types["U.S. Government"], 30);
    assert_eq!(alpha.donor_types["Pentagon Contractor"], 0);

    let gamma = &rows[1];
    assert_eq!(gamma.think_tank_slug, "gamma");
    assert_eq!(gamma.transparency_score, 0);
    assert_eq!(gamma.donor_types["Pentagon Contractor"], 20);
    assert_eq!(gamma.donor_types["Foreign Government"], 0);
}

#[tokio::test]
async fn test_donor_archive_merges_years() {
    let pool = seeded_pool().await;
    let report = run_report(&pool, TableType::DonorArchive, &Criteria::default())
        .await
        .unwrap();

    let Report::DonorArchive(rows) = report else {
        panic!("wrong report shape");
    };
    // Group keys are slug paths: acme, acme>acme-labs, beta
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].donor_slug, "acme");
    assert_eq!(rows[0].amount_calc, 150);
    assert_eq!(rows[0].year, "2022");
    assert_eq!(rows[1].donor_slug, "acme>acme-labs");
    assert_eq!(rows[1].donor_name, "Acme > Acme Labs");
    assert_eq!(rows[2].donor_slug, "beta");
}

#[tokio::test]
async fn test_top_ten_report() {
    let pool = seeded_pool().await;
    let report = run_report(&pool, TableType::TopTen, &Criteria::default())
        .await
        .unwrap();

    let Report::TopTen(rows) = report else {
        panic!("wrong report shape");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].think_tank_name, "Alpha Institute");
    assert_eq!(rows[0].amount_calc, 180);
    assert_eq!(rows[1].think_tank_name, "Gamma Center");
    assert_eq!(rows[1].amount_calc, 20);
}

#[tokio::test]
async fn test_report_runs_are_idempotent() {
    let pool = seeded_pool().await;
    let criteria = Criteria::default();

    let first = run_report(&pool, TableType::DonorArchive, &criteria)
        .await
        .unwrap();
    let second = run_report(&pool, TableType::DonorArchive, &criteria)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn test_transparency_scores_lookup() {
    let pool = seeded_pool().await;
    let scores = store::load_transparency_scores(&pool).await.unwrap();
    assert_eq!(scores.get("alpha"), Some(&4));
    assert_eq!(scores.get("gamma"), Some(&0));
}
