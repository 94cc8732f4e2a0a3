use crate::db::connection::Database;
use crate::db::loader::load_clean_batch;
use crate::db::runs::{end_pipeline_run, start_pipeline_run};
use crate::errors::PipelineError;
use crate::tests::utils::{init_test_db, sample_listing};
use rusqlite::params;

fn count(db: &Database, sql: &str) -> i64 {
    db.with_conn(|conn| {
        conn.query_row(sql, [], |row| row.get(0))
            .map_err(PipelineError::from)
    })
    .unwrap()
}

#[test]
fn double_load_upserts_properties_and_appends_history() {
    let db = init_test_db("loader_double_load.sqlite3");
    let batch = vec![
        sample_listing("P1", 500_000.0, 1000.0),
        sample_listing("P2", 2_500_000.0, 2000.0),
    ];

    load_clean_batch(&db, &batch).unwrap();
    load_clean_batch(&db, &batch).unwrap();

    // Exactly one current-state row per property, one ledger row per pass.
    assert_eq!(count(&db, "SELECT COUNT(*) FROM properties"), 2);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM price_history"), 4);
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) FROM price_history WHERE property_id = 'P1'"
        ),
        2
    );
}

#[test]
fn conflict_refreshes_only_volatile_fields() {
    let db = init_test_db("loader_volatile.sqlite3");

    load_clean_batch(&db, &[sample_listing("P1", 500_000.0, 1000.0)]).unwrap();

    let mut resighted = sample_listing("P1", 500_000.0, 1000.0);
    resighted.beds = Some(4.0);
    resighted.city = Some("Glendale".to_string());
    load_clean_batch(&db, &[resighted]).unwrap();

    let (beds, city): (f64, String) = db
        .with_conn(|conn| {
            conn.query_row(
                "SELECT beds, city FROM properties WHERE property_id = 'P1'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(PipelineError::from)
        })
        .unwrap();

    // beds refreshed; city is write-once and stays as first seen.
    assert_eq!(beds, 4.0);
    assert_eq!(city, "Los Angeles");
}

#[test]
fn failed_batch_commits_nothing() {
    let db = init_test_db("loader_atomic.sqlite3");

    // Recreate the ledger with a store-side floor so the second row fails
    // mid-batch. The loader's bootstrap is IF NOT EXISTS and keeps it.
    db.with_conn(|conn| {
        conn.execute_batch(
            r#"
            DROP TABLE price_history;
            CREATE TABLE price_history (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                property_id     TEXT REFERENCES properties (property_id),
                list_price      REAL CHECK (list_price > 10000),
                price_per_sqft  REAL,
                market_segment  TEXT,
                is_pending      INTEGER,
                is_new_listing  INTEGER,
                scanned_at      TEXT DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .map_err(PipelineError::from)
    })
    .unwrap();

    let mut poisoned = sample_listing("P2", 800_000.0, 1000.0);
    poisoned.list_price = -1.0;

    let batch = vec![
        sample_listing("P1", 500_000.0, 1000.0),
        poisoned,
        sample_listing("P3", 900_000.0, 1500.0),
    ];

    assert!(load_clean_batch(&db, &batch).is_err());

    // Nothing from the batch persisted, not even the row that succeeded.
    assert_eq!(count(&db, "SELECT COUNT(*) FROM properties"), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM price_history"), 0);
}

#[test]
fn empty_batch_is_a_no_op() {
    let db = init_test_db("loader_empty.sqlite3");
    load_clean_batch(&db, &[]).unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM properties"), 0);
}

#[test]
fn run_bookkeeping_records_counts() {
    let db = init_test_db("loader_runs.sqlite3");

    let run_id = db
        .with_conn(|conn| start_pipeline_run(conn, "90004", 1_000))
        .unwrap();
    db.with_conn(|conn| end_pipeline_run(conn, run_id, 1_060, 2, 100, 87, true, None))
        .unwrap();

    let (success, loaded): (bool, i64) = db
        .with_conn(|conn| {
            conn.query_row(
                "SELECT success, records_loaded FROM pipeline_runs WHERE id = ?",
                params![run_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(PipelineError::from)
        })
        .unwrap();

    assert!(success);
    assert_eq!(loaded, 87);
}
