use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::db::loader::load_clean_batch;
use crate::db::runs::{end_pipeline_run, start_pipeline_run};
use crate::errors::PipelineError;
use crate::fetch::ListingsClient;

mod config;
mod db;
mod errors;
mod export;
mod fetch;
mod schema;
mod transform;

#[cfg(test)]
mod tests;

const EXPORT_PATH: &str = "report.xlsx";

fn main() {
    // Positional args: ZIP to ingest and a page cap, with the usual defaults.
    let args: Vec<String> = std::env::args().collect();
    let postal_code = args.get(1).cloned().unwrap_or_else(|| "90004".to_string());
    let max_pages: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5);

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db) {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run_pipeline(&config, &db, &postal_code, max_pages) {
        eprintln!("❌ Pipeline run failed: {e}");
        std::process::exit(1);
    }
}

/// One extract → validate → transform → load pass, with run bookkeeping.
/// Extraction and transformation failures short-circuit before any load
/// attempt; a committed load is never undone by a later export failure.
fn run_pipeline(
    config: &Config,
    db: &Database,
    postal_code: &str,
    max_pages: usize,
) -> Result<(), PipelineError> {
    let run_id = db.with_conn(|conn| start_pipeline_run(conn, postal_code, now_secs()))?;

    let client = ListingsClient::new(config)?;

    eprintln!("Fetching up to {max_pages} pages for ZIP {postal_code}...");
    let fetched = client.fetch_all_listings(postal_code, max_pages);
    let pages = fetched.pages_fetched;
    let n_fetched = fetched.listings.len();
    eprintln!("Fetched {n_fetched} raw records over {pages} pages");

    if fetched.listings.is_empty() {
        let err = PipelineError::Network("no data fetched".into());
        finish_run(db, run_id, pages, 0, 0, false, Some(err.to_string()));
        return Err(err);
    }

    let validated = match schema::validate_batch(fetched.listings) {
        Ok(batch) => batch,
        Err(e) => {
            finish_run(db, run_id, pages, n_fetched, 0, false, Some(e.to_string()));
            return Err(e);
        }
    };
    eprintln!("Validated batch: {} of {n_fetched} records", validated.len());

    let clean = transform::transform_batch(validated);
    eprintln!("Clean batch: {} records", clean.len());

    if clean.is_empty() {
        eprintln!("🏁 Nothing new or valid this run");
        finish_run(db, run_id, pages, n_fetched, 0, true, None);
        return Ok(());
    }

    if let Err(e) = load_clean_batch(db, &clean) {
        finish_run(db, run_id, pages, n_fetched, 0, false, Some(e.to_string()));
        return Err(e);
    }
    eprintln!("✅ Loaded {} records", clean.len());

    if let Err(e) = export::export_clean_batch_xlsx(&clean, EXPORT_PATH) {
        eprintln!("⚠️ Export failed: {e}");
    } else {
        eprintln!("✅ Wrote {EXPORT_PATH}");
    }

    finish_run(db, run_id, pages, n_fetched, clean.len(), true, None);
    eprintln!("✅ Successfully processed {} properties", clean.len());
    Ok(())
}

fn finish_run(
    db: &Database,
    run_id: i64,
    pages: usize,
    fetched: usize,
    loaded: usize,
    success: bool,
    error: Option<String>,
) {
    let _ = db.with_conn(|conn| {
        end_pipeline_run(conn, run_id, now_secs(), pages, fetched, loaded, success, error)
    });
}

fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
