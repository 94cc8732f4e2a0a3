use crate::errors::PipelineError;
use rusqlite::{params, Connection};

pub fn start_pipeline_run(
    conn: &Connection,
    region: &str,
    now: i64,
) -> Result<i64, PipelineError> {
    conn.execute(
        "INSERT INTO pipeline_runs (region, started_at, success) VALUES (?, ?, 0)",
        params![region, now],
    )?;
    Ok(conn.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
pub fn end_pipeline_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    pages: usize,
    fetched: usize,
    loaded: usize,
    success: bool,
    error: Option<String>,
) -> Result<(), PipelineError> {
    conn.execute(
        "UPDATE pipeline_runs SET finished_at = ?, pages_fetched = ?, records_fetched = ?, records_loaded = ?, success = ?, error_message = ? WHERE id = ?",
        params![now, pages, fetched, loaded, success, error, run_id],
    )?;
    Ok(())
}
