use crate::db::connection::{Database, SCHEMA_SQL};
use crate::errors::PipelineError;
use crate::transform::CleanListing;
use rusqlite::{params, Connection};

/// Persists the clean batch: one upsert into `properties` and one
/// unconditional insert into `price_history` per row, all inside a single
/// transaction. Either the whole batch commits or none of it does.
///
/// Only one pipeline run may write to a store at a time; nothing here guards
/// against concurrent invocations racing on upsert order.
pub fn load_clean_batch(db: &Database, batch: &[CleanListing]) -> Result<(), PipelineError> {
    if batch.is_empty() {
        eprintln!("⚠️ No data to load");
        return Ok(());
    }

    eprintln!("Loading {} records (upsert logic)...", batch.len());

    db.with_conn(|conn| {
        let tx = conn
            .transaction()
            .map_err(|e| PipelineError::Db(e.to_string()))?;

        // Bootstrap: all statements are CREATE TABLE IF NOT EXISTS.
        tx.execute_batch(SCHEMA_SQL)
            .map_err(|e| PipelineError::Db(format!("Schema bootstrap failed: {e}")))?;

        for listing in batch {
            upsert_property(&tx, listing)?;
            insert_price_event(&tx, listing)?;
        }

        tx.commit().map_err(|e| PipelineError::Db(e.to_string()))
    })
}

/// Insert-or-update by property_id. On conflict only the volatile trio
/// (listing_id, beds, baths) refreshes; city, geo_cluster, coordinates etc.
/// stay as first seen. That asymmetry is the established policy of this
/// pipeline and of its downstream dashboard, carried over unchanged.
fn upsert_property(tx: &Connection, listing: &CleanListing) -> Result<(), PipelineError> {
    tx.execute(
        r#"
        INSERT INTO properties (
            property_id, listing_id, city, state_code, zip_code,
            beds, baths, sqft, lot_sqft, prop_type,
            geo_cluster, latitude, longitude
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        ON CONFLICT(property_id) DO UPDATE SET
            listing_id = excluded.listing_id,
            beds = excluded.beds,
            baths = excluded.baths
        "#,
        params![
            &listing.property_id,
            &listing.listing_id,
            &listing.city,
            &listing.state_code,
            &listing.zip_code,
            &listing.beds,
            &listing.baths,
            listing.sqft,
            &listing.lot_sqft,
            &listing.property_type,
            &listing.geo_cluster,
            listing.latitude,
            listing.longitude,
        ],
    )?;
    Ok(())
}

/// Appends one ledger row per listing per pass, whether or not the property
/// already existed. `scanned_at` defaults to the write-time timestamp.
fn insert_price_event(tx: &Connection, listing: &CleanListing) -> Result<(), PipelineError> {
    tx.execute(
        r#"
        INSERT INTO price_history (
            property_id, list_price, price_per_sqft,
            market_segment, is_pending, is_new_listing
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            &listing.property_id,
            listing.list_price,
            listing.price_per_sqft,
            listing.market_segment,
            listing.is_pending,
            listing.is_new_listing,
        ],
    )?;
    Ok(())
}
