use crate::db::connection::{init_db, Database};
use crate::transform::{segment_for_price, CleanListing};
use chrono::Utc;

/// Initialize a fresh test DB in the temp dir using the production schema.
/// Callers pass a unique file name so parallel tests don't collide.
pub fn init_test_db(name: &str) -> Database {
    let path = std::env::temp_dir().join(name);
    let _ = std::fs::remove_file(&path);

    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

/// A plausible clean row with derived fields consistent with price/sqft.
pub fn sample_listing(property_id: &str, list_price: f64, sqft: f64) -> CleanListing {
    CleanListing {
        property_id: property_id.to_string(),
        listing_id: Some(format!("L-{property_id}")),
        list_date: None,
        list_price,
        sqft,
        city: Some("Los Angeles".to_string()),
        state_code: Some("CA".to_string()),
        zip_code: Some("90004".to_string()),
        latitude: 34.05,
        longitude: -118.24,
        beds: Some(3.0),
        baths: Some(2.0),
        lot_sqft: Some(5000.0),
        property_type: Some("single_family".to_string()),
        is_pending: false,
        is_new_listing: true,
        price_per_sqft: list_price / sqft,
        market_segment: segment_for_price(list_price),
        geo_cluster: "34.05_-118.24".to_string(),
        processed_at: Utc::now().naive_utc(),
    }
}
