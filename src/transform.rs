// transform.rs
use crate::fetch::models::RawListing;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// A fully-derived listing, ready to load. This is the anti-corruption layer
/// between the flattened upstream payload and the database schema.
#[derive(Debug, PartialEq, Clone)]
pub struct CleanListing {
    pub property_id: String,
    pub listing_id: Option<String>,

    pub list_date: Option<NaiveDateTime>,
    pub list_price: f64,
    pub sqft: f64,

    pub city: Option<String>,
    pub state_code: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,

    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub lot_sqft: Option<f64>,
    pub property_type: Option<String>,

    pub is_pending: bool,
    pub is_new_listing: bool,

    // Derived
    pub price_per_sqft: f64,
    pub market_segment: &'static str,
    pub geo_cluster: String,
    pub processed_at: NaiveDateTime,
}

/// Cleans and derives the validated batch. Never fails: structurally invalid
/// rows are dropped, and an empty result is a legitimate "nothing new/valid
/// this run" outcome.
pub fn transform_batch(batch: Vec<RawListing>) -> Vec<CleanListing> {
    if batch.is_empty() {
        eprintln!("⚠️ No data to transform");
        return Vec::new();
    }

    eprintln!("Starting data cleaning ({} records)...", batch.len());

    // One ingestion timestamp for the whole batch, not per row.
    let processed_at = Utc::now().naive_utc();

    batch
        .iter()
        .filter_map(|record| clean_record(record, processed_at))
        .collect()
}

fn clean_record(record: &RawListing, processed_at: NaiveDateTime) -> Option<CleanListing> {
    let property_id = id_field(record, "property_id")?;
    let list_price = num_field(record, "list_price")?;
    let sqft = num_field(record, "description.sqft")?;

    // A present-but-unparseable list_date drops the row; a missing or null
    // one is just unknown.
    let list_date = match record.get("list_date").filter(|v| !v.is_null()) {
        Some(value) => match value.as_str().and_then(parse_list_date) {
            Some(dt) => Some(dt),
            None => {
                eprintln!("Skipping record {property_id}: unparseable list_date {value}");
                return None;
            }
        },
        None => None,
    };

    // Sanity floors against placeholder/malformed listings. Also guarantees
    // sqft > 0 before the division below.
    if list_price <= 10_000.0 || sqft <= 100.0 {
        return None;
    }

    let price_per_sqft = list_price / sqft;

    let latitude = num_field(record, "location.address.coordinate.lat")?;
    let longitude = num_field(record, "location.address.coordinate.lon")?;

    Some(CleanListing {
        listing_id: id_field(record, "listing_id"),
        list_date,
        city: str_field(record, "location.address.city"),
        state_code: str_field(record, "location.address.state_code"),
        zip_code: str_field(record, "location.address.postal_code"),
        latitude,
        longitude,
        beds: num_field(record, "description.beds"),
        baths: num_field(record, "description.baths"),
        lot_sqft: num_field(record, "description.lot_sqft"),
        property_type: str_field(record, "description.type"),
        is_pending: bool_field(record, "flags.is_pending"),
        is_new_listing: bool_field(record, "flags.is_new_listing"),
        price_per_sqft,
        market_segment: segment_for_price(list_price),
        geo_cluster: geo_cluster_key(latitude, longitude),
        processed_at,
        property_id,
        list_price,
        sqft,
    })
}

/// Price-tier classification. Strict `>` comparisons: a listing at exactly
/// 2,000,000 is Premium, at exactly 1,000,000 Standard.
pub fn segment_for_price(list_price: f64) -> &'static str {
    if list_price > 2_000_000.0 {
        "Luxury"
    } else if list_price > 1_000_000.0 {
        "Premium"
    } else {
        "Standard"
    }
}

/// Coarse "mini-neighborhood" key: coordinates independently rounded to two
/// decimals and joined, e.g. `34.05_-118.24`.
pub fn geo_cluster_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.2}_{longitude:.2}")
}

fn parse_list_date(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).naive_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Ids arrive as strings but have shown up as bare numbers too.
fn id_field(record: &RawListing, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn num_field(record: &RawListing, key: &str) -> Option<f64> {
    record.get(key)?.as_f64()
}

fn str_field(record: &RawListing, key: &str) -> Option<String> {
    record.get(key)?.as_str().map(str::to_string)
}

fn bool_field(record: &RawListing, key: &str) -> bool {
    record
        .get(key)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
