// schema.rs
//
// Dynamic schema reconciliation for the raw batch. The upstream payload is a
// moving target: new fields appear, optional ones disappear. The pipeline
// recognizes a fixed set of dotted paths and projects every batch onto the
// intersection, but refuses to run at all if a required column vanished from
// the response shape (that is a contract change upstream, not missing data).

use crate::errors::PipelineError;
use crate::fetch::models::RawListing;
use std::collections::BTreeSet;

/// The pipeline cannot function without these.
pub const REQUIRED_FIELDS: &[&str] = &["property_id", "description.sqft", "list_price"];

/// Used when present, silently skipped when upstream drops them.
pub const OPTIONAL_FIELDS: &[&str] = &[
    "listing_id",
    "list_date",
    "last_sold_date",
    "last_sold_price",
    "price_reduced_amount",
    "flags.is_price_reduced",
    "flags.is_new_listing",
    "list_price_min",
    "list_price_max",
    "estimate.estimate",
    "location.address.city",
    "location.address.state_code",
    "location.address.postal_code",
    "location.address.coordinate.lat",
    "location.address.coordinate.lon",
    "description.type",
    "description.sub_type",
    "description.beds",
    "description.baths",
    "description.lot_sqft",
    "flags.is_new_construction",
    "flags.is_foreclosure",
    "flags.is_pending",
    "photo_count",
];

/// Validates the batch shape and projects it onto the recognized fields.
///
/// A required field absent from the *column set* (union of keys across all
/// records) fails the whole batch with `SchemaDrift` — never a partial prune.
/// Rows missing a required *value* are dropped individually; everything that
/// comes out carries all three required fields.
pub fn validate_batch(raw: Vec<RawListing>) -> Result<Vec<RawListing>, PipelineError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let columns: BTreeSet<&str> = raw
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !columns.contains(*field))
        .map(|field| field.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::SchemaDrift(missing));
    }

    let keep: BTreeSet<&str> = REQUIRED_FIELDS
        .iter()
        .chain(OPTIONAL_FIELDS.iter().filter(|f| columns.contains(*f)))
        .copied()
        .collect();

    let validated: Vec<RawListing> = raw
        .into_iter()
        .map(|mut record| {
            record.retain(|key, _| keep.contains(key.as_str()));
            record
        })
        .filter(|record| {
            let complete = REQUIRED_FIELDS
                .iter()
                .all(|field| record.get(*field).is_some_and(|v| !v.is_null()));
            if !complete {
                eprintln!("Skipping record: missing required field value");
            }
            complete
        })
        .collect();

    Ok(validated)
}
