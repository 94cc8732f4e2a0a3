// export.rs
use crate::errors::PipelineError;
use crate::transform::CleanListing;
use rust_xlsxwriter::Workbook;

/// Writes the clean batch as a one-sheet workbook snapshot of what this run
/// loaded.
pub fn export_clean_batch_xlsx(batch: &[CleanListing], path: &str) -> Result<(), PipelineError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "Property ID",
        "Listing ID",
        "City",
        "State",
        "Zip / Postal",
        "Beds",
        "Baths",
        "Sqft",
        "List Price",
        "Price / Sqft",
        "Market Segment",
        "Geo Cluster",
        "Pending",
        "New Listing",
        "Processed At",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                PipelineError::Xlsx(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, listing) in batch.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &listing.property_id)
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write property id: {}", e)))?;

        worksheet
            .write_string(r, 1, listing.listing_id.as_deref().unwrap_or(""))
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write listing id: {}", e)))?;

        worksheet
            .write_string(r, 2, listing.city.as_deref().unwrap_or(""))
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write city: {}", e)))?;

        worksheet
            .write_string(r, 3, listing.state_code.as_deref().unwrap_or(""))
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write state: {}", e)))?;

        worksheet
            .write_string(r, 4, listing.zip_code.as_deref().unwrap_or(""))
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write postal code: {}", e)))?;

        worksheet
            .write_number(r, 5, listing.beds.unwrap_or(0.0))
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write beds: {}", e)))?;

        worksheet
            .write_number(r, 6, listing.baths.unwrap_or(0.0))
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write baths: {}", e)))?;

        worksheet
            .write_number(r, 7, listing.sqft)
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write sqft: {}", e)))?;

        worksheet
            .write_number(r, 8, listing.list_price)
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write price: {}", e)))?;

        worksheet
            .write_number(r, 9, listing.price_per_sqft)
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write price per sqft: {}", e)))?;

        worksheet
            .write_string(r, 10, listing.market_segment)
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write segment: {}", e)))?;

        worksheet
            .write_string(r, 11, &listing.geo_cluster)
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write geo cluster: {}", e)))?;

        worksheet
            .write_string(r, 12, if listing.is_pending { "Yes" } else { "No" })
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write pending flag: {}", e)))?;

        worksheet
            .write_string(r, 13, if listing.is_new_listing { "Yes" } else { "No" })
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write new listing flag: {}", e)))?;

        worksheet
            .write_string(r, 14, &listing.processed_at.format("%Y-%m-%d %H:%M:%S").to_string())
            .map_err(|e| PipelineError::Xlsx(format!("Failed to write processed at: {}", e)))?;
    }

    workbook
        .save(path)
        .map_err(|e| PipelineError::Xlsx(format!("Failed to save {}: {}", path, e)))?;

    Ok(())
}
