// fetch/client.rs
use crate::config::Config;
use crate::errors::PipelineError;
use crate::fetch::models::{flatten_listing, PaginatedResult, RawListing, SearchPayload};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub(crate) const PAGE_SIZE: u64 = 50;
const PAGE_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_RATE_LIMIT_ATTEMPTS: u64 = 5;
const RATE_LIMIT_BASE_SECS: u64 = 10;
const MAX_BACKOFF_SECS: u64 = 60;
const JITTER_MAX_SECS: u64 = 2;

pub struct ListingsClient {
    client: Client,
    api_key: String,
    host: String,
}

impl ListingsClient {
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            host: config.api_host.clone(),
        })
    }

    /// Fetches up to `max_pages` pages of for-sale listings for a ZIP,
    /// newest-listed-first. Soft-fails individual pages; stops early on an
    /// empty results page.
    pub fn fetch_all_listings(&self, postal_code: &str, max_pages: usize) -> PaginatedResult {
        paginate(max_pages, PAGE_DELAY, |offset| {
            self.fetch_page(postal_code, offset)
        })
    }

    /// One page at a fixed offset. 429 responses sleep and re-request the
    /// same offset, up to MAX_RATE_LIMIT_ATTEMPTS with a capped, jittered
    /// backoff; exhaustion surfaces as an ordinary page failure.
    fn fetch_page(&self, postal_code: &str, offset: u64) -> Result<Vec<RawListing>, PipelineError> {
        let url = format!("https://{}/properties/v3/list", self.host);
        let payload = SearchPayload::new(postal_code, PAGE_SIZE, offset);

        for attempt in 1..=MAX_RATE_LIMIT_ATTEMPTS {
            let resp = self
                .client
                .post(&url)
                .header("X-RapidAPI-Key", &self.api_key)
                .header("X-RapidAPI-Host", &self.host)
                .json(&payload)
                .send()
                .map_err(|e| PipelineError::Network(e.to_string()))?;

            let status = resp.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let base = std::cmp::min(RATE_LIMIT_BASE_SECS * attempt, MAX_BACKOFF_SECS);
                let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                eprintln!(
                    "⚠️ Rate limit hit at offset {offset} (attempt {attempt}), sleeping {}s",
                    base + jitter
                );
                std::thread::sleep(Duration::from_secs(base + jitter));
                continue;
            }

            if !status.is_success() {
                let body = resp.text().unwrap_or_default();
                return Err(PipelineError::Network(format!(
                    "HTTP {status} at offset {offset}: {body}"
                )));
            }

            let body: Value = resp
                .json()
                .map_err(|e| PipelineError::JsonParse(e.to_string()))?;

            return extract_results(&body);
        }

        Err(PipelineError::Network(format!(
            "still rate limited at offset {offset} after {MAX_RATE_LIMIT_ATTEMPTS} attempts"
        )))
    }
}

/// Offset-based pagination over a page fetcher. The offset advances only on
/// success, so a failed page is retried at the same offset on the next
/// iteration rather than skipped. An empty page means end-of-data.
pub(crate) fn paginate<F>(max_pages: usize, page_delay: Duration, mut fetch_page: F) -> PaginatedResult
where
    F: FnMut(u64) -> Result<Vec<RawListing>, PipelineError>,
{
    let mut listings = Vec::new();
    let mut offset = 0;
    let mut pages_fetched = 0;

    for page in 0..max_pages {
        eprintln!("📄 Fetching page {} (offset {offset})...", page + 1);

        match fetch_page(offset) {
            Ok(results) if results.is_empty() => {
                eprintln!("🏁 No more results found");
                break;
            }
            Ok(results) => {
                eprintln!("✅ Page {} returned {} listings", page + 1, results.len());
                listings.extend(results);
                pages_fetched += 1;
                offset += PAGE_SIZE;
                std::thread::sleep(page_delay);
            }
            Err(e) => {
                // Soft failure: this page yields nothing, the batch goes on.
                eprintln!("⚠️ Page {} failed: {e}", page + 1);
            }
        }
    }

    PaginatedResult {
        listings,
        pages_fetched,
    }
}

/// Navigates to `data.home_search.results` and flattens each listing.
pub(crate) fn extract_results(body: &Value) -> Result<Vec<RawListing>, PipelineError> {
    let results = body["data"]["home_search"]["results"]
        .as_array()
        .ok_or_else(|| {
            PipelineError::UnexpectedShape("data.home_search.results missing".to_string())
        })?;

    Ok(results
        .iter()
        .filter(|v| v.is_object())
        .map(flatten_listing)
        .collect())
}
