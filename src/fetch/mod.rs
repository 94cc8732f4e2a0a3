mod client;
pub mod models;

pub use client::ListingsClient;
#[cfg(test)]
pub(crate) use client::{extract_results, paginate};
