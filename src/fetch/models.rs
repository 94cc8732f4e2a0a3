// fetch/models.rs
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One listing as returned upstream, flattened to dotted-path keys
/// (`location.address.coordinate.lat` etc). Opaque until validated.
pub type RawListing = BTreeMap<String, Value>;

pub struct PaginatedResult {
    pub listings: Vec<RawListing>,
    pub pages_fetched: usize,
}

/// Body for POST /properties/v3/list.
//
// request
//  ├── limit           page size
//  ├── offset          advances by `limit` per successful page
//  ├── postal_code     region filter
//  ├── status          ["for_sale"]
//  └── sort
//       ├── direction  "desc"
//       └── field      "list_date"  (newest-listed-first)
#[derive(Debug, Serialize)]
pub struct SearchPayload<'a> {
    pub limit: u64,
    pub offset: u64,
    pub postal_code: &'a str,
    pub status: [&'static str; 1],
    pub sort: SortSpec,
}

#[derive(Debug, Serialize)]
pub struct SortSpec {
    pub direction: &'static str,
    pub field: &'static str,
}

impl<'a> SearchPayload<'a> {
    pub fn new(postal_code: &'a str, limit: u64, offset: u64) -> Self {
        Self {
            limit,
            offset,
            postal_code,
            status: ["for_sale"],
            sort: SortSpec {
                direction: "desc",
                field: "list_date",
            },
        }
    }
}

/// Flattens one nested listing object into dotted-path keys. Objects are
/// recursed; scalars and arrays are stored as-is (arrays the pipeline does
/// not recognize get pruned at the validation boundary anyway).
pub fn flatten_listing(value: &Value) -> RawListing {
    let mut out = BTreeMap::new();
    flatten_into("", value, &mut out);
    out
}

fn flatten_into(prefix: &str, value: &Value, out: &mut RawListing) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&path, child, out);
            }
        }
        _ if prefix.is_empty() => {}
        _ => {
            out.insert(prefix.to_string(), value.clone());
        }
    }
}
