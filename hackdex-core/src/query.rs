//! Request/response contract of the remote data store.
//!
//! Collections are pre-joined views on the store side. This module only describes
//! filters, ordering and row ranges, plus the REST encoding used by the browser
//! transport.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use url::form_urlencoded::byte_serialize;

/// Comparison applied by a single filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    /// Field equals the value.
    Eq(String),
    /// Case-insensitive substring match.
    ILike(String),
    /// Field equals any of the values.
    In(Vec<String>),
    /// Array field contains the value.
    Contains(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
}

impl Filter {
    #[must_use]
    pub fn eq(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Eq(value.into()),
        }
    }

    #[must_use]
    pub fn ilike(field: &str, term: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::ILike(term.into()),
        }
    }

    #[must_use]
    pub fn any_of(field: &str, values: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::In(values.iter().map(|v| (*v).to_string()).collect()),
        }
    }

    #[must_use]
    pub fn contains(field: &str, value: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Contains(value.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    #[must_use]
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }
}

/// One read against a store collection. `range_end` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryRequest {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub range_start: u32,
    pub range_end: u32,
}

impl QueryRequest {
    #[must_use]
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            range_start: 0,
            range_end: 0,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    #[must_use]
    pub const fn range(mut self, start: u32, end: u32) -> Self {
        self.range_start = start;
        self.range_end = end;
        self
    }

    /// Path and query string in the store's REST dialect, e.g.
    /// `encounter_view?select=*&game_id=eq.FRO&order=sort_index.asc`.
    #[must_use]
    pub fn to_rest_path(&self) -> String {
        let mut parts = vec![String::from("select=*")];
        for filter in &self.filters {
            let value = match &filter.op {
                FilterOp::Eq(v) => format!("eq.{v}"),
                FilterOp::ILike(term) => format!("ilike.*{}*", like_literal(term)),
                FilterOp::In(values) => format!("in.({})", values.join(",")),
                FilterOp::Contains(v) => format!("cs.{{{v}}}"),
            };
            parts.push(format!("{}={}", encode(&filter.field), encode(&value)));
        }
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| {
                    let dir = match o.direction {
                        Direction::Asc => "asc",
                        Direction::Desc => "desc",
                    };
                    format!("{}.{dir}", o.field)
                })
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("order={}", encode(&order)));
        }
        format!("{}?{}", self.collection, parts.join("&"))
    }

    /// Value for the `Range` request header.
    #[must_use]
    pub fn range_header(&self) -> String {
        format!("{}-{}", self.range_start, self.range_end)
    }
}

fn encode(raw: &str) -> String {
    byte_serialize(raw.as_bytes()).collect()
}

/// Typed search text as a LIKE pattern body. The store rewrites every `*` to `%`
/// before escapes apply, so a typed `*` can only be narrowed to one character.
fn like_literal(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            _ => out.push(c),
        }
    }
    out
}

/// Total row count from a `Content-Range` header such as `0-50/132`.
#[must_use]
pub fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

/// Rows returned by the store, in the order requested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub rows: Vec<serde_json::Value>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl QueryResponse {
    /// Decode every row into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Decode`] when a row does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>, QueryError> {
        self.rows
            .iter()
            .map(|row| {
                serde_json::from_value(row.clone()).map_err(|e| QueryError::Decode(e.to_string()))
            })
            .collect()
    }
}

/// Failure surfaced by a store request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Store returned {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("Unexpected response shape: {0}")]
    Decode(String),
    /// The read was replaced before it could be used, e.g. by a game switch.
    #[error("Request superseded by a newer read")]
    Superseded,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rest_path_encodes_filters_order_and_range() {
        let request = QueryRequest::new("encounter_view")
            .filter(Filter::eq("game_id", "FRO"))
            .filter(Filter::eq("route", "Route 1"))
            .filter(Filter::any_of("time", &["day", "any"]))
            .filter(Filter::ilike("pokemon", "rat"))
            .order_by(OrderBy::asc("sort_index"))
            .order_by(OrderBy::asc("slot"))
            .range(50, 100);

        let path = request.to_rest_path();
        assert!(path.starts_with("encounter_view?select=*"));
        assert!(path.contains("game_id=eq.FRO"));
        assert!(path.contains("route=eq.Route+1"));
        assert!(path.contains("time=in.%28day%2Cany%29"));
        assert!(path.contains("pokemon=ilike.*rat*"));
        assert!(path.ends_with("order=sort_index.asc%2Cslot.asc"));
        assert_eq!(request.range_header(), "50-100");
    }

    #[test]
    fn ilike_term_cannot_widen_the_match() {
        let path = QueryRequest::new("pokedex_view")
            .filter(Filter::ilike("name", "50%_a*b\\"))
            .to_rest_path();
        assert!(path.contains("name=ilike.*50%5C%25%5C_a_b%5C%5C*"), "{path}");

        let bare = QueryRequest::new("pokedex_view")
            .filter(Filter::ilike("name", "*"))
            .to_rest_path();
        assert!(bare.ends_with("name=ilike.*_*"), "{bare}");
    }

    #[test]
    fn contains_filter_uses_array_syntax() {
        let path = QueryRequest::new("pokedex_view")
            .filter(Filter::contains("types", "fire"))
            .to_rest_path();
        assert!(path.contains("types=cs.%7Bfire%7D"));
    }

    #[test]
    fn content_range_yields_total() {
        assert_eq!(parse_content_range("0-50/132"), Some(132));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-50/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }
        let ok = QueryResponse {
            rows: vec![json!({"name": "Rattata"})],
            total_count: None,
        };
        assert_eq!(ok.decode::<Named>().map(|r| r.len()), Ok(1));

        let bad = QueryResponse {
            rows: vec![json!({"name": 19})],
            total_count: None,
        };
        assert!(matches!(bad.decode::<Named>(), Err(QueryError::Decode(_))));
    }
}
