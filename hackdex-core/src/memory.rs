//! In-memory data store used by native runs, the tester and tests.
//!
//! Collections are plain JSON rows. Requests are answered the way the remote store
//! answers them: filtered, ordered, range-sliced and with an exact total count.

use futures::future::LocalBoxFuture;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use crate::QueryTransport;
use crate::query::{Direction, Filter, FilterOp, QueryError, QueryRequest, QueryResponse};

#[derive(Debug, Default)]
struct StoreState {
    collections: RefCell<HashMap<String, Vec<Value>>>,
    log: RefCell<Vec<QueryRequest>>,
    calls: Cell<usize>,
    failures: Cell<usize>,
}

/// Shared handle; clones see the same rows and counters.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<StoreState>,
}

impl MemoryStore {
    /// Build a store from a JSON object mapping collection names to row arrays.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Decode`] if the document is not such an object.
    pub fn from_json(document: &str) -> Result<Self, QueryError> {
        let parsed: HashMap<String, Vec<Value>> =
            serde_json::from_str(document).map_err(|e| QueryError::Decode(e.to_string()))?;
        let store = Self::default();
        store.state.collections.replace(parsed);
        Ok(store)
    }

    pub fn insert_rows(&self, collection: &str, rows: Vec<Value>) {
        self.state
            .collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .extend(rows);
    }

    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.collections.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Requests executed so far, successful or not.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.state.calls.get()
    }

    /// Every request received, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.state.log.borrow().clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<QueryRequest> {
        self.state.log.borrow().last().cloned()
    }

    /// Fail the next `count` requests with a network error.
    pub fn fail_next(&self, count: usize) {
        self.state.failures.set(count);
    }

    /// Answer `request` synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Network`] while injected failures remain and
    /// [`QueryError::Remote`] for an unknown collection.
    pub fn answer(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        self.state.calls.set(self.state.calls.get() + 1);
        self.state.log.borrow_mut().push(request.clone());

        let failures = self.state.failures.get();
        if failures > 0 {
            self.state.failures.set(failures - 1);
            return Err(QueryError::Network(String::from("connection refused")));
        }

        let collections = self.state.collections.borrow();
        let rows = collections
            .get(&request.collection)
            .ok_or_else(|| QueryError::Remote {
                status: 404,
                message: format!("relation \"{}\" does not exist", request.collection),
            })?;

        let mut matched: Vec<&Value> = rows
            .iter()
            .filter(|row| request.filters.iter().all(|f| matches(row, f)))
            .collect();
        matched.sort_by(|a, b| {
            request
                .order
                .iter()
                .map(|order| {
                    let ordering = compare(&a[order.field.as_str()], &b[order.field.as_str()]);
                    match order.direction {
                        Direction::Asc => ordering,
                        Direction::Desc => ordering.reverse(),
                    }
                })
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let total = matched.len();
        let start = usize::try_from(request.range_start).unwrap_or(usize::MAX);
        let len = usize::try_from(request.range_end.saturating_sub(request.range_start))
            .unwrap_or(usize::MAX)
            .saturating_add(1);
        Ok(QueryResponse {
            rows: matched.into_iter().skip(start).take(len).cloned().collect(),
            total_count: u64::try_from(total).ok(),
        })
    }
}

impl QueryTransport for MemoryStore {
    fn execute(
        &self,
        request: &QueryRequest,
    ) -> LocalBoxFuture<'static, Result<QueryResponse, QueryError>> {
        Box::pin(futures::future::ready(self.answer(request)))
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let field = &row[filter.field.as_str()];
    match &filter.op {
        FilterOp::Eq(expected) => as_text(field).is_some_and(|v| v == *expected),
        FilterOp::ILike(term) => as_text(field)
            .is_some_and(|v| v.to_lowercase().contains(&term.to_lowercase())),
        FilterOp::In(options) => as_text(field).is_some_and(|v| options.contains(&v)),
        FilterOp::Contains(expected) => field
            .as_array()
            .is_some_and(|items| items.iter().filter_map(as_text).any(|v| v == *expected)),
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => as_text(a).cmp(&as_text(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::OrderBy;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::from_json(
            &json!({
                "encounter_view": [
                    {"route": "R1", "method": "Surf", "time": "any", "pokemon": "Tentacool", "slot": 0, "sort_index": 2},
                    {"route": "R1", "method": "Grass", "time": "day", "pokemon": "Pidgey", "slot": 1, "sort_index": 1},
                    {"route": "R1", "method": "Grass", "time": "night", "pokemon": "Rattata", "slot": 0, "sort_index": 1},
                    {"route": "R2", "method": "Grass", "time": "any", "pokemon": "Caterpie", "slot": 0, "sort_index": 1}
                ]
            })
            .to_string(),
        )
        .unwrap()
    }

    fn names(response: &QueryResponse) -> Vec<&str> {
        response
            .rows
            .iter()
            .filter_map(|r| r["pokemon"].as_str())
            .collect()
    }

    #[test]
    fn filters_order_and_ranges_apply() {
        let store = store();
        let response = store
            .answer(
                &QueryRequest::new("encounter_view")
                    .filter(Filter::eq("route", "R1"))
                    .order_by(OrderBy::asc("sort_index"))
                    .order_by(OrderBy::asc("slot"))
                    .range(0, 1),
            )
            .unwrap();
        assert_eq!(names(&response), vec!["Rattata", "Pidgey"]);
        assert_eq!(response.total_count, Some(3));
    }

    #[test]
    fn any_of_and_ilike_match_like_the_remote_store() {
        let store = store();
        let response = store
            .answer(
                &QueryRequest::new("encounter_view")
                    .filter(Filter::any_of("time", &["night", "any"]))
                    .filter(Filter::ilike("pokemon", "TA"))
                    .range(0, 10),
            )
            .unwrap();
        assert_eq!(names(&response), vec!["Tentacool", "Rattata"]);
    }

    #[test]
    fn injected_failures_are_consumed_in_order() {
        let store = store();
        store.fail_next(1);
        let request = QueryRequest::new("encounter_view");
        assert!(matches!(store.answer(&request), Err(QueryError::Network(_))));
        assert!(store.answer(&request).is_ok());
        assert_eq!(store.calls(), 2);
    }

    #[test]
    fn unknown_collection_is_a_remote_error() {
        let err = store().answer(&QueryRequest::new("nope")).unwrap_err();
        assert!(matches!(err, QueryError::Remote { status: 404, .. }));
    }
}
