//! REST transport for the hosted store.
//!
//! Reads are plain `GET`s against `/rest/v1/<collection>` with filters, ordering and
//! `select` in the query string. Pagination rides on the `Range` header and the total
//! comes back in `Content-Range` because every request asks for an exact count.

use futures::future::LocalBoxFuture;
use hackdex_core::query::parse_content_range;
use hackdex_core::{QueryError, QueryRequest, QueryResponse, QueryTransport};
use std::rc::Rc;
use web_sys::{Request, RequestInit, RequestMode};

use crate::config::StoreConfig;
use crate::dom;

#[derive(Debug, Clone)]
pub struct RestTransport {
    config: Rc<StoreConfig>,
}

impl RestTransport {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Headers sent with every read, in send order.
#[must_use]
pub fn request_headers(config: &StoreConfig, request: &QueryRequest) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        ("Accept", String::from("application/json")),
        ("Range-Unit", String::from("items")),
        ("Range", request.range_header()),
        ("Prefer", String::from("count=exact")),
    ];
    if let Some(key) = &config.api_key {
        headers.push(("apikey", key.clone()));
        headers.push(("Authorization", format!("Bearer {key}")));
    }
    headers
}

/// Map a non-success HTTP status and body to a [`QueryError`].
#[must_use]
pub fn status_error(status: u16, body: &str) -> QueryError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().chars().take(200).collect());
    QueryError::Remote { status, message }
}

/// Decode a response body into rows and pair it with the `Content-Range` total.
///
/// # Errors
///
/// Returns [`QueryError::Decode`] when the body is not a JSON array.
pub fn parse_body(body: &str, content_range: Option<&str>) -> Result<QueryResponse, QueryError> {
    let rows = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Array(rows)) => rows,
        Ok(other) => {
            return Err(QueryError::Decode(format!(
                "expected a row array, got {}",
                kind_of(&other)
            )));
        }
        Err(e) => return Err(QueryError::Decode(e.to_string())),
    };
    Ok(QueryResponse {
        rows,
        total_count: content_range.and_then(parse_content_range),
    })
}

const fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[allow(clippy::future_not_send)]
async fn send(config: Rc<StoreConfig>, request: QueryRequest) -> Result<QueryResponse, QueryError> {
    let url = config.rest_url(&request.to_rest_path());
    let network = |e: wasm_bindgen::JsValue| QueryError::Network(dom::js_error_message(&e));

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    let req = Request::new_with_str_and_init(&url, &init).map_err(network)?;
    for (name, value) in request_headers(&config, &request) {
        req.headers().set(name, &value).map_err(network)?;
    }

    log::debug!("GET {url}");
    let response = dom::fetch_request(&req).await.map_err(network)?;
    let body = dom::response_text(&response).await.map_err(network)?;
    if !response.ok() {
        let error = status_error(response.status(), &body);
        log::warn!("{} failed: {error}", request.collection);
        return Err(error);
    }
    let content_range = response.headers().get("Content-Range").ok().flatten();
    parse_body(&body, content_range.as_deref())
}

impl QueryTransport for RestTransport {
    fn execute(&self, request: &QueryRequest) -> LocalBoxFuture<'static, Result<QueryResponse, QueryError>> {
        Box::pin(send(self.config.clone(), request.clone()))
    }
}
