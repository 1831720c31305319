//! Standard response shapes shared by every enveloped endpoint.

use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

pub fn success<T: Serialize>(data: T, message: &str) -> Json<Envelope<T>> {
    Json(envelope(data, message, StatusCode::OK))
}

pub fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(envelope(data, message, StatusCode::CREATED)),
    )
}

fn envelope<T>(data: T, message: &str, status: StatusCode) -> Envelope<T> {
    Envelope {
        success: true,
        status_code: status.as_u16(),
        message: message.to_string(),
        data,
        timestamp: Utc::now(),
    }
}

pub fn error_envelope(message: &str, status: StatusCode) -> ErrorEnvelope {
    ErrorEnvelope {
        success: false,
        status_code: status.as_u16(),
        message: message.to_string(),
        timestamp: Utc::now(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total_items: usize) -> Self {
        let total_pages = total_items.div_ceil(limit.max(1)).max(1);
        let has_next_page = page < total_pages;
        let has_prev_page = page > 1;
        Self {
            current_page: page,
            total_pages,
            total_items,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then_some(page + 1),
            prev_page: has_prev_page.then(|| page - 1),
        }
    }
}

/// Slice `items` to the requested page and wrap it under `items_key`.
pub fn paginated(
    items: Vec<Value>,
    page: usize,
    limit: usize,
    items_key: &str,
    message: &str,
) -> Json<Envelope<Value>> {
    let total = items.len();
    let start = (page - 1).saturating_mul(limit);
    let page_items: Vec<Value> = items.into_iter().skip(start).take(limit).collect();

    let mut data = Map::new();
    data.insert(items_key.to_string(), Value::Array(page_items));
    data.insert(
        "pagination".to_string(),
        serde_json::to_value(Pagination::new(page, limit, total)).unwrap_or(Value::Null),
    );
    success(Value::Object(data), message)
}
