use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::api::{api_router, ProcurementService};
use crate::records::{Collection, InMemoryStore, RecordSource, StoreError};

pub(super) fn store() -> InMemoryStore {
    InMemoryStore::new()
        .with(
            Collection::Tenders,
            json!([
                {
                    "id": "T1",
                    "title": "Ward Road Upgrade",
                    "county": "Nakuru",
                    "category": "Roads",
                    "contractor_id": "C1",
                    "status": "Stalled",
                    "value": "1,600,000",
                    "benchmark_value": 1_000_000
                },
                {
                    "id": "T2",
                    "name": "Borehole Drilling",
                    "county": "Nakuru",
                    "contractor_id": "C2",
                    "status": "Completed",
                    "value": 400_000,
                    "benchmark_value": 500_000
                },
                {
                    "id": "T3",
                    "title": "",
                    "county": "Kisumu",
                    "contractor_id": "C2",
                    "status": "Ongoing",
                    "value": 900_000,
                    "benchmark_value": 1_000_000
                }
            ]),
        )
        .with(
            Collection::Posts,
            json!([
                { "id": "P1", "referenceId": "T1", "status": "delay_reported", "wardId": "nakuru-east", "county": "Nakuru", "category": "Roads" },
                { "id": "P2", "referenceId": "T3", "status": "on_schedule", "wardId": "kisumu-central", "county": "Kisumu", "category": "Water" }
            ]),
        )
        .with(
            Collection::Payments,
            json!([
                { "id": "PAY1", "entity_name": "Nakuru County Government", "status": "Paid", "days_outstanding": 30 },
                { "id": "PAY2", "entity_name": "Nakuru County Government", "status": "Pending", "days_outstanding": 200 }
            ]),
        )
        .with(
            Collection::Contractors,
            json!([
                { "id": "C1", "name": "Apex Builders", "kraPin": "P051234567A", "category": "Roads", "region": "Nakuru", "status": "active", "blacklisted": false },
                { "id": "C2", "name": "Lakeside Water Works", "kraPin": "P059876543B", "category": "Water", "region": "Kisumu", "status": "active", "blacklisted": false },
                { "id": "C3", "name": "Shoreline Supplies", "kraPin": "P050000001C", "category": "Supplies", "region": "Mombasa", "status": "blacklisted", "blacklisted": true }
            ]),
        )
        .with(
            Collection::FraudAlerts,
            json!([
                { "id": "FA1", "title": "Inflated road costs", "description": "Road tender priced well above benchmark", "severity": "High", "status": "open" },
                { "id": "FA2", "title": "Duplicate invoice", "description": "Invoice submitted twice", "severity": "low", "status": "resolved" }
            ]),
        )
        .with(
            Collection::Audits,
            json!([
                { "id": "AU1", "title": "Nakuru roads audit", "description": "Quarterly audit", "type": "financial", "status": "completed" }
            ]),
        )
        .with(
            Collection::Reports,
            json!([
                { "id": "R1", "title": "Fraud summary", "description": "Monthly fraud overview", "type": "monthly", "category": "fraud", "period": "2024-05" }
            ]),
        )
        .with(
            Collection::FeedPosts,
            json!([
                { "id": "F1", "ward": "Nakuru East", "title": "Road works paused" },
                { "id": "F2", "ward": "Kisumu Central", "title": "New borehole" },
                { "id": "F3", "ward": "Nakuru East", "title": "Drainage cleared" }
            ]),
        )
        .with(Collection::DashboardStats, json!({ "activeTenders": 3 }))
        .with(Collection::Wards, json!(["Nakuru East", "Kisumu Central"]))
}

pub(super) fn service() -> Arc<ProcurementService<InMemoryStore>> {
    Arc::new(ProcurementService::new(Arc::new(store())))
}

pub(super) fn router() -> Router {
    api_router(service())
}

pub(super) async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .expect("route executes")
}

pub(super) async fn send_json(router: Router, method: &str, uri: &str, body: Value) -> Response {
    router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}

pub(super) async fn json_ok(response: Response) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    read_json_body(response).await
}

/// Source whose reads succeed but every write is refused.
pub(super) struct ReadOnlyStore;

impl RecordSource for ReadOnlyStore {
    fn load(&self, _collection: Collection) -> Result<Value, StoreError> {
        Ok(Value::Array(Vec::new()))
    }

    fn append(&self, collection: Collection, _record: Value) -> Result<(), StoreError> {
        Err(StoreError::ReadOnly(collection.label()))
    }
}
