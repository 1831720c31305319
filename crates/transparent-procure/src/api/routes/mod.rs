mod community;
mod oversight;
mod registry;
mod transparency;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::service::ProcurementService;
use crate::records::RecordSource;

pub(crate) type SharedService<S> = Arc<ProcurementService<S>>;

/// Router builder exposing every `/api` endpoint backed by `service`.
pub fn api_router<S>(service: Arc<ProcurementService<S>>) -> Router
where
    S: RecordSource + 'static,
{
    let api = Router::new()
        .merge(transparency::routes::<S>())
        .merge(registry::routes::<S>())
        .merge(oversight::routes::<S>())
        .merge(community::routes::<S>());

    Router::new()
        .route("/", get(banner))
        .nest("/api", api)
        .with_state(service)
}

async fn banner() -> Json<Value> {
    Json(json!({
        "message": "TransparentProcure Backend is Live",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/health",
    }))
}
