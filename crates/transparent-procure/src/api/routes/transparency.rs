//! Demo-facing endpoints returning flat lists, plus the score card views.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::SharedService;
use crate::api::envelope::{success, Envelope};
use crate::api::query::WardFilter;
use crate::api::service::CountySummary;
use crate::error::AppError;
use crate::records::{Collection, RecordSource};
use crate::reputation::ScoreCard;

pub(super) fn routes<S>() -> Router<SharedService<S>>
where
    S: RecordSource + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/tenders", get(list_tenders::<S>))
        .route("/posts", get(list_posts::<S>))
        .route("/contractors", get(list_contractors::<S>))
        .route("/contractors/:contractor_id/trust", get(contractor_trust::<S>))
        .route("/payments", get(list_payments::<S>))
        .route("/counties", get(list_counties::<S>))
        .route("/counties/:county_name/reputation", get(county_reputation::<S>))
}

async fn health() -> Json<Envelope<Value>> {
    success(json!({ "status": "healthy" }), "API is healthy")
}

async fn list_tenders<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    Ok(Json(service.annotated_tenders()?))
}

async fn list_posts<S>(
    State(service): State<SharedService<S>>,
    Query(filter): Query<WardFilter>,
) -> Result<Json<Vec<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    Ok(Json(service.posts_for(filter.ward_id.as_deref())?))
}

async fn list_contractors<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    Ok(Json(service.scored_contractors()?))
}

async fn contractor_trust<S>(
    State(service): State<SharedService<S>>,
    Path(contractor_id): Path<String>,
) -> Result<Json<Envelope<ScoreCard>>, AppError>
where
    S: RecordSource + 'static,
{
    let card = service.contractor_card(&contractor_id)?;
    Ok(success(card, "Contractor trust score retrieved"))
}

async fn list_payments<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    Ok(Json(service.records(Collection::Payments)?))
}

async fn list_counties<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<CountySummary>>, AppError>
where
    S: RecordSource + 'static,
{
    Ok(Json(service.county_summaries()?))
}

async fn county_reputation<S>(
    State(service): State<SharedService<S>>,
    Path(county_name): Path<String>,
) -> Result<Json<Envelope<ScoreCard>>, AppError>
where
    S: RecordSource + 'static,
{
    let card = service.county_card(&county_name)?;
    Ok(success(card, "County reputation retrieved"))
}
