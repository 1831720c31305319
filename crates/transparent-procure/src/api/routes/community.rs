//! Dashboard aggregates, ward feeds, lookups, and the whistle-blower inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::SharedService;
use crate::api::envelope::{created, paginated, success, Envelope};
use crate::api::query::{text_field, FeedQuery, PageRequest, SearchQuery};
use crate::api::service::WhistleblowerSubmission;
use crate::error::AppError;
use crate::records::{Collection, RecordSource};

pub(super) fn routes<S>() -> Router<SharedService<S>>
where
    S: RecordSource + 'static,
{
    Router::new()
        .route("/dashboard/stats", get(dashboard_stats::<S>))
        .route(
            "/dashboard/contractor-scores",
            get(contractor_scores::<S>),
        )
        .route("/dashboard/anomalies", get(price_anomalies::<S>))
        .route("/dashboard/ward-feed", get(dashboard_ward_feed::<S>))
        .route("/feed/posts", get(feed_posts::<S>))
        .route("/feed/ward/:ward_id", get(ward_feed::<S>))
        .route("/utils/search", get(search::<S>))
        .route("/utils/wards", get(wards::<S>))
        .route("/utils/counties", get(counties::<S>))
        .route("/whistleblower/reports", post(submit_report::<S>))
}

async fn dashboard_stats<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let stats = service.load(Collection::DashboardStats)?;
    Ok(success(stats, "Dashboard stats retrieved"))
}

async fn contractor_scores<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let scores = service.load(Collection::ContractorScores)?;
    Ok(success(scores, "Contractor scores retrieved"))
}

async fn price_anomalies<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let anomalies = service.load(Collection::PriceAnomalies)?;
    Ok(success(anomalies, "Anomalies retrieved"))
}

async fn dashboard_ward_feed<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let feed = service.load(Collection::WardFeed)?;
    Ok(success(feed, "Ward feed retrieved"))
}

async fn feed_posts<S>(
    State(service): State<SharedService<S>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let page = PageRequest::from_parts(query.page, query.limit)?;
    let mut posts = service.records(Collection::FeedPosts)?;
    if let Some(ward_id) = query.ward_id.as_deref().filter(|ward| !ward.is_empty()) {
        posts.retain(|post| text_field(post, "ward") == ward_id);
    }

    Ok(paginated(
        posts,
        page.page,
        page.limit,
        "posts",
        "Feed posts retrieved",
    ))
}

async fn ward_feed<S>(
    State(service): State<SharedService<S>>,
    Path(ward_id): Path<String>,
) -> Result<Json<Envelope<Vec<Value>>>, AppError>
where
    S: RecordSource + 'static,
{
    let needle = ward_id.to_lowercase();
    let posts: Vec<Value> = service
        .records(Collection::FeedPosts)?
        .into_iter()
        .filter(|post| text_field(post, "ward").to_lowercase().contains(&needle))
        .collect();
    Ok(success(posts, "Ward feed retrieved"))
}

async fn search<S>(
    State(service): State<SharedService<S>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let results = service.search(&query.q, query.kind.as_deref())?;
    Ok(success(
        json!({ "results": results }),
        "Search results retrieved",
    ))
}

async fn wards<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    Ok(success(service.load(Collection::Wards)?, "Wards retrieved"))
}

async fn counties<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    Ok(success(
        service.load(Collection::Counties)?,
        "Counties retrieved",
    ))
}

async fn submit_report<S>(
    State(service): State<SharedService<S>>,
    Json(submission): Json<WhistleblowerSubmission>,
) -> Result<(StatusCode, Json<Envelope<Value>>), AppError>
where
    S: RecordSource + 'static,
{
    let ref_number = service.submit_whistleblower_report(submission)?;
    Ok(created(
        json!({ "ref_number": ref_number }),
        "Report submitted anonymously",
    ))
}
