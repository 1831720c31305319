//! Contractor registry and blacklist views.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use super::SharedService;
use crate::api::envelope::{paginated, success, Envelope};
use crate::api::query::{find_by_id, retain_matching, text_field, PageRequest, RegistryQuery};
use crate::error::AppError;
use crate::records::RecordSource;

#[derive(Debug, Deserialize)]
struct BlacklistRequest {
    reason: String,
}

pub(super) fn routes<S>() -> Router<SharedService<S>>
where
    S: RecordSource + 'static,
{
    Router::new()
        .route("/registry/contractors", get(list_contractors::<S>))
        .route(
            "/registry/contractors/:contractor_id",
            get(contractor_details::<S>),
        )
        .route(
            "/registry/contractors/:contractor_id/blacklist",
            post(blacklist_contractor::<S>),
        )
        .route("/registry/blacklisted", get(blacklisted_contractors::<S>))
}

async fn list_contractors<S>(
    State(service): State<SharedService<S>>,
    Query(query): Query<RegistryQuery>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let page = PageRequest::from_parts(query.page, query.limit)?;
    let mut contractors = service.scored_contractors()?;

    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        contractors.retain(|contractor| {
            text_field(contractor, "name").to_lowercase().contains(&needle)
                || text_field(contractor, "kraPin")
                    .to_lowercase()
                    .contains(&needle)
        });
    }
    retain_matching(&mut contractors, "category", query.category.as_deref());
    retain_matching(&mut contractors, "region", query.region.as_deref());
    retain_matching(&mut contractors, "status", query.status.as_deref());

    Ok(paginated(
        contractors,
        page.page,
        page.limit,
        "contractors",
        "Contractors retrieved",
    ))
}

async fn contractor_details<S>(
    State(service): State<SharedService<S>>,
    Path(contractor_id): Path<String>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let contractor = find_by_id(service.scored_contractors()?, &contractor_id)
        .ok_or(AppError::NotFound("Contractor"))?;
    Ok(success(contractor, "Contractor details retrieved"))
}

async fn blacklist_contractor<S>(
    State(service): State<SharedService<S>>,
    Path(contractor_id): Path<String>,
    Json(request): Json<BlacklistRequest>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let contractor = service.blacklist_contractor(&contractor_id, &request.reason)?;
    Ok(success(contractor, "Contractor blacklisted successfully"))
}

async fn blacklisted_contractors<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Envelope<Vec<Value>>>, AppError>
where
    S: RecordSource + 'static,
{
    let blacklisted: Vec<Value> = service
        .scored_contractors()?
        .into_iter()
        .filter(|contractor| contractor.get("blacklisted").and_then(Value::as_bool) == Some(true))
        .collect();
    Ok(success(blacklisted, "Blacklisted contractors retrieved"))
}
