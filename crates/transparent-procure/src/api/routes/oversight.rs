//! Fraud monitoring, audits, and published reports.

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::SharedService;
use crate::api::envelope::{paginated, success, Envelope};
use crate::api::query::{retain_matching, AlertQuery, AuditQuery, PageRequest, ReportQuery};
use crate::api::service::TenderRiskAssessment;
use crate::error::AppError;
use crate::records::{Collection, RecordSource};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveAlertRequest {
    #[serde(default)]
    resolution_notes: String,
}

pub(super) fn routes<S>() -> Router<SharedService<S>>
where
    S: RecordSource + 'static,
{
    Router::new()
        .route("/fraud/alerts", get(list_alerts::<S>))
        .route("/fraud/alerts/:alert_id", get(alert_details::<S>))
        .route("/fraud/alerts/:alert_id/resolve", patch(resolve_alert::<S>))
        .route("/fraud/patterns", get(fraud_patterns))
        .route(
            "/fraud/risk-assessment/:tender_id",
            get(risk_assessment::<S>),
        )
        .route("/audit/audits", get(list_audits::<S>))
        .route("/audit/audits/:audit_id", get(audit_details::<S>))
        .route("/reports", get(list_reports::<S>))
        .route("/reports/templates", get(report_templates))
        .route("/reports/:report_id", get(report_details::<S>))
}

async fn list_alerts<S>(
    State(service): State<SharedService<S>>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let page = PageRequest::from_parts(query.page, query.limit)?;
    let mut alerts = service.records(Collection::FraudAlerts)?;
    retain_matching(&mut alerts, "severity", query.severity.as_deref());
    retain_matching(&mut alerts, "status", query.status.as_deref());

    Ok(paginated(
        alerts,
        page.page,
        page.limit,
        "alerts",
        "Fraud alerts retrieved",
    ))
}

async fn alert_details<S>(
    State(service): State<SharedService<S>>,
    Path(alert_id): Path<String>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let alert = service.find(Collection::FraudAlerts, &alert_id, "Alert")?;
    Ok(success(alert, "Alert details retrieved"))
}

async fn resolve_alert<S>(
    State(service): State<SharedService<S>>,
    Path(alert_id): Path<String>,
    request: Option<Json<ResolveAlertRequest>>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let notes = request
        .map(|Json(request)| request.resolution_notes)
        .unwrap_or_default();
    let alert = service.resolve_alert(&alert_id, &notes)?;
    Ok(success(alert, "Alert resolved successfully"))
}

async fn fraud_patterns() -> Json<Envelope<Vec<Value>>> {
    success(Vec::new(), "Fraud patterns retrieved")
}

async fn risk_assessment<S>(
    State(service): State<SharedService<S>>,
    Path(tender_id): Path<String>,
) -> Result<Json<Envelope<TenderRiskAssessment>>, AppError>
where
    S: RecordSource + 'static,
{
    let assessment = service.risk_assessment(&tender_id)?;
    Ok(success(assessment, "Risk assessment completed"))
}

async fn list_audits<S>(
    State(service): State<SharedService<S>>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let page = PageRequest::from_parts(query.page, query.limit)?;
    let mut audits = service.records(Collection::Audits)?;
    retain_matching(&mut audits, "type", query.kind.as_deref());
    retain_matching(&mut audits, "status", query.status.as_deref());

    Ok(paginated(
        audits,
        page.page,
        page.limit,
        "audits",
        "Audits retrieved",
    ))
}

async fn audit_details<S>(
    State(service): State<SharedService<S>>,
    Path(audit_id): Path<String>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let audit = service.find(Collection::Audits, &audit_id, "Audit")?;
    Ok(success(audit, "Audit details retrieved"))
}

async fn list_reports<S>(
    State(service): State<SharedService<S>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let page = PageRequest::from_parts(query.page, query.limit)?;
    let mut reports = service.records(Collection::Reports)?;
    retain_matching(&mut reports, "type", query.kind.as_deref());
    retain_matching(&mut reports, "category", query.category.as_deref());
    retain_matching(&mut reports, "period", query.period.as_deref());

    Ok(paginated(
        reports,
        page.page,
        page.limit,
        "reports",
        "Reports retrieved",
    ))
}

async fn report_templates() -> Json<Envelope<Value>> {
    success(
        json!([
            { "id": "tpl_001", "name": "Blacklist Summary", "type": "summary", "category": "blacklist" },
            { "id": "tpl_002", "name": "Fraud Monthly", "type": "monthly", "category": "fraud" },
            { "id": "tpl_003", "name": "Compliance Annual", "type": "annual", "category": "compliance" },
        ]),
        "Report templates retrieved",
    )
}

async fn report_details<S>(
    State(service): State<SharedService<S>>,
    Path(report_id): Path<String>,
) -> Result<Json<Envelope<Value>>, AppError>
where
    S: RecordSource + 'static,
{
    let report = service.find(Collection::Reports, &report_id, "Report")?;
    Ok(success(report, "Report details retrieved"))
}
