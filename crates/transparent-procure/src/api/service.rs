use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::query::{find_by_id, text_field};
use crate::error::AppError;
use crate::records::{Collection, RecordSource};
use crate::reputation::{
    annotate_tenders, classify, contractor_score_card, county_score_card, record_id,
    score_contractor, score_county, DelayedProjects, Project, RiskFlag, RiskTier, ScoreCard,
};

const ALL_ACTIVITIES: &str = "All Activities";
const UNKNOWN_COUNTY: &str = "Unknown";
const SEARCH_RESULT_LIMIT: usize = 10;
const SEARCH_DESCRIPTION_CHARS: usize = 100;

/// Service composing the record source with the reputation engine.
pub struct ProcurementService<S> {
    source: Arc<S>,
}

/// Anonymous tracking number: `TP-` plus eight hex digits of a random v4 UUID.
pub(crate) fn next_reference_number() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("TP-{}", token[..8].to_uppercase())
}

impl<S> ProcurementService<S>
where
    S: RecordSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn load(&self, collection: Collection) -> Result<Value, AppError> {
        Ok(self.source.load(collection)?)
    }

    pub fn records(&self, collection: Collection) -> Result<Vec<Value>, AppError> {
        Ok(self.source.records(collection)?)
    }

    pub fn find(
        &self,
        collection: Collection,
        id: &str,
        entity: &'static str,
    ) -> Result<Value, AppError> {
        find_by_id(self.records(collection)?, id).ok_or(AppError::NotFound(entity))
    }

    /// Tenders normalized and annotated with `is_critical` / `risk_flag`.
    pub fn annotated_tenders(&self) -> Result<Vec<Value>, AppError> {
        let tenders = self.records(Collection::Tenders)?;
        let posts = self.records(Collection::Posts)?;
        Ok(annotate_tenders(&tenders, &posts))
    }

    /// Citizen posts matching a ward id, a county contained in it, or a category.
    pub fn posts_for(&self, ward_id: Option<&str>) -> Result<Vec<Value>, AppError> {
        let posts = self.records(Collection::Posts)?;
        let filter = match ward_id {
            None | Some(ALL_ACTIVITIES) => return Ok(posts),
            Some(filter) => filter,
        };

        Ok(posts
            .into_iter()
            .filter(|post| {
                let county = text_field(post, "county");
                text_field(post, "wardId") == filter
                    || (!county.is_empty() && filter.contains(county))
                    || text_field(post, "category") == filter
            })
            .collect())
    }

    /// Contractors with `trust_score` and `risk_level` attached.
    pub fn scored_contractors(&self) -> Result<Vec<Value>, AppError> {
        let contractors = self.records(Collection::Contractors)?;
        let tenders = self.records(Collection::Tenders)?;
        let posts = self.records(Collection::Posts)?;

        Ok(contractors
            .into_iter()
            .map(|mut contractor| {
                let id = record_id(&contractor).unwrap_or_default();
                let score = score_contractor(&tenders, &posts, &id);
                if let Value::Object(fields) = &mut contractor {
                    fields.insert("trust_score".to_string(), json!(score));
                    fields.insert(
                        "risk_level".to_string(),
                        json!(RiskTier::from_score(score).label()),
                    );
                }
                contractor
            })
            .collect())
    }

    pub fn contractor_card(&self, contractor_id: &str) -> Result<ScoreCard, AppError> {
        self.find(Collection::Contractors, contractor_id, "Contractor")?;
        let tenders = self.records(Collection::Tenders)?;
        let posts = self.records(Collection::Posts)?;
        Ok(contractor_score_card(&tenders, &posts, contractor_id))
    }

    pub fn county_card(&self, county_name: &str) -> Result<ScoreCard, AppError> {
        let tenders = self.records(Collection::Tenders)?;
        let payments = self.records(Collection::Payments)?;
        let posts = self.records(Collection::Posts)?;
        Ok(county_score_card(&tenders, &payments, &posts, county_name))
    }

    /// Per-county tender totals and reputation, in first-seen order.
    pub fn county_summaries(&self) -> Result<Vec<CountySummary>, AppError> {
        let tenders = self.records(Collection::Tenders)?;
        let payments = self.records(Collection::Payments)?;
        let posts = self.records(Collection::Posts)?;

        let mut groups: Vec<(Option<String>, CountySummary)> = Vec::new();
        for project in tenders.iter().map(Project::from_value) {
            match groups.iter_mut().find(|(county, _)| *county == project.county) {
                Some((_, summary)) => {
                    summary.tender_count += 1;
                    summary.total_value += project.value;
                }
                None => groups.push((
                    project.county.clone(),
                    CountySummary {
                        name: project
                            .county
                            .clone()
                            .unwrap_or_else(|| UNKNOWN_COUNTY.to_string()),
                        tender_count: 1,
                        total_value: project.value,
                        reputation_score: None,
                        risk_level: None,
                    },
                )),
            }
        }

        // Only named counties are scored.
        Ok(groups
            .into_iter()
            .map(|(county, mut summary)| {
                if let Some(county) = county {
                    let score = score_county(&tenders, &payments, &posts, &county);
                    summary.reputation_score = Some(score);
                    summary.risk_level = Some(RiskTier::from_score(score));
                }
                summary
            })
            .collect())
    }

    /// Classify one tender and score the parties responsible for it.
    pub fn risk_assessment(&self, tender_id: &str) -> Result<TenderRiskAssessment, AppError> {
        let tenders = self.records(Collection::Tenders)?;
        let payments = self.records(Collection::Payments)?;
        let posts = self.records(Collection::Posts)?;

        let project = tenders
            .iter()
            .map(Project::from_value)
            .find(|project| project.id.as_deref() == Some(tender_id))
            .ok_or(AppError::NotFound("Tender"))?;

        let delayed = DelayedProjects::from_reports(&posts);
        let assessment = classify(&project, &delayed);

        let contractor = project
            .contractor_id
            .as_deref()
            .map(|id| contractor_score_card(&tenders, &posts, id));
        let county = project
            .county
            .as_deref()
            .map(|name| county_score_card(&tenders, &payments, &posts, name));

        let score = contractor
            .iter()
            .chain(county.iter())
            .map(|card| card.score)
            .min()
            .unwrap_or(100);
        let risk_level = RiskTier::from_score(score);

        let mut recommendations: Vec<String> = assessment
            .flags
            .iter()
            .map(|flag| match flag {
                RiskFlag::PriceAnomaly => "Verify pricing against the benchmark value".to_string(),
                RiskFlag::CitizenFlag => {
                    "Schedule a site inspection for the citizen-reported delay".to_string()
                }
            })
            .collect();
        if risk_level == RiskTier::High && contractor.is_some() {
            recommendations.push("Review the contractor for blacklisting".to_string());
        }
        if recommendations.is_empty() {
            recommendations.push("Continue routine monitoring".to_string());
        }

        Ok(TenderRiskAssessment {
            tender_id: tender_id.to_string(),
            title: project.title.clone(),
            is_critical: assessment.is_critical(),
            risk_flag: assessment.risk_flag(),
            flags: assessment.flags,
            price_ratio: project.price_ratio(),
            contractor,
            county,
            score,
            risk_level,
            recommendations,
        })
    }

    pub fn blacklist_contractor(
        &self,
        contractor_id: &str,
        reason: &str,
    ) -> Result<Value, AppError> {
        let mut contractor = self.find(Collection::Contractors, contractor_id, "Contractor")?;
        if let Value::Object(fields) = &mut contractor {
            fields.insert("blacklisted".to_string(), json!(true));
            fields.insert("blacklistReason".to_string(), json!(reason));
            fields.insert("status".to_string(), json!("blacklisted"));
        }
        Ok(contractor)
    }

    pub fn resolve_alert(&self, alert_id: &str, notes: &str) -> Result<Value, AppError> {
        let mut alert = self.find(Collection::FraudAlerts, alert_id, "Alert")?;
        if let Value::Object(fields) = &mut alert {
            fields.insert("status".to_string(), json!("resolved"));
            fields.insert("resolutionNotes".to_string(), json!(notes));
            fields.insert("resolvedAt".to_string(), json!(Utc::now().to_rfc3339()));
        }
        Ok(alert)
    }

    /// Substring search over serialized contractors, alerts, audits, and reports.
    pub fn search(&self, query: &str, kind: Option<&str>) -> Result<Vec<SearchHit>, AppError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(AppError::Validation("q must not be empty".to_string()));
        }

        let mut hits = Vec::new();
        for target in SearchTarget::ALL {
            if kind.is_some_and(|kind| kind != target.filter_key()) {
                continue;
            }
            for record in self.records(target.collection())? {
                if !record.to_string().to_lowercase().contains(&needle) {
                    continue;
                }
                hits.push(target.hit(&record));
                if hits.len() == SEARCH_RESULT_LIMIT {
                    return Ok(hits);
                }
            }
        }
        Ok(hits)
    }

    /// Append an anonymous whistle-blower report and return its tracking number.
    pub fn submit_whistleblower_report(
        &self,
        submission: WhistleblowerSubmission,
    ) -> Result<String, AppError> {
        let description = submission.description.unwrap_or_default();
        if description.trim().is_empty() {
            return Err(AppError::Validation(
                "description must not be empty".to_string(),
            ));
        }

        let ref_number = next_reference_number();
        let entry = json!({
            "ref_number": ref_number,
            "timestamp": Utc::now().to_rfc3339(),
            "project_ref": submission.project_ref,
            "description": description,
            "evidence_url": submission.evidence_url,
            "is_demo_data": true,
        });
        self.source.append(Collection::WhistleblowerLogs, entry)?;

        info!(%ref_number, "whistle-blower report recorded");
        Ok(ref_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountySummary {
    pub name: String,
    pub tender_count: usize,
    pub total_value: f64,
    /// `None` for the group of tenders that name no county.
    pub reputation_score: Option<u8>,
    pub risk_level: Option<RiskTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderRiskAssessment {
    pub tender_id: String,
    pub title: String,
    pub is_critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_flag: Option<String>,
    pub flags: Vec<RiskFlag>,
    pub price_ratio: f64,
    pub contractor: Option<ScoreCard>,
    pub county: Option<ScoreCard>,
    pub score: u8,
    pub risk_level: RiskTier,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhistleblowerSubmission {
    pub project_ref: Option<String>,
    pub description: Option<String>,
    pub evidence_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy)]
enum SearchTarget {
    Contractor,
    FraudAlert,
    Audit,
    Report,
}

impl SearchTarget {
    const ALL: [Self; 4] = [Self::Contractor, Self::FraudAlert, Self::Audit, Self::Report];

    const fn filter_key(self) -> &'static str {
        match self {
            Self::Contractor => "contractor",
            Self::FraudAlert => "fraud",
            Self::Audit => "audit",
            Self::Report => "report",
        }
    }

    const fn collection(self) -> Collection {
        match self {
            Self::Contractor => Collection::Contractors,
            Self::FraudAlert => Collection::FraudAlerts,
            Self::Audit => Collection::Audits,
            Self::Report => Collection::Reports,
        }
    }

    fn hit(self, record: &Value) -> SearchHit {
        let id = record_id(record).unwrap_or_default();
        let (kind, title, description, url) = match self {
            Self::Contractor => (
                "contractor",
                text_field(record, "name").to_string(),
                format!(
                    "{} - {}",
                    text_field(record, "category"),
                    text_field(record, "region")
                ),
                format!("/registry/contractors/{id}"),
            ),
            Self::FraudAlert => (
                "fraud_alert",
                text_field(record, "title").to_string(),
                truncated(text_field(record, "description")),
                format!("/fraud/alerts/{id}"),
            ),
            Self::Audit => (
                "audit",
                text_field(record, "title").to_string(),
                truncated(text_field(record, "description")),
                format!("/audit/audits/{id}"),
            ),
            Self::Report => (
                "report",
                text_field(record, "title").to_string(),
                truncated(text_field(record, "description")),
                format!("/reports/{id}"),
            ),
        };

        SearchHit {
            id,
            kind,
            title,
            description,
            url,
        }
    }
}

fn truncated(text: &str) -> String {
    text.chars().take(SEARCH_DESCRIPTION_CHARS).collect()
}
