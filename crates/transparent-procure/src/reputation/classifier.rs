use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use super::entities::{CitizenReport, Project};
use super::normalizer::{normalize_project, Record};

/// Named risk signal raised against a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskFlag {
    #[serde(rename = "Price Anomaly")]
    PriceAnomaly,
    #[serde(rename = "Citizen Flag")]
    CitizenFlag,
}

impl RiskFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAnomaly => "Price Anomaly",
            Self::CitizenFlag => "Citizen Flag",
        }
    }
}

/// Project ids that citizens have reported as delayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelayedProjects {
    references: BTreeSet<String>,
}

impl DelayedProjects {
    pub fn from_reports(posts: &[Value]) -> Self {
        let references = posts
            .iter()
            .map(CitizenReport::from_value)
            .filter(CitizenReport::reports_delay)
            .filter_map(|report| report.reference_id)
            .collect();
        Self { references }
    }

    pub fn contains(&self, project_id: Option<&str>) -> bool {
        project_id.is_some_and(|id| self.references.contains(id))
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DelayedProjects {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            references: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Flags raised for one project, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub flags: Vec<RiskFlag>,
}

impl RiskAssessment {
    pub fn is_critical(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Combined label such as `"Price Anomaly + Citizen Flag"`; `None` when clean.
    pub fn risk_flag(&self) -> Option<String> {
        if self.flags.is_empty() {
            return None;
        }
        let labels: Vec<&str> = self.flags.iter().map(|flag| flag.label()).collect();
        Some(labels.join(" + "))
    }
}

pub fn classify(project: &Project, delayed: &DelayedProjects) -> RiskAssessment {
    let mut flags = Vec::with_capacity(2);
    if project.has_price_anomaly() {
        flags.push(RiskFlag::PriceAnomaly);
    }
    if delayed.contains(project.id.as_deref()) {
        flags.push(RiskFlag::CitizenFlag);
    }
    RiskAssessment { flags }
}

/// Normalize a tender record and write `is_critical` / `risk_flag` onto the copy.
///
/// A record that is no longer critical loses any `risk_flag` it carried.
pub fn annotate(record: &Record, delayed: &DelayedProjects) -> Record {
    let mut annotated = normalize_project(record);
    let assessment = classify(&Project::from_record(&annotated), delayed);

    annotated.insert(
        "is_critical".to_string(),
        Value::Bool(assessment.is_critical()),
    );
    match assessment.risk_flag() {
        Some(flag) => {
            annotated.insert("risk_flag".to_string(), Value::String(flag));
        }
        None => {
            annotated.remove("risk_flag");
        }
    }
    annotated
}

/// Annotate every tender against the delays reported in `posts`.
pub fn annotate_tenders(tenders: &[Value], posts: &[Value]) -> Vec<Value> {
    let delayed = DelayedProjects::from_reports(posts);
    let empty = Record::new();
    tenders
        .iter()
        .map(|tender| {
            let record = tender.as_object().unwrap_or(&empty);
            Value::Object(annotate(record, &delayed))
        })
        .collect()
}
