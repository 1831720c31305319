use serde_json::Value;

use super::normalizer::{as_record, coerce_amount, project_title, Record};

pub(crate) const PRICE_ANOMALY_RATIO: f64 = 1.5;
const DELAY_REPORTED: &str = "delay_reported";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectStatus {
    Stalled,
    Completed,
    Ongoing,
    Other(String),
    Unknown,
}

impl ProjectStatus {
    fn from_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("Stalled") => Self::Stalled,
            Some("Completed") => Self::Completed,
            Some("Ongoing") => Self::Ongoing,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Other,
}

impl PaymentStatus {
    fn from_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("Paid") => Self::Paid,
            Some("Pending") => Self::Pending,
            _ => Self::Other,
        }
    }
}

/// Typed, normalized view over a tender record.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: Option<String>,
    pub title: String,
    pub county: Option<String>,
    pub category: Option<String>,
    pub contractor_id: Option<String>,
    pub status: ProjectStatus,
    pub value: f64,
    pub benchmark_value: f64,
}

impl Project {
    pub fn from_value(value: &Value) -> Self {
        match as_record(value) {
            Some(record) => Self::from_record(record),
            None => Self::from_record(&Record::new()),
        }
    }

    pub fn from_record(record: &Record) -> Self {
        let value = record.get("value").map(coerce_amount).unwrap_or(0.0);
        let benchmark_value = match record.get("benchmark_value").map(coerce_amount) {
            Some(benchmark) if benchmark > 0.0 => benchmark,
            _ => 1.0,
        };

        Self {
            id: identifier(record.get("id")),
            title: project_title(record),
            county: text(record.get("county")),
            category: text(record.get("category")),
            contractor_id: identifier(record.get("contractor_id")),
            status: ProjectStatus::from_field(record.get("status")),
            value,
            benchmark_value,
        }
    }

    pub fn price_ratio(&self) -> f64 {
        self.value / self.benchmark_value
    }

    pub fn has_price_anomaly(&self) -> bool {
        self.price_ratio() > PRICE_ANOMALY_RATIO
    }

    pub fn is_stalled(&self) -> bool {
        self.status == ProjectStatus::Stalled
    }
}

/// Typed view over a payment record.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: Option<String>,
    pub entity_name: String,
    pub status: PaymentStatus,
    pub days_outstanding: u64,
}

impl Payment {
    pub fn from_value(value: &Value) -> Self {
        let empty = Record::new();
        let record = as_record(value).unwrap_or(&empty);
        Self {
            id: identifier(record.get("id")),
            entity_name: text(record.get("entity_name")).unwrap_or_default(),
            status: PaymentStatus::from_field(record.get("status")),
            days_outstanding: record.get("days_outstanding").map(days).unwrap_or(0),
        }
    }

    /// Case-insensitive containment of the county name in the paying entity's name.
    pub fn belongs_to_county(&self, county_name: &str) -> bool {
        self.entity_name
            .to_lowercase()
            .contains(&county_name.to_lowercase())
    }
}

/// Typed view over a citizen post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitizenReport {
    pub reference_id: Option<String>,
    pub status: Option<String>,
}

impl CitizenReport {
    pub fn from_value(value: &Value) -> Self {
        let empty = Record::new();
        let record = as_record(value).unwrap_or(&empty);
        Self {
            reference_id: identifier(record.get("referenceId")).filter(|id| !id.is_empty()),
            status: text(record.get("status")),
        }
    }

    pub fn reports_delay(&self) -> bool {
        self.status.as_deref() == Some(DELAY_REPORTED)
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// The record's `id`, with numeric ids rendered as strings.
pub fn record_id(record: &Value) -> Option<String> {
    identifier(record.get("id"))
}

/// Identifiers are strings in the demo data; numeric ids compare by their decimal form.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

fn days(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|days| *days > 0.0).map(|days| days as u64))
            .unwrap_or(0),
        Value::String(raw) => raw.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_defaults_are_total() {
        let project = Project::from_value(&json!("not a record"));
        assert_eq!(project.id, None);
        assert_eq!(project.status, ProjectStatus::Unknown);
        assert_eq!(project.value, 0.0);
        assert_eq!(project.benchmark_value, 1.0);
        assert!(!project.has_price_anomaly());
    }

    #[test]
    fn zero_benchmark_falls_back_to_one() {
        let project = Project::from_value(&json!({ "value": 3, "benchmark_value": "0" }));
        assert_eq!(project.benchmark_value, 1.0);
        assert!(project.has_price_anomaly());
    }

    #[test]
    fn ratio_exactly_at_threshold_is_not_anomalous() {
        let project = Project::from_value(&json!({ "value": 150, "benchmark_value": 100 }));
        assert!(!project.has_price_anomaly());
    }

    #[test]
    fn payment_county_match_is_case_insensitive_substring() {
        let payment = Payment::from_value(&json!({
            "entity_name": "NAKURU County Government",
            "status": "Paid",
            "days_outstanding": "45"
        }));
        assert!(payment.belongs_to_county("Nakuru"));
        assert!(!payment.belongs_to_county("Mombasa"));
        assert_eq!(payment.days_outstanding, 45);
        assert_eq!(payment.status, PaymentStatus::Paid);
    }

    #[test]
    fn delay_status_is_matched_exactly() {
        let flagged = CitizenReport::from_value(&json!({
            "referenceId": "T1",
            "status": "delay_reported"
        }));
        let other = CitizenReport::from_value(&json!({
            "referenceId": "T1",
            "status": "Delay_Reported"
        }));
        assert!(flagged.reports_delay());
        assert!(!other.reports_delay());
    }
}
