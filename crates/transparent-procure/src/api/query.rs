use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::reputation::record_id;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// Validated page/limit pair (`page >= 1`, `1 <= limit <= 100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn from_parts(page: Option<u32>, limit: Option<u32>) -> Result<Self, AppError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }

        Ok(Self {
            page: page as usize,
            limit: limit as usize,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistryQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    pub severity: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub period: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub ward_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardFilter {
    pub ward_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub(crate) fn text_field<'a>(record: &'a Value, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or_default()
}

/// Keep records whose `field` equals `expected` ignoring case; `None` keeps everything.
pub(crate) fn retain_matching(records: &mut Vec<Value>, field: &str, expected: Option<&str>) {
    if let Some(expected) = expected {
        let expected = expected.to_lowercase();
        records.retain(|record| text_field(record, field).to_lowercase() == expected);
    }
}

pub(crate) fn find_by_id(records: Vec<Value>, id: &str) -> Option<Value> {
    records
        .into_iter()
        .find(|record| record_id(record).as_deref() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_defaults_apply() {
        let request = PageRequest::from_parts(None, None).expect("defaults are valid");
        assert_eq!(request, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(PageRequest::from_parts(Some(0), None).is_err());
        assert!(PageRequest::from_parts(None, Some(0)).is_err());
        assert!(PageRequest::from_parts(None, Some(101)).is_err());
        assert!(PageRequest::from_parts(Some(3), Some(100)).is_ok());
    }

    #[test]
    fn numeric_ids_are_found_by_their_text() {
        let records = vec![json!({ "id": 7, "name": "Numeric" }), json!({ "id": "8" })];
        assert_eq!(
            find_by_id(records.clone(), "7"),
            Some(json!({ "id": 7, "name": "Numeric" }))
        );
        assert_eq!(find_by_id(records, "8"), Some(json!({ "id": "8" })));
    }

    #[test]
    fn retain_matching_ignores_case() {
        let mut alerts = vec![
            json!({ "id": "a", "severity": "High" }),
            json!({ "id": "b", "severity": "low" }),
            json!({ "id": "c" }),
        ];
        retain_matching(&mut alerts, "severity", Some("HIGH"));
        assert_eq!(alerts, vec![json!({ "id": "a", "severity": "High" })]);
    }
}
