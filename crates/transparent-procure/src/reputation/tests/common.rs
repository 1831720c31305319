use serde_json::{json, Value};

pub(super) fn tender(id: &str, status: &str, value: Value, benchmark: Value) -> Value {
    json!({
        "id": id,
        "title": format!("Project {id}"),
        "county": "Nakuru",
        "category": "Roads",
        "status": status,
        "value": value,
        "benchmark_value": benchmark,
    })
}

pub(super) fn contractor_tender(
    id: &str,
    contractor_id: &str,
    status: &str,
    value: f64,
    benchmark: f64,
) -> Value {
    let mut record = tender(id, status, json!(value), json!(benchmark));
    record["contractor_id"] = json!(contractor_id);
    record
}

pub(super) fn county_tender(id: &str, county: &str, status: &str, value: f64) -> Value {
    let mut record = tender(id, status, json!(value), json!(1_000_000));
    record["county"] = json!(county);
    record
}

pub(super) fn delay_report(reference_id: &str) -> Value {
    json!({
        "id": format!("post-{reference_id}"),
        "referenceId": reference_id,
        "status": "delay_reported",
        "wardId": "Biashara",
    })
}

pub(super) fn payment(entity_name: &str, status: &str, days_outstanding: u64) -> Value {
    json!({
        "entity_name": entity_name,
        "status": status,
        "days_outstanding": days_outstanding,
    })
}
