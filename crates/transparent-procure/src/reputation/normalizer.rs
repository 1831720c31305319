use serde_json::{Map, Value};

/// Raw JSON record as loaded from a collection.
pub type Record = Map<String, Value>;

pub(crate) const UNTITLED_PROJECT: &str = "Untitled Project";
const DEFAULT_BENCHMARK: f64 = 1.0;

/// Coerce a currency-like value into a non-negative float.
///
/// Numbers are cast; strings keep only ASCII digits and `.` before parsing, so
/// `"KES 1,600,000"` becomes `1600000.0`. Anything unparseable, and every other JSON
/// type, becomes `0.0`.
pub fn coerce_amount(value: &Value) -> f64 {
    let amount = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(raw) => {
            let digits: String = raw
                .chars()
                .filter(|ch| ch.is_ascii_digit() || *ch == '.')
                .collect();
            digits.parse::<f64>().unwrap_or(0.0)
        }
        _ => 0.0,
    };

    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Return a copy of `record` with canonical numeric `value` and `benchmark_value`.
///
/// `benchmark_value` is only introduced (or lifted from zero to `1.0`) on records that
/// carry a `value`, so posts and payments pass through untouched.
pub fn normalize(record: &Record) -> Record {
    let mut normalized = record.clone();

    for field in ["value", "benchmark_value"] {
        if let Some(raw) = normalized.get_mut(field) {
            *raw = Value::from(coerce_amount(raw));
        }
    }

    let benchmark_missing = normalized
        .get("benchmark_value")
        .and_then(Value::as_f64)
        .map_or(true, |benchmark| benchmark == 0.0);
    if normalized.contains_key("value") && benchmark_missing {
        normalized.insert("benchmark_value".to_string(), Value::from(DEFAULT_BENCHMARK));
    }

    normalized
}

/// [`normalize`] plus the project title fallback (`title`, then `name`).
pub fn normalize_project(record: &Record) -> Record {
    let mut normalized = normalize(record);
    let title = project_title(&normalized);
    normalized.insert("title".to_string(), Value::String(title));
    normalized
}

pub(crate) fn project_title(record: &Record) -> String {
    ["title", "name"]
        .iter()
        .filter_map(|field| record.get(*field).and_then(Value::as_str))
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(UNTITLED_PROJECT)
        .to_string()
}

/// Treat any JSON value as a record; non-objects behave like an empty mapping.
pub(crate) fn as_record(value: &Value) -> Option<&Record> {
    value.as_object()
}
