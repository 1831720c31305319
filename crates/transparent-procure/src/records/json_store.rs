use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::{debug, warn};

use super::{Collection, CollectionLocation, RecordSource, StoreError, MOCK_DATA_FILE};

/// Record source reading JSON documents from a data directory on every call.
#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_document(&self, file_name: &str) -> Result<Value, StoreError> {
        let path = self.data_dir.join(file_name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "collection file missing; serving empty list");
                return Ok(Value::Array(Vec::new()));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "collection file is not valid JSON; serving empty list");
                Ok(Value::Array(Vec::new()))
            }
        }
    }

    /// Strict read used before rewriting a log: only a missing file counts as empty.
    fn read_log(&self, file_name: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.data_dir.join(file_name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(_) => Err(StoreError::Decode {
                path: path.display().to_string(),
                detail: "top-level value is not an array".to_string(),
            }),
            Err(err) => Err(StoreError::Decode {
                path: path.display().to_string(),
                detail: err.to_string(),
            }),
        }
    }
}

impl RecordSource for JsonFileStore {
    fn load(&self, collection: Collection) -> Result<Value, StoreError> {
        match collection.location() {
            CollectionLocation::File(file_name) => self.read_document(file_name),
            CollectionLocation::MockSection(key) => {
                let document = self.read_document(MOCK_DATA_FILE)?;
                Ok(document
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new())))
            }
        }
    }

    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        let file_name = match collection.location() {
            CollectionLocation::File(file_name) => file_name,
            CollectionLocation::MockSection(key) => return Err(StoreError::ReadOnly(key)),
        };

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut records = self.read_log(file_name)?;
        records.push(record);

        let encoded =
            serde_json::to_string_pretty(&records).map_err(|source| StoreError::Encode {
                collection: collection.label(),
                source,
            })?;

        let path = self.data_dir.join(file_name);
        let staging = self.data_dir.join(format!(".{file_name}.tmp"));
        fs::create_dir_all(&self.data_dir)
            .and_then(|_| fs::write(&staging, encoded))
            .and_then(|_| fs::rename(&staging, &path))
            .map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scratch_dir() -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let dir = std::env::temp_dir().join(format!(
            "transparent-procure-store-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("scratch dir created");
        dir
    }

    #[test]
    fn missing_file_loads_as_empty_list() {
        let store = JsonFileStore::new(scratch_dir());
        let tenders = store.records(Collection::Tenders).expect("load succeeds");
        assert!(tenders.is_empty());
    }

    #[test]
    fn invalid_json_loads_as_empty_list() {
        let dir = scratch_dir();
        fs::write(dir.join("posts.json"), "{ not json").expect("fixture written");
        let store = JsonFileStore::new(&dir);
        assert_eq!(
            store.load(Collection::Posts).expect("load succeeds"),
            json!([])
        );
    }

    #[test]
    fn mock_sections_are_read_from_shared_document() {
        let dir = scratch_dir();
        fs::write(
            dir.join(MOCK_DATA_FILE),
            json!({
                "audits": [{ "id": "aud_001" }],
                "dashboardStats": { "totalTenders": 12 }
            })
            .to_string(),
        )
        .expect("fixture written");
        let store = JsonFileStore::new(&dir);

        let audits = store.records(Collection::Audits).expect("audits load");
        assert_eq!(audits, vec![json!({ "id": "aud_001" })]);

        let stats = store.load(Collection::DashboardStats).expect("stats load");
        assert_eq!(stats["totalTenders"], json!(12));

        let reports = store.records(Collection::Reports).expect("reports load");
        assert!(reports.is_empty());
    }

    #[test]
    fn append_extends_existing_log() {
        let dir = scratch_dir();
        let store = JsonFileStore::new(&dir);
        store
            .append(Collection::WhistleblowerLogs, json!({ "ref_number": "TP-1" }))
            .expect("first append");
        store
            .append(Collection::WhistleblowerLogs, json!({ "ref_number": "TP-2" }))
            .expect("second append");

        let logs = store
            .records(Collection::WhistleblowerLogs)
            .expect("logs load");
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1]["ref_number"], json!("TP-2"));
    }

    #[test]
    fn append_refuses_to_overwrite_corrupt_log() {
        let dir = scratch_dir();
        let log = dir.join("whistle_blower_logs.json");
        let corrupt = r#"[{"ref_number":"TP-OLD1"},{"ref_number":"TP-OLD2"},"#;
        fs::write(&log, corrupt).expect("fixture written");
        let store = JsonFileStore::new(&dir);

        let err = store
            .append(Collection::WhistleblowerLogs, json!({ "ref_number": "TP-NEW" }))
            .expect_err("corrupt log is not rewritten");
        assert!(matches!(err, StoreError::Decode { .. }));
        assert_eq!(fs::read_to_string(&log).expect("log readable"), corrupt);
    }

    #[test]
    fn append_refuses_non_array_log() {
        let dir = scratch_dir();
        let log = dir.join("whistle_blower_logs.json");
        fs::write(&log, r#"{"ref_number":"TP-OLD1"}"#).expect("fixture written");
        let store = JsonFileStore::new(&dir);

        let err = store
            .append(Collection::WhistleblowerLogs, json!({ "ref_number": "TP-NEW" }))
            .expect_err("object log is not rewritten");
        assert!(matches!(err, StoreError::Decode { .. }));
        assert_eq!(
            fs::read_to_string(&log).expect("log readable"),
            r#"{"ref_number":"TP-OLD1"}"#
        );
        assert!(!dir.join(".whistle_blower_logs.json.tmp").exists());
    }

    #[test]
    fn append_rejects_mock_sections() {
        let store = JsonFileStore::new(scratch_dir());
        let err = store
            .append(Collection::FraudAlerts, json!({}))
            .expect_err("mock sections are read-only");
        assert!(matches!(err, StoreError::ReadOnly("fraudAlerts")));
    }
}
