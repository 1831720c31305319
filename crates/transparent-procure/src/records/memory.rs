use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{Collection, RecordSource, StoreError};

/// Record source holding collections in memory, used by demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper replacing the contents of one collection.
    pub fn with(self, collection: Collection, value: Value) -> Self {
        self.replace(collection, value);
        self
    }

    pub fn replace(&self, collection: Collection, value: Value) {
        let mut guard = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.insert(collection, value);
    }
}

impl RecordSource for InMemoryStore {
    fn load(&self, collection: Collection) -> Result<Value, StoreError> {
        let guard = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(guard
            .get(&collection)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())))
    }

    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError> {
        let mut guard = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = guard
            .entry(collection)
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(items) => items.push(record),
            other => *other = Value::Array(vec![record]),
        }
        Ok(())
    }
}
