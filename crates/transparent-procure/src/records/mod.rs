//! Access to the JSON collections backing the API.
//!
//! Collections are either standalone files in the data directory (`tender.json`,
//! `posts.json`, ...) or named sections of the shared `mock_data.json` document. Every
//! load returns a fresh value; nothing here caches or mutates records in place.

mod json_store;
mod memory;

pub use json_store::JsonFileStore;
pub use memory::InMemoryStore;

use serde_json::Value;

/// Named collection served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Tenders,
    Posts,
    Payments,
    Contractors,
    WhistleblowerLogs,
    FraudAlerts,
    Audits,
    Reports,
    FeedPosts,
    DashboardStats,
    ContractorScores,
    PriceAnomalies,
    WardFeed,
    Wards,
    Counties,
}

/// Where a collection is physically stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionLocation {
    File(&'static str),
    MockSection(&'static str),
}

/// File holding the mock sections.
pub const MOCK_DATA_FILE: &str = "mock_data.json";

impl Collection {
    pub const fn location(self) -> CollectionLocation {
        match self {
            Self::Tenders => CollectionLocation::File("tender.json"),
            Self::Posts => CollectionLocation::File("posts.json"),
            Self::Payments => CollectionLocation::File("payment.json"),
            Self::Contractors => CollectionLocation::File("contractors.json"),
            Self::WhistleblowerLogs => CollectionLocation::File("whistle_blower_logs.json"),
            Self::FraudAlerts => CollectionLocation::MockSection("fraudAlerts"),
            Self::Audits => CollectionLocation::MockSection("audits"),
            Self::Reports => CollectionLocation::MockSection("reports"),
            Self::FeedPosts => CollectionLocation::MockSection("feedPosts"),
            Self::DashboardStats => CollectionLocation::MockSection("dashboardStats"),
            Self::ContractorScores => CollectionLocation::MockSection("contractorScores"),
            Self::PriceAnomalies => CollectionLocation::MockSection("priceAnomalies"),
            Self::WardFeed => CollectionLocation::MockSection("wardFeed"),
            Self::Wards => CollectionLocation::MockSection("wards"),
            Self::Counties => CollectionLocation::MockSection("counties"),
        }
    }

    pub const fn label(self) -> &'static str {
        match self.location() {
            CollectionLocation::File(name) | CollectionLocation::MockSection(name) => name,
        }
    }
}

/// Storage abstraction so the API can be exercised without touching the filesystem.
pub trait RecordSource: Send + Sync {
    /// Load a collection. Missing or unreadable JSON yields an empty array.
    fn load(&self, collection: Collection) -> Result<Value, StoreError>;

    /// Append a record to an array-backed collection.
    fn append(&self, collection: Collection, record: Value) -> Result<(), StoreError>;

    /// Load a collection as a list of records; non-array documents yield no records.
    fn records(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        match self.load(collection)? {
            Value::Array(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }
}

/// Error enumeration for record storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {collection}: {source}")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} is not a JSON array of records: {detail}")]
    Decode { path: String, detail: String },
    #[error("collection {0} cannot be appended to")]
    ReadOnly(&'static str),
}
