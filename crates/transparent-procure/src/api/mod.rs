//! HTTP surface: collection endpoints, reputation views, and the response envelope.

pub mod cors;
pub mod envelope;
pub mod query;
mod routes;
pub mod service;

#[cfg(test)]
mod tests;

pub use cors::{with_cors, CorsPolicy};
pub use routes::api_router;
pub use service::{
    CountySummary, ProcurementService, SearchHit, TenderRiskAssessment, WhistleblowerSubmission,
};
