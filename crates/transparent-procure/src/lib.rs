//! Procurement transparency backend: JSON-backed records, risk classification, and
//! contractor/county reputation scoring.

pub mod api;
pub mod config;
pub mod error;
pub mod records;
pub mod reputation;
pub mod telemetry;
