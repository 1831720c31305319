//! Rule-based risk classification and reputation scoring.
//!
//! Raw tender, payment, and citizen-post records are normalized into typed views, each
//! tender is checked for price anomalies and citizen-reported delays, and the results are
//! folded into a 0-100 score per contractor or county. Everything here is pure: the
//! functions read the slices they are handed and never fail on malformed records.

mod classifier;
mod entities;
mod normalizer;
mod scoring;
mod tier;

#[cfg(test)]
mod tests;

pub use classifier::{
    annotate, annotate_tenders, classify, DelayedProjects, RiskAssessment, RiskFlag,
};
pub use entities::{
    record_id, CitizenReport, Payment, PaymentStatus, Project, ProjectStatus,
};
pub use normalizer::{coerce_amount, normalize, normalize_project, Record};
pub use scoring::{
    contractor_score_card, county_score_card, score_contractor, score_county, Deduction,
    DeductionReason, PaymentReliability, PenaltyTable, ScoreCard, ScoreSubject,
    CONTRACTOR_PENALTIES, COUNTY_PENALTIES,
};
pub use tier::RiskTier;
