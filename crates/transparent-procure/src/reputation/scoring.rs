use serde::Serialize;
use serde_json::Value;

use super::classifier::DelayedProjects;
use super::entities::{Payment, PaymentStatus, Project};
use super::tier::RiskTier;

const BASELINE_SCORE: i64 = 100;
const NO_TRACK_RECORD_SCORE: u8 = 50;
const UNTRACKED_COUNTY_SCORE: u8 = 100;

const ON_TIME_MAX_DAYS: u64 = 60;
const CHRONIC_MIN_DAYS: u64 = 180;
const ON_TIME_THRESHOLD_PCT: f64 = 50.0;
const LATE_PAYMENT_PENALTY: u32 = 15;
const CHRONIC_PENDING_PENALTY: u32 = 10;

/// Per-project deductions applied by one scoring rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenaltyTable {
    pub stalled: u32,
    pub price_anomaly: u32,
    pub citizen_flag: u32,
}

/// Contractors carry the heavier stalled-project penalty.
pub const CONTRACTOR_PENALTIES: PenaltyTable = PenaltyTable {
    stalled: 25,
    price_anomaly: 20,
    citizen_flag: 15,
};

pub const COUNTY_PENALTIES: PenaltyTable = PenaltyTable {
    stalled: 20,
    price_anomaly: 15,
    citizen_flag: 10,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSubject {
    Contractor,
    County,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionReason {
    StalledProject,
    PriceAnomaly,
    CitizenFlag,
    LatePayments,
    ChronicPending,
}

impl DeductionReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StalledProject => "Stalled project",
            Self::PriceAnomaly => "Price anomaly",
            Self::CitizenFlag => "Citizen flag",
            Self::LatePayments => "Late payments",
            Self::ChronicPending => "Chronic pending payment",
        }
    }
}

/// One itemized penalty, so a score can be audited line by line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deduction {
    pub reason: DeductionReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub points: u32,
    pub notes: String,
}

/// Payment punctuality for the invoices matched to a county.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReliability {
    pub matched: usize,
    pub paid_on_time: usize,
    pub chronic_pending: usize,
    pub on_time_percentage: f64,
}

impl PaymentReliability {
    fn measure(payments: &[Payment]) -> Option<Self> {
        if payments.is_empty() {
            return None;
        }

        let paid_on_time = payments
            .iter()
            .filter(|payment| {
                payment.status == PaymentStatus::Paid
                    && payment.days_outstanding <= ON_TIME_MAX_DAYS
            })
            .count();
        let chronic_pending = payments.iter().filter(|payment| is_chronic(payment)).count();

        Some(Self {
            matched: payments.len(),
            paid_on_time,
            chronic_pending,
            on_time_percentage: paid_on_time as f64 / payments.len() as f64 * 100.0,
        })
    }
}

fn is_chronic(payment: &Payment) -> bool {
    payment.status == PaymentStatus::Pending && payment.days_outstanding > CHRONIC_MIN_DAYS
}

/// Score together with the deductions that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub subject: ScoreSubject,
    pub name: String,
    pub projects_considered: usize,
    pub deductions: Vec<Deduction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<PaymentReliability>,
    pub score: u8,
    pub tier: RiskTier,
}

impl ScoreCard {
    fn settled(
        subject: ScoreSubject,
        name: &str,
        projects_considered: usize,
        deductions: Vec<Deduction>,
        payments: Option<PaymentReliability>,
    ) -> Self {
        let deducted: i64 = deductions.iter().map(|item| i64::from(item.points)).sum();
        let score = (BASELINE_SCORE - deducted).clamp(0, 100) as u8;
        Self {
            subject,
            name: name.to_string(),
            projects_considered,
            deductions,
            payments,
            score,
            tier: RiskTier::from_score(score),
        }
    }

    fn fixed(subject: ScoreSubject, name: &str, score: u8) -> Self {
        Self {
            subject,
            name: name.to_string(),
            projects_considered: 0,
            deductions: Vec::new(),
            payments: None,
            score,
            tier: RiskTier::from_score(score),
        }
    }

    pub fn total_deducted(&self) -> u32 {
        self.deductions.iter().map(|item| item.points).sum()
    }
}

fn project_deductions(
    projects: &[Project],
    delayed: &DelayedProjects,
    table: &PenaltyTable,
) -> Vec<Deduction> {
    let mut deductions = Vec::new();

    for project in projects {
        if project.is_stalled() {
            deductions.push(Deduction {
                reason: DeductionReason::StalledProject,
                record_id: project.id.clone(),
                points: table.stalled,
                notes: format!("'{}' is stalled", project.title),
            });
        }
        if project.has_price_anomaly() {
            deductions.push(Deduction {
                reason: DeductionReason::PriceAnomaly,
                record_id: project.id.clone(),
                points: table.price_anomaly,
                notes: format!(
                    "value is {:.2}x the benchmark for '{}'",
                    project.price_ratio(),
                    project.title
                ),
            });
        }
        if delayed.contains(project.id.as_deref()) {
            deductions.push(Deduction {
                reason: DeductionReason::CitizenFlag,
                record_id: project.id.clone(),
                points: table.citizen_flag,
                notes: format!("citizens reported a delay on '{}'", project.title),
            });
        }
    }

    deductions
}

/// Trust score card for a contractor; no assigned tenders yields the neutral 50.
pub fn contractor_score_card(tenders: &[Value], posts: &[Value], contractor_id: &str) -> ScoreCard {
    let projects: Vec<Project> = tenders
        .iter()
        .map(Project::from_value)
        .filter(|project| project.contractor_id.as_deref() == Some(contractor_id))
        .collect();

    if projects.is_empty() {
        return ScoreCard::fixed(
            ScoreSubject::Contractor,
            contractor_id,
            NO_TRACK_RECORD_SCORE,
        );
    }

    let delayed = DelayedProjects::from_reports(posts);
    let deductions = project_deductions(&projects, &delayed, &CONTRACTOR_PENALTIES);
    ScoreCard::settled(
        ScoreSubject::Contractor,
        contractor_id,
        projects.len(),
        deductions,
        None,
    )
}

/// Reputation score card for a county; a county with no tenders is treated as clean.
pub fn county_score_card(
    tenders: &[Value],
    payments: &[Value],
    posts: &[Value],
    county_name: &str,
) -> ScoreCard {
    let projects: Vec<Project> = tenders
        .iter()
        .map(Project::from_value)
        .filter(|project| project.county.as_deref() == Some(county_name))
        .collect();

    if projects.is_empty() {
        return ScoreCard::fixed(ScoreSubject::County, county_name, UNTRACKED_COUNTY_SCORE);
    }

    let delayed = DelayedProjects::from_reports(posts);
    let mut deductions = project_deductions(&projects, &delayed, &COUNTY_PENALTIES);

    let matched: Vec<Payment> = payments
        .iter()
        .map(Payment::from_value)
        .filter(|payment| payment.belongs_to_county(county_name))
        .collect();
    let reliability = PaymentReliability::measure(&matched);

    if let Some(stats) = &reliability {
        if stats.on_time_percentage < ON_TIME_THRESHOLD_PCT {
            deductions.push(Deduction {
                reason: DeductionReason::LatePayments,
                record_id: None,
                points: LATE_PAYMENT_PENALTY,
                notes: format!(
                    "{:.0}% of {} invoices paid within {} days",
                    stats.on_time_percentage, stats.matched, ON_TIME_MAX_DAYS
                ),
            });
        }

        for payment in matched.iter().filter(|payment| is_chronic(payment)) {
            deductions.push(Deduction {
                reason: DeductionReason::ChronicPending,
                record_id: payment.id.clone(),
                points: CHRONIC_PENDING_PENALTY,
                notes: format!(
                    "{} pending for {} days",
                    payment.entity_name, payment.days_outstanding
                ),
            });
        }
    }

    ScoreCard::settled(
        ScoreSubject::County,
        county_name,
        projects.len(),
        deductions,
        reliability,
    )
}

pub fn score_contractor(tenders: &[Value], posts: &[Value], contractor_id: &str) -> u8 {
    contractor_score_card(tenders, posts, contractor_id).score
}

pub fn score_county(
    tenders: &[Value],
    payments: &[Value],
    posts: &[Value],
    county_name: &str,
) -> u8 {
    county_score_card(tenders, payments, posts, county_name).score
}
