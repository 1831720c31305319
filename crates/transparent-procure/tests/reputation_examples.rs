use serde_json::{json, Value};
use transparent_procure::reputation::{
    annotate_tenders, contractor_score_card, county_score_card, score_contractor, DeductionReason,
    RiskTier,
};

fn nakuru_payments() -> Vec<Value> {
    vec![
        json!({ "id": "N1", "entity_name": "Nakuru County", "status": "Paid", "days_outstanding": 30 }),
        json!({ "id": "N2", "entity_name": "Nakuru County", "status": "Paid", "days_outstanding": 95 }),
        json!({ "id": "N3", "entity_name": "Nakuru County", "status": "Pending", "days_outstanding": 90 }),
        json!({ "id": "N4", "entity_name": "Nakuru County", "status": "Pending", "days_outstanding": 200 }),
        json!({ "id": "N5", "entity_name": "Nakuru County", "status": "Pending", "days_outstanding": 365 }),
    ]
}

#[test]
fn formatted_value_above_benchmark_is_flagged() {
    let tenders = vec![json!({
        "id": "T1",
        "value": "1,600,000",
        "benchmark_value": 1_000_000,
        "status": "Ongoing"
    })];

    let annotated = annotate_tenders(&tenders, &[]);
    assert_eq!(annotated[0]["value"], 1_600_000.0);
    assert_eq!(annotated[0]["is_critical"], true);
    assert_eq!(annotated[0]["risk_flag"], "Price Anomaly");
}

#[test]
fn contractor_with_stalled_and_overpriced_work_is_medium() {
    let tenders = vec![
        json!({ "id": "A", "contractor_id": "C1", "status": "Stalled", "value": 100, "benchmark_value": 100 }),
        json!({ "id": "B", "contractor_id": "C1", "status": "Completed", "value": 200, "benchmark_value": 100 }),
    ];

    let card = contractor_score_card(&tenders, &[], "C1");
    assert_eq!(card.score, 55);
    assert_eq!(card.tier, RiskTier::Medium);
    let reasons: Vec<DeductionReason> = card.deductions.iter().map(|d| d.reason).collect();
    assert_eq!(
        reasons,
        vec![DeductionReason::StalledProject, DeductionReason::PriceAnomaly]
    );
}

#[test]
fn county_payment_history_drives_reputation() {
    let tenders = vec![json!({
        "id": "NK1",
        "county": "Nakuru",
        "status": "Completed",
        "value": 500,
        "benchmark_value": 500
    })];

    let card = county_score_card(&tenders, &nakuru_payments(), &[], "Nakuru");
    assert_eq!(card.score, 65);
    assert_eq!(card.tier, RiskTier::Medium);

    let payments = card.payments.expect("payments matched");
    assert_eq!(payments.matched, 5);
    assert_eq!(payments.paid_on_time, 1);
    assert_eq!(payments.chronic_pending, 2);
    assert!((payments.on_time_percentage - 20.0).abs() < 1e-9);
}

#[test]
fn repeated_offences_clamp_to_zero() {
    let tenders: Vec<Value> = (0..3)
        .map(|index| {
            json!({
                "id": format!("X{index}"),
                "contractor_id": "C9",
                "status": "Stalled",
                "value": 300,
                "benchmark_value": 100
            })
        })
        .collect();
    let posts: Vec<Value> = (0..3)
        .map(|index| json!({ "referenceId": format!("X{index}"), "status": "delay_reported" }))
        .collect();

    assert_eq!(score_contractor(&tenders, &posts, "C9"), 0);
    let card = contractor_score_card(&tenders, &posts, "C9");
    assert_eq!(card.total_deducted(), 180);
    assert_eq!(card.tier, RiskTier::High);
}
