use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::refunds::domain::{
    CustomerId, CustomerRecord, PurchaseId, PurchaseRecord,
};
use crate::workflows::refunds::evaluation::{RefundEngine, RefundPolicyConfig};

pub(super) fn evaluation_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid evaluation instant")
}

pub(super) fn purchase(
    id: &str,
    total_units: u64,
    consumed_units: u64,
    price_paid: f64,
    hours_before_evaluation: i64,
) -> PurchaseRecord {
    PurchaseRecord {
        id: PurchaseId(id.to_string()),
        total_units,
        consumed_units,
        price_paid,
        purchased_at: evaluation_instant() - Duration::hours(hours_before_evaluation),
    }
}

pub(super) fn customer(lifetime_value: f64) -> CustomerRecord {
    CustomerRecord {
        id: CustomerId("cust-001".to_string()),
        lifetime_value,
    }
}

pub(super) fn engine() -> RefundEngine {
    RefundEngine::new(RefundPolicyConfig::default())
}

pub(super) fn assert_rate(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected rate {expected}, got {actual}"
    );
}
