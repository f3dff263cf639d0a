use chrono::{DateTime, Duration, Utc};

use super::super::domain::{
    AdjustmentStage, CustomerRecord, PurchaseRecord, RateAdjustment, RefundReason,
};

/// Base refund fraction assigned purely by the stated reason.
///
/// Eligibility for a reason (e.g. that a `TechnicalIssue` ticket exists) is
/// vetted upstream; this table only prices it.
pub(crate) fn base_rate(reason: RefundReason) -> f64 {
    match reason {
        RefundReason::Unused => 1.0,
        RefundReason::TechnicalIssue => 1.0,
        RefundReason::QualityIssue => 0.5,
        RefundReason::FirstTimeUser => 0.5,
        RefundReason::BulkUnused => 0.75,
    }
}

pub(crate) fn usage_multiplier(usage_pct: f64) -> f64 {
    if usage_pct < 5.0 {
        1.0
    } else if usage_pct < 25.0 {
        0.75
    } else if usage_pct < 50.0 {
        0.5
    } else {
        0.25
    }
}

/// New or high-value customers get a small retention bonus.
pub(crate) fn customer_value_multiplier(lifetime_value: f64) -> f64 {
    if lifetime_value > 1000.0 {
        1.2
    } else if lifetime_value < 50.0 {
        1.1
    } else {
        1.0
    }
}

pub(crate) fn time_decay_multiplier(elapsed: Duration) -> f64 {
    if elapsed < Duration::hours(1) {
        1.1
    } else if elapsed < Duration::hours(24) {
        1.0
    } else if elapsed < Duration::days(7) {
        0.8
    } else {
        0.7
    }
}

fn clamp_rate(rate: f64) -> f64 {
    rate.clamp(0.0, 1.0)
}

/// Runs the three adjustment stages over the base rate.
///
/// The rate is clamped to [0, 1] after every stage, not only at the end, so a
/// boost can never bank headroom above 1.0 for a later stage to spend.
pub(crate) fn apply_adjustments(
    purchase: &PurchaseRecord,
    customer: &CustomerRecord,
    base: f64,
    now: DateTime<Utc>,
) -> (f64, Vec<RateAdjustment>) {
    let mut trail = Vec::with_capacity(4);
    let mut rate = clamp_rate(base);

    trail.push(RateAdjustment {
        stage: AdjustmentStage::BaseRate,
        multiplier: base,
        rate_after: rate,
        notes: "base rate from reason policy table".to_string(),
    });

    let usage_pct = purchase.usage_percent();
    let usage = usage_multiplier(usage_pct);
    rate = clamp_rate(rate * usage);
    trail.push(RateAdjustment {
        stage: AdjustmentStage::Usage,
        multiplier: usage,
        rate_after: rate,
        notes: format!(
            "{:.1}% of {} units consumed",
            usage_pct, purchase.total_units
        ),
    });

    let value = customer_value_multiplier(customer.lifetime_value);
    rate = clamp_rate(rate * value);
    trail.push(RateAdjustment {
        stage: AdjustmentStage::CustomerValue,
        multiplier: value,
        rate_after: rate,
        notes: format!("lifetime value ${:.2}", customer.lifetime_value),
    });

    let elapsed = now.signed_duration_since(purchase.purchased_at);
    let decay = time_decay_multiplier(elapsed);
    rate = clamp_rate(rate * decay);
    trail.push(RateAdjustment {
        stage: AdjustmentStage::TimeDecay,
        multiplier: decay,
        rate_after: rate,
        notes: format!("{} hours since purchase", elapsed.num_hours()),
    });

    (rate, trail)
}
