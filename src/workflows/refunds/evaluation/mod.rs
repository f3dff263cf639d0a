mod config;
mod offers;
mod policy;
mod rates;

#[cfg(test)]
mod tests;

pub use config::RefundPolicyConfig;

use std::fmt;

use chrono::{DateTime, Utc};

use super::domain::{CustomerRecord, PurchaseId, PurchaseRecord, RefundDecision, RefundReason};

/// Invalid purchase snapshots are rejected up front rather than silently
/// normalized; the ledger feeding this engine is supposed to be clean.
#[derive(Debug, Clone, PartialEq)]
pub enum RefundError {
    InvalidPurchase {
        purchase_id: PurchaseId,
        violation: PurchaseViolation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PurchaseViolation {
    ZeroTotalUnits,
    ConsumedExceedsTotal { consumed: u64, total: u64 },
    NonPositivePrice { price: f64 },
}

impl fmt::Display for RefundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefundError::InvalidPurchase {
                purchase_id,
                violation,
            } => write!(f, "invalid purchase record '{}': {violation}", purchase_id.0),
        }
    }
}

impl fmt::Display for PurchaseViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseViolation::ZeroTotalUnits => write!(f, "total units must be positive"),
            PurchaseViolation::ConsumedExceedsTotal { consumed, total } => {
                write!(f, "consumed units {consumed} exceed total {total}")
            }
            PurchaseViolation::NonPositivePrice { price } => {
                write!(f, "price paid {price} must be positive")
            }
        }
    }
}

impl std::error::Error for RefundError {}

/// Stateless engine applying the refund policy to purchase snapshots.
///
/// Pure and synchronous: no I/O, no clock reads beyond the supplied `now`,
/// inputs never mutated. Executing or persisting an approved refund is the
/// caller's responsibility.
pub struct RefundEngine {
    config: RefundPolicyConfig,
}

impl RefundEngine {
    pub fn new(config: RefundPolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RefundPolicyConfig {
        &self.config
    }

    /// Evaluates a refund request for a recognized reason.
    pub fn evaluate(
        &self,
        purchase: &PurchaseRecord,
        customer: &CustomerRecord,
        reason: RefundReason,
        now: DateTime<Utc>,
    ) -> Result<RefundDecision, RefundError> {
        self.run(purchase, customer, rates::base_rate(reason), Some(reason), now)
    }

    /// Evaluates with the conservative fallback base rate, for reason codes
    /// the caller could not map onto [`RefundReason`]. Callers are expected
    /// to log the unrecognized code before taking this path.
    pub fn evaluate_unrecognized(
        &self,
        purchase: &PurchaseRecord,
        customer: &CustomerRecord,
        now: DateTime<Utc>,
    ) -> Result<RefundDecision, RefundError> {
        self.run(purchase, customer, self.config.fallback_base_rate, None, now)
    }

    fn run(
        &self,
        purchase: &PurchaseRecord,
        customer: &CustomerRecord,
        base: f64,
        reason: Option<RefundReason>,
        now: DateTime<Utc>,
    ) -> Result<RefundDecision, RefundError> {
        validate_purchase(purchase)?;

        let (final_rate, adjustments) = rates::apply_adjustments(purchase, customer, base, now);
        let alternatives = offers::generate_offers(purchase, final_rate, &self.config);
        let recommendation = policy::recommend(final_rate, &alternatives);

        Ok(RefundDecision {
            purchase_id: purchase.id.clone(),
            reason,
            approved: final_rate > self.config.approval_threshold,
            final_rate,
            refund_amount: round_to_cents(purchase.price_paid * final_rate),
            alternatives,
            recommendation,
            adjustments,
        })
    }
}

impl Default for RefundEngine {
    fn default() -> Self {
        Self::new(RefundPolicyConfig::default())
    }
}

fn validate_purchase(purchase: &PurchaseRecord) -> Result<(), RefundError> {
    let violation = if purchase.total_units == 0 {
        Some(PurchaseViolation::ZeroTotalUnits)
    } else if purchase.consumed_units > purchase.total_units {
        Some(PurchaseViolation::ConsumedExceedsTotal {
            consumed: purchase.consumed_units,
            total: purchase.total_units,
        })
    } else if purchase.price_paid <= 0.0 {
        Some(PurchaseViolation::NonPositivePrice {
            price: purchase.price_paid,
        })
    } else {
        None
    };

    match violation {
        Some(violation) => Err(RefundError::InvalidPurchase {
            purchase_id: purchase.id.clone(),
            violation,
        }),
        None => Ok(()),
    }
}

pub(crate) fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
