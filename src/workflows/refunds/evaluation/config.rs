use serde::{Deserialize, Serialize};

/// Tunable thresholds for the refund policy.
///
/// The defaults are the production policy; overrides exist for staged
/// rollouts of a stricter approval bar, not for per-customer tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundPolicyConfig {
    /// A decision is approved only when the final rate exceeds this.
    pub approval_threshold: f64,
    /// Base rate applied when an upstream reason code is unrecognized.
    pub fallback_base_rate: f64,
    /// Bonus-unit offer appears when the final rate lands below this.
    pub bonus_units_threshold: f64,
    /// Bonus units granted, as a fraction of the purchased quantity.
    pub bonus_units_fraction: f64,
    /// Account-credit offer appears when the final rate lands below this.
    pub account_credit_threshold: f64,
    /// Credit granted, as a fraction of the price paid.
    pub account_credit_fraction: f64,
}

impl Default for RefundPolicyConfig {
    fn default() -> Self {
        Self {
            approval_threshold: 0.1,
            fallback_base_rate: 0.3,
            bonus_units_threshold: 0.6,
            bonus_units_fraction: 0.3,
            account_credit_threshold: 0.8,
            account_credit_fraction: 0.6,
        }
    }
}
