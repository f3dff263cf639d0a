use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for purchases under evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PurchaseId(pub String);

/// Identifier wrapper for customer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

/// Snapshot of a token purchase as recorded by the order ledger.
///
/// The ledger owns the record; the engine only reads it. `consumed_units` is
/// expected to stay at or below `total_units` and `price_paid` strictly
/// positive; both are re-checked before any rate math runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: PurchaseId,
    pub total_units: u64,
    pub consumed_units: u64,
    pub price_paid: f64,
    pub purchased_at: DateTime<Utc>,
}

impl PurchaseRecord {
    /// Fraction of the purchase already consumed, expressed as 0-100.
    pub fn usage_percent(&self) -> f64 {
        self.consumed_units as f64 / self.total_units as f64 * 100.0
    }
}

/// Account snapshot supplied by the customer system, read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub lifetime_value: f64,
}

/// Closed set of refund reasons accepted by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    Unused,
    TechnicalIssue,
    QualityIssue,
    FirstTimeUser,
    BulkUnused,
}

impl RefundReason {
    /// Parses a loosely-typed upstream reason code. Unknown codes return
    /// `None`; the caller decides whether to fall back to the conservative
    /// default rate.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "unused" => Some(Self::Unused),
            "technical_issue" => Some(Self::TechnicalIssue),
            "quality_issue" => Some(Self::QualityIssue),
            "first_time_user" => Some(Self::FirstTimeUser),
            "bulk_unused" => Some(Self::BulkUnused),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::TechnicalIssue => "technical_issue",
            Self::QualityIssue => "quality_issue",
            Self::FirstTimeUser => "first_time_user",
            Self::BulkUnused => "bulk_unused",
        }
    }
}

/// Kinds of non-cash retention offers the generator can propose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    BonusUnits,
    AccountCredit,
}

/// A non-cash alternative proposed instead of, or alongside, a partial refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionOffer {
    pub kind: OfferKind,
    pub description: String,
    pub equivalent_value: f64,
}

/// Pipeline stages recorded in the decision audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentStage {
    BaseRate,
    Usage,
    CustomerValue,
    TimeDecay,
}

/// Discrete contribution to the final rate, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustment {
    pub stage: AdjustmentStage,
    pub multiplier: f64,
    pub rate_after: f64,
    pub notes: String,
}

/// Advisory tag selected by the decision aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ProcessRefundRecommended,
    PartialRefundOrAlternatives,
    PreferAlternativesOverRefund,
    EscalateToSupport,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProcessRefundRecommended => "process_refund_recommended",
            Self::PartialRefundOrAlternatives => "partial_refund_or_alternatives",
            Self::PreferAlternativesOverRefund => "prefer_alternatives_over_refund",
            Self::EscalateToSupport => "escalate_to_support",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::ProcessRefundRecommended => "process the refund at the computed rate",
            Self::PartialRefundOrAlternatives => {
                "offer a partial refund or the listed alternatives"
            }
            Self::PreferAlternativesOverRefund => "lead with the alternatives, refund if pressed",
            Self::EscalateToSupport => "no good automated option, route to a support agent",
        }
    }
}

/// Engine output describing the recommended refund and retention offers.
///
/// Ephemeral by design: persisting or executing the decision is the caller's
/// job, keyed idempotently on the purchase identifier at that layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundDecision {
    pub purchase_id: PurchaseId,
    pub reason: Option<RefundReason>,
    pub approved: bool,
    pub final_rate: f64,
    pub refund_amount: f64,
    pub alternatives: Vec<RetentionOffer>,
    pub recommendation: Recommendation,
    pub adjustments: Vec<RateAdjustment>,
}
