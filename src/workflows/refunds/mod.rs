//! Refund and retention decisioning for resold AI-token purchases.
//!
//! Given immutable snapshots of a purchase and a customer plus a stated
//! reason, the engine prices a refund (base rate adjusted for usage, customer
//! value, and elapsed time), derives non-cash retention offers, and tags an
//! advisory recommendation. It recommends only; issuing the refund or credit
//! belongs to the payment layer.

pub mod domain;
pub(crate) mod evaluation;
pub mod router;

pub use domain::{
    AdjustmentStage, CustomerId, CustomerRecord, OfferKind, PurchaseId, PurchaseRecord,
    RateAdjustment, Recommendation, RefundDecision, RefundReason, RetentionOffer,
};
pub use evaluation::{PurchaseViolation, RefundEngine, RefundError, RefundPolicyConfig};
pub use router::refund_router;
