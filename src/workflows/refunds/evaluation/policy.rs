use super::super::domain::{Recommendation, RetentionOffer};

/// Selects the advisory tag from the final rate and generated offers.
///
/// High rates point straight at a cash refund; mid rates split between a
/// partial refund and the alternatives; low rates lean on the alternatives
/// when any exist and escalate when none do.
pub(crate) fn recommend(final_rate: f64, alternatives: &[RetentionOffer]) -> Recommendation {
    if final_rate >= 0.8 {
        Recommendation::ProcessRefundRecommended
    } else if final_rate >= 0.5 {
        Recommendation::PartialRefundOrAlternatives
    } else if !alternatives.is_empty() {
        Recommendation::PreferAlternativesOverRefund
    } else {
        Recommendation::EscalateToSupport
    }
}
