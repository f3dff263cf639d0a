use super::super::domain::{OfferKind, PurchaseRecord, RetentionOffer};
use super::config::RefundPolicyConfig;
use super::round_to_cents;

/// Derives the non-cash retention offers for a computed final rate.
///
/// Deterministic by contract: the same purchase and rate always produce the
/// same offers, in the same order (bonus units before credit). Copy variation
/// for A/B tests belongs in the presentation layer.
pub(crate) fn generate_offers(
    purchase: &PurchaseRecord,
    final_rate: f64,
    config: &RefundPolicyConfig,
) -> Vec<RetentionOffer> {
    let mut offers = Vec::new();

    if final_rate < config.bonus_units_threshold {
        let bonus_units = (purchase.total_units as f64 * config.bonus_units_fraction).round() as u64;
        let equivalent_value = round_to_cents(purchase.price_paid * config.bonus_units_fraction);
        offers.push(RetentionOffer {
            kind: OfferKind::BonusUnits,
            description: format!(
                "{bonus_units} bonus units added to the current balance (worth ${equivalent_value:.2})"
            ),
            equivalent_value,
        });
    }

    if final_rate < config.account_credit_threshold {
        let equivalent_value = round_to_cents(purchase.price_paid * config.account_credit_fraction);
        offers.push(RetentionOffer {
            kind: OfferKind::AccountCredit,
            description: format!(
                "${equivalent_value:.2} non-expiring account credit for future purchases"
            ),
            equivalent_value,
        });
    }

    offers
}
