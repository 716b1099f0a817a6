//! Pricing composition: three mutually exclusive modes plus add-on fees.

use std::collections::BTreeMap;

use estimo_config::PricingConfig;
use estimo_core::money::{Cents, scale};
use estimo_core::scope::{AddOnFee, ComplexityTier, SkillTier};

/// The three pricing modes. Exactly one applies to any scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingMode {
    /// Flat diagnostic-call fee plus parts, for low-complexity one-time calls.
    Diagnostic,
    /// Visits x adjusted per-visit rate, for recurring contracts.
    Recurring,
    /// Hours x tier rate x regional multiplier, for everything else.
    Hourly,
}

/// Selects the pricing mode from subcategory fragments and extracted details.
pub fn select_mode(
    subcategory: Option<&str>,
    details: &BTreeMap<String, String>,
    complexity: ComplexityTier,
    pricing: &PricingConfig,
) -> PricingMode {
    let sub = subcategory.unwrap_or("").to_lowercase();

    let recurring_by_name = pricing
        .recurring_fragments
        .iter()
        .any(|f| sub.contains(f.as_str()));
    let recurring_by_answer = details
        .get("frequency")
        .is_some_and(|f| f != "once");
    if recurring_by_name || recurring_by_answer {
        return PricingMode::Recurring;
    }

    let diagnostic_by_name = pricing
        .diagnostic_fragments
        .iter()
        .any(|f| sub.contains(f.as_str()));
    if complexity == ComplexityTier::Low && (diagnostic_by_name || details.contains_key("symptom"))
    {
        return PricingMode::Diagnostic;
    }

    PricingMode::Hourly
}

/// Labor cost for the selected mode. Materials are composed separately.
pub fn labor_cost(
    mode: PricingMode,
    hours: f64,
    visits: u32,
    skill: SkillTier,
    details: &BTreeMap<String, String>,
    pricing: &PricingConfig,
) -> Cents {
    match mode {
        PricingMode::Diagnostic => pricing.diagnostic_fee_cents,

        PricingMode::Recurring => {
            let size_multiplier = match details.get("size_class").map(String::as_str) {
                Some("small") => pricing.size_multipliers.small,
                Some("large") => pricing.size_multipliers.large,
                _ => pricing.size_multipliers.medium,
            };
            let service_multiplier = if details.get("service_level").map(String::as_str)
                == Some("premium")
            {
                pricing.premium_service_multiplier
            } else {
                1.0
            };
            let per_visit =
                scale(pricing.visit_rate_cents, size_multiplier * service_multiplier);
            per_visit * visits as Cents
        }

        PricingMode::Hourly => {
            let rate = match skill {
                SkillTier::Handyman => pricing.tier_rates.handyman_cents,
                SkillTier::Standard => pricing.tier_rates.standard_cents,
                SkillTier::Specialist => pricing.tier_rates.specialist_cents,
            };
            scale(rate, hours * pricing.regional_multiplier)
        }
    }
}

/// Add-on fees from category, complexity, and extracted details.
pub fn add_on_fees(
    category: &str,
    complexity: ComplexityTier,
    details: &BTreeMap<String, String>,
    pricing: &PricingConfig,
) -> Vec<AddOnFee> {
    let mut fees = Vec::new();

    let licensed = pricing
        .licensed_categories
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category));
    if licensed && complexity == ComplexityTier::High {
        fees.push(AddOnFee {
            label: "permit".into(),
            amount_cents: pricing.permit_fee_cents,
        });
    }

    if details.get("disposal").map(String::as_str) == Some("needed") {
        fees.push(AddOnFee {
            label: "disposal".into(),
            amount_cents: pricing.disposal_fee_cents,
        });
    }

    if details.get("urgency").map(String::as_str) == Some("emergency") {
        fees.push(AddOnFee {
            label: "emergency surcharge".into(),
            amount_cents: pricing.emergency_surcharge_cents,
        });
    }

    fees
}
