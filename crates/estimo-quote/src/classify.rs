//! Complexity tiering and the vendor skill-tier decision table.

use estimo_config::PricingConfig;
use estimo_core::scope::{ComplexityTier, SkillTier};

/// Complexity from subcategory name fragments: high fragments first, then
/// low, default medium.
pub fn complexity(subcategory: Option<&str>, pricing: &PricingConfig) -> ComplexityTier {
    let Some(subcategory) = subcategory else {
        return ComplexityTier::Medium;
    };
    let lower = subcategory.to_lowercase();

    if pricing
        .high_complexity_fragments
        .iter()
        .any(|f| lower.contains(f.as_str()))
    {
        return ComplexityTier::High;
    }
    if pricing
        .low_complexity_fragments
        .iter()
        .any(|f| lower.contains(f.as_str()))
    {
        return ComplexityTier::Low;
    }
    ComplexityTier::Medium
}

/// Minimum vendor skill by category x complexity:
///
/// |            | low      | medium   | high       |
/// |------------|----------|----------|------------|
/// | licensed   | standard | standard | specialist |
/// | unlicensed | handyman | handyman | standard   |
pub fn skill_tier(category: &str, complexity: ComplexityTier, pricing: &PricingConfig) -> SkillTier {
    let licensed = pricing
        .licensed_categories
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category));

    match (licensed, complexity) {
        (true, ComplexityTier::High) => SkillTier::Specialist,
        (true, _) => SkillTier::Standard,
        (false, ComplexityTier::High) => SkillTier::Standard,
        (false, _) => SkillTier::Handyman,
    }
}
