//! Assembled scopes -- the priced output of the quote assembler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::money::Cents;

/// Project complexity tier derived from the subcategory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl ComplexityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum vendor skill tier required to take the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkillTier {
    Handyman,
    #[default]
    Standard,
    Specialist,
}

impl SkillTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handyman => "handyman",
            Self::Standard => "standard",
            Self::Specialist => "specialist",
        }
    }
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One priced material component of a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    /// Component key from the formula spec (e.g. `deck_boards`).
    pub key: String,
    pub description: String,
    /// Unit label as written in the spec (e.g. "board", "bag").
    pub unit: String,
    /// Quantity after rounding up.
    pub quantity: f64,
    pub unit_cost_cents: Cents,
    pub total_cents: Cents,
}

/// A named fee appended to the total (permit, disposal, surcharge...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnFee {
    pub label: String,
    pub amount_cents: Cents,
}

/// Cost breakdown in integer cents.
///
/// Constructed only through [`CostBreakdown::compose`], which makes the
/// `total == labor + materials + addons` invariant hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub labor_cents: Cents,
    pub materials_cents: Cents,
    pub addons_cents: Cents,
    pub total_cents: Cents,
}

impl CostBreakdown {
    /// Composes a breakdown from its parts; the total is always the exact sum.
    pub fn compose(labor_cents: Cents, materials_cents: Cents, add_ons: &[AddOnFee]) -> Self {
        let addons_cents: Cents = add_ons.iter().map(|f| f.amount_cents).sum();
        Self {
            labor_cents,
            materials_cents,
            addons_cents,
            total_cents: labor_cents + materials_cents + addons_cents,
        }
    }
}

/// Narrative sections produced by the generative-text collaborator.
///
/// Best effort: a scope is complete without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub existing_conditions: String,
    pub project_description: String,
    pub steps: Vec<String>,
}

/// The priced scope of work for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledScope {
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    /// Extracted details plus verbatim-retained unmatched answers.
    pub details: BTreeMap<String, String>,

    /// Labor estimate, rounded to two decimals.
    pub estimated_hours: f64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<MaterialLine>,

    pub complexity: ComplexityTier,

    pub skill_tier: SkillTier,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub add_ons: Vec<AddOnFee>,

    pub costs: CostBreakdown,

    /// One-paragraph plain-language summary (always present, deterministic).
    pub summary: String,

    /// Generated narrative sections; omitted when the collaborator fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,

    /// Fail-soft events observed during assembly (malformed formulas,
    /// narrative failures...). Never fatal, never silent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AssembledScope {
    /// Verifies the cost-sum invariant. `compose` makes violation impossible
    /// for scopes built through the assembler; deserialized scopes can lie.
    pub fn invariant_holds(&self) -> bool {
        let addons: Cents = self.add_ons.iter().map(|f| f.amount_cents).sum();
        self.costs.addons_cents == addons
            && self.costs.total_cents
                == self.costs.labor_cents + self.costs.materials_cents + self.costs.addons_cents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compose_sums_exactly() {
        let fees = vec![
            AddOnFee {
                label: "permit".into(),
                amount_cents: 8500,
            },
            AddOnFee {
                label: "disposal".into(),
                amount_cents: 5000,
            },
        ];
        let costs = CostBreakdown::compose(120_00, 340_50, &fees);
        assert_eq!(costs.addons_cents, 13500);
        assert_eq!(costs.total_cents, 12000 + 34050 + 13500);
    }

    #[test]
    fn invariant_detects_tampered_totals() {
        let mut scope = AssembledScope {
            category: "hvac".into(),
            subcategory: None,
            details: BTreeMap::new(),
            estimated_hours: 2.0,
            materials: vec![],
            complexity: ComplexityTier::Medium,
            skill_tier: SkillTier::Standard,
            add_ons: vec![],
            costs: CostBreakdown::compose(10000, 5000, &[]),
            summary: String::new(),
            narrative: None,
            warnings: vec![],
        };
        assert!(scope.invariant_holds());
        scope.costs.total_cents += 1;
        assert!(!scope.invariant_holds());
    }
}
