//! Material-formula data model.
//!
//! A spec is pure data: categories gated by preconditions, components with a
//! base formula and optional conditional adjustments. Only the expression
//! engine ever interprets the formula strings.

use serde::{Deserialize, Serialize};

use estimo_core::money::Cents;

/// Root structure for `.formula.toml` / `.formula.json` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialFormulaSpec {
    /// Project type this spec prices (e.g. "deck", "fence"). Matched against
    /// the session's category/subcategory.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Schema version (currently 1).
    #[serde(default)]
    pub version: i32,

    /// Component groups, each optionally gated by a precondition.
    #[serde(default)]
    pub categories: Vec<FormulaCategory>,

    /// Where this spec was loaded from (set by the parser).
    #[serde(skip)]
    pub source: String,
}

/// A group of components included only when its precondition holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaCategory {
    pub name: String,

    /// Boolean expression over the semantic context. Absent means always
    /// included. Malformed means never included (fail closed).
    #[serde(default)]
    pub precondition: Option<String>,

    #[serde(default)]
    pub components: Vec<Component>,
}

/// One material component: a quantity formula priced at a fixed unit cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Stable key (e.g. `deck_boards`).
    pub key: String,

    #[serde(default)]
    pub description: String,

    /// Unit label for display (e.g. "board", "bag", "sq ft").
    pub unit: String,

    /// Cost per unit in integer cents.
    pub unit_cost_cents: Cents,

    /// Quantity expression over the semantic context.
    pub base_formula: String,

    /// Conditional overrides. The FIRST adjustment whose precondition holds
    /// replaces the base formula entirely; it does not add to it.
    #[serde(default)]
    pub adjustments: Vec<Adjustment>,
}

/// A conditional quantity override for a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adjustment {
    pub precondition: String,
    pub formula: String,

    #[serde(default)]
    pub description: String,
}

/// Errors from formula parsing and evaluation.
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("malformed expression '{expression}': {reason}")]
    Malformed { expression: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormulaError {
    /// Creates a [`FormulaError::Malformed`] for the given expression.
    pub fn malformed(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}
