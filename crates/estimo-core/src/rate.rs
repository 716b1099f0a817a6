//! Rate-table entries: fixed labor and material rates per unit of measure.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::money::Cents;

/// Unit of measure for a rate-table entry.
///
/// Serialized as a snake_case string with a `Custom` fallback for units added
/// by curation before the code knows about them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitOfMeasure {
    Each,
    Hour,
    Visit,
    LinearFeet,
    SquareFeet,
    CubicFeet,
    /// Roofing squares (100 sq ft).
    Squares,
    Custom(String),
}

impl UnitOfMeasure {
    /// Returns the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Each => "each",
            Self::Hour => "hour",
            Self::Visit => "visit",
            Self::LinearFeet => "linear_feet",
            Self::SquareFeet => "square_feet",
            Self::CubicFeet => "cubic_feet",
            Self::Squares => "squares",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for UnitOfMeasure {
    fn from(s: &str) -> Self {
        match s {
            "each" => Self::Each,
            "hour" => Self::Hour,
            "visit" => Self::Visit,
            "linear_feet" => Self::LinearFeet,
            "square_feet" => Self::SquareFeet,
            "cubic_feet" => Self::CubicFeet,
            "squares" => Self::Squares,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl Serialize for UnitOfMeasure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UnitOfMeasure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// A fixed labor/material rate for one unit of measure within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableEntry {
    pub category: String,

    /// `None` applies the rate to every subcategory of the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    pub unit: UnitOfMeasure,

    /// Labor hours charged per unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_hours_per_unit: Option<f64>,

    /// Material cost per unit in integer cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_cost_per_unit: Option<Cents>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unit_round_trips() {
        let json = serde_json::to_string(&UnitOfMeasure::CubicFeet).unwrap();
        assert_eq!(json, "\"cubic_feet\"");
        let back: UnitOfMeasure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UnitOfMeasure::CubicFeet);
    }

    #[test]
    fn unknown_unit_becomes_custom() {
        let unit = UnitOfMeasure::from("pallet");
        assert_eq!(unit, UnitOfMeasure::Custom("pallet".into()));
    }

    #[test]
    fn entry_parses_with_optional_fields_absent() {
        let json = r#"{"category": "cleaning", "unit": "visit"}"#;
        let entry: RateTableEntry = serde_json::from_str(json).unwrap();
        assert!(entry.labor_hours_per_unit.is_none());
        assert!(entry.material_cost_per_unit.is_none());
        assert!(entry.subcategory.is_none());
    }
}
