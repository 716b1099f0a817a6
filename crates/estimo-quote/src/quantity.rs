//! Quantity extraction: an ordered unit-pattern battery over detail values
//! and the request text.
//!
//! Ordering is load-bearing. Cubic patterns run before anything mentioning
//! "feet" so `"10 cubic feet"` can never be read as linear feet; roofing
//! "squares" run before generic area so `"30 squares"` never becomes square
//! feet. Metric units convert to imperial through fixed factors from
//! configuration. The first match anywhere wins; no match at all disables
//! rate-table costing upstream.

use std::collections::BTreeMap;

use regex::Regex;

use estimo_config::PricingConfig;
use estimo_core::rate::UnitOfMeasure;

/// An extracted quantity in a canonical (imperial) unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub amount: f64,
    pub unit: UnitOfMeasure,
}

/// One battery entry: pattern, canonical unit, conversion factor into it.
struct UnitPattern {
    pattern: Regex,
    unit: UnitOfMeasure,
    factor: f64,
}

/// Compiled unit-pattern battery. Build once, reuse per request.
pub struct QuantityExtractor {
    patterns: Vec<UnitPattern>,
}

impl QuantityExtractor {
    /// Compiles the battery with conversion factors from configuration.
    pub fn new(pricing: &PricingConfig) -> Result<Self, regex::Error> {
        const NUM: &str = r"(\d+(?:\.\d+)?)";

        let specs: Vec<(String, UnitOfMeasure, f64)> = vec![
            // Cubic before anything that says "feet".
            (
                format!(r"{NUM}\s*(?:cubic\s*(?:feet|foot|ft)|cu\.?\s*ft\.?|ft3)"),
                UnitOfMeasure::CubicFeet,
                1.0,
            ),
            (
                format!(r"{NUM}\s*(?:cubic\s*met(?:er|re)s?|m3)"),
                UnitOfMeasure::CubicFeet,
                pricing.cum_to_cuft,
            ),
            // Roofing squares before generic area. Plural-only (or with the
            // "roofing" prefix) so "3000 square feet" is never read as
            // roofing squares.
            (
                format!(r"{NUM}\s*(?:roofing\s*squares?|squares)\b"),
                UnitOfMeasure::Squares,
                1.0,
            ),
            (
                format!(r"{NUM}\s*(?:square\s*(?:feet|foot|ft)|sq\.?\s*ft\.?|sqft|ft2)"),
                UnitOfMeasure::SquareFeet,
                1.0,
            ),
            (
                format!(r"{NUM}\s*(?:square\s*met(?:er|re)s?|sq\.?\s*m\b|m2)"),
                UnitOfMeasure::SquareFeet,
                pricing.sqm_to_sqft,
            ),
            (
                format!(r"{NUM}\s*(?:linear\s*)?(?:feet|foot|ft)\b"),
                UnitOfMeasure::LinearFeet,
                1.0,
            ),
            (
                format!(r"{NUM}\s*met(?:er|re)s?\b"),
                UnitOfMeasure::LinearFeet,
                pricing.meters_to_feet,
            ),
            (
                format!(r"{NUM}\s*(?:units?|fixtures?|outlets?|windows?|doors?|vents?|rooms?)\b"),
                UnitOfMeasure::Each,
                1.0,
            ),
            (format!(r"{NUM}\s*visits?\b"), UnitOfMeasure::Visit, 1.0),
            (format!(r"{NUM}\s*(?:hours?|hrs?)\b"), UnitOfMeasure::Hour, 1.0),
        ];

        let mut patterns = Vec::with_capacity(specs.len());
        for (raw, unit, factor) in specs {
            patterns.push(UnitPattern {
                pattern: Regex::new(&raw)?,
                unit,
                factor,
            });
        }

        Ok(Self { patterns })
    }

    /// Runs the battery: patterns in order, each tried against every detail
    /// value (deterministic key order) and then the free text.
    pub fn extract(
        &self,
        details: &BTreeMap<String, String>,
        free_text: &str,
    ) -> Option<Quantity> {
        let mut sources: Vec<String> = details.values().map(|v| v.to_lowercase()).collect();
        sources.push(free_text.to_lowercase());

        for entry in &self.patterns {
            for source in &sources {
                if let Some(captures) = entry.pattern.captures(source) {
                    if let Ok(amount) = captures[1].parse::<f64>() {
                        return Some(Quantity {
                            amount: amount * entry.factor,
                            unit: entry.unit.clone(),
                        });
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> QuantityExtractor {
        QuantityExtractor::new(&PricingConfig::default()).unwrap()
    }

    fn from_text(text: &str) -> Option<Quantity> {
        extractor().extract(&BTreeMap::new(), text)
    }

    #[test]
    fn cubic_feet_never_reads_as_linear() {
        let q = from_text("about 10 cubic feet of mulch").unwrap();
        assert_eq!(q.unit, UnitOfMeasure::CubicFeet);
        assert_eq!(q.amount, 10.0);
    }

    #[test]
    fn roofing_squares_beat_generic_area() {
        let q = from_text("roof is 30 squares, roughly 3000 square feet").unwrap();
        assert_eq!(q.unit, UnitOfMeasure::Squares);
        assert_eq!(q.amount, 30.0);
    }

    #[test]
    fn plain_feet_are_linear() {
        let q = from_text("need 80 feet of fencing").unwrap();
        assert_eq!(q.unit, UnitOfMeasure::LinearFeet);
        assert_eq!(q.amount, 80.0);
    }

    #[test]
    fn square_feet_variants() {
        for text in ["120 sq ft", "120 sqft", "120 square feet"] {
            let q = from_text(text).unwrap();
            assert_eq!(q.unit, UnitOfMeasure::SquareFeet, "{text}");
            assert_eq!(q.amount, 120.0, "{text}");
        }
    }

    #[test]
    fn metric_units_convert() {
        let q = from_text("about 5 square meters of tile").unwrap();
        assert_eq!(q.unit, UnitOfMeasure::SquareFeet);
        assert!((q.amount - 53.8195).abs() < 1e-9);

        let q = from_text("10 meters of pipe").unwrap();
        assert_eq!(q.unit, UnitOfMeasure::LinearFeet);
        assert!((q.amount - 32.8084).abs() < 1e-9);
    }

    #[test]
    fn countable_units_extract_as_each() {
        let q = from_text("replace 6 outlets in the den").unwrap();
        assert_eq!(q.unit, UnitOfMeasure::Each);
        assert_eq!(q.amount, 6.0);
    }

    #[test]
    fn detail_values_are_scanned_before_free_text() {
        let mut details = BTreeMap::new();
        details.insert("q_q-size".to_owned(), "200 square feet".to_owned());
        let q = extractor().extract(&details, "the lot is 80 feet wide").unwrap();
        // Square-feet pattern outranks linear in the battery, regardless of
        // which source carries it.
        assert_eq!(q.unit, UnitOfMeasure::SquareFeet);
        assert_eq!(q.amount, 200.0);
    }

    #[test]
    fn no_quantity_yields_none() {
        assert_eq!(from_text("it's broken and makes noise"), None);
    }
}
