//! Parse material-formula spec files (TOML and JSON).

use std::path::Path;

use crate::types::{FormulaError, MaterialFormulaSpec};

/// Parse a spec from a TOML string.
pub fn parse_toml(content: &str) -> Result<MaterialFormulaSpec, FormulaError> {
    toml::from_str(content).map_err(|e| FormulaError::Parse(e.to_string()))
}

/// Parse a spec from a JSON string.
pub fn parse_json(content: &str) -> Result<MaterialFormulaSpec, FormulaError> {
    serde_json::from_str(content).map_err(|e| FormulaError::Parse(e.to_string()))
}

/// Load a spec from a file path (auto-detect TOML vs JSON by extension).
pub fn load_spec(path: &Path) -> Result<MaterialFormulaSpec, FormulaError> {
    let content = std::fs::read_to_string(path)?;
    let mut spec = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&content)?,
        Some("json") => parse_json(&content)?,
        _ => {
            // Try JSON first, then TOML
            parse_json(&content).or_else(|_| parse_toml(&content))?
        }
    };
    spec.source = path.display().to_string();
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_json_minimal() {
        let json = r#"{
            "name": "deck",
            "categories": [
                {
                    "name": "structure",
                    "components": [
                        {
                            "key": "deck_boards",
                            "unit": "board",
                            "unit_cost_cents": 1250,
                            "base_formula": "deck_sqft / 12"
                        }
                    ]
                }
            ]
        }"#;
        let spec = parse_json(json).unwrap();
        assert_eq!(spec.name, "deck");
        assert_eq!(spec.categories.len(), 1);
        assert_eq!(spec.categories[0].components[0].key, "deck_boards");
        assert!(spec.categories[0].precondition.is_none());
    }

    #[test]
    fn parse_toml_with_adjustments() {
        let toml_str = r#"
name = "deck"
description = "Wood deck build"
version = 1

[[categories]]
name = "structure"

[[categories.components]]
key = "posts"
description = "4x4 support posts"
unit = "post"
unit_cost_cents = 2200
base_formula = "deck_sqft / 40"

[[categories.components.adjustments]]
precondition = "height_band == 'elevated'"
formula = "deck_sqft / 25"
description = "Denser posting for elevated decks"

[[categories]]
name = "railings"
precondition = "has_railing == 1"

[[categories.components]]
key = "rail_sections"
unit = "section"
unit_cost_cents = 5400
base_formula = "deck_perimeter / 6"
"#;
        let spec = parse_toml(toml_str).unwrap();
        assert_eq!(spec.categories.len(), 2);
        let posts = &spec.categories[0].components[0];
        assert_eq!(posts.adjustments.len(), 1);
        assert_eq!(posts.adjustments[0].formula, "deck_sqft / 25");
        assert_eq!(
            spec.categories[1].precondition.as_deref(),
            Some("has_railing == 1")
        );
    }

    #[test]
    fn malformed_content_is_a_parse_error() {
        assert!(parse_json("{not json").is_err());
        assert!(parse_toml("= broken").is_err());
    }
}
