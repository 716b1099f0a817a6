//! Bill-of-materials evaluation for construction-type categories.

use estimo_core::money::{Cents, scale};
use estimo_core::scope::MaterialLine;

use crate::context::SemanticContext;
use crate::eval::{condition_or_false, expression_or_zero};
use crate::types::MaterialFormulaSpec;

/// The evaluated bill: priced line items plus any fail-soft warnings.
#[derive(Debug, Clone, Default)]
pub struct Bill {
    pub lines: Vec<MaterialLine>,
    pub total_cents: Cents,
    pub warnings: Vec<String>,
}

/// Evaluates a material spec against a semantic context.
///
/// Category preconditions gate whole component groups. Per component, the
/// first adjustment whose precondition holds REPLACES the base formula; it
/// never adds to it. Quantities round up; zero or negative quantities drop
/// the line. One malformed formula zeroes its own line and nothing else.
pub fn evaluate_bill(spec: &MaterialFormulaSpec, ctx: &SemanticContext) -> Bill {
    let mut bill = Bill::default();

    for category in &spec.categories {
        if let Some(pre) = &category.precondition {
            if !condition_or_false(pre, ctx, &mut bill.warnings) {
                continue;
            }
        }

        for component in &category.components {
            let formula = component
                .adjustments
                .iter()
                .find(|a| condition_or_false(&a.precondition, ctx, &mut bill.warnings))
                .map(|a| a.formula.as_str())
                .unwrap_or(component.base_formula.as_str());

            let quantity = expression_or_zero(formula, ctx, &mut bill.warnings).ceil();
            if quantity <= 0.0 {
                continue;
            }

            let total_cents = scale(component.unit_cost_cents, quantity);
            bill.total_cents += total_cents;
            bill.lines.push(MaterialLine {
                key: component.key.clone(),
                description: component.description.clone(),
                unit: component.unit.clone(),
                quantity,
                unit_cost_cents: component.unit_cost_cents,
                total_cents,
            });
        }
    }

    bill
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_toml;
    use pretty_assertions::assert_eq;

    const DECK_SPEC: &str = r#"
name = "deck"

[[categories]]
name = "structure"

[[categories.components]]
key = "deck_boards"
description = "5/4 deck boards"
unit = "board"
unit_cost_cents = 1250
base_formula = "deck_sqft / 12"

[[categories.components]]
key = "posts"
unit = "post"
unit_cost_cents = 2200
base_formula = "deck_sqft / 40"

[[categories.components.adjustments]]
precondition = "height_band == 'elevated'"
formula = "deck_sqft / 25"

[[categories]]
name = "railings"
precondition = "has_railing == 1"

[[categories.components]]
key = "rail_sections"
unit = "section"
unit_cost_cents = 5400
base_formula = "deck_sqft / 50"
"#;

    fn deck_ctx(sqft: f64) -> SemanticContext {
        let mut ctx = SemanticContext::new();
        ctx.set_number("deck_sqft", sqft);
        ctx
    }

    #[test]
    fn base_formula_rounds_up() {
        let spec = parse_toml(DECK_SPEC).unwrap();
        let bill = evaluate_bill(&spec, &deck_ctx(320.0));

        // 320 / 12 = 26.67 -> 27 boards; railings skipped (no has_railing).
        let boards = bill.lines.iter().find(|l| l.key == "deck_boards").unwrap();
        assert_eq!(boards.quantity, 27.0);
        assert_eq!(boards.total_cents, 27 * 1250);
        assert!(bill.lines.iter().all(|l| l.key != "rail_sections"));
    }

    #[test]
    fn adjustment_overrides_base() {
        let spec = parse_toml(DECK_SPEC).unwrap();

        let mut ctx = deck_ctx(320.0);
        ctx.set_text("height_band", "elevated");
        let bill = evaluate_bill(&spec, &ctx);

        // Elevated: 320 / 25 = 12.8 -> 13, not base 320 / 40 = 8.
        let posts = bill.lines.iter().find(|l| l.key == "posts").unwrap();
        assert_eq!(posts.quantity, 13.0);
    }

    #[test]
    fn gated_category_included_when_condition_holds() {
        let spec = parse_toml(DECK_SPEC).unwrap();

        let mut ctx = deck_ctx(320.0);
        ctx.set_number("has_railing", 1.0);
        let bill = evaluate_bill(&spec, &ctx);

        let rails = bill.lines.iter().find(|l| l.key == "rail_sections").unwrap();
        assert_eq!(rails.quantity, 7.0); // 320 / 50 = 6.4 -> 7
    }

    #[test]
    fn missing_dimensions_fail_soft() {
        let spec = parse_toml(DECK_SPEC).unwrap();
        let bill = evaluate_bill(&spec, &SemanticContext::new());

        assert!(bill.lines.is_empty());
        assert_eq!(bill.total_cents, 0);
        // Every formula that referenced deck_sqft warned instead of erroring.
        assert!(!bill.warnings.is_empty());
    }

    #[test]
    fn totals_sum_lines_exactly() {
        let spec = parse_toml(DECK_SPEC).unwrap();
        let mut ctx = deck_ctx(500.0);
        ctx.set_number("has_railing", 1.0);
        ctx.set_text("height_band", "elevated");
        let bill = evaluate_bill(&spec, &ctx);

        let sum: i64 = bill.lines.iter().map(|l| l.total_cents).sum();
        assert_eq!(bill.total_cents, sum);
    }
}
