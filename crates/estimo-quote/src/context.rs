//! Semantic context construction for formula-defined categories.
//!
//! Scans, in priority order, free text -> raw answers -> derived details for
//! dimension expressions (`20 x 16`, `20 by 16`, explicit `320 sq ft`) and
//! qualitative cues (material, height band, stairs/railings, access). The
//! result is the flat variable map the formula engine evaluates against.

use std::collections::BTreeMap;

use regex::Regex;

use estimo_core::answer::AnswerSheet;
use estimo_formula::SemanticContext;

/// Qualitative cue battery: `(variable, needle, canonical value)` for text
/// variables.
const MATERIAL_CUES: &[(&str, &str)] = &[
    ("pressure treated", "pressure_treated"),
    ("pressure-treated", "pressure_treated"),
    ("cedar", "cedar"),
    ("composite", "composite"),
    ("redwood", "redwood"),
    ("vinyl", "vinyl"),
    ("metal", "metal"),
];

const ELEVATED_CUES: &[&str] = &["elevated", "second story", "second-story", "raised", "walkout"];

const STAIR_CUES: &[&str] = &["stairs", "steps", "staircase"];

const RAILING_CUES: &[&str] = &["railing", "handrail", "banister"];

const ACCESS_CUES: &[&str] = &["tight access", "limited access", "narrow", "crane"];

/// Compiled dimension scanners. Build once, reuse per request.
pub struct ContextBuilder {
    dimensions: Regex,
    area: Regex,
}

impl ContextBuilder {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            dimensions: Regex::new(r"(\d+(?:\.\d+)?)\s*(?:x|×|by)\s*(\d+(?:\.\d+)?)")?,
            area: Regex::new(r"(\d+(?:\.\d+)?)\s*(?:square\s*(?:feet|foot|ft)|sq\.?\s*ft\.?|sqft)")?,
        })
    }

    /// Builds the context for one assembly call.
    pub fn build(
        &self,
        free_text: &str,
        answers: &AnswerSheet,
        details: &BTreeMap<String, String>,
    ) -> SemanticContext {
        let mut ctx = SemanticContext::new();

        // Priority order: the original request outranks answers, answers
        // outrank derived details.
        let mut sources: Vec<String> = vec![free_text.to_lowercase()];
        sources.extend(answers.values().map(str::to_lowercase));
        sources.extend(details.values().map(|v| v.to_lowercase()));

        self.scan_dimensions(&sources, &mut ctx);
        scan_cues(&sources, details, &mut ctx);

        ctx
    }

    /// First source with a `W x L` pair wins; explicit area is the fallback.
    fn scan_dimensions(&self, sources: &[String], ctx: &mut SemanticContext) {
        for source in sources {
            if let Some(captures) = self.dimensions.captures(source) {
                let width: f64 = match captures[1].parse() {
                    Ok(n) => n,
                    Err(_) => continue,
                };
                let length: f64 = match captures[2].parse() {
                    Ok(n) => n,
                    Err(_) => continue,
                };
                let area = width * length;
                ctx.set_number("width", width);
                ctx.set_number("length", length);
                ctx.set_number("deck_sqft", area);
                ctx.set_number("area_sqft", area);
                ctx.set_number("deck_perimeter", 2.0 * (width + length));
                return;
            }
        }

        for source in sources {
            if let Some(captures) = self.area.captures(source) {
                if let Ok(area) = captures[1].parse::<f64>() {
                    ctx.set_number("deck_sqft", area);
                    ctx.set_number("area_sqft", area);
                    return;
                }
            }
        }
    }
}

/// Qualitative cues. Defaults are always set so spec preconditions evaluate
/// cleanly instead of warning about missing variables on every ordinary job.
fn scan_cues(sources: &[String], details: &BTreeMap<String, String>, ctx: &mut SemanticContext) {
    let mut material = "unspecified";
    'material: for source in sources {
        for (needle, canonical) in MATERIAL_CUES {
            if source.contains(needle) {
                material = canonical;
                break 'material;
            }
        }
    }
    // The detail battery may have normalized a material the cue scan missed.
    if material == "unspecified" {
        if let Some(preference) = details.get("material_preference") {
            material = preference;
        }
    }
    ctx.set_text("material", material);

    let any = |cues: &[&str]| sources.iter().any(|s| cues.iter().any(|c| s.contains(c)));

    let band = if any(ELEVATED_CUES) { "elevated" } else { "ground" };
    ctx.set_text("height_band", band);
    ctx.set_number("has_stairs", if any(STAIR_CUES) { 1.0 } else { 0.0 });
    ctx.set_number("has_railing", if any(RAILING_CUES) { 1.0 } else { 0.0 });
    ctx.set_number(
        "access_difficult",
        if any(ACCESS_CUES) || details.get("access").is_some_and(|a| a == "difficult") {
            1.0
        } else {
            0.0
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimo_core::answer::Answer;
    use pretty_assertions::assert_eq;

    fn sheet(pairs: &[(&str, &str)]) -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for (id, value) in pairs {
            sheet.record(*id, format!("{id}?"), Answer::new(*value));
        }
        sheet
    }

    fn build(free_text: &str, answers: &AnswerSheet) -> SemanticContext {
        ContextBuilder::new()
            .unwrap()
            .build(free_text, answers, &BTreeMap::new())
    }

    #[test]
    fn by_dimensions_compute_area() {
        let ctx = build("deck about 20 by 16", &AnswerSheet::new());
        assert_eq!(ctx.number("deck_sqft"), Some(320.0));
        assert_eq!(ctx.number("width"), Some(20.0));
        assert_eq!(ctx.number("length"), Some(16.0));
        assert_eq!(ctx.number("deck_perimeter"), Some(72.0));
    }

    #[test]
    fn x_dimensions_compute_area() {
        let ctx = build("12x14 patio", &AnswerSheet::new());
        assert_eq!(ctx.number("area_sqft"), Some(168.0));
    }

    #[test]
    fn explicit_area_is_the_fallback() {
        let ctx = build("roughly 300 sq ft total", &AnswerSheet::new());
        assert_eq!(ctx.number("deck_sqft"), Some(300.0));
        assert_eq!(ctx.number("width"), None);
    }

    #[test]
    fn free_text_outranks_answers() {
        let answers = sheet(&[("q-size", "10 by 10")]);
        let ctx = build("it's 20 by 16", &answers);
        assert_eq!(ctx.number("deck_sqft"), Some(320.0));
    }

    #[test]
    fn answers_supply_dimensions_when_free_text_lacks_them() {
        let answers = sheet(&[("q-size", "20 by 16 roughly")]);
        let ctx = build("new deck please", &answers);
        assert_eq!(ctx.number("deck_sqft"), Some(320.0));
    }

    #[test]
    fn qualitative_cues_and_defaults() {
        let answers = sheet(&[("q-1", "cedar boards, with stairs down to the yard")]);
        let ctx = build("second story deck, 20 by 16", &answers);

        assert_eq!(ctx.get("material"), Some(&estimo_formula::Scalar::Text("cedar".into())));
        assert_eq!(
            ctx.get("height_band"),
            Some(&estimo_formula::Scalar::Text("elevated".into()))
        );
        assert_eq!(ctx.number("has_stairs"), Some(1.0));
        assert_eq!(ctx.number("has_railing"), Some(0.0));
        assert_eq!(ctx.number("access_difficult"), Some(0.0));
    }

    #[test]
    fn no_dimensions_still_sets_safe_defaults() {
        let ctx = build("a deck, not sure how big", &AnswerSheet::new());
        assert_eq!(ctx.number("deck_sqft"), None);
        assert_eq!(
            ctx.get("height_band"),
            Some(&estimo_formula::Scalar::Text("ground".into()))
        );
        assert_eq!(ctx.number("has_stairs"), Some(0.0));
    }
}
