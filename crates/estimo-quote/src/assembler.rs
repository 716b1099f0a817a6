//! The quote assembler: answers in, priced scope out.

use tracing::{debug, warn};

use estimo_config::EstimoConfig;
use estimo_core::answer::AnswerSheet;
use estimo_core::money::{Cents, format_cents, scale};
use estimo_core::scope::{AssembledScope, ComplexityTier, CostBreakdown, MaterialLine};
use estimo_core::rate::UnitOfMeasure;
use estimo_formula::{MaterialFormulaSpec, evaluate_bill};
use estimo_storage::{CatalogStore, StorageError};

use crate::blend::blended_material_cost;
use crate::classify;
use crate::context::ContextBuilder;
use crate::details::extract_details;
use crate::narrative::{NarrativeError, Narrator};
use crate::pricing;
use crate::quantity::QuantityExtractor;

/// Errors from assembly. Only store reads and battery compilation can fail;
/// everything else degrades per the error model.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("store error: {0}")]
    Store(#[from] StorageError),

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Assembles priced scopes for finished interviews.
pub struct Assembler<'a> {
    store: &'a dyn CatalogStore,
    specs: &'a [MaterialFormulaSpec],
    narrator: Option<&'a dyn Narrator>,
    config: &'a EstimoConfig,
    quantities: QuantityExtractor,
    contexts: ContextBuilder,
}

/// Labor and materials as determined by one of the three costing paths.
struct Costing {
    hours: f64,
    materials_cents: Cents,
    materials: Vec<MaterialLine>,
}

impl<'a> Assembler<'a> {
    pub fn new(
        store: &'a dyn CatalogStore,
        specs: &'a [MaterialFormulaSpec],
        narrator: Option<&'a dyn Narrator>,
        config: &'a EstimoConfig,
    ) -> Result<Self, QuoteError> {
        Ok(Self {
            store,
            specs,
            narrator,
            config,
            quantities: QuantityExtractor::new(&config.pricing)?,
            contexts: ContextBuilder::new()?,
        })
    }

    /// Produces the priced scope. Deterministic for identical inputs except
    /// for the narrative text.
    pub fn assemble(
        &self,
        category: &str,
        subcategory: Option<&str>,
        answers: &AnswerSheet,
        free_text: &str,
    ) -> Result<AssembledScope, QuoteError> {
        let pricing_cfg = &self.config.pricing;
        let mut warnings = Vec::new();

        // 1. Details from every answer; unmatched values retained verbatim.
        let details = extract_details(answers, free_text);

        // 6. Classification is independent of costing; compute it up front
        // since the costing fallbacks need the complexity tier.
        let complexity = classify::complexity(subcategory, pricing_cfg);
        let skill_tier = classify::skill_tier(category, complexity, pricing_cfg);

        // 2-5. Costing: formula-defined categories, then rate-table costing,
        // then the heuristic/historical path.
        let quantity = self.quantities.extract(&details, free_text);
        let costing = if let Some(spec) = self.matched_spec(category, subcategory) {
            self.cost_from_formula(spec, free_text, answers, &details, complexity, &mut warnings)
        } else {
            let mut costing = None;
            if let Some(quantity) = &quantity {
                costing = self.cost_from_rates(category, subcategory, quantity)?;
            }
            match costing {
                Some(costing) => costing,
                None => self.cost_from_history(category, free_text, complexity, &mut warnings)?,
            }
        };

        // 7. Pricing composition.
        let mode = pricing::select_mode(subcategory, &details, complexity, pricing_cfg);
        let visits = match &quantity {
            Some(q) if q.unit == UnitOfMeasure::Visit && q.amount >= 1.0 => q.amount as u32,
            _ => pricing_cfg.default_visits,
        };
        let labor_cents = pricing::labor_cost(
            mode,
            costing.hours,
            visits,
            skill_tier,
            &details,
            pricing_cfg,
        );
        let add_ons = pricing::add_on_fees(category, complexity, &details, pricing_cfg);
        let costs = CostBreakdown::compose(labor_cents, costing.materials_cents, &add_ons);

        let summary = summarize(
            category,
            subcategory,
            complexity,
            costing.hours,
            costing.materials_cents,
            &add_ons,
            costs.total_cents,
        );

        let mut scope = AssembledScope {
            category: category.to_owned(),
            subcategory: subcategory.map(str::to_owned),
            details,
            estimated_hours: costing.hours,
            materials: costing.materials,
            complexity,
            skill_tier,
            add_ons,
            costs,
            summary,
            narrative: None,
            warnings,
        };
        debug_assert!(scope.invariant_holds());

        // 8. Narrative, best effort. The numeric scope is already complete.
        if let Some(narrator) = self.narrator {
            match narrator.narrate(&scope) {
                Ok(narrative) => scope.narrative = Some(narrative),
                Err(NarrativeError::Disabled) => {}
                Err(e) => {
                    warn!(error = %e, "narrative omitted");
                    scope.warnings.push(format!("narrative unavailable: {e}"));
                }
            }
        }

        Ok(scope)
    }

    // -- Costing paths -------------------------------------------------------

    /// Formula-defined categories: evaluate the spec's bill of materials and
    /// derive labor from total area at the configured production rate.
    fn cost_from_formula(
        &self,
        spec: &MaterialFormulaSpec,
        free_text: &str,
        answers: &AnswerSheet,
        details: &std::collections::BTreeMap<String, String>,
        complexity: ComplexityTier,
        warnings: &mut Vec<String>,
    ) -> Costing {
        let ctx = self.contexts.build(free_text, answers, details);
        let bill = evaluate_bill(spec, &ctx);
        warnings.extend(bill.warnings);

        let hours = match ctx.number("area_sqft") {
            Some(area) if area > 0.0 => round2(area / self.config.pricing.sqft_per_hour),
            _ => self.default_hours(complexity),
        };

        debug!(spec = %spec.name, lines = bill.lines.len(), "formula bill evaluated");
        Costing {
            hours,
            materials_cents: bill.total_cents,
            materials: bill.lines,
        }
    }

    /// Rate-table costing: only when a quantity was extracted and an entry
    /// matches its unit. Returns `None` to fall through to the heuristic.
    fn cost_from_rates(
        &self,
        category: &str,
        subcategory: Option<&str>,
        quantity: &crate::quantity::Quantity,
    ) -> Result<Option<Costing>, QuoteError> {
        let rates = self.store.list_rates(category, subcategory)?;
        let Some(rate) = rates.iter().find(|r| r.unit == quantity.unit) else {
            return Ok(None);
        };

        let hours = round2(rate.labor_hours_per_unit.unwrap_or(0.0) * quantity.amount);
        let materials_cents = rate
            .material_cost_per_unit
            .map(|unit_cost| scale(unit_cost, quantity.amount))
            .unwrap_or(0);

        debug!(unit = %quantity.unit, amount = quantity.amount, "rate-table costing");
        Ok(Some(Costing {
            hours,
            materials_cents,
            materials: vec![],
        }))
    }

    /// Heuristic path: category baseline blended with relevant history.
    fn cost_from_history(
        &self,
        category: &str,
        free_text: &str,
        complexity: ComplexityTier,
        warnings: &mut Vec<String>,
    ) -> Result<Costing, QuoteError> {
        let pricing_cfg = &self.config.pricing;
        let baseline = pricing_cfg
            .baseline_material_cents
            .get(category)
            .copied()
            .unwrap_or(pricing_cfg.default_baseline_material_cents);

        let jobs =
            self.store
                .find_relevant_jobs(category, free_text, pricing_cfg.history_limit)?;
        let outcome = blended_material_cost(&jobs, baseline, pricing_cfg);
        if outcome.corroborating == 0 && !jobs.is_empty() {
            warnings.push(format!(
                "no plausible historical costs for '{category}'; using baseline"
            ));
        }

        Ok(Costing {
            hours: self.default_hours(complexity),
            materials_cents: outcome.blended_cents,
            materials: vec![],
        })
    }

    // -- Helpers -------------------------------------------------------------

    fn matched_spec(&self, category: &str, subcategory: Option<&str>) -> Option<&MaterialFormulaSpec> {
        let category = category.to_lowercase();
        let subcategory = subcategory.unwrap_or("").to_lowercase();
        self.specs.iter().find(|spec| {
            let name = spec.name.to_lowercase();
            category.contains(&name) || subcategory.contains(&name)
        })
    }

    fn default_hours(&self, complexity: ComplexityTier) -> f64 {
        let hours = &self.config.pricing.default_hours;
        match complexity {
            ComplexityTier::Low => hours.low,
            ComplexityTier::Medium => hours.medium,
            ComplexityTier::High => hours.high,
        }
    }
}

/// Rounds hours to two decimals.
fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// The one-paragraph plain-language summary every scope carries.
fn summarize(
    category: &str,
    subcategory: Option<&str>,
    complexity: ComplexityTier,
    hours: f64,
    materials_cents: Cents,
    add_ons: &[estimo_core::scope::AddOnFee],
    total_cents: Cents,
) -> String {
    let scope_name = match subcategory {
        Some(sub) => format!("{sub} ({category})"),
        None => category.to_owned(),
    };
    let mut summary = format!(
        "Scope for {scope_name}: {complexity} complexity, estimated {hours:.2} labor hours \
         and {materials} in materials.",
        materials = format_cents(materials_cents),
    );
    if !add_ons.is_empty() {
        let labels: Vec<&str> = add_ons.iter().map(|f| f.label.as_str()).collect();
        summary.push_str(&format!(" Includes {}.", labels.join(", ")));
    }
    summary.push_str(&format!(" Total {}.", format_cents(total_cents)));
    summary
}
