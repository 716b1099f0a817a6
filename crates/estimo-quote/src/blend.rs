//! Historical cost blending for the heuristic pricing path.
//!
//! Costs outside the configured sanity bounds are discarded as data-entry
//! noise; the median of what survives is blended into the category baseline
//! with a weight that grows with corroborating sample count.

use estimo_config::PricingConfig;
use estimo_core::history::HistoricalJob;
use estimo_core::money::Cents;

/// Result of one blend: the figure to use plus how it was derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendOutcome {
    pub blended_cents: Cents,
    /// How many plausible historical costs corroborated the figure.
    pub corroborating: usize,
    /// The median that was blended in, when any samples survived.
    pub median_cents: Option<Cents>,
}

/// Blend weight by corroborating sample count: 30% for 1-2 jobs, 50% for
/// 3-4, 70% for 5 or more.
fn history_weight(count: usize) -> f64 {
    match count {
        0 => 0.0,
        1 | 2 => 0.30,
        3 | 4 => 0.50,
        _ => 0.70,
    }
}

/// Median of a sorted sample; even counts average the middle pair.
fn median(sorted: &[Cents]) -> Cents {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2
    }
}

/// Blends historical material costs into the baseline.
pub fn blended_material_cost(
    jobs: &[HistoricalJob],
    baseline_cents: Cents,
    pricing: &PricingConfig,
) -> BlendOutcome {
    let mut costs: Vec<Cents> = jobs
        .iter()
        .filter_map(|job| job.material_cost_cents)
        .filter(|c| (pricing.sanity_min_cents..=pricing.sanity_max_cents).contains(c))
        .collect();

    if costs.is_empty() {
        return BlendOutcome {
            blended_cents: baseline_cents,
            corroborating: 0,
            median_cents: None,
        };
    }

    costs.sort_unstable();
    let median_cents = median(&costs);
    let weight = history_weight(costs.len());
    let blended =
        (weight * median_cents as f64 + (1.0 - weight) * baseline_cents as f64).round() as Cents;

    BlendOutcome {
        blended_cents: blended,
        corroborating: costs.len(),
        median_cents: Some(median_cents),
    }
}
