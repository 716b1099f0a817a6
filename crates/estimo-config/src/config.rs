//! Configuration types and loading for the estimo system.
//!
//! The main entry point is [`EstimoConfig`], loaded with [`load_config`]:
//! built-in defaults, overridden by an optional `estimo.yaml`, overridden by
//! `ESTIMO_*` environment variables (figment layering).

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// The configuration file could not be written.
    #[error("failed to write config file: {0}")]
    Write(#[from] std::io::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Flow configuration
// ---------------------------------------------------------------------------

/// Tables and thresholds for the question flow resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Generic words worth only 1 point in fuzzy overlap scoring.
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Domain abbreviation expansions applied before tokenization
    /// (e.g. "ac" -> "air conditioner").
    #[serde(default = "default_abbreviations")]
    pub abbreviations: BTreeMap<String, String>,

    /// Heating-polarity keywords for the fuzzy conflict veto.
    #[serde(default = "default_heating_keywords")]
    pub heating_keywords: Vec<String>,

    /// Cooling-polarity keywords for the fuzzy conflict veto.
    #[serde(default = "default_cooling_keywords")]
    pub cooling_keywords: Vec<String>,

    /// Minimum fuzzy overlap score to accept a candidate subcategory.
    #[serde(default = "default_min_fuzzy_score")]
    pub min_fuzzy_score: i32,

    /// Category-scoped catch-all subcategory for the generic tier.
    #[serde(default = "default_generic_subcategory")]
    pub generic_subcategory: String,

    /// Category holding the universal question pool.
    #[serde(default = "default_universal_category")]
    pub universal_category: String,

    /// Keywords marking an installation-intent request; everything else is
    /// service intent.
    #[serde(default = "default_installation_keywords")]
    pub installation_keywords: Vec<String>,

    /// Completion requires at least this many answered required questions.
    #[serde(default = "default_min_required_answers")]
    pub min_required_answers: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
            abbreviations: default_abbreviations(),
            heating_keywords: default_heating_keywords(),
            cooling_keywords: default_cooling_keywords(),
            min_fuzzy_score: default_min_fuzzy_score(),
            generic_subcategory: default_generic_subcategory(),
            universal_category: default_universal_category(),
            installation_keywords: default_installation_keywords(),
            min_required_answers: default_min_required_answers(),
        }
    }
}

fn default_stop_words() -> Vec<String> {
    [
        "service", "repair", "install", "installation", "replace", "replacement",
        "maintenance", "general", "system", "unit", "new", "old", "home", "house",
        "fix", "broken", "issue", "problem", "work",
    ]
    .map(String::from)
    .to_vec()
}

fn default_abbreviations() -> BTreeMap<String, String> {
    [
        ("ac", "air conditioner"),
        ("a/c", "air conditioner"),
        ("htr", "heater"),
        ("wtr", "water"),
        ("frig", "refrigerator"),
        ("sqft", "square feet"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}

fn default_heating_keywords() -> Vec<String> {
    ["heat", "heating", "heater", "furnace", "boiler", "radiator"]
        .map(String::from)
        .to_vec()
}

fn default_cooling_keywords() -> Vec<String> {
    ["cool", "cooling", "conditioner", "conditioning", "chiller", "refrigerant"]
        .map(String::from)
        .to_vec()
}

fn default_min_fuzzy_score() -> i32 {
    3
}

fn default_generic_subcategory() -> String {
    "general".to_string()
}

fn default_universal_category() -> String {
    "any".to_string()
}

fn default_installation_keywords() -> Vec<String> {
    ["install", "installation", "new", "replace", "replacement", "build", "upgrade"]
        .map(String::from)
        .to_vec()
}

fn default_min_required_answers() -> usize {
    2
}

// ---------------------------------------------------------------------------
// Pricing configuration
// ---------------------------------------------------------------------------

/// Hourly labor rates per vendor skill tier, in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRates {
    #[serde(default = "default_handyman_rate")]
    pub handyman_cents: i64,

    #[serde(default = "default_standard_rate")]
    pub standard_cents: i64,

    #[serde(default = "default_specialist_rate")]
    pub specialist_cents: i64,
}

impl Default for TierRates {
    fn default() -> Self {
        Self {
            handyman_cents: default_handyman_rate(),
            standard_cents: default_standard_rate(),
            specialist_cents: default_specialist_rate(),
        }
    }
}

fn default_handyman_rate() -> i64 {
    6500
}

fn default_standard_rate() -> i64 {
    9500
}

fn default_specialist_rate() -> i64 {
    14500
}

/// Per-visit rate multipliers by property size band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeMultipliers {
    #[serde(default = "default_small_multiplier")]
    pub small: f64,

    #[serde(default = "default_medium_multiplier")]
    pub medium: f64,

    #[serde(default = "default_large_multiplier")]
    pub large: f64,
}

impl Default for SizeMultipliers {
    fn default() -> Self {
        Self {
            small: default_small_multiplier(),
            medium: default_medium_multiplier(),
            large: default_large_multiplier(),
        }
    }
}

fn default_small_multiplier() -> f64 {
    0.8
}

fn default_medium_multiplier() -> f64 {
    1.0
}

fn default_large_multiplier() -> f64 {
    1.35
}

/// Baseline labor hours per complexity tier for the heuristic path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultHours {
    #[serde(default = "default_hours_low")]
    pub low: f64,

    #[serde(default = "default_hours_medium")]
    pub medium: f64,

    #[serde(default = "default_hours_high")]
    pub high: f64,
}

impl Default for DefaultHours {
    fn default() -> Self {
        Self {
            low: default_hours_low(),
            medium: default_hours_medium(),
            high: default_hours_high(),
        }
    }
}

fn default_hours_low() -> f64 {
    1.0
}

fn default_hours_medium() -> f64 {
    3.0
}

fn default_hours_high() -> f64 {
    6.0
}

/// Tables and rates for the quote assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Categories requiring a licensed trade (drives the skill-tier table
    /// and permit fees).
    #[serde(default = "default_licensed_categories")]
    pub licensed_categories: Vec<String>,

    /// Subcategory name fragments that mark high complexity.
    #[serde(default = "default_high_fragments")]
    pub high_complexity_fragments: Vec<String>,

    /// Subcategory name fragments that mark low complexity.
    #[serde(default = "default_low_fragments")]
    pub low_complexity_fragments: Vec<String>,

    /// Subcategory fragments that select flat diagnostic-call pricing.
    #[serde(default = "default_diagnostic_fragments")]
    pub diagnostic_fragments: Vec<String>,

    /// Subcategory fragments that select per-visit recurring pricing.
    #[serde(default = "default_recurring_fragments")]
    pub recurring_fragments: Vec<String>,

    #[serde(default)]
    pub tier_rates: TierRates,

    /// Regional labor cost multiplier applied to hourly pricing.
    #[serde(default = "default_regional_multiplier")]
    pub regional_multiplier: f64,

    /// Flat fee for a diagnostic call, in cents.
    #[serde(default = "default_diagnostic_fee")]
    pub diagnostic_fee_cents: i64,

    /// Base per-visit rate for recurring contracts, in cents.
    #[serde(default = "default_visit_rate")]
    pub visit_rate_cents: i64,

    #[serde(default)]
    pub size_multipliers: SizeMultipliers,

    /// Rate multiplier for premium service-level contracts.
    #[serde(default = "default_premium_multiplier")]
    pub premium_service_multiplier: f64,

    /// Visits per billing term when the interview did not establish one.
    #[serde(default = "default_visits")]
    pub default_visits: u32,

    /// Per-category baseline material cost for the heuristic path, in cents.
    #[serde(default = "default_baseline_materials")]
    pub baseline_material_cents: BTreeMap<String, i64>,

    /// Baseline for categories not listed above.
    #[serde(default = "default_baseline_fallback")]
    pub default_baseline_material_cents: i64,

    /// Historical material costs below this are discarded as implausible.
    #[serde(default = "default_sanity_min")]
    pub sanity_min_cents: i64,

    /// Historical material costs above this are discarded as implausible.
    #[serde(default = "default_sanity_max")]
    pub sanity_max_cents: i64,

    /// How many historical jobs to request for blending.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Construction labor: square feet produced per labor hour.
    #[serde(default = "default_sqft_per_hour")]
    pub sqft_per_hour: f64,

    #[serde(default)]
    pub default_hours: DefaultHours,

    // Metric conversion factors.
    #[serde(default = "default_meters_to_feet")]
    pub meters_to_feet: f64,

    #[serde(default = "default_sqm_to_sqft")]
    pub sqm_to_sqft: f64,

    #[serde(default = "default_cum_to_cuft")]
    pub cum_to_cuft: f64,

    // Add-on fees, in cents.
    #[serde(default = "default_permit_fee")]
    pub permit_fee_cents: i64,

    #[serde(default = "default_disposal_fee")]
    pub disposal_fee_cents: i64,

    #[serde(default = "default_emergency_surcharge")]
    pub emergency_surcharge_cents: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            licensed_categories: default_licensed_categories(),
            high_complexity_fragments: default_high_fragments(),
            low_complexity_fragments: default_low_fragments(),
            diagnostic_fragments: default_diagnostic_fragments(),
            recurring_fragments: default_recurring_fragments(),
            tier_rates: TierRates::default(),
            regional_multiplier: default_regional_multiplier(),
            diagnostic_fee_cents: default_diagnostic_fee(),
            visit_rate_cents: default_visit_rate(),
            size_multipliers: SizeMultipliers::default(),
            premium_service_multiplier: default_premium_multiplier(),
            default_visits: default_visits(),
            baseline_material_cents: default_baseline_materials(),
            default_baseline_material_cents: default_baseline_fallback(),
            sanity_min_cents: default_sanity_min(),
            sanity_max_cents: default_sanity_max(),
            history_limit: default_history_limit(),
            sqft_per_hour: default_sqft_per_hour(),
            default_hours: DefaultHours::default(),
            meters_to_feet: default_meters_to_feet(),
            sqm_to_sqft: default_sqm_to_sqft(),
            cum_to_cuft: default_cum_to_cuft(),
            permit_fee_cents: default_permit_fee(),
            disposal_fee_cents: default_disposal_fee(),
            emergency_surcharge_cents: default_emergency_surcharge(),
        }
    }
}

fn default_licensed_categories() -> Vec<String> {
    ["electrical", "plumbing", "hvac", "roofing"]
        .map(String::from)
        .to_vec()
}

fn default_high_fragments() -> Vec<String> {
    [
        "panel", "sewer", "rewire", "repipe", "remodel", "structural", "foundation",
        "full replacement",
    ]
    .map(String::from)
    .to_vec()
}

fn default_low_fragments() -> Vec<String> {
    [
        "filter", "bulb", "faucet", "caulk", "tune-up", "inspection", "cleaning",
        "estimate",
    ]
    .map(String::from)
    .to_vec()
}

fn default_diagnostic_fragments() -> Vec<String> {
    ["diagnostic", "inspection", "not working", "no heat", "no cooling", "estimate"]
        .map(String::from)
        .to_vec()
}

fn default_recurring_fragments() -> Vec<String> {
    ["weekly", "biweekly", "monthly", "recurring", "plan", "mowing", "contract"]
        .map(String::from)
        .to_vec()
}

fn default_regional_multiplier() -> f64 {
    1.0
}

fn default_diagnostic_fee() -> i64 {
    12500
}

fn default_visit_rate() -> i64 {
    9000
}

fn default_premium_multiplier() -> f64 {
    1.25
}

fn default_visits() -> u32 {
    4
}

fn default_baseline_materials() -> BTreeMap<String, i64> {
    [
        ("hvac", 22000),
        ("plumbing", 15000),
        ("electrical", 12000),
        ("roofing", 45000),
        ("landscaping", 8000),
        ("cleaning", 2500),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect()
}

fn default_baseline_fallback() -> i64 {
    10000
}

fn default_sanity_min() -> i64 {
    500
}

fn default_sanity_max() -> i64 {
    5_000_000
}

fn default_history_limit() -> usize {
    10
}

fn default_sqft_per_hour() -> f64 {
    12.0
}

fn default_meters_to_feet() -> f64 {
    3.28084
}

fn default_sqm_to_sqft() -> f64 {
    10.7639
}

fn default_cum_to_cuft() -> f64 {
    35.3147
}

fn default_permit_fee() -> i64 {
    8500
}

fn default_disposal_fee() -> i64 {
    5000
}

fn default_emergency_surcharge() -> i64 {
    7500
}

// ---------------------------------------------------------------------------
// Narrative configuration
// ---------------------------------------------------------------------------

/// Settings for the generative-text collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NarrativeConfig {
    /// Narration service endpoint. `None` disables narration entirely.
    #[serde(default)]
    pub endpoint: Option<String>,
}

// ---------------------------------------------------------------------------
// Root configuration
// ---------------------------------------------------------------------------

/// The complete estimo runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EstimoConfig {
    #[serde(default)]
    pub flow: FlowConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub narrative: NarrativeConfig,
}

/// Loads configuration: defaults <- optional YAML file <- `ESTIMO_*` env.
///
/// A missing file contributes nothing (defaults win); a malformed file is an
/// error -- silently ignoring a tenant's pricing overrides would misprice
/// every quote.
pub fn load_config(path: Option<&Path>) -> Result<EstimoConfig> {
    let mut figment = Figment::from(Serialized::defaults(EstimoConfig::default()));
    if let Some(path) = path {
        figment = figment.merge(Yaml::file(path));
    }
    let config = figment
        .merge(Env::prefixed("ESTIMO_").split("__"))
        .extract()?;
    Ok(config)
}

/// Serializes a config to YAML (used by `est init` to write a starter file).
pub fn to_yaml(config: &EstimoConfig) -> Result<String> {
    Ok(serde_yaml::to_string(config)?)
}
