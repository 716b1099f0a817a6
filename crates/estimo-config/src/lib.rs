//! Configuration for the estimo system.
//!
//! Every global fallback table (stop words, abbreviations, keyword polarity
//! sets, unit factors, tier rates, bands, sanity bounds) lives here as
//! immutable data injected at construction -- never module-level mutable
//! state. This is what makes per-tenant configuration variants possible.

pub mod config;

pub use config::{
    ConfigError, EstimoConfig, FlowConfig, NarrativeConfig, PricingConfig, load_config,
};
