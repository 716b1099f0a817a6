//! Quote assembler for the estimo system.
//!
//! [`Assembler::assemble`] turns a finished interview (category, answers,
//! free text) into a priced [`AssembledScope`](estimo_core::scope::AssembledScope):
//! detail extraction, quantity extraction, rate-table costing with historical
//! blending as the fallback, formula-driven bills of materials for
//! construction categories, classification, three-mode pricing, and a
//! best-effort narrative.

pub mod assembler;
pub mod blend;
pub mod classify;
pub mod context;
pub mod details;
pub mod narrative;
pub mod pricing;
pub mod quantity;

pub use assembler::{Assembler, QuoteError};
pub use narrative::{
    Classification, Classifier, HttpNarrator, KeywordClassifier, Narrator, NarrativeError,
    NoopNarrator,
};
pub use quantity::{Quantity, QuantityExtractor};
