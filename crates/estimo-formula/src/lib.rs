//! Formula engine for the estimo system.
//!
//! Two halves: the expression engine (`token` + `eval`), a
//! tokenize/whitelist/evaluate interpreter over a named-variable context, and
//! the material-formula side (`types` + `parser` + `bill`), which interprets
//! declarative per-project specs into a priced bill of materials.
//!
//! The expression engine is a security boundary: variables are substituted
//! textually, the result must survive a strict token whitelist, and nothing
//! ambient is ever reachable. Anything malformed fails closed.

pub mod bill;
pub mod context;
pub mod eval;
pub mod parser;
pub mod token;
pub mod types;

pub use bill::{Bill, evaluate_bill};
pub use context::{Scalar, SemanticContext};
pub use eval::{condition_or_false, evaluate_condition, evaluate_expression, expression_or_zero};
pub use types::{Adjustment, Component, FormulaCategory, FormulaError, MaterialFormulaSpec};
