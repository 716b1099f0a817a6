//! Question flow resolver for the estimo system.
//!
//! Given a category/subcategory and the answers so far, [`Resolver`] picks
//! the next applicable unanswered question under a three-tier fallback
//! (exact subcategory, fuzzy subcategory match, generic pool) and decides
//! when the interview is complete.

pub mod fuzzy;
pub mod precondition;
pub mod resolver;

pub use precondition::Precondition;
pub use resolver::{FlowError, Resolution, Resolver};
