//! The [`CatalogStore`] trait -- the read-only corpus view the core consumes.
//!
//! The resolver and assembler depend on this trait rather than on a concrete
//! store so that alternative backends (mocks, fixtures, proxies) can be
//! substituted. Curation (writes) is deliberately NOT part of the trait: from
//! the core's perspective the question/rate/historical corpus is read-only,
//! and keeping the surface small keeps test doubles trivial.

use estimo_core::history::HistoricalJob;
use estimo_core::question::QuestionDefinition;
use estimo_core::rate::RateTableEntry;

use crate::error::Result;

/// Read-only access to the curated catalog.
pub trait CatalogStore: Send + Sync {
    /// Returns questions applicable to the given scope, ordered by display
    /// order.
    ///
    /// With `Some(subcategory)`: definitions for exactly that subcategory plus
    /// category-wide definitions (no subcategory requirement). With `None`:
    /// category-wide definitions only.
    fn list_questions(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<QuestionDefinition>>;

    /// Returns every question in the category regardless of subcategory.
    /// The fuzzy tier uses this to enumerate candidate subcategories.
    fn list_all_questions(&self, category: &str) -> Result<Vec<QuestionDefinition>>;

    /// Returns rate entries for the given scope, most specific first
    /// (subcategory-scoped entries before category-wide ones).
    fn list_rates(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<RateTableEntry>>;

    /// Returns up to `limit` historical jobs for the category, pre-ranked by
    /// textual relevance to `free_text` (quality and recency as tiebreaks).
    fn find_relevant_jobs(
        &self,
        category: &str,
        free_text: &str,
        limit: usize,
    ) -> Result<Vec<HistoricalJob>>;
}
