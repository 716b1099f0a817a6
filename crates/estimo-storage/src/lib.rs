//! Catalog storage for the estimo system.
//!
//! Provides the [`CatalogStore`] trait and a SQLite implementation
//! ([`SqliteStore`]). The trait is the read-only corpus view the resolver and
//! assembler consume; curation methods are inherent on [`SqliteStore`].

pub mod error;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::CatalogStore;

use estimo_core::history::HistoricalJob;
use estimo_core::question::QuestionDefinition;
use estimo_core::rate::RateTableEntry;

use crate::error::Result;

// ---------------------------------------------------------------------------
// CatalogStore trait implementation for SqliteStore
// ---------------------------------------------------------------------------

impl CatalogStore for SqliteStore {
    fn list_questions(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<QuestionDefinition>> {
        self.list_questions_impl(category, subcategory)
    }

    fn list_all_questions(&self, category: &str) -> Result<Vec<QuestionDefinition>> {
        self.list_all_questions_impl(category)
    }

    fn list_rates(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<RateTableEntry>> {
        self.list_rates_impl(category, subcategory)
    }

    fn find_relevant_jobs(
        &self,
        category: &str,
        free_text: &str,
        limit: usize,
    ) -> Result<Vec<HistoricalJob>> {
        self.find_relevant_jobs_impl(category, free_text, limit)
    }
}
