//! Historical-job operations for [`SqliteStore`], including relevance ranking.

use chrono::{DateTime, Utc};
use rusqlite::{Row, params};

use estimo_core::history::{HistoricalJob, QualityFlag};
use estimo_core::validation::validate_job;

use crate::error::Result;
use crate::sqlite::store::SqliteStore;

pub(crate) const JOB_COLUMNS: &str =
    "id, category, description, material_cost_cents, quality, completed_at";

/// Deserialises a row into a [`HistoricalJob`].
pub(crate) fn scan_job(row: &Row<'_>) -> rusqlite::Result<HistoricalJob> {
    let quality: String = row.get("quality")?;
    let completed_at: String = row.get("completed_at")?;
    let completed_at = DateTime::parse_from_rfc3339(&completed_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default();

    Ok(HistoricalJob {
        id: row.get("id")?,
        category: row.get("category")?,
        description: row.get("description")?,
        material_cost_cents: row.get("material_cost_cents")?,
        quality: QualityFlag::from(quality.as_str()),
        completed_at,
    })
}

/// Tokenizes free text for relevance scoring: lowercase, alphanumeric runs,
/// tokens longer than two characters.
fn relevance_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() > 2)
        .map(str::to_owned)
        .collect()
}

/// Counts distinct request tokens present in the job description.
fn relevance_score(request_tokens: &[String], description: &str) -> usize {
    let description = description.to_lowercase();
    let mut seen: Vec<&str> = Vec::new();
    request_tokens
        .iter()
        .filter(|t| {
            if seen.contains(&t.as_str()) {
                return false;
            }
            seen.push(t.as_str());
            description.contains(t.as_str())
        })
        .count()
}

impl SqliteStore {
    /// Inserts a historical job (validated).
    pub fn insert_job(&self, job: &HistoricalJob) -> Result<()> {
        validate_job(job)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO jobs
                 (id, category, description, material_cost_cents, quality, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                job.id,
                job.category,
                job.description,
                job.material_cost_cents,
                job.quality.to_string(),
                job.completed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Number of historical jobs in the corpus.
    pub fn job_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count)
    }

    pub(crate) fn find_relevant_jobs_impl(
        &self,
        category: &str,
        free_text: &str,
        limit: usize,
    ) -> Result<Vec<HistoricalJob>> {
        let mut jobs = {
            let conn = self.lock()?;
            let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE category = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![category], scan_job)?;
            let mut jobs = Vec::new();
            for row in rows {
                jobs.push(row?);
            }
            jobs
        };

        let request_tokens = relevance_tokens(free_text);
        let mut scored: Vec<(usize, HistoricalJob)> = jobs
            .drain(..)
            .map(|job| (relevance_score(&request_tokens, &job.description), job))
            .collect();

        // Relevance first, then curation quality, then recency.
        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b
                .cmp(score_a)
                .then(b.quality.rank().cmp(&a.quality.rank()))
                .then(b.completed_at.cmp(&a.completed_at))
                .then(a.id.cmp(&b.id))
        });

        Ok(scored.into_iter().take(limit).map(|(_, job)| job).collect())
    }
}
