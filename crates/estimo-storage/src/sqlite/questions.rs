//! Question library operations for [`SqliteStore`].

use rusqlite::{Row, params};

use estimo_core::question::{QuestionDefinition, ResponseKind};
use estimo_core::validation::validate_question;

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;

/// All question columns in a deterministic order for SELECT queries.
pub(crate) const QUESTION_COLUMNS: &str =
    "id, category, subcategory, text, response_kind, choices, required, precondition, display_order";

/// Deserialises a row into a [`QuestionDefinition`].
///
/// The column order MUST match [`QUESTION_COLUMNS`].
pub(crate) fn scan_question(row: &Row<'_>) -> rusqlite::Result<QuestionDefinition> {
    let kind: String = row.get("response_kind")?;
    let choices_json: String = row.get("choices")?;
    let choices: Vec<String> = serde_json::from_str(&choices_json).unwrap_or_default();

    Ok(QuestionDefinition {
        id: row.get("id")?,
        category: row.get("category")?,
        subcategory: row.get("subcategory")?,
        text: row.get("text")?,
        response_kind: ResponseKind::from(kind.as_str()),
        choices,
        required_for_completion: row.get::<_, i32>("required")? != 0,
        precondition: row.get("precondition")?,
        display_order: row.get("display_order")?,
    })
}

impl SqliteStore {
    /// Inserts or replaces a question definition (validated).
    pub fn upsert_question(&self, def: &QuestionDefinition) -> Result<()> {
        validate_question(def)?;
        let choices = serde_json::to_string(&def.choices)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO questions
                 (id, category, subcategory, text, response_kind, choices, required, precondition, display_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                def.id,
                def.category,
                def.subcategory,
                def.text,
                def.response_kind.as_str(),
                choices,
                def.required_for_completion as i32,
                def.precondition,
                def.display_order,
            ],
        )?;
        Ok(())
    }

    /// Retrieves a single question by ID.
    pub fn get_question(&self, id: &str) -> Result<QuestionDefinition> {
        let conn = self.lock()?;
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1");
        conn.query_row(&sql, params![id], |row| scan_question(row))
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StorageError::not_found("question", id),
                other => StorageError::Query(other),
            })
    }

    /// Number of questions in the catalog.
    pub fn question_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count)
    }

    pub(crate) fn list_questions_impl(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<QuestionDefinition>> {
        let conn = self.lock()?;
        let mut out = Vec::new();
        match subcategory {
            Some(sub) => {
                let sql = format!(
                    "SELECT {QUESTION_COLUMNS} FROM questions
                     WHERE category = ?1 AND (subcategory = ?2 OR subcategory IS NULL)
                     ORDER BY display_order, id"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![category, sub], scan_question)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let sql = format!(
                    "SELECT {QUESTION_COLUMNS} FROM questions
                     WHERE category = ?1 AND subcategory IS NULL
                     ORDER BY display_order, id"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![category], scan_question)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    pub(crate) fn list_all_questions_impl(&self, category: &str) -> Result<Vec<QuestionDefinition>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions
             WHERE category = ?1
             ORDER BY display_order, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![category], scan_question)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn question(id: &str, sub: Option<&str>, order: i32) -> QuestionDefinition {
        QuestionDefinition {
            id: id.into(),
            category: "hvac".into(),
            subcategory: sub.map(Into::into),
            text: format!("Question {id}?"),
            response_kind: ResponseKind::FreeText,
            choices: vec![],
            required_for_completion: false,
            precondition: None,
            display_order: order,
        }
    }

    #[test]
    fn scoped_listing_includes_category_wide_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert_question(&question("q-a", Some("furnace repair"), 1)).unwrap();
        store.upsert_question(&question("q-b", None, 0)).unwrap();
        store.upsert_question(&question("q-c", Some("ac repair"), 0)).unwrap();

        let scoped = store.list_questions_impl("hvac", Some("furnace repair")).unwrap();
        let ids: Vec<&str> = scoped.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q-b", "q-a"]);

        let category_wide = store.list_questions_impl("hvac", None).unwrap();
        assert_eq!(category_wide.len(), 1);
        assert_eq!(category_wide[0].id, "q-b");

        let all = store.list_all_questions_impl("hvac").unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn upsert_replaces_by_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert_question(&question("q-a", None, 0)).unwrap();
        let mut updated = question("q-a", None, 5);
        updated.text = "Rewritten?".into();
        store.upsert_question(&updated).unwrap();

        assert_eq!(store.question_count().unwrap(), 1);
        let q = store.get_question("q-a").unwrap();
        assert_eq!(q.text, "Rewritten?");
        assert_eq!(q.display_order, 5);
    }

    #[test]
    fn invalid_question_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut q = question("q-a", None, 0);
        q.text = String::new();
        let err = store.upsert_question(&q).unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));
    }

    #[test]
    fn missing_question_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_question("q-nope").unwrap_err().is_not_found());
    }
}
