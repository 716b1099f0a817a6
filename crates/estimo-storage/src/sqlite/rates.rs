//! Rate-table operations for [`SqliteStore`].

use rusqlite::{Row, params};

use estimo_core::rate::{RateTableEntry, UnitOfMeasure};
use estimo_core::validation::validate_rate;

use crate::error::Result;
use crate::sqlite::store::SqliteStore;

pub(crate) const RATE_COLUMNS: &str =
    "category, subcategory, unit, labor_hours_per_unit, material_cost_per_unit, notes";

/// Deserialises a row into a [`RateTableEntry`].
pub(crate) fn scan_rate(row: &Row<'_>) -> rusqlite::Result<RateTableEntry> {
    let unit: String = row.get("unit")?;
    Ok(RateTableEntry {
        category: row.get("category")?,
        subcategory: row.get("subcategory")?,
        unit: UnitOfMeasure::from(unit.as_str()),
        labor_hours_per_unit: row.get("labor_hours_per_unit")?,
        material_cost_per_unit: row.get("material_cost_per_unit")?,
        notes: row.get("notes")?,
    })
}

impl SqliteStore {
    /// Inserts a rate-table entry (validated).
    pub fn insert_rate(&self, entry: &RateTableEntry) -> Result<()> {
        validate_rate(entry)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO rates
                 (category, subcategory, unit, labor_hours_per_unit, material_cost_per_unit, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.category,
                entry.subcategory,
                entry.unit.as_str(),
                entry.labor_hours_per_unit,
                entry.material_cost_per_unit,
                entry.notes,
            ],
        )?;
        Ok(())
    }

    /// Number of rate entries in the catalog.
    pub fn rate_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM rates", [], |row| row.get(0))?;
        Ok(count)
    }

    pub(crate) fn list_rates_impl(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<Vec<RateTableEntry>> {
        let conn = self.lock()?;
        let mut out = Vec::new();
        match subcategory {
            Some(sub) => {
                // Subcategory-scoped entries sort before category-wide ones so
                // callers can take the first unit match.
                let sql = format!(
                    "SELECT {RATE_COLUMNS} FROM rates
                     WHERE category = ?1 AND (subcategory = ?2 OR subcategory IS NULL)
                     ORDER BY (subcategory IS NULL), unit, id"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![category, sub], scan_rate)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let sql = format!(
                    "SELECT {RATE_COLUMNS} FROM rates
                     WHERE category = ?1
                     ORDER BY (subcategory IS NULL), unit, id"
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![category], scan_rate)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }
}
