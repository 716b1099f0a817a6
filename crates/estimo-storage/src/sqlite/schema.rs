//! DDL statements for the SQLite catalog schema.
//!
//! Timestamps are stored as TEXT in ISO 8601 format (SQLite has no native
//! datetime type). Booleans are stored as INTEGER (0/1). Choice lists are
//! JSON arrays in TEXT columns.

/// Current schema version. Bumped whenever DDL changes.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Core DDL statements executed during `init_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // -- Question library ----------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id             TEXT PRIMARY KEY,
        category       TEXT NOT NULL,
        subcategory    TEXT,
        text           TEXT NOT NULL,
        response_kind  TEXT NOT NULL DEFAULT 'free_text',
        choices        TEXT NOT NULL DEFAULT '[]',
        required       INTEGER NOT NULL DEFAULT 0,
        precondition   TEXT,
        display_order  INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_questions_scope ON questions(category, subcategory)",
    // -- Rate table ----------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS rates (
        id                      INTEGER PRIMARY KEY AUTOINCREMENT,
        category                TEXT NOT NULL,
        subcategory             TEXT,
        unit                    TEXT NOT NULL,
        labor_hours_per_unit    REAL,
        material_cost_per_unit  INTEGER,
        notes                   TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_rates_scope ON rates(category, subcategory)",
    // -- Historical jobs -----------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id                   TEXT PRIMARY KEY,
        category             TEXT NOT NULL,
        description          TEXT NOT NULL,
        material_cost_cents  INTEGER,
        quality              TEXT NOT NULL DEFAULT 'unrated',
        completed_at         TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_jobs_category ON jobs(category)",
    // -- Config (schema version bookkeeping) ---------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS config (
        key    TEXT PRIMARY KEY,
        value  TEXT NOT NULL
    )
    "#,
];
