//! Runtime context for command execution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use estimo_config::{EstimoConfig, load_config};
use estimo_core::answer::{Answer, AnswerSheet};
use estimo_storage::SqliteStore;

use crate::cli::GlobalArgs;

/// Default catalog filename when `--db` / `ESTIMO_DB` is not given.
const DEFAULT_DB: &str = "estimo.db";

/// Default config filename probed in the current directory.
const DEFAULT_CONFIG: &str = "estimo.yaml";

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Resolved catalog database path.
    pub db_path: PathBuf,

    /// Loaded configuration (defaults <- file <- env).
    pub config: EstimoConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path: Option<PathBuf> = match &global.config {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                default.exists().then(|| default.to_path_buf())
            }
        };
        let config = load_config(config_path.as_deref())
            .with_context(|| "loading configuration".to_owned())?;

        let db_path = global
            .db
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

        Ok(Self {
            db_path,
            config,
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        })
    }

    /// Opens the catalog store at the resolved path.
    pub fn open_store(&self) -> Result<SqliteStore> {
        SqliteStore::open(&self.db_path)
            .with_context(|| format!("opening catalog at {}", self.db_path.display()))
    }

    /// Loads an answers JSON file into an [`AnswerSheet`], snapshotting
    /// question text from the catalog where the IDs are known.
    ///
    /// The file maps question IDs to answers; each answer may be a bare
    /// string or a `{value, phase}` object (both normalize to the same
    /// [`Answer`]).
    pub fn load_answers(&self, store: &SqliteStore, path: Option<&str>) -> Result<AnswerSheet> {
        let mut sheet = AnswerSheet::new();
        let Some(path) = path else {
            return Ok(sheet);
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading answers file {path}"))?;
        let raw: std::collections::BTreeMap<String, Answer> = serde_json::from_str(&content)
            .with_context(|| format!("parsing answers file {path}"))?;

        for (question_id, answer) in raw {
            let text = store
                .get_question(&question_id)
                .map(|q| q.text)
                .unwrap_or_else(|_| question_id.clone());
            sheet.record(question_id, text, answer);
        }
        Ok(sheet)
    }
}
