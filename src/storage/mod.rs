//! Record loader.
//!
//! Reads the three scrim sheets into typed tables:
//! - match-form rows (player, agent and result per map instance)
//! - round-score rows (one per map played)
//! - per-round agent/result rows with combat score
//!
//! Loading never fails. A missing, unreadable or malformed input yields an
//! empty (or partial) table carrying diagnostics.

mod csv;

pub use self::csv::*;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::{AgentResultRecord, MatchRoundRecord, PlayerAgentRecord};

/// Errors that can occur while reading an input file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Something the loader noticed and worked around.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("{path:?} not found, using an empty table")]
    MissingInput { path: PathBuf },

    #[error("{path:?} is empty")]
    EmptyInput { path: PathBuf },

    #[error("{path:?} could not be read: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("{path:?} is missing required columns: {}", .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("{path:?} line {line}: {reason}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },
}

/// Rows of one input plus whatever went wrong while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    pub rows: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Table<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            diagnostics: Vec::new(),
        }
    }

    /// Empty table with a single diagnostic.
    pub fn empty(diagnostic: Diagnostic) -> Self {
        Self {
            rows: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Configuration for input paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub form_file: String,
    pub scores_file: String,
    pub acs_file: String,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            form_file: "form.csv".to_string(),
            scores_file: "cleaned_score.csv".to_string(),
            acs_file: "foracs.csv".to_string(),
        }
    }

    pub fn form_path(&self) -> PathBuf {
        self.data_dir.join(&self.form_file)
    }

    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join(&self.scores_file)
    }

    pub fn acs_path(&self) -> PathBuf {
        self.data_dir.join(&self.acs_file)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// The three loaded sheets. Immutable for the lifetime of a session.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub form: Table<PlayerAgentRecord>,
    pub scores: Table<MatchRoundRecord>,
    pub acs: Table<AgentResultRecord>,
}

impl Tables {
    /// Load every input named by `config`.
    pub fn load(config: &StorageConfig) -> Self {
        let tables = Self {
            form: load_form(&config.form_path()),
            scores: load_scores(&config.scores_path()),
            acs: load_acs(&config.acs_path()),
        };
        info!(
            "Loaded {} form rows, {} score rows, {} ACS rows ({} diagnostics)",
            tables.form.len(),
            tables.scores.len(),
            tables.acs.len(),
            tables.diagnostics().count()
        );
        tables
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.form
            .diagnostics
            .iter()
            .chain(self.scores.diagnostics.iter())
            .chain(self.acs.diagnostics.iter())
    }
}

pub fn load_form(path: &Path) -> Table<PlayerAgentRecord> {
    CsvReader::<PlayerAgentRecord>::new(path.to_path_buf()).read_all()
}

pub fn load_scores(path: &Path) -> Table<MatchRoundRecord> {
    CsvReader::<MatchRoundRecord>::new(path.to_path_buf()).read_all()
}

pub fn load_acs(path: &Path) -> Table<AgentResultRecord> {
    CsvReader::<AgentResultRecord>::new(path.to_path_buf()).read_all()
}
