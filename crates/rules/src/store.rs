use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once, RwLock};

use serde::Serialize;

use crate::compiler::RuleTable;

/// Environment override for the rule-source document path.
pub const RULES_PATH_ENV: &str = "CARE_RULES_PATH";

static SOURCE_DIAGNOSTIC: Once = Once::new();

/// Holder for the compiled rule table.
///
/// The table is immutable once compiled and shared as an `Arc`; readers
/// clone the `Arc` once and run lock-free. `reload` compiles a brand-new
/// table and swaps the pointer, so in-flight analyses keep the table they
/// started with and never observe partial state.
pub struct RuleStore {
    table: RwLock<Arc<RuleTable>>,
    candidates: Vec<PathBuf>,
}

impl RuleStore {
    /// Load from the default ranked candidate sources: the `CARE_RULES_PATH`
    /// environment variable first, then `data/text_rules.json`, then
    /// `text_rules.json` in the working directory.
    pub fn load() -> RuleStore {
        Self::from_candidates(default_candidates())
    }

    /// Load from an explicit ranked candidate list. A missing or unparsable
    /// source degrades to an empty table; one diagnostic is logged per
    /// process lifetime.
    pub fn from_candidates(candidates: Vec<PathBuf>) -> RuleStore {
        let table = Arc::new(load_table(&candidates));
        RuleStore {
            table: RwLock::new(table),
            candidates,
        }
    }

    /// Wrap an already-compiled table (tests, embedded rule sets).
    pub fn from_table(table: RuleTable) -> RuleStore {
        RuleStore {
            table: RwLock::new(Arc::new(table)),
            candidates: Vec::new(),
        }
    }

    /// The current compiled table. The returned `Arc` stays valid across
    /// concurrent reloads.
    pub fn table(&self) -> Arc<RuleTable> {
        self.table
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Re-read the candidate sources and publish a fresh table atomically.
    pub fn reload(&self) {
        let fresh = Arc::new(load_table(&self.candidates));
        let mut slot = self
            .table
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = fresh;
    }

    /// Loading diagnostic: every candidate path, whether it exists, and the
    /// compiled rule count.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            sources: self
                .candidates
                .iter()
                .map(|p| SourceStatus {
                    path: p.display().to_string(),
                    exists: p.exists(),
                })
                .collect(),
            loaded_count: self.table().len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub path: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub sources: Vec<SourceStatus>,
    pub loaded_count: usize,
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(env_path) = std::env::var(RULES_PATH_ENV) {
        if !env_path.trim().is_empty() {
            candidates.push(PathBuf::from(env_path));
        }
    }
    candidates.push(PathBuf::from("data/text_rules.json"));
    candidates.push(PathBuf::from("text_rules.json"));
    candidates
}

/// Read the first existing candidate and compile it. Never raises: failure
/// yields an empty table and a single per-process warning.
fn load_table(candidates: &[PathBuf]) -> RuleTable {
    for path in candidates {
        if !path.exists() {
            continue;
        }
        match read_and_compile(path) {
            Ok(table) => {
                log::info!("loaded {} care rules from {}", table.len(), path.display());
                return table;
            }
            Err(err) => {
                warn_once(&format!(
                    "failed to load rule source {}: {}",
                    path.display(),
                    err
                ));
                return RuleTable::empty();
            }
        }
    }
    warn_once("no rule source found among candidate paths; continuing with an empty rule table");
    RuleTable::empty()
}

fn read_and_compile(path: &Path) -> crate::Result<RuleTable> {
    let json = fs::read_to_string(path)?;
    RuleTable::from_json_str(&json)
}

fn warn_once(message: &str) {
    SOURCE_DIAGNOSTIC.call_once(|| log::warn!("{}", message));
}
