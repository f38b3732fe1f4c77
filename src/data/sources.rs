use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::loader::load_table;
use super::model::Table;
use crate::config::SourceFiles;
use crate::error::TransformError;

/// The four input files the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SourceKind {
    /// Coastal extreme-event statistics.
    Events,
    /// Station name → latitude / longitude.
    StationCoords,
    /// Music & mental health survey responses.
    Survey,
    /// World happiness indices, 2015–2019.
    Happiness,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Events,
        SourceKind::StationCoords,
        SourceKind::Survey,
        SourceKind::Happiness,
    ];
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Events => write!(f, "events"),
            SourceKind::StationCoords => write!(f, "station coordinates"),
            SourceKind::Survey => write!(f, "survey"),
            SourceKind::Happiness => write!(f, "happiness"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources – the immutable set of loaded tables
// ---------------------------------------------------------------------------

/// Source tables, loaded once and only read afterwards.
///
/// A file that fails to load is remembered with its error message so the
/// datasets that depend on it report the failure while the rest keep working.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    tables: BTreeMap<SourceKind, Arc<Table>>,
    failures: BTreeMap<SourceKind, String>,
}

impl Sources {
    /// Load every source file from `dir`.
    pub fn load(dir: &Path, files: &SourceFiles) -> Self {
        let mut sources = Sources::default();
        for kind in SourceKind::ALL {
            let path = dir.join(files.file_for(kind));
            match load_table(&path) {
                Ok(table) => sources.insert(kind, table),
                Err(e) => {
                    log::warn!("Failed to load {kind} source: {e:#}");
                    sources.failures.insert(kind, format!("{e:#}"));
                }
            }
        }
        sources
    }

    /// Build from already-loaded tables.
    pub fn from_tables(tables: impl IntoIterator<Item = (SourceKind, Table)>) -> Self {
        let mut sources = Sources::default();
        for (kind, table) in tables {
            sources.insert(kind, table);
        }
        sources
    }

    pub fn insert(&mut self, kind: SourceKind, table: Table) {
        self.failures.remove(&kind);
        self.tables.insert(kind, Arc::new(table));
    }

    pub fn get(&self, kind: SourceKind) -> Result<&Arc<Table>, TransformError> {
        self.tables
            .get(&kind)
            .ok_or_else(|| TransformError::SourceUnavailable {
                source_kind: kind,
                reason: self
                    .failures
                    .get(&kind)
                    .cloned()
                    .unwrap_or_else(|| "not loaded".to_string()),
            })
    }

    /// Short status line for the UI, e.g. `3/4 sources loaded`.
    pub fn summary(&self) -> String {
        format!("{}/{} sources loaded", self.tables.len(), SourceKind::ALL.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_reports_reason() {
        let dir = tempfile::tempdir().unwrap();
        let sources = Sources::load(dir.path(), &SourceFiles::default());
        let err = sources.get(SourceKind::Survey).unwrap_err();
        match err {
            TransformError::SourceUnavailable { source_kind, reason } => {
                assert_eq!(source_kind, SourceKind::Survey);
                assert!(reason.contains("mxmh_survey_results.csv"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(sources.summary(), "0/4 sources loaded");
    }

    #[test]
    fn test_insert_clears_failure() {
        let mut sources = Sources::default();
        sources.failures.insert(SourceKind::Events, "boom".into());
        sources.insert(SourceKind::Events, Table::new("events", vec![]));
        assert!(sources.get(SourceKind::Events).is_ok());
    }
}
