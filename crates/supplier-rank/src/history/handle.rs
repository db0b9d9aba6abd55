use super::{HistoryLoadError, HistoryLoader, LoadReport, NegativeLeadTimePolicy, RecordStore};
use crate::config::HistoryConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// Where a handle (re)loads its history from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySource {
    pub path: PathBuf,
    pub policy: NegativeLeadTimePolicy,
}

impl From<&HistoryConfig> for HistorySource {
    fn from(config: &HistoryConfig) -> Self {
        Self {
            path: config.path.clone(),
            policy: config.negative_lead_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DataStatus {
    Loaded { report: LoadReport },
    Unavailable { reason: String },
}

impl DataStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, DataStatus::Loaded { .. })
    }
}

/// A store together with how it came to be. Never mutated once published.
#[derive(Debug)]
pub struct HistorySnapshot {
    store: RecordStore,
    status: DataStatus,
    loaded_at: DateTime<Utc>,
}

impl HistorySnapshot {
    fn new(store: RecordStore, status: DataStatus) -> Self {
        Self {
            store,
            status,
            loaded_at: Utc::now(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn status(&self) -> &DataStatus {
        &self.status
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("history handle has no source to reload from")]
    NoSource,
    #[error(transparent)]
    Load(#[from] HistoryLoadError),
}

/// Shared, read-only access to the current purchase-order history.
///
/// Readers take a [`HistorySnapshot`] and work on it for the whole query; a reload
/// publishes a new snapshot and leaves snapshots already handed out untouched.
#[derive(Debug, Clone)]
pub struct HistoryHandle {
    source: Option<HistorySource>,
    current: Arc<RwLock<Arc<HistorySnapshot>>>,
}

impl HistoryHandle {
    /// Loads from `source`. A failed load yields an empty, unavailable history.
    pub fn load(source: HistorySource) -> Self {
        let snapshot = match HistoryLoader::from_path(&source.path, source.policy) {
            Ok(loaded) => HistorySnapshot::new(
                loaded.store,
                DataStatus::Loaded {
                    report: loaded.report,
                },
            ),
            Err(err) => {
                warn!(
                    path = %source.path.display(),
                    error = %err,
                    "purchase-order history unavailable"
                );
                HistorySnapshot::new(
                    RecordStore::empty(),
                    DataStatus::Unavailable {
                        reason: err.to_string(),
                    },
                )
            }
        };

        Self {
            source: Some(source),
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// Wraps an in-memory store that has no backing file.
    pub fn from_store(store: RecordStore) -> Self {
        let report = LoadReport {
            accepted: store.len(),
            ..LoadReport::default()
        };
        Self {
            source: None,
            current: Arc::new(RwLock::new(Arc::new(HistorySnapshot::new(
                store,
                DataStatus::Loaded { report },
            )))),
        }
    }

    pub fn snapshot(&self) -> Arc<HistorySnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in a new store wholesale.
    pub fn replace(&self, store: RecordStore, report: LoadReport) {
        self.publish(HistorySnapshot::new(store, DataStatus::Loaded { report }));
    }

    /// Re-reads the source. On failure the previous snapshot stays current.
    pub fn reload(&self) -> Result<LoadReport, ReloadError> {
        let source = self.source.as_ref().ok_or(ReloadError::NoSource)?;
        let loaded = HistoryLoader::from_path(&source.path, source.policy).map_err(|err| {
            warn!(
                path = %source.path.display(),
                error = %err,
                "reload failed; keeping previous history"
            );
            err
        })?;
        let report = loaded.report.clone();
        self.replace(loaded.store, loaded.report);
        Ok(report)
    }

    fn publish(&self, snapshot: HistorySnapshot) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }
}
