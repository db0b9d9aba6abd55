use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use supplier_rank::config::HistoryConfig;
use supplier_rank::history::{HistoryHandle, HistorySource};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolves the history source, letting a command-line path win over configuration.
pub(crate) fn history_source(
    config: &HistoryConfig,
    override_path: Option<PathBuf>,
) -> HistorySource {
    let mut source = HistorySource::from(config);
    if let Some(path) = override_path {
        source.path = path;
    }
    source
}

pub(crate) fn open_history(
    config: &HistoryConfig,
    override_path: Option<PathBuf>,
) -> HistoryHandle {
    HistoryHandle::load(history_source(config, override_path))
}
