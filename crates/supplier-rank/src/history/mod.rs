//! Purchase-order history ingestion.
//!
//! The CSV export is parsed into an immutable [`RecordStore`]. Rows that cannot be
//! trusted are dropped and tallied in a [`LoadReport`]; only a missing or unreadable
//! file fails the load as a whole.

mod handle;
mod parser;
mod store;

pub use handle::{DataStatus, HistoryHandle, HistorySnapshot, HistorySource, ReloadError};
pub use store::RecordStore;

use parser::HistoryRow;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// What to do with rows delivered before the PO was raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeLeadTimePolicy {
    #[default]
    Keep,
    Drop,
}

impl NegativeLeadTimePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" => Some(Self::Keep),
            "drop" => Some(Self::Drop),
            _ => None,
        }
    }
}

/// Why a row was left out of the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Unreadable,
    MissingSupplier,
    MissingPart,
    InvalidPrice,
    InvalidDate,
    InvalidYear,
    PromiseBeforeOrder,
    NegativeLeadTime,
}

impl DropReason {
    pub fn label(&self) -> &'static str {
        match self {
            DropReason::Unreadable => "row could not be decoded",
            DropReason::MissingSupplier => "missing supplier name",
            DropReason::MissingPart => "missing part number",
            DropReason::InvalidPrice => "price is not a number",
            DropReason::InvalidDate => "unparseable or missing date",
            DropReason::InvalidYear => "year is not a four digit number",
            DropReason::PromiseBeforeOrder => "promise date precedes PO creation",
            DropReason::NegativeLeadTime => "delivered before the PO was created",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub accepted: usize,
    pub dropped: BTreeMap<DropReason, usize>,
    /// Accepted rows whose stated lead time, delay or on-time flag contradicted their dates.
    pub reconciled: usize,
}

impl LoadReport {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }
}

#[derive(Debug)]
pub struct LoadedHistory {
    pub store: RecordStore,
    pub report: LoadReport,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryLoadError {
    #[error("failed to read purchase-order history: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid purchase-order CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("purchase-order CSV is missing the '{0}' column")]
    MissingColumn(&'static str),
}

pub struct HistoryLoader;

impl HistoryLoader {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        policy: NegativeLeadTimePolicy,
    ) -> Result<LoadedHistory, HistoryLoadError> {
        let file = std::fs::File::open(path.as_ref())?;
        let loaded = Self::from_reader(file, policy)?;
        info!(
            path = %path.as_ref().display(),
            accepted = loaded.report.accepted,
            dropped = loaded.report.dropped_total(),
            reconciled = loaded.report.reconciled,
            "purchase-order history loaded"
        );
        Ok(loaded)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        policy: NegativeLeadTimePolicy,
    ) -> Result<LoadedHistory, HistoryLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for column in parser::REQUIRED_COLUMNS {
            if !headers
                .iter()
                .any(|header| header.trim_start_matches('\u{feff}') == *column)
            {
                return Err(HistoryLoadError::MissingColumn(*column));
            }
        }

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for (index, row) in csv_reader.deserialize::<HistoryRow>().enumerate() {
            // header occupies line 1
            let line = index + 2;
            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => {
                    debug!(line, error = %err, "dropping undecodable purchase-order row");
                    report.record_drop(DropReason::Unreadable);
                    continue;
                }
            };

            match row.into_record(policy) {
                Ok(parsed) => {
                    if parsed.reconciled {
                        debug!(line, "stated delivery metrics replaced with date-derived values");
                        report.reconciled += 1;
                    }
                    records.push(parsed.record);
                }
                Err(reason) => {
                    debug!(line, reason = reason.label(), "dropping purchase-order row");
                    report.record_drop(reason);
                }
            }
        }

        report.accepted = records.len();
        Ok(LoadedHistory {
            store: RecordStore::new(records),
            report,
        })
    }
}
