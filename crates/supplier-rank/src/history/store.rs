use crate::sourcing::PurchaseOrderRecord;
use std::collections::BTreeSet;

/// Immutable purchase-order history in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<PurchaseOrderRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<PurchaseOrderRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PurchaseOrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct part numbers, sorted.
    pub fn parts(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.part_number.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct suppliers, sorted.
    pub fn suppliers(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.supplier_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct reporting years, newest first.
    pub fn years(&self) -> Vec<i32> {
        newest_first(self.records.iter().map(|record| record.year))
    }

    pub fn years_for_part(&self, part_id: &str) -> Vec<i32> {
        newest_first(
            self.records
                .iter()
                .filter(|record| record.part_number == part_id)
                .map(|record| record.year),
        )
    }
}

fn newest_first(years: impl Iterator<Item = i32>) -> Vec<i32> {
    years.collect::<BTreeSet<_>>().into_iter().rev().collect()
}
