use super::domain::{PartQuery, PurchaseOrderRecord};

/// Narrows the history to one part and, when requested, one year.
///
/// Returns borrowed rows in history order; an empty result is a normal outcome.
pub fn filter_records<'a>(
    records: &'a [PurchaseOrderRecord],
    query: &PartQuery,
) -> Vec<&'a PurchaseOrderRecord> {
    records
        .iter()
        .filter(|record| {
            record.part_number == query.part_id() && query.year().matches(record.year)
        })
        .collect()
}
