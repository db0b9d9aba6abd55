use super::aggregate::aggregate_by_supplier;
use super::domain::{PartQuery, PurchaseOrderRecord, QueryError};
use super::filter::filter_records;
use super::recommendation::{NoRecommendationReason, Recommendation, SupplierRanking};
use super::scoring::rank;
use crate::history::{HistorySnapshot, RecordStore};
use tracing::debug;

/// Runs filter, aggregation and scoring for one query against a store.
///
/// Stateless: identical inputs always produce identical output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SupplierRecommender;

impl SupplierRecommender {
    pub fn new() -> Self {
        Self
    }

    pub fn rank_suppliers(&self, store: &RecordStore, query: &PartQuery) -> Recommendation {
        let matching = filter_records(store.records(), query);
        let performance = aggregate_by_supplier(matching.iter().copied());
        let ranked = rank(&performance);

        debug!(
            part_id = query.part_id(),
            year = %query.year(),
            orders = matching.len(),
            suppliers = ranked.len(),
            "ranked suppliers"
        );

        match SupplierRanking::from_ranked(ranked) {
            Some(ranking) => Recommendation::Ranked(ranking),
            None => Recommendation::NoRecommendation {
                reason: NoRecommendationReason::NoMatch,
            },
        }
    }

    /// Like [`rank_suppliers`](Self::rank_suppliers) but reports an unavailable
    /// history instead of treating it as an empty match.
    pub fn recommend(&self, snapshot: &HistorySnapshot, query: &PartQuery) -> Recommendation {
        if !snapshot.status().is_available() {
            return Recommendation::NoRecommendation {
                reason: NoRecommendationReason::DataUnavailable,
            };
        }
        self.rank_suppliers(snapshot.store(), query)
    }

    /// Raw purchase orders behind a recommendation, in history order.
    pub fn order_log<'a>(
        &self,
        store: &'a RecordStore,
        query: &PartQuery,
    ) -> Vec<&'a PurchaseOrderRecord> {
        filter_records(store.records(), query)
    }
}

/// Entry point taking the raw part and year strings a dashboard submits.
pub fn rank_suppliers(
    store: &RecordStore,
    part_id: &str,
    year: &str,
) -> Result<Recommendation, QueryError> {
    let query = PartQuery::parse(part_id, year)?;
    Ok(SupplierRecommender::new().rank_suppliers(store, &query))
}
