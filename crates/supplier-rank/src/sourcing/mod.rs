//! Supplier recommendation for a part: filter the history, aggregate per
//! supplier, score against the best in the set, and rank.

mod aggregate;
mod domain;
mod filter;
mod recommendation;
pub mod router;
mod scoring;
mod service;

pub use aggregate::{aggregate_by_supplier, SupplierPerformance};
pub use domain::{PartQuery, PurchaseOrderRecord, QueryError, YearFilter, ALL_YEARS_LABEL};
pub use filter::filter_records;
pub use recommendation::{
    NoRecommendationReason, RankedSupplier, Recommendation, RecommendationView, SupplierRanking,
};
pub use router::sourcing_router;
pub use scoring::{
    rank, score_suppliers, ScoreBreakdown, ScoredSupplier, LEAD_TIME_WEIGHT, PRICE_WEIGHT,
    RELIABILITY_WEIGHT,
};
pub use service::{rank_suppliers, SupplierRecommender};

#[cfg(test)]
mod tests;
