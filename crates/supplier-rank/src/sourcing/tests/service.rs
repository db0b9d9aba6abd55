use super::common::*;
use crate::history::{HistoryHandle, HistorySource, NegativeLeadTimePolicy, RecordStore};
use crate::sourcing::{
    rank_suppliers, NoRecommendationReason, PartQuery, QueryError, Recommendation,
    SupplierRecommender, YearFilter,
};
use std::path::PathBuf;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn ranks_suppliers_for_part_and_year() {
    let store = sample_store();
    let query = PartQuery::new("PART-0001", YearFilter::Year(2024)).expect("query");
    let recommendation = SupplierRecommender::new().rank_suppliers(&store, &query);

    let ranking = recommendation.ranking().expect("ranking available");
    let names: Vec<_> = ranking
        .entries()
        .iter()
        .map(|entry| entry.supplier_name.as_str())
        .collect();
    assert_eq!(names, vec!["Supplier B", "Supplier A", "Supplier C"]);

    let best = ranking.best();
    assert_eq!(best.rank, 1);
    assert_eq!(best.supplier_name, "Supplier B");
    assert_close(best.avg_price, 50.0);
    assert_close(best.avg_lead_time, 10.0);
    assert_close(best.otd_percent, 80.0);
    assert_close(best.score, 0.70);
    assert_eq!(best.order_count, 5);

    assert_close(ranking.entries()[1].score, 0.62);
    assert_close(ranking.entries()[2].score, 0.55);
    assert_eq!(ranking.entries()[2].rank, 3);
}

#[test]
fn all_years_includes_older_orders() {
    let store = sample_store();
    let recommendation =
        rank_suppliers(&store, "PART-0001", "All Years").expect("valid query");
    let ranking = recommendation.ranking().expect("ranking available");
    let supplier_c = ranking
        .entries()
        .iter()
        .find(|entry| entry.supplier_name == "Supplier C")
        .expect("supplier C present");
    assert_eq!(supplier_c.order_count, 3);
    assert_close(supplier_c.avg_price, 580.0 / 3.0);
}

#[test]
fn single_supplier_is_always_recommended() {
    let store = sample_store();
    let recommendation = rank_suppliers(&store, "PART-0001", "2023").expect("valid query");
    let best = recommendation.best().expect("recommendation");
    assert_eq!(best.supplier_name, "Supplier C");
    assert_close(best.breakdown.price, 0.4);
    assert_close(best.breakdown.lead_time, 0.3);
}

#[test]
fn no_matching_orders_is_an_explicit_no_recommendation() {
    let store = sample_store();
    for (part, year) in [("PART-0002", "2024"), ("PART-9999", "All Years")] {
        let recommendation = rank_suppliers(&store, part, year).expect("valid query");
        assert_eq!(
            recommendation,
            Recommendation::NoRecommendation {
                reason: NoRecommendationReason::NoMatch
            }
        );
        assert!(recommendation.best().is_none());
    }

    let empty = RecordStore::empty();
    assert!(rank_suppliers(&empty, "PART-0001", "All Years")
        .expect("valid query")
        .ranking()
        .is_none());
}

#[test]
fn invalid_inputs_surface_query_errors() {
    let store = sample_store();
    assert_eq!(
        rank_suppliers(&store, "", "2024"),
        Err(QueryError::EmptyPartId)
    );
    assert!(matches!(
        rank_suppliers(&store, "PART-0001", "twenty"),
        Err(QueryError::InvalidYear { .. })
    ));
}

#[test]
fn unavailable_history_is_reported_as_such() {
    let handle = HistoryHandle::load(HistorySource {
        path: PathBuf::from("./missing-supplier-history.csv"),
        policy: NegativeLeadTimePolicy::Keep,
    });
    let query = PartQuery::new("PART-0001", YearFilter::All).expect("query");
    let recommendation = SupplierRecommender::new().recommend(&handle.snapshot(), &query);
    assert_eq!(
        recommendation,
        Recommendation::NoRecommendation {
            reason: NoRecommendationReason::DataUnavailable
        }
    );
}

#[test]
fn repeated_queries_are_bit_identical() {
    let handle = HistoryHandle::from_store(sample_store());
    let query = PartQuery::new("PART-0001", YearFilter::All).expect("query");
    let recommender = SupplierRecommender::new();

    let first = recommender.recommend(&handle.snapshot(), &query);
    let second = recommender.recommend(&handle.snapshot(), &query);
    assert_eq!(first, second);

    let bits = |recommendation: &Recommendation| -> Vec<u64> {
        recommendation
            .ranking()
            .map(|ranking| ranking.entries().iter().map(|e| e.score.to_bits()).collect())
            .unwrap_or_default()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn order_log_returns_matching_rows_in_history_order() {
    let store = sample_store();
    let query = PartQuery::new("PART-0001", YearFilter::Year(2024)).expect("query");
    let orders = SupplierRecommender::new().order_log(&store, &query);
    assert_eq!(orders.len(), 9);
    assert_eq!(orders[0].supplier_name, "Supplier A");
    assert!(orders.iter().all(|order| order.year == 2024));
}
