//! Ratio-to-best scoring of supplier aggregates.
//!
//! Each factor is normalized against the best value in the comparison set, so the
//! cheapest and the fastest supplier score 1.0 on price and lead time respectively.
//! Reliability contributes its on-time fraction directly.

use super::aggregate::SupplierPerformance;
use serde::Serialize;
use std::cmp::Ordering;

pub const PRICE_WEIGHT: f64 = 0.4;
pub const LEAD_TIME_WEIGHT: f64 = 0.3;
pub const RELIABILITY_WEIGHT: f64 = 0.3;

/// Weighted contribution of each factor to a supplier's score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub price: f64,
    pub lead_time: f64,
    pub reliability: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.price + self.lead_time + self.reliability
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSupplier {
    pub performance: SupplierPerformance,
    pub breakdown: ScoreBreakdown,
    pub score: f64,
}

/// Best (lowest) price and lead time across the comparison set.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Benchmarks {
    min_price: f64,
    min_lead_time: f64,
}

impl Benchmarks {
    fn from_set(set: &[SupplierPerformance]) -> Option<Self> {
        let min_price = set.iter().map(|p| p.avg_price).reduce(f64::min)?;
        let min_lead_time = set.iter().map(|p| p.avg_lead_time).reduce(f64::min)?;
        Some(Self {
            min_price: clamp_benchmark(min_price),
            min_lead_time: clamp_benchmark(min_lead_time),
        })
    }
}

/// A non-positive best value would collapse every ratio, so 1 stands in for it.
fn clamp_benchmark(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        1.0
    }
}

/// Only an exact zero is replaced; negative averages pass through unchanged.
fn clamp_denominator(value: f64) -> f64 {
    if value == 0.0 {
        1.0
    } else {
        value
    }
}

fn breakdown(performance: &SupplierPerformance, benchmarks: Benchmarks) -> ScoreBreakdown {
    ScoreBreakdown {
        price: PRICE_WEIGHT * (benchmarks.min_price / clamp_denominator(performance.avg_price)),
        lead_time: LEAD_TIME_WEIGHT
            * (benchmarks.min_lead_time / clamp_denominator(performance.avg_lead_time)),
        reliability: RELIABILITY_WEIGHT * performance.otd_rate,
    }
}

/// Scores every supplier in the set, keeping the input order.
pub fn score_suppliers(set: &[SupplierPerformance]) -> Vec<ScoredSupplier> {
    let Some(benchmarks) = Benchmarks::from_set(set) else {
        return Vec::new();
    };

    set.iter()
        .map(|performance| {
            let breakdown = breakdown(performance, benchmarks);
            ScoredSupplier {
                performance: performance.clone(),
                score: breakdown.total(),
                breakdown,
            }
        })
        .collect()
}

/// Scores and sorts by descending score. Exact ties keep the aggregation order;
/// a score that is not a number ranks below every real score.
pub fn rank(set: &[SupplierPerformance]) -> Vec<ScoredSupplier> {
    let mut scored = score_suppliers(set);
    scored.sort_by(|a, b| descending(a.score, b.score));
    scored
}

fn descending(a: f64, b: f64) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

fn sort_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}
