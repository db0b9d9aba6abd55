use super::domain::PartQuery;
use super::scoring::{ScoreBreakdown, ScoredSupplier};
use serde::Serialize;

/// One row of the comparative performance matrix, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSupplier {
    pub rank: usize,
    pub supplier_name: String,
    pub avg_price: f64,
    pub avg_lead_time: f64,
    pub otd_percent: f64,
    pub score: f64,
    pub order_count: usize,
    pub breakdown: ScoreBreakdown,
}

impl RankedSupplier {
    fn from_scored(rank: usize, scored: ScoredSupplier) -> Self {
        let otd_percent = scored.performance.otd_percent();
        Self {
            rank,
            supplier_name: scored.performance.supplier_name,
            avg_price: scored.performance.avg_price,
            avg_lead_time: scored.performance.avg_lead_time,
            otd_percent,
            score: scored.score,
            order_count: scored.performance.order_count,
            breakdown: scored.breakdown,
        }
    }
}

/// Non-empty ranking; the first entry is the recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierRanking {
    recommended: RankedSupplier,
    suppliers: Vec<RankedSupplier>,
}

impl SupplierRanking {
    /// Returns `None` for an empty ranking so callers cannot fabricate a winner.
    pub fn from_ranked(ranked: Vec<ScoredSupplier>) -> Option<Self> {
        let suppliers: Vec<RankedSupplier> = ranked
            .into_iter()
            .enumerate()
            .map(|(index, scored)| RankedSupplier::from_scored(index + 1, scored))
            .collect();
        let recommended = suppliers.first()?.clone();
        Some(Self {
            recommended,
            suppliers,
        })
    }

    pub fn best(&self) -> &RankedSupplier {
        &self.recommended
    }

    pub fn entries(&self) -> &[RankedSupplier] {
        &self.suppliers
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoRecommendationReason {
    /// No purchase orders match the part and year.
    NoMatch,
    /// The purchase-order history could not be loaded.
    DataUnavailable,
}

impl NoRecommendationReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoMatch => "no purchase orders match this part and year",
            Self::DataUnavailable => "purchase-order history is unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    Ranked(SupplierRanking),
    NoRecommendation { reason: NoRecommendationReason },
}

impl Recommendation {
    pub fn ranking(&self) -> Option<&SupplierRanking> {
        match self {
            Self::Ranked(ranking) => Some(ranking),
            Self::NoRecommendation { .. } => None,
        }
    }

    pub fn best(&self) -> Option<&RankedSupplier> {
        self.ranking().map(SupplierRanking::best)
    }
}

/// JSON envelope pairing a recommendation with the question it answers.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub part_id: String,
    pub year: String,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

impl RecommendationView {
    pub fn new(query: &PartQuery, recommendation: Recommendation) -> Self {
        Self {
            part_id: query.part_id().to_string(),
            year: query.year().label(),
            recommendation,
        }
    }
}
