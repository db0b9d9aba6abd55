use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Label used by the dashboard for the "every year" choice.
pub const ALL_YEARS_LABEL: &str = "All Years";

/// One purchase order as it was placed with, and fulfilled by, a supplier.
///
/// `delivery_speed_days`, `delay_days` and `on_time` are always derived from the
/// three dates so they cannot disagree with them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrderRecord {
    pub supplier_name: String,
    pub part_number: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,
    pub po_created_date: NaiveDate,
    pub promised_date: NaiveDate,
    pub delivered_date: NaiveDate,
    pub delivery_speed_days: i64,
    pub delay_days: i64,
    pub on_time: bool,
    pub year: i32,
}

impl PurchaseOrderRecord {
    pub fn new(
        supplier_name: impl Into<String>,
        part_number: impl Into<String>,
        price: f64,
        po_created_date: NaiveDate,
        promised_date: NaiveDate,
        delivered_date: NaiveDate,
    ) -> Self {
        Self {
            supplier_name: supplier_name.into(),
            part_number: part_number.into(),
            price,
            po_number: None,
            po_created_date,
            promised_date,
            delivered_date,
            delivery_speed_days: (delivered_date - po_created_date).num_days(),
            delay_days: (delivered_date - promised_date).num_days(),
            on_time: delivered_date <= promised_date,
            year: po_created_date.year(),
        }
    }

    pub fn with_po_number(mut self, po_number: impl Into<String>) -> Self {
        self.po_number = Some(po_number.into());
        self
    }

    /// Overrides the reporting year, e.g. when the export carries a fiscal year column.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }
}

/// Restricts a query to one reporting year or leaves it open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// Accepts `"All Years"` (any case), an empty string, or a four digit year.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_YEARS_LABEL) {
            return Ok(Self::All);
        }

        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QueryError::InvalidYear {
                value: raw.to_string(),
            });
        }

        trimmed
            .parse::<i32>()
            .map(Self::Year)
            .map_err(|_| QueryError::InvalidYear {
                value: raw.to_string(),
            })
    }

    pub fn matches(&self, year: i32) -> bool {
        match self {
            Self::All => true,
            Self::Year(expected) => *expected == year,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_YEARS_LABEL),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

/// A validated (part, year) question put to the recommender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartQuery {
    part_id: String,
    year: YearFilter,
}

impl PartQuery {
    pub fn new(part_id: impl Into<String>, year: YearFilter) -> Result<Self, QueryError> {
        let part_id = part_id.into().trim().to_string();
        if part_id.is_empty() {
            return Err(QueryError::EmptyPartId);
        }
        Ok(Self { part_id, year })
    }

    /// Builds a query from the raw strings a form or URL hands over.
    pub fn parse(part_id: &str, year: &str) -> Result<Self, QueryError> {
        Self::new(part_id, YearFilter::parse(year)?)
    }

    pub fn part_id(&self) -> &str {
        &self.part_id
    }

    pub fn year(&self) -> YearFilter {
        self.year
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("part identifier must not be empty")]
    EmptyPartId,
    #[error("year '{value}' is neither a four digit year nor \"All Years\"")]
    InvalidYear { value: String },
}
