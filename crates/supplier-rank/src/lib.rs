//! Supplier recommendation engine: ingests purchase-order history, aggregates
//! per-supplier price, lead time and on-time delivery, and ranks suppliers for a part.

pub mod config;
pub mod error;
pub mod history;
pub mod sourcing;
pub mod telemetry;
