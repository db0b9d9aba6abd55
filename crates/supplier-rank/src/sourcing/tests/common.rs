use crate::history::RecordStore;
use crate::sourcing::domain::PurchaseOrderRecord;
use chrono::{Duration, NaiveDate};

/// Builds an order created on `created`, promised `promised_in` days later and
/// delivered after `lead_days`.
pub(crate) fn order(
    supplier: &str,
    part: &str,
    price: f64,
    created: NaiveDate,
    promised_in: i64,
    lead_days: i64,
) -> PurchaseOrderRecord {
    PurchaseOrderRecord::new(
        supplier,
        part,
        price,
        created,
        created + Duration::days(promised_in),
        created + Duration::days(lead_days),
    )
}

pub(crate) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// PART-0001 has three suppliers in 2024 and one in 2023; PART-0002 only has 2023 data.
pub(crate) fn sample_store() -> RecordStore {
    RecordStore::new(vec![
        // Supplier A: avg price 100, avg lead 5, always on time
        order("Supplier A", "PART-0001", 90.0, day(2024, 1, 10), 7, 4),
        order("Supplier A", "PART-0001", 110.0, day(2024, 3, 2), 7, 6),
        // Supplier B: price 50, lead 10, 4 of 5 on time
        order("Supplier B", "PART-0001", 50.0, day(2024, 2, 1), 10, 10),
        order("Supplier B", "PART-0001", 50.0, day(2024, 4, 1), 10, 10),
        order("Supplier B", "PART-0001", 50.0, day(2024, 5, 1), 10, 10),
        order("Supplier B", "PART-0001", 50.0, day(2024, 6, 1), 10, 10),
        order("Supplier B", "PART-0001", 50.0, day(2024, 7, 1), 8, 10),
        // Supplier C: price 200, lead 2, half on time
        order("Supplier C", "PART-0001", 200.0, day(2024, 1, 20), 2, 2),
        order("Supplier C", "PART-0001", 200.0, day(2024, 8, 20), 1, 2),
        // 2023 history for PART-0001 only from Supplier C
        order("Supplier C", "PART-0001", 180.0, day(2023, 11, 5), 3, 3),
        order("Supplier A", "PART-0002", 20.0, day(2023, 6, 1), 14, 12),
    ])
}
