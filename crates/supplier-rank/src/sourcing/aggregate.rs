use super::domain::PurchaseOrderRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean price, lead time and on-time rate for one supplier over a filtered slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierPerformance {
    pub supplier_name: String,
    pub avg_price: f64,
    pub avg_lead_time: f64,
    /// Fraction in `[0, 1]`.
    pub otd_rate: f64,
    pub order_count: usize,
}

impl SupplierPerformance {
    pub fn otd_percent(&self) -> f64 {
        self.otd_rate * 100.0
    }
}

#[derive(Debug, Default)]
struct SupplierAccumulator {
    /// Running mean; a plain sum of large finite prices can overflow to infinity.
    mean_price: f64,
    lead_time_total: i64,
    on_time: usize,
    orders: usize,
}

impl SupplierAccumulator {
    fn push(&mut self, record: &PurchaseOrderRecord) {
        self.orders += 1;
        self.mean_price += (record.price - self.mean_price) / self.orders as f64;
        self.lead_time_total += record.delivery_speed_days;
        if record.on_time {
            self.on_time += 1;
        }
    }

    fn finish(self, supplier_name: String) -> SupplierPerformance {
        let orders = self.orders as f64;
        SupplierPerformance {
            supplier_name,
            avg_price: self.mean_price,
            avg_lead_time: self.lead_time_total as f64 / orders,
            otd_rate: self.on_time as f64 / orders,
            order_count: self.orders,
        }
    }
}

/// Groups records by supplier and finalizes the means in one pass.
///
/// Output is ordered by supplier name; suppliers without a matching record never
/// appear and an empty input produces an empty vector.
pub fn aggregate_by_supplier<'a, I>(records: I) -> Vec<SupplierPerformance>
where
    I: IntoIterator<Item = &'a PurchaseOrderRecord>,
{
    let mut groups: BTreeMap<&'a str, SupplierAccumulator> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.supplier_name.as_str())
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|(supplier, accumulator)| accumulator.finish(supplier.to_string()))
        .collect()
}
