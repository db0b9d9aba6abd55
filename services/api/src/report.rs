use crate::infra::open_history;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use supplier_rank::config::AppConfig;
use supplier_rank::error::AppError;
use supplier_rank::history::{DataStatus, HistorySnapshot};
use supplier_rank::sourcing::{
    PartQuery, PurchaseOrderRecord, Recommendation, SupplierRecommender, ALL_YEARS_LABEL,
};

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Part number to source (e.g. PART-0001)
    #[arg(long)]
    pub(crate) part: String,
    /// Analysis year (YYYY) or "All Years"
    #[arg(long, default_value = ALL_YEARS_LABEL)]
    pub(crate) year: String,
    /// Purchase-order history CSV (defaults to SUPPLIER_HISTORY_PATH)
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
    /// Include the raw purchase orders behind the ranking
    #[arg(long)]
    pub(crate) show_orders: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PartsArgs {
    /// Purchase-order history CSV (defaults to SUPPLIER_HISTORY_PATH)
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        part,
        year,
        history,
        show_orders,
    } = args;

    let query = PartQuery::parse(&part, &year)?;
    let config = AppConfig::load()?;
    let handle = open_history(&config.history, history);
    let snapshot = handle.snapshot();

    let recommender = SupplierRecommender::new();
    let recommendation = recommender.recommend(&snapshot, &query);
    let orders = if show_orders {
        Some(recommender.order_log(snapshot.store(), &query))
    } else {
        None
    };

    write_recommendation(
        &mut io::stdout().lock(),
        &snapshot,
        &query,
        &recommendation,
        orders.as_deref(),
        Local::now().date_naive(),
    )?;
    Ok(())
}

pub(crate) fn run_parts(args: PartsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let handle = open_history(&config.history, args.history);
    write_catalogue(&mut io::stdout().lock(), &handle.snapshot())?;
    Ok(())
}

pub(crate) fn write_recommendation(
    out: &mut impl Write,
    snapshot: &HistorySnapshot,
    query: &PartQuery,
    recommendation: &Recommendation,
    orders: Option<&[&PurchaseOrderRecord]>,
    generated_on: NaiveDate,
) -> io::Result<()> {
    writeln!(out, "Supplier recommendation analytics")?;
    writeln!(
        out,
        "Part {} | {} | generated {}",
        query.part_id(),
        query.year(),
        generated_on
    )?;

    let ranking = match recommendation {
        Recommendation::Ranked(ranking) => ranking,
        Recommendation::NoRecommendation { reason } => {
            writeln!(out, "\nNo recommendation: {}", reason.label())?;
            if let DataStatus::Unavailable { reason } = snapshot.status() {
                writeln!(out, "Data source missing: {}", reason)?;
            }
            return Ok(());
        }
    };

    let best = ranking.best();
    writeln!(out, "\nDecision conclusion: {}", best.supplier_name)?;
    writeln!(
        out,
        "Recommended for {} based on {} performance data.",
        query.part_id(),
        query.year()
    )?;
    writeln!(out, "- Unit price: average of ${:.2}", best.avg_price)?;
    writeln!(out, "- Lead time: delivered in {:.1} Days", best.avg_lead_time)?;
    writeln!(out, "- Reliability: {:.1}% on-time delivery", best.otd_percent)?;

    writeln!(out, "\nComparative performance matrix")?;
    writeln!(
        out,
        "{:<4} {:<24} {:>14} {:>16} {:>8} {:>7} {:>7}",
        "Rank", "Supplier Name", "Unit Price ($)", "Lead Time (Days)", "OTD %", "Score", "Orders"
    )?;
    for entry in ranking.entries() {
        writeln!(
            out,
            "{:<4} {:<24} {:>14} {:>16.1} {:>7.1}% {:>7.3} {:>7}",
            entry.rank,
            entry.supplier_name,
            format!("${:.2}", entry.avg_price),
            entry.avg_lead_time,
            entry.otd_percent,
            entry.score,
            entry.order_count
        )?;
    }

    if let Some(orders) = orders {
        writeln!(out, "\nRaw PO data: {}", query.part_id())?;
        for order in orders {
            writeln!(
                out,
                "- {} | {} | ${:.2} | created {} | promised {} | delivered {} | {} days | {}",
                order.po_number.as_deref().unwrap_or("-"),
                order.supplier_name,
                order.price,
                order.po_created_date,
                order.promised_date,
                order.delivered_date,
                order.delivery_speed_days,
                if order.on_time { "on time" } else { "late" }
            )?;
        }
    }

    Ok(())
}

pub(crate) fn write_catalogue(out: &mut impl Write, snapshot: &HistorySnapshot) -> io::Result<()> {
    match snapshot.status() {
        DataStatus::Loaded { report } => {
            writeln!(
                out,
                "{} purchase orders loaded ({} dropped, {} reconciled)",
                report.accepted,
                report.dropped_total(),
                report.reconciled
            )?;
            for (reason, count) in &report.dropped {
                writeln!(out, "  - {}: {}", reason.label(), count)?;
            }
        }
        DataStatus::Unavailable { reason } => {
            writeln!(out, "Data source missing: {}", reason)?;
            return Ok(());
        }
    }

    let store = snapshot.store();
    let years: Vec<String> = std::iter::once(ALL_YEARS_LABEL.to_string())
        .chain(store.years().iter().map(i32::to_string))
        .collect();
    writeln!(out, "Analysis years: {}", years.join(", "))?;
    writeln!(out, "Part numbers")?;
    for part in store.parts() {
        writeln!(out, "- {}", part)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplier_rank::history::{HistoryHandle, HistorySource, NegativeLeadTimePolicy, RecordStore};
    use supplier_rank::sourcing::YearFilter;

    fn rendered(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer).expect("in-memory write succeeds");
        String::from_utf8(buffer).expect("report is utf-8")
    }

    /// Accepts a fixed number of bytes, then reports a closed pipe.
    struct ClosedAfter(usize);

    impl Write for ClosedAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.0 == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
            }
            let accepted = buf.len().min(self.0);
            self.0 -= accepted;
            Ok(accepted)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn store() -> RecordStore {
        RecordStore::new(vec![
            PurchaseOrderRecord::new(
                "Supplier A",
                "PART-0001",
                100.0,
                day(2024, 1, 1),
                day(2024, 1, 8),
                day(2024, 1, 6),
            )
            .with_po_number("PO-1"),
            PurchaseOrderRecord::new(
                "Supplier B",
                "PART-0001",
                120.0,
                day(2024, 2, 1),
                day(2024, 2, 5),
                day(2024, 2, 9),
            ),
        ])
    }

    #[test]
    fn renders_conclusion_and_matrix() {
        let handle = HistoryHandle::from_store(store());
        let snapshot = handle.snapshot();
        let query = PartQuery::new("PART-0001", YearFilter::Year(2024)).expect("query");
        let recommender = SupplierRecommender::new();
        let recommendation = recommender.recommend(&snapshot, &query);
        let orders = recommender.order_log(snapshot.store(), &query);

        let text = rendered(|out| {
            write_recommendation(
                out,
                &snapshot,
                &query,
                &recommendation,
                Some(orders.as_slice()),
                day(2025, 1, 1),
            )
        });

        assert!(text.contains("Decision conclusion: Supplier A"));
        assert!(text.contains("average of $100.00"));
        assert!(text.contains("delivered in 5.0 Days"));
        assert!(text.contains("100.0% on-time delivery"));
        assert!(text.contains("Supplier B"));
        assert!(text.contains("PO-1 | Supplier A"));
        assert!(text.contains("late"));
    }

    #[test]
    fn renders_missing_data_state() {
        let handle = HistoryHandle::load(HistorySource {
            path: PathBuf::from("./missing-history.csv"),
            policy: NegativeLeadTimePolicy::Keep,
        });
        let snapshot = handle.snapshot();
        let query = PartQuery::new("PART-0001", YearFilter::All).expect("query");
        let recommendation = SupplierRecommender::new().recommend(&snapshot, &query);

        let text = rendered(|out| {
            write_recommendation(out, &snapshot, &query, &recommendation, None, day(2025, 1, 1))
        });
        assert!(text.contains("No recommendation: purchase-order history is unavailable"));
        assert!(text.contains("Data source missing"));

        let catalogue = rendered(|out| write_catalogue(out, &snapshot));
        assert!(catalogue.starts_with("Data source missing"));
    }

    #[test]
    fn catalogue_lists_years_newest_first() {
        let handle = HistoryHandle::from_store(store());
        let snapshot = handle.snapshot();
        let text = rendered(|out| write_catalogue(out, &snapshot));
        assert!(text.contains("2 purchase orders loaded"));
        assert!(text.contains("Analysis years: All Years, 2024"));
        assert!(text.contains("- PART-0001"));
    }

    #[test]
    fn write_failures_are_reported() {
        let handle = HistoryHandle::from_store(store());
        let snapshot = handle.snapshot();
        let query = PartQuery::new("PART-0001", YearFilter::All).expect("query");
        let recommendation = SupplierRecommender::new().recommend(&snapshot, &query);

        let err = write_recommendation(
            &mut ClosedAfter(40),
            &snapshot,
            &query,
            &recommendation,
            None,
            day(2025, 1, 1),
        )
        .expect_err("closed output surfaces an error");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        let err = write_catalogue(&mut ClosedAfter(0), &snapshot).expect_err("closed output");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
