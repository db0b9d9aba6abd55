use super::{DropReason, NegativeLeadTimePolicy};
use crate::sourcing::PurchaseOrderRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub(crate) const REQUIRED_COLUMNS: &[&str] = &[
    "Supplier_Name",
    "Part_Number",
    "Price_USD",
    "PO_Created_Date",
    "Original_Promise_Date",
    "Supplier_Delivered_Date",
];

/// Raw CSV row; every column is optional text so that typing errors surface as
/// drop reasons instead of aborting the whole file.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryRow {
    #[serde(rename = "Supplier_Name", default, deserialize_with = "empty_string_as_none")]
    supplier_name: Option<String>,
    #[serde(rename = "Part_Number", default, deserialize_with = "empty_string_as_none")]
    part_number: Option<String>,
    #[serde(rename = "Price_USD", default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(rename = "PO_Number", default, deserialize_with = "empty_string_as_none")]
    po_number: Option<String>,
    #[serde(rename = "PO_Created_Date", default, deserialize_with = "empty_string_as_none")]
    po_created: Option<String>,
    #[serde(
        rename = "Original_Promise_Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    promised: Option<String>,
    #[serde(
        rename = "Supplier_Delivered_Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    delivered: Option<String>,
    #[serde(
        rename = "Delivery_Speed_Days",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    delivery_speed_days: Option<String>,
    #[serde(rename = "Delay_Days", default, deserialize_with = "empty_string_as_none")]
    delay_days: Option<String>,
    #[serde(
        rename = "On_Time_Delivery",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    on_time: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "empty_string_as_none")]
    year: Option<String>,
}

/// A validated row plus whether its stated metrics had to be replaced.
#[derive(Debug)]
pub(crate) struct ParsedRow {
    pub(crate) record: PurchaseOrderRecord,
    pub(crate) reconciled: bool,
}

impl HistoryRow {
    pub(crate) fn into_record(
        self,
        policy: NegativeLeadTimePolicy,
    ) -> Result<ParsedRow, DropReason> {
        let supplier_name = self.supplier_name.ok_or(DropReason::MissingSupplier)?;
        let part_number = self.part_number.ok_or(DropReason::MissingPart)?;
        let price = self
            .price
            .as_deref()
            .and_then(parse_price)
            .ok_or(DropReason::InvalidPrice)?;

        let created = required_date(self.po_created.as_deref())?;
        let promised = required_date(self.promised.as_deref())?;
        let delivered = required_date(self.delivered.as_deref())?;
        if promised < created {
            return Err(DropReason::PromiseBeforeOrder);
        }

        let mut record = PurchaseOrderRecord::new(
            supplier_name,
            part_number,
            price,
            created,
            promised,
            delivered,
        );
        if record.delivery_speed_days < 0 && policy == NegativeLeadTimePolicy::Drop {
            return Err(DropReason::NegativeLeadTime);
        }

        if let Some(raw) = self.year.as_deref() {
            record = record.with_year(parse_year(raw).ok_or(DropReason::InvalidYear)?);
        }
        if let Some(po_number) = self.po_number {
            record = record.with_po_number(po_number);
        }

        let reconciled = disagrees(self.delivery_speed_days.as_deref(), |raw| {
            parse_whole_number(raw) == Some(record.delivery_speed_days)
        }) || disagrees(self.delay_days.as_deref(), |raw| {
            parse_whole_number(raw) == Some(record.delay_days)
        }) || disagrees(self.on_time.as_deref(), |raw| {
            parse_flag(raw) == Some(record.on_time)
        });

        Ok(ParsedRow { record, reconciled })
    }
}

fn disagrees(stated: Option<&str>, agrees: impl Fn(&str) -> bool) -> bool {
    stated.is_some_and(|raw| !agrees(raw))
}

fn required_date(value: Option<&str>) -> Result<NaiveDate, DropReason> {
    value.and_then(parse_date).ok_or(DropReason::InvalidDate)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

fn parse_price(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|price| price.is_finite())
}

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Dates arrive as ISO dates, as zone-less timestamps, or as RFC 3339. Timestamps
/// keep the calendar date they were written with; offsets are not applied.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Some(dt) = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

fn parse_whole_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<i64>() {
        return Some(number);
    }
    // Exports that passed through a dataframe write integers as "12.0".
    let float = trimmed.parse::<f64>().ok()?;
    (float.is_finite() && float.fract() == 0.0).then_some(float as i64)
}

fn parse_year(value: &str) -> Option<i32> {
    parse_whole_number(value)
        .and_then(|year| i32::try_from(year).ok())
        .filter(|year| (1000..=9999).contains(year))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Some(true),
        "0" | "0.0" | "false" | "no" => Some(false),
        _ => None,
    }
}
