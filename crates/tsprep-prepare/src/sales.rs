//! Preparation of the combined store sales table.

use crate::dates::{month_label, parse_sale_date, weekday_label};
use tracing::debug;
use tsprep_common::{Result, Table, TsPrepError, Value};

/// Column holding the raw sale timestamp.
pub const SALE_DATE: &str = "sale_date";

/// Parses `sale_date` and moves it into the ascending date index.
pub fn set_date_to_index(table: &Table) -> Result<Table> {
    table.clone().set_date_index(SALE_DATE, parse_sale_date)
}

/// Adds `month`, `weekday` and `sales_total = sale_amount * item_price`.
///
/// Requires a date index. Existing derived columns are recomputed in place.
pub fn engineer_new_features(table: &Table) -> Result<Table> {
    let index = table
        .index()
        .ok_or_else(|| TsPrepError::schema("engineer_new_features needs a date index"))?;

    let month = index.dates().iter().map(|&d| Value::from(month_label(d))).collect();
    let weekday = index.dates().iter().map(|&d| Value::from(weekday_label(d))).collect();

    let amounts = table.column("sale_amount")?;
    let prices = table.column("item_price")?;
    let sales_total = amounts
        .iter()
        .zip(&prices)
        .map(|(amount, price)| amount.mul(price, "sales_total"))
        .collect::<Result<Vec<_>>>()?;

    table
        .clone()
        .with_column("month", month)?
        .with_column("weekday", weekday)?
        .with_column("sales_total", sales_total)
}

/// Prepares the store sales data: date index first, then derived columns.
pub fn prepare(table: &Table) -> Result<Table> {
    let indexed = set_date_to_index(table)?;
    let prepared = engineer_new_features(&indexed)?;
    debug!(rows = prepared.len(), "Prepared store sales data");
    Ok(prepared)
}
