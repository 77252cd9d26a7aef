//! Preparation of the Open Power Systems Data daily table.

use crate::dates::{month_label, parse_calendar_date};
use chrono::Datelike;
use tracing::debug;
use tsprep_common::{Result, Table, TsPrepError, Value};

/// Column holding the calendar date, after name normalisation.
pub const OPS_DATE: &str = "date";

/// Lowercases column names and replaces `+` with `_`, so `Wind+Solar`
/// becomes `wind_solar`.
pub fn normalize_column_names(table: &Table) -> Result<Table> {
    table
        .clone()
        .rename_columns(|name| name.replace('+', "_").to_lowercase())
}

/// Parses `date` and moves it into the ascending date index.
pub fn ops_set_date_to_index(table: &Table) -> Result<Table> {
    table.clone().set_date_index(OPS_DATE, parse_calendar_date)
}

/// Adds `month` (`01-Jan`) and `year` from the date index.
pub fn ops_engineer_new_features(table: &Table) -> Result<Table> {
    let index = table
        .index()
        .ok_or_else(|| TsPrepError::schema("ops_engineer_new_features needs a date index"))?;

    let month = index.dates().iter().map(|&d| Value::from(month_label(d))).collect();
    let year = index
        .dates()
        .iter()
        .map(|d| Value::Int(i64::from(d.year())))
        .collect();

    table
        .clone()
        .with_column("month", month)?
        .with_column("year", year)
}

/// Fills every missing cell with zero, then sets `wind_solar = wind + solar`.
///
/// The sum overwrites every `wind_solar` cell, including ones that held a
/// reported value before the fill.
pub fn ops_handle_missing_values(table: &Table) -> Result<Table> {
    let filled = table.clone().fill_nulls(zero_for);

    let wind = filled.column("wind")?;
    let solar = filled.column("solar")?;
    let wind_solar = wind
        .iter()
        .zip(&solar)
        .map(|(w, s)| w.add(s, "wind_solar"))
        .collect::<Result<Vec<_>>>()?;

    filled.with_column("wind_solar", wind_solar)
}

/// `0.0` for columns holding floats or nothing but gaps, `0` otherwise.
fn zero_for(_column: &str, cells: &[&Value]) -> Value {
    let has_float = cells.iter().any(|v| matches!(v, Value::Float(_)));
    let all_null = cells.iter().all(|v| v.is_null());
    if has_float || all_null {
        Value::Float(0.0)
    } else {
        Value::Int(0)
    }
}

/// Prepares the open power systems data. Names are normalised first since
/// every later step looks columns up by their lowercase names.
pub fn prepare_ops(table: &Table) -> Result<Table> {
    let table = normalize_column_names(table)?;
    let table = ops_set_date_to_index(&table)?;
    let table = ops_engineer_new_features(&table)?;
    let prepared = ops_handle_missing_values(&table)?;
    debug!(rows = prepared.len(), "Prepared open power systems data");
    Ok(prepared)
}
