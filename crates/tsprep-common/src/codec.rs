//! CSV encoding for tables.
//!
//! Files carry one header row and no positional index column. A table with a
//! date index writes the index as its leading column, named after the column
//! the index was built from.

use crate::{Result, Table, Value};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Writes `table` as CSV to `writer`.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(table.columns().len() + 1);
    if let Some(index) = table.index() {
        header.push(index.name());
    }
    header.extend(table.columns().iter().map(String::as_str));
    wtr.write_record(&header)?;

    let dates = table.index().map(|ix| ix.dates());
    for (i, row) in table.rows().iter().enumerate() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if let Some(dates) = dates {
            record.push(Value::Date(dates[i]).to_field());
        }
        record.extend(row.iter().map(Value::to_field));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Reads a CSV stream with a header row into an unindexed table, inferring
/// each cell's type from its text.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::Reader::from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(ToString::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(Value::infer).collect());
    }

    Table::from_rows(columns, rows)
}

/// Writes `table` to a CSV file, creating or truncating it.
pub fn write_csv_file(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_csv(table, file)
}

/// Reads a CSV file into a table.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Table> {
    let file = File::open(path.as_ref())?;
    read_csv(file)
}
