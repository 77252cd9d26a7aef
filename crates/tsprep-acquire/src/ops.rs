//! Open Power Systems Data source.

use crate::PageSource;
use tracing::{info, instrument};
use tsprep_common::codec::read_csv;
use tsprep_common::{Result, Table};

/// Downloads and parses the Open Power Systems Data daily CSV at `url`.
#[instrument(skip(source))]
pub async fn get_open_power_systems_data<S: PageSource>(source: &S, url: &str) -> Result<Table> {
    let body = source.get_text(url).await?;
    let table = read_csv(body.as_bytes())?;
    info!(rows = table.len(), "Loaded open power systems data");
    Ok(table)
}
