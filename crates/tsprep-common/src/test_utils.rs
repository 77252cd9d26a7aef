//! Test utilities and shared fixtures for the tsprep workspace.
//!
//! Enabled for dependants through the `testing` feature.

use crate::{Table, Value};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with the test writer.
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(any(test, feature = "tempfile"))]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Store sales fixtures shaped like the remote API's tables.
pub mod store_fixtures {
    use super::*;
    use serde_json::{json, Value as Json};

    /// Two items with ids 1 and 2.
    pub fn items() -> Table {
        Table::from_rows(
            ["item_brand", "item_id", "item_name", "item_price", "item_upc12"],
            vec![
                vec![
                    "Riceland".into(),
                    Value::Int(1),
                    "Riceland American Jazmine Rice".into(),
                    Value::Float(0.84),
                    "35200264013".into(),
                ],
                vec![
                    "Caress".into(),
                    Value::Int(2),
                    "Caress Velvet Bliss Ultra Silkening Beauty Bar".into(),
                    Value::Float(6.44),
                    "11111065925".into(),
                ],
            ],
        )
        .expect("items fixture")
    }

    /// Two stores with ids 1 and 2.
    pub fn stores() -> Table {
        Table::from_rows(
            ["store_address", "store_city", "store_id", "store_state", "store_zipcode"],
            vec![
                vec![
                    "12125 Alamo Ranch Pkwy".into(),
                    "San Antonio".into(),
                    Value::Int(1),
                    "TX".into(),
                    Value::Int(78253),
                ],
                vec![
                    "9255 FM 471 West".into(),
                    "San Antonio".into(),
                    Value::Int(2),
                    "TX".into(),
                    Value::Int(78251),
                ],
            ],
        )
        .expect("stores fixture")
    }

    /// Five sales; the last two reference an unknown item and an unknown store.
    pub fn sales() -> Table {
        let row = |item: i64, date: &str, amount: i64, id: i64, store: i64| {
            vec![
                Value::Int(item),
                date.into(),
                Value::Int(amount),
                Value::Int(id),
                Value::Int(store),
            ]
        };
        Table::from_rows(
            ["item", "sale_date", "sale_amount", "sale_id", "store"],
            vec![
                row(1, "Wed, 02 Jan 2013 00:00:00 GMT", 11, 1, 1),
                row(2, "Tue, 01 Jan 2013 00:00:00 GMT", 13, 2, 2),
                row(1, "Tue, 01 Jan 2013 00:00:00 GMT", 3, 3, 2),
                row(9, "Tue, 01 Jan 2013 00:00:00 GMT", 5, 4, 1),
                row(2, "Thu, 03 Jan 2013 00:00:00 GMT", 7, 5, 9),
            ],
        )
        .expect("sales fixture")
    }

    /// One API page body carrying `rows` under `payload[key]`.
    pub fn page(key: &str, rows: &[Json], next_page: Option<&str>) -> Json {
        let next = next_page.map_or(Json::Bool(false), |p| Json::String(p.to_string()));
        json!({
            "payload": {
                key: rows,
                "max_page": 0,
                "next_page": next,
                "page": 1,
            },
            "status": "ok",
        })
    }
}

/// Open power systems fixtures.
pub mod ops_fixtures {
    /// A few days of German daily power data, with gaps, as raw CSV.
    pub const OPSD_CSV: &str = "\
Date,Consumption,Wind,Solar,Wind+Solar
2006-01-02,1380.521,,,
2012-01-01,948.128,227.465,6.587,234.052
2006-01-01,1069.184,,,
";
}
