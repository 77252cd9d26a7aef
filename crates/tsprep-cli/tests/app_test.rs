//! Integration tests for the tsprep application commands.
//!
//! These drive [`App`] over an in-memory API and check the files the
//! commands leave behind.

use async_trait::async_trait;
use serde_json::{json, Value as Json};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tsprep_acquire::PageSource;
use tsprep_cli::{App, CliError, Command, Target};
use tsprep_common::codec::read_csv_file;
use tsprep_common::test_utils::{
    assert_approx_eq, create_temp_dir, init_test_logging, ops_fixtures::OPSD_CSV,
    store_fixtures::page,
};
use tsprep_common::{Result, TsPrepError, Value};
use tsprep_config::Config;

const BASE: &str = "https://api.test";

struct FakeApi {
    pages: HashMap<String, Json>,
    requests: AtomicUsize,
}

impl FakeApi {
    fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert(
            format!("{BASE}/api/v1/items"),
            page(
                "items",
                &[
                    json!({"item_id": 1, "item_name": "Riceland American Jazmine Rice", "item_price": 0.84}),
                    json!({"item_id": 2, "item_name": "Caress Velvet Bliss", "item_price": 6.44}),
                ],
                None,
            ),
        );
        pages.insert(
            format!("{BASE}/api/v1/stores"),
            page(
                "stores",
                &[
                    json!({"store_id": 1, "store_city": "San Antonio"}),
                    json!({"store_id": 2, "store_city": "San Antonio"}),
                ],
                None,
            ),
        );
        pages.insert(
            format!("{BASE}/api/v1/sales"),
            page(
                "sales",
                &[
                    json!({"item": 1, "sale_amount": 13, "sale_date": "Tue, 01 Jan 2013 00:00:00 GMT", "sale_id": 1, "store": 1}),
                    json!({"item": 2, "sale_amount": 11, "sale_date": "Wed, 02 Jan 2013 00:00:00 GMT", "sale_id": 2, "store": 2}),
                ],
                Some("/api/v1/sales?page=2"),
            ),
        );
        pages.insert(
            format!("{BASE}/api/v1/sales?page=2"),
            page(
                "sales",
                &[json!({"item": 1, "sale_amount": 10, "sale_date": "Mon, 31 Dec 2012 00:00:00 GMT", "sale_id": 3, "store": 1})],
                None,
            ),
        );
        Self {
            pages,
            requests: AtomicUsize::new(0),
        }
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for FakeApi {
    async fn get_json(&self, url: &str) -> Result<Json> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| TsPrepError::HttpStatus {
            status: 404,
            url: url.to_string(),
        })
    }

    async fn get_text(&self, _url: &str) -> Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(OPSD_CSV.to_string())
    }
}

fn app(dir: &Path) -> App<FakeApi> {
    let mut config = Config::default();
    config.api.base_url = BASE.to_string();
    config.cache.dir = dir.to_path_buf();
    App::new(config, FakeApi::new())
}

#[tokio::test]
async fn test_combine_writes_joined_csv_and_caches_tables() {
    init_test_logging();
    let dir = create_temp_dir();
    let output = dir.path().join("combined.csv");
    let app = app(dir.path());

    app.run(&Command::Combine {
        output: Some(output.clone()),
    })
    .await
    .unwrap();

    let combined = read_csv_file(&output).unwrap();
    assert_eq!(combined.len(), 3);
    assert_eq!(
        combined.column("sale_id").unwrap(),
        [&Value::Int(1), &Value::Int(2), &Value::Int(3)]
    );
    for file in ["items.csv", "stores.csv", "sales.csv"] {
        assert!(dir.path().join(file).exists(), "{file} not cached");
    }
    assert_eq!(app.source().requests(), 4);
}

#[tokio::test]
async fn test_prepare_sales_uses_cache_on_second_run() {
    init_test_logging();
    let dir = create_temp_dir();
    let output = dir.path().join("sales_prepared.csv");
    let app = app(dir.path());
    let command = Command::Prepare {
        target: Target::Sales,
        output: Some(output.clone()),
    };

    app.run(&command).await.unwrap();
    app.run(&command).await.unwrap();
    assert_eq!(app.source().requests(), 4);

    let prepared = read_csv_file(&output).unwrap();
    assert_eq!(prepared.columns()[0], "sale_date");
    assert_eq!(prepared.get(0, "sale_date"), Some(&Value::from("2012-12-31")));
    assert_eq!(prepared.get(0, "month"), Some(&Value::from("12-Dec")));
    assert_eq!(prepared.get(0, "weekday"), Some(&Value::from("1-Mon")));
    let total = prepared.get(0, "sales_total").and_then(Value::as_f64).unwrap();
    assert_approx_eq(total, 8.4, 1e-9);
}

#[tokio::test]
async fn test_prepare_ops_writes_indexed_series() {
    let dir = create_temp_dir();
    let output = dir.path().join("ops.csv");

    app(dir.path())
        .run(&Command::Prepare {
            target: Target::Ops,
            output: Some(output.clone()),
        })
        .await
        .unwrap();

    let prepared = read_csv_file(&output).unwrap();
    assert_eq!(
        prepared.columns(),
        ["date", "consumption", "wind", "solar", "wind_solar", "month", "year"]
    );
    assert_eq!(prepared.get(0, "date"), Some(&Value::from("2006-01-01")));
    assert_eq!(prepared.get(0, "wind_solar"), Some(&Value::Float(0.0)));
}

#[tokio::test]
async fn test_acquire_no_store_leaves_cache_empty() {
    let dir = create_temp_dir();
    let app = app(dir.path());

    let table = app.acquire("stores", false, true).await.unwrap();

    assert_eq!(table.len(), 2);
    assert!(!dir.path().join("stores.csv").exists());
}

#[tokio::test]
async fn test_acquire_unknown_dataset_fails() {
    let dir = create_temp_dir();
    let app = app(dir.path());

    let err = app
        .run(&Command::Acquire {
            dataset: "functions".to_string(),
            refresh: false,
            no_store: false,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::Pipeline(TsPrepError::UnknownDataset { .. })
    ));
    assert_eq!(app.source().requests(), 0);
}
