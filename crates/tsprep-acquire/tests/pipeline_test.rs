//! Integration tests for tsprep-acquire: pagination, caching and joins
//! against a scripted page source.

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value as Json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tsprep_acquire::{CacheLoader, Dataset, Fetcher, LoadOptions, PageSource};
use tsprep_common::test_utils::{create_temp_dir, init_test_logging, store_fixtures::page};
use tsprep_common::{Result, TsPrepError, Value};

const BASE: &str = "https://api.test";

/// Serves fixed bodies by URL and counts requests.
#[derive(Default)]
struct ScriptedPages {
    bodies: HashMap<String, Json>,
    requests: AtomicUsize,
}

impl ScriptedPages {
    fn with_listing(mut self, key: &str, pages: &[Vec<Json>]) -> Self {
        for (i, rows) in pages.iter().enumerate() {
            let endpoint = listing_endpoint(key, i);
            let next = (i + 1 < pages.len()).then(|| listing_endpoint(key, i + 1));
            self.bodies
                .insert(format!("{BASE}{endpoint}"), page(key, rows, next.as_deref()));
        }
        self
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn listing_endpoint(key: &str, page: usize) -> String {
    if page == 0 {
        format!("/api/v1/{key}")
    } else {
        format!("/api/v1/{key}?page={}", page + 1)
    }
}

#[async_trait]
impl PageSource for ScriptedPages {
    async fn get_json(&self, url: &str) -> Result<Json> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.bodies.get(url).cloned().ok_or_else(|| TsPrepError::HttpStatus {
            status: 404,
            url: url.to_string(),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        Err(TsPrepError::HttpStatus {
            status: 404,
            url: url.to_string(),
        })
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn store_listings() -> ScriptedPages {
    ScriptedPages::default()
        .with_listing(
            "items",
            &[
                vec![json!({"item_id": 1, "item_name": "Rice", "item_price": 0.84})],
                vec![json!({"item_id": 2, "item_name": "Soap", "item_price": 2.5})],
            ],
        )
        .with_listing(
            "stores",
            &[vec![
                json!({"store_id": 1, "store_city": "San Antonio"}),
                json!({"store_id": 2, "store_city": "San Antonio"}),
            ]],
        )
        .with_listing(
            "sales",
            &[
                vec![
                    json!({"item": 1, "sale_amount": 13, "sale_date": "Tue, 01 Jan 2013 00:00:00 GMT", "sale_id": 1, "store": 1}),
                    json!({"item": 2, "sale_amount": 3, "sale_date": "Tue, 01 Jan 2013 00:00:00 GMT", "sale_id": 2, "store": 2}),
                ],
                vec![
                    json!({"item": 3, "sale_amount": 1, "sale_date": "Wed, 02 Jan 2013 00:00:00 GMT", "sale_id": 3, "store": 1}),
                    json!({"item": 2, "sale_amount": 8, "sale_date": "Wed, 02 Jan 2013 00:00:00 GMT", "sale_id": 4, "store": 1}),
                ],
            ],
        )
}

#[tokio::test]
async fn test_combined_load_populates_and_reuses_cache() {
    init_test_logging();
    let dir = create_temp_dir();

    let loader = CacheLoader::new(Fetcher::new(store_listings(), BASE), dir.path());
    let combined = loader.load_combined(LoadOptions::default()).await.unwrap();
    let first_requests = loader.fetcher().source().requests();
    assert_eq!(first_requests, 5);

    let ids: Vec<&Value> = combined.column("sale_id").unwrap();
    assert_eq!(ids, [&Value::Int(1), &Value::Int(2), &Value::Int(4)]);
    for dataset in Dataset::ALL {
        assert!(loader.cache_path(dataset).exists(), "{dataset} not cached");
    }

    let again = loader.load_combined(LoadOptions::default()).await.unwrap();
    assert_eq!(loader.fetcher().source().requests(), first_requests);
    assert_eq!(again, combined);
}

#[tokio::test]
async fn test_broken_chain_surfaces_the_missing_page() {
    let mut pages = ScriptedPages::default().with_listing(
        "items",
        &[vec![json!({"item_id": 1})], vec![json!({"item_id": 2})]],
    );
    pages.bodies.remove(&format!("{BASE}/api/v1/items?page=2"));

    let err = Fetcher::new(pages, BASE).get_items().await.unwrap_err();

    assert!(matches!(err, TsPrepError::HttpStatus { status: 404, ref url } if url.ends_with("page=2")));
}

proptest! {
    #[test]
    fn prop_row_count_is_sum_of_pages(sizes in prop::collection::vec(0usize..6, 1..6)) {
        let mut next_id = 0i64;
        let pages: Vec<Vec<Json>> = sizes
            .iter()
            .map(|&n| {
                (0..n)
                    .map(|_| {
                        next_id += 1;
                        json!({"sale_id": next_id})
                    })
                    .collect()
            })
            .collect();

        let fetcher = Fetcher::new(ScriptedPages::default().with_listing("sales", &pages), BASE);
        let table = runtime().block_on(fetcher.get_sales()).unwrap();

        prop_assert_eq!(table.len(), sizes.iter().sum::<usize>());
        prop_assert_eq!(fetcher.source().requests(), sizes.len());
        if !table.is_empty() {
            let ids: Vec<Value> = table.column("sale_id").unwrap().into_iter().cloned().collect();
            let expected: Vec<Value> = (1..=next_id).map(Value::Int).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
