//! Paginated retrieval from the store sales API.

use crate::{Dataset, PageSource};
use serde_json::{Map, Value as Json};
use tracing::{debug, info, instrument};
use tsprep_common::{Result, Table, TsPrepError};

/// Assembles one table out of the successive JSON pages of an API listing.
///
/// Every page has the shape
/// `{"payload": {"<key>": [rows...], "next_page": "<endpoint>" | false}}`.
/// Pages are requested one after another until `next_page` is falsy. There
/// is no page limit and no cycle detection: a listing whose pages point at
/// each other is requested forever.
#[derive(Debug, Clone)]
pub struct Fetcher<S> {
    source: S,
    base_url: String,
}

impl<S: PageSource> Fetcher<S> {
    /// Creates a fetcher for the API at `base_url`.
    pub fn new(source: S, base_url: impl Into<String>) -> Self {
        Self {
            source,
            base_url: base_url.into(),
        }
    }

    /// The API host every endpoint is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetches every page starting at `start_endpoint`, collecting the rows
    /// under `payload[payload_key]` in page order.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch(&self, start_endpoint: &str, payload_key: &str) -> Result<Table> {
        let mut data = Table::default();
        let mut endpoint = start_endpoint.to_string();
        let mut pages = 0usize;

        loop {
            debug!(%endpoint, "Reading page");
            let url = format!("{}{}", self.base_url, endpoint);
            let contents = self.source.get_json(&url).await?;
            pages += 1;

            let payload = contents
                .get("payload")
                .and_then(Json::as_object)
                .ok_or_else(|| TsPrepError::payload(&endpoint, "missing 'payload' object"))?;

            let records = payload
                .get(payload_key)
                .and_then(Json::as_array)
                .ok_or_else(|| {
                    TsPrepError::payload(&endpoint, format!("'{payload_key}' is not an array"))
                })?;
            data.append(Table::from_json_records(records)?)?;

            match next_page(payload, &endpoint)? {
                Some(next) => endpoint = next,
                None => break,
            }
        }

        info!(rows = data.len(), pages, "Loading complete");
        Ok(data)
    }

    /// Fetches a registered dataset from its first page.
    pub async fn fetch_dataset(&self, dataset: Dataset) -> Result<Table> {
        let descriptor = dataset.descriptor();
        self.fetch(descriptor.endpoint, descriptor.payload_key).await
    }

    /// Returns the items table from the API.
    pub async fn get_items(&self) -> Result<Table> {
        self.fetch_dataset(Dataset::Items).await
    }

    /// Returns the stores table from the API.
    pub async fn get_stores(&self) -> Result<Table> {
        self.fetch_dataset(Dataset::Stores).await
    }

    /// Returns the sales table from the API.
    pub async fn get_sales(&self) -> Result<Table> {
        self.fetch_dataset(Dataset::Sales).await
    }
}

/// The next endpoint, or `None` when `next_page` is absent or falsy.
#[allow(clippy::float_cmp)]
fn next_page(payload: &Map<String, Json>, endpoint: &str) -> Result<Option<String>> {
    match payload.get("next_page") {
        None | Some(Json::Null | Json::Bool(false)) => Ok(None),
        Some(Json::String(s)) if s.is_empty() => Ok(None),
        Some(Json::String(s)) => Ok(Some(s.clone())),
        Some(Json::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Json::Array(a)) if a.is_empty() => Ok(None),
        Some(Json::Object(o)) if o.is_empty() => Ok(None),
        Some(other) => Err(TsPrepError::payload(
            endpoint,
            format!("'next_page' must be a string, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockPageSource;
    use mockall::{predicate::eq, Sequence};
    use serde_json::json;
    use tsprep_common::test_utils::store_fixtures::page;
    use tsprep_common::Value;

    const BASE: &str = "https://api.test";

    #[tokio::test]
    async fn test_follows_next_page_until_false() {
        let mut source = MockPageSource::new();
        let mut seq = Sequence::new();
        source
            .expect_get_json()
            .with(eq("https://api.test/api/v1/items"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(page(
                    "items",
                    &[json!({"item_id": 1}), json!({"item_id": 2})],
                    Some("/api/v1/items?page=2"),
                ))
            });
        source
            .expect_get_json()
            .with(eq("https://api.test/api/v1/items?page=2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(page("items", &[json!({"item_id": 3})], None)));

        let fetcher = Fetcher::new(source, BASE);
        let table = fetcher.get_items().await.unwrap();

        let ids: Vec<&Value> = table.column("item_id").unwrap();
        assert_eq!(ids, [&Value::Int(1), &Value::Int(2), &Value::Int(3)]);
    }

    #[tokio::test]
    async fn test_missing_payload_key_is_an_error() {
        let mut source = MockPageSource::new();
        source
            .expect_get_json()
            .returning(|_| Ok(page("stores", &[json!({"store_id": 1})], None)));

        let fetcher = Fetcher::new(source, BASE);
        let err = fetcher.fetch("/api/v1/items", "items").await.unwrap_err();

        assert!(matches!(err, TsPrepError::Payload { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut source = MockPageSource::new();
        source
            .expect_get_json()
            .returning(|_| Err(TsPrepError::network("connection reset")));

        let fetcher = Fetcher::new(source, BASE);
        let err = fetcher.get_sales().await.unwrap_err();

        assert!(matches!(err, TsPrepError::Network { .. }));
    }

    #[test]
    fn test_next_page_truthiness() {
        let cases = [
            (json!({}), None),
            (json!({"next_page": null}), None),
            (json!({"next_page": false}), None),
            (json!({"next_page": ""}), None),
            (json!({"next_page": 0}), None),
            (json!({"next_page": "/api/v1/sales?page=3"}), Some("/api/v1/sales?page=3".to_string())),
        ];
        for (payload, expected) in cases {
            let next = next_page(payload.as_object().unwrap(), "/x").unwrap();
            assert_eq!(next, expected, "payload {payload}");
        }

        let err = next_page(json!({"next_page": 2}).as_object().unwrap(), "/x").unwrap_err();
        assert!(matches!(err, TsPrepError::Payload { .. }));
    }
}
