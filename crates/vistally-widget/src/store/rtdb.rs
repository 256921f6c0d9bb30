//! Remote real-time store backend (Firebase-style REST surface).
//!
//! A key `k` lives at `{database_url}/{k}.json?auth={api_key}`. Reads are a
//! plain `GET` (absent slots answer `null`); increments run an ETag
//! compare-and-swap loop (`GET` with `X-Firebase-ETag: true`, `PUT` with
//! `if-match`) so concurrent writers cannot lose updates. The CAS loop is
//! the only retry in the widget and is bounded by `store.cas_max_retries`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use vistally_core::{count::coerce_count, CounterKey, Result, VistallyError};

use crate::config::StoreSection;

use super::CounterStore;

pub struct RtdbStore {
    http: Client,
    base: String,
    api_key: String,
    cas_max_retries: u32,
}

impl RtdbStore {
    /// Build the HTTP client and normalize the endpoint.
    ///
    /// Construct once per process and share via `Arc`; the client holds the
    /// connection pool.
    pub fn connect(cfg: &StoreSection) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| VistallyError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            http,
            base: cfg.database_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            cas_max_retries: cfg.cas_max_retries,
        })
    }

    fn slot_url(&self, key: &CounterKey) -> String {
        format!("{}/{}.json?auth={}", self.base, key, self.api_key)
    }

    /// Fetch the slot value together with its ETag.
    async fn fetch_with_etag(&self, key: &CounterKey) -> Result<(Option<Value>, Option<String>)> {
        let resp = self
            .http
            .get(self.slot_url(key))
            .header("X-Firebase-ETag", "true")
            .send()
            .await
            .map_err(|e| VistallyError::Unreachable(format!("fetch failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(VistallyError::Store(format!("fetch returned {status}")));
        }

        let etag = resp
            .headers()
            .get(reqwest::header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let value: Value = resp
            .json()
            .await
            .map_err(|e| VistallyError::Store(format!("fetch body invalid: {e}")))?;

        let value = if value.is_null() { None } else { Some(value) };
        Ok((value, etag))
    }
}

#[async_trait]
impl CounterStore for RtdbStore {
    async fn read_once(&self, key: &CounterKey) -> Result<Option<Value>> {
        let resp = self
            .http
            .get(self.slot_url(key))
            .send()
            .await
            .map_err(|e| VistallyError::Unreachable(format!("fetch failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(VistallyError::Store(format!("fetch returned {status}")));
        }

        let value: Value = resp
            .json()
            .await
            .map_err(|e| VistallyError::Store(format!("fetch body invalid: {e}")))?;

        Ok(if value.is_null() { None } else { Some(value) })
    }

    async fn write(&self, key: &CounterKey, value: Value) -> Result<()> {
        let resp = self
            .http
            .put(self.slot_url(key))
            .json(&value)
            .send()
            .await
            .map_err(|e| VistallyError::Unreachable(format!("write failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(VistallyError::Store(format!("write returned {status}")));
        }
        Ok(())
    }

    async fn fetch_add(&self, key: &CounterKey, delta: u64) -> Result<u64> {
        for _ in 0..self.cas_max_retries {
            let (current, etag) = self.fetch_with_etag(key).await?;
            let next = coerce_count(current.as_ref()).saturating_add(delta);

            let mut req = self.http.put(self.slot_url(key)).json(&Value::from(next));
            if let Some(etag) = etag.as_deref() {
                req = req.header("if-match", etag);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| VistallyError::Unreachable(format!("write failed: {e}")))?;

            match resp.status() {
                s if s.is_success() => {
                    tracing::trace!(key = %key, next, "counter slot advanced");
                    return Ok(next);
                }
                // Someone else won the race; re-read and try again.
                StatusCode::PRECONDITION_FAILED => continue,
                s => return Err(VistallyError::Store(format!("write returned {s}"))),
            }
        }

        Err(VistallyError::Contention(format!(
            "increment of {key} gave up after {} attempts",
            self.cas_max_retries
        )))
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use vistally_core::{CounterKey, VistallyError};

    use crate::config::StoreSection;
    use crate::store::CounterStore;

    use super::RtdbStore;

    fn store_cfg(url: &str) -> StoreSection {
        StoreSection {
            api_key: "secret".to_string(),
            auth_domain: "unit.test".to_string(),
            database_url: url.to_string(),
            cas_max_retries: 3,
            request_timeout_ms: 2_000,
        }
    }

    #[tokio::test]
    async fn read_once_maps_null_to_absent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/example_com.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let store = RtdbStore::connect(&store_cfg(&server.url())).unwrap();
        let got = store.read_once(&CounterKey::derive("example.com")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn read_once_returns_stored_value() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/example_com.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .with_status(200)
            .with_body("7")
            .create_async()
            .await;

        let store = RtdbStore::connect(&store_cfg(&server.url())).unwrap();
        let got = store.read_once(&CounterKey::derive("example.com")).await.unwrap();

        assert_eq!(got, Some(json!(7)));
    }

    #[tokio::test]
    async fn write_puts_json_value() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/example_com.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .match_body(Matcher::Json(json!(5)))
            .with_status(200)
            .with_body("5")
            .create_async()
            .await;

        let store = RtdbStore::connect(&store_cfg(&server.url())).unwrap();
        store
            .write(&CounterKey::derive("example.com"), json!(5))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_add_uses_etag_conditional_write() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", "/example_com.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .match_header("X-Firebase-ETag", "true")
            .with_status(200)
            .with_header("ETag", "etag-1")
            .with_body("41")
            .expect(1)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/example_com.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .match_header("if-match", "etag-1")
            .match_body(Matcher::Json(json!(42)))
            .with_status(200)
            .with_body("42")
            .expect(1)
            .create_async()
            .await;

        let store = RtdbStore::connect(&store_cfg(&server.url())).unwrap();
        let got = store
            .fetch_add(&CounterKey::derive("example.com"), 1)
            .await
            .unwrap();

        get.assert_async().await;
        put.assert_async().await;
        assert_eq!(got, 42);
    }

    #[tokio::test]
    async fn fetch_add_gives_up_after_contention() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", "/hot_key.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .with_status(200)
            .with_header("ETag", "stale")
            .with_body("10")
            .expect(3)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/hot_key.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .with_status(412)
            .expect(3)
            .create_async()
            .await;

        let store = RtdbStore::connect(&store_cfg(&server.url())).unwrap();
        let err = store
            .fetch_add(&CounterKey::derive("hot/key"), 1)
            .await
            .unwrap_err();

        get.assert_async().await;
        put.assert_async().await;
        assert!(matches!(err, VistallyError::Contention(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn server_errors_map_to_store() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/example_com.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .with_status(500)
            .create_async()
            .await;

        let store = RtdbStore::connect(&store_cfg(&server.url())).unwrap();
        let err = store
            .read_once(&CounterKey::derive("example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, VistallyError::Store(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn connection_failures_map_to_unreachable() {
        // Nothing listens on this port.
        let store = RtdbStore::connect(&store_cfg("http://127.0.0.1:9")).unwrap();
        let err = store
            .read_once(&CounterKey::derive("example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, VistallyError::Unreachable(_)));
        assert!(err.is_transient());
    }
}
