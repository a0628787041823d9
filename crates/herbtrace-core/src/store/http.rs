//! Hosted object store REST client.
//!
//! Uses reqwest to call `{base}/api/objects/{type}` for creates and listings.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{ObjectPage, ObjectStore, StoreError, StoredObject};

/// Configuration for connecting to the hosted object store.
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Store URL (e.g., "<https://store.herbtrace.com>").
    pub base_url: String,
    /// API key sent as a bearer token, if the store requires one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Hosted object store client.
#[derive(Debug)]
pub struct HttpObjectStore {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateObjectBody<'a> {
    object_data: &'a serde_json::Value,
}

impl HttpObjectStore {
    /// Create a new object store client.
    pub fn new(config: &HttpStoreConfig) -> Result<Self, StoreError> {
        if config.base_url.is_empty() {
            return Err(StoreError::Config("base_url is empty".into()));
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let key_val = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|_| StoreError::Config("Invalid API key format".into()))?;
            headers.insert(AUTHORIZATION, key_val);
        }

        // reqwest is built with rustls-no-provider; `Err` means a provider is already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Build the URL of the collection holding `object_type`.
    pub(crate) fn objects_url(&self, object_type: &str) -> String {
        format!("{}/api/objects/{}", self.base_url, encode_segment(object_type))
    }

    /// Check HTTP response status, returning error for non-success codes.
    fn check_status(resp: &reqwest::Response) -> Result<(), StoreError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").into(),
            });
        }
        Ok(())
    }
}

impl ObjectStore for HttpObjectStore {
    #[instrument(skip(self, data), fields(base_url = %self.base_url))]
    async fn create_object(
        &self,
        object_type: &str,
        data: serde_json::Value,
    ) -> Result<StoredObject, StoreError> {
        let url = self.objects_url(object_type);
        let resp = self
            .http
            .post(&url)
            .json(&CreateObjectBody { object_data: &data })
            .send()
            .await?;
        Self::check_status(&resp)?;
        let created: StoredObject = resp.json().await?;
        debug!(object_id = %created.object_id, "Object created");
        Ok(created)
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_objects(
        &self,
        object_type: &str,
        limit: u32,
        newest_first: bool,
    ) -> Result<ObjectPage, StoreError> {
        let order = if newest_first { "desc" } else { "asc" };
        let url = format!("{}?limit={limit}&order={order}", self.objects_url(object_type));
        let resp = self.http.get(&url).send().await?;
        Self::check_status(&resp)?;
        let page: ObjectPage = resp.json().await?;
        debug!(count = page.items.len(), "Objects listed");
        Ok(page)
    }
}

/// Percent-encode a path segment. Type tags are plain identifiers, so only
/// the handful of reserved characters that could break the path matter.
pub(crate) fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '/' => out.push_str("%2F"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            _ => out.push(c),
        }
    }
    out
}
