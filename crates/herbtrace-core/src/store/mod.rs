//! Object store seam.
//!
//! The herb helpers only ever need two calls from the hosted object store:
//! create an object under a type tag, and list the newest objects of a type.
//! [`HttpObjectStore`] talks to the hosted REST API; [`MemoryStore`] keeps
//! everything in-process for offline runs and tests.

mod http;
mod memory;


use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::{HttpObjectStore, HttpStoreConfig};
pub use memory::MemoryStore;

/// Object store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Object store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid object data: {0}")]
    Json(#[from] serde_json::Error),
}

/// An object as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub object_id: String,
    pub object_type: String,
    pub object_data: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPage {
    #[serde(default)]
    pub items: Vec<StoredObject>,
    /// Present when more objects exist. Callers here never follow it.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// The two object store operations the herb helpers consume.
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `object_type` and return the created object.
    fn create_object(
        &self,
        object_type: &str,
        data: serde_json::Value,
    ) -> impl Future<Output = Result<StoredObject, StoreError>> + Send;

    /// Return at most `limit` objects of `object_type`, newest first when asked.
    fn list_objects(
        &self,
        object_type: &str,
        limit: u32,
        newest_first: bool,
    ) -> impl Future<Output = Result<ObjectPage, StoreError>> + Send;
}

/// Store selected at startup from configuration.
#[derive(Debug)]
pub enum Backend {
    Http(HttpObjectStore),
    Memory(MemoryStore),
}

impl Backend {
    /// Build the hosted client when a URL is configured, else an in-memory store.
    pub fn from_config(config: &crate::config::StoreConfig) -> Result<Self, StoreError> {
        match &config.base_url {
            Some(base_url) => {
                let http = HttpObjectStore::new(&HttpStoreConfig {
                    base_url: base_url.clone(),
                    api_key: config.api_key.clone(),
                    timeout: std::time::Duration::from_secs(config.timeout_secs),
                })?;
                Ok(Self::Http(http))
            }
            None => Ok(Self::Memory(MemoryStore::new())),
        }
    }

    /// Short label for status lines.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Http(_) => "hosted",
            Self::Memory(_) => "in-memory",
        }
    }
}

impl ObjectStore for Backend {
    async fn create_object(
        &self,
        object_type: &str,
        data: serde_json::Value,
    ) -> Result<StoredObject, StoreError> {
        match self {
            Self::Http(s) => s.create_object(object_type, data).await,
            Self::Memory(s) => s.create_object(object_type, data).await,
        }
    }

    async fn list_objects(
        &self,
        object_type: &str,
        limit: u32,
        newest_first: bool,
    ) -> Result<ObjectPage, StoreError> {
        match self {
            Self::Http(s) => s.list_objects(object_type, limit, newest_first).await,
            Self::Memory(s) => s.list_objects(object_type, limit, newest_first).await,
        }
    }
}
