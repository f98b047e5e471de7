//! Blob store listing client
//!
//! Thin async client for a Vercel-Blob-style object store. The store exposes
//! a single list operation: `GET {base_url}/?limit=N` with a bearer token,
//! returning a JSON body of object descriptors. Pagination, consistency, and
//! rate-limit semantics are the provider's concern; the client issues one
//! list call per request and surfaces every failure as [`ListError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::BlobSettings;

/// Default timeout for the list call in milliseconds (10s)
pub const DEFAULT_LIST_TIMEOUT_MS: u64 = 10_000;

/// Default provider-side page cap for the list call
pub const DEFAULT_LIST_LIMIT: u32 = 1000;

/// Errors that can occur while listing the blob store
#[derive(Error, Debug, Clone)]
pub enum ListError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("blob store returned status {status}")]
    Status { status: u16 },

    #[error("failed to decode listing response: {0}")]
    Decode(String),
}

/// One stored object as the provider describes it.
///
/// Unknown provider fields (size, timestamps, content type) are ignored;
/// only the URL and the storage pathname are surfaced to the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectDescriptor {
    pub url: String,
    pub pathname: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    blobs: Vec<ObjectDescriptor>,
}

/// Trait for blob-store listers.
///
/// The HTTP handlers and the page renderer depend on this seam so tests can
/// substitute a stub store for the real provider.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// List all stored object descriptors in listing order.
    async fn list(&self) -> Result<Vec<ObjectDescriptor>, ListError>;
}

/// Reqwest-backed lister for the configured blob store.
pub struct BlobClient {
    client: Client,
    list_url: String,
    token: String,
}

impl BlobClient {
    /// Build a client from validated blob settings.
    pub fn new(settings: &BlobSettings) -> Result<Self, ListError> {
        let timeout = Duration::from_millis(settings.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ListError::HttpRequest(format!("failed to create HTTP client: {}", e)))?;

        let list_url = format!(
            "{}/?limit={}",
            settings.base_url.trim_end_matches('/'),
            settings.list_limit
        );

        Ok(Self {
            client,
            list_url,
            token: settings.token.clone(),
        })
    }
}

#[async_trait]
impl ObjectLister for BlobClient {
    async fn list(&self) -> Result<Vec<ObjectDescriptor>, ListError> {
        let response = self
            .client
            .get(&self.list_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ListError::HttpRequest(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListError::Status {
                status: status.as_u16(),
            });
        }

        let listing: ListResponse = response
            .json()
            .await
            .map_err(|e| ListError::Decode(e.to_string()))?;

        Ok(listing.blobs)
    }
}
