//! # Item API Client
//!
//! Typed wrapper over the server's REST routes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryClient                 stockroom-server                       │
//! │  ───────────────                 ────────────────                       │
//! │  list()          ── GET    /items        ──► Vec<Item>                 │
//! │  get(id)         ── GET    /items/{id}   ──► Item                      │
//! │  create(&new)    ── POST   /items        ──► Item                      │
//! │  update(id, &p)  ── PUT    /items/{id}   ──► Item                      │
//! │  delete(id)      ── DELETE /items/{id}   ──► Deleted                   │
//! │  health()        ── GET    /health       ──► Health                    │
//! │                                                                         │
//! │  non-2xx ──► ClientError::Status { status, message: body.error }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use stockroom_core::{Deleted, Health, Item, ItemPatch, NewItem};
use tracing::debug;

use crate::error::ClientError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the item API.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: Client,
    base_url: String,
}

impl InventoryClient {
    /// Client for a server at `base_url`, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Uses an existing reqwest client.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        InventoryClient { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list(&self) -> Result<Vec<Item>, ClientError> {
        let response = self.http.get(self.url("/items")).send().await?;
        decode(response).await
    }

    pub async fn get(&self, id: i64) -> Result<Item, ClientError> {
        let response = self.http.get(self.url(&format!("/items/{}", id))).send().await?;
        decode(response).await
    }

    pub async fn create(&self, item: &NewItem) -> Result<Item, ClientError> {
        debug!(barcode = %item.barcode, "Creating item");
        let response = self.http.post(self.url("/items")).json(item).send().await?;
        decode(response).await
    }

    pub async fn update(&self, id: i64, patch: &ItemPatch) -> Result<Item, ClientError> {
        debug!(id, "Updating item");
        let response = self
            .http
            .put(self.url(&format!("/items/{}", id)))
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn delete(&self, id: i64) -> Result<Deleted, ClientError> {
        debug!(id, "Deleting item");
        let response = self
            .http
            .delete(self.url(&format!("/items/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /health`. A 503 still carries a body and is returned as-is.
    pub async fn health(&self) -> Result<Health, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        if response.status() == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json().await?);
        }
        decode(response).await
    }
}

/// Parses a 2xx body as `T`, anything else as [`ClientError::Status`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        });

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
