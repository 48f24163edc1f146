//! # Record Source
//!
//! The network seam of the loader. `HttpRecordSource` talks to PokéAPI;
//! tests swap in in-memory sources.

use async_trait::async_trait;
use serde::Deserialize;

use super::error::{CatalogError, RecordError};
use super::record::{IndexEntry, Locator, Record};
use crate::config::{DexConfig, FetchWindow};

/// Something that can list an index window and resolve locators
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Request one index page
    async fn fetch_index(&self, window: FetchWindow) -> Result<Vec<IndexEntry>, CatalogError>;

    /// Resolve one locator into a record. Single attempt, no retry.
    async fn fetch_record(&self, locator: &Locator) -> Result<Record, RecordError>;
}

#[derive(Debug, Deserialize)]
struct IndexPageWire {
    results: Vec<IndexEntry>,
}

/// PokéAPI over HTTP
pub struct HttpRecordSource {
    client: reqwest::Client,
    index_url: String,
}

impl HttpRecordSource {
    pub fn new(config: &DexConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        Ok(Self {
            client,
            index_url: config.index_url(),
        })
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch_index(&self, window: FetchWindow) -> Result<Vec<IndexEntry>, CatalogError> {
        let index_error = |message: String| CatalogError::IndexFetch {
            url: self.index_url.clone(),
            message,
        };

        tracing::debug!(url = %self.index_url, limit = window.limit, offset = window.offset, "Requesting index page");

        let response = self
            .client
            .get(&self.index_url)
            .query(&[("limit", window.limit), ("offset", window.offset)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| index_error(e.to_string()))?;

        let page: IndexPageWire = response
            .json()
            .await
            .map_err(|e| index_error(format!("unexpected index body: {}", e)))?;

        Ok(page.results)
    }

    async fn fetch_record(&self, locator: &Locator) -> Result<Record, RecordError> {
        let response = self
            .client
            .get(locator.as_str())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RecordError::fetch(locator, e.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| RecordError::fetch(locator, e.to_string()))?;

        Record::from_json(locator, &body)
    }
}
