//! # Catalog Errors
//!
//! Two tiers: a failed index request aborts the whole load, a failed
//! record is dropped and the load keeps going.

use thiserror::Error;

use super::record::Locator;

/// Failure of the load as a whole. No catalog is produced.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The index page could not be fetched or did not have the expected shape
    #[error("index fetch failed for {url}: {message}")]
    IndexFetch { url: String, message: String },

    /// The HTTP client could not be constructed
    #[error("http client setup failed: {0}")]
    Client(String),
}

/// Failure to resolve a single record. Absorbed by the loader.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Transport failure or non-success status
    #[error("fetch failed for {locator}: {message}")]
    Fetch { locator: Locator, message: String },

    /// Body did not match the required record shape
    #[error("parse failed for {locator}: {message}")]
    Parse { locator: Locator, message: String },
}

impl RecordError {
    pub fn fetch(locator: &Locator, message: impl Into<String>) -> Self {
        Self::Fetch {
            locator: locator.clone(),
            message: message.into(),
        }
    }

    pub fn parse(locator: &Locator, message: impl Into<String>) -> Self {
        Self::Parse {
            locator: locator.clone(),
            message: message.into(),
        }
    }

    /// The locator whose resolution failed
    pub fn locator(&self) -> &Locator {
        match self {
            Self::Fetch { locator, .. } | Self::Parse { locator, .. } => locator,
        }
    }

    /// Short kind label for reports ("fetch" / "parse")
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } => "parse",
        }
    }
}
