//! # Unova Dex Core
//!
//! Loads a fixed window of the PokéAPI catalog, narrows it by type, and
//! tracks which record the user is looking at.
//!
//! ## Architecture
//!
//! - `catalog/` - Record fetching and order-preserving catalog assembly
//! - `filter` - Type filter over a catalog
//! - `navigation` - List/detail screen state machine
//! - `session` - Per-user context tying catalog, filter, and screen together
//! - `config` - Source and window configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use unovadex_core::catalog::{CatalogLoader, HttpRecordSource};
//! use unovadex_core::config::DexConfig;
//! use unovadex_core::filter::TypeFilter;
//! use unovadex_core::session::Session;
//!
//! let config = DexConfig::default();
//! let source = Arc::new(HttpRecordSource::new(&config)?);
//! let catalog = CatalogLoader::with_config(source, &config).load(config.window).await?;
//!
//! let mut session = Session::new(Arc::new(catalog));
//! session.set_type_filter(TypeFilter::parse("water"));
//! ```

pub mod catalog;
pub mod config;
pub mod filter;
pub mod navigation;
pub mod session;

pub use catalog::{Catalog, CatalogError, CatalogLoader, LoadReport, Record, RecordError};
pub use config::{DexConfig, FetchWindow};
pub use filter::TypeFilter;
pub use navigation::{Navigator, Screen};
pub use session::Session;
