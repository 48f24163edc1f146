//! # Catalog
//!
//! Retrieval and aggregation of records.
//!
//! ## Modules
//!
//! - `record` - Record, Locator, IndexEntry and the detail wire shapes
//! - `source` - The `RecordSource` seam and its PokéAPI implementation
//! - `loader` - Concurrent fan-out with order-preserving assembly
//! - `error` - Index-level and record-level error types

pub mod error;
pub mod loader;
pub mod record;
pub mod source;

pub use error::{CatalogError, RecordError};
pub use loader::{Catalog, CatalogLoader, DroppedEntry, LoadReport};
pub use record::{IndexEntry, Locator, Record, Stat};
pub use source::{HttpRecordSource, RecordSource};
