//! # Dex Configuration
//!
//! Where the catalog comes from and which slice of it to load.
//!
//! ## Example
//! ```rust,ignore
//! use unovadex_core::config::{DexConfig, FetchWindow};
//!
//! let config = DexConfig::default()
//!     .with_base_url("http://localhost:8000/api/v2")
//!     .with_window(FetchWindow::new(20, 0));
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public PokéAPI root
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// The fifth-generation dex: #495 Snivy through #649 Genesect
pub const DEFAULT_LIMIT: u32 = 155;
pub const DEFAULT_OFFSET: u32 = 494;

/// The single index page to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub limit: u32,
    pub offset: u32,
}

impl Default for FetchWindow {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl FetchWindow {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

/// Configuration for the record source and loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexConfig {
    /// API root, without the `/pokemon` suffix
    pub base_url: String,
    /// Index window
    #[serde(default)]
    pub window: FetchWindow,
    /// Per-request timeout. `None` waits for the transport indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Cap on in-flight record fetches. `None` dispatches all at once.
    #[serde(default)]
    pub max_concurrent_fetches: Option<usize>,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            window: FetchWindow::default(),
            timeout_secs: None,
            user_agent: format!("unovadex/{}", env!("CARGO_PKG_VERSION")),
            max_concurrent_fetches: None,
        }
    }
}

impl DexConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_window(mut self, window: FetchWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = Some(max);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// URL of the index listing endpoint
    pub fn index_url(&self) -> String {
        format!("{}/pokemon", self.base_url.trim_end_matches('/'))
    }
}
