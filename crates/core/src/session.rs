//! # Session
//!
//! The context object a presentation layer drives: one shared catalog, the
//! active type filter, the displayed subset derived from it, and the
//! navigation state. Sessions are independent, so several can share one
//! `Arc<Catalog>`.

use std::sync::Arc;

use crate::catalog::{Catalog, Record};
use crate::filter::{self, TypeFilter};
use crate::navigation::{Navigator, Screen};

pub struct Session {
    catalog: Arc<Catalog>,
    active_filter: TypeFilter,
    displayed: Vec<Arc<Record>>,
    navigator: Navigator,
}

impl Session {
    /// Unfiltered list screen over `catalog`
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let displayed = catalog.records().to_vec();
        Self {
            catalog,
            active_filter: TypeFilter::All,
            displayed,
            navigator: Navigator::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn active_filter(&self) -> &TypeFilter {
        &self.active_filter
    }

    /// Records matching the active filter, in catalog order
    pub fn displayed(&self) -> &[Arc<Record>] {
        &self.displayed
    }

    pub fn screen(&self) -> &Screen {
        self.navigator.screen()
    }

    /// Replace the active filter and recompute the displayed subset.
    ///
    /// The navigation state is left alone: a record on the detail screen
    /// stays there even if the new filter excludes it.
    pub fn set_type_filter(&mut self, selector: TypeFilter) {
        self.displayed = filter::filter(&self.catalog, &selector);
        tracing::debug!(
            filter = %selector,
            displayed = self.displayed.len(),
            "Type filter applied"
        );
        self.active_filter = selector;
    }

    /// Show the catalog record with `id`. Unknown ids leave the state
    /// unchanged and return false.
    pub fn select_record(&mut self, id: u32) -> bool {
        match self.catalog.get(id) {
            Some(record) => {
                self.navigator.select_record(Arc::clone(record));
                true
            }
            None => {
                tracing::warn!(id, "Select ignored: id not in catalog");
                false
            }
        }
    }

    /// Back to the list; no-op when already there
    pub fn go_back(&mut self) -> bool {
        self.navigator.go_back()
    }
}
