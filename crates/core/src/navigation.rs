//! # Navigation
//!
//! Two screens: the filtered list, and the detail view of one record.

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::Record;

/// Which screen is showing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "record", rename_all = "snake_case")]
pub enum Screen {
    /// Filtered list of records
    #[default]
    List,
    /// Detail view of one record
    Detail(Arc<Record>),
}

impl Screen {
    /// The record on display, if any
    pub fn record(&self) -> Option<&Arc<Record>> {
        match self {
            Screen::List => None,
            Screen::Detail(record) => Some(record),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Screen::List)
    }
}

/// The navigation state machine
///
/// Cyclic for the whole session; there is no terminal state.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    screen: Screen,
}

impl Navigator {
    /// Start on the list screen
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Show `record` in detail. Valid from either screen.
    pub fn select_record(&mut self, record: Arc<Record>) {
        self.screen = Screen::Detail(record);
    }

    /// Return to the list. Returns false when already there.
    pub fn go_back(&mut self) -> bool {
        match self.screen {
            Screen::List => false,
            Screen::Detail(_) => {
                self.screen = Screen::List;
                true
            }
        }
    }
}
