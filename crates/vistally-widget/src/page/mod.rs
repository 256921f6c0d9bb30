//! Page-context and display seam.
//!
//! The embedding environment supplies the current host/path and resolves
//! selector strings to display slots; the widget only ever writes text into
//! slots. A selector may match zero slots, and callers treat the empty
//! resolution as "no display" rather than an error.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

/// One display surface, e.g. the text content of a matched element.
///
/// Cloning shares the underlying slot, so a clone handed to the widget and
/// a clone kept by the embedder observe the same text.
#[derive(Debug, Clone, Default)]
pub struct DisplaySlot {
    text: Arc<Mutex<String>>,
}

impl DisplaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot's visible content.
    pub fn set_text(&self, text: &str) {
        // Poisoned lock means a writer panicked; leave the old text up.
        if let Ok(mut g) = self.text.lock() {
            *g = text.to_string();
        }
    }

    /// Current content (empty until first write).
    pub fn text(&self) -> String {
        self.text.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

/// The page context the widget runs against.
pub trait PageEnv: Send + Sync {
    /// Host of the loaded page (may be empty in headless contexts).
    fn host(&self) -> &str;

    /// Path of the loaded page, leading slash included.
    fn path(&self) -> &str;

    /// Resolve a selector to zero or more display slots.
    fn select(&self, selector: &str) -> Vec<DisplaySlot>;
}

/// Fixed page context with a selector registry.
///
/// Serves headless embedders and doubles as the test environment: install
/// a slot under a selector, run the widget, read the slot back.
pub struct StaticPage {
    host: String,
    path: String,
    slots: DashMap<String, Vec<DisplaySlot>>,
}

impl StaticPage {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            slots: DashMap::new(),
        }
    }

    /// Register a fresh slot under `selector` and return it for readback.
    pub fn install_slot(&self, selector: &str) -> DisplaySlot {
        let slot = DisplaySlot::new();
        self.slots
            .entry(selector.to_string())
            .or_default()
            .push(slot.clone());
        slot
    }
}

impl PageEnv for StaticPage {
    fn host(&self) -> &str {
        &self.host
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn select(&self, selector: &str) -> Vec<DisplaySlot> {
        self.slots
            .get(selector)
            .map(|v| v.value().clone())
            .unwrap_or_default()
    }
}
