//! Browser history adapter
//!
//! Implements the history seam over `web_sys::History`. Entry state objects
//! cross the JS boundary as JSON text (`js_sys::JSON` on one side,
//! `serde_json` on the other), so the marker merge happens on plain
//! `serde_json::Value`s and unrelated state fields survive untouched.
//!
//! [`detect`] returns `None` whenever no history facility exists (non-wasm
//! targets, or a wasm context without a window), which disables all history
//! mutation while leaving plain open/close state working.

use std::rc::Rc;

use backstack_core::history::HistoryAdapter;

#[cfg(target_arch = "wasm32")]
use backstack_core::marker::{self, HistoryMarker};
#[cfg(target_arch = "wasm32")]
use serde_json::Value;

/// History adapter backed by the browser session history.
#[cfg(target_arch = "wasm32")]
pub struct BrowserHistory {
    history: web_sys::History,
}

#[cfg(target_arch = "wasm32")]
impl BrowserHistory {
    /// The current entry's state object, if it is JSON-representable.
    fn current_state(&self) -> Option<Value> {
        let state = self.history.state().ok()?;
        if state.is_null() || state.is_undefined() {
            return None;
        }
        let json = js_sys::JSON::stringify(&state).ok()?;
        serde_json::from_str(&String::from(json)).ok()
    }
}

#[cfg(target_arch = "wasm32")]
impl HistoryAdapter for BrowserHistory {
    fn push_entry(&self, marker: &HistoryMarker, title_hint: &str) {
        let next = marker::write_marker(self.current_state(), marker);
        let Ok(serialized) = serde_json::to_string(&next) else {
            return;
        };
        let Ok(state) = js_sys::JSON::parse(&serialized) else {
            return;
        };
        let _ = self.history.push_state_with_url(&state, title_hint, None);
    }

    fn go_back(&self) {
        let _ = self.history.back();
    }

    fn current_marker(&self) -> Option<HistoryMarker> {
        marker::read_marker(self.current_state().as_ref())
    }
}

/// Detect the browser history facility.
#[cfg(target_arch = "wasm32")]
pub fn detect() -> Option<Rc<dyn HistoryAdapter>> {
    let window = web_sys::window()?;
    let history = window.history().ok()?;
    Some(Rc::new(BrowserHistory { history }))
}

/// Non-browser builds have no session history to synchronize with.
#[cfg(not(target_arch = "wasm32"))]
pub fn detect() -> Option<Rc<dyn HistoryAdapter>> {
    None
}
