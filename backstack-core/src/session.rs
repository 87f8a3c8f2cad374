//! Per-modal session driver
//!
//! [`ModalHistorySession`] applies the controller's decisions through a
//! [`HistoryAdapter`]: it builds the merged marker for pushes, issues the
//! programmatic pop for cleanups, and routes back-navigation notifications.
//! Without an adapter (non-browser context) every operation is a silent
//! no-op and the modal behaves as plain open/close state.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::controller::{BackAction, HistoryAction, HistorySyncController};
use crate::history::HistoryAdapter;
use crate::marker::HistoryMarker;

/// Counter for generating session ids when the caller supplies no key.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Configuration for one modal history session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalHistoryOptions {
    /// Explicit session id. Generated once at session creation when absent,
    /// stable for the session's life.
    pub key: Option<String>,
    /// Master switch. Disabled sessions never touch history but keep plain
    /// open/close state working.
    pub enabled: bool,
    /// Push a history entry when the modal opens.
    pub push_state_on_open: bool,
    /// Pop the owned entry when the modal closes programmatically.
    pub cleanup_on_close: bool,
    /// Broadcast opens and close other broadcasting modals. Honored by the
    /// self-contained hook form only.
    pub auto_close_others_on_open: bool,
}

impl Default for ModalHistoryOptions {
    fn default() -> Self {
        Self {
            key: None,
            enabled: true,
            push_state_on_open: true,
            cleanup_on_close: true,
            auto_close_others_on_open: false,
        }
    }
}

/// One modal binding: controller plus the adapter it drives.
pub struct ModalHistorySession {
    controller: HistorySyncController,
    history: Option<Rc<dyn HistoryAdapter>>,
}

impl ModalHistorySession {
    pub fn new(options: &ModalHistoryOptions, history: Option<Rc<dyn HistoryAdapter>>) -> Self {
        let id = options.key.clone().unwrap_or_else(|| {
            let n = SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("modal-history-{n}")
        });
        Self {
            controller: HistorySyncController::new(
                id,
                options.enabled,
                options.push_state_on_open,
                options.cleanup_on_close,
            ),
            history,
        }
    }

    pub fn id(&self) -> &str {
        self.controller.id()
    }

    pub fn has_history_entry(&self) -> bool {
        self.controller.has_history_entry()
    }

    pub fn enabled(&self) -> bool {
        self.controller.enabled()
    }

    /// See [`HistorySyncController::set_enabled`]: disabling never cleans up
    /// an already-owned entry.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.controller.set_enabled(enabled);
    }

    /// Synchronize the stack with a new value of the open flag.
    pub fn sync_open(&mut self, is_open: bool) {
        let Some(history) = self.history.clone() else {
            return;
        };
        let current = history.current_marker().unwrap_or_default();
        match self.controller.on_open_changed(is_open, &current) {
            HistoryAction::Push => {
                let marker = HistoryMarker::joined(Some(current), self.id());
                debug!("pushing history entry for modal {}", self.id());
                history.push_entry(&marker, self.id());
            }
            HistoryAction::Pop => {
                debug!("popping history entry for modal {}", self.id());
                history.go_back();
            }
            HistoryAction::None => {}
        }
    }

    /// Route a back-navigation notification. Returns `true` when the modal
    /// should close in response; the stack has already moved in that case,
    /// so the close that follows will not pop again.
    pub fn handle_back_navigation(&mut self, is_open: bool) -> bool {
        let Some(history) = self.history.clone() else {
            return false;
        };
        let current = history.current_marker().unwrap_or_default();
        match self.controller.on_back_navigation(is_open, &current) {
            BackAction::RequestClose => {
                debug!("back navigation closing modal {}", self.id());
                true
            }
            BackAction::Ignore => {
                trace!("back navigation ignored by modal {}", self.id());
                false
            }
        }
    }
}
