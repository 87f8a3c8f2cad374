//! History stack adapter seam
//!
//! The session drives the stack through [`HistoryAdapter`] instead of a
//! concrete browser API, so the state machine runs (and is tested) on any
//! target. The browser implementation lives in `backstack-ui`;
//! [`InMemoryHistory`] here simulates enough of the contract for native
//! targets and tests.

use std::cell::{Cell, RefCell};

use serde_json::Value;

use crate::marker::{self, HistoryMarker};

/// Browser-history primitives the session drives.
///
/// Implementations must be safe to call in any order and absorb platform
/// failures rather than surface them; the session cannot meaningfully react
/// to a rejected push or pop.
pub trait HistoryAdapter {
    /// Push a new entry whose state object is the current entry's state with
    /// `marker` merged into the reserved slot.
    fn push_entry(&self, marker: &HistoryMarker, title_hint: &str);

    /// Move one entry back (programmatic equivalent of the back control).
    fn go_back(&self);

    /// Marker of the current entry, if its state object carries one.
    fn current_marker(&self) -> Option<HistoryMarker>;
}

/// In-memory history stack.
///
/// Mirrors the browser contract closely enough to drive whole scenarios:
/// a stack of state objects with a current position, forward entries
/// discarded on push. Back-navigation notifications are delivered by the
/// caller (tests play the role of the `popstate` stream), which also covers
/// the echo a real browser fires after a programmatic `go_back`.
pub struct InMemoryHistory {
    stack: RefCell<Vec<Value>>,
    position: Cell<usize>,
    pushes: Cell<usize>,
    backs: Cell<usize>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            stack: RefCell::new(vec![Value::Null]),
            position: Cell::new(0),
            pushes: Cell::new(0),
            backs: Cell::new(0),
        }
    }

    /// Current position, counted from the root entry.
    pub fn position(&self) -> usize {
        self.position.get()
    }

    /// Number of `push_entry` calls seen.
    pub fn push_count(&self) -> usize {
        self.pushes.get()
    }

    /// Number of programmatic `go_back` calls seen.
    pub fn back_count(&self) -> usize {
        self.backs.get()
    }

    /// Simulate the user pressing the back control: moves the position
    /// without counting as a programmatic pop. The caller then fans the
    /// notification out to its sessions.
    pub fn press_back(&self) {
        let position = self.position.get();
        if position > 0 {
            self.position.set(position - 1);
        }
    }

    fn current_state(&self) -> Value {
        self.stack.borrow()[self.position.get()].clone()
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryAdapter for InMemoryHistory {
    fn push_entry(&self, marker: &HistoryMarker, _title_hint: &str) {
        let next = marker::write_marker(Some(self.current_state()), marker);
        let mut stack = self.stack.borrow_mut();
        stack.truncate(self.position.get() + 1);
        stack.push(next);
        self.position.set(stack.len() - 1);
        self.pushes.set(self.pushes.get() + 1);
    }

    fn go_back(&self) {
        let position = self.position.get();
        if position > 0 {
            self.position.set(position - 1);
        }
        self.backs.set(self.backs.get() + 1);
    }

    fn current_marker(&self) -> Option<HistoryMarker> {
        marker::read_marker(Some(&self.current_state()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_merges_current_state() {
        let history = InMemoryHistory::new();
        history.push_entry(&HistoryMarker::new(vec!["a".into()]), "a");
        history.push_entry(&HistoryMarker::joined(history.current_marker(), "b"), "b");
        assert_eq!(history.position(), 2);
        let marker = history.current_marker().unwrap();
        assert_eq!(marker.ids, vec!["a", "b"]);
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let history = InMemoryHistory::new();
        history.push_entry(&HistoryMarker::new(vec!["a".into()]), "a");
        history.press_back();
        history.push_entry(&HistoryMarker::new(vec!["b".into()]), "b");
        assert_eq!(history.position(), 1);
        assert_eq!(history.current_marker().unwrap().ids, vec!["b"]);
    }

    #[test]
    fn test_go_back_stops_at_root() {
        let history = InMemoryHistory::new();
        history.go_back();
        assert_eq!(history.position(), 0);
        assert_eq!(history.back_count(), 1);
    }

    #[test]
    fn test_root_entry_has_no_marker() {
        let history = InMemoryHistory::new();
        assert_eq!(history.current_marker(), None);
    }
}
