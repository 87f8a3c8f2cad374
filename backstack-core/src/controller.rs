//! History synchronization state machine
//!
//! Pure flags-and-decisions core: given open-flag transitions and
//! back-navigation notifications, it decides whether the history stack needs
//! a push, a pop, or nothing. All I/O happens in the session layer
//! (`crate::session`), so every state transition is testable without a
//! browser.
//!
//! States for one session: `Closed·NoEntry`, `Open·NoEntry`, `Open·HasEntry`.
//! The open half of the state lives with the caller (the boolean holder);
//! entry ownership lives here. At most one history entry is owned at a time;
//! `has_history_entry` gates both push and pop.

use crate::marker::HistoryMarker;

/// History action decided for an open-flag transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    /// Push a new entry carrying this session's id.
    Push,
    /// Pop the owned entry (programmatic equivalent of the back control).
    Pop,
    /// Leave the stack alone.
    None,
}

/// Reaction decided for a back-navigation notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// A real back navigation consumed this session's entry; the modal
    /// should close. The stack has already moved, so no pop follows.
    RequestClose,
    /// Not this session's event (or the echo of its own pop).
    Ignore,
}

/// Per-session synchronization state machine.
#[derive(Debug)]
pub struct HistorySyncController {
    id: String,
    enabled: bool,
    push_on_open: bool,
    cleanup_on_close: bool,
    has_history_entry: bool,
    suppress_next_back: bool,
    closed_via_back: bool,
}

impl HistorySyncController {
    pub fn new(id: String, enabled: bool, push_on_open: bool, cleanup_on_close: bool) -> Self {
        Self {
            id,
            enabled,
            push_on_open,
            cleanup_on_close,
            has_history_entry: false,
            suppress_next_back: false,
            closed_via_back: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_history_entry(&self) -> bool {
        self.has_history_entry
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the controller on or off at runtime.
    ///
    /// Disabling while an entry is owned leaves that entry on the stack;
    /// the flags are frozen rather than cleaned up, since popping here would
    /// itself navigate. Documented limitation, not a defect.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Decide the history action for a new value of the open flag.
    ///
    /// `current` is the marker of the entry the stack currently sits on.
    /// Idempotent for repeated values: a second `true` while an entry is
    /// owned pushes nothing, a second `false` without one pops nothing.
    pub fn on_open_changed(&mut self, next_open: bool, current: &HistoryMarker) -> HistoryAction {
        if !self.enabled {
            return HistoryAction::None;
        }

        if next_open {
            if self.push_on_open && !self.has_history_entry {
                self.has_history_entry = true;
                return HistoryAction::Push;
            }
            return HistoryAction::None;
        }

        if self.cleanup_on_close && self.has_history_entry {
            self.has_history_entry = false;
            if self.closed_via_back {
                // The stack already moved; popping again would navigate
                // twice.
                self.closed_via_back = false;
                return HistoryAction::None;
            }
            if current.topmost() == Some(self.id.as_str()) {
                self.suppress_next_back = true;
                return HistoryAction::Pop;
            }
            // The owned entry is buried under another session's (or already
            // gone); popping would discard an entry that is not ours.
            return HistoryAction::None;
        }

        // Cleanup disabled or nothing owned: clear local flags only.
        self.has_history_entry = false;
        self.closed_via_back = false;
        HistoryAction::None
    }

    /// Decide the reaction to a back-navigation notification.
    ///
    /// `current` is the marker of the entry the stack landed on. This
    /// session's entry was consumed exactly when its id is no longer
    /// recorded there.
    pub fn on_back_navigation(&mut self, is_open: bool, current: &HistoryMarker) -> BackAction {
        if !self.enabled {
            return BackAction::Ignore;
        }

        if self.suppress_next_back {
            // Echo of this session's own programmatic pop. Consumed by
            // exactly one notification.
            self.suppress_next_back = false;
            return BackAction::Ignore;
        }

        if is_open && self.has_history_entry && !current.contains(&self.id) {
            self.closed_via_back = true;
            return BackAction::RequestClose;
        }

        BackAction::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> HistorySyncController {
        HistorySyncController::new("m".into(), true, true, true)
    }

    fn marker_with(ids: &[&str]) -> HistoryMarker {
        HistoryMarker::new(ids.iter().map(|id| id.to_string()).collect())
    }

    #[test]
    fn test_open_pushes_once() {
        let mut c = controller();
        assert_eq!(
            c.on_open_changed(true, &marker_with(&[])),
            HistoryAction::Push
        );
        assert!(c.has_history_entry());
        // Repeated opens are idempotent.
        assert_eq!(
            c.on_open_changed(true, &marker_with(&["m"])),
            HistoryAction::None
        );
    }

    #[test]
    fn test_open_with_push_disabled() {
        let mut c = HistorySyncController::new("m".into(), true, false, true);
        assert_eq!(
            c.on_open_changed(true, &marker_with(&[])),
            HistoryAction::None
        );
        assert!(!c.has_history_entry());
        assert_eq!(
            c.on_open_changed(false, &marker_with(&[])),
            HistoryAction::None
        );
    }

    #[test]
    fn test_programmatic_close_pops_and_suppresses_echo() {
        let mut c = controller();
        c.on_open_changed(true, &marker_with(&[]));
        assert_eq!(
            c.on_open_changed(false, &marker_with(&["m"])),
            HistoryAction::Pop
        );
        assert!(!c.has_history_entry());
        // The popstate echo of our own pop is swallowed.
        assert_eq!(
            c.on_back_navigation(false, &marker_with(&[])),
            BackAction::Ignore
        );
        // Suppression is one-shot.
        assert_eq!(
            c.on_back_navigation(false, &marker_with(&[])),
            BackAction::Ignore
        );
    }

    #[test]
    fn test_close_with_buried_entry_does_not_pop() {
        // Another session pushed on top of ours; popping would discard that
        // session's entry, not ours.
        let mut c = controller();
        c.on_open_changed(true, &marker_with(&[]));
        assert_eq!(
            c.on_open_changed(false, &marker_with(&["m", "other"])),
            HistoryAction::None
        );
        assert!(!c.has_history_entry());
        // No pop was issued, so nothing is suppressed either.
        assert_eq!(
            c.on_back_navigation(false, &marker_with(&["m"])),
            BackAction::Ignore
        );
    }

    #[test]
    fn test_back_navigation_closes_without_pop() {
        let mut c = controller();
        c.on_open_changed(true, &marker_with(&[]));
        // The stack moved to an entry that no longer records our id.
        assert_eq!(
            c.on_back_navigation(true, &marker_with(&[])),
            BackAction::RequestClose
        );
        // The close that follows must not pop again.
        assert_eq!(
            c.on_open_changed(false, &marker_with(&[])),
            HistoryAction::None
        );
        assert!(!c.has_history_entry());
    }

    #[test]
    fn test_back_navigation_ignores_foreign_entry() {
        // Current entry still records our id: some deeper entry was popped,
        // not ours.
        let mut c = controller();
        c.on_open_changed(true, &marker_with(&[]));
        assert_eq!(
            c.on_back_navigation(true, &marker_with(&["m", "other"])),
            BackAction::Ignore
        );
        assert!(c.has_history_entry());
    }

    #[test]
    fn test_back_navigation_while_closed_is_ignored() {
        let mut c = controller();
        c.on_open_changed(true, &marker_with(&[]));
        c.on_back_navigation(true, &marker_with(&[]));
        c.on_open_changed(false, &marker_with(&[]));
        // A second back press after the modal closed is not intercepted.
        assert_eq!(
            c.on_back_navigation(false, &marker_with(&[])),
            BackAction::Ignore
        );
    }

    #[test]
    fn test_close_with_cleanup_disabled_clears_flags_only() {
        let mut c = HistorySyncController::new("m".into(), true, true, false);
        assert_eq!(
            c.on_open_changed(true, &marker_with(&[])),
            HistoryAction::Push
        );
        assert_eq!(
            c.on_open_changed(false, &marker_with(&["m"])),
            HistoryAction::None
        );
        assert!(!c.has_history_entry());
        // Reopening claims a fresh entry; the abandoned one stays behind.
        assert_eq!(
            c.on_open_changed(true, &marker_with(&["m"])),
            HistoryAction::Push
        );
    }

    #[test]
    fn test_disabled_controller_is_inert() {
        let mut c = HistorySyncController::new("m".into(), false, true, true);
        assert_eq!(
            c.on_open_changed(true, &marker_with(&[])),
            HistoryAction::None
        );
        assert_eq!(
            c.on_open_changed(false, &marker_with(&[])),
            HistoryAction::None
        );
        assert_eq!(
            c.on_back_navigation(true, &marker_with(&[])),
            BackAction::Ignore
        );
    }

    #[test]
    fn test_disable_while_entry_owned_freezes_state() {
        let mut c = controller();
        c.on_open_changed(true, &marker_with(&[]));
        c.set_enabled(false);
        // No retroactive cleanup, no reactions.
        assert_eq!(
            c.on_open_changed(false, &marker_with(&["m"])),
            HistoryAction::None
        );
        assert!(c.has_history_entry());
        assert_eq!(
            c.on_back_navigation(true, &marker_with(&[])),
            BackAction::Ignore
        );
    }

    #[test]
    fn test_entry_ownership_never_exceeds_one() {
        let mut c = controller();
        let mut owned = 0i32;
        let script = [true, true, false, true, false, false, true, true, false];
        for next_open in script {
            // While an entry is owned the current marker carries our id.
            let current = if c.has_history_entry() {
                marker_with(&["m"])
            } else {
                marker_with(&[])
            };
            match c.on_open_changed(next_open, &current) {
                HistoryAction::Push => owned += 1,
                HistoryAction::Pop => owned -= 1,
                HistoryAction::None => {}
            }
            assert!((0..=1).contains(&owned));
            assert_eq!(owned == 1, c.has_history_entry());
        }
    }
}
