//! Modal history hooks
//!
//! Two shapes over the same session machinery:
//! - [`use_modal_history`]: the caller owns the open flag and the close
//!   handler (a `ReadSignal<bool>` plus an `EventHandler`).
//! - [`use_modal_state`]: self-contained handle with `open()`, `close()`
//!   and `toggle()`, optionally closing other participating modals when it
//!   opens.
//!
//! While a bound modal is open its session owns one history entry, so the
//! back control closes the modal instead of leaving the page. Without a
//! browser history (non-wasm targets, headless contexts) the hooks fall
//! back to plain open/close state.

use dioxus::prelude::*;

use backstack_core::coordinator::{self, ModalOpened, OpenSubscription};
use backstack_core::session::{ModalHistoryOptions, ModalHistorySession};

use crate::browser;

#[cfg(target_arch = "wasm32")]
use crate::listener::WindowEventListener;
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};

/// Bind a caller-owned open flag to the history stack.
///
/// `on_close` fires when a back navigation consumed this modal's entry; the
/// caller is expected to set its open flag to `false` in response. The
/// binding never opens the modal itself.
///
/// `options.key` and the push/cleanup flags are fixed for the session's
/// life; `options.enabled` may change between renders.
/// `auto_close_others_on_open` is not honored here, since only the
/// self-contained form owns the boolean it would need to force.
pub fn use_modal_history(
    is_open: ReadSignal<bool>,
    on_close: EventHandler<()>,
    options: ModalHistoryOptions,
) {
    let enabled = options.enabled;
    let session = use_signal(move || ModalHistorySession::new(&options, browser::detect()));
    use_history_binding(session, is_open, on_close, enabled, false);
}

/// Self-contained modal state bound to the history stack.
///
/// Created by [`use_modal_state`]. Copy it freely into event handlers.
#[derive(Clone, Copy, PartialEq)]
pub struct ModalStateHandle {
    is_open: Signal<bool>,
}

impl ModalStateHandle {
    pub fn is_open(&self) -> bool {
        (self.is_open)()
    }

    pub fn open(&self) {
        let mut is_open = self.is_open;
        is_open.set(true);
    }

    pub fn close(&self) {
        let mut is_open = self.is_open;
        is_open.set(false);
    }

    pub fn toggle(&self) {
        let mut is_open = self.is_open;
        let current = *is_open.read();
        is_open.set(!current);
    }
}

/// Hook owning both the open flag and its history binding.
///
/// With `auto_close_others_on_open` set, opening this modal closes every
/// other participating modal in the page, and vice versa.
pub fn use_modal_state(options: ModalHistoryOptions) -> ModalStateHandle {
    let enabled = options.enabled;
    let auto_close = options.auto_close_others_on_open;
    let is_open = use_signal(|| false);
    let session = use_signal(move || ModalHistorySession::new(&options, browser::detect()));

    let on_close = use_callback(move |()| {
        let mut is_open = is_open;
        is_open.set(false);
    });
    use_history_binding(session, is_open.into(), on_close, enabled, auto_close);

    // Other participating modals close this one when they open.
    let mut auto_close_sub = use_signal(|| None::<OpenSubscription>);
    use_hook(move || {
        if !auto_close {
            return;
        }
        let own_id = session.peek().id().to_string();
        let subscription = coordinator::subscribe(move |event: &ModalOpened| {
            if event.id == own_id {
                return;
            }
            let mut is_open = is_open;
            // The signal may already be dropped if the component unmounted
            // before the subscription was detached.
            if let Ok(mut open) = is_open.try_write() {
                *open = false;
            };
        });
        auto_close_sub.set(Some(subscription));
    });
    use_drop(move || {
        auto_close_sub.write().take();
    });

    ModalStateHandle { is_open }
}

/// Shared wiring for both hook forms: observe the open flag, route
/// `popstate` notifications, keep the runtime-changeable `enabled` flag
/// current.
fn use_history_binding(
    mut session: Signal<ModalHistorySession>,
    is_open: ReadSignal<bool>,
    on_close: EventHandler<()>,
    enabled: bool,
    broadcast_on_open: bool,
) {
    // `enabled` may flip between renders; everything else is fixed at
    // session creation.
    if session.peek().enabled() != enabled {
        session.write().set_enabled(enabled);
    }

    let mut last_open = use_signal(|| false);

    // Observe the open flag, initial value included, so a modal mounted
    // open claims its entry immediately.
    use_effect(move || {
        let open = is_open();
        session.write().sync_open(open);
        if broadcast_on_open && open && !*last_open.peek() {
            // Announce only after the open sync completed, so receivers
            // observe a consistent marker.
            let id = session.peek().id().to_string();
            coordinator::publish(&ModalOpened { id });
        }
        last_open.set(open);
    });

    // popstate -> session routing. Only browser targets have a back
    // navigation source; everywhere else close only ever comes from the
    // caller.
    #[cfg(target_arch = "wasm32")]
    {
        let mut popstate = use_signal(|| None::<WindowEventListener>);
        use_effect(move || {
            if popstate.peek().is_some() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            // Capture the Dioxus runtime so the callback, which runs from
            // wasm-bindgen outside of it, can restore it.
            let runtime = Runtime::current();
            let listener = WindowEventListener::new(window, "popstate", move |_event| {
                let _guard = RuntimeGuard::new(runtime.clone());
                // Signals may already be dropped if the event fires while
                // the component is unmounting.
                let Ok(open) = is_open.try_peek() else {
                    return;
                };
                let open = *open;
                let should_close = session
                    .try_write()
                    .map(|mut session| session.handle_back_navigation(open))
                    .unwrap_or(false);
                if should_close {
                    on_close.call(());
                }
            });
            popstate.set(Some(listener));
        });
        use_drop(move || {
            popstate.write().take();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = on_close;
}
