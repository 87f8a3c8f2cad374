//! backstack-ui - Dioxus bindings for backstack
//!
//! Binds a modal's open/closed flag to the browser session history so the
//! back control closes the modal instead of leaving the page. The state
//! machine itself lives in `backstack-core`; this crate contributes the
//! hooks, the `web-sys` history adapter, and the `popstate` listener.

pub mod browser;
pub mod hooks;
#[cfg(target_arch = "wasm32")]
pub mod listener;

pub use backstack_core::{HistoryAdapter, HistoryMarker, ModalHistoryOptions};
pub use hooks::*;
