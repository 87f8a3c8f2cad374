//! backstack-core - modal open/close state synchronized with the browser
//! history stack
//!
//! Contains the synchronization state machine, the history-marker payload,
//! the history-adapter seam, and the cross-instance open broadcast. Nothing
//! here depends on a UI framework or a browser; the Dioxus hooks and the
//! `web-sys` adapter live in `backstack-ui`.

pub mod controller;
pub mod coordinator;
pub mod history;
pub mod marker;
pub mod session;

pub use controller::{BackAction, HistoryAction, HistorySyncController};
pub use history::{HistoryAdapter, InMemoryHistory};
pub use marker::HistoryMarker;
pub use session::{ModalHistoryOptions, ModalHistorySession};
