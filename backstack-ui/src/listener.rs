//! Window event listener with RAII cleanup
//!
//! Attaching a JavaScript event listener from Rust/WASM requires the
//! `Closure` to live as long as the listener is attached. The naive
//! `closure.forget()` leaks memory and leaves the listener attached
//! forever, so instead the closure is stored in a struct that implements
//! `Drop`, removing the listener when the struct is dropped. This ties the
//! listener lifetime to Rust's ownership system, and works well with Dioxus
//! signals: store the listener in a `Signal<Option<WindowEventListener>>`
//! and set it to `None` to detach.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// A window event listener that removes itself when dropped.
pub struct WindowEventListener {
    window: web_sys::Window,
    event_name: &'static str,
    callback: Closure<dyn FnMut(wasm_bindgen::JsValue)>,
}

impl WindowEventListener {
    /// Attaches an event listener to the window.
    ///
    /// The listener is automatically removed when this struct is dropped.
    pub fn new(
        window: web_sys::Window,
        event_name: &'static str,
        callback: impl FnMut(wasm_bindgen::JsValue) + 'static,
    ) -> Self {
        let callback: Closure<dyn FnMut(wasm_bindgen::JsValue)> =
            Closure::wrap(Box::new(callback));

        window
            .add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
            .ok();

        Self {
            window,
            event_name,
            callback,
        }
    }
}

impl Drop for WindowEventListener {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback(
            self.event_name,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}
