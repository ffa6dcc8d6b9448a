//! RAII wiring of DOM events onto controller methods.
//!
//! An [`EventBinding`] owns the `wasm_bindgen` closure backing one listener
//! and removes the listener when dropped, so tearing a widget down is just
//! dropping its bindings. Document-level boot listeners use [`EventBinding::forget`]
//! to stay alive for the page lifetime.

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::AddEventListenerOptions;

/// A registered DOM event listener; dropping removes it from the target.
pub struct EventBinding {
    target: web_sys::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

fn as_function(closure: &Closure<dyn FnMut(web_sys::Event)>) -> &js_sys::Function {
    closure.as_ref().unchecked_ref()
}

impl EventBinding {
    pub fn listen(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        if target
            .add_event_listener_with_callback(event, as_function(&closure))
            .is_err()
        {
            warn!("failed to attach {event} listener");
        }
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }

    /// Attach as a passive listener; the touch handlers never call
    /// `preventDefault`, so scrolling stays unblocked.
    pub fn listen_passive(
        target: &web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        if target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                as_function(&closure),
                &options,
            )
            .is_err()
        {
            warn!("failed to attach passive {event} listener");
        }
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }

    /// Leak the binding, keeping the listener for the page lifetime.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, as_function(&self.closure));
    }
}
