//! DOM listener plumbing shared by the backdrop and the page glue.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::error::EffectError;

/// Event listeners removed from their targets when dropped.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

impl Listeners {
    pub fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), EffectError> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.entries.push((target.clone(), event, closure));
        Ok(())
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (target, event, closure) in self.entries.drain(..) {
            let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

/// Reports elements entering or leaving the viewport.
pub struct ViewportObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl ViewportObserver {
    /// `on_change` receives the element id and whether any part of the
    /// element overlaps the viewport.
    pub fn new(mut on_change: impl FnMut(String, bool) + 'static) -> Result<Self, EffectError> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    on_change(entry.target().id(), entry.is_intersecting());
                }
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(0.0));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Runs `f` now if the document is parsed, otherwise on `DOMContentLoaded`.
pub fn when_ready(document: &Document, f: impl FnOnce() + 'static) -> Result<(), EffectError> {
    if document.ready_state() != "loading" {
        f();
        return Ok(());
    }
    let callback = Closure::once_into_js(f);
    document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    Ok(())
}
