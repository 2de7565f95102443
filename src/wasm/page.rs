use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CustomEvent, Document, Event, Window};

use super::observers::Listeners;
use crate::error::EffectError;
use crate::page::{
    fallback_target, staleness_notice, NavigationFailure, AFTER_SETTLE_EVENT, DATE_ATTRIBUTE,
    DATE_SELECTOR, SCROLL_RESET_DELAY_MS, WARNING_CLASS, WARNING_SEPARATOR,
};

fn get_path(value: &JsValue, outer: &str, inner: &str) -> Option<String> {
    let outer = js_sys::Reflect::get(value, &outer.into()).ok()?;
    if outer.is_undefined() || outer.is_null() {
        return None;
    }
    js_sys::Reflect::get(&outer, &inner.into()).ok()?.as_string()
}

/// Sends failed htmx requests through a full page load instead.
pub fn install_navigation_fallback(
    window: &Window,
    document: &Document,
    listeners: &mut Listeners,
) -> Result<(), EffectError> {
    let global = js_sys::global();
    if let Ok(htmx) = js_sys::Reflect::get(&global, &"htmx".into()) {
        if let Ok(config) = js_sys::Reflect::get(&htmx, &"config".into()) {
            if config.is_object() {
                js_sys::Reflect::set(&config, &"scrollIntoViewOnBoost".into(), &JsValue::FALSE)?;
            }
        }
    }

    for failure in NavigationFailure::ALL {
        let window = window.clone();
        listeners.add(document, failure.event_name(), move |event: Event| {
            let Some(event) = event.dyn_ref::<CustomEvent>() else {
                return;
            };
            let detail = event.detail();
            let target = fallback_target(
                get_path(&detail, "pathInfo", "requestPath"),
                get_path(&detail, "requestConfig", "path"),
            );
            if let Some(path) = target {
                log::warn!("{} on '{path}', loading natively", failure.event_name());
                if let Err(err) = window.location().set_href(&path) {
                    log::error!("fallback navigation failed: {err:?}");
                }
            }
        })?;
    }
    Ok(())
}

/// Appends the "this article is N years old" note to the dated paragraph once.
pub fn update_date_warning(document: &Document) -> Result<(), EffectError> {
    let Some(date) = document.query_selector(DATE_SELECTOR)? else {
        return Ok(());
    };
    if date.query_selector(&format!(".{WARNING_CLASS}"))?.is_some() {
        return Ok(());
    }
    let Some(published) = date.get_attribute(DATE_ATTRIBUTE) else {
        return Ok(());
    };
    let published_ms = js_sys::Date::parse(&published);
    if published_ms.is_nan() {
        return Ok(());
    }
    let Some(notice) = staleness_notice(published_ms, js_sys::Date::now()) else {
        return Ok(());
    };

    let warning = document.create_element("span")?;
    warning.set_class_name(WARNING_CLASS);
    warning.set_text_content(Some(&notice));
    date.append_child(&document.create_text_node(WARNING_SEPARATOR))?;
    date.append_child(&warning)?;
    Ok(())
}

/// Shows the note now and after every htmx swap settles, then resets scroll.
pub fn install_staleness_banner(
    window: &Window,
    document: &Document,
    listeners: &mut Listeners,
) -> Result<(), EffectError> {
    update_date_warning(document)?;

    let window = window.clone();
    let doc = document.clone();
    listeners.add(document, AFTER_SETTLE_EVENT, move |_: Event| {
        if let Err(err) = update_date_warning(&doc) {
            log::warn!("date warning: {err}");
        }
        let scroll = {
            let window = window.clone();
            Closure::once_into_js(move || window.scroll_to_with_x_and_y(0.0, 0.0))
        };
        if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            scroll.unchecked_ref(),
            SCROLL_RESET_DELAY_MS,
        ) {
            log::warn!("scroll reset not scheduled: {err:?}");
        }
    })?;
    Ok(())
}
