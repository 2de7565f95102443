#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use waterline_wasm::config::{FOOTER_CANVAS_ID, HEADER_CANVAS_ID};
use waterline_wasm::page::{AFTER_SETTLE_EVENT, WARNING_CLASS};
use waterline_wasm::wasm::{backdrop_surface_count, init, FrameLoop, GlSurface, Runtime};
use waterline_wasm::{EffectConfig, FadeEdge, RenderSurface, SurfaceSpec};

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let holder = document.create_element("div").unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);
    canvas
        .style()
        .set_property("width", "320px")
        .unwrap();
    canvas.style().set_property("height", "90px").unwrap();
    holder.append_child(&canvas).unwrap();
    document.body().unwrap().append_child(&holder).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn missing_canvas_is_skipped() {
    let document = web_sys::window().unwrap().document().unwrap();
    let spec = SurfaceSpec::new("no-such-canvas", FadeEdge::Top);
    assert!(GlSurface::create(&document, &spec).is_none());
}

#[wasm_bindgen_test]
fn surface_resizes_to_effective_pixels() {
    let document = web_sys::window().unwrap().document().unwrap();
    mount_canvas("resize-target");
    let spec = SurfaceSpec::new("resize-target", FadeEdge::Bottom);
    let Some(mut surface) = GlSurface::create(&document, &spec) else {
        // Headless runners without WebGL2 take the silent path.
        return;
    };
    let size = surface.resize(2.0);
    assert_eq!((size.width, size.height), (640, 180));
    assert_eq!(surface.canvas().width(), 640);
}

#[wasm_bindgen_test]
fn bootstrap_is_idempotent() {
    mount_canvas(HEADER_CANVAS_ID);
    init(EffectConfig::default()).unwrap();
    let first = backdrop_surface_count();
    init(EffectConfig::default()).unwrap();
    assert_eq!(backdrop_surface_count(), first);

    let document = web_sys::window().unwrap().document().unwrap();
    assert!(document.get_element_by_id(FOOTER_CANVAS_ID).is_none());
    assert!(first <= 1);
}

#[wasm_bindgen_test]
fn page_glue_survives_a_failed_backdrop() {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let body = document.body().unwrap();

    mount_canvas("glue-header");
    let dated = document.create_element("p").unwrap();
    dated.set_class_name("date");
    dated.set_attribute("data-date", "2001-05-20").unwrap();
    body.insert_before(&dated, body.first_child().as_ref()).unwrap();

    // Without IntersectionObserver the backdrop cannot start.
    let key = wasm_bindgen::JsValue::from_str("IntersectionObserver");
    let observer_ctor = js_sys::Reflect::get(&window, &key).unwrap();
    js_sys::Reflect::set(&window, &key, &wasm_bindgen::JsValue::UNDEFINED).unwrap();
    let config = EffectConfig::default()
        .with_surfaces(vec![SurfaceSpec::new("glue-header", FadeEdge::Bottom)]);
    let runtime = Runtime::install(&window, &document, config);
    js_sys::Reflect::set(&window, &key, &observer_ctor).unwrap();

    assert!(runtime.backdrop().is_none());

    let selector = format!(".{WARNING_CLASS}");
    let warning = dated.query_selector(&selector).unwrap().expect("initial warning");
    warning.remove();

    let settle = web_sys::Event::new(AFTER_SETTLE_EVENT).unwrap();
    document.dispatch_event(&settle).unwrap();
    assert!(dated.query_selector(&selector).unwrap().is_some());

    drop(runtime);
    dated.remove();
}

#[wasm_bindgen_test]
fn stopped_loop_ignores_resume() {
    let window = web_sys::window().unwrap();

    let paused = FrameLoop::start(window.clone(), |_| {});
    paused.cancel();
    assert!(!paused.is_running());
    paused.resume();
    assert!(paused.is_running());
    paused.stop();

    let stopped = FrameLoop::start(window, |_| {});
    stopped.stop();
    stopped.resume();
    assert!(!stopped.is_running());
}
