#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Metaball water backdrop for the blog's header and footer canvases.
//!
//! The session, scheduling and shader-mirror modules are target independent;
//! everything touching the DOM lives in `wasm` and only builds for wasm32.

pub mod config;
pub mod effect;
pub mod error;
pub mod field;
pub mod page;
pub mod scheduler;
pub mod session;
pub mod shader;
pub mod theme;
pub mod visibility;

pub use config::{EffectConfig, FadeEdge, SurfaceSpec};
pub use effect::{BackingSize, EffectInstance, FrameUniforms, HoverState, RenderSurface};
pub use error::EffectError;
pub use session::{FrameInputs, FrameOutcome, RenderSession, SessionEvent};
pub use theme::Theme;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::config::EffectConfig;
    use crate::error::EffectError;

    mod backdrop;
    mod observers;
    mod page;
    mod render;

    pub use backdrop::Backdrop;
    pub use observers::Listeners;
    pub use render::{current_theme, FrameLoop, GlSurface};

    /// Page glue plus the backdrop, each installed independently so a
    /// failure in one leaves the other running.
    pub struct Runtime {
        backdrop: Option<Backdrop>,
        _page: Listeners,
    }

    impl Runtime {
        pub fn install(
            window: &web_sys::Window,
            document: &web_sys::Document,
            config: EffectConfig,
        ) -> Self {
            let mut page = Listeners::default();
            if let Err(err) = page::install_navigation_fallback(window, document, &mut page) {
                log::error!("navigation fallback unavailable: {err}");
            }
            if let Err(err) = page::install_staleness_banner(window, document, &mut page) {
                log::error!("date warning unavailable: {err}");
            }

            let backdrop = Backdrop::start(window, document, config).unwrap_or_else(|err| {
                log::error!("backdrop disabled: {err}");
                None
            });
            Self {
                backdrop,
                _page: page,
            }
        }

        pub fn backdrop(&self) -> Option<&Backdrop> {
            self.backdrop.as_ref()
        }
    }

    thread_local! {
        static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        let config = EffectConfig::default();

        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        console_log::init_with_level(config.log_level).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        observers::when_ready(&document, move || {
            if let Err(err) = init(config) {
                log::error!("backdrop init failed: {err}");
            }
        })?;
        Ok(())
    }

    /// Starts the backdrop and page glue. Later calls are no-ops.
    pub fn init(config: EffectConfig) -> Result<(), EffectError> {
        if RUNTIME.with(|slot| slot.borrow().is_some()) {
            return Ok(());
        }
        let window = web_sys::window().ok_or(EffectError::Js("no window".into()))?;
        let document = window
            .document()
            .ok_or(EffectError::Js("no document".into()))?;

        let runtime = Runtime::install(&window, &document, config);
        RUNTIME.with(|slot| {
            *slot.borrow_mut() = Some(runtime);
        });
        Ok(())
    }

    /// Number of animated surfaces, zero before `init` or when none exist.
    #[wasm_bindgen(js_name = "backdropSurfaceCount")]
    pub fn backdrop_surface_count() -> usize {
        RUNTIME.with(|slot| {
            slot.borrow()
                .as_ref()
                .and_then(Runtime::backdrop)
                .map_or(0, Backdrop::effect_count)
        })
    }

    /// Stops the frame loop for good; the canvases keep their last frame and
    /// later `pageshow` events do not restart it.
    #[wasm_bindgen(js_name = "stopBackdrop")]
    pub fn stop_backdrop() {
        RUNTIME.with(|slot| {
            let slot = slot.borrow();
            let Some(backdrop) = slot.as_ref().and_then(Runtime::backdrop) else {
                return;
            };
            if backdrop.is_running() {
                backdrop.stop();
                log::info!("backdrop stopped");
            }
        });
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
