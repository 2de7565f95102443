use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Event, Window};

use super::observers::{Listeners, ViewportObserver};
use super::render::{current_theme, FrameLoop, GlSurface};
use crate::config::EffectConfig;
use crate::error::EffectError;
use crate::session::{FrameInputs, RenderSession, SessionEvent};

type SharedSession = Rc<RefCell<RenderSession<GlSurface>>>;

/// The running backdrop: session, frame loop and every observer feeding it.
pub struct Backdrop {
    session: SharedSession,
    frame_loop: FrameLoop,
    _viewport: ViewportObserver,
    _listeners: Listeners,
}

impl Backdrop {
    /// Returns `Ok(None)` when none of the configured canvases could be used.
    pub fn start(
        window: &Window,
        document: &Document,
        config: EffectConfig,
    ) -> Result<Option<Self>, EffectError> {
        let origin_ms = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let Some(session) =
            RenderSession::bootstrap(config, origin_ms, |spec| GlSurface::create(document, spec))
        else {
            return Ok(None);
        };
        let session: SharedSession = Rc::new(RefCell::new(session));
        session
            .borrow_mut()
            .handle(SessionEvent::PageVisibility(!document.hidden()));

        let mut listeners = Listeners::default();

        let viewport = {
            let session = session.clone();
            ViewportObserver::new(move |surface, intersecting| {
                session.borrow_mut().handle(SessionEvent::Intersection {
                    surface,
                    intersecting,
                });
            })?
        };

        for effect in session.borrow().effects() {
            let canvas = effect.surface().canvas();
            viewport.observe(canvas);

            let Some(container) = canvas.parent_element() else {
                continue;
            };
            let id = effect.id().to_owned();
            let enter = {
                let (session, id) = (session.clone(), id.clone());
                move |_: Event| session.borrow_mut().handle(SessionEvent::HoverEnter(id.clone()))
            };
            let leave = {
                let session = session.clone();
                move |_: Event| session.borrow_mut().handle(SessionEvent::HoverLeave(id.clone()))
            };
            listeners.add(&container, "mouseenter", enter)?;
            listeners.add(&container, "mouseleave", leave)?;
        }

        {
            let session = session.clone();
            let doc = document.clone();
            listeners.add(document, "visibilitychange", move |_| {
                session
                    .borrow_mut()
                    .handle(SessionEvent::PageVisibility(!doc.hidden()));
            })?;
        }

        {
            let session = session.clone();
            listeners.add(window, "resize", move |_| {
                session.borrow_mut().handle(SessionEvent::WindowResized);
            })?;
        }

        let frame_loop = {
            let session = session.clone();
            let win = window.clone();
            FrameLoop::start(window.clone(), move |timestamp_ms| {
                let inputs = FrameInputs {
                    timestamp_ms,
                    theme: current_theme(&win),
                    device_pixel_ratio: win.device_pixel_ratio(),
                };
                session.borrow_mut().frame(inputs);
            })
        };

        {
            let frame_loop = frame_loop.clone();
            listeners.add(window, "pagehide", move |_| frame_loop.cancel())?;
        }
        {
            let frame_loop = frame_loop.clone();
            listeners.add(window, "pageshow", move |_| frame_loop.resume())?;
        }

        Ok(Some(Self {
            session,
            frame_loop,
            _viewport: viewport,
            _listeners: listeners,
        }))
    }

    pub fn effect_count(&self) -> usize {
        self.session.borrow().effects().len()
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Stops animating for good; `pageshow` no longer restarts the loop.
    pub fn stop(&self) {
        self.frame_loop.stop();
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.frame_loop.stop();
    }
}

