//! Owned state of one page's backdrop: effects, visibility, clock, cadence.

use crate::config::{EffectConfig, SurfaceSpec};
use crate::effect::{EffectInstance, RenderSurface};
use crate::scheduler::{FrameGate, FrameScheduler};
use crate::theme::Theme;
use crate::visibility::VisibilityState;

/// Monotonic session time measured from bootstrap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionClock {
    origin_ms: f64,
}

impl SessionClock {
    pub fn starting_at(origin_ms: f64) -> Self {
        Self { origin_ms }
    }

    pub fn elapsed_secs(&self, now_ms: f64) -> f32 {
        ((now_ms - self.origin_ms).max(0.0) / 1000.0) as f32
    }
}

/// Everything observers report to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PageVisibility(bool),
    Intersection { surface: String, intersecting: bool },
    HoverEnter(String),
    HoverLeave(String),
    WindowResized,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub timestamp_ms: f64,
    pub theme: Theme,
    pub device_pixel_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Hidden,
    Throttled,
    Rendered { drawn: usize },
}

pub struct RenderSession<S> {
    config: EffectConfig,
    effects: Vec<EffectInstance<S>>,
    visibility: VisibilityState,
    clock: SessionClock,
    scheduler: FrameScheduler,
}

impl<S: RenderSurface> RenderSession<S> {
    /// Creates one effect per configured surface. `factory` returning `None`
    /// skips that surface; if every surface is skipped there is no session.
    pub fn bootstrap<F>(config: EffectConfig, origin_ms: f64, mut factory: F) -> Option<Self>
    where
        F: FnMut(&SurfaceSpec) -> Option<S>,
    {
        let effects: Vec<_> = config
            .surfaces
            .iter()
            .filter_map(|spec| match factory(spec) {
                Some(surface) => Some(EffectInstance::new(surface, spec.fade)),
                None => {
                    log::debug!("surface '{}' unavailable, skipping", spec.id);
                    None
                }
            })
            .collect();

        if effects.is_empty() {
            log::info!("no backdrop surfaces on this page");
            return None;
        }
        log::info!("backdrop running on {} surface(s)", effects.len());

        let scheduler = FrameScheduler::new(config.frame_interval_ms);
        Some(Self {
            config,
            effects,
            visibility: VisibilityState::default(),
            clock: SessionClock::starting_at(origin_ms),
            scheduler,
        })
    }

    pub fn effects(&self) -> &[EffectInstance<S>] {
        &self.effects
    }

    pub fn effect(&self, id: &str) -> Option<&EffectInstance<S>> {
        self.effects.iter().find(|e| e.id() == id)
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::PageVisibility(visible) => self.visibility.set_page_visible(visible),
            SessionEvent::Intersection {
                surface,
                intersecting,
            } => self.visibility.set_intersecting(&surface, intersecting),
            SessionEvent::HoverEnter(surface) => self.set_hovered(&surface, true),
            SessionEvent::HoverLeave(surface) => self.set_hovered(&surface, false),
            SessionEvent::WindowResized => self.mark_all_dirty(),
        }
    }

    fn set_hovered(&mut self, surface: &str, hovered: bool) {
        if let Some(effect) = self.effects.iter_mut().find(|e| e.id() == surface) {
            effect.set_hovered(hovered);
        }
    }

    fn mark_all_dirty(&mut self) {
        for effect in &mut self.effects {
            effect.mark_dirty();
        }
    }

    /// Runs one animation-frame callback.
    pub fn frame(&mut self, inputs: FrameInputs) -> FrameOutcome {
        match self.scheduler.admit(inputs.timestamp_ms, &self.visibility) {
            FrameGate::Hidden => return FrameOutcome::Hidden,
            FrameGate::Throttled => return FrameOutcome::Throttled,
            FrameGate::Run => {}
        }

        let elapsed = self.clock.elapsed_secs(inputs.timestamp_ms);
        let is_dark = inputs.theme.flag();

        if self.scheduler.observe_dpr(inputs.device_pixel_ratio) {
            log::debug!("device pixel ratio now {}", inputs.device_pixel_ratio);
            self.mark_all_dirty();
        }
        let effective_dpr = self.config.effective_dpr(inputs.device_pixel_ratio);

        let dt = self.config.hover_step_secs;
        let (rate, epsilon) = (self.config.hover_rate, self.config.hover_epsilon);

        let mut drawn = 0;
        for effect in &mut self.effects {
            if !self.visibility.should_render(effect.id()) {
                continue;
            }
            effect.ease_hover(dt, rate, epsilon);
            effect.tick(elapsed, is_dark, effective_dpr);
            drawn += 1;
        }
        FrameOutcome::Rendered { drawn }
    }
}
