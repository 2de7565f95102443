//! One animated canvas and its per-surface animation state.

use crate::config::FadeEdge;

/// Backing-store size of a surface in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

impl BackingSize {
    /// Logical CSS size scaled by `dpr`, truncated the way canvas width
    /// assignment truncates.
    pub fn from_logical(css_width: f64, css_height: f64, dpr: f64) -> Self {
        Self {
            width: (css_width * dpr).max(0.0) as u32,
            height: (css_height * dpr).max(0.0) as u32,
        }
    }
}

/// Uniforms that change every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub time: f32,
    pub is_dark: f32,
    pub dpr: f32,
    pub hover: f32,
}

/// A drawable region the scheduler can resize and draw into.
///
/// The browser build implements this over a WebGL2 canvas.
pub trait RenderSurface {
    fn id(&self) -> &str;

    /// Recomputes the backing size for `effective_dpr` and updates the
    /// viewport and resolution uniform to match.
    fn resize(&mut self, effective_dpr: f64) -> BackingSize;

    /// Pushes per-frame uniforms and issues one full-screen draw.
    fn draw(&mut self, uniforms: &FrameUniforms);
}

/// Hover blend eased toward a 0/1 target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoverState {
    pub target: f32,
    pub value: f32,
}

impl HoverState {
    pub fn set_hovered(&mut self, hovered: bool) {
        self.target = if hovered { 1.0 } else { 0.0 };
    }

    /// Exponential approach toward the target, clamped to [0, 1].
    pub fn advance(&mut self, dt_secs: f32, rate: f32, epsilon: f32) -> f32 {
        let diff = self.target - self.value;
        if diff.abs() > epsilon {
            self.value = (self.value + diff * dt_secs * rate).clamp(0.0, 1.0);
        } else {
            self.value = self.target;
        }
        self.value
    }
}

pub struct EffectInstance<S> {
    surface: S,
    fade: FadeEdge,
    hover: HoverState,
    needs_resize: bool,
    backing: BackingSize,
}

impl<S: RenderSurface> EffectInstance<S> {
    /// Wraps a surface whose program already carries `fade` in its
    /// orientation uniform. New instances are dirty so the first tick sizes
    /// the backing store.
    pub fn new(surface: S, fade: FadeEdge) -> Self {
        Self {
            surface,
            fade,
            hover: HoverState::default(),
            needs_resize: true,
            backing: BackingSize::default(),
        }
    }

    pub fn id(&self) -> &str {
        self.surface.id()
    }

    pub fn fade(&self) -> FadeEdge {
        self.fade
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hover.set_hovered(hovered);
    }

    pub fn needs_resize(&self) -> bool {
        self.needs_resize
    }

    pub fn mark_dirty(&mut self) {
        self.needs_resize = true;
    }

    pub fn backing(&self) -> BackingSize {
        self.backing
    }

    pub fn ease_hover(&mut self, dt_secs: f32, rate: f32, epsilon: f32) -> f32 {
        self.hover.advance(dt_secs, rate, epsilon)
    }

    /// Resizes if dirty, then draws one frame with the current hover blend.
    pub fn tick(&mut self, elapsed_secs: f32, is_dark: f32, effective_dpr: f64) {
        if self.needs_resize {
            self.backing = self.surface.resize(effective_dpr);
            self.needs_resize = false;
            log::debug!(
                "resized '{}' to {}x{} @ {effective_dpr}",
                self.surface.id(),
                self.backing.width,
                self.backing.height
            );
        }
        self.surface.draw(&FrameUniforms {
            time: elapsed_secs,
            is_dark,
            dpr: effective_dpr as f32,
            hover: self.hover.value,
        });
    }
}
