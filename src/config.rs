//! Runtime knobs for the backdrop effect.

/// Which edge of a surface the water pools against.
///
/// The header pools at its bottom edge, the footer at its top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FadeEdge {
    #[default]
    Bottom,
    Top,
}

impl FadeEdge {
    /// Value pushed into the `u_fadeTop` uniform.
    pub fn uniform_value(self) -> f32 {
        match self {
            FadeEdge::Bottom => 0.0,
            FadeEdge::Top => 1.0,
        }
    }
}

/// A canvas the bootstrap should try to animate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub id: String,
    pub fade: FadeEdge,
}

impl SurfaceSpec {
    pub fn new(id: impl Into<String>, fade: FadeEdge) -> Self {
        Self {
            id: id.into(),
            fade,
        }
    }
}

pub const HEADER_CANVAS_ID: &str = "header-canvas";
pub const FOOTER_CANVAS_ID: &str = "footer-canvas";

#[derive(Debug, Clone)]
pub struct EffectConfig {
    pub surfaces: Vec<SurfaceSpec>,
    /// Minimum spacing between executed frames (~30 fps).
    pub frame_interval_ms: f64,
    /// Easing step applied to the hover blend on every drawn frame, in
    /// seconds. Independent of the throttle so an unthrottled loop still eases.
    pub hover_step_secs: f32,
    /// Exponential approach rate of the hover blend, per second.
    pub hover_rate: f32,
    /// Below this distance the hover blend snaps to its target.
    pub hover_epsilon: f32,
    /// Render scale used when the display reports DPR <= 1.
    pub low_dpr_supersample: f64,
    pub log_level: log::Level,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            surfaces: vec![
                SurfaceSpec::new(HEADER_CANVAS_ID, FadeEdge::Bottom),
                SurfaceSpec::new(FOOTER_CANVAS_ID, FadeEdge::Top),
            ],
            frame_interval_ms: 33.0,
            hover_step_secs: 0.033,
            hover_rate: 6.0,
            hover_epsilon: 0.001,
            low_dpr_supersample: 1.5,
            log_level: log::Level::Info,
        }
    }
}

impl EffectConfig {
    pub fn with_surfaces(mut self, surfaces: Vec<SurfaceSpec>) -> Self {
        self.surfaces = surfaces;
        self
    }

    pub fn with_frame_interval_ms(mut self, interval: f64) -> Self {
        self.frame_interval_ms = interval.max(0.0);
        self
    }

    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = level;
        self
    }

    /// Render scale for a reported device pixel ratio.
    ///
    /// Low-density displays are supersampled; anything above 1 passes through.
    pub fn effective_dpr(&self, device_pixel_ratio: f64) -> f64 {
        if device_pixel_ratio <= 1.0 {
            self.low_dpr_supersample
        } else {
            device_pixel_ratio
        }
    }
}
