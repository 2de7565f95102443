//! Frame gating for the animation-frame loop.

use crate::visibility::VisibilityState;

/// What the loop should do with one animation-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameGate {
    /// Page hidden or no surface in the viewport.
    Hidden,
    /// Too soon after the previous executed frame.
    Throttled,
    Run,
}

/// Caps the drawing cadence and tracks the device pixel ratio.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    frame_interval_ms: f64,
    last_frame_ms: Option<f64>,
    current_dpr: Option<f64>,
}

impl FrameScheduler {
    pub fn new(frame_interval_ms: f64) -> Self {
        Self {
            frame_interval_ms,
            last_frame_ms: None,
            current_dpr: None,
        }
    }

    /// Decides whether the callback at `timestamp_ms` does any work.
    ///
    /// Only an admitted frame moves the throttle window forward.
    pub fn admit(&mut self, timestamp_ms: f64, visibility: &VisibilityState) -> FrameGate {
        if !visibility.anything_visible() {
            return FrameGate::Hidden;
        }
        if let Some(last) = self.last_frame_ms {
            if timestamp_ms - last < self.frame_interval_ms {
                return FrameGate::Throttled;
            }
        }
        self.last_frame_ms = Some(timestamp_ms);
        FrameGate::Run
    }

    /// Records the current DPR. Returns true when it differs from the last
    /// observed value; the first observation is never a change.
    pub fn observe_dpr(&mut self, dpr: f64) -> bool {
        match self.current_dpr.replace(dpr) {
            Some(previous) => previous != dpr,
            None => false,
        }
    }

    pub fn current_dpr(&self) -> Option<f64> {
        self.current_dpr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible() -> VisibilityState {
        let mut visibility = VisibilityState::default();
        visibility.set_intersecting("header-canvas", true);
        visibility
    }

    #[test]
    fn hidden_frames_do_not_advance_the_window() {
        let mut scheduler = FrameScheduler::new(33.0);
        let mut hidden = visible();
        hidden.set_page_visible(false);

        assert_eq!(scheduler.admit(0.0, &hidden), FrameGate::Hidden);
        assert_eq!(scheduler.admit(10.0, &visible()), FrameGate::Run);
        assert_eq!(scheduler.admit(30.0, &visible()), FrameGate::Throttled);
        assert_eq!(scheduler.admit(43.0, &visible()), FrameGate::Run);
    }

    #[test]
    fn first_dpr_observation_is_not_a_change() {
        let mut scheduler = FrameScheduler::new(33.0);
        assert!(!scheduler.observe_dpr(2.0));
        assert!(!scheduler.observe_dpr(2.0));
        assert!(scheduler.observe_dpr(1.0));
        assert_eq!(scheduler.current_dpr(), Some(1.0));
    }
}
