use waterline_wasm::config::{FOOTER_CANVAS_ID, HEADER_CANVAS_ID};
use waterline_wasm::{
    BackingSize, EffectConfig, FadeEdge, FrameInputs, FrameOutcome, FrameUniforms, HoverState,
    RenderSession, RenderSurface, SessionEvent, Theme,
};

struct MockSurface {
    id: String,
    css_size: (f64, f64),
    resizes: Vec<f64>,
    draws: Vec<FrameUniforms>,
}

impl MockSurface {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            css_size: (800.0, 180.0),
            resizes: Vec::new(),
            draws: Vec::new(),
        }
    }
}

impl RenderSurface for MockSurface {
    fn id(&self) -> &str {
        &self.id
    }

    fn resize(&mut self, effective_dpr: f64) -> BackingSize {
        self.resizes.push(effective_dpr);
        BackingSize::from_logical(self.css_size.0, self.css_size.1, effective_dpr)
    }

    fn draw(&mut self, uniforms: &FrameUniforms) {
        self.draws.push(*uniforms);
    }
}

fn session_with(present: &[&str]) -> Option<RenderSession<MockSurface>> {
    RenderSession::bootstrap(EffectConfig::default(), 0.0, |spec| {
        present
            .contains(&spec.id.as_str())
            .then(|| MockSurface::new(&spec.id))
    })
}

fn visible_session() -> RenderSession<MockSurface> {
    let mut session = session_with(&[HEADER_CANVAS_ID, FOOTER_CANVAS_ID]).unwrap();
    for id in [HEADER_CANVAS_ID, FOOTER_CANVAS_ID] {
        session.handle(SessionEvent::Intersection {
            surface: id.to_owned(),
            intersecting: true,
        });
    }
    session
}

fn inputs(timestamp_ms: f64, device_pixel_ratio: f64) -> FrameInputs {
    FrameInputs {
        timestamp_ms,
        theme: Theme::Light,
        device_pixel_ratio,
    }
}

fn surface<'a>(session: &'a RenderSession<MockSurface>, id: &str) -> &'a MockSurface {
    session.effect(id).unwrap().surface()
}

fn total_draws(session: &RenderSession<MockSurface>) -> usize {
    session.effects().iter().map(|e| e.surface().draws.len()).sum()
}

#[test]
fn header_only_page_renders_header_only() {
    let mut session = session_with(&[HEADER_CANVAS_ID]).expect("header effect");
    assert_eq!(session.effects().len(), 1);
    assert!(session.effect(FOOTER_CANVAS_ID).is_none());

    let header = session.effect(HEADER_CANVAS_ID).unwrap();
    assert_eq!(header.fade(), FadeEdge::Bottom);
    assert!(header.needs_resize());

    for id in [HEADER_CANVAS_ID, FOOTER_CANVAS_ID] {
        session.handle(SessionEvent::Intersection {
            surface: id.to_owned(),
            intersecting: true,
        });
    }
    let outcome = session.frame(inputs(0.0, 1.0));
    assert_eq!(outcome, FrameOutcome::Rendered { drawn: 1 });

    let header = session.effect(HEADER_CANVAS_ID).unwrap();
    assert_eq!(header.surface().resizes, vec![1.5]);
    assert_eq!(
        header.backing(),
        BackingSize {
            width: 1200,
            height: 270
        }
    );
    let draw = header.surface().draws[0];
    assert_eq!(draw.dpr, 1.5);
    assert_eq!(draw.is_dark, 0.0);
    assert_eq!(draw.hover, 0.0);
}

#[test]
fn no_surfaces_means_no_session() {
    assert!(session_with(&[]).is_none());
}

#[test]
fn hidden_page_never_draws() {
    let mut session = visible_session();
    session.handle(SessionEvent::PageVisibility(false));
    for i in 0..200 {
        let outcome = session.frame(inputs(i as f64 * 16.7, 2.0));
        assert_eq!(outcome, FrameOutcome::Hidden);
    }
    assert_eq!(total_draws(&session), 0);
    assert!(session.effects().iter().all(|e| e.surface().resizes.is_empty()));

    session.handle(SessionEvent::PageVisibility(true));
    assert_eq!(
        session.frame(inputs(4000.0, 2.0)),
        FrameOutcome::Rendered { drawn: 2 }
    );
}

#[test]
fn offscreen_surfaces_are_skipped() {
    let mut session = session_with(&[HEADER_CANVAS_ID, FOOTER_CANVAS_ID]).unwrap();
    assert_eq!(session.frame(inputs(0.0, 1.0)), FrameOutcome::Hidden);

    session.handle(SessionEvent::Intersection {
        surface: FOOTER_CANVAS_ID.to_owned(),
        intersecting: true,
    });
    assert_eq!(
        session.frame(inputs(100.0, 1.0)),
        FrameOutcome::Rendered { drawn: 1 }
    );
    assert!(surface(&session, HEADER_CANVAS_ID).draws.is_empty());

    session.handle(SessionEvent::Intersection {
        surface: FOOTER_CANVAS_ID.to_owned(),
        intersecting: false,
    });
    assert_eq!(session.frame(inputs(200.0, 1.0)), FrameOutcome::Hidden);
    assert_eq!(surface(&session, FOOTER_CANVAS_ID).draws.len(), 1);
}

#[test]
fn frames_are_throttled_to_the_interval() {
    let mut session = visible_session();
    let interval = session.config().frame_interval_ms;

    let mut executed = Vec::new();
    for i in 0..=200 {
        let ts = i as f64 * 5.0;
        match session.frame(inputs(ts, 2.0)) {
            FrameOutcome::Rendered { .. } => executed.push(ts),
            FrameOutcome::Throttled => {}
            FrameOutcome::Hidden => panic!("surfaces are visible"),
        }
    }

    assert!(executed.len() > 20, "only {} frames ran", executed.len());
    for pair in executed.windows(2) {
        assert!(pair[1] - pair[0] >= interval, "{pair:?}");
    }
    assert_eq!(
        surface(&session, HEADER_CANVAS_ID).draws.len(),
        executed.len()
    );
}

#[test]
fn dpr_change_resizes_once() {
    let mut session = visible_session();

    session.frame(inputs(0.0, 2.0));
    session.frame(inputs(40.0, 2.0));
    session.frame(inputs(80.0, 2.0));
    for id in [HEADER_CANVAS_ID, FOOTER_CANVAS_ID] {
        assert_eq!(surface(&session, id).resizes, vec![2.0]);
    }

    session.frame(inputs(120.0, 3.0));
    session.frame(inputs(160.0, 3.0));
    session.frame(inputs(200.0, 3.0));
    for id in [HEADER_CANVAS_ID, FOOTER_CANVAS_ID] {
        assert_eq!(surface(&session, id).resizes, vec![2.0, 3.0]);
        assert_eq!(surface(&session, id).draws.len(), 6);
    }
}

#[test]
fn offscreen_surface_resizes_when_it_returns() {
    let mut session = visible_session();
    session.frame(inputs(0.0, 2.0));

    session.handle(SessionEvent::Intersection {
        surface: FOOTER_CANVAS_ID.to_owned(),
        intersecting: false,
    });
    session.frame(inputs(50.0, 1.0));
    assert_eq!(surface(&session, HEADER_CANVAS_ID).resizes, vec![2.0, 1.5]);
    assert_eq!(surface(&session, FOOTER_CANVAS_ID).resizes, vec![2.0]);
    assert!(session.effect(FOOTER_CANVAS_ID).unwrap().needs_resize());

    session.handle(SessionEvent::Intersection {
        surface: FOOTER_CANVAS_ID.to_owned(),
        intersecting: true,
    });
    session.frame(inputs(100.0, 1.0));
    session.frame(inputs(150.0, 1.0));
    assert_eq!(surface(&session, FOOTER_CANVAS_ID).resizes, vec![2.0, 1.5]);
}

#[test]
fn window_resize_marks_every_surface_dirty() {
    let mut session = visible_session();
    session.frame(inputs(0.0, 2.0));
    session.handle(SessionEvent::WindowResized);
    assert!(session.effects().iter().all(|e| e.needs_resize()));

    session.frame(inputs(50.0, 2.0));
    session.frame(inputs(100.0, 2.0));
    for id in [HEADER_CANVAS_ID, FOOTER_CANVAS_ID] {
        assert_eq!(surface(&session, id).resizes.len(), 2);
    }
}

#[test]
fn effective_dpr_supersamples_low_density() {
    let config = EffectConfig::default();
    assert_eq!(config.effective_dpr(1.0), 1.5);
    assert_eq!(config.effective_dpr(0.75), 1.5);
    assert_eq!(config.effective_dpr(1.25), 1.25);
    assert_eq!(config.effective_dpr(2.0), 2.0);
}

#[test]
fn hover_eases_monotonically_to_target() {
    let config = EffectConfig::default();
    let dt = config.hover_step_secs;
    let mut hover = HoverState::default();
    hover.set_hovered(true);

    let mut previous = hover.value;
    let mut steps = 0;
    while hover.value < 1.0 {
        let value = hover.advance(dt, config.hover_rate, config.hover_epsilon);
        assert!(value > previous, "step {steps}: {value} <= {previous}");
        assert!(value <= 1.0);
        previous = value;
        steps += 1;
        assert!(steps < 100, "hover never settled");
    }
    for _ in 0..10 {
        assert_eq!(hover.advance(dt, config.hover_rate, config.hover_epsilon), 1.0);
    }

    hover.set_hovered(false);
    let mut previous = hover.value;
    while hover.value > 0.0 {
        let value = hover.advance(dt, config.hover_rate, config.hover_epsilon);
        assert!(value < previous && value >= 0.0);
        previous = value;
    }
}

#[test]
fn hover_settles_without_throttling() {
    let config = EffectConfig::default().with_frame_interval_ms(0.0);
    let mut session = RenderSession::bootstrap(config, 0.0, |spec| {
        (spec.id == HEADER_CANVAS_ID).then(|| MockSurface::new(&spec.id))
    })
    .expect("header effect");
    session.handle(SessionEvent::Intersection {
        surface: HEADER_CANVAS_ID.to_owned(),
        intersecting: true,
    });
    session.handle(SessionEvent::HoverEnter(HEADER_CANVAS_ID.to_owned()));

    for i in 0..600 {
        session.frame(inputs(i as f64 * 16.7, 2.0));
    }
    let draws = &surface(&session, HEADER_CANVAS_ID).draws;
    assert_eq!(draws.len(), 600);
    assert_eq!(draws.last().map(|d| d.hover), Some(1.0));
}

#[test]
fn hover_messages_reach_only_their_surface() {
    let mut session = visible_session();
    session.handle(SessionEvent::HoverEnter(HEADER_CANVAS_ID.to_owned()));

    for i in 0..5 {
        session.frame(inputs(i as f64 * 40.0, 2.0));
    }
    let header: Vec<f32> = surface(&session, HEADER_CANVAS_ID)
        .draws
        .iter()
        .map(|d| d.hover)
        .collect();
    assert!(header.windows(2).all(|w| w[1] > w[0]), "{header:?}");
    assert!(header[0] > 0.0);
    assert!(surface(&session, FOOTER_CANVAS_ID)
        .draws
        .iter()
        .all(|d| d.hover == 0.0));

    session.handle(SessionEvent::HoverLeave(HEADER_CANVAS_ID.to_owned()));
    assert_eq!(
        session.effect(HEADER_CANVAS_ID).unwrap().hover().target,
        0.0
    );
}

#[test]
fn uniforms_follow_clock_and_theme() {
    let mut session = RenderSession::bootstrap(EffectConfig::default(), 1000.0, |spec| {
        Some(MockSurface::new(&spec.id))
    })
    .unwrap();
    session.handle(SessionEvent::Intersection {
        surface: HEADER_CANVAS_ID.to_owned(),
        intersecting: true,
    });

    session.frame(FrameInputs {
        timestamp_ms: 3000.0,
        theme: Theme::Dark,
        device_pixel_ratio: 2.0,
    });
    let draw = surface(&session, HEADER_CANVAS_ID).draws[0];
    assert_eq!(draw.time, 2.0);
    assert_eq!(draw.is_dark, 1.0);
    assert_eq!(draw.dpr, 2.0);
    assert!(surface(&session, FOOTER_CANVAS_ID).draws.is_empty());
}
