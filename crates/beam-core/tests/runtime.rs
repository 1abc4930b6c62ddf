// End-to-end frame pipeline on an in-memory page: engine, detection, tracing,
// broadcast and renderers, plus teardown and per-frame failure handling.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use beam_core::{
    BackendKind, BeamConfig, BeamRuntime, ConfigError, FrameOutcome, FrameView, LightEvent, Lifecycle,
    MemoryViewport, PathRenderer, ViewportEvent, ViewportSource,
};

#[derive(Clone, Debug, PartialEq)]
struct Seen {
    lit: usize,
    base: usize,
    base_changed: bool,
    active: Option<String>,
    waypoints: usize,
}

#[derive(Clone, Default)]
struct Probe {
    seen: Rc<RefCell<Vec<Seen>>>,
    fail: Rc<Cell<bool>>,
    panic: Rc<Cell<bool>>,
    cleared: Rc<Cell<bool>>,
}

impl PathRenderer for Probe {
    fn render(&mut self, frame: &FrameView<'_>) -> anyhow::Result<()> {
        if self.panic.get() {
            panic!("renderer exploded");
        }
        if self.fail.get() {
            anyhow::bail!("svg element went away");
        }
        self.seen.borrow_mut().push(Seen {
            lit: frame.lit.len(),
            base: frame.base.len(),
            base_changed: frame.base_changed,
            active: frame.active_section.map(str::to_string),
            waypoints: frame.waypoints.len(),
        });
        Ok(())
    }

    fn clear(&mut self) {
        self.cleared.set(true);
    }
}

fn page() -> MemoryViewport {
    MemoryViewport::new(1280.0, 1000.0, 3000.0)
        .with_section("a", 0.0, 1000.0)
        .with_section("b", 1000.0, 2000.0)
        .with_section("c", 2000.0, 3000.0)
}

fn runtime() -> (BeamRuntime<MemoryViewport>, Probe) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut config = BeamConfig::default().with_sections(["a", "b", "c"]);
    config.light_offset = 1.0;
    let mut rt = BeamRuntime::new(config, page()).unwrap();
    let probe = Probe::default();
    rt.add_renderer(Box::new(probe.clone()));
    (rt, probe)
}

fn listen(rt: &BeamRuntime<MemoryViewport>, id: &str) -> Rc<RefCell<Vec<(bool, f32)>>> {
    let events: Rc<RefCell<Vec<(bool, f32)>>> = Rc::default();
    let sink = events.clone();
    let _sub = rt.broadcaster().subscribe(id, move |ev: &LightEvent| {
        sink.borrow_mut().push((ev.is_active, ev.progress));
    });
    events
}

#[test]
fn config_defaults_and_json() {
    let cfg = BeamConfig::from_json("{}").unwrap();
    assert_eq!(cfg, BeamConfig::default());
    assert_eq!(cfg.sections.len(), 5);
    assert_eq!(cfg.light_offset, 0.9);

    let cfg = BeamConfig::from_json(
        r#"{"sections": ["hero", "about"], "lightOffset": 0.5, "debug": true,
            "scroll": {"smooth": false}, "space": {"x": "percent", "extent": "viewport"}}"#,
    )
    .unwrap();
    assert_eq!(cfg.sections, vec!["hero".to_string(), "about".to_string()]);
    assert_eq!(cfg.light_offset, 0.5);
    assert!(cfg.debug);
    assert!(!cfg.scroll.smooth);
    assert_eq!(cfg.graph_spec().nodes.len(), 6);

    assert!(matches!(BeamConfig::from_json("[1, 2"), Err(ConfigError::Parse(_))));
}

#[test]
fn invalid_setup_fails_before_any_frame() {
    let dup = BeamConfig::default().with_sections(["a", "a"]);
    assert!(matches!(
        BeamRuntime::new(dup, page()),
        Err(ConfigError::DuplicateSection(_))
    ));

    let bad_graph = BeamConfig::from_json(
        r#"{"graph": {"nodes": [{"id": "a", "x": 0, "y": 0, "activationThreshold": 0}],
                      "edges": [{"id": "e", "from": "a", "to": "ghost"}]}}"#,
    )
    .unwrap();
    assert!(matches!(
        BeamRuntime::new(bad_graph, page()),
        Err(ConfigError::Graph(_))
    ));
}

#[test]
fn frame_runs_the_whole_pipeline() {
    let (mut rt, probe) = runtime();
    let b = listen(&rt, "b");
    let c = listen(&rt, "c");

    assert!(rt.scroll_to_section("b", 0.0, true));
    assert_eq!(rt.viewport().scroll_y(), 1000.0);
    assert_eq!(rt.frame(0.0), FrameOutcome::Rendered);

    let state = rt.context().read();
    assert!((state.progress - 0.5).abs() < 1e-6);
    assert_eq!(*b.borrow(), vec![(true, 0.5)]);
    assert!(c.borrow().is_empty());

    let seen = probe.seen.borrow().last().cloned().unwrap();
    assert_eq!(seen.active.as_deref(), Some("b"));
    assert!(seen.base_changed);
    assert_eq!(seen.base, rt.tracer().graph().edges().len());
    assert!(seen.lit > 0 && seen.lit < seen.base);
    let reached = rt.tracer().reached_nodes(0.5).count();
    assert_eq!(seen.waypoints, reached);
    assert!(seen.waypoints > 1 && seen.waypoints < rt.tracer().graph().nodes().len());
}

#[test]
fn leaving_a_section_publishes_a_final_inactive_event() {
    let (mut rt, _probe) = runtime();
    let b = listen(&rt, "b");
    let c = listen(&rt, "c");

    rt.scroll_to_section("b", 0.0, true);
    rt.frame(0.0);
    rt.scroll_to_section("c", 0.0, true);
    rt.frame(16.0);
    rt.frame(32.0);

    assert_eq!(*b.borrow(), vec![(true, 0.5), (false, 1.0)]);
    assert_eq!(*c.borrow(), vec![(true, 1.0), (true, 1.0)]);
}

#[test]
fn handlers_can_subscribe_mid_frame_through_a_bus_handle() {
    let (mut rt, _probe) = runtime();
    let bus = rt.broadcaster();
    let tokens: Rc<RefCell<Vec<u64>>> = Rc::default();

    let (b, t) = (bus.clone(), tokens.clone());
    let sub = bus.subscribe("b", move |_ev: &LightEvent| {
        if t.borrow().is_empty() {
            let late = b.subscribe("c", |_ev: &LightEvent| {});
            t.borrow_mut().push(late.token());
        }
    });

    rt.scroll_to_section("b", 0.0, true);
    assert_eq!(rt.frame(0.0), FrameOutcome::Rendered);
    let tokens = tokens.borrow();
    assert_eq!(tokens.len(), 1);
    assert_ne!(tokens[0], 0);
    assert_ne!(tokens[0], sub.token());
    assert_eq!(bus.subscriber_count("c"), 1);
}

#[test]
fn scroll_to_section_honors_offset_and_missing_ids() {
    let (mut rt, _probe) = runtime();
    assert!(rt.scroll_to_section("c", -80.0, true));
    assert_eq!(rt.viewport().scroll_y(), 1920.0);
    assert!(!rt.scroll_to_section("nope", 0.0, true));
    assert_eq!(rt.viewport().scroll_y(), 1920.0);
}

#[test]
fn scroll_to_position_clamps_to_the_page() {
    let (mut rt, _probe) = runtime();
    rt.scroll_to(5000.0, true);
    assert_eq!(rt.viewport().scroll_y(), 2000.0);
    rt.frame(0.0);
    assert_eq!(rt.context().read().progress, 1.0);
}

#[test]
fn wheel_input_animates_over_frames() {
    let (mut rt, probe) = runtime();
    rt.handle(ViewportEvent::Wheel { delta_y: 1250.0 });
    let mut last = 0.0;
    let mut ts = 0.0;
    while ts <= 3000.0 {
        assert_eq!(rt.frame(ts), FrameOutcome::Rendered);
        let p = rt.context().read().progress;
        assert!(p >= last);
        last = p;
        ts += 16.0;
    }
    // 1250 * 0.8 of 2000px
    assert!((last - 0.5).abs() < 1e-4);
    assert_eq!(probe.seen.borrow().last().unwrap().active.as_deref(), Some("b"));
}

#[test]
fn resize_rebuilds_base_paths_once() {
    let (mut rt, probe) = runtime();
    rt.frame(0.0);
    rt.frame(16.0);
    rt.handle(ViewportEvent::Resize);
    rt.frame(32.0);
    rt.frame(48.0);
    let changed: Vec<bool> = probe.seen.borrow().iter().map(|s| s.base_changed).collect();
    assert_eq!(changed, vec![true, false, true, false]);

    rt.viewport().resize(1440.0, 1000.0);
    rt.frame(64.0);
    assert!(probe.seen.borrow().last().unwrap().base_changed);
}

#[test]
fn failing_renderer_skips_the_frame() {
    let (mut rt, probe) = runtime();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    rt.driver_mut().register(move |_info| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    assert_eq!(rt.frame(0.0), FrameOutcome::Rendered);
    probe.fail.set(true);
    assert_eq!(rt.frame(16.0), FrameOutcome::Skipped);
    assert_eq!(calls.get(), 1, "later stages must not run");

    probe.fail.set(false);
    probe.panic.set(true);
    assert_eq!(rt.frame(32.0), FrameOutcome::Skipped);

    probe.panic.set(false);
    assert_eq!(rt.frame(48.0), FrameOutcome::Rendered);
    assert_eq!(calls.get(), 2);
    assert_eq!(rt.driver().skipped(), 2);
    assert_eq!(rt.driver().frames(), 2);
    assert!(rt.debug_snapshot().to_string().contains("Skipped: 2/4"));
}

#[test]
fn failing_frame_callback_skips_the_rest() {
    let (mut rt, _probe) = runtime();
    let after = Rc::new(Cell::new(0));
    rt.driver_mut().register(|info| {
        if info.index == 1 {
            anyhow::bail!("bad frame");
        }
        Ok(())
    });
    let a = after.clone();
    rt.driver_mut().register(move |_info| {
        a.set(a.get() + 1);
        Ok(())
    });

    assert_eq!(rt.frame(0.0), FrameOutcome::Rendered);
    assert_eq!(rt.frame(16.0), FrameOutcome::Skipped);
    assert_eq!(after.get(), 1);
}

#[test]
fn dispose_mid_animation_stops_everything() {
    let (mut rt, probe) = runtime();
    let b = listen(&rt, "b");
    let ticks = Rc::new(Cell::new(0));
    let t = ticks.clone();
    rt.driver_mut().register(move |_info| {
        t.set(t.get() + 1);
        Ok(())
    });

    rt.handle(ViewportEvent::Wheel { delta_y: 1250.0 });
    for i in 0..10 {
        rt.frame(i as f64 * 16.0);
    }
    let ctx = rt.context();
    let frozen = ctx.read();
    assert!(frozen.is_scrolling);
    let page_y = rt.viewport().scroll_y();
    let rendered = probe.seen.borrow().len();
    let ticked = ticks.get();
    let events = b.borrow().len();

    rt.dispose();
    assert!(rt.is_disposed());
    assert!(probe.cleared.get());
    assert_eq!(ctx.lifecycle(), Lifecycle::Disposed);
    assert_eq!(rt.backend(), BackendKind::Stopped);

    for i in 10..40 {
        assert_eq!(rt.frame(i as f64 * 16.0), FrameOutcome::Cancelled);
    }
    rt.handle(ViewportEvent::Wheel { delta_y: 500.0 });
    assert!(!rt.scroll_to_section("a", 0.0, true));

    assert_eq!(ticks.get(), ticked);
    assert_eq!(probe.seen.borrow().len(), rendered);
    assert_eq!(b.borrow().len(), events);
    assert_eq!(ctx.read(), frozen);
    assert_eq!(rt.viewport().scroll_y(), page_y);

    rt.dispose();
}

#[test]
fn raw_fallback_still_drives_the_pipeline() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut config = BeamConfig::default().with_sections(["a", "b", "c"]);
    config.light_offset = 1.0;
    let mut rt = BeamRuntime::new(config, page().without_smooth_scroll()).unwrap();
    assert_eq!(rt.backend(), BackendKind::Raw);
    let b = listen(&rt, "b");

    rt.viewport().set_scroll_y(1000.0);
    rt.handle(ViewportEvent::Scroll);
    assert_eq!(rt.frame(0.0), FrameOutcome::Rendered);
    assert_eq!(*b.borrow(), vec![(true, 0.5)]);
}

#[test]
fn debug_snapshot_text() {
    let (mut rt, _probe) = runtime();
    rt.scroll_to_section("b", 0.0, true);
    rt.frame(0.0);
    let snap = rt.debug_snapshot();
    assert_eq!(snap.active_section.as_deref(), Some("b"));
    let text = snap.to_string();
    assert!(text.starts_with("Progress: 50.0% | ScrollY: 1000px"), "{}", text);
    assert!(text.contains("Backend: smooth"));
    assert!(text.contains("Active: b"));
    assert!(!text.contains("Skipped"));
}
