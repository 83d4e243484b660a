use std::f64::consts::PI;
use std::rc::Rc;

use glstart::mock::{GlCall, ManualScheduler, MockHost, MockSurface};
use glstart::{
    launch_webgl_sample, BundledSources, DemoConfig, DemoError, InlineSources, RendererState,
    ShaderStage, Size, Surface,
};

fn host(supported: &[&str]) -> MockHost {
    MockHost::new(MockSurface::new(Size::new(400, 300), 2.0), supported)
}

fn is_setup_or_draw(call: &GlCall) -> bool {
    matches!(
        call,
        GlCall::CreateBuffer(_)
            | GlCall::UploadStatic(_)
            | GlCall::UseProgram(_)
            | GlCall::EnableVertexAttribArray(_)
            | GlCall::DrawTriangleStrip(..)
    )
}

#[test]
fn falls_back_to_experimental_context() {
    let host = host(&["experimental-webgl"]);
    let scheduler = Rc::new(ManualScheduler::default());

    let renderer =
        launch_webgl_sample(&host, scheduler, &BundledSources, &DemoConfig::default()).unwrap();

    assert_eq!(host.context_requests(), vec!["webgl", "experimental-webgl"]);
    assert_eq!(renderer.borrow().state(), RendererState::Running);
    assert!(host.alerts().is_empty());
}

#[test]
fn missing_context_alerts_and_does_nothing_else() {
    let host = host(&[]);
    let scheduler = Rc::new(ManualScheduler::default());

    let result = launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &BundledSources,
        &DemoConfig::default(),
    );

    assert_eq!(result.err(), Some(DemoError::ContextUnavailable));
    assert_eq!(host.alerts(), vec!["Failed to acquire a WebGL context."]);
    assert!(host.gl().calls().is_empty());
    assert_eq!(host.resize_listener_count(), 0);
    assert_eq!(scheduler.pending_frames(), 0);
    assert_eq!(host.mock_surface().backing_size(), Size::new(300, 150));
}

#[test]
fn compile_error_alert_includes_compiler_log() {
    let host = host(&["webgl"]);
    host.gl()
        .fail_compile(ShaderStage::Fragment, "ERROR: 0:4: 'sin' : no matching overload");
    let scheduler = Rc::new(ManualScheduler::default());

    let result = launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &BundledSources,
        &DemoConfig::default(),
    );

    assert!(matches!(
        result,
        Err(DemoError::ShaderCompile {
            stage: ShaderStage::Fragment,
            ..
        })
    ));
    let alerts = host.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("no matching overload"), "{}", alerts[0]);
    assert_eq!(host.gl().count(is_setup_or_draw), 0);
    assert_eq!(host.resize_listener_count(), 0);
    assert_eq!(scheduler.pending_frames(), 0);
}

#[test]
fn link_failure_alerts_generic_message() {
    let host = host(&["webgl"]);
    host.gl().fail_link("varying mismatch");
    let scheduler = Rc::new(ManualScheduler::default());

    let result = launch_webgl_sample(&host, scheduler, &BundledSources, &DemoConfig::default());

    assert!(matches!(result, Err(DemoError::ProgramLink { .. })));
    assert_eq!(host.alerts(), vec!["Unable to initialize the shader program."]);
    assert_eq!(host.gl().count(is_setup_or_draw), 0);
}

#[test]
fn fixture_without_position_attribute_fails_to_initialize() {
    let host = host(&["webgl"]);
    let sources = InlineSources::new(
        "void main(void) { gl_Position = vec4(0.0); }",
        "void main(void) { gl_FragColor = vec4(1.0); }",
    );

    let result = launch_webgl_sample(
        &host,
        Rc::new(ManualScheduler::default()),
        &sources,
        &DemoConfig::default(),
    );

    assert!(matches!(result, Err(DemoError::MissingAttribute("vertexPosition"))));
    assert_eq!(host.alerts().len(), 1);
}

#[test]
fn startup_sizes_canvas_for_pixel_ratio() {
    let host = host(&["webgl"]);
    launch_webgl_sample(
        &host,
        Rc::new(ManualScheduler::default()),
        &BundledSources,
        &DemoConfig::default(),
    )
    .unwrap();

    assert_eq!(host.mock_surface().backing_size(), Size::new(800, 600));
    assert_eq!(
        host.gl().count(|c| matches!(c, GlCall::Viewport(0, 0, 800, 600))),
        1
    );
}

#[test]
fn loop_draws_one_quad_per_frame_with_stable_locations() {
    let host = host(&["webgl"]);
    let scheduler = Rc::new(ManualScheduler::default());
    let renderer = launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &BundledSources,
        &DemoConfig::default(),
    )
    .unwrap();

    // Nothing draws until the host delivers a frame.
    assert_eq!(host.gl().count(|c| matches!(c, GlCall::DrawTriangleStrip(..))), 0);
    assert_eq!(scheduler.pending_frames(), 1);

    for _ in 0..10 {
        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(scheduler.pending_frames(), 1);
        scheduler.advance(16);
    }

    assert_eq!(renderer.borrow().frames_rendered(), 10);
    assert_eq!(
        host.gl().count(|c| *c == GlCall::DrawTriangleStrip(0, 4)),
        10
    );
    assert_eq!(host.gl().count(|c| matches!(c, GlCall::AttribLocation(_))), 1);
    assert_eq!(host.gl().count(|c| matches!(c, GlCall::UniformLocation(_))), 1);

    let times: Vec<f32> = host
        .gl()
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            GlCall::Uniform1f(location, value) => {
                assert_eq!(location, Some(glstart::mock::RecordingGl::TIME_LOCATION));
                Some(value)
            }
            _ => None,
        })
        .collect();
    assert_eq!(times.len(), 10);
    assert_eq!(times[0], 0.0);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    assert!((times[9] - 0.144).abs() < 1e-4);
}

#[test]
fn time_wraps_on_long_sessions() {
    let host = host(&["webgl"]);
    let scheduler = Rc::new(ManualScheduler::default());
    let renderer = launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &BundledSources,
        &DemoConfig::default(),
    )
    .unwrap();

    scheduler.run_frame();
    // 1000π seconds plus ten.
    let wrap_ms = (1000.0 * PI * 1000.0) as u32;
    scheduler.advance(wrap_ms + 10_000);
    scheduler.run_frame();

    let last = host.gl().calls().into_iter().rev().find_map(|c| match c {
        GlCall::Uniform1f(_, value) => Some(value),
        _ => None,
    });
    let last = last.expect("time uniform updated");
    assert!(last >= 0.0 && f64::from(last) < 1000.0 * PI);
    assert!((last - 10.0).abs() < 0.01, "{last}");
    assert_eq!(renderer.borrow().frames_rendered(), 2);
}

#[test]
fn resize_burst_collapses_into_one_viewport_update() {
    let host = host(&["webgl"]);
    let scheduler = Rc::new(ManualScheduler::default());
    launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &BundledSources,
        &DemoConfig::default(),
    )
    .unwrap();
    assert_eq!(host.resize_listener_count(), 1);
    host.gl().clear_calls();

    for width in [500, 520, 540, 560] {
        host.mock_surface().set_display_size(Size::new(width, 300));
        host.fire_resize();
        scheduler.advance(200);
    }
    assert_eq!(host.gl().count(|c| matches!(c, GlCall::Viewport(..))), 0);

    scheduler.advance(400);
    assert_eq!(host.gl().calls(), vec![GlCall::Viewport(0, 0, 1120, 600)]);
    assert_eq!(host.mock_surface().backing_size(), Size::new(1120, 600));
}

#[test]
fn resize_without_size_change_leaves_viewport_alone() {
    let host = host(&["webgl"]);
    let scheduler = Rc::new(ManualScheduler::default());
    launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &BundledSources,
        &DemoConfig::default(),
    )
    .unwrap();
    host.gl().clear_calls();

    host.fire_resize();
    scheduler.advance(600);

    assert!(host.gl().calls().is_empty());
    assert_eq!(scheduler.pending_timers(), 0);
}

#[test]
fn pixel_ratio_change_is_picked_up_on_resize() {
    let host = host(&["webgl"]);
    let scheduler = Rc::new(ManualScheduler::default());
    launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &BundledSources,
        &DemoConfig::default(),
    )
    .unwrap();

    host.mock_surface().set_pixel_ratio(1.0);
    host.fire_resize();
    scheduler.advance(600);

    assert_eq!(host.mock_surface().backing_size(), Size::new(400, 300));
}

#[test]
fn inactive_time_uniform_is_tolerated() {
    let host = host(&["webgl"]);
    let scheduler = Rc::new(ManualScheduler::default());
    let sources = InlineSources::new(
        "attribute vec3 vertexPosition;\nvoid main(void) { gl_Position = vec4(vertexPosition, 1.0); }",
        "void main(void) { gl_FragColor = vec4(1.0); }",
    );

    let renderer = launch_webgl_sample(
        &host,
        Rc::clone(&scheduler),
        &sources,
        &DemoConfig::default(),
    )
    .unwrap();
    assert!(host.alerts().is_empty());
    assert!(renderer.borrow().program().unwrap().time().is_none());

    host.gl().clear_calls();
    scheduler.run_frame();

    assert_eq!(
        host.gl().calls(),
        vec![
            GlCall::ClearColorBuffer,
            GlCall::Uniform1f(None, 0.0),
            GlCall::DrawTriangleStrip(0, 4),
        ]
    );
}
