//! End-to-end pipeline and lifecycle tests against a fake map host.

use overlay::host::MapHost;
use overlay::{mount, Overlay, OverlayConfig};
use overlay_common::{
    ClimateSample, OverlayError, PixelPoint, PixelSize, RangeSelection, Viewport,
};
use renderer::{CellLayout, TemperatureScale};
use std::rc::Rc;
use test_utils::{assert_approx_eq, bounds, global_viewport, selections, FakeMapHost};

fn scenario_selection() -> RangeSelection {
    selections::SCENARIO
}

#[test]
fn scenario_a_solar_above_max_is_not_drawn() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    let sample = ClimateSample::new(0.0, 0.0, 80.0, 90.0);
    handle.update(vec![sample], scenario_selection());

    assert!(pane.last_frame().unwrap().cells.is_empty());
}

#[test]
fn scenario_b_sample_is_drawn_with_expected_encoding() {
    let host = FakeMapHost::new(global_viewport(1.0), PixelSize::new(800, 600));
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    let sample = ClimateSample::new(40.0, -100.0, 60.0, 70.0);
    handle.update(vec![sample], scenario_selection());

    let frame = pane.last_frame().unwrap();
    assert_eq!(frame.cells.len(), 1);

    let cell = frame.cells[0];
    assert_approx_eq!(cell.opacity, 0.59, 1e-9);
    assert_eq!(cell.fill, TemperatureScale::default().color(60.0));

    // Deterministic fake-host projection: 512 px world at zoom 1.
    assert_approx_eq!(cell.center.x, (-100.0 + 180.0) / 360.0 * 512.0, 1e-9);
    assert_approx_eq!(cell.center.y, (90.0 - 40.0) / 180.0 * 512.0, 1e-9);
}

#[test]
fn scenario_c_empty_samples_clear_without_drawing() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    handle.update(test_utils::global_sample_grid(10, 10), RangeSelection::full());
    assert!(!pane.last_frame().unwrap().cells.is_empty());

    handle.update(Vec::new(), RangeSelection::full());
    assert!(pane.last_frame().unwrap().cells.is_empty());
}

#[test]
fn scenario_d_corner_sample_inside_inclusive_bounds_is_drawn() {
    let viewport = Viewport::new(bounds::NORTHEAST_QUADRANT, 2.0, PixelPoint::new(0.0, 0.0));
    let host = FakeMapHost::new(viewport, PixelSize::new(800, 600));
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    let sample = ClimateSample::new(89.9, 179.9, 60.0, 50.0);
    handle.update(vec![sample], scenario_selection());

    let frame = pane.last_frame().unwrap();
    assert_eq!(frame.cells.len(), 1);

    // Drawn near the top-right corner of the 1024 px world at zoom 2.
    let cell = frame.cells[0];
    assert_approx_eq!(cell.center.x, (179.9 + 180.0) / 360.0 * 1024.0, 1e-6);
    assert_approx_eq!(cell.center.y, (90.0 - 89.9) / 180.0 * 1024.0, 1e-6);
}

#[test]
fn render_is_idempotent_for_unchanged_inputs() {
    let host = FakeMapHost::global(3.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    let samples = test_utils::jittered_samples(64, 42);
    handle.update(samples.clone(), RangeSelection::full());
    let first = pane.last_frame().unwrap();

    handle.update(samples, RangeSelection::full());
    let second = pane.last_frame().unwrap();

    assert_eq!(first.cells, second.cells);
    assert_eq!(first.size, second.size);
    assert_eq!(first.anchor, second.anchor);
}

#[test]
fn culling_draws_exactly_the_in_bounds_filtered_samples() {
    let viewport = Viewport::new(bounds::CONUS, 4.0, PixelPoint::new(0.0, 0.0));
    let host = FakeMapHost::new(viewport, PixelSize::new(800, 600));
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    let samples = test_utils::jittered_samples(256, 9);
    let selection = scenario_selection();
    handle.update(samples.clone(), selection);

    let expected = samples
        .iter()
        .filter(|s| overlay::filter::matches(s, &selection))
        .filter(|s| bounds::CONUS.contains(&s.position()))
        .count();
    assert_eq!(pane.last_frame().unwrap().cells.len(), expected);
}

#[test]
fn boundary_sample_on_viewport_edge_is_drawn() {
    let viewport = Viewport::new(bounds::NORTHEAST_QUADRANT, 2.0, PixelPoint::new(0.0, 0.0));
    let host = FakeMapHost::new(viewport, PixelSize::new(800, 600));
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    // Exactly on the SW corner of the viewport bounds.
    handle.update(
        vec![ClimateSample::new(0.0, 0.0, 60.0, 50.0)],
        scenario_selection(),
    );
    assert_eq!(pane.last_frame().unwrap().cells.len(), 1);
}

#[test]
fn viewport_change_redraws_with_latest_inputs() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    handle.update(
        vec![ClimateSample::new(10.0, 10.0, 60.0, 50.0)],
        scenario_selection(),
    );
    let size_before = pane.last_frame().unwrap().cells[0].size_px;

    // Zoom in; the host fires its pan/zoom notification.
    host.set_viewport(global_viewport(6.0));
    host.fire_viewport_change();

    let frame = pane.last_frame().unwrap();
    assert_eq!(frame.cells.len(), 1);
    let layout = CellLayout::default();
    assert_approx_eq!(frame.cells[0].size_px, layout.cell_size_px(6.0), 1e-9);
    assert!(frame.cells[0].size_px < size_before);
}

#[test]
fn surface_tracks_pixel_size_and_layer_anchor() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    host.set_pixel_size(PixelSize::new(1024, 768));
    host.set_viewport(Viewport::new(
        bounds::GLOBAL,
        2.0,
        PixelPoint::new(300.0, -40.0),
    ));
    handle.update(
        vec![ClimateSample::new(0.0, 0.0, 60.0, 50.0)],
        scenario_selection(),
    );

    let frame = pane.last_frame().unwrap();
    assert_eq!(frame.size, PixelSize::new(1024, 768));
    assert_eq!(frame.anchor, PixelPoint::new(-300.0, 40.0));
}

#[test]
fn projection_failure_skips_samples_without_aborting() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    let samples = vec![ClimateSample::new(10.0, 10.0, 60.0, 50.0)];

    host.set_fail_projection(true);
    handle.update(samples.clone(), scenario_selection());
    assert!(pane.last_frame().unwrap().cells.is_empty());

    // The next frame recovers once the transform resolves again.
    host.set_fail_projection(false);
    host.fire_viewport_change();
    assert_eq!(pane.last_frame().unwrap().cells.len(), 1);
}

#[test]
fn mount_twice_fails_with_already_mounted() {
    let host = FakeMapHost::global(2.0);
    let mut overlay = Overlay::new(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default());

    overlay.mount().unwrap();
    assert!(matches!(overlay.mount(), Err(OverlayError::AlreadyMounted)));

    // After an intervening unmount, mounting works again.
    overlay.unmount();
    overlay.mount().unwrap();
}

#[test]
fn unmount_stops_draws_and_releases_resources() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    handle.update(
        vec![ClimateSample::new(10.0, 10.0, 60.0, 50.0)],
        scenario_selection(),
    );
    assert_eq!(host.subscription_count(), 1);
    assert!(pane.is_attached());

    handle.unmount();
    assert!(!handle.is_mounted());
    assert_eq!(host.subscription_count(), 0);
    assert_eq!(host.unsubscribe_count(), 1);
    assert!(!pane.is_attached());

    // A later viewport change must not draw.
    let presents = pane.present_count();
    host.fire_viewport_change();
    assert_eq!(pane.present_count(), presents);

    // Unmount is idempotent, update after unmount is a silent no-op.
    handle.unmount();
    handle.update(
        vec![ClimateSample::new(10.0, 10.0, 60.0, 50.0)],
        scenario_selection(),
    );
    assert_eq!(pane.present_count(), presents);
    assert_eq!(host.unsubscribe_count(), 1);
}

#[test]
fn leaky_host_cannot_draw_after_unmount() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    host.set_honor_unsubscribe(false);

    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();
    handle.update(
        vec![ClimateSample::new(10.0, 10.0, 60.0, 50.0)],
        scenario_selection(),
    );
    handle.unmount();

    // The host still holds the stale callback, but the engine state is
    // gone; firing it must not present a frame.
    assert_eq!(host.subscription_count(), 1);
    let presents = pane.present_count();
    host.fire_viewport_change();
    assert_eq!(pane.present_count(), presents);
}

#[test]
fn dropping_the_handle_unsubscribes() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    {
        let _handle =
            mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();
        assert_eq!(host.subscription_count(), 1);
    }
    assert_eq!(host.subscription_count(), 0);
    assert!(!pane.is_attached());
}

#[test]
fn mount_performs_an_initial_render() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let _handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    assert_eq!(pane.attach_count(), 1);
    assert_eq!(pane.present_count(), 1);
    assert!(pane.last_frame().unwrap().cells.is_empty());
}

#[test]
fn mount_rejects_invalid_config() {
    let host = FakeMapHost::global(2.0);
    let config = OverlayConfig {
        layout: CellLayout {
            growth_base: 0.5,
            ..CellLayout::default()
        },
        ..OverlayConfig::default()
    };
    let err = mount(Rc::clone(&host) as Rc<dyn MapHost>, config).unwrap_err();
    assert!(matches!(err, OverlayError::InvalidConfig(_)));
    // A failed mount must not leave a subscription or attached pane behind.
    assert_eq!(host.subscription_count(), 0);
    assert!(!host.recording_pane().is_attached());
}

#[test]
fn update_from_source_pulls_and_repaints() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    let source = test_utils::SyntheticDataSource::global();
    handle.update_from_source(&source, RangeSelection::full());
    assert!(!pane.last_frame().unwrap().cells.is_empty());

    // A drained source behaves like a not-yet-loaded one.
    let empty = test_utils::SyntheticDataSource::new(Vec::new());
    handle.update_from_source(&empty, RangeSelection::full());
    assert!(pane.last_frame().unwrap().cells.is_empty());
}

#[test]
fn inverted_selection_draws_nothing() {
    let host = FakeMapHost::global(2.0);
    let pane = host.recording_pane();
    let mut handle = mount(Rc::clone(&host) as Rc<dyn MapHost>, OverlayConfig::default()).unwrap();

    handle.update(test_utils::global_sample_grid(10, 10), selections::INVERTED);
    assert!(pane.last_frame().unwrap().cells.is_empty());
}
