//! Common fixtures: named bounds/selections/viewports, a scriptable fake
//! map host, and a recording render pane.

use overlay::host::{MapHost, ProjectionError, SubscriptionId, SurfacePane, ViewportCallback};
use overlay_common::{GeoBounds, LatLon, PixelPoint, PixelSize, RangeSelection, Viewport};
use renderer::{CellInstance, CellSurface};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Common bounding box definitions for testing.
pub mod bounds {
    use super::*;

    /// Global bounds (-180 to 180, -90 to 90)
    pub const GLOBAL: GeoBounds = GeoBounds {
        south_west: LatLon {
            lat: -90.0,
            lon: -180.0,
        },
        north_east: LatLon {
            lat: 90.0,
            lon: 180.0,
        },
    };

    /// North-eastern quarter of the globe
    pub const NORTHEAST_QUADRANT: GeoBounds = GeoBounds {
        south_west: LatLon { lat: 0.0, lon: 0.0 },
        north_east: LatLon {
            lat: 90.0,
            lon: 180.0,
        },
    };

    /// Continental United States
    pub const CONUS: GeoBounds = GeoBounds {
        south_west: LatLon {
            lat: 20.0,
            lon: -130.0,
        },
        north_east: LatLon {
            lat: 55.0,
            lon: -60.0,
        },
    };
}

/// Common range selections for testing.
pub mod selections {
    use super::*;

    /// The worked-scenario selection: temp -10..90, solar 20..80
    pub const SCENARIO: RangeSelection = RangeSelection {
        temp_min: -10.0,
        temp_max: 90.0,
        solar_min: 20.0,
        solar_max: 80.0,
    };

    /// Inverted temperature range (matches nothing)
    pub const INVERTED: RangeSelection = RangeSelection {
        temp_min: 90.0,
        temp_max: -10.0,
        solar_min: 20.0,
        solar_max: 80.0,
    };
}

/// A whole-globe viewport at the given zoom, layer origin at (0, 0).
pub fn global_viewport(zoom: f64) -> Viewport {
    Viewport::new(bounds::GLOBAL, zoom, PixelPoint::new(0.0, 0.0))
}

/// A render pane that records every attach/present/detach.
#[derive(Default)]
pub struct RecordingPane {
    attached: Cell<bool>,
    attach_count: Cell<usize>,
    detach_count: Cell<usize>,
    frames: RefCell<Vec<PresentedFrame>>,
}

/// Snapshot of one presented surface state.
#[derive(Debug, Clone)]
pub struct PresentedFrame {
    pub cells: Vec<CellInstance>,
    pub size: PixelSize,
    pub anchor: PixelPoint,
}

impl RecordingPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count.get()
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count.get()
    }

    pub fn present_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last_frame(&self) -> Option<PresentedFrame> {
        self.frames.borrow().last().cloned()
    }
}

impl SurfacePane for RecordingPane {
    fn attach(&self) {
        self.attached.set(true);
        self.attach_count.set(self.attach_count.get() + 1);
    }

    fn present(&self, surface: &CellSurface) {
        self.frames.borrow_mut().push(PresentedFrame {
            cells: surface.cells().to_vec(),
            size: surface.size(),
            anchor: surface.anchor(),
        });
    }

    fn detach(&self) {
        self.attached.set(false);
        self.detach_count.set(self.detach_count.get() + 1);
    }
}

/// A scriptable in-memory map host.
///
/// Projects with a fixed square-world equirectangular transform so tests
/// get deterministic pixel positions, and keeps explicit subscription
/// bookkeeping so lifecycle tests can observe unsubscribes. Set
/// `honor_unsubscribe(false)` to emulate a leaky host that keeps firing
/// callbacks after they were dropped.
pub struct FakeMapHost {
    viewport: RefCell<Viewport>,
    pixel_size: Cell<PixelSize>,
    fail_projection: Cell<bool>,
    honor_unsubscribe: Cell<bool>,
    callbacks: RefCell<Vec<(u64, ViewportCallback)>>,
    next_id: Cell<u64>,
    unsubscribe_count: Cell<usize>,
    pane: Rc<RecordingPane>,
}

impl FakeMapHost {
    pub fn new(viewport: Viewport, pixel_size: PixelSize) -> Rc<Self> {
        Rc::new(Self {
            viewport: RefCell::new(viewport),
            pixel_size: Cell::new(pixel_size),
            fail_projection: Cell::new(false),
            honor_unsubscribe: Cell::new(true),
            callbacks: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            unsubscribe_count: Cell::new(0),
            pane: Rc::new(RecordingPane::new()),
        })
    }

    /// A host showing the whole globe at the given zoom, 800x600 px.
    pub fn global(zoom: f64) -> Rc<Self> {
        Self::new(global_viewport(zoom), PixelSize::new(800, 600))
    }

    pub fn recording_pane(&self) -> Rc<RecordingPane> {
        Rc::clone(&self.pane)
    }

    /// Replace the viewport without notifying subscribers.
    pub fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.borrow_mut() = viewport;
    }

    pub fn set_pixel_size(&self, size: PixelSize) {
        self.pixel_size.set(size);
    }

    /// Make every projection fail until turned off again.
    pub fn set_fail_projection(&self, fail: bool) {
        self.fail_projection.set(fail);
    }

    /// When false, `unsubscribe_viewport` is ignored (leaky-host mode).
    pub fn set_honor_unsubscribe(&self, honor: bool) {
        self.honor_unsubscribe.set(honor);
    }

    /// Invoke every registered callback, as a pan/zoom tick would.
    pub fn fire_viewport_change(&self) {
        // Callbacks re-enter the host (viewport reads, projections), so
        // they must not run under the callbacks borrow.
        let mut running = std::mem::take(&mut *self.callbacks.borrow_mut());
        for (_, callback) in running.iter_mut() {
            callback();
        }
        let mut callbacks = self.callbacks.borrow_mut();
        let added = std::mem::take(&mut *callbacks);
        *callbacks = running;
        callbacks.extend(added);
    }

    pub fn subscription_count(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribe_count.get()
    }
}

impl MapHost for FakeMapHost {
    fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    fn project_to_pixel(&self, point: LatLon) -> Result<PixelPoint, ProjectionError> {
        if self.fail_projection.get() {
            return Err(ProjectionError::TransformUnavailable(
                "transient viewport transition".to_string(),
            ));
        }
        let viewport = self.viewport.borrow();
        let world = 256.0 * 2f64.powf(viewport.zoom);
        let x = (point.lon + 180.0) / 360.0 * world;
        let y = (90.0 - point.lat) / 180.0 * world;
        Ok(PixelPoint::new(
            x - viewport.pixel_origin.x,
            y - viewport.pixel_origin.y,
        ))
    }

    fn pixel_size(&self) -> PixelSize {
        self.pixel_size.get()
    }

    fn subscribe_viewport(&self, callback: ViewportCallback) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.callbacks.borrow_mut().push((id, callback));
        SubscriptionId(id)
    }

    fn unsubscribe_viewport(&self, id: SubscriptionId) {
        self.unsubscribe_count.set(self.unsubscribe_count.get() + 1);
        if self.honor_unsubscribe.get() {
            self.callbacks.borrow_mut().retain(|(held, _)| *held != id.0);
        }
    }

    fn pane(&self) -> Rc<dyn SurfacePane> {
        Rc::clone(&self.pane) as Rc<dyn SurfacePane>
    }
}
