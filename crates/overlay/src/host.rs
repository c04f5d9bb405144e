//! Collaborator seams: the host map widget and its render pane.

use overlay_common::{LatLon, PixelPoint, PixelSize, Viewport};
use renderer::CellSurface;
use std::rc::Rc;
use thiserror::Error;

/// Failure reported by the host's coordinate transform.
///
/// Projection failures are per-sample and recoverable: the affected sample
/// is skipped for the frame, never aborting the redraw.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("coordinate ({lat}, {lon}) cannot be resolved by the host transform")]
    Unresolvable { lat: f64, lon: f64 },

    #[error("host transform unavailable: {0}")]
    TransformUnavailable(String),
}

/// Identifier for a viewport-change subscription held with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback invoked by the host on every pan/zoom tick.
pub type ViewportCallback = Box<dyn FnMut()>;

/// The host map widget.
///
/// Owns pan/zoom mechanics, tile rendering, and the geographic-to-pixel
/// transform. The engine only ever reads snapshots and subscribes to
/// change notifications; it never drives the map.
pub trait MapHost {
    /// A fresh snapshot of the current viewport.
    fn viewport(&self) -> Viewport;

    /// Project a geographic coordinate to the map's layer frame.
    fn project_to_pixel(&self, point: LatLon) -> Result<PixelPoint, ProjectionError>;

    /// Current pixel dimensions of the map widget.
    fn pixel_size(&self) -> PixelSize;

    /// Register a pan/zoom callback; fired until unsubscribed.
    fn subscribe_viewport(&self, callback: ViewportCallback) -> SubscriptionId;

    /// Drop a previously registered callback.
    fn unsubscribe_viewport(&self, id: SubscriptionId);

    /// The rendering pane overlay surfaces attach to.
    fn pane(&self) -> Rc<dyn SurfacePane>;
}

/// The host-side pane the one overlay surface attaches to.
pub trait SurfacePane {
    /// Called once per mount, when the overlay surface is created.
    fn attach(&self);

    /// Called after every completed redraw with the current draw state.
    fn present(&self, surface: &CellSurface);

    /// Called once per unmount, when the overlay surface is removed.
    fn detach(&self);
}

/// Scoped ownership of a viewport-change subscription.
///
/// The subscription is released on every exit path: explicitly via
/// [`SubscriptionGuard::release`] during unmount, or by `Drop` if the
/// overlay is torn down any other way. Release is idempotent.
pub struct SubscriptionGuard {
    host: Rc<dyn MapHost>,
    id: Option<SubscriptionId>,
}

impl SubscriptionGuard {
    pub fn new(host: Rc<dyn MapHost>, id: SubscriptionId) -> Self {
        Self { host, id: Some(id) }
    }

    /// Unsubscribe from the host, once.
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.host.unsubscribe_viewport(id);
        }
    }

    /// Whether the subscription is still held.
    pub fn is_held(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("id", &self.id)
            .finish()
    }
}
