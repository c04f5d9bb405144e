//! Projection of geographic coordinates into the overlay's layer frame.

use crate::host::{MapHost, ProjectionError};
use overlay_common::{LatLon, PixelPoint, Viewport};
use std::rc::Rc;

/// Projects sample positions via the host map widget's opaque transform.
///
/// Stateless per call: every projection depends only on the host's current
/// transform, and the returned pixel offset is relative to the map's
/// internal layer origin at projection time, not the screen. The surface
/// translation that pins layer-frame pixels to geography is recomputed
/// every redraw from the viewport snapshot ([`Projector::layer_anchor`]).
pub struct Projector {
    host: Rc<dyn MapHost>,
}

impl Projector {
    pub fn new(host: Rc<dyn MapHost>) -> Self {
        Self { host }
    }

    /// Layer-frame pixel position of a geographic point.
    pub fn project(&self, point: LatLon) -> Result<PixelPoint, ProjectionError> {
        self.host.project_to_pixel(point)
    }

    /// The surface translation for the current viewport: the negated layer
    /// origin, mapping layer-frame pixels into the widget's frame.
    pub fn layer_anchor(&self, viewport: &Viewport) -> PixelPoint {
        viewport.pixel_origin.negated()
    }
}
