//! Viewport snapshots read from the host map widget.

use crate::geo::{GeoBounds, PixelPoint};
use serde::{Deserialize, Serialize};

/// A snapshot of the host map widget's current view.
///
/// The host owns and mutates the viewport; the engine reads a fresh
/// snapshot on every redraw and never caches one across redraws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Currently visible geographic bounds.
    pub bounds: GeoBounds,
    /// Current zoom level.
    pub zoom: f64,
    /// Origin of the map's internal layer frame, in map pixel space.
    pub pixel_origin: PixelPoint,
}

impl Viewport {
    pub fn new(bounds: GeoBounds, zoom: f64, pixel_origin: PixelPoint) -> Self {
        Self {
            bounds,
            zoom,
            pixel_origin,
        }
    }
}
