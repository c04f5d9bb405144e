//! The redraw pipeline: clear, cull, project, encode, draw, re-anchor.

use crate::host::MapHost;
use crate::projector::Projector;
use overlay_common::{ClimateSample, Viewport};
use renderer::{CellInstance, CellLayout, CellSurface, EncodingConfig};
use std::rc::Rc;
use tracing::{debug, warn};

/// Orchestrates one full repaint of the overlay surface.
///
/// Every call is a full clear-then-repaint, never an incremental patch, so
/// no stale cell can survive a viewport, data, or range change, and calling
/// twice with identical arguments yields an identical drawn cell set.
pub struct GridRenderer {
    host: Rc<dyn MapHost>,
    projector: Projector,
    layout: CellLayout,
    encoding: EncodingConfig,
    surface: CellSurface,
}

impl GridRenderer {
    pub fn new(host: Rc<dyn MapHost>, layout: CellLayout, encoding: EncodingConfig) -> Self {
        let projector = Projector::new(Rc::clone(&host));
        Self {
            host,
            projector,
            layout,
            encoding,
            surface: CellSurface::new(),
        }
    }

    /// The overlay surface this renderer draws into.
    pub fn surface(&self) -> &CellSurface {
        &self.surface
    }

    /// Repaint the surface from the filtered sample set and a fresh
    /// viewport snapshot.
    ///
    /// Per-sample projection failures are logged and skipped; they never
    /// abort the frame.
    pub fn render(&mut self, filtered: &[ClimateSample], viewport: &Viewport) {
        self.surface.clear();

        let visible: Vec<&ClimateSample> = filtered
            .iter()
            .filter(|s| viewport.bounds.contains(&s.position()))
            .collect();
        let culled = filtered.len() - visible.len();

        if visible.is_empty() {
            debug!(culled, "overlay repaint: nothing visible");
            return;
        }

        let size_px = self.layout.cell_size_px(viewport.zoom);
        let corner_radius_px = self.layout.corner_radius();
        let mut skipped = 0usize;

        for sample in visible {
            let center = match self.projector.project(sample.position()) {
                Ok(point) => point,
                Err(error) => {
                    skipped += 1;
                    warn!(
                        lat = sample.lat,
                        lon = sample.lon,
                        %error,
                        "sample skipped: host could not project"
                    );
                    continue;
                }
            };
            let color = self.encoding.color_of(sample);
            self.surface.push(CellInstance {
                center,
                size_px,
                corner_radius_px,
                fill: color.fill,
                opacity: color.opacity,
            });
        }

        self.surface.resize(self.host.pixel_size());
        self.surface
            .set_anchor(self.projector.layer_anchor(viewport));

        debug!(
            drawn = self.surface.cells().len(),
            culled, skipped, "overlay repaint"
        );
    }
}
