//! The overlay cell surface.
//!
//! The single drawable layer the engine composites above the base map. It
//! holds the current draw list in the map's layer frame plus the translation
//! that pins the layer frame to the widget, and can rasterize itself to an
//! RGBA buffer for hosts that composite pixels rather than draw lists.

use crate::colorscale::Rgba;
use overlay_common::{PixelPoint, PixelSize};

/// One drawn cell, centered on its projected layer-frame position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellInstance {
    pub center: PixelPoint,
    pub size_px: f64,
    pub corner_radius_px: f64,
    pub fill: Rgba,
    pub opacity: f64,
}

/// The overlay surface: draw list, pixel dimensions, and layer anchor.
///
/// Exactly one instance exists per mounted overlay. Every redraw fully
/// clears the draw list before repainting, so no stale cell can survive a
/// viewport, data, or range change.
#[derive(Debug, Clone, Default)]
pub struct CellSurface {
    size: PixelSize,
    anchor: PixelPoint,
    cells: Vec<CellInstance>,
}

impl CellSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every drawn cell, leaving dimensions and anchor untouched.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Append one cell to the draw list.
    pub fn push(&mut self, cell: CellInstance) {
        self.cells.push(cell);
    }

    /// Match the surface to the host's current pixel dimensions.
    pub fn resize(&mut self, size: PixelSize) {
        self.size = size;
    }

    /// Re-anchor the surface translation to the map's current layer origin.
    pub fn set_anchor(&mut self, anchor: PixelPoint) {
        self.anchor = anchor;
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn anchor(&self) -> PixelPoint {
        self.anchor
    }

    pub fn cells(&self) -> &[CellInstance] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Rasterize the draw list to an RGBA buffer (4 bytes per pixel,
    /// row-major), compositing cells source-over onto transparency.
    pub fn to_rgba(&self) -> Vec<u8> {
        let width = self.size.width as usize;
        let height = self.size.height as usize;
        let mut pixels = vec![0u8; width * height * 4];

        for cell in &self.cells {
            let center = cell.center.offset_by(&self.anchor);
            blit_cell(&mut pixels, width, height, &center, cell);
        }

        tracing::trace!(
            cells = self.cells.len(),
            width,
            height,
            "rasterized overlay surface"
        );
        pixels
    }
}

/// Paint one rounded-rectangle cell into the buffer.
fn blit_cell(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    center: &PixelPoint,
    cell: &CellInstance,
) {
    let half = cell.size_px / 2.0;
    let radius = cell.corner_radius_px.min(half);
    let alpha = cell.opacity.clamp(0.0, 1.0);

    let x_min = ((center.x - half).floor().max(0.0)) as usize;
    let y_min = ((center.y - half).floor().max(0.0)) as usize;
    let x_max = ((center.x + half).ceil().min(width as f64)) as usize;
    let y_max = ((center.y + half).ceil().min(height as f64)) as usize;

    for y in y_min..y_max {
        for x in x_min..x_max {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;
            if !covers(center, half, radius, px, py) {
                continue;
            }
            let idx = (y * width + x) * 4;
            composite_over(&mut pixels[idx..idx + 4], cell.fill, alpha);
        }
    }
}

/// Rounded-rectangle coverage test for a pixel center.
fn covers(center: &PixelPoint, half: f64, radius: f64, px: f64, py: f64) -> bool {
    let dx = (px - center.x).abs();
    let dy = (py - center.y).abs();
    if dx > half || dy > half {
        return false;
    }
    let ix = dx - (half - radius);
    let iy = dy - (half - radius);
    if ix > 0.0 && iy > 0.0 {
        ix * ix + iy * iy <= radius * radius
    } else {
        true
    }
}

/// Source-over blend of a fill at the given opacity onto one RGBA pixel.
fn composite_over(dst: &mut [u8], fill: Rgba, opacity: f64) {
    let src_a = opacity * (fill.a as f64 / 255.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f64 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let blend = |src: u8, dst: u8| -> u8 {
        let s = src as f64 / 255.0;
        let d = dst as f64 / 255.0;
        let c = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        (c * 255.0).round() as u8
    };

    dst[0] = blend(fill.r, dst[0]);
    dst[1] = blend(fill.g, dst[1]);
    dst[2] = blend(fill.b, dst[2]);
    dst[3] = (out_a * 255.0).round() as u8;
}
