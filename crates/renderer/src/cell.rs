//! Zoom-dependent cell sizing.

use crate::colorscale::EncodingError;
use serde::{Deserialize, Serialize};

/// On-screen cell geometry as a function of zoom level.
///
/// `size = clamp(base_size / growth_base^(zoom - reference_zoom), min, max)`,
/// so cells shrink as the map zooms in and track the underlying grid scale.
/// The exact constants are visual tuning; the non-increasing direction and
/// the clamp bounds are the contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellLayout {
    pub base_size_px: f64,
    pub growth_base: f64,
    pub reference_zoom: f64,
    pub min_size_px: f64,
    pub max_size_px: f64,
    pub corner_radius_px: f64,
}

impl Default for CellLayout {
    fn default() -> Self {
        Self {
            base_size_px: 20.0,
            growth_base: 1.5,
            reference_zoom: 3.0,
            min_size_px: 2.0,
            max_size_px: 48.0,
            corner_radius_px: 2.0,
        }
    }
}

impl CellLayout {
    /// Cell edge length in pixels at the given zoom level.
    pub fn cell_size_px(&self, zoom: f64) -> f64 {
        let growth = self.growth_base.powf(zoom - self.reference_zoom);
        (self.base_size_px / growth).clamp(self.min_size_px, self.max_size_px)
    }

    /// Corner radius, capped so corners never overlap at the minimum size.
    pub fn corner_radius(&self) -> f64 {
        self.corner_radius_px.min(self.min_size_px / 2.0)
    }

    pub fn validate(&self) -> Result<(), EncodingError> {
        if self.growth_base <= 1.0 {
            return Err(EncodingError::ValidationError(format!(
                "growth base must exceed 1, got {}",
                self.growth_base
            )));
        }
        if self.base_size_px <= 0.0
            || self.min_size_px <= 0.0
            || self.min_size_px > self.max_size_px
        {
            return Err(EncodingError::ValidationError(format!(
                "cell size bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_size_px, self.max_size_px
            )));
        }
        if self.corner_radius_px < 0.0 {
            return Err(EncodingError::ValidationError(
                "corner radius must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
