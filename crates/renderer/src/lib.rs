//! Visual encoding and surface drawing for the climate overlay.
//!
//! Implements the three rendering concerns the grid renderer composes:
//! - Color scale (temperature-driven hue, solar-driven opacity)
//! - Cell layout (zoom-dependent cell sizing)
//! - The overlay cell surface (draw list + RGBA rasterization)

pub mod cell;
pub mod colorscale;
pub mod surface;

pub use cell::CellLayout;
pub use colorscale::{CellColor, EncodingConfig, EncodingError, OpacityScale, Rgba, TemperatureScale};
pub use surface::{CellInstance, CellSurface};
