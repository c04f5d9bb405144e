//! Common types shared across the climate-overlay workspace.

pub mod error;
pub mod geo;
pub mod sample;
pub mod selection;
pub mod viewport;

pub use error::{OverlayError, OverlayResult};
pub use geo::{GeoBounds, LatLon, PixelPoint, PixelSize};
pub use sample::{solar_index_to_wm2, ClimateSample};
pub use selection::RangeSelection;
pub use viewport::Viewport;
