//! The climate-overlay rendering engine.
//!
//! Takes a sample set and a range selection, filters and projects samples
//! into the current viewport, maps values to color/opacity/cell size, and
//! redraws on every pan, zoom, data, or range change. The base map widget,
//! the range-input UI, and data acquisition are external collaborators
//! reached through the traits in [`host`] and [`source`].

pub mod filter;
pub mod host;
pub mod lifecycle;
pub mod projector;
pub mod render;
pub mod source;

pub use host::{MapHost, ProjectionError, SubscriptionGuard, SubscriptionId, SurfacePane};
pub use lifecycle::{mount, Overlay, OverlayConfig, OverlayHandle};
pub use projector::Projector;
pub use render::GridRenderer;
pub use source::ClimateDataSource;
