//! Climate sample observations.

use crate::geo::LatLon;
use serde::{Deserialize, Serialize};

/// Documented temperature domain in degrees Fahrenheit.
pub const TEMP_DOMAIN_F: (f64, f64) = (-20.0, 120.0);

/// Documented solar-intensity index domain (dimensionless, 0-100).
pub const SOLAR_DOMAIN: (f64, f64) = (0.0, 100.0);

/// Watts per square meter represented by one solar-index unit.
const WM2_PER_SOLAR_UNIT: f64 = 5.0;

/// One geo-located climate observation.
///
/// Samples are produced wholesale by the data-source collaborator and are
/// never mutated by the overlay engine. Documented value domains:
/// `-90 <= lat <= 90`, `-180 <= lon <= 180`, `-20 <= temp_f <= 120`,
/// `0 <= solar_index <= 100`. Values outside these domains are not an
/// error anywhere in the engine: the color scale clamps and the range
/// filter excludes by its ordinary inequality test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateSample {
    pub lat: f64,
    pub lon: f64,
    pub temp_f: f64,
    pub solar_index: f64,
}

impl ClimateSample {
    pub fn new(lat: f64, lon: f64, temp_f: f64, solar_index: f64) -> Self {
        Self {
            lat,
            lon,
            temp_f,
            solar_index,
        }
    }

    /// Geographic position of the observation.
    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    /// Whether every field sits inside its documented domain.
    pub fn is_within_domain(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
            && (TEMP_DOMAIN_F.0..=TEMP_DOMAIN_F.1).contains(&self.temp_f)
            && (SOLAR_DOMAIN.0..=SOLAR_DOMAIN.1).contains(&self.solar_index)
    }
}

/// Display conversion from the 0-100 solar index to watts per square meter.
pub fn solar_index_to_wm2(solar_index: f64) -> f64 {
    solar_index * WM2_PER_SOLAR_UNIT
}
