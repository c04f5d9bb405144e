//! User-adjustable value ranges for the overlay.

use crate::sample::{SOLAR_DOMAIN, TEMP_DOMAIN_F};
use serde::{Deserialize, Serialize};

/// The range selection driving the overlay filter.
///
/// The input adapter upstream keeps `temp_min <= temp_max` and
/// `solar_min <= solar_max` at all times; the engine does not re-validate.
/// A violated ordering simply matches nothing, because no value satisfies
/// both inequalities of an inverted range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSelection {
    pub temp_min: f64,
    pub temp_max: f64,
    pub solar_min: f64,
    pub solar_max: f64,
}

impl RangeSelection {
    pub fn new(temp_min: f64, temp_max: f64, solar_min: f64, solar_max: f64) -> Self {
        Self {
            temp_min,
            temp_max,
            solar_min,
            solar_max,
        }
    }

    /// A selection spanning the whole documented sample domain.
    pub fn full() -> Self {
        Self {
            temp_min: TEMP_DOMAIN_F.0,
            temp_max: TEMP_DOMAIN_F.1,
            solar_min: SOLAR_DOMAIN.0,
            solar_max: SOLAR_DOMAIN.1,
        }
    }

    /// Whether both ranges are ordered (`min <= max`).
    pub fn is_ordered(&self) -> bool {
        self.temp_min <= self.temp_max && self.solar_min <= self.solar_max
    }
}

impl Default for RangeSelection {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_spans_sample_domain() {
        let sel = RangeSelection::full();
        assert_eq!(sel.temp_min, -20.0);
        assert_eq!(sel.temp_max, 120.0);
        assert_eq!(sel.solar_min, 0.0);
        assert_eq!(sel.solar_max, 100.0);
        assert!(sel.is_ordered());
    }

    #[test]
    fn test_is_ordered() {
        assert!(RangeSelection::new(-10.0, 90.0, 20.0, 80.0).is_ordered());
        assert!(RangeSelection::new(50.0, 50.0, 30.0, 30.0).is_ordered());
        assert!(!RangeSelection::new(90.0, -10.0, 20.0, 80.0).is_ordered());
        assert!(!RangeSelection::new(-10.0, 90.0, 80.0, 20.0).is_ordered());
    }
}
