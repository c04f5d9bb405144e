//! Color scale for climate samples.
//!
//! Two independent channels: hue is driven purely by temperature through a
//! fixed diverging blue-to-red sweep, opacity purely by solar intensity
//! through a fixed linear ramp. Keeping the channels decoupled lets each be
//! verified on its own.
//!
//! Both scales clamp at their domain boundaries: values outside the domain
//! saturate to the boundary color/opacity, never extrapolate or error.

use overlay_common::sample::{SOLAR_DOMAIN, TEMP_DOMAIN_F};
use overlay_common::{ClimateSample, OverlayError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }
}

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0-1)
/// * `v` - Value/brightness (0-1)
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Hue at the cold end of the temperature sweep (blue).
const COLD_HUE_DEG: f64 = 240.0;

/// Diverging temperature color scale.
///
/// Maps `[domain_min, domain_max]` degrees Fahrenheit onto a 240-to-0
/// degree hue sweep (blue through cyan, green, yellow, orange to red).
/// The normalized position is strictly increasing in temperature inside
/// the domain and constant beyond either end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureScale {
    pub domain_min: f64,
    pub domain_max: f64,
}

impl Default for TemperatureScale {
    fn default() -> Self {
        Self {
            domain_min: TEMP_DOMAIN_F.0,
            domain_max: TEMP_DOMAIN_F.1,
        }
    }
}

impl TemperatureScale {
    /// Normalized redness position in `[0, 1]`, clamped at the domain edges.
    pub fn position(&self, temp_f: f64) -> f64 {
        ((temp_f - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0)
    }

    /// Fully saturated color at the given temperature.
    pub fn color(&self, temp_f: f64) -> Rgba {
        let hue = (1.0 - self.position(temp_f)) * COLD_HUE_DEG;
        let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
        Rgba::new(r, g, b, 255)
    }

    fn validate(&self) -> Result<(), EncodingError> {
        if self.domain_min >= self.domain_max {
            return Err(EncodingError::ValidationError(format!(
                "temperature domain must be ordered, got [{}, {}]",
                self.domain_min, self.domain_max
            )));
        }
        Ok(())
    }
}

/// Linear opacity ramp driven by solar intensity.
///
/// `opacity = floor + span * (solar_index / domain_max)`, clamped so that
/// out-of-domain solar values saturate at `floor` or `floor + span`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityScale {
    pub floor: f64,
    pub span: f64,
    pub domain_max: f64,
}

impl Default for OpacityScale {
    fn default() -> Self {
        Self {
            floor: 0.1,
            span: 0.7,
            domain_max: SOLAR_DOMAIN.1,
        }
    }
}

impl OpacityScale {
    /// Opacity in `[floor, floor + span]` for the given solar index.
    pub fn opacity(&self, solar_index: f64) -> f64 {
        let t = (solar_index / self.domain_max).clamp(0.0, 1.0);
        self.floor + self.span * t
    }

    fn validate(&self) -> Result<(), EncodingError> {
        if self.domain_max <= 0.0 {
            return Err(EncodingError::ValidationError(format!(
                "solar domain max must be positive, got {}",
                self.domain_max
            )));
        }
        if !(0.0..=1.0).contains(&self.floor) || self.span < 0.0 || self.floor + self.span > 1.0 {
            return Err(EncodingError::ValidationError(format!(
                "opacity ramp [{}, {}] must stay within [0, 1]",
                self.floor,
                self.floor + self.span
            )));
        }
        Ok(())
    }
}

/// Fill color plus opacity for one drawn cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellColor {
    pub fill: Rgba,
    pub opacity: f64,
}

/// The full visual-encoding configuration.
///
/// Defaults are the canonical contract; embedders may load adjusted
/// constants from JSON the same way layer styles are configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingConfig {
    #[serde(default)]
    pub temperature: TemperatureScale,
    #[serde(default)]
    pub opacity: OpacityScale,
}

impl EncodingConfig {
    /// Parse an encoding configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, EncodingError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EncodingError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configured scales.
    pub fn validate(&self) -> Result<(), EncodingError> {
        self.temperature.validate()?;
        self.opacity.validate()
    }

    /// Visual encoding for one sample: temperature-driven fill,
    /// solar-driven opacity.
    pub fn color_of(&self, sample: &ClimateSample) -> CellColor {
        CellColor {
            fill: self.temperature.color(sample.temp_f),
            opacity: self.opacity.opacity(sample.solar_index),
        }
    }
}

/// Encoding configuration errors.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

impl From<EncodingError> for OverlayError {
    fn from(err: EncodingError) -> Self {
        OverlayError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), (0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), (0, 0, 255));
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), (255, 0, 0));
    }

    #[test]
    fn test_redness_strictly_increases_inside_domain() {
        let scale = TemperatureScale::default();
        let mut prev = scale.position(-20.0);
        let mut temp = -19.0;
        while temp <= 120.0 {
            let pos = scale.position(temp);
            assert!(
                pos > prev,
                "position must strictly increase, stalled at {temp}F"
            );
            prev = pos;
            temp += 1.0;
        }
    }

    #[test]
    fn test_redness_clamps_outside_domain() {
        let scale = TemperatureScale::default();
        assert_eq!(scale.position(-100.0), 0.0);
        assert_eq!(scale.position(-20.0), 0.0);
        assert_eq!(scale.position(120.0), 1.0);
        assert_eq!(scale.position(200.0), 1.0);
        assert_eq!(scale.color(-100.0), scale.color(-20.0));
        assert_eq!(scale.color(200.0), scale.color(120.0));
    }

    #[test]
    fn test_domain_endpoints_are_blue_and_red() {
        let scale = TemperatureScale::default();
        assert_eq!(scale.color(-20.0), Rgba::new(0, 0, 255, 255));
        assert_eq!(scale.color(120.0), Rgba::new(255, 0, 0, 255));
    }

    #[test]
    fn test_opacity_ramp() {
        let scale = OpacityScale::default();
        assert!((scale.opacity(0.0) - 0.1).abs() < 1e-9);
        assert!((scale.opacity(70.0) - 0.59).abs() < 1e-9);
        assert!((scale.opacity(100.0) - 0.8).abs() < 1e-9);

        // Out-of-domain solar values saturate, never exceed the ramp.
        assert!((scale.opacity(-5.0) - 0.1).abs() < 1e-9);
        assert!((scale.opacity(250.0) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_opacity_independent_of_temperature() {
        let config = EncodingConfig::default();
        let cold = config.color_of(&ClimateSample::new(0.0, 0.0, -20.0, 70.0));
        let hot = config.color_of(&ClimateSample::new(0.0, 0.0, 120.0, 70.0));
        assert_eq!(cold.opacity, hot.opacity);
        assert_ne!(cold.fill, hot.fill);
    }

    #[test]
    fn test_config_from_json_with_defaults() {
        let config = EncodingConfig::from_json("{}").unwrap();
        assert_eq!(config, EncodingConfig::default());

        let config = EncodingConfig::from_json(
            r#"{"temperature":{"domain_min":0.0,"domain_max":100.0}}"#,
        )
        .unwrap();
        assert_eq!(config.temperature.domain_min, 0.0);
        assert_eq!(config.opacity, OpacityScale::default());
    }

    #[test]
    fn test_config_validation_rejects_bad_ramps() {
        let err = EncodingConfig::from_json(
            r#"{"temperature":{"domain_min":120.0,"domain_max":-20.0}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("ordered"));

        let err =
            EncodingConfig::from_json(r#"{"opacity":{"floor":0.5,"span":0.7,"domain_max":100.0}}"#)
                .unwrap_err();
        assert!(err.to_string().contains("[0, 1]"));
    }
}
