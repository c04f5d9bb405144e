//! Synthetic climate-sample generators.
//!
//! These generators create predictable, verifiable sample patterns for use
//! across the test suite, and stand in for the live data-acquisition
//! collaborator the engine never owns.

use overlay::source::ClimateDataSource;
use overlay_common::ClimateSample;
use rand::{Rng, SeedableRng};

/// Deterministic sample at a position.
///
/// Temperature is warm at the equator and cold at the poles, spanning the
/// documented [-20, 120] °F domain; the solar index follows the same
/// latitude profile over [0, 100]. This makes expected visual encodings
/// easy to compute by hand in assertions.
pub fn sample_at(lat: f64, lon: f64) -> ClimateSample {
    let equator_factor = 1.0 - lat.abs() / 90.0;
    let temp_f = -20.0 + 140.0 * equator_factor;
    let solar_index = 100.0 * equator_factor;
    ClimateSample::new(lat, lon, temp_f, solar_index)
}

/// A regular global grid of deterministic samples.
///
/// # Arguments
/// * `lat_step` - Latitude spacing in whole degrees (> 0)
/// * `lon_step` - Longitude spacing in whole degrees (> 0)
pub fn global_sample_grid(lat_step: u32, lon_step: u32) -> Vec<ClimateSample> {
    let mut samples = Vec::new();
    let mut lat = -90i64;
    while lat <= 90 {
        let mut lon = -180i64;
        while lon <= 180 {
            samples.push(sample_at(lat as f64, lon as f64));
            lon += lon_step as i64;
        }
        lat += lat_step as i64;
    }
    samples
}

/// Uniformly random samples across the documented domains, seeded for
/// reproducibility.
pub fn jittered_samples(count: usize, seed: u64) -> Vec<ClimateSample> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            ClimateSample::new(
                rng.gen_range(-90.0..=90.0),
                rng.gen_range(-180.0..=180.0),
                rng.gen_range(-20.0..=120.0),
                rng.gen_range(0.0..=100.0),
            )
        })
        .collect()
}

/// An in-memory data source serving a fixed sample set.
pub struct SyntheticDataSource {
    samples: Vec<ClimateSample>,
}

impl SyntheticDataSource {
    pub fn new(samples: Vec<ClimateSample>) -> Self {
        Self { samples }
    }

    /// A source serving a 10-degree global grid.
    pub fn global() -> Self {
        Self::new(global_sample_grid(10, 10))
    }
}

impl ClimateDataSource for SyntheticDataSource {
    fn samples(&self) -> Vec<ClimateSample> {
        self.samples.clone()
    }
}
