//! The climate-data collaborator seam.

use overlay_common::ClimateSample;

/// Pull-style provider of the current sample set.
///
/// Sample sets are replaced wholesale, never patched incrementally. An
/// empty result and a not-yet-loaded source are treated identically by the
/// engine: render nothing.
pub trait ClimateDataSource {
    /// The latest complete sample set.
    fn samples(&self) -> Vec<ClimateSample>;
}
