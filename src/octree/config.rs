//! Build configuration

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// Configuration for octree construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Cells with radius at or below this are emitted as solid when they
    /// hold any geometry, regardless of the depth remaining.
    pub min_cell_radius: f32,
    /// Emit a cell as solid early when its triangles form a mutually
    /// convex set with every cell corner on or in front of every triangle
    /// plane. Subdivision never depends on this firing.
    pub solid_fast_path: bool,
    /// Plane-distance slack for the fast path's convexity tests, in the
    /// scale of the unnormalized triangle plane.
    pub convexity_tolerance: f32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            min_cell_radius: 0.25, // quarter-unit collision cells
            solid_fast_path: false,
            convexity_tolerance: 1e-4,
        }
    }
}

impl BuildConfig {
    /// Check for values the builder cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.min_cell_radius.is_finite() || self.min_cell_radius <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_cell_radius must be positive and finite, got {}",
                self.min_cell_radius
            )));
        }
        if !self.convexity_tolerance.is_finite() || self.convexity_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "convexity_tolerance must be non-negative and finite, got {}",
                self.convexity_tolerance
            )));
        }
        Ok(())
    }
}
