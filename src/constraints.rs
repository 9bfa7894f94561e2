use crate::config::CoilParams;
use crate::geometry::WindingLayout;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;

/// Fraction of a wire diameter below which two wires are considered to overlap.
pub const BUNDLE_LOWER: f64 = 0.999;
/// Fraction of a wire diameter above which two wires no longer form a bundle.
pub const BUNDLE_UPPER: f64 = 1.001;
/// Fraction of `d_min` that still counts as a printable groove wall.
pub const SEPARATION_TOLERANCE: f64 = 0.999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum GapKind {
    Overlap,
    Bundled,
    Forbidden,
    Separated,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("layout needs at least 2 windings (got {0})")]
    TooFewWindings(usize),

    #[error("winding {index} at z={z} crossed the coil midplane")]
    CrossedMidplane { index: usize, z: f64 },

    #[error("winding {index} overlaps its positive-side neighbour (gap {gap})")]
    Overlap { index: usize, gap: f64 },

    #[error("gap {gap} after winding {index} is too wide for a bundle and too narrow for a groove wall")]
    ForbiddenGap { index: usize, gap: f64 },
}

/// Manufacturing rules every accepted layout has to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackingRules {
    pub wire_radius: f64,
    /// Minimum centre-to-centre distance between non-bundled windings.
    pub min_separation: f64,
}

impl PackingRules {
    pub fn new(wire_radius: f64, groove_width: f64) -> Self {
        Self {
            wire_radius,
            min_separation: 2.0 * wire_radius + groove_width,
        }
    }

    pub fn from_params(coil: &CoilParams) -> Self {
        Self {
            wire_radius: coil.wire_radius,
            min_separation: coil.d_min(),
        }
    }

    /// Centre-to-centre distance of two touching wires.
    #[inline(always)]
    pub fn bundle_pitch(&self) -> f64 {
        2.0 * self.wire_radius
    }

    pub fn classify_gap(&self, gap: f64) -> GapKind {
        let pitch = self.bundle_pitch();
        if gap < BUNDLE_LOWER * pitch {
            GapKind::Overlap
        } else if gap <= BUNDLE_UPPER * pitch {
            GapKind::Bundled
        } else if gap < SEPARATION_TOLERANCE * self.min_separation {
            GapKind::Forbidden
        } else {
            GapKind::Separated
        }
    }

    /// Runs the checks in order and reports the first one that fails.
    pub fn check(&self, layout: &WindingLayout) -> Result<(), Violation> {
        let n = layout.len();
        if n < 2 {
            return Err(Violation::TooFewWindings(n));
        }

        let left = n / 2 - 1;
        if layout[left] > 0.0 {
            return Err(Violation::CrossedMidplane {
                index: left,
                z: layout[left],
            });
        }
        let right = n / 2;
        if layout[right] < 0.0 {
            return Err(Violation::CrossedMidplane {
                index: right,
                z: layout[right],
            });
        }

        // Overlap anywhere takes precedence over a forbidden band.
        if let Some((index, gap)) = layout
            .gaps()
            .enumerate()
            .find(|&(_, gap)| self.classify_gap(gap) == GapKind::Overlap)
        {
            return Err(Violation::Overlap { index, gap });
        }

        if let Some((index, gap)) = layout
            .gaps()
            .enumerate()
            .find(|&(_, gap)| self.classify_gap(gap) == GapKind::Forbidden)
        {
            return Err(Violation::ForbiddenGap { index, gap });
        }

        Ok(())
    }

    #[inline(always)]
    pub fn is_valid(&self, layout: &WindingLayout) -> bool {
        self.check(layout).is_ok()
    }
}

/// Free-function form of [`PackingRules::is_valid`].
pub fn is_valid(layout: &WindingLayout, wire_radius: f64, min_separation: f64) -> bool {
    PackingRules {
        wire_radius,
        min_separation,
    }
    .is_valid(layout)
}
