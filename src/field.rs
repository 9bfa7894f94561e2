//! On-axis magnetic field of coaxial circular loops and the homogeneity score
//! built from it.
//!
//! For a loop of radius `r` at axial position `z_loop`, the on-axis field at
//! `z` is `mu0 * I / 2 * r^2 / (r^2 + (z - z_loop)^2)^1.5`. The shape score
//! only ever compares the field against its own central value, so the
//! `mu0 * I / 2` prefactor is dropped there and kept in [`field_tesla`].

use crate::error::{CfResult, CoilForgeError};
use crate::geometry::{EvaluationGrid, TurnRadii, WindingLayout};
use std::f64::consts::PI;

/// Permeability of free space (H/m).
pub const MU0: f64 = 4.0 * PI * 1e-7;

/// Unscaled on-axis contribution of one loop at axial offset `dz`.
#[inline(always)]
pub fn loop_field(radius: f64, dz: f64) -> f64 {
    let r2 = radius * radius;
    r2 / (r2 + dz * dz).powf(1.5)
}

/// Unscaled on-axis field at `z` summed over every winding and turn.
#[inline(always)]
pub fn axial_field(z: f64, positions: &[f64], radii: &[f64]) -> f64 {
    let mut total = 0.0;
    for &z_loop in positions {
        let dz = z - z_loop;
        for &r in radii {
            total += loop_field(r, dz);
        }
    }
    total
}

/// Physical on-axis field in tesla for `current` amperes through every turn.
pub fn field_tesla(z: f64, positions: &[f64], radii: &[f64], current: f64) -> f64 {
    MU0 * current / 2.0 * axial_field(z, positions, radii)
}

/// Trapezoidal integral of `ys` sampled at `xs`.
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}

/// Relative deviation `|B_z - B_c| / B_c` at every grid point.
///
/// Fails when the central field is not strictly positive: that cannot happen
/// for a buildable coil, so it signals broken inputs rather than a bad candidate.
pub fn deviation_profile(
    grid: &EvaluationGrid,
    layout: &WindingLayout,
    radii: &TurnRadii,
) -> CfResult<Vec<f64>> {
    let positions = layout.positions();
    let radii = radii.as_slice();

    let b_c = axial_field(0.0, positions, radii);
    if !(b_c.is_finite() && b_c > 0.0) {
        return Err(CoilForgeError::Numeric(format!(
            "central field evaluated to {} for a layout of {} windings",
            b_c,
            positions.len()
        )));
    }

    Ok(grid
        .points()
        .iter()
        .map(|&z| (axial_field(z, positions, radii) - b_c).abs() / b_c)
        .collect())
}

/// Integrated relative deviation of the on-axis field from its central value.
/// Lower is better; zero means a perfectly flat field over the grid.
///
/// The integral runs over the grid coordinates in metres, so the value is
/// `(M - 1) / optimization_length` times smaller than a sum over unit-spaced
/// samples. Ranking between candidates is the same either way.
pub fn score(grid: &EvaluationGrid, layout: &WindingLayout, radii: &TurnRadii) -> CfResult<f64> {
    let deviation = deviation_profile(grid, layout, radii)?;
    Ok(trapezoid(grid.points(), &deviation))
}

/// Binds the immutable grid and turn radii so candidates can be scored by
/// layout alone.
#[derive(Debug, Clone)]
pub struct HomogeneityModel {
    grid: EvaluationGrid,
    radii: TurnRadii,
}

impl HomogeneityModel {
    pub fn new(grid: EvaluationGrid, radii: TurnRadii) -> Self {
        Self { grid, radii }
    }

    #[inline(always)]
    pub fn score(&self, layout: &WindingLayout) -> CfResult<f64> {
        score(&self.grid, layout, &self.radii)
    }

    pub fn grid(&self) -> &EvaluationGrid {
        &self.grid
    }

    pub fn radii(&self) -> &TurnRadii {
        &self.radii
    }
}
