use crate::config::CoilParams;
use crate::error::{CfResult, CoilForgeError};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// `n` evenly spaced values from `start` to `end`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Axial positions of all windings, sorted along the coil axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindingLayout {
    positions: Vec<f64>,
}

impl WindingLayout {
    /// Equal-spacing solenoid over `[-half_length, +half_length]`.
    /// The negative half is computed and mirrored so the layout is exactly
    /// anti-symmetric.
    pub fn equally_spaced(half_length: f64, windings: usize) -> Self {
        let mut positions = vec![0.0; windings];
        if windings == 1 {
            return Self { positions };
        }
        let pitch = 2.0 * half_length / (windings - 1) as f64;
        for i in 0..windings / 2 {
            let z = -half_length + pitch * i as f64;
            positions[i] = z;
            positions[windings - 1 - i] = -z;
        }
        Self { positions }
    }

    pub fn from_positions(positions: Vec<f64>) -> CfResult<Self> {
        if positions.is_empty() {
            return Err(CoilForgeError::Validation(
                "Winding layout has 0 windings".to_string(),
            ));
        }
        if let Some(bad) = positions.iter().find(|z| !z.is_finite()) {
            return Err(CoilForgeError::Validation(format!(
                "Winding position {} is not finite",
                bad
            )));
        }
        if let Some(i) = positions.windows(2).position(|w| w[1] < w[0]) {
            return Err(CoilForgeError::Validation(format!(
                "Winding positions must be sorted ascending ({} follows {} at row {})",
                positions[i + 1],
                positions[i],
                i + 1
            )));
        }
        Ok(Self { positions })
    }

    #[inline(always)]
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Index of the winding paired with `index` across the midplane.
    #[inline(always)]
    pub fn mirror_of(&self, index: usize) -> usize {
        self.positions.len() - 1 - index
    }

    /// Moves winding `index` to `z` and its mirror to `-z`.
    pub fn set_pair(&mut self, index: usize, z: f64) {
        let mirror = self.mirror_of(index);
        self.positions[index] = z;
        self.positions[mirror] = -z;
    }

    /// Centre-to-centre distances between axially adjacent windings.
    pub fn gaps(&self) -> impl Iterator<Item = f64> + '_ {
        self.positions.windows(2).map(|w| w[1] - w[0])
    }

    pub fn is_antisymmetric(&self, tolerance: f64) -> bool {
        let n = self.positions.len();
        (0..n / 2).all(|i| (self.positions[i] + self.positions[n - 1 - i]).abs() <= tolerance)
    }

    /// Position of the outermost winding on the positive side.
    pub fn end_point(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }
}

impl Index<usize> for WindingLayout {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.positions[index]
    }
}

/// Radii of the turns stacked in every groove, outermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRadii {
    radii: Vec<f64>,
}

impl TurnRadii {
    pub fn new(radii: Vec<f64>) -> CfResult<Self> {
        if radii.is_empty() {
            return Err(CoilForgeError::Validation(
                "At least one turn radius is required".to_string(),
            ));
        }
        if let Some(bad) = radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(CoilForgeError::Validation(format!(
                "Turn radius {} must be positive",
                bad
            )));
        }
        Ok(Self { radii })
    }

    /// Outermost turn at `coil_radius`, each further turn one wire diameter
    /// deeper into the groove.
    pub fn stacked(coil: &CoilParams) -> CfResult<Self> {
        Self::new(linspace(
            coil.coil_radius,
            coil.inner_turn_radius(),
            coil.turns,
        ))
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[f64] {
        &self.radii
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn outer(&self) -> f64 {
        self.radii[0]
    }

    pub fn inner(&self) -> f64 {
        self.radii[self.radii.len() - 1]
    }

    pub fn mean(&self) -> f64 {
        self.radii.iter().sum::<f64>() / self.radii.len() as f64
    }
}

/// Axial sample points at which the field is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationGrid {
    points: Vec<f64>,
}

impl EvaluationGrid {
    pub fn new(points: Vec<f64>) -> CfResult<Self> {
        if points.len() < 2 {
            return Err(CoilForgeError::Config(format!(
                "Evaluation grid needs at least 2 points (got {})",
                points.len()
            )));
        }
        if points.iter().any(|z| !z.is_finite()) {
            return Err(CoilForgeError::Config(
                "Evaluation grid contains a non-finite point".to_string(),
            ));
        }
        if points.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CoilForgeError::Config(
                "Evaluation grid must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { points })
    }

    /// `count` points spanning `[0, length]`.
    pub fn span(length: f64, count: usize) -> CfResult<Self> {
        Self::new(linspace(0.0, length, count))
    }

    #[inline(always)]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
