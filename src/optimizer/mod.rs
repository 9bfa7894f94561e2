// ===== coilforge/src/optimizer/mod.rs =====
pub mod mutation;
pub mod runner;

pub use self::mutation::MoveKind;
pub use self::runner::{
    NoProgress, OptimizationOptions, OptimizationResult, Optimizer, ProgressCallback,
};

use crate::constraints::PackingRules;
use crate::error::{CfResult, CoilForgeError};
use crate::field::HomogeneityModel;
use crate::geometry::WindingLayout;
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::Display;
use tracing::debug;

/// Initial trial displacement as a fraction of the nominal winding pitch.
/// Kept below one half so a single shift cannot jump over a neighbour.
pub const INITIAL_STEP_FRACTION: f64 = 0.25;

/// Divisor applied to the step after a pass without improvement. Must be > 1.
pub const STEP_DECAY: f64 = 2.0;

/// Tolerance used when checking the mirror pairing of a supplied layout.
pub const SYMMETRY_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum SearchStatus {
    Running,
    Converged,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub layout: WindingLayout,
    pub score: f64,
    pub step: f64,
    pub iteration: usize,
    pub status: SearchStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcceptedMove {
    pub iteration: usize,
    pub index: usize,
    pub kind: MoveKind,
    pub score: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassOutcome {
    /// A candidate improved the score; the pass ended early.
    Accepted(AcceptedMove),
    /// Every index was tried without improvement; the step was reduced.
    Stalled,
    /// The iteration cap was hit mid-pass, or the search had already terminated.
    Interrupted,
}

/// First-improvement local search over symmetric winding pairs.
pub struct LocalSearch {
    model: HomogeneityModel,
    rules: PackingRules,
    threshold: f64,
    max_iterations: usize,
    movable: Vec<usize>,
    state: SearchState,
    pub rng: fastrand::Rng,
}

impl LocalSearch {
    pub fn new(
        model: HomogeneityModel,
        rules: PackingRules,
        layout: WindingLayout,
        step: f64,
        threshold: f64,
        max_iterations: usize,
        rng: fastrand::Rng,
    ) -> CfResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(CoilForgeError::Config(format!(
                "initial step must be positive (got {})",
                step
            )));
        }
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(CoilForgeError::Config(format!(
                "step threshold must be positive (got {})",
                threshold
            )));
        }
        if !layout.is_antisymmetric(SYMMETRY_TOLERANCE) {
            return Err(CoilForgeError::Validation(
                "starting layout is not symmetric about the midplane".to_string(),
            ));
        }
        if let Err(violation) = rules.check(&layout) {
            return Err(CoilForgeError::Config(format!(
                "starting layout violates the packing rules: {} (wire_radius={}, d_min={})",
                violation, rules.wire_radius, rules.min_separation
            )));
        }

        let score = model.score(&layout)?;
        let movable = mutation::movable_indices(layout.len());

        let mut search = Self {
            model,
            rules,
            threshold,
            max_iterations,
            movable,
            state: SearchState {
                layout,
                score,
                step,
                iteration: 0,
                status: SearchStatus::Running,
            },
            rng,
        };
        search.refresh_status();
        Ok(search)
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn rules(&self) -> &PackingRules {
        &self.rules
    }

    pub fn model(&self) -> &HomogeneityModel {
        &self.model
    }

    pub fn into_state(self) -> SearchState {
        self.state
    }

    /// One shuffled sweep over the movable indices.
    pub fn run_pass(&mut self) -> CfResult<PassOutcome> {
        if self.state.status != SearchStatus::Running {
            return Ok(PassOutcome::Interrupted);
        }

        let mut order = self.movable.clone();
        self.rng.shuffle(&mut order);

        for index in order {
            if self.state.iteration >= self.max_iterations {
                self.state.status = SearchStatus::Exhausted;
                return Ok(PassOutcome::Interrupted);
            }
            self.state.iteration += 1;

            if let Some(accepted) = self.try_index(index)? {
                self.refresh_status();
                return Ok(PassOutcome::Accepted(accepted));
            }
        }

        self.state.step /= STEP_DECAY;
        self.refresh_status();
        Ok(PassOutcome::Stalled)
    }

    /// Tries the candidate moves for one index and commits the first one that
    /// is buildable and strictly better than the current best.
    fn try_index(&mut self, index: usize) -> CfResult<Option<AcceptedMove>> {
        for kind in MoveKind::iter() {
            let candidate =
                mutation::propose(&self.state.layout, index, kind, self.state.step, &self.rules);
            if !self.rules.is_valid(&candidate) {
                continue;
            }

            let score = self.model.score(&candidate)?;
            if score < self.state.score {
                self.state.layout = candidate;
                self.state.score = score;

                let accepted = AcceptedMove {
                    iteration: self.state.iteration,
                    index,
                    kind,
                    score,
                    step: self.state.step,
                };
                debug!(
                    "it {:>7} | idx {:>3} | {:<16} | score {:.6e} | step {:.3e}",
                    accepted.iteration, index, kind, score, accepted.step
                );
                return Ok(Some(accepted));
            }
        }
        Ok(None)
    }

    fn refresh_status(&mut self) {
        if self.state.step <= self.threshold {
            self.state.status = SearchStatus::Converged;
        } else if self.state.iteration >= self.max_iterations {
            self.state.status = SearchStatus::Exhausted;
        }
    }
}
