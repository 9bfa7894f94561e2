use crate::config::CoilConfig;
use crate::constraints::PackingRules;
use crate::error::{CfResult, CoilForgeError};
use crate::field::HomogeneityModel;
use crate::geometry::{EvaluationGrid, TurnRadii, WindingLayout};
use crate::optimizer::{
    AcceptedMove, LocalSearch, PassOutcome, SearchState, SearchStatus, INITIAL_STEP_FRACTION,
};
use std::time::{Duration, Instant};
use tracing::info;

pub struct OptimizationOptions {
    pub threshold: f64,
    pub max_iterations: usize,
    /// Overrides the equally spaced starting layout.
    pub initial_layout: Option<WindingLayout>,
    /// Overrides the default starting step of `0.25 * coil_length / windings`.
    pub initial_step: Option<f64>,
}

impl From<&CoilConfig> for OptimizationOptions {
    fn from(cfg: &CoilConfig) -> Self {
        Self {
            threshold: cfg.search.optimization_threshold,
            max_iterations: cfg.search.maximum_iterations,
            initial_layout: None,
            initial_step: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub layout: WindingLayout,
    pub radii: TurnRadii,
    pub wire_radius: f64,
    pub rules: PackingRules,
    pub score: f64,
    pub initial_score: f64,
    pub step: f64,
    pub iterations: usize,
    pub status: SearchStatus,
    /// Every accepted move, in order.
    pub history: Vec<AcceptedMove>,
    pub elapsed: Duration,
}

/// Receives every accepted move as it happens.
pub trait ProgressCallback {
    fn on_accept(&self, state: &SearchState, accepted: &AcceptedMove);
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_accept(&self, _state: &SearchState, _accepted: &AcceptedMove) {}
}

impl<F> ProgressCallback for F
where
    F: Fn(&SearchState, &AcceptedMove),
{
    fn on_accept(&self, state: &SearchState, accepted: &AcceptedMove) {
        self(state, accepted)
    }
}

pub struct Optimizer {
    search: LocalSearch,
    radii: TurnRadii,
    initial_score: f64,
    history: Vec<AcceptedMove>,
}

impl Optimizer {
    pub fn new(config: &CoilConfig, options: OptimizationOptions, seed: Option<u64>) -> CfResult<Self> {
        config.validate()?;
        let coil = &config.coil;

        let rules = PackingRules::from_params(coil);
        let radii = TurnRadii::stacked(coil)?;
        let grid = EvaluationGrid::span(
            config.search.optimization_length,
            config.search.calculation_number,
        )?;

        let layout = match options.initial_layout {
            Some(layout) => layout,
            None => WindingLayout::equally_spaced(coil.coil_length, coil.windings),
        };
        if layout.len() != coil.windings {
            return Err(CoilForgeError::Config(format!(
                "starting layout has {} windings but the config asks for {}",
                layout.len(),
                coil.windings
            )));
        }

        let step = options
            .initial_step
            .unwrap_or(INITIAL_STEP_FRACTION * coil.coil_length / coil.windings as f64);

        let rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };

        let model = HomogeneityModel::new(grid, radii.clone());
        let search = LocalSearch::new(
            model,
            rules,
            layout,
            step,
            options.threshold,
            options.max_iterations,
            rng,
        )
        .map_err(|e| match e {
            CoilForgeError::Config(msg) => CoilForgeError::Config(format!(
                "{}; {} windings over coil_length={} leave a pitch of {:.6e}",
                msg,
                coil.windings,
                coil.coil_length,
                2.0 * coil.coil_length / (coil.windings - 1) as f64
            )),
            other => other,
        })?;

        let initial_score = search.state().score;

        Ok(Self {
            search,
            radii,
            initial_score,
            history: Vec::new(),
        })
    }

    pub fn state(&self) -> &SearchState {
        self.search.state()
    }

    pub fn search(&self) -> &LocalSearch {
        &self.search
    }

    pub fn history(&self) -> &[AcceptedMove] {
        &self.history
    }

    pub fn initial_score(&self) -> f64 {
        self.initial_score
    }

    pub fn run_pass<CB: ProgressCallback>(&mut self, callback: &CB) -> CfResult<PassOutcome> {
        let outcome = self.search.run_pass()?;
        if let PassOutcome::Accepted(accepted) = outcome {
            self.history.push(accepted);
            callback.on_accept(self.search.state(), &accepted);
        }
        Ok(outcome)
    }

    /// Runs passes until the step falls below the threshold or the iteration
    /// budget is spent.
    pub fn run<CB: ProgressCallback>(mut self, callback: &CB) -> CfResult<OptimizationResult> {
        let start_time = Instant::now();
        let windings = self.state().layout.len();

        info!(
            "🧲 Searching {} windings | step {:.3e} | initial score {:.6e}",
            windings,
            self.state().step,
            self.initial_score
        );

        let mut passes = 0usize;
        while self.state().status == SearchStatus::Running {
            self.run_pass(callback)?;
            passes += 1;
        }

        let elapsed = start_time.elapsed();
        let rules = *self.search.rules();
        let state = self.search.into_state();

        info!(
            "🏁 {} after {} iterations ({} passes, {} accepted) in {:.2}s | score {:.6e}",
            state.status,
            state.iteration,
            passes,
            self.history.len(),
            elapsed.as_secs_f64(),
            state.score
        );

        Ok(OptimizationResult {
            layout: state.layout,
            radii: self.radii,
            wire_radius: rules.wire_radius,
            rules,
            score: state.score,
            initial_score: self.initial_score,
            step: state.step,
            iterations: state.iteration,
            status: state.status,
            history: self.history,
            elapsed,
        })
    }
}
