mod common;

use coilforge::constraints::PackingRules;
use coilforge::error::CoilForgeError;
use coilforge::geometry::WindingLayout;
use coilforge::optimizer::mutation::{movable_indices, propose, MoveKind};
use coilforge::optimizer::{
    AcceptedMove, NoProgress, OptimizationOptions, Optimizer, PassOutcome, SearchState,
    SearchStatus, SYMMETRY_TOLERANCE,
};
use common::{layout, ConfigBuilder};
use rstest::rstest;
use std::cell::RefCell;
use strum::IntoEnumIterator;

#[test]
fn four_winding_search_end_to_end() {
    let config = ConfigBuilder::small()
        .windings(4)
        .coil_length(1.0)
        .coil_radius(1.0)
        .wire_radius(0.01)
        .groove_width(0.0)
        .optimization_length(0.5)
        .calculation_number(50)
        .max_iterations(1000)
        .threshold(1e-6)
        .build();

    let optimizer = Optimizer::new(&config, OptimizationOptions::from(&config), Some(7)).unwrap();
    let result = optimizer.run(&NoProgress).unwrap();

    assert!(result.layout.is_antisymmetric(SYMMETRY_TOLERANCE));
    assert!(result.score <= result.initial_score);
    assert!(result.step <= 1e-6 || result.iterations == 1000);
    assert!(result.rules.is_valid(&result.layout));
    assert_eq!(result.layout[0], -1.0);
    assert_eq!(result.layout[3], 1.0);
}

#[test]
fn every_accepted_state_is_symmetric_and_buildable() {
    let config = ConfigBuilder::small().build();
    let rules = PackingRules::from_params(&config.coil);
    let seen: RefCell<Vec<(bool, bool)>> = RefCell::new(Vec::new());

    let callback = |state: &SearchState, _accepted: &AcceptedMove| {
        seen.borrow_mut().push((
            state.layout.is_antisymmetric(SYMMETRY_TOLERANCE),
            rules.is_valid(&state.layout),
        ));
    };

    let optimizer = Optimizer::new(&config, OptimizationOptions::from(&config), Some(3)).unwrap();
    let result = optimizer.run(&callback).unwrap();

    let seen = seen.into_inner();
    assert_eq!(seen.len(), result.history.len());
    assert!(!seen.is_empty(), "an equally spaced start should be improvable");
    assert!(seen.iter().all(|&(sym, valid)| sym && valid));
}

#[test]
fn accepted_scores_strictly_decrease() {
    let config = ConfigBuilder::small().turns(2).build();
    let optimizer = Optimizer::new(&config, OptimizationOptions::from(&config), Some(11)).unwrap();
    let result = optimizer.run(&NoProgress).unwrap();

    let mut previous = result.initial_score;
    for accepted in &result.history {
        assert!(accepted.score < previous);
        previous = accepted.score;
    }
    assert_eq!(previous, result.score);
}

#[test]
fn outer_pair_never_moves() {
    let config = ConfigBuilder::small().windings(8).build();
    let optimizer = Optimizer::new(&config, OptimizationOptions::from(&config), Some(5)).unwrap();
    let result = optimizer.run(&NoProgress).unwrap();

    assert_eq!(result.layout[0], -config.coil.coil_length);
    assert_eq!(result.layout[7], config.coil.coil_length);
    assert!(result
        .history
        .iter()
        .all(|m| (1..4).contains(&m.index)));
}

#[test]
fn stalled_layout_stays_stalled_at_the_same_step() {
    let config = ConfigBuilder::small().max_iterations(50_000).build();
    let mut optimizer =
        Optimizer::new(&config, OptimizationOptions::from(&config), Some(21)).unwrap();

    let mut stalled_at = None;
    while optimizer.state().status == SearchStatus::Running {
        let before = optimizer.state().clone();
        if optimizer.run_pass(&NoProgress).unwrap() == PassOutcome::Stalled {
            assert_eq!(optimizer.state().step, before.step / 2.0);
            assert_eq!(optimizer.state().layout, before.layout);
            stalled_at = Some(before);
            break;
        }
    }
    let before = stalled_at.expect("search should stall at least once");

    let options = OptimizationOptions {
        initial_layout: Some(before.layout.clone()),
        initial_step: Some(before.step),
        ..OptimizationOptions::from(&config)
    };
    let mut resumed = Optimizer::new(&config, options, Some(99)).unwrap();
    assert_eq!(resumed.initial_score(), before.score);

    assert_eq!(resumed.run_pass(&NoProgress).unwrap(), PassOutcome::Stalled);
    assert_eq!(resumed.state().layout, before.layout);
    assert_eq!(resumed.state().step, before.step / 2.0);
}

#[test]
fn iteration_cap_exhausts_the_search() {
    let config = ConfigBuilder::small().max_iterations(5).threshold(1e-30).build();
    let optimizer = Optimizer::new(&config, OptimizationOptions::from(&config), Some(1)).unwrap();
    let result = optimizer.run(&NoProgress).unwrap();

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert_eq!(result.iterations, 5);
}

#[test]
fn zero_iteration_budget_returns_the_start() {
    let config = ConfigBuilder::small().max_iterations(0).build();
    let optimizer = Optimizer::new(&config, OptimizationOptions::from(&config), Some(1)).unwrap();
    let result = optimizer.run(&NoProgress).unwrap();

    assert_eq!(result.status, SearchStatus::Exhausted);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.layout, WindingLayout::equally_spaced(0.01, 6));
    assert_eq!(result.score, result.initial_score);
    assert!(result.history.is_empty());
}

#[test]
fn two_windings_converge_without_moving() {
    let config = ConfigBuilder::small().windings(2).build();
    let optimizer = Optimizer::new(&config, OptimizationOptions::from(&config), Some(1)).unwrap();
    let result = optimizer.run(&NoProgress).unwrap();

    assert_eq!(result.status, SearchStatus::Converged);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.layout, layout(&[-0.01, 0.01]));
    assert!(result.step <= config.search.optimization_threshold);
}

#[rstest]
#[case(0.0)]
#[case(-1.0)]
#[case(f64::NAN)]
fn non_positive_threshold_is_a_config_error(#[case] threshold: f64) {
    let config = ConfigBuilder::small().windings(2).build();
    let options = OptimizationOptions {
        threshold,
        ..OptimizationOptions::from(&config)
    };
    assert!(matches!(
        Optimizer::new(&config, options, Some(1)),
        Err(CoilForgeError::Config(_))
    ));
}

#[test]
fn overlapping_start_is_a_config_error() {
    // pitch of 0.004 against a wire diameter of 0.006
    let config = ConfigBuilder::small().wire_radius(0.003).build();
    assert!(matches!(
        Optimizer::new(&config, OptimizationOptions::from(&config), None),
        Err(CoilForgeError::Config(_))
    ));
}

#[test]
fn start_inside_the_forbidden_band_is_a_config_error() {
    // pitch 0.007 sits between the bundle pitch 0.002 and d_min 0.012
    let config = ConfigBuilder::small()
        .windings(4)
        .coil_length(0.0105)
        .wire_radius(0.001)
        .groove_width(0.01)
        .build();
    assert!(matches!(
        Optimizer::new(&config, OptimizationOptions::from(&config), None),
        Err(CoilForgeError::Config(_))
    ));
}

#[test]
fn odd_winding_count_is_rejected() {
    let config = ConfigBuilder::small().windings(7).build();
    assert!(matches!(
        Optimizer::new(&config, OptimizationOptions::from(&config), None),
        Err(CoilForgeError::Config(_))
    ));
}

#[test]
fn asymmetric_start_is_rejected() {
    let config = ConfigBuilder::small().windings(4).build();
    let options = OptimizationOptions {
        initial_layout: Some(layout(&[-0.01, -0.004, 0.003, 0.01])),
        ..OptimizationOptions::from(&config)
    };
    assert!(matches!(
        Optimizer::new(&config, options, None),
        Err(CoilForgeError::Validation(_))
    ));
}

#[test]
fn movable_indices_skip_the_outer_edge() {
    assert_eq!(movable_indices(2), Vec::<usize>::new());
    assert_eq!(movable_indices(4), vec![1]);
    assert_eq!(movable_indices(10), vec![1, 2, 3, 4]);
}

#[test]
fn every_proposal_is_mirrored() {
    let rules = PackingRules::new(0.0001, 0.0005);
    let start = WindingLayout::equally_spaced(0.01, 8);

    for index in movable_indices(8) {
        for kind in MoveKind::iter() {
            let candidate = propose(&start, index, kind, 0.0005, &rules);
            assert!(candidate.is_antisymmetric(0.0), "{} at {}", kind, index);
            for other in (0..8).filter(|&i| i != index && i != 7 - index) {
                assert_eq!(candidate[other], start[other]);
            }
        }
    }
}

#[test]
fn separation_moves_land_exactly_on_d_min() {
    let rules = PackingRules::new(0.0001, 0.0005);
    let start = WindingLayout::equally_spaced(0.01, 8);

    let outward = propose(&start, 2, MoveKind::SeparateOutward, 0.0005, &rules);
    assert_eq!(outward[2], start[1] + rules.min_separation);

    let inward = propose(&start, 2, MoveKind::SeparateInward, 0.0005, &rules);
    assert_eq!(inward[2], start[3] - rules.min_separation);

    // the innermost winding separates from its own mirror
    let innermost = propose(&start, 3, MoveKind::SeparateInward, 0.0005, &rules);
    assert_eq!(innermost[3], -rules.min_separation / 2.0);
    assert_eq!(innermost[4], rules.min_separation / 2.0);
}

#[test]
fn blocked_shift_snaps_to_bundle_contact() {
    let rules = PackingRules::new(0.0001, 0.0005);
    let start = WindingLayout::equally_spaced(0.01, 6);
    // pitch is 0.004, so a step of 0.0039 leaves an overlapping 0.0001 gap
    let outward = propose(&start, 1, MoveKind::ShiftOutward, 0.0039, &rules);
    assert_eq!(outward[1], start[0] + rules.bundle_pitch());

    let inward = propose(&start, 2, MoveKind::ShiftInward, 0.00195, &rules);
    assert_eq!(inward[2], -rules.bundle_pitch() / 2.0);
    assert!(rules.is_valid(&inward));
}
