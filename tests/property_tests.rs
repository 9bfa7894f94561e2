use coilforge::config::{CoilConfig, CoilParams, SearchParams};
use coilforge::constraints::PackingRules;
use coilforge::field::score;
use coilforge::geometry::{EvaluationGrid, TurnRadii, WindingLayout};
use coilforge::optimizer::mutation::{movable_indices, propose, MoveKind};
use coilforge::optimizer::{NoProgress, OptimizationOptions, Optimizer, SYMMETRY_TOLERANCE};
use proptest::prelude::*;

// --- STRATEGIES ---

prop_compose! {
    fn arb_config()(
        half_windings in 2usize..5,
        coil_length in 0.006..0.02f64,
        coil_radius in 0.01..0.03f64,
        wire_radius in 0.00005..0.0002f64,
        turns in 1usize..4,
        groove_width in 0.0..0.001f64,
    ) -> CoilConfig {
        CoilConfig {
            coil: CoilParams {
                coil_length,
                coil_radius,
                wire_radius,
                windings: 2 * half_windings,
                turns,
                groove_width,
            },
            search: SearchParams {
                optimization_length: 0.9 * coil_length,
                calculation_number: 20,
                maximum_iterations: 200,
                optimization_threshold: 1e-8,
            },
        }
    }
}

/// Sorted, anti-symmetric layouts of 4..=12 windings.
prop_compose! {
    fn arb_symmetric_layout()(
        half in proptest::collection::vec(0.001..0.05f64, 2..7)
    ) -> WindingLayout {
        let mut half = half;
        half.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let mut positions: Vec<f64> = half.iter().map(|z| -z).collect();
        positions.extend(half.iter().rev());
        WindingLayout::from_positions(positions).unwrap()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn short_searches_keep_every_invariant(config in arb_config(), seed in any::<u64>()) {
        let rules = PackingRules::from_params(&config.coil);
        let result = Optimizer::new(&config, OptimizationOptions::from(&config), Some(seed))
            .unwrap()
            .run(&NoProgress)
            .unwrap();

        prop_assert!(result.layout.is_antisymmetric(SYMMETRY_TOLERANCE));
        prop_assert!(rules.is_valid(&result.layout));
        prop_assert!(result.score <= result.initial_score);
        prop_assert!(result.iterations <= config.search.maximum_iterations);
        prop_assert_eq!(result.layout[0], -config.coil.coil_length);
        prop_assert!(result.layout.gaps().all(|g| g > 0.0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn score_is_finite_and_non_negative(
        l in arb_symmetric_layout(),
        radius in 0.005..0.05f64,
        length in 0.001..0.05f64,
    ) {
        let grid = EvaluationGrid::span(length, 25).unwrap();
        let radii = TurnRadii::new(vec![radius]).unwrap();
        let s = score(&grid, &l, &radii).unwrap();
        prop_assert!(s.is_finite());
        prop_assert!(s >= 0.0);
    }

    #[test]
    fn proposals_preserve_symmetry(
        l in arb_symmetric_layout(),
        step in 1e-6..0.01f64,
        wire_radius in 1e-5..1e-3f64,
    ) {
        let rules = PackingRules::new(wire_radius, 0.0005);
        for index in movable_indices(l.len()) {
            for kind in [
                MoveKind::ShiftOutward,
                MoveKind::SeparateOutward,
                MoveKind::ShiftInward,
                MoveKind::SeparateInward,
            ] {
                let candidate = propose(&l, index, kind, step, &rules);
                prop_assert!(candidate.is_antisymmetric(1e-15));
                prop_assert_eq!(candidate.len(), l.len());
            }
        }
    }
}
