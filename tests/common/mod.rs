#![allow(dead_code)]

use coilforge::config::{CoilConfig, CoilParams, SearchParams};
use coilforge::export::ResultTable;
use coilforge::geometry::{TurnRadii, WindingLayout};

/// Small coil that searches in well under a second.
pub struct ConfigBuilder {
    config: CoilConfig,
}

impl ConfigBuilder {
    pub fn small() -> Self {
        Self {
            config: CoilConfig {
                coil: CoilParams {
                    coil_length: 0.01,
                    coil_radius: 0.01,
                    wire_radius: 0.0001,
                    windings: 6,
                    turns: 1,
                    groove_width: 0.0005,
                },
                search: SearchParams {
                    optimization_length: 0.009,
                    calculation_number: 40,
                    maximum_iterations: 5_000,
                    optimization_threshold: 1e-7,
                },
            },
        }
    }

    pub fn windings(mut self, n: usize) -> Self {
        self.config.coil.windings = n;
        self
    }

    pub fn turns(mut self, t: usize) -> Self {
        self.config.coil.turns = t;
        self
    }

    pub fn coil_length(mut self, l: f64) -> Self {
        self.config.coil.coil_length = l;
        self
    }

    pub fn coil_radius(mut self, r: f64) -> Self {
        self.config.coil.coil_radius = r;
        self
    }

    pub fn wire_radius(mut self, r: f64) -> Self {
        self.config.coil.wire_radius = r;
        self
    }

    pub fn groove_width(mut self, w: f64) -> Self {
        self.config.coil.groove_width = w;
        self
    }

    pub fn optimization_length(mut self, l: f64) -> Self {
        self.config.search.optimization_length = l;
        self
    }

    pub fn calculation_number(mut self, m: usize) -> Self {
        self.config.search.calculation_number = m;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.config.search.maximum_iterations = n;
        self
    }

    pub fn threshold(mut self, t: f64) -> Self {
        self.config.search.optimization_threshold = t;
        self
    }

    pub fn build(self) -> CoilConfig {
        self.config
    }
}

pub fn layout(positions: &[f64]) -> WindingLayout {
    WindingLayout::from_positions(positions.to_vec()).expect("test layout must be sorted")
}

/// Six windings in three groups: a bundle of two at each end and a
/// separated central pair. Lengths in metres.
pub fn sample_table() -> ResultTable {
    let wire = 0.000125;
    ResultTable::new(
        TurnRadii::new(vec![0.023, 0.02275]).unwrap(),
        layout(&[-0.08, -0.08 + 2.0 * wire, -0.01, 0.01, 0.08 - 2.0 * wire, 0.08]),
        wire,
    )
}
