use crate::error::{CfResult, CoilForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CoilConfig {
    #[command(flatten)]
    #[serde(default)]
    pub coil: CoilParams,
    #[command(flatten)]
    #[serde(default)]
    pub search: SearchParams,
}

/// Physical description of the former and the wire wound onto it.
/// All lengths are in metres.
#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoilParams {
    /// Half-length of the coil (outermost winding sits at +/- this value)
    #[arg(long, default_value_t = 0.08)]
    pub coil_length: f64,
    /// Radius of the outermost turn
    #[arg(long, default_value_t = 0.023)]
    pub coil_radius: f64,
    /// Radius of a single wire (32 AWG by default)
    #[arg(long, default_value_t = 0.000125)]
    pub wire_radius: f64,
    /// Total number of windings along the axis, half on either side
    #[arg(long, default_value_t = 50)]
    pub windings: usize,
    /// Turns stacked in each groove, wound beneath the outermost turn
    #[arg(long, default_value_t = 2)]
    pub turns: usize,
    /// Minimum wall thickness between two independent grooves
    #[arg(long, default_value_t = 0.001)]
    pub groove_width: f64,
}

impl Default for CoilParams {
    fn default() -> Self {
        Self {
            coil_length: 0.08,
            coil_radius: 0.023,
            wire_radius: 0.000125,
            windings: 50,
            turns: 2,
            groove_width: 0.001,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchParams {
    /// Axial extent over which homogeneity is optimized
    #[arg(long, default_value_t = 0.075)]
    pub optimization_length: f64,
    /// Number of field evaluation points
    #[arg(long, default_value_t = 200)]
    pub calculation_number: usize,
    #[arg(long, default_value_t = 10_000)]
    pub maximum_iterations: usize,
    /// Search stops once the trial displacement falls to this value
    #[arg(long, default_value_t = 1e-9)]
    pub optimization_threshold: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            optimization_length: 0.075,
            calculation_number: 200,
            maximum_iterations: 10_000,
            optimization_threshold: 1e-9,
        }
    }
}

impl CoilParams {
    /// Minimum centre-to-centre distance between two windings that are not bundled.
    #[inline(always)]
    pub fn d_min(&self) -> f64 {
        2.0 * self.wire_radius + self.groove_width
    }

    /// Turn radius of the innermost wire in a groove.
    pub fn inner_turn_radius(&self) -> f64 {
        self.coil_radius - 2.0 * (self.turns.saturating_sub(1)) as f64 * self.wire_radius
    }
}

impl CoilConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CoilForgeError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> CfResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Checks that the constants describe a coil that can actually be built.
    /// Packing of the initial layout is checked by the optimizer itself.
    pub fn validate(&self) -> CfResult<()> {
        let c = &self.coil;
        let s = &self.search;

        let positive = [
            ("coil_length", c.coil_length),
            ("coil_radius", c.coil_radius),
            ("wire_radius", c.wire_radius),
            ("optimization_length", s.optimization_length),
            ("optimization_threshold", s.optimization_threshold),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoilForgeError::Config(format!(
                    "{} must be a positive finite number (got {})",
                    name, value
                )));
            }
        }

        if !(c.groove_width.is_finite() && c.groove_width >= 0.0) {
            return Err(CoilForgeError::Config(format!(
                "groove_width must be non-negative (got {})",
                c.groove_width
            )));
        }
        if c.windings < 2 || c.windings % 2 != 0 {
            return Err(CoilForgeError::Config(format!(
                "windings must be an even number >= 2 (got {})",
                c.windings
            )));
        }
        if c.turns == 0 {
            return Err(CoilForgeError::Config(
                "turns must be at least 1".to_string(),
            ));
        }
        if c.inner_turn_radius() <= 0.0 {
            return Err(CoilForgeError::Config(format!(
                "{} turns of wire radius {} do not fit under coil_radius {}",
                c.turns, c.wire_radius, c.coil_radius
            )));
        }
        if s.calculation_number < 2 {
            return Err(CoilForgeError::Config(format!(
                "calculation_number must be at least 2 (got {})",
                s.calculation_number
            )));
        }
        Ok(())
    }

    /// Overwrites file-provided values with the ones typed explicitly on the
    /// command line. Defaults filled in by clap do not count.
    pub fn merge_from_cli(&mut self, cli: &CoilConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field;
                }
            };
        }

        update_if_present!(coil, coil_length);
        update_if_present!(coil, coil_radius);
        update_if_present!(coil, wire_radius);
        update_if_present!(coil, windings);
        update_if_present!(coil, turns);
        update_if_present!(coil, groove_width);

        update_if_present!(search, optimization_length);
        update_if_present!(search, calculation_number);
        update_if_present!(search, maximum_iterations);
        update_if_present!(search, optimization_threshold);
    }
}
