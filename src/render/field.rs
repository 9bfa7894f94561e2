use crate::error::{CfResult, CoilForgeError};
use crate::export::ResultTable;
use crate::field::field_tesla;
use crate::geometry::linspace;
use crate::pipeline::ResultConsumer;
use plotters::coord::Shift;
use plotters::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::ops::Range;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::info;

/// Number of axial samples in the comparison profiles.
pub const PROFILE_SAMPLES: usize = 1000;

// Lee-Whiting four-coil geometry: outer and inner loop positions as a
// fraction of the coil radius, and the turn counts per loop.
const LW_OUTER: f64 = 0.9408;
const LW_INNER: f64 = 0.2432;
const LW_OUTER_TURNS: usize = 9;
const LW_INNER_TURNS: usize = 4;

const PROFILE_PLOT_SIZE: (u32, u32) = (800, 1000);
const WIRE_PLOT_SIZE: (u32, u32) = (800, 180);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize)]
pub enum ReferenceCoil {
    /// The optimized layout itself.
    #[strum(serialize = "NG")]
    Optimized,
    /// Equally spaced, same length and mean radius.
    #[strum(serialize = "Sol")]
    Solenoid,
    /// Helmholtz pair at the same length.
    #[strum(serialize = "H 1")]
    HelmholtzLength,
    /// Helmholtz pair at the same radius.
    #[strum(serialize = "H 2")]
    HelmholtzRadius,
    #[strum(serialize = "LW 1")]
    LeeWhitingLength,
    #[strum(serialize = "LW 2")]
    LeeWhitingRadius,
}

impl ReferenceCoil {
    /// Axial loop positions and per-loop radii for this coil, sized from the
    /// optimized table.
    pub fn geometry(self, table: &ResultTable) -> (Vec<f64>, Vec<f64>) {
        let end = table.layout().end_point();
        let mean_radius = table.radii().mean();
        let windings = table.windings();

        match self {
            ReferenceCoil::Optimized => (
                table.layout().positions().to_vec(),
                table.radii().as_slice().to_vec(),
            ),
            ReferenceCoil::Solenoid => (linspace(-end, end, windings), vec![mean_radius]),
            ReferenceCoil::HelmholtzLength => (vec![-end, end], vec![2.0 * end]),
            ReferenceCoil::HelmholtzRadius => {
                let half = mean_radius / 2.0;
                (vec![-half, half], vec![mean_radius])
            }
            ReferenceCoil::LeeWhitingLength => (lee_whiting(end, end * LW_INNER / LW_OUTER), vec![end / LW_OUTER]),
            ReferenceCoil::LeeWhitingRadius => (
                lee_whiting(LW_OUTER * mean_radius, LW_INNER * mean_radius),
                vec![mean_radius],
            ),
        }
    }

    fn colour(self) -> RGBColor {
        match self {
            ReferenceCoil::Optimized => RGBColor(31, 119, 180),
            ReferenceCoil::Solenoid => RGBColor(255, 127, 14),
            ReferenceCoil::LeeWhitingLength | ReferenceCoil::LeeWhitingRadius => {
                RGBColor(44, 160, 44)
            }
            ReferenceCoil::HelmholtzLength | ReferenceCoil::HelmholtzRadius => {
                RGBColor(214, 39, 40)
            }
        }
    }
}

fn lee_whiting(outer: f64, inner: f64) -> Vec<f64> {
    let mut positions = Vec::with_capacity(2 * (LW_OUTER_TURNS + LW_INNER_TURNS));
    positions.extend(std::iter::repeat(-outer).take(LW_OUTER_TURNS));
    positions.extend(std::iter::repeat(-inner).take(LW_INNER_TURNS));
    positions.extend(std::iter::repeat(inner).take(LW_INNER_TURNS));
    positions.extend(std::iter::repeat(outer).take(LW_OUTER_TURNS));
    positions
}

#[derive(Debug, Clone)]
pub struct CoilProfile {
    pub coil: ReferenceCoil,
    pub positions: Vec<f64>,
    pub radii: Vec<f64>,
    /// `B_z / B_c` at every sample.
    pub normalized: Vec<f64>,
    /// Central field in tesla for 1 A through every turn.
    pub center_tesla: f64,
}

impl CoilProfile {
    pub fn compute(coil: ReferenceCoil, table: &ResultTable, z: &[f64]) -> CfResult<Self> {
        let (positions, radii) = coil.geometry(table);
        let center_tesla = field_tesla(0.0, &positions, &radii, 1.0);
        if !(center_tesla.is_finite() && center_tesla > 0.0) {
            return Err(CoilForgeError::Numeric(format!(
                "{} coil has central field {}",
                coil, center_tesla
            )));
        }
        let normalized = z
            .iter()
            .map(|&zi| field_tesla(zi, &positions, &radii, 1.0) / center_tesla)
            .collect();

        Ok(Self {
            coil,
            positions,
            radii,
            normalized,
            center_tesla,
        })
    }

    pub fn turn_count(&self) -> usize {
        self.positions.len() * self.radii.len()
    }

    /// Central field per ampere-turn, in μT.
    pub fn center_per_amp_turn_ut(&self) -> f64 {
        self.center_tesla * 1e6 / self.turn_count() as f64
    }

    pub fn radius_cm(&self) -> f64 {
        100.0 * self.radii.iter().sum::<f64>() / self.radii.len() as f64
    }

    /// Distance from the midplane to the outermost loop, in cm.
    pub fn half_length_cm(&self) -> f64 {
        100.0 * self.positions.iter().fold(0.0_f64, |acc, z| acc.max(z.abs()))
    }
}

/// On-axis field of the optimized coil next to the classic reference designs.
#[derive(Debug, Clone)]
pub struct FieldComparison {
    z: Vec<f64>,
    profiles: Vec<CoilProfile>,
}

impl FieldComparison {
    pub fn from_table(table: &ResultTable) -> CfResult<Self> {
        let end = table.layout().end_point();
        if !(end.is_finite() && end > 0.0) {
            return Err(CoilForgeError::Validation(format!(
                "outermost winding must sit above the midplane (got z = {})",
                end
            )));
        }
        let z = linspace(-end, end, PROFILE_SAMPLES);

        let coils: Vec<ReferenceCoil> = ReferenceCoil::iter().collect();
        let profiles = coils
            .par_iter()
            .map(|&coil| CoilProfile::compute(coil, table, &z))
            .collect::<CfResult<Vec<_>>>()?;

        Ok(Self { z, profiles })
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    pub fn profiles(&self) -> &[CoilProfile] {
        &self.profiles
    }

    pub fn profile(&self, coil: ReferenceCoil) -> Option<&CoilProfile> {
        self.profiles.iter().find(|p| p.coil == coil)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> CfResult<()> {
        let mut wtr = csv::Writer::from_writer(File::create(path)?);
        let mut headers = vec!["z".to_string()];
        headers.extend(self.profiles.iter().map(|p| p.coil.to_string()));
        wtr.write_record(&headers)?;

        for (i, z) in self.z.iter().enumerate() {
            let mut row = vec![z.to_string()];
            row.extend(self.profiles.iter().map(|p| p.normalized[i].to_string()));
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Two stacked panels: length-matched references on top, radius-matched
    /// references below.
    pub fn to_svg(&self) -> CfResult<String> {
        let panels = [
            [
                ReferenceCoil::Optimized,
                ReferenceCoil::Solenoid,
                ReferenceCoil::LeeWhitingLength,
                ReferenceCoil::HelmholtzLength,
            ],
            [
                ReferenceCoil::Optimized,
                ReferenceCoil::Solenoid,
                ReferenceCoil::LeeWhitingRadius,
                ReferenceCoil::HelmholtzRadius,
            ],
        ];

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, PROFILE_PLOT_SIZE).into_drawing_area();
            root.fill(&WHITE)?;
            let areas = root.split_evenly((2, 1));
            for (area, coils) in areas.iter().zip(panels.iter()) {
                self.draw_panel(area, coils)?;
            }
            root.present()?;
        }
        Ok(svg)
    }

    fn draw_panel(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
        coils: &[ReferenceCoil],
    ) -> CfResult<()> {
        let shown: Vec<&CoilProfile> = coils.iter().filter_map(|&c| self.profile(c)).collect();
        let (lo, hi) = shown
            .iter()
            .flat_map(|p| p.normalized.iter())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let pad = ((hi - lo) * 0.05).max(1e-9);

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(self.z_range_cm(), (lo - pad)..(hi + pad))?;

        chart
            .configure_mesh()
            .x_desc("z-position (cm)")
            .y_desc("B_z / B_c")
            .y_label_formatter(&|v| format!("{:.4}", v))
            .draw()?;

        for profile in shown {
            let colour = profile.coil.colour();
            let points = self
                .z
                .iter()
                .zip(&profile.normalized)
                .map(|(z, v)| (100.0 * z, *v));
            chart
                .draw_series(LineSeries::new(points, colour.stroke_width(2)))?
                .label(profile.coil.to_string())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerMiddle)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    /// One vertical line per winding of the optimized coil, positions in cm.
    pub fn wire_positions_svg(&self) -> CfResult<String> {
        let positions = self
            .profile(ReferenceCoil::Optimized)
            .map(|p| p.positions.as_slice())
            .unwrap_or(&[]);
        let colour = ReferenceCoil::Optimized.colour();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, WIRE_PLOT_SIZE).into_drawing_area();
            root.fill(&WHITE)?;
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .x_label_area_size(40)
                .build_cartesian_2d(self.z_range_cm(), 0.0..1.0)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .disable_y_axis()
                .x_desc("Wire Positions (cm)")
                .draw()?;

            chart.draw_series(positions.iter().map(|&z| {
                PathElement::new(vec![(100.0 * z, 0.0), (100.0 * z, 1.0)], colour.stroke_width(1))
            }))?;
            root.present()?;
        }
        Ok(svg)
    }

    fn z_range_cm(&self) -> Range<f64> {
        let first = self.z.first().copied().unwrap_or(0.0);
        let last = self.z.last().copied().unwrap_or(0.0);
        (100.0 * first)..(100.0 * last)
    }

    pub fn write<P: AsRef<Path>>(&self, dir: P) -> CfResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let csv_path = dir.join("field_profile.csv");
        let profile_svg = dir.join("field_profile.svg");
        let wires_svg = dir.join("wire_locations.svg");

        self.write_csv(&csv_path)?;
        fs::write(&profile_svg, self.to_svg()?)?;
        fs::write(&wires_svg, self.wire_positions_svg()?)?;
        Ok(vec![csv_path, profile_svg, wires_svg])
    }
}

pub struct FieldPlotter;

impl ResultConsumer for FieldPlotter {
    fn name(&self) -> &str {
        "field plotter"
    }

    fn consume(&self, table: &ResultTable, dir: &Path) -> CfResult<Vec<PathBuf>> {
        let comparison = FieldComparison::from_table(table)?;
        for p in comparison.profiles() {
            info!(
                "📈 {:<5} B(0) {:>10.6} μT/A·turn | R {:>6.3} cm | L {:>6.3} cm",
                p.coil.to_string(),
                p.center_per_amp_turn_ut(),
                p.radius_cm(),
                p.half_length_cm()
            );
        }
        comparison.write(dir)
    }
}
