use crate::error::CfResult;
use crate::export::ResultTable;
use crate::pipeline::ResultConsumer;
use crate::render::{num, PathBuilder, SvgCanvas};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::info;

/// Extra clearance cut around every wire (mm).
pub const GROOVE_CLEARANCE_MM: f64 = 0.05;
/// Neighbours closer than this many wire radii share one groove.
pub const BUNDLE_SPLIT_FACTOR: f64 = 2.5;
/// Chamfer angle on the upper groove edge, measured from the radial direction.
pub const CHAMFER_DEG: f64 = 30.0;

const STROKE_MM: f64 = 0.01;
const RENDER_WIDTH_PX: f64 = 5000.0;
const DRAWING_MARGIN: f64 = 2.1;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum GrooveStyle {
    /// Square groove, rounded where the wires meet the former.
    #[default]
    Normal,
    /// Same groove with a 60 degree chamfer on the upper edge, easier to model.
    Chamfer,
}

/// Cross-section of the former (radial axis horizontal, coil axis vertical)
/// with one groove per bundle. Everything is in millimetres.
#[derive(Debug, Clone)]
pub struct GrooveDrawing {
    positions: Vec<f64>,
    turn_radii: Vec<f64>,
    wire_radius: f64,
    former_radius: f64,
    inner_radius: f64,
    style: GrooveStyle,
}

impl GrooveDrawing {
    pub fn from_table(table: &ResultTable, style: GrooveStyle) -> Self {
        let to_mm = |v: f64| v * 1000.0;
        let turn_radii: Vec<f64> = table.radii().as_slice().iter().map(|&r| to_mm(r)).collect();
        let wire_radius = to_mm(table.wire_radius());

        Self {
            positions: table.layout().positions().iter().map(|&z| to_mm(z)).collect(),
            former_radius: turn_radii[0] + wire_radius,
            inner_radius: turn_radii[turn_radii.len() - 1],
            turn_radii,
            wire_radius,
            style,
        }
    }

    pub fn former_radius(&self) -> f64 {
        self.former_radius
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn bundles(&self) -> Vec<&[f64]> {
        split_bundles(&self.positions, BUNDLE_SPLIT_FACTOR * self.wire_radius)
    }

    /// Closed outline of the groove holding `group`, starting at the outer
    /// surface below the first wire and returning there.
    pub fn groove_path(&self, group: &[f64]) -> PathBuilder {
        let first = group[0];
        let last = group[group.len() - 1];
        let reach = self.wire_radius + GROOVE_CLEARANCE_MM;
        let outer = self.former_radius + GROOVE_CLEARANCE_MM;
        let inner = self.inner_radius;

        let mut p = PathBuilder::move_to(outer, first - reach);
        p.horizontal(inner - outer);

        let top_angle = match self.style {
            GrooveStyle::Normal => 90.0,
            GrooveStyle::Chamfer => 90.0 + CHAMFER_DEG,
        };

        if group.len() == 1 {
            p.arc(inner, first, reach, 270.0, top_angle, true);
        } else {
            p.arc(inner, first, reach, 270.0, 180.0, true);
            p.vertical(last - first);
            p.arc(inner, last, reach, 180.0, top_angle, true);
        }

        match self.style {
            GrooveStyle::Normal => {
                p.horizontal(outer - inner);
            }
            GrooveStyle::Chamfer => {
                let dx = outer - p.cursor().0;
                p.line_by(dx, dx * CHAMFER_DEG.to_radians().tan());
            }
        }
        p.close();
        p
    }

    pub fn to_svg(&self, with_wires: bool) -> String {
        let end = self.positions.last().copied().unwrap_or(0.0).abs();
        let width = DRAWING_MARGIN * self.former_radius;
        let height = (DRAWING_MARGIN * end).max(DRAWING_MARGIN * 2.0 * self.wire_radius);
        let mut canvas = SvgCanvas::centered(width, height, RENDER_WIDTH_PX);

        for group in self.bundles() {
            canvas.push(self.groove_path(group).to_element(STROKE_MM));
        }

        if with_wires {
            for &z in &self.positions {
                for &r in &self.turn_radii {
                    canvas.push(format!(
                        r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="black" stroke-width="{}"/>"#,
                        num(r),
                        num(z),
                        num(self.wire_radius),
                        num(STROKE_MM)
                    ));
                }
            }
        }
        canvas.finish()
    }

    pub fn write<P: AsRef<Path>>(&self, dir: P) -> CfResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let grooves = dir.join("grooves.svg");
        let with_wires = dir.join("grooves_and_wires.svg");
        fs::write(&grooves, self.to_svg(false))?;
        fs::write(&with_wires, self.to_svg(true))?;
        Ok(vec![grooves, with_wires])
    }
}

/// Splits sorted positions wherever the gap exceeds `max_gap`.
pub fn split_bundles(positions: &[f64], max_gap: f64) -> Vec<&[f64]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..positions.len() {
        if positions[i] - positions[i - 1] > max_gap {
            groups.push(&positions[start..i]);
            start = i;
        }
    }
    if start < positions.len() {
        groups.push(&positions[start..]);
    }
    groups
}

pub struct GrooveRenderer {
    pub style: GrooveStyle,
}

impl ResultConsumer for GrooveRenderer {
    fn name(&self) -> &str {
        "groove renderer"
    }

    fn consume(&self, table: &ResultTable, dir: &Path) -> CfResult<Vec<PathBuf>> {
        let drawing = GrooveDrawing::from_table(table, self.style);
        info!(
            "✏️  Drawing {} grooves ({} style)",
            drawing.bundles().len(),
            self.style
        );
        drawing.write(dir)
    }
}
