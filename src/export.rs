use crate::error::{CfResult, CoilForgeError};
use crate::geometry::{TurnRadii, WindingLayout};
use crate::optimizer::OptimizationResult;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// File name the collaborators look for inside a results folder.
pub const TABLE_FILE: &str = "wire_locations.csv";

/// Relative tolerance for values that must repeat on every row.
const CONSTANT_COLUMN_TOLERANCE: f64 = 1e-12;

/// One row per winding: `r1..rT`, `z`, `wire_radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    radii: TurnRadii,
    layout: WindingLayout,
    wire_radius: f64,
}

impl ResultTable {
    pub fn new(radii: TurnRadii, layout: WindingLayout, wire_radius: f64) -> Self {
        Self {
            radii,
            layout,
            wire_radius,
        }
    }

    pub fn from_result(result: &OptimizationResult) -> Self {
        Self::new(
            result.radii.clone(),
            result.layout.clone(),
            result.wire_radius,
        )
    }

    pub fn radii(&self) -> &TurnRadii {
        &self.radii
    }

    pub fn layout(&self) -> &WindingLayout {
        &self.layout
    }

    pub fn wire_radius(&self) -> f64 {
        self.wire_radius
    }

    pub fn windings(&self) -> usize {
        self.layout.len()
    }

    pub fn turns(&self) -> usize {
        self.radii.len()
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = (1..=self.turns()).map(|i| format!("r{}", i)).collect();
        headers.push("z".to_string());
        headers.push("wire_radius".to_string());
        headers
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> CfResult<()> {
        let file = File::create(path.as_ref())?;
        self.to_writer(file)?;
        debug!("Wrote {} rows to {}", self.windings(), path.as_ref().display());
        Ok(())
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> CfResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.headers())?;

        let radii: Vec<String> = self.radii.as_slice().iter().map(|r| r.to_string()).collect();
        for &z in self.layout.positions() {
            let mut row = radii.clone();
            row.push(z.to_string());
            row.push(self.wire_radius.to_string());
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CoilForgeError::Io(std::io::Error::new(
                e.kind(),
                format!("Could not open result table at '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> CfResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let turns = check_schema(&headers)?;

        let mut radii: Option<Vec<f64>> = None;
        let mut wire_radius: Option<f64> = None;
        let mut positions = Vec::new();

        for (row_idx, result) in rdr.records().enumerate() {
            let rec = result?;
            let values = rec
                .iter()
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        CoilForgeError::Validation(format!(
                            "Row {}: '{}' is not a number",
                            row_idx + 1,
                            field
                        ))
                    })
                })
                .collect::<CfResult<Vec<f64>>>()?;

            let row_radii = &values[..turns];
            let z = values[turns];
            let row_wire = values[turns + 1];

            match &radii {
                None => radii = Some(row_radii.to_vec()),
                Some(first) => {
                    if first.iter().zip(row_radii).any(|(a, b)| !same_value(*a, *b)) {
                        return Err(CoilForgeError::Validation(format!(
                            "Row {}: turn radii differ from the first row",
                            row_idx + 1
                        )));
                    }
                }
            }
            match wire_radius {
                None => wire_radius = Some(row_wire),
                Some(first) if !same_value(first, row_wire) => {
                    return Err(CoilForgeError::Validation(format!(
                        "Row {}: wire_radius {} differs from the first row ({})",
                        row_idx + 1,
                        row_wire,
                        first
                    )));
                }
                Some(_) => {}
            }
            positions.push(z);
        }

        let (Some(radii), Some(wire_radius)) = (radii, wire_radius) else {
            return Err(CoilForgeError::Validation(
                "Result table has no rows".to_string(),
            ));
        };
        if !(wire_radius.is_finite() && wire_radius > 0.0) {
            return Err(CoilForgeError::Validation(format!(
                "wire_radius must be positive (got {})",
                wire_radius
            )));
        }

        Ok(Self {
            radii: TurnRadii::new(radii)?,
            layout: WindingLayout::from_positions(positions)?,
            wire_radius,
        })
    }
}

/// Returns the number of turn columns when the header row is exactly
/// `r1..rT, z, wire_radius`.
fn check_schema(headers: &csv::StringRecord) -> CfResult<usize> {
    let cols: Vec<&str> = headers.iter().collect();
    if cols.len() < 3 {
        return Err(CoilForgeError::Validation(format!(
            "Expected columns r1..rT, z, wire_radius but found {:?}",
            cols
        )));
    }
    let turns = cols.len() - 2;
    let radius_cols_ok = cols[..turns]
        .iter()
        .enumerate()
        .all(|(i, name)| *name == format!("r{}", i + 1));
    if !radius_cols_ok || cols[turns] != "z" || cols[turns + 1] != "wire_radius" {
        return Err(CoilForgeError::Validation(format!(
            "Expected columns r1..r{}, z, wire_radius but found {:?}",
            turns, cols
        )));
    }
    Ok(turns)
}

fn same_value(a: f64, b: f64) -> bool {
    (a - b).abs() <= CONSTANT_COLUMN_TOLERANCE * a.abs().max(b.abs())
}
