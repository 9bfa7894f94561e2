use crate::reports;
use clap::Args;
use coilforge::config::CoilConfig;
use coilforge::constraints::PackingRules;
use coilforge::error::{CfResult, CoilForgeError};
use coilforge::export::ResultTable;
use coilforge::field::score;
use coilforge::geometry::EvaluationGrid;
use coilforge::optimizer::SYMMETRY_TOLERANCE;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: CoilConfig,

    /// Stored wire_locations.csv to check
    #[arg(short, long)]
    pub table: PathBuf,
}

pub fn run(args: ValidateArgs, config: CoilConfig) -> CfResult<()> {
    info!("🔎 Auditing {}", args.table.display());
    let table = ResultTable::read_csv(&args.table)?;
    let rules = PackingRules::new(table.wire_radius(), config.coil.groove_width);

    reports::print_winding_table(&table, &rules);

    if !table.layout().is_antisymmetric(SYMMETRY_TOLERANCE) {
        return Err(CoilForgeError::Validation(
            "layout is not symmetric about the midplane".to_string(),
        ));
    }
    rules
        .check(table.layout())
        .map_err(|v| CoilForgeError::Validation(v.to_string()))?;

    let grid = EvaluationGrid::span(
        config.search.optimization_length,
        config.search.calculation_number,
    )?;
    let homogeneity = score(&grid, table.layout(), table.radii())?;
    info!(
        "✅ {} windings satisfy the packing rules | score {:.6e} over {} points",
        table.windings(),
        homogeneity,
        grid.len()
    );
    Ok(())
}
