use crate::reports;
use clap::Args;
use coilforge::error::CfResult;
use coilforge::export::ResultTable;
use coilforge::render::FieldComparison;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    #[arg(short, long)]
    pub table: PathBuf,

    /// Output folder (defaults to the table's folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: PlotArgs) -> CfResult<()> {
    let table = ResultTable::read_csv(&args.table)?;
    let dir = super::output_dir(&args.table, args.output);
    fs::create_dir_all(&dir)?;

    let comparison = FieldComparison::from_table(&table)?;
    reports::print_field_comparison(&comparison);

    for path in comparison.write(&dir)? {
        info!("🖼️  {}", path.display());
    }
    Ok(())
}
