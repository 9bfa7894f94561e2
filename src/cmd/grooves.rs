use clap::Args;
use coilforge::error::CfResult;
use coilforge::export::ResultTable;
use coilforge::pipeline::ResultConsumer;
use coilforge::render::{GrooveRenderer, GrooveStyle};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct GroovesArgs {
    #[arg(short, long)]
    pub table: PathBuf,

    #[arg(long, default_value_t = GrooveStyle::Normal)]
    pub style: GrooveStyle,

    /// Output folder (defaults to the table's folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: GroovesArgs) -> CfResult<()> {
    let table = ResultTable::read_csv(&args.table)?;
    let dir = super::output_dir(&args.table, args.output);
    fs::create_dir_all(&dir)?;

    let renderer = GrooveRenderer { style: args.style };
    for path in renderer.consume(&table, &dir)? {
        info!("🖼️  {}", path.display());
    }
    Ok(())
}
