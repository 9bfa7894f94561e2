use crate::reports;
use chrono::Local;
use clap::Args;
use coilforge::config::CoilConfig;
use coilforge::constraints::PackingRules;
use coilforge::error::CfResult;
use coilforge::export::{ResultTable, TABLE_FILE};
use coilforge::optimizer::{
    AcceptedMove, OptimizationOptions, Optimizer, ProgressCallback, SearchState,
};
use coilforge::pipeline::{self, ResultConsumer};
use coilforge::render::{FieldPlotter, GrooveRenderer, GrooveStyle};
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: CoilConfig,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Results folder (defaults to Results-<timestamp>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only write the result table
    #[arg(long, default_value_t = false)]
    pub no_render: bool,

    #[arg(long, default_value_t = GrooveStyle::Normal)]
    pub style: GrooveStyle,
}

/// Logs every `every`-th accepted move.
struct ConsoleProgress {
    every: usize,
    accepted: Cell<usize>,
}

impl ProgressCallback for ConsoleProgress {
    fn on_accept(&self, state: &SearchState, accepted: &AcceptedMove) {
        let count = self.accepted.get() + 1;
        self.accepted.set(count);
        if count % self.every == 0 {
            info!(
                "   it {:>7} | {:>5} accepted | score {:.6e} | step {:.3e}",
                accepted.iteration, count, state.score, state.step
            );
        }
    }
}

pub fn run(args: OptimizeArgs, config: CoilConfig) -> CfResult<()> {
    let options = OptimizationOptions::from(&config);
    let optimizer = Optimizer::new(&config, options, args.seed)?;

    let progress = ConsoleProgress {
        every: 100,
        accepted: Cell::new(0),
    };
    let result = optimizer.run(&progress)?;
    let table = ResultTable::from_result(&result);

    reports::print_run_summary(&result);
    reports::print_winding_table(&table, &PackingRules::from_params(&config.coil));

    let dir = args.output.unwrap_or_else(|| {
        PathBuf::from(format!("Results-{}", Local::now().format("%Y-%m-%d-%H-%M-%S")))
    });

    if args.no_render {
        fs::create_dir_all(&dir)?;
        let path = dir.join(TABLE_FILE);
        table.write_csv(&path)?;
        info!("💾 Saved {} windings to {}", table.windings(), path.display());
        return Ok(());
    }

    let consumers: Vec<Box<dyn ResultConsumer>> = vec![
        Box::new(GrooveRenderer { style: args.style }),
        Box::new(FieldPlotter),
    ];
    let report = pipeline::publish(&table, &dir, &consumers)?;

    for artifact in &report.artifacts {
        info!("🖼️  {}", artifact.display());
    }
    if !report.warnings.is_empty() {
        warn!(
            "{} of {} renderers failed; the table is still at {}",
            report.warnings.len(),
            consumers.len(),
            report.table_path.display()
        );
    }
    Ok(())
}
