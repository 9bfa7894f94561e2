use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use coilforge::config::CoilConfig;
use coilforge::error::CfResult;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; explicit flags still win over it
    #[arg(global = true, short, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Optimize(cmd::optimize::OptimizeArgs),
    Validate(cmd::validate::ValidateArgs),
    Grooves(cmd::grooves::GroovesArgs),
    Plot(cmd::plot::PlotArgs),
}

/// Base config from `--config` (or the flag defaults), with explicitly typed
/// flags merged on top.
fn resolve_config(
    path: Option<&str>,
    cli_config: &CoilConfig,
    sub_matches: Option<&ArgMatches>,
) -> CfResult<CoilConfig> {
    let Some(path) = path else {
        return Ok(cli_config.clone());
    };

    info!("📂 Loading config from: {}", path);
    let mut config = CoilConfig::load_from_file(path)?;
    if let Some(sub) = sub_matches {
        config.merge_from_cli(cli_config, sub);
    }
    Ok(config)
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚀 CoilForge {}", env!("CARGO_PKG_VERSION"));

    let sub_matches = matches.subcommand().map(|(_, m)| m);
    let config_path = cli.config.as_deref();

    let outcome = match cli.command {
        Commands::Optimize(args) => resolve_config(config_path, &args.config, sub_matches)
            .and_then(|config| cmd::optimize::run(args, config)),
        Commands::Validate(args) => resolve_config(config_path, &args.config, sub_matches)
            .and_then(|config| cmd::validate::run(args, config)),
        Commands::Grooves(args) => cmd::grooves::run(args),
        Commands::Plot(args) => cmd::plot::run(args),
    };

    if let Err(e) = outcome {
        error!("❌ {}", e);
        process::exit(1);
    }
}
