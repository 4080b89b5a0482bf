//! Command-line entry point for the exploration agent.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

mod commands;
mod env;
mod telemetry;

use commands::{cmd_cases, cmd_generate, cmd_run, CasesArgs, GenerateArgs, RunArgs};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pursue one or more goals on the device
    Run(RunArgs),
    /// Execute stored test cases and record the results
    Cases(CasesArgs),
    /// Crawl the app and author test cases with the oracle
    Generate(GenerateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(&cli.log_level, cli.debug)?;

    info!("droidscout v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args).await,
        Commands::Cases(args) => cmd_cases(args).await,
        Commands::Generate(args) => cmd_generate(args).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("command failed: {e}");
            std::process::exit(1);
        }
    }
}
