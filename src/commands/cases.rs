//! `droidscout cases`: execute stored test cases and save the results.

use crate::commands::dry_run;
use action_locator::ElementResolver;
use agent_core::CaseRunner;
use anyhow::{bail, Result};
use case_store::{load_cases, save_results};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use uia_adapter::{ReconnectingDriver, StubDriver, UiDriver};

#[derive(Debug, Args)]
pub struct CasesArgs {
    /// JSON file holding the test cases to run.
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the run results.
    #[arg(long)]
    pub output: PathBuf,

    /// Use a scripted device built from the cases themselves.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn cmd_cases(args: CasesArgs) -> Result<()> {
    let cases = load_cases(&args.input)?;
    if cases.is_empty() {
        bail!("no test cases in {}", args.input.display());
    }

    let driver: Arc<dyn UiDriver> = if args.dry_run {
        info!("dry run: scripted device derived from the cases");
        Arc::new(dry_run::case_fixture(&cases))
    } else {
        Arc::new(ReconnectingDriver::new(StubDriver))
    };

    let runner = CaseRunner::new(driver.clone(), ElementResolver::new(driver));
    let records = runner.run_cases(&cases).await;
    save_results(&args.output, &records)?;

    let failed = records.iter().filter(|r| !r.status.is_passed()).count();
    println!(
        "{} case{} run, {} failed; results in {}",
        records.len(),
        if records.len() == 1 { "" } else { "s" },
        failed,
        args.output.display()
    );
    if failed > 0 {
        bail!("{failed} of {} cases failed", records.len());
    }
    Ok(())
}
