//! `droidscout generate`: crawl the app and author test cases.

use crate::commands::dry_run;
use crate::env::{OracleEnv, API_KEY_VAR};
use agent_core::{
    CaseGenerator, DriverKeepalive, GeminiTransport, GeneratorConfig, OracleTransport, RateLimiter,
    RunContext,
};
use anyhow::{bail, Result};
use case_store::save_cases;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uia_adapter::{ReconnectingDriver, StubDriver, UiDriver};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Where to write the generated test cases.
    #[arg(long)]
    pub output: PathBuf,

    /// Maximum number of screens to crawl.
    #[arg(long, default_value_t = 10)]
    pub max_screens: usize,

    /// Use scripted device and oracle fixtures instead of live services.
    #[arg(long)]
    pub dry_run: bool,

    /// Oracle calls allowed per rolling minute. Overrides the environment.
    #[arg(long)]
    pub rate_limit: Option<usize>,
}

pub async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let env = OracleEnv::load();
    let rate_limit = args.rate_limit.unwrap_or(env.rate_limit);

    let (driver, transport, settle_delay): (Arc<dyn UiDriver>, Arc<dyn OracleTransport>, Duration) =
        if args.dry_run {
            info!("dry run: scripted device and oracle");
            let (driver, oracle) = dry_run::generate_fixture();
            (Arc::new(driver), Arc::new(oracle), Duration::ZERO)
        } else {
            let Some(api_key) = env.api_key else {
                bail!("{API_KEY_VAR} is not set; required unless --dry-run is given");
            };
            let mut transport = GeminiTransport::new(api_key);
            if let Some(model) = env.model {
                transport = transport.with_model(model);
            }
            (
                Arc::new(ReconnectingDriver::new(StubDriver)),
                Arc::new(transport),
                GeneratorConfig::default().settle_delay,
            )
        };

    let keepalive = Arc::new(DriverKeepalive::new(driver.clone()));
    let generator = CaseGenerator::with_config(
        driver,
        transport,
        keepalive,
        GeneratorConfig::default()
            .with_max_screens(args.max_screens)
            .with_settle_delay(settle_delay),
    );

    let ctx = RunContext::with_limiter(Arc::new(RateLimiter::new(rate_limit)));
    let cases = generator.crawl(&ctx).await;
    if cases.is_empty() {
        bail!("the oracle produced no test cases");
    }

    save_cases(&args.output, &cases)?;
    println!(
        "{} case{} generated; written to {}",
        cases.len(),
        if cases.len() == 1 { "" } else { "s" },
        args.output.display()
    );
    Ok(())
}
