//! `droidscout run`: drive one or more goals through the exploration loop.

use crate::commands::dry_run;
use crate::env::{OracleEnv, API_KEY_VAR};
use action_locator::ElementResolver;
use agent_core::{
    DecisionAdapter, DriverKeepalive, GeminiTransport, GoalRunner, GoalVerifier, OracleSelector,
    OracleTransport, RateLimiter, RunContext, RunnerConfig,
};
use anyhow::{bail, Result};
use clap::Args;
use std::sync::Arc;
use tracing::info;
use uia_adapter::{ReconnectingDriver, StubDriver, UiDriver};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Goal to pursue, in order. Repeatable.
    #[arg(long = "goal", required = true)]
    pub goals: Vec<String>,

    /// Use scripted device and oracle fixtures instead of live services.
    #[arg(long)]
    pub dry_run: bool,

    /// Step budget per goal.
    #[arg(long, default_value_t = 5)]
    pub max_steps: u32,

    /// Oracle calls allowed per rolling minute. Overrides the environment.
    #[arg(long)]
    pub rate_limit: Option<usize>,
}

pub async fn cmd_run(args: RunArgs) -> Result<()> {
    let env = OracleEnv::load();
    let rate_limit = args.rate_limit.unwrap_or(env.rate_limit);

    let (driver, transport, settle_delay_ms): (Arc<dyn UiDriver>, Arc<dyn OracleTransport>, u64) =
        if args.dry_run {
            info!("dry run: scripted device and oracle");
            let (driver, oracle) = dry_run::goal_fixture(&args.goals);
            (Arc::new(driver), Arc::new(oracle), 0)
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
                RunnerConfig::default().settle_delay_ms,
            )
        };

    let keepalive = Arc::new(DriverKeepalive::new(driver.clone()));
    let runner = GoalRunner::new(
        driver.clone(),
        ElementResolver::new(driver),
        DecisionAdapter::new(OracleSelector::new(transport.clone(), keepalive.clone())),
        GoalVerifier::new(transport, keepalive),
        RunnerConfig::default()
            .with_max_steps(args.max_steps)
            .with_settle_delay_ms(settle_delay_ms),
    );

    let mut ctx = RunContext::with_limiter(Arc::new(RateLimiter::new(rate_limit)));
    match runner.run_scenario(&args.goals, &mut ctx).await {
        Ok(reports) => {
            for report in &reports {
                println!(
                    "ACHIEVED  {} ({} step{}): {}",
                    report.goal,
                    report.steps_taken,
                    if report.steps_taken == 1 { "" } else { "s" },
                    report.reason
                );
            }
            Ok(())
        }
        Err(failure) => {
            for report in &failure.reports {
                let verdict = if report.achieved { "ACHIEVED" } else { "FAILED  " };
                println!(
                    "{verdict}  {} ({} step{}): {}",
                    report.goal,
                    report.steps_taken,
                    if report.steps_taken == 1 { "" } else { "s" },
                    report.reason
                );
            }
            bail!(failure);
        }
    }
}
