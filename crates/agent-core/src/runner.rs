//! The bounded goal loop.
//!
//! Each step: settle, snapshot, early-verify, choose, execute the first
//! directive, re-verify. Transient failures mean "no progress this step"
//! and are bounded by the step budget, which is the loop's only stop
//! condition besides success.

use crate::context::RunContext;
use crate::errors::ScenarioFailure;
use crate::selector::DecisionAdapter;
use crate::verifier::{GoalVerifier, VerifyOutcome};
use action_locator::{ElementResolver, Resolution};
use droidscout_core_types::{ActionDirective, ActionType, GoalStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uia_adapter::UiDriver;
use ui_perceiver::extract_actionable;

/// Where a step is in its lifecycle. Logged at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalPhase {
    Pending,
    ActionChosen,
    Executing,
    Verifying,
    Achieved,
    Failed,
}

impl GoalPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::ActionChosen => "ACTION_CHOSEN",
            Self::Executing => "EXECUTING",
            Self::Verifying => "VERIFYING",
            Self::Achieved => "ACHIEVED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for GoalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loop tuning.
#[derive(Debug, Clone, Copy)]
pub struct RunnerConfig {
    /// Steps allowed per goal before the run fails.
    pub max_steps: u32,
    /// Wait before each snapshot so animations settle.
    pub settle_delay_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_steps: 5,
            settle_delay_ms: 2000,
        }
    }
}

impl RunnerConfig {
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_settle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.settle_delay_ms = delay_ms;
        self
    }
}

/// What happened during one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTrace {
    pub step: u32,
    /// Description of the executed directive, if one ran.
    pub action: Option<String>,
    /// Verifier status observed at the end of the step.
    pub status: Option<GoalStatus>,
    pub note: String,
}

impl StepTrace {
    fn new(step: u32, note: impl Into<String>) -> Self {
        Self {
            step,
            action: None,
            status: None,
            note: note.into(),
        }
    }
}

/// Final report for one goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalReport {
    pub goal: String,
    pub achieved: bool,
    pub steps_taken: u32,
    pub reason: String,
    pub steps: Vec<StepTrace>,
}

/// Drives one goal at a time to completion or step-budget exhaustion.
pub struct GoalRunner {
    driver: Arc<dyn UiDriver>,
    resolver: ElementResolver,
    adapter: DecisionAdapter,
    verifier: GoalVerifier,
    config: RunnerConfig,
}

impl GoalRunner {
    pub fn new(
        driver: Arc<dyn UiDriver>,
        resolver: ElementResolver,
        adapter: DecisionAdapter,
        verifier: GoalVerifier,
        config: RunnerConfig,
    ) -> Self {
        Self {
            driver,
            resolver,
            adapter,
            verifier,
            config,
        }
    }

    /// Run a single goal to a verdict. Never errors: device and oracle
    /// trouble inside a step costs that step, and the budget decides.
    pub async fn run_goal(&self, goal: &str, ctx: &mut RunContext) -> GoalReport {
        info!(goal, max_steps = self.config.max_steps, "goal started");
        let mut steps = Vec::new();
        let mut last_reason = String::new();

        for step in 1..=self.config.max_steps {
            info!(goal, step, phase = %GoalPhase::Pending, "step started");
            tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

            let source = match self.driver.page_source().await {
                Ok(source) => source,
                Err(error) => {
                    // A reconnecting driver has already restarted the
                    // session by the time the error surfaces; the step is
                    // discarded either way.
                    warn!(goal, step, %error, "snapshot failed, step discarded");
                    steps.push(StepTrace::new(step, "snapshot failed"));
                    continue;
                }
            };

            let elements = extract_actionable(&source);
            if elements.is_empty() {
                warn!(goal, step, "no actionable elements, retrying poll");
                steps.push(StepTrace::new(step, "no actionable elements"));
                continue;
            }

            // The previous step's action may already have satisfied the
            // goal; check before acting again.
            info!(goal, step, phase = %GoalPhase::Verifying, "early verification");
            let early = self.verifier.verify(goal, &elements, ctx).await;
            last_reason = early.reason.clone();
            if early.achieved {
                let mut trace = StepTrace::new(step, "achieved before acting");
                trace.status = early.status;
                steps.push(trace);
                return self.achieved_report(goal, step, early, steps);
            }

            let directives = self.adapter.choose_actions(goal, &elements, ctx).await;
            let Some(directive) = directives.into_iter().next() else {
                warn!(goal, step, "no directives chosen, no progress this step");
                steps.push(StepTrace::new(step, "no directives chosen"));
                continue;
            };
            info!(
                goal,
                step,
                phase = %GoalPhase::ActionChosen,
                action = %directive.describe(),
                "directive chosen"
            );

            let mut trace = StepTrace::new(step, "executed");
            info!(goal, step, phase = %GoalPhase::Executing, "executing directive");
            if !self.execute(&directive, step, goal).await {
                steps.push(StepTrace::new(step, "directive did not execute"));
                continue;
            }
            trace.action = Some(directive.describe());

            info!(goal, step, phase = %GoalPhase::Verifying, "verifying after action");
            let outcome = self.verifier.verify(goal, &elements, ctx).await;
            last_reason = outcome.reason.clone();
            trace.status = outcome.status;
            steps.push(trace);
            if outcome.achieved {
                return self.achieved_report(goal, step, outcome, steps);
            }
        }

        info!(goal, phase = %GoalPhase::Failed, "step budget exhausted");
        let reason = if last_reason.is_empty() {
            "step budget exhausted".to_string()
        } else {
            last_reason
        };
        GoalReport {
            goal: goal.to_string(),
            achieved: false,
            steps_taken: self.config.max_steps,
            reason,
            steps,
        }
    }

    /// Run goals in order; an unachieved goal aborts the scenario.
    pub async fn run_scenario(
        &self,
        goals: &[String],
        ctx: &mut RunContext,
    ) -> Result<Vec<GoalReport>, ScenarioFailure> {
        let mut reports = Vec::with_capacity(goals.len());
        for goal in goals {
            let report = self.run_goal(goal, ctx).await;
            let achieved = report.achieved;
            reports.push(report);
            if !achieved {
                return Err(ScenarioFailure {
                    goal: goal.clone(),
                    max_steps: self.config.max_steps,
                    reports,
                });
            }
        }
        Ok(reports)
    }

    /// Resolve and perform one directive. `false` means no progress.
    async fn execute(&self, directive: &ActionDirective, step: u32, goal: &str) -> bool {
        let resolution = match self.resolver.resolve(directive.strategy, &directive.value).await {
            Ok(resolution) => resolution,
            Err(error) => {
                warn!(goal, step, %error, "resolution failed");
                return false;
            }
        };
        let Resolution::Found { handle, kind } = resolution else {
            warn!(goal, step, value = %directive.value, "element not found");
            return false;
        };
        info!(goal, step, value = %directive.value, kind = ?kind, "element resolved");

        let result = match directive.action {
            ActionType::Click => self.driver.click(&handle).await,
            ActionType::Type => {
                let text = directive.input.as_deref().unwrap_or_default();
                self.driver.set_text(&handle, text).await
            }
        };
        match result {
            Ok(()) => true,
            Err(error) => {
                warn!(goal, step, %error, "action failed on device");
                false
            }
        }
    }

    /// Success report; the exhaustion path builds its FAILED report inline.
    fn achieved_report(
        &self,
        goal: &str,
        steps_taken: u32,
        outcome: VerifyOutcome,
        steps: Vec<StepTrace>,
    ) -> GoalReport {
        info!(goal, steps_taken, phase = %GoalPhase::Achieved, reason = %outcome.reason, "goal achieved");
        GoalReport {
            goal: goal.to_string(),
            achieved: true,
            steps_taken,
            reason: outcome.reason,
            steps,
        }
    }
}
