//! Oracle-backed goal verification.

use crate::context::RunContext;
use crate::prompt::verification_prompt;
use crate::rate_limit::Keepalive;
use crate::schema::parse_verification_response;
use crate::selector::oracle_call;
use crate::transport::OracleTransport;
use droidscout_core_types::{GoalStatus, UiElement};
use std::sync::Arc;
use tracing::info;

pub const VERIFICATION_UNAVAILABLE: &str = "verification unavailable";

/// Outcome of one verification pass.
///
/// `achieved` is the only bit the loop branches on; the full status and
/// confidence are carried for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOutcome {
    pub achieved: bool,
    pub reason: String,
    pub status: Option<GoalStatus>,
    pub confidence: Option<f64>,
}

impl VerifyOutcome {
    fn unavailable() -> Self {
        Self {
            achieved: false,
            reason: VERIFICATION_UNAVAILABLE.to_string(),
            status: None,
            confidence: None,
        }
    }
}

/// Asks the oracle whether the goal is met on the current screen.
pub struct GoalVerifier {
    transport: Arc<dyn OracleTransport>,
    keepalive: Arc<dyn Keepalive>,
}

impl GoalVerifier {
    pub fn new(transport: Arc<dyn OracleTransport>, keepalive: Arc<dyn Keepalive>) -> Self {
        Self {
            transport,
            keepalive,
        }
    }

    /// Judge the goal. Both FAILED and NOT_YET_MET come back as
    /// `achieved == false`; the step budget decides when to stop retrying.
    /// Retry exhaustion degrades to not-achieved with a fixed reason.
    pub async fn verify(
        &self,
        goal: &str,
        elements: &[UiElement],
        ctx: &RunContext,
    ) -> VerifyOutcome {
        let prompt = verification_prompt(goal, elements, ctx);
        let Some(verdict) = oracle_call(
            self.transport.as_ref(),
            self.keepalive.as_ref(),
            ctx,
            &prompt,
            parse_verification_response,
        )
        .await
        else {
            return VerifyOutcome::unavailable();
        };

        info!(
            goal,
            status = %verdict.status,
            reason = %verdict.reason,
            confidence = ?verdict.confidence,
            "goal verified"
        );

        VerifyOutcome {
            achieved: verdict.status.is_achieved(),
            reason: verdict.reason,
            status: Some(verdict.status),
            confidence: verdict.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::NoopKeepalive;
    use crate::transport::MockOracle;

    fn verifier(oracle: MockOracle) -> GoalVerifier {
        GoalVerifier::new(Arc::new(oracle), Arc::new(NoopKeepalive))
    }

    #[tokio::test(start_paused = true)]
    async fn test_achieved_status_maps_to_true() {
        let verifier = verifier(MockOracle::new().with_ok(
            r#"{"status": "ACHIEVED", "reason": "alarm screen shown", "confidence": 0.95,
                "next_action_needed": false, "details": "tab is selected"}"#,
        ));
        let ctx = RunContext::new(10);

        let outcome = verifier.verify("Go to Alarm", &[], &ctx).await;
        assert!(outcome.achieved);
        assert_eq!(outcome.reason, "alarm screen shown");
        assert_eq!(outcome.status, Some(GoalStatus::Achieved));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_and_not_yet_met_map_to_false() {
        let ctx = RunContext::new(10);

        let verifier_failed = verifier(
            MockOracle::new()
                .with_ok(r#"{"status": "FAILED", "reason": "wrong screen"}"#),
        );
        let outcome = verifier_failed.verify("Go to Alarm", &[], &ctx).await;
        assert!(!outcome.achieved);
        assert_eq!(outcome.status, Some(GoalStatus::Failed));

        let verifier_pending = verifier(
            MockOracle::new()
                .with_ok(r#"{"status": "NOT_YET_MET", "reason": "still on clock"}"#),
        );
        let outcome = verifier_pending.verify("Go to Alarm", &[], &ctx).await;
        assert!(!outcome.achieved);
        assert_eq!(outcome.status, Some(GoalStatus::NotYetMet));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_degrades_to_unavailable() {
        // Empty script: three transport errors.
        let oracle = Arc::new(MockOracle::new());
        let verifier = GoalVerifier::new(oracle.clone(), Arc::new(NoopKeepalive));
        let ctx = RunContext::new(10);

        let outcome = verifier.verify("Go to Alarm", &[], &ctx).await;
        assert!(!outcome.achieved);
        assert_eq!(outcome.reason, VERIFICATION_UNAVAILABLE);
        assert_eq!(outcome.status, None);
        assert_eq!(oracle.calls(), 3);
    }
}
