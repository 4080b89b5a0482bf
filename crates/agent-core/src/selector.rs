//! Action selection: the oracle-backed selector, the deterministic
//! heuristic fallback, and the adapter that switches between them.

use crate::context::RunContext;
use crate::errors::{OracleError, ParseErrorKind};
use crate::prompt::action_prompt;
use crate::rate_limit::{sleep_with_keepalive, Keepalive};
use crate::schema::parse_action_response;
use crate::transport::OracleTransport;
use async_trait::async_trait;
use droidscout_core_types::{ActionDirective, LocatorStrategy, UiElement};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const MAX_ATTEMPTS: u32 = 3;

/// Something that can propose the next actions toward a goal.
///
/// `None` means the selector is currently unavailable (e.g. the oracle
/// exhausted its retries); an empty vec means it ran but found nothing
/// worth doing.
#[async_trait]
pub trait ActionSelector: Send + Sync {
    async fn choose_actions(
        &self,
        goal: &str,
        elements: &[UiElement],
        ctx: &mut RunContext,
    ) -> Option<Vec<ActionDirective>>;
}

/// One oracle round trip with the shared retry discipline: up to three
/// attempts, quota signals deferred to the rate limiter without consuming
/// an attempt, other failures backed off locally at `2^attempt` seconds.
pub(crate) async fn oracle_call<T, F>(
    transport: &dyn OracleTransport,
    keepalive: &dyn Keepalive,
    ctx: &RunContext,
    prompt: &str,
    parse: F,
) -> Option<T>
where
    F: Fn(&str) -> Result<T, ParseErrorKind>,
{
    ctx.limiter.reset_retries().await;

    let mut attempt = 0;
    while attempt < MAX_ATTEMPTS {
        ctx.limiter.wait_if_needed(keepalive).await;

        let error = match transport.generate(prompt).await {
            Ok(text) => match parse(&text) {
                Ok(value) => return Some(value),
                Err(parse_error) => OracleError::Parse(parse_error),
            },
            Err(error) => error,
        };

        if error.is_quota() {
            if ctx
                .limiter
                .handle_rate_limit_error(&error.to_string(), keepalive)
                .await
            {
                continue;
            }
        }

        attempt += 1;
        warn!(attempt, max = MAX_ATTEMPTS, %error, "oracle attempt failed");
        if attempt < MAX_ATTEMPTS {
            sleep_with_keepalive(Duration::from_secs(1u64 << (attempt - 1)), keepalive).await;
        }
    }
    None
}

/// Selector that asks the decision oracle for the next action batch.
pub struct OracleSelector {
    transport: Arc<dyn OracleTransport>,
    keepalive: Arc<dyn Keepalive>,
}

impl OracleSelector {
    pub fn new(transport: Arc<dyn OracleTransport>, keepalive: Arc<dyn Keepalive>) -> Self {
        Self {
            transport,
            keepalive,
        }
    }
}

#[async_trait]
impl ActionSelector for OracleSelector {
    async fn choose_actions(
        &self,
        goal: &str,
        elements: &[UiElement],
        ctx: &mut RunContext,
    ) -> Option<Vec<ActionDirective>> {
        let prompt = action_prompt(goal, elements, ctx);
        let batch = oracle_call(
            self.transport.as_ref(),
            self.keepalive.as_ref(),
            ctx,
            &prompt,
            parse_action_response,
        )
        .await?;

        info!(
            goal,
            reasoning = %batch.reasoning,
            confidence = ?batch.confidence,
            directives = batch.directives.len(),
            "oracle chose actions"
        );

        if let Some(state) = batch.state_update {
            ctx.current_state = state;
        }
        for directive in &batch.directives {
            ctx.memory.record(directive.describe());
        }

        Some(batch.directives)
    }
}

/// Stopwords stripped from goal text before keyword matching.
const STOPWORDS: &[&str] = &[
    "go", "to", "the", "a", "an", "on", "in", "into", "open", "tap", "click", "enter", "back",
    "navigate", "screen", "tab", "and", "of",
];

/// Meaningful lowercase keywords from a goal sentence.
pub fn goal_keywords(goal: &str) -> Vec<String> {
    goal.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty() && !STOPWORDS.contains(&word.as_str()))
        .collect()
}

/// Deterministic fallback: click the first element whose text or content
/// description mentions a goal keyword.
#[derive(Debug, Default)]
pub struct HeuristicSelector;

#[async_trait]
impl ActionSelector for HeuristicSelector {
    async fn choose_actions(
        &self,
        goal: &str,
        elements: &[UiElement],
        ctx: &mut RunContext,
    ) -> Option<Vec<ActionDirective>> {
        let keywords = goal_keywords(goal);
        for element in elements {
            let Some(identifier) = element.identifier() else {
                continue;
            };
            if keywords.iter().any(|keyword| element.mentions(keyword)) {
                let directive =
                    ActionDirective::click(LocatorStrategy::AccessibilityId, identifier);
                info!(goal, target = %directive.value, "heuristic chose a click");
                ctx.memory.record(directive.describe());
                return Some(vec![directive]);
            }
        }
        info!(goal, "heuristic found no matching element");
        Some(Vec::new())
    }
}

/// Availability switch: prefer the oracle, fall back to the heuristic when
/// the oracle is absent or exhausted its retries.
pub struct DecisionAdapter {
    oracle: Option<OracleSelector>,
    heuristic: HeuristicSelector,
}

impl DecisionAdapter {
    pub fn new(oracle: OracleSelector) -> Self {
        Self {
            oracle: Some(oracle),
            heuristic: HeuristicSelector,
        }
    }

    /// Adapter that never consults an oracle.
    pub fn heuristic_only() -> Self {
        Self {
            oracle: None,
            heuristic: HeuristicSelector,
        }
    }

    pub async fn choose_actions(
        &self,
        goal: &str,
        elements: &[UiElement],
        ctx: &mut RunContext,
    ) -> Vec<ActionDirective> {
        if let Some(oracle) = &self.oracle {
            if let Some(directives) = oracle.choose_actions(goal, elements, ctx).await {
                return directives;
            }
            warn!(goal, "oracle unavailable, falling back to heuristic selection");
        }
        self.heuristic
            .choose_actions(goal, elements, ctx)
            .await
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockOracle;
    use droidscout_core_types::ActionType;

    fn element(text: &str, content_desc: &str) -> UiElement {
        UiElement {
            text: text.to_string(),
            content_desc: content_desc.to_string(),
            class: "android.widget.FrameLayout".to_string(),
            clickable: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_goal_keywords_filter_stopwords() {
        assert_eq!(goal_keywords("Go to the Alarm tab"), vec!["alarm"]);
        assert_eq!(
            goal_keywords("Enter username standard_user"),
            vec!["username", "standard_user"]
        );
        assert!(goal_keywords("Go to the").is_empty());
    }

    #[tokio::test]
    async fn test_heuristic_clicks_first_matching_element() {
        let mut ctx = RunContext::new(10);
        let elements = vec![element("7:30 AM", ""), element("", "Alarm"), element("", "Timer")];

        let directives = HeuristicSelector
            .choose_actions("Go to the Alarm tab", &elements, &mut ctx)
            .await
            .unwrap();

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].action, ActionType::Click);
        assert_eq!(directives[0].strategy, LocatorStrategy::AccessibilityId);
        assert_eq!(directives[0].value, "Alarm");
        assert_eq!(ctx.memory.entries(), ["Action: click on Alarm"]);
    }

    #[tokio::test]
    async fn test_heuristic_without_match_returns_empty() {
        let mut ctx = RunContext::new(10);
        let directives = HeuristicSelector
            .choose_actions("Go to Bedtime", &[element("", "Alarm")], &mut ctx)
            .await
            .unwrap();
        assert!(directives.is_empty());
        assert!(ctx.memory.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_oracle_success_updates_state_and_memory() {
        let oracle = MockOracle::new().with_ok(
            r#"{
                "actions": [{"action_type": "click", "by": "accessibility_id", "value": "Alarm"}],
                "reasoning": "tab navigation",
                "confidence": 0.9,
                "state_update": "Alarm screen is shown"
            }"#,
        );
        let adapter = DecisionAdapter::new(OracleSelector::new(
            Arc::new(oracle),
            Arc::new(crate::rate_limit::NoopKeepalive),
        ));
        let mut ctx = RunContext::new(10);

        let directives = adapter
            .choose_actions("Go to Alarm", &[element("", "Alarm")], &mut ctx)
            .await;

        assert_eq!(directives.len(), 1);
        assert_eq!(ctx.current_state, "Alarm screen is shown");
        assert_eq!(ctx.memory.entries(), ["Action: click on Alarm"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failures_fall_back_to_heuristic() {
        // The mock script is empty, so every call is a transport error.
        let oracle = Arc::new(MockOracle::new());
        let adapter = DecisionAdapter::new(OracleSelector::new(
            oracle.clone(),
            Arc::new(crate::rate_limit::NoopKeepalive),
        ));
        let mut ctx = RunContext::new(10);

        let directives = adapter
            .choose_actions("Go to Alarm", &[element("", "Alarm")], &mut ctx)
            .await;

        assert_eq!(oracle.calls(), 3);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].value, "Alarm");
    }

    #[tokio::test(start_paused = true)]
    async fn test_parse_failures_consume_attempts() {
        let oracle = Arc::new(
            MockOracle::new()
                .with_ok("not json")
                .with_ok("still not json")
                .with_ok("nope"),
        );
        let selector = OracleSelector::new(oracle.clone(), Arc::new(crate::rate_limit::NoopKeepalive));
        let mut ctx = RunContext::new(10);

        let result = selector
            .choose_actions("Go to Alarm", &[element("", "Alarm")], &mut ctx)
            .await;

        assert!(result.is_none());
        assert_eq!(oracle.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_signal_does_not_consume_attempt() {
        let oracle = Arc::new(
            MockOracle::new()
                .with_err(OracleError::Quota("429 quota".to_string()))
                .with_err(OracleError::Quota("429 quota".to_string()))
                .with_ok(
                    r#"{"actions": [], "reasoning": "nothing to do", "state_update": "unchanged"}"#,
                ),
        );
        let selector = OracleSelector::new(oracle.clone(), Arc::new(crate::rate_limit::NoopKeepalive));
        let mut ctx = RunContext::new(10);

        let result = selector
            .choose_actions("Go to Alarm", &[], &mut ctx)
            .await;

        // Two quota deferrals plus the success; no local attempts consumed.
        assert!(result.is_some());
        assert_eq!(oracle.calls(), 3);
    }
}
