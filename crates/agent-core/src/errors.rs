//! Oracle and run error types.

use thiserror::Error;

/// Failure modes of a decision-oracle call.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Quota or rate-limit signal from the provider. Routed to the rate
    /// limiter's backoff instead of the local retry counter.
    #[error("oracle quota exceeded: {0}")]
    Quota(String),
    /// Network or provider-side failure.
    #[error("oracle transport error: {0}")]
    Transport(String),
    /// Response arrived but did not match the expected schema.
    #[error("oracle response parse error: {0}")]
    Parse(#[from] ParseErrorKind),
}

impl OracleError {
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::Quota(_))
    }
}

/// Why an oracle response failed schema parsing.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    #[error("unknown goal status '{0}'")]
    UnknownStatus(String),
}

/// Detect the provider's quota-exceeded wording in a raw error message.
pub fn is_quota_signal(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("429") || lower.contains("quota") || lower.contains("rate limit")
}

/// A scenario aborted because a goal exhausted its step budget.
///
/// Carries the per-goal reports accumulated so far, including the failed
/// one, so callers can still persist or print partial progress.
#[derive(Debug, Error)]
#[error("goal '{goal}' not achieved within {max_steps} steps")]
pub struct ScenarioFailure {
    pub goal: String,
    pub max_steps: u32,
    pub reports: Vec<crate::runner::GoalReport>,
}
