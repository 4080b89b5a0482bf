//! Goal state as asserted by the verification oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict on a goal at a point in time.
///
/// Both `Failed` and `NotYetMet` read as "not achieved" to the loop; the
/// step budget, not the verifier, decides when to stop retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    Achieved,
    Failed,
    NotYetMet,
}

impl GoalStatus {
    /// Strict allow-list parse of the oracle's `status` string.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ACHIEVED" => Some(Self::Achieved),
            "FAILED" => Some(Self::Failed),
            "NOT_YET_MET" => Some(Self::NotYetMet),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Achieved => "ACHIEVED",
            Self::Failed => "FAILED",
            Self::NotYetMet => "NOT_YET_MET",
        }
    }

    pub fn is_achieved(&self) -> bool {
        matches!(self, Self::Achieved)
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full goal judgement with the oracle's explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalState {
    pub goal_text: String,
    pub status: GoalStatus,
    pub reason: String,
    pub confidence: Option<f64>,
}

impl GoalState {
    pub fn new(goal_text: impl Into<String>, status: GoalStatus, reason: impl Into<String>) -> Self {
        Self {
            goal_text: goal_text.into(),
            status,
            reason: reason.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_wire() {
        assert_eq!(GoalStatus::from_wire("ACHIEVED"), Some(GoalStatus::Achieved));
        assert_eq!(GoalStatus::from_wire("FAILED"), Some(GoalStatus::Failed));
        assert_eq!(
            GoalStatus::from_wire(" NOT_YET_MET "),
            Some(GoalStatus::NotYetMet)
        );
        // Lower case and free-form statuses are rejected, not guessed at.
        assert_eq!(GoalStatus::from_wire("achieved"), None);
        assert_eq!(GoalStatus::from_wire("DONE"), None);
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&GoalStatus::NotYetMet).unwrap();
        assert_eq!(json, "\"NOT_YET_MET\"");
    }
}
