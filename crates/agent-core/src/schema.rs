//! Strict parsing of oracle responses.
//!
//! Responses must be JSON objects of a known shape. The only leniency is
//! stripping markdown code fences, which some oracle replies carry despite
//! instructions. Unknown locator strategies and action kinds drop the
//! affected directive with a warning; the rest of the batch survives.

use crate::errors::ParseErrorKind;
use case_store::TestCase;
use droidscout_core_types::{ActionDirective, ActionType, GoalStatus, LocatorStrategy};
use serde::Deserialize;
use tracing::warn;

/// Parsed action response.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionBatch {
    pub directives: Vec<ActionDirective>,
    pub reasoning: String,
    pub confidence: Option<f64>,
    /// The oracle's prediction of the app state after the actions run.
    pub state_update: Option<String>,
}

/// Parsed verification response.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status: GoalStatus,
    pub reason: String,
    pub confidence: Option<f64>,
    pub next_action_needed: Option<bool>,
    pub details: Option<String>,
}

#[derive(Deserialize)]
struct RawActionBatch {
    actions: Vec<RawAction>,
    #[serde(default)]
    reasoning: String,
    confidence: Option<f64>,
    state_update: Option<String>,
}

#[derive(Deserialize)]
struct RawAction {
    action_type: String,
    by: String,
    value: String,
    input: Option<String>,
}

#[derive(Deserialize)]
struct RawVerification {
    status: String,
    #[serde(default)]
    reason: String,
    confidence: Option<f64>,
    next_action_needed: Option<bool>,
    details: Option<String>,
}

/// Remove a leading ```` ```json ```` or ```` ``` ```` fence and a trailing
/// ```` ``` ````.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse an action-selection response.
pub fn parse_action_response(raw: &str) -> Result<ActionBatch, ParseErrorKind> {
    let text = strip_code_fences(raw);
    let parsed: RawActionBatch =
        serde_json::from_str(text).map_err(|e| ParseErrorKind::NotJson(e.to_string()))?;

    let mut directives = Vec::with_capacity(parsed.actions.len());
    for action in parsed.actions {
        let Some(strategy) = LocatorStrategy::from_wire(&action.by) else {
            warn!(by = %action.by, "dropping directive with unknown locator strategy");
            continue;
        };
        let Some(kind) = ActionType::from_wire(&action.action_type) else {
            warn!(action_type = %action.action_type, "dropping directive with unknown action type");
            continue;
        };
        directives.push(ActionDirective {
            action: kind,
            strategy,
            value: action.value,
            input: action.input,
        });
    }

    Ok(ActionBatch {
        directives,
        reasoning: parsed.reasoning,
        confidence: parsed.confidence,
        state_update: parsed.state_update,
    })
}

/// Parse a goal-verification response.
pub fn parse_verification_response(raw: &str) -> Result<Verdict, ParseErrorKind> {
    let text = strip_code_fences(raw);
    let parsed: RawVerification =
        serde_json::from_str(text).map_err(|e| ParseErrorKind::NotJson(e.to_string()))?;

    let status = GoalStatus::from_wire(&parsed.status)
        .ok_or_else(|| ParseErrorKind::UnknownStatus(parsed.status.clone()))?;

    Ok(Verdict {
        status,
        reason: parsed.reason,
        confidence: parsed.confidence,
        next_action_needed: parsed.next_action_needed,
        details: parsed.details,
    })
}

/// Parse a case-generation response into test cases.
///
/// Oracles annotate generated arrays with `//` comment lines often enough
/// that those are dropped before parsing, on top of the usual fence strip.
pub fn parse_cases_response(raw: &str) -> Result<Vec<TestCase>, ParseErrorKind> {
    let text = strip_code_fences(raw);
    let cleaned: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n");
    serde_json::from_str(&cleaned).map_err(|e| ParseErrorKind::NotJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTION_JSON: &str = r#"{
        "actions": [
            {"action_type": "click", "by": "accessibility_id", "value": "Alarm"}
        ],
        "reasoning": "Alarm tab leads to the goal screen",
        "confidence": 0.9,
        "state_update": "Alarm screen is shown"
    }"#;

    #[test]
    fn test_parse_action_batch() {
        let batch = parse_action_response(ACTION_JSON).unwrap();
        assert_eq!(batch.directives.len(), 1);
        assert_eq!(batch.directives[0].action, ActionType::Click);
        assert_eq!(batch.directives[0].strategy, LocatorStrategy::AccessibilityId);
        assert_eq!(batch.directives[0].value, "Alarm");
        assert_eq!(batch.confidence, Some(0.9));
        assert_eq!(batch.state_update.as_deref(), Some("Alarm screen is shown"));
    }

    #[test]
    fn test_code_fenced_response_parses_identically() {
        let fenced = format!("```json\n{ACTION_JSON}\n```");
        assert_eq!(
            parse_action_response(&fenced).unwrap(),
            parse_action_response(ACTION_JSON).unwrap()
        );

        let bare_fence = format!("```\n{ACTION_JSON}\n```");
        assert_eq!(
            parse_action_response(&bare_fence).unwrap(),
            parse_action_response(ACTION_JSON).unwrap()
        );
    }

    #[test]
    fn test_unknown_strategy_drops_directive_but_keeps_batch() {
        let raw = r##"{
            "actions": [
                {"action_type": "click", "by": "css_selector", "value": "#alarm"},
                {"action_type": "click", "by": "id", "value": "alarm_tab"},
                {"action_type": "long_press", "by": "id", "value": "alarm_tab"}
            ],
            "reasoning": "mixed quality"
        }"##;
        let batch = parse_action_response(raw).unwrap();
        assert_eq!(batch.directives.len(), 1);
        assert_eq!(batch.directives[0].value, "alarm_tab");
    }

    #[test]
    fn test_non_json_is_parse_error() {
        let err = parse_action_response("I would click the Alarm tab.").unwrap_err();
        assert!(matches!(err, ParseErrorKind::NotJson(_)));
    }

    #[test]
    fn test_parse_verification() {
        let raw = r#"{
            "status": "NOT_YET_MET",
            "reason": "still on the clock screen",
            "confidence": 0.8,
            "next_action_needed": true,
            "details": "Alarm tab visible but not selected"
        }"#;
        let verdict = parse_verification_response(raw).unwrap();
        assert_eq!(verdict.status, GoalStatus::NotYetMet);
        assert_eq!(verdict.reason, "still on the clock screen");
        assert_eq!(verdict.next_action_needed, Some(true));
    }

    #[test]
    fn test_parse_cases_array() {
        let raw = r#"[
            {
                "test_case_id": "TC-001",
                "title": "Open the Alarm tab",
                "steps": [
                    {
                        "step_number": 1,
                        "action": "click",
                        "element": {"type": "accessibility_id", "identifier": "Alarm"},
                        "expected_result": "Alarm screen is shown"
                    }
                ],
                "assertions": ["Alarm list is visible"],
                "priority": "High"
            }
        ]"#;
        let cases = parse_cases_response(raw).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].test_case_id, "TC-001");
        assert_eq!(cases[0].steps.len(), 1);
        assert_eq!(cases[0].steps[0].element.as_ref().unwrap().identifier.as_deref(), Some("Alarm"));
    }

    #[test]
    fn test_parse_cases_strips_fences_and_comment_lines() {
        let raw = "```json\n[\n// generated for the clock app\n{\"test_case_id\": \"TC-002\", \"title\": \"t\", \"steps\": []}\n]\n```";
        let cases = parse_cases_response(raw).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].test_case_id, "TC-002");
    }

    #[test]
    fn test_prose_cases_response_is_parse_error() {
        let err = parse_cases_response("Here are some test cases.").unwrap_err();
        assert!(matches!(err, ParseErrorKind::NotJson(_)));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let raw = r#"{"status": "MAYBE", "reason": "unsure"}"#;
        let err = parse_verification_response(raw).unwrap_err();
        assert!(matches!(err, ParseErrorKind::UnknownStatus(s) if s == "MAYBE"));
    }
}
