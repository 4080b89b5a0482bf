//! Stored test-case and run-result documents.
//!
//! Field-level `skip_serializing_if` keeps absent optional fields absent on
//! re-save, so externally generated case files survive a load/save cycle
//! byte-for-byte at the JSON-value level.

use serde::{Deserialize, Serialize};

/// A stored, executable test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub test_case_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preconditions: Vec<String>,
    pub steps: Vec<TestStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// One step of a stored case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    pub step_number: u32,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
}

/// Loose element reference inside a stored step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRef {
    /// Locator strategy name, e.g. `accessibility_id`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Text payload for input actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Overall run verdict for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Passed,
    Failed,
}

impl RunStatus {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of executing one stored case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub test_case_id: String,
    pub title: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps_executed: Vec<StepRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Failure>,
}

/// Per-step execution outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step_number: u32,
    pub action: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A step failure or assertion failure attached to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_round_trips_without_optionals() {
        let doc = json!({
            "test_case_id": "TC-001",
            "title": "Open the alarm tab",
            "steps": [
                {
                    "step_number": 1,
                    "action": "click",
                    "element": { "type": "accessibility_id", "identifier": "Alarm" }
                }
            ],
            "assertions": ["Alarm is visible"]
        });

        let case: TestCase = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(case.test_case_id, "TC-001");
        assert!(case.description.is_none());
        assert!(case.preconditions.is_empty());

        let back = serde_json::to_value(&case).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_run_record_status_names() {
        let record = RunRecord {
            test_case_id: "TC-001".to_string(),
            title: "Open the alarm tab".to_string(),
            status: RunStatus::Failed,
            steps_executed: vec![StepRecord {
                step_number: 1,
                action: "click".to_string(),
                status: RunStatus::Passed,
                error: None,
            }],
            failures: vec![Failure {
                step: None,
                assertion: Some("Alarm is visible".to_string()),
                error: "element not found".to_string(),
            }],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["steps_executed"][0]["status"], "PASSED");
        assert!(value["steps_executed"][0].get("error").is_none());
    }
}
