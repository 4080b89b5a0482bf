//! Executes stored test cases against the device.

use action_locator::{ElementResolver, Resolution};
use case_store::{Failure, RunRecord, RunStatus, StepRecord, TestCase, TestStep};
use droidscout_core_types::LocatorStrategy;
use std::sync::Arc;
use tracing::{info, warn};
use uia_adapter::{ElementHandle, UiDriver};

/// What an assertion sentence asks to check.
#[derive(Debug, Clone, PartialEq)]
pub enum AssertionKind {
    Visible,
    ContainsText(String),
    Enabled,
    Selected,
}

/// A parsed assertion: a locator target plus the check to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionCheck {
    pub strategy: LocatorStrategy,
    pub target: String,
    pub kind: AssertionKind,
}

/// Parse an assertion sentence like `Alarm is visible`,
/// `id:alarm_tab is enabled`, `desc:Alarm is selected` or
/// `Alarm contains text 'Alarm set'`. Unrecognized sentences yield `None`.
pub fn parse_assertion(sentence: &str) -> Option<AssertionCheck> {
    let sentence = sentence.trim();

    let (target, kind) = if let Some((target, rest)) = sentence.split_once(" contains text ") {
        let text = rest.trim().trim_matches(|c| c == '\'' || c == '"');
        (target, AssertionKind::ContainsText(text.to_string()))
    } else if let Some(target) = sentence.strip_suffix(" is visible") {
        (target, AssertionKind::Visible)
    } else if let Some(target) = sentence.strip_suffix(" is enabled") {
        (target, AssertionKind::Enabled)
    } else if let Some(target) = sentence.strip_suffix(" is selected") {
        (target, AssertionKind::Selected)
    } else {
        return None;
    };

    let target = target.trim();
    let (strategy, value) = if let Some(id) = target.strip_prefix("id:") {
        (LocatorStrategy::Id, id)
    } else if let Some(desc) = target.strip_prefix("desc:") {
        (LocatorStrategy::AccessibilityId, desc)
    } else {
        (LocatorStrategy::AccessibilityId, target)
    };

    Some(AssertionCheck {
        strategy,
        target: value.to_string(),
        kind,
    })
}

/// Runs stored cases step by step, resolving elements the same way the goal
/// loop does.
pub struct CaseRunner {
    driver: Arc<dyn UiDriver>,
    resolver: ElementResolver,
}

impl CaseRunner {
    pub fn new(driver: Arc<dyn UiDriver>, resolver: ElementResolver) -> Self {
        Self { driver, resolver }
    }

    /// Execute one case: all steps, then all assertions. Step failures are
    /// recorded but do not stop the remaining steps.
    pub async fn run_case(&self, case: &TestCase) -> RunRecord {
        info!(case = %case.test_case_id, title = %case.title, "case started");
        let mut record = RunRecord {
            test_case_id: case.test_case_id.clone(),
            title: case.title.clone(),
            status: RunStatus::Passed,
            steps_executed: Vec::new(),
            failures: Vec::new(),
        };

        for step in &case.steps {
            let step_record = self.run_step(step).await;
            if step_record.status == RunStatus::Failed {
                record.status = RunStatus::Failed;
                record.failures.push(Failure {
                    step: Some(step.step_number),
                    assertion: None,
                    error: step_record.error.clone().unwrap_or_default(),
                });
            }
            record.steps_executed.push(step_record);
        }

        for assertion in &case.assertions {
            if let Some(error) = self.check_assertion(assertion).await {
                warn!(case = %case.test_case_id, assertion, error, "assertion failed");
                record.status = RunStatus::Failed;
                record.failures.push(Failure {
                    step: None,
                    assertion: Some(assertion.clone()),
                    error,
                });
            }
        }

        info!(case = %case.test_case_id, status = ?record.status, "case finished");
        record
    }

    /// Execute every case in order.
    pub async fn run_cases(&self, cases: &[TestCase]) -> Vec<RunRecord> {
        let mut records = Vec::with_capacity(cases.len());
        for case in cases {
            records.push(self.run_case(case).await);
        }
        records
    }

    async fn run_step(&self, step: &TestStep) -> StepRecord {
        let mut record = StepRecord {
            step_number: step.step_number,
            action: step.action.clone(),
            status: RunStatus::Passed,
            error: None,
        };

        let outcome = self.execute_step(step).await;
        if let Err(error) = outcome {
            record.status = RunStatus::Failed;
            record.error = Some(error);
        }
        record
    }

    async fn execute_step(&self, step: &TestStep) -> Result<(), String> {
        let element = step
            .element
            .as_ref()
            .ok_or_else(|| "step has no element".to_string())?;
        let identifier = element
            .identifier
            .as_deref()
            .ok_or_else(|| "step element has no identifier".to_string())?;
        let strategy = element
            .kind
            .as_deref()
            .and_then(LocatorStrategy::from_wire)
            .unwrap_or(LocatorStrategy::AccessibilityId);

        let handle = self.resolve(strategy, identifier).await?;

        match step.action.to_lowercase().as_str() {
            "click" => self
                .driver
                .click(&handle)
                .await
                .map_err(|e| e.to_string()),
            "type" | "input" => {
                let text = element.value.as_deref().unwrap_or_default();
                self.driver
                    .set_text(&handle, text)
                    .await
                    .map_err(|e| e.to_string())
            }
            other => Err(format!("unsupported step action '{other}'")),
        }
    }

    /// `None` means the assertion held; `Some(error)` carries the failure.
    async fn check_assertion(&self, sentence: &str) -> Option<String> {
        let Some(check) = parse_assertion(sentence) else {
            return Some(format!("unrecognized assertion '{sentence}'"));
        };

        let handle = match self.resolve(check.strategy, &check.target).await {
            Ok(handle) => handle,
            Err(error) => return Some(error),
        };

        match check.kind {
            AssertionKind::Visible => match self.driver.is_displayed(&handle).await {
                Ok(true) => None,
                Ok(false) => Some(format!("element '{}' is not visible", check.target)),
                Err(error) => Some(error.to_string()),
            },
            AssertionKind::ContainsText(expected) => {
                if handle.text.contains(&expected) {
                    None
                } else {
                    Some(format!(
                        "element '{}' does not contain text '{expected}'",
                        check.target
                    ))
                }
            }
            AssertionKind::Enabled => {
                if handle.enabled {
                    None
                } else {
                    Some(format!("element '{}' is not enabled", check.target))
                }
            }
            AssertionKind::Selected => {
                if handle.selected {
                    None
                } else {
                    Some(format!("element '{}' is not selected", check.target))
                }
            }
        }
    }

    async fn resolve(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<ElementHandle, String> {
        match self.resolver.resolve(strategy, value).await {
            Ok(Resolution::Found { handle, .. }) => Ok(handle),
            Ok(Resolution::NotFound) => Err(format!("element '{value}' not found")),
            Err(error) => Err(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_locator::ResolverConfig;
    use case_store::ElementRef;
    use uia_adapter::{ActionRecord, ScreenState, ScriptedDriver};

    fn alarm_handle() -> ElementHandle {
        ElementHandle {
            id: "alarm".to_string(),
            content_desc: "Alarm".to_string(),
            enabled: true,
            selected: true,
            ..Default::default()
        }
    }

    fn case_runner(driver: Arc<ScriptedDriver>) -> CaseRunner {
        CaseRunner::new(
            driver.clone(),
            ElementResolver::with_config(
                driver,
                ResolverConfig::default().with_max_scroll_attempts(1),
            ),
        )
    }

    fn click_step(identifier: &str) -> TestStep {
        TestStep {
            step_number: 1,
            action: "click".to_string(),
            element: Some(ElementRef {
                kind: Some("accessibility_id".to_string()),
                identifier: Some(identifier.to_string()),
                value: None,
            }),
            expected_result: None,
        }
    }

    fn case(steps: Vec<TestStep>, assertions: Vec<&str>) -> TestCase {
        TestCase {
            test_case_id: "TC-001".to_string(),
            title: "Open the alarm tab".to_string(),
            description: None,
            preconditions: Vec::new(),
            steps,
            assertions: assertions.into_iter().map(str::to_string).collect(),
            priority: None,
            test_type: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_parse_assertion_sentences() {
        assert_eq!(
            parse_assertion("Alarm is visible"),
            Some(AssertionCheck {
                strategy: LocatorStrategy::AccessibilityId,
                target: "Alarm".to_string(),
                kind: AssertionKind::Visible,
            })
        );
        assert_eq!(
            parse_assertion("id:alarm_tab is enabled"),
            Some(AssertionCheck {
                strategy: LocatorStrategy::Id,
                target: "alarm_tab".to_string(),
                kind: AssertionKind::Enabled,
            })
        );
        assert_eq!(
            parse_assertion("desc:Alarm is selected"),
            Some(AssertionCheck {
                strategy: LocatorStrategy::AccessibilityId,
                target: "Alarm".to_string(),
                kind: AssertionKind::Selected,
            })
        );
        assert_eq!(
            parse_assertion("Alarm contains text 'Alarm set'"),
            Some(AssertionCheck {
                strategy: LocatorStrategy::AccessibilityId,
                target: "Alarm".to_string(),
                kind: AssertionKind::ContainsText("Alarm set".to_string()),
            })
        );
        assert_eq!(parse_assertion("Alarm looks nice"), None);
    }

    #[tokio::test]
    async fn test_passing_case() {
        let driver = Arc::new(ScriptedDriver::single(
            ScreenState::new("<hierarchy/>").with_element(alarm_handle()),
        ));
        let runner = case_runner(driver.clone());

        let record = runner
            .run_case(&case(
                vec![click_step("Alarm")],
                vec!["Alarm is visible", "Alarm is enabled", "Alarm is selected"],
            ))
            .await;

        assert!(record.status.is_passed());
        assert!(record.failures.is_empty());
        assert_eq!(record.steps_executed.len(), 1);
        assert_eq!(
            driver.actions(),
            vec![ActionRecord::Click {
                target: "alarm".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_element_fails_step_and_case() {
        let driver = Arc::new(ScriptedDriver::single(ScreenState::new("<hierarchy/>")));
        let runner = case_runner(driver);

        let record = runner
            .run_case(&case(vec![click_step("Bedtime")], vec![]))
            .await;

        assert_eq!(record.status, RunStatus::Failed);
        assert_eq!(record.failures.len(), 1);
        assert_eq!(record.failures[0].step, Some(1));
        assert!(record.failures[0].error.contains("not found"));
    }

    #[tokio::test]
    async fn test_failed_assertion_fails_case_without_stopping() {
        let driver = Arc::new(ScriptedDriver::single(
            ScreenState::new("<hierarchy/>").with_element(alarm_handle()),
        ));
        let runner = case_runner(driver);

        let record = runner
            .run_case(&case(
                vec![click_step("Alarm")],
                vec!["Alarm contains text 'nope'", "Alarm is visible"],
            ))
            .await;

        assert_eq!(record.status, RunStatus::Failed);
        // The second assertion still ran and held.
        assert_eq!(record.failures.len(), 1);
        assert_eq!(
            record.failures[0].assertion.as_deref(),
            Some("Alarm contains text 'nope'")
        );
    }

    #[tokio::test]
    async fn test_unrecognized_assertion_is_a_failure() {
        let driver = Arc::new(ScriptedDriver::single(
            ScreenState::new("<hierarchy/>").with_element(alarm_handle()),
        ));
        let runner = case_runner(driver);

        let record = runner.run_case(&case(vec![], vec!["Alarm looks nice"])).await;

        assert_eq!(record.status, RunStatus::Failed);
        assert!(record.failures[0].error.contains("unrecognized assertion"));
    }
}
