//! Scripted fixtures backing `--dry-run`.
//!
//! The device and oracle are built from the requested goals or cases so a
//! full run exercises every seam (extraction, selection, resolution,
//! verification, persistence) without a device or credentials.

use agent_core::selector::goal_keywords;
use agent_core::{parse_assertion, AssertionKind, MockOracle};
use case_store::TestCase;
use droidscout_core_types::LocatorStrategy;
use serde_json::json;
use uia_adapter::{ElementHandle, ScreenState, ScriptedDriver};

/// Scripted device plus an oracle that steers each goal to success in one
/// click.
pub fn goal_fixture(goals: &[String]) -> (ScriptedDriver, MockOracle) {
    let targets: Vec<String> = goals.iter().map(|goal| goal_target(goal)).collect();

    let mut source = String::from("<hierarchy>\n");
    let mut screen = ScreenState::default();
    for target in &targets {
        source.push_str(&format!(
            "  <node class=\"android.widget.FrameLayout\" content-desc=\"{}\" clickable=\"true\" enabled=\"true\" bounds=\"[0,48][540,220]\"/>\n",
            xml_escape(target)
        ));
        screen = screen.with_element(ElementHandle {
            id: target.to_lowercase(),
            content_desc: target.clone(),
            enabled: true,
            selected: true,
            ..Default::default()
        });
    }
    source.push_str("</hierarchy>");
    screen.source = source;

    let oracle = MockOracle::new();
    for target in &targets {
        oracle.push_ok(
            json!({
                "status": "NOT_YET_MET",
                "reason": format!("'{target}' not reached yet")
            })
            .to_string(),
        );
        oracle.push_ok(
            json!({
                "actions": [
                    {"action_type": "click", "by": "accessibility_id", "value": target}
                ],
                "reasoning": format!("'{target}' matches the goal"),
                "confidence": 0.9,
                "state_update": format!("'{target}' screen is shown")
            })
            .to_string(),
        );
        oracle.push_ok(
            json!({
                "status": "ACHIEVED",
                "reason": format!("'{target}' screen is shown"),
                "confidence": 0.9,
                "next_action_needed": false,
                "details": "scripted verification"
            })
            .to_string(),
        );
    }

    (ScriptedDriver::single(screen), oracle)
}

/// Scripted device exposing every element the cases touch, so all steps
/// and assertions can pass.
pub fn case_fixture(cases: &[TestCase]) -> ScriptedDriver {
    let mut elements: Vec<ElementHandle> = Vec::new();

    for case in cases {
        for step in &case.steps {
            if let Some(identifier) = step
                .element
                .as_ref()
                .and_then(|element| element.identifier.as_deref())
            {
                push_unique(
                    &mut elements,
                    ElementHandle {
                        id: identifier.to_lowercase(),
                        content_desc: identifier.to_string(),
                        resource_id: identifier.to_string(),
                        enabled: true,
                        selected: true,
                        ..Default::default()
                    },
                );
            }
        }
        for sentence in &case.assertions {
            if let Some(check) = parse_assertion(sentence) {
                let mut handle = ElementHandle {
                    id: check.target.to_lowercase(),
                    enabled: true,
                    selected: true,
                    ..Default::default()
                };
                match check.strategy {
                    LocatorStrategy::Id => handle.resource_id = check.target.clone(),
                    _ => handle.content_desc = check.target.clone(),
                }
                if let AssertionKind::ContainsText(text) = &check.kind {
                    handle.text = text.clone();
                }
                push_unique(&mut elements, handle);
            }
        }
    }

    let mut screen = ScreenState::new("<hierarchy/>");
    for handle in elements {
        screen = screen.with_element(handle);
    }
    ScriptedDriver::single(screen)
}

/// Scripted device plus an oracle that authors one test case for the
/// screen it is shown.
pub fn generate_fixture() -> (ScriptedDriver, MockOracle) {
    let source = "<hierarchy>\n  \
        <node class=\"android.widget.FrameLayout\" content-desc=\"Alarm\" clickable=\"true\" enabled=\"true\" bounds=\"[0,48][540,220]\"/>\n  \
        <node class=\"android.widget.EditText\" resource-id=\"alarm_label\" text=\"Label\" clickable=\"true\" enabled=\"true\" bounds=\"[0,240][540,320]\"/>\n\
        </hierarchy>";
    let screen = ScreenState::new(source).with_element(ElementHandle {
        id: "alarm".to_string(),
        content_desc: "Alarm".to_string(),
        enabled: true,
        selected: true,
        ..Default::default()
    });

    let oracle = MockOracle::new();
    oracle.push_ok(
        json!([
            {
                "test_case_id": "TC-001",
                "title": "Open the Alarm tab",
                "description": "Tap the Alarm tab and verify the alarm list appears",
                "preconditions": ["App is on its start screen"],
                "steps": [
                    {
                        "step_number": 1,
                        "action": "click",
                        "element": {"type": "accessibility_id", "identifier": "Alarm"},
                        "expected_result": "Alarm screen is shown"
                    }
                ],
                "assertions": ["Alarm is visible"],
                "priority": "High",
                "test_type": "Functional",
                "tags": ["navigation"]
            }
        ])
        .to_string(),
    );

    (ScriptedDriver::single(screen), oracle)
}

fn push_unique(elements: &mut Vec<ElementHandle>, handle: ElementHandle) {
    if !elements.iter().any(|existing| existing.id == handle.id) {
        elements.push(handle);
    }
}

/// The element a goal should land on: its first meaningful keyword, first
/// letter upper-cased to match typical content descriptions.
fn goal_target(goal: &str) -> String {
    let keyword = goal_keywords(goal)
        .into_iter()
        .next()
        .unwrap_or_else(|| goal.trim().to_lowercase());
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => keyword,
    }
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
