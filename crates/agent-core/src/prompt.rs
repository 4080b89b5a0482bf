//! Prompt builders for the two oracle calls.

use crate::context::RunContext;
use droidscout_core_types::UiElement;
use ui_perceiver::format_for_prompt;

pub const NO_HISTORY: &str = "No previous actions taken.";

/// Prompt asking the oracle which action to take next.
pub fn action_prompt(goal: &str, elements: &[UiElement], ctx: &RunContext) -> String {
    format!(
        "You are assisting with automated testing of an Android app. Decide which \
action to take next so the stated goal is reached.\n\
\n\
Previous actions taken:\n{history}\n\
\n\
Current state of the app:\n{state}\n\
\n\
Current goal: {goal}\n\
\n\
Available UI elements:\n{elements}\n\
\n\
Guidance:\n\
- For text entry goals, find the matching input field (EditText), prefer its \
resource-id, and use action_type \"type\" with the exact text as \"input\".\n\
- For taps and navigation, find the matching button, tab or menu entry, prefer \
its resource-id or content description, and use action_type \"click\". Elements \
are scrolled into view automatically.\n\
\n\
Respond with a JSON object of this exact shape:\n\
{{\n\
  \"actions\": [\n\
    {{\"action_type\": \"click\", \"by\": \"accessibility_id\", \"value\": \"element_value\", \"input\": \"optional text to type\"}}\n\
  ],\n\
  \"reasoning\": \"why these actions were chosen\",\n\
  \"confidence\": 0.95,\n\
  \"state_update\": \"how the app state changes after these actions\"\n\
}}\n\
\n\
Respond with the JSON object only. No markdown, no code fences.",
        history = ctx.memory.history_block(),
        state = ctx.current_state,
        goal = goal,
        elements = format_for_prompt(elements),
    )
}

/// Prompt asking the oracle whether the goal is already met.
pub fn verification_prompt(goal: &str, elements: &[UiElement], ctx: &RunContext) -> String {
    format!(
        "You are assisting with automated testing of an Android app. Judge whether \
the stated goal has been achieved on the current screen.\n\
\n\
Previous actions taken:\n{history}\n\
\n\
Current state of the app:\n{state}\n\
\n\
Goal to verify: {goal}\n\
\n\
Available UI elements:\n{elements}\n\
\n\
Guidance:\n\
- A text entry goal is ACHIEVED when the field holds the expected text, \
NOT_YET_MET when the field holds something else, FAILED when the field is \
missing.\n\
- A tap or navigation goal is ACHIEVED when the target screen or its expected \
elements are present, NOT_YET_MET when still on the previous screen, FAILED \
when on an unexpected screen.\n\
\n\
Respond with a JSON object of this exact shape:\n\
{{\n\
  \"status\": \"ACHIEVED|FAILED|NOT_YET_MET\",\n\
  \"reason\": \"explanation of the current status\",\n\
  \"confidence\": 0.95,\n\
  \"next_action_needed\": true,\n\
  \"details\": \"additional details about the verification\"\n\
}}\n\
\n\
Respond with the JSON object only.",
        history = ctx.memory.history_block(),
        state = ctx.current_state,
        goal = goal,
        elements = format_for_prompt(elements),
    )
}

/// Prompt asking the oracle to author test cases for the current screen.
pub fn generation_prompt(package: &str, activity: &str, elements: &[UiElement]) -> String {
    format!(
        "You are a QA engineer authoring automated test cases for an Android app.\n\
\n\
App package: {package}\n\
Current screen: {activity}\n\
\n\
Available UI elements:\n{elements}\n\
\n\
Generate test cases covering the core functionality, navigation flows and \
edge cases reachable from this screen. Each case must be self-contained, \
have clear success criteria and carry proper assertions. Cover positive and \
negative scenarios.\n\
\n\
Format the output as a JSON array of this exact shape:\n\
[\n\
  {{\n\
    \"test_case_id\": \"TC-001\",\n\
    \"title\": \"Test case title\",\n\
    \"description\": \"Detailed description\",\n\
    \"preconditions\": [\"Precondition 1\"],\n\
    \"steps\": [\n\
      {{\n\
        \"step_number\": 1,\n\
        \"action\": \"click\",\n\
        \"element\": {{\"type\": \"accessibility_id\", \"identifier\": \"element identifier\", \"value\": \"optional input value\"}},\n\
        \"expected_result\": \"Expected result\"\n\
      }}\n\
    ],\n\
    \"assertions\": [\"Assertion 1\"],\n\
    \"priority\": \"High\",\n\
    \"test_type\": \"Functional\",\n\
    \"tags\": [\"tag1\"]\n\
  }}\n\
]\n\
\n\
Respond with the JSON array only. No markdown, no code fences, no comments.",
        package = package,
        activity = activity,
        elements = format_for_prompt(elements),
    )
}
