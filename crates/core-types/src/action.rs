//! Action directives produced by the decision oracle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locator strategy used to address an element.
///
/// The wire names form an explicit allow-list: anything outside it is
/// rejected at the parsing seam rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    /// Accessibility id, i.e. the element's content description.
    AccessibilityId,
    /// XPath-style query; matched by substring containment.
    Xpath,
    /// Resource id.
    Id,
    /// Widget class name.
    ClassName,
}

impl LocatorStrategy {
    /// Map an oracle-provided `by` string through the allow-list.
    ///
    /// `description` is accepted as an alias for the accessibility id, which
    /// the oracle occasionally emits. Unknown strategies yield `None` and the
    /// caller drops that directive.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "accessibility_id" | "description" => Some(Self::AccessibilityId),
            "xpath" => Some(Self::Xpath),
            "id" => Some(Self::Id),
            "class_name" => Some(Self::ClassName),
            _ => None,
        }
    }

    /// Wire/display name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccessibilityId => "accessibility_id",
            Self::Xpath => "xpath",
            Self::Id => "id",
            Self::ClassName => "class_name",
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of device interaction a directive requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Click,
    Type,
}

impl ActionType {
    /// Map an oracle-provided `action_type` string; unknown kinds yield
    /// `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "click" => Some(Self::Click),
            "type" => Some(Self::Type),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Type => "type",
        }
    }
}

/// A single resolved instruction from the oracle: act on the element
/// addressed by `(strategy, value)`.
///
/// Directives are transient: created by the adapter, consumed immediately by
/// the locator and executor, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDirective {
    pub action: ActionType,
    pub strategy: LocatorStrategy,
    pub value: String,
    /// Text to enter when `action` is `Type`.
    pub input: Option<String>,
}

impl ActionDirective {
    /// Convenience constructor for the common click case.
    pub fn click(strategy: LocatorStrategy, value: impl Into<String>) -> Self {
        Self {
            action: ActionType::Click,
            strategy,
            value: value.into(),
            input: None,
        }
    }

    /// Human-readable description, appended to the run memory after
    /// execution so later oracle calls see what was done.
    pub fn describe(&self) -> String {
        match &self.input {
            Some(input) => format!(
                "Action: {} on {} with input '{}'",
                self.action.name(),
                self.value,
                input
            ),
            None => format!("Action: {} on {}", self.action.name(), self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_allow_list() {
        assert_eq!(
            LocatorStrategy::from_wire("accessibility_id"),
            Some(LocatorStrategy::AccessibilityId)
        );
        assert_eq!(
            LocatorStrategy::from_wire("description"),
            Some(LocatorStrategy::AccessibilityId)
        );
        assert_eq!(LocatorStrategy::from_wire("ID"), Some(LocatorStrategy::Id));
        assert_eq!(
            LocatorStrategy::from_wire("xpath"),
            Some(LocatorStrategy::Xpath)
        );
        assert_eq!(
            LocatorStrategy::from_wire("class_name"),
            Some(LocatorStrategy::ClassName)
        );
        assert_eq!(LocatorStrategy::from_wire("css"), None);
        assert_eq!(LocatorStrategy::from_wire(""), None);
    }

    #[test]
    fn test_action_type_parsing() {
        assert_eq!(ActionType::from_wire("click"), Some(ActionType::Click));
        assert_eq!(ActionType::from_wire("Type"), Some(ActionType::Type));
        assert_eq!(ActionType::from_wire("long_press"), None);
    }

    #[test]
    fn test_describe() {
        let click = ActionDirective::click(LocatorStrategy::AccessibilityId, "Alarm");
        assert_eq!(click.describe(), "Action: click on Alarm");

        let typed = ActionDirective {
            action: ActionType::Type,
            strategy: LocatorStrategy::Id,
            value: "username".to_string(),
            input: Some("standard_user".to_string()),
        };
        assert_eq!(
            typed.describe(),
            "Action: type on username with input 'standard_user'"
        );
    }
}
