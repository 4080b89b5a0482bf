//! Per-poll UI element snapshots.

use serde::{Deserialize, Serialize};

/// Screen-space rectangle of an element, parsed from the UiAutomator
/// `[left,top][right,bottom]` attribute form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    /// Parse the `[0,48][1080,2218]` wire form. Returns `None` on anything
    /// that does not match it exactly.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
        let (first, second) = inner.split_once("][")?;
        let (left, top) = parse_pair(first)?;
        let (right, bottom) = parse_pair(second)?;
        Some(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Center point, useful for coordinate-based taps.
    pub fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

fn parse_pair(raw: &str) -> Option<(i32, i32)> {
    let (x, y) = raw.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Snapshot of a single accessibility-tree node.
///
/// Records are created fresh on every poll and discarded after use; nothing
/// in the agent caches them across polls, since any device interaction can
/// invalidate the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiElement {
    /// Fully-qualified widget class, e.g. `android.widget.Button`.
    pub class: String,
    /// Visible text, locale-dependent.
    pub text: String,
    /// Accessibility description.
    pub content_desc: String,
    /// Resource identifier, the most stable handle when present.
    pub resource_id: String,
    pub clickable: bool,
    pub enabled: bool,
    pub focusable: bool,
    pub checkable: bool,
    pub checked: bool,
    pub scrollable: bool,
    pub selected: bool,
    pub visible: bool,
    pub bounds: Option<Bounds>,
}

impl UiElement {
    /// Preferred human-readable identifier: content description first, then
    /// visible text. `None` when neither is present.
    pub fn identifier(&self) -> Option<&str> {
        if !self.content_desc.is_empty() {
            Some(&self.content_desc)
        } else if !self.text.is_empty() {
            Some(&self.text)
        } else {
            None
        }
    }

    /// Whether the element carries any identifier usable for dedup and
    /// matching.
    pub fn has_identifier(&self) -> bool {
        self.identifier().is_some()
    }

    /// Short widget type, the last segment of the class name.
    pub fn short_class(&self) -> &str {
        self.class.rsplit('.').next().unwrap_or(&self.class)
    }

    /// Case-insensitive containment check against text and description.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.text.to_lowercase().contains(&needle)
            || self.content_desc.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_parse() {
        let bounds = Bounds::parse("[0,48][1080,2218]").unwrap();
        assert_eq!(bounds.left, 0);
        assert_eq!(bounds.top, 48);
        assert_eq!(bounds.right, 1080);
        assert_eq!(bounds.bottom, 2218);
        assert_eq!(bounds.center(), (540, 1133));
    }

    #[test]
    fn test_bounds_parse_rejects_garbage() {
        assert!(Bounds::parse("").is_none());
        assert!(Bounds::parse("[0,48]").is_none());
        assert!(Bounds::parse("0,48 1080,2218").is_none());
        assert!(Bounds::parse("[a,b][c,d]").is_none());
    }

    #[test]
    fn test_identifier_prefers_content_desc() {
        let element = UiElement {
            text: "Alarm".to_string(),
            content_desc: "Alarm tab".to_string(),
            ..Default::default()
        };
        assert_eq!(element.identifier(), Some("Alarm tab"));

        let text_only = UiElement {
            text: "Alarm".to_string(),
            ..Default::default()
        };
        assert_eq!(text_only.identifier(), Some("Alarm"));

        assert!(UiElement::default().identifier().is_none());
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let element = UiElement {
            content_desc: "Stopwatch".to_string(),
            ..Default::default()
        };
        assert!(element.mentions("stopwatch"));
        assert!(element.mentions("WATCH"));
        assert!(!element.mentions("timer"));
    }
}
