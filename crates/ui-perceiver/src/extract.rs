//! Actionable element extraction from the raw XML snapshot.

use droidscout_core_types::{Bounds, UiElement};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Widget types treated as actionable even without a clickable flag or
/// content description.
const ACTIONABLE_CLASSES: [&str; 4] = ["Button", "TextView", "ImageButton", "EditText"];

/// Parse the page source and extract potentially actionable elements.
///
/// An element qualifies when it is clickable, carries a non-empty content
/// description, or is one of the well-known interactive widget types. The
/// result is deduplicated by `(content-desc or text)` key with the first
/// occurrence winning; document order is preserved. Elements with neither
/// identifier are dropped, since nothing downstream could address them.
///
/// Malformed or empty input yields an empty list, never an error.
pub fn extract_actionable(page_source: &str) -> Vec<UiElement> {
    if page_source.trim().is_empty() {
        warn!("empty page source, nothing to extract");
        return Vec::new();
    }

    let document = match roxmltree::Document::parse(page_source) {
        Ok(document) => document,
        Err(error) => {
            warn!(%error, "failed to parse page source, treating as empty");
            return Vec::new();
        }
    };

    let mut elements = Vec::new();
    let mut seen = HashSet::new();

    // Walking each node exactly once also gives us identity-level dedup.
    for node in document.descendants().filter(|n| n.is_element()) {
        let element = element_from_node(&node);
        if !is_actionable(&element) {
            continue;
        }
        let Some(identifier) = element.identifier() else {
            continue;
        };
        if seen.insert(identifier.to_string()) {
            elements.push(element);
        }
    }

    debug!(count = elements.len(), "extracted actionable elements");
    elements
}

fn is_actionable(element: &UiElement) -> bool {
    if element.clickable || !element.content_desc.is_empty() {
        return true;
    }
    ACTIONABLE_CLASSES.contains(&element.short_class())
}

fn element_from_node(node: &roxmltree::Node<'_, '_>) -> UiElement {
    let attr = |name: &str| node.attribute(name).unwrap_or_default().to_string();
    let flag = |name: &str| node.attribute(name) == Some("true");

    // UiAutomator snapshots carry the widget class both as the tag name and
    // as a `class` attribute; prefer the attribute, fall back to the tag.
    let class = node
        .attribute("class")
        .unwrap_or_else(|| node.tag_name().name())
        .to_string();

    UiElement {
        class,
        text: attr("text"),
        content_desc: attr("content-desc"),
        resource_id: attr("resource-id"),
        clickable: flag("clickable"),
        enabled: flag("enabled"),
        focusable: flag("focusable"),
        checkable: flag("checkable"),
        checked: flag("checked"),
        scrollable: flag("scrollable"),
        selected: flag("selected"),
        visible: flag("visible"),
        bounds: node.attribute("bounds").and_then(Bounds::parse),
    }
}
