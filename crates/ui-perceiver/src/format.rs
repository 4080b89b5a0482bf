//! Rendering element records for the decision oracle.

use droidscout_core_types::UiElement;

/// Format elements into the one-line-per-element block embedded in oracle
/// prompts: text, description, widget type and clickability, in that order.
pub fn format_for_prompt(elements: &[UiElement]) -> String {
    let mut lines = Vec::with_capacity(elements.len());
    for element in elements {
        let mut parts = Vec::new();
        if !element.text.is_empty() {
            parts.push(format!("text: '{}'", element.text));
        }
        if !element.content_desc.is_empty() {
            parts.push(format!("description: '{}'", element.content_desc));
        }
        if !element.class.is_empty() {
            parts.push(format!("type: {}", element.class));
        }
        if element.clickable {
            parts.push("clickable".to_string());
        }
        if !parts.is_empty() {
            lines.push(format!(" - {}", parts.join(", ")));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lines() {
        let elements = vec![
            UiElement {
                class: "android.widget.FrameLayout".to_string(),
                content_desc: "Alarm".to_string(),
                clickable: true,
                ..Default::default()
            },
            UiElement {
                class: "android.widget.TextView".to_string(),
                text: "7:30 AM".to_string(),
                ..Default::default()
            },
        ];

        let block = format_for_prompt(&elements);
        let lines: Vec<_> = block.lines().collect();
        assert_eq!(
            lines[0],
            " - description: 'Alarm', type: android.widget.FrameLayout, clickable"
        );
        assert_eq!(lines[1], " - text: '7:30 AM', type: android.widget.TextView");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_for_prompt(&[]), "");
    }
}
