//! Exact and fuzzy matching over the accumulated candidate pool.

use droidscout_core_types::LocatorStrategy;
use uia_adapter::ElementHandle;

/// Exact-match pass keyed by strategy: accessibility id against the content
/// description, id against the resource id, class name against the widget
/// class, and substring containment for xpath-style queries.
pub fn exact_match<'a>(
    strategy: LocatorStrategy,
    value: &str,
    pool: &'a [ElementHandle],
) -> Option<&'a ElementHandle> {
    pool.iter().find(|candidate| match strategy {
        LocatorStrategy::AccessibilityId => candidate.content_desc == value,
        LocatorStrategy::Id => candidate.resource_id == value,
        LocatorStrategy::ClassName => candidate.class_name == value,
        // An xpath query matches when it mentions one of the candidate's
        // identifying attribute values.
        LocatorStrategy::Xpath => {
            (!candidate.text.is_empty() && value.contains(&candidate.text))
                || (!candidate.content_desc.is_empty() && value.contains(&candidate.content_desc))
                || (!candidate.resource_id.is_empty() && value.contains(&candidate.resource_id))
        }
    })
}

/// Weighted substring score for a single candidate.
///
/// The 4 > 3 > 2 ordering encodes a reliability prior: stable resource ids
/// outrank semantic descriptions, which outrank locale-dependent visible
/// text.
pub fn fuzzy_score(value: &str, candidate: &ElementHandle) -> u32 {
    let needle = value.to_lowercase();
    let mut score = 0;
    if !candidate.text.is_empty() && candidate.text.to_lowercase().contains(&needle) {
        score += 2;
    }
    if !candidate.content_desc.is_empty() && candidate.content_desc.to_lowercase().contains(&needle)
    {
        score += 3;
    }
    if !candidate.resource_id.is_empty() && candidate.resource_id.to_lowercase().contains(&needle) {
        score += 4;
    }
    score
}

/// Best-scoring candidate with a strictly positive score, tracking the
/// running maximum so earlier candidates win ties.
pub fn best_fuzzy<'a>(value: &str, pool: &'a [ElementHandle]) -> Option<(&'a ElementHandle, u32)> {
    let mut best: Option<(&ElementHandle, u32)> = None;
    for candidate in pool {
        let score = fuzzy_score(value, candidate);
        if score > best.map(|(_, s)| s).unwrap_or(0) {
            best = Some((candidate, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, content_desc: &str, resource_id: &str) -> ElementHandle {
        ElementHandle {
            id: format!("{text}/{content_desc}/{resource_id}"),
            text: text.to_string(),
            content_desc: content_desc.to_string(),
            resource_id: resource_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fuzzy_weights() {
        assert_eq!(fuzzy_score("alarm", &candidate("Alarm", "", "")), 2);
        assert_eq!(fuzzy_score("alarm", &candidate("", "Alarm", "")), 3);
        assert_eq!(fuzzy_score("alarm", &candidate("", "", "alarm_tab")), 4);
        assert_eq!(
            fuzzy_score("alarm", &candidate("Alarm", "Alarm", "alarm_tab")),
            9
        );
        assert_eq!(fuzzy_score("alarm", &candidate("Clock", "", "")), 0);
    }

    #[test]
    fn test_resource_id_outranks_description_outranks_text() {
        let pool = vec![
            candidate("Alarm", "", ""),
            candidate("", "Alarm", ""),
            candidate("", "", "alarm_tab"),
        ];
        let (best, score) = best_fuzzy("alarm", &pool).unwrap();
        assert_eq!(score, 4);
        assert_eq!(best.resource_id, "alarm_tab");

        let pool = vec![candidate("Alarm", "", ""), candidate("", "Alarm", "")];
        let (best, score) = best_fuzzy("alarm", &pool).unwrap();
        assert_eq!(score, 3);
        assert_eq!(best.content_desc, "Alarm");
    }

    #[test]
    fn test_best_fuzzy_first_max_wins_ties() {
        let pool = vec![candidate("", "Alarm one", ""), candidate("", "Alarm two", "")];
        let (best, _) = best_fuzzy("alarm", &pool).unwrap();
        assert_eq!(best.content_desc, "Alarm one");
    }

    #[test]
    fn test_best_fuzzy_none_on_zero_scores() {
        let pool = vec![candidate("Clock", "Clock", "clock_tab")];
        assert!(best_fuzzy("alarm", &pool).is_none());
        assert!(best_fuzzy("alarm", &[]).is_none());
    }

    #[test]
    fn test_exact_match_by_strategy() {
        let pool = vec![
            candidate("Alarm", "Alarm", "com.app:id/alarm"),
            candidate("Clock", "Clock", "com.app:id/clock"),
        ];

        let hit = exact_match(LocatorStrategy::AccessibilityId, "Clock", &pool).unwrap();
        assert_eq!(hit.content_desc, "Clock");

        let hit = exact_match(LocatorStrategy::Id, "com.app:id/alarm", &pool).unwrap();
        assert_eq!(hit.resource_id, "com.app:id/alarm");

        let hit = exact_match(LocatorStrategy::Xpath, "//*[@text='Clock']", &pool).unwrap();
        assert_eq!(hit.text, "Clock");

        assert!(exact_match(LocatorStrategy::AccessibilityId, "Timer", &pool).is_none());
    }

    #[test]
    fn test_exact_match_by_class_name() {
        let mut element = candidate("", "Alarm", "");
        element.class_name = "android.widget.Button".to_string();
        let pool = vec![element];

        assert!(exact_match(LocatorStrategy::ClassName, "android.widget.Button", &pool).is_some());
        assert!(exact_match(LocatorStrategy::ClassName, "android.widget.TextView", &pool).is_none());
    }
}
