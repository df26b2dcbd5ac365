use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use muninn_aggregate::anchor_category_groups;
use muninn_core::Anchor;

use crate::insights::next_choice;

/// UI state of the anchors tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorsView {
    /// Matches against the display category, so filtering on
    /// "uncategorized" finds the unlabeled anchors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_filter: Option<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub selected: usize,
}

impl AnchorsView {
    /// Anchors passing the current filter and search, in load order.
    /// Search covers statement, category, and notes.
    pub fn rows<'a>(&self, anchors: &'a [Anchor]) -> Vec<&'a Anchor> {
        let needle = self.search.to_lowercase();
        anchors
            .iter()
            .filter(|a| {
                self.category_filter
                    .as_deref()
                    .map_or(true, |f| a.display_category() == f)
            })
            .filter(|a| {
                needle.is_empty()
                    || a.statement.to_lowercase().contains(&needle)
                    || a.display_category().to_lowercase().contains(&needle)
                    || a.notes
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// The filtered anchors grouped by display category, for the
    /// grouped list rendering.
    pub fn groups<'a>(&self, anchors: &'a [Anchor]) -> BTreeMap<String, Vec<&'a Anchor>> {
        anchor_category_groups(self.rows(anchors))
    }

    /// Cycle the category filter through the given menu and back to "all".
    pub fn cycle_category_filter(&mut self, categories: &[String]) {
        self.category_filter = next_choice(self.category_filter.as_deref(), categories);
    }

    pub fn clamp_selection(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = 0;
        } else if self.selected >= row_count {
            self.selected = row_count - 1;
        }
    }

    pub fn select_next(&mut self, row_count: usize) {
        if self.selected + 1 < row_count {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(v: serde_json::Value) -> Anchor {
        serde_json::from_value(v).unwrap()
    }

    fn fixture() -> Vec<Anchor> {
        vec![
            anchor(serde_json::json!({"id": "a1", "statement": "Prefers dark mode",
                "category": "preferences"})),
            anchor(serde_json::json!({"id": "a2", "statement": "Reviews every diff",
                "category": "workflow", "notes": "confirmed twice"})),
            anchor(serde_json::json!({"id": "a3", "statement": "Baseline fact"})),
        ]
    }

    #[test]
    fn category_filter_includes_the_uncategorized_bucket() {
        let anchors = fixture();
        let view = AnchorsView {
            category_filter: Some("uncategorized".into()),
            ..Default::default()
        };
        let rows = view.rows(&anchors);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a3");
    }

    #[test]
    fn search_covers_statement_and_notes() {
        let anchors = fixture();
        let mut view = AnchorsView::default();

        view.search = "DARK".into();
        assert_eq!(view.rows(&anchors).len(), 1);

        view.search = "confirmed".into();
        let rows = view.rows(&anchors);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a2");
    }

    #[test]
    fn groups_respect_the_active_search() {
        let anchors = fixture();
        let view = AnchorsView {
            search: "diff".into(),
            ..Default::default()
        };
        let groups = view.groups(&anchors);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["workflow"].len(), 1);
    }

    #[test]
    fn unfiltered_groups_show_every_anchor() {
        let anchors = fixture();
        let groups = AnchorsView::default().groups(&anchors);
        assert_eq!(groups.len(), 3);
        assert!(groups.contains_key("uncategorized"));
    }

    #[test]
    fn category_filter_cycles_and_wraps_to_all() {
        let menu = vec!["preferences".to_string(), "uncategorized".to_string()];
        let mut view = AnchorsView::default();

        view.cycle_category_filter(&menu);
        assert_eq!(view.category_filter.as_deref(), Some("preferences"));
        view.cycle_category_filter(&menu);
        assert_eq!(view.category_filter.as_deref(), Some("uncategorized"));
        view.cycle_category_filter(&menu);
        assert_eq!(view.category_filter, None);
    }

    #[test]
    fn state_round_trips_through_json() {
        let view = AnchorsView {
            category_filter: Some("workflow".into()),
            search: "diff".into(),
            selected: 1,
        };
        let json = serde_json::to_string(&view).unwrap();
        let back: AnchorsView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }
}
