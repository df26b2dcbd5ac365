use serde::{Deserialize, Serialize};

use muninn_aggregate::{table_rows, TableColumn, TableFilter, TableRow, TableSort};
use muninn_core::Insight;

/// UI state of the insights tab: the table filter, the single active
/// sort, and the selected row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsView {
    #[serde(default)]
    pub filter: TableFilter,
    #[serde(default)]
    pub sort: TableSort,
    #[serde(default)]
    pub selected: usize,
}

impl InsightsView {
    pub fn rows<'a>(&self, insights: &'a [Insight]) -> Vec<TableRow<'a>> {
        table_rows(insights, &self.filter, &self.sort)
    }

    /// Column-header click: flip the active column, reset a new one.
    pub fn click(&mut self, column: TableColumn) {
        self.sort.toggle(column);
    }

    /// Cycle the source filter through the given menu and back to "all".
    /// A stale selection that is no longer in the menu resets to "all".
    pub fn cycle_source_filter(&mut self, sources: &[String]) {
        self.filter.source = next_choice(self.filter.source.as_deref(), sources);
    }

    /// Same cycling behavior for the category filter.
    pub fn cycle_category_filter(&mut self, categories: &[String]) {
        self.filter.category = next_choice(self.filter.category.as_deref(), categories);
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

/// Step a filter through a menu: all, each entry in turn, back to all.
/// A current value that is no longer in the menu resets to all.
pub(crate) fn next_choice(current: Option<&str>, menu: &[String]) -> Option<String> {
    match current {
        None => menu.first().cloned(),
        Some(cur) => menu
            .iter()
            .position(|item| item == cur)
            .and_then(|idx| menu.get(idx + 1))
            .cloned(),
    }
}
