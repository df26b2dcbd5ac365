use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use muninn_core::Insight;

// ── Row projection ──

/// Flat projection of an insight for the table: render defaults applied
/// (category "uncategorized", strength 0, source from the first evidence
/// entry or empty) and sort keys precomputed.
#[derive(Debug, Clone, Serialize)]
pub struct TableRow<'a> {
    pub id: &'a str,
    pub content: &'a str,
    pub category: &'a str,
    pub source: &'a str,
    pub strength: f64,
    pub chat_timestamp: Option<&'a str>,
    pub last_seen: Option<&'a str>,
    #[serde(skip)]
    chat_millis: Option<i64>,
    #[serde(skip)]
    generated_millis: Option<i64>,
}

impl<'a> TableRow<'a> {
    pub fn project(insight: &'a Insight) -> Self {
        TableRow {
            id: &insight.id,
            content: &insight.content,
            category: insight.display_category(),
            source: insight.source(),
            strength: insight.strength_or_zero(),
            chat_timestamp: insight.chat_timestamp.as_deref(),
            last_seen: insight.last_seen.as_deref(),
            chat_millis: insight.chat_millis(),
            generated_millis: insight.generated_millis(),
        }
    }
}

// ── Filtering ──

/// Conjunctive table filter: every set clause must pass. The free-text
/// search is a case-insensitive substring test across content, category,
/// and source of the projected row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub search: String,
}

impl TableFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.source.is_none() && self.search.is_empty()
    }

    pub fn accepts(&self, row: &TableRow) -> bool {
        if let Some(category) = &self.category {
            if row.category != category {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if row.source != source {
                return false;
            }
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = row.content.to_lowercase().contains(&needle)
                || row.category.to_lowercase().contains(&needle)
                || row.source.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

// ── Sorting ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableColumn {
    Content,
    Category,
    Source,
    Strength,
    ChatDate,
    Generated,
}

impl TableColumn {
    pub const ALL: [TableColumn; 6] = [
        TableColumn::Content,
        TableColumn::Category,
        TableColumn::Source,
        TableColumn::Strength,
        TableColumn::ChatDate,
        TableColumn::Generated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TableColumn::Content => "Content",
            TableColumn::Category => "Category",
            TableColumn::Source => "Source",
            TableColumn::Strength => "Strength",
            TableColumn::ChatDate => "Chat Date",
            TableColumn::Generated => "Generated",
        }
    }
}

impl std::str::FromStr for TableColumn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "content" => Ok(TableColumn::Content),
            "category" => Ok(TableColumn::Category),
            "source" => Ok(TableColumn::Source),
            "strength" => Ok(TableColumn::Strength),
            "chat_date" => Ok(TableColumn::ChatDate),
            "generated" => Ok(TableColumn::Generated),
            other => anyhow::bail!(
                "unknown sort column: {other} (expected content, category, source, strength, chat_date, or generated)"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn flipped(self) -> Direction {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSort {
    pub column: TableColumn,
    pub direction: Direction,
}

impl Default for TableSort {
    /// Newest source activity first.
    fn default() -> Self {
        TableSort {
            column: TableColumn::ChatDate,
            direction: Direction::Descending,
        }
    }
}

impl TableSort {
    /// Column-header click: the active column flips direction, a new
    /// column resets to ascending.
    pub fn toggle(&mut self, column: TableColumn) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column;
            self.direction = Direction::Ascending;
        }
    }

    pub fn compare(&self, a: &TableRow, b: &TableRow) -> Ordering {
        let ord = match self.column {
            TableColumn::Content => compare_str(a.content, b.content),
            TableColumn::Category => compare_str(a.category, b.category),
            TableColumn::Source => compare_str(a.source, b.source),
            TableColumn::Strength => a
                .strength
                .partial_cmp(&b.strength)
                .unwrap_or(Ordering::Equal),
            TableColumn::ChatDate => millis_key(a.chat_millis).cmp(&millis_key(b.chat_millis)),
            TableColumn::Generated => {
                millis_key(a.generated_millis).cmp(&millis_key(b.generated_millis))
            }
        };
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Case-insensitive stand-in for the locale-aware comparison a browser
/// table gets for free; exact bytes break ties for determinism.
fn compare_str(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Undated rows compare as the oldest possible date.
fn millis_key(millis: Option<i64>) -> i64 {
    millis.unwrap_or(i64::MIN)
}

// ── Entry points ──

/// Filter then sort the insight table. The sort is stable, so equal rows
/// keep load order.
pub fn table_rows<'a>(
    insights: &'a [Insight],
    filter: &TableFilter,
    sort: &TableSort,
) -> Vec<TableRow<'a>> {
    let mut rows: Vec<TableRow> = insights
        .iter()
        .map(TableRow::project)
        .filter(|row| filter.accepts(row))
        .collect();
    rows.sort_by(|a, b| sort.compare(a, b));
    rows
}

/// Distinct non-empty sources across all insights, for the filter menu.
pub fn distinct_sources(insights: &[Insight]) -> Vec<String> {
    insights
        .iter()
        .map(|i| i.source())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
