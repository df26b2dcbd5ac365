use muninn_aggregate::{table_rows, Direction, TableColumn, TableFilter, TableSort};
use muninn_core::clock;
use muninn_ingest::Snapshot;

pub struct InsightsParams<'a> {
    pub category: Option<String>,
    pub source: Option<String>,
    pub search: Option<String>,
    pub sort: Option<&'a str>,
    pub desc: bool,
    pub limit: usize,
    pub json: bool,
}

pub fn execute(snapshot: &Snapshot, params: InsightsParams<'_>) -> anyhow::Result<()> {
    let filter = TableFilter {
        category: params.category,
        source: params.source,
        search: params.search.unwrap_or_default(),
    };
    let sort = resolve_sort(params.sort, params.desc)?;

    let mut rows = table_rows(&snapshot.insights, &filter, &sort);
    if params.limit > 0 {
        rows.truncate(params.limit);
    }

    if params.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No insights match.");
        return Ok(());
    }
    for row in &rows {
        let date = row.chat_timestamp.map(clock::short_date).unwrap_or("-");
        let source = if row.source.is_empty() {
            "-"
        } else {
            row.source
        };
        println!(
            "{:>4.2}  {:<10} {:<14} {:<12} {}",
            row.strength, date, row.category, source, row.content
        );
    }
    Ok(())
}

/// `--sort <column>` starts ascending and `--desc` flips it; without
/// `--sort` the table keeps its default order, newest chat date first.
fn resolve_sort(sort: Option<&str>, desc: bool) -> anyhow::Result<TableSort> {
    let mut resolved = match sort {
        Some(column) => TableSort {
            column: column.parse::<TableColumn>()?,
            direction: Direction::Ascending,
        },
        None => TableSort::default(),
    };
    if desc {
        resolved.direction = Direction::Descending;
    }
    Ok(resolved)
}
