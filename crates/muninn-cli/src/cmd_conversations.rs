use muninn_core::{clock, Tool};
use muninn_ingest::Snapshot;
use muninn_view::ConversationsView;

pub fn execute(
    snapshot: &Snapshot,
    tool: Option<&str>,
    search: Option<&str>,
    oldest_first: bool,
    limit: usize,
    json: bool,
) -> anyhow::Result<()> {
    let tool_filter = match tool {
        Some(raw) => Some(raw.parse::<Tool>()?),
        None => None,
    };
    let view = ConversationsView {
        tool_filter,
        search: search.unwrap_or_default().to_string(),
        newest_first: !oldest_first,
        selected: 0,
    };
    let mut rows = view.rows(&snapshot.conversations);
    if limit > 0 {
        rows.truncate(limit);
    }

    if json {
        let payload: Vec<_> = rows
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "tool": c.tool,
                    "title": c.display_title(),
                    "updated": c.updated,
                    "messages": c.message_count(),
                    "tags": c.tags,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No conversations match.");
        return Ok(());
    }
    for conv in rows {
        let updated = conv
            .updated
            .as_deref()
            .map(clock::short_date)
            .unwrap_or("-");
        println!(
            "{:<7} {:<10} {:>5} msg  {}  ({})",
            conv.tool.as_str(),
            updated,
            conv.message_count(),
            conv.display_title(),
            conv.id
        );
    }
    Ok(())
}
