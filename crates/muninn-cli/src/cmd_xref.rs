use anyhow::bail;
use muninn_ingest::Snapshot;
use muninn_xref::{conversations_for_insight, insights_for_conversation};

/// Conversation side of the panel: which insights cite this conversation.
pub fn conversation(snapshot: &Snapshot, id: &str, json: bool) -> anyhow::Result<()> {
    let related = insights_for_conversation(&snapshot.insights, id);

    if json {
        println!("{}", serde_json::to_string_pretty(&related)?);
        return Ok(());
    }

    if related.is_empty() {
        println!("No insights cite {id}.");
        return Ok(());
    }
    for insight in related {
        println!(
            "{:>4.2}  [{}] {}",
            insight.strength_or_zero(),
            insight.display_category(),
            insight.content
        );
    }
    Ok(())
}

/// Insight side of the panel: which synced conversations its evidence matches.
pub fn insight(snapshot: &Snapshot, id: &str, json: bool) -> anyhow::Result<()> {
    let Some(insight) = snapshot.insights.iter().find(|i| i.id == id) else {
        bail!("no insight with id {id}");
    };
    let related = conversations_for_insight(&snapshot.conversations, insight);

    if json {
        let payload: Vec<_> = related
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "tool": c.tool,
                    "title": c.display_title(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if related.is_empty() {
        println!("No synced conversations match the evidence of {id}.");
        return Ok(());
    }
    for conv in related {
        println!(
            "{:<7} {}  ({})",
            conv.tool.as_str(),
            conv.display_title(),
            conv.id
        );
    }
    Ok(())
}
