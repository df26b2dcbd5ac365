use muninn_core::clock;
use muninn_ingest::Snapshot;
use muninn_review::pending_insights;

pub fn execute(snapshot: &Snapshot, json: bool) -> anyhow::Result<()> {
    let pending = pending_insights(&snapshot.insights, &snapshot.anchors, &snapshot.rejected);

    if json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("Nothing pending review.");
        return Ok(());
    }
    println!("{} insights pending review:", pending.len());
    for insight in pending {
        let date = insight
            .chat_timestamp
            .as_deref()
            .map(clock::short_date)
            .unwrap_or("-");
        println!(
            "{:<10} [{}] {}",
            date,
            insight.display_category(),
            insight.content
        );
    }
    Ok(())
}
