use muninn_aggregate::{active_category_count, recent_count};
use muninn_ingest::{Snapshot, SourceStatus, StorePaths};
use muninn_review::pending_insights;
use time::OffsetDateTime;

pub fn execute(paths: &StorePaths, snapshot: &Snapshot, json: bool) -> anyhow::Result<()> {
    let report = &snapshot.report;
    let pending =
        pending_insights(&snapshot.insights, &snapshot.anchors, &snapshot.rejected).len();
    let recent = recent_count(&snapshot.insights, OffsetDateTime::now_utc());
    let categories = active_category_count(&snapshot.insights);

    if json {
        let payload = serde_json::json!({
            "data_root": paths.root,
            "report": report,
            "conversations": snapshot.conversations.len(),
            "pending_review": pending,
            "recent_7d": recent,
            "active_categories": categories,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Data root: {}", paths.root.display());
    println!("Sync index: {}", describe(&report.sync, "conversations"));
    if report.sync_failed() {
        println!("  !! conversations cannot be listed until the sync index loads");
    }
    println!(
        "Archives: {} loaded, {} failed",
        report.archives_loaded, report.archives_failed
    );
    println!("Insights: {}", describe(&report.insights, "records"));
    println!("Anchors: {}", describe(&report.anchors, "records"));
    println!("Rejected: {}", describe(&report.rejected, "records"));
    println!();
    println!("Pending review: {pending}");
    println!("Recent insights (7d): {recent}");
    println!("Active categories: {categories}");
    Ok(())
}

fn describe(status: &SourceStatus, noun: &str) -> String {
    match status {
        SourceStatus::Loaded { count } => format!("{count} {noun}"),
        SourceStatus::Missing => "missing (not synced yet)".to_string(),
        SourceStatus::Failed { error } => format!("FAILED ({error})"),
    }
}
