use muninn_aggregate::{recent_count, timeline_points, RECENT_WINDOW_DAYS};
use muninn_core::clock;
use muninn_ingest::Snapshot;
use time::OffsetDateTime;

pub fn execute(snapshot: &Snapshot, json: bool) -> anyhow::Result<()> {
    let mut points = timeline_points(&snapshot.insights);
    // chronological for the flat listing
    points.sort_by_key(|p| p.ts_millis);
    let recent = recent_count(&snapshot.insights, OffsetDateTime::now_utc());

    if json {
        let payload = serde_json::json!({
            "recent_7d": recent,
            "points": points,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if points.is_empty() {
        println!("No dated insights.");
        return Ok(());
    }
    for point in &points {
        println!("{:<12} {}", clock::short_date(&point.ts), point.category);
    }
    println!();
    println!("{recent} insights in the last {RECENT_WINDOW_DAYS} days");
    Ok(())
}
