use muninn_core::{clock, AnchorSource};
use muninn_ingest::Snapshot;
use muninn_view::AnchorsView;

pub fn execute(
    snapshot: &Snapshot,
    category: Option<String>,
    search: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let view = AnchorsView {
        category_filter: category,
        search: search.unwrap_or_default(),
        selected: 0,
    };
    let groups = view.groups(&snapshot.anchors);

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No anchors match.");
        return Ok(());
    }
    for (category, anchors) in &groups {
        println!("{category} ({})", anchors.len());
        for anchor in anchors {
            let created = anchor
                .created
                .as_deref()
                .map(clock::short_date)
                .unwrap_or("-");
            let origin = match &anchor.source {
                Some(AnchorSource::ElevatedFromInsight { insight_id }) => {
                    format!("insight {insight_id}")
                }
                Some(AnchorSource::Manual) => "manual".to_string(),
                Some(AnchorSource::Baseline) => "baseline".to_string(),
                None => "unknown".to_string(),
            };
            println!("  - {}  [{created}, {origin}]", anchor.statement);
            if let Some(notes) = anchor.notes.as_deref().filter(|n| !n.is_empty()) {
                println!("    {notes}");
            }
        }
    }
    Ok(())
}
