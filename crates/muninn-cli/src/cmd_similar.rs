use muninn_ingest::Snapshot;
use muninn_similarity::{similar_anchors, SIMILARITY_THRESHOLD};

pub fn execute(snapshot: &Snapshot, text: &str, json: bool) -> anyhow::Result<()> {
    let matches = similar_anchors(&snapshot.anchors, text);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No anchor overlaps more than {SIMILARITY_THRESHOLD} with that text.");
        return Ok(());
    }
    for found in matches {
        println!(
            "{:.2}  {}  ({})",
            found.similarity, found.anchor.statement, found.anchor.id
        );
    }
    Ok(())
}
