use anyhow::bail;
use muninn_aggregate::{rank_category, topic_weights, RankOrder};
use muninn_core::clock;
use muninn_ingest::Snapshot;

pub fn execute(
    snapshot: &Snapshot,
    category: Option<&str>,
    order: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let Some(category) = category else {
        if order.is_some() {
            bail!("--order needs --category: rankings are per topic");
        }
        return cloud(snapshot, json);
    };

    let order = match order {
        Some(raw) => raw.parse::<RankOrder>()?,
        None => RankOrder::Recency,
    };
    let ranked = rank_category(&snapshot.insights, category, order);

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No insights in category {category}.");
        return Ok(());
    }
    for insight in ranked {
        let date = insight
            .chat_timestamp
            .as_deref()
            .map(clock::short_date)
            .unwrap_or("-");
        println!(
            "{:>4.2}  {:<10} {}",
            insight.strength_or_zero(),
            date,
            insight.content
        );
    }
    Ok(())
}

fn cloud(snapshot: &Snapshot, json: bool) -> anyhow::Result<()> {
    let topics = topic_weights(&snapshot.insights);

    if json {
        println!("{}", serde_json::to_string_pretty(&topics)?);
        return Ok(());
    }

    if topics.is_empty() {
        println!("No categorized insights yet.");
        return Ok(());
    }
    for topic in topics {
        println!(
            "{:<20} {:>4}  x{:.2}",
            topic.category, topic.count, topic.weight
        );
    }
    Ok(())
}
