use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use muninn_core::{Anchor, Insight};

/// Most insights listed in a per-topic ranking popup.
pub const RANK_LIMIT: usize = 10;

// ── Category grouping ──

/// Count of insights per category. Unlabeled insights are left out
/// entirely; the topic cloud shows labeled work only.
pub fn insight_category_counts(insights: &[Insight]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for insight in insights {
        if let Some(category) = insight.category_label() {
            *counts.entry(category.to_string()).or_insert(0usize) += 1;
        }
    }
    counts
}

/// Anchors grouped by category. Unlike the insight counts, unlabeled
/// anchors are bucketed under "uncategorized" here; the anchors view
/// always shows every anchor somewhere. Iteration order is kept within
/// each group.
pub fn anchor_category_groups<'a, I>(anchors: I) -> BTreeMap<String, Vec<&'a Anchor>>
where
    I: IntoIterator<Item = &'a Anchor>,
{
    let mut groups: BTreeMap<String, Vec<&Anchor>> = BTreeMap::new();
    for anchor in anchors {
        groups
            .entry(anchor.display_category().to_string())
            .or_default()
            .push(anchor);
    }
    groups
}

// ── Topic cloud ──

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicWeight {
    pub category: String,
    pub count: usize,
    /// Relative display size, 1.0 to 2.5.
    pub weight: f64,
}

/// Topic cloud entries, largest first. Weight scales linearly with the
/// category's share of the largest count: `1 + (count / max) * 1.5`, so
/// the biggest topic always sits at exactly 2.5.
pub fn topic_weights(insights: &[Insight]) -> Vec<TopicWeight> {
    let counts = insight_category_counts(insights);
    let max = counts.values().copied().max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    let mut topics: Vec<TopicWeight> = counts
        .into_iter()
        .map(|(category, count)| TopicWeight {
            weight: 1.0 + (count as f64 / max as f64) * 1.5,
            category,
            count,
        })
        .collect();
    topics.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category.cmp(&b.category))
    });
    topics
}

// ── Per-topic ranking ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    Recency,
    Strength,
    Weakness,
}

impl std::str::FromStr for RankOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recency" => Ok(RankOrder::Recency),
            "strength" => Ok(RankOrder::Strength),
            "weakness" => Ok(RankOrder::Weakness),
            other => anyhow::bail!("unknown rank order: {other} (expected recency, strength, or weakness)"),
        }
    }
}

/// Insights in one category, ordered for the topic popup and capped at
/// [`RANK_LIMIT`]. Recency puts undated insights last; strength and
/// weakness treat a missing strength as zero. All three orders are
/// stable, so ties keep load order.
pub fn rank_category<'a>(
    insights: &'a [Insight],
    category: &str,
    order: RankOrder,
) -> Vec<&'a Insight> {
    let mut ranked: Vec<&Insight> = insights
        .iter()
        .filter(|i| i.category_label() == Some(category))
        .collect();
    match order {
        RankOrder::Recency => {
            ranked.sort_by_key(|i| Reverse(i.chat_millis().unwrap_or(i64::MIN)));
        }
        RankOrder::Strength => ranked.sort_by(|a, b| {
            b.strength_or_zero()
                .partial_cmp(&a.strength_or_zero())
                .unwrap_or(Ordering::Equal)
        }),
        RankOrder::Weakness => ranked.sort_by(|a, b| {
            a.strength_or_zero()
                .partial_cmp(&b.strength_or_zero())
                .unwrap_or(Ordering::Equal)
        }),
    }
    ranked.truncate(RANK_LIMIT);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(v: serde_json::Value) -> Insight {
        serde_json::from_value(v).unwrap()
    }

    fn labeled(id: &str, category: &str) -> Insight {
        insight(serde_json::json!({"id": id, "content": "c", "category": category}))
    }

    #[test]
    fn counts_exclude_unlabeled_insights() {
        let insights = vec![
            labeled("i1", "preferences"),
            labeled("i2", "preferences"),
            labeled("i3", "workflow"),
            insight(serde_json::json!({"id": "i4", "content": "no category"})),
            insight(serde_json::json!({"id": "i5", "content": "empty", "category": ""})),
        ];
        let counts = insight_category_counts(&insights);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["preferences"], 2);
        assert_eq!(counts["workflow"], 1);
    }

    #[test]
    fn anchor_groups_bucket_unlabeled_under_uncategorized() {
        let anchors: Vec<Anchor> = vec![
            serde_json::from_value(serde_json::json!({"id": "a1", "statement": "s", "category": "habits"})).unwrap(),
            serde_json::from_value(serde_json::json!({"id": "a2", "statement": "s"})).unwrap(),
        ];
        let groups = anchor_category_groups(&anchors);
        assert_eq!(groups["habits"].len(), 1);
        assert_eq!(groups["uncategorized"].len(), 1);
    }

    #[test]
    fn largest_topic_weighs_exactly_two_point_five() {
        let mut insights = Vec::new();
        for n in 0..4 {
            insights.push(labeled(&format!("p{n}"), "preferences"));
        }
        for n in 0..2 {
            insights.push(labeled(&format!("w{n}"), "workflow"));
        }
        insights.push(labeled("h0", "habits"));

        let topics = topic_weights(&insights);
        assert_eq!(topics[0].category, "preferences");
        assert_eq!(topics[0].weight, 2.5);
        // strictly increasing weight with count
        assert!(topics[2].weight < topics[1].weight);
        assert!(topics[1].weight < topics[0].weight);
        // 1 + (2/4) * 1.5
        assert!((topics[1].weight - 1.75).abs() < 1e-9);
    }

    #[test]
    fn topics_order_by_count_then_name() {
        let insights = vec![
            labeled("i1", "zeta"),
            labeled("i2", "alpha"),
            labeled("i3", "alpha"),
            labeled("i4", "beta"),
        ];
        let topics = topic_weights(&insights);
        let names: Vec<&str> = topics.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "zeta"]);
    }

    #[test]
    fn no_labeled_insights_means_no_topics() {
        assert!(topic_weights(&[]).is_empty());
        let unlabeled = vec![insight(serde_json::json!({"id": "i1", "content": "c"}))];
        assert!(topic_weights(&unlabeled).is_empty());
    }

    #[test]
    fn recency_rank_puts_undated_last() {
        let insights = vec![
            insight(serde_json::json!({"id": "old", "content": "c", "category": "prefs",
                "chat_timestamp": "2025-01-01T00:00:00Z"})),
            insight(serde_json::json!({"id": "undated", "content": "c", "category": "prefs"})),
            insight(serde_json::json!({"id": "new", "content": "c", "category": "prefs",
                "chat_timestamp": "2025-03-01T00:00:00Z"})),
        ];
        let got: Vec<&str> = rank_category(&insights, "prefs", RankOrder::Recency)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(got, vec!["new", "old", "undated"]);
    }

    #[test]
    fn strength_and_weakness_are_mirror_orders() {
        let insights = vec![
            insight(serde_json::json!({"id": "mid", "content": "c", "category": "prefs", "strength": 0.5})),
            insight(serde_json::json!({"id": "top", "content": "c", "category": "prefs", "strength": 0.9})),
            insight(serde_json::json!({"id": "low", "content": "c", "category": "prefs", "strength": 0.1})),
        ];
        let strongest: Vec<&str> = rank_category(&insights, "prefs", RankOrder::Strength)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(strongest, vec!["top", "mid", "low"]);
        let weakest: Vec<&str> = rank_category(&insights, "prefs", RankOrder::Weakness)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(weakest, vec!["low", "mid", "top"]);
    }

    #[test]
    fn rankings_cap_at_ten() {
        let insights: Vec<Insight> = (0..14).map(|n| labeled(&format!("i{n}"), "prefs")).collect();
        assert_eq!(
            rank_category(&insights, "prefs", RankOrder::Strength).len(),
            RANK_LIMIT
        );
    }

    #[test]
    fn other_categories_never_leak_into_a_ranking() {
        let insights = vec![labeled("i1", "prefs"), labeled("i2", "workflow")];
        let got = rank_category(&insights, "prefs", RankOrder::Recency);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "i1");
    }

    #[test]
    fn rank_order_parses_from_str() {
        assert_eq!("strength".parse::<RankOrder>().unwrap(), RankOrder::Strength);
        assert_eq!("Recency".parse::<RankOrder>().unwrap(), RankOrder::Recency);
        assert!("newest".parse::<RankOrder>().is_err());
    }
}
