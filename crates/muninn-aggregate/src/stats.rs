use std::collections::BTreeSet;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use muninn_core::clock;
use muninn_core::Insight;

/// Trailing window for the "recent insights" headline stat.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Count of insights whose source-conversation timestamp falls within the
/// trailing seven days of `now`. Undated and unparseable timestamps never
/// count. `now` is passed in, not sampled here, so the same snapshot and
/// clock always give the same answer.
pub fn recent_count(insights: &[Insight], now: OffsetDateTime) -> usize {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    insights
        .iter()
        .filter_map(|i| i.chat_timestamp.as_deref().and_then(clock::parse_ts))
        .filter(|ts| *ts > cutoff)
        .count()
}

/// Number of distinct categories across the loaded insights.
pub fn active_category_count(insights: &[Insight]) -> usize {
    insights
        .iter()
        .filter_map(|i| i.category_label())
        .collect::<BTreeSet<_>>()
        .len()
}

/// One timeline point per dated insight: x is the source-conversation
/// time, y is the category band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub ts: String,
    pub ts_millis: i64,
    pub category: String,
}

/// Project insights onto the timeline. Insights without a parseable
/// `chat_timestamp` have no x position and are dropped; any binning is
/// left to the plotting surface.
pub fn timeline_points(insights: &[Insight]) -> Vec<TimelinePoint> {
    insights
        .iter()
        .filter_map(|i| {
            let ts_millis = i.chat_millis()?;
            Some(TimelinePoint {
                ts: i.chat_timestamp.clone().unwrap_or_default(),
                ts_millis,
                category: i.display_category().to_string(),
            })
        })
        .collect()
}
