use std::collections::HashSet;

use muninn_core::{Anchor, Insight, RejectedRecord};

/// Insights not yet anchored or rejected, in load order.
///
/// "Pending" is derived, never stored: an insight is pending exactly when
/// its id appears in no anchor's `elevated_from_insight` source and in no
/// rejected record. Recomputed whenever any of the three collections
/// change.
pub fn pending_insights<'a>(
    insights: &'a [Insight],
    anchors: &[Anchor],
    rejected: &[RejectedRecord],
) -> Vec<&'a Insight> {
    let anchored: HashSet<&str> = anchors.iter().filter_map(|a| a.elevated_from()).collect();
    let rejected_ids: HashSet<&str> = rejected.iter().map(|r| r.insight_id.as_str()).collect();
    insights
        .iter()
        .filter(|i| !anchored.contains(i.id.as_str()) && !rejected_ids.contains(i.id.as_str()))
        .collect()
}
