//! Bi-directional cross-reference resolution between conversations and
//! insights, via the insights' weak evidence references.
//!
//! Both directions are pure lookups over the loaded snapshot. They never
//! fail: absence of any related record is an empty result, which callers
//! read as "no panel to show".

use std::cmp::Ordering;

use muninn_core::{Conversation, EvidenceRef, Insight};

/// Most related records returned per lookup.
pub const MAX_MATCHES: usize = 5;

// ── Conversation → insights ──

/// Insights whose evidence cites the given conversation, strongest first.
///
/// The citation test is a plain substring check of the conversation id
/// against each full evidence string. Evidence fragments may be truncated
/// forms of the id, so an exact-key comparison would miss real links.
/// Equal strengths keep their load order; the sort must stay stable.
pub fn insights_for_conversation<'a>(
    insights: &'a [Insight],
    conversation_id: &str,
) -> Vec<&'a Insight> {
    if conversation_id.is_empty() {
        return Vec::new();
    }
    let mut matches: Vec<&Insight> = insights
        .iter()
        .filter(|i| i.evidence.iter().any(|e| e.contains(conversation_id)))
        .collect();
    matches.sort_by(|a, b| {
        b.strength_or_zero()
            .partial_cmp(&a.strength_or_zero())
            .unwrap_or(Ordering::Equal)
    });
    matches.truncate(MAX_MATCHES);
    matches
}

// ── Insight → conversations ──

/// Conversations cited by the insight's evidence, in evidence order.
///
/// Each evidence entry contributes at most one conversation: the first in
/// load order whose id contains the entry's fragment or is contained by
/// it. Entries without a `/` separator carry no fragment and are skipped.
pub fn conversations_for_insight<'a>(
    conversations: &'a [Conversation],
    insight: &Insight,
) -> Vec<&'a Conversation> {
    let mut matches = Vec::new();
    for raw in &insight.evidence {
        let Some(evidence) = EvidenceRef::parse(raw) else {
            continue;
        };
        if let Some(conv) = conversations
            .iter()
            .find(|c| evidence.matches_conversation(&c.id))
        {
            matches.push(conv);
            if matches.len() >= MAX_MATCHES {
                break;
            }
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(v: serde_json::Value) -> Insight {
        serde_json::from_value(v).unwrap()
    }

    fn conversation(id: &str) -> Conversation {
        serde_json::from_value(serde_json::json!({"id": id, "tool": "claude"})).unwrap()
    }

    #[test]
    fn evidence_citing_a_conversation_links_back() {
        let insights = vec![insight(serde_json::json!({
            "id": "x1",
            "content": "prefers dark mode",
            "category": "preferences",
            "strength": 0.9,
            "chat_timestamp": "2025-01-01T00:00:00Z",
            "evidence": ["claude-cli/conv-abc123"]
        }))];

        let got = insights_for_conversation(&insights, "conv-abc123");
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "x1");
    }

    #[test]
    fn short_conversation_ids_match_inside_longer_fragments() {
        let insights = vec![insight(serde_json::json!({
            "id": "x1",
            "content": "c",
            "evidence": ["claude-cli/conv-abc123xyz"]
        }))];
        assert_eq!(insights_for_conversation(&insights, "abc123").len(), 1);
        assert!(insights_for_conversation(&insights, "conv-zzz").is_empty());
    }

    #[test]
    fn results_are_strongest_first_and_ties_keep_load_order() {
        let insights = vec![
            insight(serde_json::json!({"id": "weak", "content": "c", "strength": 0.2,
                "evidence": ["claude/conv-1"]})),
            insight(serde_json::json!({"id": "tie-a", "content": "c", "strength": 0.5,
                "evidence": ["claude/conv-1"]})),
            insight(serde_json::json!({"id": "strong", "content": "c", "strength": 0.9,
                "evidence": ["claude/conv-1"]})),
            insight(serde_json::json!({"id": "tie-b", "content": "c", "strength": 0.5,
                "evidence": ["claude/conv-1"]})),
            insight(serde_json::json!({"id": "unrated", "content": "c",
                "evidence": ["claude/conv-1"]})),
        ];

        let got: Vec<&str> = insights_for_conversation(&insights, "conv-1")
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(got, vec!["strong", "tie-a", "tie-b", "weak", "unrated"]);
    }

    #[test]
    fn both_directions_cap_at_five() {
        let insights: Vec<Insight> = (0..8)
            .map(|n| {
                insight(serde_json::json!({
                    "id": format!("i{n}"),
                    "content": "c",
                    "evidence": ["claude/conv-1"]
                }))
            })
            .collect();
        assert_eq!(insights_for_conversation(&insights, "conv-1").len(), MAX_MATCHES);

        let conversations: Vec<Conversation> =
            (0..8).map(|n| conversation(&format!("conv-{n}"))).collect();
        let wide = insight(serde_json::json!({
            "id": "wide",
            "content": "c",
            "evidence": [
                "claude/conv-0", "claude/conv-1", "claude/conv-2", "claude/conv-3",
                "claude/conv-4", "claude/conv-5", "claude/conv-6", "claude/conv-7"
            ]
        }));
        assert_eq!(conversations_for_insight(&conversations, &wide).len(), MAX_MATCHES);
    }

    #[test]
    fn repeated_lookups_return_identical_sequences() {
        let insights = vec![
            insight(serde_json::json!({"id": "a", "content": "c", "strength": 0.5,
                "evidence": ["claude/conv-1"]})),
            insight(serde_json::json!({"id": "b", "content": "c", "strength": 0.5,
                "evidence": ["claude/conv-1"]})),
        ];
        let first: Vec<&str> = insights_for_conversation(&insights, "conv-1")
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        let second: Vec<&str> = insights_for_conversation(&insights, "conv-1")
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn each_evidence_entry_contributes_one_conversation() {
        // Both conversations contain the fragment; only the first in load
        // order may be contributed by this single entry.
        let conversations = vec![conversation("conv-abc-one"), conversation("conv-abc-two")];
        let i = insight(serde_json::json!({
            "id": "x",
            "content": "c",
            "evidence": ["claude/conv-abc"]
        }));
        let got = conversations_for_insight(&conversations, &i);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "conv-abc-one");
    }

    #[test]
    fn matches_concatenate_in_evidence_order() {
        let conversations = vec![
            conversation("conv-alpha"),
            conversation("conv-beta"),
            conversation("conv-gamma"),
        ];
        let i = insight(serde_json::json!({
            "id": "x",
            "content": "c",
            "evidence": ["claude/conv-gamma", "gemini/missing", "claude/conv-alpha"]
        }));
        let got: Vec<&str> = conversations_for_insight(&conversations, &i)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(got, vec!["conv-gamma", "conv-alpha"]);
    }

    #[test]
    fn fragment_containing_the_whole_id_still_matches() {
        let conversations = vec![conversation("abc123")];
        let i = insight(serde_json::json!({
            "id": "x",
            "content": "c",
            "evidence": ["claude/session-abc123-final"]
        }));
        assert_eq!(conversations_for_insight(&conversations, &i).len(), 1);
    }

    #[test]
    fn separatorless_evidence_is_skipped() {
        let conversations = vec![conversation("conv-1")];
        let i = insight(serde_json::json!({
            "id": "x",
            "content": "c",
            "evidence": ["conv-1"]
        }));
        assert!(conversations_for_insight(&conversations, &i).is_empty());
    }

    #[test]
    fn no_evidence_means_no_panel() {
        let conversations = vec![conversation("conv-1")];
        let i = insight(serde_json::json!({"id": "x", "content": "c"}));
        assert!(conversations_for_insight(&conversations, &i).is_empty());
        assert!(insights_for_conversation(&[], "conv-1").is_empty());
    }
}
