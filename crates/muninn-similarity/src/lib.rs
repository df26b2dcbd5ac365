//! Jaccard token-set similarity between anchor statements and candidate
//! insight text, used to warn a reviewer before they approve a duplicate.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use muninn_core::Anchor;

/// Similarity above which an anchor is flagged as a likely duplicate.
/// Strictly greater-than: exactly this value does not flag.
pub const SIMILARITY_THRESHOLD: f64 = 0.4;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Token set for comparison: lowercase, punctuation stripped, split on
/// whitespace. Tokens of three characters or fewer are noise words and
/// are dropped from both sides.
pub fn token_set(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

/// `|intersection| / |union|` over two token sets. An empty union means
/// there is nothing to compare and reads as similarity 0, never a
/// division error.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// An anchor flagged as overlapping a candidate statement, with its score.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarAnchor<'a> {
    pub anchor: &'a Anchor,
    pub similarity: f64,
}

/// Anchors whose statement overlaps the candidate text enough to warn a
/// reviewer, most similar first.
pub fn similar_anchors<'a>(anchors: &'a [Anchor], candidate: &str) -> Vec<SimilarAnchor<'a>> {
    let candidate_tokens = token_set(candidate);
    let mut matches: Vec<SimilarAnchor> = anchors
        .iter()
        .filter_map(|anchor| {
            let similarity = jaccard(&candidate_tokens, &token_set(&anchor.statement));
            (similarity > SIMILARITY_THRESHOLD).then_some(SimilarAnchor { anchor, similarity })
        })
        .collect();
    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(id: &str, statement: &str) -> Anchor {
        serde_json::from_value(serde_json::json!({"id": id, "statement": statement})).unwrap()
    }

    #[test]
    fn tokenizer_lowercases_strips_and_drops_short_tokens() {
        let tokens = token_set("Prefers Dark-mode, obviously! Not tea.");
        let expected: HashSet<String> = ["prefers", "darkmode", "obviously"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn three_eighths_overlap_is_not_flagged() {
        // overlap 3, union 8: similarity 0.375
        let anchors = vec![anchor("a1", "alpha bravo charlie delta echo")];
        let flagged = similar_anchors(&anchors, "alpha bravo charlie foxtrot golf hotel");
        assert!(flagged.is_empty());
    }

    #[test]
    fn exactly_the_threshold_is_not_flagged() {
        // overlap 2, union 5: similarity 0.4 on the nose
        let anchors = vec![anchor("a1", "aaaa bbbb cccc")];
        let flagged = similar_anchors(&anchors, "aaaa bbbb dddd eeee");
        assert!(flagged.is_empty());
    }

    #[test]
    fn clear_overlap_is_flagged_with_its_score() {
        // overlap 3, union 5: similarity 0.6
        let anchors = vec![anchor("a1", "alpha bravo charlie delta")];
        let flagged = similar_anchors(&anchors, "alpha bravo charlie echo2");
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].anchor.id, "a1");
        assert!((flagged[0].similarity - 0.6).abs() < 1e-9);
    }

    #[test]
    fn matches_sort_most_similar_first() {
        let anchors = vec![
            anchor("half", "alpha bravo charlie delta echo2 foxtrot"),
            anchor("exact", "alpha bravo charlie"),
            anchor("unrelated", "nothing shared here today"),
        ];
        let flagged = similar_anchors(&anchors, "alpha bravo charlie");
        let ids: Vec<&str> = flagged.iter().map(|m| m.anchor.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "half"]);
        assert_eq!(flagged[0].similarity, 1.0);
        assert!(flagged[1].similarity < 1.0);
    }

    #[test]
    fn all_short_tokens_mean_similarity_zero() {
        let a = token_set("the cat sat on a mat");
        let b = token_set("a big dog ran far");
        assert!(a.is_empty());
        assert_eq!(jaccard(&a, &b), 0.0);
        assert_eq!(jaccard(&a, &HashSet::new()), 0.0);

        let anchors = vec![anchor("a1", "it is so")];
        assert!(similar_anchors(&anchors, "the cat sat").is_empty());
    }
}
