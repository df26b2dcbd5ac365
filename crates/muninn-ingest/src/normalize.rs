//! Shape-tolerant conversion of raw parsed JSON into typed collections.
//!
//! The synthesis tool has emitted its insights file in several shapes over
//! time. All are accepted; the resolution chain tries each in a fixed order
//! and malformed input falls through to an empty sequence, never an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use muninn_core::{Anchor, Insight, RejectedRecord};

/// Normalize the insights collection. Accepted shapes, tried in order:
/// a bare array, `{"insights": [...]}`, `{"insights": {id: record}}`,
/// and a bare `{id: record}` map. For map shapes the key becomes the
/// record id when the record itself carries none.
pub fn normalize_insights(raw: &Value) -> Vec<Insight> {
    if let Some(items) = raw.as_array() {
        return from_records(items);
    }
    let Some(obj) = raw.as_object() else {
        return Vec::new();
    };
    match obj.get("insights") {
        Some(Value::Array(items)) => from_records(items),
        Some(Value::Object(map)) => from_map(map),
        _ => from_map(obj),
    }
}

/// Normalize the anchors collection: `{"anchors": [...]}` or a bare array.
pub fn normalize_anchors(raw: &Value) -> Vec<Anchor> {
    wrapped_records(raw, "anchors")
}

/// Normalize the rejected collection: `{"rejected": [...]}` or a bare array.
pub fn normalize_rejected(raw: &Value) -> Vec<RejectedRecord> {
    wrapped_records(raw, "rejected")
}

fn wrapped_records<T: DeserializeOwned>(raw: &Value, key: &str) -> Vec<T> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get(key) {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    from_records(items)
}

/// Deserialize each record independently; records that do not fit the
/// schema are skipped, they never poison the rest of the collection.
fn from_records<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(record) => out.push(record),
            Err(err) => tracing::debug!(%err, "skipping malformed record"),
        }
    }
    out
}

fn from_map(map: &serde_json::Map<String, Value>) -> Vec<Insight> {
    let mut out = Vec::with_capacity(map.len());
    for (key, value) in map {
        match serde_json::from_value::<Insight>(value.clone()) {
            Ok(mut insight) => {
                if insight.id.is_empty() {
                    insight.id = key.clone();
                }
                out.push(insight);
            }
            Err(err) => tracing::debug!(key, %err, "skipping malformed record"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ids(insights: &[Insight]) -> BTreeSet<String> {
        insights.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn all_four_shapes_yield_the_same_records() {
        let a = serde_json::json!({"id": "i1", "content": "one", "strength": 0.9});
        let b = serde_json::json!({"id": "i2", "content": "two"});

        let as_array = serde_json::json!([a, b]);
        let as_wrapper = serde_json::json!({"insights": [a, b]});
        let as_inner_map = serde_json::json!({"insights": {"i1": a, "i2": b}});
        let as_bare_map = serde_json::json!({"i1": a, "i2": b});

        let expected: BTreeSet<String> = ["i1".to_string(), "i2".to_string()].into();
        for shape in [&as_array, &as_wrapper, &as_inner_map, &as_bare_map] {
            let got = normalize_insights(shape);
            assert_eq!(got.len(), 2);
            assert_eq!(ids(&got), expected);
        }
    }

    #[test]
    fn map_key_becomes_id_when_record_has_none() {
        let raw = serde_json::json!({
            "insights": {
                "from-key": {"content": "no id inside"},
                "ignored-key": {"id": "explicit", "content": "has id"}
            }
        });
        let got = normalize_insights(&raw);
        assert_eq!(
            ids(&got),
            ["explicit".to_string(), "from-key".to_string()].into()
        );
    }

    #[test]
    fn array_order_is_preserved() {
        let raw = serde_json::json!([
            {"id": "z", "content": "last alphabetically, first positionally"},
            {"id": "a", "content": "first alphabetically"}
        ]);
        let got = normalize_insights(&raw);
        assert_eq!(got[0].id, "z");
        assert_eq!(got[1].id, "a");
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let raw = serde_json::json!([
            {"id": "good", "content": "fine"},
            "not an object",
            42
        ]);
        let got = normalize_insights(&raw);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "good");
    }

    #[test]
    fn unusable_shapes_yield_empty() {
        assert!(normalize_insights(&serde_json::json!(null)).is_empty());
        assert!(normalize_insights(&serde_json::json!("just a string")).is_empty());
        assert!(normalize_insights(&serde_json::json!(7)).is_empty());
        // insights key present but unusable falls through to the bare-map
        // branch, where the string value fails to deserialize
        assert!(normalize_insights(&serde_json::json!({"insights": "oops"})).is_empty());
    }

    #[test]
    fn anchors_accept_wrapper_and_bare_array() {
        let record = serde_json::json!({"id": "a1", "statement": "s"});
        let wrapped = serde_json::json!({"anchors": [record]});
        let bare = serde_json::json!([record]);
        assert_eq!(normalize_anchors(&wrapped).len(), 1);
        assert_eq!(normalize_anchors(&bare).len(), 1);
        assert!(normalize_anchors(&serde_json::json!({"other": []})).is_empty());
    }

    #[test]
    fn rejected_accepts_wrapper_and_bare_array() {
        let wrapped = serde_json::json!({"rejected": [{"insight_id": "i2"}]});
        let got = normalize_rejected(&wrapped);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].insight_id, "i2");
        assert!(normalize_rejected(&serde_json::json!(null)).is_empty());
    }
}
