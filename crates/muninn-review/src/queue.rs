use serde::{Deserialize, Serialize};

use muninn_core::Insight;

/// Where one queue item sits in the review pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    ApprovedEdited,
    Rejected,
    Skipped,
}

/// A reviewer decision on the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    /// Approve with revised wording. The revision lives in the queue
    /// outcome only; nothing is written back to the store.
    ApproveEdited(String),
    Reject,
    Skip,
}

#[derive(Debug, Clone)]
pub struct QueueItem {
    pub insight: Insight,
    pub status: ReviewStatus,
    pub revised: Option<String>,
}

/// Linear review pass over the pending insights.
///
/// The cursor only moves forward: every decision, skip included, resolves
/// the current item and advances. Items the reviewer never reaches stay
/// pending, which is also how an early exit looks in the outcome.
#[derive(Debug, Clone)]
pub struct ReviewQueue {
    items: Vec<QueueItem>,
    cursor: usize,
}

/// Tally of a finished or abandoned review pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewOutcome {
    pub approved: usize,
    pub approved_edited: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub pending: usize,
}

impl ReviewQueue {
    /// Queue items are snapshots of the pending insights at the moment
    /// the pass starts; a reload does not disturb a pass in flight.
    pub fn new(pending: Vec<&Insight>) -> Self {
        let items = pending
            .into_iter()
            .cloned()
            .map(|insight| QueueItem {
                insight,
                status: ReviewStatus::Pending,
                revised: None,
            })
            .collect();
        ReviewQueue { items, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    /// Zero-based position of the item under review.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The item under review, `None` once the pass is finished.
    pub fn current(&self) -> Option<&QueueItem> {
        self.items.get(self.cursor)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// Resolve the current item and advance. Returns false when the pass
    /// is already finished.
    pub fn apply(&mut self, action: ReviewAction) -> bool {
        let Some(item) = self.items.get_mut(self.cursor) else {
            return false;
        };
        match action {
            ReviewAction::Approve => item.status = ReviewStatus::Approved,
            ReviewAction::ApproveEdited(text) => {
                item.status = ReviewStatus::ApprovedEdited;
                item.revised = Some(text);
            }
            ReviewAction::Reject => item.status = ReviewStatus::Rejected,
            ReviewAction::Skip => item.status = ReviewStatus::Skipped,
        }
        self.cursor += 1;
        true
    }

    pub fn outcome(&self) -> ReviewOutcome {
        let mut outcome = ReviewOutcome::default();
        for item in &self.items {
            match item.status {
                ReviewStatus::Pending => outcome.pending += 1,
                ReviewStatus::Approved => outcome.approved += 1,
                ReviewStatus::ApprovedEdited => outcome.approved_edited += 1,
                ReviewStatus::Rejected => outcome.rejected += 1,
                ReviewStatus::Skipped => outcome.skipped += 1,
            }
        }
        outcome
    }

    /// Statements the reviewer approved this pass, edits applied.
    pub fn approved_statements(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item.status {
                ReviewStatus::Approved => Some(item.insight.content.as_str()),
                ReviewStatus::ApprovedEdited => item.revised.as_deref(),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(id: &str, content: &str) -> Insight {
        serde_json::from_value(serde_json::json!({"id": id, "content": content})).unwrap()
    }

    fn queue_of(n: usize) -> (Vec<Insight>, ReviewQueue) {
        let insights: Vec<Insight> = (0..n)
            .map(|i| insight(&format!("i{i}"), &format!("statement {i}")))
            .collect();
        let queue = ReviewQueue::new(insights.iter().collect());
        (insights, queue)
    }

    #[test]
    fn decisions_advance_through_the_queue() {
        let (_insights, mut queue) = queue_of(4);
        assert_eq!(queue.current().unwrap().insight.id, "i0");

        assert!(queue.apply(ReviewAction::Approve));
        assert_eq!(queue.current().unwrap().insight.id, "i1");

        assert!(queue.apply(ReviewAction::Reject));
        assert!(queue.apply(ReviewAction::Skip));
        assert!(queue.apply(ReviewAction::ApproveEdited("tightened wording".into())));

        assert!(queue.is_finished());
        assert!(queue.current().is_none());
        assert!(!queue.apply(ReviewAction::Approve));

        let outcome = queue.outcome();
        assert_eq!(outcome.approved, 1);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.approved_edited, 1);
        assert_eq!(outcome.pending, 0);
    }

    #[test]
    fn early_exit_leaves_the_rest_pending() {
        let (_insights, mut queue) = queue_of(3);
        queue.apply(ReviewAction::Approve);
        // reviewer quits here; the queue is simply dropped
        let outcome = queue.outcome();
        assert_eq!(outcome.approved, 1);
        assert_eq!(outcome.pending, 2);
        assert!(!queue.is_finished());
    }

    #[test]
    fn approved_statements_use_the_edit_when_present() {
        let (_insights, mut queue) = queue_of(3);
        queue.apply(ReviewAction::Approve);
        queue.apply(ReviewAction::ApproveEdited("rewritten".into()));
        queue.apply(ReviewAction::Reject);
        assert_eq!(queue.approved_statements(), vec!["statement 0", "rewritten"]);
    }

    #[test]
    fn empty_queue_is_finished_immediately() {
        let queue = ReviewQueue::new(Vec::new());
        assert!(queue.is_empty());
        assert!(queue.is_finished());
        assert!(queue.current().is_none());
    }

    #[test]
    fn skipping_never_revisits_within_a_pass() {
        let (_insights, mut queue) = queue_of(2);
        queue.apply(ReviewAction::Skip);
        queue.apply(ReviewAction::Skip);
        assert!(queue.is_finished());
        assert_eq!(queue.outcome().skipped, 2);
    }
}
