use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent};

use muninn_aggregate::{
    anchor_category_groups, distinct_sources, insight_category_counts, TableColumn, TableRow,
};
use muninn_core::{Anchor, Conversation, Insight, UNCATEGORIZED};
use muninn_ingest::{Snapshot, StorePaths};
use muninn_review::{pending_insights, ReviewAction, ReviewQueue};
use muninn_view::{AnchorsView, ConversationsView, InsightsView};

/// Which tab is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Conversations,
    Insights,
    Anchors,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Conversations => Tab::Insights,
            Tab::Insights => Tab::Anchors,
            Tab::Anchors => Tab::Conversations,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Conversations => Tab::Anchors,
            Tab::Insights => Tab::Conversations,
            Tab::Anchors => Tab::Insights,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Conversations => "Conversations",
            Tab::Insights => "Insights",
            Tab::Anchors => "Anchors",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Conversations => 0,
            Tab::Insights => 1,
            Tab::Anchors => 2,
        }
    }
}

/// Where key presses currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the active tab's search field.
    Search,
    /// Revising the statement of the insight under review.
    Edit,
}

/// Application state for the dashboard.
pub struct App {
    pub paths: StorePaths,
    pub snapshot: Snapshot,
    pub should_quit: bool,
    pub tab: Tab,
    pub input: InputMode,

    // Per-tab view state
    pub conversations: ConversationsView,
    pub insights: InsightsView,
    pub anchors: AnchorsView,

    pub show_xref: bool,
    pub review: Option<ReviewQueue>,
    pub edit_buffer: String,
    pub feedback: Option<String>,
}

impl App {
    pub fn new(paths: StorePaths) -> Self {
        Self {
            paths,
            snapshot: Snapshot::default(),
            should_quit: false,
            tab: Tab::Conversations,
            input: InputMode::Normal,
            conversations: ConversationsView::default(),
            insights: InsightsView::default(),
            anchors: AnchorsView::default(),
            show_xref: false,
            review: None,
            edit_buffer: String::new(),
            feedback: None,
        }
    }

    /// Reload the store from disk. Skipped while a review pass is open so
    /// the queue and the counts behind it stay stable.
    pub fn refresh(&mut self) {
        if self.review.is_some() {
            return;
        }
        self.snapshot = Snapshot::load(&self.paths);
        self.clamp_selections();
    }

    // ── Derived rows ──

    pub fn conversation_rows(&self) -> Vec<&Conversation> {
        self.conversations.rows(&self.snapshot.conversations)
    }

    pub fn insight_rows(&self) -> Vec<TableRow<'_>> {
        self.insights.rows(&self.snapshot.insights)
    }

    pub fn anchor_rows(&self) -> Vec<&Anchor> {
        self.anchors.rows(&self.snapshot.anchors)
    }

    pub fn anchor_groups(&self) -> BTreeMap<String, Vec<&Anchor>> {
        self.anchors.groups(&self.snapshot.anchors)
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.conversation_rows()
            .into_iter()
            .nth(self.conversations.selected)
    }

    pub fn selected_insight(&self) -> Option<&Insight> {
        let rows = self.insight_rows();
        let id = rows.get(self.insights.selected)?.id;
        self.snapshot.insights.iter().find(|i| i.id == id)
    }

    pub fn pending_count(&self) -> usize {
        pending_insights(
            &self.snapshot.insights,
            &self.snapshot.anchors,
            &self.snapshot.rejected,
        )
        .len()
    }

    // ── Key handling ──

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.feedback = None;
        match self.input {
            InputMode::Search => self.handle_search_key(key),
            InputMode::Edit => self.handle_edit_key(key),
            InputMode::Normal if self.review.is_some() => self.handle_review_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('/') => self.input = InputMode::Search,
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('x') => self.show_xref = !self.show_xref,
            KeyCode::Char('r') => self.open_review(),
            KeyCode::Char('t') if self.tab == Tab::Conversations => {
                self.conversations.cycle_tool_filter();
                self.clamp_selections();
            }
            KeyCode::Char('o') if self.tab == Tab::Conversations => {
                self.conversations.toggle_order();
            }
            KeyCode::Char('s') if self.tab == Tab::Insights => self.cycle_sort_column(),
            KeyCode::Char('S') if self.tab == Tab::Insights => {
                self.insights.sort.direction = self.insights.sort.direction.flipped();
            }
            KeyCode::Char('c') if self.tab == Tab::Insights => {
                let menu = self.insight_category_menu();
                self.insights.cycle_category_filter(&menu);
                self.clamp_selections();
            }
            KeyCode::Char('o') if self.tab == Tab::Insights => {
                let menu = distinct_sources(&self.snapshot.insights);
                self.insights.cycle_source_filter(&menu);
                self.clamp_selections();
            }
            KeyCode::Char('c') if self.tab == Tab::Anchors => {
                let menu = self.anchor_category_menu();
                self.anchors.cycle_category_filter(&menu);
                self.clamp_selections();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.input = InputMode::Normal,
            KeyCode::Backspace => {
                self.active_search_mut().pop();
            }
            KeyCode::Char(c) => self.active_search_mut().push(c),
            _ => {}
        }
        self.clamp_selections();
    }

    fn handle_review_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.apply_review(ReviewAction::Approve),
            KeyCode::Char('d') => self.apply_review(ReviewAction::Reject),
            KeyCode::Char('s') => self.apply_review(ReviewAction::Skip),
            KeyCode::Char('e') => {
                let current = self
                    .review
                    .as_ref()
                    .and_then(|queue| queue.current())
                    .map(|item| item.insight.content.clone());
                if let Some(content) = current {
                    self.edit_buffer = content;
                    self.input = InputMode::Edit;
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.close_review(),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            // Back to the modal, nothing applied
            KeyCode::Esc => {
                self.edit_buffer.clear();
                self.input = InputMode::Normal;
            }
            KeyCode::Enter => {
                let revised = std::mem::take(&mut self.edit_buffer);
                self.input = InputMode::Normal;
                self.apply_review(ReviewAction::ApproveEdited(revised));
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) => self.edit_buffer.push(c),
            _ => {}
        }
    }

    // ── Review pass ──

    fn open_review(&mut self) {
        let pending = pending_insights(
            &self.snapshot.insights,
            &self.snapshot.anchors,
            &self.snapshot.rejected,
        );
        if pending.is_empty() {
            self.feedback = Some("nothing pending review".to_string());
            return;
        }
        self.review = Some(ReviewQueue::new(pending));
    }

    fn apply_review(&mut self, action: ReviewAction) {
        let Some(queue) = self.review.as_mut() else {
            return;
        };
        queue.apply(action);
        if queue.is_finished() {
            self.close_review();
        }
    }

    /// Close the modal, finished or not, and surface the tally.
    fn close_review(&mut self) {
        if let Some(queue) = self.review.take() {
            let outcome = queue.outcome();
            self.feedback = Some(format!(
                "review: {} approved, {} edited, {} rejected, {} skipped, {} left pending",
                outcome.approved,
                outcome.approved_edited,
                outcome.rejected,
                outcome.skipped,
                outcome.pending
            ));
        }
        self.input = InputMode::Normal;
        self.edit_buffer.clear();
    }

    // ── Selection and filters ──

    fn select_next(&mut self) {
        match self.tab {
            Tab::Conversations => {
                let n = self.conversation_rows().len();
                self.conversations.select_next(n);
            }
            Tab::Insights => {
                let n = self.insight_rows().len();
                self.insights.select_next(n);
            }
            Tab::Anchors => {
                let n = self.anchor_rows().len();
                self.anchors.select_next(n);
            }
        }
    }

    fn select_prev(&mut self) {
        match self.tab {
            Tab::Conversations => self.conversations.select_prev(),
            Tab::Insights => self.insights.select_prev(),
            Tab::Anchors => self.anchors.select_prev(),
        }
    }

    fn clamp_selections(&mut self) {
        let n = self.conversation_rows().len();
        self.conversations.clamp_selection(n);
        let n = self.insight_rows().len();
        self.insights.clamp_selection(n);
        let n = self.anchor_rows().len();
        self.anchors.clamp_selection(n);
    }

    fn cycle_sort_column(&mut self) {
        let all = TableColumn::ALL;
        let idx = all
            .iter()
            .position(|c| *c == self.insights.sort.column)
            .unwrap_or(0);
        self.insights.click(all[(idx + 1) % all.len()]);
    }

    fn active_search_mut(&mut self) -> &mut String {
        match self.tab {
            Tab::Conversations => &mut self.conversations.search,
            Tab::Insights => &mut self.insights.filter.search,
            Tab::Anchors => &mut self.anchors.search,
        }
    }

    pub fn active_search(&self) -> &str {
        match self.tab {
            Tab::Conversations => &self.conversations.search,
            Tab::Insights => &self.insights.filter.search,
            Tab::Anchors => &self.anchors.search,
        }
    }

    fn insight_category_menu(&self) -> Vec<String> {
        let mut menu: Vec<String> = insight_category_counts(&self.snapshot.insights)
            .into_keys()
            .collect();
        if self
            .snapshot
            .insights
            .iter()
            .any(|i| i.category_label().is_none())
        {
            menu.push(UNCATEGORIZED.to_string());
        }
        menu
    }

    fn anchor_category_menu(&self) -> Vec<String> {
        anchor_category_groups(&self.snapshot.anchors)
            .into_keys()
            .collect()
    }
}
