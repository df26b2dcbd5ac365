use std::collections::BTreeSet;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, BarChart, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph,
    Tabs, Wrap,
};
use ratatui::Frame;
use time::OffsetDateTime;

use muninn_aggregate::{
    active_category_count, recent_count, timeline_points, topic_weights,
    Direction as SortDirection,
};
use muninn_core::clock;
use muninn_ingest::SourceStatus;
use muninn_similarity::similar_anchors;
use muninn_xref::{conversations_for_insight, insights_for_conversation};

use crate::app::{App, InputMode, Tab};

/// Render the full dashboard frame.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(5),    // active tab
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    render_tab_bar(f, app, chunks[0]);
    match app.tab {
        Tab::Conversations => render_conversations(f, app, chunks[1]),
        Tab::Insights => render_insights(f, app, chunks[1]),
        Tab::Anchors => render_anchors(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if app.review.is_some() {
        render_review_modal(f, app);
    }
}

fn render_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let titles = [Tab::Conversations, Tab::Insights, Tab::Anchors].map(Tab::label);
    let tabs = Tabs::new(titles.to_vec())
        .select(app.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

// ── Conversations tab ──

fn render_conversations(f: &mut Frame, app: &App, area: Rect) {
    let chunks = split_for_xref(app, area);
    let rows = app.conversation_rows();

    let filter_label = match app.conversations.tool_filter {
        Some(tool) => tool.as_str(),
        None => "all",
    };
    let order_label = if app.conversations.newest_first {
        "newest"
    } else {
        "oldest"
    };
    let mut title = format!(" Conversations ({}) [{filter_label}, {order_label}] ", rows.len());
    if app.snapshot.report.archives_failed > 0 {
        title.push_str(&format!("!{} archives ", app.snapshot.report.archives_failed));
    }
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .skip(app.conversations.selected)
        .map(|(i, conv)| {
            let style = if i == app.conversations.selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let updated = conv
                .updated
                .as_deref()
                .map(clock::short_date)
                .unwrap_or("-");
            let line = format!(
                " {:<7} {:<10} {:>4} msg  {}",
                conv.tool.as_str(),
                updated,
                conv.message_count(),
                conv.display_title()
            );
            ListItem::new(Line::from(Span::styled(line, style)))
        })
        .collect();
    f.render_widget(List::new(items).block(block), chunks[0]);

    if app.show_xref {
        render_conversation_xref(f, app, chunks[1]);
    }
}

fn render_conversation_xref(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Related insights ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(conv) = app.selected_conversation() else {
        f.render_widget(Paragraph::new(" no selection").block(block), area);
        return;
    };
    let related = insights_for_conversation(&app.snapshot.insights, &conv.id);
    if related.is_empty() {
        // Empty result means the panel has nothing to say for this row.
        f.render_widget(
            Paragraph::new(" no insights cite this conversation").block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = related
        .iter()
        .map(|insight| {
            ListItem::new(Line::from(format!(
                " {:>4.2}  [{}] {}",
                insight.strength_or_zero(),
                insight.display_category(),
                insight.content
            )))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

// ── Insights tab ──

fn render_insights(f: &mut Frame, app: &App, area: Rect) {
    let chunks = split_for_xref(app, area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // charts
            Constraint::Min(5),     // table
        ])
        .split(chunks[0]);
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(left[0]);

    render_topic_chart(f, app, charts[0]);
    render_timeline_chart(f, app, charts[1]);
    render_insight_table(f, app, left[1]);

    if app.show_xref {
        render_insight_xref(f, app, chunks[1]);
    }
}

fn render_topic_chart(f: &mut Frame, app: &App, area: Rect) {
    let topics = topic_weights(&app.snapshot.insights);
    let block = Block::default().title(" Topics ").borders(Borders::ALL);

    if topics.is_empty() {
        f.render_widget(Paragraph::new(" no categorized insights").block(block), area);
        return;
    }

    let pairs: Vec<(&str, u64)> = topics
        .iter()
        .map(|t| (t.category.as_str(), t.count as u64))
        .collect();
    let chart = BarChart::default()
        .block(block)
        .data(pairs.as_slice())
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(chart, area);
}

fn render_timeline_chart(f: &mut Frame, app: &App, area: Rect) {
    let points = timeline_points(&app.snapshot.insights);
    let block = Block::default().title(" Timeline ").borders(Borders::ALL);

    if points.is_empty() {
        f.render_widget(Paragraph::new(" no dated insights").block(block), area);
        return;
    }

    // One horizontal band per category, x in days.
    let bands: Vec<&str> = points
        .iter()
        .map(|p| p.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let day = 86_400_000_f64;
    let data: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| {
            let band = bands.iter().position(|c| *c == p.category)? as f64;
            Some((p.ts_millis as f64 / day, band))
        })
        .collect();

    let mut min_x = f64::MAX;
    let mut max_x = f64::MIN;
    for (x, _) in &data {
        min_x = min_x.min(*x);
        max_x = max_x.max(*x);
    }
    if max_x - min_x < 1.0 {
        min_x -= 0.5;
        max_x += 0.5;
    }

    let earliest = points.iter().min_by_key(|p| p.ts_millis);
    let latest = points.iter().max_by_key(|p| p.ts_millis);
    let x_labels: Vec<String> = match (earliest, latest) {
        (Some(a), Some(b)) => vec![
            clock::short_date(&a.ts).to_string(),
            clock::short_date(&b.ts).to_string(),
        ],
        _ => Vec::new(),
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Yellow))
        .data(&data);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([min_x, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([-0.5, bands.len() as f64 - 0.5])
                .labels(bands.iter().map(|b| b.to_string())),
        );
    f.render_widget(chart, area);
}

fn render_insight_table(f: &mut Frame, app: &App, area: Rect) {
    let rows = app.insight_rows();

    let dir = match app.insights.sort.direction {
        SortDirection::Ascending => "^",
        SortDirection::Descending => "v",
    };
    let mut badges = format!("sort:{}{dir}", app.insights.sort.column.label());
    if let Some(category) = &app.insights.filter.category {
        badges.push_str(&format!(" cat:{category}"));
    }
    if let Some(source) = &app.insights.filter.source {
        badges.push_str(&format!(" src:{source}"));
    }
    let title = format!(" Insights ({}) {badges} ", rows.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let header = format!(
        " {:>4}  {:<10} {:<14} {:<12} {}",
        "str", "date", "category", "source", "content"
    );
    let mut items = vec![ListItem::new(Line::from(Span::styled(
        header,
        Style::default().fg(Color::DarkGray),
    )))];
    items.extend(
        rows.iter()
            .enumerate()
            .skip(app.insights.selected)
            .map(|(i, row)| {
                let style = if i == app.insights.selected {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let date = row.chat_timestamp.map(clock::short_date).unwrap_or("-");
                let source = if row.source.is_empty() { "-" } else { row.source };
                let line = format!(
                    " {:>4.2}  {:<10} {:<14} {:<12} {}",
                    row.strength, date, row.category, source, row.content
                );
                ListItem::new(Line::from(Span::styled(line, style)))
            }),
    );
    f.render_widget(List::new(items).block(block), area);
}

fn render_insight_xref(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Source conversations ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(insight) = app.selected_insight() else {
        f.render_widget(Paragraph::new(" no selection").block(block), area);
        return;
    };
    let related = conversations_for_insight(&app.snapshot.conversations, insight);
    if related.is_empty() {
        f.render_widget(
            Paragraph::new(" evidence matches no synced conversation").block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = related
        .iter()
        .map(|conv| {
            ListItem::new(Line::from(format!(
                " {:<7} {}",
                conv.tool.as_str(),
                conv.display_title()
            )))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

// ── Anchors tab ──

fn render_anchors(f: &mut Frame, app: &App, area: Rect) {
    let groups = app.anchor_groups();
    let total: usize = groups.values().map(Vec::len).sum();

    let filter_label = app.anchors.category_filter.as_deref().unwrap_or("all");
    let title = format!(" Anchors ({total}) [{filter_label}] ");
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines: Vec<ListItem> = Vec::new();
    let mut selected_line = 0usize;
    let mut idx = 0usize;
    for (category, anchors) in &groups {
        lines.push(ListItem::new(Line::from(Span::styled(
            format!(" {category} ({})", anchors.len()),
            Style::default().fg(Color::Magenta),
        ))));
        for anchor in anchors {
            if idx == app.anchors.selected {
                selected_line = lines.len();
            }
            let style = if idx == app.anchors.selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let origin = match anchor.elevated_from() {
                Some(insight_id) => format!("  <- {insight_id}"),
                None => String::new(),
            };
            lines.push(ListItem::new(Line::from(Span::styled(
                format!("   - {}{origin}", anchor.statement),
                style,
            ))));
            idx += 1;
        }
    }

    // Keep the selected anchor on screen; headers scroll with it.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = if visible == 0 {
        0
    } else {
        selected_line.saturating_sub(visible - 1)
    };
    let items: Vec<ListItem> = lines.into_iter().skip(skip).collect();
    f.render_widget(List::new(items).block(block), area);
}

// ── Chrome ──

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let SourceStatus::Failed { error } = &app.snapshot.report.sync {
        (
            format!(" SYNC INDEX FAILED: {error}"),
            Style::default().fg(Color::White).bg(Color::Red),
        )
    } else if let Some(feedback) = &app.feedback {
        (
            format!(" {feedback}"),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else {
        let recent = recent_count(&app.snapshot.insights, OffsetDateTime::now_utc());
        let categories = active_category_count(&app.snapshot.insights);
        let pending = app.pending_count();
        (
            format!(
                " muninn | {recent} new (7d) | {categories} categories | {pending} pending | {}",
                hints_for(app)
            ),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )
    };
    let bar = Paragraph::new(Line::from(Span::styled(text, style)));
    f.render_widget(bar, area);
}

fn hints_for(app: &App) -> String {
    if app.input == InputMode::Search {
        return format!("search: {}_ (Enter done)", app.active_search());
    }
    let common = "Tab:switch  j/k:move  /:search  x:xref  r:review  q:quit";
    match app.tab {
        Tab::Conversations => format!("{common}  t:tool  o:order"),
        Tab::Insights => format!("{common}  s/S:sort  c:category  o:source"),
        Tab::Anchors => format!("{common}  c:category"),
    }
}

fn render_review_modal(f: &mut Frame, app: &App) {
    let Some(queue) = &app.review else {
        return;
    };
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Review {}/{} ", queue.cursor() + 1, queue.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines: Vec<Line> = Vec::new();
    if let Some(item) = queue.current() {
        lines.push(Line::from(Span::styled(
            format!(" {}", item.insight.content),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let source = item.insight.source();
        lines.push(Line::from(format!(
            " category: {}   strength: {:.2}   source: {}",
            item.insight.display_category(),
            item.insight.strength_or_zero(),
            if source.is_empty() { "-" } else { source },
        )));
        lines.push(Line::from(""));

        let similar = similar_anchors(&app.snapshot.anchors, &item.insight.content);
        if !similar.is_empty() {
            lines.push(Line::from(Span::styled(
                " similar anchors already exist:",
                Style::default().fg(Color::Red),
            )));
            for hit in similar.iter().take(3) {
                lines.push(Line::from(format!(
                    "   {:.2}  {}",
                    hit.similarity, hit.anchor.statement
                )));
            }
            lines.push(Line::from(""));
        }

        if app.input == InputMode::Edit {
            lines.push(Line::from(Span::styled(
                format!(" edit: {}_", app.edit_buffer),
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::from(Span::styled(
                " Enter:approve edited  Esc:back",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                " a:approve  e:edit+approve  d:reject  s:skip  Esc:stop",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn split_for_xref(app: &App, area: Rect) -> std::rc::Rc<[Rect]> {
    if app.show_xref {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area)
    } else {
        Layout::default()
            .constraints([Constraint::Percentage(100)])
            .split(area)
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
