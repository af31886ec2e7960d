//! Chat screen: service tabs, connection badges, transcript and input

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use mcpdeck_core::chat::{ChatMessage, ChatSession};

use super::status_style;
use crate::app::App;

pub(super) fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chat = app.console.chat();
    let [tabs, statuses, transcript, input] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(area);

    render_tabs(frame, tabs, chat);
    render_statuses(frame, statuses, chat);
    render_transcript(frame, transcript, chat);
    render_input(frame, input, app);
}

fn render_tabs(frame: &mut Frame, area: Rect, chat: &ChatSession) {
    let tabs = chat.tabs();
    let selected = tabs
        .iter()
        .position(|tab| tab == chat.active_tab())
        .unwrap_or(0);
    let titles: Vec<String> = tabs.iter().map(|tab| tab.label().to_string()).collect();

    let widget = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(widget, area);
}

fn render_statuses(frame: &mut Frame, area: Rect, chat: &ChatSession) {
    let mut spans = Vec::new();
    for (name, status) in chat.statuses() {
        spans.push(Span::raw(format!("{} ", name)));
        spans.push(Span::styled(format!("({})  ", status), status_style(status)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_transcript(frame: &mut Frame, area: Rect, chat: &ChatSession) {
    let block = Block::default()
        .title(format!(" {} ", chat.active_tab().label()))
        .borders(Borders::ALL);

    let lines: Vec<Line> = chat.visible_messages().flat_map(message_lines).collect();
    if lines.is_empty() {
        let hint = if chat.connected_count() == 0 {
            "Waiting for servers to connect..."
        } else {
            "Send a message to the connected servers"
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Newest at the bottom
    let height = block.inner(area).height as usize;
    let skip = lines.len().saturating_sub(height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(visible).block(block), area);
}

fn message_lines(message: &ChatMessage) -> Vec<Line<'_>> {
    let author_style = if message.origin.is_user() {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            message.timestamp.format("%H:%M:%S ").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(message.origin.label(), author_style),
    ])];
    lines.extend(
        message
            .text
            .lines()
            .map(|line| Line::from(format!("  {}", line))),
    );
    lines
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let can_send = app.console.chat().can_send(&app.input);
    let border = if can_send { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(" Message ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let text = if app.input.is_empty() {
        Span::styled(
            "Type a message (try: help, status, version, events)",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(format!("{}_", app.input))
    };
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
}
