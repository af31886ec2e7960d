//! Overview dashboard: summary cards and the server list

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use mcpdeck_core::mcp::TransportKind;
use mcpdeck_core::overview::ServerCard;

use super::status_style;
use crate::app::App;

pub(super) fn render(frame: &mut Frame, area: Rect, app: &App) {
    let [cards, list] = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    render_summary(frame, cards, app);
    render_server_list(frame, list, app);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let summary = app.console.summary();
    let stats = [
        ("Total Servers", summary.total, Color::Cyan),
        ("Stdio Servers", summary.stdio, Color::Magenta),
        ("SSE Servers", summary.sse, Color::Blue),
    ];

    let areas = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    for ((title, count, color), card) in stats.into_iter().zip(areas.iter()) {
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let value = Paragraph::new(Line::from(Span::styled(
            count.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(value, *card);
    }
}

fn render_server_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" MCP Servers ")
        .borders(Borders::ALL);

    let cards = app.console.cards();
    if cards.is_empty() {
        let empty = Paragraph::new(vec![
            Line::raw(""),
            Line::from("No servers configured"),
            Line::from(Span::styled(
                "Press 'a' to add your first server",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = cards.iter().map(|card| card_item(card, app)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item<'a>(card: &'a ServerCard, app: &App) -> ListItem<'a> {
    let badge_color = match card.transport {
        TransportKind::Stdio => Color::Magenta,
        TransportKind::Sse => Color::Blue,
    };

    let mut title = vec![
        Span::styled(card.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", card.transport),
            Style::default().fg(badge_color),
        ),
    ];
    if let Some(status) = app.console.chat().status(&card.name) {
        title.push(Span::raw(" "));
        title.push(Span::styled(status.to_string(), status_style(status)));
    }

    ListItem::new(vec![
        Line::from(title),
        Line::from(Span::styled(
            format!("  {}", card.description),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("  {}", card.detail),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}
