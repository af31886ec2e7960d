//! Main render/view function (View in TEA pattern)

mod chat;
mod form;
mod overview;


use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use mcpdeck_core::chat::ConnectionStatus;

use crate::app::{App, Modal, NoticeLevel, Screen};

/// Render the complete UI. Pure: reads the state, never modifies it.
pub fn view(frame: &mut Frame, app: &App) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, app);
    match app.screen {
        Screen::Overview => overview::render(frame, body, app),
        Screen::Chat => chat::render(frame, body, app),
    }
    render_status_bar(frame, status, app);

    match &app.modal {
        Some(Modal::Form(state)) => form::render(frame, frame.area(), state),
        Some(Modal::ConfirmDelete(name)) => render_confirm_delete(frame, frame.area(), name),
        None => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " mcpdeck ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for screen in [Screen::Overview, Screen::Chat] {
        let style = if screen == app.screen {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(screen.title(), style));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        app.console.chat().connection_badge(),
        Style::default().fg(Color::Green),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(notice.text.as_str(), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            key_hints(app),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(app: &App) -> &'static str {
    match (&app.modal, app.screen) {
        (Some(Modal::Form(_)), _) => "Tab next field  Space toggle transport  Enter save  Esc cancel",
        (Some(Modal::ConfirmDelete(_)), _) => "y confirm  n cancel",
        (None, Screen::Overview) => "a add  e edit  d delete  c chat  q quit",
        (None, Screen::Chat) => "Enter send  Tab switch tab  Ctrl+R reconnect  Esc overview",
    }
}

fn render_confirm_delete(frame: &mut Frame, area: Rect, name: &str) {
    let modal = centered_rect(50, 7, area);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .title(" Delete Server ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = vec![
        Line::raw(""),
        Line::from(format!("Remove '{}' from the configuration?", name)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Delete  "),
            Span::styled("[n]", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(ratatui::layout::Alignment::Center),
        modal,
    );
}

/// Center a fixed-size rect within an area, clamped to the area.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

pub(crate) fn status_style(status: &ConnectionStatus) -> Style {
    let color = match status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Error(_) => Color::Red,
        ConnectionStatus::Disconnected => Color::DarkGray,
    };
    Style::default().fg(color)
}
