//! Server form modal

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use mcpdeck_core::form::{FormField, FormMode};

use super::centered_rect;
use crate::app::FormState;

pub(super) fn render(frame: &mut Frame, area: Rect, state: &FormState) {
    let modal = centered_rect(64, 18, area);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .title(format!(" {} ", state.form.mode().title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let focused = state.focused_field();
    let mut lines = Vec::new();
    for &field in state.form.visible_fields() {
        lines.extend(field_lines(state, field, field == focused));
    }
    lines.push(Line::raw(""));
    lines.push(buttons(state.form.mode()));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        modal,
    );
}

fn field_lines(state: &FormState, field: FormField, focused: bool) -> Vec<Line<'static>> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let marker = if focused { "> " } else { "  " };

    let value = match state.form.text(field) {
        Some(text) if focused => format!("{}_", text),
        Some(text) => text.to_string(),
        None => format!("< {} >", state.form.transport().label()),
    };

    let note = match state.error_for(field) {
        Some(error) => Span::styled(format!("  {}", error), Style::default().fg(Color::Red)),
        None => Span::styled(
            format!("  {}", field.hint()),
            Style::default().fg(Color::DarkGray),
        ),
    };

    vec![
        Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(field.label(), label_style),
            Span::raw(": "),
            Span::raw(value),
        ]),
        Line::from(note),
    ]
}

fn buttons(mode: &FormMode) -> Line<'static> {
    let mut spans = vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {}  ", mode.submit_label())),
        Span::styled("[Esc]", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Cancel"),
    ];
    if matches!(mode, FormMode::Edit { .. }) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "[Ctrl+D]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" Delete"));
    }
    Line::from(spans)
}
