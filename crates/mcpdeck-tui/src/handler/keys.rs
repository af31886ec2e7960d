//! Key event handlers for each screen and modal

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use mcpdeck_core::form::FormField;

use crate::app::{App, Modal, Screen};
use crate::message::Message;

/// Convert a key event to a message based on what is on screen
pub fn handle_key(app: &App, key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match &app.modal {
        Some(Modal::Form(state)) => handle_key_form(state.focused_field(), key),
        Some(Modal::ConfirmDelete(_)) => handle_key_confirm_delete(key),
        None => match app.screen {
            Screen::Overview => handle_key_overview(key),
            Screen::Chat => handle_key_chat(key),
        },
    }
}

fn handle_key_overview(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectPrevious),
        KeyCode::Char('a') => Some(Message::OpenAddForm),
        KeyCode::Char('e') | KeyCode::Enter => Some(Message::OpenEditForm),
        KeyCode::Char('d') | KeyCode::Delete => Some(Message::RequestDelete),
        KeyCode::Char('c') | KeyCode::Tab => Some(Message::ShowChat),
        _ => None,
    }
}

fn handle_key_confirm_delete(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmDelete),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Message::CancelDelete),
        _ => None,
    }
}

fn handle_key_form(focused: FormField, key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => Some(Message::FormDelete),
            KeyCode::Char('s') => Some(Message::FormSubmit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Message::FormCancel),
        KeyCode::Enter => Some(Message::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(Message::FormNextField),
        KeyCode::BackTab | KeyCode::Up => Some(Message::FormPreviousField),
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if focused == FormField::Transport => {
            Some(Message::FormToggleTransport)
        }
        KeyCode::Backspace => Some(Message::FormBackspace),
        KeyCode::Char(c) => Some(Message::FormInput(c)),
        _ => None,
    }
}

fn handle_key_chat(key: KeyEvent) -> Option<Message> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('r') => Some(Message::Reconnect),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(Message::ShowOverview),
        KeyCode::Enter => Some(Message::ChatSend),
        KeyCode::Tab => Some(Message::ChatNextTab),
        KeyCode::BackTab => Some(Message::ChatPreviousTab),
        KeyCode::Backspace => Some(Message::ChatBackspace),
        KeyCode::Char(c) => Some(Message::ChatInput(c)),
        _ => None,
    }
}
