//! Main update function: applies a message to the application state

use tracing::debug;

use mcpdeck_core::chat::{ChatTab, ConnectionStatus};
use mcpdeck_core::form::{FormMode, ServerForm};

use crate::app::{App, FormState, Modal, Screen};
use crate::message::Message;

use super::keys::handle_key;

/// Apply `message`, following up on any message it produces.
pub fn update(app: &mut App, message: Message) {
    let mut next = Some(message);
    while let Some(message) = next.take() {
        next = step(app, message);
    }
}

fn step(app: &mut App, message: Message) -> Option<Message> {
    match message {
        Message::Key(key) => return handle_key(app, key),
        Message::Tick => on_tick(app),
        Message::Quit => app.request_quit(),

        Message::ShowOverview => app.screen = Screen::Overview,
        Message::ShowChat => app.screen = Screen::Chat,
        Message::SelectNext => {
            if app.selected + 1 < app.console.registry().len() {
                app.selected += 1;
            }
        }
        Message::SelectPrevious => app.selected = app.selected.saturating_sub(1),

        Message::OpenAddForm => {
            app.modal = Some(Modal::Form(FormState::new(ServerForm::create())));
        }
        Message::OpenEditForm => open_edit_form(app),
        Message::RequestDelete => {
            if let Some(name) = app.selected_name() {
                app.modal = Some(Modal::ConfirmDelete(name));
            }
        }
        Message::ConfirmDelete => confirm_delete(app),
        Message::CancelDelete => app.modal = None,

        Message::FormNextField => {
            if let Some(state) = app.form_state_mut() {
                state.focus_next();
            }
        }
        Message::FormPreviousField => {
            if let Some(state) = app.form_state_mut() {
                state.focus_previous();
            }
        }
        Message::FormInput(c) => {
            if let Some(state) = app.form_state_mut() {
                let field = state.focused_field();
                if let Some(text) = state.form.text_mut(field) {
                    text.push(c);
                }
            }
        }
        Message::FormBackspace => {
            if let Some(state) = app.form_state_mut() {
                let field = state.focused_field();
                if let Some(text) = state.form.text_mut(field) {
                    text.pop();
                }
            }
        }
        Message::FormToggleTransport => {
            if let Some(state) = app.form_state_mut() {
                let toggled = state.form.transport().toggled();
                state.form.set_transport(toggled);
                state.errors.clear();
            }
        }
        Message::FormSubmit => submit_form(app),
        Message::FormDelete => {
            if let Some(Modal::Form(state)) = &app.modal {
                if let FormMode::Edit { original } = state.form.mode() {
                    app.modal = Some(Modal::ConfirmDelete(original.clone()));
                }
            }
        }
        Message::FormCancel => app.modal = None,

        Message::ChatInput(c) => app.input.push(c),
        Message::ChatBackspace => {
            app.input.pop();
        }
        Message::ChatSend => send_message(app),
        Message::ChatNextTab => app.console.chat_mut().cycle_tab(1),
        Message::ChatPreviousTab => app.console.chat_mut().cycle_tab(-1),
        Message::Reconnect => reconnect(app),
    }
    None
}

fn on_tick(app: &mut App) {
    let applied = app.console.pump();
    if applied > 0 {
        debug!(applied, "applied simulation events");
    }
}

fn open_edit_form(app: &mut App) {
    let Some(name) = app.selected_name() else {
        return;
    };
    if let Some(connection) = app.console.registry().get(&name) {
        let form = ServerForm::edit(&name, connection);
        app.modal = Some(Modal::Form(FormState::new(form)));
    }
}

fn confirm_delete(app: &mut App) {
    let Some(Modal::ConfirmDelete(name)) = app.modal.take() else {
        return;
    };
    if app.console.delete_server(&name).is_some() {
        app.clamp_selection();
        app.info(format!("Removed {}", name));
    }
    report_sink_error(app);
}

fn submit_form(app: &mut App) {
    let Some(Modal::Form(mut state)) = app.modal.take() else {
        return;
    };

    state.errors = state.form.validate(app.console.registry());
    if !state.errors.is_empty() {
        app.modal = Some(Modal::Form(state));
        return;
    }

    match app.console.submit_form(&state.form) {
        Ok(submission) => {
            let verb = match submission.mode {
                FormMode::Create => "Added",
                FormMode::Edit { .. } => "Updated",
            };
            if let Some(index) = app
                .console
                .registry()
                .names()
                .position(|name| name == submission.name)
            {
                app.selected = index;
            }
            app.info(format!("{} {}", verb, submission.name));
            report_sink_error(app);
        }
        Err(e) => {
            app.error(e.to_string());
            app.modal = Some(Modal::Form(state));
        }
    }
}

fn send_message(app: &mut App) {
    if let Err(e) = app.console.chat().check_send(&app.input) {
        app.error(e.to_string());
        return;
    }
    let text = std::mem::take(&mut app.input);
    match app.console.send_message(&text) {
        Ok(targets) => debug!(targets = targets.len(), "chat message sent"),
        Err(e) => app.error(e.to_string()),
    }
}

/// Reconnect the active tab's service, or every failed service under "all".
fn reconnect(app: &mut App) {
    let chat = app.console.chat();
    let names: Vec<String> = chat
        .statuses()
        .filter(|(name, status)| match chat.active_tab() {
            ChatTab::Service(tab) => tab == name && status.can_connect(),
            ChatTab::All => matches!(status, ConnectionStatus::Error(_)),
        })
        .map(|(name, _)| name.to_string())
        .collect();

    if names.is_empty() {
        app.info("Nothing to reconnect");
        return;
    }
    for name in names {
        match app.console.reconnect(&name) {
            Ok(()) => app.info(format!("Reconnecting {}", name)),
            Err(e) => app.error(e.to_string()),
        }
    }
}

fn report_sink_error(app: &mut App) {
    if let Some(e) = app.console.take_sink_error() {
        app.error(format!("Failed to save agent state: {:#}", e));
    }
}
