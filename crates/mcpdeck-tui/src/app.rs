//! Application state for the console (TEA model)

use mcpdeck_core::console::Console;
use mcpdeck_core::error::ValidationError;
use mcpdeck_core::form::{FormField, ServerForm};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Overview,
    Chat,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Overview => "Overview",
            Screen::Chat => "Chat",
        }
    }
}

/// Dialog drawn over the current screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Form(FormState),
    ConfirmDelete(String),
}

/// Server form plus its focus and last validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub form: ServerForm,
    pub focus: usize,
    pub errors: Vec<(FormField, ValidationError)>,
}

impl FormState {
    pub fn new(form: ServerForm) -> Self {
        Self {
            form,
            focus: 0,
            errors: Vec::new(),
        }
    }

    pub fn focused_field(&self) -> FormField {
        let fields = self.form.visible_fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        let len = self.form.visible_fields().len();
        self.focus = (self.focus + 1) % len;
    }

    pub fn focus_previous(&mut self) {
        let len = self.form.visible_fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn error_for(&self, field: FormField) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, e)| e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line feedback shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

pub struct App {
    pub console: Console,
    pub screen: Screen,
    pub modal: Option<Modal>,
    /// Index into the overview server list
    pub selected: usize,
    /// Chat input line
    pub input: String,
    pub notice: Option<Notice>,
    should_quit: bool,
}

impl App {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            screen: Screen::default(),
            modal: None,
            selected: 0,
            input: String::new(),
            notice: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Name of the server under the overview cursor.
    pub fn selected_name(&self) -> Option<String> {
        self.console
            .registry()
            .names()
            .nth(self.selected)
            .map(str::to_string)
    }

    /// Keep the cursor inside the list after it shrinks.
    pub fn clamp_selection(&mut self) {
        let len = self.console.registry().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        });
    }

    pub fn form_state(&self) -> Option<&FormState> {
        match &self.modal {
            Some(Modal::Form(state)) => Some(state),
            _ => None,
        }
    }

    pub fn form_state_mut(&mut self) -> Option<&mut FormState> {
        match &mut self.modal {
            Some(Modal::Form(state)) => Some(state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpdeck_core::chat::{ChatSession, SimulationSettings};
    use mcpdeck_core::mcp::TransportKind;
    use mcpdeck_core::registry::ServiceRegistry;

    fn app() -> App {
        let console = Console::with_chat(
            ServiceRegistry::sample(),
            ChatSession::with_seed(SimulationSettings::default(), 1),
        );
        App::new(console)
    }

    #[test]
    fn test_selected_name_follows_registry_order() {
        let mut app = app();
        assert_eq!(app.selected_name().as_deref(), Some("api-service"));
        app.selected = 2;
        assert_eq!(app.selected_name().as_deref(), Some("data-processor"));
    }

    #[test]
    fn test_clamp_selection() {
        let mut app = app();
        app.selected = 10;
        app.clamp_selection();
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut state = FormState::new(ServerForm::create());
        assert_eq!(state.focused_field(), FormField::Name);
        state.focus_previous();
        assert_eq!(state.focused_field(), FormField::Args);
        state.focus_next();
        assert_eq!(state.focused_field(), FormField::Name);

        state.form.set_transport(TransportKind::Sse);
        state.focus = 3;
        assert_eq!(state.focused_field(), FormField::Url);
    }
}
