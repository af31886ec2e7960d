//! Server form: draft state and validation for a single connection entry.
//!
//! The form holds raw text as typed by the user. Nothing is parsed into a
//! descriptor until [`ServerForm::submit`], which either yields a complete
//! [`FormSubmission`] or the first validation failure.

use crate::error::ValidationError;
use crate::mcp::{McpConnection, TransportKind};
use crate::registry::{ServiceRegistry, validate_name};

/// Whether the form creates a new entry or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { original: String },
}

impl FormMode {
    pub fn title(&self) -> &'static str {
        match self {
            FormMode::Create => "Add New Server",
            FormMode::Edit { .. } => "Edit Server",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Add Server",
            FormMode::Edit { .. } => "Save Changes",
        }
    }
}

/// Input fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Transport,
    Command,
    Args,
    Url,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Server Name",
            FormField::Transport => "Transport Type",
            FormField::Command => "Command",
            FormField::Args => "Arguments",
            FormField::Url => "URL",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            FormField::Name => "Enter server name",
            FormField::Transport => "stdio or sse",
            FormField::Command => "The command to execute (e.g., node, python)",
            FormField::Args => "Space-separated list of arguments",
            FormField::Url => "The URL for the Server-Sent Events endpoint",
        }
    }
}

/// A validated form ready to be applied to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub mode: FormMode,
    pub name: String,
    pub connection: McpConnection,
}

/// Draft state of the server form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerForm {
    mode: FormMode,
    transport: TransportKind,
    pub name: String,
    pub command: String,
    pub args_input: String,
    pub url: String,
}

impl ServerForm {
    /// Empty form for a new stdio entry.
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            transport: TransportKind::Stdio,
            name: String::new(),
            command: String::new(),
            args_input: String::new(),
            url: String::new(),
        }
    }

    /// Form pre-filled from an existing entry.
    pub fn edit(name: &str, connection: &McpConnection) -> Self {
        let mut form = Self {
            mode: FormMode::Edit {
                original: name.to_string(),
            },
            name: name.to_string(),
            ..Self::create()
        };
        match connection {
            McpConnection::Stdio { command, args } => {
                form.transport = TransportKind::Stdio;
                form.command = command.clone();
                form.args_input = args.join(" ");
            }
            McpConnection::Sse { url } => {
                form.transport = TransportKind::Sse;
                form.url = url.clone();
            }
        }
        form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Switch transport kind, discarding the draft fields of the kind left
    /// behind.
    pub fn set_transport(&mut self, kind: TransportKind) {
        if kind == self.transport {
            return;
        }
        match self.transport {
            TransportKind::Stdio => {
                self.command.clear();
                self.args_input.clear();
            }
            TransportKind::Sse => {
                self.url.clear();
            }
        }
        self.transport = kind;
    }

    /// Fields shown for the current transport, in display order.
    pub fn visible_fields(&self) -> &'static [FormField] {
        match self.transport {
            TransportKind::Stdio => &[
                FormField::Name,
                FormField::Transport,
                FormField::Command,
                FormField::Args,
            ],
            TransportKind::Sse => &[
                FormField::Name,
                FormField::Transport,
                FormField::Url,
            ],
        }
    }

    /// Mutable access to a text field. `Transport` is not free text.
    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Command => Some(&mut self.command),
            FormField::Args => Some(&mut self.args_input),
            FormField::Url => Some(&mut self.url),
            FormField::Transport => None,
        }
    }

    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Name => Some(&self.name),
            FormField::Command => Some(&self.command),
            FormField::Args => Some(&self.args_input),
            FormField::Url => Some(&self.url),
            FormField::Transport => None,
        }
    }

    /// Every rule violation, attributed to the field it concerns.
    pub fn validate(&self, registry: &ServiceRegistry) -> Vec<(FormField, ValidationError)> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if let Err(e) = validate_name(name) {
            errors.push((FormField::Name, e));
        } else if self.collides(name, registry) {
            errors.push((FormField::Name, ValidationError::DuplicateName(name.to_string())));
        }

        match self.transport {
            TransportKind::Stdio => {
                if self.command.trim().is_empty() {
                    errors.push((FormField::Command, ValidationError::MissingCommand));
                }
            }
            TransportKind::Sse => {
                if let Err(e) = crate::mcp::validate_url(&self.url) {
                    errors.push((FormField::Url, e));
                }
            }
        }

        errors
    }

    /// Validate and build the submission. Nothing is mutated.
    pub fn submit(&self, registry: &ServiceRegistry) -> Result<FormSubmission, ValidationError> {
        if let Some((_, error)) = self.validate(registry).into_iter().next() {
            return Err(error);
        }

        let connection = match self.transport {
            TransportKind::Stdio => McpConnection::Stdio {
                command: self.command.trim().to_string(),
                args: parse_args(&self.args_input),
            },
            TransportKind::Sse => McpConnection::Sse {
                url: self.url.trim().to_string(),
            },
        };

        Ok(FormSubmission {
            mode: self.mode.clone(),
            name: self.name.trim().to_string(),
            connection,
        })
    }

    fn collides(&self, name: &str, registry: &ServiceRegistry) -> bool {
        match &self.mode {
            FormMode::Create => registry.contains(name),
            FormMode::Edit { original } => name != original && registry.contains(name),
        }
    }
}

impl Default for ServerForm {
    fn default() -> Self {
        Self::create()
    }
}

/// Split an argument line on whitespace, dropping empty tokens.
pub fn parse_args(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args("script.py --flag"), vec!["script.py", "--flag"]);
        assert_eq!(parse_args(""), Vec::<String>::new());
        assert_eq!(parse_args("  a   b \t c  "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_submit_stdio() {
        let mut form = ServerForm::create();
        form.name = " svc ".to_string();
        form.command = "python".to_string();
        form.args_input = "-m  x".to_string();

        let submission = form.submit(&ServiceRegistry::new()).unwrap();
        assert_eq!(submission.name, "svc");
        assert_eq!(submission.connection, McpConnection::stdio("python", ["-m", "x"]));
        assert_eq!(submission.mode, FormMode::Create);
    }

    #[test]
    fn test_submit_requires_name() {
        let mut form = ServerForm::create();
        form.command = "node".to_string();
        assert_eq!(
            form.submit(&ServiceRegistry::new()),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_submit_rejects_long_name() {
        let mut form = ServerForm::create();
        form.name = "x".repeat(51);
        form.command = "node".to_string();
        assert!(matches!(
            form.submit(&ServiceRegistry::new()),
            Err(ValidationError::NameTooLong { .. })
        ));
    }

    #[test]
    fn test_submit_requires_command() {
        let mut form = ServerForm::create();
        form.name = "svc".to_string();
        assert_eq!(
            form.submit(&ServiceRegistry::new()),
            Err(ValidationError::MissingCommand)
        );
    }

    #[test]
    fn test_submit_rejects_bad_url() {
        let mut form = ServerForm::create();
        form.name = "events".to_string();
        form.set_transport(TransportKind::Sse);
        form.url = "not-a-url".to_string();

        let errors = form.validate(&ServiceRegistry::new());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, FormField::Url);
        assert!(matches!(
            form.submit(&ServiceRegistry::new()),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_submit_sse() {
        let mut form = ServerForm::create();
        form.name = "events".to_string();
        form.set_transport(TransportKind::Sse);
        form.url = " http://localhost:8000/events ".to_string();

        let submission = form.submit(&ServiceRegistry::new()).unwrap();
        assert_eq!(
            submission.connection,
            McpConnection::sse("http://localhost:8000/events")
        );
    }

    #[test]
    fn test_unchanged_sse_edit_submits_same_entry() {
        let conn = McpConnection::sse("https://example.com/events?topics=a,b");
        let registry: ServiceRegistry = [("feed".to_string(), conn.clone())].into_iter().collect();

        let form = ServerForm::edit("feed", &conn);
        assert_eq!(form.visible_fields().last(), Some(&FormField::Url));
        let submission = form.submit(&registry).unwrap();
        assert_eq!(submission.name, "feed");
        assert_eq!(submission.connection, conn);
    }

    #[test]
    fn test_create_rejects_duplicate() {
        let registry = ServiceRegistry::sample();
        let mut form = ServerForm::create();
        form.name = "api-service".to_string();
        form.command = "node".to_string();
        assert_eq!(
            form.submit(&registry),
            Err(ValidationError::DuplicateName("api-service".to_string()))
        );
    }

    #[test]
    fn test_edit_keeps_own_name() {
        let registry = ServiceRegistry::sample();
        let conn = registry.get("auth-service").unwrap();
        let form = ServerForm::edit("auth-service", conn);

        assert_eq!(form.args_input, "-m auth_service");
        let submission = form.submit(&registry).unwrap();
        assert_eq!(&submission.connection, conn);
    }

    #[test]
    fn test_edit_rename_onto_other_entry_rejected() {
        let registry = ServiceRegistry::sample();
        let mut form = ServerForm::edit("auth-service", registry.get("auth-service").unwrap());
        form.name = "api-service".to_string();
        assert!(matches!(
            form.submit(&registry),
            Err(ValidationError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_switching_transport_discards_draft() {
        let mut form = ServerForm::create();
        form.command = "node".to_string();
        form.args_input = "server.js".to_string();

        form.set_transport(TransportKind::Sse);
        assert!(form.command.is_empty());
        assert!(form.args_input.is_empty());

        form.url = "https://example.com/events".to_string();
        form.set_transport(TransportKind::Stdio);
        assert!(form.url.is_empty());
    }

    #[test]
    fn test_same_transport_keeps_draft() {
        let mut form = ServerForm::create();
        form.command = "node".to_string();
        form.set_transport(TransportKind::Stdio);
        assert_eq!(form.command, "node");
    }

    #[test]
    fn test_visible_fields_follow_transport() {
        let mut form = ServerForm::create();
        assert!(form.visible_fields().contains(&FormField::Command));
        form.set_transport(TransportKind::Sse);
        assert!(form.visible_fields().contains(&FormField::Url));
        assert!(!form.visible_fields().contains(&FormField::Command));
    }
}
