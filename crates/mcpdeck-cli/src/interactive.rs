//! Interactive wizard for `add -i`.
//!
//! Walks through the same fields as the console's server form, using
//! dialoguer prompts for anything not given on the command line.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use mcpdeck_core::form::{FormField, ServerForm};
use mcpdeck_core::mcp::TransportKind;
use mcpdeck_core::registry::{ServiceRegistry, validate_name};

/// Pre-filled values from CLI args that skip prompts.
#[derive(Debug, Clone, Default)]
pub struct PrefilledServer {
    /// Server name - if Some, skip name prompt
    pub name: Option<String>,
    /// Transport - if Some, skip transport prompt
    pub transport: Option<TransportKind>,
    /// Stdio command line - if non-empty, skip command and args prompts
    pub command: Vec<String>,
    /// SSE URL - if Some, skip URL prompt
    pub url: Option<String>,
    /// Skip the confirmation
    pub yes: bool,
}

/// Result of the wizard.
#[derive(Debug, Clone)]
pub struct WizardResult {
    /// The filled-in form, not yet validated against the registry
    pub form: ServerForm,
    /// Whether the user confirmed
    pub confirmed: bool,
}

pub struct ServerWizard<W: Write = io::Stdout> {
    prefilled: PrefilledServer,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl ServerWizard<io::Stdout> {
    pub fn new(prefilled: PrefilledServer) -> Self {
        Self {
            prefilled,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> ServerWizard<W> {
    /// Create a wizard with a custom writer (for testing).
    #[cfg(test)]
    pub fn with_writer(prefilled: PrefilledServer, writer: W) -> Self {
        Self {
            prefilled,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the wizard.
    ///
    /// Flow:
    /// 1. Server name (checked against `registry`)
    /// 2. Transport type
    /// 3. Command and arguments, or URL
    /// 4. Summary and confirm
    pub fn collect(&mut self, registry: &ServiceRegistry) -> Result<WizardResult> {
        self.print_header()?;

        let mut form = ServerForm::create();
        form.name = self.prompt_name(registry)?;
        form.set_transport(self.prompt_transport()?);

        match form.transport() {
            TransportKind::Stdio => {
                let (command, args) = self.prompt_command()?;
                form.command = command;
                form.args_input = args;
            }
            TransportKind::Sse => {
                form.url = self.prompt_url()?;
            }
        }

        let confirmed = self.show_summary_and_confirm(&form)?;
        Ok(WizardResult { form, confirmed })
    }

    fn print_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{}",
            style("  Add New Server").bold().cyan()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn prompt_name(&self, registry: &ServiceRegistry) -> Result<String> {
        if let Some(name) = &self.prefilled.name {
            return Ok(name.clone());
        }

        let name: String = Input::with_theme(&self.theme)
            .with_prompt(FormField::Name.label())
            .validate_with(|input: &String| -> Result<(), String> {
                let name = input.trim();
                validate_name(name).map_err(|e| e.to_string())?;
                if registry.contains(name) {
                    return Err(format!("A service with the name '{}' already exists", name));
                }
                Ok(())
            })
            .interact_text()?;

        Ok(name.trim().to_string())
    }

    fn prompt_transport(&self) -> Result<TransportKind> {
        if let Some(transport) = self.prefilled.transport {
            return Ok(transport);
        }
        if self.prefilled.url.is_some() {
            return Ok(TransportKind::Sse);
        }
        if !self.prefilled.command.is_empty() {
            return Ok(TransportKind::Stdio);
        }

        let options = [
            "Standard I/O       - Launch a local command",
            "Server-Sent Events - Connect to an HTTP endpoint",
        ];
        let selection = Select::with_theme(&self.theme)
            .with_prompt(FormField::Transport.label())
            .items(&options)
            .default(0)
            .interact()?;

        Ok(match selection {
            0 => TransportKind::Stdio,
            _ => TransportKind::Sse,
        })
    }

    fn prompt_command(&self) -> Result<(String, String)> {
        if let Some((command, args)) = self.prefilled.command.split_first() {
            return Ok((command.clone(), args.join(" ")));
        }

        let command: String = Input::with_theme(&self.theme)
            .with_prompt(FormField::Command.label())
            .validate_with(|input: &String| -> Result<(), String> {
                if input.trim().is_empty() {
                    return Err("Command is required for stdio connections".to_string());
                }
                Ok(())
            })
            .interact_text()?;

        let args: String = Input::with_theme(&self.theme)
            .with_prompt(FormField::Args.label())
            .allow_empty(true)
            .interact_text()?;

        Ok((command, args))
    }

    fn prompt_url(&self) -> Result<String> {
        if let Some(url) = &self.prefilled.url {
            return Ok(url.clone());
        }

        let url: String = Input::with_theme(&self.theme)
            .with_prompt(FormField::Url.label())
            .validate_with(|input: &String| -> Result<(), String> {
                mcpdeck_core::mcp::validate_url(input).map_err(|e| e.to_string())
            })
            .interact_text()?;

        Ok(url)
    }

    fn show_summary_and_confirm(&mut self, form: &ServerForm) -> Result<bool> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Summary").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;
        writeln!(self.writer, "  Name:      {}", style(form.name.trim()).green())?;
        writeln!(
            self.writer,
            "  Transport: {}",
            style(form.transport().label()).green()
        )?;

        match form.transport() {
            TransportKind::Stdio => {
                writeln!(self.writer, "  Command:   {}", style(&form.command).green())?;
                if !form.args_input.trim().is_empty() {
                    writeln!(self.writer, "  Args:      {}", style(&form.args_input).green())?;
                }
            }
            TransportKind::Sse => {
                writeln!(self.writer, "  URL:       {}", style(&form.url).green())?;
            }
        }

        writeln!(self.writer)?;

        if self.prefilled.yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Add this server?")
            .default(true)
            .interact()?;

        Ok(confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpdeck_core::mcp::McpConnection;

    #[test]
    fn test_prefilled_defaults() {
        let prefilled = PrefilledServer::default();

        assert!(prefilled.name.is_none());
        assert!(prefilled.transport.is_none());
        assert!(prefilled.command.is_empty());
        assert!(!prefilled.yes);
    }

    #[test]
    fn test_prefilled_stdio_skips_prompts() {
        let prefilled = PrefilledServer {
            name: Some("math".to_string()),
            command: vec!["python".to_string(), "math_server.py".to_string()],
            yes: true,
            ..Default::default()
        };

        let mut output = Vec::new();
        let mut wizard = ServerWizard::with_writer(prefilled, &mut output);
        let result = wizard.collect(&ServiceRegistry::new()).unwrap();

        assert!(result.confirmed);
        assert_eq!(result.form.transport(), TransportKind::Stdio);
        let submission = result.form.submit(&ServiceRegistry::new()).unwrap();
        assert_eq!(
            submission.connection,
            McpConnection::stdio("python", ["math_server.py"])
        );
    }

    #[test]
    fn test_url_implies_sse() {
        let prefilled = PrefilledServer {
            name: Some("feed".to_string()),
            url: Some("http://localhost:8000/events".to_string()),
            yes: true,
            ..Default::default()
        };

        let mut output = Vec::new();
        let mut wizard = ServerWizard::with_writer(prefilled, &mut output);
        let result = wizard.collect(&ServiceRegistry::new()).unwrap();

        assert_eq!(result.form.transport(), TransportKind::Sse);
        assert_eq!(result.form.url, "http://localhost:8000/events");
        assert!(result.form.command.is_empty());
    }

    #[test]
    fn test_summary_output_format() {
        let prefilled = PrefilledServer {
            name: Some("feed".to_string()),
            transport: Some(TransportKind::Sse),
            url: Some("https://example.com/events".to_string()),
            yes: true,
            ..Default::default()
        };

        let mut output = Vec::new();
        let mut wizard = ServerWizard::with_writer(prefilled, &mut output);
        wizard.collect(&ServiceRegistry::new()).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("Summary"));
        assert!(output_str.contains("feed"));
        assert!(output_str.contains("Server-Sent Events"));
        assert!(output_str.contains("https://example.com/events"));
    }
}
