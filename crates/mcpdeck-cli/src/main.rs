//! mcpdeck - MCP connection console
//!
//! Usage:
//!   mcpdeck                 # Launch the console (TUI, default)
//!   mcpdeck list            # List configured servers
//!   mcpdeck add ...         # Manage servers from the command line
//!   mcpdeck chat "status"   # One-shot simulated chat exchange

mod interactive;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpdeck_core::chat::{ChatTab, SimulationSettings};
use mcpdeck_core::config::{ConfigStore, ConsoleConfig};
use mcpdeck_core::console::Console;
use mcpdeck_core::form::{FormSubmission, ServerForm};
use mcpdeck_core::mcp::TransportKind;
use mcpdeck_core::overview::ServerCard;
use mcpdeck_core::state::AgentStateStore;

use crate::interactive::{PrefilledServer, ServerWizard};

#[derive(Parser)]
#[command(name = "mcpdeck")]
#[command(about = "MCP connection console", long_about = None)]
struct Cli {
    /// Agent state file holding `mcp_config`
    #[arg(long, global = true, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured servers
    #[command(alias = "ls")]
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one server's connection settings
    Show {
        /// Server name
        name: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a server
    Add(Box<AddArgs>),

    /// Edit (and optionally rename) a server
    Edit(Box<EditArgs>),

    /// Remove a server
    #[command(alias = "rm")]
    Remove {
        /// Server name
        name: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show summary counts by transport
    Summary {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Connect every server and send one message through the simulated chat
    Chat {
        /// Message text
        message: String,
        /// Only address this server
        #[arg(long, value_name = "NAME")]
        to: Option<String>,
        /// Skip simulated latency
        #[arg(long)]
        instant: bool,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Args)]
struct AddArgs {
    /// Server name
    ///
    /// Required unless --interactive is used
    name: Option<String>,
    /// Interactive mode - prompts for missing options
    #[arg(short, long)]
    interactive: bool,
    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
    /// Transport type (stdio or sse); inferred from --url when omitted
    #[arg(long)]
    transport: Option<String>,
    /// SSE endpoint URL
    #[arg(long)]
    url: Option<String>,
    /// Stdio command and arguments (after --)
    #[arg(last = true)]
    command: Vec<String>,
    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Args)]
struct EditArgs {
    /// Server to edit
    name: String,
    /// New name for the server
    #[arg(long)]
    rename: Option<String>,
    /// Switch transport type (stdio or sse)
    #[arg(long)]
    transport: Option<String>,
    /// SSE endpoint URL
    #[arg(long)]
    url: Option<String>,
    /// Replace stdio command and arguments (after --)
    #[arg(last = true)]
    command: Vec<String>,
    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return run_tui(cli.config, cli.state);
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("MCPDECK_LOG")
                .unwrap_or_else(|_| "mcpdeck=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(cli.config)?;
    let store = state_store(cli.state)?;
    run_cli(command, config, store)
}

fn load_config(path: Option<PathBuf>) -> Result<ConsoleConfig> {
    let store = match path {
        Some(path) => ConfigStore::from_path(path),
        None => ConfigStore::with_defaults()?,
    };
    store.load()
}

fn state_store(path: Option<PathBuf>) -> Result<AgentStateStore> {
    match path {
        Some(path) => Ok(AgentStateStore::from_path(path)),
        None => AgentStateStore::with_defaults(),
    }
}

fn run_tui(config: Option<PathBuf>, state: Option<PathBuf>) -> Result<()> {
    mcpdeck_tui::logging::init()?;

    let config = load_config(config)?;
    let console = Console::open(&config, state_store(state)?)?;
    let tick = Duration::from_millis(config.console.tick_ms);

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();
    mcpdeck_tui::run(console, tick)
}

fn run_cli(command: Commands, config: ConsoleConfig, store: AgentStateStore) -> Result<()> {
    match command {
        Commands::List { format } => {
            let console = Console::open(&config, store)?;
            print_server_list(&console.cards(), format)?;
        }
        Commands::Show { name, format } => {
            let console = Console::open(&config, store)?;
            run_show(&console, &name, format)?;
        }
        Commands::Add(args) => {
            let console = Console::open(&config, store)?;
            run_add(console, *args)?;
        }
        Commands::Edit(args) => {
            let console = Console::open(&config, store)?;
            run_edit(console, *args)?;
        }
        Commands::Remove { name, format } => {
            let mut console = Console::open(&config, store)?;
            run_remove(&mut console, &name, format)?;
        }
        Commands::Summary { format } => {
            let console = Console::open(&config, store)?;
            run_summary(&console, format)?;
        }
        Commands::Chat {
            message,
            to,
            instant,
            format,
        } => {
            let mut config = config;
            if instant {
                config.simulation = SimulationSettings::instant();
            }
            let console = Console::open(&config, store)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(run_chat(console, &message, to, format))?;
        }
    }
    Ok(())
}

fn run_show(console: &Console, name: &str, format: OutputFormat) -> Result<()> {
    let connection = console
        .registry()
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("No server named '{}'", name))?;

    match format {
        OutputFormat::Table => {
            let card = ServerCard::new(name, connection);
            println!("{}", name);
            println!("  Transport: {}", connection.transport().label());
            println!("  {}", card.description);
            println!("  {}", card.detail);
            if let mcpdeck_core::mcp::McpConnection::Sse { url } = connection {
                println!("  Full URL:  {}", url);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "name": name, "connection": connection });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_add(mut console: Console, args: AddArgs) -> Result<()> {
    let form = if args.interactive {
        let prefilled = PrefilledServer {
            name: args.name.clone(),
            transport: args.transport.as_deref().map(parse_transport).transpose()?,
            command: args.command.clone(),
            url: args.url.clone(),
            yes: args.yes,
        };
        let mut wizard = ServerWizard::new(prefilled);
        let result = wizard.collect(console.registry())?;
        if !result.confirmed {
            println!("Cancelled.");
            return Ok(());
        }
        result.form
    } else {
        let name = args
            .name
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Missing required argument: name"))?;
        let transport = match args.transport.as_deref() {
            Some(t) => parse_transport(t)?,
            None if args.url.is_some() => TransportKind::Sse,
            None => TransportKind::Stdio,
        };
        let mut form = ServerForm::create();
        form.name = name.clone();
        form.set_transport(transport);
        fill_form(&mut form, &args.command, args.url.as_deref());
        form
    };

    let submission = console.submit_form(&form)?;
    finish_mutation(&mut console)?;
    print_submission(&submission, args.format)
}

fn run_edit(mut console: Console, args: EditArgs) -> Result<()> {
    let connection = console
        .registry()
        .get(&args.name)
        .ok_or_else(|| anyhow::anyhow!("No server named '{}'", args.name))?;

    let mut form = ServerForm::edit(&args.name, connection);
    if let Some(new_name) = &args.rename {
        form.name = new_name.clone();
    }
    if let Some(t) = args.transport.as_deref() {
        form.set_transport(parse_transport(t)?);
    }
    fill_form(&mut form, &args.command, args.url.as_deref());

    let submission = console.submit_form(&form)?;
    finish_mutation(&mut console)?;
    print_submission(&submission, args.format)
}

fn run_remove(console: &mut Console, name: &str, format: OutputFormat) -> Result<()> {
    let removed = console.delete_server(name).is_some();
    finish_mutation(console)?;

    match format {
        OutputFormat::Table => {
            if removed {
                println!("✓ Removed '{}'", name);
            } else {
                println!("• No server named '{}'", name);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({ "name": name, "removed": removed });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_summary(console: &Console, format: OutputFormat) -> Result<()> {
    let summary = console.summary();
    match format {
        OutputFormat::Table => {
            println!("Total Servers: {}", summary.total);
            println!("Stdio Servers: {}", summary.stdio);
            println!("SSE Servers:   {}", summary.sse);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    Ok(())
}

async fn run_chat(
    mut console: Console,
    message: &str,
    to: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    console.mount();

    // Wait for every connect attempt to resolve
    while console
        .chat()
        .statuses()
        .any(|(_, status)| status.is_connecting())
    {
        let Some(event) = console.chat_mut().next_event().await else {
            break;
        };
        console.chat_mut().apply(event);
    }

    if let Some(name) = to {
        console.chat_mut().set_active_tab(ChatTab::Service(name))?;
    }
    console.chat().check_send(message)?;

    let targets = console.send_message(message)?;
    debug!(?targets, "waiting for replies");
    let mut pending = targets.len();
    while pending > 0 {
        let Some(event) = console.chat_mut().next_event().await else {
            break;
        };
        if console.chat_mut().apply(event) {
            pending -= 1;
        }
    }

    let transcript: Vec<_> = console.chat().visible_messages().collect();
    match format {
        OutputFormat::Table => {
            println!("{}", console.chat().connection_badge());
            for message in transcript {
                println!(
                    "[{}] {}:",
                    message.timestamp.format("%H:%M:%S"),
                    message.origin.label()
                );
                for line in message.text.lines() {
                    println!("  {}", line);
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&transcript)?),
    }
    Ok(())
}

/// Apply command-line overrides to a form. Empty inputs leave fields as they are.
fn fill_form(form: &mut ServerForm, command: &[String], url: Option<&str>) {
    if let Some((program, args)) = command.split_first() {
        form.command = program.clone();
        form.args_input = args.join(" ");
    }
    if let Some(url) = url {
        form.url = url.to_string();
    }
}

fn parse_transport(value: &str) -> Result<TransportKind> {
    TransportKind::try_from(value)
}

fn finish_mutation(console: &mut Console) -> Result<()> {
    match console.take_sink_error() {
        Some(e) => Err(e.context("Failed to save agent state")),
        None => Ok(()),
    }
}

fn print_submission(submission: &FormSubmission, format: OutputFormat) -> Result<()> {
    let verb = match submission.mode {
        mcpdeck_core::form::FormMode::Create => "Added",
        mcpdeck_core::form::FormMode::Edit { .. } => "Updated",
    };
    match format {
        OutputFormat::Table => {
            println!("✓ {} '{}'", verb, submission.name);
            println!("  {}", submission.connection.target());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": submission.name,
                "action": verb.to_lowercase(),
                "connection": submission.connection,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_server_list(cards: &[ServerCard], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if cards.is_empty() {
                println!("No servers configured.");
                println!("Add one with: mcpdeck add <name> -- <command> [args...]");
                return Ok(());
            }

            println!("{:<24} {:<10} Target", "Name", "Transport");
            println!("{}", "-".repeat(70));
            for card in cards {
                println!(
                    "{:<24} {:<10} {}",
                    card.name,
                    card.transport.as_str(),
                    card.target
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(cards)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add_with_command() {
        let cli = Cli::try_parse_from([
            "mcpdeck", "add", "math", "--", "python", "math_server.py",
        ])
        .unwrap();
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.name.as_deref(), Some("math"));
        assert_eq!(args.command, vec!["python", "math_server.py"]);
    }

    #[test]
    fn test_cli_global_state_flag() {
        let cli = Cli::try_parse_from(["mcpdeck", "list", "--state", "/tmp/state.json"]).unwrap();
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/state.json")));
    }

    #[test]
    fn test_no_subcommand_launches_console() {
        let cli = Cli::try_parse_from(["mcpdeck"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_fill_form_stdio() {
        let mut form = ServerForm::create();
        form.name = "svc".to_string();
        fill_form(
            &mut form,
            &["python".to_string(), "-m".to_string(), "x".to_string()],
            None,
        );
        assert_eq!(form.command, "python");
        assert_eq!(form.args_input, "-m x");
    }

    #[test]
    fn test_fill_form_keeps_fields_without_overrides() {
        let connection = mcpdeck_core::mcp::McpConnection::stdio("node", ["api.js"]);
        let mut form = ServerForm::edit("api", &connection);
        fill_form(&mut form, &[], None);
        assert_eq!(form.command, "node");
        assert_eq!(form.args_input, "api.js");
    }

    #[test]
    fn test_fill_form_sse_url() {
        let mut form = ServerForm::create();
        form.set_transport(TransportKind::Sse);
        fill_form(&mut form, &[], Some("https://example.com/events"));
        assert_eq!(form.url, "https://example.com/events");
        assert!(form.command.is_empty());
    }
}
