//! The console: single owner of the registry, the chat session and the
//! outbound state channel.
//!
//! Front-ends hold one [`Console`] and route every mutation through it, so
//! the chat view and the host always see the registry that was just
//! committed.

use tracing::{info, warn};

use crate::chat::{ChatSession, SimulationSettings};
use crate::config::ConsoleConfig;
use crate::error::{ChatError, ValidationError};
use crate::form::{FormMode, FormSubmission, ServerForm};
use crate::mcp::McpConnection;
use crate::overview::{RegistrySummary, ServerCard, server_cards};
use crate::registry::ServiceRegistry;
use crate::state::{AgentStateStore, StateSink};

pub struct Console {
    registry: ServiceRegistry,
    chat: ChatSession,
    sink: Option<Box<dyn StateSink>>,
    sink_error: Option<anyhow::Error>,
    mounted: bool,
}

impl Console {
    pub fn new(registry: ServiceRegistry, settings: SimulationSettings) -> Self {
        Self::with_chat(registry, ChatSession::new(settings))
    }

    pub fn with_chat(registry: ServiceRegistry, chat: ChatSession) -> Self {
        Self {
            registry,
            chat,
            sink: None,
            sink_error: None,
            mounted: false,
        }
    }

    /// Open a console seeded from the agent state, falling back to the
    /// configuration. Mutations are saved back to `store`.
    pub fn open(config: &ConsoleConfig, store: AgentStateStore) -> anyhow::Result<Self> {
        let state = store.load()?;
        let registry = config.seed_registry(state.mcp_config.as_ref());
        info!(
            servers = registry.len(),
            from_host = state.mcp_config.is_some(),
            state = %store.state_path().display(),
            "opened console"
        );
        Ok(Self::new(registry, config.simulation.clone()).with_sink(Box::new(store)))
    }

    /// Mirror every committed mutation to `sink`.
    pub fn with_sink(mut self, sink: Box<dyn StateSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Start the chat view: track every service and begin connecting.
    ///
    /// Requires a tokio runtime. Until mounted, registry changes do not
    /// schedule any timers.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.chat.sync(&self.registry);
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatSession {
        &mut self.chat
    }

    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary::of(&self.registry)
    }

    pub fn cards(&self) -> Vec<ServerCard> {
        server_cards(&self.registry)
    }

    // -------------------------------------------------------------------------
    // Registry mutations
    // -------------------------------------------------------------------------

    pub fn add_server(
        &mut self,
        name: &str,
        connection: McpConnection,
    ) -> Result<(), ValidationError> {
        self.registry.add(name, connection)?;
        self.committed();
        Ok(())
    }

    fn update_server(
        &mut self,
        old_name: &str,
        new_name: &str,
        connection: McpConnection,
    ) -> Result<(), ValidationError> {
        self.registry.update(old_name, new_name, connection)?;
        self.committed();
        Ok(())
    }

    /// Remove a server. Absent names change nothing and publish nothing.
    pub fn delete_server(&mut self, name: &str) -> Option<McpConnection> {
        let removed = self.registry.remove(name);
        if removed.is_some() {
            self.committed();
        }
        removed
    }

    /// Validate a form and apply it as an add or an update.
    pub fn submit_form(&mut self, form: &ServerForm) -> Result<FormSubmission, ValidationError> {
        let submission = form.submit(&self.registry)?;
        self.apply_submission(&submission)?;
        Ok(submission)
    }

    fn apply_submission(&mut self, submission: &FormSubmission) -> Result<(), ValidationError> {
        match &submission.mode {
            FormMode::Create => {
                self.add_server(&submission.name, submission.connection.clone())
            }
            FormMode::Edit { original } => self.update_server(
                original,
                &submission.name,
                submission.connection.clone(),
            ),
        }
    }

    fn committed(&mut self) {
        if self.mounted {
            self.chat.sync(&self.registry);
        }
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.publish(&self.registry) {
                warn!(error = %e, "failed to publish registry");
                self.sink_error = Some(e);
            }
        }
    }

    /// The most recent publish failure, if any. Cleared on read.
    pub fn take_sink_error(&mut self) -> Option<anyhow::Error> {
        self.sink_error.take()
    }

    // -------------------------------------------------------------------------
    // Chat
    // -------------------------------------------------------------------------

    pub fn send_message(&mut self, text: &str) -> Result<Vec<String>, ChatError> {
        self.chat.send(text, &self.registry)
    }

    pub fn reconnect(&mut self, name: &str) -> Result<(), ChatError> {
        self.chat.reconnect(name)
    }

    /// Apply every simulation event that is ready.
    pub fn pump(&mut self) -> usize {
        self.chat.pump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ConnectionStatus;
    use crate::state::MemorySink;
    use std::sync::{Arc, Mutex};

    struct SharedSink(Arc<Mutex<MemorySink>>);

    impl StateSink for SharedSink {
        fn publish(&mut self, registry: &ServiceRegistry) -> anyhow::Result<()> {
            self.0
                .lock()
                .map_err(|_| anyhow::anyhow!("poisoned"))?
                .publish(registry)
        }
    }

    struct FailingSink;

    impl StateSink for FailingSink {
        fn publish(&mut self, _registry: &ServiceRegistry) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn console_with_sink() -> (Console, Arc<Mutex<MemorySink>>) {
        let shared = Arc::new(Mutex::new(MemorySink::default()));
        let console = Console::with_chat(
            ServiceRegistry::new(),
            ChatSession::with_seed(SimulationSettings::default(), 11),
        )
        .with_sink(Box::new(SharedSink(shared.clone())));
        (console, shared)
    }

    #[test]
    fn test_mutations_are_published() {
        let (mut console, sink) = console_with_sink();
        console
            .add_server("svc", McpConnection::stdio("node", ["a.js"]))
            .unwrap();
        console.delete_server("svc");
        console.delete_server("svc");

        let sink = sink.lock().unwrap();
        assert_eq!(sink.publish_count, 2);
        assert!(sink.latest.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_rejected_mutation_is_not_published() {
        let (mut console, sink) = console_with_sink();
        console
            .add_server("svc", McpConnection::stdio("node", ["a.js"]))
            .unwrap();
        let err = console
            .add_server("svc", McpConnection::stdio("python", ["b.py"]))
            .unwrap_err();

        assert_eq!(err, ValidationError::DuplicateName("svc".to_string()));
        assert_eq!(sink.lock().unwrap().publish_count, 1);
        assert_eq!(
            console.registry().get("svc"),
            Some(&McpConnection::stdio("node", ["a.js"]))
        );
    }

    #[test]
    fn test_sink_error_is_reported() {
        let mut console = Console::with_chat(
            ServiceRegistry::new(),
            ChatSession::with_seed(SimulationSettings::default(), 1),
        )
        .with_sink(Box::new(FailingSink));

        console
            .add_server("svc", McpConnection::stdio("node", ["a.js"]))
            .unwrap();
        assert!(console.registry().contains("svc"));
        assert!(console.take_sink_error().is_some());
        assert!(console.take_sink_error().is_none());
    }

    #[test]
    fn test_submit_edit_form_renames() {
        let mut console = Console::with_chat(
            ServiceRegistry::sample(),
            ChatSession::with_seed(SimulationSettings::default(), 1),
        );
        let mut form = ServerForm::edit(
            "api-service",
            console.registry().get("api-service").unwrap(),
        );
        form.name = "gateway".to_string();

        console.submit_form(&form).unwrap();
        assert!(console.registry().contains("gateway"));
        assert!(!console.registry().contains("api-service"));
        assert_eq!(console.summary().total, 3);
    }

    #[test]
    fn test_open_seeds_and_persists() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = AgentStateStore::from_path(temp.path().join("state.json"));
        let config = ConsoleConfig::new();

        let mut console = Console::open(&config, store.clone()).unwrap();
        assert_eq!(console.registry(), &ServiceRegistry::sample());

        console.delete_server("auth-service");
        let saved = store.load().unwrap().mcp_config.unwrap();
        assert_eq!(saved.len(), 2);

        let reopened = Console::open(&config, store).unwrap();
        assert!(!reopened.registry().contains("auth-service"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mounted_console_tracks_new_servers() {
        let mut console = Console::with_chat(
            ServiceRegistry::new(),
            ChatSession::with_seed(SimulationSettings::default(), 4),
        );
        console
            .add_server("early", McpConnection::stdio("node", ["a.js"]))
            .unwrap();
        assert!(console.chat().status("early").is_none());

        console.mount();
        assert_eq!(
            console.chat().status("early"),
            Some(&ConnectionStatus::Connecting)
        );

        console
            .add_server("late", McpConnection::sse("http://localhost:8000/events"))
            .unwrap();
        assert_eq!(
            console.chat().status("late"),
            Some(&ConnectionStatus::Connecting)
        );

        console.delete_server("early");
        assert!(console.chat().status("early").is_none());
    }
}
