//! Simulated multi-server chat.
//!
//! A [`ChatSession`] tracks a simulated connection per configured service,
//! keeps the shared message log, and answers user messages with canned
//! replies after staggered delays. All state is owned by the session;
//! background timers only post [`SimEvent`]s which the owner applies with
//! [`ChatSession::apply`].

pub mod message;
pub mod responder;
mod scheduler;
pub mod status;
pub mod timing;

use std::collections::BTreeMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::registry::ServiceRegistry;

pub use message::{ChatMessage, MessageId, MessageLog, Origin};
pub use responder::canned_reply;
pub use scheduler::SimEvent;
pub use status::ConnectionStatus;
pub use timing::SimulationSettings;

use scheduler::Scheduler;

/// Reason recorded when an injected failure ends a connect attempt.
pub const CONNECT_FAILURE_REASON: &str = "Failed to connect";

/// Which conversation the chat view is focused on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatTab {
    /// Every service; messages go to all connected services
    #[default]
    All,
    /// A single service; messages go only to it
    Service(String),
}

impl ChatTab {
    pub fn label(&self) -> &str {
        match self {
            ChatTab::All => "All Servers",
            ChatTab::Service(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
struct ServiceState {
    status: ConnectionStatus,
    /// Stamp of the current tracking period or connect attempt. Events
    /// carrying any other value are stale.
    generation: u64,
}

/// Owner of simulated connection state and the message log.
#[derive(Debug)]
pub struct ChatSession {
    settings: SimulationSettings,
    services: BTreeMap<String, ServiceState>,
    log: MessageLog,
    active_tab: ChatTab,
    scheduler: Scheduler,
    events: mpsc::UnboundedReceiver<SimEvent>,
    rng: StdRng,
    /// Session-wide and never reset, so a re-added name cannot match
    /// events still queued for its previous incarnation.
    last_generation: u64,
}

impl ChatSession {
    pub fn new(settings: SimulationSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Session with a deterministic random source.
    pub fn with_seed(settings: SimulationSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: SimulationSettings, rng: StdRng) -> Self {
        let (scheduler, events) = Scheduler::new();
        Self {
            settings,
            services: BTreeMap::new(),
            log: MessageLog::new(),
            active_tab: ChatTab::All,
            scheduler,
            events,
            rng,
            last_generation: 0,
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    // -------------------------------------------------------------------------
    // Connection lifecycle
    // -------------------------------------------------------------------------

    /// Align tracked services with the registry.
    ///
    /// New names start `Disconnected`; names no longer configured lose
    /// their status and any pending timers. Returns the newly tracked names.
    pub fn track(&mut self, registry: &ServiceRegistry) -> Vec<String> {
        let removed: Vec<String> = self
            .services
            .keys()
            .filter(|name| !registry.contains(name))
            .cloned()
            .collect();
        for name in removed {
            self.untrack(&name);
        }

        let added: Vec<String> = registry
            .names()
            .filter(|name| !self.services.contains_key(*name))
            .map(str::to_string)
            .collect();
        for name in &added {
            let generation = self.next_generation();
            self.services.insert(
                name.clone(),
                ServiceState {
                    status: ConnectionStatus::Disconnected,
                    generation,
                },
            );
        }
        added
    }

    /// Start a connect attempt for every `Disconnected` service.
    ///
    /// Services in `Error` are left alone; see [`ChatSession::reconnect`].
    pub fn connect_pending(&mut self) -> usize {
        let idle: Vec<String> = self
            .services
            .iter()
            .filter(|(_, state)| state.status == ConnectionStatus::Disconnected)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &idle {
            self.begin_connect(name);
        }
        idle.len()
    }

    /// Track new services and connect them. Called on mount and after every
    /// registry change.
    pub fn sync(&mut self, registry: &ServiceRegistry) {
        self.track(registry);
        self.connect_pending();
    }

    /// Retry a service that is disconnected or in error.
    pub fn reconnect(&mut self, name: &str) -> Result<(), ChatError> {
        let state = self
            .services
            .get(name)
            .ok_or_else(|| ChatError::UnknownService(name.to_string()))?;
        if state.status.can_connect() {
            self.begin_connect(name);
        }
        Ok(())
    }

    fn begin_connect(&mut self, name: &str) {
        let delay = Duration::from_millis(self.rng.gen_range(self.settings.connect_range_ms()));
        let rate = self.settings.failure_rate;
        let fails = rate > 0.0 && self.rng.gen_bool(rate.min(1.0));
        let generation = self.next_generation();
        let Some(state) = self.services.get_mut(name) else {
            return;
        };
        state.generation = generation;
        state.status = ConnectionStatus::Connecting;
        debug!(service = name, generation, ?delay, "connecting");

        let outcome = if fails {
            Err(CONNECT_FAILURE_REASON.to_string())
        } else {
            Ok(())
        };
        self.scheduler.schedule(
            delay,
            SimEvent::ConnectResolved {
                service: name.to_string(),
                generation,
                outcome,
            },
        );
    }

    fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    fn untrack(&mut self, name: &str) {
        self.scheduler.cancel(name);
        self.services.remove(name);
        if self.active_tab == ChatTab::Service(name.to_string()) {
            self.active_tab = ChatTab::All;
        }
        debug!(service = name, "stopped tracking service");
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Wait for the next simulation event.
    pub async fn next_event(&mut self) -> Option<SimEvent> {
        self.events.recv().await
    }

    /// Take the next simulation event if one is ready.
    pub fn try_next_event(&mut self) -> Option<SimEvent> {
        self.events.try_recv().ok()
    }

    /// Apply an event. Returns `false` for stale events: the service is gone,
    /// was removed and re-added, or started a newer connect attempt.
    pub fn apply(&mut self, event: SimEvent) -> bool {
        match event {
            SimEvent::ConnectResolved {
                service,
                generation,
                outcome,
            } => {
                let Some(state) = self.services.get_mut(&service) else {
                    debug!(service, "dropping connect event for untracked service");
                    return false;
                };
                if state.generation != generation || !state.status.is_connecting() {
                    debug!(service, generation, "dropping superseded connect event");
                    return false;
                }
                match outcome {
                    Ok(()) => {
                        state.status = ConnectionStatus::Connected;
                        debug!(service, "connected");
                        self.log.push(
                            Origin::Service(service.clone()),
                            format!("Connected to {}", service),
                        );
                    }
                    Err(reason) => {
                        warn!(service, reason, "simulated connection failed");
                        state.status = ConnectionStatus::Error(reason);
                    }
                }
                true
            }
            SimEvent::Reply {
                service,
                generation,
                text,
            } => {
                let current = self.services.get(&service).map(|state| state.generation);
                if current != Some(generation) {
                    debug!(service, generation, "dropping stale reply");
                    return false;
                }
                self.log.push(Origin::Service(service), text);
                true
            }
        }
    }

    /// Apply every event that is ready. Returns how many changed state.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.try_next_event() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Timers still waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    // -------------------------------------------------------------------------
    // Messages
    // -------------------------------------------------------------------------

    /// Why a message could not be sent right now, if anything.
    pub fn check_send(&self, text: &str) -> Result<(), ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.connected_count() == 0 {
            return Err(ChatError::NoConnectedServers);
        }
        Ok(())
    }

    pub fn can_send(&self, text: &str) -> bool {
        self.check_send(text).is_ok()
    }

    /// Append a user message and schedule replies from the target services.
    ///
    /// Targets are the connected services, narrowed to the active tab when
    /// one is selected. Returns the target names in reply order.
    pub fn send(
        &mut self,
        text: &str,
        registry: &ServiceRegistry,
    ) -> Result<Vec<String>, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.log.push(Origin::User, text);

        let targets: Vec<String> = self
            .connected_services()
            .filter(|name| match &self.active_tab {
                ChatTab::All => true,
                ChatTab::Service(tab) => tab == name,
            })
            .map(str::to_string)
            .collect();

        for (index, name) in targets.iter().enumerate() {
            let (Some(connection), Some(state)) = (registry.get(name), self.services.get(name))
            else {
                continue;
            };
            let generation = state.generation;
            let reply = canned_reply(text, name, connection, &mut self.rng);
            self.scheduler.schedule(
                self.settings.reply_delay(index),
                SimEvent::Reply {
                    service: name.clone(),
                    generation,
                    text: reply,
                },
            );
        }
        debug!(targets = targets.len(), "message dispatched");
        Ok(targets)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.as_slice()
    }

    /// Messages shown under the active tab: everything for "all", otherwise
    /// the selected service's messages plus the user's.
    pub fn visible_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.log.iter().filter(move |msg| match &self.active_tab {
            ChatTab::All => true,
            ChatTab::Service(name) => msg.origin.is_user() || msg.origin.service() == Some(name),
        })
    }

    // -------------------------------------------------------------------------
    // Status and tabs
    // -------------------------------------------------------------------------

    pub fn status(&self, name: &str) -> Option<&ConnectionStatus> {
        self.services.get(name).map(|state| &state.status)
    }

    pub fn statuses(&self) -> impl Iterator<Item = (&str, &ConnectionStatus)> {
        self.services
            .iter()
            .map(|(name, state)| (name.as_str(), &state.status))
    }

    pub fn connected_services(&self) -> impl Iterator<Item = &str> {
        self.statuses()
            .filter(|(_, status)| status.is_connected())
            .map(|(name, _)| name)
    }

    pub fn connected_count(&self) -> usize {
        self.connected_services().count()
    }

    pub fn tracked_count(&self) -> usize {
        self.services.len()
    }

    /// Badge text such as `2/3 Servers Connected`.
    pub fn connection_badge(&self) -> String {
        format!(
            "{}/{} Servers Connected",
            self.connected_count(),
            self.tracked_count()
        )
    }

    pub fn active_tab(&self) -> &ChatTab {
        &self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: ChatTab) -> Result<(), ChatError> {
        if let ChatTab::Service(name) = &tab {
            if !self.services.contains_key(name) {
                return Err(ChatError::UnknownService(name.clone()));
            }
        }
        self.active_tab = tab;
        Ok(())
    }

    /// Tabs in display order: "all" first, then each tracked service.
    pub fn tabs(&self) -> Vec<ChatTab> {
        std::iter::once(ChatTab::All)
            .chain(self.services.keys().cloned().map(ChatTab::Service))
            .collect()
    }

    /// Move the active tab by `offset` positions, wrapping around.
    pub fn cycle_tab(&mut self, offset: isize) {
        let tabs = self.tabs();
        let current = tabs
            .iter()
            .position(|tab| tab == &self.active_tab)
            .unwrap_or(0);
        let len = tabs.len() as isize;
        let next = (current as isize + offset).rem_euclid(len) as usize;
        if let Some(tab) = tabs.into_iter().nth(next) {
            self.active_tab = tab;
        }
    }
}
