//! Delayed delivery of simulation events.
//!
//! Each delay runs as a tokio task that sleeps and then posts one
//! [`SimEvent`] to the owning session's channel. Tasks are tracked per
//! service so they can be aborted when the service goes away.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::debug;

/// Outcome of a simulated delay, applied by the session that scheduled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    /// A connect attempt finished.
    ConnectResolved {
        service: String,
        generation: u64,
        outcome: Result<(), String>,
    },
    /// A service answers a user message.
    Reply {
        service: String,
        generation: u64,
        text: String,
    },
}

impl SimEvent {
    pub fn service(&self) -> &str {
        match self {
            SimEvent::ConnectResolved { service, .. } | SimEvent::Reply { service, .. } => service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Scheduler {
    tx: mpsc::UnboundedSender<SimEvent>,
    pending: HashMap<String, Vec<AbortHandle>>,
}

impl Scheduler {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<SimEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: HashMap::new(),
            },
            rx,
        )
    }

    /// Post `event` after `delay`. Must be called inside a tokio runtime.
    pub(crate) fn schedule(&mut self, delay: Duration, event: SimEvent) {
        let service = event.service().to_string();
        let tx = self.tx.clone();
        let deadline = Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // The receiver only disappears together with the session.
            let _ = tx.send(event);
        });

        let tasks = self.pending.entry(service).or_default();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle.abort_handle());
    }

    /// Abort every pending task for `service`.
    pub(crate) fn cancel(&mut self, service: &str) {
        if let Some(tasks) = self.pending.remove(service) {
            let live = tasks.iter().filter(|task| !task.is_finished()).count();
            for task in tasks {
                task.abort();
            }
            if live > 0 {
                debug!(service, live, "cancelled pending simulation tasks");
            }
        }
    }

    pub(crate) fn cancel_all(&mut self) {
        for (_, tasks) in self.pending.drain() {
            for task in tasks {
                task.abort();
            }
        }
    }

    /// Number of tasks that have not fired yet.
    pub(crate) fn pending(&self) -> usize {
        self.pending
            .values()
            .flatten()
            .filter(|task| !task.is_finished())
            .count()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
