//! Agent state exchanged with the host.
//!
//! The host seeds the console with an optional `mcp_config` and receives
//! every registry mutation back through a [`StateSink`]. How the host
//! persists that document is its own business; [`AgentStateStore`] is the
//! JSON-file implementation the bundled front-ends use.

mod store;

use serde::{Deserialize, Serialize};

use crate::registry::ServiceRegistry;

pub use store::AgentStateStore;

/// Shared agent state document.
///
/// Unknown fields written by other parts of the host are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_config: Option<ServiceRegistry>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AgentState {
    pub fn with_config(registry: ServiceRegistry) -> Self {
        Self {
            mcp_config: Some(registry),
            extra: serde_json::Map::new(),
        }
    }
}

/// Receiver of registry mutations.
pub trait StateSink: Send {
    /// Publish the registry as it stands after a mutation.
    fn publish(&mut self, registry: &ServiceRegistry) -> anyhow::Result<()>;
}

/// Sink that keeps only the latest published registry in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub latest: Option<ServiceRegistry>,
    pub publish_count: usize,
}

impl StateSink for MemorySink {
    fn publish(&mut self, registry: &ServiceRegistry) -> anyhow::Result<()> {
        self.latest = Some(registry.clone());
        self.publish_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "mcp_config": {
                "math": {"command": "python", "args": ["math_server.py"], "transport": "stdio"}
            }
        });

        let state: AgentState = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(state.mcp_config, Some(ServiceRegistry::agent_default()));
        assert!(state.extra.contains_key("messages"));

        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_state_without_config() {
        let state: AgentState = serde_json::from_str("{}").unwrap();
        assert!(state.mcp_config.is_none());
        assert_eq!(serde_json::to_string(&state).unwrap(), "{}");
    }
}
