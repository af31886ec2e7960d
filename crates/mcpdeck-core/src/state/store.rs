//! JSON file store for the agent state document.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{AgentState, StateSink};
use crate::registry::ServiceRegistry;

const STATE_FILE: &str = "agent_state.json";

#[derive(Debug, Clone)]
pub struct AgentStateStore {
    state_path: PathBuf,
}

impl AgentStateStore {
    /// Store at the default location under the user's data directory.
    pub fn with_defaults() -> anyhow::Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join("mcpdeck");
        Ok(Self::from_path(data_dir.join(STATE_FILE)))
    }

    pub fn from_path(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Load the document. A missing file is an empty state.
    pub fn load(&self) -> anyhow::Result<AgentState> {
        if !self.state_path.exists() {
            return Ok(AgentState::default());
        }
        let content = std::fs::read_to_string(&self.state_path).with_context(|| {
            format!("Failed to read agent state: {}", self.state_path.display())
        })?;
        let state: AgentState = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse agent state: {}", self.state_path.display())
        })?;
        if let Some(registry) = &state.mcp_config {
            registry.validate().with_context(|| {
                format!("Invalid mcp_config in {}", self.state_path.display())
            })?;
        }
        Ok(state)
    }

    pub fn save(&self, state: &AgentState) -> anyhow::Result<()> {
        let content =
            serde_json::to_string_pretty(state).context("Failed to serialize agent state")?;
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.state_path, content).with_context(|| {
            format!(
                "Failed to write agent state: {}",
                self.state_path.display()
            )
        })?;
        Ok(())
    }
}

impl StateSink for AgentStateStore {
    /// Replace `mcp_config` in the document, keeping every other field.
    fn publish(&mut self, registry: &ServiceRegistry) -> anyhow::Result<()> {
        let mut state = self.load()?;
        state.mcp_config = Some(registry.clone());
        self.save(&state)?;
        tracing::debug!(path = %self.state_path.display(), services = registry.len(), "agent state published");
        Ok(())
    }
}
