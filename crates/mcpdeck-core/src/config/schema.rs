//! Configuration schema for mcpdeck.toml
//!
//! ```toml
//! [console]
//! sample_servers = true
//!
//! [simulation]
//! connect_min_ms = 1000
//! connect_max_ms = 2000
//!
//! [mcp.api-service]
//! transport = "stdio"
//! command = "node"
//! args = ["api.js"]
//! ```

use serde::{Deserialize, Serialize};

use crate::chat::SimulationSettings;
use crate::registry::ServiceRegistry;

/// Root configuration structure for mcpdeck.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Front-end behaviour
    #[serde(default)]
    pub console: ConsoleSection,

    /// Simulated latency and failure injection
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Services to start with when the agent state provides none
    #[serde(default, skip_serializing_if = "ServiceRegistry::is_empty")]
    pub mcp: ServiceRegistry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSection {
    /// Seed the demo services when nothing else is configured
    pub sample_servers: bool,
    /// UI refresh interval in milliseconds
    pub tick_ms: u64,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            sample_servers: true,
            tick_ms: 50,
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.console.tick_ms == 0 {
            anyhow::bail!("console.tick_ms must be greater than zero");
        }
        self.simulation.validate()?;
        self.mcp.validate()?;
        Ok(())
    }

    /// Pick the starting registry.
    ///
    /// The host's `mcp_config` wins, even when empty; then `[mcp]` entries;
    /// then the demo services if enabled.
    pub fn seed_registry(&self, from_host: Option<&ServiceRegistry>) -> ServiceRegistry {
        if let Some(registry) = from_host {
            return registry.clone();
        }
        if !self.mcp.is_empty() {
            return self.mcp.clone();
        }
        if self.console.sample_servers {
            return ServiceRegistry::sample();
        }
        ServiceRegistry::new()
    }
}
