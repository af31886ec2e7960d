//! mcpdeck Core Library
//!
//! Domain logic for the MCP connection console: the service registry, the
//! server form, the overview projections and the simulated chat. Front-ends
//! (CLI, TUI) own a [`console::Console`] and render from it.

pub mod chat;
pub mod config;
pub mod console;
pub mod error;
pub mod form;
pub mod mcp;
pub mod overview;
pub mod registry;
pub mod state;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, ConsoleConfig};

    // Registry and descriptors
    pub use crate::mcp::{McpConnection, TransportKind};
    pub use crate::registry::{MAX_NAME_LEN, ServiceRegistry};

    // Form
    pub use crate::form::{FormField, FormMode, FormSubmission, ServerForm, parse_args};

    // Overview
    pub use crate::overview::{RegistrySummary, ServerCard};

    // Chat
    pub use crate::chat::{
        ChatMessage, ChatSession, ChatTab, ConnectionStatus, Origin, SimEvent, SimulationSettings,
    };

    // Console and host state
    pub use crate::console::Console;
    pub use crate::error::{ChatError, ValidationError};
    pub use crate::state::{AgentState, AgentStateStore, StateSink};
}
