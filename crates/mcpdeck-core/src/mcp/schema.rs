//! MCP connection descriptor schema
//!
//! A descriptor is either a locally spawned process (stdio) or a remote
//! Server-Sent-Events endpoint. The serialized form matches the host's
//! `mcp_config` entries: an object tagged by its `transport` field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Transport types for MCP servers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Command-based execution (default)
    #[default]
    Stdio,
    /// Server-Sent-Events endpoint
    Sse,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Stdio => "stdio",
            TransportKind::Sse => "sse",
        }
    }

    /// Human-readable label used by the form's transport selector.
    pub fn label(self) -> &'static str {
        match self {
            TransportKind::Stdio => "Standard I/O",
            TransportKind::Sse => "Server-Sent Events",
        }
    }

    /// The other transport kind.
    pub fn toggled(self) -> Self {
        match self {
            TransportKind::Stdio => TransportKind::Sse,
            TransportKind::Sse => TransportKind::Stdio,
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransportKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "stdio" => Ok(TransportKind::Stdio),
            "sse" => Ok(TransportKind::Sse),
            _ => anyhow::bail!("Invalid transport: '{}'. Valid values: stdio, sse", value),
        }
    }
}

/// A single service connection descriptor.
///
/// Fields are exclusive by variant; changing transport means replacing the
/// whole descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum McpConnection {
    /// Local process launched with a command line
    Stdio {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Remote streaming HTTP endpoint
    Sse { url: String },
}

impl McpConnection {
    pub fn stdio<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        McpConnection::Stdio {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sse(url: impl Into<String>) -> Self {
        McpConnection::Sse { url: url.into() }
    }

    pub fn transport(&self) -> TransportKind {
        match self {
            McpConnection::Stdio { .. } => TransportKind::Stdio,
            McpConnection::Sse { .. } => TransportKind::Sse,
        }
    }

    /// Command line for stdio descriptors, URL for SSE descriptors.
    pub fn target(&self) -> String {
        match self {
            McpConnection::Stdio { command, args } if args.is_empty() => command.clone(),
            McpConnection::Stdio { command, args } => format!("{} {}", command, args.join(" ")),
            McpConnection::Sse { url } => url.clone(),
        }
    }

    /// Validate the descriptor fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            McpConnection::Stdio { command, .. } => {
                if command.trim().is_empty() {
                    return Err(ValidationError::MissingCommand);
                }
                Ok(())
            }
            McpConnection::Sse { url } => validate_url(url),
        }
    }
}

/// Check that `url` is an absolute URL.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    url::Url::parse(url.trim())
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
