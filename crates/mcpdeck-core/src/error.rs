//! Domain error types.
//!
//! Validation failures are surfaced inline by the front-ends and never
//! mutate the registry. Application plumbing (file I/O, parsing) uses
//! `anyhow` instead.

use thiserror::Error;

/// Rejection of a service name or connection descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Server name is required")]
    EmptyName,

    #[error("Server name must be at most {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    #[error("A service with the name '{0}' already exists")]
    DuplicateName(String),

    #[error("No service named '{0}' is configured")]
    UnknownService(String),

    #[error("Command is required for stdio connections")]
    MissingCommand,

    #[error("Please enter a valid URL: '{url}' ({reason})")]
    InvalidUrl { url: String, reason: String },
}

/// Rejection of a chat action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("No servers connected")]
    NoConnectedServers,

    #[error("No service named '{0}' is tracked by the chat")]
    UnknownService(String),
}
