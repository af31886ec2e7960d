//! Overview dashboard data: summary counts and per-server cards.
//!
//! Pure projections of the registry; front-ends only lay these out.

use serde::Serialize;

use crate::mcp::{McpConnection, TransportKind};
use crate::registry::ServiceRegistry;

/// URLs longer than this are shortened on cards.
pub const CARD_URL_LIMIT: usize = 30;

/// Summary counts for the dashboard header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub total: usize,
    pub stdio: usize,
    pub sse: usize,
}

impl RegistrySummary {
    pub fn of(registry: &ServiceRegistry) -> Self {
        Self {
            total: registry.len(),
            stdio: registry.count_by_transport(TransportKind::Stdio),
            sse: registry.count_by_transport(TransportKind::Sse),
        }
    }
}

/// One server card on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerCard {
    pub name: String,
    pub transport: TransportKind,
    /// `Command: node` or a shortened `URL: ...`
    pub description: String,
    /// `Args: ...` or `Server-Sent Events`
    pub detail: String,
    /// Full command line or URL, for list rows
    pub target: String,
}

impl ServerCard {
    pub fn new(name: &str, connection: &McpConnection) -> Self {
        let (description, detail) = match connection {
            McpConnection::Stdio { command, args } => {
                (format!("Command: {}", command), format!("Args: {}", args.join(" ")))
            }
            McpConnection::Sse { url } => (
                format!("URL: {}", shorten(url, CARD_URL_LIMIT)),
                "Server-Sent Events".to_string(),
            ),
        };
        Self {
            name: name.to_string(),
            transport: connection.transport(),
            description,
            detail,
            target: connection.target(),
        }
    }
}

/// Cards for every configured server, in registry order.
pub fn server_cards(registry: &ServiceRegistry) -> Vec<ServerCard> {
    registry
        .iter()
        .map(|(name, connection)| ServerCard::new(name, connection))
        .collect()
}

/// Keep the first `limit` characters, marking truncation with `...`.
pub fn shorten(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let summary = RegistrySummary::of(&ServiceRegistry::sample());
        assert_eq!(
            summary,
            RegistrySummary {
                total: 3,
                stdio: 2,
                sse: 1
            }
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = RegistrySummary::of(&ServiceRegistry::new());
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_stdio_card() {
        let card = ServerCard::new("auth", &McpConnection::stdio("python", ["-m", "auth"]));
        assert_eq!(card.description, "Command: python");
        assert_eq!(card.detail, "Args: -m auth");
        assert_eq!(card.target, "python -m auth");
    }

    #[test]
    fn test_sse_card_shortens_long_url() {
        let card = ServerCard::new(
            "feed",
            &McpConnection::sse("https://data-processor.example.com/events"),
        );
        assert_eq!(card.description, "URL: https://data-processor.example...");
        assert_eq!(card.detail, "Server-Sent Events");
        assert_eq!(card.target, "https://data-processor.example.com/events");
    }

    #[test]
    fn test_shorten_keeps_short_text() {
        assert_eq!(shorten("http://a.b", 30), "http://a.b");
        assert_eq!(shorten("abcdef", 3), "abc...");
    }
}
