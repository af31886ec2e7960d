//! Canned replies for the simulated chat.
//!
//! Replies are picked by keyword, checked in a fixed order; the first
//! keyword found in the lowercased message wins.

use rand::Rng;

use crate::mcp::McpConnection;

const HELP_REPLY: &str = "Available commands:\n- status: Check server status\n- version: Get server version\n- restart: Restart the server";
const SUBSCRIBE_REPLY: &str = "Subscribed to event stream. You will now receive real-time updates.";
const EVENTS_REPLY: &str = "Last 3 events:\n- user.login (2 min ago)\n- data.update (5 min ago)\n- system.restart (1 hour ago)";

/// Produce the reply `service` gives to `message`.
pub fn canned_reply<R: Rng + ?Sized>(
    message: &str,
    service: &str,
    connection: &McpConnection,
    rng: &mut R,
) -> String {
    let lowered = message.to_lowercase();

    match connection {
        McpConnection::Stdio { command, .. } => {
            if lowered.contains("help") {
                HELP_REPLY.to_string()
            } else if lowered.contains("status") {
                format!(
                    "{} is running normally. CPU: {}%, Memory: {}MB used",
                    service,
                    rng.gen_range(0..20),
                    rng.gen_range(0..500)
                )
            } else if lowered.contains("version") {
                format!(
                    "{} version: 1.{}.{}",
                    command,
                    rng.gen_range(0..10),
                    rng.gen_range(0..20)
                )
            } else {
                format!(
                    "Command processed: \"{}\"\nExecution completed successfully.",
                    message
                )
            }
        }
        McpConnection::Sse { .. } => {
            if lowered.contains("subscribe") {
                SUBSCRIBE_REPLY.to_string()
            } else if lowered.contains("events") {
                EVENTS_REPLY.to_string()
            } else {
                format!("Message sent to SSE endpoint: \"{}\"\nAcknowledged.", message)
            }
        }
    }
}
