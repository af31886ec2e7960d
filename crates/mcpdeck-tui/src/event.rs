//! Terminal event polling

use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};

use crate::message::Message;

/// Poll for a terminal event, producing `Tick` when `timeout` elapses
/// without one.
pub fn poll(timeout: Duration) -> anyhow::Result<Option<Message>> {
    if !event::poll(timeout)? {
        return Ok(Some(Message::Tick));
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(Message::Key(key))),
        Event::Key(key) => {
            tracing::trace!(?key, "ignoring non-press key event");
            Ok(None)
        }
        _ => Ok(None),
    }
}
