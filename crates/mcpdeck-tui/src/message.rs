//! Message types for the console (TEA pattern)

use crossterm::event::KeyEvent;

/// All possible messages/actions in the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Keyboard event from terminal
    Key(KeyEvent),

    /// Periodic tick; drains simulation events
    Tick,

    Quit,

    // ─────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────
    ShowOverview,
    ShowChat,
    SelectNext,
    SelectPrevious,

    // ─────────────────────────────────────────────────────────
    // Server management
    // ─────────────────────────────────────────────────────────
    OpenAddForm,
    OpenEditForm,
    RequestDelete,
    ConfirmDelete,
    CancelDelete,

    // ─────────────────────────────────────────────────────────
    // Form modal
    // ─────────────────────────────────────────────────────────
    FormNextField,
    FormPreviousField,
    FormInput(char),
    FormBackspace,
    FormToggleTransport,
    FormSubmit,
    FormDelete,
    FormCancel,

    // ─────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────
    ChatInput(char),
    ChatBackspace,
    ChatSend,
    ChatNextTab,
    ChatPreviousTab,
    Reconnect,
}
