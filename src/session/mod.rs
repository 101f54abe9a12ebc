//! The conversation session: the chat list, the selected chat, its
//! transcript and the operations that keep them in sync with the chat
//! service.
pub mod models;
pub use models::{Chat, ChatId, ChatSummary, Message, Sender, Transcript};

mod state;
pub use state::SessionState;

mod error;
pub use error::SessionError;

mod core;
pub use self::core::{BestEffortSave, DeleteOutcome, Session};

mod send;
pub use send::{SEND_FAILED, SendOutcome, failure_text};

#[cfg(test)]
mod testing;
