//! Sending one user message and reconciling the reply.
//!
//! A send moves the session from idle to sending and back. The user's
//! message is appended before anything goes over the network, and
//! whatever happens next the conversation gets exactly one assistant
//! message in response: the reply on success, the service's error
//! text on failure.
use super::core::Session;
use super::error::SessionError;
use super::models::{Chat, Message};
use crate::client::{SendChatRequest, SendChatResponse, ServiceError};

pub const SEND_FAILED: &str = "Failed to send message";

#[derive(Debug)]
pub enum SendOutcome {
    /// Empty input or a send already in flight. Nothing changed.
    Ignored,
    Replied,
    /// The error text was appended to the conversation already
    Failed(SessionError),
}

impl SendOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, SendOutcome::Ignored)
    }
}

/// Text shown in place of a reply when sending fails.
pub fn failure_text(err: &ServiceError) -> String {
    err.detail_text()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| SEND_FAILED.to_string())
}

impl Session {
    /// Sets the draft to `text` and sends it.
    pub async fn send_text(&mut self, text: &str) -> SendOutcome {
        self.set_draft(text);
        self.send().await
    }

    /// Sends the current draft. There is no retry, a failed send is
    /// final for that turn.
    pub async fn send(&mut self) -> SendOutcome {
        let Some(req) = self.begin_send() else {
            return SendOutcome::Ignored;
        };
        let was_unsaved = req.chat_id.is_none();

        let result = self.service.send_chat(&req).await;
        let outcome = self.complete_send(result, was_unsaved).await;

        self.state.set_sending(false);
        outcome
    }

    // Guards against empty input and concurrent sends, then appends the
    // user's message optimistically and enters the sending state.
    pub(super) fn begin_send(&mut self) -> Option<SendChatRequest> {
        let text = self.state.draft().trim().to_string();
        if text.is_empty() || self.state.is_sending() {
            return None;
        }

        self.state.push_message(Message::user(&text));
        self.state.clear_draft();
        self.state.set_sending(true);

        Some(SendChatRequest {
            chat_id: self.state.selected_id().cloned(),
            message: text,
        })
    }

    async fn complete_send(
        &mut self,
        result: Result<SendChatResponse, ServiceError>,
        was_unsaved: bool,
    ) -> SendOutcome {
        let resp = match result {
            Ok(resp) => resp,
            Err(err) => {
                tracing::error!("Send error: {}", err);
                self.state.push_message(Message::assistant(&failure_text(&err), None));
                return SendOutcome::Failed(err.into());
            }
        };

        self.state.push_message(Message::assistant(&resp.response, resp.emotion));

        // The service created a chat for this conversation. Hold on to
        // it until the refreshed list brings in its real summary.
        if was_unsaved && self.state.selected().is_none() {
            if let Some(chat_id) = resp.chat_id {
                tracing::debug!("Conversation persisted as chat {}", chat_id);
                self.state.select(Chat::provisional(chat_id));
                if let Err(err) = self.load_chats(false).await {
                    tracing::warn!("Error refreshing chats after first send: {}", err);
                }
            }
        }

        SendOutcome::Replied
    }
}
