use super::error::SessionError;
use super::models::{Chat, ChatId, ChatSummary, Message};
use super::state::SessionState;
use crate::client::{BoxedChatService, ServiceError};

/// Result of the save that happens implicitly when starting a new
/// conversation. Unlike `Session::save_chat` a failure here is only
/// reported back, it never stops the new conversation from starting.
#[derive(Debug)]
pub enum BestEffortSave {
    /// Nothing was selected so there was nothing to save
    Skipped,
    Saved(ChatSummary),
    Failed(ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined and nothing was sent to the service
    Cancelled,
    Deleted,
}

/// The conversation session controller. Holds the session state and
/// the service it syncs with. Operations suspend only while waiting
/// on the service and apply any local recovery (clearing stale lists
/// or history) before returning an error, so callers only have to
/// decide how to present it.
pub struct Session {
    pub(super) state: SessionState,
    pub(super) service: BoxedChatService,
}

impl Session {
    pub fn new(service: BoxedChatService) -> Self {
        Self {
            state: SessionState::new(),
            service,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Updates the pending input that the next `send` will use.
    pub fn set_draft(&mut self, text: &str) {
        self.state.set_draft(text);
    }

    /// Fetches the chat list and replaces the local one. With
    /// `select_latest` the last chat in the order the service returned
    /// them gets opened.
    ///
    /// On any failure other than authorization the chat list is
    /// cleared. History is never touched by a failed load.
    pub async fn load_chats(&mut self, select_latest: bool) -> Result<(), SessionError> {
        let chats = match self.service.fetch_chats().await {
            Ok(chats) => chats,
            Err(err) if err.is_unauthorized() => {
                tracing::info!("Loading chats requires login");
                return Err(SessionError::Unauthorized);
            }
            Err(err) => {
                tracing::error!("Error loading chats: {}", err);
                self.state.clear_chats();
                return Err(err.into());
            }
        };

        tracing::debug!("Loaded {} chats", chats.len());
        let latest = if select_latest { chats.last().cloned() } else { None };
        self.state.replace_chats(chats);

        if latest.is_some() {
            self.select_chat(latest).await?;
        }

        Ok(())
    }

    /// Makes `chat` the selected conversation and replaces the history
    /// with its messages. `None` does nothing. If the messages can't
    /// be fetched the history is cleared rather than left showing the
    /// previous conversation.
    pub async fn select_chat(&mut self, chat: Option<Chat>) -> Result<(), SessionError> {
        let Some(chat) = chat else {
            return Ok(());
        };

        let chat_id = chat.id.clone();
        self.state.select(chat);

        match self.service.fetch_chat_messages(&chat_id).await {
            Ok(remote) => {
                let messages: Vec<Message> = remote.into_iter().map(Message::from).collect();
                tracing::debug!("Selected chat {} with {} messages", chat_id, messages.len());
                self.state.replace_history(messages);
                Ok(())
            }
            Err(err) => {
                tracing::error!("Error fetching messages for chat {}: {}", chat_id, err);
                self.state.clear_history();
                Err(err.into())
            }
        }
    }

    /// Starts a fresh, unsaved conversation. The selected chat, if any,
    /// is saved and summarized first on a best-effort basis.
    pub async fn new_chat(&mut self) -> BestEffortSave {
        let save = match self.state.selected_id().cloned() {
            Some(chat_id) => match self.service.save_conversation(&chat_id).await {
                Ok(summary) => BestEffortSave::Saved(summary),
                Err(err) => {
                    tracing::error!("Error saving chat {} before new chat: {}", chat_id, err);
                    BestEffortSave::Failed(err)
                }
            },
            None => BestEffortSave::Skipped,
        };

        self.state.clear_history();
        self.state.deselect();

        save
    }

    /// Saves and summarizes the selected chat, then refreshes the chat
    /// list since the title, emotion and date may have changed.
    pub async fn save_chat(&mut self) -> Result<ChatSummary, SessionError> {
        let Some(chat_id) = self.state.selected_id().cloned() else {
            return Err(SessionError::NoChatSelected);
        };

        let summary = self.service.save_conversation(&chat_id).await.map_err(|err| {
            tracing::error!("Error saving chat {}: {}", chat_id, err);
            SessionError::from(err)
        })?;

        // The save itself succeeded, a stale list isn't worth failing over
        if let Err(err) = self.load_chats(false).await {
            tracing::warn!("Error refreshing chats after save: {}", err);
        }

        Ok(summary)
    }

    /// Deletes a chat after `confirm` agrees to it. The chat is only
    /// removed locally once the service confirms the delete.
    pub async fn delete_chat<F>(
        &mut self,
        chat_id: &ChatId,
        confirm: F,
    ) -> Result<DeleteOutcome, SessionError>
    where
        F: FnOnce(&ChatId) -> bool,
    {
        if !confirm(chat_id) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.service.delete_chat(chat_id).await.map_err(|err| {
            tracing::error!("Error deleting chat {}: {}", chat_id, err);
            SessionError::from(err)
        })?;

        self.state.remove_chat(chat_id);
        if self.state.selected_id() == Some(chat_id) {
            self.state.deselect();
            self.state.clear_history();
        }
        tracing::info!("Deleted chat {}", chat_id);

        Ok(DeleteOutcome::Deleted)
    }
}
