use super::models::{Chat, ChatId, Message, Transcript};

/// Everything the client knows about the conversation on screen.
///
/// Fields are only readable from outside the session module. Every
/// change goes through the operations on `Session` which keep these
/// invariants:
/// - `sending` is true for the duration of exactly one in-flight send
/// - `selected` is `None` while the conversation hasn't been persisted
/// - `history` always belongs to `selected` and is replaced as a
///   whole when the selection changes
#[derive(Debug, Default)]
pub struct SessionState {
    chats: Vec<Chat>,
    selected: Option<Chat>,
    history: Transcript,
    sending: bool,
    draft: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn selected(&self) -> Option<&Chat> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<&ChatId> {
        self.selected.as_ref().map(|c| &c.id)
    }

    pub fn history(&self) -> &Transcript {
        &self.history
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn find_chat(&self, id: &ChatId) -> Option<&Chat> {
        self.chats.iter().find(|c| &c.id == id)
    }

    /// Chats whose title contains `query`, ignoring case. Chats without
    /// a title only show up for an empty query.
    pub fn search_chats(&self, query: &str) -> Vec<&Chat> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.chats.iter().collect();
        }
        self.chats
            .iter()
            .filter(|c| {
                c.summary
                    .as_ref()
                    .and_then(|s| s.title.as_ref())
                    .is_some_and(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Replaces the chat list. When the selected chat shows up in the
    /// new list its entry replaces the selection so provisional chats
    /// pick up their real summary. History is left alone.
    pub(super) fn replace_chats(&mut self, chats: Vec<Chat>) {
        if let Some(selected) = self.selected.as_mut() {
            if let Some(fresh) = chats.iter().find(|c| c.id == selected.id) {
                *selected = fresh.clone();
            }
        }
        self.chats = chats;
    }

    pub(super) fn clear_chats(&mut self) {
        self.chats.clear();
    }

    pub(super) fn remove_chat(&mut self, id: &ChatId) {
        self.chats.retain(|c| &c.id != id);
    }

    pub(super) fn select(&mut self, chat: Chat) {
        self.selected = Some(chat);
    }

    pub(super) fn deselect(&mut self) {
        self.selected = None;
    }

    pub(super) fn replace_history(&mut self, messages: Vec<Message>) {
        self.history.replace(messages);
    }

    pub(super) fn clear_history(&mut self) {
        self.history.clear();
    }

    pub(super) fn push_message(&mut self, msg: Message) {
        self.history.push(msg);
    }

    pub(super) fn set_sending(&mut self, sending: bool) {
        self.sending = sending;
    }

    pub(super) fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub(super) fn clear_draft(&mut self) {
        self.draft.clear();
    }
}
