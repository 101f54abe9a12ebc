//! A scripted `ChatService` for exercising the session without a
//! network.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::{
    AccessToken, ChatService, Credentials, Registration, RemoteMessage, SendChatRequest,
    SendChatResponse, ServiceError,
};
use crate::session::models::{Chat, ChatId, ChatSummary};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Register,
    Login,
    SendChat(SendChatRequest),
    SaveConversation(ChatId),
    FetchChatMessages(ChatId),
    FetchChats,
    DeleteChat(ChatId),
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

type Scripted<T> = Mutex<VecDeque<Result<T, ServiceError>>>;

fn next<T>(script: &Scripted<T>, name: &str) -> Result<T, ServiceError> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("No scripted response left for {}", name))
}

/// Each call pops the next scripted result for that operation and
/// panics when the script runs out.
#[derive(Default)]
pub struct FakeService {
    log: CallLog,
    chats: Scripted<Vec<Chat>>,
    messages: Scripted<Vec<RemoteMessage>>,
    replies: Scripted<SendChatResponse>,
    saves: Scripted<ChatSummary>,
    deletes: Scripted<()>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn chats(self, result: Result<Vec<Chat>, ServiceError>) -> Self {
        self.chats.lock().unwrap().push_back(result);
        self
    }

    pub fn messages(self, result: Result<Vec<RemoteMessage>, ServiceError>) -> Self {
        self.messages.lock().unwrap().push_back(result);
        self
    }

    pub fn replies(self, result: Result<SendChatResponse, ServiceError>) -> Self {
        self.replies.lock().unwrap().push_back(result);
        self
    }

    pub fn saves(self, result: Result<ChatSummary, ServiceError>) -> Self {
        self.saves.lock().unwrap().push_back(result);
        self
    }

    pub fn deletes(self, result: Result<(), ServiceError>) -> Self {
        self.deletes.lock().unwrap().push_back(result);
        self
    }
}

#[async_trait]
impl ChatService for FakeService {
    async fn register_user(&self, _registration: &Registration) -> Result<(), ServiceError> {
        self.log.record(Call::Register);
        Ok(())
    }

    async fn login_user(&self, _credentials: &Credentials) -> Result<AccessToken, ServiceError> {
        self.log.record(Call::Login);
        Ok(AccessToken {
            access_token: String::from("test-token"),
            token_type: Some(String::from("bearer")),
        })
    }

    async fn send_chat(&self, req: &SendChatRequest) -> Result<SendChatResponse, ServiceError> {
        self.log.record(Call::SendChat(req.clone()));
        next(&self.replies, "send_chat")
    }

    async fn save_conversation(&self, chat_id: &ChatId) -> Result<ChatSummary, ServiceError> {
        self.log.record(Call::SaveConversation(chat_id.clone()));
        next(&self.saves, "save_conversation")
    }

    async fn fetch_chat_messages(
        &self,
        chat_id: &ChatId,
    ) -> Result<Vec<RemoteMessage>, ServiceError> {
        self.log.record(Call::FetchChatMessages(chat_id.clone()));
        next(&self.messages, "fetch_chat_messages")
    }

    async fn fetch_chats(&self) -> Result<Vec<Chat>, ServiceError> {
        self.log.record(Call::FetchChats);
        next(&self.chats, "fetch_chats")
    }

    async fn delete_chat(&self, chat_id: &ChatId) -> Result<(), ServiceError> {
        self.log.record(Call::DeleteChat(chat_id.clone()));
        next(&self.deletes, "delete_chat")
    }
}

pub fn remote_error(status: u16) -> ServiceError {
    ServiceError::Status {
        status,
        detail: None,
    }
}

pub fn summarized(id: &str, title: &str) -> Chat {
    Chat {
        id: ChatId::new(id),
        created_at: None,
        summary: Some(ChatSummary {
            title: Some(title.to_string()),
            ..Default::default()
        }),
    }
}
