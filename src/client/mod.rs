//! The boundary to the remote chat service.
use async_trait::async_trait;

pub mod error;
pub use error::{ErrorDetail, ErrorItem, ServiceError};

pub mod http;
pub use http::HttpChatService;

pub mod public;
pub use public::{
    AccessToken, Credentials, Registration, RemoteMessage, SendChatRequest, SendChatResponse,
};

use crate::session::models::{Chat, ChatId, ChatSummary};

/// Everything the client needs from the chat service. Implemented
/// over HTTP by `HttpChatService` and by fakes in tests.
#[async_trait]
pub trait ChatService {
    async fn register_user(&self, registration: &Registration) -> Result<(), ServiceError>;
    async fn login_user(&self, credentials: &Credentials) -> Result<AccessToken, ServiceError>;
    async fn send_chat(&self, req: &SendChatRequest) -> Result<SendChatResponse, ServiceError>;
    async fn save_conversation(&self, chat_id: &ChatId) -> Result<ChatSummary, ServiceError>;
    async fn fetch_chat_messages(&self, chat_id: &ChatId)
    -> Result<Vec<RemoteMessage>, ServiceError>;
    async fn fetch_chats(&self) -> Result<Vec<Chat>, ServiceError>;
    async fn delete_chat(&self, chat_id: &ChatId) -> Result<(), ServiceError>;
}

pub type BoxedChatService = Box<dyn ChatService + Send + Sync + 'static>;
