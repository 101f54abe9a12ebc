//! Request and response payloads of the chat service
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionVector;
use crate::session::models::{ChatId, Message, Sender};

#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SendChatRequest {
    pub chat_id: Option<ChatId>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SendChatResponse {
    pub response: String,
    #[serde(default)]
    pub emotion: Option<EmotionVector>,
    #[serde(default)]
    pub chat_id: Option<ChatId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SaveConversationRequest {
    pub chat_id: ChatId,
}

/// A stored message as the service returns it. `sender` is the raw
/// label and only gets interpreted when converted into a `Message`.
#[derive(Clone, Debug, Deserialize)]
pub struct RemoteMessage {
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub emotion: Option<EmotionVector>,
}

impl From<RemoteMessage> for Message {
    fn from(remote: RemoteMessage) -> Self {
        Message {
            sender: Sender::from_raw(&remote.sender),
            text: remote.text,
            emotion: remote.emotion,
        }
    }
}
