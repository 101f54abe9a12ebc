use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};

use super::public::SaveConversationRequest;
use super::{
    AccessToken, ChatService, Credentials, ErrorDetail, Registration, RemoteMessage,
    SendChatRequest, SendChatResponse, ServiceError,
};
use crate::core::{AppConfig, BoxedCredentialStore};
use crate::session::models::{Chat, ChatId, ChatSummary};

/// Talks to the chat service over HTTP with JSON payloads. The bearer
/// token is read from the credential store on every request so a
/// login or logout takes effect immediately.
pub struct HttpChatService {
    api_base_url: String,
    client: reqwest::Client,
    credentials: BoxedCredentialStore,
}

impl HttpChatService {
    pub fn new(
        api_base_url: &str,
        credentials: BoxedCredentialStore,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
        })
    }

    pub fn from_config(
        config: &AppConfig,
        credentials: BoxedCredentialStore,
    ) -> Result<Self, ServiceError> {
        Self::new(
            &config.api_url,
            credentials,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    fn chat_url(&self, chat_id: &ChatId, suffix: &str) -> String {
        self.url(&format!(
            "/chats/{}{}",
            urlencoding::encode(chat_id.as_str()),
            suffix
        ))
    }

    // Missing credentials never reach the network
    fn bearer_token(&self) -> Result<String, ServiceError> {
        self.credentials
            .load()?
            .ok_or(ServiceError::Unauthorized { detail: None })
    }

    async fn send_authorized(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        let token = self.bearer_token()?;
        let resp = req.bearer_auth(token).send().await?;
        check_status(resp, true).await
    }
}

/// Turns non-success responses into a `ServiceError`, keeping whatever
/// detail the service put in the body. A 401 only means "log in
/// again" for requests that carried a token.
async fn check_status(resp: Response, authenticated: bool) -> Result<Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    let detail = ErrorDetail::from_body(&body);
    tracing::warn!("API error {} from {}: {}", status, url, body);

    if authenticated && status == StatusCode::UNAUTHORIZED {
        Err(ServiceError::Unauthorized { detail })
    } else {
        Err(ServiceError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn register_user(&self, registration: &Registration) -> Result<(), ServiceError> {
        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(registration)
            .send()
            .await?;
        check_status(resp, false).await?;
        Ok(())
    }

    async fn login_user(&self, credentials: &Credentials) -> Result<AccessToken, ServiceError> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        let token = check_status(resp, false).await?.json().await?;
        Ok(token)
    }

    async fn send_chat(&self, req: &SendChatRequest) -> Result<SendChatResponse, ServiceError> {
        let resp = self
            .send_authorized(self.client.post(self.url("/api/chat")).json(req))
            .await?;
        Ok(resp.json().await?)
    }

    async fn save_conversation(&self, chat_id: &ChatId) -> Result<ChatSummary, ServiceError> {
        let payload = SaveConversationRequest {
            chat_id: chat_id.clone(),
        };
        let resp = self
            .send_authorized(self.client.post(self.url("/save-conversation")).json(&payload))
            .await?;
        Ok(resp.json().await?)
    }

    async fn fetch_chat_messages(
        &self,
        chat_id: &ChatId,
    ) -> Result<Vec<RemoteMessage>, ServiceError> {
        let resp = self
            .send_authorized(self.client.get(self.chat_url(chat_id, "/messages")))
            .await?;
        Ok(resp.json().await?)
    }

    async fn fetch_chats(&self) -> Result<Vec<Chat>, ServiceError> {
        let resp = self
            .send_authorized(self.client.get(self.url("/chats")))
            .await?;
        Ok(resp.json().await?)
    }

    async fn delete_chat(&self, chat_id: &ChatId) -> Result<(), ServiceError> {
        self.send_authorized(self.client.delete(self.chat_url(chat_id, "")))
            .await?;
        Ok(())
    }
}
