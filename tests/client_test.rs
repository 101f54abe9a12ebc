//! Integration tests for the HTTP chat service client

mod test_utils;

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use nafas::client::{ChatService, Credentials, ErrorDetail, SendChatRequest, ServiceError};
    use nafas::session::ChatId;

    use crate::test_utils::{BEARER, CHATS_BODY, MESSAGES_BODY, TOKEN, test_service};

    #[tokio::test]
    async fn it_fetches_chats_with_the_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/chats")
            .match_header("authorization", BEARER)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(CHATS_BODY)
            .expect(1)
            .create_async()
            .await;

        let service = test_service(&server.url(), Some(TOKEN));
        let chats = service.fetch_chats().await.unwrap();

        mock.assert_async().await;
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].id, ChatId::new("1"));
        assert_eq!(chats[0].title(), "Exam stress");
        assert!(!chats[1].is_summarized());
    }

    #[tokio::test]
    async fn it_never_calls_the_service_without_a_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/chats")
            .with_status(200)
            .with_body("[]")
            .expect(0)
            .create_async()
            .await;

        let service = test_service(&server.url(), None);
        let result = service.fetch_chats().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ServiceError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn it_maps_401_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/chats/3/messages")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Could not validate credentials"}"#)
            .create_async()
            .await;

        let service = test_service(&server.url(), Some(TOKEN));
        let err = service
            .fetch_chat_messages(&ChatId::new("3"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(
            err.detail_text(),
            Some(String::from("Could not validate credentials"))
        );
    }

    #[tokio::test]
    async fn it_fetches_chat_messages() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/chats/2/messages")
            .match_header("authorization", BEARER)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(MESSAGES_BODY)
            .create_async()
            .await;

        let service = test_service(&server.url(), Some(TOKEN));
        let messages = service
            .fetch_chat_messages(&ChatId::new("2"))
            .await
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, "user");
        assert_eq!(messages[1].text, "That sounds hard. What happened?");
        assert!(messages[1].emotion.is_none());
    }

    #[tokio::test]
    async fn it_sends_a_chat_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("authorization", BEARER)
            .match_body(Matcher::Json(json!({"chat_id": 4, "message": "hello"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"response": "Hi there", "emotion": {"joy": 91.5, "neutral": 8.5}, "chat_id": 4}"#,
            )
            .create_async()
            .await;

        let service = test_service(&server.url(), Some(TOKEN));
        let resp = service
            .send_chat(&SendChatRequest {
                chat_id: Some(ChatId::new("4")),
                message: String::from("hello"),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(resp.response, "Hi there");
        assert_eq!(resp.chat_id, Some(ChatId::new("4")));
        assert_eq!(resp.emotion.unwrap().get("joy"), Some(91.5));
    }

    #[tokio::test]
    async fn it_keeps_structured_error_details() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"detail": [{"loc": ["body", "message"], "msg": "field required", "type": "missing"}, {"loc": ["body"], "msg": "bad chat", "type": "value_error"}]}"#,
            )
            .create_async()
            .await;

        let service = test_service(&server.url(), Some(TOKEN));
        let err = service
            .send_chat(&SendChatRequest {
                chat_id: None,
                message: String::from("hello"),
            })
            .await
            .unwrap_err();

        match &err {
            ServiceError::Status { status, detail } => {
                assert_eq!(*status, 422);
                assert!(matches!(detail, Some(ErrorDetail::Items(items)) if items.len() == 2));
            }
            other => panic!("Unexpected error {:?}", other),
        }
        assert_eq!(
            err.detail_text(),
            Some(String::from("field required | bad chat"))
        );
    }

    #[tokio::test]
    async fn it_saves_a_conversation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/save-conversation")
            .match_header("authorization", BEARER)
            .match_body(Matcher::Json(json!({"chat_id": 9})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"message": "Conversation saved and summarized", "chat_id": 9, "title": "Exam stress", "summary": "Worried about exams.", "dominant_emotion": "fear"}"#,
            )
            .create_async()
            .await;

        let service = test_service(&server.url(), Some(TOKEN));
        let summary = service
            .save_conversation(&ChatId::new("9"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(summary.title.as_deref(), Some("Exam stress"));
        assert_eq!(summary.dominant_emotion.as_deref(), Some("fear"));
        assert!(summary.created_at.is_none());
    }

    #[tokio::test]
    async fn it_deletes_a_chat() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/chats/7")
            .match_header("authorization", BEARER)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Chat deleted successfully"}"#)
            .expect(1)
            .create_async()
            .await;

        let service = test_service(&server.url(), Some(TOKEN));
        service.delete_chat(&ChatId::new("7")).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_logs_in_without_a_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(json!({"username": "sara", "password": "secret"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "abc.def.ghi", "token_type": "bearer"}"#)
            .create_async()
            .await;

        let service = test_service(&server.url(), None);
        let token = service
            .login_user(&Credentials {
                username: String::from("sara"),
                password: String::from("secret"),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(token.access_token, "abc.def.ghi");
    }

    #[tokio::test]
    async fn it_treats_a_rejected_login_as_a_plain_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Invalid username or password"}"#)
            .create_async()
            .await;

        let service = test_service(&server.url(), None);
        let err = service
            .login_user(&Credentials {
                username: String::from("sara"),
                password: String::from("wrong"),
            })
            .await
            .unwrap_err();

        assert!(!err.is_unauthorized());
        assert!(matches!(err, ServiceError::Status { status: 401, .. }));
        assert_eq!(
            err.detail_text(),
            Some(String::from("Invalid username or password"))
        );
    }
}
