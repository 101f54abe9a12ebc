use anyhow::{Result, anyhow};

use super::http_service;
use crate::core::AppConfig;
use crate::session::{Chat, Session, SessionError};

pub fn format_chat_line(index: usize, chat: &Chat) -> String {
    let date = chat
        .summary
        .as_ref()
        .and_then(|s| s.created_at)
        .or(chat.created_at)
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let line = match chat.dominant_emotion() {
        Some(emotion) => format!("{:>3}. {} [{}] {}", index, chat.title(), emotion, date),
        None => format!("{:>3}. {} {}", index, chat.title(), date),
    };
    line.trim_end().to_string()
}

pub async fn run(config: &AppConfig, search: Option<String>) -> Result<()> {
    let service = http_service(config)?;
    let mut session = Session::new(Box::new(service));

    match session.load_chats(false).await {
        Ok(()) => {}
        Err(SessionError::Unauthorized) => {
            return Err(anyhow!("Not logged in. Run `nafas login` first."));
        }
        Err(err) => return Err(anyhow!("Could not load chats: {}", err.user_message())),
    }

    let state = session.state();
    let chats = state.search_chats(search.as_deref().unwrap_or(""));
    if chats.is_empty() {
        println!("No saved conversations");
    }
    for (i, chat) in chats.iter().enumerate() {
        println!("{}", format_chat_line(i + 1, chat));
    }

    Ok(())
}
