//! The core models for a conversation held by the client.
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::emotion::EmotionVector;

pub const UNTITLED: &str = "Untitled";
pub const NO_SUMMARY: &str = "No summary";
pub const PROVISIONAL_TITLE: &str = "New conversation";

/// Identifier of a persisted chat. The service hands out integers but
/// nothing on this side depends on that so it's kept as a string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChatId {
    Int(i64),
    Str(String),
}

impl<'de> Deserialize<'de> for ChatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawChatId::deserialize(deserializer)? {
            RawChatId::Int(id) => ChatId::from(id),
            RawChatId::Str(id) => ChatId(id),
        })
    }
}

// Ids in canonical integer form go back over the wire as integers so
// the service's validation accepts them. Anything else, such as
// "007" or "+5", is sent verbatim as a string.
impl Serialize for ChatId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.parse::<i64>() {
            Ok(id) if id.to_string() == self.0 => serializer.serialize_i64(id),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

// The service emits naive timestamps (no offset) which are UTC.
// RFC 3339 timestamps are accepted too.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ts| Some(ts.and_utc()))
        .map_err(serde::de::Error::custom)
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ChatSummary {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub dominant_emotion: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatSummary {
    fn is_blank(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.dominant_emotion.is_none()
            && self.created_at.is_none()
    }
}

// A chat without a summary is sent as a summary object whose fields
// are all null. Collapse that to `None`.
fn deserialize_summary<'de, D>(deserializer: D) -> Result<Option<ChatSummary>, D::Error>
where
    D: Deserializer<'de>,
{
    let summary = Option::<ChatSummary>::deserialize(deserializer)?;
    Ok(summary.filter(|s| !s.is_blank()))
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_summary")]
    pub summary: Option<ChatSummary>,
}

impl Chat {
    /// A stand-in for a chat the service just created, used until the
    /// chat list is refreshed with its real summary.
    pub fn provisional(id: ChatId) -> Self {
        Self {
            id,
            created_at: None,
            summary: Some(ChatSummary {
                title: Some(PROVISIONAL_TITLE.to_string()),
                ..Default::default()
            }),
        }
    }

    pub fn is_summarized(&self) -> bool {
        self.summary.is_some()
    }

    pub fn title(&self) -> &str {
        self.summary
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .unwrap_or(UNTITLED)
    }

    pub fn summary_text(&self) -> &str {
        self.summary
            .as_ref()
            .and_then(|s| s.summary.as_deref())
            .unwrap_or(NO_SUMMARY)
    }

    pub fn dominant_emotion(&self) -> Option<&str> {
        self.summary.as_ref().and_then(|s| s.dominant_emotion.as_deref())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Maps the service's free-form sender label. Only `"user"` is the
    /// person at the keyboard, everything else is the assistant.
    pub fn from_raw(raw: &str) -> Self {
        if raw == "user" {
            Sender::User
        } else {
            Sender::Assistant
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub emotion: Option<EmotionVector>,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            text: text.to_string(),
            emotion: None,
        }
    }

    pub fn assistant(text: &str, emotion: Option<EmotionVector>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.to_string(),
            emotion,
        }
    }
}

/// Chronological messages of the active conversation. Only ever
/// appended to or replaced as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript(Vec<Message>);

impl Transcript {
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, msg: Message) {
        self.0.push(msg)
    }

    pub(crate) fn replace(&mut self, messages: Vec<Message>) {
        self.0 = messages;
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear()
    }
}
