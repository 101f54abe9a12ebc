use serde::Deserialize;
use thiserror::Error;

const DETAIL_SEPARATOR: &str = " | ";

/// One entry of a structured validation error, e.g.
/// `{"loc": ["body", "message"], "msg": "field required"}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ErrorItem {
    pub msg: String,
}

/// The `detail` of an error response is either a list of structured
/// items or a plain message.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Items(Vec<ErrorItem>),
    Message(String),
}

impl ErrorDetail {
    /// Flattens the detail into one line of text.
    pub fn text(&self) -> String {
        match self {
            ErrorDetail::Items(items) => items
                .iter()
                .map(|i| i.msg.as_str())
                .collect::<Vec<&str>>()
                .join(DETAIL_SEPARATOR),
            ErrorDetail::Message(msg) => msg.clone(),
        }
    }

    /// Parses an error response body. Anything that doesn't carry a
    /// usable `detail` or `message` yields `None`.
    pub fn from_body(body: &str) -> Option<Self> {
        #[derive(Deserialize)]
        struct ErrorBody {
            detail: Option<ErrorDetail>,
            message: Option<String>,
        }

        let body: ErrorBody = serde_json::from_str(body).ok()?;
        let detail = body.detail.or(body.message.map(ErrorDetail::Message))?;
        if detail.text().trim().is_empty() {
            None
        } else {
            Some(detail)
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No credential is stored or the service rejected it
    #[error("not authorized")]
    Unauthorized { detail: Option<ErrorDetail> },

    #[error("request failed with status {status}")]
    Status {
        status: u16,
        detail: Option<ErrorDetail>,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("credential store error: {0}")]
    Credentials(#[from] std::io::Error),
}

impl ServiceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Unauthorized { .. })
    }

    /// Human readable text extracted from the error payload, if the
    /// service sent one.
    pub fn detail_text(&self) -> Option<String> {
        match self {
            ServiceError::Unauthorized { detail } | ServiceError::Status { detail, .. } => {
                detail.as_ref().map(ErrorDetail::text)
            }
            _ => None,
        }
    }
}
