use thiserror::Error;

use crate::client::ServiceError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The user needs to log in (again) before continuing
    #[error("not logged in or the login has expired")]
    Unauthorized,

    #[error("no conversation selected to save")]
    NoChatSelected,

    #[error(transparent)]
    Remote(ServiceError),
}

impl SessionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Unauthorized)
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Remote(err) => err.detail_text().unwrap_or_else(|| err.to_string()),
            other => other.to_string(),
        }
    }
}

impl From<ServiceError> for SessionError {
    fn from(err: ServiceError) -> Self {
        if err.is_unauthorized() {
            SessionError::Unauthorized
        } else {
            SessionError::Remote(err)
        }
    }
}
