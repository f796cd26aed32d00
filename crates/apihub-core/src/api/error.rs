use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Failures of a credential gateway call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Bad local input. Raised before any network I/O.
    #[error("{0}")]
    Validation(String),

    /// The remote answered, but not with the expected shape.
    #[error("Invalid response: {0}")]
    Protocol(String),

    /// The remote answered with a non-success status.
    #[error("Remote error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Remote { status: u16, message: Option<String> },

    /// No response was obtained.
    #[error("Network error: {0}")]
    Transport(String),
}

impl AuthError {
    /// Message to show the user. Validation and protocol messages are shown
    /// verbatim, remote messages when the service sent one, and `fallback`
    /// otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Validation(msg) | AuthError::Protocol(msg) => msg.clone(),
            AuthError::Remote {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            AuthError::Remote { .. } | AuthError::Transport(_) => fallback.to_string(),
        }
    }

    /// Build a remote error from a status code and raw body.
    ///
    /// The service reports failures as `{"message": "..."}`; an `error` field
    /// is accepted too.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
            })
            .filter(|m| !m.trim().is_empty());
        AuthError::Remote { status, message }
    }
}

/// Failures below the HTTP response level.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl From<TransportError> for AuthError {
    fn from(e: TransportError) -> Self {
        AuthError::Transport(e.to_string())
    }
}

/// Truncate a response body to avoid logging excessive data
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
