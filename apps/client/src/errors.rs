use serde::Deserialize;
use thiserror::Error;

/// Coarse classification of every failure the client can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Server,
    Validation,
    Decode,
}

/// Error returned by every remote gateway operation.
///
/// Carries owned strings only so it can be cloned into the store's
/// lifecycle entries and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Validation(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Network(_) => ErrorKind::Network,
            GatewayError::Server { .. } => ErrorKind::Server,
            GatewayError::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }

    /// Builds a server error from a non-2xx response body.
    ///
    /// The backend reports failures as `{"message": "..."}`; anything else
    /// falls back to the operation's own text.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<ServerErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        GatewayError::Server { status, message }
    }

    pub fn malformed(status: u16, err: impl std::fmt::Display) -> Self {
        GatewayError::Server {
            status,
            message: format!("Malformed response: {err}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    message: Option<String>,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Network(e.to_string())
    }
}

/// Failure while encoding or decoding the persisted session blob.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed")]
    Decryption,

    #[error("Invalid encoding: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Invalid session payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Session blob too short")]
    Truncated,

    #[error("Session is incomplete")]
    Incomplete,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Decode
    }
}

/// Failure of the persistent key-value store backing the session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage write failed: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Session encoding failed: {0}")]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_uses_body_message() {
        let err = GatewayError::from_response(401, r#"{"message":"Invalid credentials"}"#, "Login failed");
        assert_eq!(
            err,
            GatewayError::Server {
                status: 401,
                message: "Invalid credentials".to_string()
            }
        );
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_server_error_falls_back_on_plain_body() {
        let err = GatewayError::from_response(500, "<html>oops</html>", "Login failed");
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[test]
    fn test_server_error_falls_back_on_blank_message() {
        let err = GatewayError::from_response(400, r#"{"message":"  "}"#, "Failed to fetch firms");
        assert_eq!(err.to_string(), "Failed to fetch firms");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(GatewayError::Network("x".into()).kind(), ErrorKind::Network);
        assert_eq!(GatewayError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(CodecError::Decryption.kind(), ErrorKind::Decode);
    }
}
