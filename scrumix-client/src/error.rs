/// Messages the backend uses when a session is missing or expired. Some
/// proxies rewrite the status code, so the message is checked as well.
const AUTHENTICATION_MARKERS: [&str; 2] =
    ["Authentication failed", "Could not validate credentials"];

pub const TIMEOUT_MESSAGE: &str = "Request timed out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ErrorKind {
    /// The request never produced an HTTP response
    Transport,
    /// Non-2xx response
    Http,
    Authentication,
    /// Rejected client-side before any network call
    Validation,
    /// Response body did not match the expected shape
    Decode,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, TIMEOUT_MESSAGE)
    }

    /// Error for a non-2xx response. 401 and the well-known credential
    /// messages are classified as authentication failures.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = if status == 401 || is_authentication_message(&message) {
            ErrorKind::Authentication
        } else {
            ErrorKind::Http
        };
        Self {
            kind,
            message,
            status: Some(status),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_authentication(&self) -> bool {
        self.kind == ErrorKind::Authentication || is_authentication_message(&self.message)
    }
}

impl From<surf::Error> for Error {
    fn from(err: surf::Error) -> Self {
        Self::transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::transport(format!("Invalid request URL: {}", err))
    }
}

fn is_authentication_message(message: &str) -> bool {
    AUTHENTICATION_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
