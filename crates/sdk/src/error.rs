use thiserror::Error;

/// Errors that can occur when calling the platform Web API.
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("missing API key")]
    MissingApiKey,
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error (status {status}): {message}")]
    ServerError { status: u16, message: String },
}

impl SdkError {
    pub(crate) fn server_error(status: u16, message: impl Into<String>) -> Self {
        SdkError::ServerError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status reported by the upstream, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::ServerError { status, .. } => Some(*status),
            SdkError::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
