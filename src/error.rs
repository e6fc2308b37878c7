use thiserror::Error;

/// Main error type for Elastic Email API calls.
///
/// Every failure the request pipeline can hit is one of these variants. They
/// are carried as data inside [`Response`](crate::Response) rather than
/// returned early, so a caller always gets a `Response` back.
#[derive(Debug, Error)]
pub enum Error {
    /// Client configuration is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be assembled
    #[error("failed to build request: {message}")]
    Build {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// The call was cancelled before or during dispatch
    #[error("request cancelled")]
    Cancelled,

    /// Network-level failure (DNS, TLS, connection reset, body read)
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("empty response body")]
    EmptyBody,

    /// The response declared a media type other than JSON
    #[error("expected json, got [{media_type}]")]
    ContentType { media_type: String },

    /// The body claimed to be JSON but did not decode into the envelope
    #[error("parsing json api response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed envelope reporting `success: false`
    #[error("API error: {message}")]
    Api { message: String },
}

impl Error {
    pub(crate) fn build(message: impl Into<String>) -> Self {
        Error::Build {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }

    /// Check if this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Check if this error was reported by the remote API itself
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api { .. })
    }

    /// Get the message the remote API returned, if this is an API error
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Error::Api { message } => Some(message),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Build {
            message: "invalid request url".to_string(),
            source: Some(err),
        }
    }
}

/// Result type for Elastic Email operations
pub type Result<T> = std::result::Result<T, Error>;
