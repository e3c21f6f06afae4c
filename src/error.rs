//! Error types shared by the repository client, the content filter, and
//! the HTTP router.
//!
//! Not-found is deliberately absent: a missing note is an ordinary
//! `Ok(None)` from [`NoteStore::get`](crate::store::NoteStore::get).

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, NoteError>;

/// Errors raised while talking to the upstream services.
#[derive(Error, Debug)]
pub enum NoteError {
    /// A required setting or secret is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// An upstream API answered with a non-success status.
    #[error("{service} error {status}: {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// An upstream payload did not have the expected shape.
    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored file contents were not valid base64 or UTF-8.
    #[error("failed to decode {0}")]
    Encoding(String),

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl NoteError {
    pub(crate) fn parse(what: impl Into<String>, source: serde_json::Error) -> Self {
        NoteError::Parse {
            what: what.into(),
            source,
        }
    }

    /// Builds an [`NoteError::Upstream`] from a response status and body text.
    pub(crate) fn upstream(
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    ) -> Self {
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        } else {
            body
        };
        NoteError::Upstream {
            service,
            status: status.as_u16(),
            message,
        }
    }
}
