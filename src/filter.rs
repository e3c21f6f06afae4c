//! Content filtering through a generative-language API.
//!
//! Before a note is stored, its title and content are each passed through a
//! [`ContentFilter`]. The filter is a best-effort transform, not a
//! sanitizer: callers must not treat its output as validated.
//!
//! - **[`GeminiFilter`]** posts the text to Gemini's `generateContent`.
//! - **[`IdentityFilter`]** returns the text unchanged
//!   (`filter.provider = "disabled"`).
//!
//! Use [`create_filter`] to build the one the config asks for.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FilterConfig;
use crate::error::{NoteError, Result};

const SERVICE: &str = "Gemini API";

#[async_trait]
pub trait ContentFilter: Send + Sync {
    /// Returns the filtered form of `text`, or `text` itself when the
    /// upstream response carries no filtered version.
    async fn filter(&self, text: &str) -> Result<String>;
}

/// Builds the filter selected by `filter.provider`.
///
/// # Errors
///
/// Returns [`NoteError::Config`] for an unknown provider name.
pub fn create_filter(config: &FilterConfig) -> Result<Arc<dyn ContentFilter>> {
    match config.provider.as_str() {
        "disabled" => Ok(Arc::new(IdentityFilter)),
        "gemini" => Ok(Arc::new(GeminiFilter::new(config.clone())?)),
        other => Err(NoteError::Config(format!(
            "unknown filter provider: {}",
            other
        ))),
    }
}

/// Pass-through filter.
pub struct IdentityFilter;

#[async_trait]
impl ContentFilter for IdentityFilter {
    async fn filter(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

/// Filter backed by Gemini's `generateContent` endpoint.
///
/// The note text is sent as the user turn and the configured instruction as
/// the system instruction. Candidate text is only trusted as a filtered
/// version when an instruction was sent; otherwise the model is just
/// answering the note and its reply is ignored.
pub struct GeminiFilter {
    client: reqwest::Client,
    config: FilterConfig,
}

impl GeminiFilter {
    /// Creates the filter and its HTTP client. The API key is checked on
    /// first use, not here.
    pub fn new(config: FilterConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn instruction(&self) -> Option<&str> {
        self.config
            .instruction
            .as_deref()
            .filter(|i| !i.trim().is_empty())
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "contents": [{ "parts": [{ "text": text }] }],
        });
        if let Some(instruction) = self.instruction() {
            body["systemInstruction"] = serde_json::json!({ "parts": [{ "text": instruction }] });
        }
        body
    }
}

#[async_trait]
impl ContentFilter for GeminiFilter {
    async fn filter(&self, text: &str) -> Result<String> {
        let key = self.config.api_key.as_deref().ok_or_else(|| {
            NoteError::Config(format!("missing Gemini API key (set {})", self.config.key_env))
        })?;

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%status, "content filter request failed");
            return Err(NoteError::upstream(SERVICE, status, body));
        }

        let parsed: FilterResponse =
            serde_json::from_str(&body).map_err(|e| NoteError::parse("filter response", e))?;
        let accept_candidates = self.instruction().is_some();
        Ok(parsed
            .filtered_text(accept_candidates)
            .unwrap_or_else(|| text.to_string()))
    }
}

/// Response body of the completion API.
///
/// A top-level `filteredContent` string wins when present; otherwise the
/// text parts of the first candidate are used, if the caller accepts them.
#[derive(Debug, Default, Deserialize)]
pub struct FilterResponse {
    #[serde(rename = "filteredContent", default)]
    pub filtered_content: Option<String>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl FilterResponse {
    /// The filtered text, or `None` if the response carries none.
    pub fn filtered_text(&self, accept_candidates: bool) -> Option<String> {
        if let Some(text) = self.filtered_content.as_deref().filter(|t| !t.is_empty()) {
            return Some(text.to_string());
        }
        if !accept_candidates {
            return None;
        }

        let content = self.candidates.first()?.content.as_ref()?;
        let joined: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        // Models end their answer with a newline the note never had.
        let trimmed = joined.trim_end_matches('\n');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
