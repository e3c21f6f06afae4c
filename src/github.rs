//! GitHub contents-API note store.
//!
//! Each note is one JSON file, `<directory>/<id>.json`, on the configured
//! branch of `<owner>/<name>`. Writes go through `PUT /contents/{path}`
//! with a base64 body; reads list or look up the file and then fetch its
//! raw bytes from `download_url`.
//!
//! # Authentication
//!
//! Every request carries `Authorization: token <secret>` when a token is
//! configured, plus the configured `User-Agent` and
//! `Accept: application/vnd.github.v3+json`. Writes refuse to run without a
//! token; reads are attempted anyway, which works for public repositories.
//!
//! # Listing cost
//!
//! [`GitHubStore::list`] issues one listing request and then one request per
//! note file, sequentially, so it scales linearly with the number of notes.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Method, RequestBuilder, StatusCode};
use std::time::Duration;

use crate::config::RepositoryConfig;
use crate::error::{NoteError, Result};
use crate::models::{Note, NoteBody, UpstreamFile, NOTE_SUFFIX};
use crate::store::NoteStore;

const SERVICE: &str = "GitHub API";
const ACCEPT: &str = "application/vnd.github.v3+json";

/// [`NoteStore`] over one directory of one GitHub repository.
pub struct GitHubStore {
    client: reqwest::Client,
    config: RepositoryConfig,
}

impl GitHubStore {
    /// Creates the store and its HTTP client.
    ///
    /// No request is made here; a missing token only surfaces on
    /// [`put`](NoteStore::put).
    pub fn new(config: RepositoryConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Repository path of a note file, e.g. `notes/<id>.json`.
    pub fn note_path(&self, id: &str) -> String {
        format!("{}/{}{}", self.directory(), id, NOTE_SUFFIX)
    }

    fn directory(&self) -> &str {
        self.config.directory.trim_matches('/')
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.name,
            path
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.unauthenticated(method, url);
        match &self.config.token {
            Some(token) => builder.header("Authorization", format!("token {}", token)),
            None => builder,
        }
    }

    fn unauthenticated(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Accept", ACCEPT)
            .header("User-Agent", &self.config.user_agent)
    }

    /// Whether `url` points at the configured API host. The token is only
    /// sent there; private `download_url`s carry their own token.
    fn is_api_url(&self, url: &str) -> bool {
        let base = self.config.api_url.trim_end_matches('/');
        url.strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Sends a request and turns a non-success status into an upstream error.
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(NoteError::upstream(SERVICE, status, body))
    }

    /// Reads the JSON body of a note file, preferring `download_url` and
    /// falling back to the inline base64 `content` of a single-file lookup.
    async fn fetch_body(&self, file: &UpstreamFile) -> Result<NoteBody> {
        let raw = match (&file.download_url, &file.content) {
            (Some(url), _) => {
                tracing::debug!(path = %file.path, "fetching raw note");
                let builder = if self.is_api_url(url) {
                    self.request(Method::GET, url)
                } else {
                    self.unauthenticated(Method::GET, url)
                };
                self.send(builder).await?.text().await?
            }
            (None, Some(encoded)) => decode_inline(encoded, &file.path)?,
            (None, None) => {
                return Err(NoteError::Encoding(format!(
                    "{}: no download_url or inline content",
                    file.path
                )))
            }
        };
        serde_json::from_str(&raw).map_err(|e| NoteError::parse(file.path.clone(), e))
    }
}

/// GitHub wraps inline base64 at 60 columns; strip the line breaks first.
fn decode_inline(encoded: &str, path: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| NoteError::Encoding(format!("{}: {}", path, e)))?;
    String::from_utf8(bytes).map_err(|e| NoteError::Encoding(format!("{}: {}", path, e)))
}

#[async_trait]
impl NoteStore for GitHubStore {
    async fn list(&self) -> Result<Vec<Note>> {
        let url = self.contents_url(self.directory());
        tracing::debug!(%url, "listing notes");

        let text = self.send(self.request(Method::GET, &url)).await?.text().await?;
        let entries: Vec<UpstreamFile> =
            serde_json::from_str(&text).map_err(|e| NoteError::parse("directory listing", e))?;

        let mut notes = Vec::new();
        for entry in &entries {
            let Some(id) = entry.note_id() else {
                continue;
            };
            let body = self.fetch_body(entry).await?;
            notes.push(Note::from_body(id, body));
        }
        Ok(notes)
    }

    async fn get(&self, id: &str) -> Result<Option<NoteBody>> {
        let url = self.contents_url(&self.note_path(id));
        tracing::debug!(%url, "fetching note");

        let response = self
            .request(Method::GET, &url)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NoteError::upstream(SERVICE, status, body));
        }

        let text = response.text().await?;
        let file: UpstreamFile =
            serde_json::from_str(&text).map_err(|e| NoteError::parse(self.note_path(id), e))?;
        self.fetch_body(&file).await.map(Some)
    }

    async fn put(&self, id: &str, title: &str, content: &str) -> Result<()> {
        if self.config.token.is_none() {
            return Err(NoteError::Config(format!(
                "missing GitHub token (set {})",
                self.config.token_env
            )));
        }

        let body = NoteBody {
            title: title.to_string(),
            content: content.to_string(),
        };
        let serialized = serde_json::to_vec(&body).map_err(|e| NoteError::parse("note body", e))?;

        let payload = serde_json::json!({
            "message": format!("Add new note: {}", id),
            "content": STANDARD.encode(serialized),
            "branch": self.config.branch,
        });

        let url = self.contents_url(&self.note_path(id));
        tracing::debug!(%url, "writing note");
        self.send(self.request(Method::PUT, &url).json(&payload))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(directory: &str) -> GitHubStore {
        GitHubStore::new(RepositoryConfig {
            directory: directory.to_string(),
            api_url: "https://api.github.com/".to_string(),
            ..RepositoryConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_note_path() {
        assert_eq!(store("notes").note_path("abc"), "notes/abc.json");
        assert_eq!(store("/notes/").note_path("abc"), "notes/abc.json");
    }

    #[test]
    fn test_contents_url() {
        let s = store("notes");
        assert_eq!(
            s.contents_url(&s.note_path("abc")),
            "https://api.github.com/repos/hiplitewhat/notes-app/contents/notes/abc.json"
        );
    }

    #[test]
    fn test_is_api_url() {
        let s = store("notes");
        assert!(s.is_api_url("https://api.github.com/repos/o/r/contents/notes/a.json"));
        assert!(!s.is_api_url("https://api.github.com.evil.test/x"));
        assert!(!s.is_api_url("https://raw.githubusercontent.com/o/r/main/notes/a.json"));
    }

    #[test]
    fn test_decode_inline_with_line_breaks() {
        let encoded = STANDARD.encode(r#"{"title":"Hi","content":"Hello world"}"#);
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{}\n{}\n", head, tail);
        assert_eq!(
            decode_inline(&wrapped, "notes/a.json").unwrap(),
            r#"{"title":"Hi","content":"Hello world"}"#
        );
    }

    #[test]
    fn test_decode_inline_rejects_garbage() {
        let err = decode_inline("not base64!!", "notes/a.json").unwrap_err();
        assert!(matches!(err, NoteError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_put_without_token_is_config_error() {
        let err = store("notes").put("abc", "t", "c").await.unwrap_err();
        match err {
            NoteError::Config(msg) => assert!(msg.contains("GITHUB_TOKEN")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
