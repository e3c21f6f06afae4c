//! TOML configuration parsing.
//!
//! Everything the service needs is gathered into a single [`Config`] that is
//! handed to component constructors at startup. Secrets are never written in
//! the file itself; the file names the environment variables to read them
//! from, and [`Config::resolve_secrets`] fills them in once.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

/// Where notes live: `<api_url>/repos/<owner>/<name>/contents/<directory>`.
#[derive(Debug, Deserialize, Clone)]
pub struct RepositoryConfig {
    /// `github`, or `memory` for a process-local store that is lost on exit.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_repo_name")]
    pub name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Access token, read from `token_env`.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            owner: default_owner(),
            name: default_repo_name(),
            branch: default_branch(),
            directory: default_directory(),
            api_url: default_github_api_url(),
            user_agent: default_user_agent(),
            token_env: default_token_env(),
            timeout_secs: None,
            token: None,
        }
    }
}

fn default_backend() -> String {
    "github".to_string()
}
fn default_owner() -> String {
    "hiplitewhat".to_string()
}
fn default_repo_name() -> String {
    "notes-app".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_directory() -> String {
    "notes".to_string()
}
fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_user_agent() -> String {
    "notes-app-worker".to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

/// Instruction that turns `generateContent` into a filter rather than a chat.
pub const DEFAULT_INSTRUCTION: &str = "Return the user's text unchanged except for removing \
profanity. Output only the resulting text, with no commentary.";

#[derive(Debug, Deserialize, Clone)]
pub struct FilterConfig {
    /// `gemini` or `disabled`.
    #[serde(default = "default_filter_provider")]
    pub provider: String,
    #[serde(default = "default_filter_model")]
    pub model: String,
    #[serde(default = "default_gemini_api_url")]
    pub api_url: String,
    #[serde(default = "default_key_env")]
    pub key_env: String,
    /// System instruction sent alongside the note text. An empty string
    /// sends none, in which case the model's reply is never stored.
    #[serde(default = "default_instruction")]
    pub instruction: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// API key, read from `key_env`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            provider: default_filter_provider(),
            model: default_filter_model(),
            api_url: default_gemini_api_url(),
            key_env: default_key_env(),
            instruction: default_instruction(),
            timeout_secs: None,
            api_key: None,
        }
    }
}

fn default_filter_provider() -> String {
    "gemini".to_string()
}
fn default_filter_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_instruction() -> Option<String> {
    Some(DEFAULT_INSTRUCTION.to_string())
}
fn default_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl FilterConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

impl Config {
    /// Reads the token and API key from the environment variables the
    /// config names. Missing variables leave the secret unset; the
    /// component that needs it reports the error when it is used.
    pub fn resolve_secrets(&mut self) {
        self.repository.token = read_secret(&self.repository.token_env);
        self.filter.api_key = read_secret(&self.filter.key_env);
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }

        let repo = &self.repository;
        for (field, value) in [
            ("repository.owner", &repo.owner),
            ("repository.name", &repo.name),
            ("repository.branch", &repo.branch),
            ("repository.directory", &repo.directory),
            ("repository.api_url", &repo.api_url),
            ("repository.user_agent", &repo.user_agent),
        ] {
            if value.trim().is_empty() {
                bail!("{} must not be empty", field);
            }
        }

        match repo.backend.as_str() {
            "github" | "memory" => {}
            other => bail!(
                "Unknown repository backend: '{}'. Must be github or memory.",
                other
            ),
        }

        match self.filter.provider.as_str() {
            "disabled" => {}
            "gemini" => {
                if self.filter.model.trim().is_empty() {
                    bail!("filter.model must be specified when provider is 'gemini'");
                }
            }
            other => bail!(
                "Unknown filter provider: '{}'. Must be gemini or disabled.",
                other
            ),
        }

        Ok(())
    }
}

fn read_secret(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Parses and validates a config from TOML text. Secrets are not resolved.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config = parse_config(&content)?;
    config.resolve_secrets();
    Ok(config)
}

/// Like [`load_config`], but falls back to the built-in defaults when the
/// file does not exist.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "config file not found, using defaults");
    let mut config = Config::default();
    config.resolve_secrets();
    Ok(config)
}
