//! # repo-notes
//!
//! A tiny notes service that uses a GitHub repository as its database.
//!
//! Each note is a JSON file, `notes/<id>.json`, written through the GitHub
//! contents API. Before a note is stored, its title and content can be run
//! through a generative-language API (Gemini) as a best-effort filter.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌────────────────┐
//! │  Router  │──▶│ NoteService │──▶│ ContentFilter  │──▶ Gemini
//! │  (axum)  │   │             │   └────────────────┘
//! └──────────┘   │             │   ┌────────────────┐
//!                │             │──▶│   NoteStore    │──▶ GitHub
//!                └─────────────┘   └────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and secrets |
//! | [`error`] | Library error type |
//! | [`models`] | Note and upstream payload types |
//! | [`store`] | Storage trait and in-memory store |
//! | [`github`] | GitHub contents-API store |
//! | [`filter`] | Content filter trait and Gemini client |
//! | [`notes`] | Note operations shared by server and CLI |
//! | [`pages`] | HTML pages |
//! | [`server`] | HTTP router |

pub mod config;
pub mod error;
pub mod filter;
pub mod github;
pub mod models;
pub mod notes;
pub mod pages;
pub mod server;
pub mod store;
