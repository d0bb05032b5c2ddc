//! snipshelf - a local shelf for code snippets.
//!
//! Snippets are short code fragments with a title, optional description,
//! language, category and tags. The [`store::SnippetStore`] owns the
//! collection and keeps it persisted in a [`storage::KeyValueStore`];
//! [`search`] filters it by free text, category and language.

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod search;
pub mod storage;
pub mod store;

pub use error::{Result, StoreError};
pub use models::{Category, Snippet, SnippetDraft, SnippetLanguage, SnippetPatch};
pub use search::{SnippetQuery, filter_snippets};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::SnippetStore;
