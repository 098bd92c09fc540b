//! Core types, configuration, and error handling for the Thoth platform.
//!
//! This crate provides the shared foundation used by all other Thoth crates:
//! - [`ThothError`] — unified error type using `thiserror`
//! - [`ThothConfig`] — configuration loaded from `.thoth.toml`
//! - Shared types: [`Document`], [`SearchResult`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{
    ChunkingConfig, CorpusConfig, EmbeddingConfig, RetrievalConfig, ThothConfig,
};
pub use error::ThothError;
pub use types::{Document, OutputFormat, SearchResult};

/// A convenience `Result` type for Thoth operations.
pub type Result<T> = std::result::Result<T, ThothError>;
