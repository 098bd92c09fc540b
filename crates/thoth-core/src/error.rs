use std::path::PathBuf;

/// Errors that can occur across the Thoth platform.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use thoth_core::ThothError;
///
/// let err = ThothError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ThothError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Embedding provider API or response error. Propagated unchanged; the
    /// retrieval engine never retries or reinterprets these.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Two vectors being compared have different lengths. Signals that the
    /// query embedding and the stored index came from incompatible models or
    /// model versions; fatal, never retried.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length of the query vector.
        expected: usize,
        /// Length of the stored vector it was compared against.
        actual: usize,
    },

    /// The index was generated by a different embedding model than the one
    /// configured for querying. Scores across models are meaningless, so the
    /// index must be rebuilt before searching.
    #[error(
        "index was built with model '{index_model}' but the configured model is '{query_model}': \
         run 'thoth index' to rebuild"
    )]
    ModelMismatch {
        /// Model recorded in the persisted index.
        index_model: String,
        /// Model the current configuration would use for the query.
        query_model: String,
    },

    /// No persisted index exists for the corpus.
    #[error("no document index found at {}: run 'thoth index' to build one", .0.display())]
    IndexNotFound(PathBuf),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ThothError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = ThothError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn dimension_mismatch_shows_both_lengths() {
        let err = ThothError::DimensionMismatch {
            expected: 1536,
            actual: 768,
        };
        let msg = err.to_string();
        assert!(msg.contains("1536"));
        assert!(msg.contains("768"));
    }

    #[test]
    fn model_mismatch_suggests_rebuild() {
        let err = ThothError::ModelMismatch {
            index_model: "text-embedding-3-small".into(),
            query_model: "text-embedding-3-large".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("text-embedding-3-small"));
        assert!(msg.contains("text-embedding-3-large"));
        assert!(msg.contains("thoth index"));
    }

    #[test]
    fn index_not_found_shows_path_and_hint() {
        let err = ThothError::IndexNotFound(PathBuf::from(".thoth/index.json"));
        let msg = err.to_string();
        assert!(msg.contains(".thoth/index.json"));
        assert!(msg.contains("thoth index"));
    }
}
