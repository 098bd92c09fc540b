use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ThothError;

/// Top-level configuration loaded from `.thoth.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use thoth_core::ThothConfig;
///
/// let config = ThothConfig::default();
/// assert_eq!(config.chunking.chunk_size, 500);
/// assert_eq!(config.retrieval.top_n, 15);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThothConfig {
    /// Embedding provider settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Document chunking settings.
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval ranking settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Documentation corpus settings.
    #[serde(default)]
    pub corpus: CorpusConfig,
}

impl ThothConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Io`] if the file cannot be read, or
    /// [`ThothError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use thoth_core::ThothConfig;
    /// use std::path::Path;
    ///
    /// let config = ThothConfig::from_file(Path::new(".thoth.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ThothError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use thoth_core::ThothConfig;
    ///
    /// let toml = r#"
    /// [retrieval]
    /// top_n = 5
    /// "#;
    /// let config = ThothConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.retrieval.top_n, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ThothError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Configuration for the embedding provider used to vectorize documents.
///
/// # Examples
///
/// ```
/// use thoth_core::EmbeddingConfig;
///
/// let config = EmbeddingConfig::default();
/// assert_eq!(config.provider, "openai");
/// assert_eq!(config.model, "text-embedding-3-small");
/// assert_eq!(config.dimensions, 1536);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding provider (default: `"openai"`). Any service exposing an
    /// OpenAI-compatible `/embeddings` endpoint works via `base_url`.
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    /// API key for the embedding provider.
    pub api_key: Option<String>,
    /// Model identifier (default: `"text-embedding-3-small"`).
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Custom base URL for API requests.
    pub base_url: Option<String>,
    /// Embedding dimensions (default: 1536).
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,
}

fn default_embedding_provider() -> String {
    "openai".into()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

fn default_embedding_dimensions() -> usize {
    1536
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_key: None,
            model: default_embedding_model(),
            base_url: None,
            dimensions: default_embedding_dimensions(),
        }
    }
}

/// Document chunking configuration.
///
/// `chunk_size` approximates the token budget of a typical embedding model
/// input; `overlap` preserves context across chunk boundaries.
///
/// # Examples
///
/// ```
/// use thoth_core::ChunkingConfig;
///
/// let config = ChunkingConfig::default();
/// assert_eq!(config.chunk_size, 500);
/// assert_eq!(config.overlap, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum words per chunk (default: 500).
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Words shared between adjacent chunks (default: 50). Must be smaller
    /// than `chunk_size`.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl ChunkingConfig {
    /// Check that the chunking parameters can produce an advancing window.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Config`] when `overlap >= chunk_size`, which
    /// would stall the chunking window.
    ///
    /// # Examples
    ///
    /// ```
    /// use thoth_core::ChunkingConfig;
    ///
    /// let bad = ChunkingConfig { chunk_size: 50, overlap: 50 };
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ThothError> {
        if self.overlap >= self.chunk_size {
            return Err(ThothError::Config(format!(
                "chunking overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Retrieval ranking configuration.
///
/// Both knobs are deliberately tunable: a too-high threshold silently yields
/// zero matches, a too-low one floods the downstream consumer.
///
/// # Examples
///
/// ```
/// use thoth_core::RetrievalConfig;
///
/// let config = RetrievalConfig::default();
/// assert_eq!(config.top_n, 15);
/// assert!((config.threshold - 0.15).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum documents to return per query (default: 15).
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Minimum cosine similarity for a chunk to be considered (default: 0.15).
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_top_n() -> usize {
    15
}

fn default_threshold() -> f64 {
    0.15
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            threshold: default_threshold(),
        }
    }
}

/// Documentation corpus configuration.
///
/// # Examples
///
/// ```
/// use thoth_core::CorpusConfig;
/// use std::path::PathBuf;
///
/// let config = CorpusConfig::default();
/// assert_eq!(config.docs_dir, PathBuf::from("docs"));
/// assert!(config.extensions.iter().any(|e| e == "md"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Root directory of the documentation corpus (default: `docs`).
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,
    /// File extensions treated as documentation (without the dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_extensions() -> Vec<String> {
    ["md", "mdx", "markdown", "rst", "adoc", "txt"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            extensions: default_extensions(),
        }
    }
}
