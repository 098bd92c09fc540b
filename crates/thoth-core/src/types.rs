use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A documentation file discovered by corpus scanning.
///
/// Immutable once scanned: produced by the corpus walker, consumed by
/// chunking and query-time content lookup, never mutated.
///
/// # Examples
///
/// ```
/// use thoth_core::Document;
/// use std::path::PathBuf;
///
/// let doc = Document {
///     path: PathBuf::from("guides/auth.md"),
///     content: "# Authentication\n...".into(),
/// };
/// assert_eq!(doc.path, PathBuf::from("guides/auth.md"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Path relative to the corpus root; unique within a corpus.
    pub path: PathBuf,
    /// Full file content.
    pub content: String,
}

/// A result from semantic document search.
///
/// Ephemeral: produced per query, never persisted.
///
/// # Examples
///
/// ```
/// use thoth_core::SearchResult;
/// use std::path::PathBuf;
///
/// let result = SearchResult {
///     path: PathBuf::from("guides/auth.md"),
///     snippet: "Tokens are validated by...".into(),
///     score: 0.82,
/// };
/// assert!(result.score > 0.8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Path of the matched document.
    pub path: PathBuf,
    /// Content of the best-matching chunk.
    pub snippet: String,
    /// Cosine similarity between the query and the matched chunk.
    pub score: f64,
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use thoth_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
