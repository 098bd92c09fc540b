//! Query-side retrieval pipeline.
//!
//! Ties the pieces together for a single query: embed the change summary,
//! rank it against the index, and map surviving paths back to full corpus
//! content. Each stage feeds the next; a stage with nothing left to hand on
//! short-circuits with `Ok(None)` rather than an error.

use std::path::PathBuf;

use thoth_core::{Document, RetrievalConfig, SearchResult, ThothError};
use serde::Serialize;

use crate::embedding::EmbeddingProvider;
use crate::index::DocIndex;
use crate::retriever;

/// A retrieved document with its full content, ready for a downstream
/// consumer to draft updates against.
///
/// # Examples
///
/// ```
/// use thoth_doclens::retrieve::RetrievedDoc;
///
/// let doc = RetrievedDoc {
///     path: "guides/auth.md".into(),
///     content: "# Authentication\n...".into(),
///     score: 0.82,
/// };
/// assert!(doc.score > 0.8);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedDoc {
    /// Corpus-relative path of the document.
    pub path: PathBuf,
    /// Full document content.
    pub content: String,
    /// Similarity of the document's best chunk to the query.
    pub score: f64,
}

/// Semantic search over a loaded index, backed by an embedding provider.
///
/// # Examples
///
/// ```
/// use thoth_doclens::embedding::EmbeddingClient;
/// use thoth_doclens::index::DocIndex;
/// use thoth_doclens::retrieve::DocSearch;
///
/// let index = DocIndex {
///     model: "text-embedding-3-small".into(),
///     generated_at: "2025-11-02T09:30:00Z".into(),
///     documents: vec![],
/// };
/// let client = EmbeddingClient::new("test-key");
/// let search = DocSearch::new(index, client).unwrap();
/// assert_eq!(search.index().document_count(), 0);
/// ```
#[derive(Debug)]
pub struct DocSearch<P> {
    index: DocIndex,
    provider: P,
}

impl<P: EmbeddingProvider> DocSearch<P> {
    /// Create a search engine over `index`, querying through `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::ModelMismatch`] if the index was built with a
    /// different embedding model than `provider` uses — scores across models
    /// are meaningless, so this is rejected up front.
    pub fn new(index: DocIndex, provider: P) -> Result<Self, ThothError> {
        index.ensure_model(provider.model())?;
        Ok(Self { index, provider })
    }

    /// Access the underlying index.
    pub fn index(&self) -> &DocIndex {
        &self.index
    }

    /// Embed `summary` and rank it against every indexed chunk.
    ///
    /// Returns at most `opts.top_n` results, one per document, each scoring
    /// at least `opts.threshold`. An empty vec means no document met the bar.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Embedding`] if the provider call fails and
    /// [`ThothError::DimensionMismatch`] if the query vector's length differs
    /// from the stored vectors'.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use thoth_core::RetrievalConfig;
    /// use thoth_doclens::embedding::EmbeddingClient;
    /// use thoth_doclens::index::DocIndex;
    /// use thoth_doclens::retrieve::DocSearch;
    ///
    /// # async fn example() {
    /// let index = DocIndex::load(Path::new(".thoth/index.json")).unwrap();
    /// let client = EmbeddingClient::new("key");
    /// let search = DocSearch::new(index, client).unwrap();
    /// let results = search
    ///     .search("add rate limiting to the login endpoint", &RetrievalConfig::default())
    ///     .await
    ///     .unwrap();
    /// # }
    /// ```
    pub async fn search(
        &self,
        summary: &str,
        opts: &RetrievalConfig,
    ) -> Result<Vec<SearchResult>, ThothError> {
        let query = self.provider.embed(summary).await?;
        retriever::search(&query, &self.index, opts.top_n, opts.threshold)
    }

    /// Full retrieval pipeline: search, then map each hit back to the full
    /// document content from `corpus`.
    ///
    /// `Ok(None)` means the pipeline stopped early — nothing scored above the
    /// threshold, or every hit pointed at a document no longer present in the
    /// corpus (a stale index). Both mean "nothing to suggest", which is a
    /// valid outcome, not a failure.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`DocSearch::search`].
    pub async fn retrieve(
        &self,
        summary: &str,
        corpus: &[Document],
        opts: &RetrievalConfig,
    ) -> Result<Option<Vec<RetrievedDoc>>, ThothError> {
        let results = self.search(summary, opts).await?;
        if results.is_empty() {
            return Ok(None);
        }

        let docs: Vec<RetrievedDoc> = results
            .into_iter()
            .filter_map(|r| {
                corpus
                    .iter()
                    .find(|d| d.path == r.path)
                    .map(|d| RetrievedDoc {
                        path: r.path,
                        content: d.content.clone(),
                        score: r.score,
                    })
            })
            .collect();

        if docs.is_empty() {
            return Ok(None);
        }
        Ok(Some(docs))
    }
}
