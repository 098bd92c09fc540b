//! The persisted vector index: per-document chunk/vector pairs, tagged with
//! the embedding model that produced them.
//!
//! An index is built wholesale from a scanned corpus and treated as immutable
//! afterwards. There is no incremental update path — staleness is resolved by
//! rebuilding from scratch.

use std::path::{Path, PathBuf};

use thoth_core::{ChunkingConfig, Document, ThothError};
use serde::{Deserialize, Serialize};

use crate::chunker::chunk_text;
use crate::embedding::EmbeddingProvider;

/// A chunk of document text together with its embedding vector.
///
/// # Examples
///
/// ```
/// use thoth_doclens::index::EmbeddedChunk;
///
/// let chunk = EmbeddedChunk {
///     content: "Tokens are validated by the auth service.".into(),
///     embedding: vec![0.1, 0.2, 0.3],
/// };
/// assert_eq!(chunk.embedding.len(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedChunk {
    /// The chunk text that was embedded.
    pub content: String,
    /// Embedding vector for `content`.
    pub embedding: Vec<f32>,
}

/// One document's ordered sequence of embedded chunks.
///
/// Chunks are ordered by position in the source text; the order carries no
/// meaning at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedDocument {
    /// Corpus-relative path of the source document.
    pub path: PathBuf,
    /// Embedded chunks in source order.
    pub chunks: Vec<EmbeddedChunk>,
}

/// The persisted vector index for a documentation corpus.
///
/// # Examples
///
/// ```
/// use thoth_doclens::index::DocIndex;
///
/// let index = DocIndex {
///     model: "text-embedding-3-small".into(),
///     generated_at: "2025-11-02T09:30:00Z".into(),
///     documents: vec![],
/// };
/// assert_eq!(index.document_count(), 0);
/// assert_eq!(index.chunk_count(), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocIndex {
    /// Identifier of the embedding model that produced the vectors.
    pub model: String,
    /// ISO-8601 timestamp of index generation.
    pub generated_at: String,
    /// Indexed documents, keyed by corpus-relative path.
    pub documents: Vec<IndexedDocument>,
}

impl DocIndex {
    /// Build an index from scanned documents: chunk each one, embed every
    /// chunk through `provider`, and pair chunks with vectors by position.
    ///
    /// Chunk texts are submitted to the provider in document order and the
    /// returned vectors are re-associated strictly positionally, so batching
    /// inside the provider can never mispair a chunk with another chunk's
    /// vector.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Embedding`] if the provider fails or returns a
    /// vector count that does not match the number of chunks.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use thoth_core::{ChunkingConfig, Document};
    /// use thoth_doclens::embedding::EmbeddingClient;
    /// use thoth_doclens::index::DocIndex;
    ///
    /// # async fn example() {
    /// let docs = vec![Document {
    ///     path: "README.md".into(),
    ///     content: "# Overview".into(),
    /// }];
    /// let client = EmbeddingClient::new("key");
    /// let index = DocIndex::build(&docs, &ChunkingConfig::default(), &client)
    ///     .await
    ///     .unwrap();
    /// assert_eq!(index.document_count(), 1);
    /// # }
    /// ```
    pub async fn build<P: EmbeddingProvider>(
        documents: &[Document],
        chunking: &ChunkingConfig,
        provider: &P,
    ) -> Result<Self, ThothError> {
        let mut chunked: Vec<(PathBuf, Vec<String>)> = Vec::with_capacity(documents.len());
        let mut texts: Vec<String> = Vec::new();

        for doc in documents {
            let segments = chunk_text(&doc.content, chunking.chunk_size, chunking.overlap);
            texts.extend(segments.iter().cloned());
            chunked.push((doc.path.clone(), segments));
        }

        let vectors = provider.embed_many(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(ThothError::Embedding(format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                texts.len()
            )));
        }

        let mut indexed = Vec::with_capacity(chunked.len());
        let mut offset = 0;
        for (path, segments) in chunked {
            let count = segments.len();
            let chunks = segments
                .into_iter()
                .zip(vectors[offset..offset + count].iter().cloned())
                .map(|(content, embedding)| EmbeddedChunk { content, embedding })
                .collect();
            offset += count;
            indexed.push(IndexedDocument { path, chunks });
        }

        Ok(Self {
            model: provider.model().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            documents: indexed,
        })
    }

    /// Persist the index as pretty-printed JSON at `path`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::Io`] on write failure.
    pub fn save(&self, path: &Path) -> Result<(), ThothError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously persisted index from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::IndexNotFound`] when no file exists at `path` —
    /// the caller should build the index first. Read failures surface as
    /// [`ThothError::Io`] and malformed content as
    /// [`ThothError::Serialization`]; neither is recoverable locally.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use thoth_doclens::index::DocIndex;
    ///
    /// let index = DocIndex::load(Path::new(".thoth/index.json")).unwrap();
    /// println!("{} documents indexed", index.document_count());
    /// ```
    pub fn load(path: &Path) -> Result<Self, ThothError> {
        if !path.exists() {
            return Err(ThothError::IndexNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let index: Self = serde_json::from_str(&content)?;
        Ok(index)
    }

    /// Fail unless this index was built with `query_model`.
    ///
    /// A query embedded with a different model than the index produces
    /// meaningless similarity scores, so the mismatch is rejected before any
    /// scoring happens.
    ///
    /// # Errors
    ///
    /// Returns [`ThothError::ModelMismatch`] when the models differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use thoth_doclens::index::DocIndex;
    ///
    /// let index = DocIndex {
    ///     model: "text-embedding-3-small".into(),
    ///     generated_at: "2025-11-02T09:30:00Z".into(),
    ///     documents: vec![],
    /// };
    /// assert!(index.ensure_model("text-embedding-3-small").is_ok());
    /// assert!(index.ensure_model("text-embedding-3-large").is_err());
    /// ```
    pub fn ensure_model(&self, query_model: &str) -> Result<(), ThothError> {
        if self.model != query_model {
            return Err(ThothError::ModelMismatch {
                index_model: self.model.clone(),
                query_model: query_model.to_string(),
            });
        }
        Ok(())
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Total number of chunks across all documents.
    pub fn chunk_count(&self) -> usize {
        self.documents.iter().map(|d| d.chunks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic provider: each vector encodes the text it came from, so
    /// tests can verify chunk/vector association survives batching.
    struct StubProvider {
        model: String,
    }

    fn vec_for(text: &str) -> Vec<f32> {
        vec![text.len() as f32, text.split_whitespace().count() as f32, 1.0]
    }

    impl EmbeddingProvider for StubProvider {
        fn model(&self) -> &str {
            &self.model
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, ThothError> {
            Ok(vec_for(text))
        }

        async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ThothError> {
            Ok(texts.iter().map(|t| vec_for(t)).collect())
        }
    }

    fn stub() -> StubProvider {
        StubProvider {
            model: "stub-embed-1".into(),
        }
    }

    fn corpus() -> Vec<Document> {
        vec![
            Document {
                path: "guides/auth.md".into(),
                content: "alpha beta gamma delta epsilon zeta eta".into(),
            },
            Document {
                path: "README.md".into(),
                content: "short file".into(),
            },
        ]
    }

    fn small_chunks() -> ChunkingConfig {
        ChunkingConfig {
            chunk_size: 3,
            overlap: 1,
        }
    }

    #[tokio::test]
    async fn build_pairs_each_chunk_with_its_own_vector() {
        let index = DocIndex::build(&corpus(), &small_chunks(), &stub())
            .await
            .unwrap();

        assert_eq!(index.model, "stub-embed-1");
        assert_eq!(index.document_count(), 2);
        // 7 words at size 3 / overlap 1 -> 3 chunks; the short doc stays whole
        assert_eq!(index.documents[0].chunks.len(), 3);
        assert_eq!(index.documents[1].chunks.len(), 1);

        for doc in &index.documents {
            for chunk in &doc.chunks {
                assert_eq!(
                    chunk.embedding,
                    vec_for(&chunk.content),
                    "chunk '{}' paired with wrong vector",
                    chunk.content
                );
            }
        }
    }

    #[tokio::test]
    async fn short_document_is_one_unsplit_chunk() {
        let index = DocIndex::build(&corpus(), &small_chunks(), &stub())
            .await
            .unwrap();
        assert_eq!(index.documents[1].chunks[0].content, "short file");
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".thoth/index.json");

        let built = DocIndex::build(&corpus(), &small_chunks(), &stub())
            .await
            .unwrap();
        built.save(&path).unwrap();

        let loaded = DocIndex::load(&path).unwrap();
        assert_eq!(loaded.model, built.model);
        assert_eq!(loaded.generated_at, built.generated_at);
        assert_eq!(loaded.document_count(), built.document_count());
        assert_eq!(loaded.chunk_count(), built.chunk_count());

        for (a, b) in loaded.documents.iter().zip(built.documents.iter()) {
            assert_eq!(a.path, b.path);
            for (ca, cb) in a.chunks.iter().zip(b.chunks.iter()) {
                assert_eq!(ca.content, cb.content);
                assert_eq!(ca.embedding, cb.embedding);
            }
        }
    }

    #[test]
    fn load_missing_file_is_index_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocIndex::load(&dir.path().join("index.json")).unwrap_err();
        assert!(matches!(err, ThothError::IndexNotFound(_)));
    }

    #[test]
    fn load_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let err = DocIndex::load(&path).unwrap_err();
        assert!(
            matches!(err, ThothError::Serialization(_)),
            "expected serialization error, got: {err}"
        );
    }

    #[test]
    fn persisted_json_uses_declared_shape() {
        let index = DocIndex {
            model: "stub-embed-1".into(),
            generated_at: "2025-11-02T09:30:00Z".into(),
            documents: vec![IndexedDocument {
                path: "README.md".into(),
                chunks: vec![EmbeddedChunk {
                    content: "hello".into(),
                    embedding: vec![0.5, 0.25],
                }],
            }],
        };

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["model"], "stub-embed-1");
        assert_eq!(json["generatedAt"], "2025-11-02T09:30:00Z");
        assert_eq!(json["documents"][0]["path"], "README.md");
        assert_eq!(json["documents"][0]["chunks"][0]["content"], "hello");
        assert_eq!(
            json["documents"][0]["chunks"][0]["embedding"][0]
                .as_f64()
                .unwrap(),
            0.5
        );
    }

    #[test]
    fn ensure_model_guards_against_mismatch() {
        let index = DocIndex {
            model: "stub-embed-1".into(),
            generated_at: "2025-11-02T09:30:00Z".into(),
            documents: vec![],
        };
        assert!(index.ensure_model("stub-embed-1").is_ok());

        let err = index.ensure_model("stub-embed-2").unwrap_err();
        assert!(matches!(err, ThothError::ModelMismatch { .. }));
    }

    #[tokio::test]
    async fn build_empty_corpus_is_empty_index() {
        let index = DocIndex::build(&[], &small_chunks(), &stub()).await.unwrap();
        assert_eq!(index.document_count(), 0);
        assert_eq!(index.chunk_count(), 0);
    }
}
