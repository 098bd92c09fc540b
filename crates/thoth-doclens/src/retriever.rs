//! Ranked, deduplicated, thresholded retrieval over a vector index.

use std::collections::HashSet;

use thoth_core::{SearchResult, ThothError};

use crate::index::DocIndex;
use crate::similarity::cosine_similarity;

/// Rank every chunk in `index` against `query` and return the best documents.
///
/// Scores each stored chunk with cosine similarity, discards chunks strictly
/// below `threshold`, sorts the survivors by score descending (stable, so
/// ties keep discovery order), keeps only the highest-scoring chunk per
/// document path, and truncates to `top_n`. An empty result is a valid
/// outcome — no document met the bar — and is distinct from an error.
///
/// Performs no I/O and no logging; the index is read-only here.
///
/// # Errors
///
/// Returns [`ThothError::DimensionMismatch`] if any stored vector's length
/// differs from the query vector's. That means the index and the query came
/// from different embedding models and the search is meaningless.
///
/// # Examples
///
/// ```
/// use thoth_doclens::index::{DocIndex, EmbeddedChunk, IndexedDocument};
/// use thoth_doclens::retriever::search;
///
/// let index = DocIndex {
///     model: "text-embedding-3-small".into(),
///     generated_at: "2025-11-02T09:30:00Z".into(),
///     documents: vec![IndexedDocument {
///         path: "guides/auth.md".into(),
///         chunks: vec![EmbeddedChunk {
///             content: "Tokens are validated by the auth service.".into(),
///             embedding: vec![1.0, 0.0],
///         }],
///     }],
/// };
///
/// let results = search(&[1.0, 0.0], &index, 5, 0.5).unwrap();
/// assert_eq!(results.len(), 1);
/// assert!((results[0].score - 1.0).abs() < 1e-6);
/// ```
pub fn search(
    query: &[f32],
    index: &DocIndex,
    top_n: usize,
    threshold: f64,
) -> Result<Vec<SearchResult>, ThothError> {
    let mut scored: Vec<SearchResult> = Vec::new();

    for doc in &index.documents {
        for chunk in &doc.chunks {
            let score = cosine_similarity(query, &chunk.embedding)?;
            if score < threshold {
                continue;
            }
            scored.push(SearchResult {
                path: doc.path.clone(),
                snippet: chunk.content.clone(),
                score,
            });
        }
    }

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // One result per document: the sort put the best chunk first
    let mut seen = HashSet::new();
    scored.retain(|r| seen.insert(r.path.clone()));

    scored.truncate(top_n);

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{EmbeddedChunk, IndexedDocument};
    use std::path::PathBuf;

    /// 2-d unit vector whose cosine against the query `[1, 0]` is exactly `c`.
    fn unit_at(c: f32) -> Vec<f32> {
        vec![c, (1.0 - c * c).sqrt()]
    }

    fn doc(path: &str, scores: &[f32]) -> IndexedDocument {
        IndexedDocument {
            path: PathBuf::from(path),
            chunks: scores
                .iter()
                .map(|&c| EmbeddedChunk {
                    content: format!("chunk of {path} at {c}"),
                    embedding: unit_at(c),
                })
                .collect(),
        }
    }

    fn index_of(documents: Vec<IndexedDocument>) -> DocIndex {
        DocIndex {
            model: "stub-embed-1".into(),
            generated_at: "2025-11-02T09:30:00Z".into(),
            documents,
        }
    }

    const QUERY: [f32; 2] = [1.0, 0.0];

    #[test]
    fn best_chunk_per_document_ranked_descending() {
        // a.md has chunks at 0.9 and 0.4; b.md has one at 0.6
        let index = index_of(vec![doc("a.md", &[0.9, 0.4]), doc("b.md", &[0.6])]);

        let results = search(&QUERY, &index, 5, 0.5).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].path, PathBuf::from("a.md"));
        assert!((results[0].score - 0.9).abs() < 1e-6);
        assert_eq!(results[1].path, PathBuf::from("b.md"));
        assert!((results[1].score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn never_exceeds_top_n_and_never_repeats_a_path() {
        let index = index_of(vec![
            doc("a.md", &[0.9, 0.8, 0.7]),
            doc("b.md", &[0.85]),
            doc("c.md", &[0.6, 0.95]),
            doc("d.md", &[0.55]),
        ]);

        let results = search(&QUERY, &index, 3, 0.0).unwrap();

        assert_eq!(results.len(), 3);
        let paths: HashSet<&PathBuf> = results.iter().map(|r| &r.path).collect();
        assert_eq!(paths.len(), 3, "duplicate paths in {results:?}");
        // c.md's 0.95 chunk wins overall
        assert_eq!(results[0].path, PathBuf::from("c.md"));
    }

    #[test]
    fn threshold_above_max_similarity_yields_empty() {
        let index = index_of(vec![doc("a.md", &[0.9]), doc("b.md", &[1.0])]);
        let results = search(&QUERY, &index, 5, 1.1).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn scores_strictly_below_threshold_are_discarded() {
        let index = index_of(vec![doc("a.md", &[0.6]), doc("b.md", &[0.3])]);
        let results = search(&QUERY, &index, 5, 0.5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, PathBuf::from("a.md"));
    }

    #[test]
    fn dedup_keeps_highest_scoring_chunk_snippet() {
        let index = index_of(vec![doc("a.md", &[0.4, 0.9])]);
        let results = search(&QUERY, &index, 5, 0.0).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].snippet.contains("0.9"), "got {:?}", results[0]);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let index = index_of(vec![doc("a.md", &[0.7]), doc("b.md", &[0.7])]);
        let results = search(&QUERY, &index, 5, 0.0).unwrap();
        assert_eq!(results[0].path, PathBuf::from("a.md"));
        assert_eq!(results[1].path, PathBuf::from("b.md"));
    }

    #[test]
    fn empty_index_is_empty_result_not_error() {
        let index = index_of(vec![]);
        let results = search(&QUERY, &index, 5, 0.5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn stored_vector_of_wrong_length_is_dimension_error() {
        let index = index_of(vec![IndexedDocument {
            path: PathBuf::from("a.md"),
            chunks: vec![EmbeddedChunk {
                content: "three dims".into(),
                embedding: vec![1.0, 0.0, 0.0],
            }],
        }]);

        let err = search(&QUERY, &index, 5, 0.5).unwrap_err();
        assert!(matches!(err, ThothError::DimensionMismatch { .. }));
    }
}
