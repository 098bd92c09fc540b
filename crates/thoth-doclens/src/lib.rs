//! Document embedding and semantic retrieval.
//!
//! Turns a documentation corpus into a searchable vector index and, given a
//! natural-language summary of a code change, returns the most relevant
//! documents: overlapping word-window chunking, cosine similarity ranking,
//! per-document deduplication, and threshold/top-N selection.

pub mod chunker;
pub mod embedding;
pub mod index;
pub mod retrieve;
pub mod retriever;
pub mod similarity;
