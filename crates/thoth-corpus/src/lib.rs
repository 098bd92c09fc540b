//! Documentation corpus scanning.
//!
//! Walks a documentation directory, respecting `.gitignore`, and collects
//! [`thoth_core::Document`]s — relative paths plus full content — for the
//! embedding and retrieval engine in `thoth-doclens`.

pub mod scan;

pub use scan::{find_document, scan_docs};
