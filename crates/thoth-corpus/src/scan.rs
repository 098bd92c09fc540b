use std::path::Path;

use thoth_core::{Document, ThothError};

/// Maximum file size to process (1 MB).
const MAX_FILE_SIZE: u64 = 1_048_576;

/// Number of bytes to check for binary detection.
const BINARY_CHECK_SIZE: usize = 8192;

/// Walk a documentation directory, respecting `.gitignore`, returning documents.
///
/// Accepts files whose extension (case-insensitive, without the dot) appears
/// in `extensions`. Skips binary files and files larger than 1 MB. Returned
/// paths are relative to `root` and sorted, so repeated scans of the same
/// corpus produce the same document order.
///
/// # Errors
///
/// Returns [`ThothError::Config`] if `root` is not a directory.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use thoth_corpus::scan_docs;
///
/// let extensions = vec!["md".to_string(), "rst".to_string()];
/// let docs = scan_docs(Path::new("docs"), &extensions).unwrap();
/// for doc in &docs {
///     println!("{}", doc.path.display());
/// }
/// ```
pub fn scan_docs(root: &Path, extensions: &[String]) -> Result<Vec<Document>, ThothError> {
    if !root.is_dir() {
        return Err(ThothError::Config(format!(
            "documentation directory not found: {}",
            root.display()
        )));
    }

    let walker = ignore::WalkBuilder::new(root).build();
    let mut docs = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();

        // Check file size
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(_) => continue,
        };
        if metadata.len() > MAX_FILE_SIZE {
            continue;
        }

        // Check extension against the allowed documentation set
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(e) => e.to_lowercase(),
            None => continue,
        };
        if !extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext)) {
            continue;
        }

        // Read content
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => continue,
        };

        // Check for binary content (null bytes in first 8KB)
        let check_len = content.len().min(BINARY_CHECK_SIZE);
        if content.as_bytes()[..check_len].contains(&0) {
            continue;
        }

        // Make path relative to root
        let relative = match path.strip_prefix(root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => path.to_path_buf(),
        };

        docs.push(Document {
            path: relative,
            content,
        });
    }

    docs.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(docs)
}

/// Look up a scanned document by its corpus-relative path.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use thoth_core::Document;
/// use thoth_corpus::find_document;
///
/// let docs = vec![Document {
///     path: PathBuf::from("guides/auth.md"),
///     content: "# Auth".into(),
/// }];
/// let found = find_document(&docs, Path::new("guides/auth.md"));
/// assert!(found.is_some());
/// assert!(find_document(&docs, Path::new("missing.md")).is_none());
/// ```
pub fn find_document<'a>(docs: &'a [Document], path: &Path) -> Option<&'a Document> {
    docs.iter().find(|d| d.path == path)
}
