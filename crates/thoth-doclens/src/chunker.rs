//! Overlapping word-window chunking for documentation text.
//!
//! Documents are split on whitespace and re-grouped into windows of
//! `chunk_size` words, each window sharing `overlap` words with its
//! predecessor so that context near chunk boundaries survives embedding.

/// Split `text` into overlapping word-window segments.
///
/// If the whitespace-split word count is at most `chunk_size`, the original
/// text is returned as the single segment, untouched — no whitespace
/// normalization artifacts from splitting and re-joining. Otherwise a window
/// of `chunk_size` words slides across the sequence, advancing by
/// `chunk_size - overlap` words per step; each window's words are joined with
/// single spaces. The final window is clipped to the remaining words, and the
/// loop stops the moment a window's end reaches the total word count.
///
/// Callers must supply `overlap < chunk_size`; an overlap at or above the
/// chunk size cannot advance the window. This is an input-validation
/// requirement on the caller (see `ChunkingConfig::validate` in
/// `thoth-core`), not something this function guards at runtime.
///
/// # Examples
///
/// ```
/// use thoth_doclens::chunker::chunk_text;
///
/// // Short text comes back verbatim, single segment
/// let segments = chunk_text("two  words", 500, 50);
/// assert_eq!(segments, vec!["two  words"]);
///
/// // Longer text is windowed with the requested overlap
/// let segments = chunk_text("alpha beta gamma delta epsilon", 3, 1);
/// assert_eq!(segments, vec!["alpha beta gamma", "gamma delta epsilon"]);
/// ```
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    debug_assert!(
        overlap < chunk_size,
        "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
    );

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let step = chunk_size - overlap;
    let mut segments = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(words.len());
        segments.push(words[start..end].join(" "));
        if end >= words.len() {
            break;
        }
        start += step;
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words_of(segment: &str) -> Vec<&str> {
        segment.split_whitespace().collect()
    }

    #[test]
    fn short_text_is_single_unsplit_segment() {
        let text = "a   short\tdocument\nwith odd   whitespace";
        let segments = chunk_text(text, 500, 50);
        assert_eq!(segments.len(), 1);
        // Original text, no re-join artifacts
        assert_eq!(segments[0], text);
    }

    #[test]
    fn word_count_equal_to_chunk_size_is_single_segment() {
        let text = "one two three four five";
        let segments = chunk_text(text, 5, 1);
        assert_eq!(segments, vec![text]);
    }

    #[test]
    fn long_text_produces_overlapping_windows() {
        let text: String = (1..=10).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let segments = chunk_text(&text, 4, 2);

        assert!(segments.len() >= 2);
        for pair in segments.windows(2) {
            let left = words_of(&pair[0]);
            let right = words_of(&pair[1]);
            // Adjacent segments share exactly `overlap` words at the boundary
            assert_eq!(left[left.len() - 2..], right[..2]);
        }
    }

    #[test]
    fn final_window_is_clipped_not_padded() {
        // 7 words, size 3, overlap 1 -> windows at 0, 2, 4, 6
        let text = "a b c d e f g";
        let segments = chunk_text(text, 3, 1);
        assert_eq!(segments, vec!["a b c", "c d e", "e f g"]);

        // 8 words leaves a short final window
        let text = "a b c d e f g h";
        let segments = chunk_text(text, 3, 1);
        assert_eq!(segments, vec!["a b c", "c d e", "e f g", "g h"]);
    }

    #[test]
    fn loop_stops_when_window_end_reaches_word_count() {
        // Window [2..5] ends exactly at the last word; no extra window after it
        let text = "a b c d e";
        let segments = chunk_text(text, 3, 1);
        assert_eq!(segments, vec!["a b c", "c d e"]);
    }

    #[test]
    fn every_word_appears_in_some_segment() {
        let text: String = (1..=53).map(|i| format!("t{i}")).collect::<Vec<_>>().join(" ");
        let segments = chunk_text(&text, 10, 3);

        let all: Vec<&str> = segments.iter().flat_map(|s| words_of(s)).collect();
        for i in 1..=53 {
            let w = format!("t{i}");
            assert!(all.contains(&w.as_str()), "missing word {w}");
        }
    }

    #[test]
    fn empty_text_is_single_empty_segment() {
        let segments = chunk_text("", 500, 50);
        assert_eq!(segments, vec![""]);
    }
}
