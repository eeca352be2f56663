//! Text helpers for command descriptions.

use unicode_segmentation::UnicodeSegmentation;

/// Number of graphemes kept in command description previews.
pub(crate) const PREVIEW_GRAPHEMES: usize = 20;

/// Truncate `text` to `max` grapheme clusters, appending `...` when something was cut.
pub(crate) fn preview(text: &str, max: usize) -> String {
    // Cut on grapheme boundaries so combined emoji and accents never split in a label.
    match text.grapheme_indices(true).nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
