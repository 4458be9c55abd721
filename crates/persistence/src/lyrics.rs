//! Verse windowing over stored lyrics.
//!
//! Lyrics are stored as one text blob with verses separated by a blank line.
//! [`paginate_lyrics`] returns a contiguous run of verses and the pagination
//! actually applied. It never fails: out-of-range requests are clamped.

use crate::types::Pagination;

/// Separator between verses.
pub const VERSE_DELIMITER: &str = "\n\n";

/// Splits lyrics into verses. Empty text has no verses.
pub fn split_verses(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(VERSE_DELIMITER).collect()
}

/// Returns the verses selected by `limit` and `offset`.
///
/// A `limit` of zero selects every verse from `offset` on. When `offset` is
/// at or past the end the result is empty and the pagination reports
/// `limit = 0, offset = total`. Otherwise `limit` is clamped so the window
/// never reads past the last verse.
///
/// ```
/// use cadence_persistence::lyrics::paginate_lyrics;
/// use cadence_persistence::types::Pagination;
///
/// let (text, page) = paginate_lyrics("A\n\nB\n\nC", 5, 1);
/// assert_eq!(text, "B\n\nC");
/// assert_eq!(page, Pagination::new(2, 1, 3));
/// ```
pub fn paginate_lyrics(text: &str, limit: u64, offset: u64) -> (String, Pagination) {
    let verses = split_verses(text);
    let total = verses.len() as u64;

    if offset >= total {
        return (String::new(), Pagination::new(0, total, total));
    }

    let remaining = total - offset;
    let limit = if limit == 0 || limit > remaining {
        remaining
    } else {
        limit
    };

    // offset < total and limit <= remaining, so both fit the verse vector
    let start = offset as usize;
    let end = start + limit as usize;

    (
        verses[start..end].join(VERSE_DELIMITER),
        Pagination::new(limit, offset, total),
    )
}
