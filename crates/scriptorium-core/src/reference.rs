//! Book/chapter/verse references: parsing, display, navigation, comparison.
//!
//! References are plain integer triples. Nothing here validates chapter or
//! verse ranges: a negative verse means "the whole chapter", and chapter
//! arithmetic is left unclamped. Only [`offset_book`] clamps, and it does so
//! against the canon bounds.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canon::{LAST_BOOK, book_number_from_name, long_name};

/// `<book name> <chapter>:<verse>`. The book name is everything before the
/// last space that precedes the chapter number.
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+) ([0-9]+):([0-9]+)$").expect("reference pattern is valid")
});

/// A canonical book number with chapter and verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptureReference {
    pub book: i32,
    pub chapter: i32,
    pub verse: i32,
}

impl ScriptureReference {
    /// Returned by [`parse_reference_text`] when the text is not a reference.
    pub const INVALID: Self = Self::new(-1, -1, -1);

    pub const fn new(book: i32, chapter: i32, verse: i32) -> Self {
        Self {
            book,
            chapter,
            verse,
        }
    }

    /// True when the book is in the canon and the chapter is positive.
    pub fn is_valid(&self) -> bool {
        (1..=LAST_BOOK).contains(&self.book) && self.chapter >= 1
    }

    /// Whether this reference names a whole chapter (negative verse).
    pub fn is_whole_chapter(&self) -> bool {
        self.verse < 0
    }
}

impl Default for ScriptureReference {
    fn default() -> Self {
        Self::INVALID
    }
}

impl PartialOrd for ScriptureReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Canonical order: book, then chapter, then verse.
impl Ord for ScriptureReference {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.book, self.chapter, self.verse).cmp(&(other.book, other.chapter, other.verse))
    }
}

impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", long_name(self.book), self.chapter)?;
        if self.verse >= 0 {
            write!(f, ":{}", self.verse)?;
        }
        Ok(())
    }
}

/// Anything that can stand in for a reference when comparing.
///
/// Strings go through [`parse_reference_text`], so a display string compares
/// equal to the reference it names.
pub trait AsReference {
    fn as_reference(&self) -> ScriptureReference;
}

impl AsReference for ScriptureReference {
    fn as_reference(&self) -> ScriptureReference {
        *self
    }
}

impl AsReference for str {
    fn as_reference(&self) -> ScriptureReference {
        parse_reference_text(self)
    }
}

impl AsReference for String {
    fn as_reference(&self) -> ScriptureReference {
        parse_reference_text(self)
    }
}

impl<T: AsReference + ?Sized> AsReference for &T {
    fn as_reference(&self) -> ScriptureReference {
        (**self).as_reference()
    }
}

/// Move by `delta` books, clamped to the canon. Chapter and verse reset to 1.
pub fn offset_book(r: ScriptureReference, delta: i32) -> ScriptureReference {
    let book = r.book.saturating_add(delta).clamp(1, LAST_BOOK);
    ScriptureReference::new(book, 1, 1)
}

/// Move by `delta` chapters and reset the verse to 1.
///
/// The chapter is not clamped: it may reach 0 or go negative.
pub fn offset_chapter(r: ScriptureReference, delta: i32) -> ScriptureReference {
    ScriptureReference::new(r.book, r.chapter.saturating_add(delta), 1)
}

/// Move by `delta` verses. No clamping.
pub fn offset_verse(r: ScriptureReference, delta: i32) -> ScriptureReference {
    ScriptureReference::new(r.book, r.chapter, r.verse.saturating_add(delta))
}

/// Parse `"<BookName> <chapter>:<verse>"`.
///
/// Text that does not fit the pattern exactly (including a missing verse or
/// surrounding whitespace), or numbers too large for an `i32`, yield
/// [`ScriptureReference::INVALID`]. A well-formed string with an unknown book
/// name yields book 0.
pub fn parse_reference_text(text: &str) -> ScriptureReference {
    let Some(caps) = REFERENCE_PATTERN.captures(text) else {
        debug!(text, "not a scripture reference");
        return ScriptureReference::INVALID;
    };

    match (caps[2].parse::<i32>(), caps[3].parse::<i32>()) {
        (Ok(chapter), Ok(verse)) => {
            ScriptureReference::new(book_number_from_name(&caps[1]), chapter, verse)
        }
        _ => {
            debug!(text, "reference numbers out of range");
            ScriptureReference::INVALID
        }
    }
}

/// Render `"<LongBookName> <chapter>"`, with `:<verse>` when the verse is not
/// negative.
pub fn format_reference(r: &ScriptureReference) -> String {
    r.to_string()
}

/// Structural equality, parsing either side first when it is a string.
pub fn references_equal<A, B>(a: &A, b: &B) -> bool
where
    A: AsReference + ?Sized,
    B: AsReference + ?Sized,
{
    a.as_reference() == b.as_reference()
}
