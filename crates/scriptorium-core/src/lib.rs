//! Scripture reference engine: canonical book table, reference parsing,
//! formatting, navigation, and comparison.

pub mod canon;
pub mod reference;

pub use canon::{
    CANON, LAST_BOOK, SENTINEL_BOOK, all_names_for_book, book_number_from_name, book_numbers,
    long_name, short_name,
};
pub use reference::{
    AsReference, ScriptureReference, format_reference, offset_book, offset_chapter, offset_verse,
    parse_reference_text, references_equal,
};
