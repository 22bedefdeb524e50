//! Canonical book-name table.
//!
//! Row position is the canonical book number: row 0 is the sentinel used for
//! every miss, rows 1..=66 are the books of the Protestant canon in
//! traditional order. Each row holds the 3-character Paratext code first,
//! then one or more English display names. The first display name is the
//! "long name" used when formatting references.
//!
//! # Lookup policy
//!
//! Lookups never fail. An unknown name maps to book 0, and an out-of-range
//! number reads the sentinel row, so callers always get something to show.

use tracing::debug;

/// The sentinel book number.
pub const SENTINEL_BOOK: i32 = 0;

/// Number of the last book in the canon (Revelation).
pub const LAST_BOOK: i32 = 66;

/// Accepted names for every book, indexed by canonical book number.
pub static CANON: [&[&str]; 67] = [
    &["ERR", "ERROR"],
    // Old Testament
    &["GEN", "Genesis"],
    &["EXO", "Exodus"],
    &["LEV", "Leviticus"],
    &["NUM", "Numbers"],
    &["DEU", "Deuteronomy"],
    &["JOS", "Joshua"],
    &["JDG", "Judges"],
    &["RUT", "Ruth"],
    &["1SA", "1 Samuel", "First Samuel"],
    &["2SA", "2 Samuel", "Second Samuel"],
    &["1KI", "1 Kings", "First Kings"],
    &["2KI", "2 Kings", "Second Kings"],
    &["1CH", "1 Chronicles", "First Chronicles"],
    &["2CH", "2 Chronicles", "Second Chronicles"],
    &["EZR", "Ezra"],
    &["NEH", "Nehemiah"],
    &["EST", "Esther"],
    &["JOB", "Job"],
    &["PSA", "Psalm", "Psalms"],
    &["PRO", "Proverbs"],
    &["ECC", "Ecclesiastes", "Qoheleth"],
    &["SNG", "Song of Songs", "Song of Solomon"],
    &["ISA", "Isaiah"],
    &["JER", "Jeremiah"],
    &["LAM", "Lamentations"],
    &["EZK", "Ezekiel"],
    &["DAN", "Daniel"],
    &["HOS", "Hosea"],
    &["JOL", "Joel"],
    &["AMO", "Amos"],
    &["OBA", "Obadiah"],
    &["JON", "Jonah"],
    &["MIC", "Micah"],
    &["NAM", "Nahum"],
    &["HAB", "Habakkuk"],
    &["ZEP", "Zephaniah"],
    &["HAG", "Haggai"],
    &["ZEC", "Zechariah"],
    &["MAL", "Malachi"],
    // New Testament
    &["MAT", "Matthew"],
    &["MRK", "Mark"],
    &["LUK", "Luke"],
    &["JHN", "John"],
    &["ACT", "Acts"],
    &["ROM", "Romans"],
    &["1CO", "1 Corinthians", "First Corinthians"],
    &["2CO", "2 Corinthians", "Second Corinthians"],
    &["GAL", "Galatians"],
    &["EPH", "Ephesians"],
    &["PHP", "Philippians"],
    &["COL", "Colossians"],
    &["1TH", "1 Thessalonians", "First Thessalonians"],
    &["2TH", "2 Thessalonians", "Second Thessalonians"],
    &["1TI", "1 Timothy", "First Timothy"],
    &["2TI", "2 Timothy", "Second Timothy"],
    &["TIT", "Titus"],
    &["PHM", "Philemon"],
    &["HEB", "Hebrews"],
    &["JAS", "James"],
    &["1PE", "1 Peter", "First Peter"],
    &["2PE", "2 Peter", "Second Peter"],
    &["1JN", "1 John", "First John"],
    &["2JN", "2 John", "Second John"],
    &["3JN", "3 John", "Third John"],
    &["JUD", "Jude"],
    &["REV", "Revelation"],
];

/// Look up a book number by any accepted name (short code or display name).
///
/// Matching is exact and case-sensitive. Returns [`SENTINEL_BOOK`] on a miss.
pub fn book_number_from_name(name: &str) -> i32 {
    let found = CANON
        .iter()
        .position(|names| names.iter().any(|n| *n == name));
    match found {
        // The sentinel row is not a real book, even when asked for by name.
        Some(0) | None => {
            debug!(name, "no canon entry for book name");
            SENTINEL_BOOK
        }
        Some(i) => i as i32,
    }
}

/// All accepted names for a book, short code first.
///
/// Out-of-range numbers read the sentinel row.
pub fn all_names_for_book(book: i32) -> Vec<String> {
    row(book).iter().map(|s| s.to_string()).collect()
}

/// The 3-character code for a book (`"ERR"` when out of range).
pub fn short_name(book: i32) -> &'static str {
    row(book)[0]
}

/// The primary display name for a book (`"ERROR"` when out of range).
pub fn long_name(book: i32) -> &'static str {
    row(book)[1]
}

/// Iterate over every real book number, `1..=LAST_BOOK`.
pub fn book_numbers() -> impl Iterator<Item = i32> {
    1..=LAST_BOOK
}

fn row(book: i32) -> &'static [&'static str] {
    if (1..=LAST_BOOK).contains(&book) {
        CANON[book as usize]
    } else {
        CANON[SENTINEL_BOOK as usize]
    }
}
