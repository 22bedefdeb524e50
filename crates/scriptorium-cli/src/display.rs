//! Terminal rendering for references, the canon table, and content trees.

use scriptorium_core::{ScriptureReference, all_names_for_book, book_numbers, format_reference};
use scriptorium_doc::{Content, ContentKind, Contents, Document};

const MAX_TEXT: usize = 60;

// ── References ──

pub fn print_books() {
    for n in book_numbers() {
        let names = all_names_for_book(n);
        println!("  {:>2}  {:<4} {}", n, names[0], names[1..].join(", "));
    }
}

pub fn print_reference(r: &ScriptureReference) {
    println!("  {:<10} {}", "display", format_reference(r));
    println!("  {:<10} {}", "book", r.book);
    println!("  {:<10} {}", "chapter", r.chapter);
    println!("  {:<10} {}", "verse", r.verse);
    if !r.is_valid() {
        println!("  {:<10} {}", "valid", "no");
    }
}

// ── Content trees ──

/// Print the document as an indented outline, one node per line, with each
/// node's annotations appended.
pub fn print_outline(document: &Document) {
    println!("=== {} ===", document.id.as_deref().unwrap_or("(untitled)"));
    match &document.body {
        Contents::Nodes(nodes) => {
            for node in nodes {
                print_node(node, 0);
            }
        }
        Contents::Text(text) => println!("{}", quoted(text)),
        Contents::Empty => println!("(empty)"),
    }
}

fn print_node(node: &Content, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = match &node.kind {
        ContentKind::Component { sub_type } => format!("component {sub_type}"),
        ContentKind::Element { sub_type } => format!("element {sub_type}"),
        ContentKind::Text => "text".to_string(),
    };

    print!("{indent}{label}");
    if let Some(text) = node.text_value() {
        print!(" {}", quoted(text));
    }
    if let Some(id) = &node.id {
        print!("  [{id}]");
    }
    if !node.annotations.is_empty() {
        let kinds: Vec<&str> = node.annotations.iter().map(|a| a.kind.as_str()).collect();
        print!("  <{}>", kinds.join(", "));
    }
    println!();

    if let Contents::Nodes(children) = &node.contents {
        for child in children {
            print_node(child, depth + 1);
        }
    }
}

fn quoted(text: &str) -> String {
    if text.chars().count() > MAX_TEXT {
        let short: String = text.chars().take(MAX_TEXT - 3).collect();
        format!("{short:?}...")
    } else {
        format!("{text:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_quoted_whole() {
        assert_eq!(quoted("Selah"), "\"Selah\"");
    }

    #[test]
    fn long_text_is_truncated_on_char_boundaries() {
        let long = "é".repeat(80);
        let shown = quoted(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().filter(|c| *c == 'é').count(), MAX_TEXT - 3);
    }
}
