mod display;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use scriptorium_core::{
    ScriptureReference, offset_book, offset_chapter, offset_verse, parse_reference_text,
    references_equal,
};
use scriptorium_doc::{
    AnnotationRegistry, Document, DocumentStore, IdGenerator, RandomIds, SequentialIds,
    StoreConfig, is_content_text, load_rules, parse_rules,
};
use tracing_subscriber::EnvFilter;

/// Rules used when no rules file is given.
const DEFAULT_RULES: &str = r#"[
    { "type": "exclamation", "component": "ExclamationBadge",
      "ownerField": "hasExclamation", "when": { "textContains": "!" } },
    { "type": "verse", "component": "VerseFrame",
      "when": { "all": [ { "subType": "verse" }, "hasChildren" ] } },
    { "type": "empty", "component": "EmptyMarker",
      "when": { "not": { "any": [ "isText", "hasChildren" ] } } }
]"#;

#[derive(Parser)]
#[command(name = "scriptorium", version, about = "Scripture references and annotated content trees")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every book in the canon.
    Books,
    /// Parse a reference such as "Psalm 119:1".
    Parse {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// Move a reference by books, then chapters, then verses.
    Offset {
        reference: String,
        #[arg(long, allow_negative_numbers = true)]
        book: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        chapter: Option<i32>,
        #[arg(long, allow_negative_numbers = true)]
        verse: Option<i32>,
    },
    /// Compare two references.
    Compare { a: String, b: String },
    /// Load a document, derive its annotations, and print it.
    Annotate {
        #[command(flatten)]
        doc: DocArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print a random content id from a document.
    Random {
        #[command(flatten)]
        doc: DocArgs,
        /// Only pick text-bearing nodes.
        #[arg(long)]
        text_only: bool,
    },
}

#[derive(Args)]
struct DocArgs {
    /// Document JSON file.
    document: PathBuf,
    /// Annotation rules JSON file.
    #[arg(long, env = "SCRIPTORIUM_RULES")]
    rules: Option<PathBuf>,
    /// Mint ids for nodes that lack one.
    #[arg(long)]
    populate_ids: bool,
    /// Mint sequential ids with this prefix instead of random ones.
    #[arg(long, requires = "populate_ids")]
    seed_ids: Option<String>,
    #[arg(long, env = "SCRIPTORIUM_REFRESH_ON_TEXT_CHANGE")]
    refresh_on_text_change: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Books => display::print_books(),
        Command::Parse { text, json } => {
            let reference = parse_reference_text(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&reference)?);
            } else {
                display::print_reference(&reference);
            }
        }
        Command::Offset {
            reference,
            book,
            chapter,
            verse,
        } => {
            let mut r = parse_reference_text(&reference);
            if r == ScriptureReference::INVALID {
                anyhow::bail!("not a scripture reference: {reference:?}");
            }
            if let Some(delta) = book {
                r = offset_book(r, delta);
            }
            if let Some(delta) = chapter {
                r = offset_chapter(r, delta);
            }
            if let Some(delta) = verse {
                r = offset_verse(r, delta);
            }
            display::print_reference(&r);
        }
        Command::Compare { a, b } => {
            let (ra, rb) = (parse_reference_text(&a), parse_reference_text(&b));
            println!("{:<10} {}", "equal", references_equal(&a, &b));
            println!("{:<10} {:?}", "order", ra.cmp(&rb));
        }
        Command::Annotate { doc, json } => {
            let store = open_store(&doc)?;
            if json {
                println!("{}", store.document().to_json_pretty()?);
            } else {
                display::print_outline(store.document());
            }
        }
        Command::Random { doc, text_only } => {
            let store = open_store(&doc)?;
            let picked = if text_only {
                store.random_content_id_matching(is_content_text)
            } else {
                store.random_content_id()
            };
            match picked {
                Some(id) => println!("{id}"),
                None => anyhow::bail!("no matching content ids in {}", doc.document.display()),
            }
        }
    }

    Ok(())
}

fn open_store(args: &DocArgs) -> anyhow::Result<DocumentStore> {
    let rules = match &args.rules {
        Some(path) => load_rules(path)
            .with_context(|| format!("loading annotation rules from {}", path.display()))?,
        None => parse_rules(DEFAULT_RULES).context("parsing built-in annotation rules")?,
    };
    let config = StoreConfig {
        refresh_on_text_change: args.refresh_on_text_change,
    };

    let document = Document::load(&args.document)
        .with_context(|| format!("loading document {}", args.document.display()))?;

    let mut store = DocumentStore::new(AnnotationRegistry::from_rules(rules), config);
    store.set_document(document);

    if args.populate_ids {
        let mut ids: Box<dyn IdGenerator> = match &args.seed_ids {
            Some(prefix) => Box::new(SequentialIds::new(prefix.clone())),
            None => Box::new(RandomIds::new()),
        };
        let minted = store.populate_ids(ids.as_mut());
        tracing::info!(minted, "populated missing ids");
    }

    Ok(store)
}
