use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};

use scriptorium_doc::{
    AnnotationDefinition, AnnotationRegistry, Content, Contents, Document, DocumentStore,
    RandomIds, SequentialIds, StoreConfig, is_content_text, populate_document_ids,
};

fn exclamation_registry() -> AnnotationRegistry {
    let mut registry = AnnotationRegistry::new();
    registry.register(AnnotationDefinition::new(
        "exclamation",
        "ExclamationBadge",
        |c: &Content| c.text_value().is_some_and(|t| t.contains('!')),
    ));
    registry
}

/// Genesis 1:1 split into a verse component with nested markup.
fn genesis() -> Document {
    Document::new(vec![
        Content::component(
            "verse",
            vec![
                Content::text("In the beginning ").with_id("t1"),
                Content::element("em", vec![Content::text("God").with_id("t2")]).with_id("em1"),
                Content::text(" created the heaven and the earth.").with_id("t3"),
            ],
        )
        .with_id("v1"),
        Content::component(
            "verse",
            vec![Content::text("And the earth was without form").with_id("t4")],
        )
        .with_id("v2"),
    ])
    .with_id("gen-1")
}

#[test]
fn populate_twice_keeps_the_same_ids() {
    let mut doc = Document::new(vec![Content::component(
        "verse",
        vec![Content::text("a"), Content::element("em", vec![Content::text("b")])],
    )]);
    populate_document_ids(&mut doc, &mut RandomIds::new());
    let first = doc.body.collect_ids();
    assert_eq!(first.len(), 4);

    populate_document_ids(&mut doc, &mut RandomIds::new());
    assert_eq!(doc.body.collect_ids(), first);
}

#[test]
fn annotations_converge_after_edits() {
    let mut store = DocumentStore::new(exclamation_registry(), StoreConfig::default());
    store.set_document(Document::new(vec![Content::text("Hello!").with_id("t1")]));

    let node = store.content_by_id("t1").unwrap();
    assert_eq!(node.annotations.len(), 1);
    assert_eq!(node.annotations[0].kind, "exclamation");
    assert_eq!(node.annotations[0].owner_id.as_deref(), Some("t1"));

    assert!(store.update_contents_by_id("t1", Contents::Text("Hello".into())));
    store.refresh();
    assert!(store.content_by_id("t1").unwrap().annotations.is_empty());

    assert!(store.update_contents_by_id("t1", Contents::Text("Hello again!".into())));
    store.refresh();
    store.refresh();
    assert_eq!(store.content_by_id("t1").unwrap().annotations.len(), 1);
}

#[test]
fn set_document_indexes_existing_ids_only() {
    let mut store = DocumentStore::default();
    let mut doc = genesis();
    if let Contents::Nodes(nodes) = &mut doc.body {
        nodes.push(Content::text("no id yet"));
    }
    store.set_document(doc);

    let ids: Vec<&str> = store.ids().collect();
    assert_eq!(ids, vec!["em1", "t1", "t2", "t3", "t4", "v1", "v2"]);

    let minted = store.populate_ids(&mut SequentialIds::new("n"));
    assert_eq!(minted, 1);
    assert!(store.contains_id("n-1"));
    assert_eq!(store.id_count(), 8);
}

#[test]
fn set_document_replaces_the_live_document() {
    let mut store = DocumentStore::default();
    store.set_document(genesis());
    store.set_document(Document::new(vec![Content::text("only").with_id("x")]));
    assert!(store.content_by_id("v1").is_none());
    assert_eq!(store.ids().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn subscribers_see_every_refresh() {
    let mut store = DocumentStore::new(exclamation_registry(), StoreConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |doc: &Document| {
        sink.lock().unwrap().push(doc.id.clone());
    });

    store.set_document(genesis());
    store.destroy_content_by_id("t4", true);

    let seen = seen.lock().unwrap();
    let gen_1 = Some("gen-1".to_string());
    assert_eq!(*seen, vec![None, gen_1.clone(), gen_1]);
}

#[test]
fn destroy_missing_id_is_a_no_op() {
    let mut store = DocumentStore::default();
    store.set_document(genesis());
    let before = store.document().clone();

    assert!(!store.destroy_content_by_id("does-not-exist", true));
    assert!(!store.destroy_content_by_id("", true));
    assert_eq!(store.id_count(), 7);
    assert_eq!(store.document(), &before);
}

#[test]
fn destroy_removes_subtree_ids() {
    let mut store = DocumentStore::default();
    store.set_document(genesis());

    assert!(store.destroy_content_by_id("v1", true));
    assert!(store.content_by_id("t2").is_none());
    let ids: HashSet<&str> = store.ids().collect();
    assert_eq!(ids, HashSet::from(["v2", "t4"]));
}

#[test]
fn destroy_without_recurse_promotes_children() {
    let mut store = DocumentStore::default();
    store.set_document(genesis());

    assert!(store.destroy_content_by_id("em1", false));
    assert!(!store.contains_id("em1"));
    assert!(store.contains_id("t2"));

    let verse = store.content_by_id("v1").unwrap();
    let children: Vec<&str> = verse
        .contents
        .nodes()
        .unwrap()
        .iter()
        .filter_map(|c| c.id.as_deref())
        .collect();
    assert_eq!(children, vec!["t1", "t2", "t3"]);
}

#[test]
fn duplicate_ids_stay_indexed_while_a_node_carries_them() {
    let mut store = DocumentStore::default();
    store.set_document(Document::new(vec![
        Content::text("first").with_id("dup"),
        Content::component("verse", vec![Content::text("second").with_id("dup")])
            .with_id("v1"),
    ]));
    assert_eq!(store.id_count(), 2);

    assert!(store.destroy_content_by_id("dup", true));
    assert_eq!(store.content_by_id("dup").and_then(Content::text_value), Some("second"));
    assert!(store.contains_id("dup"));
    let picked = store.random_content_id_matching(|c| c.text_value() == Some("second"));
    assert_eq!(picked.as_deref(), Some("dup"));

    assert!(store.update_contents_by_id("v1", Contents::Empty));
    assert!(store.content_by_id("dup").is_none());
    assert!(!store.contains_id("dup"));
    assert_eq!(store.ids().collect::<Vec<_>>(), vec!["v1"]);
}

#[test]
fn random_id_on_empty_document_is_none() {
    let store = DocumentStore::default();
    assert!(store.random_content_id().is_none());
    assert!(store.random_content_id_matching(|_| true).is_none());
}

#[test]
fn random_id_comes_from_the_index() {
    let mut store = DocumentStore::default();
    store.set_document(genesis());
    for _ in 0..50 {
        let id = store.random_content_id().unwrap();
        assert!(store.contains_id(&id));
    }
}

#[test]
fn random_id_respects_filter() {
    let mut store = DocumentStore::default();
    store.set_document(genesis());

    for _ in 0..50 {
        let id = store.random_content_id_matching(is_content_text).unwrap();
        assert!(is_content_text(store.content_by_id(&id).unwrap()));
    }
    assert!(
        store
            .random_content_id_matching(|c| c.kind.sub_type() == Some("table"))
            .is_none()
    );
}

#[test]
fn loads_and_adopts_a_json_document() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"id":"doc","body":[{{"id":"t1","type":"text","contents":"Praise ye the LORD!"}}]}}"#
    )
    .unwrap();

    let mut store = DocumentStore::new(exclamation_registry(), StoreConfig::default());
    store.set_document(Document::load(file.path()).unwrap());
    assert!(store.content_by_id("t1").unwrap().has_annotation("exclamation"));
}

fn demo(name: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demo_document_with_demo_rules() {
    let rules = scriptorium_doc::load_rules(&demo("rules.json")).unwrap();
    let registry = AnnotationRegistry::from_rules(rules);
    let mut store = DocumentStore::new(registry, StoreConfig::default());
    store.set_document(Document::load(&demo("genesis.json")).unwrap());
    assert_eq!(store.id_count(), 2);

    let minted = store.populate_ids(&mut SequentialIds::new("gen"));
    assert_eq!(minted, 8);
    assert_eq!(store.id_count(), 10);

    let light = store.content_by_id("GEN-1-3").unwrap();
    assert!(light.has_annotation("verse"));
    let line = &light.contents.nodes().unwrap()[0];
    assert!(line.has_annotation("exclamation"));
    assert!(line.has_annotation("divineName"));
    assert_eq!(line.annotations[0].extra["hasExclamation"], true);
}
