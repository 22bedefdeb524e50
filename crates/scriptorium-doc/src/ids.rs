//! Node id generation and population.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::{Builder, Uuid};

use crate::content::{Content, Contents, Document};

/// Source of fresh node ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs in hyphenated lowercase form.
///
/// Not cryptographic, and collisions are possible. Fine for document-scale
/// id spaces; not for anything that needs guaranteed uniqueness.
#[derive(Default)]
pub struct RandomIds {
    rng: Option<StdRng>,
}

impl RandomIds {
    /// Ids from [`Uuid::new_v4`].
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Reproducible ids from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> String {
        let uuid = match &mut self.rng {
            Some(rng) => Builder::from_random_bytes(rng.r#gen()).into_uuid(),
            None => Uuid::new_v4(),
        };
        uuid.to_string()
    }
}

/// `prefix-1`, `prefix-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Give every node under `content` (itself included) an id if it lacks one.
///
/// Existing ids are left alone. String contents are leaves. Returns the
/// number of ids minted.
pub fn populate_content_ids(content: &mut Content, ids: &mut dyn IdGenerator) -> usize {
    let mut minted = 0;
    if content.id.as_deref().is_none_or(str::is_empty) {
        content.id = Some(ids.next_id());
        minted += 1;
    }
    if let Contents::Nodes(children) = &mut content.contents {
        for child in children {
            minted += populate_content_ids(child, ids);
        }
    }
    minted
}

/// Give every node in the document body an id if it lacks one.
pub fn populate_document_ids(document: &mut Document, ids: &mut dyn IdGenerator) -> usize {
    match &mut document.body {
        Contents::Nodes(nodes) => nodes
            .iter_mut()
            .map(|node| populate_content_ids(node, ids))
            .sum(),
        Contents::Text(_) | Contents::Empty => 0,
    }
}
