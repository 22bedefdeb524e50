//! The live document and everything that must stay in step with it.
//!
//! A [`DocumentStore`] owns one document, the flat index of ids assigned in
//! it, the annotation registry, and the subscribers to refreshes. All
//! mutation goes through the store so the index and annotations cannot drift
//! from the tree. The store is synchronous; share it across threads by
//! wrapping it in a single `Mutex`.

use std::collections::BTreeMap;

use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::annotation::{AnnotationRegistry, refresh_annotations};
use crate::content::{Content, Contents, Document, is_content_text};
use crate::ids::{IdGenerator, populate_document_ids};

/// Store behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Refresh after plain text edits too. Off by default: text edits render
    /// themselves and a refresh walks the whole tree.
    #[serde(default)]
    pub refresh_on_text_change: bool,
}

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Document) + Send>;

pub struct DocumentStore {
    document: Document,
    /// Id to the number of nodes carrying it.
    ids: BTreeMap<String, usize>,
    registry: AnnotationRegistry,
    config: StoreConfig,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl DocumentStore {
    /// A store holding an empty document.
    pub fn new(registry: AnnotationRegistry, config: StoreConfig) -> Self {
        Self {
            document: Document::default(),
            ids: BTreeMap::new(),
            registry,
            config,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Adopt `document` as the live document.
    ///
    /// Annotations are recomputed, the id index is rebuilt from the ids
    /// already present (none are minted), and subscribers are notified.
    pub fn set_document(&mut self, document: Document) -> &Document {
        self.document = document;
        refresh_annotations(&mut self.document.body, &self.registry);
        self.reindex();
        info!(
            document = self.document.id.as_deref().unwrap_or("-"),
            ids = self.ids.len(),
            "document adopted"
        );
        self.notify();
        &self.document
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    /// Swap the annotation registry and refresh.
    pub fn set_registry(&mut self, registry: AnnotationRegistry) {
        self.registry = registry;
        self.refresh();
    }

    /// Mint ids for every node in the live document that lacks one.
    pub fn populate_ids(&mut self, ids: &mut dyn IdGenerator) -> usize {
        let minted = populate_document_ids(&mut self.document, ids);
        if minted > 0 {
            self.reindex();
            self.refresh();
        }
        minted
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn id_count(&self) -> usize {
        self.ids.len()
    }

    /// Indexed ids in sorted order, each listed once.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }

    /// First node (depth-first) with this id. Empty ids never match.
    pub fn content_by_id(&self, id: &str) -> Option<&Content> {
        if id.is_empty() {
            return None;
        }
        self.document.body.find_by_id(id)
    }

    /// Replace a node's contents.
    ///
    /// Returns `false` when the id is unknown or the contents are unchanged.
    /// An edit that leaves a text node holding text mutates silently unless
    /// [`StoreConfig::refresh_on_text_change`] is set; every other change
    /// refreshes.
    pub fn update_contents_by_id(&mut self, id: &str, contents: Contents) -> bool {
        if id.is_empty() {
            return false;
        }
        let Some(node) = self.document.body.find_by_id_mut(id) else {
            debug!(id, "update_contents_by_id: no such node");
            return false;
        };
        if node.contents == contents {
            return false;
        }

        let was_text = is_content_text(node);
        let dropped = node.contents.collect_ids();
        node.contents = contents;
        let added = node.contents.collect_ids();
        let plain_text_edit = was_text && is_content_text(node);

        self.unindex_ids(dropped);
        self.index_ids(added);

        if plain_text_edit && !self.config.refresh_on_text_change {
            debug!(id, "text edit applied without refresh");
            return true;
        }
        self.refresh();
        true
    }

    /// Run `mutate` against the node with this id.
    ///
    /// `mutate` reports whether it changed anything; only then is the index
    /// rebuilt and the document refreshed.
    pub fn update_content_by_id<F>(&mut self, id: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut Content) -> bool,
    {
        if id.is_empty() {
            return false;
        }
        let Some(node) = self.document.body.find_by_id_mut(id) else {
            debug!(id, "update_content_by_id: no such node");
            return false;
        };
        if !mutate(node) {
            return false;
        }
        self.reindex();
        self.refresh();
        true
    }

    /// Remove the node with this id.
    ///
    /// With `recurse`, the whole subtree goes and all of its ids leave the
    /// index. Without it, the node's children take its place in the parent
    /// and keep their ids. Unknown or empty ids are a no-op returning
    /// `false`.
    pub fn destroy_content_by_id(&mut self, id: &str, recurse: bool) -> bool {
        if id.is_empty() {
            return false;
        }
        let Some(removed) = self.document.body.remove_by_id(id, recurse) else {
            debug!(id, "destroy_content_by_id: no such node");
            return false;
        };

        self.unindex_ids([id.to_string()]);
        if recurse {
            self.unindex_ids(removed.contents.collect_ids());
        }
        debug!(id, recurse, remaining = self.ids.len(), "content destroyed");
        self.refresh();
        true
    }

    /// A uniformly chosen id from the index, or `None` when it is empty.
    pub fn random_content_id(&self) -> Option<String> {
        self.ids.keys().choose(&mut rand::thread_rng()).cloned()
    }

    /// A uniformly chosen id among nodes accepted by `filter`.
    pub fn random_content_id_matching<F>(&self, filter: F) -> Option<String>
    where
        F: Fn(&Content) -> bool,
    {
        self.ids
            .keys()
            .filter(|id| self.content_by_id(id).is_some_and(&filter))
            .choose(&mut rand::thread_rng())
            .cloned()
    }

    /// Recompute every annotation and notify subscribers.
    pub fn refresh(&mut self) {
        let visited = refresh_annotations(&mut self.document.body, &self.registry);
        debug!(visited, subscribers = self.subscribers.len(), "document refreshed");
        self.notify();
    }

    /// Register a callback. It runs once immediately with the current
    /// document, then after every refresh.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Document) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        let mut callback: Subscriber = Box::new(callback);
        callback(&self.document);
        self.subscribers.push((id, callback));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        for (_, callback) in &mut self.subscribers {
            callback(&self.document);
        }
    }

    fn reindex(&mut self) {
        self.ids.clear();
        let ids = self.document.body.collect_ids();
        self.index_ids(ids);
    }

    fn index_ids(&mut self, ids: Vec<String>) {
        for id in ids {
            let count = self.ids.entry(id.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                warn!(id = %id, count = *count, "duplicate content id in document");
            }
        }
    }

    /// Drop one occurrence of each id; an id leaves the index with its last
    /// carrier.
    fn unindex_ids(&mut self, ids: impl IntoIterator<Item = String>) {
        for id in ids {
            if let Some(count) = self.ids.get_mut(&id) {
                *count -= 1;
                if *count == 0 {
                    self.ids.remove(&id);
                }
            }
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(AnnotationRegistry::default(), StoreConfig::default())
    }
}
