//! Derived annotations.
//!
//! Annotations are never authored. Each [`AnnotationDefinition`] carries a
//! predicate; on every refresh a node's annotation list is rebuilt so that it
//! holds exactly one entry per definition whose predicate currently accepts
//! the node, and nothing else.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::{Content, Contents};

/// A marker attached to a content node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    /// Renderer-specific fields, kept across refreshes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type Predicate = Box<dyn Fn(&Content) -> bool + Send + Sync>;

/// One registered annotation type.
pub struct AnnotationDefinition {
    pub type_name: String,
    /// Opaque reference to whatever renders this annotation.
    pub component: String,
    /// When set, new annotations carry `{owner_field: true}`.
    pub owner_field: Option<String>,
    predicate: Predicate,
}

impl AnnotationDefinition {
    pub fn new<F>(type_name: impl Into<String>, component: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Content) -> bool + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            component: component.into(),
            owner_field: None,
            predicate: Box::new(predicate),
        }
    }

    pub fn with_owner_field(mut self, field: impl Into<String>) -> Self {
        self.owner_field = Some(field.into());
        self
    }

    pub fn annotates(&self, content: &Content) -> bool {
        (self.predicate)(content)
    }

    fn annotation_for(&self, content: &Content) -> Annotation {
        let mut extra = Map::new();
        if let Some(field) = &self.owner_field {
            extra.insert(field.clone(), Value::Bool(true));
        }
        Annotation {
            kind: self.type_name.clone(),
            owner_id: content.id.clone(),
            extra,
        }
    }
}

impl fmt::Debug for AnnotationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationDefinition")
            .field("type_name", &self.type_name)
            .field("component", &self.component)
            .field("owner_field", &self.owner_field)
            .finish_non_exhaustive()
    }
}

/// Annotation definitions in registration order.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    definitions: Vec<AnnotationDefinition>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. A definition with the same type name is replaced in
    /// place, keeping its position.
    pub fn register(&mut self, definition: AnnotationDefinition) -> &mut Self {
        match self
            .definitions
            .iter_mut()
            .find(|d| d.type_name == definition.type_name)
        {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&AnnotationDefinition> {
        self.definitions.iter().find(|d| d.type_name == type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// The annotation list `content` should carry under `registry`.
///
/// Existing entries whose definition still matches are kept (with their
/// extra fields) in their current order; newly matching definitions are
/// appended in registry order. Anything else is dropped, including
/// duplicates and types that are no longer registered.
pub fn derive_annotations(content: &Content, registry: &AnnotationRegistry) -> Vec<Annotation> {
    let matching: Vec<&AnnotationDefinition> =
        registry.iter().filter(|d| d.annotates(content)).collect();

    let mut out: Vec<Annotation> = Vec::with_capacity(matching.len());
    for existing in &content.annotations {
        let wanted = matching.iter().any(|d| d.type_name == existing.kind);
        let seen = out.iter().any(|a| a.kind == existing.kind);
        if wanted && !seen {
            out.push(Annotation {
                owner_id: content.id.clone(),
                ..existing.clone()
            });
        }
    }
    for definition in matching {
        if !out.iter().any(|a| a.kind == definition.type_name) {
            out.push(definition.annotation_for(content));
        }
    }
    out
}

/// Recompute annotations for every node under `contents`, parents first.
///
/// Returns the number of nodes visited.
pub fn refresh_annotations(contents: &mut Contents, registry: &AnnotationRegistry) -> usize {
    let Contents::Nodes(nodes) = contents else {
        return 0;
    };
    let mut visited = 0;
    for node in nodes {
        node.annotations = derive_annotations(node, registry);
        visited += 1 + refresh_annotations(&mut node.contents, registry);
    }
    visited
}
