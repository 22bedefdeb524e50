//! Declarative annotation rules, loadable from JSON.
//!
//! ```json
//! [
//!   { "type": "exclamation", "component": "ExclamationBadge",
//!     "ownerField": "hasExclamation", "when": { "textContains": "!" } },
//!   { "type": "verseBlock", "component": "VerseFrame",
//!     "when": { "all": [ { "subType": "verse" }, "hasChildren" ] } }
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::annotation::{AnnotationDefinition, AnnotationRegistry};
use crate::content::{Content, Contents, is_content_text};
use crate::error::DocError;

/// A predicate over a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Matcher {
    /// String contents containing the needle.
    TextContains(String),
    /// Component or element with this sub type.
    SubType(String),
    /// See [`crate::is_content_text`].
    IsText,
    /// Contents are a non-empty node sequence.
    HasChildren,
    All(Vec<Matcher>),
    Any(Vec<Matcher>),
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn matches(&self, content: &Content) -> bool {
        match self {
            Matcher::TextContains(needle) => content
                .text_value()
                .is_some_and(|text| text.contains(needle.as_str())),
            Matcher::SubType(sub_type) => content.kind.sub_type() == Some(sub_type.as_str()),
            Matcher::IsText => is_content_text(content),
            Matcher::HasChildren => {
                matches!(&content.contents, Contents::Nodes(nodes) if !nodes.is_empty())
            }
            Matcher::All(all) => all.iter().all(|m| m.matches(content)),
            Matcher::Any(any) => any.iter().any(|m| m.matches(content)),
            Matcher::Not(inner) => !inner.matches(content),
        }
    }
}

/// A registry entry in declarative form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRule {
    #[serde(rename = "type")]
    pub type_name: String,
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_field: Option<String>,
    pub when: Matcher,
}

impl AnnotationRule {
    pub fn into_definition(self) -> AnnotationDefinition {
        let when = self.when;
        let definition =
            AnnotationDefinition::new(self.type_name, self.component, move |c: &Content| {
                when.matches(c)
            });
        match self.owner_field {
            Some(field) => definition.with_owner_field(field),
            None => definition,
        }
    }
}

impl AnnotationRegistry {
    /// Build a registry from rules, in order.
    pub fn from_rules(rules: impl IntoIterator<Item = AnnotationRule>) -> Self {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule.into_definition());
        }
        registry
    }
}

pub fn parse_rules(json: &str) -> Result<Vec<AnnotationRule>, DocError> {
    Ok(serde_json::from_str(json)?)
}

/// Read a JSON array of rules from disk.
pub fn load_rules(path: &Path) -> Result<Vec<AnnotationRule>, DocError> {
    let json = std::fs::read_to_string(path).map_err(|source| DocError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules(&json)?;
    info!(path = %path.display(), count = rules.len(), "loaded annotation rules");
    Ok(rules)
}
