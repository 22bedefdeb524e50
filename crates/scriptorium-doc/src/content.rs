//! The annotated content tree.
//!
//! A [`Document`] owns a [`Contents`] body. Contents are a three-way union:
//! a sequence of child [`Content`] nodes, a raw string, or nothing. Callers
//! must branch on which one they hold; "no children" and "string payload" are
//! different things.
//!
//! JSON shape:
//!
//! ```json
//! { "id": "c1", "type": "component", "subType": "verse",
//!   "contents": [ { "type": "text", "contents": "In the beginning" } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::error::DocError;

/// Which kind of node this is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentKind {
    /// A registered UI component, e.g. `"verse"` or `"chapterHeading"`.
    Component {
        #[serde(rename = "subType")]
        sub_type: String,
    },
    /// A markup tag, e.g. `"p"` or `"em"`.
    Element {
        #[serde(rename = "subType")]
        sub_type: String,
    },
    Text,
}

impl ContentKind {
    pub fn sub_type(&self) -> Option<&str> {
        match self {
            ContentKind::Component { sub_type } | ContentKind::Element { sub_type } => {
                Some(sub_type)
            }
            ContentKind::Text => None,
        }
    }
}

/// Children of a node (or of the document body).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Nodes(Vec<Content>),
    Text(String),
    #[default]
    Empty,
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Contents::is_empty")]
    pub contents: Contents,
    /// Derived on every refresh. Never authored by hand.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// The root of a content tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Contents::is_empty")]
    pub body: Contents,
}

/// True for text nodes, and for any node whose contents are a raw string.
///
/// The second case covers a node caught between structured and string
/// contents.
pub fn is_content_text(content: &Content) -> bool {
    matches!(content.kind, ContentKind::Text) || matches!(content.contents, Contents::Text(_))
}

impl Content {
    fn new(kind: ContentKind, contents: Contents) -> Self {
        Self {
            id: None,
            kind,
            contents,
            annotations: Vec::new(),
        }
    }

    pub fn component(sub_type: impl Into<String>, children: Vec<Content>) -> Self {
        Self::new(
            ContentKind::Component {
                sub_type: sub_type.into(),
            },
            Contents::Nodes(children),
        )
    }

    pub fn element(sub_type: impl Into<String>, children: Vec<Content>) -> Self {
        Self::new(
            ContentKind::Element {
                sub_type: sub_type.into(),
            },
            Contents::Nodes(children),
        )
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ContentKind::Text, Contents::Text(text.into()))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The raw string payload, if the contents are a string.
    pub fn text_value(&self) -> Option<&str> {
        match &self.contents {
            Contents::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn has_annotation(&self, type_name: &str) -> bool {
        self.annotations.iter().any(|a| a.kind == type_name)
    }
}

impl Contents {
    pub fn is_empty(&self) -> bool {
        matches!(self, Contents::Empty)
    }

    /// Child nodes, or `None` when the contents are a string or absent.
    pub fn nodes(&self) -> Option<&[Content]> {
        match self {
            Contents::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<F: FnMut(&Content)>(&self, f: &mut F) {
        if let Contents::Nodes(nodes) = self {
            for node in nodes {
                f(node);
                node.contents.walk(f);
            }
        }
    }

    /// First node (depth-first) whose id is `id`. Linear scan.
    pub fn find_by_id(&self, id: &str) -> Option<&Content> {
        let Contents::Nodes(nodes) = self else {
            return None;
        };
        for node in nodes {
            if node.id.as_deref() == Some(id) {
                return Some(node);
            }
            if let Some(found) = node.contents.find_by_id(id) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Content> {
        let Contents::Nodes(nodes) = self else {
            return None;
        };
        for node in nodes {
            if node.id.as_deref() == Some(id) {
                return Some(node);
            }
            if let Some(found) = node.contents.find_by_id_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Every assigned id in the tree, in depth-first order.
    pub fn collect_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.walk(&mut |node: &Content| {
            if let Some(id) = &node.id {
                ids.push(id.clone());
            }
        });
        ids
    }

    /// Splice the first node (depth-first) with id `id` out of its parent.
    ///
    /// With `recurse`, the node leaves with its whole subtree. Without it, a
    /// node whose contents are a sequence hands its children to the parent at
    /// its former position, and leaves with [`Contents::Empty`].
    pub fn remove_by_id(&mut self, id: &str, recurse: bool) -> Option<Content> {
        let Contents::Nodes(nodes) = self else {
            return None;
        };
        for pos in 0..nodes.len() {
            if nodes[pos].id.as_deref() == Some(id) {
                let mut removed = nodes.remove(pos);
                if !recurse {
                    match std::mem::take(&mut removed.contents) {
                        Contents::Nodes(children) => {
                            nodes.splice(pos..pos, children);
                        }
                        other => removed.contents = other,
                    }
                }
                return Some(removed);
            }
            if let Some(removed) = nodes[pos].contents.remove_by_id(id, recurse) {
                return Some(removed);
            }
        }
        None
    }
}

impl Document {
    pub fn new(body: Vec<Content>) -> Self {
        Self {
            id: None,
            body: Contents::Nodes(body),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, DocError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DocError> {
        let json = std::fs::read_to_string(path).map_err(|source| DocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Contents {
        Contents::Nodes(vec![
            Content::component(
                "verse",
                vec![
                    Content::text("In the beginning").with_id("t1"),
                    Content::element("em", vec![Content::text("God").with_id("t2")]).with_id("e1"),
                ],
            )
            .with_id("v1"),
            Content::text("created").with_id("t3"),
        ])
    }

    #[test]
    fn text_classification() {
        assert!(is_content_text(&Content::text("hi")));
        assert!(!is_content_text(&Content::element("p", vec![])));

        let mut mid_edit = Content::element("p", vec![]);
        mid_edit.contents = Contents::Text("raw".into());
        assert!(is_content_text(&mid_edit));

        let mut emptied = Content::text("x");
        emptied.contents = Contents::Empty;
        assert!(is_content_text(&emptied));
    }

    #[test]
    fn find_by_id_is_depth_first() {
        let body = sample();
        assert_eq!(body.find_by_id("t2").and_then(Content::text_value), Some("God"));
        assert_eq!(body.find_by_id("t3").and_then(Content::text_value), Some("created"));
        assert!(body.find_by_id("missing").is_none());
        assert!(Contents::Text("v1".into()).find_by_id("v1").is_none());
    }

    #[test]
    fn collect_ids_in_walk_order() {
        assert_eq!(sample().collect_ids(), vec!["v1", "t1", "e1", "t2", "t3"]);
    }

    #[test]
    fn remove_with_subtree() {
        let mut body = sample();
        let removed = body.remove_by_id("e1", true).unwrap();
        assert_eq!(removed.contents.collect_ids(), vec!["t2"]);
        assert_eq!(body.collect_ids(), vec!["v1", "t1", "t3"]);
    }

    #[test]
    fn remove_promotes_children() {
        let mut body = sample();
        let removed = body.remove_by_id("v1", false).unwrap();
        assert!(removed.contents.is_empty());
        assert_eq!(body.collect_ids(), vec!["t1", "e1", "t2", "t3"]);
    }

    #[test]
    fn remove_without_recurse_keeps_string_payload() {
        let mut body = sample();
        let removed = body.remove_by_id("t3", false).unwrap();
        assert_eq!(removed.text_value(), Some("created"));
        assert_eq!(body.collect_ids(), vec!["v1", "t1", "e1", "t2"]);
    }

    #[test]
    fn remove_missing_is_none() {
        let mut body = sample();
        assert!(body.remove_by_id("nope", true).is_none());
        assert_eq!(body, sample());
    }

    #[test]
    fn json_shape() {
        let json = r#"{
            "id": "doc",
            "body": [
                { "id": "v1", "type": "component", "subType": "verse",
                  "contents": [ { "type": "text", "contents": "Hello!" } ] },
                { "type": "element", "subType": "br" }
            ]
        }"#;
        let doc = Document::from_json(json).unwrap();
        let nodes = doc.body.nodes().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind.sub_type(), Some("verse"));
        assert!(nodes[1].contents.is_empty());
        assert_eq!(
            nodes[0].contents.nodes().unwrap()[0].text_value(),
            Some("Hello!")
        );

        let back = Document::from_json(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Document::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, DocError::Io { .. }));
    }
}
