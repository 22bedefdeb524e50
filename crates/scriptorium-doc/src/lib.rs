//! Annotated content tree: a component/element/text document model with an
//! id index, derived annotations, and change notification.

mod error;
pub use error::DocError;

pub mod annotation;
pub mod content;
pub mod ids;
pub mod rules;
pub mod store;

pub use annotation::{
    Annotation, AnnotationDefinition, AnnotationRegistry, derive_annotations, refresh_annotations,
};
pub use content::{Content, ContentKind, Contents, Document, is_content_text};
pub use ids::{IdGenerator, RandomIds, SequentialIds, populate_content_ids, populate_document_ids};
pub use rules::{AnnotationRule, Matcher, load_rules, parse_rules};
pub use store::{DocumentStore, StoreConfig, SubscriptionId};
