//! Linked-entity references.
//!
//! An attribute carrying `is.linkedEntity.identifier` points at another
//! entity. The trait's first argument holds a constant entity whose first
//! row's first cell is a `/`-separated reference such as
//! `App/Customer/Customer`.

use cdmgen_corpus::{ArgumentValue, TypedAttribute};

/// Name of the trait marking a foreign-key-like attribute.
pub const LINKED_ENTITY_TRAIT: &str = "is.linkedEntity.identifier";

/// What a linked-entity trait points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkedReference {
    /// Document path to search for the target entity.
    Document(String),
    /// Already a bare entity/type name; used verbatim.
    Bare(String),
    /// The trait is present but its argument has the wrong shape.
    Malformed,
}

/// Inspect an attribute for a linked-entity trait with at least one argument.
pub fn linked_reference(attribute: &TypedAttribute) -> Option<LinkedReference> {
    let linked = attribute
        .traits_named(LINKED_ENTITY_TRAIT)
        .find(|t| !t.arguments.is_empty())?;
    let reference = match &linked.arguments[0].value {
        ArgumentValue::ConstantEntity { rows } => rows.first().and_then(|row| row.first()),
        ArgumentValue::Text(_) | ArgumentValue::Other => None,
    };
    Some(match reference {
        Some(reference) if !reference.is_empty() => classify(reference),
        _ => LinkedReference::Malformed,
    })
}

/// Split a reference on `/`; a single segment is a bare name, anything
/// longer becomes a document path.
pub fn classify(reference: &str) -> LinkedReference {
    let segments: Vec<&str> = reference.split('/').collect();
    match segments.as_slice() {
        [single] => LinkedReference::Bare((*single).to_string()),
        _ => LinkedReference::Document(derive_document_path(&segments)),
    }
}

/// Drop the last segment, title-case the rest and rejoin with `/`.
pub fn derive_document_path(segments: &[&str]) -> String {
    let keep = segments.len().saturating_sub(1);
    segments[..keep]
        .iter()
        .map(|segment| title_case(segment))
        .collect::<Vec<_>>()
        .join("/")
}

/// Upper-case the first character, leaving the rest untouched.
pub fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
