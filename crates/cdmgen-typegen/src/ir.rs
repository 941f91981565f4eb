//! Intermediate representation for generated declarations.
//!
//! The resolver produces these; output backends turn them into source text.

use crate::types::ScalarType;
use serde::{Deserialize, Serialize};

/// A flat record declaration synthesized from one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Class/record name (sanitized).
    pub name: String,
    /// Dotted namespace derived from the entity's folder chain. May be empty.
    pub namespace: String,
    /// Documentation comment.
    pub docs: String,
    /// Properties in attribute declaration order.
    pub properties: Vec<Property>,
}

/// A property of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name (sanitized, escaped, never equal to the owning class name).
    pub name: String,
    /// Property type.
    pub ty: PropertyType,
    /// Documentation comment.
    pub docs: String,
}

/// The type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// One of the canonical scalar kinds.
    Scalar(ScalarType),
    /// Fully-qualified name of another declaration.
    Entity(String),
    /// A linked-entity reference that could not be interpreted.
    UnknownEntity,
}

/// Name and namespace of a declaration, known before its properties are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationRef {
    pub name: String,
    pub namespace: String,
}

impl DeclarationRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// `namespace.name`, or just `name` in the empty namespace.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl Declaration {
    pub fn reference(&self) -> DeclarationRef {
        DeclarationRef::new(self.name.clone(), self.namespace.clone())
    }

    pub fn qualified_name(&self) -> String {
        self.reference().qualified_name()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl Property {
    pub fn new(name: impl Into<String>, ty: PropertyType, docs: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            docs: docs.into(),
        }
    }
}
