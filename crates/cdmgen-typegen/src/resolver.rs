//! Declaration resolution.
//!
//! [`Resolver`] is the context for one generation run. It owns the visited
//! sets that make the traversal terminate and keep every entity to a single
//! declaration, and it hands each finished declaration to the sink.
//!
//! An entity's reference (name + namespace) is recorded before its
//! attributes are flattened. Linked entities are resolved depth-first while
//! flattening, so a linked target is emitted before the entity pointing at
//! it, and a cycle of links finds the in-progress reference instead of
//! recursing again.

use crate::error::GenerateError;
use crate::flatten::{docs_for, flatten};
use crate::ir::{Declaration, DeclarationRef, Property, PropertyType};
use crate::linked::{LinkedReference, linked_reference};
use crate::options::GenerateOptions;
use crate::sanitize;
use crate::types::{self, ScalarType};
use cdmgen_corpus::{CorpusPath, Entity, SchemaStore, TypedAttribute};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Distinct manifests walked.
    pub manifests: usize,
    /// Declarations handed to the sink.
    pub declarations: usize,
}

/// Resolution context for a single run. Never shared between runs.
pub struct Resolver<'a, S: SchemaStore + ?Sized> {
    pub(crate) store: &'a S,
    pub(crate) options: &'a GenerateOptions,
    sink: &'a mut dyn FnMut(&Declaration),
    pub(crate) manifests: HashSet<CorpusPath>,
    pub(crate) walked: usize,
    entities: HashMap<CorpusPath, DeclarationRef>,
    emitted: usize,
}

impl<'a, S: SchemaStore + ?Sized> Resolver<'a, S> {
    pub fn new(
        store: &'a S,
        options: &'a GenerateOptions,
        sink: &'a mut dyn FnMut(&Declaration),
    ) -> Self {
        Self {
            store,
            options,
            sink,
            manifests: HashSet::new(),
            walked: 0,
            entities: HashMap::new(),
            emitted: 0,
        }
    }

    pub fn summary(&self) -> GenerateSummary {
        GenerateSummary {
            manifests: self.walked,
            declarations: self.emitted,
        }
    }

    /// Produce the declaration for `entity`, or return the reference recorded
    /// the first time it was seen.
    pub fn resolve_entity(&mut self, entity: &Arc<Entity>) -> Result<DeclarationRef, GenerateError> {
        if let Some(existing) = self.entities.get(&entity.path) {
            tracing::debug!(entity = %entity.path, "already resolved");
            return Ok(existing.clone());
        }

        let reference = DeclarationRef::new(
            sanitize::class_name(&entity.name),
            sanitize::namespace_for(&entity.folder.names_from_root()),
        );
        self.entities.insert(entity.path.clone(), reference.clone());

        let attributes = flatten(entity);
        let mut properties = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            properties.push(self.property(entity, &reference, attribute)?);
        }

        let declaration = Declaration {
            name: reference.name.clone(),
            namespace: reference.namespace.clone(),
            docs: docs_for(entity.description.as_deref(), entity.display_name.as_deref()),
            properties,
        };
        tracing::info!(
            entity = %entity.path,
            declaration = %reference.qualified_name(),
            properties = declaration.properties.len(),
            "generated declaration"
        );
        (self.sink)(&declaration);
        self.emitted += 1;
        Ok(reference)
    }

    fn property(
        &mut self,
        entity: &Entity,
        owner: &DeclarationRef,
        attribute: &TypedAttribute,
    ) -> Result<Property, GenerateError> {
        let ty = match linked_reference(attribute) {
            Some(LinkedReference::Document(path)) => self.resolve_document(&path)?,
            Some(LinkedReference::Bare(name)) => PropertyType::Entity(name),
            Some(LinkedReference::Malformed) => {
                tracing::warn!(
                    entity = %entity.path,
                    attribute = %attribute.name,
                    "linked entity trait has no usable reference"
                );
                PropertyType::UnknownEntity
            }
            None => {
                let scalar = types::resolve_scalar(attribute, self.options.unknown_tag_fallback)
                    .ok_or_else(|| GenerateError::UnknownDataType {
                        entity: entity.path.to_string(),
                        attribute: attribute.name.clone(),
                    })?;
                PropertyType::Scalar(scalar)
            }
        };
        Ok(Property {
            name: sanitize::property_name(&attribute.name, &owner.name),
            ty,
            docs: docs_for(
                attribute.description.as_deref(),
                attribute.display_name.as_deref(),
            ),
        })
    }

    /// Find the entity behind a linked document path and return its
    /// qualified type name, generating its declaration if needed.
    ///
    /// Each search prefix is tried in order; the first document holding an
    /// entity wins. A miss everywhere degrades to the opaque object type.
    pub fn resolve_document(&mut self, path: &str) -> Result<PropertyType, GenerateError> {
        let options = self.options;
        for prefix in &options.search_prefixes {
            let candidate = self.store.parse_path(&format!("{prefix}/{path}"));
            let Some(document) = self.store.fetch_document(&candidate)? else {
                continue;
            };
            let Some(entity) = document.first_entity() else {
                tracing::debug!(document = %candidate, "document holds no entity");
                continue;
            };
            let reference = self.resolve_entity(&Arc::clone(entity))?;
            return Ok(PropertyType::Entity(reference.qualified_name()));
        }
        tracing::warn!(path, "no document found for linked entity");
        Ok(PropertyType::Scalar(ScalarType::Object))
    }
}
