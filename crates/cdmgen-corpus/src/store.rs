//! Fetch collaborators over the schema object model.

use crate::model::{DefinitionDef, Document, Entity, EntityDef, Manifest, ManifestDef};
use crate::path::{CorpusPath, DEFAULT_NAMESPACE};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Errors raised by a store while fetching or parsing schema documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no storage is mounted for namespace '{0}'")]
    UnmountedNamespace(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("attribute group '{name}' is not defined in {document}")]
    UnknownAttributeGroup { name: String, document: String },
    #[error("attribute group '{name}' in {document} refers to itself")]
    CyclicAttributeGroup { name: String, document: String },
    #[error("attribute '{name}' in {document} has an unreadable shape")]
    MalformedAttribute { name: String, document: String },
}

/// Read access to a schema corpus.
///
/// `Ok(None)` means "not found"; `Err` is reserved for stores that found
/// something and could not make sense of it.
pub trait SchemaStore {
    /// Namespace for paths that carry none.
    fn default_namespace(&self) -> &str {
        DEFAULT_NAMESPACE
    }

    fn fetch_manifest(&self, path: &CorpusPath) -> Result<Option<Arc<Manifest>>, StoreError>;

    /// Fetch a document. Implementations retry a path without the
    /// `.cdm.json` suffix with the suffix appended.
    fn fetch_document(&self, path: &CorpusPath) -> Result<Option<Arc<Document>>, StoreError>;

    /// Fetch an entity by a path relative to `manifest`'s folder.
    ///
    /// `Customer.cdm.json/Customer` names the entity inside the document; a
    /// path that stops at the document picks its first entity.
    fn fetch_entity(
        &self,
        path: &str,
        manifest: &Manifest,
    ) -> Result<Option<Arc<Entity>>, StoreError> {
        let (document_path, name) = manifest.path.resolve(path).split_object();
        let Some(document) = self.fetch_document(&document_path)? else {
            return Ok(None);
        };
        let entity = match name {
            Some(name) => document.entity(&name),
            None => document.first_entity(),
        };
        Ok(entity.cloned())
    }

    /// Parse a path against this store's default namespace.
    fn parse_path(&self, input: &str) -> CorpusPath {
        CorpusPath::parse(input, self.default_namespace())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// A store populated in code.
///
/// Counts fetches per canonical path so callers can check how often the
/// corpus was consulted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    manifests: HashMap<CorpusPath, Arc<Manifest>>,
    definitions: HashMap<CorpusPath, Vec<DefinitionDef>>,
    documents: HashMap<CorpusPath, Arc<Document>>,
    fetches: RefCell<HashMap<String, usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a manifest at `path`.
    pub fn add_manifest(&mut self, path: &str, def: ManifestDef) -> CorpusPath {
        let path = self.parse_path(path);
        self.manifests
            .insert(path.clone(), Arc::new(Manifest::new(path.clone(), def)));
        path
    }

    /// Append an entity to the document at `document_path`. Returns the
    /// entity's canonical path.
    pub fn add_entity(&mut self, document_path: &str, entity: EntityDef) -> CorpusPath {
        let document_path = self.parse_path(document_path);
        let entity_path = document_path.join(&entity.name);
        self.add_definitions(document_path, vec![DefinitionDef::Entity(entity)]);
        entity_path
    }

    /// Append definitions to the document at `document_path`, creating it if needed.
    pub fn add_document(&mut self, document_path: &str, definitions: Vec<DefinitionDef>) {
        let document_path = self.parse_path(document_path);
        self.add_definitions(document_path, definitions);
    }

    fn add_definitions(&mut self, path: CorpusPath, definitions: Vec<DefinitionDef>) {
        let all = self.definitions.entry(path.clone()).or_default();
        all.extend(definitions);
        let document = Document::new(path.clone(), all.clone());
        self.documents.insert(path, Arc::new(document));
    }

    /// Number of times `path` (any form accepted by [`CorpusPath::parse`]) was fetched.
    pub fn fetch_count(&self, path: &str) -> usize {
        let key = self.parse_path(path).to_string();
        self.fetches.borrow().get(&key).copied().unwrap_or(0)
    }

    fn record(&self, path: &CorpusPath) {
        *self
            .fetches
            .borrow_mut()
            .entry(path.to_string())
            .or_default() += 1;
    }
}

impl SchemaStore for MemoryStore {
    fn fetch_manifest(&self, path: &CorpusPath) -> Result<Option<Arc<Manifest>>, StoreError> {
        self.record(path);
        Ok(self.manifests.get(path).cloned())
    }

    fn fetch_document(&self, path: &CorpusPath) -> Result<Option<Arc<Document>>, StoreError> {
        self.record(path);
        Ok(path
            .document_candidates()
            .iter()
            .find_map(|candidate| self.documents.get(candidate).cloned()))
    }
}
