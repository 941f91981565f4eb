//! Store backed by CDM JSON documents on the local filesystem.
//!
//! Accepts the subset of the CDM persistence format the generator needs:
//!
//! ```json
//! {
//!   "manifestName": "default",
//!   "entities": [{ "entityName": "Customer", "entityPath": "app/Customer.cdm.json/Customer" }],
//!   "subManifests": [{ "manifestName": "sales", "definition": "sales/sales.manifest.cdm.json" }]
//! }
//! ```
//!
//! Documents hold `definitions`: entities (`entityName`, `hasAttributes`) and
//! attribute groups (`attributeGroupName`, `members`). Anything else in a
//! document (trait or data-type definitions, imports) is ignored.

use crate::model::{
    ArgumentValue, Attribute, AttributeGroup, AttributeGroupRef, DataFormat, DefinitionDef,
    Document, EntityDef, Manifest, ManifestDef, TraitArgument, TraitReference, TypedAttribute,
};
use crate::path::{CorpusPath, StorageMounts};
use crate::store::{SchemaStore, StoreError};
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads manifests and documents through a set of storage mounts.
///
/// Parsed documents are cached per canonical path for the life of the store.
#[derive(Debug)]
pub struct LocalStore {
    mounts: StorageMounts,
    documents: RefCell<HashMap<CorpusPath, Arc<Document>>>,
}

impl LocalStore {
    pub fn new(mounts: StorageMounts) -> Self {
        Self {
            mounts,
            documents: RefCell::new(HashMap::new()),
        }
    }

    /// Store with a single `local` namespace rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut mounts = StorageMounts::new();
        mounts.mount(crate::path::DEFAULT_NAMESPACE, root);
        Self::new(mounts)
    }

    /// Local file for `path`, or `None` if nothing exists there.
    ///
    /// Falls back to a case-insensitive walk, since corpus references are
    /// often written with different casing than the folders on disk.
    fn locate(&self, path: &CorpusPath) -> Result<Option<PathBuf>, StoreError> {
        let root = self
            .mounts
            .root_for(path.namespace())
            .ok_or_else(|| StoreError::UnmountedNamespace(path.namespace().to_string()))?;
        let mut exact = root.to_path_buf();
        exact.extend(path.segments());
        if exact.is_file() {
            return Ok(Some(exact));
        }
        Ok(find_case_insensitive(root, path.segments()))
    }

    fn read_json<T: for<'de> Deserialize<'de>>(file: &Path) -> Result<T, StoreError> {
        let content = std::fs::read_to_string(file).map_err(|source| StoreError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: file.to_path_buf(),
            source,
        })
    }

    fn load_document(&self, path: &CorpusPath) -> Result<Option<Arc<Document>>, StoreError> {
        if let Some(cached) = self.documents.borrow().get(path) {
            return Ok(Some(Arc::clone(cached)));
        }
        let Some(file) = self.locate(path)? else {
            return Ok(None);
        };
        let canonical = self.on_disk_path(path, &file);
        let cached = self.documents.borrow().get(&canonical).cloned();
        if let Some(cached) = cached {
            self.documents
                .borrow_mut()
                .insert(path.clone(), Arc::clone(&cached));
            return Ok(Some(cached));
        }

        tracing::debug!(path = %canonical, file = %file.display(), "loading document");
        let raw: RawDocument = Self::read_json(&file)?;
        let definitions = DocumentBuilder::new(&canonical, &raw).build()?;
        let document = Arc::new(Document::new(canonical.clone(), definitions));
        let mut documents = self.documents.borrow_mut();
        documents.insert(canonical, Arc::clone(&document));
        documents.insert(path.clone(), Arc::clone(&document));
        Ok(Some(document))
    }

    /// `path` spelled with the casing of the file actually found, so that
    /// references differing only in case share one document.
    fn on_disk_path(&self, path: &CorpusPath, file: &Path) -> CorpusPath {
        let relative = self
            .mounts
            .root_for(path.namespace())
            .and_then(|root| file.strip_prefix(root).ok());
        match relative {
            Some(relative) => CorpusPath::from_segments(
                path.namespace(),
                relative
                    .components()
                    .filter_map(|c| c.as_os_str().to_str().map(str::to_string)),
            ),
            None => path.clone(),
        }
    }
}

impl SchemaStore for LocalStore {
    fn default_namespace(&self) -> &str {
        self.mounts.default_namespace()
    }

    fn fetch_manifest(&self, path: &CorpusPath) -> Result<Option<Arc<Manifest>>, StoreError> {
        let Some(file) = self.locate(path)? else {
            return Ok(None);
        };
        let canonical = self.on_disk_path(path, &file);
        tracing::debug!(path = %canonical, file = %file.display(), "loading manifest");
        let raw: RawManifest = Self::read_json(&file)?;
        let def = ManifestDef {
            name: raw
                .manifest_name
                .unwrap_or_else(|| manifest_stem(canonical.file_name().unwrap_or_default())),
            entities: raw
                .entities
                .into_iter()
                .map(|e| crate::model::EntityReference {
                    name: e.entity_name,
                    path: e.entity_path,
                })
                .collect(),
            sub_manifests: raw
                .sub_manifests
                .into_iter()
                .map(|s| crate::model::SubManifestReference {
                    name: s.manifest_name.unwrap_or_default(),
                    definition: s.definition,
                })
                .collect(),
        };
        Ok(Some(Arc::new(Manifest::new(canonical, def))))
    }

    fn fetch_document(&self, path: &CorpusPath) -> Result<Option<Arc<Document>>, StoreError> {
        for candidate in path.document_candidates() {
            if let Some(document) = self.load_document(&candidate)? {
                return Ok(Some(document));
            }
        }
        Ok(None)
    }
}

fn manifest_stem(file_name: &str) -> String {
    file_name
        .strip_suffix(".manifest.cdm.json")
        .unwrap_or(file_name)
        .to_string()
}

fn find_case_insensitive(root: &Path, segments: &[String]) -> Option<PathBuf> {
    let mut current = root.to_path_buf();
    for segment in segments {
        let wanted = segment.to_lowercase();
        let entry = std::fs::read_dir(&current).ok()?.flatten().find(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.to_lowercase() == wanted)
        })?;
        current = entry.path();
    }
    current.is_file().then_some(current)
}

// ============================================================================
// Raw JSON shapes
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    manifest_name: Option<String>,
    #[serde(default)]
    entities: Vec<RawEntityDeclaration>,
    #[serde(default)]
    sub_manifests: Vec<RawSubManifest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntityDeclaration {
    entity_name: String,
    entity_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubManifest {
    manifest_name: Option<String>,
    definition: String,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    definitions: Vec<RawDefinition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDefinition {
    Entity(RawEntity),
    AttributeGroup(RawAttributeGroup),
    Other(#[allow(dead_code)] Value),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntity {
    entity_name: String,
    display_name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    has_attributes: Vec<RawAttribute>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttributeGroup {
    attribute_group_name: String,
    #[serde(default)]
    members: Vec<RawAttribute>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    Group {
        #[serde(rename = "attributeGroupReference")]
        reference: RawGroupReference,
    },
    Entity {
        entity: Value,
    },
    Typed(RawTypedAttribute),
    Other(Value),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGroupReference {
    Named(String),
    Inline(RawAttributeGroup),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypedAttribute {
    name: String,
    data_type: Option<RawDataType>,
    data_format: Option<Value>,
    description: Option<Value>,
    display_name: Option<Value>,
    #[serde(default)]
    applied_traits: Vec<RawTrait>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDataType {
    Named(String),
    Reference {
        #[serde(rename = "dataTypeReference")]
        reference: String,
    },
    /// Inline data type definition or reference object.
    Other(Value),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrait {
    Named(String),
    Reference {
        #[serde(rename = "traitReference")]
        reference: String,
        #[serde(default)]
        arguments: Vec<RawArgument>,
    },
    /// Inline trait definition (`traitReference` as an object) or any other
    /// shape. Never rejects the attribute carrying it.
    Other(Value),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawArgument {
    Named { name: String, value: Value },
    Bare(Value),
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts one raw document, resolving attribute group references by name
/// against the groups defined in that same document.
struct DocumentBuilder<'a> {
    path: &'a CorpusPath,
    raw_groups: HashMap<&'a str, &'a RawAttributeGroup>,
    groups: HashMap<String, Arc<AttributeGroup>>,
    resolving: HashSet<String>,
    definitions: &'a [RawDefinition],
}

impl<'a> DocumentBuilder<'a> {
    fn new(path: &'a CorpusPath, raw: &'a RawDocument) -> Self {
        let raw_groups = raw
            .definitions
            .iter()
            .filter_map(|def| match def {
                RawDefinition::AttributeGroup(group) => {
                    Some((group.attribute_group_name.as_str(), group))
                }
                _ => None,
            })
            .collect();
        Self {
            path,
            raw_groups,
            groups: HashMap::new(),
            resolving: HashSet::new(),
            definitions: &raw.definitions,
        }
    }

    fn build(mut self) -> Result<Vec<DefinitionDef>, StoreError> {
        let mut out = Vec::with_capacity(self.definitions.len());
        for def in self.definitions {
            match def {
                RawDefinition::Entity(entity) => {
                    let attributes = self.attributes(&entity.has_attributes)?;
                    out.push(DefinitionDef::Entity(EntityDef {
                        name: entity.entity_name.clone(),
                        display_name: entity.display_name.clone(),
                        description: entity.description.clone(),
                        attributes,
                    }));
                }
                RawDefinition::AttributeGroup(group) => {
                    let group = self.named_group(&group.attribute_group_name)?;
                    out.push(DefinitionDef::AttributeGroup(group));
                }
                RawDefinition::Other(_) => {}
            }
        }
        Ok(out)
    }

    fn attributes(&mut self, raw: &'a [RawAttribute]) -> Result<Vec<Attribute>, StoreError> {
        let mut out = Vec::with_capacity(raw.len());
        for attribute in raw {
            match attribute {
                RawAttribute::Typed(typed) => out.push(Attribute::Typed(typed_attribute(typed))),
                RawAttribute::Group { reference } => {
                    let group = match reference {
                        RawGroupReference::Named(name) => self.named_group(name)?,
                        RawGroupReference::Inline(group) => AttributeGroup::new(
                            group.attribute_group_name.clone(),
                            self.attributes(&group.members)?,
                        ),
                    };
                    out.push(Attribute::Group(AttributeGroupRef { group }));
                }
                RawAttribute::Entity { entity } => {
                    tracing::debug!(document = %self.path, entity = %entity, "skipping entity attribute");
                }
                RawAttribute::Other(value) => match value.get("name") {
                    Some(name) => {
                        return Err(StoreError::MalformedAttribute {
                            name: text_of(name).unwrap_or_else(|| name.to_string()),
                            document: self.path.to_string(),
                        });
                    }
                    None => {
                        tracing::debug!(document = %self.path, attribute = %value, "skipping unsupported attribute");
                    }
                },
            }
        }
        Ok(out)
    }

    fn named_group(&mut self, name: &str) -> Result<Arc<AttributeGroup>, StoreError> {
        if let Some(group) = self.groups.get(name) {
            return Ok(Arc::clone(group));
        }
        let raw = *self
            .raw_groups
            .get(name)
            .ok_or_else(|| StoreError::UnknownAttributeGroup {
                name: name.to_string(),
                document: self.path.to_string(),
            })?;
        if !self.resolving.insert(name.to_string()) {
            return Err(StoreError::CyclicAttributeGroup {
                name: name.to_string(),
                document: self.path.to_string(),
            });
        }
        let members = self.attributes(&raw.members)?;
        self.resolving.remove(name);
        let group = AttributeGroup::new(name, members);
        self.groups.insert(name.to_string(), Arc::clone(&group));
        Ok(group)
    }
}

fn typed_attribute(raw: &RawTypedAttribute) -> TypedAttribute {
    TypedAttribute {
        name: raw.name.clone(),
        data_type: raw.data_type.as_ref().and_then(|dt| match dt {
            RawDataType::Named(name) => Some(name.clone()),
            RawDataType::Reference { reference } => Some(reference.clone()),
            RawDataType::Other(value) => nested_name(value, "dataTypeReference", "dataTypeName"),
        }),
        data_format: raw
            .data_format
            .as_ref()
            .map(|format| DataFormat::parse(text_of(format).as_deref().unwrap_or_default())),
        description: raw.description.as_ref().and_then(text_of),
        display_name: raw.display_name.as_ref().and_then(text_of),
        traits: raw.applied_traits.iter().map(trait_reference).collect(),
    }
}

fn trait_reference(raw: &RawTrait) -> TraitReference {
    match raw {
        RawTrait::Named(name) => TraitReference::new(name.clone()),
        RawTrait::Reference {
            reference,
            arguments,
        } => TraitReference {
            name: reference.clone(),
            arguments: arguments.iter().map(trait_argument).collect(),
        },
        RawTrait::Other(value) => {
            let arguments = value
                .get("arguments")
                .and_then(|args| serde_json::from_value::<Vec<RawArgument>>(args.clone()).ok())
                .unwrap_or_default();
            TraitReference {
                name: nested_name(value, "traitReference", "traitName").unwrap_or_default(),
                arguments: arguments.iter().map(trait_argument).collect(),
            }
        }
    }
}

fn trait_argument(argument: &RawArgument) -> TraitArgument {
    match argument {
        RawArgument::Named { name, value } => TraitArgument {
            name: Some(name.clone()),
            value: argument_value(value),
        },
        RawArgument::Bare(value) => TraitArgument {
            name: None,
            value: argument_value(value),
        },
    }
}

/// Name of an inline definition: `value[reference][name_key]`, a string
/// `value[reference]`, or `value[name_key]`.
fn nested_name(value: &Value, reference: &str, name_key: &str) -> Option<String> {
    match value.get(reference) {
        Some(Value::String(name)) => Some(name.clone()),
        Some(inner) => inner.get(name_key).and_then(Value::as_str).map(str::to_string),
        None => value.get(name_key).and_then(Value::as_str).map(str::to_string),
    }
}

/// Text of a scalar JSON value. Objects, arrays and null have none.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Interpret an argument value: plain text, or a constant entity given either
/// as `{ "entityReference": { "constantValues": [...] } }` or directly as
/// `{ "constantValues": [...] }`.
fn argument_value(value: &Value) -> ArgumentValue {
    match value {
        Value::String(text) => ArgumentValue::Text(text.clone()),
        Value::Object(map) => {
            let constant = map
                .get("entityReference")
                .and_then(|reference| reference.get("constantValues"))
                .or_else(|| map.get("constantValues"));
            match constant.and_then(Value::as_array) {
                Some(rows) => ArgumentValue::ConstantEntity {
                    rows: rows
                        .iter()
                        .filter_map(Value::as_array)
                        .map(|row| row.iter().map(cell_text).collect())
                        .collect(),
                },
                None => ArgumentValue::Other,
            }
        }
        _ => ArgumentValue::Other,
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
