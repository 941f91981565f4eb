//! Read-only schema object model.
//!
//! Stores build these values once and hand them out behind [`Arc`]; nothing
//! downstream mutates them. Ownership runs document → folder → parent folder,
//! never the other way, so the graph stays acyclic.

use crate::path::CorpusPath;
use std::sync::Arc;

// ============================================================================
// Manifests
// ============================================================================

/// A named index of entity and sub-manifest references.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub name: String,
    /// Canonical path the manifest was fetched from.
    pub path: CorpusPath,
    pub entities: Vec<EntityReference>,
    pub sub_manifests: Vec<SubManifestReference>,
}

/// Reference from a manifest to an entity, relative to the manifest's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReference {
    pub name: String,
    pub path: String,
}

/// Reference from a manifest to a child manifest, relative to the manifest's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubManifestReference {
    pub name: String,
    pub definition: String,
}

/// Unlocated manifest contents, placed at a path by a store.
#[derive(Debug, Clone, Default)]
pub struct ManifestDef {
    pub name: String,
    pub entities: Vec<EntityReference>,
    pub sub_manifests: Vec<SubManifestReference>,
}

impl ManifestDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn entity(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.entities.push(EntityReference {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn sub_manifest(mut self, name: impl Into<String>, definition: impl Into<String>) -> Self {
        self.sub_manifests.push(SubManifestReference {
            name: name.into(),
            definition: definition.into(),
        });
        self
    }
}

impl Manifest {
    pub fn new(path: CorpusPath, def: ManifestDef) -> Self {
        Self {
            name: def.name,
            path,
            entities: def.entities,
            sub_manifests: def.sub_manifests,
        }
    }
}

// ============================================================================
// Folders and documents
// ============================================================================

/// A folder in the storage hierarchy. The root folder has an empty name.
#[derive(Debug)]
pub struct Folder {
    pub name: String,
    pub parent: Option<Arc<Folder>>,
}

impl Folder {
    pub fn root() -> Arc<Self> {
        Arc::new(Self {
            name: String::new(),
            parent: None,
        })
    }

    pub fn child(parent: &Arc<Self>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            parent: Some(Arc::clone(parent)),
        })
    }

    /// Build the chain root → `segments[0]` → … and return the innermost folder.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Arc<Self> {
        segments
            .iter()
            .fold(Self::root(), |parent, name| Self::child(&parent, name.as_ref()))
    }

    /// Folder names from the root down to this folder, root included.
    pub fn names_from_root(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        let mut current = self.parent.as_deref();
        while let Some(folder) = current {
            names.push(folder.name.as_str());
            current = folder.parent.as_deref();
        }
        names.reverse();
        names
    }
}

/// A schema document and the definitions it holds.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub path: CorpusPath,
    pub folder: Arc<Folder>,
    pub definitions: Vec<Definition>,
}

/// A top-level definition inside a document.
#[derive(Debug, Clone)]
pub enum Definition {
    Entity(Arc<Entity>),
    AttributeGroup(Arc<AttributeGroup>),
}

/// Unlocated definition, placed into a document by [`Document::new`].
#[derive(Debug, Clone)]
pub enum DefinitionDef {
    Entity(EntityDef),
    AttributeGroup(Arc<AttributeGroup>),
}

impl Document {
    /// Place `definitions` at `path`, deriving the folder chain and each
    /// entity's canonical path (`<document>/<entity name>`).
    pub fn new(path: CorpusPath, definitions: Vec<DefinitionDef>) -> Self {
        let folder = Folder::from_segments(path.folder_segments());
        let definitions = definitions
            .into_iter()
            .map(|def| match def {
                DefinitionDef::Entity(entity) => Definition::Entity(Arc::new(Entity {
                    path: path.join(&entity.name),
                    folder: Arc::clone(&folder),
                    name: entity.name,
                    display_name: entity.display_name,
                    description: entity.description,
                    attributes: entity.attributes,
                })),
                DefinitionDef::AttributeGroup(group) => Definition::AttributeGroup(group),
            })
            .collect();
        Self {
            name: path.file_name().unwrap_or_default().to_string(),
            path,
            folder,
            definitions,
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = &Arc<Entity>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Entity(entity) => Some(entity),
            Definition::AttributeGroup(_) => None,
        })
    }

    pub fn first_entity(&self) -> Option<&Arc<Entity>> {
        self.entities().next()
    }

    pub fn entity(&self, name: &str) -> Option<&Arc<Entity>> {
        self.entities().find(|entity| entity.name == name)
    }
}

// ============================================================================
// Entities and attributes
// ============================================================================

/// A located entity definition.
#[derive(Debug)]
pub struct Entity {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Canonical identity of the entity.
    pub path: CorpusPath,
    /// Folder holding the entity's document.
    pub folder: Arc<Folder>,
}

/// Entity contents before a store assigns a location.
#[derive(Debug, Clone, Default)]
pub struct EntityDef {
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl EntityDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.attributes.push(attribute.into());
        self
    }
}

/// An entity attribute: a typed field or a reference to an attribute group.
#[derive(Debug, Clone)]
pub enum Attribute {
    Typed(TypedAttribute),
    Group(AttributeGroupRef),
}

impl From<TypedAttribute> for Attribute {
    fn from(attribute: TypedAttribute) -> Self {
        Attribute::Typed(attribute)
    }
}

impl From<AttributeGroupRef> for Attribute {
    fn from(group: AttributeGroupRef) -> Self {
        Attribute::Group(group)
    }
}

/// A named, reusable bundle of attributes.
#[derive(Debug, Clone)]
pub struct AttributeGroup {
    pub name: String,
    pub members: Vec<Attribute>,
}

impl AttributeGroup {
    pub fn new(name: impl Into<String>, members: Vec<Attribute>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            members,
        })
    }
}

/// Pointer from an attribute list to a group definition.
#[derive(Debug, Clone)]
pub struct AttributeGroupRef {
    pub group: Arc<AttributeGroup>,
}

impl AttributeGroupRef {
    pub fn new(group: &Arc<AttributeGroup>) -> Self {
        Self {
            group: Arc::clone(group),
        }
    }
}

/// A field with a data-type tag and/or data format.
#[derive(Debug, Clone, Default)]
pub struct TypedAttribute {
    pub name: String,
    /// Semantic data-type tag such as `currency` or `postalCode`.
    pub data_type: Option<String>,
    pub data_format: Option<DataFormat>,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub traits: Vec<TraitReference>,
}

impl TypedAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn data_type(mut self, tag: impl Into<String>) -> Self {
        self.data_type = Some(tag.into());
        self
    }

    pub fn data_format(mut self, format: DataFormat) -> Self {
        self.data_format = Some(format);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn applied_trait(mut self, applied: TraitReference) -> Self {
        self.traits.push(applied);
        self
    }

    /// Applied traits with exactly this name, in declared order.
    pub fn traits_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a TraitReference> + 'a {
        self.traits.iter().filter(move |t| t.name == name)
    }
}

/// Closed set of physical data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Unknown,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Decimal,
    Guid,
    String,
    Char,
    Byte,
    Binary,
    Time,
    Date,
    DateTime,
    DateTimeOffset,
    Boolean,
    Json,
}

impl DataFormat {
    /// Parse a format name case-insensitively; unrecognized names are `Unknown`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "float" => Self::Float,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "guid" => Self::Guid,
            "string" => Self::String,
            "char" => Self::Char,
            "byte" => Self::Byte,
            "binary" => Self::Binary,
            "time" => Self::Time,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "datetimeoffset" => Self::DateTimeOffset,
            "boolean" => Self::Boolean,
            "json" => Self::Json,
            _ => Self::Unknown,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// A named annotation applied to a schema element.
#[derive(Debug, Clone, Default)]
pub struct TraitReference {
    pub name: String,
    pub arguments: Vec<TraitArgument>,
}

impl TraitReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn argument(mut self, value: ArgumentValue) -> Self {
        self.arguments.push(TraitArgument { name: None, value });
        self
    }
}

#[derive(Debug, Clone)]
pub struct TraitArgument {
    pub name: Option<String>,
    pub value: ArgumentValue,
}

/// Value carried by a trait argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    Text(String),
    /// A constant entity: rows of string cells.
    ConstantEntity { rows: Vec<Vec<String>> },
    /// Any shape this model does not interpret.
    Other,
}

impl ArgumentValue {
    pub fn constant_entity<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::ConstantEntity {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}
