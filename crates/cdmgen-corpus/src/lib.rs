//! Read-only CDM schema object model and the stores that produce it.
//!
//! The generator never parses schema files itself; it asks a [`SchemaStore`]
//! for manifests, documents and entities by [`CorpusPath`]. Two stores ship
//! here:
//!
//! - [`MemoryStore`] - populated in code, counts fetches
//! - [`LocalStore`] - reads `*.cdm.json` files through [`StorageMounts`]

pub mod local;
pub mod model;
pub mod path;
pub mod store;

pub use local::LocalStore;
pub use model::{
    ArgumentValue, Attribute, AttributeGroup, AttributeGroupRef, DataFormat, Definition,
    DefinitionDef, Document, Entity, EntityDef, EntityReference, Folder, Manifest, ManifestDef,
    SubManifestReference, TraitArgument, TraitReference, TypedAttribute,
};
pub use path::{CorpusPath, DEFAULT_NAMESPACE, DOCUMENT_SUFFIX, StorageMounts};
pub use store::{MemoryStore, SchemaStore, StoreError};
