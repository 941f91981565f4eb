//! Resolve CDM manifest trees into flat record declarations.
//!
//! `cdmgen-typegen` walks a manifest (and its sub-manifests), flattens each
//! entity's attributes into typed properties, follows linked-entity traits to
//! the entities they point at, and hands every finished declaration to a
//! caller-supplied sink. Output backends render declarations as source.
//!
//! # Architecture
//!
//! ```text
//! SchemaStore           Resolver                 IR            Output Backends
//! ─────────────     ────────────────────     ─────────────     ───────────────
//! manifests   ─┐    walker   (manifests)                    ┌─> C# classes
//! documents   ─┼──> resolver (entities)  ──> Declaration ───┤
//! entities    ─┘    linked   (traits)        (ir.rs)        └─> JSON
//! ```
//!
//! # Example
//!
//! ```
//! use cdmgen_corpus::{EntityDef, ManifestDef, MemoryStore, TypedAttribute};
//! use cdmgen_typegen::{GenerateOptions, generate};
//!
//! let mut store = MemoryStore::new();
//! let entity = store.add_entity(
//!     "/app/customer/Customer.cdm.json",
//!     EntityDef::new("Customer").attribute(TypedAttribute::new("name").data_type("string")),
//! );
//! let root = store.add_manifest(
//!     "/root.manifest.cdm.json",
//!     ManifestDef::new("root").entity("Customer", entity.to_string()),
//! );
//!
//! let mut names = Vec::new();
//! generate(&store, &root, &GenerateOptions::default(), |d| names.push(d.qualified_name())).unwrap();
//! assert_eq!(names, ["app.customer.Customer"]);
//! ```
//!
//! # Feature Flags
//!
//! - `backend-csharp` - C# classes with auto-properties
//! - `backend-json` - the declaration IR as JSON

pub mod error;
pub mod flatten;
pub mod generate;
pub mod ir;
pub mod linked;
pub mod options;
pub mod output;
pub mod registry;
pub mod resolver;
pub mod sanitize;
pub mod traits;
pub mod types;
mod walker;

pub use error::GenerateError;
pub use generate::{Generator, generate};
pub use ir::{Declaration, DeclarationRef, Property, PropertyType};
pub use options::GenerateOptions;
pub use resolver::{GenerateSummary, Resolver};
pub use types::ScalarType;

// Re-export traits
pub use traits::Backend;

// Re-export registry functions
pub use registry::{backend_names, backends, get_backend, register_backend};

#[cfg(feature = "backend-csharp")]
pub use output::generate_csharp;

#[cfg(feature = "backend-json")]
pub use output::generate_json;
