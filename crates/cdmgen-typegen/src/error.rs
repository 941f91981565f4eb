//! Errors that abort a generation run.

use cdmgen_corpus::StoreError;
use std::path::PathBuf;

/// A fatal generation error. Recoverable conditions (unknown tags,
/// malformed linked-entity traits, unresolvable documents) never surface
/// here; they degrade to placeholder types instead.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("manifest file name is empty")]
    EmptyManifestArgument,
    #[error("{} does not exist", .0.display())]
    RootNotFound(PathBuf),
    #[error("manifest {0} could not be found")]
    ManifestNotFound(String),
    #[error("manifest {0} does not contain entities or sub-manifests")]
    EmptyManifest(String),
    #[error("unknown data type for attribute '{attribute}' of entity {entity}")]
    UnknownDataType { entity: String, attribute: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
