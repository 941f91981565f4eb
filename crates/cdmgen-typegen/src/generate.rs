//! Entry points for a generation run.

use crate::error::GenerateError;
use crate::ir::Declaration;
use crate::options::GenerateOptions;
use crate::resolver::{GenerateSummary, Resolver};
use cdmgen_corpus::{CorpusPath, LocalStore, SchemaStore};
use std::path::Path;

/// Walk the manifest tree rooted at `root`, calling `sink` once per
/// declaration in resolution order.
///
/// Each call gets a fresh [`Resolver`], so nothing is cached across runs.
pub fn generate<S, F>(
    store: &S,
    root: &CorpusPath,
    options: &GenerateOptions,
    mut sink: F,
) -> Result<GenerateSummary, GenerateError>
where
    S: SchemaStore + ?Sized,
    F: FnMut(&Declaration),
{
    let mut resolver = Resolver::new(store, options, &mut sink);
    resolver.walk(root)?;
    let summary = resolver.summary();
    tracing::info!(
        manifests = summary.manifests,
        declarations = summary.declarations,
        "generation finished"
    );
    Ok(summary)
}

/// Runs generation over a schema directory on disk.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GenerateOptions,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Mount `schema_root` as the default `local` namespace and generate
    /// from `manifest_file` (relative to the root).
    pub fn generate_from_dir<F>(
        &self,
        schema_root: &Path,
        manifest_file: &str,
        sink: F,
    ) -> Result<GenerateSummary, GenerateError>
    where
        F: FnMut(&Declaration),
    {
        if manifest_file.trim().is_empty() {
            return Err(GenerateError::EmptyManifestArgument);
        }
        let manifest_path = schema_root.join(manifest_file);
        if !manifest_path.is_file() {
            return Err(GenerateError::RootNotFound(manifest_path));
        }

        let store = LocalStore::with_root(schema_root);
        let root = store.parse_path(manifest_file);
        tracing::info!(root = %root, schema_root = %schema_root.display(), "loading manifest");
        generate(&store, &root, &self.options, sink)
    }
}
