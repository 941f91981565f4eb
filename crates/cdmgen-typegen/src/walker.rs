//! Manifest tree traversal.

use crate::error::GenerateError;
use crate::resolver::Resolver;
use cdmgen_corpus::{CorpusPath, Manifest, SchemaStore};
use std::sync::Arc;

impl<S: SchemaStore + ?Sized> Resolver<'_, S> {
    /// Walk the manifest at `path`: sub-manifests first (depth-first, in
    /// declared order), then this manifest's own entities.
    ///
    /// A manifest already visited this run is skipped, whether it is reached
    /// by the requested path or by the path the store found it under. The
    /// path is marked before recursing, so cyclic sub-manifest references
    /// terminate.
    pub fn walk(&mut self, path: &CorpusPath) -> Result<(), GenerateError> {
        if !self.manifests.insert(path.clone()) {
            tracing::debug!(manifest = %path, "manifest already walked");
            return Ok(());
        }

        let manifest = self.fetch_manifest(path)?;
        if manifest.path != *path && !self.manifests.insert(manifest.path.clone()) {
            tracing::debug!(requested = %path, manifest = %manifest.path, "manifest already walked");
            return Ok(());
        }
        self.walked += 1;
        if manifest.entities.is_empty() && manifest.sub_manifests.is_empty() {
            return Err(GenerateError::EmptyManifest(path.to_string()));
        }
        tracing::debug!(
            manifest = %manifest.path,
            entities = manifest.entities.len(),
            sub_manifests = manifest.sub_manifests.len(),
            "walking manifest"
        );

        for sub_manifest in &manifest.sub_manifests {
            let sub_path = manifest.path.resolve(&sub_manifest.definition);
            self.walk(&sub_path)?;
        }

        for reference in &manifest.entities {
            match self.store.fetch_entity(&reference.path, &manifest)? {
                Some(entity) => {
                    self.resolve_entity(&entity)?;
                }
                None => {
                    tracing::warn!(
                        manifest = %manifest.path,
                        entity = %reference.path,
                        "entity not found, skipping"
                    );
                }
            }
        }
        Ok(())
    }

    /// Fetch a manifest, retrying under each fallback folder before failing.
    fn fetch_manifest(&self, path: &CorpusPath) -> Result<Arc<Manifest>, GenerateError> {
        if let Some(manifest) = self.store.fetch_manifest(path)? {
            return Ok(manifest);
        }
        for fallback in &self.options.manifest_fallbacks {
            let candidate = path.with_prefix(fallback);
            if let Some(manifest) = self.store.fetch_manifest(&candidate)? {
                tracing::debug!(requested = %path, found = %candidate, "manifest found under fallback");
                return Ok(manifest);
            }
        }
        Err(GenerateError::ManifestNotFound(path.to_string()))
    }
}
