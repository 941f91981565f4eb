//! Configuration system for cdmgen.
//!
//! Loads config from:
//! 1. Global: ~/.config/cdmgen/config.toml
//! 2. Per-schema-root: <schema_root>/.cdmgen/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [resolve]
//! search_prefixes = ["", "core/applicationCommon/"]
//! manifest_fallbacks = ["core/applicationCommon"]
//! unknown_tag_fallback = "object"
//!
//! [output]
//! backend = "csharp"
//! directory = "generated"
//! target_framework = "net8.0"
//! ```

use cdmgen_typegen::{GenerateOptions, ScalarType};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Backend used when neither config nor flags name one.
pub const DEFAULT_BACKEND: &str = "csharp";

/// Target framework written into generated project files.
pub const DEFAULT_TARGET_FRAMEWORK: &str = "net8.0";

/// Resolution configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ResolveConfig {
    /// Prefixes tried, in order, when looking up a linked entity's document.
    pub search_prefixes: Option<Vec<String>>,
    /// Folders searched for a manifest that is missing at its given path.
    pub manifest_fallbacks: Option<Vec<String>>,
    /// Type for unrecognized data-type tags.
    pub unknown_tag_fallback: Option<ScalarType>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Backend name (see `cdmgen_typegen::backend_names`).
    pub backend: Option<String>,
    /// Directory generated projects are written under.
    pub directory: Option<PathBuf>,
    /// Target framework moniker for the generated `.csproj`.
    pub target_framework: Option<String>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CdmgenConfig {
    pub resolve: ResolveConfig,
    pub output: OutputConfig,
}

impl CdmgenConfig {
    /// Load configuration for a schema root.
    ///
    /// Loads global config from ~/.config/cdmgen/config.toml,
    /// then merges with per-root config from .cdmgen/config.toml.
    pub fn load(schema_root: &Path) -> Self {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path) {
                config = config.merge(global);
            }
        }

        // Load per-root config (overrides global)
        let project_path = schema_root.join(".cdmgen").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("cdmgen").join("config.toml"))
    }

    /// Load config from a file path. A missing file is silently skipped; an
    /// unreadable or malformed one is skipped with a warning.
    pub fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                None
            }
        }
    }

    /// Merge another config into this one. Values set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            resolve: ResolveConfig {
                search_prefixes: other.resolve.search_prefixes.or(self.resolve.search_prefixes),
                manifest_fallbacks: other
                    .resolve
                    .manifest_fallbacks
                    .or(self.resolve.manifest_fallbacks),
                unknown_tag_fallback: other
                    .resolve
                    .unknown_tag_fallback
                    .or(self.resolve.unknown_tag_fallback),
            },
            output: OutputConfig {
                backend: other.output.backend.or(self.output.backend),
                directory: other.output.directory.or(self.output.directory),
                target_framework: other.output.target_framework.or(self.output.target_framework),
            },
        }
    }

    /// Resolver options, with defaults for anything not configured.
    pub fn generate_options(&self) -> GenerateOptions {
        let defaults = GenerateOptions::default();
        GenerateOptions {
            search_prefixes: self
                .resolve
                .search_prefixes
                .clone()
                .unwrap_or(defaults.search_prefixes),
            manifest_fallbacks: self
                .resolve
                .manifest_fallbacks
                .clone()
                .unwrap_or(defaults.manifest_fallbacks),
            unknown_tag_fallback: self
                .resolve
                .unknown_tag_fallback
                .unwrap_or(defaults.unknown_tag_fallback),
        }
    }

    pub fn backend(&self) -> &str {
        self.output.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    pub fn target_framework(&self) -> &str {
        self.output
            .target_framework
            .as_deref()
            .unwrap_or(DEFAULT_TARGET_FRAMEWORK)
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.output.directory.as_deref()
    }
}
