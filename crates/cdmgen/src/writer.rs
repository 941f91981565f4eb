//! Writes generated declarations into a project directory.
//!
//! Layout under the output directory:
//!
//! ```text
//! <out>/<project>/<project>.csproj          (C# backend only)
//! <out>/<project>/<namespace dirs>/<Name>.<ext>
//! ```

use cdmgen_typegen::sanitize::escape_xml;
use cdmgen_typegen::{Backend, Declaration};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `<name>[.<major>.<minor>.<patch>].manifest.cdm.json`
static MANIFEST_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>.+?)(?:\.(?P<version>\d+\.\d+\.\d+))?\.manifest\.cdm\.json$").unwrap()
});

/// Version used when the manifest file name carries none.
pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("'{0}' is not a manifest file name (expected <name>[.<x.y.z>].manifest.cdm.json)")]
    InvalidManifestName(String),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Project name and version taken from the root manifest's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
}

impl ProjectInfo {
    /// Parse the final path component of `manifest`.
    pub fn from_manifest_file(manifest: &str) -> Result<Self, WriteError> {
        let file_name = manifest
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(manifest);
        let captures = MANIFEST_FILE_RE
            .captures(file_name)
            .ok_or_else(|| WriteError::InvalidManifestName(manifest.to_string()))?;
        Ok(Self {
            name: captures["name"].to_string(),
            version: captures
                .name("version")
                .map_or(DEFAULT_VERSION, |m| m.as_str())
                .to_string(),
        })
    }
}

/// Places each declaration's rendered source in the project tree.
pub struct ProjectWriter {
    project_dir: PathBuf,
    project: ProjectInfo,
    backend: &'static dyn Backend,
    target_framework: String,
    project_file_written: bool,
    written: Vec<PathBuf>,
}

impl ProjectWriter {
    pub fn new(
        out_dir: &Path,
        project: ProjectInfo,
        backend: &'static dyn Backend,
        target_framework: impl Into<String>,
    ) -> Self {
        Self {
            project_dir: out_dir.join(&project.name),
            project,
            backend,
            target_framework: target_framework.into(),
            project_file_written: false,
            written: Vec::new(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Files written so far, project file included.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Render `declaration` and write it under its namespace directory.
    pub fn write(&mut self, declaration: &Declaration) -> Result<PathBuf, WriteError> {
        self.ensure_project_file()?;

        let mut dir = self.project_dir.clone();
        dir.extend(declaration.namespace.split('.').filter(|s| !s.is_empty()));
        create_dir(&dir)?;

        let file_name = format!(
            "{}.{}",
            declaration.name.trim_start_matches('@'),
            self.backend.extension()
        );
        let path = dir.join(file_name);
        write_file(&path, &self.backend.generate(declaration))?;
        tracing::info!(
            declaration = %declaration.qualified_name(),
            path = %path.display(),
            "wrote declaration"
        );
        self.written.push(path.clone());
        Ok(path)
    }

    fn ensure_project_file(&mut self) -> Result<(), WriteError> {
        if self.project_file_written || self.backend.language() != "csharp" {
            return Ok(());
        }
        create_dir(&self.project_dir)?;
        let path = self.project_dir.join(format!("{}.csproj", self.project.name));
        write_file(&path, &csproj(&self.project, &self.target_framework))?;
        tracing::info!(path = %path.display(), "wrote project file");
        self.project_file_written = true;
        self.written.push(path);
        Ok(())
    }
}

/// SDK-style class library project file.
pub fn csproj(project: &ProjectInfo, target_framework: &str) -> String {
    let name = escape_xml(&project.name);
    format!(
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <OutputType>Library</OutputType>
    <TargetFramework>{framework}</TargetFramework>
    <RootNamespace>{name}</RootNamespace>
    <AssemblyName>{name}</AssemblyName>
    <Version>{version}</Version>
  </PropertyGroup>
</Project>
"#,
        framework = escape_xml(target_framework),
        version = escape_xml(&project.version),
    )
}

fn create_dir(dir: &Path) -> Result<(), WriteError> {
    std::fs::create_dir_all(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), WriteError> {
    std::fs::write(path, content).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
