//! Corpus paths and storage mounts.
//!
//! A corpus path names a manifest, document or object inside a mounted
//! namespace: `local:/app/customer/Customer.cdm.json/Customer`. Paths are kept
//! in canonical form (no `.`/`..` segments, no empty segments) so they can be
//! used directly as identity keys.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Namespace used when nothing else has been designated default.
pub const DEFAULT_NAMESPACE: &str = "local";

/// File suffix shared by every CDM document.
pub const DOCUMENT_SUFFIX: &str = ".cdm.json";

/// Canonical, absolute path inside a corpus namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorpusPath {
    namespace: String,
    segments: Vec<String>,
}

impl CorpusPath {
    /// Parse `ns:/a/b`, `/a/b` or `a/b`.
    ///
    /// Inputs without an explicit namespace land in `default_namespace`; a
    /// relative input is treated as rooted.
    pub fn parse(input: &str, default_namespace: &str) -> Self {
        let input = input.replace('\\', "/");
        let (namespace, rest) = match split_namespace(&input) {
            Some((ns, rest)) => (ns.to_string(), rest),
            None => (default_namespace.to_string(), input.as_str()),
        };
        let mut segments = Vec::new();
        push_segments(&mut segments, rest);
        Self {
            namespace,
            segments,
        }
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(namespace: &str, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for segment in segments {
            push_segments(&mut normalized, segment.as_ref());
        }
        Self {
            namespace: namespace.to_string(),
            segments: normalized,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Segments of the folder containing this path.
    pub fn folder_segments(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, folder)) => folder,
            None => &[],
        }
    }

    /// Path portion without the namespace, always starting with `/`.
    pub fn path_str(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Resolve `relative` against the folder containing `self`.
    ///
    /// Handles `./`, `../`, a leading `/` (rooted in this namespace) and an
    /// explicit `ns:` prefix. `..` above the root clamps at the root.
    pub fn resolve(&self, relative: &str) -> Self {
        let relative = relative.replace('\\', "/");
        if let Some((ns, rest)) = split_namespace(&relative) {
            let mut segments = Vec::new();
            push_segments(&mut segments, rest);
            return Self {
                namespace: ns.to_string(),
                segments,
            };
        }
        let mut segments = if relative.starts_with('/') {
            Vec::new()
        } else {
            self.folder_segments().to_vec()
        };
        push_segments(&mut segments, &relative);
        Self {
            namespace: self.namespace.clone(),
            segments,
        }
    }

    /// Append a child segment (or `/`-separated segments).
    pub fn join(&self, child: &str) -> Self {
        let mut segments = self.segments.clone();
        push_segments(&mut segments, child);
        Self {
            namespace: self.namespace.clone(),
            segments,
        }
    }

    /// The same path rooted under `prefix` in the same namespace.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        let mut segments = Vec::new();
        push_segments(&mut segments, prefix);
        segments.extend(self.segments.iter().cloned());
        Self {
            namespace: self.namespace.clone(),
            segments,
        }
    }

    /// The same path with `suffix` appended to its last segment.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let mut segments = self.segments.clone();
        match segments.last_mut() {
            Some(last) => last.push_str(suffix),
            None => segments.push(suffix.to_string()),
        }
        Self {
            namespace: self.namespace.clone(),
            segments,
        }
    }

    /// Split an object path into its document path and the object name inside it.
    ///
    /// The document is the last segment ending in `.cdm.json`. Without such a
    /// segment the final segment is taken as the object name. A path that ends
    /// at the document yields no object name.
    pub fn split_object(&self) -> (Self, Option<String>) {
        let document_end = self
            .segments
            .iter()
            .rposition(|s| s.ends_with(DOCUMENT_SUFFIX));
        let split_at = match document_end {
            Some(index) => index + 1,
            None if self.segments.len() >= 2 => self.segments.len() - 1,
            None => return (self.clone(), None),
        };
        let document = Self {
            namespace: self.namespace.clone(),
            segments: self.segments[..split_at].to_vec(),
        };
        let name = (split_at < self.segments.len()).then(|| self.segments[split_at..].join("/"));
        (document, name)
    }

    /// Candidate document paths: the path itself, then with `.cdm.json` appended.
    pub fn document_candidates(&self) -> Vec<Self> {
        let is_document = self
            .file_name()
            .is_some_and(|name| name.ends_with(DOCUMENT_SUFFIX));
        if is_document || self.segments.is_empty() {
            vec![self.clone()]
        } else {
            vec![self.clone(), self.with_suffix(DOCUMENT_SUFFIX)]
        }
    }
}

impl fmt::Display for CorpusPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path_str())
    }
}

/// Split `ns:/rest` into its namespace and remainder.
///
/// Only a colon before the first `/` counts, so Windows-style drive letters
/// and plain relative paths are left alone when they have no `:/` marker.
fn split_namespace(input: &str) -> Option<(&str, &str)> {
    let colon = input.find(':')?;
    let (ns, rest) = input.split_at(colon);
    let rest = &rest[1..];
    if ns.is_empty() || ns.contains('/') || !rest.starts_with('/') {
        return None;
    }
    Some((ns, rest))
}

fn push_segments(segments: &mut Vec<String>, path: &str) {
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
}

// ============================================================================
// StorageMounts
// ============================================================================

/// Binds logical namespaces to local root directories.
#[derive(Debug, Clone, Default)]
pub struct StorageMounts {
    roots: BTreeMap<String, PathBuf>,
    default: Option<String>,
}

impl StorageMounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `root` under `namespace`. The first mount becomes the default.
    pub fn mount(&mut self, namespace: impl Into<String>, root: impl Into<PathBuf>) -> &mut Self {
        let namespace = namespace.into();
        if self.default.is_none() {
            self.default = Some(namespace.clone());
        }
        self.roots.insert(namespace, root.into());
        self
    }

    pub fn set_default(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.default = Some(namespace.into());
        self
    }

    pub fn default_namespace(&self) -> &str {
        self.default.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn root_for(&self, namespace: &str) -> Option<&Path> {
        self.roots.get(namespace).map(PathBuf::as_path)
    }

    /// Parse a corpus path against the default namespace.
    pub fn parse(&self, input: &str) -> CorpusPath {
        CorpusPath::parse(input, self.default_namespace())
    }

    /// Local filesystem location of a corpus path, if its namespace is mounted.
    pub fn to_local(&self, path: &CorpusPath) -> Option<PathBuf> {
        let mut local = self.root_for(path.namespace())?.to_path_buf();
        for segment in path.segments() {
            local.push(segment);
        }
        Some(local)
    }
}
