//! Trait for code generation backends.

use crate::ir::Declaration;

/// A code generation backend.
///
/// Backends transform one IR [`Declaration`] into the source text of a single
/// output file.
///
/// # Implementing Custom Backends
///
/// ```ignore
/// use cdmgen_typegen::{Backend, ir::Declaration, register_backend};
///
/// struct KotlinBackend;
///
/// impl Backend for KotlinBackend {
///     fn name(&self) -> &'static str { "kotlin" }
///     fn language(&self) -> &'static str { "kotlin" }
///     fn extension(&self) -> &'static str { "kt" }
///     fn generate(&self, declaration: &Declaration) -> String { /* ... */ }
/// }
///
/// // Register before first use
/// register_backend(&KotlinBackend);
/// ```
pub trait Backend: Send + Sync {
    /// Unique backend identifier (e.g., "csharp", "json").
    fn name(&self) -> &'static str;

    /// Target language (e.g., "csharp").
    fn language(&self) -> &'static str;

    /// File extension for generated code, without the dot.
    fn extension(&self) -> &'static str;

    /// Generate the file contents for one declaration.
    fn generate(&self, declaration: &Declaration) -> String;
}
