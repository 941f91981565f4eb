//! Output backends for code generation.
//!
//! Each backend takes an IR [`Declaration`](crate::ir::Declaration) and
//! produces the contents of one file. All backends implement the
//! [`Backend`](crate::traits::Backend) trait for uniform access via the
//! registry.

// C#
#[cfg(feature = "backend-csharp")]
pub mod csharp;

#[cfg(feature = "backend-csharp")]
pub use csharp::{CSharpBackend, csharp_type, generate_csharp};

// JSON (the IR itself)
#[cfg(feature = "backend-json")]
pub mod json;

#[cfg(feature = "backend-json")]
pub use json::{JsonBackend, generate_json};
