//! JSON dump of the declaration IR.

use crate::ir::Declaration;
use crate::traits::Backend;

/// Static instance of the JSON backend for registry.
pub static JSON_BACKEND: JsonBackend = JsonBackend;

/// Emits each declaration as pretty-printed JSON.
pub struct JsonBackend;

impl Backend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn language(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn generate(&self, declaration: &Declaration) -> String {
        generate_json(declaration)
    }
}

pub fn generate_json(declaration: &Declaration) -> String {
    // Declarations hold only strings, vectors and unit-like enums.
    let mut out = serde_json::to_string_pretty(declaration).unwrap_or_default();
    out.push('\n');
    out
}
