//! Registry for code generation backends.

use crate::traits::Backend;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Global registry of backends.
static BACKENDS: RwLock<Vec<&'static dyn Backend>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom backend.
///
/// Built-in backends are registered automatically on first use. A custom
/// backend with the same name as an earlier one is never returned by
/// [`get_backend`].
pub fn register_backend(backend: &'static dyn Backend) {
    init_builtin();
    BACKENDS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(backend);
}

/// Initialize built-in backends (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        #[allow(unused_mut, unused_variables)]
        let mut backends = BACKENDS.write().unwrap_or_else(PoisonError::into_inner);

        #[cfg(feature = "backend-csharp")]
        {
            backends.push(&crate::output::csharp::CSHARP_BACKEND);
        }

        #[cfg(feature = "backend-json")]
        {
            backends.push(&crate::output::json::JSON_BACKEND);
        }
    });
}

/// Get a backend by name.
pub fn get_backend(name: &str) -> Option<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|b| b.name() == name)
        .copied()
}

/// List all registered backends.
pub fn backends() -> Vec<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// List all registered backend names.
pub fn backend_names() -> Vec<&'static str> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .map(|b| b.name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Declaration;

    struct UpperBackend;

    impl Backend for UpperBackend {
        fn name(&self) -> &'static str {
            "upper"
        }
        fn language(&self) -> &'static str {
            "text"
        }
        fn extension(&self) -> &'static str {
            "txt"
        }
        fn generate(&self, declaration: &Declaration) -> String {
            declaration.name.to_uppercase()
        }
    }

    static UPPER: UpperBackend = UpperBackend;

    #[test]
    fn builtin_backends_are_listed() {
        let names = backend_names();
        #[cfg(feature = "backend-csharp")]
        assert!(names.contains(&"csharp"));
        #[cfg(feature = "backend-json")]
        assert!(names.contains(&"json"));
        assert!(get_backend("cobol").is_none());
    }

    #[test]
    fn custom_backend_is_found_after_registration() {
        register_backend(&UPPER);
        let backend = get_backend("upper").unwrap();
        let declaration = Declaration {
            name: "Customer".into(),
            namespace: String::new(),
            docs: String::new(),
            properties: Vec::new(),
        };
        assert_eq!(backend.generate(&declaration), "CUSTOMER");
        assert_eq!(backend.extension(), "txt");
    }
}
