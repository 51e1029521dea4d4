//! Registry resolving indicator type identifiers
//!
//! Built-ins are registered at compile time. Plugin loaders append
//! directories to the search path and register what they discover there,
//! including declarations that turned out unusable, so resolving those
//! reports why instead of claiming the identifier does not exist.

use crate::error::ResolutionError;
use crate::indicator::{BuiltinIndicator, BuiltinType, IndicatorTypeRef};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

enum Entry {
    Valid(IndicatorTypeRef),
    Invalid { origin: PathBuf, reason: String },
}

/// Registry for indicator types
pub struct Registry {
    types: HashMap<String, Entry>,
    search_path: Vec<PathBuf>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            search_path: Vec::new(),
        }
    }

    /// Register an indicator type under its own identifier
    pub fn register(&mut self, ty: IndicatorTypeRef) {
        let id = ty.type_id().to_string();
        if self.types.insert(id.clone(), Entry::Valid(ty)).is_some() {
            log::warn!("Indicator type {} registered twice, keeping the latest", id);
        }
    }

    /// Register a statically known indicator
    pub fn register_builtin<T: BuiltinIndicator>(&mut self) {
        self.register(Arc::new(BuiltinType::<T>::new()));
    }

    /// Record an identifier whose declaration cannot be used
    pub fn register_invalid(&mut self, id: &str, origin: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("Indicator {} from {:?} is unusable: {}", id, origin, reason);
        self.types.insert(
            id.to_string(),
            Entry::Invalid {
                origin: origin.to_path_buf(),
                reason,
            },
        );
    }

    /// Append a plugin directory to the search path.
    ///
    /// Returns false if the directory was already on it.
    pub fn add_search_dir(&mut self, dir: &Path) -> bool {
        if self.search_path.iter().any(|d| d == dir) {
            return false;
        }
        self.search_path.push(dir.to_path_buf());
        true
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Resolve an identifier to its implementation
    pub fn resolve(&self, id: &str) -> Result<IndicatorTypeRef, ResolutionError> {
        match self.types.get(id) {
            Some(Entry::Valid(ty)) => Ok(ty.clone()),
            Some(Entry::Invalid { origin, reason }) => {
                Err(ResolutionError::InvalidImplementation {
                    id: id.to_string(),
                    origin: origin.clone(),
                    reason: reason.clone(),
                })
            }
            None => Err(ResolutionError::NotFound {
                id: id.to_string(),
                searched: self.search_path.clone(),
            }),
        }
    }

    /// Whether `id` has any entry, usable or not
    pub fn is_declared(&self, id: &str) -> bool {
        self.types.contains_key(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        matches!(self.types.get(id), Some(Entry::Valid(_)))
    }

    /// List all resolvable identifiers, sorted
    pub fn list_types(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .types
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Valid(_)))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use crate::indicator::{BoxedIndicator, IndicatorType};
    use mm_types::Params;

    struct Dummy(&'static str);

    impl IndicatorType for Dummy {
        fn type_id(&self) -> &str {
            self.0
        }

        fn infer_preferred_params(&self) -> Result<Params, IndicatorError> {
            Ok(Params::new())
        }

        fn create(&self, _params: &Params) -> Result<BoxedIndicator, IndicatorError> {
            Err(IndicatorError::InvalidParams("dummy".to_string()))
        }
    }

    #[test]
    fn test_resolve_registered_type() {
        let mut registry = Registry::new();
        registry.register(Arc::new(Dummy("pkg.Dummy")));
        let ty = registry.resolve("pkg.Dummy").unwrap();
        assert_eq!(ty.type_id(), "pkg.Dummy");
        assert!(registry.contains("pkg.Dummy"));
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let mut registry = Registry::new();
        registry.add_search_dir(Path::new("/tmp/mm-plugins"));
        match registry.resolve("pkg.Missing") {
            Err(ResolutionError::NotFound { id, searched }) => {
                assert_eq!(id, "pkg.Missing");
                assert_eq!(searched, vec![PathBuf::from("/tmp/mm-plugins")]);
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("unknown type resolved"),
        }
    }

    #[test]
    fn test_invalid_declaration_is_reported() {
        let mut registry = Registry::new();
        registry.register_invalid("pkg.Broken", Path::new("/tmp/pkg.json"), "unknown kind `gpu`");
        assert!(matches!(
            registry.resolve("pkg.Broken"),
            Err(ResolutionError::InvalidImplementation { .. })
        ));
        assert!(!registry.contains("pkg.Broken"));
        assert!(registry.is_declared("pkg.Broken"));
        assert!(!registry.is_declared("pkg.Missing"));
        assert!(registry.list_types().is_empty());
    }

    #[test]
    fn test_search_dir_added_once() {
        let mut registry = Registry::new();
        assert!(registry.add_search_dir(Path::new("/a")));
        assert!(!registry.add_search_dir(Path::new("/a")));
        assert_eq!(registry.search_path().len(), 1);
    }
}
