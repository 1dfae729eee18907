//! The table of functions that may be called in an expression.

use levenshtein::levenshtein;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The shared, seeded registry used by [`translate`](crate::translate).
static DEFAULT: Lazy<Registry> = Lazy::new(Registry::seeded);

/// Maps fully-qualified dotted function paths (such as `numpy.sqrt`) to the canonical short names
/// used in [`Expr::Call`](crate::expr::Expr::Call).
///
/// Module aliases (such as `np` for `numpy`) rewrite the first segment of a path before lookup. A
/// registry is built up front and read-only while translating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    /// Fully-qualified path to canonical name.
    functions: HashMap<String, String>,

    /// Module alias to module name.
    modules: HashMap<String, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Registry {
    /// Creates a registry with no functions.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            modules: HashMap::new(),
        }
    }

    /// Creates a registry with the default functions: `math.sqrt` and `numpy.sqrt` (aliased as
    /// `np.sqrt`), both canonically `sqrt`.
    pub fn seeded() -> Self {
        Self::new()
            .register("math.sqrt", "sqrt")
            .register("numpy.sqrt", "sqrt")
            .alias("np", "numpy")
    }

    /// Returns the shared default registry.
    pub fn default_registry() -> &'static Registry {
        &DEFAULT
    }

    /// Registers a function path with its canonical name.
    pub fn register(mut self, path: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.functions.insert(path.into(), canonical.into());
        self
    }

    /// Registers an alias for a module, used when the alias is the first segment of a path.
    pub fn alias(mut self, alias: impl Into<String>, module: impl Into<String>) -> Self {
        self.modules.insert(alias.into(), module.into());
        self
    }

    /// Returns true if the name is the canonical name of some registered function.
    pub fn is_canonical(&self, name: &str) -> bool {
        self.functions.values().any(|canonical| canonical == name)
    }

    /// Resolves a dotted path to the canonical name of the function, applying module aliases.
    pub fn resolve(&self, path: &[&str]) -> Option<&str> {
        let (first, rest) = path.split_first()?;
        let module = self.modules.get(*first).map_or(*first, String::as_str);
        let full = std::iter::once(module)
            .chain(rest.iter().copied())
            .collect::<Vec<_>>()
            .join(".");
        self.functions.get(&full).map(String::as_str)
    }

    /// Returns the registered paths and canonical names that are similar to the given name.
    pub fn similar(&self, name: &str) -> Vec<String> {
        let mut similar = self.functions
            .iter()
            .flat_map(|(path, canonical)| [path, canonical])
            .filter(|n| levenshtein(n, name) < 2)
            .cloned()
            .collect::<Vec<_>>();
        similar.sort();
        similar.dedup();
        similar
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn resolve_seeded() {
        let registry = Registry::default_registry();
        assert_eq!(registry.resolve(&["math", "sqrt"]), Some("sqrt"));
        assert_eq!(registry.resolve(&["numpy", "sqrt"]), Some("sqrt"));
        assert_eq!(registry.resolve(&["np", "sqrt"]), Some("sqrt"));
        assert_eq!(registry.resolve(&["np", "cbrt"]), None);
        assert_eq!(registry.resolve(&[]), None);
        assert!(registry.is_canonical("sqrt"));
        assert!(!registry.is_canonical("math.sqrt"));
    }

    #[test]
    fn extend_registry() {
        let registry = Registry::new()
            .register("numpy.arctan2", "atan2")
            .alias("npy", "numpy");
        assert_eq!(registry.resolve(&["npy", "arctan2"]), Some("atan2"));
        assert_eq!(registry.resolve(&["math", "sqrt"]), None);
    }

    #[test]
    fn similar_names() {
        let registry = Registry::seeded();
        assert_eq!(registry.similar("sqr"), vec!["sqrt".to_string()]);
        assert_eq!(registry.similar("math.sqrr"), vec!["math.sqrt".to_string()]);
        assert!(registry.similar("log").is_empty());
    }
}
