//! Route matching result.

use std::sync::Arc;

/// A single captured path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Name declared in the pattern (`:id` → `id`).
    pub key: Arc<str>,
    /// Value taken from the request path.
    pub value: String,
}

/// Parameters captured while matching a path.
///
/// The sequence is ordered: the first dynamic segment of the pattern is
/// the first entry, so reading by index is stable. The buffer is meant to
/// be reused across requests; [`Params::clear`] keeps its capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: Vec<Param>,
}

impl Params {
    /// Create an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by name.
    ///
    /// When a name appears more than once the first occurrence wins.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|p| &*p.key == name)
            .map(|p| p.value.as_str())
    }

    /// Append a captured parameter.
    pub fn push(&mut self, key: Arc<str>, value: impl Into<String>) {
        self.inner.push(Param {
            key,
            value: value.into(),
        });
    }

    /// Iterate over `(key, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|p| (&*p.key, p.value.as_str()))
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove every parameter, keeping the allocation.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Current allocated capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }
}

impl std::ops::Index<usize> for Params {
    type Output = Param;

    fn index(&self, index: usize) -> &Self::Output {
        &self.inner[index]
    }
}

/// Result of looking a path up in a single method's tree.
#[derive(Debug)]
pub struct Lookup<H> {
    /// The handler chain registered for the path, if any.
    pub handlers: Option<Arc<[H]>>,
    /// True when no exact match exists but toggling one trailing slash
    /// would produce one.
    pub tsr: bool,
}

impl<H> Lookup<H> {
    /// A lookup that found nothing and has no redirect candidate.
    #[must_use]
    pub fn miss() -> Self {
        Self {
            handlers: None,
            tsr: false,
        }
    }

    /// Returns true if a handler chain was found.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.handlers.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_first_of_shadowed_names() {
        let mut params = Params::new();
        params.push(Arc::from("id"), "1");
        params.push(Arc::from("id"), "2");
        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params[1].value, "2");
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut params = Params::new();
        for i in 0..8 {
            params.push(Arc::from("k"), i.to_string());
        }
        let cap = params.capacity();
        params.clear();
        assert!(params.is_empty());
        assert_eq!(params.capacity(), cap);
    }

    #[test]
    fn iter_preserves_order() {
        let mut params = Params::new();
        params.push(Arc::from("a"), "1");
        params.push(Arc::from("b"), "2");
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }
}
