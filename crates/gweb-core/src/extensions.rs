//! Typed per-request storage.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A type map holding at most one value per type.
///
/// Handlers in a chain use it to pass data along (an authenticated user,
/// a request id, a timer). The map is emptied whenever its context is
/// reset, so values never leak into a later request.
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning the previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Borrow the value of type `T`.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Mutably borrow the value of type `T`.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// Take a value out of the map.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    /// Returns true if a value of type `T` is stored.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop every value, keeping the allocation.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct UserId(u64);

    #[test]
    fn one_value_per_type() {
        let mut ext = Extensions::new();
        assert!(ext.insert(UserId(1)).is_none());
        assert_eq!(ext.insert(UserId(2)), Some(UserId(1)));
        ext.insert("request-id");

        assert_eq!(ext.len(), 2);
        assert_eq!(ext.get::<UserId>(), Some(&UserId(2)));
        assert_eq!(ext.get::<&str>(), Some(&"request-id"));
        assert!(ext.get::<u8>().is_none());
    }

    #[test]
    fn get_mut_and_remove() {
        let mut ext = Extensions::new();
        ext.insert(0_u32);
        if let Some(counter) = ext.get_mut::<u32>() {
            *counter += 5;
        }
        assert_eq!(ext.remove::<u32>(), Some(5));
        assert!(!ext.contains::<u32>());
    }

    #[test]
    fn clear_empties_map() {
        let mut ext = Extensions::new();
        ext.insert(UserId(7));
        ext.clear();
        assert!(ext.is_empty());
        assert!(ext.get::<UserId>().is_none());
    }
}
