//! Per-method route tables.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use gweb_router::{InsertError, Params, PathTree, Router};

use crate::context::Handler;
use crate::method;

/// Creates the router backing one method's table.
pub type RouterFactory = Arc<dyn Fn() -> Box<dyn Router<Handler>> + Send + Sync>;

pub(crate) fn default_router_factory() -> RouterFactory {
    Arc::new(|| -> Box<dyn Router<Handler>> { Box::new(PathTree::<Handler>::new()) })
}

/// One router per HTTP method, created on first registration.
pub(crate) struct RouteTable {
    trees: BTreeMap<String, Box<dyn Router<Handler>>>,
    factory: RouterFactory,
}

impl RouteTable {
    pub(crate) fn new(factory: RouterFactory) -> Self {
        Self {
            trees: BTreeMap::new(),
            factory,
        }
    }

    pub(crate) fn add(
        &mut self,
        method: &str,
        path: &str,
        handlers: Arc<[Handler]>,
    ) -> Result<(), InsertError> {
        let factory = &self.factory;
        let tree = self
            .trees
            .entry(method.to_owned())
            .or_insert_with(|| factory());
        tree.add(path, handlers)
    }

    pub(crate) fn get(&self, method: &str) -> Option<&dyn Router<Handler>> {
        self.trees.get(method).map(|tree| &**tree)
    }

    /// Methods that would accept `path`, formatted for an `Allow` header.
    ///
    /// `*` asks about the whole server and lists every registered method.
    /// `OPTIONS` is appended whenever anything else is allowed. Returns
    /// `None` when nothing matches.
    pub(crate) fn allowed(&self, path: &str, requested: &str) -> Option<String> {
        let mut allow: Vec<&str> = Vec::with_capacity(self.trees.len() + 1);
        let mut scratch = Params::new();

        for (name, tree) in &self.trees {
            if name == method::OPTIONS {
                continue;
            }
            if path == "*" {
                allow.push(name);
                continue;
            }
            if name == requested {
                continue;
            }
            scratch.clear();
            if tree.find(path, &mut scratch).is_match() {
                allow.push(name);
            }
        }

        if allow.is_empty() {
            return None;
        }
        allow.sort_by(|a, b| method::allow_order(a, b));
        allow.push(method::OPTIONS);
        Some(allow.join(", "))
    }

    pub(crate) fn route_count(&self) -> usize {
        self.trees.values().map(|tree| tree.route_count()).sum()
    }

    pub(crate) fn methods(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (method, tree) in &self.trees {
            map.entry(method, &tree.route_count());
        }
        map.finish()
    }
}
