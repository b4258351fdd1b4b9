//! Route registration with shared prefixes and handlers.

use std::sync::Arc;

use gweb_router::{clean_path, InsertError};

use crate::context::Handler;
use crate::error::RouteError;
use crate::method;

/// A route recorded during setup, inserted into the tables at build time.
#[derive(Debug)]
pub(crate) struct PendingRoute {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) handlers: Arc<[Handler]>,
}

#[derive(Debug)]
pub(crate) enum Registration {
    Route(PendingRoute),
    Rejected(RouteError),
}

/// Every registration attempt, in the order it was made.
#[derive(Debug, Default)]
pub(crate) struct RouteRegistry {
    entries: Vec<Registration>,
}

impl RouteRegistry {
    pub(crate) fn into_entries(self) -> Vec<Registration> {
        self.entries
    }
}

/// A set of routes sharing a path prefix and leading handlers.
///
/// Handlers given to [`group`](Self::group) or [`global`](Self::global) run
/// before the handlers of every route registered afterwards through this
/// group.
///
/// ```
/// use gweb_core::{handlers, App, Context};
///
/// fn auth(c: &mut Context) { c.next(); }
/// fn list(c: &mut Context) { c.string(200_u16, "users"); }
///
/// let app = App::builder()
///     .group("/api/v1", handlers![auth], |v1| {
///         v1.get("/users", handlers![list]);
///     })
///     .build()
///     .unwrap();
/// assert_eq!(app.route_count(), 1);
/// ```
#[derive(Debug)]
pub struct RouterGroup<'a> {
    registry: &'a mut RouteRegistry,
    base_path: String,
    handlers: Vec<Handler>,
}

impl<'a> RouterGroup<'a> {
    pub(crate) fn new(
        registry: &'a mut RouteRegistry,
        base_path: impl Into<String>,
        handlers: Vec<Handler>,
    ) -> Self {
        Self {
            registry,
            base_path: base_path.into(),
            handlers,
        }
    }

    /// Absolute path prefix of this group.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub(crate) fn into_handlers(self) -> Vec<Handler> {
        self.handlers
    }

    /// Handlers prepended to every route registered through this group.
    #[must_use]
    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    /// Create a nested group.
    ///
    /// The child's prefix is `relative` joined onto this group's prefix,
    /// and its handlers are this group's current handlers followed by
    /// `handlers`. Handlers added to this group later do not reach it.
    pub fn group(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> RouterGroup<'_> {
        let base_path = join_paths(&self.base_path, relative);
        let handlers = self.combine_handlers(handlers);
        RouterGroup::new(&mut *self.registry, base_path, handlers)
    }

    /// Append handlers that later registrations through this group run first.
    pub fn global(&mut self, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handlers.extend(handlers);
        self
    }

    /// Register a handler chain for a method and a path relative to this
    /// group.
    ///
    /// Invalid input is recorded and reported when the app is built.
    pub fn handle(
        &mut self,
        method: &str,
        path: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> &mut Self {
        let handlers: Vec<Handler> = handlers.into_iter().collect();
        let entry = match self.validate(method, path, &handlers) {
            Ok(()) => Registration::Route(PendingRoute {
                method: method.to_owned(),
                path: join_paths(&self.base_path, path),
                handlers: Arc::from(self.combine_handlers(handlers)),
            }),
            Err(err) => Registration::Rejected(err),
        };
        self.registry.entries.push(entry);
        self
    }

    fn validate(&self, method: &str, path: &str, handlers: &[Handler]) -> Result<(), RouteError> {
        if !path.starts_with('/') {
            return Err(RouteError::Insert {
                method: method.to_owned(),
                path: path.to_owned(),
                source: InsertError::MissingLeadingSlash {
                    path: path.to_owned(),
                },
            });
        }
        if !method::is_valid(method) {
            return Err(RouteError::InvalidMethod {
                method: method.to_owned(),
                path: path.to_owned(),
            });
        }
        if handlers.is_empty() {
            return Err(RouteError::EmptyHandlers {
                method: method.to_owned(),
                path: path.to_owned(),
            });
        }
        Ok(())
    }

    fn combine_handlers(&self, handlers: impl IntoIterator<Item = Handler>) -> Vec<Handler> {
        self.handlers.iter().cloned().chain(handlers).collect()
    }

    /// Shortcut for `handle("GET", path, handlers)`.
    pub fn get(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::GET, path, handlers)
    }

    /// Shortcut for `handle("POST", path, handlers)`.
    pub fn post(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::POST, path, handlers)
    }

    /// Shortcut for `handle("PUT", path, handlers)`.
    pub fn put(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::PUT, path, handlers)
    }

    /// Shortcut for `handle("DELETE", path, handlers)`.
    pub fn delete(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::DELETE, path, handlers)
    }

    /// Shortcut for `handle("PATCH", path, handlers)`.
    pub fn patch(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::PATCH, path, handlers)
    }

    /// Shortcut for `handle("OPTIONS", path, handlers)`.
    pub fn options(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::OPTIONS, path, handlers)
    }

    /// Shortcut for `handle("HEAD", path, handlers)`.
    pub fn head(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::HEAD, path, handlers)
    }

    /// Shortcut for `handle("CONNECT", path, handlers)`.
    pub fn connect(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::CONNECT, path, handlers)
    }

    /// Shortcut for `handle("TRACE", path, handlers)`.
    pub fn trace(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle(method::TRACE, path, handlers)
    }

    /// Register the same chain for several methods. Surrounding whitespace
    /// in each method name is ignored.
    pub fn handle_methods<'m>(
        &mut self,
        methods: impl IntoIterator<Item = &'m str>,
        path: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> &mut Self {
        let handlers: Vec<Handler> = handlers.into_iter().collect();
        for method in methods {
            self.handle(method.trim(), path, handlers.iter().cloned());
        }
        self
    }

    /// Register the chain for every standard method.
    pub fn any(&mut self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.handle_methods(method::ALL, path, handlers)
    }
}

/// Join a relative path onto an absolute one.
///
/// The result is cleaned, and keeps a trailing slash exactly when
/// `relative` has one.
#[must_use]
pub fn join_paths(absolute: &str, relative: &str) -> String {
    if relative.is_empty() {
        return absolute.to_owned();
    }

    let mut joined = clean_path(&format!("{absolute}/{relative}"));
    let wants_slash = relative.ends_with('/');
    if wants_slash && !joined.ends_with('/') {
        joined.push('/');
    } else if !wants_slash && joined.len() > 1 && joined.ends_with('/') {
        joined.pop();
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn noop() -> Handler {
        Handler::new(|_c: &mut Context| {})
    }

    fn routes(registry: RouteRegistry) -> Vec<(String, String, usize)> {
        registry
            .into_entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Registration::Route(r) => Some((r.method, r.path, r.handlers.len())),
                Registration::Rejected(_) => None,
            })
            .collect()
    }

    fn rejections(registry: RouteRegistry) -> Vec<RouteError> {
        registry
            .into_entries()
            .into_iter()
            .filter_map(|entry| match entry {
                Registration::Rejected(err) => Some(err),
                Registration::Route(_) => None,
            })
            .collect()
    }

    // ========================================================================
    // join_paths
    // ========================================================================

    #[test]
    fn join_paths_cases() {
        assert_eq!(join_paths("/", ""), "/");
        assert_eq!(join_paths("/a", ""), "/a");
        assert_eq!(join_paths("/", "v1"), "/v1");
        assert_eq!(join_paths("/", "/v1"), "/v1");
        assert_eq!(join_paths("/v1", "/login/"), "/v1/login/");
        assert_eq!(join_paths("/v1/login/", "/test"), "/v1/login/test");
        assert_eq!(join_paths("/a/", "b"), "/a/b");
        assert_eq!(join_paths("/a", "./b/../c"), "/a/c");
        assert_eq!(join_paths("/a", "."), "/a");
        assert_eq!(join_paths("/a", "/"), "/a/");
    }

    // ========================================================================
    // Groups
    // ========================================================================

    #[test]
    fn nested_groups_accumulate_handlers() {
        let mut registry = RouteRegistry::default();
        let mut root = RouterGroup::new(&mut registry, "/", Vec::new());

        let mut hello = root.group("/hello", [noop()]);
        hello.global([noop()]);
        assert_eq!(hello.handlers().len(), 2);
        assert_eq!(hello.base_path(), "/hello");

        let mut world = hello.group("world", [noop()]);
        world.global([noop()]);
        assert_eq!(world.handlers().len(), 4);
        assert_eq!(world.base_path(), "/hello/world");
    }

    #[test]
    fn routes_get_group_prefix_and_handlers() {
        let mut registry = RouteRegistry::default();
        {
            let mut root = RouterGroup::new(&mut registry, "/", Vec::new());
            let mut v1 = root.group("v1", [noop()]);
            v1.get("/test", [noop()]);
            let mut login = v1.group("/login/", [noop(), noop()]);
            login.post("/test", [noop()]);
        }
        assert_eq!(
            routes(registry),
            vec![
                ("GET".to_owned(), "/v1/test".to_owned(), 2),
                ("POST".to_owned(), "/v1/login/test".to_owned(), 4),
            ]
        );
    }

    #[test]
    fn global_only_affects_later_routes() {
        let mut registry = RouteRegistry::default();
        {
            let mut root = RouterGroup::new(&mut registry, "/", Vec::new());
            root.get("/before", [noop()]);
            root.global([noop()]);
            root.get("/after", [noop()]);
        }
        let lens: Vec<usize> = routes(registry).into_iter().map(|r| r.2).collect();
        assert_eq!(lens, vec![1, 2]);
    }

    #[test]
    fn any_registers_every_method() {
        let mut registry = RouteRegistry::default();
        RouterGroup::new(&mut registry, "/", Vec::new()).any("/all", [noop()]);
        let mut methods: Vec<String> = routes(registry).into_iter().map(|r| r.0).collect();
        methods.sort();
        let mut expected: Vec<String> = method::ALL.iter().map(|m| (*m).to_owned()).collect();
        expected.sort();
        assert_eq!(methods, expected);
    }

    #[test]
    fn handle_methods_trims_names() {
        let mut registry = RouteRegistry::default();
        RouterGroup::new(&mut registry, "/", Vec::new()).handle_methods(
            [" GET", "POST "],
            "/x",
            [noop()],
        );
        let methods: Vec<String> = routes(registry).into_iter().map(|r| r.0).collect();
        assert_eq!(methods, vec!["GET", "POST"]);
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn invalid_registrations_are_recorded() {
        let mut registry = RouteRegistry::default();
        {
            let mut root = RouterGroup::new(&mut registry, "/", Vec::new());
            root.handle("get", "/a", [noop()]);
            root.handle("", "/a", [noop()]);
            root.handle("GET", "a", [noop()]);
            root.handle("GET", "/a", Vec::<Handler>::new());
        }
        let errors = rejections(registry);
        assert_eq!(errors.len(), 4);
        assert!(matches!(&errors[0], RouteError::InvalidMethod { method, .. } if method == "get"));
        assert!(matches!(&errors[1], RouteError::InvalidMethod { .. }));
        assert!(matches!(
            &errors[2],
            RouteError::Insert {
                source: InsertError::MissingLeadingSlash { .. },
                ..
            }
        ));
        assert!(matches!(&errors[3], RouteError::EmptyHandlers { .. }));
    }

    #[test]
    fn group_handlers_do_not_satisfy_empty_route_chain() {
        let mut registry = RouteRegistry::default();
        RouterGroup::new(&mut registry, "/", vec![noop()]).get("/a", Vec::<Handler>::new());
        assert_eq!(rejections(registry).len(), 1);
    }
}
