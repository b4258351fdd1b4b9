//! Application builder and request dispatcher.
//!
//! Routes and options are collected on an [`AppBuilder`]; [`AppBuilder::build`]
//! validates every registration and produces an immutable [`App`]. After
//! that point the route tables can no longer change, and [`App::handle`] may
//! be called from any number of threads.
//!
//! # Dispatch order
//!
//! 1. The method's tree matches the path: run the chain.
//! 2. Otherwise (except for `CONNECT` and `/`), redirect when adding or
//!    removing a trailing slash would match, or when a cleaned,
//!    case-corrected spelling of the path is registered. `GET` redirects
//!    with `301`, every other method with `307`.
//! 3. `OPTIONS` requests get an automatic `Allow` response.
//! 4. Other methods get `405` when another method accepts the path.
//! 5. Everything else goes to the not-found handler.

use std::any::Any;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use gweb_router::{clean_path, toggle_trailing_slash, Router};

use crate::config::{AppConfig, AppOption, PanicHandler, Settings};
use crate::context::{Context, Handler};
use crate::error::{BuildError, RouteError};
use crate::group::{Registration, RouteRegistry, RouterGroup};
use crate::method;
use crate::pool::ContextPool;
use crate::request::Request;
use crate::response::{Response, StatusCode};
use crate::routes::{default_router_factory, RouteTable, RouterFactory};

/// Collects routes, configuration and options for an [`App`].
pub struct AppBuilder {
    registry: RouteRegistry,
    root_handlers: Vec<Handler>,
    config: AppConfig,
    options: Vec<AppOption>,
    router_factory: RouterFactory,
}

impl AppBuilder {
    /// An empty builder with the default configuration and [`PathTree`]
    /// routers.
    ///
    /// [`PathTree`]: gweb_router::PathTree
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: RouteRegistry::default(),
            root_handlers: Vec::new(),
            config: AppConfig::default(),
            options: Vec::new(),
            router_factory: default_router_factory(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Queue an option, applied on top of the configuration at build time.
    #[must_use]
    pub fn option(mut self, option: AppOption) -> Self {
        self.options.push(option);
        self
    }

    /// Queue several options, applied in order after earlier ones.
    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = AppOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Back each method's table with a custom [`Router`] implementation.
    #[must_use]
    pub fn with_router_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Router<Handler>> + Send + Sync + 'static,
    {
        self.router_factory = Arc::new(factory);
        self
    }

    /// Handlers that run first for every route registered afterwards.
    #[must_use]
    pub fn global(mut self, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.root_handlers.extend(handlers);
        self
    }

    /// Register routes through the root group.
    #[must_use]
    pub fn routes(mut self, f: impl FnOnce(&mut RouterGroup<'_>)) -> Self {
        let handlers = mem::take(&mut self.root_handlers);
        let mut root = RouterGroup::new(&mut self.registry, "/", handlers);
        f(&mut root);
        self.root_handlers = root.into_handlers();
        self
    }

    /// Register routes under a path prefix with shared leading handlers.
    #[must_use]
    pub fn group(
        self,
        relative: &str,
        handlers: impl IntoIterator<Item = Handler>,
        f: impl FnOnce(&mut RouterGroup<'_>),
    ) -> Self {
        self.routes(|root| f(&mut root.group(relative, handlers)))
    }

    /// Register a handler chain for a method and path on the root group.
    ///
    /// Invalid registrations are reported by [`build`](Self::build).
    #[must_use]
    pub fn handle(self, method: &str, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.routes(|root| {
            root.handle(method, path, handlers);
        })
    }

    /// Register the same chain for several methods.
    #[must_use]
    pub fn handle_methods<'m>(
        self,
        methods: impl IntoIterator<Item = &'m str>,
        path: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> Self {
        self.routes(|root| {
            root.handle_methods(methods, path, handlers);
        })
    }

    /// Register the chain for every standard method.
    #[must_use]
    pub fn any(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle_methods(method::ALL, path, handlers)
    }

    /// Shortcut for `handle("GET", path, handlers)`.
    #[must_use]
    pub fn get(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::GET, path, handlers)
    }

    /// Shortcut for `handle("POST", path, handlers)`.
    #[must_use]
    pub fn post(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::POST, path, handlers)
    }

    /// Shortcut for `handle("PUT", path, handlers)`.
    #[must_use]
    pub fn put(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::PUT, path, handlers)
    }

    /// Shortcut for `handle("DELETE", path, handlers)`.
    #[must_use]
    pub fn delete(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::DELETE, path, handlers)
    }

    /// Shortcut for `handle("PATCH", path, handlers)`.
    #[must_use]
    pub fn patch(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::PATCH, path, handlers)
    }

    /// Shortcut for `handle("OPTIONS", path, handlers)`.
    #[must_use]
    pub fn options(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::OPTIONS, path, handlers)
    }

    /// Shortcut for `handle("HEAD", path, handlers)`.
    #[must_use]
    pub fn head(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::HEAD, path, handlers)
    }

    /// Shortcut for `handle("CONNECT", path, handlers)`.
    #[must_use]
    pub fn connect(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::CONNECT, path, handlers)
    }

    /// Shortcut for `handle("TRACE", path, handlers)`.
    #[must_use]
    pub fn trace(self, path: &str, handlers: impl IntoIterator<Item = Handler>) -> Self {
        self.handle(method::TRACE, path, handlers)
    }

    /// Apply the options, insert every recorded route and seal the app.
    ///
    /// Fails with every rejected registration when at least one route is
    /// invalid or conflicts with another.
    pub fn build(self) -> Result<App, BuildError> {
        let mut settings = Settings {
            config: self.config,
            ..Settings::default()
        };
        for option in self.options {
            option.apply(&mut settings);
        }

        let mut routes = RouteTable::new(self.router_factory);
        let mut errors = Vec::new();
        for entry in self.registry.into_entries() {
            let route = match entry {
                Registration::Route(route) => route,
                Registration::Rejected(err) => {
                    errors.push(err);
                    continue;
                }
            };
            let chain_len = route.handlers.len();
            match routes.add(&route.method, &route.path, route.handlers) {
                Ok(()) => tracing::debug!(
                    method = %route.method,
                    path = %route.path,
                    handlers = chain_len,
                    "route registered"
                ),
                Err(source) => errors.push(RouteError::Insert {
                    method: route.method,
                    path: route.path,
                    source,
                }),
            }
        }

        if !errors.is_empty() {
            return Err(BuildError::new(errors));
        }

        let Settings {
            config,
            method_not_allowed,
            not_found,
            panic_handler,
        } = settings;

        tracing::info!(
            name = %config.name,
            routes = routes.route_count(),
            methods = ?routes.methods().collect::<Vec<_>>(),
            "app built"
        );

        Ok(App {
            pool: ContextPool::new(config.max_idle_contexts),
            routes,
            method_not_allowed: method_not_allowed.unwrap_or_else(default_method_not_allowed),
            not_found: not_found.unwrap_or_else(default_not_found),
            panic_handler,
            config,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppBuilder")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

fn default_method_not_allowed() -> Handler {
    Handler::new(|c: &mut Context| c.string(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"))
}

fn default_not_found() -> Handler {
    Handler::new(|c: &mut Context| c.string(StatusCode::NOT_FOUND, "Not Found"))
}

/// A sealed application: route tables, fallback handlers and a context
/// pool.
pub struct App {
    routes: RouteTable,
    config: AppConfig,
    method_not_allowed: Handler,
    not_found: Handler,
    panic_handler: Option<PanicHandler>,
    pool: ContextPool,
}

impl App {
    /// Start configuring an app.
    #[must_use]
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// The configuration after options were applied.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Name from the configuration, used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Number of registered routes across all methods.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.route_count()
    }

    /// Contexts currently parked for reuse.
    #[must_use]
    pub fn idle_contexts(&self) -> usize {
        self.pool.idle_len()
    }

    /// Serve one request.
    ///
    /// A panicking handler is passed to the panic handler when one is
    /// configured, and the response built so far is returned. Without one
    /// the panic continues unwinding out of this call.
    pub fn handle(&self, request: Request) -> Response {
        let mut ctx = self.pool.acquire(request);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(&mut ctx)));

        match outcome {
            Ok(()) => {
                let response = ctx.take_response();
                self.pool.release(ctx);
                response
            }
            Err(payload) => {
                let Some(handler) = &self.panic_handler else {
                    panic::resume_unwind(payload);
                };
                tracing::warn!(
                    method = %ctx.method(),
                    path = %ctx.path(),
                    message = panic_message(payload.as_ref()),
                    "handler panicked"
                );
                handler(&mut ctx, payload.as_ref());
                // The chain stopped midway; start the next request fresh.
                ctx.take_response()
            }
        }
    }

    fn dispatch(&self, ctx: &mut Context) {
        if let Some(tree) = self.routes.get(ctx.method()) {
            let mut params = mem::take(ctx.params_mut());
            let lookup = tree.find(ctx.path(), &mut params);
            *ctx.params_mut() = params;

            if let Some(handlers) = lookup.handlers {
                ctx.set_handlers(handlers);
                ctx.next();
                return;
            }

            let path = ctx.path();
            if ctx.method() != method::CONNECT && path != "/" {
                let code = if ctx.method() == method::GET {
                    StatusCode::MOVED_PERMANENTLY
                } else {
                    StatusCode::TEMPORARY_REDIRECT
                };

                if lookup.tsr && self.config.redirect_trailing_slash {
                    if let Some(target) = toggle_trailing_slash(path) {
                        redirect(ctx, &target, code);
                        return;
                    }
                }

                if self.config.redirect_fixed_path {
                    let fixed = tree.find_case_insensitive_path(
                        &clean_path(path),
                        self.config.redirect_trailing_slash,
                    );
                    if let Some(target) = fixed {
                        redirect(ctx, &target, code);
                        return;
                    }
                }
            }
        }

        let requested = ctx.method();
        if requested == method::OPTIONS {
            if self.config.handle_options {
                if let Some(allow) = self.routes.allowed(ctx.path(), requested) {
                    tracing::debug!(path = %ctx.path(), allow = %allow, "answering OPTIONS");
                    ctx.header("Allow", &allow);
                    return;
                }
            }
        } else if self.config.handle_method_not_allowed {
            if let Some(allow) = self.routes.allowed(ctx.path(), requested) {
                tracing::debug!(
                    method = %requested,
                    path = %ctx.path(),
                    allow = %allow,
                    "method not allowed"
                );
                ctx.header("Allow", &allow);
                self.method_not_allowed.call(ctx);
                return;
            }
        }

        tracing::debug!(method = %ctx.method(), path = %ctx.path(), "no route");
        self.not_found.call(ctx);
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("routes", &self.routes)
            .field("panic_handler", &self.panic_handler.is_some())
            .finish_non_exhaustive()
    }
}

/// Point the client at `target`, carrying over the query string.
fn redirect(ctx: &mut Context, target: &str, code: StatusCode) {
    let location = match ctx.request().query() {
        Some(query) if !query.is_empty() => format!("{target}?{query}"),
        _ => target.to_owned(),
    };
    tracing::debug!(
        method = %ctx.method(),
        from = %ctx.path(),
        to = %location,
        status = code.as_u16(),
        "redirecting"
    );

    ctx.status(code);
    ctx.header("Location", &location);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn app_is_shareable() {
        assert_send_sync::<App>();
    }

    #[test]
    fn build_reports_every_failure() {
        let noop = || Handler::new(|_c: &mut Context| {});
        let err = App::builder()
            .get("/user/:id", [noop()])
            .get("/user/:name", [noop()])
            .handle("get", "/lower", [noop()])
            .get("/dup", [noop()])
            .get("/dup", [noop()])
            .build()
            .unwrap_err();

        assert_eq!(err.errors().len(), 3);
        assert!(matches!(err.errors()[0], RouteError::Insert { .. }));
        assert!(matches!(err.errors()[1], RouteError::InvalidMethod { .. }));
        assert!(matches!(err.errors()[2], RouteError::Insert { .. }));
    }

    #[test]
    fn options_override_config() {
        let app = App::builder()
            .config(AppConfig::new().name("from-config"))
            .option(AppOption::name("from-option"))
            .option(AppOption::redirect_fixed_path(false))
            .build()
            .unwrap();
        assert_eq!(app.name(), "from-option");
        assert!(!app.config().redirect_fixed_path);
        assert!(app.config().redirect_trailing_slash);
    }

    #[test]
    fn panic_message_extracts_strings() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "<non-string panic payload>");
    }
}
