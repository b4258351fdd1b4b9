//! Per-request execution context and the handler chain.
//!
//! A matched route runs an ordered chain of [`Handler`]s against one
//! [`Context`]. The context keeps a cursor into the chain: the dispatcher
//! calls [`Context::next`] once, and every handler may call it again to run
//! the rest of the chain before doing its own post-processing.
//!
//! ```
//! use gweb_core::{handlers, App, StatusCode};
//!
//! let app = App::builder()
//!     .get("/hello/:name", handlers![|c: &mut gweb_core::Context| {
//!         let greeting = format!("hello {}", c.param("name").unwrap_or("stranger"));
//!         c.string(StatusCode::OK, &greeting);
//!     }])
//!     .build()
//!     .unwrap();
//!
//! let resp = app.handle(gweb_core::Request::new("GET", "/hello/gweb"));
//! assert_eq!(resp.text(), "hello gweb");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use gweb_router::Params;
use serde::Serialize;

use crate::error::RenderError;
use crate::extensions::Extensions;
use crate::cookie::{self, Cookie};
use crate::render::{Json, Render, Xml, TEXT_PLAIN};
use crate::urlencoded::percent_decode;
use crate::request::Request;
use crate::response::{Response, StatusCode};

/// One step of a handler chain.
///
/// Cloning is cheap; chains share their handlers.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(&mut Context) + Send + Sync>);

impl Handler {
    /// Wrap a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the handler against a context.
    pub fn call(&self, ctx: &mut Context) {
        (self.0)(ctx);
    }
}

impl<F> From<F> for Handler
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// Build a `Vec<Handler>` from closures, functions or existing handlers.
///
/// ```
/// use gweb_core::{handlers, Context, Handler};
///
/// fn log(c: &mut Context) { c.next(); }
///
/// let shared = Handler::new(|_c: &mut Context| {});
/// let chain: Vec<Handler> = handlers![log, shared.clone(), |c: &mut Context| c.next()];
/// assert_eq!(chain.len(), 3);
/// ```
#[macro_export]
macro_rules! handlers {
    () => {
        ::std::vec::Vec::<$crate::Handler>::new()
    };
    ($($handler:expr),+ $(,)?) => {
        ::std::vec![$($crate::Handler::from($handler)),+]
    };
}

/// State for one request: the request itself, the response being built,
/// captured path parameters, the matched chain and its cursor, and typed
/// extension slots.
///
/// Contexts are pooled by the [`App`](crate::App); everything here is reset
/// before a context serves its next request.
pub struct Context {
    request: Request,
    response: Response,
    params: Params,
    handlers: Arc<[Handler]>,
    cursor: usize,
    extensions: Extensions,
}

impl Context {
    /// A fresh context with an empty chain.
    #[must_use]
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: Response::new(),
            params: Params::new(),
            handlers: Arc::from(Vec::new()),
            cursor: 0,
            extensions: Extensions::new(),
        }
    }

    /// Prepare the context for another request.
    ///
    /// The response, params and extensions are emptied in place so their
    /// allocations carry over.
    pub(crate) fn reset(&mut self, request: Request) {
        self.request = request;
        self.response.reset();
        self.params.clear();
        self.handlers = Arc::from(Vec::new());
        self.cursor = 0;
        self.extensions.clear();
    }

    /// Install a chain and rewind the cursor to its start.
    pub(crate) fn set_handlers(&mut self, handlers: Arc<[Handler]>) {
        self.handlers = handlers;
        self.cursor = 0;
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub(crate) fn take_response(&mut self) -> Response {
        std::mem::take(&mut self.response)
    }

    // ========================================================================
    // Handler chain
    // ========================================================================

    /// Run the remaining handlers of the chain.
    ///
    /// Each handler runs at most once. A handler that calls `next` gets
    /// control back only after every later handler has finished; a handler
    /// that doesn't call it still has the rest of the chain run after it
    /// returns.
    pub fn next(&mut self) {
        let chain = Arc::clone(&self.handlers);
        while let Some(handler) = chain.get(self.cursor) {
            self.cursor += 1;
            handler.call(self);
        }
    }

    /// Index of the handler currently running, `None` outside a chain.
    #[must_use]
    pub fn handler_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Number of handlers in the matched chain.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// The request being served.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Mutable access to the request, for rewriting middleware.
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &str {
        self.request.method()
    }

    /// Request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.request.path()
    }

    /// Value of a path parameter captured by the route pattern.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Every captured path parameter, in pattern order.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<Cow<'_, str>> {
        self.request.query_values().get(key)
    }

    /// Every value of a query parameter.
    #[must_use]
    pub fn query_array(&self, key: &str) -> Vec<Cow<'_, str>> {
        self.request.query_values().get_all(key)
    }

    /// Query parameter, or `default` when it is missing or empty.
    #[must_use]
    pub fn default_query<'a>(&'a self, key: &str, default: &'a str) -> Cow<'a, str> {
        match self.query(key) {
            Some(value) if !value.is_empty() => value,
            _ => Cow::Borrowed(default),
        }
    }

    /// First value of an url-encoded form field.
    #[must_use]
    pub fn post_form(&self, key: &str) -> Option<Cow<'_, str>> {
        self.request.form_values().get(key)
    }

    /// Every value of an url-encoded form field.
    #[must_use]
    pub fn post_form_array(&self, key: &str) -> Vec<Cow<'_, str>> {
        self.request.form_values().get_all(key)
    }

    /// Value of a request cookie, percent-decoded with `+` as space.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<Cow<'_, str>> {
        self.raw_cookie(name).map(percent_decode)
    }

    /// Value of a request cookie as sent by the client.
    #[must_use]
    pub fn raw_cookie(&self, name: &str) -> Option<&str> {
        cookie::find(self.request.headers(), name)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// The response built so far.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access to the response.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Set the response status.
    pub fn status(&mut self, code: impl Into<StatusCode>) {
        self.response.set_status(code.into());
    }

    /// Set a response header; an empty value removes it.
    pub fn header(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.response.headers_mut().remove(key);
        } else {
            self.response.headers_mut().set(key, value);
        }
    }

    /// Write a body with a renderer.
    pub fn render(&mut self, renderer: &impl Render) -> Result<(), RenderError> {
        renderer.render(&mut self.response)
    }

    /// Respond with plain text.
    pub fn string(&mut self, code: impl Into<StatusCode>, text: &str) {
        self.status(code);
        self.response.set_content_type(TEXT_PLAIN);
        self.response.write(text.as_bytes());
    }

    /// Respond with a JSON document.
    pub fn json<T: Serialize + ?Sized>(
        &mut self,
        code: impl Into<StatusCode>,
        value: &T,
    ) -> Result<(), RenderError> {
        self.status(code);
        Json::new(value).render(&mut self.response)
    }

    /// Respond with an XML document.
    pub fn xml<T: Serialize + ?Sized>(
        &mut self,
        code: impl Into<StatusCode>,
        value: &T,
    ) -> Result<(), RenderError> {
        self.status(code);
        Xml::new(value).render(&mut self.response)
    }

    /// Add a `Set-Cookie` header. Earlier cookies are kept.
    pub fn set_cookie(&mut self, cookie: &Cookie) {
        self.response
            .headers_mut()
            .append("Set-Cookie", cookie.to_string());
    }

    // ========================================================================
    // Extensions
    // ========================================================================

    /// Store a typed value for later handlers in the chain.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.extensions.insert(value)
    }

    /// A value stored by an earlier handler.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get()
    }

    /// Mutable access to a stored value.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extensions.get_mut()
    }

    /// Take a stored value out.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions.remove()
    }

    /// All typed values stored for this request.
    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.request.method())
            .field("path", &self.request.path())
            .field("params", &self.params)
            .field("chain_len", &self.handlers.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
