//! gweb routes HTTP requests to chains of handlers.
//!
//! - **Radix tree routing**: one compressed prefix tree per method, with
//!   `:param` and `*catch_all` segments
//! - **Path correction**: trailing-slash and case-insensitive redirects,
//!   automatic `OPTIONS`, `405 Method Not Allowed`
//! - **Cooperative chains**: handlers call [`Context::next`] to wrap the
//!   rest of the chain, middleware style
//! - **Pooled contexts**: per-request state is recycled between requests
//!
//! # Quick Start
//!
//! ```
//! use gweb::prelude::*;
//!
//! let app = App::builder()
//!     .get("/ping", handlers![|c: &mut Context| c.string(StatusCode::OK, "pong")])
//!     .get("/hello/:name", handlers![|c: &mut Context| {
//!         let body = serde_json::json!({ "name": c.param("name") });
//!         c.json(StatusCode::OK, &body).unwrap();
//!     }])
//!     .build()
//!     .unwrap();
//!
//! let resp = app.handle(Request::new("GET", "/ping"));
//! assert_eq!(resp.text(), "pong");
//! ```
//!
//! # Crate Structure
//!
//! - [`gweb_core`]: dispatcher, context, registration, configuration
//! - [`gweb_router`]: the radix tree

#![forbid(unsafe_code)]

pub use gweb_core as core;
pub use gweb_router as router;

pub use gweb_core::{
    handlers, join_paths, method, percent_decode, testing, App, AppBuilder, AppConfig, AppOption,
    BuildError, ConfigError, Context, Cookie, Extensions, Handler, Headers, Json, PanicHandler,
    Render, RenderError, Request, Response, RouteError, RouterFactory, RouterGroup, StatusCode,
    Text, UrlEncoded, Xml,
};
pub use gweb_router::{
    clean_path, toggle_trailing_slash, InsertError, Lookup, Param, Params, PathTree, Router,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::testing::TestClient;
    pub use crate::{
        handlers, App, AppConfig, AppOption, Context, Cookie, Handler, Render, Request, Response,
        RouterGroup, StatusCode,
    };
}
