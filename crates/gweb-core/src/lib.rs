//! Core types for gweb.
//!
//! This crate wires the [`gweb_router`] trees into a request dispatcher:
//!
//! - [`AppBuilder`] / [`RouterGroup`]: route registration with shared
//!   prefixes and handler chains
//! - [`App`]: the sealed dispatcher, with trailing-slash and fixed-path
//!   redirects, automatic `OPTIONS`, `405` and `404` handling
//! - [`Context`]: per-request state and the `next` handler cursor
//! - [`Render`]: response body encoders
//! - [`testing`]: an in-process client for tests
//!
//! # Design Principles
//!
//! - Routes are validated once, when the app is built; an [`App`] never
//!   changes afterwards and can be shared across threads
//! - Contexts are pooled and reset between requests
//! - The transport is someone else's job: requests arrive already parsed

#![forbid(unsafe_code)]

mod app;
mod config;
mod context;
mod cookie;
mod error;
mod extensions;
mod group;
pub mod method;
mod pool;
mod render;
mod request;
mod response;
mod routes;
pub mod testing;
mod urlencoded;

pub use app::{App, AppBuilder};
pub use config::{AppConfig, AppOption, PanicHandler, DEFAULT_MAX_IDLE_CONTEXTS};
pub use context::{Context, Handler};
pub use cookie::Cookie;
pub use error::{BuildError, ConfigError, RenderError, RouteError};
pub use extensions::Extensions;
pub use group::{join_paths, RouterGroup};
pub use render::{Json, Render, Text, Xml, APPLICATION_JSON, APPLICATION_XML, TEXT_PLAIN};
pub use request::{Headers, Request};
pub use response::{Response, StatusCode};
pub use routes::RouterFactory;
pub use urlencoded::{percent_decode, UrlEncoded};

pub use gweb_router::{InsertError, Lookup, Param, Params, PathTree, Router};
