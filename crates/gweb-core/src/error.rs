//! Error types.

use gweb_router::InsertError;
use thiserror::Error;

/// A route that could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The method token is empty or not all uppercase letters.
    #[error("http method '{method}' is not valid in path '{path}'")]
    InvalidMethod { method: String, path: String },

    /// No handler was given for the route.
    #[error("route {method} {path} needs at least one handler")]
    EmptyHandlers { method: String, path: String },

    /// The router rejected the pattern.
    #[error("cannot register {method} {path}: {source}")]
    Insert {
        method: String,
        path: String,
        #[source]
        source: InsertError,
    },
}

/// Every registration failure found while building an [`App`](crate::App).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} route(s) failed to register{}", .errors.len(), list(.errors))]
pub struct BuildError {
    errors: Vec<RouteError>,
}

impl BuildError {
    pub(crate) fn new(errors: Vec<RouteError>) -> Self {
        Self { errors }
    }

    /// The individual failures, in registration order.
    #[must_use]
    pub fn errors(&self) -> &[RouteError] {
        &self.errors
    }
}

fn list(errors: &[RouteError]) -> String {
    errors.iter().map(|err| format!("\n  - {err}")).collect()
}

/// A renderer could not produce its body.
#[derive(Debug, Error)]
pub enum RenderError {
    /// JSON serialization failed.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// XML serialization failed.
    #[error("failed to encode XML: {0}")]
    Xml(String),

    /// A custom renderer failed.
    #[error("render failed: {0}")]
    Custom(String),
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document is malformed or has wrong field types.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_error_lists_every_failure() {
        let err = BuildError::new(vec![
            RouteError::InvalidMethod {
                method: "get".into(),
                path: "/".into(),
            },
            RouteError::Insert {
                method: "GET".into(),
                path: "/user/:name".into(),
                source: InsertError::DuplicateRoute {
                    path: "/user/:name".into(),
                },
            },
        ]);
        let text = err.to_string();
        assert!(text.starts_with("2 route(s) failed to register"));
        assert!(text.contains("http method 'get' is not valid"));
        assert!(text.contains("cannot register GET /user/:name"));
    }
}
