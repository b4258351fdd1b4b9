//! Route insertion errors.

use thiserror::Error;

/// Reasons a pattern cannot be added to a [`PathTree`](crate::PathTree).
///
/// All of these are setup-time failures; lookups never produce them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The pattern does not begin with `/`.
    #[error("path must begin with '/' in path '{path}'")]
    MissingLeadingSlash { path: String },

    /// No handlers were supplied for the route.
    #[error("there must be at least one handler for path '{path}'")]
    EmptyHandlers { path: String },

    /// A `:` or `*` is not followed by a name.
    #[error("wildcards must be named with a non-empty name in path '{path}'")]
    UnnamedWildcard { path: String },

    /// More than one wildcard in a single segment, e.g. `/:a:b`.
    #[error("only one wildcard per path segment is allowed, has: '{segment}' in path '{path}'")]
    TooManyWildcards { segment: String, path: String },

    /// A catch-all appears before the final segment.
    #[error("catch-all routes are only allowed at the end of the path in path '{path}'")]
    CatchAllNotLast { path: String },

    /// A catch-all does not directly follow a `/`.
    #[error("no / before catch-all in path '{path}'")]
    CatchAllWithoutSlash { path: String },

    /// A dynamic segment clashes with an existing one at the same position.
    #[error("'{segment}' in new path '{path}' conflicts with existing wildcard '{existing}'")]
    WildcardConflict {
        segment: String,
        existing: String,
        path: String,
    },

    /// The exact pattern was registered before.
    #[error("a handler is already registered for path '{path}'")]
    DuplicateRoute { path: String },
}
