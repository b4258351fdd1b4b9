//! Radix tree HTTP router.
//!
//! This crate provides the path-matching engine used by gweb: one
//! compressed prefix tree per HTTP method, with parameter capture and the
//! lookups a dispatcher needs to correct near-miss paths.
//!
//! # Features
//!
//! - Radix tree with priority-ordered static children
//! - Named parameters (`/users/:id`) and catch-alls (`/files/*path`)
//! - Trailing-slash redirect detection
//! - Case-insensitive path recovery with path cleaning

#![warn(unsafe_code)]

mod error;
mod r#match;
mod path;
mod tree;

pub use error::InsertError;
pub use r#match::{Lookup, Param, Params};
pub use path::{clean_path, toggle_trailing_slash};
pub use tree::{PathTree, Router};
