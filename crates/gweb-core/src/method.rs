//! HTTP method tokens.
//!
//! Methods are kept as plain uppercase strings so that extension methods
//! (`PROPFIND`, `PURGE`, ...) route the same way as the standard ones.

use std::cmp::Ordering;

pub const GET: &str = "GET";
pub const HEAD: &str = "HEAD";
pub const POST: &str = "POST";
pub const PUT: &str = "PUT";
pub const DELETE: &str = "DELETE";
pub const PATCH: &str = "PATCH";
pub const OPTIONS: &str = "OPTIONS";
pub const TRACE: &str = "TRACE";
pub const CONNECT: &str = "CONNECT";

/// Every standard method, as registered by [`RouterGroup::any`](crate::RouterGroup::any).
pub const ALL: [&str; 9] = [GET, POST, HEAD, OPTIONS, PUT, DELETE, TRACE, CONNECT, PATCH];

/// Returns true for a non-empty token made only of `A`-`Z`.
#[must_use]
pub fn is_valid(method: &str) -> bool {
    !method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase())
}

/// Position of a standard method in `Allow` headers.
fn rank(method: &str) -> u8 {
    match method {
        GET => 0,
        HEAD => 1,
        POST => 2,
        PUT => 3,
        DELETE => 4,
        PATCH => 5,
        TRACE => 6,
        CONNECT => 7,
        OPTIONS => 9,
        _ => 8,
    }
}

/// Stable ordering for `Allow` header values: standard methods first,
/// extension methods alphabetically, `OPTIONS` last.
pub(crate) fn allow_order(a: &str, b: &str) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
}
