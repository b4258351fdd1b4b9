//! Radix tree implementation.
//!
//! Each node owns a byte prefix. Static children are keyed by the first
//! byte of their prefix and kept sorted by descending priority, the
//! number of routes reachable through them. A node has at most one
//! dynamic child, either a `:param` or a trailing `*catch_all`.
//!
//! ```text
//! /search/            ┐
//! /support            ├─ root ─ "/" ┬─ "s" ┬─ "earch/"
//! /blog/:post/        ┘             │      └─ "upport"
//!                                   └─ "blog/" ─ :post ─ "/"
//! ```

use std::fmt;
use std::mem;
use std::sync::Arc;

use memchr::memchr;

use crate::error::InsertError;
use crate::path::{clean_path, toggle_trailing_slash};
use crate::r#match::{Lookup, Params};

/// The routing capability a dispatcher needs from one method's table.
///
/// [`PathTree`] is the stock implementation; any type honouring the same
/// contract can replace it.
pub trait Router<H>: Send + Sync {
    /// Register a handler chain for a pattern.
    fn add(&mut self, path: &str, handlers: Arc<[H]>) -> Result<(), InsertError>;

    /// Look up `path`, appending captured parameters to `params`.
    ///
    /// On a miss `params` is left as it was passed in.
    fn find(&self, path: &str, params: &mut Params) -> Lookup<H>;

    /// Case-insensitive lookup of a cleaned path.
    ///
    /// Returns the registered spelling of the path when one matches.
    fn find_case_insensitive_path(&self, path: &str, fix_trailing_slash: bool) -> Option<String>;

    /// Number of registered routes.
    fn route_count(&self) -> usize;
}

#[derive(Clone, PartialEq, Eq)]
enum Kind {
    Static,
    Param(Arc<str>),
    CatchAll(Arc<str>),
}

struct Node<H> {
    prefix: Vec<u8>,
    kind: Kind,
    indices: Vec<u8>,
    children: Vec<Node<H>>,
    wild: Option<Box<Node<H>>>,
    priority: u32,
    handlers: Option<Arc<[H]>>,
}

impl<H> Node<H> {
    fn with_kind(kind: Kind, prefix: Vec<u8>) -> Self {
        Self {
            prefix,
            kind,
            indices: Vec::new(),
            children: Vec::new(),
            wild: None,
            priority: 0,
            handlers: None,
        }
    }

    fn child_position(&self, first: u8) -> Option<usize> {
        self.indices.iter().position(|&b| b == first)
    }

    /// Split off `prefix[at..]` into a new single child that inherits
    /// everything this node carried.
    fn split(&mut self, at: usize) {
        let suffix = Node {
            prefix: self.prefix.split_off(at),
            kind: Kind::Static,
            indices: mem::take(&mut self.indices),
            children: mem::take(&mut self.children),
            wild: self.wild.take(),
            priority: self.priority,
            handlers: self.handlers.take(),
        };
        self.indices = vec![suffix.prefix[0]];
        self.children = vec![suffix];
    }

    /// Bump a child's priority and move it ahead of lighter siblings.
    /// Returns the child's new position.
    fn increment_child_priority(&mut self, pos: usize) -> usize {
        self.children[pos].priority += 1;
        let priority = self.children[pos].priority;

        let mut new_pos = pos;
        while new_pos > 0 && self.children[new_pos - 1].priority < priority {
            self.children.swap(new_pos - 1, new_pos);
            self.indices.swap(new_pos - 1, new_pos);
            new_pos -= 1;
        }
        new_pos
    }

    fn wildcard_label(&self) -> String {
        match &self.kind {
            Kind::Static => String::from_utf8_lossy(&self.prefix).into_owned(),
            Kind::Param(name) => format!(":{name}"),
            Kind::CatchAll(name) => format!("*{name}"),
        }
    }
}

#[derive(Clone, Copy)]
enum Piece<'p> {
    Static(&'p [u8]),
    Param(&'p str),
    CatchAll(&'p str),
}

impl Piece<'_> {
    fn label(self) -> String {
        match self {
            Piece::Static(text) => String::from_utf8_lossy(text).into_owned(),
            Piece::Param(name) => format!(":{name}"),
            Piece::CatchAll(name) => format!("*{name}"),
        }
    }

    fn same_wildcard(self, kind: &Kind) -> bool {
        match (self, kind) {
            (Piece::Param(a), Kind::Param(b)) | (Piece::CatchAll(a), Kind::CatchAll(b)) => a == &**b,
            _ => false,
        }
    }
}

/// Split a pattern into literal runs and named wildcards.
fn parse_pattern(path: &str) -> Result<Vec<Piece<'_>>, InsertError> {
    let bytes = path.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c != b':' && c != b'*' {
            i += 1;
            continue;
        }
        if start < i {
            pieces.push(Piece::Static(&bytes[start..i]));
        }

        let end = memchr(b'/', &bytes[i + 1..]).map_or(bytes.len(), |n| i + 1 + n);
        let name = &path[i + 1..end];
        if name.is_empty() {
            return Err(InsertError::UnnamedWildcard {
                path: path.to_owned(),
            });
        }
        if name.contains([':', '*']) {
            return Err(InsertError::TooManyWildcards {
                segment: path[i..end].to_owned(),
                path: path.to_owned(),
            });
        }

        if c == b':' {
            pieces.push(Piece::Param(name));
        } else {
            if end != bytes.len() {
                return Err(InsertError::CatchAllNotLast {
                    path: path.to_owned(),
                });
            }
            if i == 0 || bytes[i - 1] != b'/' {
                return Err(InsertError::CatchAllWithoutSlash {
                    path: path.to_owned(),
                });
            }
            pieces.push(Piece::CatchAll(name));
        }

        start = end;
        i = end;
    }

    if start < bytes.len() {
        pieces.push(Piece::Static(&bytes[start..]));
    }
    Ok(pieces)
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// A compressed prefix tree mapping path patterns to handler chains.
///
/// One tree serves one HTTP method. Patterns support:
///
/// - `:name` matches one non-empty path segment
/// - `*name` matches the rest of the path, must come last and follow `/`
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gweb_router::{Params, PathTree, Router};
///
/// let mut tree = PathTree::new();
/// tree.add("/users/:id", Arc::from(vec!["show_user"])).unwrap();
///
/// let mut params = Params::new();
/// let found = tree.find("/users/42", &mut params);
/// assert_eq!(found.handlers.as_deref(), Some(&["show_user"][..]));
/// assert_eq!(params.get("id"), Some("42"));
/// ```
pub struct PathTree<H> {
    root: Node<H>,
}

impl<H> PathTree<H> {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::with_kind(Kind::Static, Vec::new()),
        }
    }

    /// Insert a route.
    ///
    /// The pattern is checked against the existing tree before anything is
    /// modified, so a rejected pattern leaves the tree untouched.
    pub fn insert(&mut self, path: &str, handlers: Arc<[H]>) -> Result<(), InsertError> {
        if !path.starts_with('/') {
            return Err(InsertError::MissingLeadingSlash {
                path: path.to_owned(),
            });
        }
        if handlers.is_empty() {
            return Err(InsertError::EmptyHandlers {
                path: path.to_owned(),
            });
        }

        let pieces = parse_pattern(path)?;
        self.check_conflicts(&pieces, path)?;
        self.insert_pieces(&pieces, handlers);
        tracing::trace!(path, routes = self.root.priority, "route inserted");
        Ok(())
    }

    fn check_conflicts(&self, pieces: &[Piece<'_>], path: &str) -> Result<(), InsertError> {
        let mut node = &self.root;
        for &piece in pieces {
            match piece {
                Piece::Static(mut text) => {
                    while let Some(&first) = text.first() {
                        let Some(pos) = node.child_position(first) else {
                            return Ok(());
                        };
                        let child = &node.children[pos];
                        let common = common_prefix(&child.prefix, text);
                        if common < child.prefix.len() {
                            return Ok(());
                        }
                        text = &text[common..];
                        node = child;
                    }
                }
                Piece::Param(_) | Piece::CatchAll(_) => {
                    let Some(wild) = node.wild.as_deref() else {
                        return Ok(());
                    };
                    if !piece.same_wildcard(&wild.kind) {
                        return Err(InsertError::WildcardConflict {
                            segment: piece.label(),
                            existing: wild.wildcard_label(),
                            path: path.to_owned(),
                        });
                    }
                    node = wild;
                }
            }
        }

        if node.handlers.is_some() {
            return Err(InsertError::DuplicateRoute {
                path: path.to_owned(),
            });
        }
        Ok(())
    }

    fn insert_pieces(&mut self, pieces: &[Piece<'_>], handlers: Arc<[H]>) {
        let mut node = &mut self.root;
        node.priority += 1;

        for &piece in pieces {
            match piece {
                Piece::Static(mut text) => {
                    while let Some(&first) = text.first() {
                        let pos = if let Some(pos) = node.child_position(first) {
                            let child = &mut node.children[pos];
                            let common = common_prefix(&child.prefix, text);
                            if common < child.prefix.len() {
                                child.split(common);
                            }
                            text = &text[common..];
                            pos
                        } else {
                            node.indices.push(first);
                            node.children
                                .push(Node::with_kind(Kind::Static, text.to_vec()));
                            text = &[];
                            node.children.len() - 1
                        };
                        let pos = node.increment_child_priority(pos);
                        node = &mut node.children[pos];
                    }
                }
                Piece::Param(name) | Piece::CatchAll(name) => {
                    let kind = match piece {
                        Piece::CatchAll(_) => Kind::CatchAll(Arc::from(name)),
                        _ => Kind::Param(Arc::from(name)),
                    };
                    let wild = node
                        .wild
                        .get_or_insert_with(|| Box::new(Node::with_kind(kind, Vec::new())));
                    wild.priority += 1;
                    node = &mut **wild;
                }
            }
        }

        node.handlers = Some(handlers);
    }

    /// Look up a path.
    ///
    /// Static children are tried first, then the param child, then the
    /// catch-all child; a failed branch gives back whatever it captured.
    pub fn lookup(&self, path: &str, params: &mut Params) -> Lookup<H> {
        let mark = params.len();
        if let Some(handlers) = search(&self.root, path.as_bytes(), params) {
            return Lookup {
                handlers: Some(Arc::clone(handlers)),
                tsr: false,
            };
        }
        params.truncate(mark);

        if toggle_trailing_slash(path).is_some_and(|alt| self.has_route(&alt)) {
            Lookup {
                handlers: None,
                tsr: true,
            }
        } else {
            Lookup::miss()
        }
    }

    fn has_route(&self, path: &str) -> bool {
        let mut scratch = Params::new();
        search(&self.root, path.as_bytes(), &mut scratch).is_some()
    }

    /// Case-insensitive lookup, see [`Router::find_case_insensitive_path`].
    #[must_use]
    pub fn lookup_case_insensitive(&self, path: &str, fix_trailing_slash: bool) -> Option<String> {
        let cleaned = clean_path(path);
        let mut buf = Vec::with_capacity(cleaned.len() + 1);
        if search_case_insensitive(&self.root, cleaned.as_bytes(), &mut buf) {
            return String::from_utf8(buf).ok();
        }

        if fix_trailing_slash {
            if let Some(alt) = toggle_trailing_slash(&cleaned) {
                buf.clear();
                if search_case_insensitive(&self.root, alt.as_bytes(), &mut buf) {
                    return String::from_utf8(buf).ok();
                }
            }
        }
        None
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.priority as usize
    }

    /// Returns true if no route was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.priority == 0
    }
}

impl<H> Default for PathTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for PathTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTree")
            .field("routes", &self.len())
            .finish_non_exhaustive()
    }
}

impl<H: Send + Sync> Router<H> for PathTree<H> {
    fn add(&mut self, path: &str, handlers: Arc<[H]>) -> Result<(), InsertError> {
        self.insert(path, handlers)
    }

    fn find(&self, path: &str, params: &mut Params) -> Lookup<H> {
        self.lookup(path, params)
    }

    fn find_case_insensitive_path(&self, path: &str, fix_trailing_slash: bool) -> Option<String> {
        self.lookup_case_insensitive(path, fix_trailing_slash)
    }

    fn route_count(&self) -> usize {
        self.len()
    }
}

/// `path` is the remainder of the request path before `node` consumes
/// its part of it.
fn search<'t, H>(node: &'t Node<H>, path: &[u8], params: &mut Params) -> Option<&'t Arc<[H]>> {
    let rest = match &node.kind {
        Kind::Static => {
            if !path.starts_with(&node.prefix) {
                return None;
            }
            &path[node.prefix.len()..]
        }
        Kind::Param(name) => {
            let end = memchr(b'/', path).unwrap_or(path.len());
            if end == 0 {
                return None;
            }
            params.push(Arc::clone(name), String::from_utf8_lossy(&path[..end]));
            &path[end..]
        }
        Kind::CatchAll(name) => {
            params.push(Arc::clone(name), String::from_utf8_lossy(path));
            return node.handlers.as_ref();
        }
    };

    if rest.is_empty() {
        if let Some(handlers) = &node.handlers {
            return Some(handlers);
        }
    } else if let Some(pos) = node.child_position(rest[0]) {
        let mark = params.len();
        if let Some(handlers) = search(&node.children[pos], rest, params) {
            return Some(handlers);
        }
        params.truncate(mark);
    }

    if let Some(wild) = node.wild.as_deref() {
        let mark = params.len();
        if let Some(handlers) = search(wild, rest, params) {
            return Some(handlers);
        }
        params.truncate(mark);
    }
    None
}

fn search_case_insensitive<H>(node: &Node<H>, path: &[u8], out: &mut Vec<u8>) -> bool {
    let rest = match &node.kind {
        Kind::Static => {
            let n = node.prefix.len();
            if path.len() < n || !path[..n].eq_ignore_ascii_case(&node.prefix) {
                return false;
            }
            out.extend_from_slice(&node.prefix);
            &path[n..]
        }
        Kind::Param(_) => {
            let end = memchr(b'/', path).unwrap_or(path.len());
            if end == 0 {
                return false;
            }
            out.extend_from_slice(&path[..end]);
            &path[end..]
        }
        Kind::CatchAll(_) => {
            out.extend_from_slice(path);
            return node.handlers.is_some();
        }
    };

    if rest.is_empty() && node.handlers.is_some() {
        return true;
    }

    if let Some(first) = rest.first() {
        for (pos, index) in node.indices.iter().enumerate() {
            if !index.eq_ignore_ascii_case(first) {
                continue;
            }
            let mark = out.len();
            if search_case_insensitive(&node.children[pos], rest, out) {
                return true;
            }
            out.truncate(mark);
        }
    }

    if let Some(wild) = node.wild.as_deref() {
        let mark = out.len();
        if search_case_insensitive(wild, rest, out) {
            return true;
        }
        out.truncate(mark);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(id: u32) -> Arc<[u32]> {
        Arc::from(vec![id])
    }

    fn build(routes: &[&str]) -> PathTree<u32> {
        let mut tree = PathTree::new();
        for (id, route) in (0u32..).zip(routes) {
            tree.insert(route, chain(id))
                .unwrap_or_else(|e| panic!("insert {route}: {e}"));
        }
        tree
    }

    /// Returns the matched route id and captured pairs.
    fn lookup(tree: &PathTree<u32>, path: &str) -> (Option<u32>, Vec<(String, String)>, bool) {
        let mut params = Params::new();
        let found = tree.lookup(path, &mut params);
        let pairs = params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        (found.handlers.map(|h| h[0]), pairs, found.tsr)
    }

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    #[test]
    fn rejects_missing_leading_slash() {
        let mut tree = PathTree::new();
        let err = tree.insert("users", chain(0)).unwrap_err();
        assert!(matches!(err, InsertError::MissingLeadingSlash { .. }));
    }

    #[test]
    fn rejects_empty_handler_chain() {
        let mut tree: PathTree<u32> = PathTree::new();
        let err = tree.insert("/users", Arc::from(Vec::new())).unwrap_err();
        assert!(matches!(err, InsertError::EmptyHandlers { .. }));
    }

    #[test]
    fn rejects_malformed_wildcards() {
        let mut tree = PathTree::new();
        assert!(matches!(
            tree.insert("/user/:", chain(0)),
            Err(InsertError::UnnamedWildcard { .. })
        ));
        assert!(matches!(
            tree.insert("/src/*", chain(0)),
            Err(InsertError::UnnamedWildcard { .. })
        ));
        assert!(matches!(
            tree.insert("/:a:b", chain(0)),
            Err(InsertError::TooManyWildcards { .. })
        ));
        assert!(matches!(
            tree.insert("/:a*b", chain(0)),
            Err(InsertError::TooManyWildcards { .. })
        ));
        assert!(matches!(
            tree.insert("/src/*path/more", chain(0)),
            Err(InsertError::CatchAllNotLast { .. })
        ));
        assert!(matches!(
            tree.insert("/src*path", chain(0)),
            Err(InsertError::CatchAllWithoutSlash { .. })
        ));
        assert!(tree.is_empty());
    }

    #[test]
    fn rejects_param_name_conflict() {
        let mut tree = build(&["/user/:id"]);
        let err = tree.insert("/user/:name", chain(1)).unwrap_err();
        assert_eq!(
            err,
            InsertError::WildcardConflict {
                segment: ":name".into(),
                existing: ":id".into(),
                path: "/user/:name".into(),
            }
        );
        // Deeper routes below the conflicting name are rejected too.
        assert!(tree.insert("/user/:name/posts", chain(2)).is_err());
        assert!(tree.insert("/user/:id/posts", chain(3)).is_ok());
    }

    #[test]
    fn rejects_param_and_catch_all_at_same_position() {
        let mut tree = build(&["/files/:name"]);
        assert!(matches!(
            tree.insert("/files/*rest", chain(1)),
            Err(InsertError::WildcardConflict { .. })
        ));

        let mut tree = build(&["/src/*path"]);
        assert!(matches!(
            tree.insert("/src/*other", chain(1)),
            Err(InsertError::WildcardConflict { .. })
        ));
        assert!(matches!(
            tree.insert("/src/:file", chain(1)),
            Err(InsertError::WildcardConflict { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_routes() {
        let mut tree = build(&["/", "/doc/", "/user/:id", "/src/*path"]);
        for route in ["/", "/doc/", "/user/:id", "/src/*path"] {
            assert!(
                matches!(
                    tree.insert(route, chain(9)),
                    Err(InsertError::DuplicateRoute { .. })
                ),
                "route {route}"
            );
        }
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn failed_insert_leaves_tree_unchanged() {
        let mut tree = build(&["/user/:id"]);
        let _ = tree.insert("/user/:name", chain(1));
        assert_eq!(tree.len(), 1);
        assert_eq!(lookup(&tree, "/user/7").0, Some(0));
    }

    #[test]
    fn static_and_param_siblings_coexist() {
        let tree = build(&["/user/new", "/user/:id", "/user/:id/edit"]);
        assert_eq!(lookup(&tree, "/user/new").0, Some(0));
        assert_eq!(lookup(&tree, "/user/newer"), (Some(1), pairs(&[("id", "newer")]), false));
        assert_eq!(lookup(&tree, "/user/7/edit"), (Some(2), pairs(&[("id", "7")]), false));
    }

    #[test]
    fn priorities_order_static_children() {
        let tree = build(&["/a", "/b/1", "/b/2", "/b/3"]);
        let slash = &tree.root.children[0];
        assert_eq!(slash.prefix, b"/");
        assert_eq!(slash.indices, b"ba");
        assert_eq!(slash.children[0].priority, 3);
        assert_eq!(slash.children[1].priority, 1);
        assert_eq!(tree.root.priority, 4);
    }

    #[test]
    fn split_keeps_existing_handlers() {
        let tree = build(&["/contact", "/co", "/c"]);
        assert_eq!(lookup(&tree, "/contact").0, Some(0));
        assert_eq!(lookup(&tree, "/co").0, Some(1));
        assert_eq!(lookup(&tree, "/c").0, Some(2));
        assert_eq!(lookup(&tree, "/con").0, None);
    }

    #[test]
    fn multibyte_prefixes_split_cleanly() {
        let tree = build(&["/é", "/è", "/café/:id"]);
        assert_eq!(lookup(&tree, "/é").0, Some(0));
        assert_eq!(lookup(&tree, "/è").0, Some(1));
        assert_eq!(lookup(&tree, "/café/ü"), (Some(2), pairs(&[("id", "ü")]), false));
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[test]
    fn param_round_trip() {
        let tree = build(&["/a/:x/b"]);
        assert_eq!(lookup(&tree, "/a/5/b"), (Some(0), pairs(&[("x", "5")]), false));
        assert_eq!(lookup(&tree, "/a//b").0, None);
        assert_eq!(lookup(&tree, "/a/5/c").0, None);
    }

    #[test]
    fn params_in_declaration_order() {
        let tree = build(&["/org/:org/repo/:repo/issue/:n"]);
        assert_eq!(
            lookup(&tree, "/org/rust/repo/cargo/issue/12"),
            (
                Some(0),
                pairs(&[("org", "rust"), ("repo", "cargo"), ("n", "12")]),
                false
            )
        );
    }

    #[test]
    fn param_inside_segment() {
        let tree = build(&["/user_:name", "/user_:name/about"]);
        assert_eq!(lookup(&tree, "/user_gopher"), (Some(0), pairs(&[("name", "gopher")]), false));
        assert_eq!(lookup(&tree, "/user_gopher/about").0, Some(1));
    }

    #[test]
    fn catch_all_captures_remainder() {
        let tree = build(&["/files/*rest"]);
        assert_eq!(
            lookup(&tree, "/files/a/b/c"),
            (Some(0), pairs(&[("rest", "a/b/c")]), false)
        );
        assert_eq!(lookup(&tree, "/files/"), (Some(0), pairs(&[("rest", "")]), false));
        assert_eq!(lookup(&tree, "/files"), (None, Vec::new(), true));
    }

    #[test]
    fn backtracks_from_static_into_param() {
        let tree = build(&["/src/lib/mod", "/src/:dir/main"]);
        assert_eq!(lookup(&tree, "/src/lib/mod").0, Some(0));
        assert_eq!(lookup(&tree, "/src/lib/main"), (Some(1), pairs(&[("dir", "lib")]), false));
    }

    #[test]
    fn param_then_catch_all() {
        let tree = build(&["/a/:b/c", "/a/:b/d/*rest"]);
        assert_eq!(
            lookup(&tree, "/a/x/d/e/f"),
            (Some(1), pairs(&[("b", "x"), ("rest", "e/f")]), false)
        );
        // A failed branch leaves no stale captures behind.
        assert_eq!(lookup(&tree, "/a/x/zzz"), (None, Vec::new(), false));
    }

    #[test]
    fn root_route() {
        let tree = build(&["/", "/:page"]);
        assert_eq!(lookup(&tree, "/").0, Some(0));
        assert_eq!(lookup(&tree, "/home"), (Some(1), pairs(&[("page", "home")]), false));
    }

    #[test]
    fn miss_returns_nothing() {
        let tree = build(&["/hi"]);
        assert_eq!(lookup(&tree, "/nope"), (None, Vec::new(), false));
        let empty: PathTree<u32> = PathTree::new();
        assert_eq!(lookup(&empty, "/"), (None, Vec::new(), false));

        let mut params = Params::new();
        let found = tree.lookup("/nope", &mut params);
        assert!(!found.is_match());
        let miss = Lookup::<u32>::miss();
        assert_eq!((found.handlers, found.tsr), (miss.handlers, miss.tsr));
    }

    #[test]
    fn trailing_slash_recommendation() {
        let tree = build(&[
            "/hi",
            "/b/",
            "/search/:query",
            "/cmd/:tool/",
            "/src/*filepath",
            "/doc/",
            "/no/a",
        ]);

        for path in ["/hi/", "/b", "/search/gopher/", "/cmd/vet", "/src", "/doc"] {
            let (found, params, tsr) = lookup(&tree, path);
            assert_eq!(found, None, "path {path}");
            assert!(params.is_empty(), "path {path}");
            assert!(tsr, "expected tsr for {path}");
        }

        for path in ["/", "/no", "/no/", "/no/a/b", "/_", "/search/", "/cmd/"] {
            let (found, _, tsr) = lookup(&tree, path);
            assert_eq!(found, None, "path {path}");
            assert!(!tsr, "unexpected tsr for {path}");
        }
    }

    // ========================================================================
    // Case-insensitive lookup
    // ========================================================================

    #[test]
    fn case_insensitive_restores_registered_case() {
        let tree = build(&["/Foo", "/doc/Go_FAQ.html", "/user/:name/Profile", "/src/*path"]);

        let cases = [
            ("/foo", Some("/Foo")),
            ("/FOO", Some("/Foo")),
            ("/DOC/go_faq.HTML", Some("/doc/Go_FAQ.html")),
            ("/USER/Gopher/profile", Some("/user/Gopher/Profile")),
            ("/SRC/Some/File.rs", Some("/src/Some/File.rs")),
            ("/..//foo", Some("/Foo")),
            ("/bar", None),
        ];
        for (path, expected) in cases {
            assert_eq!(
                tree.lookup_case_insensitive(path, false).as_deref(),
                expected,
                "path {path}"
            );
        }
    }

    #[test]
    fn case_insensitive_trailing_slash_fix() {
        let tree = build(&["/Foo", "/Bar/"]);
        assert_eq!(tree.lookup_case_insensitive("/foo/", false), None);
        assert_eq!(
            tree.lookup_case_insensitive("/foo/", true).as_deref(),
            Some("/Foo")
        );
        assert_eq!(
            tree.lookup_case_insensitive("/BAR", true).as_deref(),
            Some("/Bar/")
        );
    }

    #[test]
    fn case_insensitive_prefers_any_matching_branch() {
        let tree = build(&["/ab/x", "/AB/y"]);
        assert_eq!(
            tree.lookup_case_insensitive("/ab/Y", false).as_deref(),
            Some("/AB/y")
        );
    }
}
