//! URL path normalization.

/// Returns the canonical form of a URL path.
///
/// Works purely lexically:
/// 1. Replace multiple slashes with a single slash.
/// 2. Drop each `.` element.
/// 3. Drop each `..` element together with the element before it.
/// 4. A `..` at the root stays at the root.
///
/// The result always starts with `/`. A trailing slash is kept, and a
/// path ending in a `.` element gets one.
#[must_use]
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }

    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');

    let mut trailing = path.len() > 1 && path.ends_with('/');
    let mut segments = path.split('/').peekable();
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        match segment {
            "" => {}
            "." => trailing |= last,
            ".." => {
                if out.len() > 1 {
                    let cut = out.rfind('/').unwrap_or(0).max(1);
                    out.truncate(cut);
                }
            }
            segment => {
                if out.len() > 1 {
                    out.push('/');
                }
                out.push_str(segment);
            }
        }
    }

    if trailing && out.len() > 1 {
        out.push('/');
    }
    out
}

/// The same path with one trailing slash added or removed.
///
/// Returns `None` for the root path, which has no alternative.
#[must_use]
pub fn toggle_trailing_slash(path: &str) -> Option<String> {
    match path.strip_suffix('/') {
        Some("") => None,
        Some(stripped) => Some(stripped.to_owned()),
        None => Some(format!("{path}/")),
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_path, toggle_trailing_slash};

    #[test]
    fn toggles_trailing_slash() {
        assert_eq!(toggle_trailing_slash("/foo").as_deref(), Some("/foo/"));
        assert_eq!(toggle_trailing_slash("/foo/").as_deref(), Some("/foo"));
        assert_eq!(toggle_trailing_slash("/"), None);
    }

    #[test]
    fn already_clean() {
        for p in ["/", "/abc", "/a/b/c", "/abc/", "/a/b/c/"] {
            assert_eq!(clean_path(p), p, "path {p}");
        }
    }

    #[test]
    fn missing_root() {
        assert_eq!(clean_path(""), "/");
        assert_eq!(clean_path("abc"), "/abc");
        assert_eq!(clean_path("abc/def/"), "/abc/def/");
    }

    #[test]
    fn double_slashes() {
        assert_eq!(clean_path("//"), "/");
        assert_eq!(clean_path("//abc//def//"), "/abc/def/");
    }

    #[test]
    fn dot_elements() {
        assert_eq!(clean_path("/abc/./def"), "/abc/def");
        assert_eq!(clean_path("/./abc/def"), "/abc/def");
        assert_eq!(clean_path("/abc/."), "/abc/");
    }

    #[test]
    fn dot_dot_elements() {
        assert_eq!(clean_path("/abc/def/../ghi"), "/abc/ghi");
        assert_eq!(clean_path("/abc/../def"), "/def");
        assert_eq!(clean_path("/abc/def/.."), "/abc");
        assert_eq!(clean_path("/abc/def/../"), "/abc/");
        assert_eq!(clean_path("/abc/def/../.."), "/");
        assert_eq!(clean_path("/abc/.."), "/");
        assert_eq!(clean_path("/../abc"), "/abc");
        assert_eq!(clean_path("/.."), "/");
    }

    #[test]
    fn combined() {
        assert_eq!(clean_path("/..//Foo/./bar/"), "/Foo/bar/");
    }
}
