//! Canonical path handling.
//!
//! Routers describe path parameters as `:name`; the generated document uses
//! `{name}`. Every comparison between discovered routes, ignore-list entries,
//! category keys and annotations happens on the canonical form.

use regex::Regex;
use std::sync::OnceLock;

fn param_regex() -> &'static Regex {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    PARAM.get_or_init(|| Regex::new(r":([a-zA-Z0-9]+)").expect("valid regex"))
}

/// Rewrites every `:name` parameter token into `{name}`.
///
/// # Example
///
/// ```
/// use route_docs::path::normalize;
///
/// assert_eq!(normalize("/i/:identity/keys/:key"), "/i/{identity}/keys/{key}");
/// assert_eq!(normalize("/i/{identity}"), "/i/{identity}");
/// ```
pub fn normalize(raw_path: &str) -> String {
    param_regex().replace_all(raw_path, "{$1}").into_owned()
}

/// Number of path segments, counted as `/` separators.
///
/// The empty string (no parent) has depth zero.
pub fn segment_count(path: &str) -> usize {
    path.matches('/').count()
}

/// Ancestors of `key` strictly below `parent` and strictly above `key`,
/// shallowest first.
///
/// With no parent every ancestor from the first segment down is returned.
/// Empty segments (`//`) do not produce an ancestor.
pub fn ancestors_between(key: &str, parent: Option<&str>) -> Vec<String> {
    let floor = parent.map(str::len).unwrap_or(0);
    let bytes = key.as_bytes();

    key.char_indices()
        .filter(|&(pos, c)| c == '/' && pos > floor && bytes[pos - 1] != b'/')
        .map(|(pos, _)| key[..pos].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rewrites_params() {
        assert_eq!(normalize("/users/:id/posts/:postId"), "/users/{id}/posts/{postId}");
    }

    #[test]
    fn test_normalize_leaves_plain_paths() {
        assert_eq!(normalize("/users/list"), "/users/list");
        assert_eq!(normalize("*"), "*");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_stops_at_non_alphanumeric() {
        // underscores are not part of a parameter token
        assert_eq!(normalize("/a/:post_id"), "/a/{post}_id");
        assert_eq!(normalize("/a/:id.json"), "/a/{id}.json");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "/i/:identity",
            "/a/::b",
            "/x:y/:z",
            "/{already}/:mixed",
            "/.well-known/:resource",
            ":lead",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(segment_count(""), 0);
        assert_eq!(segment_count("/i"), 1);
        assert_eq!(segment_count("/i/{identity}/keys"), 3);
    }

    #[test]
    fn test_ancestors_without_parent() {
        assert_eq!(ancestors_between("/a/b/c", None), vec!["/a", "/a/b"]);
        assert!(ancestors_between("/a", None).is_empty());
    }

    #[test]
    fn test_ancestors_below_parent() {
        assert_eq!(ancestors_between("/a/b/c/d", Some("/a")), vec!["/a/b", "/a/b/c"]);
        assert!(ancestors_between("/a/b", Some("/a")).is_empty());
    }

    #[test]
    fn test_ancestors_skip_empty_segments() {
        assert_eq!(ancestors_between("/a//b", None), vec!["/a"]);
    }
}
