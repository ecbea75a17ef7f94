//! Path-key arithmetic.
//!
//! Node keys are `/`-separated strings, not filesystem paths. Joining follows
//! URL reference resolution (a base without a trailing slash loses its last
//! segment, dot segments collapse), while [`dirname`] and [`basename`] split
//! on the last `/` the way POSIX path helpers do.

use percent_encoding::percent_decode_str;
use url::Url;

/// Scheme used to borrow `url`'s reference resolution for plain paths.
const KEY_ROOT: &str = "wikigraph:///";

/// Resolve `reference` against `base` as a relative URL reference.
///
/// The result is absolute (leading `/`) only when `base` or `reference`
/// was. Percent-encoding introduced by the URL parser is undone, so keys
/// keep spaces and other characters verbatim; escapes already present in
/// the inputs (`%20`) stay as written.
///
/// # Examples
///
/// ```
/// use wikigraph_build::paths::join;
///
/// assert_eq!(join("Wiki", "cs/page.md"), "cs/page.md");
/// assert_eq!(join("Wiki/", "cs/page.md"), "Wiki/cs/page.md");
/// assert_eq!(join("cs/algo/sorting", "../intro"), "cs/intro");
/// assert_eq!(join("", "notes/My Page.md"), "notes/My Page.md");
/// ```
pub fn join(base: &str, reference: &str) -> String {
    if base.is_empty() {
        return reference.to_string();
    }
    if reference.is_empty() {
        return base.to_string();
    }

    let absolute = base.starts_with('/') || reference.starts_with('/');
    // Literal `%` survives the final decode as `%25`.
    let base = base.replace('%', "%25");
    let escaped = reference.replace('%', "%25");
    let anchored_base = if base.starts_with('/') {
        base
    } else {
        format!("/{base}")
    };

    let Ok(root) = Url::parse(KEY_ROOT) else {
        return reference.to_string();
    };
    let resolved = match root
        .join(&anchored_base)
        .and_then(|base_url| base_url.join(&escaped))
    {
        Ok(url) => url,
        Err(_) => return reference.to_string(),
    };
    // A reference carrying its own scheme is not a path.
    if resolved.scheme() != root.scheme() {
        return reference.to_string();
    }

    let mut out = percent_decode_str(resolved.path())
        .decode_utf8_lossy()
        .into_owned();
    if let Some(query) = resolved.query() {
        out.push('?');
        out.push_str(&percent_decode_str(query).decode_utf8_lossy());
    }

    if absolute {
        out
    } else {
        out.trim_start_matches('/').to_string()
    }
}

/// Everything before the last `/`, with trailing slashes removed.
///
/// Mirrors POSIX `dirname` on `/`-separated keys: a key without a slash has
/// an empty parent, and a run of leading slashes is its own parent.
///
/// # Examples
///
/// ```
/// use wikigraph_build::paths::dirname;
///
/// assert_eq!(dirname("cs/algo/sorting"), "cs/algo");
/// assert_eq!(dirname("sorting"), "");
/// assert_eq!(dirname("/top"), "/");
/// assert_eq!(dirname("/"), "/");
/// ```
pub fn dirname(key: &str) -> &str {
    let head = match key.rfind('/') {
        Some(i) => &key[..=i],
        None => return "",
    };
    if head.chars().all(|c| c == '/') {
        head
    } else {
        head.trim_end_matches('/')
    }
}

/// Everything after the last `/`.
///
/// # Examples
///
/// ```
/// use wikigraph_build::paths::basename;
///
/// assert_eq!(basename("cs/algo"), "algo");
/// assert_eq!(basename("cs"), "cs");
/// assert_eq!(basename("cs/"), "");
/// ```
pub fn basename(key: &str) -> &str {
    match key.rfind('/') {
        Some(i) => &key[i + 1..],
        None => key,
    }
}

/// Display title for a synthetic directory node: its last segment, or the
/// whole key when that segment is empty.
pub fn directory_title(key: &str) -> String {
    let name = basename(key);
    if name.is_empty() {
        key.to_string()
    } else {
        name.to_string()
    }
}

/// Remove a trailing document extension (`.md`, `.markdown`, ...).
///
/// # Examples
///
/// ```
/// use wikigraph_build::paths::strip_extension;
///
/// let exts = vec!["md".to_string()];
/// assert_eq!(strip_extension("cs/page.md", &exts), "cs/page");
/// assert_eq!(strip_extension("cs/page.txt", &exts), "cs/page.txt");
/// ```
pub fn strip_extension<'a>(path: &'a str, extensions: &[String]) -> &'a str {
    for ext in extensions {
        if let Some(stem) = path
            .strip_suffix(ext.as_str())
            .and_then(|rest| rest.strip_suffix('.'))
        {
            if !stem.is_empty() {
                return stem;
            }
        }
    }
    path
}

/// Canonical node key for a page: the site path joined with the page's
/// source path, extension stripped.
///
/// # Examples
///
/// ```
/// use wikigraph_build::paths::page_key;
///
/// let exts = vec!["md".to_string()];
/// assert_eq!(page_key("Wiki", "cs/page.md", &exts), "cs/page");
/// assert_eq!(page_key("Wiki/", "cs/page.md", &exts), "Wiki/cs/page");
/// ```
pub fn page_key(site_path: &str, src_uri: &str, extensions: &[String]) -> String {
    let joined = join(site_path, src_uri);
    strip_extension(&joined, extensions).to_string()
}

/// Key of the synthetic site-root node: the site path without trailing `/`.
pub fn root_key(site_path: &str) -> &str {
    site_path.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md() -> Vec<String> {
        vec!["md".to_string(), "markdown".to_string()]
    }

    #[test]
    fn join_replaces_last_segment_of_base() {
        assert_eq!(join("cs/page", "other"), "cs/other");
        assert_eq!(join("page", "other"), "other");
    }

    #[test]
    fn join_collapses_dot_segments() {
        assert_eq!(join("a/b/c", "./d"), "a/b/d");
        assert_eq!(join("a/b/c", "../d"), "a/d");
        assert_eq!(join("a/p1", "../../x"), "x");
    }

    #[test]
    fn join_keeps_absolute_paths() {
        assert_eq!(join("/docs/", "a.md"), "/docs/a.md");
        assert_eq!(join("a/b", "/x/y"), "/x/y");
        assert_eq!(join("/", "a.md"), "/a.md");
    }

    #[test]
    fn join_does_not_leak_percent_encoding() {
        assert_eq!(join("notes/today", "Big Ideas"), "notes/Big Ideas");
        assert_eq!(join("Wiki/", "réseau/é.md"), "Wiki/réseau/é.md");
    }

    #[test]
    fn join_keeps_existing_escapes() {
        assert_eq!(join("a/b", "x y%20z"), "a/x y%20z");
        assert_eq!(join("a/b", "100%"), "a/100%");
        assert_eq!(join("a/b", "c%2Fd"), "a/c%2Fd");
    }

    #[test]
    fn join_with_empty_sides() {
        assert_eq!(join("", "a/b"), "a/b");
        assert_eq!(join("a/b", ""), "a/b");
    }

    #[test]
    fn join_leaves_scheme_references_alone() {
        assert_eq!(join("a/b", "https://example.com/x"), "https://example.com/x");
    }

    #[test]
    fn dirname_matches_posix() {
        assert_eq!(dirname("a/b/c"), "a/b");
        assert_eq!(dirname("a"), "");
        assert_eq!(dirname("a//b"), "a");
        assert_eq!(dirname("a/"), "a");
        assert_eq!(dirname("//a"), "//");
        assert_eq!(dirname(""), "");
    }

    #[test]
    fn directory_title_falls_back_to_key() {
        assert_eq!(directory_title("cs/algo"), "algo");
        assert_eq!(directory_title("cs/"), "cs/");
    }

    #[test]
    fn strip_extension_only_touches_suffix() {
        assert_eq!(strip_extension("a.md/b.md", &md()), "a.md/b");
        assert_eq!(strip_extension("notes.markdown", &md()), "notes");
        assert_eq!(strip_extension(".md", &md()), ".md");
        assert_eq!(strip_extension("readme", &md()), "readme");
    }

    #[test]
    fn root_key_strips_all_trailing_slashes() {
        assert_eq!(root_key("Wiki//"), "Wiki");
        assert_eq!(root_key(""), "");
        assert_eq!(root_key("/"), "");
    }
}
