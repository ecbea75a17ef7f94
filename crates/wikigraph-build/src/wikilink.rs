//! Wiki-link extraction.
//!
//! Recognises `[[target]]`, `[[target|alias]]`, `[[target#section]]` and
//! `[[target|alias#section]]`. Only the target is kept.

use std::sync::LazyLock;

use regex::Regex;

const WIKILINK_PATTERN: &str = r"\[\[([^\]|#]+)(?:\|[^\]]+)?(?:#[^\]]+)?\]\]";

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(WIKILINK_PATTERN).unwrap_or_else(|_| panic!("invalid wikilink pattern"))
});

/// Extract every wiki-link target from `markdown`, in document order.
///
/// Targets are trimmed; whitespace-only targets are dropped. Repeated links
/// are returned repeatedly, deduplication happens on edges.
///
/// # Examples
///
/// ```
/// use wikigraph_build::wikilink::extract_targets;
///
/// let text = "See [[Sorting]], [[graphs/BFS|breadth first]] and [[Heap#insert]].";
/// assert_eq!(extract_targets(text), vec!["Sorting", "graphs/BFS", "Heap"]);
/// ```
pub fn extract_targets(markdown: &str) -> Vec<&str> {
    WIKILINK_RE
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|target| !target.is_empty())
        .collect()
}
