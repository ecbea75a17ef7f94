//! Wiki-link resolution.
//!
//! A target is resolved in tiers, first match wins:
//!
//! 1. `[[index]]` inside an index page refers to the page itself.
//! 2. A node key equal to the target, or ending in `/target`. Keys are
//!    scanned in insertion order, so the earliest-discovered match wins.
//! 3. The target joined against the source key as a relative reference.
//!
//! Anything else is an unresolved link. Resolved links between pages in
//! different directories are rerouted to connect the two directory nodes.

use tracing::debug;
use wikigraph_core::Diagnostic;

use crate::builder::GraphBuilder;
use crate::paths;
use crate::wikilink;

const SELF_REFERENCE: &str = "index";

/// Endpoint of a planned edge: an existing page, or a directory that may
/// still have to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Endpoint {
    Page(String),
    Directory(String),
}

impl GraphBuilder {
    /// Resolve `target` as written in the document at `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::builder::{GraphBuilder, Page};
    /// use wikigraph_core::SizingMode;
    ///
    /// let mut builder = GraphBuilder::new("", SizingMode::Depth);
    /// builder.collect_pages(&[
    ///     Page::new("cs/algo/sorting.md", "Sorting", "/cs/algo/sorting/", ""),
    ///     Page::new("cs/intro.md", "Intro", "/cs/intro/", ""),
    /// ]);
    /// let sorting = builder.resolve_target("cs/intro", "sorting");
    /// assert_eq!(sorting.as_deref(), Some("cs/algo/sorting"));
    /// let intro = builder.resolve_target("cs/algo/sorting", "../intro");
    /// assert_eq!(intro.as_deref(), Some("cs/intro"));
    /// assert_eq!(builder.resolve_target("cs/intro", "nowhere"), None);
    /// ```
    pub fn resolve_target(&self, source: &str, target: &str) -> Option<String> {
        if target == SELF_REFERENCE && self.nodes.get(source).is_some_and(|n| n.is_index) {
            return Some(source.to_string());
        }

        let suffix = format!("/{target}");
        if let Some(key) = self
            .nodes
            .keys()
            .find(|key| *key == target || key.ends_with(&suffix))
        {
            return Some(key.to_string());
        }

        let relative = paths::join(source, target);
        self.nodes.contains(&relative).then_some(relative)
    }

    /// Extract the wiki-links of the document at `source` and record the
    /// resulting edges. Returns the number of new edges.
    ///
    /// Unresolvable targets are recorded as [`Diagnostic::UnresolvedLink`].
    /// Text for a page that was never collected is recorded as
    /// [`Diagnostic::MissingSource`] and contributes nothing.
    pub fn resolve_document(&mut self, source: &str, markdown: &str) -> usize {
        if !self.nodes.contains(source) {
            self.record(Diagnostic::MissingSource {
                key: source.to_string(),
            });
            return 0;
        }

        // Plan every edge against the current key set before creating
        // any directory node.
        let mut planned = Vec::new();
        for target in wikilink::extract_targets(markdown) {
            match self.resolve_target(source, target) {
                Some(target_key) => {
                    debug!(source, target, resolved = %target_key, "resolved wikilink");
                    planned.push(route(source, &target_key));
                }
                None => self.record(Diagnostic::UnresolvedLink {
                    source: source.to_string(),
                    target: target.to_string(),
                }),
            }
        }

        let mut added = 0;
        for (from, to) in planned {
            let (Some(from), Some(to)) = (self.materialise(&from), self.materialise(&to)) else {
                continue;
            };
            if self.insert_link(from, to) {
                added += 1;
            }
        }
        added
    }

    fn materialise(&mut self, endpoint: &Endpoint) -> Option<usize> {
        match endpoint {
            Endpoint::Page(key) => self.nodes.get(key).map(|n| n.id),
            Endpoint::Directory(key) => Some(self.ensure_directory(key)),
        }
    }
}

/// Pages sharing a directory are linked directly; otherwise their
/// directories are, falling back to the page at the top level.
fn route(source: &str, target: &str) -> (Endpoint, Endpoint) {
    let source_dir = paths::dirname(source);
    let target_dir = paths::dirname(target);
    if source_dir == target_dir {
        return (
            Endpoint::Page(source.to_string()),
            Endpoint::Page(target.to_string()),
        );
    }
    let endpoint = |page: &str, dir: &str| {
        if dir.is_empty() {
            Endpoint::Page(page.to_string())
        } else {
            Endpoint::Directory(dir.to_string())
        }
    };
    (endpoint(source, source_dir), endpoint(target, target_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Page;
    use wikigraph_core::SizingMode;

    fn builder_with(pages: &[(&str, bool)]) -> GraphBuilder {
        let mut builder = GraphBuilder::new("", SizingMode::Depth);
        let pages: Vec<Page> = pages
            .iter()
            .map(|(src, index)| {
                let page = Page::new(*src, *src, format!("/{src}"), "");
                if *index {
                    page.index()
                } else {
                    page
                }
            })
            .collect();
        builder.collect_pages(&pages);
        builder
    }

    fn edges(builder: &GraphBuilder) -> Vec<(String, String)> {
        builder
            .links()
            .iter()
            .filter_map(|l| {
                let s = builder.nodes().by_id(l.source)?;
                let t = builder.nodes().by_id(l.target)?;
                Some((s.key.clone(), t.key.clone()))
            })
            .collect()
    }

    #[test]
    fn same_directory_links_pages() {
        let mut b = builder_with(&[("a/p1.md", false), ("a/p2.md", false)]);
        assert_eq!(b.resolve_document("a/p1", "[[p2]]"), 1);
        assert_eq!(edges(&b), vec![("a/p1".into(), "a/p2".into())]);
    }

    #[test]
    fn different_directories_link_directories() {
        let mut b = builder_with(&[("a/p1.md", false), ("b/p2.md", false)]);
        b.resolve_document("a/p1", "[[p2]]");
        assert_eq!(edges(&b), vec![("a".into(), "b".into())]);
        assert!(b.nodes().get("a").is_some_and(|n| n.url.is_empty()));
        assert!(b.nodes().get("b").is_some_and(|n| !n.is_index));
    }

    #[test]
    fn top_level_page_is_its_own_endpoint() {
        let mut b = builder_with(&[("home.md", false), ("b/p2.md", false)]);
        b.resolve_document("home", "[[p2]]");
        assert_eq!(edges(&b), vec![("home".into(), "b".into())]);
    }

    #[test]
    fn index_self_reference_makes_one_loop() {
        let mut b = builder_with(&[("a/index.md", true)]);
        b.resolve_document("a/index", "[[index]] and again [[index]]");
        assert_eq!(edges(&b), vec![("a/index".into(), "a/index".into())]);
    }

    #[test]
    fn index_target_in_plain_page_is_searched() {
        let mut b = builder_with(&[("a/index.md", true), ("a/p.md", false)]);
        b.resolve_document("a/p", "[[index]]");
        assert_eq!(edges(&b), vec![("a/p".into(), "a/index".into())]);
    }

    #[test]
    fn suffix_match_takes_first_in_insertion_order() {
        let b = builder_with(&[
            ("x/note.md", false),
            ("y/note.md", false),
            ("z.md", false),
        ]);
        assert_eq!(b.resolve_target("z", "note").as_deref(), Some("x/note"));
    }

    #[test]
    fn suffix_requires_segment_boundary() {
        let b = builder_with(&[("x/keynote.md", false), ("z.md", false)]);
        assert_eq!(b.resolve_target("z", "note"), None);
    }

    #[test]
    fn alias_and_section_resolve_like_plain_target() {
        let mut b = builder_with(&[("a/p1.md", false), ("a/p2.md", false)]);
        b.resolve_document("a/p1", "[[p2|Shown Text]] [[p2#Part]]");
        assert_eq!(b.links().len(), 1);
    }

    #[test]
    fn unresolved_link_is_recorded_not_raised() {
        let mut b = builder_with(&[("a/p1.md", false)]);
        assert_eq!(b.resolve_document("a/p1", "[[NoSuchPage]]"), 0);
        assert!(b.links().is_empty());
        assert_eq!(
            b.diagnostics(),
            &[Diagnostic::UnresolvedLink {
                source: "a/p1".into(),
                target: "NoSuchPage".into()
            }]
        );
    }

    #[test]
    fn unknown_source_is_recorded() {
        let mut b = builder_with(&[("a/p1.md", false)]);
        assert_eq!(b.resolve_document("ghost", "[[p1]]"), 0);
        assert_eq!(
            b.diagnostics(),
            &[Diagnostic::MissingSource { key: "ghost".into() }]
        );
    }

    #[test]
    fn rerouted_edges_are_deduplicated() {
        let mut b = builder_with(&[
            ("a/p1.md", false),
            ("a/p3.md", false),
            ("b/p2.md", false),
            ("b/p4.md", false),
        ]);
        b.resolve_document("a/p1", "[[p2]] [[p4]]");
        b.resolve_document("a/p3", "[[p2]]");
        assert_eq!(edges(&b), vec![("a".into(), "b".into())]);
    }

    #[test]
    fn directory_nodes_get_later_ids() {
        let mut b = builder_with(&[("a/p1.md", false), ("b/p2.md", false)]);
        b.resolve_document("a/p1", "[[p2]]");
        assert_eq!(b.nodes().get("a").map(|n| n.id), Some(2));
        assert_eq!(b.nodes().get("b").map(|n| n.id), Some(3));
    }

    #[test]
    fn lazily_created_directory_can_be_a_target() {
        let mut b = builder_with(&[
            ("a/p1.md", false),
            ("b/p2.md", false),
            ("c/p3.md", false),
        ]);
        b.resolve_document("a/p1", "[[p2]]");
        // `b` now exists as a directory node and matches exactly.
        b.resolve_document("c/p3", "[[b]]");
        assert!(edges(&b).contains(&("c".into(), "b".into())));
    }

    #[test]
    fn route_same_and_different_dirs() {
        assert_eq!(
            route("a/x", "a/y"),
            (Endpoint::Page("a/x".into()), Endpoint::Page("a/y".into()))
        );
        assert_eq!(
            route("a/x", "b/c/y"),
            (Endpoint::Directory("a".into()), Endpoint::Directory("b/c".into()))
        );
    }
}
