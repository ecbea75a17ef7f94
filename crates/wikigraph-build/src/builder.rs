//! The graph builder for one build generation.
//!
//! A [`GraphBuilder`] owns every piece of graph state: ids, nodes, links,
//! categories and the diagnostics recorded along the way. Starting a new
//! generation means constructing a new builder. Link resolution, hierarchy
//! backfill and export are implemented in their own modules as further
//! `impl GraphBuilder` blocks.

use tracing::{debug, info, warn};
use wikigraph_core::{Diagnostic, SizingMode};

use crate::paths;
use crate::sizing::{policy_for, SizingPolicy};
use crate::store::{CategoryRegistry, IdentityRegistry, LinkSet, Node, NodeKind, NodeStore};

/// Default graph document location, relative to the site output directory.
pub const DEFAULT_OUTPUT: &str = "assets/js/graph.json";

/// A document supplied by the host.
///
/// # Examples
///
/// ```
/// use wikigraph_build::builder::Page;
///
/// let page = Page::new("cs/sorting.md", "Sorting", "/cs/sorting/", "See [[Heap]].");
/// assert!(!page.is_index);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Path relative to the docs directory, `/`-separated.
    pub src_uri: String,
    pub title: String,
    /// Rendered URL of the page.
    pub abs_url: String,
    /// Raw document text.
    pub markdown: String,
    /// Entry page of its directory.
    pub is_index: bool,
}

impl Page {
    pub fn new(
        src_uri: impl Into<String>,
        title: impl Into<String>,
        abs_url: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            src_uri: src_uri.into(),
            title: title.into(),
            abs_url: abs_url.into(),
            markdown: markdown.into(),
            is_index: false,
        }
    }

    /// Mark the page as its directory's entry page.
    pub fn index(mut self) -> Self {
        self.is_index = true;
        self
    }
}

/// In-memory graph for one build generation.
///
/// # Examples
///
/// ```
/// use wikigraph_build::builder::{GraphBuilder, Page};
/// use wikigraph_core::SizingMode;
///
/// let mut builder = GraphBuilder::new("", SizingMode::Depth);
/// builder.collect_pages(&[
///     Page::new("a/p1.md", "P1", "/a/p1/", "links to [[p2]]"),
///     Page::new("a/p2.md", "P2", "/a/p2/", ""),
/// ]);
/// builder.resolve_document("a/p1", "links to [[p2]]");
/// assert_eq!(builder.links().len(), 1);
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    pub(crate) site_path: String,
    pub(crate) extensions: Vec<String>,
    pub(crate) output: String,
    pub(crate) ids: IdentityRegistry,
    pub(crate) nodes: NodeStore,
    pub(crate) links: LinkSet,
    pub(crate) categories: CategoryRegistry,
    pub(crate) policy: Box<dyn SizingPolicy>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl GraphBuilder {
    /// A fresh builder for `site_path` using the policy for `mode`.
    pub fn new(site_path: impl Into<String>, mode: SizingMode) -> Self {
        Self::with_policy(site_path, policy_for(mode))
    }

    /// A fresh builder with an explicit sizing policy.
    pub fn with_policy(site_path: impl Into<String>, policy: Box<dyn SizingPolicy>) -> Self {
        Self {
            site_path: site_path.into(),
            extensions: vec!["md".into(), "markdown".into()],
            output: DEFAULT_OUTPUT.into(),
            ids: IdentityRegistry::new(),
            nodes: NodeStore::new(),
            links: LinkSet::new(),
            categories: CategoryRegistry::new(),
            policy,
            diagnostics: Vec::new(),
        }
    }

    /// Document extensions stripped from page keys.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Graph document location relative to the site directory.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// A new, empty generation with the same settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::builder::{GraphBuilder, Page};
    /// use wikigraph_core::SizingMode;
    ///
    /// let mut builder = GraphBuilder::new("Wiki/", SizingMode::Depth);
    /// builder.collect_pages(&[Page::new("a.md", "A", "/a/", "")]);
    /// let fresh = builder.fresh();
    /// assert!(fresh.nodes().is_empty());
    /// assert_eq!(fresh.site_path(), "Wiki/");
    /// ```
    pub fn fresh(&self) -> Self {
        Self::new(self.site_path.clone(), self.policy.mode())
            .with_extensions(self.extensions.clone())
            .with_output(self.output.clone())
    }

    pub fn site_path(&self) -> &str {
        &self.site_path
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn sizing_mode(&self) -> SizingMode {
        self.policy.mode()
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Recovered problems, in the order they were found.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Canonical key for a page source path.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::builder::GraphBuilder;
    /// use wikigraph_core::SizingMode;
    ///
    /// let builder = GraphBuilder::new("Wiki/", SizingMode::Depth);
    /// assert_eq!(builder.page_key("cs/sorting.md"), "Wiki/cs/sorting");
    /// ```
    pub fn page_key(&self, src_uri: &str) -> String {
        paths::page_key(&self.site_path, src_uri, &self.extensions)
    }

    /// Add a node for every page whose key is not taken yet.
    ///
    /// The first page for a key wins; later ones are reported as
    /// [`Diagnostic::DuplicatePath`]. Directory nodes are not created here.
    pub fn collect_pages(&mut self, pages: &[Page]) {
        let before = self.nodes.len();
        for page in pages {
            let key = self.page_key(&page.src_uri);
            if self.nodes.contains(&key) {
                self.record(Diagnostic::DuplicatePath {
                    key,
                    path: page.src_uri.clone(),
                });
                continue;
            }
            let node = Node {
                id: self.ids.next_id(),
                key,
                title: page.title.clone(),
                url: page.abs_url.clone(),
                raw_content: page.markdown.clone(),
                is_index: page.is_index,
                size: self.policy.initial_size(),
                category: None,
                kind: NodeKind::Page,
            };
            self.nodes.insert(node);
        }
        info!(
            pages = pages.len(),
            added = self.nodes.len() - before,
            "collected pages"
        );
    }

    /// Apply the sizing policy to every node.
    pub fn size_nodes(&mut self) {
        self.policy
            .finalize(&mut self.nodes, &mut self.categories, &self.site_path);
    }

    /// Create a synthetic directory node for `key` unless one exists.
    /// Returns the id of the node at `key`.
    pub(crate) fn ensure_directory(&mut self, key: &str) -> usize {
        if let Some(node) = self.nodes.get(key) {
            return node.id;
        }
        let id = self.ids.next_id();
        self.nodes
            .insert(Node::directory(id, key, self.policy.initial_size()));
        debug!(key, id, "created directory node");
        id
    }

    /// Insert an edge unless present, growing its endpoints by the policy's
    /// edge weight. Returns whether the edge is new.
    pub(crate) fn insert_link(&mut self, source: usize, target: usize) -> bool {
        if !self.links.insert(source, target) {
            return false;
        }
        let weight = self.policy.edge_weight();
        if weight > 0 {
            for id in [source, target] {
                if let Some(node) = self.nodes.by_id_mut(id) {
                    node.size += weight;
                }
            }
        }
        true
    }

    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::MissingParent { .. } => debug!("{diagnostic}"),
            _ => warn!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(src: &str) -> Page {
        Page::new(src, src, format!("/{src}/"), "")
    }

    #[test]
    fn ids_follow_discovery_order() {
        let mut builder = GraphBuilder::new("", SizingMode::Depth);
        builder.collect_pages(&[page("b.md"), page("a.md"), page("c/d.md")]);
        let ids: Vec<(usize, &str)> = builder
            .nodes()
            .iter()
            .map(|n| (n.id, n.key.as_str()))
            .collect();
        assert_eq!(ids, vec![(0, "b"), (1, "a"), (2, "c/d")]);
    }

    #[test]
    fn duplicate_keys_keep_first_and_record() {
        let mut builder = GraphBuilder::new("", SizingMode::Depth);
        let first = Page::new("a.md", "First", "/a/", "");
        let second = Page::new("a.markdown", "Second", "/a2/", "");
        builder.collect_pages(&[first, second]);
        assert_eq!(builder.nodes().len(), 1);
        assert_eq!(builder.nodes().get("a").map(|n| n.title.as_str()), Some("First"));
        assert_eq!(
            builder.diagnostics(),
            &[Diagnostic::DuplicatePath {
                key: "a".into(),
                path: "a.markdown".into()
            }]
        );
    }

    #[test]
    fn collect_does_not_create_directories() {
        let mut builder = GraphBuilder::new("", SizingMode::Depth);
        builder.collect_pages(&[page("x/y/z.md")]);
        assert_eq!(builder.nodes().len(), 1);
    }

    #[test]
    fn initial_size_comes_from_policy() {
        let mut depth = GraphBuilder::new("", SizingMode::Depth);
        depth.collect_pages(&[page("a.md")]);
        assert_eq!(depth.nodes().get("a").map(|n| n.size), Some(0));

        let mut legacy = GraphBuilder::new("", SizingMode::LinkCount);
        legacy.collect_pages(&[page("a.md")]);
        assert_eq!(legacy.nodes().get("a").map(|n| n.size), Some(1));
    }

    #[test]
    fn link_count_grows_both_endpoints() {
        let mut builder = GraphBuilder::new("", SizingMode::LinkCount);
        builder.collect_pages(&[page("a.md"), page("b.md")]);
        assert!(builder.insert_link(0, 1));
        assert!(!builder.insert_link(0, 1));
        assert_eq!(builder.nodes().get("a").map(|n| n.size), Some(2));
        assert_eq!(builder.nodes().get("b").map(|n| n.size), Some(2));
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let mut builder = GraphBuilder::new("", SizingMode::Depth);
        let first = builder.ensure_directory("cs/algo");
        let second = builder.ensure_directory("cs/algo");
        assert_eq!(first, second);
        assert_eq!(builder.nodes().len(), 1);
        assert_eq!(builder.nodes().get("cs/algo").map(|n| n.title.as_str()), Some("algo"));
    }

    #[test]
    fn fresh_restarts_ids() {
        let mut builder =
            GraphBuilder::new("", SizingMode::LinkCount).with_output("graph.json");
        builder.collect_pages(&[page("a.md"), page("b.md")]);
        let mut fresh = builder.fresh();
        fresh.collect_pages(&[page("c.md")]);
        assert_eq!(fresh.nodes().get("c").map(|n| n.id), Some(0));
        assert_eq!(fresh.output(), "graph.json");
        assert_eq!(fresh.sizing_mode(), SizingMode::LinkCount);
    }
}
