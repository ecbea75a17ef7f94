//! Knowledge-graph construction for wiki-linked documentation.
//!
//! Turns a tree of markdown pages that reference each other with
//! `[[wiki-links]]` into a graph document for a force-directed view: page
//! and directory nodes, reference and containment links, sizes and
//! categories. Uses `regex` for link extraction, `url` for relative path
//! resolution, `petgraph` for neighbourhood and connectivity queries and
//! the `ignore` crate for walking the docs directory.

pub mod builder;
pub mod export;
pub mod hierarchy;
pub mod paths;
pub mod plugin;
pub mod report;
pub mod resolver;
pub mod sizing;
pub mod store;
pub mod walker;
pub mod wikilink;

use wikigraph_core::WikigraphConfig;

use crate::builder::{GraphBuilder, Page};
use crate::export::GraphDocument;

/// Build the graph for `pages` in memory and export it, without touching
/// the filesystem.
///
/// Runs the same phases as a site build: collection, link resolution,
/// hierarchy backfill, then sizing.
///
/// # Examples
///
/// ```
/// use wikigraph_build::builder::Page;
/// use wikigraph_build::generate_graph;
/// use wikigraph_core::WikigraphConfig;
///
/// let pages = vec![
///     Page::new("a/p1.md", "P1", "/a/p1/", "[[p2]]"),
///     Page::new("b/p2.md", "P2", "/b/p2/", ""),
/// ];
/// let doc = generate_graph(&WikigraphConfig::default(), &pages);
/// // p1, p2, and the directories `a` and `b`.
/// assert_eq!(doc.nodes.len(), 4);
/// ```
pub fn generate_graph(config: &WikigraphConfig, pages: &[Page]) -> GraphDocument {
    let mut builder = GraphBuilder::new(config.site.name.clone(), config.graph.sizing)
        .with_extensions(config.graph.extensions.clone())
        .with_output(config.graph.output.clone());
    builder.collect_pages(pages);
    for page in pages {
        let key = builder.page_key(&page.src_uri);
        builder.resolve_document(&key, &page.markdown);
    }
    builder.build_hierarchy();
    builder.size_nodes();
    builder.export()
}
