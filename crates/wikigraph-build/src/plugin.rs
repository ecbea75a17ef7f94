//! Host lifecycle adapter.
//!
//! A site generator drives graph construction through a fixed sequence of
//! hooks. [`GraphPlugin`] maps each hook onto the [`GraphBuilder`] it owns;
//! [`build_site`] runs the whole sequence over a docs directory.

use std::path::{Path, PathBuf};

use tracing::info;
use wikigraph_core::{Result, WikigraphConfig};

use crate::builder::{GraphBuilder, Page};
use crate::report::BuildReport;
use crate::walker::walk_docs;

/// Owns the builder for the current build generation.
///
/// # Examples
///
/// ```
/// use wikigraph_build::builder::Page;
/// use wikigraph_build::plugin::GraphPlugin;
/// use wikigraph_core::WikigraphConfig;
///
/// let mut plugin = GraphPlugin::new(WikigraphConfig::default());
/// plugin.pre_build();
/// let pages = vec![Page::new("a.md", "A", "/a/", "[[b]]"), Page::new("b.md", "B", "/b/", "")];
/// plugin.collect(&pages);
/// for page in &pages {
///     plugin.page_markdown(&page.markdown, page);
/// }
/// assert_eq!(plugin.builder().links().len(), 1);
/// ```
#[derive(Debug)]
pub struct GraphPlugin {
    config: WikigraphConfig,
    builder: GraphBuilder,
}

impl GraphPlugin {
    pub fn new(config: WikigraphConfig) -> Self {
        let builder = fresh_builder(&config);
        Self { config, builder }
    }

    /// Server start: begin a new generation.
    pub fn startup(&mut self) {
        self.reset();
    }

    /// Site configuration loaded: adopt its settings. An empty builder is
    /// replaced at once; one already holding nodes keeps its state until
    /// the next reset.
    pub fn configure(&mut self, config: &WikigraphConfig) {
        self.config = config.clone();
        if self.builder.nodes().is_empty() {
            self.reset();
        }
    }

    /// Before each build: begin a new generation with the configured site
    /// name.
    pub fn pre_build(&mut self) {
        self.reset();
    }

    /// Navigation resolved: record every page.
    pub fn collect(&mut self, pages: &[Page]) {
        self.builder.collect_pages(pages);
    }

    /// One document's text: resolve its wiki-links. The text is passed
    /// through unchanged.
    pub fn page_markdown<'a>(&mut self, markdown: &'a str, page: &Page) -> &'a str {
        let key = self.builder.page_key(&page.src_uri);
        self.builder.resolve_document(&key, markdown);
        markdown
    }

    /// All documents seen: build the hierarchy, size the nodes and write
    /// the graph under `site_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`WikigraphError::Io`](wikigraph_core::WikigraphError::Io)
    /// if the graph cannot be written.
    pub fn finalize(&mut self, site_dir: &Path) -> Result<PathBuf> {
        self.builder.build_hierarchy();
        self.builder.size_nodes();
        self.builder.write_graph(site_dir)
    }

    /// After the site is written: write the graph again, in case the build
    /// replaced the output directory.
    ///
    /// # Errors
    ///
    /// Same as [`GraphPlugin::finalize`].
    pub fn post_build(&mut self, site_dir: &Path) -> Result<PathBuf> {
        self.builder.write_graph(site_dir)
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    fn reset(&mut self) {
        self.builder = fresh_builder(&self.config);
    }
}

fn fresh_builder(config: &WikigraphConfig) -> GraphBuilder {
    GraphBuilder::new(config.site.name.clone(), config.graph.sizing)
        .with_extensions(config.graph.extensions.clone())
        .with_output(config.graph.output.clone())
}

/// Walk the docs directory and run every lifecycle hook in order, writing
/// the graph under the configured site directory.
///
/// # Errors
///
/// Returns [`WikigraphError`](wikigraph_core::WikigraphError) if the docs
/// directory cannot be walked or the graph cannot be written.
///
/// # Examples
///
/// ```no_run
/// use wikigraph_build::plugin::build_site;
/// use wikigraph_core::WikigraphConfig;
///
/// let report = build_site(&WikigraphConfig::default()).unwrap();
/// println!("{report}");
/// ```
pub fn build_site(config: &WikigraphConfig) -> Result<BuildReport> {
    let pages = walk_docs(config)?;
    info!(
        docs = %config.site.docs_dir.display(),
        pages = pages.len(),
        "walked docs"
    );

    let mut plugin = GraphPlugin::new(config.clone());
    plugin.startup();
    plugin.configure(config);
    plugin.pre_build();
    plugin.collect(&pages);
    for page in &pages {
        plugin.page_markdown(&page.markdown, page);
    }
    plugin.finalize(&config.site.site_dir)?;
    let output = plugin.post_build(&config.site.site_dir)?;

    Ok(BuildReport::from_builder(plugin.builder(), Some(output)))
}
