//! Post-build summary for the CLI.

use std::fmt;
use std::path::PathBuf;

use petgraph::algo::connected_components;
use serde::Serialize;
use wikigraph_core::{Diagnostic, SizingMode};

use crate::builder::GraphBuilder;
use crate::store::NodeKind;

/// Summary of one build generation.
///
/// # Examples
///
/// ```
/// use wikigraph_build::builder::{GraphBuilder, Page};
/// use wikigraph_build::report::BuildReport;
/// use wikigraph_core::SizingMode;
///
/// let mut builder = GraphBuilder::new("", SizingMode::Depth);
/// builder.collect_pages(&[Page::new("a/p1.md", "P1", "/a/p1/", "")]);
/// builder.build_hierarchy();
/// let report = BuildReport::from_builder(&builder, None);
/// assert_eq!(report.pages, 1);
/// assert_eq!(report.directories, 1);
/// assert_eq!(report.components, 1);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub sizing: SizingMode,
    /// Collected documents.
    pub pages: usize,
    /// Synthetic directory nodes, site root included.
    pub directories: usize,
    pub nodes: usize,
    pub links: usize,
    /// Categories in the exported document (0 in the legacy format).
    pub categories: usize,
    /// Weakly connected components.
    pub components: usize,
    /// Nodes without any link.
    pub isolated: usize,
    /// Where the graph document was written, if it was.
    pub output: Option<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    /// Summarise `builder` as it would be exported now.
    pub fn from_builder(builder: &GraphBuilder, output: Option<PathBuf>) -> Self {
        let document = builder.export();
        let graph = document.to_graph();
        let isolated = graph
            .node_indices()
            .filter(|&i| graph.neighbors_undirected(i).next().is_none())
            .count();
        let pages = builder
            .nodes()
            .iter()
            .filter(|n| n.kind == NodeKind::Page)
            .count();

        Self {
            sizing: builder.sizing_mode(),
            pages,
            directories: builder.nodes().len() - pages,
            nodes: document.nodes.len(),
            links: document.links.len(),
            categories: document.categories.as_ref().map_or(0, Vec::len),
            components: connected_components(&graph),
            isolated,
            output,
            diagnostics: builder.diagnostics().to_vec(),
        }
    }

    /// Number of diagnostics of the unresolved-link kind.
    pub fn unresolved_links(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnresolvedLink { .. }))
            .count()
    }

    /// Render the report as a markdown string.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::builder::GraphBuilder;
    /// use wikigraph_build::report::BuildReport;
    /// use wikigraph_core::SizingMode;
    ///
    /// let builder = GraphBuilder::new("", SizingMode::Depth);
    /// let md = BuildReport::from_builder(&builder, None).to_markdown();
    /// assert!(md.contains("# Graph Report"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Graph Report\n\n");
        out.push_str("| Metric | Value |\n");
        out.push_str("|--------|-------|\n");
        for (label, value) in self.rows() {
            out.push_str(&format!("| {label} | {value} |\n"));
        }
        if let Some(path) = &self.output {
            out.push_str(&format!("\n**Output:** `{}`\n", path.display()));
        }
        if !self.diagnostics.is_empty() {
            out.push_str(&format!("\n## Diagnostics ({})\n\n", self.diagnostics.len()));
            for d in &self.diagnostics {
                out.push_str(&format!("- {d}\n"));
            }
        }
        out
    }

    fn rows(&self) -> [(&'static str, String); 9] {
        [
            ("Sizing", self.sizing.to_string()),
            ("Pages", self.pages.to_string()),
            ("Directories", self.directories.to_string()),
            ("Nodes", self.nodes.to_string()),
            ("Links", self.links.to_string()),
            ("Categories", self.categories.to_string()),
            ("Components", self.components.to_string()),
            ("Isolated nodes", self.isolated.to_string()),
            ("Unresolved links", self.unresolved_links().to_string()),
        ]
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph Report")?;
        writeln!(f, "============")?;
        for (label, value) in self.rows() {
            writeln!(f, "{label:<18} {value:>8}")?;
        }
        if let Some(path) = &self.output {
            writeln!(f, "\nWrote {}", path.display())?;
        }
        if !self.diagnostics.is_empty() {
            writeln!(f, "\nDiagnostics ({}):", self.diagnostics.len())?;
            for d in &self.diagnostics {
                writeln!(f, "  - {d}")?;
            }
        }
        Ok(())
    }
}
