//! The graph document consumed by the front-end.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::info;
use wikigraph_core::{Result, WikigraphError};

use crate::builder::GraphBuilder;

/// Category given to nodes that were never categorised.
pub const DEFAULT_CATEGORY: &str = "Default";

/// `{ "name": label }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
}

/// One node of the exported graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    /// Node id, as a string.
    pub id: String,
    /// Display title.
    pub name: String,
    pub symbol_size: u32,
    /// Page URL; empty for directories.
    pub value: String,
    /// Category id; absent in the legacy format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<usize>,
}

/// One directed edge, endpoints as id strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub source: String,
    pub target: String,
}

/// `{ categories, nodes, links }` as read by the force-directed view.
///
/// `categories` is `None` in the legacy (link-count) format and is then
/// left out of the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryEntry>>,
    pub nodes: Vec<NodeEntry>,
    pub links: Vec<LinkEntry>,
}

impl GraphBuilder {
    /// Snapshot the current graph.
    ///
    /// Pure: the builder is not modified, and exporting twice without an
    /// intervening change gives equal documents. Uncategorised nodes are
    /// placed in a `Default` category appended to the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::builder::{GraphBuilder, Page};
    /// use wikigraph_core::SizingMode;
    ///
    /// let mut builder = GraphBuilder::new("", SizingMode::Depth);
    /// builder.collect_pages(&[Page::new("a.md", "A", "/a/", "")]);
    /// let doc = builder.export();
    /// assert_eq!(doc.nodes[0].id, "0");
    /// assert_eq!(doc.categories.unwrap()[0].name, "Default");
    /// ```
    pub fn export(&self) -> GraphDocument {
        let links = self
            .links
            .iter()
            .map(|l| LinkEntry {
                source: l.source.to_string(),
                target: l.target.to_string(),
            })
            .collect();

        if !self.policy.categorized() {
            let nodes = self
                .nodes
                .iter()
                .map(|n| NodeEntry {
                    id: n.id.to_string(),
                    name: n.title.clone(),
                    symbol_size: n.size,
                    value: n.url.clone(),
                    category: None,
                })
                .collect();
            return GraphDocument {
                categories: None,
                nodes,
                links,
            };
        }

        let mut categories: Vec<CategoryEntry> = self
            .categories
            .labels()
            .map(|name| CategoryEntry {
                name: name.to_string(),
            })
            .collect();
        let mut default_id = None;
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for n in self.nodes.iter() {
            let category = match n.category {
                Some(id) => id,
                None => *default_id.get_or_insert_with(|| {
                    self.categories.get(DEFAULT_CATEGORY).unwrap_or_else(|| {
                        categories.push(CategoryEntry {
                            name: DEFAULT_CATEGORY.to_string(),
                        });
                        categories.len() - 1
                    })
                }),
            };
            nodes.push(NodeEntry {
                id: n.id.to_string(),
                name: n.title.clone(),
                symbol_size: n.size,
                value: n.url.clone(),
                category: Some(category),
            });
        }

        GraphDocument {
            categories: Some(categories),
            nodes,
            links,
        }
    }

    /// Export and write the document to `<site_dir>/<output>`, creating
    /// parent directories. Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`WikigraphError::Io`] if the file or its directories cannot
    /// be written.
    pub fn write_graph(&self, site_dir: &Path) -> Result<PathBuf> {
        let path = site_dir.join(&self.output);
        let document = self.export();
        document.write_to(&path)?;
        info!(
            path = %path.display(),
            nodes = document.nodes.len(),
            links = document.links.len(),
            "wrote graph"
        );
        Ok(path)
    }
}

impl GraphDocument {
    /// Pretty-printed JSON, two-space indent.
    ///
    /// # Errors
    ///
    /// Returns [`WikigraphError::Serialization`] if serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::export::GraphDocument;
    ///
    /// let json = GraphDocument::default().to_json().unwrap();
    /// assert!(json.contains("\"nodes\": []"));
    /// assert!(!json.contains("categories"));
    /// ```
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(WikigraphError::from)
    }

    /// Write the document as JSON to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`WikigraphError::Io`] or [`WikigraphError::Serialization`].
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a previously written document.
    ///
    /// # Errors
    ///
    /// Returns [`WikigraphError::FileNotFound`] if `path` does not exist,
    /// [`WikigraphError::Io`] if it cannot be read, or
    /// [`WikigraphError::Serialization`] if it is not a graph document.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(WikigraphError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Directed graph over the document. Node weights are positions in
    /// `nodes`, edge weights positions in `links`. Links naming unknown
    /// ids are left out.
    pub fn to_graph(&self) -> DiGraph<usize, usize> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.links.len());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.nodes.len());
        for (pos, node) in self.nodes.iter().enumerate() {
            index.insert(node.id.as_str(), graph.add_node(pos));
        }
        for (pos, link) in self.links.iter().enumerate() {
            if let (Some(&s), Some(&t)) = (
                index.get(link.source.as_str()),
                index.get(link.target.as_str()),
            ) {
                graph.add_edge(s, t, pos);
            }
        }
        graph
    }

    /// The neighbourhood of the page whose URL is `url`: every link
    /// touching it, and the nodes those links connect, both in their
    /// original order. An unknown URL or an unlinked page gives an empty
    /// node and link list. Categories are kept as they are.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::builder::{GraphBuilder, Page};
    /// use wikigraph_core::SizingMode;
    ///
    /// let mut builder = GraphBuilder::new("", SizingMode::Depth);
    /// builder.collect_pages(&[
    ///     Page::new("a/p1.md", "P1", "/a/p1/", ""),
    ///     Page::new("a/p2.md", "P2", "/a/p2/", ""),
    ///     Page::new("a/p3.md", "P3", "/a/p3/", ""),
    /// ]);
    /// builder.resolve_document("a/p1", "[[p2]]");
    /// let local = builder.export().local_graph("/a/p2/");
    /// let names: Vec<&str> = local.nodes.iter().map(|n| n.name.as_str()).collect();
    /// assert_eq!(names, vec!["P1", "P2"]);
    /// assert_eq!(local.links.len(), 1);
    /// ```
    pub fn local_graph(&self, url: &str) -> GraphDocument {
        let empty = GraphDocument {
            categories: self.categories.clone(),
            nodes: Vec::new(),
            links: Vec::new(),
        };
        if url.is_empty() {
            return empty;
        }
        let graph = self.to_graph();
        let Some(center) = graph
            .node_indices()
            .find(|&i| self.nodes[graph[i]].value == url)
        else {
            return empty;
        };

        let touching: BTreeSet<usize> = graph
            .edges_directed(center, Direction::Outgoing)
            .chain(graph.edges_directed(center, Direction::Incoming))
            .map(|e| *e.weight())
            .collect();
        if touching.is_empty() {
            return empty;
        }

        let links: Vec<LinkEntry> = touching
            .iter()
            .map(|&pos| self.links[pos].clone())
            .collect();
        let endpoints: HashSet<&str> = links
            .iter()
            .flat_map(|l| [l.source.as_str(), l.target.as_str()])
            .collect();
        let nodes = self
            .nodes
            .iter()
            .filter(|n| endpoints.contains(n.id.as_str()))
            .cloned()
            .collect();

        GraphDocument {
            categories: self.categories.clone(),
            nodes,
            links,
        }
    }
}
