use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WikigraphError;
use crate::types::SizingMode;

/// Top-level configuration loaded from `.wikigraph.toml`.
///
/// Supports layered resolution: CLI flags > config file > defaults.
///
/// # Examples
///
/// ```
/// use wikigraph_core::WikigraphConfig;
///
/// let config = WikigraphConfig::default();
/// assert_eq!(config.graph.output, "assets/js/graph.json");
/// assert!(config.site.use_directory_urls);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikigraphConfig {
    /// Documentation site layout.
    #[serde(default)]
    pub site: SiteConfig,
    /// Graph construction settings.
    #[serde(default)]
    pub graph: GraphConfig,
}

impl WikigraphConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WikigraphError::Io`] if the file cannot be read, or
    /// [`WikigraphError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wikigraph_core::WikigraphConfig;
    /// use std::path::Path;
    ///
    /// let config = WikigraphConfig::from_file(Path::new(".wikigraph.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, WikigraphError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`WikigraphError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_core::{SizingMode, WikigraphConfig};
    ///
    /// let toml = r#"
    /// [site]
    /// name = "Wiki"
    ///
    /// [graph]
    /// sizing = "link-count"
    /// "#;
    /// let config = WikigraphConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.site.name, "Wiki");
    /// assert_eq!(config.graph.sizing, SizingMode::LinkCount);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, WikigraphError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Where the graph document is written for this configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use wikigraph_core::WikigraphConfig;
    ///
    /// let config = WikigraphConfig::default();
    /// assert_eq!(config.output_path(), PathBuf::from("site/assets/js/graph.json"));
    /// ```
    pub fn output_path(&self) -> PathBuf {
        self.site.site_dir.join(&self.graph.output)
    }
}

/// Layout of the documentation site the graph is built for.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use wikigraph_core::SiteConfig;
///
/// let site = SiteConfig::default();
/// assert_eq!(site.name, "");
/// assert_eq!(site.docs_dir, PathBuf::from("docs"));
/// assert_eq!(site.base_url, "/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name. Doubles as the base path that page keys are joined onto
    /// and as the key of the synthetic root node.
    #[serde(default)]
    pub name: String,
    /// Directory holding the markdown sources.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,
    /// Build output root; the graph document is written beneath it.
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,
    /// URL prefix prepended to every page URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Render `a/page.md` as `/a/page/` rather than `/a/page.html`.
    #[serde(default = "default_true")]
    pub use_directory_urls: bool,
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

fn default_base_url() -> String {
    "/".into()
}

fn default_true() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            docs_dir: default_docs_dir(),
            site_dir: default_site_dir(),
            base_url: default_base_url(),
            use_directory_urls: true,
        }
    }
}

/// Graph construction settings.
///
/// # Examples
///
/// ```
/// use wikigraph_core::{GraphConfig, SizingMode};
///
/// let graph = GraphConfig::default();
/// assert_eq!(graph.sizing, SizingMode::Depth);
/// assert_eq!(graph.extensions, vec!["md", "markdown"]);
/// assert!(graph.exclude.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Sizing policy (default: `depth`).
    #[serde(default)]
    pub sizing: SizingMode,
    /// Graph document location relative to the site directory.
    #[serde(default = "default_output")]
    pub output: String,
    /// Document file extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns (relative to the docs directory) to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_output() -> String {
    "assets/js/graph.json".into()
}

fn default_extensions() -> Vec<String> {
    vec!["md".into(), "markdown".into()]
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            sizing: SizingMode::default(),
            output: default_output(),
            extensions: default_extensions(),
            exclude: Vec::new(),
        }
    }
}
