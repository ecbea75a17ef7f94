//! Node sizing and categorisation policies.
//!
//! [`DepthSizing`] sizes nodes by how deep they sit below the site root and
//! groups them by top-level section. [`LinkCountSizing`] is the older scheme:
//! each inserted edge grows both endpoints and nothing is categorised.

use std::fmt;

use tracing::debug;
use wikigraph_core::SizingMode;

use crate::paths;
use crate::store::{CategoryRegistry, NodeStore};

/// Category label for the site root when no site path is configured.
pub const ROOT_LABEL: &str = "Root";

/// Category label for everything deeper than the first level.
pub const CONTENT_LABEL: &str = "Content";

/// How node sizes (and categories) are derived.
pub trait SizingPolicy: fmt::Debug {
    /// Which mode this policy implements.
    fn mode(&self) -> SizingMode;

    /// Size given to a node when it is created.
    fn initial_size(&self) -> u32;

    /// Amount added to each endpoint when an edge is inserted.
    fn edge_weight(&self) -> u32;

    /// Whether exported nodes carry categories.
    fn categorized(&self) -> bool;

    /// Final pass over all nodes once the graph is complete.
    fn finalize(&self, nodes: &mut NodeStore, categories: &mut CategoryRegistry, site_path: &str);
}

/// Pick the policy for `mode`.
///
/// # Examples
///
/// ```
/// use wikigraph_build::sizing::policy_for;
/// use wikigraph_core::SizingMode;
///
/// let policy = policy_for(SizingMode::LinkCount);
/// assert_eq!(policy.initial_size(), 1);
/// assert!(!policy.categorized());
/// ```
pub fn policy_for(mode: SizingMode) -> Box<dyn SizingPolicy> {
    match mode {
        SizingMode::Depth => Box::new(DepthSizing),
        SizingMode::LinkCount => Box::new(LinkCountSizing),
    }
}

/// Size by depth below the site root: 20 for the root, `10 - 2 * depth`
/// for everything else, never below 1.
///
/// Depth-1 nodes are categorised by their own title, deeper nodes as
/// `Content`, the root by the root key (or `Root`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthSizing;

impl DepthSizing {
    /// Key relative to the root, with leading slashes dropped. The root key
    /// is only stripped at a segment boundary.
    fn relative<'a>(key: &'a str, root: &str) -> &'a str {
        let rest = if root.is_empty() {
            key
        } else if key == root {
            ""
        } else {
            key.strip_prefix(root)
                .and_then(|r| r.strip_prefix('/'))
                .unwrap_or(key)
        };
        rest.trim_start_matches('/')
    }

    /// `(size, depth)` for a relative path.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::sizing::DepthSizing;
    ///
    /// assert_eq!(DepthSizing::size_for(""), (20, 0));
    /// assert_eq!(DepthSizing::size_for("cs"), (8, 1));
    /// assert_eq!(DepthSizing::size_for("cs/algo"), (6, 2));
    /// assert_eq!(DepthSizing::size_for("a/b/c/d/e/f"), (1, 6));
    /// ```
    pub fn size_for(relative: &str) -> (u32, usize) {
        if relative.is_empty() {
            return (20, 0);
        }
        let depth = relative.matches('/').count() + 1;
        let size = 10i64 - 2 * depth as i64;
        (size.max(1) as u32, depth)
    }
}

impl SizingPolicy for DepthSizing {
    fn mode(&self) -> SizingMode {
        SizingMode::Depth
    }

    fn initial_size(&self) -> u32 {
        0
    }

    fn edge_weight(&self) -> u32 {
        0
    }

    fn categorized(&self) -> bool {
        true
    }

    fn finalize(&self, nodes: &mut NodeStore, categories: &mut CategoryRegistry, site_path: &str) {
        let root = paths::root_key(site_path);
        let root_label = if root.is_empty() { ROOT_LABEL } else { root };

        for node in nodes.iter_mut() {
            let relative = Self::relative(&node.key, root);
            let (size, depth) = Self::size_for(relative);
            let label = match depth {
                0 => root_label,
                1 => node.title.as_str(),
                _ => CONTENT_LABEL,
            };
            node.size = size;
            node.category = Some(categories.get_or_create(label));
        }
        debug!(
            nodes = nodes.len(),
            categories = categories.len(),
            "depth sizing applied"
        );
    }
}

/// Grow both endpoints of every inserted edge by one, starting from 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkCountSizing;

impl SizingPolicy for LinkCountSizing {
    fn mode(&self) -> SizingMode {
        SizingMode::LinkCount
    }

    fn initial_size(&self) -> u32 {
        1
    }

    fn edge_weight(&self) -> u32 {
        1
    }

    fn categorized(&self) -> bool {
        false
    }

    fn finalize(
        &self,
        _nodes: &mut NodeStore,
        _categories: &mut CategoryRegistry,
        _site_path: &str,
    ) {
    }
}
