//! In-memory graph state for one build generation.
//!
//! [`NodeStore`], [`LinkSet`] and [`CategoryRegistry`] all preserve insertion
//! order; the exported document lists everything in the order it was
//! discovered.

use std::collections::{HashMap, HashSet};

/// Hands out node ids: 0, 1, 2, ... A fresh registry starts over at 0.
///
/// # Examples
///
/// ```
/// use wikigraph_build::store::IdentityRegistry;
///
/// let mut ids = IdentityRegistry::new();
/// assert_eq!(ids.next_id(), 0);
/// assert_eq!(ids.next_id(), 1);
/// ```
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    next: usize,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A collected document.
    Page,
    /// A synthetic directory node.
    Directory,
    /// The synthetic site-root node.
    Root,
}

/// A graph node, keyed by its canonical path key.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Assigned once at creation.
    pub id: usize,
    /// Canonical path key.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Rendered page URL; empty for synthetic nodes.
    pub url: String,
    /// Document text; empty for synthetic nodes.
    pub raw_content: String,
    /// Directory entry page, or the site root.
    pub is_index: bool,
    /// Visual weight.
    pub size: u32,
    /// Category id, unset until sizing (or root creation).
    pub category: Option<usize>,
    pub kind: NodeKind,
}

impl Node {
    /// A synthetic directory node titled after its last path segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::store::{Node, NodeKind};
    ///
    /// let dir = Node::directory(3, "cs/algo", 0);
    /// assert_eq!(dir.title, "algo");
    /// assert!(dir.url.is_empty());
    /// assert_eq!(dir.kind, NodeKind::Directory);
    /// ```
    pub fn directory(id: usize, key: &str, size: u32) -> Self {
        Self {
            id,
            key: key.to_string(),
            title: crate::paths::directory_title(key),
            url: String::new(),
            raw_content: String::new(),
            is_index: false,
            size,
            category: None,
            kind: NodeKind::Directory,
        }
    }
}

/// Path key -> node, insertion-ordered.
///
/// # Examples
///
/// ```
/// use wikigraph_build::store::{Node, NodeStore};
///
/// let mut store = NodeStore::new();
/// assert!(store.insert(Node::directory(0, "a", 0)));
/// assert!(!store.insert(Node::directory(1, "a", 0)));
/// assert_eq!(store.len(), 1);
/// assert_eq!(store.get("a").map(|n| n.id), Some(0));
/// ```
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    positions: HashMap<String, usize>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` unless its key is already taken or its id does not
    /// exceed every id already stored. Returns whether it was inserted.
    ///
    /// Ids increase with insertion order, which lets [`NodeStore::by_id`]
    /// binary-search.
    pub fn insert(&mut self, node: Node) -> bool {
        if self.positions.contains_key(&node.key) {
            return false;
        }
        if self.nodes.last().is_some_and(|last| last.id >= node.id) {
            return false;
        }
        self.positions.insert(node.key.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.positions.get(key).map(|&pos| &self.nodes[pos])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self.positions.get(key) {
            Some(&pos) => self.nodes.get_mut(pos),
            None => None,
        }
    }

    /// Look a node up by id. Ids increase with insertion order.
    pub fn by_id(&self, id: usize) -> Option<&Node> {
        self.nodes
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|pos| &self.nodes[pos])
    }

    pub fn by_id_mut(&mut self, id: usize) -> Option<&mut Node> {
        match self.nodes.binary_search_by_key(&id, |n| n.id) {
            Ok(pos) => self.nodes.get_mut(pos),
            Err(_) => None,
        }
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A directed edge between node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

/// Deduplicated, insertion-ordered edges. `(a, b)` and `(b, a)` are distinct.
///
/// # Examples
///
/// ```
/// use wikigraph_build::store::LinkSet;
///
/// let mut links = LinkSet::new();
/// assert!(links.insert(0, 1));
/// assert!(!links.insert(0, 1));
/// assert!(links.insert(1, 0));
/// assert_eq!(links.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct LinkSet {
    links: Vec<Link>,
    seen: HashSet<(usize, usize)>,
}

impl LinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `(source, target)` if not already present. Returns whether it
    /// was appended.
    pub fn insert(&mut self, source: usize, target: usize) -> bool {
        if !self.seen.insert((source, target)) {
            return false;
        }
        self.links.push(Link { source, target });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Category label -> id, ids assigned on first use.
///
/// # Examples
///
/// ```
/// use wikigraph_build::store::CategoryRegistry;
///
/// let mut categories = CategoryRegistry::new();
/// assert_eq!(categories.get_or_create("Wiki"), 0);
/// assert_eq!(categories.get_or_create("Content"), 1);
/// assert_eq!(categories.get_or_create("Wiki"), 0);
/// assert_eq!(categories.labels().collect::<Vec<_>>(), vec!["Wiki", "Content"]);
/// ```
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    labels: Vec<String>,
    ids: HashMap<String, usize>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, label: &str) -> usize {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        id
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Labels in id order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
