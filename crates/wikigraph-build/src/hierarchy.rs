//! Directory hierarchy backfill.

use std::collections::BTreeSet;

use tracing::info;
use wikigraph_core::Diagnostic;

use crate::builder::GraphBuilder;
use crate::paths;
use crate::sizing::ROOT_LABEL;
use crate::store::{Node, NodeKind};

impl GraphBuilder {
    /// Create the site-root node and every missing ancestor directory, then
    /// link each node to its parent.
    ///
    /// Directories are created in lexicographic order, so a parent always
    /// receives a smaller id than its children. Running it again adds
    /// nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikigraph_build::builder::{GraphBuilder, Page};
    /// use wikigraph_core::SizingMode;
    ///
    /// let mut builder = GraphBuilder::new("Wiki/", SizingMode::Depth);
    /// builder.collect_pages(&[Page::new("a/b/y.md", "Y", "/a/b/y/", "")]);
    /// builder.build_hierarchy();
    /// let keys: Vec<&str> = builder.nodes().keys().collect();
    /// assert_eq!(keys, vec!["Wiki/a/b/y", "Wiki", "Wiki/a", "Wiki/a/b"]);
    /// assert_eq!(builder.links().len(), 3);
    /// ```
    pub fn build_hierarchy(&mut self) {
        let root = paths::root_key(&self.site_path).to_string();
        let nodes_before = self.nodes.len();
        let links_before = self.links.len();

        if !root.is_empty() && !self.nodes.contains(&root) {
            self.create_root(&root);
        }

        let mut pending = BTreeSet::new();
        for key in self.nodes.keys().filter(|key| *key != root) {
            let mut current = key;
            loop {
                let parent = paths::dirname(current);
                if parent == current || parent.is_empty() || parent == root || parent == "/" {
                    break;
                }
                pending.insert(parent.to_string());
                current = parent;
            }
        }
        for dir in &pending {
            self.ensure_directory(dir);
        }

        let keys: Vec<(usize, String)> = self
            .nodes
            .iter()
            .filter(|n| n.key != root)
            .map(|n| (n.id, n.key.clone()))
            .collect();
        for (child, key) in keys {
            let parent = match paths::dirname(&key) {
                "" if root.is_empty() => continue,
                "" => root.as_str(),
                parent => parent,
            };
            if parent == key {
                continue;
            }
            match self.nodes.get(parent).map(|n| n.id) {
                Some(parent_id) => {
                    self.insert_link(parent_id, child);
                }
                None => self.record(Diagnostic::MissingParent {
                    key: key.clone(),
                    parent: parent.to_string(),
                }),
            }
        }

        info!(
            directories = self.nodes.len() - nodes_before,
            containment_links = self.links.len() - links_before,
            "built directory hierarchy"
        );
    }

    fn create_root(&mut self, root: &str) {
        let label = if root.is_empty() { ROOT_LABEL } else { root };
        let category = self.categories.get_or_create(label);
        let node = Node {
            id: self.ids.next_id(),
            key: root.to_string(),
            title: paths::directory_title(root),
            url: String::new(),
            raw_content: String::new(),
            is_index: true,
            size: self.policy.initial_size(),
            category: Some(category),
            kind: NodeKind::Root,
        };
        self.nodes.insert(node);
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{GraphBuilder, Page};
    use crate::store::NodeKind;
    use wikigraph_core::{Diagnostic, SizingMode};

    fn build(site_path: &str, sources: &[&str]) -> GraphBuilder {
        let mut builder = GraphBuilder::new(site_path, SizingMode::Depth);
        let pages: Vec<Page> = sources
            .iter()
            .map(|src| Page::new(*src, *src, format!("/{src}"), ""))
            .collect();
        builder.collect_pages(&pages);
        builder.build_hierarchy();
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
    fn chain_from_root_to_leaf() {
        let b = build("Wiki/", &["a/x.md", "a/b/y.md"]);
        let e = edges(&b);
        assert!(e.contains(&("Wiki".into(), "Wiki/a".into())));
        assert!(e.contains(&("Wiki/a".into(), "Wiki/a/b".into())));
        assert!(e.contains(&("Wiki/a/b".into(), "Wiki/a/b/y".into())));
        assert!(e.contains(&("Wiki/a".into(), "Wiki/a/x".into())));
        assert_eq!(e.len(), 4);
    }

    #[test]
    fn root_node_attributes() {
        let b = build("Wiki/", &["a.md"]);
        let root = b.nodes().get("Wiki").cloned().unwrap();
        assert!(root.is_index);
        assert!(root.url.is_empty());
        assert_eq!(root.kind, NodeKind::Root);
        assert_eq!(root.title, "Wiki");
        assert_eq!(root.category, Some(0));
        assert_eq!(b.categories().labels().collect::<Vec<_>>(), vec!["Wiki"]);
    }

    #[test]
    fn bare_site_name_still_gets_root() {
        // Without a trailing slash the name is not a key prefix, but the
        // root is still created and adopts the top-level nodes.
        let b = build("Wiki", &["cs/page.md"]);
        let e = edges(&b);
        assert!(e.contains(&("Wiki".into(), "cs".into())));
        assert!(e.contains(&("cs".into(), "cs/page".into())));
    }

    #[test]
    fn without_site_path_there_is_no_root() {
        let b = build("", &["a/x.md", "a/b/y.md"]);
        let keys: Vec<&str> = b.nodes().keys().collect();
        assert_eq!(keys, vec!["a/x", "a/b/y", "a", "a/b"]);
        let e = edges(&b);
        assert_eq!(
            e,
            vec![
                ("a".into(), "a/x".into()),
                ("a/b".into(), "a/b/y".into()),
                ("a".into(), "a/b".into()),
            ]
        );
    }

    #[test]
    fn directories_are_created_in_lexicographic_order() {
        let b = build("", &["z/q/p.md", "b/c.md"]);
        let dirs: Vec<&str> = b.nodes().iter().skip(2).map(|n| n.key.as_str()).collect();
        assert_eq!(dirs, vec!["b", "z", "z/q"]);
    }

    #[test]
    fn rerunning_adds_nothing() {
        let mut b = build("Wiki/", &["a/x.md"]);
        let nodes = b.nodes().len();
        let links = b.links().len();
        b.build_hierarchy();
        assert_eq!(b.nodes().len(), nodes);
        assert_eq!(b.links().len(), links);
    }

    #[test]
    fn existing_directory_nodes_are_reused() {
        let mut b = GraphBuilder::new("", SizingMode::Depth);
        b.collect_pages(&[
            Page::new("a/p1.md", "p1", "/a/p1/", ""),
            Page::new("b/p2.md", "p2", "/b/p2/", ""),
        ]);
        b.resolve_document("a/p1", "[[p2]]");
        let before = b.nodes().len();
        b.build_hierarchy();
        assert_eq!(b.nodes().len(), before);
    }

    #[test]
    fn slash_rooted_parent_is_reported_missing() {
        let b = build("", &["/top.md"]);
        assert!(b.links().is_empty());
        assert_eq!(
            b.diagnostics(),
            &[Diagnostic::MissingParent {
                key: "/top".into(),
                parent: "/".into()
            }]
        );
    }
}
