//! Feeding an interactive tree display.
//!
//! The display is anything implementing [`TreeWidget`]: it receives one
//! `add` per node, identified by the node's full slash-joined path, and must
//! ignore repeated ids because every file re-announces its ancestors.
//!
//! [`feed_entries`] works straight from the flat listing; [`feed_tree`] walks
//! a tree already built with [`build()`](crate::build()). For listings without
//! file/directory collisions or duplicate paths both produce the same widget.

use crate::SEPARATOR;
use crate::entry::PathEntry;
use crate::node::TreeNode;
use crate::serialize::INDENT;
use crate::size::humanize;
use std::collections::HashMap;

/// A hierarchical display that nodes can be added to.
pub trait TreeWidget {
    /// Add a node under `parent` (or at the root). Adding an id that is
    /// already present must do nothing.
    fn add(&mut self, id: &str, parent: Option<&str>, label: &str, opened: bool);
}

/// Label shown for a node; files get their humanized size appended.
pub fn label(name: &str, size: Option<u64>) -> String {
    match size {
        Some(size) => format!("{name}  {}", humanize(size)),
        None => name.to_string(),
    }
}

/// Add every entry, and every ancestor directory of every entry, to `widget`.
pub fn feed_entries(widget: &mut dyn TreeWidget, entries: &[PathEntry]) {
    for entry in entries {
        let segments = entry.segments();
        for depth in 1..=segments.len() {
            let id = segments[..depth].join(SEPARATOR);
            let parent = (depth > 1).then(|| segments[..depth - 1].join(SEPARATOR));
            let size = (depth == segments.len()).then_some(entry.size());
            widget.add(&id, parent.as_deref(), &label(&segments[depth - 1], size), true);
        }
    }
}

/// Add every node of an already-built tree to `widget`, parents first.
pub fn feed_tree(widget: &mut dyn TreeWidget, nodes: &[TreeNode]) {
    feed_level(widget, nodes, None);
}

fn feed_level(widget: &mut dyn TreeWidget, nodes: &[TreeNode], parent: Option<&str>) {
    for node in nodes {
        let id = match parent {
            Some(parent) => format!("{parent}{SEPARATOR}{}", node.name),
            None => node.name.clone(),
        };
        widget.add(&id, parent, &label(&node.name, node.size()), true);
        feed_level(widget, node.children(), Some(id.as_str()));
    }
}

/// A node as recorded by [`MemoryWidget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetNode {
    pub id: String,
    pub parent: Option<String>,
    pub label: String,
    pub opened: bool,
}

/// In-memory [`TreeWidget`] that keeps nodes in the order they were first
/// added.
#[derive(Debug, Clone, Default)]
pub struct MemoryWidget {
    nodes: Vec<WidgetNode>,
    positions: HashMap<String, usize>,
}

impl MemoryWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[WidgetNode] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&WidgetNode> {
        self.positions.get(id).map(|&position| &self.nodes[position])
    }

    /// Direct children of `parent` (or the roots), in insertion order.
    pub fn children<'a>(&'a self, parent: Option<&'a str>) -> impl Iterator<Item = &'a WidgetNode> + 'a {
        self.nodes.iter().filter(move |node| node.parent.as_deref() == parent)
    }

    /// Labels, depth-first, indented one level per generation.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.push_lines(None, 0, &mut lines);
        lines
    }

    fn push_lines(&self, parent: Option<&str>, depth: usize, lines: &mut Vec<String>) {
        for node in self.children(parent) {
            lines.push(format!("{}{}", INDENT.repeat(depth), node.label));
            self.push_lines(Some(node.id.as_str()), depth + 1, lines);
        }
    }
}

impl TreeWidget for MemoryWidget {
    fn add(&mut self, id: &str, parent: Option<&str>, label: &str, opened: bool) {
        if self.positions.contains_key(id) {
            return;
        }
        self.positions.insert(id.to_string(), self.nodes.len());
        self.nodes.push(WidgetNode {
            id: id.to_string(),
            parent: parent.map(str::to_string),
            label: label.to_string(),
            opened,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build;

    fn entries(paths: &[(&str, u64)]) -> Vec<PathEntry> {
        paths.iter().map(|(path, size)| PathEntry::parse(path, *size).unwrap()).collect()
    }

    #[test]
    fn test_feed_entries_adds_every_prefix_once() {
        let mut widget = MemoryWidget::new();
        feed_entries(&mut widget, &entries(&[("a/b/c", 10), ("a/b/d", 5), ("a/e", 2)]));
        let ids: Vec<&str> = widget.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a/b", "a/b/c", "a/b/d", "a/e"]);
        assert!(widget.nodes().iter().all(|n| n.opened));

        let c = widget.get("a/b/c").unwrap();
        assert_eq!(c.parent.as_deref(), Some("a/b"));
        assert_eq!(c.label, "c  0.1 KiB");
        assert_eq!(widget.get("a/b").unwrap().label, "b");
        assert_eq!(widget.get("a").unwrap().parent, None);
    }

    #[test]
    fn test_repeated_add_is_ignored() {
        let mut widget = MemoryWidget::new();
        widget.add("x", None, "first", true);
        widget.add("x", None, "second", false);
        assert_eq!(widget.len(), 1);
        assert_eq!(widget.get("x").unwrap().label, "first");
    }

    #[test]
    fn test_render() {
        let mut widget = MemoryWidget::new();
        feed_entries(&mut widget, &entries(&[("a/b", 2048), ("c", 1024)]));
        assert_eq!(widget.render(), vec!["a", "    b  2.0 KiB", "c  1.0 KiB"]);
    }

    #[test]
    fn test_flat_and_tree_feeds_agree() {
        let listing = entries(&[
            ("root/docs/readme.md", 900),
            ("root/bin/tool", 40_000),
            ("other.nfo", 12),
            ("root/docs/license", 3_000),
            ("root/bin/lib/libx.so", 2_000_000),
        ]);
        let mut flat = MemoryWidget::new();
        feed_entries(&mut flat, &listing);
        let mut tree = MemoryWidget::new();
        feed_tree(&mut tree, &build(&listing));

        assert_eq!(flat.len(), tree.len());
        assert_eq!(flat.render(), tree.render());
        for node in flat.nodes() {
            assert_eq!(tree.get(&node.id), Some(node));
        }
    }
}
