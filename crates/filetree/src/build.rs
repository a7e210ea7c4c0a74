//! Flat path list to nested tree.
//!
//! Entries are grouped by their first segment, keeping the order in which
//! each distinct segment first appears (never sorted), and each group is
//! built recursively from the remaining segments.

use crate::SEPARATOR;
use crate::entry::PathEntry;
use crate::node::TreeNode;
use std::collections::HashMap;

struct Group<'a> {
    name: &'a str,
    /// Size of the entry ending at this name, if any.
    size: Option<u64>,
    descendants: Vec<(&'a [String], u64)>,
}

/// Rebuild the hierarchy described by `entries`.
///
/// A name that is listed both as a file and as a directory becomes a
/// directory. A path listed more than once keeps its first size.
///
/// ```
/// use magview_filetree::{PathEntry, TreeNode, build};
///
/// let entries = [
///     PathEntry::parse("a/b/c", 10).unwrap(),
///     PathEntry::parse("a/b/d", 5).unwrap(),
///     PathEntry::parse("a/e", 2).unwrap(),
/// ];
/// assert_eq!(build(&entries), vec![TreeNode::directory("a", vec![
///     TreeNode::directory("b", vec![TreeNode::file("c", 10), TreeNode::file("d", 5)]),
///     TreeNode::file("e", 2),
/// ])]);
/// ```
pub fn build(entries: &[PathEntry]) -> Vec<TreeNode> {
    build_level(entries.iter().map(|entry| (entry.segments(), entry.size())), "")
}

fn build_level<'a>(items: impl IntoIterator<Item = (&'a [String], u64)>, parent: &str) -> Vec<TreeNode> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    for (segments, size) in items {
        let Some((first, rest)) = segments.split_first() else {
            continue;
        };
        let position = *positions.entry(first.as_str()).or_insert_with(|| {
            groups.push(Group {
                name: first,
                size: None,
                descendants: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[position];
        match (rest.is_empty(), group.size) {
            (true, None) => group.size = Some(size),
            (true, Some(kept)) => {
                tracing::debug!(path = %join(parent, group.name), kept, ignored = size, "Duplicate path in listing");
            },
            (false, _) => group.descendants.push((rest, size)),
        }
    }

    groups
        .into_iter()
        .map(|group| {
            if group.descendants.is_empty() {
                // Groups are only created by entries, so a group without
                // descendants always has a size.
                return TreeNode::file(group.name, group.size.unwrap_or_default());
            }
            let path = join(parent, group.name);
            if let Some(size) = group.size {
                tracing::debug!(%path, size, "Path is both a file and a directory; keeping the directory");
            }
            TreeNode::directory(group.name, build_level(group.descendants, &path))
        })
        .collect()
}

fn join(parent: &str, name: &str) -> String {
    match parent.is_empty() {
        true => name.to_string(),
        false => format!("{parent}{SEPARATOR}{name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(paths: &[(&str, u64)]) -> Vec<PathEntry> {
        paths.iter().map(|(path, size)| PathEntry::parse(path, *size).unwrap()).collect()
    }

    #[test]
    fn test_nested() {
        let tree = build(&entries(&[("a/b/c", 10), ("a/b/d", 5), ("a/e", 2)]));
        assert_eq!(tree, vec![TreeNode::directory("a", vec![
            TreeNode::directory("b", vec![TreeNode::file("c", 10), TreeNode::file("d", 5)]),
            TreeNode::file("e", 2),
        ])]);
    }

    #[test]
    fn test_first_seen_order_not_sorted() {
        let tree = build(&entries(&[("z/2", 1), ("a", 2), ("z/1", 3), ("m/x", 4)]));
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        let z: Vec<&str> = tree[0].children().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(z, vec!["2", "1"]);
    }

    #[test]
    fn test_flat_listing() {
        let tree = build(&entries(&[("one.iso", 7)]));
        assert_eq!(tree, vec![TreeNode::file("one.iso", 7)]);
    }

    #[test]
    fn test_empty_listing() {
        assert!(build(&[]).is_empty());
    }

    #[test]
    fn test_file_and_directory_collision() {
        let tree = build(&entries(&[("a", 5), ("a/b", 1)]));
        assert_eq!(tree, vec![TreeNode::directory("a", vec![TreeNode::file("b", 1)])]);
        let tree = build(&entries(&[("a/b", 1), ("a", 5)]));
        assert_eq!(tree, vec![TreeNode::directory("a", vec![TreeNode::file("b", 1)])]);
    }

    #[test]
    fn test_duplicate_keeps_first_size() {
        let tree = build(&entries(&[("d/f", 1), ("d/f", 2)]));
        assert_eq!(tree, vec![TreeNode::directory("d", vec![TreeNode::file("f", 1)])]);
    }

    #[test]
    fn test_names_are_distinct_among_siblings() {
        let tree = build(&entries(&[("a/x", 1), ("b/x", 1), ("a/y", 1), ("a/x", 1)]));
        for node in &tree {
            let mut names: Vec<&str> = node.children().iter().map(|n| n.name.as_str()).collect();
            let before = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), before);
        }
    }
}
