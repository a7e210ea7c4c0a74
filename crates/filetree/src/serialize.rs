//! Tree to indented text listing.

use crate::node::TreeNode;

/// One level of indentation.
pub const INDENT: &str = "    ";

/// Depth-first, pre-order listing of `nodes`: each name on its own line,
/// indented one [`INDENT`] deeper than its parent.
pub fn to_lines(nodes: &[TreeNode]) -> Vec<String> {
    let mut lines = Vec::new();
    push_lines(nodes, 0, &mut lines);
    lines
}

/// [`to_lines`] joined with newlines (no trailing newline).
pub fn render(nodes: &[TreeNode]) -> String {
    to_lines(nodes).join("\n")
}

fn push_lines(nodes: &[TreeNode], depth: usize, lines: &mut Vec<String>) {
    for node in nodes {
        lines.push(format!("{}{}", INDENT.repeat(depth), node.name));
        push_lines(node.children(), depth + 1, lines);
    }
}
