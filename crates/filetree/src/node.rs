/// A node of a rebuilt file tree.
///
/// Files carry a size and never have children; directories never carry a
/// size. Children keep the order in which their names were first seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File { size: u64 },
    Directory { children: Vec<TreeNode> },
}

impl TreeNode {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File { size },
        }
    }

    pub fn directory(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory { children },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Size of a file; `None` for directories.
    pub fn size(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { size } => Some(size),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::File { .. } => &[],
            NodeKind::Directory { children } => children,
        }
    }

    /// Sum of the sizes of every file at or below this node.
    pub fn total_size(&self) -> u64 {
        match &self.kind {
            NodeKind::File { size } => *size,
            NodeKind::Directory { children } => children.iter().map(TreeNode::total_size).sum(),
        }
    }
}
