use serde::{Deserialize, Serialize};

/// A node in the nested, editor-facing representation.
///
/// Children hang off their primary parent. The secondary parent is a
/// cross-reference by name and is never owned by this node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub cache_group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_parent_name: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(cache_group_name: impl Into<String>) -> Self {
        Self {
            cache_group_name: cache_group_name.into(),
            secondary_parent_name: None,
            children: Vec::new(),
        }
    }

    pub fn with_secondary_parent(mut self, name: impl Into<String>) -> Self {
        self.secondary_parent_name = Some(name.into());
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Depth-first search for a node by cache group name.
    pub fn find(&self, name: &str) -> Option<&TreeNode> {
        if self.cache_group_name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// The roots of the primary-parent hierarchy.
pub type Forest = Vec<TreeNode>;

/// Looks up a node anywhere in a forest.
pub fn find_in_forest<'a>(forest: &'a [TreeNode], name: &str) -> Option<&'a TreeNode> {
    forest.iter().find_map(|root| root.find(name))
}

/// Total number of nodes across every tree of the forest.
pub fn forest_size(forest: &[TreeNode]) -> usize {
    forest.iter().map(TreeNode::size).sum()
}
