use crate::error::TopologyError;
use crate::topology::{FlatTopology, FlatTopologyNode, TreeNode};
use ahash::AHashMap;

/// Walks a forest in pre-order and rebuilds the flat, index-addressed form.
///
/// Indices are assigned in visitation order. Secondary parents are resolved in
/// a second pass, once every node has an index, because a secondary parent may
/// sit anywhere in the forest. The result is structurally consistent but not
/// yet checked against the directory; see [`crate::engine::TopologyEngine::tree_to_topology`].
pub fn flatten(
    name: &str,
    description: &str,
    forest: &[TreeNode],
) -> Result<FlatTopology, TopologyError> {
    let mut visited: Vec<(&TreeNode, Option<usize>)> = Vec::new();
    let mut index_by_name: AHashMap<&str, usize> = AHashMap::new();

    // Pass 1: pre-order indexing. Children are pushed in reverse so they pop in order.
    let mut stack: Vec<(&TreeNode, Option<usize>)> =
        forest.iter().rev().map(|root| (root, None)).collect();
    while let Some((node, parent)) = stack.pop() {
        let index = visited.len();
        if index_by_name
            .insert(node.cache_group_name.as_str(), index)
            .is_some()
        {
            return Err(TopologyError::DuplicateCacheGroup {
                name: node.cache_group_name.clone(),
            });
        }
        visited.push((node, parent));
        stack.extend(node.children.iter().rev().map(|child| (child, Some(index))));
    }

    // Pass 2: primary parents are known; resolve secondary names through the full map.
    let nodes = visited
        .into_iter()
        .map(|(node, parent)| {
            let mut parent_indices: Vec<usize> = parent.into_iter().collect();
            if let Some(secondary) = &node.secondary_parent_name {
                if parent.is_none() {
                    return Err(TopologyError::SecondaryParentOnRoot {
                        cache_group: node.cache_group_name.clone(),
                    });
                }
                if *secondary == node.cache_group_name {
                    return Err(TopologyError::SelfSecondaryParent {
                        cache_group: node.cache_group_name.clone(),
                    });
                }
                let index = index_by_name.get(secondary.as_str()).ok_or_else(|| {
                    TopologyError::UnknownCacheGroup {
                        name: secondary.clone(),
                    }
                })?;
                parent_indices.push(*index);
            }
            Ok(FlatTopologyNode {
                cache_group_name: node.cache_group_name.clone(),
                parent_indices,
            })
        })
        .collect::<Result<Vec<_>, TopologyError>>()?;

    Ok(FlatTopology {
        name: name.to_string(),
        description: description.to_string(),
        nodes,
    })
}
