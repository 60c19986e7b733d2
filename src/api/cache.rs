// src/api/cache.rs
//! In-memory cache of materialized subtrees for one sync run.
//!
//! Two maps are kept: fully resolved nodes keyed by their own ID, and
//! resolved child lists keyed by their parent's ID (page bodies are child
//! lists of a page, which is not itself a block). Entries are only written
//! after a subtree is completely resolved, so a hit never returns a
//! partially fetched tree.

use crate::model::ContentNode;
use crate::types::NotionId;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct NodeCache {
    trees: RwLock<HashMap<NotionId, ContentNode>>,
    children: RwLock<HashMap<NotionId, Vec<ContentNode>>>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved subtree rooted at `id`, if cached.
    pub fn tree(&self, id: &NotionId) -> Option<ContentNode> {
        self.trees.read().get(id).cloned()
    }

    pub fn store_tree(&self, id: NotionId, node: ContentNode) {
        self.trees.write().insert(id, node);
    }

    /// The resolved children of `parent`, if cached.
    pub fn children(&self, parent: &NotionId) -> Option<Vec<ContentNode>> {
        self.children.read().get(parent).cloned()
    }

    pub fn store_children(&self, parent: NotionId, children: Vec<ContentNode>) {
        self.children.write().insert(parent, children);
    }

    /// Forgets everything. Call between unrelated page conversions, never
    /// while a fetch of the same run is in flight.
    pub fn clear(&self) {
        self.trees.write().clear();
        self.children.write().clear();
    }

    /// Number of cached subtrees and child lists.
    pub fn len(&self) -> usize {
        self.trees.read().len() + self.children.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use crate::types::BlockId;

    #[test]
    fn clear_resets_both_maps() {
        let cache = NodeCache::new();
        let node = ContentNode::new(BlockId::new_v4(), NodeKind::Divider);
        let id = NotionId::from(&node.id);

        cache.store_tree(id.clone(), node.clone());
        cache.store_children(id.clone(), vec![node]);
        assert_eq!(cache.len(), 2);
        assert!(cache.tree(&id).is_some());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.children(&id).is_none());
    }
}
