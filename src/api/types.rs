// src/api/types.rs
//! Immutable context threaded through recursive fetching.

use crate::error::AppError;
use crate::types::NotionId;

/// Nodes on the path from the fetch root to the node being resolved.
///
/// Synced-block aliases add both the alias and its target, so a chain of
/// aliases that loops back onto itself is detected before it is followed.
/// Persistent collections keep the per-child clones cheap.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    visited: im::HashSet<NotionId>,
    path: im::Vector<NotionId>,
}

impl FetchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new context with `id` on the path.
    pub fn with_visited(&self, id: NotionId) -> Self {
        let mut next = self.clone();
        next.visited.insert(id.clone());
        next.path.push_back(id);
        next
    }

    pub fn contains(&self, id: &NotionId) -> bool {
        self.visited.contains(id)
    }

    /// Fails when following `id` would revisit a node already on the path.
    pub fn ensure_unvisited(&self, id: &NotionId) -> Result<(), AppError> {
        if !self.contains(id) {
            return Ok(());
        }
        let chain = self
            .path
            .iter()
            .chain(std::iter::once(id))
            .map(NotionId::to_hyphenated)
            .collect();
        Err(AppError::SyncedCycle { chain })
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> NotionId {
        NotionId::parse(&format!("{:032x}", n)).unwrap()
    }

    #[test]
    fn contexts_are_independent() {
        let root = FetchContext::new().with_visited(id(1));
        let left = root.with_visited(id(2));
        let right = root.with_visited(id(3));

        assert!(left.contains(&id(2)));
        assert!(!right.contains(&id(2)));
        assert_eq!(root.depth(), 1);
    }

    #[test]
    fn revisiting_reports_the_chain() {
        let ctx = FetchContext::new().with_visited(id(1)).with_visited(id(2));
        let err = ctx.ensure_unvisited(&id(1)).unwrap_err();

        match err {
            AppError::SyncedCycle { chain } => {
                assert_eq!(chain.len(), 3);
                assert_eq!(chain[0], chain[2]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(ctx.ensure_unvisited(&id(3)).is_ok());
    }
}
