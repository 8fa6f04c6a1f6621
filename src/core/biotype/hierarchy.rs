//! Feature type term hierarchy

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::core::keys::TermKey;
use crate::core::source::ClosureRow;

/// Ancestor/descendant edges of the feature type DAG
///
/// Rows may be either the precomputed closure or direct parent/child edges;
/// descendant queries walk the graph, so both give the same answer.
#[derive(Debug, Clone, Default)]
pub struct TermHierarchy {
    children: HashMap<TermKey, Vec<TermKey>>,
}

impl TermHierarchy {
    pub fn from_rows(rows: &[ClosureRow]) -> Self {
        let mut children: HashMap<TermKey, Vec<TermKey>> = HashMap::new();
        for row in rows {
            if row.ancestor_key != row.descendant_key {
                children
                    .entry(row.ancestor_key)
                    .or_default()
                    .push(row.descendant_key);
            }
        }
        Self { children }
    }

    /// Every term below `root`, not including `root` itself
    pub fn descendants(&self, root: TermKey) -> BTreeSet<TermKey> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<TermKey> = VecDeque::from([root]);

        while let Some(term) = queue.pop_front() {
            for child in self.children.get(&term).into_iter().flatten() {
                if *child != root && seen.insert(*child) {
                    queue.push_back(*child);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(ancestor_key: TermKey, descendant_key: TermKey) -> ClosureRow {
        ClosureRow {
            ancestor_key,
            descendant_key,
        }
    }

    #[test]
    fn test_descendants_walk_edges() {
        let hierarchy = TermHierarchy::from_rows(&[edge(1, 2), edge(2, 3), edge(2, 4), edge(5, 6)]);
        assert_eq!(hierarchy.descendants(1), BTreeSet::from([2, 3, 4]));
        assert_eq!(hierarchy.descendants(2), BTreeSet::from([3, 4]));
        assert!(hierarchy.descendants(3).is_empty());
    }

    #[test]
    fn test_closure_rows_give_same_answer() {
        let edges = TermHierarchy::from_rows(&[edge(1, 2), edge(2, 3)]);
        let closure = TermHierarchy::from_rows(&[edge(1, 2), edge(1, 3), edge(2, 3), edge(1, 1)]);
        assert_eq!(edges.descendants(1), closure.descendants(1));
    }

    #[test]
    fn test_shared_descendants_counted_once() {
        // diamond: 1 -> 2, 1 -> 3, 2 -> 4, 3 -> 4
        let hierarchy =
            TermHierarchy::from_rows(&[edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4)]);
        assert_eq!(hierarchy.descendants(1), BTreeSet::from([2, 3, 4]));
    }
}
