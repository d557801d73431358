use super::handle::Handle;
use super::raw_btree::RawBTree;
use crate::entry::Entry;
use crate::error::InvariantViolation;

/// Running totals gathered while walking the tree.
#[derive(Default)]
struct Walk {
    leaf_depth: Option<usize>,
    entries: usize,
    nodes: usize,
}

impl<K: Ord, V> RawBTree<K, V> {
    /// Walks the whole tree and reports the first structural defect found.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut walk = Walk::default();
        if let Some(root) = self.root() {
            if self.node(root).is_empty() {
                return Err(InvariantViolation::EmptyRoot);
            }
            self.check_node(root, true, 0, None, None, &mut walk)?;
        }

        if walk.entries != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.len(),
                found: walk.entries,
            });
        }
        if walk.nodes != self.node_count() {
            return Err(InvariantViolation::LeakedNodes {
                allocated: self.node_count(),
                reachable: walk.nodes,
            });
        }
        Ok(())
    }

    fn check_node<'a>(
        &'a self,
        handle: Handle,
        is_root: bool,
        depth: usize,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        walk: &mut Walk,
    ) -> Result<(), InvariantViolation> {
        let node = self.node(handle);
        let keys = node.key_count();
        walk.nodes += 1;
        walk.entries += keys;

        let order = self.order();
        if keys > order.max_keys() {
            return Err(InvariantViolation::Overfull {
                keys,
                max: order.max_keys(),
            });
        }
        if !is_root && keys < order.min_keys() {
            return Err(InvariantViolation::Underfull {
                keys,
                min: order.min_keys(),
            });
        }
        if node.entries().windows(2).any(|pair| pair[0].key() >= pair[1].key()) {
            return Err(InvariantViolation::Unsorted);
        }
        if let (Some(first), Some(last)) = (node.entries().first(), node.entries().last()) {
            if lower.is_some_and(|lo| first.key() <= lo) || upper.is_some_and(|hi| last.key() >= hi) {
                return Err(InvariantViolation::Separation);
            }
        }

        if node.is_leaf() {
            match walk.leaf_depth {
                None => walk.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(InvariantViolation::UnevenDepth { expected, found: depth });
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.child_count() != keys + 1 {
            return Err(InvariantViolation::ChildCount {
                keys,
                children: node.child_count(),
            });
        }
        for (i, &child) in node.children().iter().enumerate() {
            let lo = if i == 0 { lower } else { Some(node.entry(i - 1).key()) };
            let hi = node.entries().get(i).map(Entry::key).or(upper);
            self.check_node(child, false, depth + 1, lo, hi, walk)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::super::order::Order;
    use super::*;

    #[test]
    fn empty_tree_is_valid() {
        let tree: RawBTree<u8, ()> = RawBTree::new(Order::new(3).unwrap());
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn multi_level_tree_is_valid() {
        let mut tree = RawBTree::new(Order::new(4).unwrap());
        for k in (0..100u32).rev() {
            tree.insert(Entry::new(k, ()));
        }
        assert_eq!(tree.check_invariants(), Ok(()));
        assert!(tree.height() > 2);
    }
}
