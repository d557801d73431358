use alloc::vec::Vec;

use super::handle::Handle;
use super::node::Node;

/// Owns every node of one tree.
///
/// Nodes are addressed by [`Handle`]. A node leaves the arena only through [`retire`],
/// which also queues its slot for the next [`insert`], so splits and merges that cancel
/// out leave the slot vector the same length.
///
/// [`retire`]: NodeArena::retire
/// [`insert`]: NodeArena::insert
#[derive(Clone)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    vacant: Vec<Handle>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(nodes: usize) -> Self {
        Self {
            slots: Vec::with_capacity(nodes),
            vacant: Vec::new(),
        }
    }

    /// Nodes currently reachable through a handle.
    pub(crate) const fn live(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    /// Stores `node`, preferring the most recently retired slot.
    pub(crate) fn insert(&mut self, node: Node<K, V>) -> Handle {
        match self.vacant.pop() {
            Some(handle) => {
                self.slots[handle.slot()] = Some(node);
                handle
            }
            None => {
                let handle = Handle::for_slot(self.slots.len());
                self.slots.push(Some(node));
                handle
            }
        }
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        match &self.slots[handle.slot()] {
            Some(node) => node,
            None => panic!("node {} was read after it was retired", handle.slot()),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        match &mut self.slots[handle.slot()] {
            Some(node) => node,
            None => panic!("node {} was written after it was retired", handle.slot()),
        }
    }

    /// Takes a node out of the tree for good. Its handle must not be used again until
    /// `insert` hands it back out.
    pub(crate) fn retire(&mut self, handle: Handle) -> Node<K, V> {
        let Some(node) = self.slots[handle.slot()].take() else {
            panic!("node {} was retired twice", handle.slot());
        };
        self.vacant.push(handle);
        node
    }

    /// Drops every node at once.
    pub(crate) fn reset(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::raw::Order;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn tagged(tag: u32) -> Node<u32, ()> {
        let mut node = Node::new_leaf(Order::new(3).unwrap());
        node.insert_entry(0, Entry::new(tag, ()));
        node
    }

    fn tag(arena: &NodeArena<u32, ()>, handle: Handle) -> u32 {
        *arena.node(handle).entry(0).key()
    }

    #[test]
    fn retired_slot_is_handed_out_next() {
        let mut arena = NodeArena::new();
        let first = arena.insert(tagged(1));
        let second = arena.insert(tagged(2));
        assert_eq!(*arena.retire(first).entry(0).key(), 1);
        assert_eq!(arena.live(), 1);

        let third = arena.insert(tagged(3));
        assert_eq!(third, first);
        assert_eq!(tag(&arena, third), 3);
        assert_eq!(tag(&arena, second), 2);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    #[should_panic(expected = "was read after it was retired")]
    fn reading_a_retired_node_panics() {
        let mut arena = NodeArena::with_capacity(2);
        let handle = arena.insert(tagged(7));
        let _ = arena.retire(handle);
        let _ = arena.node(handle);
    }

    #[test]
    #[should_panic(expected = "was retired twice")]
    fn double_retire_panics() {
        let mut arena = NodeArena::new();
        let handle = arena.insert(tagged(7));
        let _ = arena.retire(handle);
        let _ = arena.retire(handle);
    }

    #[derive(Clone, Debug)]
    enum Step {
        Insert(u32),
        Relabel(usize, u32),
        Retire(usize),
        Reset,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            20 => any::<u32>().prop_map(Step::Insert),
            5 => (any::<usize>(), any::<u32>()).prop_map(|(which, tag)| Step::Relabel(which, tag)),
            8 => any::<usize>().prop_map(Step::Retire),
            1 => Just(Step::Reset),
        ]
    }

    proptest! {
        // Live handles keep naming the node stored under them, whatever is retired around them.
        #[test]
        fn live_handles_stay_stable(steps in prop::collection::vec(step(), 0..256)) {
            let mut arena = NodeArena::new();
            let mut live: Vec<(Handle, u32)> = Vec::new();

            for step in steps {
                match step {
                    Step::Insert(t) => live.push((arena.insert(tagged(t)), t)),
                    Step::Relabel(which, t) if !live.is_empty() => {
                        let index = which % live.len();
                        arena.node_mut(live[index].0).replace_entry(0, Entry::new(t, ()));
                        live[index].1 = t;
                    }
                    Step::Retire(which) if !live.is_empty() => {
                        let (handle, t) = live.swap_remove(which % live.len());
                        prop_assert_eq!(*arena.retire(handle).entry(0).key(), t);
                    }
                    Step::Reset => {
                        arena.reset();
                        live.clear();
                    }
                    Step::Relabel(..) | Step::Retire(_) => {}
                }

                prop_assert_eq!(arena.live(), live.len());
                for &(handle, t) in &live {
                    prop_assert_eq!(tag(&arena, handle), t);
                }
            }
        }
    }
}
