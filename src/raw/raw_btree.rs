use alloc::vec::Vec;
use core::borrow::Borrow;

use tracing::trace;

use super::arena::NodeArena;
use super::handle::Handle;
use super::node::{Node, SearchResult};
use super::order::Order;
use crate::entry::Entry;
use crate::error::{Error, Result};

/// The core B-tree implementation backing `BTree`.
#[derive(Clone)]
pub(crate) struct RawBTree<K, V> {
    /// Arena owning every node; child slots and `root` hold handles into it.
    nodes: NodeArena<K, V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Branching factor, fixed at construction.
    order: Order,
    /// Total number of entries in the tree.
    len: usize,
}

/// Outcome of inserting into a subtree.
struct Insertion<V> {
    /// Value displaced by an upsert.
    replaced: Option<V>,
    /// The subtree root now holds `order` keys and must be split by its parent.
    overflow: bool,
}

/// Outcome of removing from a subtree.
struct Removal<K, V> {
    /// The entry taken out of the subtree.
    entry: Entry<K, V>,
    /// The subtree root fell below the occupancy minimum and must be refilled by its parent.
    underflow: bool,
}

impl<K, V> RawBTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(order: Order) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            order,
            len: 0,
        }
    }

    /// Creates a new tree with node storage reserved for roughly `capacity` entries.
    pub(crate) fn with_capacity(order: Order, capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity.div_ceil(order.max_keys())),
            root: None,
            order,
            len: 0,
        }
    }

    pub(crate) const fn order(&self) -> Order {
        self.order
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.node(handle)
    }

    /// Number of live nodes in the arena.
    pub(crate) const fn node_count(&self) -> usize {
        self.nodes.live()
    }

    /// Number of levels from the root down to the leaves; zero for an empty tree.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            height += 1;
            let node = self.nodes.node(handle);
            current = (!node.is_leaf()).then(|| node.child(0));
        }
        height
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.reset();
        self.root = None;
        self.len = 0;
    }

    /// Collects every entry in ascending key order.
    pub(crate) fn traverse(&self) -> Vec<&Entry<K, V>> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root {
            self.traverse_into(root, &mut out);
        }
        out
    }

    fn traverse_into<'a>(&'a self, handle: Handle, out: &mut Vec<&'a Entry<K, V>>) {
        let node = self.nodes.node(handle);
        if node.is_leaf() {
            out.extend(node.entries());
            return;
        }

        for (i, &child) in node.children().iter().enumerate() {
            self.traverse_into(child, out);
            if let Some(entry) = node.entries().get(i) {
                out.push(entry);
            }
        }
    }

    fn has_surplus(&self, handle: Handle) -> bool {
        self.nodes.node(handle).key_count() > self.order.min_keys()
    }

    fn is_underfull(&self, handle: Handle) -> bool {
        self.nodes.node(handle).key_count() < self.order.min_keys()
    }

    fn is_overfull(&self, handle: Handle) -> bool {
        self.nodes.node(handle).key_count() > self.order.max_keys()
    }

    /// Splits the overfull child at `index`, placing the median at `parent.entries[index]`
    /// and the new right sibling at `parent.children[index + 1]`.
    fn split_child(&mut self, parent: Handle, index: usize) {
        let child = self.nodes.node(parent).child(index);
        let (median, right) = self.nodes.node_mut(child).split(self.order);
        let right_keys = right.key_count();
        let right = self.nodes.insert(right);

        let parent_node = self.nodes.node_mut(parent);
        parent_node.insert_entry(index, median);
        parent_node.insert_child(index + 1, right);

        trace!(
            target: "arbor_btree::split",
            parent = parent.slot(),
            left = child.slot(),
            right = right.slot(),
            right_keys,
            "split child"
        );
    }

    /// Replaces an overfull root with a new root holding only the promoted median.
    fn grow_root(&mut self, old_root: Handle) {
        let (median, right) = self.nodes.node_mut(old_root).split(self.order);
        let right = self.nodes.insert(right);
        let root = self.nodes.insert(Node::new_root(self.order, median, old_root, right));
        self.root = Some(root);

        trace!(
            target: "arbor_btree::root",
            root = root.slot(),
            left = old_root.slot(),
            right = right.slot(),
            "grew root"
        );
    }

    /// Retires an empty root: an empty leaf empties the tree, an empty internal node hands
    /// the root over to its only child.
    fn shrink_root(&mut self, old_root: Handle) {
        let retired = self.nodes.retire(old_root);
        self.root = (!retired.is_leaf()).then(|| retired.child(0));

        trace!(
            target: "arbor_btree::root",
            old_root = old_root.slot(),
            new_root = self.root.map(Handle::slot),
            "shrank root"
        );
    }

    /// Rotates the last entry of `children[index - 1]` through separator `index - 1` into
    /// the front of `children[index]`.
    fn borrow_left(&mut self, parent: Handle, index: usize) {
        let parent_node = self.nodes.node(parent);
        let (left, child) = (parent_node.child(index - 1), parent_node.child(index));

        let (entry, grandchild) = self.nodes.node_mut(left).pop_back();
        let separator = self.nodes.node_mut(parent).replace_entry(index - 1, entry);
        self.nodes.node_mut(child).push_front(separator, grandchild);

        trace!(target: "arbor_btree::borrow", parent = parent.slot(), index, direction = "left", "borrowed");
    }

    /// Rotates the first entry of `children[index + 1]` through separator `index` onto
    /// the back of `children[index]`.
    fn borrow_right(&mut self, parent: Handle, index: usize) {
        let parent_node = self.nodes.node(parent);
        let (child, right) = (parent_node.child(index), parent_node.child(index + 1));

        let (entry, grandchild) = self.nodes.node_mut(right).pop_front();
        let separator = self.nodes.node_mut(parent).replace_entry(index, entry);
        self.nodes.node_mut(child).push_back(separator, grandchild);

        trace!(target: "arbor_btree::borrow", parent = parent.slot(), index, direction = "right", "borrowed");
    }

    /// Folds separator `index` and `children[index + 1]` into `children[index]`, retiring
    /// the right child.
    fn merge(&mut self, parent: Handle, index: usize) {
        let parent_node = self.nodes.node_mut(parent);
        let separator = parent_node.remove_entry(index);
        let right = parent_node.remove_child(index + 1);
        let left = parent_node.child(index);

        let right_node = self.nodes.retire(right);
        self.nodes.node_mut(left).merge_with_right(separator, right_node);

        trace!(
            target: "arbor_btree::merge",
            parent = parent.slot(),
            survivor = left.slot(),
            removed = right.slot(),
            "merged children"
        );
    }

    /// Restores the occupancy minimum of `children[index]`, preferring the left sibling.
    fn fill(&mut self, parent: Handle, index: usize) {
        let parent_node = self.nodes.node(parent);
        let count = parent_node.child_count();
        if count < 2 {
            return;
        }

        let has_left = index > 0;
        let has_right = index + 1 < count;
        if has_left && self.has_surplus(parent_node.child(index - 1)) {
            self.borrow_left(parent, index);
        } else if has_right && self.has_surplus(parent_node.child(index + 1)) {
            self.borrow_right(parent, index);
        } else if has_left {
            self.merge(parent, index - 1);
        } else {
            self.merge(parent, index);
        }
    }

    /// Removes the largest entry of a subtree, repairing each level on the way back up.
    fn remove_last(&mut self, handle: Handle) -> Removal<K, V> {
        let node = self.nodes.node(handle);
        let entry = if node.is_leaf() {
            self.nodes.node_mut(handle).pop_back().0
        } else {
            let last = node.child_count() - 1;
            let child = node.child(last);
            let removal = self.remove_last(child);
            if removal.underflow {
                self.fill(handle, last);
            }
            removal.entry
        };

        Removal {
            entry,
            underflow: self.is_underfull(handle),
        }
    }

    /// Removes the smallest entry of a subtree, repairing each level on the way back up.
    fn remove_first(&mut self, handle: Handle) -> Removal<K, V> {
        let node = self.nodes.node(handle);
        let entry = if node.is_leaf() {
            self.nodes.node_mut(handle).pop_front().0
        } else {
            let child = node.child(0);
            let removal = self.remove_first(child);
            if removal.underflow {
                self.fill(handle, 0);
            }
            removal.entry
        };

        Removal {
            entry,
            underflow: self.is_underfull(handle),
        }
    }
}

impl<K: Ord, V> RawBTree<K, V> {
    /// Finds the entry for `key` by iterative descent from the root.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.node(handle);
            match node.search(key) {
                SearchResult::Found(idx) => return Some(node.entry(idx)),
                SearchResult::NotFound(_) if node.is_leaf() => return None,
                SearchResult::NotFound(idx) => current = Some(node.child(idx)),
            }
        }
        None
    }

    /// Inserts an entry, replacing any entry with an equal key.
    /// Returns the replaced value, if any.
    pub(crate) fn insert(&mut self, entry: Entry<K, V>) -> Option<V> {
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.nodes.insert(Node::new_leaf(self.order));
                self.root = Some(root);
                root
            }
        };

        let insertion = self.insert_into(root, entry);
        if insertion.overflow {
            self.grow_root(root);
        }
        if insertion.replaced.is_none() {
            self.len += 1;
        }
        insertion.replaced
    }

    fn insert_into(&mut self, handle: Handle, entry: Entry<K, V>) -> Insertion<V> {
        let node = self.nodes.node_mut(handle);
        let replaced = match node.search(entry.key()) {
            SearchResult::Found(idx) => {
                let old = node.replace_entry(idx, entry);
                return Insertion {
                    replaced: Some(old.into_value()),
                    overflow: false,
                };
            }
            SearchResult::NotFound(idx) if node.is_leaf() => {
                node.insert_entry(idx, entry);
                None
            }
            SearchResult::NotFound(idx) => {
                let child = node.child(idx);
                let insertion = self.insert_into(child, entry);
                if insertion.overflow {
                    self.split_child(handle, idx);
                }
                insertion.replaced
            }
        };

        Insertion {
            replaced,
            overflow: self.is_overfull(handle),
        }
    }

    /// Removes the entry for `key`, returning its value.
    ///
    /// A failed removal leaves every node untouched.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let root = self.root.ok_or(Error::TreeEmpty)?;
        let removal = self.remove_from(root, key)?;
        self.len -= 1;

        if self.nodes.node(root).is_empty() {
            self.shrink_root(root);
        }
        Ok(removal.entry.into_value())
    }

    fn remove_from<Q>(&mut self, handle: Handle, key: &Q) -> Result<Removal<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.node(handle);
        let entry = match (node.search(key), node.is_leaf()) {
            (SearchResult::Found(idx), true) => self.nodes.node_mut(handle).remove_entry(idx),
            (SearchResult::Found(idx), false) => self.remove_separator(handle, idx, key)?,
            (SearchResult::NotFound(_), true) => return Err(Error::KeyNotFound),
            (SearchResult::NotFound(idx), false) => {
                let child = node.child(idx);
                let removal = self.remove_from(child, key)?;
                if removal.underflow {
                    self.fill(handle, idx);
                }
                removal.entry
            }
        };

        Ok(Removal {
            entry,
            underflow: self.is_underfull(handle),
        })
    }

    /// Removes separator `index` of an internal node.
    ///
    /// A neighbouring child with surplus donates its predecessor or successor; otherwise
    /// the two children are merged around the separator and the removal continues in the
    /// merged child, which locates the key again by search.
    fn remove_separator<Q>(&mut self, handle: Handle, index: usize, key: &Q) -> Result<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let node = self.nodes.node(handle);
        let (left, right) = (node.child(index), node.child(index + 1));

        if self.has_surplus(left) {
            let predecessor = self.remove_last(left);
            let removed = self.nodes.node_mut(handle).replace_entry(index, predecessor.entry);
            if predecessor.underflow {
                self.fill(handle, index);
            }
            return Ok(removed);
        }

        if self.has_surplus(right) {
            let successor = self.remove_first(right);
            let removed = self.nodes.node_mut(handle).replace_entry(index, successor.entry);
            if successor.underflow {
                self.fill(handle, index + 1);
            }
            return Ok(removed);
        }

        self.merge(handle, index);
        // For odd orders two minimal children and their separator make `order` keys. If the
        // merged child then promotes a donor in place of the key, it keeps all of them.
        let removal = self.remove_from(left, key)?;
        if self.is_overfull(left) {
            self.split_child(handle, index);
        } else if removal.underflow {
            self.fill(handle, index);
        }
        Ok(removal.entry)
    }
}
