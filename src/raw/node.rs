use alloc::vec::Vec;
use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;
use super::order::Order;
use crate::entry::Entry;

/// Child handles stored inline before spilling to the heap (orders up to 15).
pub(crate) const INLINE_CHILDREN: usize = 16;

/// One B-tree node: a sorted run of entries plus, for internal nodes, one more child
/// handle than entries.
///
/// Methods here only touch this node's own slots. Anything that needs a sibling or a
/// child's contents goes through `RawBTree`, which owns the arena.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    // Strictly ascending by key. Reserved for `order` entries, the transient overflow size.
    entries: Vec<Entry<K, V>>,
    // Empty for a leaf; `entries.len() + 1` handles for an internal node at rest.
    children: SmallVec<[Handle; INLINE_CHILDREN]>,
}

/// Result of searching for a key in a node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted, and the child to descend into.
    NotFound(usize),
}

impl<K, V> Node<K, V> {
    /// Creates an empty leaf with room for `order` entries.
    pub(crate) fn new_leaf(order: Order) -> Self {
        Self {
            entries: Vec::with_capacity(order.get()),
            children: SmallVec::new(),
        }
    }

    /// Creates an internal node holding a single separator between two children.
    pub(crate) fn new_root(order: Order, separator: Entry<K, V>, left: Handle, right: Handle) -> Self {
        let mut node = Self::new_internal(order);
        node.entries.push(separator);
        node.children.push(left);
        node.children.push(right);
        node
    }

    fn new_internal(order: Order) -> Self {
        Self {
            entries: Vec::with_capacity(order.get()),
            children: SmallVec::with_capacity(order.get() + 1),
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub(crate) fn entry(&self, index: usize) -> &Entry<K, V> {
        &self.entries[index]
    }

    pub(crate) fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    pub(crate) fn children(&self) -> &[Handle] {
        &self.children
    }

    /// Binary search over the entry slots.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.entries.binary_search_by(|e| e.key().borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Inserts an entry at `index`, shifting later slots right.
    pub(crate) fn insert_entry(&mut self, index: usize, entry: Entry<K, V>) {
        self.entries.insert(index, entry);
    }

    /// Removes the entry at `index`, shifting later slots left.
    pub(crate) fn remove_entry(&mut self, index: usize) -> Entry<K, V> {
        self.entries.remove(index)
    }

    /// Swaps in a new entry at `index` and returns the old one.
    pub(crate) fn replace_entry(&mut self, index: usize, entry: Entry<K, V>) -> Entry<K, V> {
        core::mem::replace(&mut self.entries[index], entry)
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: Handle) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> Handle {
        self.children.remove(index)
    }

    /// Prepends an entry and, for internal nodes, the child that precedes it.
    pub(crate) fn push_front(&mut self, entry: Entry<K, V>, child: Option<Handle>) {
        self.entries.insert(0, entry);
        if let Some(child) = child {
            self.children.insert(0, child);
        }
    }

    /// Appends an entry and, for internal nodes, the child that follows it.
    pub(crate) fn push_back(&mut self, entry: Entry<K, V>, child: Option<Handle>) {
        self.entries.push(entry);
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    /// Detaches the first entry and, for internal nodes, the first child.
    pub(crate) fn pop_front(&mut self) -> (Entry<K, V>, Option<Handle>) {
        let child = if self.is_leaf() { None } else { Some(self.children.remove(0)) };
        (self.entries.remove(0), child)
    }

    /// Detaches the last entry and, for internal nodes, the last child.
    pub(crate) fn pop_back(&mut self) -> (Entry<K, V>, Option<Handle>) {
        let last = self.entries.len() - 1;
        (self.entries.remove(last), self.children.pop())
    }

    /// Splits an overfull node around its median.
    ///
    /// Entries after the median, and for internal nodes the children after the median's
    /// position, move to the returned right node. The median is removed from `self`.
    pub(crate) fn split(&mut self, order: Order) -> (Entry<K, V>, Self) {
        let mid = Order::split_index(self.entries.len());

        let mut right = if self.is_leaf() { Self::new_leaf(order) } else { Self::new_internal(order) };
        right.entries.extend(self.entries.drain(mid + 1..));
        if !self.is_leaf() {
            right.children.extend(self.children.drain(mid + 1..));
        }

        let median = self.entries.remove(mid);
        (median, right)
    }

    /// Absorbs `separator` followed by every entry and child of `right`.
    pub(crate) fn merge_with_right(&mut self, separator: Entry<K, V>, mut right: Self) {
        self.entries.push(separator);
        self.entries.append(&mut right.entries);
        self.children.extend(right.children);
    }
}
