use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use crate::DEFAULT_ORDER;
use crate::entry::Entry;
use crate::error::{Error, InvariantViolation, Result};
use crate::raw::{Order, RawBTree};

/// An ordered map based on a classic [B-Tree].
///
/// Keys must implement [`Ord`]; entries are kept in ascending key order and every node
/// carries its own key/value pairs, internal nodes included. The branching factor is chosen
/// at construction: a node holds at most `order - 1` keys at rest and `order` children.
///
/// Nodes live in an arena owned by the tree and are linked by index, so every child has
/// exactly one parent and no node is shared.
///
/// The tree is not internally synchronized. Mutation takes `&mut self`; to share a tree
/// between threads wrap it in a lock.
///
/// # Examples
///
/// ```
/// use arbor_btree::{BTree, Error};
///
/// let mut tree = BTree::new(3)?;
/// for (k, v) in [(1, "a"), (2, "b"), (3, "c"), (4, "d")] {
///     tree.insert(k, v);
/// }
///
/// assert_eq!(tree.search(&3), Ok(&"c"));
/// assert_eq!(tree.search(&9), Err(Error::KeyNotFound));
///
/// // Duplicate keys replace the stored value.
/// assert_eq!(tree.insert(3, "C"), Some("c"));
/// assert_eq!(tree.len(), 4);
///
/// assert_eq!(tree.remove(&1), Ok("a"));
/// let keys: Vec<_> = tree.traverse().iter().map(|e| *e.key()).collect();
/// assert_eq!(keys, [2, 3, 4]);
/// # Ok::<(), Error>(())
/// ```
///
/// [B-Tree]: https://en.wikipedia.org/wiki/B-tree
#[derive(Clone)]
pub struct BTree<K, V> {
    raw: RawBTree<K, V>,
}

impl<K, V> BTree<K, V> {
    /// Makes a new, empty `BTree` with the given branching factor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `order` is below [`MIN_ORDER`](crate::MIN_ORDER).
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_btree::{BTree, Error};
    ///
    /// let tree: BTree<u32, &str> = BTree::new(8).unwrap();
    /// assert!(tree.is_empty());
    ///
    /// assert_eq!(BTree::<u32, &str>::new(2).err(), Some(Error::InvalidOrder { order: 2 }));
    /// ```
    pub fn new(order: usize) -> Result<Self> {
        Ok(BTree {
            raw: RawBTree::new(Order::new(order)?),
        })
    }

    /// Makes a new, empty `BTree` with node storage reserved for about `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if `order` is below [`MIN_ORDER`](crate::MIN_ORDER).
    pub fn with_capacity(order: usize, capacity: usize) -> Result<Self> {
        Ok(BTree {
            raw: RawBTree::with_capacity(Order::new(order)?, capacity),
        })
    }

    /// Returns the branching factor the tree was built with.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.raw.order().get()
    }

    /// Returns the number of entries in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of node levels, or zero for an empty tree.
    ///
    /// ```
    /// use arbor_btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// assert_eq!(tree.height(), 0);
    /// tree.extend([(1, ()), (2, ())]);
    /// assert_eq!(tree.height(), 1);
    /// tree.insert(3, ());
    /// assert_eq!(tree.height(), 2);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Removes every entry, keeping the branching factor.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns every entry in ascending key order.
    ///
    /// The sequence is rebuilt by a full in-order walk on each call.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_btree::BTree;
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// for (k, v) in [(3, 'c'), (1, 'a'), (2, 'b')] {
    ///     tree.insert(k, v);
    /// }
    ///
    /// let pairs: Vec<_> = tree.traverse().into_iter().map(|e| e.as_pair()).collect();
    /// assert_eq!(pairs, [(&1, &'a'), (&2, &'b'), (&3, &'c')]);
    /// ```
    #[must_use]
    pub fn traverse(&self) -> Vec<&Entry<K, V>> {
        self.raw.traverse()
    }
}

impl<K: Ord, V> BTree<K, V> {
    /// Returns a reference to the value stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent, including when the tree is empty.
    pub fn search<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).map(Entry::value).ok_or(Error::KeyNotFound)
    }

    /// Returns a reference to the value stored for `key`, if any.
    ///
    /// ```
    /// use arbor_btree::BTree;
    ///
    /// let mut tree = BTree::new(4).unwrap();
    /// tree.insert("k".to_string(), 1);
    /// assert_eq!(tree.get("k"), Some(&1));
    /// assert_eq!(tree.get("missing"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).map(Entry::value)
    }

    /// Returns `true` if the tree holds an entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Inserts a key/value pair.
    ///
    /// If the key is already present its entry is replaced and the previous value returned;
    /// the entry count does not change. Insertion never fails.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(Entry::new(key, value))
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TreeEmpty`] if the tree holds no entries and [`Error::KeyNotFound`]
    /// if the key is absent. The tree is unchanged in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_btree::{BTree, Error};
    ///
    /// let mut tree = BTree::new(3).unwrap();
    /// assert_eq!(tree.remove(&1), Err(Error::TreeEmpty));
    ///
    /// tree.insert(1, "a");
    /// assert_eq!(tree.remove(&2), Err(Error::KeyNotFound));
    /// assert_eq!(tree.remove(&1), Ok("a"));
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Verifies the structural invariants of the whole tree.
    ///
    /// Checks key ordering and separation, node occupancy, child counts, uniform leaf depth,
    /// the cached length, and that every allocated node is reachable exactly once. This is
    /// an O(n) walk intended for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] encountered.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.raw.check_invariants()
    }
}

impl<K, V> Default for BTree<K, V> {
    /// Creates an empty `BTree` with [`DEFAULT_ORDER`].
    fn default() -> Self {
        BTree {
            raw: RawBTree::new(default_order()),
        }
    }
}

fn default_order() -> Order {
    match Order::new(DEFAULT_ORDER) {
        Ok(order) => order,
        Err(_) => unreachable!("DEFAULT_ORDER is at least MIN_ORDER"),
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.traverse().into_iter().map(Entry::as_pair)).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BTree<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut tree = BTree::default();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for BTree<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for pair in iter {
            self.raw.insert(Entry::from(pair));
        }
    }
}
