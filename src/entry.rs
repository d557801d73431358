/// A key/value pair stored in a [`BTree`](crate::BTree).
///
/// Entries are immutable once stored. Inserting an existing key replaces the whole entry
/// rather than editing it in place, so a key can never drift out of order.
///
/// # Examples
///
/// ```
/// use arbor_btree::BTree;
///
/// let mut tree = BTree::new(3).unwrap();
/// tree.insert(2, "b");
/// tree.insert(1, "a");
///
/// let entries = tree.traverse();
/// assert_eq!(entries[0].key(), &1);
/// assert_eq!(entries[0].value(), &"a");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry from its parts.
    #[must_use]
    pub const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Returns the key and value as a tuple of references.
    #[must_use]
    pub const fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Consumes the entry, returning the value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
