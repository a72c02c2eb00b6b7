use super::IndexedTreeMap;
use crate::comparator::Comparator;
use crate::raw::RawIndexedTree;

impl<K, V> IndexedTreeMap<K, V> {
    /// Creates an empty map ordered by `comparator`, with room for at least
    /// `capacity` bindings before the node arena or the key index reallocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::{Comparator, IndexedTreeMap};
    ///
    /// let map: IndexedTreeMap<i32, i32> = IndexedTreeMap::with_capacity(32, Comparator::by_value());
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize, comparator: Comparator<K, V>) -> Self {
        IndexedTreeMap {
            raw: RawIndexedTree::with_capacity(capacity, comparator),
        }
    }

    /// Returns how many bindings the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
