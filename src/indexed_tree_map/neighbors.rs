use core::borrow::Borrow;
use core::hash::Hash;

use super::IndexedTreeMap;
use crate::raw::{Handle, Side};

impl<K, V> IndexedTreeMap<K, V> {
    fn entry_at(&self, handle: Handle) -> (&K, &V) {
        let node = self.raw.node(handle);
        (node.key(), node.value())
    }

    /// Returns the first key-value pair in comparator order.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&2, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| self.entry_at(handle))
    }

    /// Returns the last key-value pair in comparator order.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| self.entry_at(handle))
    }

    /// Returns the first key in comparator order.
    #[must_use]
    pub fn first_key(&self) -> Option<&K> {
        self.first_key_value().map(|(k, _)| k)
    }

    /// Returns the last key in comparator order.
    #[must_use]
    pub fn last_key(&self) -> Option<&K> {
        self.last_key_value().map(|(k, _)| k)
    }

    /// Returns the first value in comparator order.
    #[must_use]
    pub fn first_value(&self) -> Option<&V> {
        self.first_key_value().map(|(_, v)| v)
    }

    /// Returns the last value in comparator order.
    #[must_use]
    pub fn last_value(&self) -> Option<&V> {
        self.last_key_value().map(|(_, v)| v)
    }
}

impl<K: Hash + Eq, V> IndexedTreeMap<K, V> {
    fn neighbor_of<Q>(&self, key: &Q, side: Side) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.raw.search(key)?;
        self.raw.neighbor(handle, side).map(|handle| self.entry_at(handle))
    }

    /// Returns the entry that follows `key` in comparator order.
    ///
    /// Returns `None` if `key` is not in the map or is the last key.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.extend([("a", 10), ("b", 30), ("c", 20)]);
    /// assert_eq!(map.successor_of("c"), Some((&"b", &30)));
    /// assert_eq!(map.successor_of("b"), None);
    /// assert_eq!(map.successor_of("z"), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h)
    pub fn successor_of<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.neighbor_of(key, Side::Right)
    }

    /// Returns the entry that precedes `key` in comparator order.
    ///
    /// Returns `None` if `key` is not in the map or is the first key.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.extend([("a", 10), ("b", 30), ("c", 20)]);
    /// assert_eq!(map.predecessor_of("c"), Some((&"a", &10)));
    /// assert_eq!(map.predecessor_of("a"), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h)
    pub fn predecessor_of<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.neighbor_of(key, Side::Left)
    }

    /// Returns the key that follows `key` in comparator order.
    pub fn first_key_after<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.successor_of(key).map(|(k, _)| k)
    }

    /// Returns the value that follows `key` in comparator order.
    pub fn first_value_after<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.successor_of(key).map(|(_, v)| v)
    }

    /// Returns the key that precedes `key` in comparator order.
    pub fn last_key_before<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.predecessor_of(key).map(|(k, _)| k)
    }

    /// Returns the value that precedes `key` in comparator order.
    pub fn last_value_before<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.predecessor_of(key).map(|(_, v)| v)
    }

    /// Removes the first entry in comparator order and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.pop_first(), Some((2, "a")));
    /// assert_eq!(map.pop_first(), Some((1, "b")));
    /// assert_eq!(map.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes the last entry in comparator order and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.pop_last(), Some((1, "b")));
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }
}
