use core::borrow::Borrow;
use core::hash::Hash;

use super::IndexedTreeMap;
use crate::comparator::Comparator;

impl<K: Clone + Hash + Eq, V> IndexedTreeMap<K, V> {
    /// Creates a map ordered by `comparator` holding the bindings of `iter`.
    ///
    /// Later bindings for a key replace earlier ones, as with
    /// [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::{Comparator, IndexedTreeMap};
    ///
    /// let map = IndexedTreeMap::from_iter_with([("a", 1), ("b", 2), ("a", 3)], Comparator::by_value_desc());
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.first_key_value(), Some((&"a", &3)));
    /// ```
    pub fn from_iter_with<I>(iter: I, comparator: Comparator<K, V>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = IndexedTreeMap::new(comparator);
        map.add_all(iter);
        map
    }

    /// Inserts every binding of `iter`, in iteration order.
    ///
    /// # Complexity
    ///
    /// O(m · h) for m bindings.
    pub fn add_all<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }

    /// Removes every binding for which `pred` returns `true` and returns how
    /// many were removed. The predicate sees the bindings in comparator
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map: IndexedTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// assert_eq!(map.remove_where(|_, v| v % 20 == 0), 4);
    /// assert!(map.keys().copied().eq([1, 3, 5, 7]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n + m · h) for m removed bindings.
    pub fn remove_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        // Two-child removals move entries between nodes, so collect keys
        // rather than handles.
        let doomed: Vec<K> = self
            .iter()
            .filter(|&(k, v)| pred(k, v))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &doomed {
            self.raw.remove_entry(key);
        }
        doomed.len()
    }

    /// Retains only the bindings specified by the predicate.
    ///
    /// In other words, removes all pairs `(k, v)` for which `f(&k, &v)`
    /// returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map: IndexedTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq([(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.remove_where(|k, v| !f(k, v));
    }

    /// Removes every key yielded by `keys` and returns how many were present.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.extend([("a", 1), ("b", 2), ("c", 3)]);
    /// assert_eq!(map.remove_all(["a", "c", "z"].iter()), 2);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove_all<'q, Q, I>(&mut self, keys: I) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        keys.into_iter()
            .filter(|key| self.raw.remove_entry(*key).is_some())
            .count()
    }
}

impl<K: Clone + Hash + Eq, V> Extend<(K, V)> for IndexedTreeMap<K, V> {
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.add_all(iter);
    }
}

impl<'a, K, V> Extend<(&'a K, &'a V)> for IndexedTreeMap<K, V>
where
    K: Copy + Hash + Eq + 'a,
    V: Copy + 'a,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.add_all(iter.into_iter().map(|(&k, &v)| (k, v)));
    }
}

/// Collects into a map ordered by value, as [`IndexedTreeMap::by_value`].
impl<K: Clone + Hash + Eq, V: Ord> FromIterator<(K, V)> for IndexedTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        IndexedTreeMap::from_iter_with(iter, Comparator::by_value())
    }
}

impl<K: Clone + Hash + Eq, V: Ord, const N: usize> From<[(K, V); N]> for IndexedTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into a map ordered by value.
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let map1 = IndexedTreeMap::from([(1, 2), (3, 4)]);
    /// let map2: IndexedTreeMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        IndexedTreeMap::from_iter(arr)
    }
}
