use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use core::ops::Index;

use crate::comparator::{Comparator, Pair};
use crate::error::{Error, Result};
use crate::raw::{RawIndexedTree, RebuildReason};

mod bulk;
mod capacity;
mod iter;
mod neighbors;

pub use iter::{IntoIter, IntoKeys, IntoValues, Iter, Keys, Values};

/// A map with O(1) key lookup whose entries are kept in the order of a
/// replaceable [`Comparator`] over `(key, value)` pairs.
///
/// Keys are hashed into an index that points at the tree node holding each
/// binding, so [`get`], [`contains_key`] and [`remove`] never search the tree.
/// Iteration, [`first_key`], [`successor_of`] and friends follow the tree,
/// which is ordered by the comparator. Bindings that compare equal keep the
/// order in which they were inserted.
///
/// The tree is not balanced. Operations that descend it (insertion, and
/// re-binding a key to a value that moves it) cost O(h), where the height h is
/// O(log n) for random insertion orders and O(n) for sorted ones.
///
/// It is a logic error for a key to be modified in such a way that its hash or
/// equality changes while it is in the map. It is *not* a logic error for a
/// value to change its position under the comparator, for example through
/// [`get_mut`] or a [`Cell`]; such a map iterates in a stale order until
/// [`rebalance_all`] or [`rebalance_where`] is called.
///
/// # Examples
///
/// ```
/// use indexed_tree::{Comparator, IndexedTreeMap};
///
/// // Order tasks by priority, most urgent first.
/// let mut tasks = IndexedTreeMap::new(Comparator::by_value_desc());
/// tasks.insert("write docs", 2);
/// tasks.insert("fix build", 9);
/// tasks.insert("lunch", 5);
///
/// assert_eq!(tasks.first_key_value(), Some((&"fix build", &9)));
///
/// // Re-prioritising moves the task.
/// tasks.insert("write docs", 10);
/// let order: Vec<_> = tasks.keys().copied().collect();
/// assert_eq!(order, ["write docs", "fix build", "lunch"]);
///
/// // Lookups do not depend on the order.
/// assert_eq!(tasks["lunch"], 5);
/// assert_eq!(tasks.remove("lunch"), Some(5));
/// ```
///
/// [`get`]: IndexedTreeMap::get
/// [`contains_key`]: IndexedTreeMap::contains_key
/// [`remove`]: IndexedTreeMap::remove
/// [`first_key`]: IndexedTreeMap::first_key
/// [`successor_of`]: IndexedTreeMap::successor_of
/// [`get_mut`]: IndexedTreeMap::get_mut
/// [`rebalance_all`]: IndexedTreeMap::rebalance_all
/// [`rebalance_where`]: IndexedTreeMap::rebalance_where
/// [`Cell`]: core::cell::Cell
pub struct IndexedTreeMap<K, V> {
    raw: RawIndexedTree<K, V>,
}

impl<K, V> IndexedTreeMap<K, V> {
    /// Makes a new, empty map ordered by `comparator`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::{Comparator, IndexedTreeMap, Pair};
    ///
    /// let mut by_length = IndexedTreeMap::new(Comparator::new(
    ///     |a: Pair<'_, u32, &'static str>, b: Pair<'_, u32, &'static str>| a.value.len().cmp(&b.value.len()),
    /// ));
    /// by_length.insert(1, "three");
    /// by_length.insert(2, "two");
    /// assert_eq!(by_length.first_value(), Some(&"two"));
    /// ```
    #[must_use]
    pub fn new(comparator: Comparator<K, V>) -> Self {
        IndexedTreeMap {
            raw: RawIndexedTree::new(comparator),
        }
    }

    /// Makes a new, empty map ordered by value, smallest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert("b", 2);
    /// map.insert("a", 3);
    /// assert_eq!(map.first_key(), Some(&"b"));
    /// ```
    #[must_use]
    pub fn by_value() -> Self
    where
        V: Ord,
    {
        IndexedTreeMap::new(Comparator::by_value())
    }

    /// Makes a new, empty map ordered by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_key();
    /// map.insert("b", 1);
    /// map.insert("a", 2);
    /// assert_eq!(map.first_key(), Some(&"a"));
    /// ```
    #[must_use]
    pub fn by_key() -> Self
    where
        K: Ord,
    {
        IndexedTreeMap::new(Comparator::by_key())
    }

    /// Returns the comparator currently ordering the map.
    ///
    /// Passing a clone of it back to [`set_comparator`](Self::set_comparator)
    /// does nothing.
    #[must_use]
    pub fn comparator(&self) -> &Comparator<K, V> {
        self.raw.comparator()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut a = IndexedTreeMap::by_value();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements. The comparator is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut a = IndexedTreeMap::by_value();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Hash + Eq, V> IndexedTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for
    /// the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get_key_value(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.contains_key(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// The tree is not told about the change. If the new value belongs
    /// somewhere else under the comparator, call
    /// [`rebalance_all`](Self::rebalance_all) or
    /// [`rebalance_where`](Self::rebalance_where) before relying on the order
    /// again. [`update`](Self::update) moves the binding immediately instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    /// *map.get_mut("a").unwrap() = 3;
    /// map.rebalance_all();
    /// assert_eq!(map.first_key(), Some(&"b"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.get_mut(key)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h) for a node with two children (its in-order successor is located
    /// below it), O(1) otherwise.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    ///
    /// # Complexity
    ///
    /// See [`remove`](Self::remove).
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.raw.remove_entry(key)
    }
}

impl<K: Clone + Hash + Eq, V> IndexedTreeMap<K, V> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, the binding is placed after
    /// every binding it does not compare less than, and `None` is returned.
    ///
    /// If the map did have this key present, the value is updated and the old
    /// value is returned. When the new pair compares equal to the old one the
    /// value is swapped in place; otherwise the binding is moved to its new
    /// position. The key itself is not updated.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert(key, value).1
    }

    /// Replaces the value of an existing key with `f(&old)`, moving the
    /// binding if the new value orders differently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the key is not in the map.
    /// Use [`update_or_insert_with`](Self::update_or_insert_with) to supply a
    /// value for missing keys instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::{Error, IndexedTreeMap};
    ///
    /// let mut stock = IndexedTreeMap::by_value();
    /// stock.insert("apples", 3);
    /// stock.insert("pears", 5);
    ///
    /// assert_eq!(stock.update("apples", |n| n + 10), Ok(&13));
    /// assert_eq!(stock.first_key(), Some(&"pears"));
    /// assert_eq!(stock.update("plums", |n| n + 1), Err(Error::InvalidArgument));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) if the new value compares equal to the old one, O(h) otherwise.
    pub fn update<Q, F>(&mut self, key: &Q, f: F) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> V,
    {
        let handle = self.raw.search(key).ok_or(Error::InvalidArgument)?;
        let node = self.raw.node(handle);
        let value = f(node.value());
        let key = node.key().clone();
        let (handle, _) = self.raw.insert(key, value);
        Ok(self.raw.node(handle).value())
    }

    /// Replaces the value of `key` with `f(&old)`, or binds it to
    /// `on_absent()` if it is not in the map. The fallback value is installed
    /// as is; `f` is not applied to it.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut counts = IndexedTreeMap::by_value();
    /// for word in ["b", "a", "b"] {
    ///     counts.update_or_insert_with(word, |n| n + 1, || 1);
    /// }
    /// assert_eq!(counts.get("b"), Some(&2));
    /// assert_eq!(counts.last_key(), Some(&"b"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h)
    pub fn update_or_insert_with<F, D>(&mut self, key: K, f: F, on_absent: D) -> &V
    where
        F: FnOnce(&V) -> V,
        D: FnOnce() -> V,
    {
        let value = match self.raw.search(&key) {
            Some(handle) => f(self.raw.node(handle).value()),
            None => on_absent(),
        };
        let (handle, _) = self.raw.insert(key, value);
        self.raw.node(handle).value()
    }

    /// Replaces the comparator and reorders the map under it.
    ///
    /// If `comparator` is the comparator already in use (or a clone of it)
    /// nothing happens. Otherwise every binding is extracted in the current
    /// order, the tree is discarded, and the bindings are inserted again under
    /// the new comparator, so bindings that tie under it keep their previous
    /// relative order.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::{Comparator, IndexedTreeMap};
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.extend([("a", 10), ("b", 30), ("c", 20)]);
    /// map.set_comparator(Comparator::by_value_desc());
    /// let values: Vec<_> = map.values().copied().collect();
    /// assert_eq!(values, [30, 20, 10]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n · h) for the rebuild, O(n²) in the worst case.
    pub fn set_comparator(&mut self, comparator: Comparator<K, V>) {
        self.raw.set_comparator(comparator);
    }

    /// Orders the map by a new ordering function. Always rebuilds.
    ///
    /// Shorthand for `set_comparator(Comparator::new(f))`.
    pub fn set_ordering_fn<F>(&mut self, f: F)
    where
        F: Fn(Pair<'_, K, V>, Pair<'_, K, V>) -> core::cmp::Ordering + 'static,
    {
        self.set_comparator(Comparator::new(f));
    }

    /// Rebuilds the whole tree under the current comparator.
    ///
    /// Use this after values were changed in ways the map could not see,
    /// such as through [`get_mut`](Self::get_mut) or interior mutability.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use indexed_tree::{Comparator, IndexedTreeMap, Pair};
    ///
    /// let mut map = IndexedTreeMap::new(Comparator::new(
    ///     |a: Pair<'_, &'static str, Rc<Cell<i32>>>, b: Pair<'_, &'static str, Rc<Cell<i32>>>| a.value.get().cmp(&b.value.get()),
    /// ));
    /// let shared = Rc::new(Cell::new(1));
    /// map.insert("shared", Rc::clone(&shared));
    /// map.insert("other", Rc::new(Cell::new(2)));
    ///
    /// shared.set(3);
    /// map.rebalance_all();
    /// assert_eq!(map.last_key(), Some(&"shared"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n · h), O(n²) in the worst case.
    pub fn rebalance_all(&mut self) {
        self.raw.rebuild(RebuildReason::RebalanceAll);
    }

    /// Moves only the bindings for which `pred` returns `true` back into
    /// position, leaving the rest of the tree untouched. Returns how many
    /// bindings were moved.
    ///
    /// The selected bindings are removed in their current order and inserted
    /// again into the remaining tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexed_tree::IndexedTreeMap;
    ///
    /// let mut map = IndexedTreeMap::by_value();
    /// map.extend([("a", 1), ("b", 2), ("c", 3)]);
    /// *map.get_mut("a").unwrap() = 4;
    /// assert_eq!(map.rebalance_where(|k, _| *k == "a"), 1);
    /// assert_eq!(map.last_key(), Some(&"a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n + m · h) for m selected bindings.
    pub fn rebalance_where<F>(&mut self, pred: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.raw.rebuild_where(pred)
    }
}

impl<K: Clone, V: Clone> Clone for IndexedTreeMap<K, V> {
    fn clone(&self) -> Self {
        IndexedTreeMap { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IndexedTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold equal entries in the same order.
/// Comparators are not compared.
impl<K: PartialEq, V: PartialEq> PartialEq for IndexedTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for IndexedTreeMap<K, V> {}

impl<K, Q, V> Index<&Q> for IndexedTreeMap<K, V>
where
    K: Borrow<Q> + Hash + Eq,
    Q: ?Sized + Hash + Eq,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `IndexedTreeMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
