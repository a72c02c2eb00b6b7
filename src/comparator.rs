use core::cmp::Ordering;
use core::fmt;
use std::rc::Rc;

/// A borrowed `(key, value)` view handed to a [`Comparator`].
///
/// Pairs are built on demand for a single comparison and are never stored.
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct Pair<'a, K, V> {
    /// The key of the binding being compared.
    pub key: &'a K,
    /// The value of the binding being compared.
    pub value: &'a V,
}

impl<'a, K, V> Pair<'a, K, V> {
    /// Creates a pair from a key and a value.
    #[must_use]
    pub const fn new(key: &'a K, value: &'a V) -> Self {
        Pair { key, value }
    }
}

// Manual impls: deriving would demand `K: Copy, V: Copy`.
impl<K, V> Clone for Pair<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Pair<'_, K, V> {}

type CompareFn<K, V> = dyn Fn(Pair<'_, K, V>, Pair<'_, K, V>) -> Ordering;

/// The ordering function of an [`IndexedTreeMap`](crate::IndexedTreeMap).
///
/// A comparator is a shared handle to a function over [`Pair`]s. Cloning it is
/// cheap and the clone keeps the same *identity*: handing the map a clone of
/// its current comparator is a no-op, while any other comparator triggers a
/// full rebuild of the tree.
///
/// The function should be a total pre-order. Ties are allowed; bindings that
/// compare equal keep their relative insertion order.
///
/// # Examples
///
/// ```
/// use indexed_tree::{Comparator, Pair};
///
/// let by_len = Comparator::new(|a: Pair<'_, u32, String>, b: Pair<'_, u32, String>| {
///     a.value.len().cmp(&b.value.len())
/// });
/// let short = String::from("ab");
/// let long = String::from("abcd");
/// assert!(by_len.compare(Pair::new(&1, &short), Pair::new(&2, &long)).is_lt());
/// assert!(Comparator::ptr_eq(&by_len, &by_len.clone()));
/// ```
pub struct Comparator<K, V> {
    f: Rc<CompareFn<K, V>>,
}

impl<K, V> Comparator<K, V> {
    /// Wraps an ordering function in a new comparator identity.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Pair<'_, K, V>, Pair<'_, K, V>) -> Ordering + 'static,
    {
        Comparator { f: Rc::new(f) }
    }

    /// Orders bindings by key.
    #[must_use]
    pub fn by_key() -> Self
    where
        K: Ord,
    {
        Comparator::new(|a: Pair<'_, K, V>, b: Pair<'_, K, V>| a.key.cmp(b.key))
    }

    /// Orders bindings by value, smallest first.
    #[must_use]
    pub fn by_value() -> Self
    where
        V: Ord,
    {
        Comparator::new(|a: Pair<'_, K, V>, b: Pair<'_, K, V>| a.value.cmp(b.value))
    }

    /// Orders bindings by value, largest first.
    #[must_use]
    pub fn by_value_desc() -> Self
    where
        V: Ord,
    {
        Comparator::new(|a: Pair<'_, K, V>, b: Pair<'_, K, V>| b.value.cmp(a.value))
    }

    /// Returns a new comparator that inverts this one.
    #[must_use]
    pub fn reversed(&self) -> Self
    where
        K: 'static,
        V: 'static,
    {
        let inner = Rc::clone(&self.f);
        Comparator::new(move |a: Pair<'_, K, V>, b: Pair<'_, K, V>| inner(b, a))
    }

    /// Compares two pairs.
    #[inline]
    pub fn compare(&self, a: Pair<'_, K, V>, b: Pair<'_, K, V>) -> Ordering {
        (self.f)(a, b)
    }

    /// Returns `true` if both comparators share the same function identity.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.f, &other.f)
    }
}

impl<K, V> Clone for Comparator<K, V> {
    fn clone(&self) -> Self {
        Comparator { f: Rc::clone(&self.f) }
    }
}

impl<K, V> fmt::Debug for Comparator<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator").field("f", &Rc::as_ptr(&self.f)).finish()
    }
}
