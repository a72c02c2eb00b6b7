use core::borrow::Borrow;
use core::cmp::Ordering;
use core::hash::Hash;
use std::collections::HashMap;

use tracing::{debug, trace};

use super::arena::Arena;
use super::cursor::Cursor;
use super::handle::Handle;
use super::node::{Node, Side};
use crate::comparator::{Comparator, Pair};

/// The unbalanced binary search tree and key index backing `IndexedTreeMap`.
///
/// Every mutation keeps the node links and the key index consistent before it
/// returns; there is no intermediate state visible to callers.
#[derive(Clone)]
pub(crate) struct RawIndexedTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Key index: maps every key in the tree to the node holding it.
    index: HashMap<K, Handle>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Ordering used for every comparison made by the tree.
    comparator: Comparator<K, V>,
}

/// Why a full rebuild was requested.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RebuildReason {
    /// The comparator was replaced.
    Reorder,
    /// Values changed behind the tree's back.
    RebalanceAll,
}

impl<K, V> RawIndexedTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) fn new(comparator: Comparator<K, V>) -> Self {
        Self {
            nodes: Arena::new(),
            index: HashMap::new(),
            root: None,
            comparator,
        }
    }

    /// Creates a new tree with room for `capacity` bindings.
    pub(crate) fn with_capacity(capacity: usize, comparator: Comparator<K, V>) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            root: None,
            comparator,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().min(self.index.capacity())
    }

    pub(crate) fn comparator(&self) -> &Comparator<K, V> {
        &self.comparator
    }

    /// Releases every node and empties the key index.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.root = None;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    /// Returns a mutable reference to a value by handle.
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        self.nodes.get_mut(handle).value_mut()
    }

    pub(crate) fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    /// Empties the tree, returning its bindings in order.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let order = self.in_order();
        let mut nodes = core::mem::replace(&mut self.nodes, Arena::new());
        self.index.clear();
        self.root = None;
        order.into_iter().map(|handle| nodes.take(handle).into_entry()).collect()
    }

    /// Collects every handle in order.
    fn in_order(&self) -> Vec<Handle> {
        let mut cursor = self.cursor();
        let mut handles = Vec::with_capacity(self.len());
        while let Some(handle) = cursor.advance(self) {
            handles.push(handle);
        }
        handles
    }

    /// Follows `side` links from `handle` as far as they go.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.nodes.get(handle)[side] {
            handle = child;
        }
        handle
    }

    /// Returns the first node in order.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    /// Returns the last node in order.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Returns the in-order neighbour of `handle` in direction `side`
    /// (`Right` for the successor, `Left` for the predecessor).
    ///
    /// If the node has a subtree on that side the neighbour is that subtree's
    /// nearest extreme; otherwise it is the first ancestor reached by climbing
    /// out of its `side.opposite()` subtree.
    pub(crate) fn neighbor(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.nodes.get(handle)[side] {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut child = handle;
        while let Some(parent) = self.nodes.get(child).parent() {
            if self.nodes.get(parent)[side.opposite()] == Some(child) {
                return Some(parent);
            }
            child = parent;
        }
        None
    }

    /// Points whichever link referred to `old` at `new` instead.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = self.nodes.get_mut(parent);
                match parent.side_of(old) {
                    Some(side) => parent[side] = new,
                    None => unreachable!("`RawIndexedTree::replace_child()` - parent does not link to child!"),
                }
            }
        }
    }

    /// Unlinks a node with at most one child, hoisting that child into its place.
    /// The node stays allocated and is left dangling.
    fn splice_out(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let parent = node.parent();
        let child = node.sole_child();
        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(parent);
        }
        self.replace_child(parent, handle, child);
    }
}

impl<K: Hash + Eq, V> RawIndexedTree<K, V> {
    /// Resolves a key to its node through the key index.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.get(key).copied()
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.search(key).map(|handle| self.nodes.get(handle).value())
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.nodes.get(self.search(key)?);
        Some((node.key(), node.value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.search(key)?;
        Some(self.value_mut(handle))
    }

    /// Returns true if the tree contains the specified key.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.search(key)?;
        Some(self.remove_handle(handle))
    }

    /// Removes the binding held by `handle`.
    ///
    /// A node with two children is not unlinked: its in-order successor (the
    /// leftmost node of its right subtree, which has no left child) is spliced
    /// out instead, and the successor's key and value move into this node's
    /// slot. The successor's key is re-pointed at the recycled slot.
    pub(crate) fn remove_handle(&mut self, handle: Handle) -> (K, V) {
        let node = self.nodes.get(handle);
        let (key, value) = match (node.left(), node.right()) {
            (Some(_), Some(right)) => {
                let successor = self.extreme(right, Side::Left);
                trace!(?handle, ?successor, "recycling node for its in-order successor");
                self.splice_out(successor);
                let (successor_key, successor_value) = self.nodes.take(successor).into_entry();
                if let Some(slot) = self.index.get_mut(&successor_key) {
                    *slot = handle;
                }
                self.nodes.get_mut(handle).replace_entry(successor_key, successor_value)
            }
            _ => {
                self.splice_out(handle);
                self.nodes.take(handle).into_entry()
            }
        };
        self.index.remove(&key);
        (key, value)
    }

    /// Removes and returns the first binding in order.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first()?;
        Some(self.remove_handle(first))
    }

    /// Removes and returns the last binding in order.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last()?;
        Some(self.remove_handle(last))
    }
}

impl<K: Clone + Hash + Eq, V> RawIndexedTree<K, V> {
    /// Inserts a binding, returning its node and the value it replaced.
    ///
    /// Re-binding an existing key keeps the node in place when the new pair
    /// compares equal to the old one; otherwise the binding is removed and
    /// inserted again so that it lands in its new position.
    pub(crate) fn insert(&mut self, key: K, value: V) -> (Handle, Option<V>) {
        let Some(handle) = self.search(&key) else {
            return (self.attach(key, value), None);
        };

        let node = self.nodes.get(handle);
        let ordering = self
            .comparator
            .compare(Pair::new(&key, &value), Pair::new(node.key(), node.value()));
        if ordering == Ordering::Equal {
            let old = self.nodes.get_mut(handle).replace_value(value);
            return (handle, Some(old));
        }

        trace!(?ordering, "relocating re-bound key");
        let (key, old) = self.remove_handle(handle);
        (self.attach(key, value), Some(old))
    }

    /// Links a binding whose key is not in the tree yet.
    ///
    /// Descends left while the new pair compares strictly less than the
    /// current node and right otherwise, so ties are placed after every
    /// binding they compare equal to.
    fn attach(&mut self, key: K, value: V) -> Handle {
        debug_assert!(!self.index.contains_key(&key), "`RawIndexedTree::attach()` - key is already indexed!");

        let Some(mut current) = self.root else {
            let handle = self.nodes.alloc(Node::new(key.clone(), value));
            self.index.insert(key, handle);
            self.root = Some(handle);
            return handle;
        };

        let (parent, side) = loop {
            let node = self.nodes.get(current);
            let side = match self.comparator.compare(Pair::new(&key, &value), Pair::new(node.key(), node.value())) {
                Ordering::Less => Side::Left,
                Ordering::Equal | Ordering::Greater => Side::Right,
            };
            match node[side] {
                Some(child) => current = child,
                None => break (current, side),
            }
        };

        let mut node = Node::new(key.clone(), value);
        node.set_parent(Some(parent));
        let handle = self.nodes.alloc(node);
        self.nodes.get_mut(parent)[side] = Some(handle);
        self.index.insert(key, handle);
        handle
    }

    /// Replaces the comparator, rebuilding the tree unless `comparator` is
    /// the one already in use. Returns whether a rebuild happened.
    pub(crate) fn set_comparator(&mut self, comparator: Comparator<K, V>) -> bool {
        if Comparator::ptr_eq(&self.comparator, &comparator) {
            trace!("comparator unchanged; keeping tree");
            return false;
        }
        self.comparator = comparator;
        self.rebuild(RebuildReason::Reorder);
        true
    }

    /// Extracts every binding in current order, discards the tree and the
    /// key index, and inserts the bindings again under the current comparator.
    pub(crate) fn rebuild(&mut self, reason: RebuildReason) {
        if self.is_empty() {
            return;
        }
        debug!(?reason, len = self.len(), "rebuilding tree");

        let order = self.in_order();
        let mut nodes = core::mem::replace(&mut self.nodes, Arena::with_capacity(order.len()));
        self.index.clear();
        self.root = None;
        for handle in order {
            let (key, value) = nodes.take(handle).into_entry();
            self.attach(key, value);
        }
    }

    /// Re-inserts only the bindings matching `pred`, in their current order.
    /// Returns how many bindings were moved.
    pub(crate) fn rebuild_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let keys: Vec<K> = self
            .in_order()
            .into_iter()
            .map(|handle| self.nodes.get(handle))
            .filter(|node| pred(node.key(), node.value()))
            .map(|node| node.key().clone())
            .collect();
        if keys.is_empty() {
            return 0;
        }
        debug!(moved = keys.len(), len = self.len(), "partially rebuilding tree");

        let entries: Vec<(K, V)> = keys.iter().filter_map(|key| self.remove_entry(key)).collect();
        let moved = entries.len();
        for (key, value) in entries {
            self.attach(key, value);
        }
        moved
    }
}
