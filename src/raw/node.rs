use core::ops::{Index, IndexMut};

use super::handle::Handle;

/// Which child slot of a node a link occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A binary search tree node stored in the arena.
///
/// `left` and `right` are owning edges in the sense that a child slot is only
/// ever referenced by one parent; `parent` is a plain back-reference used for
/// climbing and re-linking.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<Handle>,
    children: [Option<Handle>; 2],
}

impl<K, V> Node<K, V> {
    /// Creates a detached node.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            parent: None,
            children: [None, None],
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the stored value, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    /// Moves a new key and value into this node, returning the old pair.
    /// Links are left untouched.
    pub(crate) fn replace_entry(&mut self, key: K, value: V) -> (K, V) {
        (core::mem::replace(&mut self.key, key), core::mem::replace(&mut self.value, value))
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self[Side::Left]
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self[Side::Right]
    }

    /// Returns the side on which `child` hangs off this node, if it does.
    pub(crate) fn side_of(&self, child: Handle) -> Option<Side> {
        if self.left() == Some(child) {
            Some(Side::Left)
        } else if self.right() == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Returns the only child of a node with at most one child.
    /// `None` for leaves; callers check for two children first.
    pub(crate) fn sole_child(&self) -> Option<Handle> {
        debug_assert!(
            self.left().is_none() || self.right().is_none(),
            "`Node::sole_child()` - node has two children!"
        );
        self.left().or(self.right())
    }
}

impl<K, V> Index<Side> for Node<K, V> {
    type Output = Option<Handle>;

    fn index(&self, side: Side) -> &Self::Output {
        &self.children[side as usize]
    }
}

impl<K, V> IndexMut<Side> for Node<K, V> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        &mut self.children[side as usize]
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_detached() {
        let node = Node::new("k", 1);
        assert_eq!(node.parent(), None);
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(node.sole_child(), None);
    }

    #[test]
    fn children_indexed_by_side() {
        let mut node = Node::new(0, 0);
        let a = Handle::from_index(3);
        let b = Handle::from_index(7);
        node[Side::Left] = Some(a);
        node[Side::Right.opposite().opposite()] = Some(b);
        assert_eq!(node.left(), Some(a));
        assert_eq!(node.right(), Some(b));
        assert_eq!(node.side_of(a), Some(Side::Left));
        assert_eq!(node.side_of(b), Some(Side::Right));
        assert_eq!(node.side_of(Handle::from_index(0)), None);
    }

    #[test]
    fn replace_entry_keeps_links() {
        let mut node = Node::new("old", 1);
        let parent = Handle::from_index(2);
        node.set_parent(Some(parent));
        node[Side::Right] = Some(Handle::from_index(5));

        assert_eq!(node.replace_entry("new", 2), ("old", 1));
        assert_eq!(node.replace_value(3), 2);
        assert_eq!(*node.key(), "new");
        assert_eq!(node.parent(), Some(parent));
        assert_eq!(node.sole_child(), Some(Handle::from_index(5)));
        assert_eq!(node.into_entry(), ("new", 3));
    }
}
