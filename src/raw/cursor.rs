use smallvec::SmallVec;

use super::handle::Handle;
use super::raw_indexed_tree::RawIndexedTree;

/// Ancestors kept inline before the stack spills to the heap.
const INLINE_DEPTH: usize = 32;

/// Lazy in-order walk over the nodes of a [`RawIndexedTree`].
///
/// The stack holds every node whose left subtree is being (or has been)
/// visited but which has not been yielded yet; its top is always the next node
/// in order. A cursor does not borrow the tree, so the tree is passed to each
/// [`advance`](Cursor::advance). Advancing a cursor over a tree that was
/// structurally changed after the cursor was created yields unspecified
/// handles.
#[derive(Clone, Debug, Default)]
pub(crate) struct Cursor {
    stack: SmallVec<[Handle; INLINE_DEPTH]>,
}

impl Cursor {
    /// Creates a cursor positioned before the first node of `tree`.
    pub(crate) fn new<K, V>(tree: &RawIndexedTree<K, V>) -> Self {
        let mut cursor = Cursor::default();
        cursor.push_left_spine(tree, tree.root());
        cursor
    }

    /// Yields the next node in order.
    pub(crate) fn advance<K, V>(&mut self, tree: &RawIndexedTree<K, V>) -> Option<Handle> {
        let next = self.stack.pop()?;
        self.push_left_spine(tree, tree.node(next).right());
        Some(next)
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }

    fn push_left_spine<K, V>(&mut self, tree: &RawIndexedTree<K, V>, mut next: Option<Handle>) {
        while let Some(handle) = next {
            self.stack.push(handle);
            next = tree.node(handle).left();
        }
    }
}
