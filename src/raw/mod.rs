mod arena;
mod cursor;
mod handle;
mod node;
mod raw_indexed_tree;

pub(crate) use cursor::Cursor;
pub(crate) use handle::Handle;
pub(crate) use node::Side;
pub(crate) use raw_indexed_tree::{RawIndexedTree, RebuildReason};
