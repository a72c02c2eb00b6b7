use thiserror::Error;

/// Errors returned by [`IndexedTreeMap`](crate::IndexedTreeMap).
///
/// Missing keys are normally reported as `None`; an error is only returned by
/// operations that promise to produce a value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// [`update`](crate::IndexedTreeMap::update) was called for a key that is
    /// not in the map and no fallback value was supplied.
    #[error("invalid argument: key is not present and no fallback value was supplied")]
    InvalidArgument,
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
