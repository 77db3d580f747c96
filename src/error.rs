/// Failures reported by [`GrowVec`](crate::GrowVec) and its cursors.
///
/// Every check runs before the container is touched, so an `Err` always
/// leaves the vector exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// [`pop`](crate::GrowVec::pop) was called on an empty vector.
    #[error("cannot pop from an empty vector")]
    EmptyContainer,

    /// Checked indexing past the live elements.
    #[error("index {index} is out of range for a vector of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The cursor belongs to another vector or lies outside the range
    /// accepted by the operation.
    #[error("cursor does not denote a valid position in this vector")]
    InvalidIterator,

    /// The cursor sits at its bound and has no element to read.
    #[error("cannot dereference a cursor positioned at its bound")]
    Dereference,
}
