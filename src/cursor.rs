//! Positions into a [`GrowVec`].
//!
//! A [`Cursor`] is an offset paired with the bound of the traversal that
//! produced it. It does not borrow the vector, so it can be handed back to
//! [`GrowVec::insert`] and [`GrowVec::erase`]; reading through it takes the
//! vector as an argument instead.
//!
//! Both flavours share one implementation and differ only in their [`Access`]
//! marker. A [`MutCursor`] narrows into a [`ConstCursor`], never the other
//! way around.
//!
//! Any relocation, insertion or erasure invalidates the cursors taken before
//! it. Debug builds assert on the use of such a stale cursor.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, Sub};

use crate::{Error, GrowVec, OwnerId};

mod sealed {
    pub trait Sealed {}
}

/// Capability carried by a [`Cursor`].
pub trait Access: sealed::Sealed {}

/// Marker for cursors that can only read.
#[derive(Debug)]
pub enum ReadOnly {}

/// Marker for cursors that can also write.
#[derive(Debug)]
pub enum ReadWrite {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for ReadWrite {}
impl Access for ReadOnly {}
impl Access for ReadWrite {}

/// A read-only cursor.
pub type ConstCursor<T> = Cursor<T, ReadOnly>;

/// A read-write cursor.
pub type MutCursor<T> = Cursor<T, ReadWrite>;

/// An offset into a [`GrowVec`], bounded by the vector's length at the time
/// the cursor was taken.
pub struct Cursor<T, A: Access> {
    pub(crate) offset: usize,
    bound: usize,
    pub(crate) owner: OwnerId,
    pub(crate) generation: usize,
    _marker: PhantomData<(fn() -> T, A)>,
}

impl<T, A: Access> Cursor<T, A> {
    pub(crate) const fn new(
        offset: usize,
        bound: usize,
        owner: OwnerId,
        generation: usize,
    ) -> Self {
        Self {
            offset,
            bound,
            owner,
            generation,
            _marker: PhantomData,
        }
    }

    /// Returns the offset from the beginning of the vector.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the one-past-the-end offset captured when the cursor was taken.
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// Returns `true` if the cursor has no element left to read.
    pub const fn is_at_bound(&self) -> bool {
        self.offset >= self.bound
    }

    /// Moves to the next element. Does nothing once the bound is reached.
    ///
    /// ```
    /// use grow_vec::grow_vec;
    ///
    /// let v = grow_vec![1, 2];
    /// let mut cursor = v.cbegin();
    /// cursor.advance().advance().advance();
    /// assert_eq!(cursor, v.cend());
    /// ```
    pub fn advance(&mut self) -> &mut Self {
        if self.offset < self.bound {
            self.offset += 1;
        }

        self
    }

    /// Moves to the next element and returns the cursor as it was before
    /// the move. Does nothing once the bound is reached.
    pub fn post_advance(&mut self) -> Self {
        let prior = *self;
        self.advance();
        prior
    }

    /// Reads the element under the cursor.
    ///
    /// Fails with [`Error::Dereference`] at the bound and with
    /// [`Error::InvalidIterator`] if `vec` is not the vector the cursor was
    /// taken from.
    ///
    /// ```
    /// use grow_vec::{grow_vec, Error};
    ///
    /// let v = grow_vec!["a", "b"];
    /// assert_eq!(v.cbegin().get(&v), Ok(&"a"));
    /// assert_eq!(v.cend().get(&v), Err(Error::Dereference));
    /// ```
    pub fn get<'v>(&self, vec: &'v GrowVec<T>) -> Result<&'v T, Error> {
        let offset = self.readable_offset(vec)?;
        vec.at(offset).map_err(|_| Error::Dereference)
    }

    fn readable_offset(&self, vec: &GrowVec<T>) -> Result<usize, Error> {
        if self.owner != vec.owner {
            return Err(Error::InvalidIterator);
        }

        debug_assert!(self.generation == vec.generation, "stale cursor");

        if self.is_at_bound() {
            return Err(Error::Dereference);
        }

        Ok(self.offset)
    }
}

impl<T> Cursor<T, ReadWrite> {
    /// Mutably borrows the element under the cursor.
    ///
    /// Fails like [`Cursor::get`].
    ///
    /// ```
    /// use grow_vec::grow_vec;
    ///
    /// let mut v = grow_vec![1, 2, 3];
    /// let cursor = v.begin() + 2;
    /// *cursor.get_mut(&mut v).unwrap() *= 10;
    /// assert_eq!(v, [1, 2, 30]);
    /// ```
    pub fn get_mut<'v>(&self, vec: &'v mut GrowVec<T>) -> Result<&'v mut T, Error> {
        let offset = self.readable_offset(vec)?;
        vec.at_mut(offset).map_err(|_| Error::Dereference)
    }

    /// Drops the write capability.
    pub const fn into_const(self) -> ConstCursor<T> {
        Cursor::new(self.offset, self.bound, self.owner, self.generation)
    }
}

impl<T> From<MutCursor<T>> for ConstCursor<T> {
    fn from(value: MutCursor<T>) -> Self {
        value.into_const()
    }
}

impl<T, A: Access> Clone for Cursor<T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Access> Copy for Cursor<T, A> {}

/// Cursors compare by offset only.
impl<T, A: Access, B: Access> PartialEq<Cursor<T, B>> for Cursor<T, A> {
    fn eq(&self, other: &Cursor<T, B>) -> bool {
        self.offset == other.offset
    }
}

impl<T, A: Access> Eq for Cursor<T, A> {}

/// Advances `steps` times, stopping at the bound.
impl<T, A: Access> Add<usize> for Cursor<T, A> {
    type Output = Self;

    fn add(mut self, steps: usize) -> Self::Output {
        self.offset = self.offset.saturating_add(steps).min(self.bound);
        self
    }
}

/// Signed distance between two read-only cursors over the same vector.
impl<T> Sub for Cursor<T, ReadOnly> {
    type Output = isize;

    fn sub(self, rhs: Self) -> Self::Output {
        self.offset.wrapping_sub(rhs.offset) as isize
    }
}

impl<T, A: Access> fmt::Debug for Cursor<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset)
            .field("bound", &self.bound)
            .finish()
    }
}
