#![no_std]

//! A **heap-allocated**, **growable**, **contiguous** vector with detached cursors, `no_std` compatible.
//!
//! `GrowVec<T>` keeps its elements in a single owned buffer and tracks the
//! number of live elements (`len`) separately from the number of allocated
//! slots (`capacity`). When an append finds the buffer full, the capacity grows
//! to `2 * capacity + 1`, which keeps appends amortized `O(1)` and also works
//! from an empty vector.
//!
//! Positions are expressed with [`Cursor`]s. A cursor does not borrow the
//! vector, so it can be passed back to [`GrowVec::insert`] and
//! [`GrowVec::erase`], which validate it before touching anything.
//!
//! ```rust
//! use grow_vec::{Error, GrowVec};
//!
//! let mut v = GrowVec::new();
//! v.push(1);
//! v.push(2);
//! v.push(3);
//! assert_eq!(v.len(), 3);
//! assert_eq!(v, [1, 2, 3]);
//!
//! let inserted = v.insert(v.begin() + 1, 9)?;
//! assert_eq!(inserted.get(&v), Ok(&9));
//! assert_eq!(v, [1, 9, 2, 3]);
//!
//! v.erase(v.begin() + 1)?;
//! assert_eq!(v, [1, 2, 3]);
//!
//! assert_eq!(v.pop(), Ok(3));
//! assert_eq!(v.pop(), Ok(2));
//! assert_eq!(v.pop(), Ok(1));
//! assert_eq!(v.pop(), Err(Error::EmptyContainer));
//! # Ok::<(), Error>(())
//! ```

extern crate alloc;

mod cursor;
mod error;

pub use cursor::{Access, ConstCursor, Cursor, MutCursor, ReadOnly, ReadWrite};
pub use error::Error;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::mem::MaybeUninit;
use core::ops::{Deref, DerefMut};
use core::slice::{Iter, IterMut};
use core::sync::atomic::{AtomicUsize, Ordering};

/// Creates a [`GrowVec`] holding the arguments, sized exactly to fit them.
///
/// ```
/// use grow_vec::grow_vec;
///
/// let v = grow_vec![1, 2, 3];
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.capacity(), 3);
///
/// let empty: grow_vec::GrowVec<u8> = grow_vec![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! grow_vec {
    () => (
        $crate::GrowVec::new()
    );
    ($($x:expr),+ $(,)?) => (
        $crate::GrowVec::from([$($x),+])
    );
}

/// Identity of a vector, used to reject cursors taken from another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OwnerId(usize);

impl OwnerId {
    #[cfg(target_has_atomic = "ptr")]
    fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    // No atomic read-modify-write here (e.g. thumbv6m). Vectors are not
    // created concurrently, so a plain load/store pair hands out distinct ids.
    #[cfg(not(target_has_atomic = "ptr"))]
    fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let id = NEXT.load(Ordering::Relaxed);
        NEXT.store(id.wrapping_add(1), Ordering::Relaxed);
        Self(id)
    }
}

/// A heap-allocated, growable, contiguous vector.
///
/// - The first `len` slots of the buffer hold live elements, the rest are
///   allocated but unused.
/// - No buffer is held while the capacity is zero.
/// - Growth moves the live elements into a fresh buffer and releases the
///   old one.
pub struct GrowVec<T> {
    len: usize,
    buf: Option<Box<[MaybeUninit<T>]>>,
    owner: OwnerId,
    generation: usize,
}

fn allocate<T>(capacity: usize) -> Option<Box<[MaybeUninit<T>]>> {
    (capacity > 0).then(|| Box::<[T]>::new_uninit_slice(capacity))
}

fn grown_capacity(capacity: usize) -> usize {
    match capacity.checked_mul(2).and_then(|doubled| doubled.checked_add(1)) {
        Some(capacity) => capacity,
        None => panic!("capacity overflow"),
    }
}

impl<T> Default for GrowVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> From<[T; N]> for GrowVec<T> {
    fn from(value: [T; N]) -> Self {
        let mut vec = Self::with_capacity(N);
        vec.extend(value);
        vec
    }
}

impl<T> From<Vec<T>> for GrowVec<T> {
    fn from(value: Vec<T>) -> Self {
        let mut vec = Self::with_capacity(value.len());
        vec.extend(value);
        vec
    }
}

impl<T> From<&[T]> for GrowVec<T>
where
    T: Clone,
{
    fn from(value: &[T]) -> Self {
        let mut vec = Self::with_capacity(value.len());
        vec.extend(value.iter().cloned());
        vec
    }
}

impl<T> FromIterator<T> for GrowVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Appends every element through [`GrowVec::push`].
impl<T> Extend<T> for GrowVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push(element);
        }
    }
}

/// Deep copy, sized exactly to the live elements.
impl<T> Clone for GrowVec<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self::from(self.as_slice())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T> GrowVec<T> {
    /// Creates a new, empty `GrowVec` with zero capacity.
    /// Nothing is allocated until an element is inserted.
    ///
    /// ```
    /// use grow_vec::GrowVec;
    ///
    /// let v = GrowVec::<i32>::new();
    /// assert_eq!(v.capacity(), 0);
    /// assert_eq!(v.len(), 0);
    /// assert!(v.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            len: 0,
            buf: None,
            owner: OwnerId::next(),
            generation: 0,
        }
    }

    /// Creates an empty `GrowVec` with exactly `capacity` allocated slots.
    ///
    /// ```
    /// use grow_vec::GrowVec;
    ///
    /// let v = GrowVec::<String>::with_capacity(8);
    /// assert_eq!(v.capacity(), 8);
    /// assert!(v.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            len: 0,
            buf: allocate(capacity),
            owner: OwnerId::next(),
            generation: 0,
        }
    }

    /// Replaces the contents of `self` with a copy of `other`.
    ///
    /// The copy is built completely before it is swapped in, so `self` is
    /// never observed half-assigned. The previous contents are dropped
    /// together with the temporary.
    ///
    /// ```
    /// use grow_vec::grow_vec;
    ///
    /// let mut v = grow_vec![1, 2, 3];
    /// v.assign(&grow_vec![7]);
    /// assert_eq!(v, [7]);
    /// assert_eq!(v.capacity(), 1);
    /// ```
    pub fn assign(&mut self, other: &Self)
    where
        T: Clone,
    {
        let mut copy = other.clone();
        self.swap(&mut copy);
    }

    /// Exchanges the elements and buffers of two vectors.
    ///
    /// Cursors of both vectors are invalidated.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.len, &mut other.len);
        core::mem::swap(&mut self.buf, &mut other.buf);
        self.bump_generation();
        other.bump_generation();
    }

    /// Returns the number of live elements.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no live elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots, live or not.
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, |buf| buf.len())
    }

    /// Drops all elements. The capacity remains allocated.
    ///
    /// ```
    /// use grow_vec::grow_vec;
    ///
    /// let mut v = grow_vec![1, 2, 3];
    /// v.clear();
    /// assert!(v.is_empty());
    /// assert_eq!(v.capacity(), 3);
    /// ```
    pub fn clear(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        self.len = 0;

        // Safety: `live` covers the initialized prefix, which is no longer
        // reachable now that `len` is zero.
        unsafe { core::ptr::drop_in_place(live) };
    }

    /// Grows the buffer to exactly `capacity` slots, keeping the live
    /// elements in order. Does nothing if the vector already has that many
    /// slots; never shrinks.
    ///
    /// ```
    /// use grow_vec::grow_vec;
    ///
    /// let mut v = grow_vec![1, 2];
    /// v.reserve(10);
    /// assert_eq!(v.capacity(), 10);
    ///
    /// v.reserve(4);
    /// assert_eq!(v.capacity(), 10);
    /// assert_eq!(v, [1, 2]);
    /// ```
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity() {
            self.relocate(capacity);
        }
    }

    /// Reallocates the buffer to exactly [`len`](Self::len) slots, releasing
    /// it altogether when the vector is empty.
    ///
    /// ```
    /// use grow_vec::GrowVec;
    ///
    /// let mut v = GrowVec::with_capacity(16);
    /// v.push('a');
    /// v.shrink_to_fit();
    /// assert_eq!(v.capacity(), 1);
    /// assert_eq!(v, ['a']);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        let capacity = self.capacity();
        if capacity > self.len {
            tracing::debug!(from = capacity, to = self.len, "releasing spare capacity");
            self.relocate(self.len);
        }
    }

    /// Appends an element, growing the buffer to `2 * capacity + 1` slots
    /// if it is full.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    ///
    /// ```
    /// use grow_vec::GrowVec;
    ///
    /// let mut v = GrowVec::new();
    /// v.push(10);
    /// assert_eq!(v.capacity(), 1);
    /// v.push(20);
    /// assert_eq!(v.capacity(), 3);
    /// assert_eq!(v, [10, 20]);
    /// ```
    pub fn push(&mut self, element: T) {
        self.make_room();

        let len = self.len;
        self.slots_mut()[len].write(element);
        self.len += 1;
    }

    /// Removes the last element and returns it.
    ///
    /// ```
    /// use grow_vec::{grow_vec, Error};
    ///
    /// let mut v = grow_vec![1];
    /// assert_eq!(v.pop(), Ok(1));
    /// assert_eq!(v.pop(), Err(Error::EmptyContainer));
    /// ```
    pub fn pop(&mut self) -> Result<T, Error> {
        if self.is_empty() {
            return Err(Error::EmptyContainer);
        }

        self.len -= 1;
        let len = self.len;

        // Safety: the slot was live until `len` was decremented above.
        Ok(unsafe { self.slots_mut()[len].assume_init_read() })
    }

    /// Returns a reference to the element at `index`.
    ///
    /// ```
    /// use grow_vec::{grow_vec, Error};
    ///
    /// let v = grow_vec![5, 6];
    /// assert_eq!(v.at(1), Ok(&6));
    /// assert_eq!(v.at(2), Err(Error::IndexOutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        self.as_slice()
            .get(index)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.len,
            })
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Returns a read-write cursor at the first element, equal to
    /// [`end`](Self::end) when the vector is empty.
    pub fn begin(&self) -> MutCursor<T> {
        self.cursor_at(0)
    }

    /// Returns a read-write cursor one past the last element.
    pub fn end(&self) -> MutCursor<T> {
        self.cursor_at(self.len)
    }

    /// Returns a read-only cursor at the first element.
    pub fn cbegin(&self) -> ConstCursor<T> {
        self.cursor_at(0)
    }

    /// Returns a read-only cursor one past the last element.
    pub fn cend(&self) -> ConstCursor<T> {
        self.cursor_at(self.len)
    }

    /// Inserts an element before `position`, shifting it and every following
    /// element one slot towards the end. Returns a cursor at the new element.
    ///
    /// `position` may be anything from [`begin`](Self::begin) to
    /// [`end`](Self::end) of this very vector; anything else fails with
    /// [`Error::InvalidIterator`] and leaves the vector untouched.
    ///
    /// ```
    /// use grow_vec::{grow_vec, Error};
    ///
    /// let mut v = grow_vec![1, 3];
    /// let cursor = v.insert(v.begin() + 1, 2)?;
    /// assert_eq!(v, [1, 2, 3]);
    /// assert_eq!(cursor.offset(), 1);
    ///
    /// let other = grow_vec![0];
    /// assert_eq!(v.insert(other.begin(), 0), Err(Error::InvalidIterator));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn insert(
        &mut self,
        position: impl Into<ConstCursor<T>>,
        element: T,
    ) -> Result<MutCursor<T>, Error> {
        let offset = self.locate(position.into())?;
        if offset > self.len {
            return Err(Error::InvalidIterator);
        }

        self.make_room();

        let len = self.len;
        let slots = self.slots_mut();
        slots[len].write(element);
        slots[offset..=len].rotate_right(1);

        self.len += 1;
        self.bump_generation();
        Ok(self.cursor_at(offset))
    }

    /// Removes the element at `position`, shifting every following element
    /// one slot towards the front. Returns a cursor at the element that
    /// followed the removed one, which is [`end`](Self::end) if the last
    /// element was removed.
    ///
    /// `position` must point at a live element of this very vector; anything
    /// else fails with [`Error::InvalidIterator`] and leaves the vector
    /// untouched.
    ///
    /// ```
    /// use grow_vec::{grow_vec, Error};
    ///
    /// let mut v = grow_vec![1, 2, 3];
    /// let next = v.erase(v.begin() + 1)?;
    /// assert_eq!(next.get(&v), Ok(&3));
    ///
    /// let next = v.erase(v.begin() + 1)?;
    /// assert_eq!(next, v.end());
    /// assert_eq!(v.erase(v.end()), Err(Error::InvalidIterator));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn erase(&mut self, position: impl Into<ConstCursor<T>>) -> Result<MutCursor<T>, Error> {
        let offset = self.locate(position.into())?;
        if offset >= self.len {
            return Err(Error::InvalidIterator);
        }

        let len = self.len;
        self.slots_mut()[offset..len].rotate_left(1);
        self.len -= 1;
        self.bump_generation();

        // Safety: the erased element was rotated into the last slot of the
        // old live range, which `len` no longer covers.
        unsafe { self.slots_mut()[len - 1].assume_init_drop() };

        Ok(self.cursor_at(offset))
    }

    /// Returns a shared slice over the live elements.
    pub fn as_slice(&self) -> &[T] {
        self.deref()
    }

    /// Returns a mutable slice over the live elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.deref_mut()
    }

    /// Returns an iterator over immutable references to the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns an iterator over mutable references to the elements.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    fn cursor_at<A: Access>(&self, offset: usize) -> Cursor<T, A> {
        Cursor::new(offset, self.len, self.owner, self.generation)
    }

    /// Turns `position` into an offset from the beginning of this vector.
    fn locate(&self, position: ConstCursor<T>) -> Result<usize, Error> {
        if position.owner != self.owner {
            return Err(Error::InvalidIterator);
        }

        debug_assert!(position.generation == self.generation, "stale cursor");

        usize::try_from(position - self.cbegin()).map_err(|_| Error::InvalidIterator)
    }

    fn make_room(&mut self) {
        let capacity = self.capacity();
        if self.len >= capacity {
            self.reserve(grown_capacity(capacity));
        }
    }

    fn relocate(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);

        let len = self.len;
        let mut fresh = allocate::<T>(capacity);
        if let (Some(old), Some(new)) = (self.buf.as_deref_mut(), fresh.as_deref_mut()) {
            new[..len].swap_with_slice(&mut old[..len]);
        }

        tracing::trace!(from = self.capacity(), to = capacity, len, "relocating storage");

        // The old buffer only holds moved-out slots now; dropping it releases
        // the allocation without touching any element.
        self.buf = fresh;
        self.bump_generation();
    }

    fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self.buf.as_deref_mut().unwrap_or_default()
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<T> Deref for GrowVec<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        if let Some(slots) = self.buf.as_deref() {
            // Safety: the first `len` slots are initialized.
            return unsafe { core::slice::from_raw_parts(slots.as_ptr().cast::<T>(), self.len) };
        }

        &[]
    }
}

impl<T> DerefMut for GrowVec<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        let len = self.len;
        if let Some(slots) = self.buf.as_deref_mut() {
            // Safety: the first `len` slots are initialized.
            return unsafe {
                core::slice::from_raw_parts_mut(slots.as_mut_ptr().cast::<T>(), len)
            };
        }

        &mut []
    }
}

impl<T> IntoIterator for GrowVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let len = core::mem::take(&mut self.len);
        match self.buf.take() {
            None => IntoIter::default(),
            Some(buf) => IntoIter {
                inner: buf.into_vec().into_iter().take(len),
            },
        }
    }
}

impl<'a, T> IntoIterator for &'a GrowVec<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowVec<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> PartialEq for GrowVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> PartialEq<[T]> for GrowVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T> PartialEq<&[T]> for GrowVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, const N: usize> PartialEq<[T; N]> for GrowVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T, const N: usize> PartialEq<&[T; N]> for GrowVec<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &&[T; N]) -> bool {
        self.as_slice() == *other
    }
}

impl<T> Eq for GrowVec<T> where T: Eq {}

impl<T> PartialOrd for GrowVec<T>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T> PartialOrd<[T]> for GrowVec<T>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &[T]) -> Option<core::cmp::Ordering> {
        self.as_slice().partial_cmp(other)
    }
}

impl<T, const N: usize> PartialOrd<[T; N]> for GrowVec<T>
where
    T: PartialOrd,
{
    fn partial_cmp(&self, other: &[T; N]) -> Option<core::cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T> Ord for GrowVec<T>
where
    T: Ord,
{
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T> Hash for GrowVec<T>
where
    T: Hash,
{
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T> fmt::Debug for GrowVec<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Renders the live elements as `[a, b, c]`, then the capacity on its own line.
///
/// ```
/// use grow_vec::GrowVec;
///
/// let mut v = GrowVec::with_capacity(4);
/// v.extend([1, 2]);
/// assert_eq!(v.to_string(), "[1, 2]\n4\n");
/// ```
impl<T> fmt::Display for GrowVec<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(element, f)?;
        }
        f.write_str("]\n")?;
        writeln!(f, "{}", self.capacity())
    }
}

impl<T> Drop for GrowVec<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

// ---

/// Owning iterator returned by [`GrowVec::into_iter`].
pub struct IntoIter<T> {
    inner: core::iter::Take<alloc::vec::IntoIter<MaybeUninit<T>>>,
}

impl<T> Default for IntoIter<T> {
    fn default() -> Self {
        Self {
            inner: Vec::new().into_iter().take(0),
        }
    }
}

impl<T> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        // Safety: `inner` is limited to the slots that were live.
        self.inner.next().map(|e| unsafe { e.assume_init() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        // Safety: `inner` is limited to the slots that were live.
        self.inner.next_back().map(|e| unsafe { e.assume_init() })
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        for mut element in self.inner.by_ref() {
            // Safety: unconsumed slots are still initialized.
            unsafe { element.assume_init_drop() };
        }
    }
}
