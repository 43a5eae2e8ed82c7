//! Growable contiguous array with a compile-time removal policy.
//!
//! `GrowableArray<T, P>` owns a single heap buffer of `capacity` slots of which
//! the first `len` hold live elements. It grows by `(capacity + 1) * 3 / 2`
//! slots when full, relocates elements by plain byte copies, and lets the
//! owner choose through `P` whether removal operations (`erase`,
//! `erase_unordered`, `clear`, shrinking `resize`) run the element destructor.
//!
//! # Destruction policy
//!
//! - [`Destruct`] (default): removed elements are dropped.
//! - [`NoDestruct`]: removed elements are forgotten, no `Drop` runs. Meant for
//!   non-owning handles whose finalization is managed elsewhere.
//!
//! Dropping the array itself always drops every remaining live element,
//! whatever the policy.
//!
//! # Relocation
//!
//! Growth, `erase` and `erase_unordered` move elements with `ptr::copy`.
//! Every Rust value is trivially relocatable (a move never runs user code), so
//! no extra bound is needed on `T`.
//!
//! # Aliasing
//!
//! References obtained through indexing, `front`/`back` or the slice views
//! borrow the array; the borrow checker ends them before any mutating call,
//! which is exactly the window in which the buffer may be relocated.
//!
//! # Example
//!
//! ```
//! use potato_engine::potato::utl::GrowableArray;
//!
//! let mut indices: GrowableArray<u32> = GrowableArray::new();
//! indices.push(0);
//! indices.push(1);
//! indices.push(2);
//! indices.erase_unordered(0);
//! assert_eq!(indices.as_slice(), &[2, 1]);
//! ```

use std::alloc::{self, Layout};
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice::{self, SliceIndex};

use crate::error::{Error, Result};

// ============================================================================
// DESTRUCTION POLICY
// ============================================================================

/// Selects whether removal operations drop the removed elements
pub trait DestructPolicy {
    /// `true` when `erase*`, `clear` and shrinking `resize` drop elements
    const DESTRUCT: bool;
}

/// Removal operations drop the removed elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Destruct;

/// Removal operations forget the removed elements without dropping them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDestruct;

impl DestructPolicy for Destruct {
    const DESTRUCT: bool = true;
}

impl DestructPolicy for NoDestruct {
    const DESTRUCT: bool = false;
}

// ============================================================================
// GROWTH
// ============================================================================

/// Capacity chosen when a full array receives one more element.
///
/// Returns `None` when the next capacity does not fit in `usize`.
pub(crate) fn next_capacity(capacity: usize) -> Option<usize> {
    capacity.checked_add(1)?.checked_mul(3).map(|grown| grown / 2)
}

/// Why a buffer could not be grown
enum GrowError {
    /// Byte size of the requested capacity exceeds `isize::MAX`
    CapacityOverflow,
    /// The global allocator returned null for this layout
    AllocFailed(Layout),
}

impl From<GrowError> for Error {
    fn from(err: GrowError) -> Self {
        match err {
            GrowError::CapacityOverflow => Error::CapacityOverflow,
            GrowError::AllocFailed(_) => Error::OutOfMemory,
        }
    }
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("GrowableArray capacity overflow");
}

#[cold]
fn grow_failed(err: GrowError) -> ! {
    match err {
        GrowError::CapacityOverflow => capacity_overflow(),
        GrowError::AllocFailed(layout) => alloc::handle_alloc_error(layout),
    }
}

// ============================================================================
// GROWABLE ARRAY
// ============================================================================

/// Heap-allocated, growable, contiguous array.
///
/// See the [module documentation](self) for the growth formula and the
/// meaning of the `P` policy parameter.
pub struct GrowableArray<T, P: DestructPolicy = Destruct> {
    /// Start of the buffer; dangling while nothing is allocated
    ptr: NonNull<T>,
    /// Number of slots in the buffer
    capacity: usize,
    /// Number of live elements at the start of the buffer
    len: usize,
    _owns: PhantomData<T>,
    _policy: PhantomData<P>,
}

// SAFETY: the array uniquely owns its elements, like `Box<[T]>`.
unsafe impl<T: Send, P: DestructPolicy> Send for GrowableArray<T, P> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, P: DestructPolicy> Sync for GrowableArray<T, P> {}

impl<T, P: DestructPolicy> GrowableArray<T, P> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    // ===== CONSTRUCTION =====

    /// Create an empty array. Does not allocate.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            len: 0,
            _owns: PhantomData,
            _policy: PhantomData,
        }
    }

    /// Create an empty array with exactly `capacity` slots reserved
    pub fn with_capacity(capacity: usize) -> Self {
        let mut array = Self::new();
        array.reserve(capacity);
        array
    }

    /// Create an array of `count` default-constructed elements
    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::new();
        array.resize_default(count);
        array
    }

    /// Create an array of `count` clones of `value`
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut array = Self::new();
        array.resize(count, value);
        array
    }

    // ===== SIZE QUERIES =====

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently reserved, live or not
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the array currently owns a heap buffer.
    ///
    /// Always `false` for zero-sized `T`, which never allocate.
    pub fn is_allocated(&self) -> bool {
        !Self::IS_ZST && self.capacity > 0
    }

    // ===== INSERTION =====

    /// Append `value` at the end of the array
    pub fn push(&mut self, value: T) {
        self.emplace_with(|| value);
    }

    /// Construct an element directly in the slot after the last live element.
    ///
    /// Grows first when the array is full. If `construct` panics the array is
    /// left with its previous length.
    pub fn emplace_with<F>(&mut self, construct: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        if self.len == self.capacity {
            self.grow_for_insert();
        }
        debug_assert!(self.len < self.capacity);

        // SAFETY: `len < capacity`, so the slot is allocated and not live.
        unsafe {
            let slot = self.ptr.as_ptr().add(self.len);
            ptr::write(slot, construct());
            self.len += 1;
            &mut *slot
        }
    }

    /// Remove the last element and hand it back to the caller.
    ///
    /// Ownership moves out, so the destruction policy does not apply.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` was live and is now outside `len`.
        Some(unsafe { ptr::read(self.ptr.as_ptr().add(self.len)) })
    }

    // ===== BULK SIZING =====

    /// Grow the buffer to exactly `new_capacity` slots.
    ///
    /// No-op when `new_capacity <= capacity()`; never shrinks and never
    /// changes `len()`. Allocation failure aborts through
    /// [`std::alloc::handle_alloc_error`].
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.capacity {
            if let Err(err) = self.grow_exact(new_capacity) {
                grow_failed(err);
            }
        }
    }

    /// Checked variant of [`reserve`](Self::reserve).
    ///
    /// Returns `Error::CapacityOverflow` or `Error::OutOfMemory` instead of
    /// aborting. The array is unchanged on error.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity > self.capacity {
            self.grow_exact(new_capacity)?;
        }
        Ok(())
    }

    /// Resize to `new_len`, default-constructing new tail elements
    pub fn resize_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Resize to `new_len`, filling new tail elements with clones of `value`
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone());
    }

    /// Resize to `new_len`, constructing new tail elements with `fill`.
    ///
    /// Growing reserves `new_len` slots once before constructing. Shrinking
    /// removes `[new_len, len)` according to the destruction policy.
    pub fn resize_with<F>(&mut self, new_len: usize, mut fill: F)
    where
        F: FnMut() -> T,
    {
        if new_len > self.len {
            self.reserve(new_len);
            while self.len < new_len {
                self.emplace_with(&mut fill);
            }
        } else {
            self.truncate(new_len);
        }
        debug_assert_eq!(self.len, new_len);
    }

    /// Remove every element from `new_len` on, keeping the allocation.
    ///
    /// No-op when `new_len >= len()`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let removed = self.len - new_len;
        // Shorten first so a panicking destructor cannot cause a double drop.
        self.len = new_len;
        if P::DESTRUCT {
            // SAFETY: `[new_len, new_len + removed)` held live elements that are
            // now outside `len`.
            unsafe {
                let tail = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(new_len), removed);
                ptr::drop_in_place(tail);
            }
        }
    }

    /// Remove all elements, keeping the allocation for reuse
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    // ===== REMOVAL =====

    /// Remove the element at `index`, shifting the following elements down.
    ///
    /// Returns `index`, which now holds the successor of the removed element
    /// (or equals `len()` if the last element was removed). O(len - index).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> usize {
        let len = self.len;
        assert!(index < len, "erase index (is {}) should be < len (is {})", index, len);

        // SAFETY: `index < len`; the shifted range `[index + 1, len)` is live.
        unsafe {
            let slot = self.ptr.as_ptr().add(index);
            let removed = ptr::read(slot);
            ptr::copy(slot.add(1), slot, len - index - 1);
            self.len = len - 1;
            Self::retire(removed);
        }
        index
    }

    /// Remove the element at `index` by moving the last element into its slot.
    ///
    /// Returns `index`. O(1); element order is not preserved.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn erase_unordered(&mut self, index: usize) -> usize {
        let len = self.len;
        assert!(
            index < len,
            "erase_unordered index (is {}) should be < len (is {})",
            index,
            len
        );

        let last = len - 1;
        // SAFETY: `index` and `last` are live; after the copy `last` is dead.
        unsafe {
            let base = self.ptr.as_ptr();
            let removed = ptr::read(base.add(index));
            if index != last {
                ptr::copy_nonoverlapping(base.add(last), base.add(index), 1);
            }
            self.len = last;
            Self::retire(removed);
        }
        index
    }

    /// Checked variant of [`erase`](Self::erase)
    pub fn try_erase(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.erase(index))
    }

    /// Checked variant of [`erase_unordered`](Self::erase_unordered)
    pub fn try_erase_unordered(&mut self, index: usize) -> Result<usize> {
        self.check_index(index)?;
        Ok(self.erase_unordered(index))
    }

    // ===== ACCESS =====

    /// First element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn front(&self) -> &T {
        assert!(self.len > 0, "front() called on an empty GrowableArray");
        &self.as_slice()[0]
    }

    /// Mutable first element. Panics if the array is empty.
    pub fn front_mut(&mut self) -> &mut T {
        assert!(self.len > 0, "front_mut() called on an empty GrowableArray");
        &mut self.as_mut_slice()[0]
    }

    /// Last element.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn back(&self) -> &T {
        assert!(self.len > 0, "back() called on an empty GrowableArray");
        &self.as_slice()[self.len - 1]
    }

    /// Mutable last element. Panics if the array is empty.
    pub fn back_mut(&mut self) -> &mut T {
        assert!(self.len > 0, "back_mut() called on an empty GrowableArray");
        let last = self.len - 1;
        &mut self.as_mut_slice()[last]
    }

    /// Checked variant of [`front`](Self::front)
    pub fn try_front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(Error::EmptyContainer)
    }

    /// Checked variant of [`back`](Self::back)
    pub fn try_back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(Error::EmptyContainer)
    }

    /// Live elements as a slice
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `ptr` is non-null and aligned, `[0, len)` is live.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Live elements as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    // ===== OWNERSHIP TRANSFER =====

    /// Move the contents out, leaving `self` empty with no allocation
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Drop the current contents and take over `other`'s buffer.
    ///
    /// `other` is left empty with no allocation.
    pub fn move_from(&mut self, other: &mut Self) {
        *self = other.take();
    }

    /// Exchange buffers with `other` in O(1)
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    // ===== INTERNALS =====

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index, len: self.len })
        }
    }

    /// Finish removing an element that is no longer counted in `len`
    fn retire(removed: T) {
        if P::DESTRUCT {
            drop(removed);
        } else {
            mem::forget(removed);
        }
    }

    fn grow_for_insert(&mut self) {
        let new_capacity = match next_capacity(self.capacity) {
            Some(capacity) => capacity,
            None => capacity_overflow(),
        };
        if let Err(err) = self.grow_exact(new_capacity) {
            grow_failed(err);
        }
    }

    /// Layout of the current buffer. Only meaningful while allocated.
    fn current_layout(&self) -> Layout {
        debug_assert!(self.is_allocated());
        // SAFETY: the same size and alignment were validated by
        // `Layout::array` when the buffer was allocated.
        unsafe {
            Layout::from_size_align_unchecked(
                mem::size_of::<T>() * self.capacity,
                mem::align_of::<T>(),
            )
        }
    }

    /// Reallocate to exactly `new_capacity` slots, keeping live elements.
    ///
    /// On error the buffer, length and capacity are unchanged.
    fn grow_exact(&mut self, new_capacity: usize) -> std::result::Result<(), GrowError> {
        debug_assert!(new_capacity > self.capacity);

        if Self::IS_ZST {
            self.capacity = new_capacity;
            return Ok(());
        }

        let new_layout =
            Layout::array::<T>(new_capacity).map_err(|_| GrowError::CapacityOverflow)?;

        // SAFETY: `new_layout` has a non-zero size no larger than `isize::MAX`;
        // when reallocating, `ptr` was allocated with `current_layout()`.
        let raw = unsafe {
            if self.is_allocated() {
                alloc::realloc(self.ptr.as_ptr().cast::<u8>(), self.current_layout(), new_layout.size())
            } else {
                alloc::alloc(new_layout)
            }
        };

        self.ptr = NonNull::new(raw.cast::<T>()).ok_or(GrowError::AllocFailed(new_layout))?;
        self.capacity = new_capacity;
        Ok(())
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

/// Releases a buffer when dropped, also while unwinding
struct BufferGuard {
    ptr: NonNull<u8>,
    layout: Option<Layout>,
}

impl Drop for BufferGuard {
    fn drop(&mut self) {
        if let Some(layout) = self.layout {
            // SAFETY: `ptr` was allocated with `layout` and is not used again.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) }
        }
    }
}

impl<T, P: DestructPolicy> Drop for GrowableArray<T, P> {
    fn drop(&mut self) {
        // A panicking element destructor must not leak the buffer.
        let _buffer = BufferGuard {
            ptr: self.ptr.cast::<u8>(),
            layout: self.is_allocated().then(|| self.current_layout()),
        };
        // Teardown finalizes every live element regardless of `P`.
        // SAFETY: `[0, len)` is live and is never touched again.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T, P: DestructPolicy> Default for GrowableArray<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, P: DestructPolicy> Clone for GrowableArray<T, P> {
    /// Deep copy into a buffer of exactly `len()` slots
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        for item in self.iter() {
            copy.push(item.clone());
        }
        copy
    }

    /// Clear `self` (per policy) and copy `source`'s elements into it
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.reserve(source.len);
        for item in source.iter() {
            self.push(item.clone());
        }
        debug_assert_eq!(self.len, source.len);
    }
}

impl<T, P: DestructPolicy> Deref for GrowableArray<T, P> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, P: DestructPolicy> DerefMut for GrowableArray<T, P> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>, P: DestructPolicy> Index<I> for GrowableArray<T, P> {
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, P: DestructPolicy> IndexMut<I> for GrowableArray<T, P> {
    fn index_mut(&mut self, index: I) -> &mut I::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: fmt::Debug, P: DestructPolicy> fmt::Debug for GrowableArray<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, P: DestructPolicy, Q: DestructPolicy> PartialEq<GrowableArray<T, Q>>
    for GrowableArray<T, P>
{
    fn eq(&self, other: &GrowableArray<T, Q>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, P: DestructPolicy> Eq for GrowableArray<T, P> {}

impl<T: Clone, P: DestructPolicy> From<&[T]> for GrowableArray<T, P> {
    fn from(items: &[T]) -> Self {
        let mut array = Self::with_capacity(items.len());
        for item in items {
            array.push(item.clone());
        }
        array
    }
}

impl<T, P: DestructPolicy> Extend<T> for GrowableArray<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(self.len.saturating_add(lower));
        for item in iter {
            self.push(item);
        }
    }
}

impl<T, P: DestructPolicy> FromIterator<T> for GrowableArray<T, P> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<'a, T, P: DestructPolicy> IntoIterator for &'a GrowableArray<T, P> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, P: DestructPolicy> IntoIterator for &'a mut GrowableArray<T, P> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, P: DestructPolicy> IntoIterator for GrowableArray<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let array = ManuallyDrop::new(self);
        IntoIter {
            buf: array.ptr,
            capacity: array.capacity,
            start: 0,
            end: array.len,
            _owns: PhantomData,
        }
    }
}

// ============================================================================
// OWNED ITERATOR
// ============================================================================

/// Owning iterator returned by `GrowableArray::into_iter`.
///
/// Elements not yielded are dropped with the iterator, then the buffer is freed.
pub struct IntoIter<T> {
    buf: NonNull<T>,
    capacity: usize,
    start: usize,
    end: usize,
    _owns: PhantomData<T>,
}

// SAFETY: same ownership story as `GrowableArray`.
unsafe impl<T: Send> Send for IntoIter<T> {}
// SAFETY: no shared access to elements is exposed.
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `[start, end)` is live; `start` leaves the range right after.
        let item = unsafe { ptr::read(self.buf.as_ptr().add(self.start)) };
        self.start += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the slot at the old `end - 1` was live and is now outside the range.
        Some(unsafe { ptr::read(self.buf.as_ptr().add(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: `[start, end)` is live; the buffer came from a `GrowableArray`
        // with `capacity` slots.
        unsafe {
            let remaining = ptr::slice_from_raw_parts_mut(
                self.buf.as_ptr().add(self.start),
                self.end - self.start,
            );
            ptr::drop_in_place(remaining);

            if mem::size_of::<T>() != 0 && self.capacity > 0 {
                let layout = Layout::from_size_align_unchecked(
                    mem::size_of::<T>() * self.capacity,
                    mem::align_of::<T>(),
                );
                alloc::dealloc(self.buf.as_ptr().cast::<u8>(), layout);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vector_tests.rs"]
mod tests;
