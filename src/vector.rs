use std::{
  fmt,
  hash::{Hash, Hasher},
  iter::FusedIterator,
  marker::PhantomData,
  mem::{self, ManuallyDrop},
  ops::{Bound, Deref, DerefMut, RangeBounds},
  ptr::{self, NonNull},
  slice,
};

use crate::{
  algorithm,
  allocator::{Allocator, PolymorphicAllocator},
  error::{AllocError, Result},
  growth::{GoldenExpand, GrowthStrategy},
};

/// Contiguous growable array over an [`Allocator`].
///
/// ```text
///   buffer
///     │
///     ▼
///   ┌────┬────┬────┬────┬────┬─────────────────────┐
///   │ e0 │ e1 │ e2 │ e3 │ e4 │    uninitialized    │
///   └────┴────┴────┴────┴────┴─────────────────────┘
///   ◄──────── len ─────────►
///   ◄────────────────── capacity ───────────────────►
/// ```
///
/// When an insertion needs more room than `capacity`, the vector asks its
/// [`GrowthStrategy`] for the next capacity, allocates the new buffer, then
/// moves every element over and releases the old one. The allocation comes
/// first, so a failed growth leaves the vector untouched.
///
/// Every operation that may allocate returns a [`Result`]. Trait impls that
/// cannot report errors (`Clone`, `Extend`, `FromIterator`) panic instead.
pub struct Vector<T, A = PolymorphicAllocator<'static, T>, G = GoldenExpand>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  buffer: NonNull<T>,
  len: usize,
  capacity: usize,
  allocator: A,
  growth: G,
  _marker: PhantomData<T>,
}

#[cold]
#[track_caller]
fn allocation_failed(error: AllocError) -> ! {
  panic!("vector allocation failed: {error}")
}

/// Resolves `range` against a vector of `len` elements.
#[track_caller]
fn range_of<R: RangeBounds<usize>>(
  range: R,
  len: usize,
) -> (usize, usize) {
  let start = match range.start_bound() {
    Bound::Included(&start) => start,
    Bound::Excluded(&start) => start.saturating_add(1),
    Bound::Unbounded => 0,
  };
  let end = match range.end_bound() {
    Bound::Included(&end) => end.saturating_add(1),
    Bound::Excluded(&end) => end,
    Bound::Unbounded => len,
  };

  assert!(start <= end, "range start (is {start}) should be <= range end (is {end})");
  assert!(end <= len, "range end (is {end}) should be <= len (is {len})");
  (start, end)
}

impl<T> Vector<T> {
  /// Empty vector over the global default resource. Does not allocate.
  pub fn new() -> Self {
    Self::new_in(PolymorphicAllocator::default())
  }
}

impl<T, A, G> Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  pub fn new_in(allocator: A) -> Self {
    Self {
      buffer: NonNull::dangling(),
      len: 0,
      capacity: 0,
      allocator,
      growth: G::default(),
      _marker: PhantomData,
    }
  }

  pub fn with_capacity_in(
    capacity: usize,
    allocator: A,
  ) -> Result<Self> {
    let mut vector = Self::new_in(allocator);
    vector.reserve(capacity)?;
    Ok(vector)
  }

  pub fn from_iter_in<I>(
    items: I,
    allocator: A,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = T>,
  {
    let items = items.into_iter();
    let mut vector = Self::with_capacity_in(items.size_hint().0, allocator)?;
    for item in items {
      vector.push(item)?;
    }
    Ok(vector)
  }

  /// Clones `items` into a vector of exactly `items.len()` capacity.
  pub fn from_slice_in(
    items: &[T],
    allocator: A,
  ) -> Result<Self>
  where
    T: Clone,
  {
    let mut vector = Self::with_capacity_in(items.len(), allocator)?;
    vector.insert_slice(0, items)?;
    Ok(vector)
  }

  /// `len` default values.
  pub fn with_len_in(
    len: usize,
    allocator: A,
  ) -> Result<Self>
  where
    T: Default,
  {
    let mut vector = Self::new_in(allocator);
    vector.resize_with(len, T::default)?;
    Ok(vector)
  }

  /// `len` clones of `value`.
  pub fn from_elem_in(
    len: usize,
    value: &T,
    allocator: A,
  ) -> Result<Self>
  where
    T: Clone,
  {
    let mut vector = Self::with_capacity_in(len, allocator)?;
    vector.insert_n(0, len, value)?;
    Ok(vector)
  }

  /// Copy of this vector on `allocator`, with the same capacity and growth
  /// state.
  pub fn clone_in(
    &self,
    allocator: A,
  ) -> Result<Self>
  where
    T: Clone,
  {
    let mut vector = Self::with_capacity_in(self.capacity, allocator)?;
    vector.growth = self.growth.clone();

    unsafe { algorithm::uninitialized_clone(&vector.allocator, self, vector.buffer) };
    vector.len = self.len;

    Ok(vector)
  }

  pub fn try_clone(&self) -> Result<Self>
  where
    T: Clone,
  {
    self.clone_in(self.allocator.clone())
  }

  /// Moves the elements onto `allocator`.
  ///
  /// The buffer is kept as is when `allocator` equals the current one.
  /// Otherwise the elements are relocated into storage from `allocator` and
  /// the old buffer is released; if that allocation fails, `self` is
  /// dropped.
  pub fn move_in(
    mut self,
    allocator: A,
  ) -> Result<Self> {
    if self.allocator == allocator {
      self.allocator = allocator;
      return Ok(self);
    }

    let mut vector = Self::with_capacity_in(self.len, allocator)?;
    vector.growth = self.growth.clone();

    unsafe { algorithm::uninitialized_move(self.buffer, self.len, vector.buffer) };
    vector.len = mem::replace(&mut self.len, 0);

    Ok(vector)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn allocator(&self) -> &A {
    &self.allocator
  }

  #[inline]
  pub fn as_slice(&self) -> &[T] {
    unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.len) }
  }

  #[inline]
  pub fn as_mut_slice(&mut self) -> &mut [T] {
    unsafe { slice::from_raw_parts_mut(self.buffer.as_ptr(), self.len) }
  }

  #[track_caller]
  pub fn front(&self) -> &T {
    assert!(!self.is_empty(), "front of an empty vector");
    &self[0]
  }

  #[track_caller]
  pub fn front_mut(&mut self) -> &mut T {
    assert!(!self.is_empty(), "front of an empty vector");
    &mut self[0]
  }

  #[track_caller]
  pub fn back(&self) -> &T {
    assert!(!self.is_empty(), "back of an empty vector");
    &self[self.len - 1]
  }

  #[track_caller]
  pub fn back_mut(&mut self) -> &mut T {
    assert!(!self.is_empty(), "back of an empty vector");
    let last = self.len - 1;
    &mut self[last]
  }

  /// Grows the buffer to exactly `capacity` elements. Does nothing if the
  /// vector already holds that many.
  pub fn reserve(
    &mut self,
    capacity: usize,
  ) -> Result<()> {
    if capacity > self.capacity {
      self.relocate(capacity)?;
    }
    Ok(())
  }

  /// Resizes to `len` elements, filling new slots with clones of `value`.
  pub fn resize(
    &mut self,
    len: usize,
    value: T,
  ) -> Result<()>
  where
    T: Clone,
  {
    self.resize_with(len, || value.clone())
  }

  /// Resizes to `len` elements, filling new slots with the results of `make`.
  ///
  /// Growing past the capacity reallocates to exactly `len`.
  pub fn resize_with<F>(
    &mut self,
    len: usize,
    make: F,
  ) -> Result<()>
  where
    F: FnMut() -> T,
  {
    if len <= self.len {
      self.truncate(len);
      return Ok(());
    }

    self.reserve(len)?;
    let count = len - self.len;
    self.open_gap(self.len, count)?.fill(std::iter::repeat_with(make).take(count));
    Ok(())
  }

  /// Destroys the elements past `len`. Capacity is unchanged.
  pub fn truncate(
    &mut self,
    len: usize,
  ) {
    if len >= self.len {
      return;
    }

    let removed = self.len - len;
    self.len = len;
    unsafe { algorithm::destroy_elements(&self.allocator, self.buffer.add(len), removed) };
  }

  pub fn clear(&mut self) {
    self.truncate(0);
  }

  pub fn push(
    &mut self,
    value: T,
  ) -> Result<()> {
    self.emplace_back(|| value).map(|_| ())
  }

  /// Builds a value in place at the end and returns it. `make` runs after any
  /// growth has succeeded.
  pub fn emplace_back<F>(
    &mut self,
    make: F,
  ) -> Result<&mut T>
  where
    F: FnOnce() -> T,
  {
    self.grow_for(1)?;

    unsafe {
      let slot = self.buffer.add(self.len);
      self.allocator.construct(slot, make());
      self.len += 1;
      Ok(&mut *slot.as_ptr())
    }
  }

  /// Destroys the last element.
  #[track_caller]
  pub fn pop_back(&mut self) {
    assert!(!self.is_empty(), "pop_back on an empty vector");
    self.truncate(self.len - 1);
  }

  /// Removes the last element and returns it.
  pub fn pop(&mut self) -> Option<T> {
    if self.is_empty() {
      return None;
    }

    self.len -= 1;
    Some(unsafe { self.buffer.add(self.len).read() })
  }

  /// Inserts `value` at `index`, shifting the tail right.
  ///
  /// Returns the index of the inserted element.
  pub fn insert(
    &mut self,
    index: usize,
    value: T,
  ) -> Result<usize> {
    self.emplace(index, || value)
  }

  /// Builds a value in place at `index`.
  pub fn emplace<F>(
    &mut self,
    index: usize,
    make: F,
  ) -> Result<usize>
  where
    F: FnOnce() -> T,
  {
    self.open_gap(index, 1)?.fill(std::iter::once_with(make));
    Ok(index)
  }

  /// Inserts `count` clones of `value` at `index`.
  ///
  /// Returns the index of the first inserted element.
  pub fn insert_n(
    &mut self,
    index: usize,
    count: usize,
    value: &T,
  ) -> Result<usize>
  where
    T: Clone,
  {
    self.open_gap(index, count)?.fill(std::iter::repeat_with(|| value.clone()).take(count));
    Ok(index)
  }

  pub fn insert_slice(
    &mut self,
    index: usize,
    items: &[T],
  ) -> Result<usize>
  where
    T: Clone,
  {
    self.open_gap(index, items.len())?.fill(items.iter().cloned());
    Ok(index)
  }

  /// Inserts the items of `items` at `index`, in order.
  ///
  /// Room is made for the length the iterator reports. If it yields fewer
  /// items, the tail closes up behind the last one.
  pub fn insert_iter<I>(
    &mut self,
    index: usize,
    items: I,
  ) -> Result<usize>
  where
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
  {
    let items = items.into_iter();
    self.open_gap(index, items.len())?.fill(items);
    Ok(index)
  }

  pub fn extend_from_slice(
    &mut self,
    items: &[T],
  ) -> Result<()>
  where
    T: Clone,
  {
    self.insert_slice(self.len, items).map(|_| ())
  }

  /// Destroys the element at `index`, shifting the tail left.
  ///
  /// Returns the index of the element that now sits at `index`, which is
  /// `len()` if the last element was erased.
  #[track_caller]
  pub fn erase(
    &mut self,
    index: usize,
  ) -> usize {
    let len = self.len;
    assert!(index < len, "erase index (is {index}) should be < len (is {len})");
    self.erase_range(index..index + 1)
  }

  /// Destroys the elements in `range`, shifting the tail left. Capacity is
  /// unchanged.
  ///
  /// Returns the start of the range.
  #[track_caller]
  pub fn erase_range<R>(
    &mut self,
    range: R,
  ) -> usize
  where
    R: RangeBounds<usize>,
  {
    let (start, end) = range_of(range, self.len);
    let tail = self.len - end;

    // Until the tail is back in place only the prefix is live.
    self.len = start;

    unsafe {
      let first = self.buffer.add(start);
      algorithm::destroy_elements(&self.allocator, first, end - start);
      first.add(end - start).copy_to(first, tail);
    }

    self.len = start + tail;
    start
  }

  /// Removes the element at `index` and returns it.
  #[track_caller]
  pub fn remove(
    &mut self,
    index: usize,
  ) -> T {
    let len = self.len;
    assert!(index < len, "removal index (is {index}) should be < len (is {len})");

    unsafe {
      let slot = self.buffer.add(index);
      let value = slot.read();
      slot.add(1).copy_to(slot, len - index - 1);
      self.len -= 1;
      value
    }
  }

  /// Exchanges contents, allocators and growth state with `other`.
  pub fn swap_with(
    &mut self,
    other: &mut Self,
  ) {
    mem::swap(self, other);
  }

  /// Capacity for `required` elements: the strategy's next step, or a step
  /// past `required` when that is still too small.
  ///
  /// Steps a copy of the strategy. The caller stores it once the new buffer
  /// is allocated, so a failed growth leaves the strategy where it was.
  fn next_capacity(
    &self,
    required: usize,
  ) -> (usize, G) {
    let mut growth = self.growth.clone();
    let grown = growth.grow(self.capacity);
    let capacity = if grown >= required { grown } else { growth.grow(required) };
    (capacity, growth)
  }

  fn grow_for(
    &mut self,
    additional: usize,
  ) -> Result<()> {
    let required = self.len.checked_add(additional).ok_or(AllocError::CapacityOverflow)?;
    if required > self.capacity {
      let (capacity, growth) = self.next_capacity(required);
      self.relocate(capacity)?;
      self.growth = growth;
    }
    Ok(())
  }

  fn relocate(
    &mut self,
    capacity: usize,
  ) -> Result<()> {
    let buffer = self.allocator.allocate(capacity)?;
    log::trace!("vector relocation: {} -> {capacity} elements", self.capacity);

    unsafe {
      algorithm::uninitialized_move(self.buffer, self.len, buffer);
      self.release_buffer();
    }

    self.buffer = buffer;
    self.capacity = capacity;
    Ok(())
  }

  /// # Safety
  ///
  /// The buffer must hold no live elements, and must be replaced right after.
  unsafe fn release_buffer(&mut self) {
    if self.capacity > 0 {
      unsafe { self.allocator.deallocate(self.buffer, self.capacity) };
    }
  }

  /// Makes room for `count` elements at `index` and hands the hole to a
  /// [`Gap`].
  ///
  /// With enough capacity the tail is shifted in place. Otherwise the
  /// elements are relocated into a new buffer around the hole, so each one
  /// moves only once.
  #[track_caller]
  fn open_gap(
    &mut self,
    index: usize,
    count: usize,
  ) -> Result<Gap<'_, T, A, G>> {
    let len = self.len;
    assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");

    let required = len.checked_add(count).ok_or(AllocError::CapacityOverflow)?;
    let tail = len - index;

    if required > self.capacity {
      let (capacity, growth) = self.next_capacity(required);
      let buffer = self.allocator.allocate(capacity)?;
      self.growth = growth;
      log::trace!("vector relocation: {} -> {capacity} elements, hole of {count} at {index}", self.capacity);

      unsafe {
        algorithm::uninitialized_move(self.buffer, index, buffer);
        algorithm::uninitialized_move(self.buffer.add(index), tail, buffer.add(index + count));
        self.release_buffer();
      }

      self.buffer = buffer;
      self.capacity = capacity;
    } else if count > 0 {
      unsafe { self.buffer.add(index).copy_to(self.buffer.add(index + count), tail) };
    }

    self.len = index;

    Ok(Gap {
      vector: self,
      start: index,
      count,
      filled: 0,
      tail,
    })
  }
}

/// Hole of uninitialized slots in the middle of a vector.
///
/// The vector's length covers only the prefix while the hole is open. On drop,
/// normal or during unwinding, the tail is moved back against the last filled
/// slot and the length is restored.
struct Gap<'v, T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  vector: &'v mut Vector<T, A, G>,
  start: usize,
  count: usize,
  filled: usize,
  tail: usize,
}

impl<T, A, G> Gap<'_, T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn fill<I>(
    mut self,
    items: I,
  ) where
    I: IntoIterator<Item = T>,
  {
    for value in items.into_iter().take(self.count) {
      unsafe {
        let slot = self.vector.buffer.add(self.start + self.filled);
        self.vector.allocator.construct(slot, value);
      }
      self.filled += 1;
    }
  }
}

impl<T, A, G> Drop for Gap<'_, T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn drop(&mut self) {
    if self.filled < self.count {
      unsafe {
        let tail = self.vector.buffer.add(self.start + self.count);
        tail.copy_to(self.vector.buffer.add(self.start + self.filled), self.tail);
      }
    }
    self.vector.len = self.start + self.filled + self.tail;
  }
}

impl<T, A, G> Drop for Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn drop(&mut self) {
    unsafe { algorithm::delete_buffer(&self.allocator, self.buffer, self.len, self.capacity) };
  }
}

impl<T, A, G> Default for Vector<T, A, G>
where
  A: Allocator<T> + Default,
  G: GrowthStrategy,
{
  fn default() -> Self {
    Self::new_in(A::default())
  }
}

impl<T, A, G> Clone for Vector<T, A, G>
where
  T: Clone,
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn clone(&self) -> Self {
    self.try_clone().unwrap_or_else(|error| allocation_failed(error))
  }
}

impl<T, A, G> Deref for Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  type Target = [T];

  fn deref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T, A, G> DerefMut for Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn deref_mut(&mut self) -> &mut [T] {
    self.as_mut_slice()
  }
}

impl<T, A, G> AsRef<[T]> for Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn as_ref(&self) -> &[T] {
    self
  }
}

impl<T, A, G> AsMut<[T]> for Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn as_mut(&mut self) -> &mut [T] {
    self
  }
}

impl<T, A, G> fmt::Debug for Vector<T, A, G>
where
  T: fmt::Debug,
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

impl<T, A, G> Hash for Vector<T, A, G>
where
  T: Hash,
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn hash<H: Hasher>(
    &self,
    state: &mut H,
  ) {
    self.as_slice().hash(state);
  }
}

impl<T, U, A1, A2, G1, G2> PartialEq<Vector<U, A2, G2>> for Vector<T, A1, G1>
where
  T: PartialEq<U>,
  A1: Allocator<T>,
  A2: Allocator<U>,
  G1: GrowthStrategy,
  G2: GrowthStrategy,
{
  fn eq(
    &self,
    other: &Vector<U, A2, G2>,
  ) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<T, A, G> Eq for Vector<T, A, G>
where
  T: Eq,
  A: Allocator<T>,
  G: GrowthStrategy,
{
}

impl<T, U, A, G> PartialEq<[U]> for Vector<T, A, G>
where
  T: PartialEq<U>,
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn eq(
    &self,
    other: &[U],
  ) -> bool {
    self.as_slice() == other
  }
}

impl<T, U, A, G> PartialEq<&[U]> for Vector<T, A, G>
where
  T: PartialEq<U>,
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn eq(
    &self,
    other: &&[U],
  ) -> bool {
    self.as_slice() == *other
  }
}

impl<T, U, A, G, const N: usize> PartialEq<[U; N]> for Vector<T, A, G>
where
  T: PartialEq<U>,
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn eq(
    &self,
    other: &[U; N],
  ) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<T, U, A, G> PartialEq<Vec<U>> for Vector<T, A, G>
where
  T: PartialEq<U>,
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn eq(
    &self,
    other: &Vec<U>,
  ) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<T, A, G> Extend<T> for Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  fn extend<I: IntoIterator<Item = T>>(
    &mut self,
    items: I,
  ) {
    for item in items {
      if let Err(error) = self.push(item) {
        allocation_failed(error);
      }
    }
  }
}

impl<T, A, G> FromIterator<T> for Vector<T, A, G>
where
  A: Allocator<T> + Default,
  G: GrowthStrategy,
{
  fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
    Self::from_iter_in(items, A::default()).unwrap_or_else(|error| allocation_failed(error))
  }
}

impl<'a, T, A, G> IntoIterator for &'a Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a, T, A, G> IntoIterator for &'a mut Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  type Item = &'a mut T;
  type IntoIter = slice::IterMut<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter_mut()
  }
}

impl<T, A, G> IntoIterator for Vector<T, A, G>
where
  A: Allocator<T>,
  G: GrowthStrategy,
{
  type Item = T;
  type IntoIter = IntoIter<T, A>;

  fn into_iter(self) -> IntoIter<T, A> {
    let vector = ManuallyDrop::new(self);

    // The growth strategy is the only field not carried over.
    drop(unsafe { ptr::read(&vector.growth) });

    IntoIter {
      buffer: vector.buffer,
      capacity: vector.capacity,
      allocator: unsafe { ptr::read(&vector.allocator) },
      front: 0,
      back: vector.len,
      _marker: PhantomData,
    }
  }
}

/// Owning iterator over the elements of a [`Vector`].
pub struct IntoIter<T, A: Allocator<T>> {
  buffer: NonNull<T>,
  capacity: usize,
  allocator: A,
  front: usize,
  back: usize,
  _marker: PhantomData<T>,
}

impl<T, A: Allocator<T>> IntoIter<T, A> {
  /// Elements not yet yielded.
  pub fn as_slice(&self) -> &[T] {
    unsafe { slice::from_raw_parts(self.buffer.add(self.front).as_ptr(), self.back - self.front) }
  }
}

impl<T, A: Allocator<T>> Iterator for IntoIter<T, A> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    if self.front == self.back {
      return None;
    }

    let value = unsafe { self.buffer.add(self.front).read() };
    self.front += 1;
    Some(value)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    let remaining = self.back - self.front;
    (remaining, Some(remaining))
  }
}

impl<T, A: Allocator<T>> DoubleEndedIterator for IntoIter<T, A> {
  fn next_back(&mut self) -> Option<T> {
    if self.front == self.back {
      return None;
    }

    self.back -= 1;
    Some(unsafe { self.buffer.add(self.back).read() })
  }
}

impl<T, A: Allocator<T>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator<T>> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for IntoIter<T, A> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
  }
}

impl<T, A: Allocator<T>> Drop for IntoIter<T, A> {
  fn drop(&mut self) {
    unsafe {
      algorithm::destroy_elements(&self.allocator, self.buffer.add(self.front), self.back - self.front);
      if self.capacity > 0 {
        self.allocator.deallocate(self.buffer, self.capacity);
      }
    }
  }
}

/// Builds a [`Vector`] over the default resource, like `vec!`.
///
/// `vector![in allocator; a, b, c]` uses the given allocator instead.
///
/// Panics if the allocation fails.
#[macro_export]
macro_rules! vector {
  () => {
    $crate::vector::Vector::new()
  };
  (in $allocator:expr; $($item:expr),* $(,)?) => {
    match <$crate::vector::Vector<_, _>>::from_iter_in([$($item),*], $allocator) {
      ::core::result::Result::Ok(vector) => vector,
      ::core::result::Result::Err(error) => ::core::panic!("vector allocation failed: {error}"),
    }
  };
  ($item:expr; $len:expr) => {
    match <$crate::vector::Vector<_>>::from_elem_in($len, &$item, ::core::default::Default::default()) {
      ::core::result::Result::Ok(vector) => vector,
      ::core::result::Result::Err(error) => ::core::panic!("vector allocation failed: {error}"),
    }
  };
  ($($item:expr),+ $(,)?) => {
    $crate::vector![in $crate::allocator::PolymorphicAllocator::default(); $($item),+]
  };
}
