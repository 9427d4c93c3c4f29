//! Algorithms over uninitialized storage.
//!
//! Every function constructs or destroys through an [`Allocator`], on raw
//! ranges described by a start pointer and a count. Construction that can
//! panic is guarded: if constructing element `i` unwinds, elements `0..i` are
//! destroyed first, so the destination range is left fully uninitialized.

use std::{mem, ptr::NonNull};

use crate::allocator::Allocator;

/// Destroys the constructed prefix of a range if construction unwinds.
struct PartialInit<'a, T, A: Allocator<T>> {
  allocator: &'a A,
  start: NonNull<T>,
  initialized: usize,
}

impl<'a, T, A: Allocator<T>> PartialInit<'a, T, A> {
  fn new(
    allocator: &'a A,
    start: NonNull<T>,
  ) -> Self {
    Self {
      allocator,
      start,
      initialized: 0,
    }
  }

  /// # Safety
  ///
  /// The slot after the constructed prefix must be valid for writes.
  #[inline]
  unsafe fn push(
    &mut self,
    value: T,
  ) {
    unsafe { self.allocator.construct(self.start.add(self.initialized), value) };
    self.initialized += 1;
  }

  /// Keeps the constructed elements and returns one past the last of them.
  fn finish(self) -> NonNull<T> {
    let end = unsafe { self.start.add(self.initialized) };
    mem::forget(self);
    end
  }
}

impl<T, A: Allocator<T>> Drop for PartialInit<'_, T, A> {
  fn drop(&mut self) {
    unsafe { destroy_elements(self.allocator, self.start, self.initialized) };
  }
}

/// Constructs the items of `source` into `dest`, in order.
///
/// Returns one past the last constructed element.
///
/// # Safety
///
/// `dest` must be valid for writes of as many elements as `source` yields.
pub unsafe fn uninitialized_forward<T, A, I>(
  allocator: &A,
  source: I,
  dest: NonNull<T>,
) -> NonNull<T>
where
  A: Allocator<T>,
  I: IntoIterator<Item = T>,
{
  let mut guard = PartialInit::new(allocator, dest);
  for value in source {
    unsafe { guard.push(value) };
  }
  guard.finish()
}

/// Like [`uninitialized_forward`], but takes at most `count` items.
///
/// # Safety
///
/// `dest` must be valid for writes of `count` elements.
pub unsafe fn uninitialized_forward_n<T, A, I>(
  allocator: &A,
  source: I,
  count: usize,
  dest: NonNull<T>,
) -> NonNull<T>
where
  A: Allocator<T>,
  I: IntoIterator<Item = T>,
{
  unsafe { uninitialized_forward(allocator, source.into_iter().take(count), dest) }
}

/// Clones every element of `source` into `dest`.
///
/// # Safety
///
/// `dest` must be valid for writes of `source.len()` elements and must not
/// overlap `source`.
pub unsafe fn uninitialized_clone<T, A>(
  allocator: &A,
  source: &[T],
  dest: NonNull<T>,
) -> NonNull<T>
where
  T: Clone,
  A: Allocator<T>,
{
  unsafe { uninitialized_forward(allocator, source.iter().cloned(), dest) }
}

/// Relocates `count` elements from `source` to `dest`.
///
/// Moves are bitwise, so relocation never panics. Afterwards `source` is
/// logically uninitialized and must not be dropped.
///
/// # Safety
///
/// `source` must hold `count` live elements, `dest` must be valid for
/// `count` writes, and the ranges must not overlap.
#[inline]
pub unsafe fn uninitialized_move<T>(
  source: NonNull<T>,
  count: usize,
  dest: NonNull<T>,
) -> NonNull<T> {
  unsafe {
    source.copy_to_nonoverlapping(dest, count);
    dest.add(count)
  }
}

/// Constructs `count` elements produced by `make` into `dest`.
///
/// # Safety
///
/// `dest` must be valid for writes of `count` elements.
pub unsafe fn uninitialized_emplace_n<T, A, F>(
  allocator: &A,
  dest: NonNull<T>,
  count: usize,
  make: F,
) -> NonNull<T>
where
  A: Allocator<T>,
  F: FnMut() -> T,
{
  unsafe { uninitialized_forward(allocator, std::iter::repeat_with(make).take(count), dest) }
}

/// Constructs an element produced by `make` into every slot of
/// `[first, last)`.
///
/// # Safety
///
/// `first` and `last` must bound one range valid for writes, with
/// `first <= last`.
pub unsafe fn uninitialized_emplace<T, A, F>(
  allocator: &A,
  first: NonNull<T>,
  last: NonNull<T>,
  make: F,
) -> NonNull<T>
where
  A: Allocator<T>,
  F: FnMut() -> T,
{
  unsafe { uninitialized_emplace_n(allocator, first, range_len(first, last), make) }
}

/// Fills `[first, last)` with clones of `value`.
///
/// # Safety
///
/// Same contract as [`uninitialized_emplace`]; the range must not contain
/// `value`.
pub unsafe fn uninitialized_fill<T, A>(
  allocator: &A,
  first: NonNull<T>,
  last: NonNull<T>,
  value: &T,
) -> NonNull<T>
where
  T: Clone,
  A: Allocator<T>,
{
  unsafe { uninitialized_fill_n(allocator, first, range_len(first, last), value) }
}

/// # Safety
///
/// Both pointers must lie in the same allocation, `first <= last`.
#[inline]
unsafe fn range_len<T>(
  first: NonNull<T>,
  last: NonNull<T>,
) -> usize {
  if size_of::<T>() == 0 {
    return 0;
  }
  let count = unsafe { last.offset_from(first) };
  usize::try_from(count).unwrap_or(0)
}

/// Fills `count` slots of `dest` with clones of `value`.
///
/// # Safety
///
/// `dest` must be valid for writes of `count` elements and must not contain
/// `value`.
pub unsafe fn uninitialized_fill_n<T, A>(
  allocator: &A,
  dest: NonNull<T>,
  count: usize,
  value: &T,
) -> NonNull<T>
where
  T: Clone,
  A: Allocator<T>,
{
  unsafe { uninitialized_emplace_n(allocator, dest, count, || value.clone()) }
}

/// Destroys `count` elements starting at `first`.
///
/// # Safety
///
/// The range must hold `count` live elements that are not used afterwards.
pub unsafe fn destroy_elements<T, A>(
  allocator: &A,
  first: NonNull<T>,
  count: usize,
) where
  A: Allocator<T>,
{
  if !mem::needs_drop::<T>() {
    return;
  }

  for i in 0..count {
    unsafe { allocator.destroy(first.add(i)) };
  }
}

/// Destroys the `len` live elements of `buffer` and returns its storage.
///
/// # Safety
///
/// `buffer` must come from `allocator.allocate(capacity)` and hold `len`
/// live elements at its start.
pub unsafe fn delete_buffer<T, A>(
  allocator: &A,
  buffer: NonNull<T>,
  len: usize,
  capacity: usize,
) where
  A: Allocator<T>,
{
  unsafe {
    destroy_elements(allocator, buffer, len);
    if capacity > 0 {
      allocator.deallocate(buffer, capacity);
    }
  }
}

/// Distance in bytes from `first` to `last`.
pub fn pointer_distance<T, U>(
  first: *const T,
  last: *const U,
) -> usize {
  let (first, last) = (first as usize, last as usize);
  assert!(first <= last, "first pointer must not come after the last pointer");
  last - first
}

#[cfg(test)]
mod tests {
  use std::{
    cell::Cell,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
  };

  use super::*;
  use crate::{allocator::PolymorphicAllocator, arena::ArenaMemoryResource};

  /// Counts live instances through a shared counter.
  struct Tracked {
    live: Rc<Cell<usize>>,
    value: usize,
  }

  impl Tracked {
    fn new(
      live: &Rc<Cell<usize>>,
      value: usize,
    ) -> Self {
      live.set(live.get() + 1);
      Self {
        live: Rc::clone(live),
        value,
      }
    }
  }

  impl Clone for Tracked {
    fn clone(&self) -> Self {
      if self.value == 3 {
        panic!("clone of 3");
      }
      Tracked::new(&self.live, self.value)
    }
  }

  impl Drop for Tracked {
    fn drop(&mut self) {
      self.live.set(self.live.get() - 1);
    }
  }

  #[test]
  fn test_clone_fill_and_destroy() {
    let allocator = PolymorphicAllocator::<String>::default();
    let buffer = allocator.allocate(6).unwrap();
    let source = ["a".to_string(), "b".to_string(), "c".to_string()];

    unsafe {
      let end = uninitialized_clone(&allocator, &source, buffer);
      let end = uninitialized_fill_n(&allocator, end, 3, &"x".to_string());
      assert_eq!(pointer_distance(buffer.as_ptr(), end.as_ptr()), 6 * size_of::<String>());

      let items = std::slice::from_raw_parts(buffer.as_ptr(), 6);
      assert_eq!(items, ["a", "b", "c", "x", "x", "x"]);

      delete_buffer(&allocator, buffer, 6, 6);
    }

    assert_eq!(source[1], "b");
  }

  #[test]
  fn test_move_relocates_bitwise() {
    let mut storage = [0u8; 256];
    let arena = ArenaMemoryResource::new(&mut storage);
    let allocator = PolymorphicAllocator::<Vec<i32>>::new(&arena);

    let old = allocator.allocate(2).unwrap();
    let new = allocator.allocate(2).unwrap();

    unsafe {
      uninitialized_forward(&allocator, [vec![1], vec![2, 3]], old);
      let end = uninitialized_move(old, 2, new);
      assert_eq!(end, new.add(2));
      assert_eq!(new.add(1).as_ref(), &[2, 3]);
      destroy_elements(&allocator, new, 2);
    }
  }

  #[test]
  fn test_emplace_and_forward_n() {
    let allocator = PolymorphicAllocator::<usize>::default();
    let buffer = allocator.allocate(5).unwrap();

    unsafe {
      let mut next = 0;
      let end = uninitialized_emplace_n(&allocator, buffer, 2, || {
        next += 1;
        next
      });
      uninitialized_forward_n(&allocator, 10.., 3, end);

      assert_eq!(std::slice::from_raw_parts(buffer.as_ptr(), 5), [1, 2, 10, 11, 12]);
      delete_buffer(&allocator, buffer, 5, 5);
    }
  }

  #[test]
  fn test_panicking_clone_destroys_prefix() {
    let live = Rc::new(Cell::new(0));
    let source: Vec<_> = (0..5).map(|value| Tracked::new(&live, value)).collect();
    assert_eq!(live.get(), 5);

    let allocator = PolymorphicAllocator::<Tracked>::default();
    let buffer = allocator.allocate(5).unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
      uninitialized_clone(&allocator, &source, buffer);
    }));

    assert!(result.is_err());
    // Clones of 0, 1 and 2 were built and then destroyed.
    assert_eq!(live.get(), 5);

    unsafe { allocator.deallocate(buffer, 5) };
  }

  #[test]
  fn test_fill_and_emplace_ranges() {
    let allocator = PolymorphicAllocator::<u16>::default();
    let buffer = allocator.allocate(6).unwrap();

    unsafe {
      let middle = buffer.add(3);
      let end = buffer.add(6);
      assert_eq!(uninitialized_fill(&allocator, buffer, middle, &7), middle);
      assert_eq!(uninitialized_emplace(&allocator, middle, end, || 9), end);
      assert_eq!(uninitialized_fill(&allocator, end, end, &1), end);

      assert_eq!(std::slice::from_raw_parts(buffer.as_ptr(), 6), [7, 7, 7, 9, 9, 9]);
      delete_buffer(&allocator, buffer, 6, 6);
    }
  }

  #[test]
  #[should_panic(expected = "must not come after")]
  fn test_pointer_distance_order() {
    let values = [0u32; 2];
    pointer_distance(&values[1], &values[0]);
  }
}
