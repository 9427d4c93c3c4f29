use std::{alloc::Layout, fmt, marker::PhantomData, ptr::NonNull};

use crate::{
  default::DefaultMemoryResource,
  error::{AllocError, Result},
  resource::{MemoryResource, same_resource},
};

/// Typed allocation capability used by the containers in this crate.
///
/// An allocator for `T` can be rebound to any other element type `U`; the
/// rebound allocator draws from the same underlying memory. Equal allocators
/// can release each other's storage.
pub trait Allocator<T>: Clone + PartialEq {
  type Rebind<U>: Allocator<U>;

  /// Uninitialized storage for `count` values of `T`.
  fn allocate(
    &self,
    count: usize,
  ) -> Result<NonNull<T>>;

  /// # Safety
  ///
  /// `address` must come from `allocate(count)` on an allocator equal to this
  /// one, and must not be used afterwards.
  unsafe fn deallocate(
    &self,
    address: NonNull<T>,
    count: usize,
  );

  /// Moves `value` into uninitialized storage.
  ///
  /// # Safety
  ///
  /// `address` must be valid for writes and properly aligned.
  #[inline]
  unsafe fn construct(
    &self,
    address: NonNull<T>,
    value: T,
  ) {
    unsafe { address.write(value) }
  }

  /// Runs the destructor of the value at `address`, leaving the storage
  /// uninitialized.
  ///
  /// # Safety
  ///
  /// `address` must hold a live value that is not used afterwards.
  #[inline]
  unsafe fn destroy(
    &self,
    address: NonNull<T>,
  ) {
    unsafe { address.drop_in_place() }
  }

  fn rebind<U>(&self) -> Self::Rebind<U>;
}

/// Allocator handle forwarding to a borrowed [`MemoryResource`].
///
/// The handle is `Copy` and never owns the resource; the `'r` lifetime keeps
/// the resource alive for as long as any handle (or container) uses it. Two
/// handles are equal when they point at the same resource instance,
/// whatever their element types.
pub struct PolymorphicAllocator<'r, T = u8> {
  resource: &'r dyn MemoryResource,
  _marker: PhantomData<fn() -> T>,
}

impl<'r, T> PolymorphicAllocator<'r, T> {
  pub fn new(resource: &'r dyn MemoryResource) -> Self {
    Self {
      resource,
      _marker: PhantomData,
    }
  }

  pub fn resource(&self) -> &'r dyn MemoryResource {
    self.resource
  }
}

impl<T> Default for PolymorphicAllocator<'static, T> {
  /// Allocator over the process-wide [`DefaultMemoryResource`].
  fn default() -> Self {
    Self::new(DefaultMemoryResource::global())
  }
}

impl<T> Clone for PolymorphicAllocator<'_, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for PolymorphicAllocator<'_, T> {}

impl<T, U> PartialEq<PolymorphicAllocator<'_, U>> for PolymorphicAllocator<'_, T> {
  fn eq(
    &self,
    other: &PolymorphicAllocator<'_, U>,
  ) -> bool {
    same_resource(self.resource, other.resource)
  }
}

impl<T> Eq for PolymorphicAllocator<'_, T> {}

impl<T> fmt::Debug for PolymorphicAllocator<'_, T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("PolymorphicAllocator")
      .field("resource", &(self.resource as *const dyn MemoryResource).cast::<()>())
      .finish()
  }
}

impl<'r, T> Allocator<T> for PolymorphicAllocator<'r, T> {
  type Rebind<U> = PolymorphicAllocator<'r, U>;

  /// Requests `count * size_of::<T>()` bytes aligned to `align_of::<T>()`.
  /// Zero-byte requests never reach the resource.
  fn allocate(
    &self,
    count: usize,
  ) -> Result<NonNull<T>> {
    let layout = Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow)?;

    if layout.size() == 0 {
      return Ok(NonNull::dangling());
    }

    self
      .resource
      .allocate_layout(layout)
      .map(|address| address.cast::<T>())
  }

  unsafe fn deallocate(
    &self,
    address: NonNull<T>,
    count: usize,
  ) {
    let Ok(layout) = Layout::array::<T>(count) else {
      return;
    };

    if layout.size() == 0 {
      return;
    }

    unsafe { self.resource.deallocate_layout(address.as_ptr().cast(), layout) }
  }

  fn rebind<U>(&self) -> PolymorphicAllocator<'r, U> {
    PolymorphicAllocator::new(self.resource)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{arena::ArenaMemoryResource, pool::PoolMemoryResource};

  #[test]
  fn test_allocate_forwards_to_resource() {
    let mut buffer = [0u8; 256];
    let arena = ArenaMemoryResource::new(&mut buffer);
    let allocator = PolymorphicAllocator::<u64>::new(&arena);

    let address = allocator.allocate(4).unwrap();
    assert_eq!(address.as_ptr() as usize % align_of::<u64>(), 0);
    assert!(arena.used() >= 4 * size_of::<u64>());

    unsafe {
      for i in 0..4 {
        allocator.construct(address.add(i), i as u64 * 10);
      }
      assert_eq!(address.add(3).read(), 30);
      allocator.deallocate(address, 4);
    }
  }

  #[test]
  fn test_construct_and_destroy() {
    let allocator = PolymorphicAllocator::<String>::default();
    let address = allocator.allocate(1).unwrap();

    unsafe {
      allocator.construct(address, "hello".to_string());
      assert_eq!(address.as_ref(), "hello");
      allocator.destroy(address);
      allocator.deallocate(address, 1);
    }
  }

  #[test]
  fn test_equality_is_resource_identity() {
    let mut first = [0u8; 64];
    let mut second = [0u8; 64];
    let a = ArenaMemoryResource::new(&mut first);
    let b = ArenaMemoryResource::new(&mut second);

    let on_a = PolymorphicAllocator::<i32>::new(&a);
    let also_on_a = PolymorphicAllocator::<String>::new(&a);
    let on_b = PolymorphicAllocator::<i32>::new(&b);

    assert_eq!(on_a, also_on_a);
    assert_ne!(on_a, on_b);
    assert_eq!(on_a, on_a.clone());
    assert_ne!(on_a, PolymorphicAllocator::<i32>::default());
  }

  #[test]
  fn test_rebind_keeps_resource() {
    let mut buffer = [0u8; 256];
    let arena = ArenaMemoryResource::new(&mut buffer);
    let bytes = PolymorphicAllocator::<u8>::new(&arena);

    let words: PolymorphicAllocator<'_, u64> = bytes.rebind();
    assert_eq!(bytes, words);

    let used = arena.used();
    words.allocate(2).unwrap();
    assert!(arena.used() > used);
  }

  #[test]
  fn test_zero_sized_requests_skip_resource() {
    let mut buffer = [0u8; 0];
    let arena = ArenaMemoryResource::new(&mut buffer);

    let units = PolymorphicAllocator::<()>::new(&arena);
    let address = units.allocate(1000).unwrap();
    unsafe { units.deallocate(address, 1000) };

    let empty = PolymorphicAllocator::<u32>::new(&arena);
    assert!(empty.allocate(0).is_ok());
    assert!(empty.allocate(1).is_err());
  }

  #[test]
  fn test_capacity_overflow() {
    let allocator = PolymorphicAllocator::<u64>::default();
    assert_eq!(allocator.allocate(usize::MAX), Err(AllocError::CapacityOverflow));
  }

  #[test]
  fn test_errors_propagate_unchanged() {
    let mut buffer = [0u8; 512];
    let pool = PoolMemoryResource::with_alignment(&mut buffer, 32, 8).unwrap();
    let allocator = PolymorphicAllocator::<u64>::new(&pool);

    assert_eq!(
      allocator.allocate(5),
      Err(AllocError::OutOfMemory {
        bytes: 40,
        alignment: 8
      })
    );
  }
}
