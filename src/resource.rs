use std::{alloc::Layout, ptr::NonNull};

use crate::{
  align,
  error::{AllocError, Result},
};

/// Source of raw, untyped, aligned bytes.
///
/// Every allocation strategy in this crate implements this trait, and every
/// consumer talks to it through `&dyn MemoryResource`. A resource is borrowed
/// by the allocators built on it, never owned by them.
///
/// Implementations mutate their state through `&self` with `Cell`/`RefCell`,
/// which makes them `!Sync`: a resource belongs to a single thread.
pub trait MemoryResource {
  /// Returns `bytes` bytes aligned to `alignment`.
  ///
  /// # Errors
  ///
  /// - [`AllocError::InvalidAlignment`] if `alignment` is not a power of two.
  /// - [`AllocError::OutOfMemory`] if the request cannot be satisfied.
  fn allocate(
    &self,
    bytes: usize,
    alignment: usize,
  ) -> Result<NonNull<u8>>;

  /// Returns a block to the resource. A null `address` is a no-op.
  ///
  /// # Safety
  ///
  /// A non-null `address` must come from `allocate` on this same resource
  /// with the same `bytes` and `alignment`, and must not have been
  /// deallocated since.
  unsafe fn deallocate(
    &self,
    address: *mut u8,
    bytes: usize,
    alignment: usize,
  );

  fn allocate_layout(
    &self,
    layout: Layout,
  ) -> Result<NonNull<u8>> {
    self.allocate(layout.size(), layout.align())
  }

  /// # Safety
  ///
  /// Same contract as [`MemoryResource::deallocate`].
  unsafe fn deallocate_layout(
    &self,
    address: *mut u8,
    layout: Layout,
  ) {
    unsafe { self.deallocate(address, layout.size(), layout.align()) }
  }
}

pub(crate) fn check_alignment(alignment: usize) -> Result<()> {
  if align::is_valid_alignment(alignment) {
    Ok(())
  } else {
    Err(AllocError::InvalidAlignment { alignment })
  }
}

/// Identity of a resource, used for allocator equality.
pub(crate) fn same_resource(
  lhs: &dyn MemoryResource,
  rhs: &dyn MemoryResource,
) -> bool {
  std::ptr::addr_eq(lhs as *const dyn MemoryResource, rhs as *const dyn MemoryResource)
}
