use std::{alloc::Layout, cell::Cell, marker::PhantomData, ptr::NonNull};

use crate::{
  align,
  error::{AllocError, Result},
  resource::{MemoryResource, check_alignment},
};

/// Cursor offset before the allocation it precedes.
type Header = usize;

const HEADER: Layout = Layout::new::<Header>();

/// LIFO allocator over a donated buffer.
///
/// Each block is preceded by a word-sized header that records where the
/// cursor was before the block was carved out:
///
/// ```text
///   ┌───────────┬──────────┬────────┬──────────┬────────┬─────────────┐
///   │ block A   │ padding  │ header │ block B  │        │ Free Space  │
///   └───────────┴──────────┴────────┴──────────┴────────┴─────────────┘
///               ▲              │                        ▲
///               └──────────────┘                      cursor
///                cursor before B
/// ```
///
/// Blocks must be released in exact reverse order of allocation. Releasing
/// anything but the top block panics.
pub struct StackMemoryResource<'a> {
  base: NonNull<u8>,
  capacity: usize,
  cursor: Cell<usize>,
  _buffer: PhantomData<&'a mut [u8]>,
}

impl<'a> StackMemoryResource<'a> {
  pub fn new(buffer: &'a mut [u8]) -> Self {
    let capacity = buffer.len();
    log::debug!("stack resource over {capacity} bytes");

    Self {
      base: NonNull::from(buffer).cast::<u8>(),
      capacity,
      cursor: Cell::new(0),
      _buffer: PhantomData,
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn used(&self) -> usize {
    self.cursor.get()
  }

  pub fn remaining(&self) -> usize {
    self.capacity - self.cursor.get()
  }
}

impl MemoryResource for StackMemoryResource<'_> {
  fn allocate(
    &self,
    bytes: usize,
    alignment: usize,
  ) -> Result<NonNull<u8>> {
    check_alignment(alignment)?;

    let cursor = self.cursor.get();
    let block = align::align_with_header(
      self.base.as_ptr() as usize,
      cursor,
      self.capacity,
      HEADER,
      bytes,
      alignment,
    )
    .ok_or_else(|| AllocError::out_of_memory(bytes, alignment))?;

    unsafe {
      let header = self.base.add(block - HEADER.size()).cast::<Header>();
      header.write(cursor);
    }

    self.cursor.set(block + bytes);

    Ok(unsafe { self.base.add(block) })
  }

  unsafe fn deallocate(
    &self,
    address: *mut u8,
    bytes: usize,
    _alignment: usize,
  ) {
    if address.is_null() {
      return;
    }

    let base = self.base.as_ptr() as usize;
    let offset = (address as usize).wrapping_sub(base);
    assert!(
      offset >= HEADER.size() && offset <= self.capacity && offset + bytes == self.cursor.get(),
      "stack resource blocks must be released in LIFO order"
    );

    let previous = unsafe { self.base.add(offset - HEADER.size()).cast::<Header>().read() };
    debug_assert!(previous <= offset - HEADER.size());

    self.cursor.set(previous);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resource::testsuite;

  const BUFFER_SIZE: usize = 512;

  #[test]
  fn test_common() {
    let mut buffer = [0u8; BUFFER_SIZE];
    let resource = StackMemoryResource::new(&mut buffer);
    testsuite::run(&resource);
    assert_eq!(resource.used(), 0);
  }

  #[test]
  fn test_alloc_updates_cursor() {
    let mut buffer = [0u8; BUFFER_SIZE];
    let resource = StackMemoryResource::new(&mut buffer);

    let old_remaining = resource.remaining();

    let address = resource.allocate(64, 16).unwrap();
    assert_eq!(address.as_ptr() as usize % 16, 0);

    assert!(resource.used() > 64);
    assert!(resource.remaining() < old_remaining);
  }

  #[test]
  fn test_dealloc_restores_cursor() {
    let mut buffer = [0u8; BUFFER_SIZE];
    let resource = StackMemoryResource::new(&mut buffer);

    resource.allocate(7, 1).unwrap();
    let used = resource.used();

    let address = resource.allocate(64, 16).unwrap();
    unsafe { resource.deallocate(address.as_ptr(), 64, 16) };

    assert_eq!(resource.used(), used);
  }

  #[test]
  fn test_header_stores_previous_cursor() {
    let mut buffer = testsuite::AlignedBuffer::<BUFFER_SIZE>::new();
    let resource = StackMemoryResource::new(&mut buffer.0);

    let address = resource.allocate(64, 64).unwrap();

    // Aligned base: the header forces the block to the next 64 byte boundary.
    assert_eq!(address.as_ptr() as usize - resource.base.as_ptr() as usize, 64);
    let previous = unsafe { address.sub(HEADER.size()).cast::<Header>().read() };
    assert_eq!(previous, 0);

    unsafe { resource.deallocate(address.as_ptr(), 64, 64) };
  }

  #[test]
  fn test_multiple_allocations_unwind() {
    let mut buffer = [0u8; BUFFER_SIZE];
    let resource = StackMemoryResource::new(&mut buffer);

    let a = resource.allocate(16, 8).unwrap();
    let b = resource.allocate(32, 8).unwrap();
    assert!(a < b);

    unsafe {
      resource.deallocate(b.as_ptr(), 32, 8);
      resource.deallocate(a.as_ptr(), 16, 8);
    }

    assert_eq!(resource.used(), 0);
    assert_eq!(resource.remaining(), BUFFER_SIZE);
  }

  #[test]
  fn test_exhaustion_keeps_cursor() {
    let mut buffer = [0u8; 64];
    let resource = StackMemoryResource::new(&mut buffer);

    resource.allocate(16, 8).unwrap();
    let used = resource.used();

    assert!(matches!(
      resource.allocate(64, 8),
      Err(AllocError::OutOfMemory { .. })
    ));
    assert_eq!(resource.used(), used);
  }

  #[test]
  #[should_panic(expected = "LIFO order")]
  fn test_out_of_order_deallocate_panics() {
    let mut buffer = [0u8; BUFFER_SIZE];
    let resource = StackMemoryResource::new(&mut buffer);

    let a = resource.allocate(16, 8).unwrap();
    let _b = resource.allocate(16, 8).unwrap();

    unsafe { resource.deallocate(a.as_ptr(), 16, 8) };
  }
}
