use std::{cell::Cell, marker::PhantomData, ptr::NonNull};

use crate::{
  align,
  error::{AllocError, Result},
  resource::{MemoryResource, check_alignment},
};

/// Bump allocator over a donated buffer.
///
/// ```text
///   ┌─────┬─────┬──┬─────┬──────────────────────────────────┐
///   │ A1  │ A2  │//│ A3  │            Free Space            │
///   └─────┴─────┴──┴─────┴──────────────────────────────────┘
///   ▲                    ▲                                  ▲
///   base               cursor                        base + capacity
/// ```
///
/// The cursor only moves forward. `deallocate` reclaims nothing, memory comes
/// back all at once through [`ArenaMemoryResource::reset`] or by dropping the
/// resource.
pub struct ArenaMemoryResource<'a> {
  base: NonNull<u8>,
  capacity: usize,
  cursor: Cell<usize>,
  _buffer: PhantomData<&'a mut [u8]>,
}

/// Monotonic resources are plain arenas.
pub type MonotonicMemoryResource<'a> = ArenaMemoryResource<'a>;

impl<'a> ArenaMemoryResource<'a> {
  pub fn new(buffer: &'a mut [u8]) -> Self {
    let capacity = buffer.len();
    log::debug!("arena resource over {capacity} bytes");

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

  /// Bytes consumed so far, alignment padding included.
  pub fn used(&self) -> usize {
    self.cursor.get()
  }

  pub fn remaining(&self) -> usize {
    self.capacity - self.cursor.get()
  }

  /// Rewinds the cursor to the start of the buffer.
  ///
  /// Requires exclusive access, so no allocator can still be borrowing the
  /// arena.
  pub fn reset(&mut self) {
    self.cursor.set(0);
  }
}

impl MemoryResource for ArenaMemoryResource<'_> {
  fn allocate(
    &self,
    bytes: usize,
    alignment: usize,
  ) -> Result<NonNull<u8>> {
    check_alignment(alignment)?;

    let base = self.base.as_ptr() as usize;
    let aligned = align::align_up(base + self.cursor.get(), alignment)
      .ok_or_else(|| AllocError::out_of_memory(bytes, alignment))?;

    let offset = aligned - base;
    let end = match offset.checked_add(bytes) {
      Some(end) if end <= self.capacity => end,
      _ => return Err(AllocError::out_of_memory(bytes, alignment)),
    };

    self.cursor.set(end);

    Ok(unsafe { self.base.add(offset) })
  }

  unsafe fn deallocate(
    &self,
    address: *mut u8,
    _bytes: usize,
    _alignment: usize,
  ) {
    if address.is_null() {
      return;
    }

    let base = self.base.as_ptr() as usize;
    let address = address as usize;
    assert!(
      base <= address && address <= base + self.cursor.get(),
      "address {address:#x} was not allocated by this arena"
    );
  }
}
