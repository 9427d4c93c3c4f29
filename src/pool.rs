use std::{cell::RefCell, marker::PhantomData, ptr::NonNull};

use crate::{
  align::{self, MAX_ALIGN},
  block::FreeList,
  error::{AllocError, Result},
  resource::{MemoryResource, check_alignment},
};

/// Bookkeeping charged to every block when sizing the pool.
pub const HEADER_SIZE: usize = std::mem::size_of::<usize>();

/// Fixed-size block allocator over a donated buffer.
///
/// A buffer of `len` bytes holds `len / (HEADER_SIZE + block_size)` blocks,
/// fewer if they do not fit at the aligned stride. Blocks start at the first
/// address aligned to `block_alignment`, each
/// `align_to!(block_size, block_alignment)` bytes apart:
///
/// ```text
///   base   first block
///    │      │
///    ▼      ▼
///   ┌──────┬──────────┬──────────┬──────────┬─────┐
///   │ pad  │ block 0  │ block 1  │ block 2  │tail │
///   └──────┴──────────┴──────────┴──────────┴─────┘
///           ◄─stride─►
/// ```
///
/// Requests larger than the block size or stricter than the block alignment
/// fail. Free blocks are tracked by offset, no coalescing happens.
pub struct PoolMemoryResource<'a> {
  base: NonNull<u8>,
  first_block: usize,
  stride: usize,
  block_size: usize,
  block_alignment: usize,
  block_count: usize,
  free: RefCell<FreeList>,
  _buffer: PhantomData<&'a mut [u8]>,
}

impl<'a> PoolMemoryResource<'a> {
  /// Pool of `block_size` blocks aligned to [`MAX_ALIGN`].
  pub fn new(
    buffer: &'a mut [u8],
    block_size: usize,
  ) -> Result<Self> {
    Self::with_alignment(buffer, block_size, MAX_ALIGN)
  }

  pub fn with_alignment(
    buffer: &'a mut [u8],
    block_size: usize,
    block_alignment: usize,
  ) -> Result<Self> {
    check_alignment(block_alignment)?;

    let len = buffer.len();
    let base = NonNull::from(buffer).cast::<u8>();
    let base_address = base.as_ptr() as usize;

    let stride = align::align_up(block_size.max(1), block_alignment).ok_or(AllocError::CapacityOverflow)?;
    let first_block = align::align_up(base_address, block_alignment)
      .map(|aligned| aligned - base_address)
      .unwrap_or(len);
    let by_header = len / HEADER_SIZE.saturating_add(block_size);
    let by_stride = len.saturating_sub(first_block) / stride;
    let block_count = by_header.min(by_stride);

    let mut free = FreeList::with_capacity(block_count);
    for index in (0..block_count).rev() {
      free.push(first_block + index * stride);
    }

    log::debug!(
      "pool resource over {len} bytes: {block_count} blocks of {block_size} bytes (align {block_alignment})"
    );

    Ok(Self {
      base,
      first_block,
      stride,
      block_size,
      block_alignment,
      block_count,
      free: RefCell::new(free),
      _buffer: PhantomData,
    })
  }

  pub fn block_size(&self) -> usize {
    self.block_size
  }

  pub fn block_alignment(&self) -> usize {
    self.block_alignment
  }

  /// Total number of blocks carved out of the buffer.
  pub fn block_count(&self) -> usize {
    self.block_count
  }

  pub fn free_blocks(&self) -> usize {
    self.free.borrow().len()
  }
}

impl MemoryResource for PoolMemoryResource<'_> {
  fn allocate(
    &self,
    bytes: usize,
    alignment: usize,
  ) -> Result<NonNull<u8>> {
    check_alignment(alignment)?;

    if bytes > self.block_size || alignment > self.block_alignment {
      return Err(AllocError::out_of_memory(bytes, alignment));
    }

    let offset = self
      .free
      .borrow_mut()
      .pop()
      .ok_or_else(|| AllocError::out_of_memory(bytes, alignment))?;

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

    let offset = (address as usize).wrapping_sub(self.base.as_ptr() as usize);
    let end = self.first_block + self.block_count * self.stride;
    assert!(
      (self.first_block..end).contains(&offset) && (offset - self.first_block) % self.stride == 0,
      "address is not a block of this pool"
    );

    let mut free = self.free.borrow_mut();
    debug_assert!(!free.contains(offset), "pool block released twice");
    free.push(offset);
  }
}
