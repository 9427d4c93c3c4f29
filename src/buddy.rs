use std::{cell::RefCell, marker::PhantomData, ptr::NonNull};

use crate::{
  align::{self, MAX_ALIGN},
  block::FreeList,
  error::{AllocError, Result},
  resource::{MemoryResource, check_alignment},
};

/// One free list per power of two, `1 << 0` up to `1 << 63` bytes.
pub const MAX_LEVEL: usize = 64;

/// Binary buddy allocator over a donated buffer.
///
/// The usable region is the buffer after aligning its start, rounded down to
/// a power of two. Level `k` tracks free blocks of `1 << k` bytes; the
/// buddy of the block at offset `o` on level `k` sits at `o ^ (1 << k)`.
///
/// ```text
///   level 12  ┌───────────────────────────────────────────────┐
///             │                     4096                      │
///             └───────────────────────────────────────────────┘
///   level 11  ┌───────────────────────┬───────────────────────┐
///             │         2048          │         2048          │
///             └───────────────────────┴───────────────────────┘
///   level 10  ┌───────────┬───────────┐
///             │   1024    │   1024    │   ...
///             └───────────┴───────────┘
/// ```
///
/// Allocation splits the first large-enough block, keeping the lower half and
/// freeing the upper one, until it reaches the requested level. Deallocation
/// merges with the buddy for as long as the buddy is free.
pub struct BuddyMemoryResource<'a> {
  base: NonNull<u8>,
  alignment: usize,
  capacity: usize,
  free_lists: RefCell<[FreeList; MAX_LEVEL]>,
  _buffer: PhantomData<&'a mut [u8]>,
}

#[inline]
const fn level_size(level: usize) -> usize {
  1 << level
}

/// Smallest level whose blocks hold `max(bytes, alignment)` bytes.
#[inline]
fn level_of(
  bytes: usize,
  alignment: usize,
) -> Option<usize> {
  bytes
    .max(alignment)
    .checked_next_power_of_two()
    .map(|size| size.trailing_zeros() as usize)
}

impl<'a> BuddyMemoryResource<'a> {
  /// Buddy allocator whose base is aligned to [`MAX_ALIGN`].
  pub fn new(buffer: &'a mut [u8]) -> Result<Self> {
    Self::with_alignment(buffer, MAX_ALIGN)
  }

  /// Buddy allocator whose base is aligned to `alignment`. Requests with a
  /// stricter alignment are refused.
  ///
  /// # Errors
  ///
  /// [`AllocError::BufferTooSmall`] if no byte is left once the start of the
  /// buffer is aligned.
  pub fn with_alignment(
    buffer: &'a mut [u8],
    alignment: usize,
  ) -> Result<Self> {
    check_alignment(alignment)?;

    let len = buffer.len();
    let raw = NonNull::from(buffer).cast::<u8>();
    let address = raw.as_ptr() as usize;

    let padding = align::align_up(address, alignment)
      .map(|aligned| aligned - address)
      .filter(|&padding| padding < len)
      .ok_or(AllocError::BufferTooSmall { len, alignment })?;

    let usable = len - padding;
    let capacity = level_size((usize::BITS - 1 - usable.leading_zeros()) as usize);

    let mut free_lists: [FreeList; MAX_LEVEL] = std::array::from_fn(|_| FreeList::new());
    free_lists[capacity.trailing_zeros() as usize].push(0);

    log::debug!("buddy resource over {len} bytes: {capacity} usable (align {alignment})");

    Ok(Self {
      base: unsafe { raw.add(padding) },
      alignment,
      capacity,
      free_lists: RefCell::new(free_lists),
      _buffer: PhantomData,
    })
  }

  /// Usable bytes, always a power of two.
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Start of the usable region. A block spanning the whole capacity is
  /// returned at this address.
  pub fn base(&self) -> NonNull<u8> {
    self.base
  }

  pub fn alignment(&self) -> usize {
    self.alignment
  }

  /// Number of free blocks of `1 << level` bytes. Zero for levels past
  /// [`MAX_LEVEL`].
  pub fn free_blocks(
    &self,
    level: usize,
  ) -> usize {
    self.free_lists.borrow().get(level).map_or(0, FreeList::len)
  }
}

impl MemoryResource for BuddyMemoryResource<'_> {
  fn allocate(
    &self,
    bytes: usize,
    alignment: usize,
  ) -> Result<NonNull<u8>> {
    check_alignment(alignment)?;

    if alignment > self.alignment {
      return Err(AllocError::out_of_memory(bytes, alignment));
    }

    let required = level_of(bytes, alignment).ok_or_else(|| AllocError::out_of_memory(bytes, alignment))?;

    let mut free_lists = self.free_lists.borrow_mut();
    let (mut level, offset) = (required..MAX_LEVEL)
      .find_map(|level| free_lists[level].pop().map(|offset| (level, offset)))
      .ok_or_else(|| AllocError::out_of_memory(bytes, alignment))?;

    while level > required {
      level -= 1;
      log::trace!("buddy split: block {offset:#x} down to level {level}");
      free_lists[level].push(offset + level_size(level));
    }

    Ok(unsafe { self.base.add(offset) })
  }

  unsafe fn deallocate(
    &self,
    address: *mut u8,
    bytes: usize,
    alignment: usize,
  ) {
    if address.is_null() {
      return;
    }

    let mut offset = (address as usize).wrapping_sub(self.base.as_ptr() as usize);
    assert!(offset < self.capacity, "address is not inside this buddy resource");

    let mut level = match level_of(bytes, alignment) {
      Some(level) => level,
      None => panic!("no buddy block holds {bytes} bytes"),
    };
    debug_assert!(offset % level_size(level) == 0, "address is not a block start");

    let mut free_lists = self.free_lists.borrow_mut();
    while level < MAX_LEVEL {
      let buddy = offset ^ level_size(level);
      if buddy >= self.capacity || !free_lists[level].remove(buddy) {
        break;
      }

      offset = offset.min(buddy);
      level += 1;
      log::trace!("buddy merge: block {offset:#x} up to level {level}");
    }

    debug_assert!(!free_lists[level].contains(offset), "buddy block released twice");
    free_lists[level].push(offset);
  }
}
