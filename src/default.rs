use std::{mem, ptr::NonNull};

use libc::c_void;

use crate::{
  error::{AllocError, Result},
  resource::{MemoryResource, check_alignment},
};

static GLOBAL: DefaultMemoryResource = DefaultMemoryResource { _private: () };

/// Resource backed by the C heap (`posix_memalign` / `free`).
///
/// There is exactly one instance, reachable through
/// [`DefaultMemoryResource::global`]. Allocators built without an explicit
/// resource use it.
#[derive(Debug)]
pub struct DefaultMemoryResource {
  _private: (),
}

impl DefaultMemoryResource {
  pub fn global() -> &'static DefaultMemoryResource {
    &GLOBAL
  }
}

impl MemoryResource for DefaultMemoryResource {
  fn allocate(
    &self,
    bytes: usize,
    alignment: usize,
  ) -> Result<NonNull<u8>> {
    check_alignment(alignment)?;

    // posix_memalign wants a multiple of sizeof(void*) and a non-zero size to
    // hand back a unique pointer.
    let memalign = alignment.max(mem::size_of::<*mut c_void>());
    let size = bytes.max(1);

    let mut address: *mut c_void = std::ptr::null_mut();
    let status = unsafe { libc::posix_memalign(&mut address, memalign, size) };

    if status != 0 {
      return Err(AllocError::out_of_memory(bytes, alignment));
    }

    NonNull::new(address.cast::<u8>()).ok_or_else(|| AllocError::out_of_memory(bytes, alignment))
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

    unsafe { libc::free(address.cast::<c_void>()) };
  }
}
