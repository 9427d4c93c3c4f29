use thiserror::Error;

/// Result type for every fallible allocation in this crate.
pub type Result<T> = std::result::Result<T, AllocError>;

/// Failures raised by memory resources.
///
/// Errors propagate unchanged through the allocator and container layers:
/// a vector that fails to grow returns exactly what its resource returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  #[error("out of memory: cannot satisfy {bytes} bytes aligned to {alignment}")]
  OutOfMemory { bytes: usize, alignment: usize },

  #[error("alignment {alignment} is not a power of two")]
  InvalidAlignment { alignment: usize },

  #[error("requested capacity overflows the address space")]
  CapacityOverflow,

  #[error("buffer of {len} bytes is too small once aligned to {alignment}")]
  BufferTooSmall { len: usize, alignment: usize },
}

impl AllocError {
  pub(crate) fn out_of_memory(
    bytes: usize,
    alignment: usize,
  ) -> Self {
    log::debug!("allocation of {bytes} bytes (align {alignment}) failed");
    Self::OutOfMemory { bytes, alignment }
  }
}
