//! Serializable description of a memory resource.
//!
//! Lets callers pick the allocation strategy from a config file instead of in
//! code:
//!
//! ```json
//! { "kind": "pool", "block_size": 128, "block_alignment": 64 }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
  align::MAX_ALIGN,
  arena::{ArenaMemoryResource, MonotonicMemoryResource},
  buddy::BuddyMemoryResource,
  error::Result,
  pool::PoolMemoryResource,
  resource::{MemoryResource, check_alignment},
  stack::StackMemoryResource,
};

fn default_alignment() -> usize {
  MAX_ALIGN
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceConfig {
  Arena,
  Monotonic,
  Stack,
  Pool {
    /// Largest request a block serves, in bytes.
    block_size: usize,
    #[serde(default = "default_alignment")]
    block_alignment: usize,
  },
  Buddy {
    /// Alignment of the usable region, also the strictest alignment served.
    #[serde(default = "default_alignment")]
    alignment: usize,
  },
}

impl ResourceConfig {
  /// Checks the alignments without building anything.
  pub fn validate(&self) -> Result<()> {
    match *self {
      Self::Arena | Self::Monotonic | Self::Stack => Ok(()),
      Self::Pool { block_alignment, .. } => check_alignment(block_alignment),
      Self::Buddy { alignment } => check_alignment(alignment),
    }
  }

  /// Builds the configured resource over `buffer`.
  pub fn build<'a>(
    &self,
    buffer: &'a mut [u8],
  ) -> Result<Box<dyn MemoryResource + 'a>> {
    self.validate()?;

    let resource: Box<dyn MemoryResource + 'a> = match *self {
      Self::Arena => Box::new(ArenaMemoryResource::new(buffer)),
      Self::Monotonic => Box::new(MonotonicMemoryResource::new(buffer)),
      Self::Stack => Box::new(StackMemoryResource::new(buffer)),
      Self::Pool {
        block_size,
        block_alignment,
      } => Box::new(PoolMemoryResource::with_alignment(buffer, block_size, block_alignment)?),
      Self::Buddy { alignment } => Box::new(BuddyMemoryResource::with_alignment(buffer, alignment)?),
    };

    Ok(resource)
  }
}
