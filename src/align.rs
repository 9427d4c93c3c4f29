use std::alloc::Layout;

/// Alignment used when the caller does not ask for one, matching the
/// strictest fundamental alignment on 64 bit targets.
pub const MAX_ALIGN: usize = 16;

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two, and the sum must not overflow. Use
/// [`align_up`] when either is not guaranteed.
///
/// # Examples
///
/// ```rust
/// use rresource::align_to;
///
/// assert_eq!(align_to!(13, 8), 16);
/// assert_eq!(align_to!(16, 8), 16);
/// assert_eq!(align_to!(0, 64), 0);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    ($value + $alignment - 1) & !($alignment - 1)
  };
}

/// Checked version of [`align_to!`]. Returns `None` on overflow.
#[inline]
pub const fn align_up(
  value: usize,
  alignment: usize,
) -> Option<usize> {
  debug_assert!(alignment.is_power_of_two());
  match value.checked_add(alignment - 1) {
    Some(bumped) => Some(bumped & !(alignment - 1)),
    None => None,
  }
}

#[inline]
pub const fn is_aligned(
  address: usize,
  alignment: usize,
) -> bool {
  address & (alignment - 1) == 0
}

#[inline]
pub const fn is_valid_alignment(alignment: usize) -> bool {
  alignment.is_power_of_two()
}

/// Finds room for a header followed by an aligned block.
///
/// The window is `[base + offset, base + len)` where `base` is an absolute
/// address. The block is aligned to `max(alignment, header.align())` and the
/// header sits immediately before it. Returns the block offset relative to
/// `base`, or `None` if the block does not fit.
///
/// ```text
///   offset           padding    header       block
///     │ ◄──────────────────► │ ◄──────► │ ◄──────────► │
///     ▼                      ▼          ▼              ▼
///   ──┬──────────────────────┬──────────┬──────────────┬──
///     │        unused        │  header  │  bytes       │
///   ──┴──────────────────────┴──────────┴──────────────┴──
/// ```
pub fn align_with_header(
  base: usize,
  offset: usize,
  len: usize,
  header: Layout,
  bytes: usize,
  alignment: usize,
) -> Option<usize> {
  let alignment = alignment.max(header.align());
  let after_header = base.checked_add(offset)?.checked_add(header.size())?;
  let block = align_up(after_header, alignment)?;
  let end = block.checked_add(bytes)?;

  if end > base.checked_add(len)? {
    return None;
  }

  Some(block - base)
}
