/// Free blocks of a buffer-backed resource, stored as byte offsets from the
/// resource base.
///
/// The list lives outside the donated buffer, so free blocks are never
/// reinterpreted as list nodes. Push and pop are LIFO.
#[derive(Debug, Default, Clone)]
pub(crate) struct FreeList {
  offsets: Vec<usize>,
}

impl FreeList {
  pub(crate) fn new() -> Self {
    Self { offsets: Vec::new() }
  }

  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      offsets: Vec::with_capacity(capacity),
    }
  }

  pub(crate) fn push(
    &mut self,
    offset: usize,
  ) {
    self.offsets.push(offset);
  }

  pub(crate) fn pop(&mut self) -> Option<usize> {
    self.offsets.pop()
  }

  /// Unlinks `offset` if it is free. O(n).
  pub(crate) fn remove(
    &mut self,
    offset: usize,
  ) -> bool {
    match self.offsets.iter().position(|&free| free == offset) {
      Some(index) => {
        self.offsets.swap_remove(index);
        true
      }
      None => false,
    }
  }

  pub(crate) fn contains(
    &self,
    offset: usize,
  ) -> bool {
    self.offsets.contains(&offset)
  }

  pub(crate) fn len(&self) -> usize {
    self.offsets.len()
  }
}
