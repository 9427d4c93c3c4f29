use std::ops::{Deref, DerefMut};

/// Routes `log` output through the test harness. Safe to call from every test.
pub fn init_logger() {
  let _ = env_logger::builder()
    .is_test(true)
    .filter_level(log::LevelFilter::Trace)
    .try_init();
}

/// Heap buffer whose first byte is aligned to 64.
#[repr(C, align(64))]
pub struct AlignedBuffer<const N: usize>([u8; N]);

impl<const N: usize> AlignedBuffer<N> {
  pub fn new() -> Box<Self> {
    Box::new(Self([0; N]))
  }
}

impl<const N: usize> Deref for AlignedBuffer<N> {
  type Target = [u8];

  fn deref(&self) -> &[u8] {
    &self.0
  }
}

impl<const N: usize> DerefMut for AlignedBuffer<N> {
  fn deref_mut(&mut self) -> &mut [u8] {
    &mut self.0
  }
}
