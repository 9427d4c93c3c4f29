//! Capacity growth policies for [`Vector`](crate::vector::Vector).
//!
//! A strategy maps the current capacity to the next one. Every strategy
//! returns a value strictly greater than its input for any
//! `capacity < usize::MAX` and saturates at `usize::MAX`. The `+ 1` terms keep
//! an empty vector from staying at zero.

/// Policy choosing the next capacity when a vector runs out of room.
pub trait GrowthStrategy: Default + Clone {
  fn grow(
    &mut self,
    capacity: usize,
  ) -> usize;
}

/// `capacity + capacity / 2 + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoldenExpand;

impl GrowthStrategy for GoldenExpand {
  #[inline]
  fn grow(
    &mut self,
    capacity: usize,
  ) -> usize {
    capacity.saturating_add(capacity / 2).saturating_add(1)
  }
}

/// `capacity * 2 + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleExpand;

impl GrowthStrategy for DoubleExpand {
  #[inline]
  fn grow(
    &mut self,
    capacity: usize,
  ) -> usize {
    capacity.saturating_mul(2).saturating_add(1)
  }
}

/// Walks the Fibonacci sequence up to the first term above the capacity.
///
/// The position in the sequence is kept between calls, so a vector that keeps
/// growing only pays for the terms it skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FibonacciExpand {
  previous: usize,
  current: usize,
}

impl Default for FibonacciExpand {
  fn default() -> Self {
    Self {
      previous: 0,
      current: 1,
    }
  }
}

impl GrowthStrategy for FibonacciExpand {
  fn grow(
    &mut self,
    capacity: usize,
  ) -> usize {
    loop {
      let Some(next) = self.previous.checked_add(self.current) else {
        return usize::MAX;
      };
      self.previous = self.current;
      self.current = next;

      if self.current > capacity {
        return self.current;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn assert_grows<G: GrowthStrategy>() {
    let mut strategy = G::default();
    for capacity in (0..1000).chain([4096, 1 << 20, usize::MAX / 3, usize::MAX - 1]) {
      assert!(strategy.grow(capacity) > capacity, "stuck at {capacity}");
    }
    assert_eq!(strategy.grow(usize::MAX), usize::MAX);
  }

  #[test]
  fn test_strict_growth() {
    assert_grows::<GoldenExpand>();
    assert_grows::<DoubleExpand>();
    assert_grows::<FibonacciExpand>();
  }

  #[test]
  fn test_golden() {
    let mut golden = GoldenExpand;
    assert_eq!(golden.grow(0), 1);
    assert_eq!(golden.grow(1), 2);
    assert_eq!(golden.grow(2), 4);
    assert_eq!(golden.grow(5), 8);
    assert_eq!(golden.grow(100), 151);
  }

  #[test]
  fn test_double() {
    let mut double = DoubleExpand;
    assert_eq!(double.grow(0), 1);
    assert_eq!(double.grow(1), 3);
    assert_eq!(double.grow(7), 15);
  }

  #[test]
  fn test_fibonacci_sequence() {
    let mut fibonacci = FibonacciExpand::default();

    let mut capacity = 0;
    let mut seen = Vec::new();
    for _ in 0..8 {
      capacity = fibonacci.grow(capacity);
      seen.push(capacity);
    }

    assert_eq!(seen, [1, 2, 3, 5, 8, 13, 21, 34]);
  }

  #[test]
  fn test_fibonacci_skips_terms() {
    let mut fibonacci = FibonacciExpand::default();
    assert_eq!(fibonacci.grow(50), 55);
    assert_eq!(fibonacci.grow(55), 89);
  }
}
