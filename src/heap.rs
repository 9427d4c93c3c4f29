use std::fmt;

use crate::{
  allocator::{Allocator, PolymorphicAllocator},
  error::Result,
  vector::Vector,
};

/// Strict weak ordering used by [`BinaryHeap`].
pub trait Compare<T> {
  /// `true` if `lhs` must come out of the heap before `rhs`.
  fn less(
    &self,
    lhs: &T,
    rhs: &T,
  ) -> bool;
}

/// Natural order: the smallest element is on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Less;

impl<T: Ord> Compare<T> for Less {
  #[inline]
  fn less(
    &self,
    lhs: &T,
    rhs: &T,
  ) -> bool {
    lhs < rhs
  }
}

/// Reversed order: the largest element is on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Greater;

impl<T: Ord> Compare<T> for Greater {
  #[inline]
  fn less(
    &self,
    lhs: &T,
    rhs: &T,
  ) -> bool {
    lhs > rhs
  }
}

impl<T, F> Compare<T> for F
where
  F: Fn(&T, &T) -> bool,
{
  #[inline]
  fn less(
    &self,
    lhs: &T,
    rhs: &T,
  ) -> bool {
    self(lhs, rhs)
  }
}

#[inline]
const fn parent(index: usize) -> usize {
  (index - 1) / 2
}

#[inline]
const fn left_child(index: usize) -> usize {
  2 * index + 1
}

/// Array-backed binary heap over a [`Vector`].
///
/// The element that compares least under `C` sits at the root. With the
/// default [`Less`] comparator that makes it a min-heap.
pub struct BinaryHeap<T, C = Less, A = PolymorphicAllocator<'static, T>>
where
  C: Compare<T>,
  A: Allocator<T>,
{
  data: Vector<T, A>,
  comparator: C,
}

impl<T: Ord> BinaryHeap<T> {
  pub fn new() -> Self {
    Self::new_in(PolymorphicAllocator::default())
  }
}

impl<T, C, A> BinaryHeap<T, C, A>
where
  C: Compare<T>,
  A: Allocator<T>,
{
  pub fn new_in(allocator: A) -> Self
  where
    C: Default,
  {
    Self::with_comparator_in(C::default(), allocator)
  }

  pub fn with_comparator_in(
    comparator: C,
    allocator: A,
  ) -> Self {
    Self {
      data: Vector::new_in(allocator),
      comparator,
    }
  }

  /// Collects `items` and restores the heap order in linear time.
  pub fn from_iter_in<I>(
    items: I,
    allocator: A,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = T>,
    C: Default,
  {
    let mut heap = Self {
      data: Vector::from_iter_in(items, allocator)?,
      comparator: C::default(),
    };
    heap.heapify();
    Ok(heap)
  }

  pub fn allocator(&self) -> &A {
    self.data.allocator()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn capacity(&self) -> usize {
    self.data.capacity()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Elements in heap order, root first.
  pub fn as_slice(&self) -> &[T] {
    &self.data
  }

  #[track_caller]
  pub fn top(&self) -> &T {
    assert!(!self.is_empty(), "top of an empty heap");
    self.data.front()
  }

  pub fn clear(&mut self) {
    self.data.clear();
  }

  pub fn reserve(
    &mut self,
    capacity: usize,
  ) -> Result<()> {
    self.data.reserve(capacity)
  }

  pub fn push(
    &mut self,
    value: T,
  ) -> Result<()> {
    self.data.push(value)?;
    self.fix_up(self.data.len() - 1);
    Ok(())
  }

  /// Removes the top element and returns it.
  pub fn pop(&mut self) -> Option<T> {
    let last = self.data.len().checked_sub(1)?;
    self.data.as_mut_slice().swap(0, last);
    let top = self.data.pop();
    self.fix_down(0);
    top
  }

  /// Destroys the top element.
  #[track_caller]
  pub fn drop_top(&mut self) {
    assert!(!self.is_empty(), "drop_top on an empty heap");
    let last = self.data.len() - 1;
    self.data.as_mut_slice().swap(0, last);
    self.data.pop_back();
    self.fix_down(0);
  }

  fn heapify(&mut self) {
    let len = self.data.len();
    if len < 2 {
      return;
    }

    for index in (0..=parent(len - 1)).rev() {
      self.fix_down(index);
    }
  }

  fn fix_down(
    &mut self,
    mut index: usize,
  ) {
    let len = self.data.len();
    loop {
      let mut child = left_child(index);
      if child >= len {
        break;
      }

      let right = child + 1;
      if right < len && self.comparator.less(&self.data[right], &self.data[child]) {
        child = right;
      }

      if !self.comparator.less(&self.data[child], &self.data[index]) {
        break;
      }

      self.data.as_mut_slice().swap(child, index);
      index = child;
    }
  }

  fn fix_up(
    &mut self,
    mut index: usize,
  ) {
    while index > 0 {
      let parent = parent(index);
      if !self.comparator.less(&self.data[index], &self.data[parent]) {
        break;
      }

      self.data.as_mut_slice().swap(index, parent);
      index = parent;
    }
  }
}

impl<T, C, A> Default for BinaryHeap<T, C, A>
where
  C: Compare<T> + Default,
  A: Allocator<T> + Default,
{
  fn default() -> Self {
    Self::new_in(A::default())
  }
}

impl<T, C, A> Clone for BinaryHeap<T, C, A>
where
  T: Clone,
  C: Compare<T> + Clone,
  A: Allocator<T>,
{
  fn clone(&self) -> Self {
    Self {
      data: self.data.clone(),
      comparator: self.comparator.clone(),
    }
  }
}

impl<T, C, A> fmt::Debug for BinaryHeap<T, C, A>
where
  T: fmt::Debug,
  C: Compare<T>,
  A: Allocator<T>,
{
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_tuple("BinaryHeap").field(&self.as_slice()).finish()
  }
}
