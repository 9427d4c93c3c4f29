mod common;

use common::{AlignedBuffer, init_logger};
use proptest::prelude::*;
use rresource::{
  Allocator, ArenaMemoryResource, BuddyMemoryResource, DefaultMemoryResource, DoubleExpand, FibonacciExpand,
  GoldenExpand, GrowthStrategy, MemoryResource, PolymorphicAllocator, PoolMemoryResource, ResourceConfig, Vector,
  pool::HEADER_SIZE,
};

#[derive(Debug, Clone)]
enum Op {
  Push(u16),
  Pop,
  Insert(usize, u16),
  InsertN(usize, usize, u16),
  Erase(usize),
  EraseRange(usize, usize),
  Reserve(usize),
  Resize(usize, u16),
  Clear,
}

fn op() -> impl Strategy<Value = Op> {
  prop_oneof![
    4 => any::<u16>().prop_map(Op::Push),
    1 => Just(Op::Pop),
    2 => (any::<usize>(), any::<u16>()).prop_map(|(at, value)| Op::Insert(at, value)),
    1 => (any::<usize>(), 0usize..6, any::<u16>()).prop_map(|(at, count, value)| Op::InsertN(at, count, value)),
    1 => any::<usize>().prop_map(Op::Erase),
    1 => (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Op::EraseRange(from, to)),
    1 => (0usize..64).prop_map(Op::Reserve),
    1 => (0usize..40, any::<u16>()).prop_map(|(len, value)| Op::Resize(len, value)),
    1 => Just(Op::Clear),
  ]
}

/// Applies `op` to both containers. String elements make double drops and
/// leaks visible to the allocator.
fn apply<A: Allocator<String>>(
  vector: &mut Vector<String, A>,
  model: &mut Vec<String>,
  op: &Op,
) {
  match *op {
    Op::Push(value) => {
      vector.push(value.to_string()).unwrap();
      model.push(value.to_string());
    }
    Op::Pop => assert_eq!(vector.pop(), model.pop()),
    Op::Insert(at, value) => {
      let at = at % (model.len() + 1);
      vector.insert(at, value.to_string()).unwrap();
      model.insert(at, value.to_string());
    }
    Op::InsertN(at, count, value) => {
      let at = at % (model.len() + 1);
      vector.insert_n(at, count, &value.to_string()).unwrap();
      model.splice(at..at, std::iter::repeat_n(value.to_string(), count));
    }
    Op::Erase(at) => {
      if !model.is_empty() {
        let at = at % model.len();
        vector.erase(at);
        model.remove(at);
      }
    }
    Op::EraseRange(from, to) => {
      let (from, to) = (from % (model.len() + 1), to % (model.len() + 1));
      let (start, end) = (from.min(to), from.max(to));
      vector.erase_range(start..end);
      model.drain(start..end);
    }
    Op::Reserve(capacity) => {
      vector.reserve(capacity).unwrap();
      assert!(vector.capacity() >= capacity);
    }
    Op::Resize(len, value) => {
      vector.resize(len, value.to_string()).unwrap();
      model.resize(len, value.to_string());
    }
    Op::Clear => {
      vector.clear();
      model.clear();
    }
  }
}

fn request() -> impl Strategy<Value = (usize, usize)> {
  (0usize..256, 0u32..7).prop_map(|(bytes, shift)| (bytes, 1 << shift))
}

proptest! {
  #[test]
  fn test_vector_matches_std_vec(ops in prop::collection::vec(op(), 0..64)) {
    init_logger();

    let mut vector = Vector::<String>::new();
    let mut model = Vec::new();

    for op in &ops {
      apply(&mut vector, &mut model, op);
      prop_assert!(vector.len() <= vector.capacity());
      prop_assert_eq!(vector.as_slice(), model.as_slice());
    }
  }

  #[test]
  fn test_vector_on_buddy_matches_std_vec(ops in prop::collection::vec(op(), 0..64)) {
    let mut buffer = AlignedBuffer::<{ 64 * 1024 }>::new();
    let buddy = BuddyMemoryResource::new(&mut buffer[..]).unwrap();

    {
      let mut vector = <Vector<String, _>>::new_in(PolymorphicAllocator::new(&buddy));
      let mut model = Vec::new();

      for op in &ops {
        apply(&mut vector, &mut model, op);
        prop_assert!(vector.len() <= vector.capacity());
        prop_assert_eq!(vector.as_slice(), model.as_slice());
      }
    }

    // Everything went back and merged.
    prop_assert_eq!(buddy.allocate(buddy.capacity(), 8).unwrap(), buddy.base());
  }

  #[test]
  fn test_alignment_invariant(requests in prop::collection::vec(request(), 1..32)) {
    let configs = [
      ResourceConfig::Arena,
      ResourceConfig::Stack,
      ResourceConfig::Pool { block_size: 256, block_alignment: 64 },
      ResourceConfig::Buddy { alignment: 64 },
    ];

    for config in configs {
      let mut buffer = AlignedBuffer::<8192>::new();
      let resource = config.build(&mut buffer[..]).unwrap();

      for &(bytes, alignment) in &requests {
        if let Ok(address) = resource.allocate(bytes, alignment) {
          prop_assert_eq!(address.as_ptr() as usize % alignment, 0, "{:?}", config);
        }
      }
    }

    let global = DefaultMemoryResource::global();
    for &(bytes, alignment) in &requests {
      let address = global.allocate(bytes, alignment).unwrap();
      prop_assert_eq!(address.as_ptr() as usize % alignment, 0);
      unsafe { global.deallocate(address.as_ptr(), bytes, alignment) };
    }
  }

  #[test]
  fn test_arena_allocations_never_overlap(requests in prop::collection::vec(request(), 1..64)) {
    let mut buffer = [0u8; 2048];
    let arena = ArenaMemoryResource::new(&mut buffer);

    let mut previous_end = 0usize;
    for (bytes, alignment) in requests {
      let used = arena.used();
      match arena.allocate(bytes, alignment) {
        Ok(address) => {
          let address = address.as_ptr() as usize;
          prop_assert!(address >= previous_end);
          previous_end = address + bytes;
        }
        Err(_) => prop_assert_eq!(arena.used(), used),
      }
      prop_assert!(arena.used() <= arena.capacity());
    }
  }

  #[test]
  fn test_buddy_coalesces_after_any_release_order(
    sizes in prop::collection::vec(1usize..600, 1..24),
    keys in prop::collection::vec(any::<u32>(), 24),
  ) {
    let mut buffer = AlignedBuffer::<4096>::new();
    let buddy = BuddyMemoryResource::with_alignment(&mut buffer[..], 64).unwrap();

    let live: Vec<_> = sizes
      .iter()
      .filter_map(|&bytes| buddy.allocate(bytes, 8).ok().map(|address| (address, bytes)))
      .collect();

    let mut order: Vec<usize> = (0..live.len()).collect();
    order.sort_by_key(|&index| keys[index]);

    for index in order {
      let (address, bytes) = live[index];
      unsafe { buddy.deallocate(address.as_ptr(), bytes, 8) };
    }

    prop_assert_eq!(buddy.allocate(buddy.capacity(), 8).unwrap(), buddy.base());
  }

  #[test]
  fn test_pool_bounded_capacity(
    block_size in 1usize..200,
    len in 0usize..4096,
    shift in 0..=size_of::<usize>().trailing_zeros(),
  ) {
    let alignment = 1usize << shift;
    let mut buffer = AlignedBuffer::<4096>::new();
    let pool = PoolMemoryResource::with_alignment(&mut buffer[..len], block_size, alignment).unwrap();

    let mut live = 0;
    while pool.allocate(block_size, alignment).is_ok() {
      live += 1;
    }

    prop_assert_eq!(live, len / (HEADER_SIZE + block_size));
    prop_assert!(pool.allocate(block_size, alignment).is_err());
  }

  #[test]
  fn test_growth_is_strict(capacity in any::<usize>()) {
    fn check<G: GrowthStrategy>(capacity: usize) -> bool {
      let grown = G::default().grow(capacity);
      grown > capacity || (capacity == usize::MAX && grown == usize::MAX)
    }

    prop_assert!(check::<GoldenExpand>(capacity));
    prop_assert!(check::<DoubleExpand>(capacity));
    prop_assert!(check::<FibonacciExpand>(capacity));
  }

  #[test]
  fn test_fibonacci_keeps_growing(steps in 1usize..80) {
    let mut fibonacci = FibonacciExpand::default();
    let mut capacity = 0;
    for _ in 0..steps {
      let next = fibonacci.grow(capacity);
      prop_assert!(next > capacity || next == usize::MAX);
      capacity = next;
    }
  }
}
