//! # rresource - Polymorphic Memory Resources
//!
//! This crate provides a family of **memory resources** (allocation strategies
//! over raw bytes), a typed **polymorphic allocator** that forwards to any of
//! them at runtime, and a growable **vector** built on top of that allocator.
//!
//! ## Overview
//!
//! A container never talks to memory directly. It owns an allocator value; the
//! allocator borrows a resource; the resource borrows (or is) the memory:
//!
//! ```text
//!   Layering:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │   Vector<T, A, G> / BinaryHeap<T, C, A>                              │
//!   │        │ allocate(count) / construct / destroy / deallocate          │
//!   │        ▼                                                             │
//!   │   PolymorphicAllocator<'r, T>     (Copy, rebindable to any U)        │
//!   │        │ allocate(bytes, alignment) / deallocate(...)                │
//!   │        ▼                                                             │
//!   │   &'r dyn MemoryResource                                             │
//!   │        │                                                             │
//!   │        ├── DefaultMemoryResource   C heap (posix_memalign / free)    │
//!   │        ├── ArenaMemoryResource     bump cursor, no reuse             │
//!   │        ├── StackMemoryResource     bump cursor, LIFO release         │
//!   │        ├── PoolMemoryResource      fixed-size blocks + free list     │
//!   │        └── BuddyMemoryResource     power-of-two split / merge        │
//!   │                 │                                                    │
//!   │                 ▼                                                    │
//!   │           &'a mut [u8]  donated buffer                               │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resource is chosen at runtime and reached through a trait object, so
//! two vectors of the same type can draw from different strategies.
//!
//! ## Crate Structure
//!
//! ```text
//!   rresource
//!   ├── align      - Alignment helpers (align_to!, align_up)
//!   ├── error      - AllocError and Result
//!   ├── block      - Offset free list shared by pool and buddy (internal)
//!   ├── resource   - MemoryResource trait
//!   ├── default    - DefaultMemoryResource (global C heap)
//!   ├── arena      - ArenaMemoryResource / MonotonicMemoryResource
//!   ├── stack      - StackMemoryResource
//!   ├── pool       - PoolMemoryResource
//!   ├── buddy      - BuddyMemoryResource
//!   ├── allocator  - Allocator trait and PolymorphicAllocator
//!   ├── algorithm  - Construction and destruction over raw ranges
//!   ├── growth     - GrowthStrategy and the Golden/Double/Fibonacci policies
//!   ├── vector     - Vector and the vector! macro
//!   ├── heap       - BinaryHeap
//!   └── config     - ResourceConfig (serde)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rresource::{ArenaMemoryResource, PolymorphicAllocator, Vector};
//!
//! let mut buffer = [0u8; 1024];
//! let arena = ArenaMemoryResource::new(&mut buffer);
//!
//! let mut numbers = <Vector<u32, _>>::new_in(PolymorphicAllocator::new(&arena));
//! for i in 0..10 {
//!     numbers.push(i)?;
//! }
//!
//! assert_eq!(numbers.len(), 10);
//! assert!(arena.used() >= 10 * size_of::<u32>());
//! # Ok::<(), rresource::AllocError>(())
//! ```
//!
//! ## How Growth Works
//!
//! ```text
//!   push onto a full vector (GoldenExpand, 4 -> 7):
//!
//!   old  ┌────┬────┬────┬────┐
//!        │ e0 │ e1 │ e2 │ e3 │
//!        └────┴────┴────┴────┘
//!           │ 1. allocate 7 slots (failure: vector untouched)
//!           │ 2. move e0..e3 bitwise
//!           ▼ 3. release old buffer
//!   new  ┌────┬────┬────┬────┬────┬────┬────┐
//!        │ e0 │ e1 │ e2 │ e3 │ e4 │    │    │
//!        └────┴────┴────┴────┴────┴────┴────┘
//! ```
//!
//! ## Features
//!
//! - **Runtime-selected strategies**: every resource is a `dyn MemoryResource`
//! - **Borrowed buffers**: resources work over stack arrays, boxes or mapped memory
//! - **Fallible growth**: allocation failures come back as [`AllocError`]
//! - **Panic safety**: a panicking `Clone` never leaks or double drops
//!
//! ## Limitations
//!
//! - **Single-threaded only**: resources use `Cell`/`RefCell` and are `!Sync`
//! - **No reclamation in arenas**: memory comes back on reset or drop
//! - **Unix-only default resource**: requires `libc` and `posix_memalign`
//!
//! ## Safety
//!
//! Resources hand out raw memory, so `MemoryResource::deallocate` and the
//! construction helpers in [`algorithm`] are `unsafe`. The containers wrap them
//! in safe APIs. Contract violations that can be detected cheaply (releasing
//! a foreign block, out of order stack release, out of range indexing) panic.

pub mod algorithm;
pub mod align;
pub mod allocator;
pub mod arena;
mod block;
pub mod buddy;
pub mod config;
pub mod default;
pub mod error;
pub mod growth;
pub mod heap;
pub mod pool;
pub mod resource;
pub mod stack;
pub mod vector;

pub use align::MAX_ALIGN;
pub use allocator::{Allocator, PolymorphicAllocator};
pub use arena::{ArenaMemoryResource, MonotonicMemoryResource};
pub use buddy::BuddyMemoryResource;
pub use config::ResourceConfig;
pub use default::DefaultMemoryResource;
pub use error::{AllocError, Result};
pub use growth::{DoubleExpand, FibonacciExpand, GoldenExpand, GrowthStrategy};
pub use heap::{BinaryHeap, Compare, Greater, Less};
pub use pool::PoolMemoryResource;
pub use resource::MemoryResource;
pub use stack::StackMemoryResource;
pub use vector::Vector;
