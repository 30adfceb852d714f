//! Fixed-slot ring buffers for no-std embedded targets.
//!
//! # Highlights
//! - Lock-free SPSC byte ring with fixed-size slots and a power-agnostic slot count.
//! - No allocation: storage is co-located ([`Inline`]) or caller-provided ([`Borrowed`]).
//! - Overflow policy, memory ordering and error reporting chosen at the type level.
//! - Optional zero-copy access to slots for DMA and peripherals.
//!
//! # Quick start
//! ```
//! use ph_ring::{Inline, RingBuffer};
//!
//! // 9 one-byte slots, one kept free: capacity 8.
//! let mut ring = RingBuffer::<Inline<9>>::new(Inline::new(), 1);
//! assert_eq!(ring.capacity(), 8);
//!
//! ring.write(&[42]);
//! let mut out = [0u8; 1];
//! ring.read(&mut out);
//! assert_eq!(out, [42]);
//! ```
//!
//! # Two threads
//! ```
//! use ph_ring::config::{Block, Cfg, Contract, Fenced};
//! use ph_ring::{Inline, RingBuffer};
//!
//! let mut ring = RingBuffer::<Inline<64>, Cfg<Fenced, Block, Contract>>::new(Inline::new(), 4);
//! let (mut producer, mut consumer) = ring.split();
//!
//! std::thread::scope(|s| {
//!     s.spawn(move || {
//!         for v in 0u32..100 {
//!             while producer.is_full() {}
//!             producer.write(&v.to_le_bytes());
//!         }
//!     });
//!     s.spawn(move || {
//!         let mut out = [0u8; 4];
//!         for v in 0u32..100 {
//!             while consumer.is_empty() {}
//!             consumer.read(&mut out);
//!             assert_eq!(u32::from_le_bytes(out), v);
//!         }
//!     });
//! });
//! ```
//!
//! # No-std
//! The crate is `#![no_std]`. Tests require `std`.
//!
//! # Safety and concurrency
//! This crate is SPSC by design. Single-thread rings are driven through
//! `&mut self`; shared rings are [`split`](RingBuffer::split) into a
//! [`Producer`] and a [`Consumer`] that each mutate only their own cursor.
//! Nothing ever blocks or spins internally; waiting is up to the caller.
//!
//! # Features
//! - `direct-access` (default): `write_alloc`/`write_enqueue`/`read_dequeue`/`read_free`.
//! - `portable-atomic`: use `portable-atomic` for cursors and fences.
//! - `defmt` / `tracing`: log construction, rejected geometry, drops and overwrites.
#![no_std]

#[macro_use]
mod log;

pub mod config;
pub mod error;
pub mod handles;
pub mod ring;
pub mod storage;

pub use config::{Config, Defaults};
pub use error::GeometryError;
pub use handles::{Consumer, Producer};
pub use ring::{MAX_TOTAL_SIZE, Outcome, RingBuffer};
pub use storage::{Borrowed, Inline, Storage};

mod atomic {
    #[cfg(not(feature = "portable-atomic"))]
    pub(crate) use core::sync::atomic::{AtomicUsize, Ordering, compiler_fence, fence};
    #[cfg(feature = "portable-atomic")]
    pub(crate) use portable_atomic::{AtomicUsize, Ordering, compiler_fence, fence};
}

#[cfg(test)]
extern crate std;
