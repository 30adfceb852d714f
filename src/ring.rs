//! Lock-free SPSC ring of fixed-size byte slots.
//!
//! # Overview
//! - Storage of `total_size` bytes is split into `total_size / element_size` slots.
//! - Two byte-offset cursors: `wp` (next slot to write) and `rp` (next slot to read).
//! - Empty when `rp == wp`; full when advancing `wp` by one slot would hit `rp`.
//!   One slot is therefore always free and `capacity() == slots - 1`.
//! - `wp` is only ever stored by the producer, `rp` only by the consumer (the
//!   [`Overwrite`](crate::config::Overwrite) policy excepted, which is why it is
//!   restricted to [`SingleThread`]). No compare-and-swap is needed.
//! - The slot at `wp` is never readable, so the producer may fill it while the
//!   consumer reads any other slot.
//!
//! # Memory ordering
//! Cursors are loaded relaxed and followed by the mode's acquire step before
//! any slot is touched. Slot accesses are followed by the mode's release step
//! before the owning cursor is stored. Under [`Fenced`](crate::config::Fenced)
//! these are real fences, so a payload becomes visible no later than the cursor
//! publishing it, and a slot is not reused before the other side is done with it.
//!
//! # Slot layout
//! Slot `i` occupies bytes `[i * element_size, (i + 1) * element_size)` of the
//! storage base, which matters when a peripheral reads or writes the slots.

use core::fmt;
use core::marker::PhantomData;
use core::ptr;
#[cfg(feature = "direct-access")]
use core::slice;

use crossbeam_utils::CachePadded;

use crate::atomic::{AtomicUsize, Ordering};
use crate::config::{
    self, Concurrent, Config, Defaults, Overflow, OverflowPolicy, Reporting, SingleCore,
    SingleThread, ThreadMode,
};
use crate::error::GeometryError;
use crate::handles::{Consumer, Producer};
use crate::storage::Storage;

/// Upper bound on `total_size`; keeps `total_size + cursor` from overflowing.
pub const MAX_TOTAL_SIZE: usize = usize::MAX / 2;

/// Return type of the transferring operations under config `C`.
pub type Outcome<C> = <<C as Config>::Report as Reporting>::Outcome;

/// Fixed-capacity ring of `element_size`-byte slots over caller-sized storage.
pub struct RingBuffer<S: Storage, C: Config = Defaults> {
    total_size: usize,
    element_size: usize,
    // Each cursor on its own cache line; the two ends store to different ones.
    wp: CachePadded<AtomicUsize>,
    rp: CachePadded<AtomicUsize>,
    storage: S,
    _config: PhantomData<fn() -> C>,
}

// Slots are only reached through the single-owner protocol below; the
// shared-reference API is read-only geometry.
unsafe impl<S: Storage + Send, C: Config> Sync for RingBuffer<S, C> {}

fn validate<S: Storage>(
    storage: &S,
    total: usize,
    element: usize,
    align: usize,
) -> Result<(), GeometryError> {
    if element == 0 {
        return Err(GeometryError::ZeroElementSize);
    }
    if !align.is_power_of_two() {
        return Err(GeometryError::InvalidAlignment { align });
    }
    if element % align != 0 {
        return Err(GeometryError::ElementMisaligned { element, align });
    }
    if align > S::MAX_ALIGN || storage.base().addr() % align != 0 {
        return Err(GeometryError::StorageMisaligned { align });
    }
    if total % element != 0 {
        return Err(GeometryError::NotMultiple { total, element });
    }
    if total / element < 2 {
        return Err(GeometryError::TooSmall { total, element });
    }
    if total > MAX_TOTAL_SIZE {
        return Err(GeometryError::TooLarge {
            total,
            max: MAX_TOTAL_SIZE,
        });
    }
    if total > storage.size() {
        return Err(GeometryError::StorageTooSmall {
            total,
            available: storage.size(),
        });
    }
    Ok(())
}

impl<S: Storage, C: Config> RingBuffer<S, C> {
    /// Build a ring spanning all of `storage`.
    pub fn try_new(storage: S, element_size: usize) -> Result<Self, GeometryError> {
        let total_size = storage.size();
        Self::try_with_size(storage, total_size, element_size)
    }

    /// Build a ring over the first `total_size` bytes of `storage`.
    pub fn try_with_size(
        storage: S,
        total_size: usize,
        element_size: usize,
    ) -> Result<Self, GeometryError> {
        const { config::check::<C>() };

        if let Err(err) = validate(&storage, total_size, element_size, C::ELEMENT_ALIGN) {
            warn!("rejected ring geometry: {}", err);
            return Err(err);
        }

        debug!(
            "ring ready: {} bytes, {}-byte slots, capacity {}",
            total_size,
            element_size,
            total_size / element_size - 1
        );

        Ok(Self {
            total_size,
            element_size,
            wp: CachePadded::new(AtomicUsize::new(0)),
            rp: CachePadded::new(AtomicUsize::new(0)),
            storage,
            _config: PhantomData,
        })
    }

    /// Like [`try_new`](Self::try_new).
    ///
    /// # Panics
    /// If the geometry is invalid.
    pub fn new(storage: S, element_size: usize) -> Self {
        match Self::try_new(storage, element_size) {
            Ok(ring) => ring,
            Err(err) => panic!("invalid ring geometry: {err}"),
        }
    }

    /// Like [`try_with_size`](Self::try_with_size).
    ///
    /// # Panics
    /// If the geometry is invalid.
    pub fn with_size(storage: S, total_size: usize, element_size: usize) -> Self {
        match Self::try_with_size(storage, total_size, element_size) {
            Ok(ring) => ring,
            Err(err) => panic!("invalid ring geometry: {err}"),
        }
    }

    #[inline]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Maximum number of elements the ring holds at once.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.total_size / self.element_size - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        let (rp, wp) = self.snapshot();
        rp == wp
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        let (rp, wp) = self.snapshot();
        self.advance(wp) == rp
    }

    /// Number of stored elements.
    #[inline]
    pub fn used(&self) -> usize {
        let (rp, wp) = self.snapshot();
        self.used_between(rp, wp)
    }

    /// Number of free slots; `used() + unused() == capacity()`.
    #[inline]
    pub fn unused(&self) -> usize {
        let (rp, wp) = self.snapshot();
        ((self.total_size - self.element_size + rp - wp) % self.total_size) / self.element_size
    }

    #[inline(always)]
    fn snapshot(&self) -> (usize, usize) {
        let rp = self.rp.load(Ordering::Relaxed);
        let wp = self.wp.load(Ordering::Relaxed);
        <C::Mode as ThreadMode>::acquire();
        (rp, wp)
    }

    #[inline(always)]
    fn used_between(&self, rp: usize, wp: usize) -> usize {
        ((self.total_size + wp - rp) % self.total_size) / self.element_size
    }

    #[inline(always)]
    fn advance(&self, cursor: usize) -> usize {
        let next = cursor + self.element_size;
        if next == self.total_size { 0 } else { next }
    }

    #[inline(always)]
    fn slot(&self, cursor: usize) -> *mut u8 {
        // `cursor < total_size <= storage.size()`.
        unsafe { self.storage.base().add(cursor) }
    }

    #[inline(always)]
    fn check_len(&self, len: usize) {
        assert_eq!(
            len, self.element_size,
            "element length must equal the slot size"
        );
    }

    /// Fill the slot at `wp` and publish it, applying the overflow policy.
    /// Returns false when the element was dropped or displaced the oldest one.
    ///
    /// # Safety
    /// Only the producer may call this. With `checked == false` under
    /// [`Block`](crate::config::Block) the ring must not be full.
    #[inline(always)]
    pub(crate) unsafe fn push_with(&self, checked: bool, fill: impl FnOnce(*mut u8)) -> bool {
        let wp = self.wp.load(Ordering::Relaxed);
        let rp = self.rp.load(Ordering::Relaxed);
        <C::Mode as ThreadMode>::acquire();

        let next = self.advance(wp);
        let full = next == rp;
        if full {
            match <C::Overflow as OverflowPolicy>::KIND {
                Overflow::Block => {
                    if checked || cfg!(debug_assertions) {
                        panic!("write to a full ring buffer");
                    }
                }
                Overflow::DropNewest => {
                    trace!("ring full, dropped newest element");
                    return false;
                }
                Overflow::Overwrite => {}
            }
        }

        fill(self.slot(wp));
        <C::Mode as ThreadMode>::release();
        self.wp.store(next, Ordering::Relaxed);

        if full && matches!(<C::Overflow as OverflowPolicy>::KIND, Overflow::Overwrite) {
            // The reserved slot is gone; give up the oldest element instead.
            self.rp.store(self.advance(rp), Ordering::Relaxed);
            trace!("ring full, overwrote oldest element");
            return false;
        }
        true
    }

    /// Drain the slot at `rp` and release it.
    /// Returns false only for an empty ring under reported outcomes.
    ///
    /// # Safety
    /// Only the consumer may call this. With `checked == false` under
    /// contract outcomes the ring must not be empty.
    #[inline(always)]
    pub(crate) unsafe fn pop_with(&self, checked: bool, drain: impl FnOnce(*const u8)) -> bool {
        let rp = self.rp.load(Ordering::Relaxed);
        let wp = self.wp.load(Ordering::Relaxed);
        <C::Mode as ThreadMode>::acquire();

        if rp == wp {
            if <C::Report as Reporting>::REPORTED {
                return false;
            }
            if checked || cfg!(debug_assertions) {
                panic!("read from an empty ring buffer");
            }
        }

        drain(self.slot(rp));
        <C::Mode as ThreadMode>::release();
        self.rp.store(self.advance(rp), Ordering::Relaxed);
        true
    }

    /// # Safety
    /// Only the producer may call this.
    #[inline]
    pub(crate) unsafe fn write_from(&self, checked: bool, element: &[u8]) -> bool {
        self.check_len(element.len());
        let len = self.element_size;
        unsafe {
            self.push_with(checked, |slot| {
                ptr::copy_nonoverlapping(element.as_ptr(), slot, len)
            })
        }
    }

    /// # Safety
    /// Only the consumer may call this.
    #[inline]
    pub(crate) unsafe fn read_into(&self, checked: bool, out: &mut [u8]) -> bool {
        self.check_len(out.len());
        let len = self.element_size;
        unsafe {
            self.pop_with(checked, |slot| {
                ptr::copy_nonoverlapping(slot, out.as_mut_ptr(), len)
            })
        }
    }

    /// The slot at `wp`, `element_size` bytes long. It is never readable, so
    /// filling it cannot overlap with the consumer.
    ///
    /// # Safety
    /// Only the producer may call this, and any slice made from the pointer
    /// must be dropped before the next producer operation.
    #[cfg(feature = "direct-access")]
    #[inline]
    pub(crate) unsafe fn alloc_slot(&self) -> *mut u8 {
        let wp = self.wp.load(Ordering::Relaxed);
        let rp = self.rp.load(Ordering::Relaxed);
        <C::Mode as ThreadMode>::acquire();
        if matches!(<C::Overflow as OverflowPolicy>::KIND, Overflow::Block) {
            assert!(self.advance(wp) != rp, "write_alloc on a full ring buffer");
        }
        self.slot(wp)
    }

    /// # Safety
    /// Only the consumer may call this, and the returned slice must be dropped
    /// before the next consumer operation.
    #[cfg(feature = "direct-access")]
    #[inline]
    pub(crate) unsafe fn peek_slot(&self) -> Option<&[u8]> {
        let (rp, wp) = self.snapshot();
        if rp == wp {
            return None;
        }
        Some(unsafe { slice::from_raw_parts(self.slot(rp), self.element_size) })
    }

    /// # Safety
    /// Only the consumer may call this.
    #[inline]
    pub(crate) unsafe fn discard_unread(&self) {
        let (rp, wp) = self.snapshot();
        <C::Mode as ThreadMode>::release();
        self.rp.store(wp, Ordering::Relaxed);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        let _ = rp;
        #[cfg(any(feature = "defmt", feature = "tracing"))]
        {
            let dropped = self.used_between(rp, wp);
            if dropped > 0 {
                debug!("discarded {} unread elements", dropped);
            }
        }
    }
}

/// Both ends on one thread of control; exclusivity comes from `&mut self`.
impl<S: Storage, C: Config<Mode = SingleThread>> RingBuffer<S, C> {
    /// Copy `element` into the next slot.
    ///
    /// # Panics
    /// If `element.len() != element_size()`, or if the ring is full under
    /// [`Block`](crate::config::Block).
    #[inline]
    pub fn write(&mut self, element: &[u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.write_from(true, element) })
    }

    /// [`write`](Self::write) without the fullness check of the
    /// [`Block`](crate::config::Block) policy (debug-asserted only).
    ///
    /// # Safety
    /// Under `Block` the ring must not be full.
    #[inline]
    pub unsafe fn write_unchecked(&mut self, element: &[u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.write_from(false, element) })
    }

    /// Copy the oldest element into `out` and free its slot.
    ///
    /// # Panics
    /// If `out.len() != element_size()`, or if the ring is empty under
    /// contract outcomes. Under reported outcomes an empty ring returns
    /// `false` and leaves `out` untouched.
    #[inline]
    pub fn read(&mut self, out: &mut [u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.read_into(true, out) })
    }

    /// [`read`](Self::read) without the emptiness check (debug-asserted only).
    ///
    /// # Safety
    /// Under contract outcomes the ring must not be empty.
    #[inline]
    pub unsafe fn read_unchecked(&mut self, out: &mut [u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.read_into(false, out) })
    }

    /// Drop every unread element.
    #[inline]
    pub fn discard(&mut self) {
        unsafe { self.discard_unread() }
    }

    /// The next write slot, for filling in place. Nothing is published until
    /// [`write_enqueue`](Self::write_enqueue).
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn write_alloc(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.alloc_slot(), self.element_size) }
    }

    /// Publish the slot returned by [`write_alloc`](Self::write_alloc), with
    /// the same overflow handling as [`write`](Self::write).
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn write_enqueue(&mut self) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.push_with(true, |_| {}) })
    }

    /// The oldest element, in place. `None` when empty.
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn read_dequeue(&mut self) -> Option<&[u8]> {
        unsafe { self.peek_slot() }
    }

    /// Free the slot returned by [`read_dequeue`](Self::read_dequeue).
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn read_free(&mut self) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.pop_with(true, |_| {}) })
    }
}

impl<S: Storage, C: Config> RingBuffer<S, C>
where
    C::Mode: Concurrent,
{
    /// Split into the producer and consumer ends.
    ///
    /// The handles borrow the ring, so no other access is possible while they
    /// live, and each end only mutates its own cursor.
    pub fn split(&mut self) -> (Producer<'_, S, C>, Consumer<'_, S, C>) {
        let ring: &Self = self;
        (Producer::new(ring), Consumer::new(ring))
    }
}

impl<S: Storage, C: Config<Mode = SingleCore>> RingBuffer<S, C> {
    /// Split into the producer and consumer ends for ordering-only operation.
    ///
    /// # Safety
    /// Both handles must only ever run on the same in-order core (typically
    /// one in the main loop and one in an interrupt handler). Moving either
    /// handle to another core, or running on a CPU that reorders memory
    /// accesses, is undefined behavior.
    pub unsafe fn split_single_core(&mut self) -> (Producer<'_, S, C>, Consumer<'_, S, C>) {
        let ring: &Self = self;
        (Producer::new(ring), Consumer::new(ring))
    }
}

impl<S: Storage, C: Config> fmt::Debug for RingBuffer<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("total_size", &self.total_size)
            .field("element_size", &self.element_size)
            .field("wp", &self.wp.load(Ordering::Relaxed))
            .field("rp", &self.rp.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Block, Cfg, Contract, DropNewest, Overwrite, Reported};
    use crate::storage::{Borrowed, Inline};
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    type DropCfg = Cfg<SingleThread, DropNewest, Contract>;
    type DropReported = Cfg<SingleThread, DropNewest, Reported>;
    type OverwriteCfg = Cfg<SingleThread, Overwrite, Contract>;
    type OverwriteReported = Cfg<SingleThread, Overwrite, Reported>;

    type Aligned4 = Cfg<SingleThread, Block, Contract, 4>;

    fn byte_ring<C: Config>() -> RingBuffer<Inline<9>, C> {
        RingBuffer::new(Inline::new(), 1)
    }

    fn read_byte<C: Config<Mode = SingleThread>>(ring: &mut RingBuffer<Inline<9>, C>) -> u8 {
        let mut out = [0u8; 1];
        ring.read(&mut out);
        out[0]
    }

    #[test]
    fn fresh_ring_is_empty_for_many_geometries() {
        for (total, element) in [(2, 1), (9, 1), (64, 8), (60, 12), (4096, 4)] {
            let mut backing = [0u8; 4096];
            let ring: RingBuffer<Borrowed<'_>> =
                RingBuffer::with_size(Borrowed::new(&mut backing), total, element);
            assert!(ring.is_empty());
            assert!(!ring.is_full());
            assert_eq!(ring.used(), 0);
            assert_eq!(ring.unused(), total / element - 1);
            assert_eq!(ring.capacity(), total / element - 1);
        }
    }

    #[test]
    fn rejects_invalid_geometry() {
        let err = RingBuffer::<Inline<10>>::try_new(Inline::new(), 3).unwrap_err();
        assert_eq!(err, GeometryError::NotMultiple { total: 10, element: 3 });

        let err = RingBuffer::<Inline<8>>::try_new(Inline::new(), 8).unwrap_err();
        assert_eq!(err, GeometryError::TooSmall { total: 8, element: 8 });

        let err = RingBuffer::<Inline<8>>::try_new(Inline::new(), 0).unwrap_err();
        assert_eq!(err, GeometryError::ZeroElementSize);

        let err = RingBuffer::<Inline<8>>::try_with_size(Inline::new(), 16, 4).unwrap_err();
        assert_eq!(err, GeometryError::StorageTooSmall { total: 16, available: 8 });

        let err = RingBuffer::<Inline<0>>::try_new(Inline::new(), 1).unwrap_err();
        assert_eq!(err, GeometryError::TooSmall { total: 0, element: 1 });
    }

    #[test]
    fn rejects_sizes_beyond_the_cursor_limit() {
        let mut backing = [0u8; 4];
        let err = RingBuffer::<Borrowed<'_>>::try_with_size(
            Borrowed::new(&mut backing),
            MAX_TOTAL_SIZE + 1,
            1,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GeometryError::TooLarge {
                total: MAX_TOTAL_SIZE + 1,
                max: MAX_TOTAL_SIZE
            }
        );
    }

    #[test]
    fn enforces_element_alignment() {
        let err = RingBuffer::<Inline<12>, Aligned4>::try_new(Inline::new(), 6).unwrap_err();
        assert_eq!(err, GeometryError::ElementMisaligned { element: 6, align: 4 });

        #[repr(C, align(4))]
        struct Backing([u8; 17]);
        let mut backing = Backing([0; 17]);
        let err = RingBuffer::<Borrowed<'_>, Aligned4>::try_new(
            Borrowed::new(&mut backing.0[1..]),
            4,
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::StorageMisaligned { align: 4 });

        let ring = RingBuffer::<Borrowed<'_>, Aligned4>::try_new(
            Borrowed::new(&mut backing.0[..16]),
            4,
        )
        .unwrap();
        assert_eq!(ring.capacity(), 3);
    }

    #[test]
    #[should_panic(expected = "invalid ring geometry")]
    fn new_panics_on_invalid_geometry() {
        let _ = RingBuffer::<Inline<10>>::new(Inline::new(), 4);
    }

    #[test]
    fn round_trips_multi_byte_elements() {
        let mut ring = RingBuffer::<Inline<48>>::new(Inline::new(), 12);
        let element = *b"hello, ring!";
        ring.write(&element);
        assert_eq!(ring.used(), 1);

        let mut out = [0u8; 12];
        ring.read(&mut out);
        assert_eq!(out, element);
        assert!(ring.is_empty());
    }

    #[test]
    fn keeps_fifo_order_across_wraps() {
        let mut ring = RingBuffer::<Inline<20>>::new(Inline::new(), 4);
        let mut next_write = 0u32;
        let mut next_read = 0u32;

        for burst in [3, 4, 1, 2, 4, 3] {
            for _ in 0..burst {
                ring.write(&next_write.to_le_bytes());
                next_write += 1;
                assert_eq!(ring.used() + ring.unused(), ring.capacity());
            }
            while !ring.is_empty() {
                let mut out = [0u8; 4];
                ring.read(&mut out);
                assert_eq!(u32::from_le_bytes(out), next_read);
                next_read += 1;
                assert_eq!(ring.used() + ring.unused(), ring.capacity());
            }
        }
        assert_eq!(next_read, next_write);
    }

    #[test]
    fn repeated_fill_and_drain_cycles() {
        let mut ring = RingBuffer::<Inline<9>, DropReported>::new(Inline::new(), 1);
        let cap = ring.capacity();
        let mut write = 1u8;
        let mut read = 1u8;

        for _ in 0..200 {
            for _ in 0..cap {
                assert!(ring.write(&[write]));
                write = write.wrapping_add(1);
            }
            assert!(ring.is_full());
            for _ in 0..cap {
                let mut out = [0u8];
                assert!(ring.read(&mut out));
                assert_eq!(out[0], read);
                read = read.wrapping_add(1);
            }
            assert!(!ring.read(&mut [0u8]));

            assert!(ring.write(&[write]));
            write = write.wrapping_add(1);
            let mut out = [0u8];
            assert!(ring.read(&mut out));
            assert_eq!(out[0], read);
            read = read.wrapping_add(1);
        }
    }

    #[test]
    fn drop_policy_discards_the_newest() {
        let mut ring = byte_ring::<DropCfg>();
        for v in 0..8 {
            ring.write(&[v]);
        }
        assert!(ring.is_full());

        ring.write(&[8]);
        assert_eq!(ring.used(), 8);
        for v in 0..8 {
            assert_eq!(read_byte(&mut ring), v);
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn drop_policy_reports_the_drop() {
        let mut ring = byte_ring::<DropReported>();
        for v in 0..8 {
            assert!(ring.write(&[v]));
        }
        assert!(!ring.write(&[8]));
        assert_eq!(ring.used(), 8);
    }

    #[test]
    fn overwrite_policy_replaces_the_oldest() {
        let mut ring = byte_ring::<OverwriteCfg>();
        for v in 0..8 {
            ring.write(&[v]);
        }
        ring.write(&[8]);
        assert!(ring.is_full());
        assert_eq!(ring.used(), 8);

        for v in 1..=8 {
            assert_eq!(read_byte(&mut ring), v);
        }
        assert!(ring.is_empty());
    }

    #[test]
    fn overwrite_policy_reports_the_loss() {
        let mut ring = byte_ring::<OverwriteReported>();
        for v in 0..8 {
            assert!(ring.write(&[v]));
        }
        assert!(!ring.write(&[8]));
        assert!(!ring.write(&[9]));
        assert_eq!(ring.used(), 8);
        assert_eq!(read_byte(&mut ring), 2);
    }

    #[test]
    fn reported_read_on_empty_leaves_output_alone() {
        let mut ring = byte_ring::<DropReported>();
        let mut out = [0xAA];
        assert!(!ring.read(&mut out));
        assert_eq!(out, [0xAA]);
        assert!(ring.is_empty());
    }

    #[test]
    #[should_panic(expected = "write to a full ring buffer")]
    fn block_policy_panics_on_full_write() {
        let mut ring = byte_ring::<Defaults>();
        for v in 0..9 {
            ring.write(&[v]);
        }
    }

    #[test]
    #[should_panic(expected = "read from an empty ring buffer")]
    fn contract_read_panics_on_empty() {
        let mut ring = byte_ring::<Defaults>();
        ring.read(&mut [0u8]);
    }

    #[test]
    #[should_panic(expected = "element length must equal the slot size")]
    fn rejects_short_elements() {
        let mut ring = RingBuffer::<Inline<16>>::new(Inline::new(), 4);
        ring.write(&[1, 2]);
    }

    #[test]
    fn unchecked_paths_move_data_like_checked_ones() {
        let mut ring = RingBuffer::<Inline<16>>::new(Inline::new(), 4);
        unsafe { ring.write_unchecked(&7u32.to_le_bytes()) };
        let mut out = [0u8; 4];
        unsafe { ring.read_unchecked(&mut out) };
        assert_eq!(u32::from_le_bytes(out), 7);
        assert!(ring.is_empty());
    }

    #[test]
    fn discard_drops_unread_elements() {
        let mut ring = byte_ring::<Defaults>();
        for v in 0..5 {
            ring.write(&[v]);
        }
        ring.discard();
        assert!(ring.is_empty());
        assert_eq!(ring.unused(), 8);

        ring.write(&[42]);
        assert_eq!(read_byte(&mut ring), 42);
    }

    #[test]
    fn slots_sit_at_fixed_stride() {
        let mut backing = [0u8; 12];
        {
            let mut ring = RingBuffer::<Borrowed<'_>>::new(Borrowed::new(&mut backing), 4);
            ring.write(&[1, 1, 1, 1]);
            ring.write(&[2, 2, 2, 2]);
        }
        assert_eq!(backing, [1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0]);
    }

    #[cfg(feature = "direct-access")]
    #[test]
    fn two_phase_access_avoids_the_copy() {
        let mut ring = RingBuffer::<Inline<16>>::new(Inline::new(), 4);

        ring.write_alloc().copy_from_slice(&[9, 8, 7, 6]);
        assert!(ring.is_empty());
        ring.write_enqueue();
        assert_eq!(ring.used(), 1);

        assert_eq!(ring.read_dequeue(), Some(&[9, 8, 7, 6][..]));
        assert_eq!(ring.used(), 1);
        ring.read_free();
        assert!(ring.is_empty());
        assert_eq!(ring.read_dequeue(), None);
    }

    #[cfg(feature = "direct-access")]
    #[test]
    fn two_phase_access_follows_the_overflow_policy() {
        let mut ring = byte_ring::<DropReported>();
        for v in 0..8 {
            ring.write_alloc()[0] = v;
            assert!(ring.write_enqueue());
        }
        ring.write_alloc()[0] = 8;
        assert!(!ring.write_enqueue());
        assert_eq!(ring.read_dequeue(), Some(&[0][..]));

        let mut ring = byte_ring::<OverwriteReported>();
        for v in 0..9 {
            ring.write_alloc()[0] = v;
            ring.write_enqueue();
        }
        assert_eq!(ring.used(), 8);
        assert_eq!(ring.read_dequeue(), Some(&[1][..]));
        assert!(ring.read_free());

        ring.discard();
        assert!(!ring.read_free());
    }

    #[cfg(feature = "direct-access")]
    #[test]
    #[should_panic(expected = "write_alloc on a full ring buffer")]
    fn block_policy_refuses_alloc_when_full() {
        let mut ring = byte_ring::<Defaults>();
        for v in 0..8 {
            ring.write(&[v]);
        }
        let _ = ring.write_alloc();
    }

    #[test]
    fn debug_shows_geometry_and_cursors() {
        let mut ring = byte_ring::<Defaults>();
        ring.write(&[1]);
        let text = std::format!("{ring:?}");
        assert!(text.contains("total_size: 9"));
        assert!(text.contains("wp: 1"));
        assert!(text.contains("rp: 0"));
    }

    #[test]
    fn cursors_sit_on_separate_cache_lines() {
        type Ring = RingBuffer<Inline<9>, Defaults>;
        let wp = core::mem::offset_of!(Ring, wp);
        let rp = core::mem::offset_of!(Ring, rp);
        assert!(wp.abs_diff(rp) >= core::mem::align_of::<CachePadded<AtomicUsize>>());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Write(u8),
        Read,
        Discard,
    }

    fn ops() -> impl Strategy<Value = Vec<Op>> {
        prop::collection::vec(
            prop_oneof![
                3 => any::<u8>().prop_map(Op::Write),
                2 => Just(Op::Read),
                1 => Just(Op::Discard),
            ],
            1..300,
        )
    }

    proptest! {
        #[test]
        fn drop_policy_matches_a_bounded_queue(ops in ops()) {
            let mut ring = RingBuffer::<Inline<8>, DropReported>::new(Inline::new(), 1);
            let cap = ring.capacity();
            let mut model = VecDeque::with_capacity(cap);

            for op in ops {
                match op {
                    Op::Write(v) => {
                        let stored = ring.write(&[v]);
                        prop_assert_eq!(stored, model.len() < cap);
                        if stored {
                            model.push_back(v);
                        }
                    }
                    Op::Read => {
                        let mut out = [0u8];
                        let got = ring.read(&mut out);
                        prop_assert_eq!(got.then_some(out[0]), model.pop_front());
                    }
                    Op::Discard => {
                        ring.discard();
                        model.clear();
                    }
                }
                prop_assert_eq!(ring.used(), model.len());
                prop_assert_eq!(ring.used() + ring.unused(), cap);
                prop_assert_eq!(ring.is_empty(), model.is_empty());
                prop_assert_eq!(ring.is_full(), model.len() == cap);
            }
        }

        #[test]
        fn overwrite_policy_matches_a_sliding_window(ops in ops()) {
            let mut ring = RingBuffer::<Inline<8>, OverwriteReported>::new(Inline::new(), 1);
            let cap = ring.capacity();
            let mut model = VecDeque::with_capacity(cap);

            for op in ops {
                match op {
                    Op::Write(v) => {
                        let displaced = model.len() == cap;
                        if displaced {
                            model.pop_front();
                        }
                        model.push_back(v);
                        prop_assert_eq!(ring.write(&[v]), !displaced);
                    }
                    Op::Read => {
                        let mut out = [0u8];
                        let got = ring.read(&mut out);
                        prop_assert_eq!(got.then_some(out[0]), model.pop_front());
                    }
                    Op::Discard => {
                        ring.discard();
                        model.clear();
                    }
                }
                prop_assert_eq!(ring.used(), model.len());
                prop_assert_eq!(ring.used() + ring.unused(), cap);
            }
        }
    }
}
