//! Producer and consumer ends of a split ring.
//!
//! Each end mutates only its own cursor. Both may query the ring geometry at
//! any time; a query from one end sees the other end's cursor as of its last
//! publish.

#[cfg(feature = "direct-access")]
use core::slice;

use crate::config::{Config, Reporting};
use crate::ring::{Outcome, RingBuffer};
use crate::storage::Storage;

/// The writing end. Owns the write cursor.
pub struct Producer<'a, S: Storage, C: Config> {
    ring: &'a RingBuffer<S, C>,
}

impl<'a, S: Storage, C: Config> Producer<'a, S, C> {
    pub(crate) fn new(ring: &'a RingBuffer<S, C>) -> Self {
        Self { ring }
    }

    /// Copy `element` into the next slot and publish it.
    ///
    /// # Panics
    /// If `element.len()` differs from the slot size, or if the ring is full
    /// under [`Block`](crate::config::Block).
    #[inline]
    pub fn write(&mut self, element: &[u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.ring.write_from(true, element) })
    }

    /// # Safety
    /// Under [`Block`](crate::config::Block) the ring must not be full.
    #[inline]
    pub unsafe fn write_unchecked(&mut self, element: &[u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.ring.write_from(false, element) })
    }

    /// The next write slot, for filling in place (e.g. as a DMA target).
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn write_alloc(&mut self) -> &mut [u8] {
        let len = self.ring.element_size();
        unsafe { slice::from_raw_parts_mut(self.ring.alloc_slot(), len) }
    }

    /// Publish the slot returned by [`write_alloc`](Self::write_alloc).
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn write_enqueue(&mut self) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.ring.push_with(true, |_| {}) })
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.ring.used()
    }

    #[inline]
    pub fn unused(&self) -> usize {
        self.ring.unused()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.ring.element_size()
    }
}

/// The reading end. Owns the read cursor.
pub struct Consumer<'a, S: Storage, C: Config> {
    ring: &'a RingBuffer<S, C>,
}

impl<'a, S: Storage, C: Config> Consumer<'a, S, C> {
    pub(crate) fn new(ring: &'a RingBuffer<S, C>) -> Self {
        Self { ring }
    }

    /// Copy the oldest element into `out` and free its slot.
    ///
    /// # Panics
    /// If `out.len()` differs from the slot size, or if the ring is empty
    /// under contract outcomes.
    #[inline]
    pub fn read(&mut self, out: &mut [u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.ring.read_into(true, out) })
    }

    /// # Safety
    /// Under contract outcomes the ring must not be empty.
    #[inline]
    pub unsafe fn read_unchecked(&mut self, out: &mut [u8]) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.ring.read_into(false, out) })
    }

    /// Drop every element published so far.
    #[inline]
    pub fn discard(&mut self) {
        unsafe { self.ring.discard_unread() }
    }

    /// The oldest element, in place. `None` when empty.
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn read_dequeue(&mut self) -> Option<&[u8]> {
        unsafe { self.ring.peek_slot() }
    }

    /// Free the slot returned by [`read_dequeue`](Self::read_dequeue).
    #[cfg(feature = "direct-access")]
    #[inline]
    pub fn read_free(&mut self) -> Outcome<C> {
        <C::Report as Reporting>::outcome(unsafe { self.ring.pop_with(true, |_| {}) })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.ring.used()
    }

    #[inline]
    pub fn unused(&self) -> usize {
        self.ring.unused()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.ring.element_size()
    }
}
