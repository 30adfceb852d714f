//! Backing memory for a ring. The ring never allocates.

use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ptr::NonNull;

/// A fixed byte area the ring partitions into slots.
///
/// # Safety
/// `base()` must point to `size()` bytes that stay valid, writable and
/// unaliased for as long as the implementor is alive, and the address modulo
/// any power of two up to `MAX_ALIGN` must never change (moving the value may
/// change the address only if it preserves that alignment).
pub unsafe trait Storage {
    /// Largest alignment the base address is guaranteed to keep.
    const MAX_ALIGN: usize;

    fn base(&self) -> *mut u8;

    fn size(&self) -> usize;
}

/// Storage co-located with the ring.
#[repr(C, align(16))]
pub struct Inline<const N: usize> {
    bytes: UnsafeCell<[u8; N]>,
}

impl<const N: usize> Inline<N> {
    pub const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; N]),
        }
    }
}

impl<const N: usize> Default for Inline<N> {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl<const N: usize> Storage for Inline<N> {
    const MAX_ALIGN: usize = 16;

    #[inline(always)]
    fn base(&self) -> *mut u8 {
        self.bytes.get().cast()
    }

    #[inline(always)]
    fn size(&self) -> usize {
        N
    }
}

/// Caller-provided storage, e.g. a DMA-visible region.
pub struct Borrowed<'a> {
    ptr: NonNull<u8>,
    len: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

impl<'a> Borrowed<'a> {
    #[inline]
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self {
            len: bytes.len(),
            ptr: NonNull::from(bytes).cast(),
            _marker: PhantomData,
        }
    }
}

impl<'a> From<&'a mut [u8]> for Borrowed<'a> {
    fn from(bytes: &'a mut [u8]) -> Self {
        Self::new(bytes)
    }
}

// Same thread-safety as the `&mut [u8]` it was made from.
unsafe impl Send for Borrowed<'_> {}

unsafe impl Storage for Borrowed<'_> {
    // The address is pinned by the borrow.
    const MAX_ALIGN: usize = usize::MAX;

    #[inline(always)]
    fn base(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline(always)]
    fn size(&self) -> usize {
        self.len
    }
}
