//! Type-level configuration of a [`RingBuffer`](crate::RingBuffer).
//!
//! Every axis is a zero-sized strategy type, so the unused branches of the
//! write/read paths are folded away at monomorphization time:
//!
//! | axis      | choices                                             |
//! |-----------|-----------------------------------------------------|
//! | threading | [`SingleThread`], [`Fenced`], [`SingleCore`]        |
//! | overflow  | [`Block`], [`DropNewest`], [`Overwrite`]            |
//! | reporting | [`Contract`], [`Reported`]                          |
//!
//! Two combinations are rejected when the ring is constructed:
//! [`Overwrite`] needs [`SingleThread`] (the writer moves the read cursor), and
//! [`Reported`] needs an overflow policy other than [`Block`].

use core::marker::PhantomData;

use crate::atomic::{Ordering, compiler_fence, fence};

mod sealed {
    pub trait Sealed {}
}

/// Memory-ordering discipline between the producer and consumer contexts.
pub trait ThreadMode: sealed::Sealed {
    /// True when producer and consumer may run in different contexts.
    const SHARED: bool;

    /// Issued after loading a cursor and before touching the slots it gates.
    fn acquire();

    /// Issued after touching slots and before publishing a cursor.
    fn release();
}

/// Producer and consumer run on the same thread of control. No ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleThread;

/// Producer and consumer may run on different cores. Every slot access is
/// bracketed by acquire/release fences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fenced;

/// Producer and consumer share one in-order core (e.g. main loop vs. interrupt
/// handler). Only compiler reordering is suppressed.
///
/// **Not portable.** This is unsound across cores with separate caches and on
/// CPUs that reorder loads or stores. It exists for single-core MCUs such as
/// Cortex-M, where a hardware fence is wasted cycles. Handles for this mode
/// can only be obtained through the `unsafe`
/// [`split_single_core`](crate::RingBuffer::split_single_core).
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleCore;

impl sealed::Sealed for SingleThread {}
impl sealed::Sealed for Fenced {}
impl sealed::Sealed for SingleCore {}

impl ThreadMode for SingleThread {
    const SHARED: bool = false;

    #[inline(always)]
    fn acquire() {}

    #[inline(always)]
    fn release() {}
}

impl ThreadMode for Fenced {
    const SHARED: bool = true;

    #[inline(always)]
    fn acquire() {
        fence(Ordering::Acquire);
    }

    #[inline(always)]
    fn release() {
        fence(Ordering::Release);
    }
}

impl ThreadMode for SingleCore {
    const SHARED: bool = true;

    #[inline(always)]
    fn acquire() {
        compiler_fence(Ordering::SeqCst);
    }

    #[inline(always)]
    fn release() {
        compiler_fence(Ordering::SeqCst);
    }
}

/// Modes that may be split safely without an `unsafe` promise.
pub trait Concurrent: ThreadMode {}

impl Concurrent for Fenced {}

/// What a write does when the ring is already full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overflow {
    /// Writing to a full ring is a contract violation.
    Block,
    /// The new element is discarded.
    DropNewest,
    /// The oldest unread element is discarded to make room.
    Overwrite,
}

/// Overflow policy strategy.
pub trait OverflowPolicy: sealed::Sealed {
    const KIND: Overflow;
}

/// Caller must check [`is_full`](crate::RingBuffer::is_full) before writing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Block;

/// Writes to a full ring are silently discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropNewest;

/// Writes to a full ring replace the oldest element. Single thread only.
///
/// ```
/// use ph_ring::config::{Cfg, Contract, Overwrite, SingleThread};
/// use ph_ring::{Inline, RingBuffer};
///
/// let _ring = RingBuffer::<Inline<9>, Cfg<SingleThread, Overwrite, Contract>>::new(Inline::new(), 1);
/// ```
///
/// Any shared mode fails to build:
///
/// ```compile_fail
/// use ph_ring::config::{Cfg, Contract, Fenced, Overwrite};
/// use ph_ring::{Inline, RingBuffer};
///
/// let _ring = RingBuffer::<Inline<9>, Cfg<Fenced, Overwrite, Contract>>::new(Inline::new(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Overwrite;

impl sealed::Sealed for Block {}
impl sealed::Sealed for DropNewest {}
impl sealed::Sealed for Overwrite {}

impl OverflowPolicy for Block {
    const KIND: Overflow = Overflow::Block;
}

impl OverflowPolicy for DropNewest {
    const KIND: Overflow = Overflow::DropNewest;
}

impl OverflowPolicy for Overwrite {
    const KIND: Overflow = Overflow::Overwrite;
}

/// How `write`/`read` tell the caller whether data moved.
pub trait Reporting: sealed::Sealed {
    /// Value returned from `write`, `read`, `write_enqueue` and `read_free`.
    type Outcome: Copy;

    const REPORTED: bool;

    fn outcome(transferred: bool) -> Self::Outcome;
}

/// Operations return `()`. Reading an empty ring or writing a full one under
/// [`Block`] panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contract;

/// Operations return `bool`: `false` when nothing was read, when a write was
/// dropped, or when a write overwrote the oldest element.
///
/// ```
/// use ph_ring::config::{Cfg, DropNewest, Reported, SingleThread};
/// use ph_ring::{Inline, RingBuffer};
///
/// let _ring = RingBuffer::<Inline<9>, Cfg<SingleThread, DropNewest, Reported>>::new(Inline::new(), 1);
/// ```
///
/// [`Block`] has nothing to report and fails to build:
///
/// ```compile_fail
/// use ph_ring::config::{Block, Cfg, Reported, SingleThread};
/// use ph_ring::{Inline, RingBuffer};
///
/// let _ring = RingBuffer::<Inline<9>, Cfg<SingleThread, Block, Reported>>::new(Inline::new(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Reported;

impl sealed::Sealed for Contract {}
impl sealed::Sealed for Reported {}

impl Reporting for Contract {
    type Outcome = ();
    const REPORTED: bool = false;

    #[inline(always)]
    fn outcome(_transferred: bool) {}
}

impl Reporting for Reported {
    type Outcome = bool;
    const REPORTED: bool = true;

    #[inline(always)]
    fn outcome(transferred: bool) -> bool {
        transferred
    }
}

/// Bundle of strategy choices for a ring.
pub trait Config {
    type Mode: ThreadMode;
    type Overflow: OverflowPolicy;
    type Report: Reporting;

    /// Required alignment of each slot, in bytes. Must be a power of two.
    const ELEMENT_ALIGN: usize = 1;
}

/// Ad-hoc [`Config`] built from its three strategy types and the slot
/// alignment `A`.
///
/// ```
/// use ph_ring::config::{Block, Cfg, Contract, DropNewest, Fenced, Reported, SingleThread};
///
/// type Telemetry = Cfg<Fenced, DropNewest, Reported>;
/// type WordSlots = Cfg<SingleThread, Block, Contract, 4>;
/// ```
pub struct Cfg<M = SingleThread, O = Block, R = Contract, const A: usize = 1>(
    PhantomData<(M, O, R)>,
);

impl<M: ThreadMode, O: OverflowPolicy, R: Reporting, const A: usize> Config for Cfg<M, O, R, A> {
    type Mode = M;
    type Overflow = O;
    type Report = R;
    const ELEMENT_ALIGN: usize = A;
}

/// Single thread, blocking overflow, contract reporting.
pub type Defaults = Cfg;

pub(crate) const fn check<C: Config>() {
    assert!(
        !(<C::Mode as ThreadMode>::SHARED
            && matches!(<C::Overflow as OverflowPolicy>::KIND, Overflow::Overwrite)),
        "the Overwrite policy moves the read cursor from the writer and needs SingleThread"
    );
    assert!(
        !(<C::Report as Reporting>::REPORTED
            && matches!(<C::Overflow as OverflowPolicy>::KIND, Overflow::Block)),
        "Reported outcomes need the DropNewest or Overwrite policy"
    );
}
