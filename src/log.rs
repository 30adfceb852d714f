//! Logging shim.
//!
//! `defmt` wins when both backends are enabled. With neither enabled the macros
//! evaluate nothing but still type-check their arguments.

#[cfg(feature = "defmt")]
macro_rules! trace { ($($arg:tt)*) => { defmt::trace!($($arg)*) }; }
#[cfg(feature = "defmt")]
macro_rules! debug { ($($arg:tt)*) => { defmt::debug!($($arg)*) }; }
#[cfg(feature = "defmt")]
macro_rules! warn { ($($arg:tt)*) => { defmt::warn!($($arg)*) }; }

#[cfg(all(not(feature = "defmt"), feature = "tracing"))]
macro_rules! trace { ($($arg:tt)*) => { tracing::trace!($($arg)*) }; }
#[cfg(all(not(feature = "defmt"), feature = "tracing"))]
macro_rules! debug { ($($arg:tt)*) => { tracing::debug!($($arg)*) }; }
#[cfg(all(not(feature = "defmt"), feature = "tracing"))]
macro_rules! warn { ($($arg:tt)*) => { tracing::warn!($($arg)*) }; }

#[cfg(all(not(feature = "defmt"), not(feature = "tracing")))]
macro_rules! trace { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
#[cfg(all(not(feature = "defmt"), not(feature = "tracing")))]
macro_rules! debug { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
#[cfg(all(not(feature = "defmt"), not(feature = "tracing")))]
macro_rules! warn { ($($arg:tt)*) => { let _ = ($($arg)*,); }; }
