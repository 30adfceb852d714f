use thiserror::Error;

/// Why a ring could not be built over the given storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    #[error("element size must be non-zero")]
    ZeroElementSize,

    #[error("total size {total} is not a multiple of element size {element}")]
    NotMultiple { total: usize, element: usize },

    /// One slot is always kept free, so at least two are needed.
    #[error("total size {total} holds fewer than two slots of {element} bytes")]
    TooSmall { total: usize, element: usize },

    #[error("total size {total} exceeds the cursor limit of {max}")]
    TooLarge { total: usize, max: usize },

    #[error("storage holds {available} bytes, {total} requested")]
    StorageTooSmall { total: usize, available: usize },

    #[error("element alignment {align} is not a power of two")]
    InvalidAlignment { align: usize },

    #[error("element size {element} is not a multiple of alignment {align}")]
    ElementMisaligned { element: usize, align: usize },

    #[error("storage base is not aligned to {align} bytes")]
    StorageMisaligned { align: usize },
}
