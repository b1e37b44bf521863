//! Utility functions.

/// Aligns an offset or size up to the next multiple of `align`.
/// `align` must be a power of two.
pub fn align_up(offset: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (offset + align - 1) & !(align - 1)
}
