//! Power-of-two dimension normalization
//!
//! The PowerVR texture unit only samples textures whose sides are powers of
//! two, so every texture is retiled to the smallest power of two that covers
//! each axis, capped at a configurable ceiling.

/// Smallest power of two greater than or equal to `value`.
///
/// `0` and `1` both map to `1` (2^0). Values above 2^31 saturate at 2^31.
#[inline]
pub const fn next_power_of_two(value: u32) -> u32 {
    match value.checked_next_power_of_two() {
        Some(p) => p,
        None => 1 << 31,
    }
}

/// Check whether `value` is a non-zero power of two
#[inline]
pub const fn is_power_of_two(value: u32) -> bool {
    value.is_power_of_two()
}

/// Compute target texture dimensions
///
/// Each axis is rounded up to the next power of two and then clamped to
/// `ceiling`. Axes are handled independently, so a 100×3 image with a 512
/// ceiling becomes 128×4.
///
/// `ceiling` is expected to be a power of two itself; the pipeline config
/// rejects anything else before an encoder ever sees it.
#[inline]
pub const fn normalize_dimensions(width: u32, height: u32, ceiling: u32) -> (u32, u32) {
    let w = next_power_of_two(width);
    let h = next_power_of_two(height);
    (
        if w > ceiling { ceiling } else { w },
        if h > ceiling { ceiling } else { h },
    )
}
