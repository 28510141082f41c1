//! 5:6:5 pixel packing
//!
//! The PowerVR RGB565 layout stores red in bits 15-11, green in bits 10-5 and
//! blue in bits 4-0. Low bits of each 8-bit channel are truncated, not rounded.

/// Pack one RGB triple into a 16-bit RGB565 value
///
/// ```
/// use dc_common::pack_rgb565;
///
/// assert_eq!(pack_rgb565([255, 255, 255]), 0xFFFF);
/// assert_eq!(pack_rgb565([248, 0, 0]), 0xF800);
/// ```
#[inline]
pub const fn pack_rgb565(rgb: [u8; 3]) -> u16 {
    let r = (rgb[0] >> 3) as u16;
    let g = (rgb[1] >> 2) as u16;
    let b = (rgb[2] >> 3) as u16;
    (r << 11) | (g << 5) | b
}

/// Expand an RGB565 value back to 8-bit channels
///
/// Dropped low bits come back as zero, so `unpack(pack(c))` only equals `c`
/// for channels that were already multiples of 8 (red/blue) or 4 (green).
#[inline]
pub const fn unpack_rgb565(value: u16) -> [u8; 3] {
    let r = ((value >> 11) & 0x1F) as u8;
    let g = ((value >> 5) & 0x3F) as u8;
    let b = (value & 0x1F) as u8;
    [r << 3, g << 2, b << 3]
}

/// Pack a row-major RGB buffer into RGB565, preserving order
pub fn pack_rgb565_pixels(pixels: &[[u8; 3]]) -> Vec<u16> {
    pixels.iter().map(|&p| pack_rgb565(p)).collect()
}
