//! PVR texture container (.pvr)
//!
//! Uncompressed, non-twiddled RGB565 texture for the PowerVR2 core.
//!
//! # Layout
//! ```text
//! 0x00: magic "PVRV" (4 bytes)
//! 0x04: header_size u32 (bytes following this field, always 8)
//! 0x08: width u16
//! 0x0A: height u16
//! 0x0C: pixel_format u8 (0x01 = RGB565)
//! 0x0D: data_type u8 (0x01 = rectangular, row-major)
//! 0x0E: padding (2 bytes)
//! 0x10: pixel_data (width × height × 2 bytes, row-major, LE)
//! ```

/// Magic bytes at the start of every `.pvr` file
pub const PVR_MAGIC: &[u8; 4] = b"PVRV";

/// Pixel format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PvrPixelFormat {
    /// 16-bit 5:6:5, no alpha
    Rgb565 = 0x01,
}

impl PvrPixelFormat {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Rgb565),
            _ => None,
        }
    }

    /// Bytes per pixel in the payload
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb565 => 2,
        }
    }
}

/// Data type tag (texel arrangement)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PvrDataType {
    /// Plain row-major rectangle
    Rectangle = 0x01,
}

impl PvrDataType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Rectangle),
            _ => None,
        }
    }
}

/// PVR header (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvrHeader {
    pub width: u16,
    pub height: u16,
    pub pixel_format: PvrPixelFormat,
    pub data_type: PvrDataType,
}

impl PvrHeader {
    pub const SIZE: usize = 16;

    /// Value of the header-size field: everything after it up to the pixels
    pub const HEADER_SIZE_FIELD: u32 = 8;

    /// RGB565 rectangle header
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixel_format: PvrPixelFormat::Rgb565,
            data_type: PvrDataType::Rectangle,
        }
    }

    /// Size of the pixel payload that must follow the header
    pub fn data_size(&self) -> usize {
        self.width as usize * self.height as usize * self.pixel_format.bytes_per_pixel()
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(PVR_MAGIC);
        bytes[4..8].copy_from_slice(&Self::HEADER_SIZE_FIELD.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.width.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.height.to_le_bytes());
        bytes[12] = self.pixel_format as u8;
        bytes[13] = self.data_type as u8;
        // padding bytes stay 0
        bytes
    }

    /// Read header from bytes
    ///
    /// Returns `None` on short input, wrong magic, or unknown tags.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE || &bytes[0..4] != PVR_MAGIC {
            return None;
        }
        let header_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if header_size != Self::HEADER_SIZE_FIELD {
            return None;
        }
        Some(Self {
            width: u16::from_le_bytes([bytes[8], bytes[9]]),
            height: u16::from_le_bytes([bytes[10], bytes[11]]),
            pixel_format: PvrPixelFormat::from_u8(bytes[12])?,
            data_type: PvrDataType::from_u8(bytes[13])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert_eq!(PvrHeader::SIZE, 16);
        assert_eq!(PvrHeader::new(8, 8).to_bytes().len(), PvrHeader::SIZE);
    }

    #[test]
    fn test_header_layout() {
        let bytes = PvrHeader::new(64, 32).to_bytes();
        assert_eq!(
            bytes,
            [
                b'P', b'V', b'R', b'V', // magic
                0x08, 0x00, 0x00, 0x00, // header size
                0x40, 0x00, // width = 64
                0x20, 0x00, // height = 32
                0x01, // RGB565
                0x01, // rectangle
                0x00, 0x00, // padding
            ]
        );
    }

    #[test]
    fn test_header_parsing() {
        let header = PvrHeader::from_bytes(&PvrHeader::new(128, 256).to_bytes()).unwrap();
        assert_eq!(header.width, 128);
        assert_eq!(header.height, 256);
        assert_eq!(header.pixel_format, PvrPixelFormat::Rgb565);
        assert_eq!(header.data_type, PvrDataType::Rectangle);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = PvrHeader::new(4, 4).to_bytes();
        bytes[0] = b'X';
        assert!(PvrHeader::from_bytes(&bytes).is_none());
    }

    #[test]
    fn test_rejects_unknown_pixel_format() {
        let mut bytes = PvrHeader::new(4, 4).to_bytes();
        bytes[12] = 0x07;
        assert!(PvrHeader::from_bytes(&bytes).is_none());
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(PvrHeader::from_bytes(&[0; 15]).is_none());
    }

    #[test]
    fn test_data_size() {
        assert_eq!(PvrHeader::new(64, 64).data_size(), 64 * 64 * 2);
    }
}
