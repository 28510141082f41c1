//! Binary serialization trait for fixed-size format headers.

/// Trait for binary-serializable format headers.
///
/// The trait returns `Vec<u8>` because associated consts can't size a return
/// array on stable. Hot paths should call the type-specific `to_bytes()`,
/// which returns a fixed-size array.
///
/// # Example
///
/// ```
/// use dc_common::formats::{BinarySerializable, PvrHeader};
///
/// let header = PvrHeader::new(64, 64);
/// let bytes = header.serialize();
/// let parsed = PvrHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed, header);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::PvrHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}
