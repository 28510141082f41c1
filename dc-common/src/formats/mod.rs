//! Dreamcast binary asset formats
//!
//! Everything is little-endian. Unlike raw GPU dumps, both containers carry a
//! magic so stray files can be told apart when inspecting an output tree.
//!
//! Output naming (directories and extensions) lives in [`AssetFormat`]; use
//! [`DC_FORMAT`] rather than hard-coding strings.
//!
//! Fixed-size headers implement [`BinarySerializable`].

mod asset_format;
pub mod mesh;
mod serialization;
pub mod texture;

pub use asset_format::{AssetFormat, DC_FORMAT};
pub use mesh::*;
pub use serialization::BinarySerializable;
pub use texture::*;
