//! Shared types and utilities for the Dreamcast asset pipeline
//!
//! This crate holds everything that both the exporter (`dc-export`) and any
//! downstream reader need to agree on:
//!
//! - [`formats`] - binary container layouts (`.pvr` textures, `.dcm` meshes)
//!   and output naming conventions
//! - [`packing`] - 5:6:5 pixel packing
//! - [`dimensions`] - power-of-two texture dimension normalization

pub mod dimensions;
pub mod formats;
pub mod packing;

pub use dimensions::{is_power_of_two, next_power_of_two, normalize_dimensions};
pub use formats::{
    AssetFormat, BinarySerializable, DC_FORMAT, DCM_MAGIC, DCM_VERSION, DcmMesh, PVR_MAGIC,
    PvrDataType, PvrHeader, PvrPixelFormat,
};
pub use packing::{pack_rgb565, pack_rgb565_pixels, unpack_rgb565};
