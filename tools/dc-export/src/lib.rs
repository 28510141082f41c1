//! dc-export library
//!
//! Converts decoded scene assets (textures, audio, meshes, materials) into
//! the PVR/ADX/DCM/JSON files the Dreamcast toolchain consumes. The binary
//! wraps this with a manifest-backed bundle and a CLI.

pub mod asset;
pub mod audio;
pub mod bundle;
pub mod config;
pub mod error;
pub mod formats;
pub mod material;
pub mod mesh;
pub mod naming;
pub mod pipeline;
pub mod texture;
pub mod tools;

// Re-export the shared format layer so users don't need dc-common directly
pub use dc_common::{
    DC_FORMAT, DcmMesh, PvrHeader, normalize_dimensions, pack_rgb565, pack_rgb565_pixels,
};

pub use asset::{
    AssetKind, DecodedAsset, DecodedAudio, DecodedMaterial, DecodedMesh, DecodedTexture,
    MaterialValue,
};
pub use audio::{AudioCodec, AudioEncoder, AudioOutput};
pub use bundle::{AssetDescriptor, BundleDecoder, InMemoryBundle, ManifestBundle};
pub use config::PipelineConfig;
pub use error::{ExportError, Result};
pub use material::{MaterialRecord, MaterialSerializer};
pub use mesh::{MeshEncoder, MeshOutput};
pub use pipeline::{AssetOutcome, AssetStatus, PipelineDriver, RunSummary};
pub use texture::{TextureEncoder, TextureOutput};
pub use tools::ExternalTools;
