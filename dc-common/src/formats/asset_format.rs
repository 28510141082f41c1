//! Output naming conventions for converted assets.
//!
//! Single source of truth for the subdirectory and file extension of every
//! artifact the exporter writes.
//!
//! ```
//! use dc_common::DC_FORMAT;
//!
//! assert_eq!(DC_FORMAT.texture_ext, "pvr");
//! assert_eq!(DC_FORMAT.mesh_dir, "models");
//! ```

/// Directory and extension table for one target platform.
#[derive(Debug, Clone, Copy)]
pub struct AssetFormat {
    /// Subdirectory for textures (e.g., "textures")
    pub texture_dir: &'static str,
    /// Subdirectory for audio clips
    pub audio_dir: &'static str,
    /// Subdirectory for meshes
    pub mesh_dir: &'static str,
    /// Subdirectory for materials
    pub material_dir: &'static str,

    /// Packed texture container (e.g., "pvr")
    pub texture_ext: &'static str,
    /// Marker left behind for the pending VQ-compressed texture
    pub vq_marker_ext: &'static str,
    /// Decoded source image kept next to the container
    pub source_image_ext: &'static str,
    /// Intermediate raw RGB565 dump handed to an external converter
    pub raw_texture_ext: &'static str,

    /// ADPCM audio produced by adxtool
    pub adx_ext: &'static str,
    /// IMA ADPCM in a WAV header, produced by sox
    pub ima_wav_ext: &'static str,
    /// Uncompressed 16-bit PCM WAV
    pub pcm_wav_ext: &'static str,

    /// Binary mesh container
    pub mesh_ext: &'static str,
    /// Human-readable reference mesh
    pub reference_mesh_ext: &'static str,

    /// Structured material record
    pub material_ext: &'static str,
}

/// Dreamcast output layout.
pub const DC_FORMAT: AssetFormat = AssetFormat {
    texture_dir: "textures",
    audio_dir: "audio",
    mesh_dir: "models",
    material_dir: "materials",

    texture_ext: "pvr",
    vq_marker_ext: "vq.info",
    source_image_ext: "png",
    raw_texture_ext: "raw",

    adx_ext: "adx",
    ima_wav_ext: "ima.wav",
    pcm_wav_ext: "wav",

    mesh_ext: "dcm",
    reference_mesh_ext: "obj",

    material_ext: "json",
};
