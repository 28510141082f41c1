//! Decoded asset records
//!
//! These are what a bundle decoder hands to the pipeline: fully decoded,
//! in-memory, and read-only from the encoders' point of view.

use std::fmt;

/// Shader name used when a material doesn't declare one
pub const UNKNOWN_SHADER: &str = "unknown";

/// Asset kind used for dispatch and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Audio,
    Mesh,
    Material,
    /// Anything the pipeline has no encoder for
    Other,
}

impl AssetKind {
    /// Map a bundle kind tag (case-insensitive) to a kind
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "texture" | "texture2d" => Self::Texture,
            "audio" | "audioclip" => Self::Audio,
            "mesh" => Self::Mesh,
            "material" => Self::Material,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Texture => "texture",
            Self::Audio => "audio",
            Self::Mesh => "mesh",
            Self::Material => "material",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// RGB image, row-major, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

/// Interleaved 16-bit PCM
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl DecodedAudio {
    /// Number of sample frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// Indexed triangle mesh with flat attribute buffers
///
/// `vertices` holds xyz triples, `indices` holds triangle corners, `uvs`
/// holds uv pairs. Indices are kept as `u32` so that values the 16-bit
/// container can't hold are caught by validation rather than wrapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedMesh {
    pub name: String,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub uvs: Option<Vec<f32>>,
}

/// Material property value
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    /// Structured value already reduced to text by the decoder
    Opaque(String),
}

/// Material with its shader and property table (source order)
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMaterial {
    pub name: String,
    pub shader: String,
    pub properties: Vec<(String, MaterialValue)>,
}

impl DecodedMaterial {
    /// Create a material, falling back to [`UNKNOWN_SHADER`]
    pub fn new(name: impl Into<String>, shader: Option<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.unwrap_or_else(|| UNKNOWN_SHADER.to_string()),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: MaterialValue) -> Self {
        self.properties.push((key.into(), value));
        self
    }
}

/// One record yielded by a bundle decoder
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedAsset {
    Texture(DecodedTexture),
    Audio(DecodedAudio),
    Mesh(DecodedMesh),
    Material(DecodedMaterial),
    /// Kind the pipeline doesn't convert; carried so it can be reported
    Other { name: String, kind: String },
}

impl DecodedAsset {
    pub fn name(&self) -> &str {
        match self {
            Self::Texture(t) => &t.name,
            Self::Audio(a) => &a.name,
            Self::Mesh(m) => &m.name,
            Self::Material(m) => &m.name,
            Self::Other { name, .. } => name,
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Texture(_) => AssetKind::Texture,
            Self::Audio(_) => AssetKind::Audio,
            Self::Mesh(_) => AssetKind::Mesh,
            Self::Material(_) => AssetKind::Material,
            Self::Other { .. } => AssetKind::Other,
        }
    }
}
