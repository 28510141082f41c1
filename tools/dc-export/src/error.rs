//! Error types for asset conversion.
//!
//! Every variant describes a problem with one asset (or with the config);
//! the driver turns them into per-asset outcomes instead of aborting a run.

use std::path::{Path, PathBuf};

/// Conversion error
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Width or height is zero, or too large for the container
    #[error("invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Texture carries no pixels at all
    #[error("texture has no pixel data")]
    EmptyPixelData,

    /// Pixel buffer length disagrees with width × height
    #[error("pixel buffer holds {actual} pixels, expected {expected} for {width}x{height}")]
    PixelCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Audio buffer/metadata disagreement
    #[error("audio format mismatch: {0}")]
    FormatMismatch(String),

    /// Flat buffer that can't be split into whole tuples
    #[error("{buffer} buffer length {len} is not a multiple of {group}")]
    MalformedBuffer {
        buffer: &'static str,
        len: usize,
        group: usize,
    },

    /// Triangle index pointing past the vertex buffer
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },

    /// Triangle index that can't be stored as u16
    #[error("index {index} at position {position} does not fit in 16 bits")]
    IndexExceedsU16 { index: u32, position: usize },

    /// Mesh larger than the configured vertex ceiling
    #[error("mesh has {count} vertices, limit is {limit}")]
    VertexLimitExceeded { count: usize, limit: usize },

    /// Asset name that sanitizes to nothing
    #[error("asset name {0:?} does not produce a usable file name")]
    InvalidName(String),

    /// Bundle itself can't be opened or parsed; aborts the run
    #[error("cannot open bundle {path:?}: {reason}")]
    Bundle { path: PathBuf, reason: String },

    /// Bundle entry could not be turned into a decoded asset
    #[error("failed to decode '{name}': {reason}")]
    Decode { name: String, reason: String },

    /// External encoder missing, crashed, or exited non-zero
    #[error("{tool} failed: {reason}")]
    ExternalTool { tool: String, reason: String },

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("WAV error on {path:?}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Marker(#[from] toml::ser::Error),
}

impl ExportError {
    /// Adapter for `map_err` that attaches the offending path to an I/O error
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Adapter for `map_err` that attaches the offending path to a WAV error
    pub fn wav(path: &Path) -> impl FnOnce(hound::Error) -> Self + '_ {
        move |source| Self::Wav {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn decode(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;
