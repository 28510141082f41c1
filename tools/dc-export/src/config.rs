//! Pipeline configuration
//!
//! Loaded once at startup and handed to each encoder by value. Every field
//! has a default, so a config file only needs the keys it changes:
//!
//! ```toml
//! [texture]
//! max_size = 256
//! formats = ["pvr"]
//!
//! [audio]
//! format = "pcm"
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as TOML.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};

/// Largest texture side the 16-bit header and the PowerVR core accept
pub const MAX_TEXTURE_CEILING: u32 = 32768;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub texture: TextureConfig,
    pub audio: AudioConfig,
    pub model: ModelConfig,
}

/// Texture output selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFormat {
    /// Packed RGB565 `.pvr` container
    Pvr,
    /// Vector-quantized variant (marker only until a compressor exists)
    Vq,
}

/// Resampling quality used when retiling to power-of-two sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionQuality {
    #[default]
    High,
    Medium,
    Low,
}

impl CompressionQuality {
    pub fn filter(self) -> FilterType {
        match self {
            Self::High => FilterType::Lanczos3,
            Self::Medium => FilterType::CatmullRom,
            Self::Low => FilterType::Triangle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Power-of-two ceiling for either side
    pub max_size: u32,
    pub formats: Vec<TextureFormat>,
    pub compression_quality: CompressionQuality,
    /// Also write the decoded source image as PNG
    pub keep_source_png: bool,
    /// Hand the packed pixels to `pvr_converter` when it's installed
    pub use_external_converter: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            max_size: 512,
            formats: vec![TextureFormat::Pvr, TextureFormat::Vq],
            compression_quality: CompressionQuality::High,
            keep_source_png: true,
            use_external_converter: true,
        }
    }
}

/// Requested audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Compress with the best available ADPCM encoder
    #[default]
    Adpcm,
    /// Keep uncompressed PCM on purpose
    Pcm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub format: AudioFormat,
    /// Expected rate; sources at other rates are kept as-is
    pub sample_rate: u32,
    /// Expected channel count; sources with other layouts are kept as-is
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            format: AudioFormat::Adpcm,
            sample_rate: 22050,
            channels: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexFormat {
    #[default]
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    #[default]
    Uint16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub vertex_format: VertexFormat,
    pub index_format: IndexFormat,
    pub max_vertices: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vertex_format: VertexFormat::Float,
            index_format: IndexFormat::Uint16,
            max_vertices: 65536,
        }
    }
}

impl PipelineConfig {
    /// Parse a config file (JSON by extension, TOML otherwise)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ExportError::io(path))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ExportError::Config(e.to_string()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ExportError::Config(e.to_string()))
    }

    /// Resolve the config for a run
    ///
    /// - explicit path that can't be read or parsed: warn, use defaults
    /// - no path: try the per-user default location, silently use defaults
    ///   when it doesn't exist
    /// - anything that parses is validated; invalid values are an error
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => match Self::load(path) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config: {}, using defaults", e);
                    Self::default()
                }
            },
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => match Self::load(&path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        config
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config: {}, using defaults", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde can't express
    pub fn validate(&self) -> Result<()> {
        let max = self.texture.max_size;
        if max == 0 || !max.is_power_of_two() || max > MAX_TEXTURE_CEILING {
            return Err(ExportError::Config(format!(
                "texture.max_size must be a power of two between 1 and {MAX_TEXTURE_CEILING}, got {max}"
            )));
        }
        if self.texture.formats.is_empty() {
            return Err(ExportError::Config(
                "texture.formats must list at least one format".to_string(),
            ));
        }
        if self.audio.sample_rate == 0 {
            return Err(ExportError::Config(
                "audio.sample_rate must be positive".to_string(),
            ));
        }
        if self.audio.channels == 0 {
            return Err(ExportError::Config(
                "audio.channels must be positive".to_string(),
            ));
        }
        if self.model.max_vertices == 0 {
            return Err(ExportError::Config(
                "model.max_vertices must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// `<config dir>/pipeline.toml` for the current user, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "dc-export")
        .map(|dirs| dirs.config_dir().join("pipeline.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.texture.max_size, 512);
        assert_eq!(
            config.texture.formats,
            vec![TextureFormat::Pvr, TextureFormat::Vq]
        );
        assert_eq!(config.audio.format, AudioFormat::Adpcm);
        assert_eq!(config.audio.sample_rate, 22050);
        assert_eq!(config.audio.channels, 1);
        assert_eq!(config.model.max_vertices, 65536);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
[texture]
max_size = 256
"#,
        )
        .unwrap();
        assert_eq!(config.texture.max_size, 256);
        assert!(config.texture.keep_source_png);
        assert_eq!(config.texture.formats.len(), 2);
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn test_json_config() {
        let config = PipelineConfig::from_json(
            r#"{ "audio": { "format": "pcm", "sample_rate": 44100 },
                 "texture": { "formats": ["pvr"], "compression_quality": "low" } }"#,
        )
        .unwrap();
        assert_eq!(config.audio.format, AudioFormat::Pcm);
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.audio.channels, 1);
        assert_eq!(config.texture.formats, vec![TextureFormat::Pvr]);
        assert_eq!(config.texture.compression_quality, CompressionQuality::Low);
    }

    #[test]
    fn test_unknown_index_format_is_parse_error() {
        let err = PipelineConfig::from_toml("[model]\nindex_format = \"uint32\"\n");
        assert!(matches!(err, Err(ExportError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_non_power_of_two_ceiling() {
        let mut config = PipelineConfig::default();
        config.texture.max_size = 600;
        assert!(config.validate().is_err());
        config.texture.max_size = 65536;
        assert!(config.validate().is_err());
        config.texture.max_size = 1024;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = PipelineConfig::default();
        config.texture.formats.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("pipeline.json");
        std::fs::write(&json, r#"{"model": {"max_vertices": 300}}"#).unwrap();
        assert_eq!(PipelineConfig::load(&json).unwrap().model.max_vertices, 300);

        let toml_path = dir.path().join("pipeline.toml");
        std::fs::write(&toml_path, "[model]\nmax_vertices = 400\n").unwrap();
        assert_eq!(
            PipelineConfig::load(&toml_path).unwrap().model.max_vertices,
            400
        );
    }

    #[test]
    fn test_resolve_falls_back_on_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert_eq!(
            PipelineConfig::resolve(Some(&path)).unwrap(),
            PipelineConfig::default()
        );
    }

    #[test]
    fn test_resolve_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[texture]\nmax_size = 100\n").unwrap();
        assert!(PipelineConfig::resolve(Some(&path)).is_err());
    }

    #[test]
    fn test_quality_filters() {
        assert_eq!(CompressionQuality::High.filter(), FilterType::Lanczos3);
        assert_eq!(CompressionQuality::Low.filter(), FilterType::Triangle);
    }
}
