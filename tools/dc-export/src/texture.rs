//! Texture encoder (RGB image -> .pvr)
//!
//! Retiles to power-of-two sides, packs to RGB565 and writes the PVR
//! container. The VQ variant has no compressor yet; asking for it leaves a
//! `.vq.info` marker with `status = "pending"` so tooling can tell a pending
//! texture from a finished one.

use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use dc_common::{DC_FORMAT, normalize_dimensions, pack_rgb565_pixels};
use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};

use crate::asset::DecodedTexture;
use crate::config::{TextureConfig, TextureFormat};
use crate::error::{ExportError, Result};
use crate::formats::{write_pvr_texture, write_rgb565_raw};
use crate::naming::output_file;
use crate::tools::{ExternalTools, clear_target, expect_output, run_tool};

/// Power-of-two RGB565 pixels ready for a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedTexture {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<u16>,
}

/// What a texture encode produced
#[derive(Debug, Clone)]
pub struct TextureOutput {
    pub width: u16,
    pub height: u16,
    /// Whether the source had to be resampled
    pub resized: bool,
    /// Whether a VQ marker was written instead of real VQ data
    pub vq_pending: bool,
    pub files: Vec<PathBuf>,
}

/// Contents of the `.vq.info` marker
#[derive(Debug, Serialize)]
struct VqMarker<'a> {
    format: &'static str,
    status: &'static str,
    source: &'a str,
    width: u16,
    height: u16,
}

pub struct TextureEncoder {
    config: TextureConfig,
    converter: Option<PathBuf>,
}

impl TextureEncoder {
    pub fn new(config: TextureConfig, tools: &ExternalTools) -> Self {
        let converter = if config.use_external_converter {
            tools.pvr_converter.clone()
        } else {
            None
        };
        Self { config, converter }
    }

    /// Check the decoded buffer before doing any work
    pub fn validate(texture: &DecodedTexture) -> Result<()> {
        if texture.width == 0 || texture.height == 0 {
            return Err(ExportError::InvalidDimensions {
                width: texture.width,
                height: texture.height,
            });
        }
        if texture.pixels.is_empty() {
            return Err(ExportError::EmptyPixelData);
        }
        let expected = texture.width as usize * texture.height as usize;
        if texture.pixels.len() != expected {
            return Err(ExportError::PixelCountMismatch {
                width: texture.width,
                height: texture.height,
                expected,
                actual: texture.pixels.len(),
            });
        }
        Ok(())
    }

    /// Resize (if needed) and pack to RGB565, without touching the filesystem
    pub fn pack(&self, texture: &DecodedTexture) -> Result<PackedTexture> {
        Self::validate(texture)?;

        let (width, height) =
            normalize_dimensions(texture.width, texture.height, self.config.max_size);

        let pixels: Cow<'_, [[u8; 3]]> = if (width, height) != (texture.width, texture.height) {
            tracing::debug!(
                "Resizing {}: {}x{} -> {}x{}",
                texture.name,
                texture.width,
                texture.height,
                width,
                height
            );
            Cow::Owned(resize_rgb(
                texture,
                width,
                height,
                self.config.compression_quality.filter(),
            )?)
        } else {
            Cow::Borrowed(&texture.pixels)
        };

        let invalid = || ExportError::InvalidDimensions { width, height };
        Ok(PackedTexture {
            width: u16::try_from(width).map_err(|_| invalid())?,
            height: u16::try_from(height).map_err(|_| invalid())?,
            pixels: pack_rgb565_pixels(&pixels),
        })
    }

    /// Encode into `dir`, naming every artifact `<stem>.<ext>`
    pub fn encode(&self, texture: &DecodedTexture, dir: &Path, stem: &str) -> Result<TextureOutput> {
        let packed = self.pack(texture)?;
        let resized =
            u32::from(packed.width) != texture.width || u32::from(packed.height) != texture.height;

        let mut files = Vec::new();
        let mut vq_pending = false;

        if self.config.keep_source_png {
            let path = output_file(dir, stem, DC_FORMAT.source_image_ext);
            save_source_png(texture, &path)?;
            files.push(path);
        }

        for format in &self.config.formats {
            match format {
                TextureFormat::Pvr => {
                    let path = output_file(dir, stem, DC_FORMAT.texture_ext);
                    self.write_pvr(&packed, dir, stem, &path)?;
                    files.push(path);
                }
                TextureFormat::Vq => {
                    let path = output_file(dir, stem, DC_FORMAT.vq_marker_ext);
                    write_vq_marker(&path, stem, &packed)?;
                    tracing::info!("VQ compression placeholder for: {}", stem);
                    files.push(path);
                    vq_pending = true;
                }
            }
        }

        tracing::info!(
            "Converted texture {}: {}x{} -> {}x{} RGB565",
            stem,
            texture.width,
            texture.height,
            packed.width,
            packed.height
        );

        Ok(TextureOutput {
            width: packed.width,
            height: packed.height,
            resized,
            vq_pending,
            files,
        })
    }

    fn write_pvr(&self, packed: &PackedTexture, dir: &Path, stem: &str, path: &Path) -> Result<()> {
        if let Some(converter) = &self.converter {
            match convert_external(converter, packed, dir, stem, path) {
                Ok(()) => return Ok(()),
                Err(e) => tracing::warn!("{}; writing {:?} in-process", e, path),
            }
        }

        let file = File::create(path).map_err(ExportError::io(path))?;
        let mut writer = BufWriter::new(file);
        write_pvr_texture(&mut writer, packed.width, packed.height, &packed.pixels)
            .and_then(|_| writer.flush())
            .map_err(ExportError::io(path))
    }
}

/// Hand a raw RGB565 dump to `pvr_converter`
fn convert_external(
    converter: &Path,
    packed: &PackedTexture,
    dir: &Path,
    stem: &str,
    output: &Path,
) -> Result<()> {
    clear_target(output)?;

    let raw = output_file(dir, stem, DC_FORMAT.raw_texture_ext);
    let mut bytes = Vec::with_capacity(packed.pixels.len() * 2);
    write_rgb565_raw(&mut bytes, &packed.pixels).map_err(ExportError::io(&raw))?;
    std::fs::write(&raw, &bytes).map_err(ExportError::io(&raw))?;

    let result = run_tool(converter, [raw.as_os_str(), output.as_os_str()])
        .and_then(|()| expect_output(converter, output));

    if let Err(e) = std::fs::remove_file(&raw) {
        tracing::debug!("Could not remove {:?}: {}", raw, e);
    }
    result
}

fn resize_rgb(
    texture: &DecodedTexture,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Vec<[u8; 3]>> {
    let image = to_rgb_image(texture)?;
    let resized = image::imageops::resize(&image, width, height, filter);
    Ok(resized.pixels().map(|p| p.0).collect())
}

fn to_rgb_image(texture: &DecodedTexture) -> Result<RgbImage> {
    let flat: Vec<u8> = texture.pixels.iter().flatten().copied().collect();
    RgbImage::from_raw(texture.width, texture.height, flat).ok_or(ExportError::InvalidDimensions {
        width: texture.width,
        height: texture.height,
    })
}

fn save_source_png(texture: &DecodedTexture, path: &Path) -> Result<()> {
    to_rgb_image(texture)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn write_vq_marker(path: &Path, stem: &str, packed: &PackedTexture) -> Result<()> {
    let marker = VqMarker {
        format: "vq",
        status: "pending",
        source: stem,
        width: packed.width,
        height: packed.height,
    };
    let body = format!(
        "# VQ compressed version of {stem} (no VQ compressor yet)\n{}",
        toml::to_string(&marker)?
    );
    std::fs::write(path, body).map_err(ExportError::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dc_common::PvrHeader;

    fn solid(name: &str, width: u32, height: u32, rgb: [u8; 3]) -> DecodedTexture {
        DecodedTexture {
            name: name.to_string(),
            width,
            height,
            pixels: vec![rgb; (width * height) as usize],
        }
    }

    fn encoder(config: TextureConfig) -> TextureEncoder {
        TextureEncoder::new(config, &ExternalTools::none())
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let tex = solid("t", 0, 4, [0, 0, 0]);
        assert!(matches!(
            TextureEncoder::validate(&tex),
            Err(ExportError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_pixels() {
        let mut tex = solid("t", 2, 2, [0, 0, 0]);
        tex.pixels.clear();
        assert!(matches!(
            TextureEncoder::validate(&tex),
            Err(ExportError::EmptyPixelData)
        ));
    }

    #[test]
    fn test_validate_rejects_short_buffer() {
        let mut tex = solid("t", 2, 2, [0, 0, 0]);
        tex.pixels.pop();
        assert!(matches!(
            TextureEncoder::validate(&tex),
            Err(ExportError::PixelCountMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_pack_power_of_two_is_exact() {
        let tex = DecodedTexture {
            name: "quad".into(),
            width: 2,
            height: 2,
            pixels: vec![[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]],
        };
        let packed = encoder(TextureConfig::default()).pack(&tex).unwrap();
        assert_eq!((packed.width, packed.height), (2, 2));
        assert_eq!(packed.pixels, vec![0xF800, 0x07E0, 0x001F, 0xFFFF]);
    }

    #[test]
    fn test_pack_resizes_to_power_of_two() {
        let tex = solid("odd", 3, 5, [128, 64, 32]);
        let packed = encoder(TextureConfig::default()).pack(&tex).unwrap();
        assert_eq!((packed.width, packed.height), (4, 8));
        assert_eq!(packed.pixels.len(), 32);
    }

    #[test]
    fn test_pack_clamps_to_ceiling() {
        let config = TextureConfig {
            max_size: 16,
            ..TextureConfig::default()
        };
        let tex = solid("big", 40, 9, [10, 10, 10]);
        let packed = encoder(config).pack(&tex).unwrap();
        assert_eq!((packed.width, packed.height), (16, 16));
    }

    #[test]
    fn test_encode_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let tex = solid("brick", 4, 4, [200, 100, 50]);
        let out = encoder(TextureConfig::default())
            .encode(&tex, dir.path(), "brick")
            .unwrap();

        assert!(!out.resized);
        assert!(out.vq_pending);
        assert_eq!(out.files.len(), 3);

        let pvr = std::fs::read(dir.path().join("brick.pvr")).unwrap();
        let header = PvrHeader::from_bytes(&pvr).unwrap();
        assert_eq!((header.width, header.height), (4, 4));
        assert_eq!(pvr.len(), PvrHeader::SIZE + header.data_size());

        let marker = std::fs::read_to_string(dir.path().join("brick.vq.info")).unwrap();
        assert!(marker.contains("status = \"pending\""));
        assert!(marker.contains("source = \"brick\""));

        let png = image::open(dir.path().join("brick.png")).unwrap();
        assert_eq!((png.width(), png.height()), (4, 4));
    }

    #[test]
    fn test_encode_pvr_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = TextureConfig {
            formats: vec![TextureFormat::Pvr],
            keep_source_png: false,
            ..TextureConfig::default()
        };
        let out = encoder(config)
            .encode(&solid("plain", 8, 8, [1, 2, 3]), dir.path(), "plain")
            .unwrap();
        assert!(!out.vq_pending);
        assert_eq!(out.files, vec![dir.path().join("plain.pvr")]);
        assert!(!dir.path().join("plain.vq.info").exists());
    }

    #[test]
    fn test_encode_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let tex = DecodedTexture {
            name: "gradient".into(),
            width: 5,
            height: 3,
            pixels: (0..15u8).map(|i| [i * 17, 255 - i * 17, i * 3]).collect(),
        };
        let enc = encoder(TextureConfig::default());
        let path = dir.path().join("gradient.pvr");

        enc.encode(&tex, dir.path(), "gradient").unwrap();
        let first = std::fs::read(&path).unwrap();
        enc.encode(&tex, dir.path(), "gradient").unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_disabled_converter_is_ignored() {
        let tools = ExternalTools {
            pvr_converter: Some(PathBuf::from("/nonexistent/pvr_converter")),
            ..ExternalTools::none()
        };
        let config = TextureConfig {
            use_external_converter: false,
            ..TextureConfig::default()
        };
        assert!(TextureEncoder::new(config, &tools).converter.is_none());
    }

    #[test]
    fn test_broken_converter_falls_back_in_process() {
        let dir = tempfile::tempdir().unwrap();
        let tools = ExternalTools {
            pvr_converter: Some(PathBuf::from("/nonexistent/pvr_converter")),
            ..ExternalTools::none()
        };
        let config = TextureConfig {
            formats: vec![TextureFormat::Pvr],
            keep_source_png: false,
            ..TextureConfig::default()
        };
        TextureEncoder::new(config, &tools)
            .encode(&solid("fallback", 2, 2, [9, 9, 9]), dir.path(), "fallback")
            .unwrap();

        assert!(dir.path().join("fallback.pvr").exists());
        assert!(!dir.path().join("fallback.raw").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_converter_falls_back_in_process() {
        let dir = tempfile::tempdir().unwrap();
        // Leftover from an earlier run must not be mistaken for converter output
        std::fs::write(dir.path().join("quiet.pvr"), b"stale").unwrap();

        let tools = ExternalTools {
            pvr_converter: Some(PathBuf::from("/bin/true")),
            ..ExternalTools::none()
        };
        let config = TextureConfig {
            formats: vec![TextureFormat::Pvr],
            keep_source_png: false,
            ..TextureConfig::default()
        };
        let out = TextureEncoder::new(config, &tools)
            .encode(&solid("quiet", 2, 2, [9, 9, 9]), dir.path(), "quiet")
            .unwrap();

        for path in &out.files {
            assert!(path.exists(), "{path:?} reported but missing");
        }
        let bytes = std::fs::read(dir.path().join("quiet.pvr")).unwrap();
        let header = PvrHeader::from_bytes(&bytes).unwrap();
        assert_eq!((header.width, header.height), (2, 2));
        assert_eq!(bytes.len(), PvrHeader::SIZE + 2 * 2 * 2);
        assert!(!dir.path().join("quiet.raw").exists());
    }
}
