//! TOML bundle manifests
//!
//! ```toml
//! [[assets]]
//! kind = "texture"
//! name = "Brick"
//! path = "textures/brick.png"
//!
//! [[assets]]
//! kind = "audio"
//! name = "Hit"
//! path = "hit.raw"
//! sample_rate = 22050
//! channels = 1
//!
//! [[assets]]
//! kind = "mesh"
//! name = "Crate"
//! path = "crate.obj"
//!
//! [[assets]]
//! kind = "material"
//! name = "Brick"
//! shader = "Standard"
//! properties = { _Glossiness = 0.5, _Color = [1.0, 0.5, 0.5, 1.0] }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{AssetDescriptor, BundleDecoder, gltf, obj, wav};
use crate::asset::{
    AssetKind, DecodedAsset, DecodedAudio, DecodedMaterial, DecodedMesh, DecodedTexture,
    MaterialValue,
};
use crate::error::{ExportError, Result};

/// File name looked up when a bundle path is a directory
pub const MANIFEST_FILE_NAME: &str = "bundle.toml";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    assets: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestEntry {
    kind: String,
    name: String,
    path: Option<PathBuf>,

    // Audio
    sample_rate: Option<u32>,
    channels: Option<u16>,
    samples: Option<Vec<i64>>,

    // Mesh
    vertices: Option<Vec<f32>>,
    indices: Option<Vec<i64>>,
    uvs: Option<Vec<f32>>,

    // Material
    shader: Option<String>,
    #[serde(default)]
    properties: toml::Table,
}

/// Bundle described by a `bundle.toml` manifest
#[derive(Debug)]
pub struct ManifestBundle {
    base_dir: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl ManifestBundle {
    /// Open a manifest file, or `bundle.toml` inside a directory
    pub fn open(path: &Path) -> Result<Self> {
        let manifest_path = if path.is_dir() {
            path.join(MANIFEST_FILE_NAME)
        } else {
            path.to_path_buf()
        };

        let content =
            std::fs::read_to_string(&manifest_path).map_err(|e| ExportError::Bundle {
                path: manifest_path.clone(),
                reason: e.to_string(),
            })?;
        let base_dir = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self::parse(&content, base_dir).map_err(|e| match e {
            ExportError::Bundle { reason, .. } => ExportError::Bundle {
                path: manifest_path.clone(),
                reason,
            },
            other => other,
        })
    }

    /// Parse manifest text; relative asset paths resolve against `base_dir`
    pub fn parse(content: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content).map_err(|e| ExportError::Bundle {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Bundle manifest lists {} assets", manifest.assets.len());

        Ok(Self {
            base_dir: base_dir.into(),
            entries: manifest.assets,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn required_path(&self, entry: &ManifestEntry) -> Result<PathBuf> {
        entry
            .path
            .as_deref()
            .map(|p| self.resolve(p))
            .ok_or_else(|| {
                ExportError::decode(&entry.name, format!("{} entry has no path", entry.kind))
            })
    }

    fn decode_texture(&self, entry: &ManifestEntry) -> Result<DecodedTexture> {
        let path = self.required_path(entry)?;
        let image = image::open(&path)
            .map_err(|e| ExportError::decode(&entry.name, format!("{}: {e}", path.display())))?
            .to_rgb8();

        Ok(DecodedTexture {
            name: entry.name.clone(),
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().map(|p| p.0).collect(),
        })
    }

    fn decode_audio(&self, entry: &ManifestEntry) -> Result<DecodedAudio> {
        let channels = entry.channels.unwrap_or(1);

        if let Some(samples) = &entry.samples {
            let sample_rate = self.declared_rate(entry)?;
            let samples = samples
                .iter()
                .map(|&s| {
                    i16::try_from(s).map_err(|_| {
                        ExportError::decode(&entry.name, format!("sample {s} is not 16-bit"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(DecodedAudio {
                name: entry.name.clone(),
                sample_rate,
                channels,
                samples,
            });
        }

        let path = self.required_path(entry)?;
        match extension(&path).as_deref() {
            Some("wav") => wav::read_wav(&entry.name, &path),
            Some("raw" | "pcm") => {
                let sample_rate = self.declared_rate(entry)?;
                let bytes = std::fs::read(&path).map_err(ExportError::io(&path))?;
                wav::read_raw_pcm(&entry.name, &bytes, sample_rate, channels)
            }
            _ => Err(ExportError::decode(
                &entry.name,
                format!("unsupported audio file {}", path.display()),
            )),
        }
    }

    fn declared_rate(&self, entry: &ManifestEntry) -> Result<u32> {
        entry.sample_rate.ok_or_else(|| {
            ExportError::decode(&entry.name, "headerless audio needs a sample_rate")
        })
    }

    fn decode_mesh(&self, entry: &ManifestEntry) -> Result<DecodedMesh> {
        if let Some(vertices) = &entry.vertices {
            let indices = entry
                .indices
                .iter()
                .flatten()
                .map(|&i| {
                    u32::try_from(i).map_err(|_| {
                        ExportError::decode(&entry.name, format!("index {i} is out of range"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(DecodedMesh {
                name: entry.name.clone(),
                vertices: vertices.clone(),
                indices,
                uvs: entry.uvs.clone(),
            });
        }

        let path = self.required_path(entry)?;
        match extension(&path).as_deref() {
            Some("obj") => {
                let source = std::fs::read_to_string(&path).map_err(ExportError::io(&path))?;
                obj::parse_obj(&entry.name, &source)
            }
            Some("gltf" | "glb") => gltf::load_gltf(&entry.name, &path),
            _ => Err(ExportError::decode(
                &entry.name,
                format!("unsupported mesh file {}", path.display()),
            )),
        }
    }

    fn decode_material(&self, entry: &ManifestEntry) -> DecodedMaterial {
        let mut material = DecodedMaterial::new(entry.name.clone(), entry.shader.clone());
        for (key, value) in &entry.properties {
            material = material.with_property(key.clone(), material_value(value));
        }
        material
    }
}

impl BundleDecoder for ManifestBundle {
    fn asset_count(&self) -> usize {
        self.entries.len()
    }

    fn describe(&self, index: usize) -> Option<AssetDescriptor> {
        self.entries.get(index).map(|entry| AssetDescriptor {
            name: entry.name.clone(),
            kind: AssetKind::from_tag(&entry.kind),
        })
    }

    fn decode(&self, index: usize) -> Result<DecodedAsset> {
        let entry = self
            .entries
            .get(index)
            .ok_or_else(|| ExportError::decode(format!("#{index}"), "no such asset"))?;

        Ok(match AssetKind::from_tag(&entry.kind) {
            AssetKind::Texture => DecodedAsset::Texture(self.decode_texture(entry)?),
            AssetKind::Audio => DecodedAsset::Audio(self.decode_audio(entry)?),
            AssetKind::Mesh => DecodedAsset::Mesh(self.decode_mesh(entry)?),
            AssetKind::Material => DecodedAsset::Material(self.decode_material(entry)),
            AssetKind::Other => DecodedAsset::Other {
                name: entry.name.clone(),
                kind: entry.kind.clone(),
            },
        })
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn material_value(value: &toml::Value) -> MaterialValue {
    match value {
        toml::Value::Integer(i) => MaterialValue::Int(*i),
        toml::Value::Float(f) => MaterialValue::Float(*f),
        toml::Value::String(s) => MaterialValue::String(s.clone()),
        toml::Value::Boolean(b) => MaterialValue::Bool(*b),
        toml::Value::Array(_) | toml::Value::Table(_) | toml::Value::Datetime(_) => {
            MaterialValue::Opaque(value.to_string())
        }
    }
}
