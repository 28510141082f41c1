//! Pipeline driver
//!
//! Walks a bundle in order, dispatches each asset to its encoder and
//! records one outcome per asset. Nothing that goes wrong with a single
//! asset stops the walk.

use std::path::PathBuf;

use crate::asset::{AssetKind, DecodedAsset};
use crate::audio::AudioEncoder;
use crate::bundle::BundleDecoder;
use crate::config::PipelineConfig;
use crate::error::{ExportError, Result};
use crate::material::MaterialSerializer;
use crate::mesh::MeshEncoder;
use crate::naming::{OutputLayout, output_stem};
use crate::texture::TextureEncoder;
use crate::tools::ExternalTools;

/// How one asset ended up
#[derive(Debug)]
pub enum AssetStatus {
    Succeeded {
        outputs: Vec<PathBuf>,
    },
    /// Output was produced, but at lower fidelity than asked for
    Degraded {
        outputs: Vec<PathBuf>,
        reason: String,
    },
    Failed {
        error: ExportError,
    },
    /// Kind with no encoder
    Skipped {
        reason: String,
    },
}

impl AssetStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn outputs(&self) -> &[PathBuf] {
        match self {
            Self::Succeeded { outputs } | Self::Degraded { outputs, .. } => outputs,
            Self::Failed { .. } | Self::Skipped { .. } => &[],
        }
    }
}

#[derive(Debug)]
pub struct AssetOutcome {
    pub index: usize,
    pub name: String,
    pub kind: AssetKind,
    pub status: AssetStatus,
}

/// Per-asset outcomes of one run, in bundle order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<AssetOutcome>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, AssetStatus::Succeeded { .. }))
    }

    pub fn degraded(&self) -> usize {
        self.count(|s| matches!(s, AssetStatus::Degraded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(AssetStatus::is_failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, AssetStatus::Skipped { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssetOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed())
    }

    fn count(&self, pred: impl Fn(&AssetStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

pub struct PipelineDriver {
    layout: OutputLayout,
    texture: TextureEncoder,
    audio: AudioEncoder,
    mesh: MeshEncoder,
}

impl PipelineDriver {
    pub fn new(
        config: &PipelineConfig,
        tools: &ExternalTools,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self::with_encoders(
            OutputLayout::new(output_root),
            TextureEncoder::new(config.texture.clone(), tools),
            AudioEncoder::new(config.audio.clone(), tools),
            MeshEncoder::new(config.model.clone()),
        )
    }

    pub fn with_encoders(
        layout: OutputLayout,
        texture: TextureEncoder,
        audio: AudioEncoder,
        mesh: MeshEncoder,
    ) -> Self {
        Self {
            layout,
            texture,
            audio,
            mesh,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn run(&self, bundle: &dyn BundleDecoder) -> RunSummary {
        self.run_with_progress(bundle, |_| {})
    }

    /// Run, calling `on_asset` after each asset is finished
    pub fn run_with_progress(
        &self,
        bundle: &dyn BundleDecoder,
        on_asset: impl FnMut(&AssetOutcome),
    ) -> RunSummary {
        tracing::info!(
            "Extracting {} assets to {:?}",
            bundle.asset_count(),
            self.layout.root()
        );
        let summary = walk(bundle, on_asset, |asset| self.process(asset));
        tracing::info!(
            "Done: {} succeeded, {} degraded, {} failed, {} skipped",
            summary.succeeded(),
            summary.degraded(),
            summary.failed(),
            summary.skipped()
        );
        summary
    }

    /// Decode and validate every asset without writing anything
    pub fn check_bundle(
        &self,
        bundle: &dyn BundleDecoder,
        on_asset: impl FnMut(&AssetOutcome),
    ) -> RunSummary {
        walk(bundle, on_asset, |asset| match asset {
            DecodedAsset::Other { kind, .. } => AssetStatus::Skipped {
                reason: format!("no encoder for '{kind}'"),
            },
            _ => match self.check(asset) {
                Ok(()) => AssetStatus::Succeeded {
                    outputs: Vec::new(),
                },
                Err(error) => AssetStatus::Failed { error },
            },
        })
    }

    /// Encode one asset into its kind directory
    pub fn process(&self, asset: &DecodedAsset) -> AssetStatus {
        match self.encode(asset) {
            Ok(status) => status,
            Err(error) => AssetStatus::Failed { error },
        }
    }

    /// Run an asset through its encoder's checks
    pub fn check(&self, asset: &DecodedAsset) -> Result<()> {
        match asset {
            DecodedAsset::Texture(texture) => {
                output_stem(&texture.name)?;
                TextureEncoder::validate(texture)
            }
            DecodedAsset::Audio(audio) => {
                output_stem(&audio.name)?;
                AudioEncoder::validate(audio)
            }
            DecodedAsset::Mesh(mesh) => {
                output_stem(&mesh.name)?;
                self.mesh.validate(mesh).map(drop)
            }
            DecodedAsset::Material(material) => output_stem(&material.name).map(drop),
            DecodedAsset::Other { .. } => Ok(()),
        }
    }

    fn encode(&self, asset: &DecodedAsset) -> Result<AssetStatus> {
        match asset {
            DecodedAsset::Texture(texture) => {
                let stem = output_stem(&texture.name)?;
                let dir = self.layout.ensure_dir(AssetKind::Texture)?;
                let out = self.texture.encode(texture, &dir, &stem)?;
                Ok(AssetStatus::Succeeded { outputs: out.files })
            }
            DecodedAsset::Audio(audio) => {
                let stem = output_stem(&audio.name)?;
                let dir = self.layout.ensure_dir(AssetKind::Audio)?;
                let out = self.audio.encode(audio, &dir, &stem)?;
                Ok(match out.degraded {
                    Some(reason) => AssetStatus::Degraded {
                        outputs: vec![out.path],
                        reason,
                    },
                    None => AssetStatus::Succeeded {
                        outputs: vec![out.path],
                    },
                })
            }
            DecodedAsset::Mesh(mesh) => {
                let stem = output_stem(&mesh.name)?;
                let dir = self.layout.ensure_dir(AssetKind::Mesh)?;
                let out = self.mesh.encode(mesh, &dir, &stem)?;
                Ok(AssetStatus::Succeeded {
                    outputs: out.files(),
                })
            }
            DecodedAsset::Material(material) => {
                let stem = output_stem(&material.name)?;
                let dir = self.layout.ensure_dir(AssetKind::Material)?;
                let path = MaterialSerializer::write(material, &dir, &stem)?;
                Ok(AssetStatus::Succeeded {
                    outputs: vec![path],
                })
            }
            DecodedAsset::Other { name, kind } => {
                tracing::debug!("Skipping {} ({}): no encoder", name, kind);
                Ok(AssetStatus::Skipped {
                    reason: format!("no encoder for '{kind}'"),
                })
            }
        }
    }
}

/// Decode each asset in order and hand it to `handle`
///
/// Decode failures become `Failed` outcomes named from the bundle's
/// descriptor, so they are reported like any other asset failure.
fn walk(
    bundle: &dyn BundleDecoder,
    mut on_asset: impl FnMut(&AssetOutcome),
    mut handle: impl FnMut(&DecodedAsset) -> AssetStatus,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for index in 0..bundle.asset_count() {
        let (name, kind) = match bundle.describe(index) {
            Some(d) => (d.name, d.kind),
            None => (format!("#{index}"), AssetKind::Other),
        };

        let (name, kind, status) = match bundle.decode(index) {
            Ok(asset) => {
                let status = handle(&asset);
                (asset.name().to_string(), asset.kind(), status)
            }
            Err(error) => (name, kind, AssetStatus::Failed { error }),
        };

        match &status {
            AssetStatus::Failed { error } => {
                tracing::error!("Failed to process {} '{}': {}", kind, name, error)
            }
            AssetStatus::Degraded { reason, .. } => {
                tracing::warn!("Degraded {} '{}': {}", kind, name, reason)
            }
            AssetStatus::Succeeded { .. } | AssetStatus::Skipped { .. } => {}
        }

        let outcome = AssetOutcome {
            index,
            name,
            kind,
            status,
        };
        on_asset(&outcome);
        summary.outcomes.push(outcome);
    }

    summary
}
