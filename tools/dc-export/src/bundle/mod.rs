//! Bundle decoders
//!
//! A bundle is a list of named, kind-tagged assets. Opening a bundle is the
//! only step that can fail the whole run; decoding happens one asset at a
//! time so a broken entry only affects itself.

mod gltf;
mod manifest;
mod obj;
mod wav;

pub use manifest::{MANIFEST_FILE_NAME, ManifestBundle};
pub use obj::parse_obj;
pub use wav::{read_raw_pcm, read_wav};

use crate::asset::{AssetKind, DecodedAsset};
use crate::error::{ExportError, Result};

/// Name and kind of an asset, known without decoding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub name: String,
    pub kind: AssetKind,
}

/// Source of decoded assets
pub trait BundleDecoder {
    /// Number of assets in the bundle
    fn asset_count(&self) -> usize;

    /// Cheap metadata for the asset at `index`
    fn describe(&self, index: usize) -> Option<AssetDescriptor>;

    /// Fully decode the asset at `index`
    fn decode(&self, index: usize) -> Result<DecodedAsset>;
}

/// Bundle of already-decoded assets
#[derive(Debug, Clone, Default)]
pub struct InMemoryBundle {
    assets: Vec<DecodedAsset>,
}

impl InMemoryBundle {
    pub fn new(assets: Vec<DecodedAsset>) -> Self {
        Self { assets }
    }

    pub fn push(&mut self, asset: DecodedAsset) {
        self.assets.push(asset);
    }
}

impl From<Vec<DecodedAsset>> for InMemoryBundle {
    fn from(assets: Vec<DecodedAsset>) -> Self {
        Self::new(assets)
    }
}

impl BundleDecoder for InMemoryBundle {
    fn asset_count(&self) -> usize {
        self.assets.len()
    }

    fn describe(&self, index: usize) -> Option<AssetDescriptor> {
        self.assets.get(index).map(|asset| AssetDescriptor {
            name: asset.name().to_string(),
            kind: asset.kind(),
        })
    }

    fn decode(&self, index: usize) -> Result<DecodedAsset> {
        self.assets
            .get(index)
            .cloned()
            .ok_or_else(|| ExportError::decode(format!("#{index}"), "no such asset"))
    }
}
