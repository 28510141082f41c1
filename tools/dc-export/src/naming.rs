//! Output file naming and directory layout.

use std::path::{Path, PathBuf};

use dc_common::DC_FORMAT;

use crate::asset::AssetKind;
use crate::error::{ExportError, Result};

/// Characters that aren't allowed in file names on at least one target OS
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Sanitize an asset name for use as a file stem
///
/// Invalid characters become `_`, then surrounding whitespace is trimmed.
/// Two names that sanitize to the same stem overwrite each other.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect();
    replaced.trim().to_string()
}

/// Sanitize, rejecting names that end up empty
pub fn output_stem(name: &str) -> Result<String> {
    let stem = sanitize_filename(name);
    if stem.is_empty() {
        return Err(ExportError::InvalidName(name.to_string()));
    }
    Ok(stem)
}

/// `<dir>/<stem>.<ext>`
pub fn output_file(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    dir.join(format!("{stem}.{ext}"))
}

/// Kind-specific subdirectories under a user-supplied output root
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Subdirectory for a kind (`None` for kinds that produce nothing)
    pub fn dir_for(&self, kind: AssetKind) -> Option<PathBuf> {
        let sub = match kind {
            AssetKind::Texture => DC_FORMAT.texture_dir,
            AssetKind::Audio => DC_FORMAT.audio_dir,
            AssetKind::Mesh => DC_FORMAT.mesh_dir,
            AssetKind::Material => DC_FORMAT.material_dir,
            AssetKind::Other => return None,
        };
        Some(self.root.join(sub))
    }

    /// Create (if needed) and return the subdirectory for a kind
    pub fn ensure_dir(&self, kind: AssetKind) -> Result<PathBuf> {
        let dir = self
            .dir_for(kind)
            .ok_or_else(|| ExportError::Config(format!("no output directory for {kind} assets")))?;
        std::fs::create_dir_all(&dir).map_err(ExportError::io(&dir))?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_invalid_chars() {
        assert_eq!(sanitize_filename("a/b:c"), "a_b_c");
        assert_eq!(sanitize_filename(r#"<>:"/\|?*"#), "_________");
    }

    #[test]
    fn test_sanitize_trims_whitespace() {
        assert_eq!(sanitize_filename("  Rock Wall 01 \t"), "Rock Wall 01");
    }

    #[test]
    fn test_sanitize_keeps_unicode() {
        assert_eq!(sanitize_filename("Ça_va?"), "Ça_va_");
    }

    #[test]
    fn test_output_stem_rejects_blank() {
        assert!(matches!(output_stem("   "), Err(ExportError::InvalidName(_))));
        assert_eq!(output_stem(" hero ").unwrap(), "hero");
    }

    #[test]
    fn test_layout_dirs() {
        let layout = OutputLayout::new("/out");
        assert_eq!(
            layout.dir_for(AssetKind::Mesh),
            Some(PathBuf::from("/out/models"))
        );
        assert_eq!(layout.dir_for(AssetKind::Other), None);
    }

    #[test]
    fn test_ensure_dir_creates_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let tex = layout.ensure_dir(AssetKind::Texture).unwrap();
        assert!(tex.is_dir());
        assert!(!dir.path().join("audio").exists());
    }
}
