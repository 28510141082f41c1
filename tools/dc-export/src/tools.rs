//! Optional external encoders.
//!
//! Tools are looked up once on `PATH` and passed into the encoders that use
//! them. A missing tool is never an error by itself; each encoder decides how
//! to degrade.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ExportError, Result};

/// ADX encoder (primary audio compressor)
pub const ADXTOOL: &str = "adxtool";
/// General-purpose audio converter (fallback compressor)
pub const SOX: &str = "sox";
/// Raw RGB565 to PVR converter
pub const PVR_CONVERTER: &str = "pvr_converter";

/// Resolved paths of the external tools the pipeline can use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalTools {
    pub adxtool: Option<PathBuf>,
    pub sox: Option<PathBuf>,
    pub pvr_converter: Option<PathBuf>,
}

impl ExternalTools {
    /// Look every tool up on `PATH`
    pub fn discover() -> Self {
        Self {
            adxtool: find_tool(ADXTOOL),
            sox: find_tool(SOX),
            pvr_converter: find_tool(PVR_CONVERTER),
        }
    }

    /// No external tools; everything runs in-process or degrades
    pub fn none() -> Self {
        Self::default()
    }
}

fn find_tool(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => {
            tracing::debug!("Found {} at {:?}", name, path);
            Some(path)
        }
        Err(_) => {
            tracing::debug!("{} not found on PATH", name);
            None
        }
    }
}

/// Run a tool to completion, turning spawn failures and non-zero exits into errors
pub fn run_tool<I, S>(program: &Path, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tool = tool_name(program);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ExportError::ExternalTool {
            tool: tool.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExportError::ExternalTool {
            tool,
            reason: format!("{} ({})", output.status, stderr.trim()),
        });
    }

    Ok(())
}

/// Remove a tool's target file so a stale copy can't pass for fresh output
pub fn clear_target(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ExportError::io(path)(e)),
    }
}

/// Fail unless the tool actually produced `output`
pub fn expect_output(tool: &Path, output: &Path) -> Result<()> {
    if output.is_file() {
        return Ok(());
    }
    Err(ExportError::ExternalTool {
        tool: tool_name(tool),
        reason: format!("exited successfully but wrote no {}", output.display()),
    })
}

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}
