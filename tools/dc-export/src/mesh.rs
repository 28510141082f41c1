//! Mesh encoder (DCM binary + OBJ reference)

use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use dc_common::{DC_FORMAT, DcmMesh};

use crate::asset::DecodedMesh;
use crate::config::ModelConfig;
use crate::error::{ExportError, Result};
use crate::formats::write_dcm_mesh;
use crate::naming::output_file;

/// Files written for one mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshOutput {
    pub binary: PathBuf,
    pub reference: PathBuf,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub uv_count: usize,
}

impl MeshOutput {
    pub fn files(&self) -> Vec<PathBuf> {
        vec![self.binary.clone(), self.reference.clone()]
    }
}

pub struct MeshEncoder {
    config: ModelConfig,
}

impl MeshEncoder {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Check buffer groupings and index ranges, returning the narrowed indices
    pub fn validate(&self, mesh: &DecodedMesh) -> Result<Vec<u16>> {
        check_grouping("vertex", mesh.vertices.len(), 3)?;
        check_grouping("index", mesh.indices.len(), 3)?;
        if let Some(uvs) = &mesh.uvs {
            check_grouping("uv", uvs.len(), 2)?;
        }

        let vertex_count = mesh.vertices.len() / 3;
        if vertex_count > self.config.max_vertices {
            return Err(ExportError::VertexLimitExceeded {
                count: vertex_count,
                limit: self.config.max_vertices,
            });
        }

        mesh.indices
            .iter()
            .enumerate()
            .map(|(position, &index)| {
                let narrow = u16::try_from(index)
                    .map_err(|_| ExportError::IndexExceedsU16 { index, position })?;
                if index as usize >= vertex_count {
                    return Err(ExportError::IndexOutOfRange {
                        index,
                        position,
                        vertex_count,
                    });
                }
                Ok(narrow)
            })
            .collect()
    }

    /// Encode the DCM container in memory
    pub fn encode_binary(&self, mesh: &DecodedMesh) -> Result<Vec<u8>> {
        let indices = self.validate(mesh)?;
        let uvs = mesh.uvs.as_deref().unwrap_or(&[]);

        let mut buf = Vec::with_capacity(DcmMesh::encoded_size(
            mesh.vertices.len() / 3,
            indices.len() / 3,
            uvs.len() / 2,
        ));
        write_dcm_mesh(&mut buf, &mesh.vertices, &indices, uvs)
            .map_err(ExportError::io(Path::new(&mesh.name)))?;
        Ok(buf)
    }

    /// Render the OBJ reference text
    ///
    /// Same vertex, uv and triangle order as the binary container; face
    /// indices are 1-based.
    pub fn encode_reference(&self, mesh: &DecodedMesh) -> Result<String> {
        let indices = self.validate(mesh)?;
        Ok(render_obj(mesh, &indices))
    }

    pub fn encode(&self, mesh: &DecodedMesh, dir: &Path, stem: &str) -> Result<MeshOutput> {
        let indices = self.validate(mesh)?;
        let uvs = mesh.uvs.as_deref().unwrap_or(&[]);

        let binary = output_file(dir, stem, DC_FORMAT.mesh_ext);
        let file = std::fs::File::create(&binary).map_err(ExportError::io(&binary))?;
        let mut writer = std::io::BufWriter::new(file);
        write_dcm_mesh(&mut writer, &mesh.vertices, &indices, uvs)
            .and_then(|_| writer.flush())
            .map_err(ExportError::io(&binary))?;

        let reference = output_file(dir, stem, DC_FORMAT.reference_mesh_ext);
        std::fs::write(&reference, render_obj(mesh, &indices))
            .map_err(ExportError::io(&reference))?;

        let output = MeshOutput {
            binary,
            reference,
            vertex_count: mesh.vertices.len() / 3,
            triangle_count: indices.len() / 3,
            uv_count: uvs.len() / 2,
        };

        tracing::info!(
            "Extracted mesh {} ({} vertices, {} triangles)",
            stem,
            output.vertex_count,
            output.triangle_count
        );
        Ok(output)
    }
}

fn check_grouping(buffer: &'static str, len: usize, group: usize) -> Result<()> {
    if len % group != 0 {
        return Err(ExportError::MalformedBuffer { buffer, len, group });
    }
    Ok(())
}

fn render_obj(mesh: &DecodedMesh, indices: &[u16]) -> String {
    let mut out = String::new();
    // fmt::Write into a String is infallible
    let _ = writeln!(out, "# Exported by dc-export from {}", mesh.name);
    let _ = writeln!(out, "# Vertices: {}", mesh.vertices.len() / 3);

    for v in mesh.vertices.chunks_exact(3) {
        let _ = writeln!(out, "v {:?} {:?} {:?}", v[0], v[1], v[2]);
    }

    if let Some(uvs) = &mesh.uvs {
        for uv in uvs.chunks_exact(2) {
            let _ = writeln!(out, "vt {:?} {:?}", uv[0], uv[1]);
        }
    }

    for tri in indices.chunks_exact(3) {
        let _ = writeln!(
            out,
            "f {} {} {}",
            u32::from(tri[0]) + 1,
            u32::from(tri[1]) + 1,
            u32::from(tri[2]) + 1
        );
    }

    out
}
