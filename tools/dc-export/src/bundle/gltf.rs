//! glTF/GLB mesh loading

use std::path::Path;

use crate::asset::DecodedMesh;
use crate::error::{ExportError, Result};

/// Load the first primitive of the first mesh
///
/// Indices are kept as `u32`; meshes without an index buffer get a
/// sequential one. Only triangle lists are accepted.
pub fn load_gltf(name: &str, path: &Path) -> Result<DecodedMesh> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|e| ExportError::decode(name, e))?;

    let mesh = document
        .meshes()
        .next()
        .ok_or_else(|| ExportError::decode(name, "no meshes found in glTF"))?;
    let primitive = mesh
        .primitives()
        .next()
        .ok_or_else(|| ExportError::decode(name, "no primitives found in mesh"))?;

    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return Err(ExportError::decode(
            name,
            format!("unsupported primitive mode {:?}", primitive.mode()),
        ));
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| ExportError::decode(name, "no positions in mesh"))?
        .collect();

    let uvs: Option<Vec<f32>> = reader
        .read_tex_coords(0)
        .map(|iter| iter.into_f32().flatten().collect());

    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    if mesh.primitives().len() > 1 {
        tracing::debug!(
            "{}: using first of {} primitives",
            name,
            mesh.primitives().len()
        );
    }

    Ok(DecodedMesh {
        name: name.to_string(),
        vertices: positions.into_iter().flatten().collect(),
        indices,
        uvs,
    })
}
