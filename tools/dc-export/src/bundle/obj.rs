//! OBJ mesh loading

use hashbrown::HashMap;

use crate::asset::DecodedMesh;
use crate::error::{ExportError, Result};

/// Parse OBJ text into an indexed mesh
///
/// Positions and the first texture coordinate are kept; normals and
/// everything else are ignored. Polygons are fan-triangulated. Corners that
/// reference the same (position, uv) pair share one output vertex. UVs are
/// only emitted when every corner has one.
pub fn parse_obj(name: &str, source: &str) -> Result<DecodedMesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();

    let mut lookup: HashMap<(usize, Option<usize>), u32> = HashMap::new();
    let mut vertices: Vec<f32> = Vec::new();
    let mut uvs: Vec<f32> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut all_corners_have_uv = true;

    for (line_no, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let bad_line =
            || ExportError::decode(name, format!("line {}: malformed '{}'", line_no + 1, line));

        match parts[0] {
            "v" if parts.len() >= 4 => {
                positions.push([
                    parse_float(parts[1]).ok_or_else(bad_line)?,
                    parse_float(parts[2]).ok_or_else(bad_line)?,
                    parse_float(parts[3]).ok_or_else(bad_line)?,
                ]);
            }
            "vt" if parts.len() >= 3 => {
                tex_coords.push([
                    parse_float(parts[1]).ok_or_else(bad_line)?,
                    parse_float(parts[2]).ok_or_else(bad_line)?,
                ]);
            }
            "f" if parts.len() >= 4 => {
                let corners = parts[1..]
                    .iter()
                    .map(|r| parse_obj_vertex(r, positions.len(), tex_coords.len()))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(bad_line)?;

                // Fan triangulation (convex polygons)
                for i in 1..corners.len() - 1 {
                    for corner in [corners[0], corners[i], corners[i + 1]] {
                        let index = *lookup.entry(corner).or_insert_with(|| {
                            let (vi, vti) = corner;
                            vertices.extend_from_slice(&positions[vi]);
                            match vti {
                                Some(ti) => uvs.extend_from_slice(&tex_coords[ti]),
                                None => {
                                    all_corners_have_uv = false;
                                    uvs.extend_from_slice(&[0.0, 0.0]);
                                }
                            }
                            (vertices.len() / 3 - 1) as u32
                        });
                        indices.push(index);
                    }
                }
            }
            "v" | "vt" | "f" => return Err(bad_line()),
            _ => {}
        }
    }

    let uvs = if all_corners_have_uv && !uvs.is_empty() {
        Some(uvs)
    } else {
        None
    };

    Ok(DecodedMesh {
        name: name.to_string(),
        vertices,
        indices,
        uvs,
    })
}

fn parse_float(s: &str) -> Option<f32> {
    s.parse().ok()
}

/// Resolve "v", "v/vt", "v/vt/vn" or "v//vn" to zero-based (v, vt)
///
/// Negative references count back from the most recent element.
fn parse_obj_vertex(
    s: &str,
    position_count: usize,
    uv_count: usize,
) -> Option<(usize, Option<usize>)> {
    let mut parts = s.split('/');
    let vi = resolve_index(parts.next()?, position_count)?;
    let vti = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, uv_count)?),
        _ => None,
    };
    Some((vi, vti))
}

fn resolve_index(s: &str, count: usize) -> Option<usize> {
    let raw: i64 = s.parse().ok()?;
    let index = if raw < 0 {
        count.checked_sub(raw.unsigned_abs() as usize)?
    } else {
        // OBJ indices are 1-based
        (raw as usize).checked_sub(1)?
    };
    (index < count).then_some(index)
}
