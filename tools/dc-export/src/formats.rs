//! Writers for the binary containers defined in `dc-common`.

use std::io::Write;

use dc_common::{DCM_MAGIC, DCM_VERSION, PvrHeader};

/// Write a complete PVR texture (header + RGB565 payload, row-major, LE)
///
/// `pixels.len()` must equal `width × height`; the texture encoder
/// guarantees this before calling.
pub fn write_pvr_texture<W: Write>(
    w: &mut W,
    width: u16,
    height: u16,
    pixels: &[u16],
) -> std::io::Result<()> {
    let header = PvrHeader::new(width, height);
    w.write_all(&header.to_bytes())?;
    write_rgb565_raw(w, pixels)
}

/// Write bare RGB565 pixels without a header
pub fn write_rgb565_raw<W: Write>(w: &mut W, pixels: &[u16]) -> std::io::Result<()> {
    for p in pixels {
        w.write_all(&p.to_le_bytes())?;
    }
    Ok(())
}

/// Write a complete DCM mesh
///
/// `vertices` is flat xyz, `indices` flat triangle corners, `uvs` flat uv
/// pairs (empty when the mesh has none). The UV count is always written.
pub fn write_dcm_mesh<W: Write>(
    w: &mut W,
    vertices: &[f32],
    indices: &[u16],
    uvs: &[f32],
) -> std::io::Result<()> {
    w.write_all(DCM_MAGIC)?;
    w.write_all(&[DCM_VERSION])?;

    w.write_all(&((vertices.len() / 3) as u32).to_le_bytes())?;
    for f in vertices {
        w.write_all(&f.to_le_bytes())?;
    }

    w.write_all(&((indices.len() / 3) as u32).to_le_bytes())?;
    for i in indices {
        w.write_all(&i.to_le_bytes())?;
    }

    w.write_all(&((uvs.len() / 2) as u32).to_le_bytes())?;
    for f in uvs {
        w.write_all(&f.to_le_bytes())?;
    }

    Ok(())
}
