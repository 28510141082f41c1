//! DCM mesh container (.dcm)
//!
//! Compact indexed triangle mesh. Sections are variable length, so there is
//! no fixed header struct; [`DcmMesh`] reads a whole file back.
//!
//! # Layout
//! ```text
//! 0x00: magic "DCM" (3 bytes)
//! 0x03: version u8 (1)
//! 0x04: vertex_count u32
//!       vertex_count × (x f32, y f32, z f32)
//! var:  triangle_count u32
//!       triangle_count × (a u16, b u16, c u16)
//! var:  uv_count u32 (always present, 0 when the mesh has no UVs)
//!       uv_count × (u f32, v f32)
//! ```

/// Magic bytes at the start of every `.dcm` file
pub const DCM_MAGIC: &[u8; 3] = b"DCM";

/// Current container version
pub const DCM_VERSION: u8 = 1;

/// Magic + version
pub const DCM_PREAMBLE_SIZE: usize = 4;

/// Bytes per position (3 × f32)
pub const DCM_VERTEX_SIZE: usize = 12;

/// Bytes per triangle (3 × u16)
pub const DCM_TRIANGLE_SIZE: usize = 6;

/// Bytes per UV pair (2 × f32)
pub const DCM_UV_SIZE: usize = 8;

/// A mesh read back from a `.dcm` file
#[derive(Debug, Clone, PartialEq)]
pub struct DcmMesh {
    pub version: u8,
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<[u16; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl DcmMesh {
    /// Exact file size for the given section counts
    pub const fn encoded_size(vertex_count: usize, triangle_count: usize, uv_count: usize) -> usize {
        DCM_PREAMBLE_SIZE
            + 4
            + vertex_count * DCM_VERTEX_SIZE
            + 4
            + triangle_count * DCM_TRIANGLE_SIZE
            + 4
            + uv_count * DCM_UV_SIZE
    }

    /// Parse a complete `.dcm` file
    ///
    /// Returns `None` on wrong magic, unsupported version, truncated sections,
    /// or trailing bytes after the UV section.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut cursor = Cursor { bytes, pos: 0 };

        if cursor.take(3)? != DCM_MAGIC {
            return None;
        }
        let version = cursor.take(1)?[0];
        if version != DCM_VERSION {
            return None;
        }

        let vertex_count = cursor.read_u32()? as usize;
        let mut positions = Vec::with_capacity(vertex_count.min(bytes.len() / DCM_VERTEX_SIZE));
        for _ in 0..vertex_count {
            positions.push([cursor.read_f32()?, cursor.read_f32()?, cursor.read_f32()?]);
        }

        let triangle_count = cursor.read_u32()? as usize;
        let mut triangles =
            Vec::with_capacity(triangle_count.min(bytes.len() / DCM_TRIANGLE_SIZE));
        for _ in 0..triangle_count {
            triangles.push([cursor.read_u16()?, cursor.read_u16()?, cursor.read_u16()?]);
        }

        let uv_count = cursor.read_u32()? as usize;
        let mut uvs = Vec::with_capacity(uv_count.min(bytes.len() / DCM_UV_SIZE));
        for _ in 0..uv_count {
            uvs.push([cursor.read_f32()?, cursor.read_f32()?]);
        }

        if cursor.pos != bytes.len() {
            return None;
        }

        Some(Self {
            version,
            positions,
            triangles,
            uvs,
        })
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn read_u16(&mut self) -> Option<u16> {
        let b = self.take(2)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Option<u32> {
        let b = self.take(4)?;
        Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f32(&mut self) -> Option<f32> {
        self.read_u32().map(f32::from_bits)
    }
}
