//! Packed vertex data for the image quad.
//
// Clip space has its origin at the centre with +y up; texture space has its origin at the
// top-left with +v down. Pairing the two tables index by index is what keeps the image
// upright, so they must stay co-indexed.

use crate::EngineError;

/// Clip-space corners, in triangle-strip order.
pub const QUAD_POSITIONS: [[f32; 2]; 4] = [[-1.0, 1.0], [-1.0, -1.0], [1.0, 1.0], [1.0, -1.0]];

/// Texture coordinates matching [`QUAD_POSITIONS`] one for one.
pub const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

/// Floats per point.
pub const COMPONENTS: usize = 2;

/// Tightly packed native-endian `f32` buffer with a sequential read cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedBuffer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl PackedBuffer {
    /// Packs `points` in order. At least three points are required to form a primitive.
    pub fn from_points(points: &[[f32; 2]]) -> Result<Self, EngineError> {
        if points.len() < 3 {
            return Err(EngineError::InvalidGeometry(format!(
                "need at least 3 points, got {}",
                points.len()
            )));
        }
        Ok(pack(points))
    }

    /// Raw bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len_floats(&self) -> usize {
        self.bytes.len() / std::mem::size_of::<f32>()
    }

    pub fn point_count(&self) -> usize {
        self.len_floats() / COMPONENTS
    }

    /// Reads the next float and advances the cursor; `None` at the end.
    pub fn read_f32(&mut self) -> Option<f32> {
        let end = self.cursor + std::mem::size_of::<f32>();
        let chunk = self.bytes.get(self.cursor..end)?;
        self.cursor = end;
        Some(f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }

    pub fn position(&self) -> usize {
        self.cursor / std::mem::size_of::<f32>()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

/// The two co-indexed vertex streams of the quad, built once.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadGeometry {
    pub positions: PackedBuffer,
    pub tex_coords: PackedBuffer,
}

impl QuadGeometry {
    /// Full-screen quad with the standard top-left texture origin.
    pub fn fullscreen() -> Self {
        // Constant tables always satisfy the length checks in `from_points`.
        Self {
            positions: pack(&QUAD_POSITIONS),
            tex_coords: pack(&QUAD_TEX_COORDS),
        }
    }

    pub fn from_points(positions: &[[f32; 2]], tex_coords: &[[f32; 2]]) -> Result<Self, EngineError> {
        if positions.len() != tex_coords.len() {
            return Err(EngineError::InvalidGeometry(format!(
                "{} positions but {} texture coordinates",
                positions.len(),
                tex_coords.len()
            )));
        }
        Ok(Self {
            positions: PackedBuffer::from_points(positions)?,
            tex_coords: PackedBuffer::from_points(tex_coords)?,
        })
    }

    /// Vertex count for the draw call.
    pub fn vertex_count(&self) -> i32 {
        self.positions.point_count() as i32
    }
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self::fullscreen()
    }
}

fn pack(points: &[[f32; 2]]) -> PackedBuffer {
    let floats: &[f32] = bytemuck::cast_slice(points);
    PackedBuffer {
        bytes: bytemuck::cast_slice::<f32, u8>(floats).to_vec(),
        cursor: 0,
    }
}
