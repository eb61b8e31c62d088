use std::fmt;

use quadview_core::{geometry::COMPONENTS, EngineError, QuadGeometry};

use crate::backend::GlBackend;
use crate::program::ProgramHandles;

/// The quad's two vertex streams in GPU buffers: one VAO, one VBO per stream.
pub struct QuadBuffers<G: GlBackend> {
    vao: G::VertexArray,
    positions: G::Buffer,
    tex_coords: G::Buffer,
    vertex_count: i32,
}

impl<G: GlBackend> fmt::Debug for QuadBuffers<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadBuffers")
            .field("vao", &self.vao)
            .field("positions", &self.positions)
            .field("tex_coords", &self.tex_coords)
            .field("vertex_count", &self.vertex_count)
            .finish()
    }
}

impl<G: GlBackend> QuadBuffers<G> {
    /// Uploads both streams once. Buffer contents are never modified afterwards.
    pub unsafe fn new(gl: &G, geometry: &QuadGeometry) -> Result<Self, EngineError> {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| EngineError::GlCreate(format!("create_vertex_array: {e}")))?;
        let positions = match gl.create_buffer() {
            Ok(b) => b,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(EngineError::GlCreate(format!("create_buffer: {e}")));
            }
        };
        let tex_coords = match gl.create_buffer() {
            Ok(b) => b,
            Err(e) => {
                gl.delete_buffer(positions);
                gl.delete_vertex_array(vao);
                return Err(EngineError::GlCreate(format!("create_buffer: {e}")));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_array_buffer(Some(positions));
        gl.array_buffer_data(geometry.positions.as_bytes());
        gl.bind_array_buffer(Some(tex_coords));
        gl.array_buffer_data(geometry.tex_coords.as_bytes());
        gl.bind_array_buffer(None);
        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            positions,
            tex_coords,
            vertex_count: geometry.vertex_count(),
        })
    }

    pub fn vertex_count(&self) -> i32 {
        self.vertex_count
    }

    /// Binds the VAO and points each resolved attribute at its stream.
    /// Unresolved attributes are left alone.
    pub unsafe fn bind(&self, gl: &G, handles: &ProgramHandles<G>) {
        gl.bind_vertex_array(Some(self.vao));
        for (loc, buffer) in [
            (handles.position, self.positions),
            (handles.tex_coord, self.tex_coords),
        ] {
            let Some(loc) = loc else { continue };
            gl.bind_array_buffer(Some(buffer));
            gl.enable_vertex_attrib_array(loc);
            gl.vertex_attrib_pointer_f32(loc, COMPONENTS as i32, 0, 0);
        }
        gl.bind_array_buffer(None);
    }

    pub unsafe fn unbind(&self, gl: &G) {
        gl.bind_vertex_array(None);
    }

    pub unsafe fn destroy(&self, gl: &G) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.positions);
        gl.delete_buffer(self.tex_coords);
    }
}
