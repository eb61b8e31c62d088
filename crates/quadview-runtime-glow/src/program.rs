use std::fmt;
use std::path::Path;

use quadview_core::{EngineError, HandleKind, ShaderPaths, ShaderStage};
use tracing::warn;

use crate::backend::GlBackend;

pub const QUAD_VERT: &str = r#"#version 330 core
in vec2 a_pos;
in vec2 a_uv;
uniform mat4 uMvp;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = uMvp * vec4(a_pos, 0.0, 1.0);
}
"#;

pub const QUAD_FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 o;
uniform sampler2D uTexture;
void main() { o = texture(uTexture, v_uv); }
"#;

#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub vert: String,
    pub frag: String,
    /// Optional human-friendly origin (path/label) for logs.
    pub origin: Option<String>,
}

impl ShaderSource {
    pub fn builtin() -> Self {
        Self {
            vert: QUAD_VERT.to_string(),
            frag: QUAD_FRAG.to_string(),
            origin: Some("builtin:quad".into()),
        }
    }

    pub fn from_paths(paths: &ShaderPaths) -> Result<Self, EngineError> {
        Ok(Self {
            vert: read_source(&paths.vert)?,
            frag: read_source(&paths.frag)?,
            origin: Some(format!("{} + {}", paths.vert.display(), paths.frag.display())),
        })
    }

    /// Override files when given, built-ins otherwise.
    pub fn load(paths: Option<&ShaderPaths>) -> Result<Self, EngineError> {
        match paths {
            Some(p) => Self::from_paths(p),
            None => Ok(Self::builtin()),
        }
    }
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_source(path: &Path) -> Result<String, EngineError> {
    std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Names the program inputs are looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderBindings {
    pub position: String,
    pub tex_coord: String,
    pub texture: String,
    pub mvp: String,
}

impl Default for ShaderBindings {
    fn default() -> Self {
        Self {
            position: "a_pos".into(),
            tex_coord: "a_uv".into(),
            texture: "uTexture".into(),
            mvp: "uMvp".into(),
        }
    }
}

/// Resolved program inputs. `None` means the name was not found (misspelled or
/// optimized out); draws skip that input.
pub struct ProgramHandles<G: GlBackend> {
    pub position: Option<u32>,
    pub tex_coord: Option<u32>,
    pub texture: Option<G::UniformLocation>,
    pub mvp: Option<G::UniformLocation>,
}

impl<G: GlBackend> fmt::Debug for ProgramHandles<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgramHandles")
            .field("position", &self.position)
            .field("tex_coord", &self.tex_coord)
            .field("texture", &self.texture)
            .field("mvp", &self.mvp)
            .finish()
    }
}

/// Compiles and links a vertex/fragment pair.
///
/// Each stage's compile status is checked explicitly; on any failure every object created
/// so far is deleted and the driver's info log is returned in the error.
pub unsafe fn compile_program<G: GlBackend>(
    gl: &G,
    vert_src: &str,
    frag_src: &str,
) -> Result<G::Program, EngineError> {
    let vs = compile_stage(gl, ShaderStage::Vertex, vert_src)?;
    let fs = match compile_stage(gl, ShaderStage::Fragment, frag_src) {
        Ok(fs) => fs,
        Err(e) => {
            gl.delete_shader(vs);
            return Err(e);
        }
    };

    let program = match gl.create_program() {
        Ok(p) => p,
        Err(e) => {
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(EngineError::GlCreate(format!("create_program failed: {e}")));
        }
    };
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(EngineError::ProgramLink(log));
    }

    Ok(program)
}

unsafe fn compile_stage<G: GlBackend>(
    gl: &G,
    stage: ShaderStage,
    src: &str,
) -> Result<G::Shader, EngineError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|e| EngineError::GlCreate(format!("create_shader({stage}) failed: {e}")))?;
    gl.shader_source(shader, src);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(EngineError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

/// A linked program plus its resolved inputs.
pub struct ShaderProgram<G: GlBackend> {
    pub program: G::Program,
    pub handles: ProgramHandles<G>,
    missing: Vec<(HandleKind, String)>,
}

impl<G: GlBackend> fmt::Debug for ShaderProgram<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .field("handles", &self.handles)
            .field("missing", &self.missing)
            .finish()
    }
}

impl<G: GlBackend> ShaderProgram<G> {
    /// Builds with the default [`ShaderBindings`].
    pub unsafe fn build(gl: &G, vert_src: &str, frag_src: &str) -> Result<Self, EngineError> {
        Self::build_with(gl, vert_src, frag_src, &ShaderBindings::default())
    }

    pub unsafe fn build_with(
        gl: &G,
        vert_src: &str,
        frag_src: &str,
        bindings: &ShaderBindings,
    ) -> Result<Self, EngineError> {
        let program = compile_program(gl, vert_src, frag_src)?;
        let mut missing = Vec::new();

        let mut attrib = |name: &str| {
            let loc = gl.get_attrib_location(program, name);
            if loc.is_none() {
                missing.push((HandleKind::Attribute, name.to_string()));
            }
            loc
        };
        let position = attrib(&bindings.position);
        let tex_coord = attrib(&bindings.tex_coord);

        let mut uniform = |name: &str| {
            let loc = gl.get_uniform_location(program, name);
            if loc.is_none() {
                missing.push((HandleKind::Uniform, name.to_string()));
            }
            loc
        };
        let texture = uniform(&bindings.texture);
        let mvp = uniform(&bindings.mvp);

        for (kind, name) in &missing {
            let err = EngineError::HandleNotFound {
                kind: *kind,
                name: name.clone(),
            };
            warn!(%err, "program input unresolved, frames will render degraded");
        }

        Ok(Self {
            program,
            handles: ProgramHandles {
                position,
                tex_coord,
                texture,
                mvp,
            },
            missing,
        })
    }

    /// Names that failed to resolve, in lookup order.
    pub fn missing(&self) -> &[(HandleKind, String)] {
        &self.missing
    }

    /// Turns the first unresolved input into an error.
    pub fn require_all(&self) -> Result<(), EngineError> {
        match self.missing.first() {
            Some((kind, name)) => Err(EngineError::HandleNotFound {
                kind: *kind,
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }

    pub unsafe fn destroy(&self, gl: &G) {
        gl.delete_program(self.program);
    }
}
