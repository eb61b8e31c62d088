//! Recording [`GlBackend`] for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use quadview_core::{PixelFormat, ShaderStage};

use crate::backend::GlBackend;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileShader(u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    UniformMatrix4 { location: u32, cols: [f32; 16] },
    Uniform1i { location: u32, value: i32 },
    ActiveTexture(u32),
    BindTexture(Option<u32>),
    TexParameter { parameter: u32, value: i32 },
    UnpackAlignment(i32),
    TexImage2d { width: i32, height: i32, format: PixelFormat, len: usize },
    BindArrayBuffer(Option<u32>),
    ArrayBufferData(Vec<u8>),
    BindVertexArray(Option<u32>),
    EnableVertexAttribArray(u32),
    VertexAttribPointer { index: u32, size: i32, stride: i32, offset: i32 },
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear(u32),
    DrawArrays { mode: u32, first: i32, count: i32 },
}

/// Object kinds tracked for leak checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Object {
    Shader(u32),
    Program(u32),
    Texture(u32),
    Buffer(u32),
    VertexArray(u32),
}

#[derive(Debug, Default)]
pub struct FakeGl {
    pub next_id: Cell<u32>,
    pub calls: RefCell<Vec<Call>>,
    pub live: RefCell<BTreeSet<Object>>,
    pub shader_stages: RefCell<Vec<(u32, ShaderStage)>>,

    /// Stage whose compile status reports failure.
    pub fail_compile: Option<ShaderStage>,
    pub fail_link: bool,
    pub fail_texture_create: bool,
    /// Attribute/uniform names that resolve to "not found".
    pub missing_names: Vec<&'static str>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&self, make: fn(u32) -> Object) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(make(id));
        id
    }

    fn free(&self, obj: Object) {
        self.live.borrow_mut().remove(&obj);
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn location_of(&self, name: &str) -> Option<u32> {
        if self.missing_names.iter().any(|n| *n == name) {
            return None;
        }
        // Stable per-name value so tests can predict it.
        Some(match name {
            "a_pos" => 0,
            "a_uv" => 1,
            "uTexture" => 10,
            "uMvp" => 11,
            _ => 99,
        })
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn live_textures(&self) -> usize {
        self.live
            .borrow()
            .iter()
            .filter(|o| matches!(o, Object::Texture(_)))
            .count()
    }
}

impl GlBackend for FakeGl {
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = u32;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.alloc(Object::Shader);
        self.shader_stages.borrow_mut().push((id, stage));
        Ok(id)
    }
    unsafe fn shader_source(&self, _shader: u32, _source: &str) {}
    unsafe fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }
    unsafe fn get_shader_compile_status(&self, shader: u32) -> bool {
        let stage = self
            .shader_stages
            .borrow()
            .iter()
            .find(|(id, _)| *id == shader)
            .map(|(_, s)| *s);
        !matches!((stage, self.fail_compile), (Some(s), Some(f)) if s == f)
    }
    unsafe fn get_shader_info_log(&self, shader: u32) -> String {
        format!("0:1: shader {shader}: syntax error")
    }
    unsafe fn delete_shader(&self, shader: u32) {
        self.free(Object::Shader(shader));
    }

    unsafe fn create_program(&self) -> Result<u32, String> {
        Ok(self.alloc(Object::Program))
    }
    unsafe fn attach_shader(&self, _program: u32, _shader: u32) {}
    unsafe fn detach_shader(&self, _program: u32, _shader: u32) {}
    unsafe fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }
    unsafe fn get_program_link_status(&self, _program: u32) -> bool {
        !self.fail_link
    }
    unsafe fn get_program_info_log(&self, _program: u32) -> String {
        "varying v_uv not written".to_string()
    }
    unsafe fn delete_program(&self, program: u32) {
        self.free(Object::Program(program));
    }
    unsafe fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    unsafe fn get_attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.location_of(name)
    }
    unsafe fn get_uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.location_of(name)
    }
    unsafe fn uniform_matrix_4(&self, location: &u32, cols: &[f32; 16]) {
        self.record(Call::UniformMatrix4 {
            location: *location,
            cols: *cols,
        });
    }
    unsafe fn uniform_1_i32(&self, location: &u32, value: i32) {
        self.record(Call::Uniform1i {
            location: *location,
            value,
        });
    }

    unsafe fn create_texture(&self) -> Result<u32, String> {
        if self.fail_texture_create {
            return Err("out of texture names".to_string());
        }
        Ok(self.alloc(Object::Texture))
    }
    unsafe fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }
    unsafe fn bind_texture(&self, texture: Option<u32>) {
        self.record(Call::BindTexture(texture));
    }
    unsafe fn tex_parameter_i32(&self, parameter: u32, value: i32) {
        self.record(Call::TexParameter { parameter, value });
    }
    unsafe fn unpack_alignment(&self, alignment: i32) {
        self.record(Call::UnpackAlignment(alignment));
    }
    unsafe fn tex_image_2d(&self, width: i32, height: i32, format: PixelFormat, pixels: &[u8]) {
        self.record(Call::TexImage2d {
            width,
            height,
            format,
            len: pixels.len(),
        });
    }
    unsafe fn delete_texture(&self, texture: u32) {
        self.free(Object::Texture(texture));
    }

    unsafe fn create_buffer(&self) -> Result<u32, String> {
        Ok(self.alloc(Object::Buffer))
    }
    unsafe fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }
    unsafe fn array_buffer_data(&self, bytes: &[u8]) {
        self.record(Call::ArrayBufferData(bytes.to_vec()));
    }
    unsafe fn delete_buffer(&self, buffer: u32) {
        self.free(Object::Buffer(buffer));
    }
    unsafe fn create_vertex_array(&self) -> Result<u32, String> {
        Ok(self.alloc(Object::VertexArray))
    }
    unsafe fn bind_vertex_array(&self, vao: Option<u32>) {
        self.record(Call::BindVertexArray(vao));
    }
    unsafe fn delete_vertex_array(&self, vao: u32) {
        self.free(Object::VertexArray(vao));
    }
    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }
    unsafe fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.record(Call::VertexAttribPointer {
            index,
            size,
            stride,
            offset,
        });
    }

    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }
    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor([red, green, blue, alpha]));
    }
    unsafe fn clear(&self, mask: u32) {
        self.record(Call::Clear(mask));
    }
    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.record(Call::DrawArrays { mode, first, count });
    }
}
