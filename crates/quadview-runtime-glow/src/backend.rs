//! The GL calls the renderer needs, as a trait.
//!
//! [`GlBackend`] is implemented for `glow::Context`; tests implement it with a recording
//! fake so the pipeline logic runs without a GPU. Method names follow `glow::HasContext`.
//! All methods are `unsafe` for the same reason glow's are: the context must be current
//! on the calling thread and handles must belong to it.

use std::fmt;

use glow::HasContext;
use quadview_core::{PixelFormat, ShaderStage};

pub trait GlBackend {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug + PartialEq;
    type Texture: Copy + fmt::Debug + PartialEq;
    type Buffer: Copy + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    // ---- shaders / programs ----
    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str);
    unsafe fn compile_shader(&self, shader: Self::Shader);
    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool;
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String;
    unsafe fn delete_shader(&self, shader: Self::Shader);

    unsafe fn create_program(&self) -> Result<Self::Program, String>;
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    unsafe fn link_program(&self, program: Self::Program);
    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool;
    unsafe fn get_program_info_log(&self, program: Self::Program) -> String;
    unsafe fn delete_program(&self, program: Self::Program);
    unsafe fn use_program(&self, program: Option<Self::Program>);

    unsafe fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    unsafe fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    /// Column-major, no transpose.
    unsafe fn uniform_matrix_4(&self, location: &Self::UniformLocation, cols: &[f32; 16]);
    unsafe fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32);

    // ---- textures (always TEXTURE_2D) ----
    unsafe fn create_texture(&self) -> Result<Self::Texture, String>;
    /// `unit` is relative to `TEXTURE0`.
    unsafe fn active_texture(&self, unit: u32);
    unsafe fn bind_texture(&self, texture: Option<Self::Texture>);
    unsafe fn tex_parameter_i32(&self, parameter: u32, value: i32);
    unsafe fn unpack_alignment(&self, alignment: i32);
    unsafe fn tex_image_2d(&self, width: i32, height: i32, format: PixelFormat, pixels: &[u8]);
    unsafe fn delete_texture(&self, texture: Self::Texture);

    // ---- vertex data ----
    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String>;
    unsafe fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `STATIC_DRAW` data into the bound `ARRAY_BUFFER`.
    unsafe fn array_buffer_data(&self, bytes: &[u8]);
    unsafe fn delete_buffer(&self, buffer: Self::Buffer);
    unsafe fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    unsafe fn bind_vertex_array(&self, vao: Option<Self::VertexArray>);
    unsafe fn delete_vertex_array(&self, vao: Self::VertexArray);
    unsafe fn enable_vertex_attrib_array(&self, index: u32);
    /// Float attribute sourced from the bound `ARRAY_BUFFER`.
    unsafe fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);

    // ---- frame ----
    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    unsafe fn clear(&self, mask: u32);
    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32);
}

fn texture_formats(format: PixelFormat) -> (u32, u32) {
    match format {
        PixelFormat::Rgba8 => (glow::RGBA8, glow::RGBA),
        PixelFormat::Rgb8 => (glow::RGB8, glow::RGB),
    }
}

impl GlBackend for glow::Context {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Texture = <glow::Context as HasContext>::Texture;
    type Buffer = <glow::Context as HasContext>::Buffer;
    type VertexArray = <glow::Context as HasContext>::VertexArray;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    unsafe fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let ty = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        HasContext::create_shader(self, ty)
    }
    unsafe fn shader_source(&self, shader: Self::Shader, source: &str) {
        HasContext::shader_source(self, shader, source)
    }
    unsafe fn compile_shader(&self, shader: Self::Shader) {
        HasContext::compile_shader(self, shader)
    }
    unsafe fn get_shader_compile_status(&self, shader: Self::Shader) -> bool {
        HasContext::get_shader_compile_status(self, shader)
    }
    unsafe fn get_shader_info_log(&self, shader: Self::Shader) -> String {
        HasContext::get_shader_info_log(self, shader)
    }
    unsafe fn delete_shader(&self, shader: Self::Shader) {
        HasContext::delete_shader(self, shader)
    }

    unsafe fn create_program(&self) -> Result<Self::Program, String> {
        HasContext::create_program(self)
    }
    unsafe fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::attach_shader(self, program, shader)
    }
    unsafe fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        HasContext::detach_shader(self, program, shader)
    }
    unsafe fn link_program(&self, program: Self::Program) {
        HasContext::link_program(self, program)
    }
    unsafe fn get_program_link_status(&self, program: Self::Program) -> bool {
        HasContext::get_program_link_status(self, program)
    }
    unsafe fn get_program_info_log(&self, program: Self::Program) -> String {
        HasContext::get_program_info_log(self, program)
    }
    unsafe fn delete_program(&self, program: Self::Program) {
        HasContext::delete_program(self, program)
    }
    unsafe fn use_program(&self, program: Option<Self::Program>) {
        HasContext::use_program(self, program)
    }

    unsafe fn get_attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        HasContext::get_attrib_location(self, program, name)
    }
    unsafe fn get_uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        HasContext::get_uniform_location(self, program, name)
    }
    unsafe fn uniform_matrix_4(&self, location: &Self::UniformLocation, cols: &[f32; 16]) {
        HasContext::uniform_matrix_4_f32_slice(self, Some(location), false, cols)
    }
    unsafe fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        HasContext::uniform_1_i32(self, Some(location), value)
    }

    unsafe fn create_texture(&self) -> Result<Self::Texture, String> {
        HasContext::create_texture(self)
    }
    unsafe fn active_texture(&self, unit: u32) {
        HasContext::active_texture(self, glow::TEXTURE0 + unit)
    }
    unsafe fn bind_texture(&self, texture: Option<Self::Texture>) {
        HasContext::bind_texture(self, glow::TEXTURE_2D, texture)
    }
    unsafe fn tex_parameter_i32(&self, parameter: u32, value: i32) {
        HasContext::tex_parameter_i32(self, glow::TEXTURE_2D, parameter, value)
    }
    unsafe fn unpack_alignment(&self, alignment: i32) {
        HasContext::pixel_store_i32(self, glow::UNPACK_ALIGNMENT, alignment)
    }
    unsafe fn tex_image_2d(&self, width: i32, height: i32, format: PixelFormat, pixels: &[u8]) {
        let (internal, external) = texture_formats(format);
        HasContext::tex_image_2d(
            self,
            glow::TEXTURE_2D,
            0,
            internal as i32,
            width,
            height,
            0,
            external,
            glow::UNSIGNED_BYTE,
            Some(pixels),
        )
    }
    unsafe fn delete_texture(&self, texture: Self::Texture) {
        HasContext::delete_texture(self, texture)
    }

    unsafe fn create_buffer(&self) -> Result<Self::Buffer, String> {
        HasContext::create_buffer(self)
    }
    unsafe fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        HasContext::bind_buffer(self, glow::ARRAY_BUFFER, buffer)
    }
    unsafe fn array_buffer_data(&self, bytes: &[u8]) {
        HasContext::buffer_data_u8_slice(self, glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW)
    }
    unsafe fn delete_buffer(&self, buffer: Self::Buffer) {
        HasContext::delete_buffer(self, buffer)
    }
    unsafe fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        HasContext::create_vertex_array(self)
    }
    unsafe fn bind_vertex_array(&self, vao: Option<Self::VertexArray>) {
        HasContext::bind_vertex_array(self, vao)
    }
    unsafe fn delete_vertex_array(&self, vao: Self::VertexArray) {
        HasContext::delete_vertex_array(self, vao)
    }
    unsafe fn enable_vertex_attrib_array(&self, index: u32) {
        HasContext::enable_vertex_attrib_array(self, index)
    }
    unsafe fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        HasContext::vertex_attrib_pointer_f32(self, index, size, glow::FLOAT, false, stride, offset)
    }

    unsafe fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        HasContext::viewport(self, x, y, width, height)
    }
    unsafe fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        HasContext::clear_color(self, red, green, blue, alpha)
    }
    unsafe fn clear(&self, mask: u32) {
        HasContext::clear(self, mask)
    }
    unsafe fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        HasContext::draw_arrays(self, mode, first, count)
    }
}
