/// Graphics API seam.
///
/// The core never calls OpenGL directly. Everything GPU-facing goes through
/// [`GpuBackend`], which [`crate::gl::GlBackend`] implements over `glow` and a
/// recording mock implements in tests.
///
/// Every GPU call requires the owning context to be current on the calling
/// thread. That precondition is carried by [`Current`]: operations that touch
/// the GPU take a `&mut Current<B>`, and the only way to obtain one is
/// [`Current::acquire`], which makes the context current first.
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use crate::error::GpuError;

/// Pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Rasterization mode for front and back faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// OpenGL-shaped operations the renderer needs.
///
/// Handle types are opaque and cheap to copy. Fallible creation returns the
/// driver's reason as a string, and compile/link failures return the info
/// log. Methods other than [`GpuBackend::make_current`] assume the context is
/// current; call them through [`Current`].
pub trait GpuBackend {
    type Shader: Copy + Debug;
    type Program: Copy + Debug;
    type VertexArray: Copy + Debug;
    type Buffer: Copy + Debug;
    type UniformLocation: Debug;

    /// Make this backend's context current on the calling thread.
    fn make_current(&mut self) -> Result<(), String>;

    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// Upload `source` and compile it. On failure returns the info log.
    fn compile_shader(&mut self, shader: Self::Shader, source: &str) -> Result<(), String>;
    fn delete_shader(&mut self, shader: Self::Shader);

    fn create_program(&mut self) -> Result<Self::Program, String>;
    fn attach_shader(&mut self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&mut self, program: Self::Program, shader: Self::Shader);
    /// Link the attached stages. On failure returns the info log.
    fn link_program(&mut self, program: Self::Program) -> Result<(), String>;
    fn delete_program(&mut self, program: Self::Program);
    fn use_program(&mut self, program: Option<Self::Program>);

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&mut self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);

    fn create_buffer(&mut self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&mut self, buffer: Self::Buffer);
    /// Fill `buffer` with `data` and describe it as `components` floats per
    /// vertex at attribute slot 0 of `vertex_array`.
    fn fill_vertex_buffer(
        &mut self,
        vertex_array: Self::VertexArray,
        buffer: Self::Buffer,
        data: &[f32],
        components: i32,
    );
    /// Fill `buffer` with `data` as the element buffer of `vertex_array`.
    fn fill_index_buffer(&mut self, vertex_array: Self::VertexArray, buffer: Self::Buffer, data: &[u32]);

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    /// Upload a column-major 4x4 matrix.
    fn set_uniform_mat4(&mut self, location: &Self::UniformLocation, value: &[f32]);

    fn set_viewport(&mut self, width: i32, height: i32);
    fn clear(&mut self, color: [f32; 4]);
    fn set_polygon_mode(&mut self, mode: PolygonMode);
    fn draw_triangles(&mut self, index_count: i32);
}

/// Proof that a backend's context is current.
///
/// Dereferences to the backend for the duration of one operation.
pub struct Current<'a, B: GpuBackend> {
    gpu: &'a mut B,
}

impl<'a, B: GpuBackend> Current<'a, B> {
    pub fn acquire(gpu: &'a mut B) -> Result<Self, GpuError> {
        gpu.make_current().map_err(GpuError::ContextUnavailable)?;
        Ok(Self { gpu })
    }
}

impl<B: GpuBackend> Deref for Current<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.gpu
    }
}

impl<B: GpuBackend> DerefMut for Current<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.gpu
    }
}

#[cfg(test)]
pub(crate) mod mock;
