/// OpenGL backend over `glow`.
///
/// The windowing layer creates the GL context and hands it over together
/// with a callback that makes it current on the calling thread.
use glow::HasContext;
use log::info;

use crate::gpu::{GpuBackend, PolygonMode, ShaderStage};

type Gl = glow::Context;

/// Callback provided by the windowing layer to make its context current
pub type MakeCurrent = Box<dyn FnMut() -> Result<(), String>>;

pub struct GlBackend {
    gl: Gl,
    make_current: MakeCurrent,
}

impl GlBackend {
    /// Wrap a loaded context. Depth testing is enabled and the driver
    /// version is logged once the context is current.
    pub fn new(gl: Gl, make_current: MakeCurrent) -> Result<Self, String> {
        let mut backend = Self { gl, make_current };
        backend.make_current()?;

        // SAFETY: the context was made current just above.
        unsafe {
            info!("OpenGL version: {}", backend.gl.get_parameter_string(glow::VERSION));
            info!(
                "GLSL version: {}",
                backend.gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION)
            );
            backend.gl.enable(glow::DEPTH_TEST);
        }
        Ok(backend)
    }
}

// SAFETY (for every `unsafe` block below): `GpuBackend` methods other than
// `make_current` are only reachable through `Current`, which guarantees the
// context is current, and every handle passed in was created by this
// context.
impl GpuBackend for GlBackend {
    type Shader = <Gl as HasContext>::Shader;
    type Program = <Gl as HasContext>::Program;
    type VertexArray = <Gl as HasContext>::VertexArray;
    type Buffer = <Gl as HasContext>::Buffer;
    type UniformLocation = <Gl as HasContext>::UniformLocation;

    fn make_current(&mut self) -> Result<(), String> {
        (self.make_current)()
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(kind) }
    }

    fn compile_shader(&mut self, shader: Self::Shader, source: &str) -> Result<(), String> {
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.gl.get_shader_info_log(shader))
            }
        }
    }

    fn delete_shader(&mut self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&mut self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&mut self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&mut self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&mut self, program: Self::Program) -> Result<(), String> {
        unsafe {
            self.gl.link_program(program);
            if self.gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.gl.get_program_info_log(program))
            }
        }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&mut self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn create_buffer(&mut self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn fill_vertex_buffer(
        &mut self,
        vertex_array: Self::VertexArray,
        buffer: Self::Buffer,
        data: &[f32],
        components: i32,
    ) {
        unsafe {
            self.gl.bind_vertex_array(Some(vertex_array));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            self.gl
                .vertex_attrib_pointer_f32(0, components, glow::FLOAT, false, 0, 0);
            self.gl.enable_vertex_attrib_array(0);
        }
    }

    fn fill_index_buffer(&mut self, vertex_array: Self::VertexArray, buffer: Self::Buffer, data: &[u32]) {
        unsafe {
            self.gl.bind_vertex_array(Some(vertex_array));
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
        }
    }

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn set_uniform_mat4(&mut self, location: &Self::UniformLocation, value: &[f32]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), false, value) }
    }

    fn set_viewport(&mut self, width: i32, height: i32) {
        unsafe { self.gl.viewport(0, 0, width, height) }
    }

    fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => glow::FILL,
            PolygonMode::Line => glow::LINE,
        };
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, mode) }
    }

    fn draw_triangles(&mut self, index_count: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_INT, 0)
        }
    }
}
