/// Recording backend for tests: hands out integer handles, tracks which are
/// live, and keeps the state a draw call would observe.
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{GpuBackend, PolygonMode, ShaderStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockHandle(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockUniform {
    pub program: u32,
    pub name: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub created: usize,
    pub deleted: usize,
}

#[derive(Debug, Default)]
pub struct MockStats {
    pub context_lost: bool,
    pub fail_allocation: bool,
    pub fail_link: bool,
    pub make_current_calls: usize,

    pub shaders: Counter,
    pub programs: Counter,
    pub vertex_arrays: Counter,
    pub buffers: Counter,
    /// Deletes of handles that were never created or already deleted.
    pub invalid_deletes: usize,

    pub live_shaders: HashSet<u32>,
    pub live_programs: HashSet<u32>,
    pub live_vertex_arrays: HashSet<u32>,
    pub live_buffers: HashSet<u32>,
    /// Float or index count stored in each buffer.
    pub buffer_len: HashMap<u32, usize>,

    pub bound_program: Option<u32>,
    pub bound_vertex_array: Option<u32>,
    pub polygon_mode: Option<PolygonMode>,
    pub clear_color: Option<[f32; 4]>,
    pub viewport: Option<(i32, i32)>,
    pub uniforms: HashMap<String, Vec<f32>>,
    /// Index counts of issued draw calls.
    pub draws: Vec<i32>,

    next_id: u32,
    shader_sources: HashMap<u32, String>,
    attached: HashMap<u32, Vec<u32>>,
    program_uniforms: HashMap<u32, HashSet<String>>,
}

impl MockStats {
    fn next_handle(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn delete(live: &mut HashSet<u32>, counter: &mut Counter, invalid: &mut usize, id: u32) {
        if live.remove(&id) {
            counter.deleted += 1;
        } else {
            *invalid += 1;
        }
    }
}

/// Mock backend sharing its statistics with the test through an `Rc`.
pub struct MockGpu {
    stats: Rc<RefCell<MockStats>>,
}

impl MockGpu {
    pub fn new() -> Self {
        Self {
            stats: Rc::new(RefCell::new(MockStats::default())),
        }
    }

    pub fn stats(&self) -> &Rc<RefCell<MockStats>> {
        &self.stats
    }
}

/// Uniform names declared as `uniform <type> <name>;`.
fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("uniform"), Some(_), Some(name)) => Some(name.trim_end_matches(';').to_string()),
            _ => None,
        }
    })
}

impl GpuBackend for MockGpu {
    type Shader = MockHandle;
    type Program = MockHandle;
    type VertexArray = MockHandle;
    type Buffer = MockHandle;
    type UniformLocation = MockUniform;

    fn make_current(&mut self) -> Result<(), String> {
        let mut s = self.stats.borrow_mut();
        s.make_current_calls += 1;
        if s.context_lost {
            Err("context lost".to_string())
        } else {
            Ok(())
        }
    }

    fn create_shader(&mut self, _stage: ShaderStage) -> Result<MockHandle, String> {
        let mut s = self.stats.borrow_mut();
        let id = s.next_handle();
        s.shaders.created += 1;
        s.live_shaders.insert(id);
        Ok(MockHandle(id))
    }

    fn compile_shader(&mut self, shader: MockHandle, source: &str) -> Result<(), String> {
        let mut s = self.stats.borrow_mut();
        s.shader_sources.insert(shader.0, source.to_string());
        let balanced = source.matches('{').count() == source.matches('}').count();
        if source.contains("void main") && balanced {
            Ok(())
        } else {
            Err("0:1(1): error: syntax error, unexpected end of file".to_string())
        }
    }

    fn delete_shader(&mut self, shader: MockHandle) {
        let s = &mut *self.stats.borrow_mut();
        s.shader_sources.remove(&shader.0);
        MockStats::delete(&mut s.live_shaders, &mut s.shaders, &mut s.invalid_deletes, shader.0);
    }

    fn create_program(&mut self) -> Result<MockHandle, String> {
        let mut s = self.stats.borrow_mut();
        let id = s.next_handle();
        s.programs.created += 1;
        s.live_programs.insert(id);
        Ok(MockHandle(id))
    }

    fn attach_shader(&mut self, program: MockHandle, shader: MockHandle) {
        let mut s = self.stats.borrow_mut();
        s.attached.entry(program.0).or_default().push(shader.0);
    }

    fn detach_shader(&mut self, program: MockHandle, shader: MockHandle) {
        let mut s = self.stats.borrow_mut();
        if let Some(list) = s.attached.get_mut(&program.0) {
            list.retain(|&id| id != shader.0);
        }
    }

    fn link_program(&mut self, program: MockHandle) -> Result<(), String> {
        let s = &mut *self.stats.borrow_mut();
        if s.fail_link {
            return Err("error: linking failed".to_string());
        }
        let names: HashSet<String> = s
            .attached
            .get(&program.0)
            .into_iter()
            .flatten()
            .filter_map(|id| s.shader_sources.get(id))
            .flat_map(|src| declared_uniforms(src))
            .collect();
        s.program_uniforms.insert(program.0, names);
        Ok(())
    }

    fn delete_program(&mut self, program: MockHandle) {
        let s = &mut *self.stats.borrow_mut();
        s.attached.remove(&program.0);
        s.program_uniforms.remove(&program.0);
        if s.bound_program == Some(program.0) {
            s.bound_program = None;
        }
        MockStats::delete(&mut s.live_programs, &mut s.programs, &mut s.invalid_deletes, program.0);
    }

    fn use_program(&mut self, program: Option<MockHandle>) {
        self.stats.borrow_mut().bound_program = program.map(|p| p.0);
    }

    fn create_vertex_array(&mut self) -> Result<MockHandle, String> {
        let mut s = self.stats.borrow_mut();
        let id = s.next_handle();
        s.vertex_arrays.created += 1;
        s.live_vertex_arrays.insert(id);
        Ok(MockHandle(id))
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<MockHandle>) {
        self.stats.borrow_mut().bound_vertex_array = vertex_array.map(|v| v.0);
    }

    fn delete_vertex_array(&mut self, vertex_array: MockHandle) {
        let s = &mut *self.stats.borrow_mut();
        if s.bound_vertex_array == Some(vertex_array.0) {
            s.bound_vertex_array = None;
        }
        MockStats::delete(
            &mut s.live_vertex_arrays,
            &mut s.vertex_arrays,
            &mut s.invalid_deletes,
            vertex_array.0,
        );
    }

    fn create_buffer(&mut self) -> Result<MockHandle, String> {
        let mut s = self.stats.borrow_mut();
        if s.fail_allocation {
            return Err("out of memory".to_string());
        }
        let id = s.next_handle();
        s.buffers.created += 1;
        s.live_buffers.insert(id);
        Ok(MockHandle(id))
    }

    fn delete_buffer(&mut self, buffer: MockHandle) {
        let s = &mut *self.stats.borrow_mut();
        s.buffer_len.remove(&buffer.0);
        MockStats::delete(&mut s.live_buffers, &mut s.buffers, &mut s.invalid_deletes, buffer.0);
    }

    fn fill_vertex_buffer(&mut self, _vertex_array: MockHandle, buffer: MockHandle, data: &[f32], _components: i32) {
        self.stats.borrow_mut().buffer_len.insert(buffer.0, data.len());
    }

    fn fill_index_buffer(&mut self, _vertex_array: MockHandle, buffer: MockHandle, data: &[u32]) {
        self.stats.borrow_mut().buffer_len.insert(buffer.0, data.len());
    }

    fn uniform_location(&mut self, program: MockHandle, name: &str) -> Option<MockUniform> {
        let s = self.stats.borrow();
        s.program_uniforms
            .get(&program.0)
            .filter(|names| names.contains(name))
            .map(|_| MockUniform {
                program: program.0,
                name: name.to_string(),
            })
    }

    fn set_uniform_mat4(&mut self, location: &MockUniform, value: &[f32]) {
        self.stats
            .borrow_mut()
            .uniforms
            .insert(location.name.clone(), value.to_vec());
    }

    fn set_viewport(&mut self, width: i32, height: i32) {
        self.stats.borrow_mut().viewport = Some((width, height));
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.stats.borrow_mut().clear_color = Some(color);
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.stats.borrow_mut().polygon_mode = Some(mode);
    }

    fn draw_triangles(&mut self, index_count: i32) {
        self.stats.borrow_mut().draws.push(index_count);
    }
}
