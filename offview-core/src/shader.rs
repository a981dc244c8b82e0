/// Shader sources and GPU program lifecycle
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::error::ShaderError;
use crate::gpu::{Current, GpuBackend, ShaderStage};

const ZDEPTH_VERTEX: &str = include_str!("../shaders/vzdepth.glsl");
const ZDEPTH_FRAGMENT: &str = include_str!("../shaders/fzdepth.glsl");

/// Where the GLSL text of one shader stage comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderCode {
    /// Source compiled into the binary
    Builtin {
        name: &'static str,
        source: &'static str,
    },
    /// Source read from disk each time programs are built
    File(PathBuf),
}

impl ShaderCode {
    pub fn read(&self) -> Result<Cow<'static, str>, ShaderError> {
        match self {
            ShaderCode::Builtin { source, .. } => Ok(Cow::Borrowed(*source)),
            ShaderCode::File(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| ShaderError::SourceUnreadable {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

impl fmt::Display for ShaderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderCode::Builtin { name, .. } => write!(f, "builtin:{}", name),
            ShaderCode::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Vertex and fragment sources linked into one program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPair {
    pub vertex: ShaderCode,
    pub fragment: ShaderCode,
}

impl ShaderPair {
    /// Grayscale shading by eye-space depth
    pub fn zdepth() -> Self {
        Self {
            vertex: ShaderCode::Builtin {
                name: "vzdepth",
                source: ZDEPTH_VERTEX,
            },
            fragment: ShaderCode::Builtin {
                name: "fzdepth",
                source: ZDEPTH_FRAGMENT,
            },
        }
    }

    pub fn from_files(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: ShaderCode::File(vertex.into()),
            fragment: ShaderCode::File(fragment.into()),
        }
    }
}

/// Index into a [`ShaderSet`], only handed out for indices that exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderSlot(usize);

impl ShaderSlot {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered, non-empty list of shader pairs plus the one drawn with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSet {
    pairs: Vec<ShaderPair>,
    active: ShaderSlot,
}

impl ShaderSet {
    pub fn new(pairs: Vec<ShaderPair>) -> Result<Self, ShaderError> {
        if pairs.is_empty() {
            return Err(ShaderError::NoShaders);
        }
        Ok(Self {
            pairs,
            active: ShaderSlot(0),
        })
    }

    pub fn pairs(&self) -> &[ShaderPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<ShaderSlot> {
        (index < self.pairs.len()).then_some(ShaderSlot(index))
    }

    pub fn active(&self) -> ShaderSlot {
        self.active
    }

    /// Make `slot` the active program. Returns false for a slot taken from a
    /// larger set.
    pub fn select(&mut self, slot: ShaderSlot) -> bool {
        if slot.0 < self.pairs.len() {
            self.active = slot;
            true
        } else {
            false
        }
    }
}

impl Default for ShaderSet {
    fn default() -> Self {
        Self {
            pairs: vec![ShaderPair::zdepth()],
            active: ShaderSlot(0),
        }
    }
}

/// A linked program. The handle is released by [`Program::destroy`].
pub struct Program<B: GpuBackend> {
    raw: Option<B::Program>,
}

impl<B: GpuBackend> Program<B> {
    pub fn raw(&self) -> Option<B::Program> {
        self.raw
    }

    pub fn is_live(&self) -> bool {
        self.raw.is_some()
    }

    /// Release the program. Calling it again is a no-op.
    pub fn destroy(&mut self, gpu: &mut Current<'_, B>) {
        if let Some(program) = self.raw.take() {
            gpu.delete_program(program);
        }
    }
}

fn compile_stage<B: GpuBackend>(
    gpu: &mut Current<'_, B>,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, String> {
    let shader = gpu.create_shader(stage)?;
    if let Err(log) = gpu.compile_shader(shader, source) {
        gpu.delete_shader(shader);
        return Err(log);
    }
    Ok(shader)
}

/// Compile both stages and link them.
///
/// Every failure path releases the shader and program objects it created, so
/// an error leaves nothing allocated. On success the shader objects are
/// detached and released; the program keeps the compiled code.
pub fn compile_program<B: GpuBackend>(
    gpu: &mut Current<'_, B>,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<Program<B>, ShaderError> {
    let vertex = compile_stage(gpu, ShaderStage::Vertex, vertex_source)
        .map_err(ShaderError::VertexCompileFailed)?;

    let fragment = match compile_stage(gpu, ShaderStage::Fragment, fragment_source) {
        Ok(shader) => shader,
        Err(log) => {
            gpu.delete_shader(vertex);
            return Err(ShaderError::FragmentCompileFailed(log));
        }
    };

    let program = match gpu.create_program() {
        Ok(program) => program,
        Err(reason) => {
            gpu.delete_shader(vertex);
            gpu.delete_shader(fragment);
            return Err(ShaderError::LinkFailed(reason));
        }
    };

    gpu.attach_shader(program, vertex);
    gpu.attach_shader(program, fragment);
    let linked = gpu.link_program(program);

    gpu.detach_shader(program, vertex);
    gpu.detach_shader(program, fragment);
    gpu.delete_shader(vertex);
    gpu.delete_shader(fragment);

    if let Err(log) = linked {
        gpu.delete_program(program);
        return Err(ShaderError::LinkFailed(log));
    }

    Ok(Program { raw: Some(program) })
}

/// One compiled program per pair of a [`ShaderSet`], in the same order
pub struct Programs<B: GpuBackend> {
    programs: Vec<Program<B>>,
}

impl<B: GpuBackend> Programs<B> {
    /// Build every program of `set`. If any pair fails, the programs already
    /// built are released before the error is returned.
    pub fn compile(gpu: &mut Current<'_, B>, set: &ShaderSet) -> Result<Self, ShaderError> {
        let mut built = Self {
            programs: Vec::with_capacity(set.len()),
        };

        for (index, pair) in set.pairs().iter().enumerate() {
            let program = pair
                .vertex
                .read()
                .and_then(|vs| Ok((vs, pair.fragment.read()?)))
                .and_then(|(vs, fs)| compile_program(gpu, &vs, &fs));

            match program {
                Ok(program) => {
                    debug!("compiled shader program {} ({} + {})", index, pair.vertex, pair.fragment);
                    built.programs.push(program);
                }
                Err(err) => {
                    warn!("shader program {} ({} + {}) failed: {}", index, pair.vertex, pair.fragment, err);
                    built.destroy(gpu);
                    return Err(err);
                }
            }
        }

        Ok(built)
    }

    pub fn get(&self, slot: ShaderSlot) -> Option<B::Program> {
        self.programs.get(slot.index()).and_then(Program::raw)
    }

    /// Release every program. Idempotent.
    pub fn destroy(&mut self, gpu: &mut Current<'_, B>) {
        for program in &mut self.programs {
            program.destroy(gpu);
        }
    }
}
