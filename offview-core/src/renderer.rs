/// Per-frame draw orchestration and ownership of the mesh's GPU resources.
use log::{debug, trace, warn};

use crate::buffers::GpuBuffers;
use crate::camera::Camera;
use crate::error::{GpuError, ShaderError, ViewerResult};
use crate::gpu::{Current, GpuBackend, PolygonMode};
use crate::mesh::Mesh;
use crate::shader::Programs;

/// Clear colour behind the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    Light,
    Dark,
}

impl Background {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Background::Dark
        } else {
            Background::Light
        }
    }

    pub fn color(self) -> [f32; 4] {
        match self {
            Background::Light => [1.0, 1.0, 1.0, 1.0],
            Background::Dark => [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// User toggles that affect drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSettings {
    pub wireframe: bool,
    pub background: Background,
}

/// Buffers and programs belonging to one mesh
struct MeshResources<B: GpuBackend> {
    buffers: GpuBuffers<B>,
    programs: Programs<B>,
}

impl<B: GpuBackend> MeshResources<B> {
    fn create(gpu: &mut Current<'_, B>, mesh: &Mesh) -> ViewerResult<Self> {
        let mut programs = Programs::compile(gpu, mesh.shaders())?;
        let buffers = match GpuBuffers::create(gpu, mesh) {
            Ok(buffers) => buffers,
            Err(err) => {
                programs.destroy(gpu);
                return Err(err.into());
            }
        };
        Ok(Self { buffers, programs })
    }

    fn destroy(&mut self, gpu: &mut Current<'_, B>) {
        self.buffers.destroy(gpu);
        self.programs.destroy(gpu);
    }
}

/// Owns the backend and the GPU mirror of the current mesh.
///
/// All GPU resources are released on drop, provided the context can still be
/// made current.
pub struct Renderer<B: GpuBackend> {
    gpu: B,
    resources: Option<MeshResources<B>>,
}

impl<B: GpuBackend> Renderer<B> {
    pub fn new(gpu: B) -> Self {
        Self {
            gpu,
            resources: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.gpu
    }

    /// Whether a mesh has been uploaded
    pub fn has_mesh(&self) -> bool {
        self.resources.is_some()
    }

    /// Upload `mesh` and compile its programs, then release the previous
    /// mesh's resources.
    ///
    /// The new resources are built in full before anything is released, so
    /// on error the previous mesh stays uploaded and nothing new is left
    /// allocated.
    pub fn replace_mesh(&mut self, mesh: &Mesh) -> ViewerResult<()> {
        let mut ctx = Current::acquire(&mut self.gpu)?;
        let fresh = MeshResources::create(&mut ctx, mesh)?;
        if let Some(mut previous) = self.resources.replace(fresh) {
            previous.destroy(&mut ctx);
            debug!("released previous mesh resources");
        }
        Ok(())
    }

    /// Rebuild the programs of the uploaded mesh from `mesh`'s shader set.
    ///
    /// On failure the previous programs stay in place.
    pub fn reload_shaders(&mut self, mesh: &Mesh) -> Result<(), ShaderError> {
        let mut ctx = Current::acquire(&mut self.gpu)?;
        let Some(resources) = self.resources.as_mut() else {
            return Ok(());
        };

        let programs = Programs::compile(&mut ctx, mesh.shaders())?;
        let mut previous = std::mem::replace(&mut resources.programs, programs);
        previous.destroy(&mut ctx);
        Ok(())
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), GpuError> {
        let mut ctx = Current::acquire(&mut self.gpu)?;
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        ctx.set_viewport(clamp(width), clamp(height));
        Ok(())
    }

    /// Draw one frame. With nothing uploaded only the clear happens.
    pub fn render(
        &mut self,
        mesh: Option<&Mesh>,
        camera: &Camera,
        settings: &RenderSettings,
    ) -> Result<(), GpuError> {
        let mut ctx = Current::acquire(&mut self.gpu)?;
        ctx.clear(settings.background.color());

        let (Some(mesh), Some(resources)) = (mesh, self.resources.as_ref()) else {
            return Ok(());
        };
        let Some(vertex_array) = resources.buffers.vertex_array() else {
            return Ok(());
        };
        let Some(program) = resources.programs.get(mesh.active_shader()) else {
            warn!("no program for shader slot {}", mesh.active_shader().index());
            return Ok(());
        };

        ctx.set_polygon_mode(if settings.wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        });

        ctx.bind_vertex_array(Some(vertex_array));
        ctx.use_program(Some(program));

        let uniforms = [
            ("model", mesh.model_matrix()),
            ("view", camera.view_matrix()),
            ("projection", camera.projection_matrix()),
        ];
        for (name, matrix) in uniforms {
            match ctx.uniform_location(program, name) {
                Some(location) => ctx.set_uniform_mat4(&location, matrix.as_slice()),
                None => trace!("uniform '{}' not found in active program, skipped", name),
            }
        }

        let count = i32::try_from(resources.buffers.index_count()).unwrap_or(i32::MAX);
        ctx.draw_triangles(count);
        Ok(())
    }

    /// Release the uploaded mesh's resources. Idempotent.
    pub fn release(&mut self) -> Result<(), GpuError> {
        let Some(resources) = self.resources.as_mut() else {
            return Ok(());
        };
        let mut ctx = Current::acquire(&mut self.gpu)?;
        resources.destroy(&mut ctx);
        self.resources = None;
        Ok(())
    }
}

impl<B: GpuBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        let Some(mut resources) = self.resources.take() else {
            return;
        };
        match Current::acquire(&mut self.gpu) {
            Ok(mut ctx) => resources.destroy(&mut ctx),
            Err(err) => warn!("leaking GPU resources on drop: {}", err),
        }
    }
}
