/// Facade consumed by the windowing layer.
///
/// The viewer is the single owner of the loaded mesh. Menu actions, toggles
/// and resize events map one-to-one onto its methods; the render path only
/// borrows the mesh for the duration of a frame.
use std::path::Path;

use log::{info, warn};

use crate::camera::{Camera, ProjectionMode};
use crate::config::ViewerConfig;
use crate::error::{GpuError, ShaderError, ViewerResult};
use crate::gpu::GpuBackend;
use crate::mesh::Mesh;
use crate::renderer::{Background, RenderSettings, Renderer};

pub struct Viewer<B: GpuBackend> {
    renderer: Renderer<B>,
    camera: Camera,
    mesh: Option<Mesh>,
    settings: RenderSettings,
    config: ViewerConfig,
}

impl<B: GpuBackend> Viewer<B> {
    /// Create a viewer with nothing loaded.
    pub fn new(gpu: B, config: ViewerConfig) -> Result<Self, GpuError> {
        let (width, height) = config.initial_size;
        let mut renderer = Renderer::new(gpu);
        renderer.set_viewport(width.max(1), height.max(1))?;

        Ok(Self {
            renderer,
            camera: Camera::with_config(config.camera, width, height),
            mesh: None,
            settings: config.render,
            config,
        })
    }

    /// Load `path` and make it the displayed mesh.
    ///
    /// Returns the status line for the new mesh. On any error the previously
    /// displayed mesh stays in place.
    pub fn load_mesh_from_file(&mut self, path: impl AsRef<Path>) -> ViewerResult<String> {
        let path = path.as_ref();
        let mesh = Mesh::load_with(path, &self.config.load).inspect_err(|err| {
            warn!("failed to load {}: {}", path.display(), err);
        })?;
        self.replace_mesh(mesh)?;

        let status = self.status().unwrap_or_default();
        info!("{}", status);
        Ok(status)
    }

    /// Upload `mesh` and take ownership of it, releasing the previous mesh's
    /// GPU resources.
    pub fn replace_mesh(&mut self, mesh: Mesh) -> ViewerResult<()> {
        self.renderer.replace_mesh(&mesh)?;
        self.mesh = Some(mesh);
        Ok(())
    }

    /// Drop the displayed mesh and its GPU resources.
    pub fn clear_mesh(&mut self) -> Result<(), GpuError> {
        self.renderer.release()?;
        self.mesh = None;
        Ok(())
    }

    pub fn set_wireframe(&mut self, wireframe: bool) {
        self.settings.wireframe = wireframe;
    }

    pub fn set_orthographic(&mut self, ortho: bool) {
        self.camera.set_mode(ProjectionMode::from_orthographic(ortho));
    }

    pub fn set_dark_background(&mut self, dark: bool) {
        self.settings.background = Background::from_dark(dark);
    }

    /// Draw with the shader program at `index` of the mesh's shader set.
    /// Returns false when no mesh is loaded or the index does not exist.
    pub fn select_shader(&mut self, index: usize) -> bool {
        self.mesh
            .as_mut()
            .is_some_and(|mesh| mesh.select_shader(index))
    }

    /// Recompile the displayed mesh's programs, e.g. after editing shader
    /// files. The running programs are kept if compilation fails.
    pub fn reload_shaders(&mut self) -> Result<(), ShaderError> {
        match &self.mesh {
            Some(mesh) => self.renderer.reload_shaders(mesh),
            None => Ok(()),
        }
    }

    /// Track a new viewport size. Zero dimensions are clamped to 1.
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) -> Result<(), GpuError> {
        self.camera.resize(width, height);
        let (width, height) = self.camera.viewport();
        self.renderer.set_viewport(width, height)
    }

    /// Draw one frame. With nothing loaded this only clears.
    pub fn render(&mut self) -> Result<(), GpuError> {
        self.renderer
            .render(self.mesh.as_ref(), &self.camera, &self.settings)
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Status bar text for the displayed mesh
    pub fn status(&self) -> Option<String> {
        self.mesh.as_ref().map(Mesh::status_line)
    }
}
