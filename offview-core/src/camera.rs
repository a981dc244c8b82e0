/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub fn from_orthographic(ortho: bool) -> Self {
        if ortho {
            ProjectionMode::Orthographic
        } else {
            ProjectionMode::Perspective
        }
    }
}

/// Fixed look-at geometry and projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub eye: Point3<f32>,
    pub center: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Orthographic volume spans `[-depth, depth]` along the view axis
    pub ortho_depth: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 3.0),
            center: Point3::origin(),
            up: Vector3::y(),
            fov_degrees: 60.0,
            near: 1.0,
            far: 10.0,
            ortho_depth: 4.0,
        }
    }
}

/// Camera with a static view and a projection tracking the viewport.
///
/// The projection matrix is rebuilt eagerly whenever the viewport or the
/// projection mode changes, so readers always see a current matrix.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    mode: ProjectionMode,
    width: u32,
    height: u32,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(CameraConfig::default(), width, height)
    }

    pub fn with_config(config: CameraConfig, width: u32, height: u32) -> Self {
        let view = Matrix4::look_at_rh(&config.eye, &config.center, &config.up);
        let mut camera = Self {
            config,
            mode: ProjectionMode::default(),
            width: 1,
            height: 1,
            view,
            projection: Matrix4::identity(),
        };
        camera.resize(width, height);
        camera
    }

    /// Track a new viewport size. Zero dimensions are clamped to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.update_projection();
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.update_projection();
        }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The view matrix (camera transformation)
    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }

    fn update_projection(&mut self) {
        let aspect = self.aspect();
        self.projection = match self.mode {
            ProjectionMode::Perspective => Matrix4::new_perspective(
                aspect,
                self.config.fov_degrees.to_radians(),
                self.config.near,
                self.config.far,
            ),
            ProjectionMode::Orthographic => Matrix4::new_orthographic(
                -aspect,
                aspect,
                -1.0,
                1.0,
                -self.config.ortho_depth,
                self.config.ortho_depth,
            ),
        };
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
