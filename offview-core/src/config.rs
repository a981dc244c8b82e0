/// Viewer configuration
use crate::camera::CameraConfig;
use crate::mesh::LoadOptions;
use crate::renderer::RenderSettings;

/// Settings a [`crate::Viewer`] starts with.
///
/// Every field has a working default; override only what the host needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Normalization target and shader programs for loaded meshes.
    pub load: LoadOptions,

    /// Look-at geometry and projection parameters.
    pub camera: CameraConfig,

    /// Viewport size until the first resize event arrives.
    pub initial_size: (u32, u32),

    /// Wireframe and background state at startup.
    pub render: RenderSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            camera: CameraConfig::default(),
            initial_size: (800, 600),
            render: RenderSettings::default(),
        }
    }
}
