/// offview core library - mesh loading, camera and GPU resource lifecycle
///
/// This library provides everything below the windowing layer of the viewer:
/// OFF parsing and normalization, the view/projection camera, shader program
/// and buffer management, and per-frame rendering through a pluggable
/// graphics backend.

pub mod buffers;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gl;
pub mod gpu;
pub mod logging;
pub mod mesh;
pub mod off;
pub mod renderer;
pub mod shader;
pub mod viewer;

// Re-export commonly used types
pub use camera::{Camera, CameraConfig, ProjectionMode};
pub use config::ViewerConfig;
pub use error::{GpuError, LoadError, ShaderError, UploadError, ViewerError, ViewerResult};
pub use geometry::{BoundingBox, TARGET_DIAGONAL};
pub use gl::GlBackend;
pub use gpu::{Current, GpuBackend};
pub use mesh::{LoadOptions, Mesh};
pub use renderer::{Background, RenderSettings, Renderer};
pub use shader::{ShaderPair, ShaderSet, ShaderSlot};
pub use viewer::Viewer;
