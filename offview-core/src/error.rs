/// Error types for mesh loading, shader compilation and GPU uploads.
use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Location in an OFF document, used to report where parsing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The leading format tag.
    FormatTag,
    VertexCount,
    FaceCount,
    EdgeCount,
    /// Coordinate `axis` (0 = x) of vertex `vertex`.
    Coordinate { vertex: usize, axis: usize },
    /// Vertex count prefix of face `face`.
    FaceArity { face: usize },
    /// Corner `corner` of face `face`.
    FaceIndex { face: usize, corner: usize },
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::FormatTag => write!(f, "format tag"),
            Field::VertexCount => write!(f, "vertex count"),
            Field::FaceCount => write!(f, "face count"),
            Field::EdgeCount => write!(f, "edge count"),
            Field::Coordinate { vertex, axis } => {
                let name = ["x", "y", "z"].get(*axis).copied().unwrap_or("?");
                write!(f, "{} coordinate of vertex {}", name, vertex)
            }
            Field::FaceArity { face } => write!(f, "vertex count of face {}", face),
            Field::FaceIndex { face, corner } => {
                write!(f, "index {} of face {}", corner, face)
            }
        }
    }
}

/// Error type for mesh loading.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The mesh file could not be opened or read.
    #[error("cannot read mesh file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input ended before a declared record.
    #[error("mesh data ends before the {expected}")]
    Truncated { expected: Field },

    /// A token did not parse as the expected kind of value.
    #[error("invalid {field}: '{token}'")]
    Malformed { field: Field, token: String },

    /// The mesh declares zero vertices.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// The bounding box has no extent, so the mesh cannot be rescaled.
    #[error("mesh bounding box has zero or non-finite extent")]
    DegenerateGeometry,

    /// The normalization target is not a positive finite length.
    #[error("target diagonal must be positive and finite, got {0}")]
    InvalidTarget(f32),

    /// Only triangles are supported.
    #[error("face {face} has {arity} vertices, only triangles are supported")]
    NonTriangularFace { face: usize, arity: u32 },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// Error type for the graphics context itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
    /// The context could not be made current on this thread.
    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
}

/// Error type for shader program creation.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("vertex shader failed to compile:\n{0}")]
    VertexCompileFailed(String),

    #[error("fragment shader failed to compile:\n{0}")]
    FragmentCompileFailed(String),

    #[error("shader program failed to link:\n{0}")]
    LinkFailed(String),

    /// A shader source file could not be read.
    #[error("cannot read shader source '{path}': {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A shader set must contain at least one pair.
    #[error("no shader programs configured")]
    NoShaders,

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Error type for GPU buffer uploads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("GPU allocation failed: {0}")]
    AllocationFailed(String),
}

/// Any failure surfaced through the viewer.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

/// Result type alias for viewer operations.
pub type ViewerResult<T> = Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_display() {
        let field = Field::Coordinate { vertex: 3, axis: 1 };
        assert_eq!(field.to_string(), "y coordinate of vertex 3");

        let err = LoadError::Truncated {
            expected: Field::FaceIndex { face: 0, corner: 2 },
        };
        assert_eq!(err.to_string(), "mesh data ends before the index 2 of face 0");
    }
}
