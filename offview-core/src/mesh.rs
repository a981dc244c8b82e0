/// Triangle mesh loaded from OFF data and normalized for display
use std::fs;
use std::path::Path;

use log::{debug, info};
use nalgebra::{Matrix4, Vector4};

use crate::error::LoadError;
use crate::geometry::{self, BoundingBox, TARGET_DIAGONAL};
use crate::off::{self, OffData};
use crate::shader::{ShaderSet, ShaderSlot};

/// Settings applied to every mesh as it is loaded
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Bounding diagonal the mesh is rescaled to.
    pub target_diagonal: f32,
    /// Programs the mesh is drawn with; the first is active.
    pub shaders: ShaderSet,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            target_diagonal: TARGET_DIAGONAL,
            shaders: ShaderSet::default(),
        }
    }
}

/// A normalized triangle mesh.
///
/// Vertices are homogeneous points (`w == 1`) centered on the origin with a
/// bounding diagonal of `target_diagonal`. Every three indices form one
/// triangle and every index is in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vector4<f32>>,
    indices: Vec<u32>,
    bounding_box: BoundingBox,
    model_matrix: Matrix4<f32>,
    shaders: ShaderSet,
}

impl Mesh {
    /// Load an OFF file with default options
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with(path, &LoadOptions::default())
    }

    pub fn load_with(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let mesh = Self::parse_with(&text, options)?;
        info!(
            "loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.num_vertices(),
            mesh.num_faces()
        );
        Ok(mesh)
    }

    /// Parse OFF text with default options
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        Self::parse_with(text, &LoadOptions::default())
    }

    pub fn parse_with(text: &str, options: &LoadOptions) -> Result<Self, LoadError> {
        Self::from_off(off::parse_off(text)?, options)
    }

    /// Normalize already parsed geometry into a mesh
    pub fn from_off(data: OffData, options: &LoadOptions) -> Result<Self, LoadError> {
        let OffData {
            mut vertices,
            indices,
        } = data;
        let bounding_box = geometry::normalize(&mut vertices, options.target_diagonal)?;
        debug!(
            "normalized mesh: diagonal {:.4}, centroid {:?}",
            bounding_box.diagonal, bounding_box.centroid
        );

        Ok(Self {
            vertices,
            indices,
            bounding_box,
            model_matrix: Matrix4::identity(),
            shaders: options.shaders.clone(),
        })
    }

    /// Rescale to a new target diagonal. The model matrix is reset.
    pub fn normalize(&mut self, target_diagonal: f32) -> Result<(), LoadError> {
        self.bounding_box = geometry::normalize(&mut self.vertices, target_diagonal)?;
        self.model_matrix = Matrix4::identity();
        Ok(())
    }

    pub fn vertices(&self) -> &[Vector4<f32>] {
        &self.vertices
    }

    /// Vertices as a flat `x, y, z, w` float array, ready for upload
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.iter().copied()).collect()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn model_matrix(&self) -> &Matrix4<f32> {
        &self.model_matrix
    }

    pub fn set_model_matrix(&mut self, model: Matrix4<f32>) {
        self.model_matrix = model;
    }

    pub fn shaders(&self) -> &ShaderSet {
        &self.shaders
    }

    pub fn active_shader(&self) -> ShaderSlot {
        self.shaders.active()
    }

    /// Draw with the program at `index`. Returns false if there is none.
    pub fn select_shader(&mut self, index: usize) -> bool {
        match self.shaders.slot(index) {
            Some(slot) => self.shaders.select(slot),
            None => false,
        }
    }

    /// Human-readable summary for a status bar
    pub fn status_line(&self) -> String {
        format!("Vertices: {}, Faces: {}", self.num_vertices(), self.num_faces())
    }
}
