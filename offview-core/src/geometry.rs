/// Bounding geometry and normalization for homogeneous point sets
use nalgebra::{Point3, Vector3, Vector4};

use crate::error::LoadError;

/// Bounding diagonal a mesh is rescaled to after loading
pub const TARGET_DIAGONAL: f32 = 2.5;

/// Axis-aligned bounding box with its derived centroid and diagonal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
    pub centroid: Point3<f32>,
    pub diagonal: f32,
}

impl BoundingBox {
    /// Compute the bounding box of `vertices` in a single pass.
    ///
    /// The `w` component is ignored. An empty slice has no meaningful box and
    /// is rejected.
    pub fn compute(vertices: &[Vector4<f32>]) -> Result<Self, LoadError> {
        if vertices.is_empty() {
            return Err(LoadError::EmptyMesh);
        }

        let mut min = Vector3::repeat(f32::MAX);
        let mut max = Vector3::repeat(f32::MIN);
        for v in vertices {
            let p = v.xyz();
            min = min.inf(&p);
            max = max.sup(&p);
        }

        Ok(Self {
            min: Point3::from(min),
            max: Point3::from(max),
            centroid: Point3::from((min + max) / 2.0),
            diagonal: (max - min).norm(),
        })
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Center `vertices` on the origin and scale them uniformly so the bounding
/// diagonal equals `target`. Returns the refreshed bounding box.
///
/// `target` must be positive and finite, otherwise this fails with
/// [`LoadError::InvalidTarget`]. A zero (or overflowing) diagonal cannot be
/// rescaled and fails with [`LoadError::DegenerateGeometry`]. `vertices` is
/// left untouched on either error.
pub fn normalize(vertices: &mut [Vector4<f32>], target: f32) -> Result<BoundingBox, LoadError> {
    if !(target.is_finite() && target > 0.0) {
        return Err(LoadError::InvalidTarget(target));
    }

    let bbox = BoundingBox::compute(vertices)?;
    if !(bbox.diagonal.is_finite() && bbox.diagonal > 0.0) {
        return Err(LoadError::DegenerateGeometry);
    }

    let scale = target / bbox.diagonal;
    let offset = bbox.centroid.coords;
    for v in vertices.iter_mut() {
        let p = (v.xyz() - offset) * scale;
        *v = p.push(1.0);
    }

    BoundingBox::compute(vertices)
}
