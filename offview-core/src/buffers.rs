/// GPU buffers mirroring a mesh.
///
/// A [`GpuBuffers`] holds at most one vertex array, vertex buffer and index
/// buffer. Uploading always releases the previous set first, and every
/// handle is emptied on release so a second [`GpuBuffers::destroy`] is a
/// no-op.
use log::debug;

use crate::error::UploadError;
use crate::gpu::{Current, GpuBackend};
use crate::mesh::Mesh;

/// Floats per vertex: homogeneous `x, y, z, w`.
pub const VERTEX_COMPONENTS: i32 = 4;

pub struct GpuBuffers<B: GpuBackend> {
    vertex_array: Option<B::VertexArray>,
    vertex_buffer: Option<B::Buffer>,
    index_buffer: Option<B::Buffer>,
    index_count: usize,
}

impl<B: GpuBackend> GpuBuffers<B> {
    /// An empty set holding no GPU objects.
    pub fn empty() -> Self {
        Self {
            vertex_array: None,
            vertex_buffer: None,
            index_buffer: None,
            index_count: 0,
        }
    }

    /// Allocate and fill buffers for `mesh`.
    pub fn create(gpu: &mut Current<'_, B>, mesh: &Mesh) -> Result<Self, UploadError> {
        let mut buffers = Self::empty();
        buffers.upload(gpu, mesh)?;
        Ok(buffers)
    }

    /// Replace the contents with `mesh`'s geometry.
    ///
    /// The existing objects are released before new ones are allocated. If
    /// an allocation fails, whatever was allocated is released again and the
    /// set is left empty.
    pub fn upload(&mut self, gpu: &mut Current<'_, B>, mesh: &Mesh) -> Result<(), UploadError> {
        self.destroy(gpu);

        if let Err(err) = self.allocate(gpu, mesh) {
            self.destroy(gpu);
            return Err(err);
        }

        debug!(
            "uploaded {} vertices and {} indices",
            mesh.num_vertices(),
            mesh.indices().len()
        );
        Ok(())
    }

    fn allocate(&mut self, gpu: &mut Current<'_, B>, mesh: &Mesh) -> Result<(), UploadError> {
        let vertex_array = gpu
            .create_vertex_array()
            .map_err(UploadError::AllocationFailed)?;
        self.vertex_array = Some(vertex_array);

        let vertex_buffer = gpu.create_buffer().map_err(UploadError::AllocationFailed)?;
        self.vertex_buffer = Some(vertex_buffer);
        gpu.fill_vertex_buffer(vertex_array, vertex_buffer, &mesh.vertex_data(), VERTEX_COMPONENTS);

        let index_buffer = gpu.create_buffer().map_err(UploadError::AllocationFailed)?;
        self.index_buffer = Some(index_buffer);
        gpu.fill_index_buffer(vertex_array, index_buffer, mesh.indices());

        gpu.bind_vertex_array(None);
        self.index_count = mesh.indices().len();
        Ok(())
    }

    pub fn vertex_array(&self) -> Option<B::VertexArray> {
        self.vertex_array
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_array.is_none() && self.vertex_buffer.is_none() && self.index_buffer.is_none()
    }

    /// Release every object. Idempotent.
    pub fn destroy(&mut self, gpu: &mut Current<'_, B>) {
        if let Some(buffer) = self.vertex_buffer.take() {
            gpu.delete_buffer(buffer);
        }
        if let Some(buffer) = self.index_buffer.take() {
            gpu.delete_buffer(buffer);
        }
        if let Some(vertex_array) = self.vertex_array.take() {
            gpu.delete_vertex_array(vertex_array);
        }
        self.index_count = 0;
    }
}
