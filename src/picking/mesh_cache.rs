use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::scene::{Mesh, NodeId};

/// GPU-resident copy of a node's mesh.
pub struct GpuMesh {
    /// Tightly-packed `[f32; 3]` positions.
    pub vertex_buffer: wgpu::Buffer,
    /// `u32` triangle indices.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
    version: u64,
}

/// Per-node cache of uploaded meshes, invalidated by mesh version.
///
/// Scene nodes keep their geometry on the CPU side so they stay cheap to
/// clone and serialize; the picker uploads lazily through this cache.
#[derive(Default)]
pub struct MeshCache {
    meshes: FxHashMap<NodeId, GpuMesh>,
}

impl MeshCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meshes: FxHashMap::default(),
        }
    }

    /// The GPU mesh for `node`, uploading (or re-uploading after a version
    /// bump) as needed.
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        node: NodeId,
        mesh: &Mesh,
    ) -> &GpuMesh {
        let stale = self
            .meshes
            .get(&node)
            .is_none_or(|cached| cached.version != mesh.version);
        if stale {
            let vertex_buffer = device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Pick Vertex Buffer"),
                    contents: bytemuck::cast_slice(&mesh.positions),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );
            let index_buffer = device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Pick Index Buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            );
            let _ = self.meshes.insert(
                node,
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                    version: mesh.version,
                },
            );
        }
        &self.meshes[&node]
    }

    /// The cached mesh for `node`, if uploaded.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&GpuMesh> {
        self.meshes.get(&node)
    }

    /// Drop cached meshes for nodes no longer in the scene.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.meshes.retain(|&node, _| keep(node));
    }

    /// Number of cached meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
