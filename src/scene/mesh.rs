use serde::{Deserialize, Serialize};

/// CPU-side triangle mesh attached to a scene node.
///
/// Stagehand only ever draws meshes through its picking pipelines, so
/// positions and indices are all it keeps. GPU buffers are owned by the
/// picker's mesh cache and re-uploaded when `version` changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Triangle-list indices.
    pub indices: Vec<u32>,
    /// Bumped on every geometry edit; cache key for GPU uploads.
    pub version: u64,
}

impl Mesh {
    /// Axis-aligned cube centered on the origin with the given half-extent.
    #[must_use]
    pub fn cube(half: f32) -> Self {
        let positions = vec![
            [-half, -half, -half],
            [half, -half, -half],
            [half, half, -half],
            [-half, half, -half],
            [-half, -half, half],
            [half, -half, half],
            [half, half, half],
            [-half, half, half],
        ];
        // 12 triangles, outward-facing CCW winding
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 6, 2, 3, 7, 6, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Self {
            positions,
            indices,
            version: 0,
        }
    }

    /// Mark the geometry as edited so GPU caches re-upload it.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}
