pub mod export;
pub mod validate;

pub use export::{ExportError, StlFormat, mesh_to_obj, mesh_to_stl, write_obj, write_stl};
pub use validate::{MeshValidation, validate_mesh};

use procmesh_kernel::geometry::point::Point3d;
use procmesh_kernel::geometry::vector::Vec3;
use procmesh_kernel::MeshBatch;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions [x, y, z, x, y, z, ...]
    pub positions: Vec<f32>,
    /// Vertex normals [nx, ny, nz, ...]
    pub normals: Vec<f32>,
    /// Triangle indices [i0, i1, i2, ...]
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn add_vertex(&mut self, pos: Point3d, normal: Vec3) -> u32 {
        let idx = self.vertex_count() as u32;
        self.positions
            .extend([pos.x as f32, pos.y as f32, pos.z as f32]);
        self.normals
            .extend([normal.x as f32, normal.y as f32, normal.z as f32]);
        idx
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend([i0, i1, i2]);
    }

    pub fn position(&self, index: u32) -> Point3d {
        let i = index as usize * 3;
        Point3d::new(
            self.positions[i] as f64,
            self.positions[i + 1] as f64,
            self.positions[i + 2] as f64,
        )
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&idx| idx + offset));
    }
}

/// Unnormalised normal of a polygon (Newell's method).
pub fn polygon_normal(points: &[Point3d]) -> Vec3 {
    let mut n = Vec3::ZERO;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

/// Fan-triangulate every polygon of `batch`. Vertices stay shared; each
/// vertex normal is the area-weighted sum of its polygons' normals.
///
/// Faces with fewer than 3 indices or an index outside the batch are
/// skipped; run [`MeshBatch::validate`] first to reject them instead.
pub fn triangulate(batch: &MeshBatch) -> TriangleMesh {
    let vertex_count = batch.vertex_count();
    let mut normals = vec![Vec3::ZERO; vertex_count];
    let mut mesh = TriangleMesh::new();
    let mut skipped = 0;

    for face in &batch.faces {
        if face.len() < 3 || face.iter().any(|&i| i >= vertex_count) {
            skipped += 1;
            continue;
        }
        let points: Vec<Point3d> = face.iter().map(|&i| batch.vertices[i]).collect();
        let n = polygon_normal(&points);
        for &i in face {
            normals[i] = normals[i] + n;
        }
        // Fan triangulation (works for convex polygons)
        for i in 1..face.len() - 1 {
            mesh.add_triangle(face[0] as u32, face[i] as u32, face[i + 1] as u32);
        }
    }

    let indices = std::mem::take(&mut mesh.indices);
    for (p, n) in batch.vertices.iter().zip(&normals) {
        mesh.add_vertex(*p, n.normalize_or(Vec3::Z));
    }
    mesh.indices = indices;
    debug!(
        polygons = batch.face_count(),
        skipped,
        triangles = mesh.triangle_count(),
        "mesh triangulated"
    );
    mesh
}
