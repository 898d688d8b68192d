//! Edge-based quality checks on triangle meshes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::TriangleMesh;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshValidation {
    /// Edges used by exactly one triangle.
    pub boundary_edges: usize,
    /// Edges shared by more than two triangles.
    pub non_manifold_edges: usize,
    /// Edges walked in the same direction by both of their triangles.
    pub inconsistent_edges: usize,
    pub signed_volume: f64,
}

impl MeshValidation {
    pub fn is_watertight(&self) -> bool {
        self.boundary_edges == 0 && self.non_manifold_edges == 0
    }

    /// Closed, consistently wound and enclosing a positive volume.
    pub fn is_printable(&self) -> bool {
        self.is_watertight() && self.inconsistent_edges == 0 && self.signed_volume > 0.0
    }
}

pub fn validate_mesh(mesh: &TriangleMesh) -> MeshValidation {
    // Undirected edge -> (uses, uses walked low-to-high).
    let mut edges: HashMap<(u32, u32), (usize, usize)> = HashMap::new();
    let mut volume = 0.0;

    for [a, b, c] in mesh.triangles() {
        for (from, to) in [(a, b), (b, c), (c, a)] {
            let entry = edges.entry((from.min(to), from.max(to))).or_default();
            entry.0 += 1;
            if from < to {
                entry.1 += 1;
            }
        }
        let (p0, p1, p2) = (mesh.position(a), mesh.position(b), mesh.position(c));
        volume += p0.to_vec3().dot(&p1.to_vec3().cross(&p2.to_vec3())) / 6.0;
    }

    let mut report = MeshValidation {
        signed_volume: volume,
        ..MeshValidation::default()
    };
    for (uses, forward) in edges.into_values() {
        match uses {
            1 => report.boundary_edges += 1,
            2 if forward != 1 => report.inconsistent_edges += 1,
            2 => {}
            _ => report.non_manifold_edges += 1,
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::unit_cube;
    use crate::triangulate;
    use approx::assert_relative_eq;
    use procmesh_kernel::MeshBatch;

    #[test]
    fn test_cube_is_printable() {
        let report = validate_mesh(&triangulate(&unit_cube()));
        assert!(report.is_watertight());
        assert!(report.is_printable());
        assert_relative_eq!(report.signed_volume, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_open_cube_has_boundary() {
        let mut cube = unit_cube();
        cube.faces.pop();
        let report = validate_mesh(&triangulate(&cube));
        assert_eq!(report.boundary_edges, 4);
        assert!(!report.is_watertight());
    }

    #[test]
    fn test_flipped_face_detected() {
        let mut cube = unit_cube();
        cube.faces[0].reverse();
        let report = validate_mesh(&triangulate(&cube));
        assert!(report.is_watertight());
        assert_eq!(report.inconsistent_edges, 4);
        assert!(!report.is_printable());
    }

    #[test]
    fn test_empty_mesh() {
        let report = validate_mesh(&triangulate(&MeshBatch::default()));
        assert!(report.is_watertight());
        assert!(!report.is_printable());
    }
}
