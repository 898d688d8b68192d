use procmesh_kernel::mesh::faces::{Winding, build_face_list_quads, mirror_append};
use procmesh_kernel::mesh::sweep::{Profile, sweep_profile};
use procmesh_kernel::{Axis, MeshBatch, MeshError};

use crate::config::DIVISIONS;
use crate::heads::{hex_spin, hex_top_rows};

/// Hex nut body spanning z = 0 down to `-height`. Returns the mesh and the
/// chamfer radius, which sizes the nylon ring of a lock nut.
pub fn hex_nut(flat: f64, hole_dia: f64, height: f64) -> (MeshBatch, f64) {
    let half_flat = flat / 2.0;
    let bevel_radius = half_flat - 0.05;

    let verts = hex_top_rows(hole_dia * 0.5, half_flat, bevel_radius, -height / 2.0);
    let faces = build_face_list_quads(0, 3, verts.len() / 4 - 1, Winding::Default);
    let mut slice = MeshBatch::new(verts, faces);
    let mid = slice.lowest_z().unwrap_or(0.0).min(0.0);
    mirror_append(&mut slice, Axis::Z, mid);
    (hex_spin(slice), bevel_radius)
}

struct NylonDims {
    edge: f64,
    rad1: f64,
    overall: f64,
}

impl NylonDims {
    // Proportions of a 4.75 mm reference ring.
    fn new(radius: f64) -> Self {
        Self {
            edge: radius * (0.4 / 4.75),
            rad1: radius * (0.5 / 4.75),
            overall: radius * (2.0 / 4.75),
        }
    }
}

/// Rounded metal cap of a lock nut, hanging below `z`.
pub fn nylon_head(radius: f64, z: f64) -> Result<MeshBatch, MeshError> {
    let d = NylonDims::new(radius);
    let inner_hole = radius - radius * (1.25 / 4.75);
    let base = z - d.overall;

    let mut profile = Profile::default();
    profile.push(inner_hole, base + d.edge);
    profile.push(inner_hole, base);
    for deg in (90..=180).rev().step_by(10) {
        let a = (deg as f64).to_radians();
        profile.push(
            (radius - d.rad1) + a.sin() * d.rad1,
            (base + d.rad1) + a.cos() * d.rad1,
        );
    }
    profile.push(radius, z);
    sweep_profile(&profile, DIVISIONS, Axis::Z, Winding::Flipped)
}

/// Nylon insert ring seated inside the cap, hanging below `z`.
pub fn nylon_part(radius: f64, z: f64) -> Result<MeshBatch, MeshError> {
    let d = NylonDims::new(radius);
    let inner_hole = radius - radius * (1.5 / 4.75);
    let thickness = d.overall - d.edge;
    let part_hole = radius * (2.5 / 4.75);

    let profile = Profile::from_pairs(&[
        (inner_hole + d.edge, z),
        (part_hole, z),
        (part_hole, z - thickness),
        (inner_hole + d.edge, z - thickness),
    ]);
    sweep_profile(&profile, DIVISIONS, Axis::Z, Winding::Flipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hex_nut_spans_height() {
        let (batch, bevel) = hex_nut(13.0, 8.0, 7.0);
        assert_relative_eq!(bevel, 6.45, epsilon = 1e-12);
        let (lo, hi) = batch.bounds().unwrap();
        assert_relative_eq!(hi.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(lo.z, -7.0, epsilon = 1e-9);
        // Five rows of four, mirrored twice, six sides.
        assert_eq!(batch.vertex_count(), 5 * 4 * 2 * 2 * 6);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_nylon_head_below_z() {
        let batch = nylon_head(6.45, -7.0).unwrap();
        let (lo, hi) = batch.bounds().unwrap();
        assert_relative_eq!(hi.z, -7.0, epsilon = 1e-9);
        assert_relative_eq!(lo.z, -7.0 - 6.45 * 2.0 / 4.75, epsilon = 1e-9);
        // Two hole points, ten arc points and the outer rim.
        assert_eq!(batch.vertex_count(), 13 * (DIVISIONS + 1));
    }

    #[test]
    fn test_nylon_part_inside_head() {
        let part = nylon_part(6.45, -7.0).unwrap();
        let head = nylon_head(6.45, -7.0).unwrap();
        let (part_lo, _) = part.bounds().unwrap();
        let (head_lo, _) = head.bounds().unwrap();
        assert!(part_lo.z > head_lo.z);
        assert_eq!(part.face_count(), 3 * DIVISIONS);
    }
}
