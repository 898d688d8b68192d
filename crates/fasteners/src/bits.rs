//! Drive recesses cut into the top of a bolt head.
//!
//! Both builders work below z = 0 with the recess opening at z = 0, and report
//! the diameter of the hole they leave in the head surface.

use procmesh_kernel::Axis;
use procmesh_kernel::MeshBatch;
use procmesh_kernel::Point3d;
use procmesh_kernel::mesh::faces::{Winding, build_face_list_quads, fill_ring_face, mirror_append};
use procmesh_kernel::mesh::sweep::spin_dup;

use crate::config::DIVISIONS;
use crate::polar;

/// Triangles joining the 19-point outer half circle (0..=18) to the four hex
/// corners (19..=22).
const ALLEN_FILL: [[usize; 3]; 21] = [
    [19, 1, 0],
    [19, 2, 1],
    [19, 3, 2],
    [19, 20, 3],
    [20, 4, 3],
    [20, 5, 4],
    [20, 6, 5],
    [20, 7, 6],
    [20, 8, 7],
    [20, 9, 8],
    [20, 21, 9],
    [21, 10, 9],
    [21, 11, 10],
    [21, 12, 11],
    [21, 13, 12],
    [21, 14, 13],
    [21, 15, 14],
    [21, 22, 15],
    [22, 16, 15],
    [22, 17, 16],
    [22, 18, 17],
];

/// Faces of one quarter of a cross recess: the outer arc (0..=9), the top
/// outline of the cross arm (10..=14) and the floor (15..=18).
const PHILLIPS_FILL: [&[usize]; 18] = [
    &[0, 1, 10],
    &[1, 11, 10],
    &[1, 2, 11],
    &[2, 12, 11],
    &[2, 3, 12],
    &[3, 4, 12],
    &[4, 5, 12],
    &[5, 6, 12],
    &[6, 7, 12],
    &[7, 13, 12],
    &[7, 8, 13],
    &[8, 14, 13],
    &[8, 9, 14],
    &[10, 11, 16, 15],
    &[11, 12, 16],
    &[12, 13, 16],
    &[13, 14, 17, 16],
    &[15, 16, 17, 18],
];

fn flat_to_radius(flat: f64) -> f64 {
    (flat / 2.0) / 30f64.to_radians().cos()
}

/// Diameter of the opening left by a hex socket of the given flat distance.
pub fn allen_bit_dia(flat_distance: f64) -> f64 {
    flat_to_radius(flat_distance) * 1.05 * 2.0
}

/// Inverse of [`allen_bit_dia`].
pub fn allen_bit_dia_to_flat(dia: f64) -> f64 {
    let flat_radius = (dia / 2.0) / 1.05;
    flat_radius * 30f64.to_radians().cos() * 2.0
}

/// Largest recess opening that still fits on the flat top of a pan head.
pub fn max_pan_bit_dia(head_dia: f64) -> f64 {
    let x_rad = head_dia * 0.5 * 1.976;
    10f64.to_radians().sin() * x_rad * 2.0
}

/// Depth at which the 60 degree flanks of a cross recess meet.
pub fn phillips_bit_depth(bit_dia: f64) -> f64 {
    let flat_width_half = bit_dia * (0.5 / 1.82) / 2.0;
    let x = bit_dia / 2.0 - flat_width_half;
    60f64.to_radians().tan() * x
}

/// Hex socket recess. Returns the mesh and the diameter of its opening.
pub fn allen_bit(flat_distance: f64, depth: f64) -> (MeshBatch, f64) {
    let flat_radius = flat_to_radius(flat_distance);
    let outer_radius = flat_radius * 1.05;
    let lip_drop = flat_radius * (0.1 / 5.77);
    let deg_step = 360.0 / DIVISIONS as f64;

    let mut batch = MeshBatch::default();
    batch
        .vertices
        .extend((0..=DIVISIONS / 2).map(|i| polar(i as f64 * deg_step, outer_radius, 0.0)));
    let inside = batch.vertices.len();
    batch
        .vertices
        .extend((0..=3).map(|i| polar(i as f64 * 60.0, flat_radius, -lip_drop)));
    batch.faces.extend(ALLEN_FILL.iter().map(|f| f.to_vec()));
    let bottom = batch.vertices.len();
    batch
        .vertices
        .extend((0..=3).map(|i| polar(i as f64 * 60.0, flat_radius, -depth)));
    batch
        .faces
        .extend(build_face_list_quads(inside, 3, 1, Winding::Flipped));
    batch.faces.extend(fill_ring_face(bottom, 4, false));

    mirror_append(&mut batch, Axis::X, 0.0);
    (batch, outer_radius * 2.0)
}

/// Cross recess. Returns the mesh and the diameter of its opening.
pub fn phillips_bit(dia: f64, flat_width: f64, depth: f64) -> (MeshBatch, f64) {
    let flat_radius = dia * 0.5;
    let outer_radius = flat_radius * 1.05;
    let half = flat_width / 2.0;
    let deg_step = 360.0 / DIVISIONS as f64;

    let mut vertices: Vec<Point3d> = (0..=DIVISIONS / 4)
        .map(|i| polar(i as f64 * deg_step, outer_radius, 0.0))
        .collect();
    vertices.extend([
        Point3d::new(0.0, flat_radius, 0.0),
        Point3d::new(half, flat_radius, 0.0),
        Point3d::new(half, half, 0.0),
        Point3d::new(flat_radius, half, 0.0),
        Point3d::new(flat_radius, 0.0, 0.0),
        Point3d::new(0.0, half, -depth),
        Point3d::new(half, half, -depth),
        Point3d::new(half, 0.0, -depth),
        Point3d::new(0.0, 0.0, -depth),
    ]);
    let faces: Vec<Vec<usize>> = PHILLIPS_FILL
        .iter()
        .map(|f| f.iter().rev().copied().collect())
        .collect();
    let quarter = MeshBatch::new(vertices, faces);
    (spin_dup(&quarter, 360.0, 4, Axis::Z), outer_radius * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_allen_dia_round_trip() {
        let dia = allen_bit_dia(6.0);
        assert_relative_eq!(allen_bit_dia_to_flat(dia), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_allen_bit_structure() {
        let (batch, dia) = allen_bit(6.0, 4.0);
        assert_eq!(batch.vertex_count(), 2 * (19 + 4 + 4));
        assert_eq!(batch.face_count(), 2 * (21 + 3 + 2));
        assert!(batch.validate().is_ok());
        assert_relative_eq!(dia, allen_bit_dia(6.0), epsilon = 1e-12);
        assert_relative_eq!(batch.lowest_z().unwrap(), -4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_phillips_bit_structure() {
        let (batch, dia) = phillips_bit(5.2, 5.2 * 0.5 / 1.82, 3.27);
        assert_eq!(batch.vertex_count(), 4 * 19);
        assert_eq!(batch.face_count(), 4 * 18);
        assert!(batch.validate().is_ok());
        assert_relative_eq!(dia, 5.2 * 1.05, epsilon = 1e-12);
    }

    #[test]
    fn test_phillips_depth_formula() {
        let d = phillips_bit_depth(5.2);
        let expected = 60f64.to_radians().tan() * (2.6 - 5.2 * 0.5 / 1.82 / 2.0);
        assert_relative_eq!(d, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_max_pan_bit_dia() {
        assert_relative_eq!(
            max_pan_bit_dia(16.0),
            10f64.to_radians().sin() * 8.0 * 1.976 * 2.0,
            epsilon = 1e-12
        );
    }
}
