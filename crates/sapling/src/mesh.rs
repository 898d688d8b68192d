//! Tube and leaf meshing of a grown skeleton.

use std::f64::consts::TAU;

use procmesh_kernel::geometry::bezier::{eval_bez, eval_bez_tan};
use procmesh_kernel::geometry::rotation::{rotate_vec, track_quat};
use procmesh_kernel::mesh::faces::{Winding, build_face_list_quads};
use procmesh_kernel::{MeshBatch, Point3d, Vec3};

use crate::grow::{Leaf, TreeSkeleton};
use crate::params::{LeafShape, TreeParams};
use crate::stem::Stem;

/// Sweep a circular cross-section along the bezier of `stem`. Each bezier
/// segment is sampled `res_u` times; rings hold `sides + 1` vertices with the
/// seam repeated so the grid stitches like a swept profile.
pub fn stem_mesh(stem: &Stem, sides: usize, res_u: usize) -> MeshBatch {
    let segments = stem.own_segments();
    if segments == 0 || sides < 3 {
        return MeshBatch::default();
    }
    let steps = res_u.max(1);

    let mut rings = Vec::with_capacity(segments * steps + 1);
    for (i, pair) in stem.points.windows(2).enumerate() {
        let (a, b) = (&pair[0], &pair[1]);
        let samples = if i + 1 == segments { steps + 1 } else { steps };
        for j in 0..samples {
            let t = j as f64 / steps as f64;
            let radius = a.radius * (1.0 - t) + b.radius * t;
            rings.push((eval_bez(a, b, t), eval_bez_tan(a, b, t), radius));
        }
    }

    let mut vertices = Vec::with_capacity(rings.len() * (sides + 1));
    for (co, tangent, radius) in &rings {
        let frame = track_quat(*tangent);
        vertices.extend((0..=sides).map(|s| {
            let angle = TAU * (s % sides) as f64 / sides as f64;
            let local = Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0);
            *co + rotate_vec(&frame, local)
        }));
    }
    let faces = build_face_list_quads(0, sides, rings.len() - 1, Winding::Default);
    MeshBatch::new(vertices, faces)
}

fn leaf_outline(shape: LeafShape) -> (Vec<Point3d>, Vec<Vec<usize>>) {
    match shape {
        LeafShape::Hex => (
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(0.5, 0.0, 1.0 / 3.0),
                Point3d::new(0.5, 0.0, 2.0 / 3.0),
                Point3d::new(0.0, 0.0, 1.0),
                Point3d::new(-0.5, 0.0, 2.0 / 3.0),
                Point3d::new(-0.5, 0.0, 1.0 / 3.0),
            ],
            vec![vec![0, 1, 4, 5], vec![1, 2, 3, 4]],
        ),
        LeafShape::Rect => (
            vec![
                Point3d::new(0.5, 0.0, 0.0),
                Point3d::new(0.5, 0.0, 1.0),
                Point3d::new(-0.5, 0.0, 1.0),
                Point3d::new(-0.5, 0.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        ),
    }
}

/// Flat leaf polygon of unit length scaled by `scale`, with width further
/// scaled by `scale_x`, oriented and placed at the leaf anchor.
pub fn leaf_mesh(leaf: &Leaf, shape: LeafShape, scale: f64, scale_x: f64) -> MeshBatch {
    let (outline, faces) = leaf_outline(shape);
    let vertices = outline
        .iter()
        .map(|p| {
            let local = Vec3::new(p.x * scale * scale_x, p.y * scale, p.z * scale);
            leaf.co + rotate_vec(&leaf.quat, local)
        })
        .collect();
    MeshBatch::new(vertices, faces)
}

/// Mesh parts of every stem followed by every leaf, unwelded.
pub fn skeleton_parts(skeleton: &TreeSkeleton, params: &TreeParams) -> Vec<MeshBatch> {
    let sides = params.tube_sides();
    skeleton
        .stems
        .iter()
        .map(|stem| stem_mesh(stem, sides, params.res_u))
        .chain(skeleton.leaves.iter().map(|leaf| {
            leaf_mesh(leaf, params.leaf_shape, params.leaf_scale, params.leaf_scale_x)
        }))
        .filter(|batch| !batch.is_empty())
        .collect()
}
