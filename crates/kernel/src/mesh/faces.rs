//! Face-list stitching helpers shared by the sweep and the fastener builders.

use serde::{Deserialize, Serialize};

use super::{Face, MeshBatch};
use crate::geometry::point::Point3d;
use crate::geometry::rotation::Axis;

/// Vertex order of generated quads. The two variants produce opposite normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Winding {
    #[default]
    Default,
    Flipped,
}

/// Stitch a grid of `rows + 1` rows, each holding `columns + 1` vertices, into
/// `columns * rows` quads. Indices start at `offset`.
pub fn build_face_list_quads(
    offset: usize,
    columns: usize,
    rows: usize,
    winding: Winding,
) -> Vec<Face> {
    let mut faces = Vec::with_capacity(columns * rows);
    let stride = columns + 1;
    for row in 0..rows {
        let row_start = offset + row * stride;
        for col in 0..columns {
            let r1 = row_start + col;
            let r2 = r1 + stride;
            let r3 = r2 + 1;
            let r4 = r1 + 1;
            match winding {
                Winding::Flipped => faces.push(vec![r1, r2, r3, r4]),
                Winding::Default => faces.push(vec![r4, r3, r2, r1]),
            }
        }
    }
    faces
}

/// Close a ring of `count` vertices starting at `offset` with a zig-zag strip
/// of `count - 2` triangles. Rings with fewer than 3 vertices get no faces.
pub fn fill_ring_face(offset: usize, count: usize, face_down: bool) -> Vec<Face> {
    if count < 3 {
        return Vec::new();
    }
    let mut faces = Vec::with_capacity(count - 2);
    let mut face = [1usize, 2, 0];
    for i in 0..count - 2 {
        let [a, b, c] = face.map(|v| v + offset);
        let next = if i % 2 == 1 {
            faces.push(if face_down { vec![c, b, a] } else { vec![a, b, c] });
            [face[2], face[2] + 1, face[1]]
        } else {
            faces.push(if face_down { vec![a, b, c] } else { vec![c, b, a] });
            let back = if face[2] == 0 { count - 1 } else { face[2] - 1 };
            [face[2], back, face[1]]
        };
        face = next;
    }
    faces
}

/// Shift every index in `faces` by `offset`.
pub fn offset_faces(faces: &[Face], offset: usize) -> Vec<Face> {
    faces
        .iter()
        .map(|f| f.iter().map(|i| i + offset).collect())
        .collect()
}

/// Reflect `batch` across the plane `axis = flip_point`. The copy keeps local
/// indices with reversed winding so normals still point outward once merged.
pub fn mirror(batch: &MeshBatch, axis: Axis, flip_point: f64) -> MeshBatch {
    let reflect = |c: f64| flip_point - (c - flip_point);
    let vertices = batch
        .vertices
        .iter()
        .map(|v| match axis {
            Axis::X => Point3d::new(reflect(v.x), v.y, v.z),
            Axis::Y => Point3d::new(v.x, reflect(v.y), v.z),
            Axis::Z => Point3d::new(v.x, v.y, reflect(v.z)),
        })
        .collect();
    let faces = batch
        .faces
        .iter()
        .map(|f| f.iter().rev().copied().collect())
        .collect();
    MeshBatch::new(vertices, faces)
}

/// Append the mirror image of `batch` to itself.
pub fn mirror_append(batch: &mut MeshBatch, axis: Axis, flip_point: f64) {
    let copy = mirror(batch, axis, flip_point);
    batch.extend(copy);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quads_single_cell() {
        assert_eq!(
            build_face_list_quads(0, 1, 1, Winding::Flipped),
            vec![vec![0, 2, 3, 1]]
        );
        assert_eq!(
            build_face_list_quads(10, 1, 1, Winding::Default),
            vec![vec![11, 13, 12, 10]]
        );
    }

    #[test]
    fn test_quads_count_and_range() {
        let faces = build_face_list_quads(0, 3, 5, Winding::Default);
        assert_eq!(faces.len(), 15);
        let max = faces.iter().flatten().copied().max().unwrap();
        assert_eq!(max, 4 * 6 - 1);
    }

    #[test]
    fn test_fill_ring_triangle_count() {
        assert!(fill_ring_face(0, 2, false).is_empty());
        assert_eq!(fill_ring_face(0, 3, false).len(), 1);
        assert_eq!(fill_ring_face(0, 36, true).len(), 34);
    }

    #[test]
    fn test_fill_ring_zig_zag() {
        let faces = fill_ring_face(0, 6, false);
        assert_eq!(faces[0], vec![0, 2, 1]);
        assert_eq!(faces[1], vec![0, 5, 2]);
        assert_eq!(faces[2], vec![5, 3, 2]);
        assert_eq!(faces[3], vec![5, 4, 3]);
        // Every vertex of the ring is used.
        let mut used: Vec<usize> = faces.iter().flatten().copied().collect();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_fill_ring_face_down_reverses() {
        let up = fill_ring_face(4, 8, false);
        let down = fill_ring_face(4, 8, true);
        for (u, d) in up.iter().zip(&down) {
            let mut rev = d.clone();
            rev.reverse();
            assert_eq!(*u, rev);
        }
    }

    #[test]
    fn test_mirror_reflects_and_reverses() {
        let batch = MeshBatch::new(
            vec![
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(2.0, 1.0, 0.0),
                Point3d::new(1.0, 1.0, -3.0),
            ],
            vec![vec![0, 1, 2]],
        );
        let m = mirror(&batch, Axis::X, 0.0);
        assert_eq!(m.vertices[1], Point3d::new(-2.0, 1.0, 0.0));
        assert_eq!(m.faces[0], vec![2, 1, 0]);

        let mut z = batch.clone();
        mirror_append(&mut z, Axis::Z, -3.0);
        assert_eq!(z.vertex_count(), 6);
        assert_eq!(z.vertices[3].z, -6.0);
        assert_eq!(z.faces[1], vec![5, 4, 3]);
        assert!(z.validate().is_ok());
    }
}
