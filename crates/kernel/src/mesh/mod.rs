pub mod assembler;
pub mod faces;
pub mod sweep;

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point3d;

/// A polygon as an ordered list of vertex indices.
pub type Face = Vec<usize>;

/// Errors raised by mesh construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("profile needs at least {required} points, got {provided}")]
    InsufficientProfile { required: usize, provided: usize },
    #[error("sweep needs at least {required} divisions, got {provided}")]
    InsufficientDivisions { required: usize, provided: usize },
    #[error("face {face} references vertex {index} but only {vertex_count} exist")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("face {face} has {count} indices, need at least 3")]
    DegenerateFace { face: usize, count: usize },
}

/// A vertex list plus polygon faces with local indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBatch {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<Face>,
}

impl MeshBatch {
    pub fn new(vertices: Vec<Point3d>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append another batch, shifting its face indices past our vertices.
    pub fn extend(&mut self, other: MeshBatch) {
        let offset = self.vertices.len();
        self.vertices.extend(other.vertices);
        self.faces
            .extend(other.faces.into_iter().map(|f| f.into_iter().map(|i| i + offset).collect()));
    }

    /// Translate every vertex along Z.
    pub fn lift_z(&mut self, dz: f64) {
        for v in &mut self.vertices {
            *v = v.with_z_offset(dz);
        }
    }

    /// Uniformly scale every vertex about the origin.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            *v = v.scaled(factor);
        }
    }

    pub fn lowest_z(&self) -> Option<f64> {
        self.vertices.iter().map(|v| v.z).reduce(f64::min)
    }

    /// Axis-aligned bounds as (min, max), or None for an empty batch.
    pub fn bounds(&self) -> Option<(Point3d, Point3d)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (
                Point3d::new(lo.x.min(v.x), lo.y.min(v.y), lo.z.min(v.z)),
                Point3d::new(hi.x.max(v.x), hi.y.max(v.y), hi.z.max(v.z)),
            )
        }))
    }

    /// Check that every face has at least 3 indices and all are in range.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertices.len();
        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face: face_idx,
                    count: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshBatch {
        MeshBatch::new(
            vec![
                Point3d::new(0.0, 0.0, 0.0),
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(0.0, 1.0, 2.0),
            ],
            vec![vec![0, 1, 2]],
        )
    }

    #[test]
    fn test_extend_offsets_faces() {
        let mut a = triangle();
        a.extend(triangle());
        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.faces[1], vec![3, 4, 5]);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_bad_index() {
        let mut m = triangle();
        m.faces.push(vec![0, 1, 7]);
        assert_eq!(
            m.validate(),
            Err(MeshError::IndexOutOfRange {
                face: 1,
                index: 7,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_validate_reports_short_face() {
        let mut m = triangle();
        m.faces.push(vec![0, 1]);
        assert!(matches!(
            m.validate(),
            Err(MeshError::DegenerateFace { face: 1, count: 2 })
        ));
    }

    #[test]
    fn test_lift_and_bounds() {
        let mut m = triangle();
        m.lift_z(1.0);
        let (lo, hi) = m.bounds().unwrap();
        assert_eq!(lo.z, 1.0);
        assert_eq!(hi.z, 3.0);
        assert_eq!(m.lowest_z(), Some(1.0));
        assert!(MeshBatch::default().bounds().is_none());
    }
}
