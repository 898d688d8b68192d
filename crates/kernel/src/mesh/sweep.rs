use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::faces::{Winding, build_face_list_quads, offset_faces};
use super::{MeshBatch, MeshError};
use crate::geometry::point::{Point2d, Point3d};
use crate::geometry::rotation::{Axis, rotate_point, rotation_matrix};

/// A cross-section silhouette. Each point is `(radius, height)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub points: Vec<Point2d>,
}

impl Profile {
    pub fn new(points: Vec<Point2d>) -> Self {
        Self { points }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().map(|&(r, h)| Point2d::new(r, h)).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, radius: f64, height: f64) {
        self.points.push(Point2d::new(radius, height));
    }

    /// Shift every height by `dz`.
    pub fn lifted(&self, dz: f64) -> Self {
        Self::new(
            self.points
                .iter()
                .map(|p| Point2d::new(p.x, p.y + dz))
                .collect(),
        )
    }

    /// Lay the profile in the half-plane that contains `axis`.
    fn to_3d(&self, axis: Axis) -> Vec<Point3d> {
        self.points
            .iter()
            .map(|p| match axis {
                Axis::Z => Point3d::new(p.x, 0.0, p.y),
                Axis::X => Point3d::new(p.y, p.x, 0.0),
                Axis::Y => Point3d::new(0.0, p.y, p.x),
            })
            .collect()
    }
}

/// Revolve `profile` around `axis` in `divisions` equal steps, then append the
/// unrotated profile again as the closing ring.
///
/// The result holds `(divisions + 1) * profile.len()` vertices and
/// `(profile.len() - 1) * divisions` quads. The profile itself is never
/// checked for self-intersection.
#[instrument(skip(profile), fields(profile_len = profile.len()))]
pub fn sweep_profile(
    profile: &Profile,
    divisions: usize,
    axis: Axis,
    winding: Winding,
) -> Result<MeshBatch, MeshError> {
    if profile.len() < 2 {
        return Err(MeshError::InsufficientProfile {
            required: 2,
            provided: profile.len(),
        });
    }
    if divisions < 3 {
        return Err(MeshError::InsufficientDivisions {
            required: 3,
            provided: divisions,
        });
    }

    let ring = MeshBatch::new(profile.to_3d(axis), Vec::new());
    let mut batch = spin_dup(&ring, 360.0, divisions, axis);
    batch.vertices.extend(ring.vertices);
    batch.faces = build_face_list_quads(0, profile.len() - 1, divisions, winding);

    debug!(
        vertices = batch.vertex_count(),
        faces = batch.face_count(),
        "profile swept"
    );
    Ok(batch)
}

/// Replicate `batch` `divisions` times, each copy rotated a further
/// `degrees / divisions` around `axis`. No closing copy is added.
/// Zero divisions is treated as one.
pub fn spin_dup(batch: &MeshBatch, degrees: f64, divisions: usize, axis: Axis) -> MeshBatch {
    let divisions = divisions.max(1);
    let step = (degrees / divisions as f64).to_radians();
    let mut out = MeshBatch::default();
    for i in 0..divisions {
        let m = rotation_matrix(axis, step * i as f64);
        let offset = out.vertices.len();
        out.faces.extend(offset_faces(&batch.faces, offset));
        out.vertices
            .extend(batch.vertices.iter().map(|v| rotate_point(&m, *v)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_point_profile_four_divisions() {
        let profile = Profile::from_pairs(&[(1.0, 0.0), (1.0, 1.0)]);
        let batch = sweep_profile(&profile, 4, Axis::Z, Winding::Default).unwrap();
        assert_eq!(batch.vertex_count(), 10);
        assert_eq!(batch.face_count(), 4);
        assert!(batch.faces.iter().all(|f| f.len() == 4));
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_closing_ring_matches_first_ring() {
        let profile = Profile::from_pairs(&[(2.0, 0.0), (1.5, 1.0), (0.5, 2.0)]);
        let batch = sweep_profile(&profile, 8, Axis::Z, Winding::Flipped).unwrap();
        let n = profile.len();
        for k in 0..n {
            let first = batch.vertices[k];
            let last = batch.vertices[8 * n + k];
            assert_relative_eq!(first.x, last.x, epsilon = 1e-12);
            assert_relative_eq!(first.y, last.y, epsilon = 1e-12);
            assert_relative_eq!(first.z, last.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_radius_preserved_around_z() {
        let profile = Profile::from_pairs(&[(3.0, 0.0), (3.0, 2.0)]);
        let batch = sweep_profile(&profile, 12, Axis::Z, Winding::Default).unwrap();
        for v in &batch.vertices {
            assert_relative_eq!(v.radial_distance(), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_preconditions() {
        let short = Profile::from_pairs(&[(1.0, 0.0)]);
        assert_eq!(
            sweep_profile(&short, 8, Axis::Z, Winding::Default),
            Err(MeshError::InsufficientProfile {
                required: 2,
                provided: 1
            })
        );
        let profile = Profile::from_pairs(&[(1.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            sweep_profile(&profile, 2, Axis::Z, Winding::Default),
            Err(MeshError::InsufficientDivisions { .. })
        ));
    }

    #[test]
    fn test_crossing_radii_still_well_formed() {
        let profile = Profile::from_pairs(&[(1.0, 0.0), (-1.0, 1.0), (2.0, 1.0), (2.0, 1.0)]);
        let batch = sweep_profile(&profile, 5, Axis::X, Winding::Default).unwrap();
        assert_eq!(batch.vertex_count(), 6 * 4);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_spin_dup_offsets_copies() {
        let piece = MeshBatch::new(
            vec![
                Point3d::new(1.0, 0.0, 0.0),
                Point3d::new(2.0, 0.0, 0.0),
                Point3d::new(1.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        );
        let spun = spin_dup(&piece, 360.0, 6, Axis::Z);
        assert_eq!(spun.vertex_count(), 18);
        assert_eq!(spun.faces[5], vec![15, 16, 17]);
        assert_relative_eq!(spun.vertices[3].y, 60f64.to_radians().sin(), epsilon = 1e-12);

        let once = spin_dup(&piece, 360.0, 0, Axis::Z);
        assert_eq!(once.vertex_count(), 3);
    }
}
