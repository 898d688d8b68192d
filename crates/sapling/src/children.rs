//! Sampling of child attachment points along grown stems.

use procmesh_kernel::geometry::bezier::{eval_bez, eval_bez_tan};
use procmesh_kernel::geometry::rotation::track_quat;
use procmesh_kernel::{Point3d, Quat};

use crate::stem::Stem;

/// Where a child stem or leaf attaches to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildPoint {
    pub co: Point3d,
    pub quat: Quat,
    /// Parent start radius and parent radius at the point.
    pub radius_par: (f64, f64),
    /// Fraction of the parent length.
    pub offset: f64,
    pub offset_len: f64,
    pub length_par: f64,
    pub parent_bone: String,
}

/// Evenly spaced parametric positions for `children` children spread over
/// every spline of one stem.
pub fn find_child_points(splines: &[Stem], children: f64) -> Vec<f64> {
    let Some(first) = splines.first() else {
        return Vec::new();
    };
    let segments: usize = splines.iter().map(Stem::own_segments).sum();
    if segments == 0 || children <= 0.0 {
        return Vec::new();
    }
    let per_segment = children / segments as f64;
    let main = (per_segment * first.seg_max as f64).round().max(0.0) as usize;
    (0..main).map(|a| (a + 1) as f64 / main as f64).collect()
}

/// Evaluate the positions of `t_vals` that fall on this spline. `length_par`
/// is the full length of the stem the spline belongs to. Handles must be
/// set before sampling.
pub fn interpolate_stem(stem: &Stem, t_vals: &[f64], length_par: f64, rad_par: f64) -> Vec<ChildPoint> {
    let segments = stem.own_segments();
    if segments == 0 || length_par <= 0.0 {
        return Vec::new();
    }
    let bottom = stem.offset_len / length_par;
    let top = bottom + stem.seg_len * segments as f64 / length_par;
    if top <= bottom {
        return Vec::new();
    }

    t_vals
        .iter()
        .copied()
        .filter(|&t| t >= bottom && t <= top && t < 1.0)
        .map(|t| {
            let along = segments as f64 * (t - bottom) / (top - bottom);
            let index = (along.floor() as usize).min(segments - 1);
            let local = along - index as f64;
            let (a, b) = (&stem.points[index], &stem.points[index + 1]);
            ChildPoint {
                co: eval_bez(a, b, local),
                quat: track_quat(eval_bez_tan(a, b, local)),
                radius_par: (rad_par, a.radius * (1.0 - local) + b.radius * local),
                offset: t,
                offset_len: t * length_par,
                length_par,
                parent_bone: stem.bone_label(index),
            }
        })
        .collect()
}

/// Drop the leading positions of a trunk that fall inside its bare base.
pub fn trim_base(t_vals: Vec<f64>, base_size: f64) -> Vec<f64> {
    let skip = (base_size * (t_vals.len() + 1) as f64).max(0.0) as usize;
    t_vals.into_iter().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use procmesh_kernel::geometry::bezier::set_handles;
    use procmesh_kernel::geometry::rotation::rotate_vec;
    use procmesh_kernel::{BezierPoint, HandleType, Vec3};

    fn column(segments: usize, offset_len: f64) -> Stem {
        let mut points: Vec<BezierPoint> = (0..=segments)
            .map(|i| BezierPoint::new(Point3d::new(0.0, 0.0, offset_len + i as f64), 1.0 - 0.1 * i as f64))
            .collect();
        set_handles(&mut points, HandleType::Vector);
        Stem {
            points,
            start_dir: Vec3::Z,
            curv: 0.0,
            curv_v: 0.0,
            vert_att: 0.0,
            seg: segments,
            seg_max: 4,
            seg_len: 1.0,
            children: 8.0,
            rad_start: 1.0,
            rad_end: 0.6,
            spline: 0,
            offset_len,
            level: 0,
            parent_bone: String::new(),
        }
    }

    #[test]
    fn test_find_child_points_even_spacing() {
        let t = find_child_points(&[column(4, 0.0)], 8.0);
        assert_eq!(t.len(), 8);
        assert_relative_eq!(t[0], 0.125);
        assert_relative_eq!(t[7], 1.0);
    }

    #[test]
    fn test_find_child_points_empty_stem() {
        assert!(find_child_points(&[], 5.0).is_empty());
        assert!(find_child_points(&[column(0, 0.0)], 5.0).is_empty());
    }

    #[test]
    fn test_interpolate_positions_and_radius() {
        let stem = column(4, 0.0);
        let points = interpolate_stem(&stem, &[0.25, 0.5, 1.0], 4.0, 1.0);
        // The tip itself never sprouts.
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].co.z, 1.0, epsilon = 1e-9);
        assert_relative_eq!(points[1].co.z, 2.0, epsilon = 1e-9);
        assert_relative_eq!(points[1].radius_par.1, 0.8, epsilon = 1e-9);
        assert_relative_eq!(points[1].offset_len, 2.0);
        let up = rotate_vec(&points[0].quat, Vec3::Z);
        assert_relative_eq!(up.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_interpolate_respects_spline_range() {
        // A split spline covering the top half of a 4 unit stem.
        let stem = column(2, 2.0);
        let points = interpolate_stem(&stem, &[0.25, 0.75], 4.0, 1.0);
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].co.z, 3.0, epsilon = 1e-9);
        assert_eq!(points[0].parent_bone, "bone00000.01");
    }

    #[test]
    fn test_trim_base() {
        let t: Vec<f64> = (1..=9).map(|i| i as f64 / 9.0).collect();
        let kept = trim_base(t, 0.4);
        assert_eq!(kept.len(), 5);
        assert_relative_eq!(kept[0], 5.0 / 9.0);
    }
}
