use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// How control handles are derived from neighbouring control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleType {
    /// Smooth handles along the neighbour chord.
    #[default]
    Auto,
    /// Straight handles aimed at each neighbour.
    Vector,
}

/// A cubic bezier control point with its two handles and a radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BezierPoint {
    pub co: Point3d,
    pub handle_left: Point3d,
    pub handle_right: Point3d,
    pub radius: f64,
}

impl BezierPoint {
    pub fn new(co: Point3d, radius: f64) -> Self {
        Self {
            co,
            handle_left: co,
            handle_right: co,
            radius,
        }
    }
}

/// Position on the cubic segment between `p1` and `p2` at parameter `t`.
pub fn eval_bez(p1: &BezierPoint, p2: &BezierPoint, t: f64) -> Point3d {
    let a = p1.co.to_vec3();
    let b = p1.handle_right.to_vec3();
    let c = p2.handle_left.to_vec3();
    let d = p2.co.to_vec3();
    let u = 1.0 - t;
    let v = a * (u * u * u) + b * (3.0 * u * u * t) + c * (3.0 * u * t * t) + d * (t * t * t);
    Point3d::new(v.x, v.y, v.z)
}

/// Derivative of [`eval_bez`] with respect to `t`.
pub fn eval_bez_tan(p1: &BezierPoint, p2: &BezierPoint, t: f64) -> Vec3 {
    let a = p1.co.to_vec3();
    let b = p1.handle_right.to_vec3();
    let c = p2.handle_left.to_vec3();
    let d = p2.co.to_vec3();
    let u = 1.0 - t;
    (b - a) * (3.0 * u * u) + (c - b) * (6.0 * u * t) + (d - c) * (3.0 * t * t)
}

/// Recompute every handle in `points` from the control positions.
pub fn set_handles(points: &mut [BezierPoint], handle_type: HandleType) {
    let n = points.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        points[0].handle_left = points[0].co;
        points[0].handle_right = points[0].co;
        return;
    }
    let cos: Vec<Point3d> = points.iter().map(|p| p.co).collect();
    for (i, point) in points.iter_mut().enumerate() {
        let co = cos[i];
        let prev = if i > 0 { Some(cos[i - 1]) } else { None };
        let next = cos.get(i + 1).copied();
        match handle_type {
            HandleType::Vector => {
                let left = prev.unwrap_or_else(|| co - (next.unwrap_or(co) - co));
                let right = next.unwrap_or_else(|| co + (co - prev.unwrap_or(co)));
                point.handle_left = co.lerp(&left, 1.0 / 3.0);
                point.handle_right = co.lerp(&right, 1.0 / 3.0);
            }
            HandleType::Auto => {
                let chord = match (prev, next) {
                    (Some(p), Some(q)) => q - p,
                    (None, Some(q)) => q - co,
                    (Some(p), None) => co - p,
                    (None, None) => Vec3::Z,
                };
                let tangent = chord.normalize_or(Vec3::Z);
                let before = prev.map(|p| co.distance_to(&p));
                let after = next.map(|q| co.distance_to(&q));
                let left_len = before.or(after).unwrap_or(0.0) / 3.0;
                let right_len = after.or(before).unwrap_or(0.0) / 3.0;
                point.handle_left = co - tangent * left_len;
                point.handle_right = co + tangent * right_len;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight_pair() -> (BezierPoint, BezierPoint) {
        let mut pts = vec![
            BezierPoint::new(Point3d::ORIGIN, 1.0),
            BezierPoint::new(Point3d::new(0.0, 0.0, 3.0), 0.5),
        ];
        set_handles(&mut pts, HandleType::Vector);
        (pts[0], pts[1])
    }

    #[test]
    fn test_eval_endpoints() {
        let (a, b) = straight_pair();
        assert_eq!(eval_bez(&a, &b, 0.0), a.co);
        let end = eval_bez(&a, &b, 1.0);
        assert_relative_eq!(end.z, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_segment_is_linear() {
        let (a, b) = straight_pair();
        let mid = eval_bez(&a, &b, 0.5);
        assert_relative_eq!(mid.z, 1.5, epsilon = 1e-12);
        let tan = eval_bez_tan(&a, &b, 0.5);
        assert_relative_eq!(tan.x, 0.0, epsilon = 1e-12);
        assert!(tan.z > 0.0);
    }

    #[test]
    fn test_auto_handles_follow_neighbour_chord() {
        let mut pts = vec![
            BezierPoint::new(Point3d::new(0.0, 0.0, 0.0), 1.0),
            BezierPoint::new(Point3d::new(1.0, 0.0, 1.0), 1.0),
            BezierPoint::new(Point3d::new(2.0, 0.0, 0.0), 1.0),
        ];
        set_handles(&mut pts, HandleType::Auto);
        // Middle handle is horizontal because the neighbours are level.
        assert_relative_eq!(pts[1].handle_right.z, 1.0, epsilon = 1e-12);
        assert!(pts[1].handle_right.x > 1.0);
        assert!(pts[1].handle_left.x < 1.0);
    }

    #[test]
    fn test_single_point_handles_collapse() {
        let mut pts = vec![BezierPoint::new(Point3d::new(1.0, 2.0, 3.0), 1.0)];
        set_handles(&mut pts, HandleType::Auto);
        assert_eq!(pts[0].handle_left, pts[0].co);
        assert_eq!(pts[0].handle_right, pts[0].co);
    }
}
