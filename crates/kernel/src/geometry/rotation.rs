use nalgebra::{Rotation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

pub type Quat = UnitQuaternion<f64>;
pub type Matrix3 = Rotation3<f64>;

/// A principal axis used for sweeps and mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Rotation by `angle` radians around an arbitrary axis. A zero-length axis
/// yields the identity.
pub fn axis_rotation(axis: Vec3, angle: f64) -> Quat {
    match Unit::try_new(axis.to_na(), crate::default_tolerance().coincidence) {
        Some(unit) => UnitQuaternion::from_axis_angle(&unit, angle),
        None => UnitQuaternion::identity(),
    }
}

/// Rotation matrix for `angle` radians around a principal axis.
pub fn rotation_matrix(axis: Axis, angle: f64) -> Matrix3 {
    let unit = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&unit, angle)
}

pub fn rotate_vec(q: &Quat, v: Vec3) -> Vec3 {
    Vec3::from_na(&q.transform_vector(&v.to_na()))
}

/// Rotate a point about the origin.
pub fn rotate_point(m: &Matrix3, p: Point3d) -> Point3d {
    let v = m * p.to_vec3().to_na();
    Point3d::new(v.x, v.y, v.z)
}

/// Orientation whose local Z points along `dir` and whose local Y leans
/// toward world Z. When `dir` is parallel to world Z, local Y stays on world Y.
pub fn track_quat(dir: Vec3) -> Quat {
    let Some(z) = dir.normalized() else {
        return UnitQuaternion::identity();
    };
    let up = Vec3::Z - z * Vec3::Z.dot(&z);
    let y = match up.normalized() {
        Some(y) => y,
        None => (Vec3::Y - z * Vec3::Y.dot(&z)).normalize_or(Vec3::Y),
    };
    let x = y.cross(&z);
    let basis = Rotation3::from_basis_unchecked(&[x.to_na(), y.to_na(), z.to_na()]);
    UnitQuaternion::from_rotation_matrix(&basis)
}
