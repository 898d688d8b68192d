//! Bolt heads. Each builder hangs its head below z = 0, with the top face at
//! z = 0 and the shank joint at the bottom, and returns the head height the
//! bolt must be lifted by.

use procmesh_kernel::mesh::faces::{Winding, build_face_list_quads, mirror_append};
use procmesh_kernel::mesh::sweep::{Profile, spin_dup, sweep_profile};
use procmesh_kernel::{Axis, MeshBatch, MeshError, Point3d};

use crate::config::DIVISIONS;
use crate::polar;

/// Angles of the four columns spanning half of one hex side.
const HEX_COLUMNS: [f64; 4] = [0.0, 10.0, 20.0, 30.0];

fn hex_ring(radius: f64, z: f64) -> impl Iterator<Item = Point3d> {
    HEX_COLUMNS.into_iter().map(move |a| polar(a, radius, z))
}

fn hex_flat_row(half_flat: f64, z: impl Fn(usize) -> f64) -> impl Iterator<Item = Point3d> {
    HEX_COLUMNS
        .into_iter()
        .enumerate()
        .map(move |(i, a)| Point3d::new(a.to_radians().tan() * half_flat, half_flat, z(i)))
}

/// Depth at which the chamfer cone of radius `bevel_radius` meets each point
/// on the flat side.
fn bevel_drops(half_flat: f64, bevel_radius: f64) -> [f64; 4] {
    HEX_COLUMNS.map(|a| {
        let on_cone = polar(a, bevel_radius, 0.0);
        let on_flat = Point3d::new(a.to_radians().tan() * half_flat, half_flat, 0.0);
        -on_cone.distance_to(&on_flat)
    })
}

/// Top section of a hex prism shared by hex heads and hex nuts: hole ring,
/// chamfer ring, chamfered flats, then flats down to `flat_bottom`.
pub(crate) fn hex_top_rows(
    hole_radius: f64,
    half_flat: f64,
    bevel_radius: f64,
    flat_bottom: f64,
) -> Vec<Point3d> {
    let drops = bevel_drops(half_flat, bevel_radius);
    let lowest_drop = drops[3];
    let mut verts: Vec<Point3d> = hex_ring(hole_radius, 0.0).collect();
    verts.extend(hex_ring(bevel_radius, 0.0));
    verts.extend(hex_flat_row(half_flat, |i| drops[i]));
    verts.extend(hex_flat_row(half_flat, |_| lowest_drop));
    verts.extend(hex_flat_row(half_flat, |_| flat_bottom));
    verts
}

/// Close one twelfth of a hex part into a full ring: mirror across the YZ
/// plane, then repeat six times around Z.
pub(crate) fn hex_spin(mut slice: MeshBatch) -> MeshBatch {
    mirror_append(&mut slice, Axis::X, 0.0);
    spin_dup(&slice, 360.0, 6, Axis::Z)
}

pub fn hex_head(flat: f64, hole_dia: f64, shank_dia: f64, height: f64) -> (MeshBatch, f64) {
    let half_flat = flat / 2.0;
    let bevel = half_flat * (0.05 / 8.0);
    let flat_height = height - bevel - bevel;
    let undercut_z = -flat_height - bevel;
    let shank_radius = shank_dia / 2.0;

    let mut verts = hex_top_rows(hole_dia * 0.5, half_flat, half_flat - bevel, -flat_height);
    verts.extend(hex_ring(half_flat, -flat_height));
    verts.extend(hex_ring(half_flat, undercut_z));
    verts.extend(hex_ring(shank_radius + bevel, undercut_z));
    verts.extend(hex_ring(shank_radius, undercut_z - bevel));

    let rows = verts.len() / HEX_COLUMNS.len();
    let faces = build_face_list_quads(0, 3, rows - 1, Winding::Default);
    (hex_spin(MeshBatch::new(verts, faces)), height)
}

/// Quarter arc sampled every 10 degrees from 0 to 90 inclusive.
fn quarter_arc() -> impl Iterator<Item = f64> {
    (0..=9).map(|i| (i as f64 * 10.0).to_radians())
}

pub fn cap_head(
    hole_dia: f64,
    head_dia: f64,
    shank_dia: f64,
    height: f64,
    rad1: f64,
    rad2: f64,
) -> Result<(MeshBatch, f64), MeshError> {
    let hole_radius = hole_dia * 0.5;
    let head_radius = head_dia * 0.5;
    let shank_radius = shank_dia * 0.5;
    let bevel = height * 0.01;

    let mut profile = Profile::default();
    profile.push(hole_radius, 0.0);
    for a in quarter_arc() {
        profile.push((head_radius - rad1) + a.sin() * rad1, -rad1 + a.cos() * rad1);
    }
    profile.push(head_radius, -height + bevel);
    profile.push(head_radius - bevel, -height);
    for a in quarter_arc() {
        profile.push(
            (shank_radius + rad2) - a.sin() * rad2,
            (-height - rad2) + a.cos() * rad2,
        );
    }

    let batch = sweep_profile(&profile, DIVISIONS, Axis::Z, Winding::Default)?;
    Ok((batch, height + rad2))
}

pub fn dome_head(
    hole_dia: f64,
    head_dia: f64,
    shank_dia: f64,
) -> Result<(MeshBatch, f64), MeshError> {
    let head_radius = head_dia * 0.5;
    let dome_rad = head_radius * 1.12;
    let rad_offset = head_radius * 0.98;
    let dome_height = head_radius * 0.64;
    let other_rad = head_radius * 0.16;
    let other_x = head_radius * 0.84;
    let other_z = head_radius * 0.504;

    let mut profile = Profile::default();
    profile.push(hole_dia * 0.5, 0.0);
    for deg in (0..60).step_by(10) {
        let a = (deg as f64).to_radians();
        let z = -rad_offset + a.cos() * dome_rad;
        if z <= 0.0 {
            profile.push(a.sin() * dome_rad, z);
        }
    }
    for deg in (60..160).step_by(10) {
        let a = (deg as f64).to_radians();
        let z = (-other_z + a.cos() * other_rad).max(-dome_height);
        profile.push(other_x + a.sin() * other_rad, z);
    }
    profile.push(shank_dia * 0.5, -dome_height);

    let batch = sweep_profile(&profile, DIVISIONS, Axis::Z, Winding::Default)?;
    Ok((batch, dome_height))
}

pub fn pan_head(
    hole_dia: f64,
    head_dia: f64,
    shank_dia: f64,
) -> Result<(MeshBatch, f64), MeshError> {
    let head_radius = head_dia * 0.5;
    let x_rad = head_radius * 1.976;
    let z_rad = head_radius * 1.768;
    let end_rad = head_radius * 0.284;
    let end_z = head_radius * 0.432;
    let height = head_radius * 0.59;
    let shank_radius = shank_dia * 0.5;

    let top_z = -z_rad + 10f64.to_radians().cos() * z_rad;
    let start_height = -top_z;

    let mut profile = Profile::default();
    profile.push(hole_dia * 0.5, top_z);
    for deg in [10.0f64, 20.0] {
        let a = deg.to_radians();
        profile.push(a.sin() * x_rad, -z_rad + a.cos() * z_rad);
    }
    for deg in (20..140).step_by(10) {
        let a = (deg as f64).to_radians();
        let z = (-end_z + a.cos() * end_rad).max(-height);
        profile.push((head_radius - end_rad) + a.sin() * end_rad, z);
    }
    profile.push(shank_radius, -height);
    profile.push(shank_radius, -height - start_height);

    let mut batch = sweep_profile(&profile, DIVISIONS, Axis::Z, Winding::Default)?;
    batch.lift_z(start_height);
    Ok((batch, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hex_head_rows() {
        let (batch, height) = hex_head(13.0, 0.001, 8.0, 5.3);
        assert_eq!(height, 5.3);
        // Nine rows of four columns, doubled by the mirror, six times around.
        assert_eq!(batch.vertex_count(), 9 * 4 * 2 * 6);
        assert_eq!(batch.face_count(), 8 * 3 * 2 * 6);
        assert!(batch.validate().is_ok());
        assert_relative_eq!(batch.lowest_z().unwrap(), -5.3, epsilon = 1e-9);
    }

    #[test]
    fn test_hex_flats_touch_half_flat() {
        let (batch, _) = hex_head(13.0, 0.001, 8.0, 5.3);
        let max_r = batch
            .vertices
            .iter()
            .map(|v| v.radial_distance())
            .fold(0.0, f64::max);
        assert_relative_eq!(max_r, 6.5 / 30f64.to_radians().cos(), epsilon = 1e-9);
    }

    #[test]
    fn test_cap_head_height_includes_fillet() {
        let rad = 13.5 / 19.0;
        let (batch, h) = cap_head(0.001, 13.5, 8.0, 8.0, rad, rad).unwrap();
        assert_relative_eq!(h, 8.0 + rad, epsilon = 1e-12);
        assert_eq!(batch.vertex_count(), 37 * 23);
        assert!(batch.validate().is_ok());
    }

    #[test]
    fn test_dome_head_height() {
        let (batch, h) = dome_head(0.001, 16.0, 8.0).unwrap();
        assert_relative_eq!(h, 8.0 * 0.64, epsilon = 1e-12);
        assert_relative_eq!(batch.lowest_z().unwrap(), -h, epsilon = 1e-9);
        assert!(batch.vertices.iter().all(|v| v.z <= 1e-9));
    }

    #[test]
    fn test_pan_head_top_at_zero() {
        let (batch, h) = pan_head(0.001, 16.0, 8.0).unwrap();
        assert_relative_eq!(h, 8.0 * 0.59, epsilon = 1e-12);
        let (lo, hi) = batch.bounds().unwrap();
        assert_relative_eq!(hi.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(lo.z, -h, epsilon = 1e-9);
    }
}
