pub mod bits;
pub mod config;
pub mod heads;
pub mod nut;
pub mod presets;
pub mod thread;
pub mod validate;

pub use config::{BitType, BoltConfig, HeadType, NutConfig, NutType, OutputConfig, ThreadConfig};
pub use presets::MetricPreset;
pub use validate::{FastenerError, validate_bolt, validate_nut};

use procmesh_kernel::mesh::assembler::MeshAssembler;
use procmesh_kernel::{MeshBatch, Point3d};
use tracing::{info, instrument};

/// Point at `degrees` clockwise from +Y, seen from above.
pub(crate) fn polar(degrees: f64, radius: f64, z: f64) -> Point3d {
    let a = degrees.to_radians();
    Point3d::new(a.sin() * radius, a.cos() * radius, z)
}

/// Placeholder hole diameter for heads without a drive recess.
const NO_BIT_DIA: f64 = 0.001;

/// Hex socket flat distance actually used, shrunk when the socket would not
/// fit on the flat top of a pan head.
pub fn effective_allen_flat(config: &BoltConfig) -> f64 {
    let flat = config.allen_bit_flat_distance;
    if config.bit != BitType::Allen || config.head != HeadType::Pan {
        return flat;
    }
    let max_dia = bits::max_pan_bit_dia(config.pan_head_dia);
    if bits::allen_bit_dia(flat) > max_dia {
        let resized = bits::allen_bit_dia_to_flat(max_dia) * 1.05;
        info!(from = flat, to = resized, "resized allen bit to fit pan head");
        resized
    } else {
        flat
    }
}

fn weld(parts: &[MeshBatch], output: &OutputConfig) -> Result<MeshBatch, FastenerError> {
    let mut assembler = MeshAssembler::new(output.weld_precision);
    for part in parts {
        assembler.append(part)?;
    }
    let mut mesh = assembler.finish();
    mesh.scale(output.scale);
    Ok(mesh)
}

/// Generate a bolt standing on z = 0 with its head on top.
#[instrument(skip(config), fields(head = ?config.head, bit = ?config.bit))]
pub fn generate_bolt(config: &BoltConfig) -> Result<MeshBatch, FastenerError> {
    validate_bolt(config)?;

    let (mut bit, bit_dia) = match config.bit {
        BitType::None => (MeshBatch::default(), NO_BIT_DIA),
        BitType::Allen => bits::allen_bit(effective_allen_flat(config), config.allen_bit_depth),
        BitType::Phillips => bits::phillips_bit(
            config.phillips_bit_dia,
            config.phillips_bit_dia * (0.5 / 1.82),
            config.phillips_bit_depth,
        ),
    };

    let (mut head, head_height) = match config.head {
        HeadType::Hex => heads::hex_head(
            config.hex_head_flat_distance,
            bit_dia,
            config.shank_dia,
            config.hex_head_height,
        ),
        HeadType::Cap => {
            let rad = config.cap_head_dia / 19.0;
            heads::cap_head(
                bit_dia,
                config.cap_head_dia,
                config.shank_dia,
                config.cap_head_height,
                rad,
                rad,
            )?
        }
        HeadType::Dome => heads::dome_head(bit_dia, config.dome_head_dia, config.shank_dia)?,
        HeadType::Pan => heads::pan_head(bit_dia, config.pan_head_dia, config.shank_dia)?,
    };
    bit.lift_z(head_height);
    head.lift_z(head_height);

    let (shaft, thread_depth) = thread::external_thread(
        &config.thread,
        config.shank_dia,
        config.shank_length,
        config.thread_length,
    );

    let mut parts = [bit, head, shaft];
    for part in &mut parts {
        part.lift_z(thread_depth);
    }
    let mesh = weld(&parts, &config.output)?;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        head_height,
        thread_depth,
        "bolt generated"
    );
    Ok(mesh)
}

/// Generate a nut standing on z = 0.
#[instrument(skip(config), fields(kind = ?config.kind))]
pub fn generate_nut(config: &NutConfig) -> Result<MeshBatch, FastenerError> {
    validate_nut(config)?;

    let (thread, height) = thread::internal_thread(&config.thread, config.height);
    let (body, bevel_radius) = nut::hex_nut(config.flat_distance, config.thread.major_dia, height);
    let mut parts = vec![thread, body];

    let mut low_z = -height;
    if config.kind == NutType::Lock {
        let cap = nut::nylon_head(bevel_radius, -height)?;
        low_z = cap.lowest_z().unwrap_or(low_z).min(low_z);
        parts.push(cap);
        parts.push(nut::nylon_part(bevel_radius, -height)?);
    }
    for part in &mut parts {
        part.lift_z(-low_z);
    }

    let mesh = weld(&parts, &config.output)?;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        height,
        "nut generated"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    /// (edges used once, edges used more than twice) over polygon faces.
    fn open_edges(mesh: &MeshBatch) -> (usize, usize) {
        let mut uses: HashMap<(usize, usize), usize> = HashMap::new();
        for face in &mesh.faces {
            for (k, &a) in face.iter().enumerate() {
                let b = face[(k + 1) % face.len()];
                *uses.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        let boundary = uses.values().filter(|&&n| n == 1).count();
        let non_manifold = uses.values().filter(|&&n| n > 2).count();
        (boundary, non_manifold)
    }

    fn coincident_pairs(mesh: &MeshBatch) -> usize {
        let v = &mesh.vertices;
        (0..v.len())
            .map(|i| (i + 1..v.len()).filter(|&j| v[i].distance_to(&v[j]) < 1e-6).count())
            .sum()
    }

    #[test]
    fn test_polar_is_clockwise_from_y() {
        let p = polar(90.0, 2.0, 1.0);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_eq!(p.z, 1.0);
    }

    #[test]
    fn test_default_bolt_stands_on_ground() {
        let mesh = generate_bolt(&BoltConfig::default()).unwrap();
        assert!(mesh.validate().is_ok());
        let (lo, hi) = mesh.bounds().unwrap();
        assert_relative_eq!(lo.z, 0.0, epsilon = 1e-9);
        // Thread depth 14 plus the 5.3 head, scaled by 0.1.
        assert_relative_eq!(hi.z, 1.93, epsilon = 1e-6);
    }

    #[test]
    fn test_allen_resized_on_pan_head() {
        let mut cfg = BoltConfig::default().with_head(HeadType::Pan, BitType::Allen);
        cfg.allen_bit_flat_distance = 10.0;
        let flat = effective_allen_flat(&cfg);
        assert!(flat < 10.0);
        assert!(bits::allen_bit_dia(flat) <= bits::max_pan_bit_dia(16.0) * 1.05 + 1e-9);

        let hex = cfg.clone().with_head(HeadType::Hex, BitType::Allen);
        assert_eq!(effective_allen_flat(&hex), 10.0);
    }

    #[test]
    fn test_every_head_and_bit() {
        for head in [HeadType::Hex, HeadType::Cap, HeadType::Dome, HeadType::Pan] {
            for bit in [BitType::None, BitType::Allen, BitType::Phillips] {
                let cfg = BoltConfig::default().with_head(head, bit);
                let mesh = generate_bolt(&cfg).unwrap();
                assert!(mesh.validate().is_ok(), "{head:?} {bit:?}");
                assert!(mesh.face_count() > 0);
            }
        }
    }

    #[test]
    fn test_invalid_bolt_rejected() {
        let mut cfg = BoltConfig::default();
        cfg.thread_length = 3.0;
        assert!(matches!(
            generate_bolt(&cfg),
            Err(FastenerError::ThreadTooShort { .. })
        ));
    }

    #[test]
    fn test_lock_nut_taller_than_hex_nut() {
        let hex = generate_nut(&NutConfig::default()).unwrap();
        let lock = generate_nut(&NutConfig {
            kind: NutType::Lock,
            ..NutConfig::default()
        })
        .unwrap();
        let (hex_lo, hex_hi) = hex.bounds().unwrap();
        let (lock_lo, lock_hi) = lock.bounds().unwrap();
        assert_relative_eq!(hex_lo.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(lock_lo.z, 0.0, epsilon = 1e-9);
        assert!(lock_hi.z > hex_hi.z);
        assert!(lock.validate().is_ok());
    }

    #[test]
    fn test_default_hex_nut_is_closed() {
        let mesh = generate_nut(&NutConfig::default()).unwrap();
        assert_eq!(coincident_pairs(&mesh), 0);
        assert_eq!(open_edges(&mesh), (0, 0));
    }

    #[test]
    fn test_lock_nut_seams_welded() {
        let mesh = generate_nut(&NutConfig {
            kind: NutType::Lock,
            ..NutConfig::default()
        })
        .unwrap();
        assert_eq!(coincident_pairs(&mesh), 0);
    }

    #[test]
    fn test_every_preset_nut_welded() {
        for preset in MetricPreset::ALL {
            let mesh = generate_nut(&preset.nut()).unwrap();
            assert_eq!(coincident_pairs(&mesh), 0, "{preset}");
        }
    }
}
