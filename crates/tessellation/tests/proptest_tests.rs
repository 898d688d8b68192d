//! Property-based tests for triangulation and export.

use proptest::prelude::*;

use procmesh_kernel::mesh::faces::Winding;
use procmesh_kernel::mesh::sweep::{Profile, sweep_profile};
use procmesh_kernel::Axis;
use procmesh_tessellation::{StlFormat, mesh_to_obj, triangulate, validate_mesh, write_stl};

/// Open profile of `len` points climbing away from the axis.
fn arb_profile() -> impl Strategy<Value = Profile> {
    prop::collection::vec((0.5f64..5.0, 0.1f64..2.0), 2..10).prop_map(|steps| {
        let mut profile = Profile::default();
        let mut z = 0.0;
        for (radius, dz) in steps {
            profile.push(radius, z);
            z += dz;
        }
        profile
    })
}

proptest! {
    #[test]
    fn fan_triangle_count(profile in arb_profile(), divisions in 3usize..32) {
        let batch = sweep_profile(&profile, divisions, Axis::Z, Winding::Default).unwrap();
        let mesh = triangulate(&batch);
        let expected: usize = batch.faces.iter().map(|f| f.len() - 2).sum();
        prop_assert_eq!(mesh.triangle_count(), expected);
        prop_assert_eq!(mesh.vertex_count(), batch.vertex_count());
        prop_assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn swept_tube_has_open_rims(profile in arb_profile(), divisions in 3usize..32) {
        let batch = sweep_profile(&profile, divisions, Axis::Z, Winding::Default).unwrap();
        let report = validate_mesh(&triangulate(&batch));
        // Unwelded seam plus top and bottom rims.
        prop_assert!(report.boundary_edges > 0);
        prop_assert_eq!(report.non_manifold_edges, 0);
        prop_assert_eq!(report.inconsistent_edges, 0);
    }

    #[test]
    fn export_sizes_follow_counts(profile in arb_profile(), divisions in 3usize..16) {
        let batch = sweep_profile(&profile, divisions, Axis::Z, Winding::Default).unwrap();
        let obj = mesh_to_obj(&batch).unwrap();
        prop_assert_eq!(obj.lines().count(), batch.vertex_count() + batch.face_count());

        let mesh = triangulate(&batch);
        let mut stl = Vec::new();
        write_stl(&mesh, &mut stl, StlFormat::Binary).unwrap();
        prop_assert_eq!(stl.len(), 84 + 50 * mesh.triangle_count());
    }
}
