//! Recursive tree generator.
//!
//! A tree grows level by level from a single trunk. Each stem is a bezier
//! spline extended one segment at a time, bending by its curvature, splitting
//! at a scheduled rate and leaning upward. Children sprout at points sampled
//! along the grown parent. An optional envelope prunes stems by shrinking them
//! until their tips fit. The skeleton is finally swept into tubes and leaf
//! polygons and welded into one mesh.
//!
//! All randomness comes from a seeded [`context::GrowthContext`], so equal
//! parameters always produce an identical mesh.

pub mod children;
pub mod context;
pub mod grow;
pub mod mesh;
pub mod params;
pub mod prune;
pub mod shape;
pub mod stem;
pub mod validate;

pub use children::ChildPoint;
pub use context::{GrowthContext, SplitAccumulator};
pub use grow::{Leaf, TreeSkeleton, grow_tree};
pub use params::{LeafShape, PruneEnvelope, TreeParams};
pub use shape::{ShapeType, shape_ratio};
pub use stem::Stem;
pub use validate::{TreeError, validate_params};

use procmesh_kernel::MeshBatch;
use procmesh_kernel::mesh::assembler::assemble;
use tracing::{info, instrument};

/// Grow and mesh a tree standing on the origin.
#[instrument(skip(params), fields(seed = params.seed, levels = params.levels))]
pub fn generate(params: &TreeParams) -> Result<MeshBatch, TreeError> {
    validate_params(params)?;
    let skeleton = grow_tree(params);
    let parts = mesh::skeleton_parts(&skeleton, params);
    let mesh = assemble(&parts, params.weld_precision)?;
    mesh.validate()?;
    info!(
        stems = skeleton.stems.len(),
        leaves = skeleton.leaves.len(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "tree generated"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tree() {
        let mesh = generate(&TreeParams::default()).unwrap();
        assert!(!mesh.is_empty());
        assert!(mesh.validate().is_ok());
        let (lo, hi) = mesh.bounds().unwrap();
        assert!(lo.z > -1.0);
        assert!(hi.z > 5.0);
    }

    #[test]
    fn test_same_seed_same_mesh() {
        let params = TreeParams {
            seed: 99,
            ..TreeParams::default()
        };
        assert_eq!(generate(&params).unwrap(), generate(&params).unwrap());
    }

    #[test]
    fn test_seed_changes_mesh() {
        let a = generate(&TreeParams::default()).unwrap();
        let b = generate(&TreeParams {
            seed: 5,
            ..TreeParams::default()
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = TreeParams {
            levels: 9,
            ..TreeParams::default()
        };
        assert!(matches!(
            generate(&params),
            Err(TreeError::InvalidLevels { .. })
        ));
    }
}
