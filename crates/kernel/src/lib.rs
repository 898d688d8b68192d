pub mod geometry;
pub mod mesh;

// Re-export the types every generator touches at crate root for convenience.
pub use geometry::bezier::{BezierPoint, HandleType};
pub use geometry::point::{Point2d, Point3d};
pub use geometry::rotation::{Axis, Matrix3, Quat};
pub use geometry::vector::Vec3;
pub use mesh::assembler::MeshAssembler;
pub use mesh::{Face, MeshBatch, MeshError};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Lengths below this are treated as zero.
    pub coincidence: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-12,
        }
    }
}

impl Tolerance {
    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
