//! Shape ratios: how branch length varies with position along the parent,
//! and the pruning envelope profile.

use std::f64::consts::PI;

use procmesh_kernel::Point3d;
use serde::{Deserialize, Serialize};

use crate::params::PruneEnvelope;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Conical,
    Spherical,
    Hemispherical,
    Cylindrical,
    TaperedCylindrical,
    Flame,
    InverseConical,
    #[default]
    TendFlame,
}

/// Ratio for `shape` at `ratio` in `[0, 1]`, where 0 is the tip of the
/// parent and 1 its base.
pub fn shape_ratio(shape: ShapeType, ratio: f64) -> f64 {
    let r = ratio.clamp(0.0, 1.0);
    match shape {
        ShapeType::Conical => 0.2 + 0.8 * r,
        ShapeType::Spherical => 0.2 + 0.8 * (PI * r).sin(),
        ShapeType::Hemispherical => 0.2 + 0.8 * (0.5 * PI * r).sin(),
        ShapeType::Cylindrical => 1.0,
        ShapeType::TaperedCylindrical => 0.5 + 0.5 * r,
        ShapeType::Flame => flame(r),
        ShapeType::InverseConical => 1.0 - 0.8 * r,
        ShapeType::TendFlame => 0.5 + 0.5 * flame(r),
    }
}

fn flame(r: f64) -> f64 {
    if r <= 0.7 { r / 0.7 } else { (1.0 - r) / 0.3 }
}

const PEAK_EPS: f64 = 1e-6;

impl PruneEnvelope {
    /// Relative envelope width at height fraction `h`, 0 at the envelope
    /// base and 1 at its top. Zero outside that range.
    pub fn width_at(&self, h: f64) -> f64 {
        if !(0.0..=1.0).contains(&h) {
            return 0.0;
        }
        let peak = self.width_peak.clamp(PEAK_EPS, 1.0 - PEAK_EPS);
        if h < peak {
            (h / peak).powf(self.power_low)
        } else {
            ((1.0 - h) / (1.0 - peak)).powf(self.power_high)
        }
    }

    /// Whether `point` lies inside the envelope of a tree of height `scale`
    /// whose crown starts at `base_size * scale`. Points below the crown
    /// are not constrained.
    pub fn contains(&self, point: &Point3d, scale: f64, base_size: f64) -> bool {
        let base = base_size * scale;
        if point.z < base {
            return true;
        }
        let span = scale * (1.0 - base_size);
        if span <= 0.0 {
            return false;
        }
        let h = (point.z - base) / span;
        point.radial_distance() / scale < self.width * self.width_at(h)
    }
}
