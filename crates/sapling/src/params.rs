//! Tree parameters. Angles are in degrees; per-level arrays are indexed by
//! recursion depth, with level 3 reused for anything deeper.

use procmesh_kernel::HandleType;
use serde::{Deserialize, Serialize};

use crate::shape::ShapeType;

pub const MAX_LEVELS: usize = 4;

pub type PerLevel<T> = [T; MAX_LEVELS];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafShape {
    #[default]
    Hex,
    Rect,
}

/// Pruning envelope. `width` is a fraction of the tree scale; `width_peak`
/// is the height fraction above `base_size` where the envelope is widest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneEnvelope {
    pub width: f64,
    pub width_peak: f64,
    pub power_high: f64,
    pub power_low: f64,
    pub ratio: f64,
}

impl Default for PruneEnvelope {
    fn default() -> Self {
        Self {
            width: 0.4,
            width_peak: 0.6,
            power_high: 0.5,
            power_low: 0.001,
            ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    pub seed: u64,
    pub levels: usize,

    pub length: PerLevel<f64>,
    pub length_v: PerLevel<f64>,
    /// Children per stem; entry 0 is unused since the trunk is unique.
    pub branches: PerLevel<f64>,
    pub curve_res: PerLevel<usize>,
    pub curve: PerLevel<f64>,
    pub curve_v: PerLevel<f64>,
    pub curve_back: PerLevel<f64>,
    pub seg_splits: PerLevel<f64>,
    pub split_angle: PerLevel<f64>,
    pub split_angle_v: PerLevel<f64>,
    pub down_angle: PerLevel<f64>,
    /// A negative value scales the variation along the parent instead of
    /// drawing it at random.
    pub down_angle_v: PerLevel<f64>,
    /// A negative value alternates children between the two sides.
    pub rotate: PerLevel<f64>,
    pub rotate_v: PerLevel<f64>,
    pub taper: PerLevel<f64>,
    pub attract_up: f64,

    pub base_splits: usize,
    pub base_size: f64,
    pub scale: f64,
    pub scale_v: f64,
    pub scale0: f64,
    pub scale_v0: f64,
    pub ratio: f64,
    pub ratio_power: f64,
    pub shape: ShapeType,
    pub prune: Option<PruneEnvelope>,

    pub leaves: usize,
    pub leaf_scale: f64,
    pub leaf_scale_x: f64,
    pub leaf_shape: LeafShape,
    pub leaf_dist: ShapeType,

    /// Tube cross-section gets `4 * (bevel_res + 1)` sides.
    pub bevel_res: usize,
    /// Samples per bezier segment when sweeping tubes.
    pub res_u: usize,
    pub handle_type: HandleType,
    pub close_tip: bool,
    pub weld_precision: u32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            seed: 0,
            levels: 2,
            length: [1.0, 0.3, 0.6, 0.45],
            length_v: [0.0, 0.0, 0.0, 0.0],
            branches: [0.0, 50.0, 30.0, 10.0],
            curve_res: [3, 5, 3, 1],
            curve: [0.0, -40.0, -40.0, 0.0],
            curve_v: [20.0, 50.0, 75.0, 0.0],
            curve_back: [0.0, 0.0, 0.0, 0.0],
            seg_splits: [0.0, 0.0, 0.0, 0.0],
            split_angle: [0.0, 0.0, 0.0, 0.0],
            split_angle_v: [0.0, 0.0, 0.0, 0.0],
            down_angle: [90.0, 60.0, 45.0, 45.0],
            down_angle_v: [0.0, -50.0, 10.0, 10.0],
            rotate: [140.0, 140.0, 140.0, 77.0],
            rotate_v: [0.0, 0.0, 0.0, 0.0],
            taper: [1.0, 1.0, 1.0, 1.0],
            attract_up: 0.5,
            base_splits: 0,
            base_size: 0.4,
            scale: 13.0,
            scale_v: 3.0,
            scale0: 1.0,
            scale_v0: 0.0,
            ratio: 0.015,
            ratio_power: 1.2,
            shape: ShapeType::TendFlame,
            prune: None,
            leaves: 25,
            leaf_scale: 0.17,
            leaf_scale_x: 1.0,
            leaf_shape: LeafShape::Hex,
            leaf_dist: ShapeType::TaperedCylindrical,
            bevel_res: 0,
            res_u: 4,
            handle_type: HandleType::Auto,
            close_tip: true,
            weld_precision: 6,
        }
    }
}

impl TreeParams {
    /// Parameter row for a recursion depth.
    pub fn row(level: usize) -> usize {
        level.min(MAX_LEVELS - 1)
    }

    pub fn tube_sides(&self) -> usize {
        4 * (self.bevel_res + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params: TreeParams =
            serde_json::from_str(r#"{"seed": 7, "levels": 3, "prune": {"width": 0.5}}"#).unwrap();
        assert_eq!(params.seed, 7);
        assert_eq!(params.levels, 3);
        assert_eq!(params.curve_res, TreeParams::default().curve_res);
        let prune = params.prune.unwrap();
        assert_eq!(prune.width, 0.5);
        assert_eq!(prune.ratio, 1.0);
    }

    #[test]
    fn test_row_clamps_depth() {
        assert_eq!(TreeParams::row(0), 0);
        assert_eq!(TreeParams::row(3), 3);
        assert_eq!(TreeParams::row(6), 3);
    }

    #[test]
    fn test_shape_names() {
        let json = serde_json::to_string(&ShapeType::TendFlame).unwrap();
        assert_eq!(json, "\"tend_flame\"");
    }
}
