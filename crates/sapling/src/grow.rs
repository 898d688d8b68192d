//! Level-by-level growth of the tree skeleton.
//!
//! Level 0 is a single trunk. Every later level starts one stem at each child
//! point sampled from the level before it. The last level sprouts leaves
//! instead of stems.

use procmesh_kernel::geometry::bezier::set_handles;
use procmesh_kernel::geometry::rotation::{axis_rotation, rotate_vec};
use procmesh_kernel::{BezierPoint, Point3d, Quat, Vec3};
use tracing::{debug, instrument};

use crate::children::{ChildPoint, find_child_points, interpolate_stem, trim_base};
use crate::context::{GrowthContext, SplitAccumulator};
use crate::params::TreeParams;
use crate::prune::PruneSearch;
use crate::shape::{ShapeType, shape_ratio};
use crate::stem::{Split, Stem};

/// A leaf anchored on a last-level stem. The leaf blade extends along the
/// local +Z of `quat`.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub co: Point3d,
    pub quat: Quat,
    pub parent_bone: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeSkeleton {
    pub stems: Vec<Stem>,
    pub leaves: Vec<Leaf>,
    /// Realised tree scale after variation.
    pub scale: f64,
}

/// Grow every level of the tree. Parameters are assumed validated.
#[instrument(skip(params), fields(seed = params.seed, levels = params.levels))]
pub fn grow_tree(params: &TreeParams) -> TreeSkeleton {
    let mut ctx = GrowthContext::new(params.seed);
    let scale = params.scale + ctx.vary(params.scale_v);
    let mut skeleton = TreeSkeleton {
        scale,
        ..TreeSkeleton::default()
    };
    let mut points: Vec<ChildPoint> = Vec::new();

    for level in 0..params.levels {
        let last_level = level + 1 == params.levels;
        ctx.split = SplitAccumulator::new();
        let starts = if level == 0 {
            vec![trunk(params, &mut ctx, scale, last_level)]
        } else {
            ctx.rotation = 0.0;
            points
                .iter()
                .map(|p| child_stem(params, &mut ctx, level, scale, p, last_level))
                .collect()
        };

        let mut sampled = Vec::new();
        let stem_count = starts.len();
        for stem in starts {
            let mut splines = grow_pruned(params, &mut ctx, stem, scale);
            for spline in &mut splines {
                set_handles(&mut spline.points, params.handle_type);
            }
            let children = splines.first().map_or(0.0, |s| s.children);
            let mut t_vals = find_child_points(&splines, children);
            if level == 0 {
                t_vals = trim_base(t_vals, params.base_size);
            }
            for spline in &splines {
                sampled.extend(interpolate_stem(
                    spline,
                    &t_vals,
                    spline.full_length(),
                    spline.rad_start,
                ));
            }
            skeleton.stems.extend(splines);
        }
        debug!(level, stems = stem_count, children = sampled.len(), "level grown");

        if last_level {
            skeleton.leaves = sampled
                .iter()
                .map(|p| Leaf {
                    co: p.co,
                    quat: child_orientation(params, &mut ctx, level + 1, scale, p),
                    parent_bone: p.parent_bone.clone(),
                })
                .collect();
        } else {
            points = sampled;
        }
    }
    skeleton
}

/// Initial and variance curvature per segment, in radians.
fn curvature(params: &TreeParams, row: usize) -> (f64, f64) {
    let res = params.curve_res[row].max(1) as f64;
    let curve = if params.curve_back[row] == 0.0 {
        params.curve[row]
    } else {
        2.0 * params.curve[row]
    };
    ((curve / res).to_radians(), (params.curve_v[row] / res).to_radians())
}

fn trunk(params: &TreeParams, ctx: &mut GrowthContext, scale: f64, last_level: bool) -> Stem {
    let res = params.curve_res[0];
    let length = scale * (params.length[0] + ctx.vary(params.length_v[0]));
    let rad_start = length * params.ratio * (params.scale0 + ctx.vary(params.scale_v0));
    let (curv, curv_v) = curvature(params, 0);
    Stem {
        points: vec![BezierPoint::new(Point3d::ORIGIN, rad_start)],
        start_dir: Vec3::Z,
        curv,
        curv_v,
        vert_att: 0.0,
        seg: 0,
        seg_max: res,
        seg_len: length / res as f64,
        children: if last_level {
            params.leaves as f64
        } else {
            params.branches[1]
        },
        rad_start,
        rad_end: rad_start * (1.0 - params.taper[0]),
        spline: ctx.claim_spline(),
        offset_len: 0.0,
        level: 0,
        parent_bone: String::new(),
    }
}

/// Position of a child point measured from the tip of its parent: 0 at the
/// tip, 1 at the base. Trunk children measure from the top of the bare base.
fn tip_ratio(p: &ChildPoint, level: usize, base_size: f64, scale: f64) -> f64 {
    let base = if level == 1 { base_size * scale } else { 0.0 };
    let span = p.length_par - base;
    if span <= 0.0 {
        return 1.0;
    }
    ((p.length_par - p.offset_len) / span).clamp(0.0, 1.0)
}

/// Orientation of something attached at `p` on a stem of `level - 1`: tilted
/// down from the parent axis and rotated around it by the running rotation.
fn child_orientation(
    params: &TreeParams,
    ctx: &mut GrowthContext,
    level: usize,
    scale: f64,
    p: &ChildPoint,
) -> Quat {
    let row = TreeParams::row(level);
    let down_v = params.down_angle_v[row];
    let down = if down_v < 0.0 {
        ctx.random();
        let ratio = tip_ratio(p, level, params.base_size, scale);
        down_v * (1.0 - 2.0 * shape_ratio(ShapeType::Conical, ratio))
    } else {
        ctx.vary(down_v)
    };

    let rotate = params.rotate[row].to_radians();
    let rotate_v = params.rotate_v[row].to_radians();
    if rotate < 0.0 {
        let magnitude = (rotate + ctx.vary(rotate_v)).abs();
        ctx.rotation = -magnitude.copysign(ctx.rotation);
    } else {
        ctx.rotation += rotate + ctx.vary(rotate_v);
    }

    p.quat
        * axis_rotation(Vec3::Z, ctx.rotation)
        * axis_rotation(Vec3::X, (params.down_angle[row] + down).to_radians())
}

fn child_stem(
    params: &TreeParams,
    ctx: &mut GrowthContext,
    level: usize,
    scale: f64,
    p: &ChildPoint,
    last_level: bool,
) -> Stem {
    let row = TreeParams::row(level);
    let quat = child_orientation(params, ctx, level, scale, p);
    let ratio = tip_ratio(p, level, params.base_size, scale);
    let length = params.length[row] + ctx.vary(params.length_v[row]);

    let branch_len = if level == 1 {
        p.length_par * length * shape_ratio(params.shape, ratio)
    } else {
        length * (p.length_par - 0.6 * p.offset_len)
    }
    .max(0.0);

    let children = if last_level {
        params.leaves as f64 * shape_ratio(params.leaf_dist, ratio)
    } else if level == 1 && params.length[1] > 0.0 {
        let relative = branch_len / p.length_par / params.length[1];
        params.branches[2] * (0.2 + 0.8 * relative)
    } else {
        params.branches[TreeParams::row(level + 1)] * (1.0 - 0.5 * p.offset)
    };

    let rad_start = if p.length_par > 0.0 {
        (p.radius_par.0 * (branch_len / p.length_par).powf(params.ratio_power)).min(p.radius_par.1)
    } else {
        0.0
    };
    let res = params.curve_res[row];
    let (curv, curv_v) = curvature(params, row);
    Stem {
        points: vec![BezierPoint::new(p.co, rad_start)],
        start_dir: rotate_vec(&quat, Vec3::Z),
        curv,
        curv_v,
        vert_att: params.attract_up,
        seg: 0,
        seg_max: res,
        seg_len: branch_len / res as f64,
        children,
        rad_start,
        rad_end: rad_start * (1.0 - params.taper[row]),
        spline: ctx.claim_spline(),
        offset_len: 0.0,
        level,
        parent_bone: p.parent_bone.clone(),
    }
}

/// Grow `stem` through all of its segments. Returns the stem followed by
/// every spline split off it.
pub fn grow_stem(params: &TreeParams, ctx: &mut GrowthContext, stem: Stem) -> Vec<Stem> {
    let row = TreeParams::row(stem.level);
    let res = stem.seg_max;
    let trunk = stem.level == 0;
    let curve_back = params.curve_back[row];
    let curve_back_step =
        ((-2.0 * params.curve[row] + 2.0 * curve_back) / res.max(1) as f64).to_radians();
    let split_angle = params.split_angle[row].to_radians();
    let split_angle_v = params.split_angle_v[row].to_radians();

    let mut splines = vec![stem];
    for k in 0..res {
        let growing = splines.len();
        for i in 0..growing {
            let count = if k == 0 || k + 1 == res {
                0
            } else if k == 1 && trunk {
                params.base_splits
            } else {
                ctx.split.next(params.seg_splits[row])
            };
            let spline = &mut splines[i];
            if k == res / 2 && curve_back != 0.0 {
                spline.curv += curve_back_step;
            }
            let split = Split {
                count,
                angle: split_angle,
                angle_v: split_angle_v,
            };
            let clones = spline.grow(split, ctx, params.close_tip);
            splines.extend(clones);
        }
    }
    splines
}

/// Grow `stem`, shrinking it until every tip fits the pruning envelope when
/// one is configured. Each trial replays the same random stream.
fn grow_pruned(params: &TreeParams, ctx: &mut GrowthContext, stem: Stem, scale: f64) -> Vec<Stem> {
    let Some(envelope) = params.prune else {
        return grow_stem(params, ctx, stem);
    };

    let snapshot = ctx.clone();
    let mut search = PruneSearch::new(envelope.ratio);
    let mut grown = Vec::new();
    while let Some(trial) = search.next_trial() {
        *ctx = snapshot.clone();
        let mut candidate = stem.clone();
        candidate.seg_len *= trial.scale;
        grown = grow_stem(params, ctx, candidate);
        let inside = grown
            .iter()
            .all(|s| envelope.contains(&s.tip(), scale, params.base_size));
        search.record(inside);
    }
    debug!(
        level = stem.level,
        spline = stem.spline,
        trials = search.trials(),
        "stem pruned"
    );
    grown
}
