use std::f64::consts::TAU;

use procmesh_kernel::geometry::rotation::{axis_rotation, rotate_vec, track_quat};
use procmesh_kernel::{BezierPoint, Point3d, Quat, Vec3};

use crate::context::GrowthContext;

/// A growing branch: a bezier spline plus the state that decides where its
/// next control point goes. Angles are radians per segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Stem {
    pub points: Vec<BezierPoint>,
    /// Heading used while the spline has a single point.
    pub start_dir: Vec3,
    pub curv: f64,
    pub curv_v: f64,
    pub vert_att: f64,
    pub seg: usize,
    pub seg_max: usize,
    pub seg_len: f64,
    /// Expected number of children (or leaves) along the whole stem.
    pub children: f64,
    pub rad_start: f64,
    pub rad_end: f64,
    pub spline: usize,
    /// Distance along the original stem where this spline starts.
    pub offset_len: f64,
    pub level: usize,
    pub parent_bone: String,
}

/// Splitting parameters for one growth step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Split {
    pub count: usize,
    pub angle: f64,
    pub angle_v: f64,
}

impl Split {
    pub const NONE: Self = Self {
        count: 0,
        angle: 0.0,
        angle_v: 0.0,
    };
}

impl Stem {
    pub fn tip(&self) -> Point3d {
        self.points.last().map_or(Point3d::ORIGIN, |p| p.co)
    }

    /// Orientation at the tip: along the last segment, or the start heading
    /// for a spline with a single point.
    pub fn quat(&self) -> Quat {
        match self.points.as_slice() {
            [.., a, b] => track_quat(b.co - a.co),
            _ => track_quat(self.start_dir),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.seg >= self.seg_max
    }

    /// Segments on this spline, not counting those of the stem it split from.
    pub fn own_segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Full length of the stem this spline belongs to.
    pub fn full_length(&self) -> f64 {
        self.seg_len * self.seg_max as f64
    }

    fn radius_at(&self, seg: usize) -> f64 {
        let t = seg as f64 / self.seg_max.max(1) as f64;
        self.rad_start * (1.0 - t) + self.rad_end * t
    }

    pub fn bone_label(&self, index: usize) -> String {
        format!("bone{:02}{:03}.{:02}", self.level, self.spline, index)
    }

    /// Grow one segment, splitting off `split.count` clones first. Returns
    /// the clones, which have already grown their first segment. A terminal
    /// stem does not grow.
    pub fn grow(&mut self, split: Split, ctx: &mut GrowthContext, close_tip: bool) -> Vec<Stem> {
        if self.is_terminal() {
            return Vec::new();
        }
        let dir = self.quat();
        let remaining = (self.seg_max - self.seg) as f64;

        if split.count == 0 {
            let heading = self.heading(ctx, &dir, 0.0, 0.0);
            self.extend(heading, close_tip);
            return Vec::new();
        }

        let angle = ctx.sign() * (split.angle + ctx.vary(split.angle_v));
        let spread = TAU / (split.count + 1) as f64;
        let mut clones = Vec::with_capacity(split.count);
        for i in 1..=split.count {
            let heading = self.heading(ctx, &dir, angle, spread * i as f64);
            let mut clone = self.sprout(ctx.claim_spline(), heading);
            clone.curv -= angle / remaining;
            clone.extend(heading, close_tip);
            clones.push(clone);
        }
        let heading = self.heading(ctx, &dir, angle, 0.0);
        self.curv -= angle / remaining;
        self.extend(heading, close_tip);
        clones
    }

    /// New single-point spline at the tip, sharing this stem's state.
    fn sprout(&self, spline: usize, heading: Vec3) -> Stem {
        let tip = BezierPoint::new(self.tip(), self.radius_at(self.seg));
        Stem {
            points: vec![tip],
            start_dir: heading,
            curv: self.curv,
            curv_v: self.curv_v,
            vert_att: self.vert_att,
            seg: self.seg,
            seg_max: self.seg_max,
            seg_len: self.seg_len,
            children: self.children,
            rad_start: self.rad_start,
            rad_end: self.rad_end,
            spline,
            offset_len: self.offset_len + self.seg_len * self.own_segments() as f64,
            level: self.level,
            parent_bone: self.bone_label(self.own_segments()),
        }
    }

    /// Heading of the next segment: curvature plus `tilt` around local X,
    /// spun by `spin` around the current heading, then pulled upward.
    fn heading(&self, ctx: &mut GrowthContext, dir: &Quat, tilt: f64, spin: f64) -> Vec3 {
        let bend = self.curv + ctx.vary(self.curv_v) + tilt;
        let local = rotate_vec(
            &axis_rotation(Vec3::Z, spin),
            rotate_vec(&axis_rotation(Vec3::X, bend), Vec3::Z),
        );
        let heading = rotate_vec(dir, local);
        if self.vert_att == 0.0 {
            heading
        } else {
            attract_up(heading, self.vert_att, self.seg_max)
        }
    }

    fn extend(&mut self, heading: Vec3, close_tip: bool) {
        let next = self.seg + 1;
        let co = self.tip() + heading.normalize_or(Vec3::Z) * self.seg_len;
        let radius = if next == self.seg_max && close_tip {
            0.0
        } else {
            self.radius_at(next)
        };
        self.points.push(BezierPoint::new(co, radius));
        self.seg = next;
    }
}

/// Rotate `heading` toward world +Z in proportion to its declination.
fn attract_up(heading: Vec3, vert_att: f64, curve_res: usize) -> Vec3 {
    let frame = track_quat(heading);
    let lean = rotate_vec(&frame, Vec3::Y).z.abs();
    let declination = heading.angle_to(&Vec3::Z);
    let angle = vert_att * declination * lean / curve_res.max(1) as f64;
    let axis = rotate_vec(&frame, Vec3::X);
    rotate_vec(&axis_rotation(axis, -angle), heading)
}
