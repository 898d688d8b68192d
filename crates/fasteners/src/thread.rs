//! Helical thread surfaces.
//!
//! A thread is built as stacked rings of `DIVISIONS + 1` points. Each ring
//! descends one pitch over a full turn, so consecutive rings trace a helix.
//! Four rings make one turn of the profile: crest, falling flank, root and
//! rising flank.

use procmesh_kernel::mesh::faces::{Winding, build_face_list_quads, fill_ring_face};
use procmesh_kernel::{MeshBatch, Point3d};
use tracing::debug;

use crate::config::{DIVISIONS, ThreadConfig};
use crate::polar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flank {
    Crest,
    Falling,
    Root,
    Rising,
}

const TURN: [Flank; 4] = [Flank::Crest, Flank::Falling, Flank::Root, Flank::Rising];

impl Flank {
    fn on_major(self) -> bool {
        matches!(self, Flank::Crest | Flank::Falling)
    }

    fn advance(self, thread: &ThreadConfig) -> f64 {
        match self {
            Flank::Crest => thread.crest_height(),
            Flank::Root => thread.root_height(),
            Flank::Falling | Flank::Rising => thread.flank_height(),
        }
    }
}

struct Helix<'a> {
    thread: &'a ThreadConfig,
    inner: f64,
    outer: f64,
    offset: f64,
    verts: Vec<Point3d>,
    rows: usize,
}

impl<'a> Helix<'a> {
    fn new(thread: &'a ThreadConfig, offset: f64) -> Self {
        Self {
            thread,
            inner: thread.minor_dia / 2.0,
            outer: thread.major_dia / 2.0,
            offset,
            verts: Vec::new(),
            rows: 0,
        }
    }

    fn deg_step() -> f64 {
        360.0 / DIVISIONS as f64
    }

    fn height_step(&self) -> f64 {
        self.thread.pitch / DIVISIONS as f64
    }

    /// Radius change per column used to run a thread in or out over one turn.
    fn rank(&self) -> f64 {
        (self.outer - self.inner) / DIVISIONS as f64
    }

    /// Flat ring at constant height.
    fn ring(&mut self, radius: f64, z: f64) {
        self.verts.extend(
            (0..=DIVISIONS).map(|i| polar(i as f64 * Self::deg_step(), radius, z)),
        );
        self.rows += 1;
    }

    /// Emit `count` turns. `shape` maps (turn, flank, column, helix z) to the
    /// ring point's radius and final z.
    fn turns(&mut self, count: usize, mut shape: impl FnMut(usize, Flank, usize, f64) -> (f64, f64)) {
        let step = self.height_step();
        for turn in 0..count {
            for flank in TURN {
                for i in 0..=DIVISIONS {
                    let z = self.offset - step * i as f64;
                    let (radius, z) = shape(turn, flank, i, z);
                    self.verts.push(polar(i as f64 * Self::deg_step(), radius, z));
                }
                self.offset -= flank.advance(self.thread);
                self.rows += 1;
            }
        }
    }

    fn body(&mut self, count: usize) {
        let (inner, outer) = (self.inner, self.outer);
        self.turns(count, |_, flank, _, z| {
            (if flank.on_major() { outer } else { inner }, z)
        });
    }
}

/// Shank, run-in, full turns and tapered run-out of a bolt, hanging below
/// z = 0 and closed at the tip. Returns the mesh and its depth.
pub fn external_thread(
    thread: &ThreadConfig,
    shank_dia: f64,
    shank_length: f64,
    thread_length: f64,
) -> (MeshBatch, f64) {
    let pitch = thread.pitch;
    let mut helix = Helix::new(thread, 0.0);
    let (inner, outer, rank) = (helix.inner, helix.outer, helix.rank());

    // Shank: a straight section and an optional 31 degree taper to the thread.
    let shank_radius = shank_dia / 2.0;
    let mut taper = (shank_radius - outer).abs() / 31f64.to_radians().tan();
    if taper > shank_length {
        taper = 0.0;
    }
    helix.ring(shank_radius, 0.0);
    helix.offset -= shank_length - taper;
    let z = helix.offset;
    helix.ring(shank_radius, z);
    helix.offset -= taper;

    // Run-in: one turn pinned to the top, then two turns where the root
    // sinks in gradually.
    let start = helix.offset;
    helix.offset += pitch;
    helix.turns(1, |_, _, _, z| (outer, z.min(start)));
    helix.turns(2, |turn, flank, i, z| {
        let radius = if flank.on_major() {
            outer
        } else if turn == 0 {
            outer - i as f64 * rank
        } else {
            inner
        };
        (radius, z.min(start))
    });

    let full_turns = ((thread_length - 7.0 * pitch) / pitch).floor().max(0.0) as usize;
    helix.body(full_turns);

    // Run-out: the tip tapers at 45 degrees and is flattened one pitch later.
    let taper_start = helix.offset - 2.0 * pitch;
    let tip = taper_start - pitch;
    helix.turns(4, |_, flank, _, z| {
        let z = z.max(tip);
        let tapered = outer - (taper_start - z);
        let radius = if flank.on_major() {
            if z < taper_start { tapered } else { outer }
        } else {
            tapered.min(inner)
        };
        (radius, z)
    });

    let rows = helix.rows;
    let vertex_count = helix.verts.len();
    let mut faces = build_face_list_quads(0, DIVISIONS, rows - 1, Winding::Default);
    faces.extend(fill_ring_face(vertex_count - DIVISIONS, DIVISIONS, true));
    let batch = MeshBatch::new(helix.verts, faces);
    let depth = -batch.lowest_z().unwrap_or(0.0).min(0.0);
    debug!(rows, full_turns, depth, "external thread built");
    (batch, depth)
}

/// Internal thread of a nut, hanging below z = 0 with inward-facing quads.
/// Returns the mesh and the realised nut height, which is a whole number of
/// pitches.
pub fn internal_thread(thread: &ThreadConfig, height: f64) -> (MeshBatch, f64) {
    let pitch = thread.pitch;
    let mut helix = Helix::new(thread, pitch);
    let (inner, outer, rank) = (helix.inner, helix.outer, helix.rank());

    helix.turns(1, |_, flank, i, z| {
        let radius = if flank.on_major() {
            outer
        } else {
            outer - i as f64 * rank
        };
        (radius, z.min(0.0))
    });

    let full_turns = ((height - pitch) / pitch).round().max(0.0) as usize;
    helix.body(full_turns);

    let end = helix.offset - pitch;
    helix.turns(2, |turn, flank, i, z| {
        let radius = if flank.on_major() || turn > 0 {
            outer
        } else {
            inner + i as f64 * rank
        };
        (radius, z.max(end))
    });

    let faces = build_face_list_quads(0, DIVISIONS, helix.rows - 1, Winding::Flipped);
    debug!(rows = helix.rows, full_turns, height = -end, "internal thread built");
    (MeshBatch::new(helix.verts, faces), -end)
}
