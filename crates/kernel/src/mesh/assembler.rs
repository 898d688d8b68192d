use std::collections::HashMap;

use tracing::{debug, instrument};

use super::{Face, MeshBatch, MeshError};
use crate::geometry::point::Point3d;

type VertexKey = (i64, i64, i64);

/// Highest usable weld precision. Beyond it the scaled coordinates no longer
/// fit the integer bucket key.
pub const MAX_WELD_PRECISION: u32 = 12;

/// Merges independently indexed batches into one mesh, welding vertices that
/// lie within half a unit of the `precision`-th decimal place of each other.
///
/// Vertices are bucketed by their rounded coordinates; a new vertex is
/// compared against its own bucket and the 26 around it, so points straddling
/// a rounding boundary still weld. The first vertex seen survives, so the
/// result depends on the order in which batches are appended.
#[derive(Debug, Clone)]
pub struct MeshAssembler {
    precision: u32,
    scale: f64,
    tolerance: f64,
    index: HashMap<VertexKey, usize>,
    vertices: Vec<Point3d>,
    faces: Vec<Face>,
    dropped_faces: usize,
}

impl MeshAssembler {
    /// `precision` is clamped to [`MAX_WELD_PRECISION`].
    pub fn new(precision: u32) -> Self {
        let precision = precision.min(MAX_WELD_PRECISION);
        let scale = 10f64.powi(precision as i32);
        Self {
            precision,
            scale,
            tolerance: 0.5 / scale,
            index: HashMap::new(),
            vertices: Vec::new(),
            faces: Vec::new(),
            dropped_faces: 0,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    fn key(&self, p: &Point3d) -> VertexKey {
        let q = |c: f64| (c * self.scale).round() as i64;
        (q(p.x), q(p.y), q(p.z))
    }

    fn intern(&mut self, p: &Point3d) -> usize {
        let key = self.key(p);
        let mut found = self.index.get(&key).copied();
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if (dx, dy, dz) == (0, 0, 0) {
                        continue;
                    }
                    let cell = (key.0 + dx, key.1 + dy, key.2 + dz);
                    let Some(&idx) = self.index.get(&cell) else {
                        continue;
                    };
                    if found.is_some_and(|f| f < idx) {
                        continue;
                    }
                    if self.vertices[idx].distance_to(p) <= self.tolerance {
                        found = Some(idx);
                    }
                }
            }
        }
        if let Some(idx) = found {
            return idx;
        }
        let idx = self.vertices.len();
        self.vertices.push(*p);
        self.index.insert(key, idx);
        idx
    }

    /// Weld `batch` into the mesh. Faces left with fewer than 3 distinct
    /// indices are dropped. A face index outside the batch is an error and
    /// leaves the assembler untouched.
    pub fn append(&mut self, batch: &MeshBatch) -> Result<(), MeshError> {
        let vertex_count = batch.vertices.len();
        for (face_idx, face) in batch.faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }

        let remap: Vec<usize> = batch.vertices.iter().map(|v| self.intern(v)).collect();
        for face in &batch.faces {
            let mut out: Face = Vec::with_capacity(face.len());
            for &i in face {
                let mapped = remap[i];
                if !out.contains(&mapped) {
                    out.push(mapped);
                }
            }
            if out.len() >= 3 {
                self.faces.push(out);
            } else {
                self.dropped_faces += 1;
            }
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn dropped_faces(&self) -> usize {
        self.dropped_faces
    }

    pub fn finish(self) -> MeshBatch {
        debug!(
            vertices = self.vertices.len(),
            faces = self.faces.len(),
            dropped = self.dropped_faces,
            "mesh assembled"
        );
        MeshBatch::new(self.vertices, self.faces)
    }
}

/// Weld a sequence of batches in order.
#[instrument(skip(batches))]
pub fn assemble<'a, I>(batches: I, precision: u32) -> Result<MeshBatch, MeshError>
where
    I: IntoIterator<Item = &'a MeshBatch>,
{
    let mut assembler = MeshAssembler::new(precision);
    for batch in batches {
        assembler.append(batch)?;
    }
    Ok(assembler.finish())
}
