//! Wavefront OBJ and STL writers.

use std::io::{self, Write};

use procmesh_kernel::MeshBatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TriangleMesh;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("mesh has no faces to export")]
    Empty,
    #[error("too many triangles for binary STL: {0}")]
    TooManyTriangles(usize),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    Ascii,
    #[default]
    Binary,
}

const STL_HEADER_SIZE: usize = 80;

/// Write `batch` as OBJ, keeping its polygons. Indices are 1-based.
pub fn write_obj<W: Write>(batch: &MeshBatch, mut writer: W) -> Result<(), ExportError> {
    if batch.faces.is_empty() {
        return Err(ExportError::Empty);
    }
    for v in &batch.vertices {
        writeln!(writer, "v {:.6} {:.6} {:.6}", v.x, v.y, v.z)?;
    }
    for face in &batch.faces {
        write!(writer, "f")?;
        for i in face {
            write!(writer, " {}", i + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn mesh_to_obj(batch: &MeshBatch) -> Result<String, ExportError> {
    let mut out = Vec::new();
    write_obj(batch, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn facet_normal(mesh: &TriangleMesh, tri: [u32; 3]) -> [f32; 3] {
    let [a, b, c] = tri.map(|i| mesh.position(i));
    let n = (b - a).cross(&(c - a));
    match n.normalized() {
        Some(n) => [n.x as f32, n.y as f32, n.z as f32],
        None => [0.0; 3],
    }
}

pub fn write_stl<W: Write>(
    mesh: &TriangleMesh,
    writer: W,
    format: StlFormat,
) -> Result<(), ExportError> {
    if mesh.indices.is_empty() {
        return Err(ExportError::Empty);
    }
    match format {
        StlFormat::Ascii => write_stl_ascii(mesh, writer),
        StlFormat::Binary => write_stl_binary(mesh, writer),
    }
}

fn write_stl_ascii<W: Write>(mesh: &TriangleMesh, mut writer: W) -> Result<(), ExportError> {
    writeln!(writer, "solid procmesh")?;
    for tri in mesh.triangles() {
        let [nx, ny, nz] = facet_normal(mesh, tri);
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for i in tri {
            let p = mesh.position(i);
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid procmesh")?;
    Ok(())
}

fn write_stl_binary<W: Write>(mesh: &TriangleMesh, mut writer: W) -> Result<(), ExportError> {
    let count = mesh.triangle_count();
    let count32 = u32::try_from(count).map_err(|_| ExportError::TooManyTriangles(count))?;

    let mut header = [b' '; STL_HEADER_SIZE];
    let text = b"binary STL written by procmesh";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;
    writer.write_all(&count32.to_le_bytes())?;

    for tri in mesh.triangles() {
        for c in facet_normal(mesh, tri) {
            writer.write_all(&c.to_le_bytes())?;
        }
        for i in tri {
            let at = i as usize * 3;
            for c in &mesh.positions[at..at + 3] {
                writer.write_all(&c.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// ASCII STL as a string.
pub fn mesh_to_stl(mesh: &TriangleMesh) -> Result<String, ExportError> {
    let mut out = Vec::new();
    write_stl(mesh, &mut out, StlFormat::Ascii)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
