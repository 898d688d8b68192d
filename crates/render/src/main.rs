mod svg;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

use procmesh_fasteners::{BoltConfig, MetricPreset, NutConfig, generate_bolt, generate_nut};
use procmesh_kernel::MeshBatch;
use procmesh_sapling::TreeParams;
use procmesh_tessellation::{StlFormat, TriangleMesh, triangulate, validate_mesh, write_obj, write_stl};

use crate::svg::mesh_to_svg;

#[derive(Parser)]
#[command(name = "procmesh", about = "Procedural bolt, nut and tree meshes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a threaded bolt
    Bolt {
        #[command(flatten)]
        common: CommonArgs,
        /// Metric size overriding the thread and head dimensions (e.g. M8)
        #[arg(long)]
        preset: Option<MetricPreset>,
    },
    /// Generate a nut
    Nut {
        #[command(flatten)]
        common: CommonArgs,
        /// Metric size overriding the thread and body dimensions (e.g. M8)
        #[arg(long)]
        preset: Option<MetricPreset>,
    },
    /// Grow a tree
    Tree {
        #[command(flatten)]
        common: CommonArgs,
        /// Random seed overriding the one in the parameter file
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(clap::Args)]
struct CommonArgs {
    /// JSON parameter file; missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,
    /// Output file stem
    #[arg(long)]
    name: Option<String>,
    /// Formats to write
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Format::Obj, Format::Stl])]
    formats: Vec<Format>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Obj,
    Stl,
    StlAscii,
    Svg,
}

fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn report(name: &str, mesh: &TriangleMesh) {
    let val = validate_mesh(mesh);
    let watertight = if val.is_watertight() { "watertight" } else { "open" };
    let printable = if val.is_printable() { "printable" } else { "not printable" };
    println!(
        "  {name}: {tris} tris, {verts} verts, {watertight}, {printable}, vol={vol:.1}",
        tris = mesh.triangle_count(),
        verts = mesh.vertex_count(),
        vol = val.signed_volume,
    );
    if val.boundary_edges > 0 || val.non_manifold_edges > 0 || val.inconsistent_edges > 0 {
        println!(
            "    boundary_edges={}, non_manifold={}, inconsistent={}",
            val.boundary_edges, val.non_manifold_edges, val.inconsistent_edges
        );
    }
}

fn write_outputs(batch: &MeshBatch, common: &CommonArgs, name: &str) -> Result<()> {
    fs::create_dir_all(&common.out)
        .with_context(|| format!("failed to create {}", common.out.display()))?;
    let mesh = triangulate(batch);
    report(name, &mesh);

    for format in &common.formats {
        let (ext, path) = match format {
            Format::Obj => ("obj", common.out.join(format!("{name}.obj"))),
            Format::Stl | Format::StlAscii => ("stl", common.out.join(format!("{name}.stl"))),
            Format::Svg => ("svg", common.out.join(format!("{name}.svg"))),
        };
        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        match format {
            Format::Obj => write_obj(batch, &mut writer)?,
            Format::Stl => write_stl(&mesh, &mut writer, StlFormat::Binary)?,
            Format::StlAscii => write_stl(&mesh, &mut writer, StlFormat::Ascii)?,
            Format::Svg => {
                let svg = mesh_to_svg(&mesh, 600.0, 600.0, name);
                writer.write_all(svg.as_bytes())?;
            }
        }
        writer
            .flush()
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(format = ext, path = %path.display(), "wrote mesh");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Bolt { common, preset } => {
            let mut config: BoltConfig = load_config(common.config.as_deref())?;
            if let Some(preset) = preset {
                config = preset.apply_to_bolt(config);
            }
            let mesh = generate_bolt(&config).context("bolt generation failed")?;
            let name = common.name.clone().unwrap_or_else(|| match preset {
                Some(p) => format!("bolt_{p}"),
                None => "bolt".to_string(),
            });
            write_outputs(&mesh, &common, &name)
        }
        Command::Nut { common, preset } => {
            let mut config: NutConfig = load_config(common.config.as_deref())?;
            if let Some(preset) = preset {
                config = preset.apply_to_nut(config);
            }
            let mesh = generate_nut(&config).context("nut generation failed")?;
            let name = common.name.clone().unwrap_or_else(|| match preset {
                Some(p) => format!("nut_{p}"),
                None => "nut".to_string(),
            });
            write_outputs(&mesh, &common, &name)
        }
        Command::Tree { common, seed } => {
            let mut params: TreeParams = load_config(common.config.as_deref())?;
            if let Some(seed) = seed {
                params.seed = seed;
            }
            let mesh = procmesh_sapling::generate(&params).context("tree generation failed")?;
            let name = common
                .name
                .clone()
                .unwrap_or_else(|| format!("tree_{}", params.seed));
            write_outputs(&mesh, &common, &name)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
