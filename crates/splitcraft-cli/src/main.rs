//! splitcraft CLI - command-line front end for splitting meshes across a print bed.
//!
//! Wraps the orchestration in `splitcraft-core` around real STL files on
//! disk: suggest a cutting plane, split along one, or list the printer
//! catalog.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use splitcraft_core::{list_printers, perform_split, suggest_split, FileStore, InMemoryFileStore};
use splitcraft_math::Point3;
use splitcraft_mesh::stl;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "splitcraft")]
#[command(about = "Split 3D meshes into printer-bed-sized, keyed halves", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest a cutting plane for a mesh
    SuggestSplit {
        /// Input STL file
        file: PathBuf,
        /// Force the cut axis (x, y, or z); default auto-picks the longest extent
        #[arg(short, long)]
        axis: Option<String>,
        /// Write the suggested cut's cap visualization to this STL file
        #[arg(short, long)]
        visualization_out: Option<PathBuf>,
    },
    /// Split a mesh by an explicit plane
    Split {
        /// Input STL file
        file: PathBuf,
        /// A point on the plane, as "x,y,z"
        #[arg(short, long)]
        origin: String,
        /// The plane's normal, as "x,y,z" (need not be unit length)
        #[arg(short, long)]
        normal: String,
        /// Skip mating pin/hole keying between the two halves
        #[arg(long)]
        no_keys: bool,
        /// Directory to write the two output halves into
        #[arg(short = 'd', long, default_value = ".")]
        out_dir: PathBuf,
        /// Print the result as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// List the supported printer catalog
    Printers,
}

#[derive(Serialize)]
struct SplitReport {
    half_a: PathBuf,
    volume_a: f64,
    half_b: PathBuf,
    volume_b: f64,
    fallbacks: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,splitcraft=debug".into()),
        )
        .with_writer(std::io::stderr)
        .pretty()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::SuggestSplit {
            file,
            axis,
            visualization_out,
        } => run_suggest_split(file, axis, visualization_out),
        Commands::Split {
            file,
            origin,
            normal,
            no_keys,
            out_dir,
            json,
        } => run_split(file, origin, normal, !no_keys, out_dir, json),
        Commands::Printers => run_printers(),
    }
}

fn run_suggest_split(
    file: PathBuf,
    axis: Option<String>,
    visualization_out: Option<PathBuf>,
) -> Result<()> {
    let store = InMemoryFileStore::new();
    let id = store.put(file.clone());
    let suggestion = suggest_split(&store, id, axis.as_deref())
        .map_err(|e| anyhow!("suggesting a cut for {}: {e}", file.display()))?;

    let n = suggestion.normal.into_inner();
    println!(
        "origin: {:.3}, {:.3}, {:.3}",
        suggestion.origin.x, suggestion.origin.y, suggestion.origin.z
    );
    println!("normal: {:.3}, {:.3}, {:.3}", n.x, n.y, n.z);

    if let Some(out) = visualization_out {
        stl::save_file(&out, &suggestion.visualization)
            .with_context(|| format!("writing {}", out.display()))?;
        println!("visualization written to {}", out.display());
    }
    Ok(())
}

fn run_split(
    file: PathBuf,
    origin: String,
    normal: String,
    add_keys: bool,
    out_dir: PathBuf,
    json: bool,
) -> Result<()> {
    let origin = parse_point3(&origin)?;
    let normal = parse_point3(&normal)?;

    let store = InMemoryFileStore::new();
    let id = store.put(file.clone());
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let output = perform_split(
        &store,
        id,
        &origin,
        &splitcraft_math::Vec3::new(normal.x, normal.y, normal.z),
        add_keys,
        &out_dir,
    )
    .map_err(|e| anyhow!("splitting {}: {e}", file.display()))?;

    let report = SplitReport {
        half_a: output.path_a,
        volume_a: output.volume_a,
        half_b: output.path_b,
        volume_b: output.volume_b,
        fallbacks: output.fallbacks.iter().map(|f| format!("{f:?}")).collect(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "half_a: {} ({:.2} mm^3)",
            report.half_a.display(),
            report.volume_a
        );
        println!(
            "half_b: {} ({:.2} mm^3)",
            report.half_b.display(),
            report.volume_b
        );
        for fallback in &report.fallbacks {
            println!("fallback: {fallback}");
        }
    }
    Ok(())
}

fn run_printers() -> Result<()> {
    for printer in list_printers() {
        let (x, y, z) = printer.bed_size_mm;
        println!(
            "{:<20} bed {:>3}x{:>3}x{:>3} mm  materials: {}",
            printer.name,
            x,
            y,
            z,
            printer.materials.join(", ")
        );
    }
    Ok(())
}

fn parse_point3(s: &str) -> Result<Point3> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(anyhow!("expected \"x,y,z\", got {s:?}"));
    }
    let x: f64 = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("parsing {s:?}"))?;
    let y: f64 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("parsing {s:?}"))?;
    let z: f64 = parts[2]
        .trim()
        .parse()
        .with_context(|| format!("parsing {s:?}"))?;
    Ok(Point3::new(x, y, z))
}
