//! Offline grid compiler.
//!
//! Produces, inspects, and queries the persisted navigation artifact
//! without any editor or engine attached:
//!
//! - `nav-bake bake --scene scene.json --out <dir>` - bake a grid against a
//!   declarative obstacle scene and persist the record
//! - `nav-bake info --data <dir>` - validate and summarize a record
//! - `nav-bake invalidate --data <dir>` - delete the record
//! - `nav-bake query --data <dir> --from x,y,z --to x,y,z` - load the
//!   record and print the waypoints of the shortest path
//!
//! The runtime library only ever loads what this tool wrote.

mod scene;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use nalgebra::Point3;
use nav_grid::{BakeRecord, BakeStore, GridConfig, NavGrid};
use nav_route::NavAgent;

use crate::scene::SceneFile;

/// Offline navigation grid compiler.
#[derive(Parser)]
#[command(name = "nav-bake")]
#[command(about = "Bake, inspect, and query persisted navigation grids", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake a grid against an obstacle scene and persist the record
    Bake {
        /// Scene file describing the grid and its obstacles
        #[arg(long)]
        scene: PathBuf,

        /// Directory the NavGridData folder is created under
        #[arg(long)]
        out: PathBuf,
    },

    /// Validate and summarize a persisted record
    Info {
        /// Directory containing the NavGridData folder
        #[arg(long)]
        data: PathBuf,
    },

    /// Delete a persisted record
    Invalidate {
        /// Directory containing the NavGridData folder
        #[arg(long)]
        data: PathBuf,
    },

    /// Load a record and print the shortest path between two positions
    Query {
        /// Directory containing the NavGridData folder
        #[arg(long)]
        data: PathBuf,

        /// Start position as x,y,z
        #[arg(long)]
        from: String,

        /// Goal position as x,y,z
        #[arg(long)]
        to: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Bake { scene, out } => bake(&scene, &out),
        Commands::Info { data } => info(&data),
        Commands::Invalidate { data } => invalidate(&data),
        Commands::Query { data, from, to } => query(&data, &from, &to),
    }
}

fn bake(scene_path: &std::path::Path, out: &std::path::Path) -> anyhow::Result<()> {
    let scene = SceneFile::load(scene_path)?;

    let mut grid = NavGrid::new(scene.grid);
    grid.bake(&scene.probe());

    let record = BakeRecord::from_grid(&grid);
    let store = BakeStore::new(out);
    store
        .save(&record)
        .with_context(|| format!("persisting bake record under {}", out.display()))?;

    let blocked = record.nav_units.iter().filter(|u| u.is_navigable == 0).count();
    println!(
        "baked {}x{}x{} grid (unit size {}): {} cells, {} blocked",
        grid.size_x(),
        grid.size_y(),
        grid.size_z(),
        grid.unit_size(),
        record.nav_units.len(),
        blocked
    );
    println!("record written to {}", store.record_path().display());
    Ok(())
}

fn info(data: &std::path::Path) -> anyhow::Result<()> {
    let store = BakeStore::new(data);
    let record = store
        .load()
        .with_context(|| format!("loading bake record under {}", data.display()))?;

    let navigable = record.nav_units.iter().filter(|u| u.is_navigable != 0).count();
    println!(
        "grid {}x{}x{}, unit size {}",
        record.nav_grid_size_x, record.nav_grid_size_y, record.nav_grid_size_z, record.nav_unit_size
    );
    println!(
        "{} cells: {} navigable, {} blocked",
        record.nav_units.len(),
        navigable,
        record.nav_units.len() - navigable
    );
    Ok(())
}

fn invalidate(data: &std::path::Path) -> anyhow::Result<()> {
    let store = BakeStore::new(data);
    if store.invalidate()? {
        println!("removed {}", store.record_path().display());
    } else {
        println!("no record at {}", store.record_path().display());
    }
    Ok(())
}

fn query(data: &std::path::Path, from: &str, to: &str) -> anyhow::Result<()> {
    let from = parse_point(from)?;
    let to = parse_point(to)?;

    let mut grid = NavGrid::new(GridConfig::default());
    BakeStore::new(data)
        .load_into(&mut grid)
        .with_context(|| format!("loading bake record under {}", data.display()))?;

    let waypoints = NavAgent::new(&grid).path_to(&from, &to);
    if waypoints.is_empty() {
        println!("no path");
        return Ok(());
    }

    println!("{} waypoints:", waypoints.len());
    for point in waypoints {
        println!("  {:.3}, {:.3}, {:.3}", point.x, point.y, point.z);
    }
    Ok(())
}

fn parse_point(text: &str) -> anyhow::Result<Point3<f64>> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("expected x,y,z but got {text:?}");
    }
    let mut coords = [0.0_f64; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid coordinate {part:?} in {text:?}"))?;
    }
    Ok(Point3::new(coords[0], coords[1], coords[2]))
}
