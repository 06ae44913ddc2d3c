//! plotworld - A deterministic plot-grid chunk generator
//!
//! Host-side tool: loads world settings, generates chunks and renders
//! debug views of the result.

mod config;
mod map;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use map::{Region, RegionMap};
use plotworld_testkit::ChunkHasher;
use plotworld_world::{
    AxisLayout, AxisOffsets, ChunkPos, GeneratedChunk, PlotGenerator, PlotWorldSettings,
};
use serde::Serialize;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot world chunk generator", long_about = None)]
struct Cli {
    /// World settings file (TOML)
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// World height in blocks (multiple of 16)
    #[arg(long, global = true, default_value_t = 256)]
    max_height: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a top-down ASCII map of a chunk region
    Map {
        /// Inclusive chunk rectangle `x0,z0,x1,z1`
        #[arg(long, allow_hyphen_values = true)]
        region: Region,

        /// Write the map to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the grid offsets and contents of one chunk
    Inspect {
        /// Chunk coordinate `x,z`
        #[arg(long, allow_hyphen_values = true, value_parser = map::parse_chunk)]
        chunk: ChunkPos,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the default world settings as TOML
    DefaultConfig {
        /// Write the settings to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::DefaultConfig { output } => {
            let settings = PlotWorldSettings::default();
            match output {
                Some(path) => {
                    config::save_settings(&settings, &path)?;
                    info!("Wrote default settings to {}", path.display());
                }
                None => print!("{}", config::settings_to_toml(&settings)?),
            }
        }
        Command::Map { region, output } => {
            let generator = load_generator(&cli.config)?;
            let map = RegionMap::generate(&generator, region, cli.max_height)?;
            if map.unknown_columns() > 0 {
                tracing::warn!(
                    unknown = map.unknown_columns(),
                    "Some columns did not match any layer; check for blocks shared between layers"
                );
            }
            match output {
                Some(path) => std::fs::write(&path, map.to_string())
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{map}"),
            }
        }
        Command::Inspect { chunk, json } => {
            let generator = load_generator(&cli.config)?;
            let report = inspect(&generator, chunk, cli.max_height)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }
    Ok(())
}

fn load_generator(path: &std::path::Path) -> Result<PlotGenerator> {
    let config = config::load_config(path)?;
    Ok(PlotGenerator::new(Arc::new(config)))
}

#[derive(Debug, Serialize)]
struct AxisReport {
    plot_min: i32,
    road_start: i32,
    plots: Vec<Range<i32>>,
    roads: Vec<Range<i32>>,
    walls: Vec<i32>,
    stripes: Vec<i32>,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    chunk: [i32; 2],
    x: AxisReport,
    z: AxisReport,
    sections: usize,
    allocated_sections: Vec<usize>,
    non_air_blocks: usize,
    digest: String,
}

fn inspect(generator: &PlotGenerator, pos: ChunkPos, max_height: usize) -> Result<InspectReport> {
    let offsets = generator.offsets(pos);
    let axis = |offsets: AxisOffsets| {
        let layout = AxisLayout::resolve(offsets, generator.config());
        AxisReport {
            plot_min: offsets.plot_min,
            road_start: offsets.road_start,
            plots: layout.plots,
            roads: layout.roads,
            walls: layout.walls,
            stripes: layout.stripes,
        }
    };
    let chunk = generator.generate_chunk(pos, max_height)?;
    Ok(InspectReport {
        chunk: [pos.x, pos.z],
        x: axis(offsets.x),
        z: axis(offsets.z),
        sections: chunk.sections.section_count(),
        allocated_sections: chunk
            .sections
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|_| i))
            .collect(),
        non_air_blocks: chunk.sections.iter().flatten().map(|s| s.non_air_count()).sum(),
        digest: digest(&chunk),
    })
}

fn digest(chunk: &GeneratedChunk) -> String {
    let mut hasher = ChunkHasher::new(chunk.position.x, chunk.position.z);
    for section in chunk.sections.iter() {
        hasher.section(section.map(|s| s.as_slice()));
    }
    hasher.biomes(chunk.biomes.as_slice().iter().map(|b| b.as_u8()));
    hasher.finish().to_hex()
}

impl std::fmt::Display for InspectReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "chunk ({}, {})", self.chunk[0], self.chunk[1])?;
        for (name, axis) in [("x", &self.x), ("z", &self.z)] {
            writeln!(
                f,
                "  {name}: plot_min={} road_start={} plots={:?} roads={:?} walls={:?} stripes={:?}",
                axis.plot_min, axis.road_start, axis.plots, axis.roads, axis.walls, axis.stripes
            )?;
        }
        writeln!(
            f,
            "  sections: {}/{} allocated {:?}",
            self.allocated_sections.len(),
            self.sections,
            self.allocated_sections
        )?;
        writeln!(f, "  non-air blocks: {}", self.non_air_blocks)?;
        writeln!(f, "  digest: {}", self.digest)
    }
}
