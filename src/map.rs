//! Top-down ASCII maps of generated regions.

use anyhow::{bail, Result};
use plotworld_world::{
    ChunkPos, ChunkSections, ColumnKind, GeneratedChunk, PlotGenerator, PlotWorldConfig,
    BLOCK_AIR, CHUNK_SIZE_X, CHUNK_SIZE_Z, STRIPE_MIN_ROAD_WIDTH,
};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Largest region the map command renders.
const MAX_REGION_CHUNKS: usize = 64 * 64;

/// Inclusive chunk rectangle `x0,z0,x1,z1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub min: ChunkPos,
    pub max: ChunkPos,
}

impl Region {
    pub fn positions(&self) -> Vec<ChunkPos> {
        let mut positions = Vec::new();
        for z in self.min.z..=self.max.z {
            for x in self.min.x..=self.max.x {
                positions.push(ChunkPos::new(x, z));
            }
        }
        positions
    }

    pub fn width_chunks(&self) -> usize {
        (self.max.x - self.min.x + 1) as usize
    }

    pub fn depth_chunks(&self) -> usize {
        (self.max.z - self.min.z + 1) as usize
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()?;
        let &[x0, z0, x1, z1] = parts.as_slice() else {
            bail!("expected x0,z0,x1,z1, got `{s}`");
        };
        let region = Region {
            min: ChunkPos::new(x0.min(x1), z0.min(z1)),
            max: ChunkPos::new(x0.max(x1), z0.max(z1)),
        };
        let chunks = region.width_chunks().checked_mul(region.depth_chunks());
        if chunks.map_or(true, |n| n > MAX_REGION_CHUNKS) {
            bail!("region `{s}` covers more than {MAX_REGION_CHUNKS} chunks");
        }
        Ok(region)
    }
}

/// Parse a single chunk coordinate `x,z`.
pub fn parse_chunk(s: &str) -> Result<ChunkPos> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()?;
    let &[x, z] = parts.as_slice() else {
        bail!("expected x,z, got `{s}`");
    };
    Ok(ChunkPos::new(x, z))
}

/// Read a column's kind back from its voxels.
///
/// Layers are recognised by block id at their configured heights, so
/// configurations that reuse one block for several layers can read back
/// ambiguously.
pub fn classify_column(
    sections: &ChunkSections,
    config: &PlotWorldConfig,
    x: usize,
    z: usize,
) -> Option<ColumnKind> {
    let at = |y: u32| -> u16 {
        let y = y as usize;
        if y < sections.max_height() {
            sections.block(x, y, z)
        } else {
            BLOCK_AIR
        }
    };
    let plot_y = config.plot_height();
    let wall_y = config.wall_height();
    let road_y = config.road_height();
    let stripes = config.stripes_enabled() && config.road_width() >= STRIPE_MIN_ROAD_WIDTH;

    let plot_body = plot_y == 1 || config.plot_filling().contains(at(plot_y - 1));
    if config.plot_top().contains(at(plot_y)) && plot_body && at(plot_y + 1) == BLOCK_AIR {
        Some(ColumnKind::Plot)
    } else if at(wall_y + 1) == config.wall_cap() && at(wall_y) == config.wall_filling() {
        Some(ColumnKind::Wall)
    } else if stripes
        && at(wall_y) == config.road_stripe()
        && (wall_y != road_y || config.road_stripe() != config.road_block())
    {
        Some(ColumnKind::RoadStripe)
    } else if road_y > 0 && at(road_y) == config.road_block() {
        Some(ColumnKind::Road)
    } else {
        None
    }
}

/// Generated region, one character per column.
pub struct RegionMap {
    rows: Vec<String>,
    unknown: usize,
}

impl RegionMap {
    /// Generate every chunk of `region` in parallel and render it.
    pub fn generate(generator: &PlotGenerator, region: Region, max_height: usize) -> Result<Self> {
        generator.validate_height(max_height)?;
        let chunks = region
            .positions()
            .into_par_iter()
            .map(|pos| generator.generate_chunk(pos, max_height))
            .collect::<Result<Vec<GeneratedChunk>, _>>()?;
        debug!(chunks = chunks.len(), "region generated");
        Ok(Self::render(generator.config(), region, &chunks))
    }

    fn render(config: &PlotWorldConfig, region: Region, chunks: &[GeneratedChunk]) -> Self {
        let width = region.width_chunks() * CHUNK_SIZE_X;
        let depth = region.depth_chunks() * CHUNK_SIZE_Z;
        let mut grid = vec![vec![' '; width]; depth];
        let mut unknown = 0;

        for chunk in chunks {
            let cx = (chunk.position.x - region.min.x) as usize * CHUNK_SIZE_X;
            let cz = (chunk.position.z - region.min.z) as usize * CHUNK_SIZE_Z;
            for z in 0..CHUNK_SIZE_Z {
                for x in 0..CHUNK_SIZE_X {
                    grid[cz + z][cx + x] = match classify_column(&chunk.sections, config, x, z) {
                        Some(kind) => kind.glyph(),
                        None => {
                            unknown += 1;
                            '?'
                        }
                    };
                }
            }
        }

        Self {
            rows: grid.into_iter().map(|row| row.into_iter().collect()).collect(),
            unknown,
        }
    }

    /// Columns whose voxels matched no layer signature.
    pub fn unknown_columns(&self) -> usize {
        self.unknown
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

impl fmt::Display for RegionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
