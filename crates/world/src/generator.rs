//! Chunk generation entry point.

use std::sync::Arc;

use plotworld_core::XorShiftRng;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::chunk::{BiomeGrid, ChunkPos, ChunkSections, VoxelSection, SECTION_HEIGHT};
use crate::config::PlotWorldConfig;
use crate::grid::GridOffsets;
use crate::painter::RegionPainter;

/// Errors raised before a chunk is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// World height must be a positive multiple of the section height.
    #[error("max height {0} is not a positive multiple of {section}", section = SECTION_HEIGHT)]
    InvalidMaxHeight(usize),
    /// A configured layer would be written at or above the world height.
    #[error("{layer} layer at y={y} does not fit below max height {max_height}")]
    HeightOutOfRange {
        layer: &'static str,
        y: u32,
        max_height: usize,
    },
}

/// Result of generating one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedChunk {
    pub position: ChunkPos,
    pub sections: ChunkSections,
    pub biomes: BiomeGrid,
}

impl GeneratedChunk {
    /// Hand over section slots (bottom to top, `None` = all air) and biomes.
    pub fn into_parts(self) -> (Vec<Option<VoxelSection>>, BiomeGrid) {
        (self.sections.into_sections(), self.biomes)
    }
}

/// Everything one generation call owns. Built fresh for every chunk so
/// concurrent calls never share mutable state.
struct ChunkContext {
    position: ChunkPos,
    sections: ChunkSections,
    biomes: BiomeGrid,
    rng: XorShiftRng,
}

impl ChunkContext {
    fn new(position: ChunkPos, max_height: usize) -> Self {
        Self {
            position,
            sections: ChunkSections::new(max_height),
            biomes: BiomeGrid::default(),
            rng: XorShiftRng::for_chunk(position.x, position.z),
        }
    }

    fn finish(self) -> GeneratedChunk {
        GeneratedChunk {
            position: self.position,
            sections: self.sections,
            biomes: self.biomes,
        }
    }
}

/// Plot world chunk generator.
///
/// Holds only the shared read-only configuration; clone it or share it
/// across worker threads freely.
#[derive(Debug, Clone)]
pub struct PlotGenerator {
    config: Arc<PlotWorldConfig>,
}

impl PlotGenerator {
    pub fn new(config: Arc<PlotWorldConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlotWorldConfig {
        &self.config
    }

    /// Check that every layer of the configuration fits in a world
    /// `max_height` blocks tall.
    pub fn validate_height(&self, max_height: usize) -> Result<(), GenerationError> {
        if max_height == 0 || max_height % SECTION_HEIGHT != 0 {
            return Err(GenerationError::InvalidMaxHeight(max_height));
        }
        let config = &self.config;
        let layers = [
            ("plot", config.plot_height()),
            ("road", config.road_height()),
            ("wall", config.wall_height().saturating_add(1)),
        ];
        for (layer, y) in layers {
            if y as usize >= max_height {
                return Err(GenerationError::HeightOutOfRange {
                    layer,
                    y,
                    max_height,
                });
            }
        }
        Ok(())
    }

    /// Grid offsets of `pos`, without generating anything.
    pub fn offsets(&self, pos: ChunkPos) -> GridOffsets {
        GridOffsets::resolve(&self.config, pos)
    }

    /// Generate the chunk at `pos` for a world `max_height` blocks tall.
    #[instrument(skip(self, pos), fields(chunk = %pos))]
    pub fn generate_chunk(
        &self,
        pos: ChunkPos,
        max_height: usize,
    ) -> Result<GeneratedChunk, GenerationError> {
        self.validate_height(max_height)?;

        let mut ctx = ChunkContext::new(pos, max_height);
        let offsets = self.offsets(pos);
        debug!(?offsets, "painting chunk");
        RegionPainter::new(&self.config, &mut ctx.sections, &mut ctx.rng)
            .paint(offsets, &mut ctx.biomes);

        debug!(
            allocated = ctx.sections.allocated_count(),
            "chunk generation complete"
        );
        Ok(ctx.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::blocks;
    use plotworld_core::BiomeId;

    fn generator() -> PlotGenerator {
        PlotGenerator::new(Arc::new(PlotWorldConfig::default()))
    }

    #[test]
    fn generator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlotGenerator>();
        assert_send_sync::<GeneratedChunk>();
    }

    #[test]
    fn rejects_bad_max_height() {
        let generator = generator();
        for height in [0, 15, 100, 257] {
            assert_eq!(
                generator.generate_chunk(ChunkPos::new(0, 0), height),
                Err(GenerationError::InvalidMaxHeight(height))
            );
        }
    }

    #[test]
    fn rejects_layers_above_world() {
        // Default wall cap sits at y=65.
        let err = generator().generate_chunk(ChunkPos::new(0, 0), 64).unwrap_err();
        assert!(matches!(err, GenerationError::HeightOutOfRange { .. }));

        let err = generator().generate_chunk(ChunkPos::new(0, 0), 48).unwrap_err();
        assert_eq!(
            err,
            GenerationError::HeightOutOfRange {
                layer: "plot",
                y: 64,
                max_height: 48
            }
        );
    }

    #[test]
    fn default_chunk_shape() {
        let chunk = generator().generate_chunk(ChunkPos::new(0, 0), 256).unwrap();
        assert_eq!(chunk.position, ChunkPos::new(0, 0));
        assert_eq!(chunk.sections.section_count(), 16);
        // Layers reach y=65, so sections 0..=4 are written and the rest are absent.
        assert_eq!(chunk.sections.allocated_count(), 5);
        assert!(chunk.biomes.as_slice().iter().all(|b| *b == BiomeId::Forest));
        assert_eq!(chunk.sections.block(5, 0, 5), blocks::BEDROCK);

        let (sections, biomes) = chunk.into_parts();
        assert_eq!(sections.len(), 16);
        assert!(sections[5..].iter().all(Option::is_none));
        assert_eq!(biomes.get(0, 0), BiomeId::Forest);
    }

    #[test]
    fn configured_biome_fills_grid() {
        let config = PlotWorldConfig::builder()
            .biome(BiomeId::Desert)
            .build()
            .unwrap();
        let chunk = PlotGenerator::new(Arc::new(config))
            .generate_chunk(ChunkPos::new(-3, 8), 128)
            .unwrap();
        assert!(chunk.biomes.as_slice().iter().all(|b| *b == BiomeId::Desert));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let config = PlotWorldConfig::builder()
            .plot_top(vec![blocks::GRASS, blocks::DIRT, blocks::SAND])
            .plot_filling(vec![blocks::STONE, blocks::GRAVEL])
            .build()
            .unwrap();
        let generator = PlotGenerator::new(Arc::new(config));
        let pos = ChunkPos::new(11, -4);
        let a = generator.generate_chunk(pos, 128).unwrap();
        let _other = generator.generate_chunk(ChunkPos::new(12, -4), 128).unwrap();
        let b = generator.generate_chunk(pos, 128).unwrap();
        assert_eq!(a, b);
    }
}
