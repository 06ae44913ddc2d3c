//! Property-based tests for plot grid generation
//!
//! Validates that every generated column matches the world-space plot grid
//! regardless of:
//! - Plot and road widths (including tiles narrower than a chunk)
//! - Layer heights
//! - Chunk coordinates
//!
//! Critical invariants:
//! - Bedrock covers Y=0 in every column
//! - Each column carries exactly the layers of its kind, nothing else
//! - Palette layers only ever hold palette members
//! - Chunks one tile of chunks apart share their layout

use plotworld_world::{
    blocks, ChunkPos, ChunkSections, ColumnKind, PlotGenerator, PlotGrid, PlotWorldConfig,
    CHUNK_SIZE_X, CHUNK_SIZE_Z,
};
use proptest::prelude::*;
use std::sync::Arc;

const MAX_HEIGHT: usize = 48;

fn config_strategy() -> impl Strategy<Value = PlotWorldConfig> {
    (
        1u32..60,
        0u32..24,
        1u32..20,
        0u32..20,
        1u32..20,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(plot_width, road_width, plot_height, road_height, wall_height, stripes, varied)| {
                let (top, filling) = if varied {
                    (
                        vec![blocks::GRASS, blocks::DIRT],
                        vec![blocks::STONE, blocks::GRAVEL, blocks::SAND],
                    )
                } else {
                    (vec![blocks::GRASS], vec![blocks::STONE])
                };
                PlotWorldConfig::builder()
                    .plot_width(plot_width)
                    .road_width(road_width)
                    .plot_height(plot_height)
                    .road_height(road_height)
                    .wall_height(wall_height)
                    .road_block(blocks::QUARTZ_BLOCK)
                    .road_stripe(blocks::PLANKS)
                    .stripes_enabled(stripes)
                    .wall_cap(blocks::STONE_SLAB)
                    .wall_filling(blocks::COBBLESTONE)
                    .plot_top(top)
                    .plot_filling(filling)
                    .build()
                    .expect("strategy only builds valid configs")
            },
        )
}

/// Check one column against the layers its kind should carry.
fn check_column(
    sections: &ChunkSections,
    config: &PlotWorldConfig,
    x: usize,
    z: usize,
    kind: ColumnKind,
) -> Result<(), String> {
    let plot_y = config.plot_height() as usize;
    let road_y = config.road_height() as usize;
    let wall_y = config.wall_height() as usize;

    for y in 0..sections.max_height() {
        let id = sections.block(x, y, z);
        let ok = if y == 0 {
            id == blocks::BEDROCK
        } else {
            match kind {
                ColumnKind::Plot if y < plot_y => config.plot_filling().contains(id),
                ColumnKind::Plot if y == plot_y => config.plot_top().contains(id),
                ColumnKind::Wall if y <= wall_y => id == config.wall_filling(),
                ColumnKind::Wall if y == wall_y + 1 => id == config.wall_cap(),
                ColumnKind::RoadStripe if y == wall_y => id == config.road_stripe(),
                ColumnKind::Road | ColumnKind::RoadStripe if y <= road_y => {
                    id == config.road_block()
                }
                _ => id == blocks::AIR,
            }
        };
        if !ok {
            return Err(format!("{kind:?} column ({x}, {z}) has block {id} at y={y}"));
        }
    }
    Ok(())
}

proptest! {
    /// Property: Every column matches the world-space grid classification
    ///
    /// Generated voxels agree with `PlotGrid::column` for the column's world
    /// coordinates, so layouts are continuous across chunk seams.
    #[test]
    fn columns_match_world_grid(
        config in config_strategy(),
        chunk_x in -300i32..300i32,
        chunk_z in -300i32..300i32,
    ) {
        let grid = PlotGrid::new(&config);
        let generator = PlotGenerator::new(Arc::new(config));
        let pos = ChunkPos::new(chunk_x, chunk_z);
        let chunk = generator.generate_chunk(pos, MAX_HEIGHT).unwrap();

        for z in 0..CHUNK_SIZE_Z {
            for x in 0..CHUNK_SIZE_X {
                let kind = grid.column(pos.origin_x() + x as i32, pos.origin_z() + z as i32);
                if let Err(message) = check_column(&chunk.sections, generator.config(), x, z, kind) {
                    prop_assert!(false, "chunk {}: {}", pos, message);
                }
            }
        }
    }

    /// Property: Chunks one tile of chunks apart have identical layouts
    ///
    /// With single-block palettes no draw happens, so the voxels match
    /// exactly.
    #[test]
    fn layout_repeats_every_tile(
        plot_width in 1u32..80,
        road_width in 0u32..24,
        stripes in any::<bool>(),
        chunk_x in -50i32..50i32,
        chunk_z in -50i32..50i32,
        k in -3i32..4,
    ) {
        let config = PlotWorldConfig::builder()
            .plot_width(plot_width)
            .road_width(road_width)
            .plot_height(10)
            .road_height(9)
            .wall_height(10)
            .stripes_enabled(stripes)
            .build()
            .unwrap();
        let tile = config.tile_size() as i32;
        let generator = PlotGenerator::new(Arc::new(config));

        let a = generator.generate_chunk(ChunkPos::new(chunk_x, chunk_z), 16).unwrap();
        let b = generator
            .generate_chunk(ChunkPos::new(chunk_x + k * tile, chunk_z - k * tile), 16)
            .unwrap();
        prop_assert_eq!(a.sections, b.sections);
    }

    /// Property: Generation is deterministic
    #[test]
    fn generation_determinism(
        config in config_strategy(),
        chunk_x in -1000i32..1000i32,
        chunk_z in -1000i32..1000i32,
    ) {
        let generator = PlotGenerator::new(Arc::new(config));
        let pos = ChunkPos::new(chunk_x, chunk_z);
        let a = generator.generate_chunk(pos, MAX_HEIGHT).unwrap();
        let b = generator.generate_chunk(pos, MAX_HEIGHT).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Property: Sections above the highest layer stay unallocated
    #[test]
    fn untouched_sections_stay_absent(
        config in config_strategy(),
        chunk_x in -100i32..100i32,
        chunk_z in -100i32..100i32,
    ) {
        let top = config.top_layer_y() as usize;
        let generator = PlotGenerator::new(Arc::new(config));
        let chunk = generator.generate_chunk(ChunkPos::new(chunk_x, chunk_z), 128).unwrap();
        for (index, section) in chunk.sections.iter().enumerate() {
            if index * 16 > top {
                prop_assert!(section.is_none(), "section {} allocated above y={}", index, top);
            }
        }
        prop_assert!(chunk.sections.section(0).is_some());
    }
}
