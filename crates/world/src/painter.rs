//! Paints the plot layout of one chunk into its section store.
//!
//! Layers are written in a fixed order: bedrock, roads, stripes, plots,
//! walls. Palette layers draw from the chunk generator as they go, so the
//! order is part of the output.

use std::ops::Range;

use plotworld_core::XorShiftRng;
use tracing::{debug, trace};

use crate::chunk::{blocks, BiomeGrid, BlockId, ChunkSections, CHUNK_SIZE_X};
use crate::config::PlotWorldConfig;
use crate::cuboid::{fill, Cuboid, Fill};
use crate::grid::{AxisLayout, AxisOffsets, GridOffsets, CHUNK_WIDTH, STRIPE_MIN_ROAD_WIDTH};

/// Roads at most this wide cannot cover a whole chunk axis.
const FULL_ROAD_MIN_WIDTH: u32 = CHUNK_SIZE_X as u32;

const FULL: Range<i32> = 0..CHUNK_WIDTH;

/// Chunk-local `(x, z)` spans of one plot box.
type Footprint = (Range<i32>, Range<i32>);

/// Per-chunk painting state.
pub struct RegionPainter<'a> {
    config: &'a PlotWorldConfig,
    sections: &'a mut ChunkSections,
    rng: &'a mut XorShiftRng,
    max_height: usize,
}

impl<'a> RegionPainter<'a> {
    pub fn new(
        config: &'a PlotWorldConfig,
        sections: &'a mut ChunkSections,
        rng: &'a mut XorShiftRng,
    ) -> Self {
        let max_height = sections.max_height();
        Self {
            config,
            sections,
            rng,
            max_height,
        }
    }

    /// Paint every layer for a chunk with the given grid offsets.
    pub fn paint(&mut self, offsets: GridOffsets, biomes: &mut BiomeGrid) {
        self.paint_floor(biomes);

        if self.is_plain_road(offsets) {
            debug!(?offsets, "chunk is road only");
            self.paint_box(FULL, self.road_rows(), FULL, Fill::Block(self.config.road_block()));
            return;
        }

        let x = AxisLayout::resolve(offsets.x, self.config);
        let z = AxisLayout::resolve(offsets.z, self.config);
        trace!(?x, ?z, "axis layouts");

        self.paint_roads(&x, &z);
        if self.stripes_active() {
            self.paint_stripes(&x, &z);
        }
        self.paint_plots(offsets, &x, &z);
        if self.config.road_width() > 0 {
            self.paint_walls(&x, &z);
        }
    }

    fn stripes_active(&self) -> bool {
        self.config.stripes_enabled() && self.config.road_width() >= STRIPE_MIN_ROAD_WIDTH
    }

    /// Whether the whole chunk is plain road surface.
    fn is_plain_road(&self, offsets: GridOffsets) -> bool {
        if self.config.road_width() <= FULL_ROAD_MIN_WIDTH {
            return false;
        }
        let tile = self.config.tile_size() as i32;
        let stripes = self.stripes_active();
        [offsets.x, offsets.z].iter().any(|axis| {
            if stripes {
                axis.entirely_plain_road(tile)
            } else {
                axis.entirely_road()
            }
        })
    }

    fn paint_floor(&mut self, biomes: &mut BiomeGrid) {
        *biomes = BiomeGrid::filled(self.config.biome());
        self.paint_box(FULL, 0..1, FULL, Fill::Block(blocks::BEDROCK));
    }

    fn paint_roads(&mut self, x: &AxisLayout, z: &AxisLayout) {
        let road = Fill::Block(self.config.road_block());
        for span in &z.roads {
            self.paint_box(FULL, self.road_rows(), span.clone(), road);
        }
        for span in &x.roads {
            self.paint_box(span.clone(), self.road_rows(), FULL, road);
        }
    }

    /// Stripes run along the road edges but stop at road crossings.
    fn paint_stripes(&mut self, x: &AxisLayout, z: &AxisLayout) {
        let y = self.config.wall_height() as i32;
        let stripe = Fill::Block(self.config.road_stripe());
        for &column in &z.stripes {
            for span in x.non_road_spans() {
                self.paint_box(span, y..y + 1, column..column + 1, stripe);
            }
        }
        for &column in &x.stripes {
            for span in z.non_road_spans() {
                self.paint_box(column..column + 1, y..y + 1, span, stripe);
            }
        }
    }

    /// Palette draws follow the box order, so boxes go in classic order
    /// whenever that order covers exactly the plot columns of the layout.
    fn paint_plots(&mut self, offsets: GridOffsets, x: &AxisLayout, z: &AxisLayout) {
        let config = self.config;
        let layout: Vec<Footprint> = x
            .plots
            .iter()
            .flat_map(|xs| z.plots.iter().map(move |zs| (xs.clone(), zs.clone())))
            .collect();
        let classic = classic_plot_order(offsets.x, offsets.z, config.plot_width());
        let footprints = if covered_columns(&classic) == covered_columns(&layout) {
            classic
        } else {
            trace!("plot boxes outside classic order");
            layout
        };

        let top = config.plot_height() as i32;
        for (xs, zs) in footprints {
            self.paint_box(xs.clone(), 1..top, zs.clone(), config.plot_filling().into());
            self.paint_box(xs, top..top + 1, zs, config.plot_top().into());
        }
    }

    /// Walls line both sides of every road, except where roads cross.
    fn paint_walls(&mut self, x: &AxisLayout, z: &AxisLayout) {
        let height = self.config.wall_height() as i32;
        let filling = Fill::Block(self.config.wall_filling());
        let cap = Fill::Block(self.config.wall_cap());
        for &column in &z.walls {
            for span in x.non_road_spans() {
                self.paint_box(span.clone(), 1..height + 1, column..column + 1, filling);
                self.paint_box(span, height + 1..height + 2, column..column + 1, cap);
            }
        }
        for &column in &x.walls {
            for span in z.non_road_spans() {
                self.paint_box(column..column + 1, 1..height + 1, span.clone(), filling);
                self.paint_box(column..column + 1, height + 1..height + 2, span, cap);
            }
        }
    }

    fn road_rows(&self) -> Range<i32> {
        1..self.config.road_height() as i32 + 1
    }

    fn paint_box(&mut self, x: Range<i32>, y: Range<i32>, z: Range<i32>, with: Fill<'_>) {
        let cuboid = Cuboid::new(x, y, z).clamp(self.max_height);
        fill(self.sections, self.rng, &cuboid, with);
    }
}

/// Plot boxes in the order classic plot worlds paint them.
///
/// Only the plot that starts in the chunk and the tail of the previous plot
/// are considered, so tiles narrower than a chunk are not fully covered.
/// Some boxes are painted twice; the second pass redraws the same voxels.
fn classic_plot_order(x: AxisOffsets, z: AxisOffsets, plot_width: u32) -> Vec<Footprint> {
    let tail = |axis: AxisOffsets| {
        if axis.road_edge_in_chunk() {
            0..axis.road_wall()
        } else {
            FULL
        }
    };
    let head = |axis: AxisOffsets| axis.plot_start()..CHUNK_WIDTH;
    let (tail_x, tail_z, head_x, head_z) = (tail(x), tail(z), head(x), head(z));

    let mut boxes = Vec::with_capacity(4);
    let mut push = |xs: &Range<i32>, zs: &Range<i32>| boxes.push((xs.clone(), zs.clone()));

    if plot_width > CHUNK_SIZE_X as u32 {
        if x.road_edge_in_chunk() {
            if z.road_edge_in_chunk() {
                push(&tail_x, &tail_z);
            }
            if z.plot_edge_in_chunk() {
                push(&tail_x, &head_z);
            }
        } else if z.road_edge_in_chunk() && !x.plot_edge_in_chunk() {
            push(&FULL, &tail_z);
        }

        if x.plot_edge_in_chunk() {
            if z.plot_edge_in_chunk() {
                push(&head_x, &head_z);
            } else {
                push(&head_x, &tail_z);
            }
            if z.road_edge_in_chunk() {
                push(&head_x, &tail_z);
            } else if x.road_edge_in_chunk() && !z.plot_edge_in_chunk() {
                push(&tail_x, &FULL);
            }
        } else if z.plot_edge_in_chunk() {
            if !x.road_edge_in_chunk() {
                push(&tail_x, &head_z);
            }
        } else if !z.road_edge_in_chunk() {
            push(&tail_x, &tail_z);
        }
    } else {
        if x.road_edge_in_chunk() {
            if z.road_edge_in_chunk() {
                push(&tail_x, &tail_z);
            }
            if z.plot_edge_in_chunk() {
                push(&tail_x, &head_z);
            }
        }
        if x.plot_edge_in_chunk() {
            if z.plot_edge_in_chunk() {
                push(&head_x, &head_z);
            }
            if z.road_edge_in_chunk() {
                push(&head_x, &tail_z);
            }
        }
    }
    boxes
}

fn covered_columns(footprints: &[Footprint]) -> [[bool; CHUNK_SIZE_X]; CHUNK_SIZE_X] {
    let mut covered = [[false; CHUNK_SIZE_X]; CHUNK_SIZE_X];
    for (xs, zs) in footprints {
        for x in xs.start.max(0)..xs.end.min(CHUNK_WIDTH) {
            for z in zs.start.max(0)..zs.end.min(CHUNK_WIDTH) {
                covered[z as usize][x as usize] = true;
            }
        }
    }
    covered
}

/// Topmost non-air block of a column and its Y.
pub fn surface_block(sections: &ChunkSections, x: usize, z: usize) -> Option<(usize, BlockId)> {
    (0..sections.max_height())
        .rev()
        .map(|y| (y, sections.block(x, y, z)))
        .find(|(_, id)| *id != blocks::AIR)
}
