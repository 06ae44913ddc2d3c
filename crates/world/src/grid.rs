//! Plot grid geometry.
//!
//! The world is tiled with `plot_width + road_width` square tiles. Each chunk
//! only needs four numbers to know where tile boundaries cross it: for each
//! axis, how far back from the chunk's trailing edge the current plot starts
//! (`plot_min`) and how far back the road after the previous plot starts
//! (`road_start`). Everything the painter draws is derived from those.
//!
//! Within one tile, along one axis, columns are laid out as:
//!
//! ```text
//! | plot (plot_width) | wall | road ... road | wall |
//!                            ^ stripe   stripe ^
//! ```
//!
//! The two wall columns belong to the road width. Stripes sit just inside the
//! walls and are only drawn for roads wider than 4.

use std::ops::Range;

use crate::chunk::{ChunkPos, CHUNK_SIZE_X};
use crate::config::PlotWorldConfig;

/// Chunk width as used by the grid arithmetic.
pub const CHUNK_WIDTH: i32 = CHUNK_SIZE_X as i32;

/// Roads at most this wide get no stripes.
pub const STRIPE_MIN_ROAD_WIDTH: u32 = 5;

/// Extra tiles added when normalising chunk coordinates so the modulo below
/// never sees a negative value.
const NORMALISE_TILES: i32 = 8;

/// Columns of the road that lie before its centre.
///
/// Even roads have no centre column, so the lower half is one narrower.
pub fn road_width_lower(road_width: u32) -> i32 {
    let half = (road_width / 2) as i32;
    if road_width % 2 == 0 {
        half - 1
    } else {
        half
    }
}

/// Tile boundary offsets of one chunk along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisOffsets {
    /// Distance back from the trailing edge to the first plot column, in `[0, tile)`.
    pub plot_min: i32,
    /// `plot_min + road_width`, wrapped into `[0, tile)`.
    pub road_start: i32,
}

impl AxisOffsets {
    /// Resolve the offsets for chunk coordinate `chunk` along one axis.
    pub fn resolve(chunk: i32, tile: i32, road_width: u32) -> Self {
        let lower = road_width_lower(road_width);
        let normalised = chunk % tile + NORMALISE_TILES * tile;
        let abs = normalised * CHUNK_WIDTH + CHUNK_WIDTH - lower - 1 + NORMALISE_TILES * tile;
        let plot_min = abs % tile;
        let mut road_start = plot_min + road_width as i32;
        if road_start >= tile {
            road_start -= tile;
        }
        Self {
            plot_min,
            road_start,
        }
    }

    /// Chunk-local position of the first plot column of the tile that
    /// starts at or before the trailing edge.
    pub fn plot_start(&self) -> i32 {
        CHUNK_WIDTH - self.plot_min
    }

    /// Chunk-local position of the wall that closes the previous plot.
    pub fn road_wall(&self) -> i32 {
        CHUNK_WIDTH - self.road_start
    }

    /// The current plot starts within the chunk, so `plot_start()..16` is
    /// plot (possibly empty when `plot_min` is 0).
    pub fn plot_edge_in_chunk(&self) -> bool {
        self.plot_min <= CHUNK_WIDTH
    }

    /// The road closing the previous plot starts within the chunk, so
    /// `0..road_wall()` is that plot's tail when plots are wider than a chunk.
    pub fn road_edge_in_chunk(&self) -> bool {
        self.road_start <= CHUNK_WIDTH
    }

    /// The last column of the chunk is road (or the wall opening the road).
    pub fn trailing_edge_in_road(&self) -> bool {
        self.plot_min > self.road_start
    }

    /// Every column of the chunk is road surface.
    pub fn entirely_road(&self) -> bool {
        self.trailing_edge_in_road() && self.road_start > CHUNK_WIDTH
    }

    /// Every column is road surface and neither stripe of the road falls
    /// inside the chunk.
    pub fn entirely_plain_road(&self, tile: i32) -> bool {
        self.entirely_road() && self.road_start > CHUNK_WIDTH + 1 && self.plot_min < tile - 1
    }
}

/// Tile boundary offsets of one chunk along both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridOffsets {
    pub x: AxisOffsets,
    pub z: AxisOffsets,
}

impl GridOffsets {
    /// Resolve the offsets for `pos` under `config`.
    pub fn resolve(config: &PlotWorldConfig, pos: ChunkPos) -> Self {
        let tile = config.tile_size() as i32;
        let road_width = config.road_width();
        Self {
            x: AxisOffsets::resolve(pos.x, tile, road_width),
            z: AxisOffsets::resolve(pos.z, tile, road_width),
        }
    }
}

/// Column runs of one chunk along one axis, clipped to `[0, 16)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisLayout {
    /// Plot interior spans.
    pub plots: Vec<Range<i32>>,
    /// Road surface spans (between the walls).
    pub roads: Vec<Range<i32>>,
    /// Wall columns.
    pub walls: Vec<i32>,
    /// Stripe columns, present only for roads wider than 4.
    pub stripes: Vec<i32>,
}

impl AxisLayout {
    /// Walk the tiles crossing the chunk, starting from the tile whose plot
    /// begins at [`AxisOffsets::plot_start`].
    pub fn resolve(offsets: AxisOffsets, config: &PlotWorldConfig) -> Self {
        let tile = config.tile_size() as i32;
        let plot_width = config.plot_width() as i32;
        let road_width = config.road_width();
        let with_stripes = road_width >= STRIPE_MIN_ROAD_WIDTH;

        let mut layout = Self::default();
        let mut origin = offsets.plot_start();
        while origin > 0 {
            origin -= tile;
        }

        while origin < CHUNK_WIDTH {
            let road_wall = origin + plot_width;
            let plot_wall = origin + tile - 1;
            push_span(&mut layout.plots, origin..road_wall);
            if road_width > 0 {
                push_column(&mut layout.walls, road_wall);
                if plot_wall != road_wall {
                    push_column(&mut layout.walls, plot_wall);
                }
                push_span(&mut layout.roads, road_wall + 1..plot_wall);
            }
            if with_stripes {
                push_column(&mut layout.stripes, road_wall + 1);
                push_column(&mut layout.stripes, plot_wall - 1);
            }
            origin += tile;
        }
        layout
    }

    /// Spans of columns that are not road surface: plots and their walls.
    pub fn non_road_spans(&self) -> Vec<Range<i32>> {
        let mut spans = Vec::with_capacity(self.roads.len() + 1);
        let mut cursor = 0;
        for road in &self.roads {
            push_span(&mut spans, cursor..road.start);
            cursor = road.end;
        }
        push_span(&mut spans, cursor..CHUNK_WIDTH);
        spans
    }

    /// Every column is road surface.
    pub fn is_all_road(&self) -> bool {
        self.roads.len() == 1 && self.roads[0] == (0..CHUNK_WIDTH)
    }
}

fn push_span(spans: &mut Vec<Range<i32>>, span: Range<i32>) {
    let clipped = span.start.max(0)..span.end.min(CHUNK_WIDTH);
    if !clipped.is_empty() {
        spans.push(clipped);
    }
}

fn push_column(columns: &mut Vec<i32>, column: i32) {
    if (0..CHUNK_WIDTH).contains(&column) {
        columns.push(column);
    }
}

/// What a single world coordinate is along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisCell {
    Plot,
    Wall,
    Road,
    Stripe,
}

impl AxisCell {
    /// Road surface, striped or not.
    pub fn is_road(self) -> bool {
        matches!(self, AxisCell::Road | AxisCell::Stripe)
    }
}

/// What a world column is once both axes are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Plot,
    Wall,
    Road,
    RoadStripe,
}

impl ColumnKind {
    /// Classify the world column at `(x, z)` under `config`.
    pub fn at(config: &PlotWorldConfig, x: i32, z: i32) -> Self {
        PlotGrid::new(config).column(x, z)
    }

    /// Map glyph used by debug renderers.
    pub fn glyph(self) -> char {
        match self {
            ColumnKind::Plot => '.',
            ColumnKind::Wall => '#',
            ColumnKind::Road => ':',
            ColumnKind::RoadStripe => '=',
        }
    }
}

/// World-space view of the plot grid, independent of chunk boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotGrid {
    tile: i64,
    plot_width: i64,
    road_width: i64,
    origin: i64,
    stripes: bool,
}

impl PlotGrid {
    /// Grid for `config`. Stripe cells are reported only when the
    /// configuration paints them.
    pub fn new(config: &PlotWorldConfig) -> Self {
        Self {
            tile: i64::from(config.tile_size()),
            plot_width: i64::from(config.plot_width()),
            road_width: i64::from(config.road_width()),
            origin: i64::from(road_width_lower(config.road_width())) + 1,
            stripes: config.stripes_enabled() && config.road_width() >= STRIPE_MIN_ROAD_WIDTH,
        }
    }

    /// Classify a world coordinate along one axis.
    pub fn cell_at(&self, world: i32) -> AxisCell {
        let d = (i64::from(world) - self.origin).rem_euclid(self.tile);
        if d < self.plot_width {
            AxisCell::Plot
        } else if self.road_width > 0 && (d == self.plot_width || d == self.tile - 1) {
            AxisCell::Wall
        } else if self.stripes && (d == self.plot_width + 1 || d == self.tile - 2) {
            AxisCell::Stripe
        } else {
            AxisCell::Road
        }
    }

    /// Classify the world column at `(x, z)`.
    pub fn column(&self, x: i32, z: i32) -> ColumnKind {
        let (ax, az) = (self.cell_at(x), self.cell_at(z));
        let striped = (ax == AxisCell::Stripe && !az.is_road())
            || (az == AxisCell::Stripe && !ax.is_road());
        if striped {
            ColumnKind::RoadStripe
        } else if ax.is_road() || az.is_road() {
            ColumnKind::Road
        } else if ax == AxisCell::Wall || az == AxisCell::Wall {
            ColumnKind::Wall
        } else {
            ColumnKind::Plot
        }
    }
}
