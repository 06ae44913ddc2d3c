//! Plot world configuration.
//!
//! [`PlotWorldConfig`] is built once per world and shared read-only by every
//! chunk generation call. All invariants are checked when it is constructed so
//! the painter never has to discover a bad value halfway through a chunk.

use plotworld_core::{BiomeId, XorShiftRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::chunk::{blocks, BlockId};

/// Largest accepted tile size (plot + road). Keeps the grid arithmetic well
/// inside `i32`.
pub const MAX_TILE_SIZE: u32 = 1 << 20;

/// Errors raised while validating plot world settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Plots must be at least one column wide.
    #[error("plot width must be at least 1 (got {0})")]
    PlotWidthTooSmall(u32),
    /// Plot plus road width exceeds [`MAX_TILE_SIZE`].
    #[error("tile size {0} exceeds the maximum of {max}", max = MAX_TILE_SIZE)]
    TileTooLarge(u64),
    /// A palette was configured without any block.
    #[error("{0} palette must contain at least one block")]
    EmptyPalette(&'static str),
    /// A layer would be painted at Y=0 over the bedrock floor.
    #[error("{layer} height must be at least 1 (got {height})")]
    HeightBelowFloor {
        /// Which height setting was rejected.
        layer: &'static str,
        /// The rejected value.
        height: u32,
    },
}

/// Candidate blocks for one layer.
///
/// With a single entry every voxel gets that block. With more entries each
/// voxel draws its own variant from the chunk's generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlockPalette {
    blocks: Vec<BlockId>,
}

impl BlockPalette {
    /// Palette holding exactly one block.
    pub fn single(id: BlockId) -> Self {
        Self { blocks: vec![id] }
    }

    /// Palette from a list of candidates; `layer` names it in the error.
    pub fn new(layer: &'static str, blocks: Vec<BlockId>) -> Result<Self, ConfigError> {
        if blocks.is_empty() {
            return Err(ConfigError::EmptyPalette(layer));
        }
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; palettes are validated non-empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.blocks.len() == 1
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains(&id)
    }

    /// Pick a block, drawing from `rng` only when there is a choice to make.
    #[inline]
    pub fn pick(&self, rng: &mut XorShiftRng) -> BlockId {
        match self.blocks.as_slice() {
            [only] => *only,
            many => many[rng.next_int(many.len() as u32) as usize],
        }
    }
}

impl From<BlockId> for BlockPalette {
    fn from(id: BlockId) -> Self {
        Self::single(id)
    }
}

/// Persisted form of the plot world settings.
///
/// Every field has a default, so a settings file only needs the values it
/// changes. Convert with [`PlotWorldConfig::try_from`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotWorldSettings {
    pub plot_width: u32,
    pub road_width: u32,
    pub plot_height: u32,
    pub road_height: u32,
    pub wall_height: u32,
    pub road_block: BlockId,
    pub road_stripes: BlockId,
    pub road_stripes_enabled: bool,
    pub wall_block: BlockId,
    pub wall_filling: BlockId,
    pub top_block: Vec<BlockId>,
    pub main_block: Vec<BlockId>,
    pub biome: BiomeId,
    pub mob_spawning: bool,
}

impl Default for PlotWorldSettings {
    fn default() -> Self {
        Self {
            plot_width: 42,
            road_width: 7,
            plot_height: 64,
            road_height: 64,
            wall_height: 64,
            road_block: blocks::QUARTZ_BLOCK,
            road_stripes: blocks::QUARTZ_BLOCK,
            road_stripes_enabled: false,
            wall_block: blocks::STONE_SLAB,
            wall_filling: blocks::STONE,
            top_block: vec![blocks::GRASS],
            main_block: vec![blocks::STONE],
            biome: BiomeId::DEFAULT,
            mob_spawning: false,
        }
    }
}

/// Validated, immutable plot world configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotWorldConfig {
    plot_width: u32,
    road_width: u32,
    plot_height: u32,
    road_height: u32,
    wall_height: u32,
    road_block: BlockId,
    road_stripe: BlockId,
    stripes_enabled: bool,
    wall_cap: BlockId,
    wall_filling: BlockId,
    plot_top: BlockPalette,
    plot_filling: BlockPalette,
    biome: BiomeId,
    mob_spawning: bool,
}

impl PlotWorldConfig {
    /// Start from the default settings.
    pub fn builder() -> PlotWorldConfigBuilder {
        PlotWorldConfigBuilder::default()
    }

    /// Plot side length in columns.
    pub fn plot_width(&self) -> u32 {
        self.plot_width
    }

    /// Road width in columns, including its two wall columns.
    pub fn road_width(&self) -> u32 {
        self.road_width
    }

    /// Repeating unit: one plot plus one road.
    pub fn tile_size(&self) -> u32 {
        self.plot_width + self.road_width
    }

    /// Y of the plot top surface.
    pub fn plot_height(&self) -> u32 {
        self.plot_height
    }

    /// Y of the road surface.
    pub fn road_height(&self) -> u32 {
        self.road_height
    }

    /// Y of the last wall filling block; the cap sits one above.
    pub fn wall_height(&self) -> u32 {
        self.wall_height
    }

    pub fn road_block(&self) -> BlockId {
        self.road_block
    }

    pub fn road_stripe(&self) -> BlockId {
        self.road_stripe
    }

    /// Stripes are painted only when enabled and the road is wider than 4.
    pub fn stripes_enabled(&self) -> bool {
        self.stripes_enabled
    }

    pub fn wall_cap(&self) -> BlockId {
        self.wall_cap
    }

    pub fn wall_filling(&self) -> BlockId {
        self.wall_filling
    }

    pub fn plot_top(&self) -> &BlockPalette {
        &self.plot_top
    }

    pub fn plot_filling(&self) -> &BlockPalette {
        &self.plot_filling
    }

    pub fn biome(&self) -> BiomeId {
        self.biome
    }

    /// Whether the host should keep mob spawning enabled for this world.
    ///
    /// The generator never changes spawn settings itself.
    pub fn mob_spawning(&self) -> bool {
        self.mob_spawning
    }

    /// Whether a player may spawn at the given column. Plot worlds allow it
    /// everywhere.
    pub fn can_spawn(&self, _x: i32, _z: i32) -> bool {
        true
    }

    /// Fixed spawn point: above the road crossing at the world origin.
    pub fn spawn_location(&self) -> (i32, i32, i32) {
        (0, self.road_height as i32 + 2, 0)
    }

    /// Highest Y any layer writes to.
    pub fn top_layer_y(&self) -> u32 {
        self.wall_height
            .saturating_add(1)
            .max(self.road_height)
            .max(self.plot_height)
    }

    /// Persisted form of this configuration.
    pub fn to_settings(&self) -> PlotWorldSettings {
        PlotWorldSettings {
            plot_width: self.plot_width,
            road_width: self.road_width,
            plot_height: self.plot_height,
            road_height: self.road_height,
            wall_height: self.wall_height,
            road_block: self.road_block,
            road_stripes: self.road_stripe,
            road_stripes_enabled: self.stripes_enabled,
            wall_block: self.wall_cap,
            wall_filling: self.wall_filling,
            top_block: self.plot_top.blocks().to_vec(),
            main_block: self.plot_filling.blocks().to_vec(),
            biome: self.biome,
            mob_spawning: self.mob_spawning,
        }
    }
}

impl Default for PlotWorldConfig {
    fn default() -> Self {
        Self::builder()
            .build()
            .unwrap_or_else(|err| unreachable!("default plot world settings are valid: {err}"))
    }
}

impl TryFrom<PlotWorldSettings> for PlotWorldConfig {
    type Error = ConfigError;

    fn try_from(settings: PlotWorldSettings) -> Result<Self, Self::Error> {
        if settings.plot_width < 1 {
            return Err(ConfigError::PlotWidthTooSmall(settings.plot_width));
        }
        let tile = u64::from(settings.plot_width) + u64::from(settings.road_width);
        if tile > u64::from(MAX_TILE_SIZE) {
            return Err(ConfigError::TileTooLarge(tile));
        }
        for (layer, height) in [
            ("plot", settings.plot_height),
            ("wall", settings.wall_height),
        ] {
            if height < 1 {
                return Err(ConfigError::HeightBelowFloor { layer, height });
            }
        }
        let plot_top = BlockPalette::new("plot top", settings.top_block)?;
        let plot_filling = BlockPalette::new("plot filling", settings.main_block)?;

        if settings.wall_height > settings.plot_height {
            warn!(
                wall_height = settings.wall_height,
                plot_height = settings.plot_height,
                "wall height exceeds plot height; stripes and walls will float above plots"
            );
        }

        Ok(Self {
            plot_width: settings.plot_width,
            road_width: settings.road_width,
            plot_height: settings.plot_height,
            road_height: settings.road_height,
            wall_height: settings.wall_height,
            road_block: settings.road_block,
            road_stripe: settings.road_stripes,
            stripes_enabled: settings.road_stripes_enabled,
            wall_cap: settings.wall_block,
            wall_filling: settings.wall_filling,
            plot_top,
            plot_filling,
            biome: settings.biome,
            mob_spawning: settings.mob_spawning,
        })
    }
}

/// Builder over [`PlotWorldSettings`] that validates on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct PlotWorldConfigBuilder {
    settings: PlotWorldSettings,
}

impl PlotWorldConfigBuilder {
    pub fn plot_width(mut self, width: u32) -> Self {
        self.settings.plot_width = width;
        self
    }

    pub fn road_width(mut self, width: u32) -> Self {
        self.settings.road_width = width;
        self
    }

    pub fn plot_height(mut self, height: u32) -> Self {
        self.settings.plot_height = height;
        self
    }

    pub fn road_height(mut self, height: u32) -> Self {
        self.settings.road_height = height;
        self
    }

    pub fn wall_height(mut self, height: u32) -> Self {
        self.settings.wall_height = height;
        self
    }

    pub fn road_block(mut self, id: BlockId) -> Self {
        self.settings.road_block = id;
        self
    }

    pub fn road_stripe(mut self, id: BlockId) -> Self {
        self.settings.road_stripes = id;
        self
    }

    pub fn stripes_enabled(mut self, enabled: bool) -> Self {
        self.settings.road_stripes_enabled = enabled;
        self
    }

    pub fn wall_cap(mut self, id: BlockId) -> Self {
        self.settings.wall_block = id;
        self
    }

    pub fn wall_filling(mut self, id: BlockId) -> Self {
        self.settings.wall_filling = id;
        self
    }

    pub fn plot_top(mut self, blocks: impl Into<Vec<BlockId>>) -> Self {
        self.settings.top_block = blocks.into();
        self
    }

    pub fn plot_filling(mut self, blocks: impl Into<Vec<BlockId>>) -> Self {
        self.settings.main_block = blocks.into();
        self
    }

    pub fn biome(mut self, biome: BiomeId) -> Self {
        self.settings.biome = biome;
        self
    }

    pub fn mob_spawning(mut self, enabled: bool) -> Self {
        self.settings.mob_spawning = enabled;
        self
    }

    pub fn build(self) -> Result<PlotWorldConfig, ConfigError> {
        PlotWorldConfig::try_from(self.settings)
    }
}
