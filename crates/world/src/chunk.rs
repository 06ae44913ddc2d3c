use std::fmt;

use plotworld_core::BiomeId;

/// Chunk width (X axis) in voxels.
pub const CHUNK_SIZE_X: usize = 16;
/// Chunk depth (Z axis) in voxels.
pub const CHUNK_SIZE_Z: usize = 16;
/// Section height (Y axis) in voxels.
pub const SECTION_HEIGHT: usize = 16;
/// Voxel count per section.
pub const SECTION_VOLUME: usize = CHUNK_SIZE_X * SECTION_HEIGHT * CHUNK_SIZE_Z;
/// Column count per chunk.
pub const CHUNK_COLUMNS: usize = CHUNK_SIZE_X * CHUNK_SIZE_Z;

/// Block identifier referencing the host's block table.
pub type BlockId = u16;

/// Reserved ID for air.
pub const BLOCK_AIR: BlockId = 0;

/// Block ids used by the default plot world palette.
pub mod blocks {
    use super::BlockId;

    pub const AIR: BlockId = 0;
    pub const STONE: BlockId = 1;
    pub const GRASS: BlockId = 2;
    pub const DIRT: BlockId = 3;
    pub const COBBLESTONE: BlockId = 4;
    pub const PLANKS: BlockId = 5;
    pub const BEDROCK: BlockId = 7;
    pub const SAND: BlockId = 12;
    pub const GRAVEL: BlockId = 13;
    pub const DOUBLE_SLAB: BlockId = 43;
    pub const STONE_SLAB: BlockId = 44;
    pub const MOSSY_COBBLESTONE: BlockId = 48;
    pub const QUARTZ_BLOCK: BlockId = 155;
}

/// Chunk coordinate (X,Z) in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World-space X of the chunk's first column.
    pub const fn origin_x(self) -> i32 {
        self.x * CHUNK_SIZE_X as i32
    }

    /// World-space Z of the chunk's first column.
    pub const fn origin_z(self) -> i32 {
        self.z * CHUNK_SIZE_Z as i32
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Index of a voxel inside a section: `((y & 0xF) << 8) | (z << 4) | x`.
#[inline]
pub fn section_index(x: usize, y: usize, z: usize) -> usize {
    debug_assert!(x < CHUNK_SIZE_X);
    debug_assert!(z < CHUNK_SIZE_Z);
    ((y & 0xF) << 8) | (z << 4) | x
}

/// A 16×16×16 block of voxels.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelSection {
    blocks: Box<[BlockId; SECTION_VOLUME]>,
}

impl VoxelSection {
    /// Allocate a section filled with air.
    pub fn new() -> Self {
        Self {
            blocks: Box::new([BLOCK_AIR; SECTION_VOLUME]),
        }
    }

    /// Block at section-local coordinates; `y` is taken modulo 16.
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[section_index(x, y, z)]
    }

    fn set(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        self.blocks[section_index(x, y, z)] = id;
    }

    /// Raw block array in section index order.
    pub fn as_slice(&self) -> &[BlockId] {
        &self.blocks[..]
    }

    /// Number of blocks that are not air.
    pub fn non_air_count(&self) -> usize {
        self.blocks.iter().filter(|id| **id != BLOCK_AIR).count()
    }
}

impl Default for VoxelSection {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VoxelSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelSection")
            .field("non_air", &self.non_air_count())
            .finish()
    }
}

/// Sparse vertical block storage for one chunk.
///
/// Sections start absent and are allocated on first write; an absent section
/// means "all air" and is handed to the caller as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSections {
    sections: Vec<Option<VoxelSection>>,
}

impl ChunkSections {
    /// Create storage for a world `max_height` blocks tall.
    ///
    /// `max_height` is expected to be a multiple of 16; the generator validates
    /// this before building a store.
    pub fn new(max_height: usize) -> Self {
        debug_assert!(max_height % SECTION_HEIGHT == 0);
        Self {
            sections: vec![None; max_height / SECTION_HEIGHT],
        }
    }

    /// World height covered by this store.
    pub fn max_height(&self) -> usize {
        self.sections.len() * SECTION_HEIGHT
    }

    /// Number of section slots (allocated or not).
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of sections that have been written to.
    pub fn allocated_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_some()).count()
    }

    /// Write one block, allocating its section on demand.
    ///
    /// Out-of-range coordinates are a caller bug and trip a debug assertion.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, id: BlockId) {
        debug_assert!(x < CHUNK_SIZE_X, "x out of range: {x}");
        debug_assert!(z < CHUNK_SIZE_Z, "z out of range: {z}");
        debug_assert!(y < self.max_height(), "y out of range: {y}");
        self.sections[y >> 4]
            .get_or_insert_with(VoxelSection::new)
            .set(x, y, z, id);
    }

    /// Read one block; absent sections read as air.
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.sections
            .get(y >> 4)
            .and_then(Option::as_ref)
            .map_or(BLOCK_AIR, |section| section.get(x, y, z))
    }

    /// Borrow one section slot.
    pub fn section(&self, index: usize) -> Option<&VoxelSection> {
        self.sections.get(index).and_then(Option::as_ref)
    }

    /// Iterate section slots bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = Option<&VoxelSection>> {
        self.sections.iter().map(Option::as_ref)
    }

    /// Hand over the section slots bottom to top.
    pub fn into_sections(self) -> Vec<Option<VoxelSection>> {
        self.sections
    }
}

/// Per-column biome assignment for one chunk, indexed `(z << 4) | x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiomeGrid {
    columns: [BiomeId; CHUNK_COLUMNS],
}

impl BiomeGrid {
    /// Grid with every column set to `biome`.
    pub fn filled(biome: BiomeId) -> Self {
        Self {
            columns: [biome; CHUNK_COLUMNS],
        }
    }

    pub fn set(&mut self, x: usize, z: usize, biome: BiomeId) {
        debug_assert!(x < CHUNK_SIZE_X && z < CHUNK_SIZE_Z);
        self.columns[(z << 4) | x] = biome;
    }

    pub fn get(&self, x: usize, z: usize) -> BiomeId {
        self.columns[(z << 4) | x]
    }

    pub fn as_slice(&self) -> &[BiomeId] {
        &self.columns
    }
}

impl Default for BiomeGrid {
    fn default() -> Self {
        Self::filled(BiomeId::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_index() {
        assert_eq!(section_index(0, 0, 0), 0);
        assert_eq!(section_index(15, 0, 0), 15);
        assert_eq!(section_index(0, 0, 1), 16);
        assert_eq!(section_index(0, 1, 0), 256);
        // Y is taken modulo the section height.
        assert_eq!(section_index(3, 17, 2), (1 << 8) | (2 << 4) | 3);
        assert_eq!(section_index(15, 15, 15), SECTION_VOLUME - 1);
    }

    #[test]
    fn new_store_has_no_sections() {
        let store = ChunkSections::new(256);
        assert_eq!(store.section_count(), 16);
        assert_eq!(store.allocated_count(), 0);
        assert!(store.iter().all(|s| s.is_none()));
        assert_eq!(store.block(4, 100, 4), BLOCK_AIR);
    }

    #[test]
    fn set_block_allocates_only_touched_section() {
        let mut store = ChunkSections::new(256);
        store.set_block(1, 35, 2, blocks::STONE);
        assert_eq!(store.allocated_count(), 1);
        assert!(store.section(2).is_some());
        assert!(store.section(0).is_none());
        assert_eq!(store.block(1, 35, 2), blocks::STONE);

        let section = store.section(2).unwrap();
        assert_eq!(section.get(1, 3, 2), blocks::STONE);
        assert_eq!(section.as_slice()[(3 << 8) | (2 << 4) | 1], blocks::STONE);
        assert_eq!(section.non_air_count(), 1);
    }

    #[test]
    fn overwriting_keeps_last_value() {
        let mut store = ChunkSections::new(32);
        store.set_block(0, 0, 0, blocks::BEDROCK);
        store.set_block(0, 0, 0, blocks::DIRT);
        assert_eq!(store.block(0, 0, 0), blocks::DIRT);
    }

    #[test]
    fn into_sections_preserves_order() {
        let mut store = ChunkSections::new(64);
        store.set_block(0, 48, 0, blocks::GRASS);
        let sections = store.into_sections();
        assert_eq!(sections.len(), 4);
        assert!(sections[0].is_none());
        assert!(sections[3].is_some());
    }

    #[test]
    #[should_panic]
    fn out_of_range_y_is_a_bug() {
        let mut store = ChunkSections::new(16);
        store.set_block(0, 16, 0, blocks::STONE);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "x out of range")]
    fn out_of_range_x_is_a_bug() {
        let mut store = ChunkSections::new(16);
        store.set_block(16, 0, 0, blocks::STONE);
    }

    #[test]
    fn biome_grid_indexing() {
        let mut grid = BiomeGrid::filled(BiomeId::Plains);
        grid.set(3, 4, BiomeId::Desert);
        assert_eq!(grid.get(3, 4), BiomeId::Desert);
        assert_eq!(grid.as_slice()[(4 << 4) | 3], BiomeId::Desert);
        assert_eq!(grid.get(4, 3), BiomeId::Plains);
    }

    #[test]
    fn test_chunk_pos_display() {
        let pos = ChunkPos::new(5, -3);
        assert_eq!(format!("{}", pos), "(5, -3)");
    }

    #[test]
    fn test_chunk_pos_origin() {
        let pos = ChunkPos::new(-2, 3);
        assert_eq!(pos.origin_x(), -32);
        assert_eq!(pos.origin_z(), 48);
    }

    #[test]
    fn test_chunk_pos_serialization() {
        let pos = ChunkPos::new(-5, 10);
        let serialized = serde_json::to_string(&pos).unwrap();
        let deserialized: ChunkPos = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, pos);
    }
}
