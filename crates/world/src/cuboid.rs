//! Axis-aligned box fills into chunk section storage.

use std::ops::Range;

use plotworld_core::XorShiftRng;

use crate::chunk::{BlockId, ChunkSections, CHUNK_SIZE_X, CHUNK_SIZE_Z};
use crate::config::BlockPalette;

/// Half-open box `[x) × [y) × [z)` in chunk-local coordinates.
///
/// Bounds may lie outside the chunk until [`Cuboid::clamp`] is applied;
/// inverted ranges are simply empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cuboid {
    pub x: Range<i32>,
    pub y: Range<i32>,
    pub z: Range<i32>,
}

impl Cuboid {
    pub fn new(x: Range<i32>, y: Range<i32>, z: Range<i32>) -> Self {
        Self { x, y, z }
    }

    /// Clamp x/z to the chunk footprint and y to `[0, max_height)`.
    pub fn clamp(self, max_height: usize) -> Self {
        Self {
            x: clamp_range(self.x, CHUNK_SIZE_X as i32),
            y: clamp_range(self.y, max_height as i32),
            z: clamp_range(self.z, CHUNK_SIZE_Z as i32),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Number of voxels covered.
    pub fn volume(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.x.len() * self.y.len() * self.z.len()
    }
}

fn clamp_range(range: Range<i32>, limit: i32) -> Range<i32> {
    let start = range.start.clamp(0, limit);
    let end = range.end.clamp(0, limit);
    start..end.max(start)
}

/// What a fill writes: one block everywhere, or a per-voxel palette draw.
#[derive(Debug, Clone, Copy)]
pub enum Fill<'a> {
    Block(BlockId),
    Palette(&'a BlockPalette),
}

impl<'a> From<&'a BlockPalette> for Fill<'a> {
    fn from(palette: &'a BlockPalette) -> Self {
        match palette.blocks() {
            [only] => Fill::Block(*only),
            _ => Fill::Palette(palette),
        }
    }
}

/// Write `fill` into every voxel of `cuboid`.
///
/// The cuboid must already be clamped to the store. Voxels are visited x, then
/// z, then y; palette fills draw once per voxel in that order, so the order is
/// part of the generated output and must not change.
pub fn fill(sections: &mut ChunkSections, rng: &mut XorShiftRng, cuboid: &Cuboid, fill: Fill<'_>) {
    if cuboid.is_empty() {
        return;
    }
    let (xs, ys, zs) = (to_usize(&cuboid.x), to_usize(&cuboid.y), to_usize(&cuboid.z));
    match fill {
        Fill::Block(id) => {
            for x in xs {
                for z in zs.clone() {
                    for y in ys.clone() {
                        sections.set_block(x, y, z, id);
                    }
                }
            }
        }
        Fill::Palette(palette) => {
            for x in xs {
                for z in zs.clone() {
                    for y in ys.clone() {
                        sections.set_block(x, y, z, palette.pick(rng));
                    }
                }
            }
        }
    }
}

fn to_usize(range: &Range<i32>) -> Range<usize> {
    debug_assert!(range.start >= 0, "unclamped range {range:?}");
    range.start.max(0) as usize..range.end.max(0) as usize
}
