#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod biome;
pub mod rng;

pub use biome::{BiomeId, UnknownBiome};
pub use rng::{chunk_hash, XorShiftRng};
