mod chunk;
mod config;
mod cuboid;
mod generator;
mod grid;
mod painter;

pub use chunk::*;
pub use config::*;
pub use cuboid::*;
pub use generator::*;
pub use grid::*;
pub use painter::*;
