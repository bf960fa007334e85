//! Software rasterization of card and stage trees.

pub mod frame;
pub mod raster;
pub mod text;
