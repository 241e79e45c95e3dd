//! Connected-shape discovery and per-shape geometry.
//!
//! Shapes are maximal connected components of edge pixels, discovered by a
//! flood fill over the luminance map (see `discovery`). Each shape carries a
//! bounding box and a per-row cross-section index, which back the geometric
//! queries (`area_in_pixels`, `pixel_stats`, overlap). Per-pixel claim state
//! lives in a `PixelGrid` owned by the discovery session; shapes reference it
//! by `ShapeId` rather than by pointer, so deleting a shape is a grid sweep.

mod discovery;
mod grid;
mod point;
mod shape;

pub use discovery::{
    discover_shapes, ShapeScanOptions, ShapeScanResult, MIN_PIXELS_IN_USEFUL_SHAPE,
};
pub use grid::{PixelGrid, PixelState};
pub use point::Point;
pub use shape::{BoundingBox, CrossSection, FeatureType, PixelStats, Shape, ShapeId};
