//! Flood-fill discovery of connected edge-pixel shapes.
//!
//! A raster scan seeds a new shape at every unclaimed edge pixel, then grows
//! it over the 8-neighborhood with a pending stack until no candidates
//! remain. A popped pixel with at most one live connection is flagged as a
//! dangling border pixel. Shapes below the minimum useful size are dropped,
//! but their pixels stay claimed so they cannot seed again. Surviving shapes
//! get bounding boxes and cross-section indexes.
use super::grid::PixelGrid;
use super::point::Point;
use super::shape::{Shape, ShapeId};
use crate::luminance::{LuminanceMap, EDGE_DETECTION_THRESHOLD};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Shapes smaller than this are noise, not features.
pub const MIN_PIXELS_IN_USEFUL_SHAPE: usize = 30;

const NEIGH_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeScanOptions {
    /// Gradient-magnitude threshold used when building the luminance map.
    pub edge_threshold: i32,
    /// Discard shapes with fewer pixels than this.
    pub min_shape_pixels: usize,
}

impl Default for ShapeScanOptions {
    fn default() -> Self {
        Self {
            edge_threshold: EDGE_DETECTION_THRESHOLD,
            min_shape_pixels: MIN_PIXELS_IN_USEFUL_SHAPE,
        }
    }
}

/// Output of one discovery pass.
#[derive(Debug)]
pub struct ShapeScanResult {
    pub shapes: Vec<Shape>,
    pub grid: PixelGrid,
    pub elapsed_ms: f64,
}

struct ShapeScan<'a> {
    map: &'a LuminanceMap,
    grid: PixelGrid,
    pending: Vec<Point>,
    shapes: Vec<Shape>,
    next_id: u32,
    min_pixels: usize,
}

impl<'a> ShapeScan<'a> {
    fn new(map: &'a LuminanceMap, options: &ShapeScanOptions) -> Self {
        Self {
            map,
            grid: PixelGrid::new(map.width() as usize, map.height() as usize),
            pending: Vec::with_capacity(64),
            shapes: Vec::new(),
            next_id: 1,
            min_pixels: options.min_shape_pixels,
        }
    }

    fn alloc_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn run(mut self) -> ShapeScanResult {
        let start = Instant::now();
        let mut discarded = 0usize;

        for x in 0..self.map.width() {
            for y in 0..self.map.height() {
                let claimed = self
                    .grid
                    .get(x, y)
                    .map(|state| state.interior)
                    .unwrap_or(true);
                if claimed || !self.map.is_edge(x, y) {
                    continue;
                }
                if !self.grow_shape(x, y) {
                    discarded += 1;
                }
            }
        }

        // Second filter pass: anything marked for deletion (or that shrank
        // below the minimum) releases its grid cells entirely.
        let min_pixels = self.min_pixels;
        let grid = &mut self.grid;
        self.shapes.retain(|shape| {
            if shape.marked_for_delete || shape.points.len() < min_pixels {
                grid.clear_shape(shape.id);
                return false;
            }
            true
        });

        for shape in &mut self.shapes {
            shape.build_cross_sections();
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
        debug!(
            "shape scan: kept={} discarded={} in {:.2}ms",
            self.shapes.len(),
            discarded,
            elapsed_ms
        );

        ShapeScanResult {
            shapes: self.shapes,
            grid: self.grid,
            elapsed_ms,
        }
    }

    /// Flood-fill one shape from a seed pixel. Returns false if the finished
    /// shape was below the minimum size and dropped.
    fn grow_shape(&mut self, seed_x: i32, seed_y: i32) -> bool {
        let id = self.alloc_id();
        let mut shape = Shape::new_region(id);

        let seed = Point::new(seed_x, seed_y);
        self.claim(seed, id);
        shape.add_point(seed);
        self.pending.clear();
        self.pending.push(seed);

        while let Some(point) = self.pending.pop() {
            let mut neighbors_found = 0u32;
            for (dx, dy) in NEIGH_OFFSETS {
                let nx = point.x + dx;
                let ny = point.y + dy;
                let Some(state) = self.grid.get(nx, ny) else {
                    continue;
                };
                if state.interior {
                    neighbors_found += 1;
                } else if self.map.is_edge(nx, ny) {
                    let neighbor = Point::new(nx, ny);
                    self.claim(neighbor, id);
                    shape.add_point(neighbor);
                    self.pending.push(neighbor);
                    neighbors_found += 1;
                }
            }
            // Exactly one live connection marks the endpoint of a thin border.
            if neighbors_found <= 1 {
                if let Some(state) = self.grid.get_mut(point.x, point.y) {
                    state.dangling_border = true;
                }
            }
        }

        if shape.points.len() < self.min_pixels {
            // The pixels stay claimed so they cannot seed another shape, but
            // nothing may keep pointing at the dropped id.
            self.grid.orphan_shape(id);
            return false;
        }

        shape.find_bounding_box();
        self.shapes.push(shape);
        true
    }

    fn claim(&mut self, p: Point, id: ShapeId) {
        if let Some(state) = self.grid.get_mut(p.x, p.y) {
            state.interior = true;
            state.shape = Some(id);
        }
    }
}

/// Discover all connected edge-pixel shapes in a populated luminance map.
pub fn discover_shapes(map: &LuminanceMap, options: &ShapeScanOptions) -> ShapeScanResult {
    ShapeScan::new(map, options).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{PixelSource, RasterImage};

    /// White canvas with one filled dark rectangle.
    fn image_with_block(w: usize, h: usize, left: i32, top: i32, size: i32) -> RasterImage {
        let mut img = RasterImage::new(w, h);
        let white = img.gray_to_pixel(255);
        let dark = img.gray_to_pixel(20);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let inside =
                    x >= left && x < left + size && y >= top && y < top + size;
                img.set_pixel(x, y, if inside { dark } else { white }).unwrap();
            }
        }
        img
    }

    #[test]
    fn block_outline_becomes_one_shape() {
        let img = image_with_block(40, 40, 10, 10, 12);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();
        let result = discover_shapes(&map, &ShapeScanOptions::default());

        assert_eq!(result.shapes.len(), 1, "one connected outline expected");
        let shape = &result.shapes[0];
        assert!(shape.points.len() >= MIN_PIXELS_IN_USEFUL_SHAPE);
        assert!(shape.bounds.left <= 10 && shape.bounds.right >= 21);
        assert_eq!(
            shape.cross_sections.len(),
            shape.bounds.height() as usize
        );
    }

    #[test]
    fn every_edge_pixel_belongs_to_at_most_one_shape() {
        let img = image_with_block(60, 40, 5, 5, 10);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();
        let result = discover_shapes(&map, &ShapeScanOptions::default());

        for y in 0..map.height() {
            for x in 0..map.width() {
                let state = result.grid.get(x, y).unwrap();
                if map.is_edge(x, y) {
                    // Claimed by exactly one shape, or dropped with an
                    // undersized shape (claimed but unowned).
                    assert!(state.interior, "edge pixel ({x},{y}) unclaimed");
                    match state.shape {
                        Some(id) => {
                            let owners = result
                                .shapes
                                .iter()
                                .filter(|s| s.points.contains(&Point::new(x, y)))
                                .count();
                            assert_eq!(owners, 1, "pixel ({x},{y}) id {id:?}");
                        }
                        None => {
                            // Must not appear in any kept shape's point list.
                            assert!(result
                                .shapes
                                .iter()
                                .all(|s| !s.points.contains(&Point::new(x, y))));
                        }
                    }
                } else {
                    assert!(state.shape.is_none());
                }
            }
        }
    }

    #[test]
    fn tiny_specks_are_dropped() {
        // A dot's edge ring is far below the minimum shape size.
        let img = image_with_block(30, 30, 14, 14, 1);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();
        let result = discover_shapes(&map, &ShapeScanOptions::default());
        assert!(result.shapes.is_empty());
    }

    #[test]
    fn custom_minimum_keeps_small_shapes() {
        let img = image_with_block(30, 30, 14, 14, 2);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();
        let options = ShapeScanOptions {
            min_shape_pixels: 4,
            ..ShapeScanOptions::default()
        };
        let result = discover_shapes(&map, &options);
        assert!(!result.shapes.is_empty());
    }
}
