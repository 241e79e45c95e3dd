//! Per-pixel luminance and Sobel-gradient edge table.
//!
//! Built in two passes over a pixel source:
//!
//! - Pass 1 decodes every pixel and stores its weighted grayscale luminance.
//! - Pass 2 convolves the 3×3 neighborhood (border clamping, no wrap or
//!   zero-padding) to get horizontal and vertical luminance changes, the
//!   Euclidean magnitude, and an 8-octant direction classification. A pixel
//!   whose magnitude clears the threshold is an edge.
//!
//! All queries clamp out-of-range coordinates to the nearest valid pixel, so
//! neighborhood loops never need their own border handling. Entries are
//! immutable once built; the table lives for one analysis pass over one image.
use crate::image::{luminance_of, PixelSource, RasterImage, BLACK, WHITE};
use crate::numeric::round_to_i32;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default gradient-magnitude threshold separating edges from background.
pub const EDGE_DETECTION_THRESHOLD: i32 = 25;

/// A gradient component at or below this is treated as "mostly straight" when
/// classifying the direction octant.
const MAX_GRADIENT_FOR_STRAIGHT_LINE: i32 = 10;

/// Direction of increasing brightness at an edge pixel, in compass octants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradientDirection {
    #[default]
    None,
    BrighterWestToEast,
    BrighterEastToWest,
    BrighterSouthToNorth,
    BrighterNorthToSouth,
    BrighterSwToNe,
    BrighterNwToSe,
    BrighterSeToNw,
    BrighterNeToSw,
}

#[derive(Clone, Copy, Debug, Default)]
struct LuminanceEntry {
    grayscale: u8,
    is_edge: bool,
    direction: GradientDirection,
    magnitude: i32,
}

/// Precomputed luminance/edge grid for one image.
#[derive(Clone, Debug)]
pub struct LuminanceMap {
    w: usize,
    h: usize,
    threshold: i32,
    entries: Vec<LuminanceEntry>,
}

impl LuminanceMap {
    /// Build the table from a pixel source.
    ///
    /// A `threshold` of zero disables edge classification: every pixel keeps
    /// its luminance but none is an edge. Fails only if the source cannot be
    /// read.
    pub fn from_source(source: &impl PixelSource, threshold: i32) -> Result<Self, String> {
        let w = source.width().max(0) as usize;
        let h = source.height().max(0) as usize;
        let mut entries = vec![LuminanceEntry::default(); w * h];

        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let packed = source.get_pixel(x, y)?;
                let rgb = source.parse_pixel(packed);
                entries[y as usize * w + x as usize].grayscale = luminance_of(rgb);
            }
        }

        let mut map = Self {
            w,
            h,
            threshold,
            entries,
        };
        map.classify_gradients();

        debug!(
            "luminance map {}x{}: threshold={} edges={}",
            w,
            h,
            threshold,
            map.edge_count()
        );
        Ok(map)
    }

    fn classify_gradients(&mut self) {
        if self.w == 0 || self.h == 0 {
            return;
        }
        for y in 0..self.h as i32 {
            for x in 0..self.w as i32 {
                let above = i32::from(self.luminance(x, y - 1));
                let below = i32::from(self.luminance(x, y + 1));
                let left = i32::from(self.luminance(x - 1, y));
                let right = i32::from(self.luminance(x + 1, y));
                let above_left = i32::from(self.luminance(x - 1, y - 1));
                let above_right = i32::from(self.luminance(x + 1, y - 1));
                let below_left = i32::from(self.luminance(x - 1, y + 1));
                let below_right = i32::from(self.luminance(x + 1, y + 1));

                let x_change = (2 * right + above_right + below_right)
                    - (2 * left + above_left + below_left);
                let y_change = (2 * above + above_left + above_right)
                    - (2 * below + below_left + below_right);

                let raw = f64::from(x_change * x_change + y_change * y_change).sqrt();
                let magnitude = round_to_i32(raw).clamp(0, 255);

                let entry = &mut self.entries[y as usize * self.w + x as usize];
                if self.threshold > 0 && magnitude >= self.threshold {
                    entry.is_edge = true;
                    entry.magnitude = magnitude;
                    entry.direction = classify_octant(x_change, y_change);
                } else {
                    entry.is_edge = false;
                }
            }
        }
    }

    #[inline]
    fn clamped_index(&self, x: i32, y: i32) -> usize {
        let cx = x.clamp(0, self.w as i32 - 1) as usize;
        let cy = y.clamp(0, self.h as i32 - 1) as usize;
        cy * self.w + cx
    }

    /// Grayscale luminance, clamping out-of-range coordinates.
    #[inline]
    pub fn luminance(&self, x: i32, y: i32) -> u8 {
        self.entries[self.clamped_index(x, y)].grayscale
    }

    #[inline]
    pub fn is_edge(&self, x: i32, y: i32) -> bool {
        self.entries[self.clamped_index(x, y)].is_edge
    }

    #[inline]
    pub fn gradient(&self, x: i32, y: i32) -> i32 {
        self.entries[self.clamped_index(x, y)].magnitude
    }

    #[inline]
    pub fn gradient_direction(&self, x: i32, y: i32) -> GradientDirection {
        self.entries[self.clamped_index(x, y)].direction
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.w as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.h as i32
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn edge_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_edge).count()
    }
}

fn classify_octant(x_change: i32, y_change: i32) -> GradientDirection {
    if y_change.abs() <= MAX_GRADIENT_FOR_STRAIGHT_LINE {
        if x_change >= 0 {
            GradientDirection::BrighterWestToEast
        } else {
            GradientDirection::BrighterEastToWest
        }
    } else if x_change.abs() <= MAX_GRADIENT_FOR_STRAIGHT_LINE {
        if y_change >= 0 {
            GradientDirection::BrighterSouthToNorth
        } else {
            GradientDirection::BrighterNorthToSouth
        }
    } else if x_change >= 0 {
        if y_change >= 0 {
            GradientDirection::BrighterSwToNe
        } else {
            GradientDirection::BrighterNwToSe
        }
    } else if y_change >= 0 {
        GradientDirection::BrighterSeToNw
    } else {
        GradientDirection::BrighterNeToSw
    }
}

/// Render the edge classification as a black-on-white raster.
///
/// This is the "edges image" the line detector votes over, and the image the
/// demos save when asked for the edge map.
pub fn render_edge_image(map: &LuminanceMap) -> RasterImage {
    let mut out = RasterImage::filled(map.w, map.h, WHITE);
    for y in 0..map.height() {
        for x in 0..map.width() {
            if map.is_edge(x, y) {
                out.data[y as usize * map.w + x as usize] = BLACK;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::PixelSource;

    fn gray_image(values: &[&[u8]]) -> RasterImage {
        let h = values.len();
        let w = values[0].len();
        let mut img = RasterImage::new(w, h);
        for (y, row) in values.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                let packed = img.gray_to_pixel(v);
                img.set_pixel(x as i32, y as i32, packed).unwrap();
            }
        }
        img
    }

    #[test]
    fn worked_example_gradient() {
        // Canonical 3x3 neighborhood: xChange = 140-90 = 50,
        // yChange = 60-220 = -160, magnitude = round(sqrt(28100)) = 168.
        let img = gray_image(&[&[10, 15, 20], &[30, 35, 40], &[50, 55, 60]]);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();

        assert_eq!(map.luminance(1, 1), 35);
        assert_eq!(map.gradient(1, 1), 168);
        assert!(map.is_edge(1, 1));
        assert_eq!(
            map.gradient_direction(1, 1),
            GradientDirection::BrighterNwToSe
        );
    }

    #[test]
    fn queries_clamp_out_of_range_coordinates() {
        let img = gray_image(&[&[10, 15, 20], &[30, 35, 40], &[50, 55, 60]]);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();

        assert_eq!(map.luminance(-1, -1), map.luminance(0, 0));
        assert_eq!(map.luminance(3, 3), map.luminance(2, 2));
        assert_eq!(map.is_edge(-5, 1), map.is_edge(0, 1));
        assert_eq!(map.gradient(1, 99), map.gradient(1, 2));
    }

    #[test]
    fn luminance_is_deterministic_across_calls() {
        let img = gray_image(&[&[0, 128], &[255, 64]]);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();
        for _ in 0..3 {
            assert_eq!(map.luminance(0, 0), 0);
            assert_eq!(map.luminance(1, 0), 128);
            assert_eq!(map.luminance(0, 1), 255);
        }
    }

    #[test]
    fn zero_threshold_disables_edges() {
        let img = gray_image(&[&[0, 255], &[255, 0]]);
        let map = LuminanceMap::from_source(&img, 0).unwrap();
        assert_eq!(map.edge_count(), 0);
        assert!(!map.is_edge(0, 0));
    }

    #[test]
    fn edge_image_marks_exactly_the_edge_pixels() {
        let img = gray_image(&[&[10, 15, 20], &[30, 35, 40], &[50, 55, 60]]);
        let map = LuminanceMap::from_source(&img, EDGE_DETECTION_THRESHOLD).unwrap();
        let edges = render_edge_image(&map);
        for y in 0..map.height() {
            for x in 0..map.width() {
                let expected = if map.is_edge(x, y) { BLACK } else { WHITE };
                assert_eq!(edges.get_pixel(x, y).unwrap(), expected, "at ({x},{y})");
            }
        }
    }
}
