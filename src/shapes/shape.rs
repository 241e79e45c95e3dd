//! Shape type, per-row cross-section index, and geometric queries.
use super::point::Point;
use crate::image::{luminance_of, PixelSource};
use serde::{Deserialize, Serialize};

/// startX sentinel: a huge minimum, overwritten by any valid value.
const UNINITIALIZED_START_X: i32 = 10_000_000;
/// stopX sentinel: a small maximum, overwritten by any valid value.
const UNINITIALIZED_STOP_X: i32 = 0;

/// Identifier of a shape within one discovery session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u32);

/// Discovered connected region versus a caller-defined rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureType {
    Region,
    Rectangle,
}

/// Inclusive pixel bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn from_point(p: &Point) -> Self {
        Self {
            left: p.x,
            right: p.x,
            top: p.y,
            bottom: p.y,
        }
    }

    pub fn widen(&mut self, p: &Point) {
        if p.x < self.left {
            self.left = p.x;
        }
        if p.x > self.right {
            self.right = p.x;
        }
        if p.y < self.top {
            self.top = p.y;
        }
        if p.y > self.bottom {
            self.bottom = p.y;
        }
    }

    /// Inclusive width in pixels.
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// Inclusive height in pixels.
    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// Inclusive horizontal span of a shape on one row. A run-length record of
/// the scan line passing through the shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSection {
    pub y: i32,
    pub start_x: i32,
    pub stop_x: i32,
}

/// Luminance distribution over a shape's covered pixels.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelStats {
    pub total_luminance: u64,
    pub average_luminance: f64,
    pub min_luminance: u8,
    pub max_luminance: u8,
    pub num_pixels: u64,
}

/// A connected region of edge pixels, or a caller-defined rectangle.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    pub feature_type: FeatureType,
    /// True for shapes produced by discovery, false for caller-defined
    /// rectangles. Carried so serialized shapes record their provenance.
    pub software_discovered: bool,
    pub marked_for_delete: bool,
    pub bounds: BoundingBox,
    pub points: Vec<Point>,
    pub cross_sections: Vec<CrossSection>,
}

impl Shape {
    /// New empty region shape; the bounding box initializes from the first
    /// added point.
    pub fn new_region(id: ShapeId) -> Self {
        Self {
            id,
            feature_type: FeatureType::Region,
            software_discovered: true,
            marked_for_delete: false,
            bounds: BoundingBox {
                left: UNINITIALIZED_START_X,
                right: UNINITIALIZED_STOP_X,
                top: UNINITIALIZED_START_X,
                bottom: UNINITIALIZED_STOP_X,
            },
            points: Vec::new(),
            cross_sections: Vec::new(),
        }
    }

    /// New rectangle shape covering `bounds`; it owns no point list.
    pub fn new_rectangle(id: ShapeId, bounds: BoundingBox) -> Self {
        Self {
            id,
            feature_type: FeatureType::Rectangle,
            software_discovered: false,
            marked_for_delete: false,
            bounds,
            points: Vec::new(),
            cross_sections: Vec::new(),
        }
    }

    pub fn add_point(&mut self, p: Point) {
        if self.points.is_empty() {
            self.bounds = BoundingBox::from_point(&p);
        } else {
            self.bounds.widen(&p);
        }
        self.points.push(p);
    }

    /// Recompute the bounding box from the current point list.
    pub fn find_bounding_box(&mut self) {
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            let mut bounds = BoundingBox::from_point(first);
            for p in iter {
                bounds.widen(p);
            }
            self.bounds = bounds;
        }
    }

    /// Build the per-row cross-section index over `[top, bottom]`.
    ///
    /// Every row of the bounding box gets exactly one entry. Rows without a
    /// trustworthy span are repaired from the bounding box and neighboring
    /// rows; a single-point row is only trusted at the shape's extremities.
    pub fn build_cross_sections(&mut self) {
        let num_rows = self.bounds.height().max(0) as usize;
        self.cross_sections = (0..num_rows)
            .map(|i| CrossSection {
                y: self.bounds.top + i as i32,
                start_x: UNINITIALIZED_START_X,
                stop_x: UNINITIALIZED_STOP_X,
            })
            .collect();

        for p in &self.points {
            let index = (p.y - self.bounds.top) as usize;
            let cross = &mut self.cross_sections[index];
            if p.x < cross.start_x {
                cross.start_x = p.x;
            }
            if p.x > cross.stop_x {
                cross.stop_x = p.x;
            }
        }

        self.repair_cross_sections();
    }

    fn repair_cross_sections(&mut self) {
        let num_rows = self.cross_sections.len();
        for index in 0..num_rows {
            let cross = self.cross_sections[index];

            // A single-point row is ambiguous away from the extremities:
            // we do not know whether to trust it as a start or a stop.
            if cross.start_x == cross.stop_x && index > 0 && index < num_rows - 1 {
                let cross = &mut self.cross_sections[index];
                cross.start_x = UNINITIALIZED_START_X;
                cross.stop_x = UNINITIALIZED_STOP_X;
            }

            if self.cross_sections[index].start_x == UNINITIALIZED_START_X {
                let mut start_x = self.bounds.left;
                if index > 0 {
                    start_x = self.cross_sections[index - 1].start_x;
                } else if num_rows > 2 {
                    // First row: scan downward for the nearest resolved,
                    // non-conflicting value.
                    let stop_here = self.cross_sections[index].stop_x;
                    for lower in index + 1..num_rows {
                        let neighbor = self.cross_sections[lower];
                        if neighbor.start_x != UNINITIALIZED_START_X
                            && neighbor.start_x != stop_here
                        {
                            start_x = neighbor.start_x;
                            break;
                        }
                    }
                }
                self.cross_sections[index].start_x = start_x;
            }

            if self.cross_sections[index].stop_x == UNINITIALIZED_STOP_X {
                let mut stop_x = self.bounds.right;
                if index > 0 {
                    stop_x = self.cross_sections[index - 1].stop_x;
                } else if num_rows > 2 {
                    let start_here = self.cross_sections[index].start_x;
                    for lower in index + 1..num_rows {
                        let neighbor = self.cross_sections[lower];
                        if neighbor.stop_x != UNINITIALIZED_STOP_X && neighbor.stop_x != start_here
                        {
                            stop_x = neighbor.stop_x;
                            break;
                        }
                    }
                }
                self.cross_sections[index].stop_x = stop_x;
            }
        }
    }

    pub fn cross_section_for_row(&self, y: i32) -> Option<&CrossSection> {
        if y < self.bounds.top {
            return None;
        }
        self.cross_sections.get((y - self.bounds.top) as usize)
    }

    /// Covered area in pixels: the inclusive box for rectangles, the summed
    /// cross-section widths for regions.
    pub fn area_in_pixels(&self) -> i64 {
        match self.feature_type {
            FeatureType::Rectangle => {
                i64::from(self.bounds.width()) * i64::from(self.bounds.height())
            }
            FeatureType::Region => self
                .cross_sections
                .iter()
                .filter(|c| c.stop_x >= c.start_x)
                .map(|c| i64::from(c.stop_x - c.start_x + 1))
                .sum(),
        }
    }

    /// Luminance distribution over every covered pixel.
    pub fn pixel_stats(&self, source: &impl PixelSource) -> Result<PixelStats, String> {
        let mut stats = PixelStats {
            min_luminance: u8::MAX,
            ..PixelStats::default()
        };
        self.for_each_covered_pixel(source, |lum| {
            stats.total_luminance += u64::from(lum);
            stats.min_luminance = stats.min_luminance.min(lum);
            stats.max_luminance = stats.max_luminance.max(lum);
            stats.num_pixels += 1;
        })?;
        if stats.num_pixels > 0 {
            stats.average_luminance = stats.total_luminance as f64 / stats.num_pixels as f64;
        } else {
            stats.min_luminance = 0;
        }
        Ok(stats)
    }

    /// Count covered pixels with luminance in `[min, max]`, and the fraction
    /// of the covered area they represent.
    pub fn count_pixels_in_luminance_range(
        &self,
        min: u8,
        max: u8,
        source: &impl PixelSource,
    ) -> Result<(u64, f64), String> {
        let mut in_range = 0u64;
        let mut checked = 0u64;
        self.for_each_covered_pixel(source, |lum| {
            if lum >= min && lum <= max {
                in_range += 1;
            }
            checked += 1;
        })?;
        let fraction = if checked > 0 {
            in_range as f64 / checked as f64
        } else {
            0.0
        };
        Ok((in_range, fraction))
    }

    fn for_each_covered_pixel(
        &self,
        source: &impl PixelSource,
        mut visit: impl FnMut(u8),
    ) -> Result<(), String> {
        let mut row = |y: i32, start_x: i32, stop_x: i32| -> Result<(), String> {
            for x in start_x..=stop_x {
                let packed = source.get_pixel(x, y)?;
                visit(luminance_of(source.parse_pixel(packed)));
            }
            Ok(())
        };
        match self.feature_type {
            FeatureType::Rectangle => {
                for y in self.bounds.top..=self.bounds.bottom {
                    row(y, self.bounds.left, self.bounds.right)?;
                }
            }
            FeatureType::Region => {
                for cross in &self.cross_sections {
                    if cross.stop_x >= cross.start_x {
                        row(cross.y, cross.start_x, cross.stop_x)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fraction of the shape's summed row widths falling inside the probe
    /// rectangle. Zero when the shape covers nothing.
    pub fn compute_overlap(&self, top: i32, bottom: i32, left: i32, right: i32) -> f64 {
        let mut total = 0i64;
        let mut in_overlap = 0i64;
        let mut row = |y: i32, start_x: i32, stop_x: i32| {
            if y >= top && y <= bottom {
                for x in start_x..=stop_x {
                    if x >= left && x <= right {
                        in_overlap += 1;
                    }
                }
            }
            total += i64::from(stop_x - start_x + 1);
        };
        match self.feature_type {
            FeatureType::Rectangle => {
                for y in self.bounds.top..=self.bounds.bottom {
                    row(y, self.bounds.left, self.bounds.right);
                }
            }
            FeatureType::Region => {
                for cross in &self.cross_sections {
                    row(cross.y, cross.start_x, cross.stop_x);
                }
            }
        }
        if total > 0 {
            in_overlap as f64 / total as f64
        } else {
            0.0
        }
    }
}
