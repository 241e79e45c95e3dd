//! High-level analysis session over one cell image.
//!
//! [`CellImage`] ties the pipeline stages together: it builds the luminance
//! table, runs shape discovery, and keeps the resulting shapes, per-pixel
//! claim grid, and any caller-created inspection regions in one place. The
//! rendering methods produce annotated rasters without touching the source
//! bitmap, so a session can be re-rendered with different overlay options.
pub mod draw;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::image::{PixelSource, RasterImage, ANNOTATION_BLUE, BLACK, HIGHLIGHT_RED, WHITE};
use crate::lines::{detect_lines, LineDetectionResult, LineOptions};
use crate::luminance::{render_edge_image, LuminanceMap, EDGE_DETECTION_THRESHOLD};
use crate::shapes::{
    discover_shapes, BoundingBox, FeatureType, PixelGrid, Shape, ShapeId, ShapeScanOptions,
    MIN_PIXELS_IN_USEFUL_SHAPE,
};

const LIGHT_GRAY: u32 = 0x00DD_DDDD;
const GREEN: u32 = 0x0000_FF00;

/// Per-shape colors cycled through when rendering in color.
const COLOR_PALETTE: [u32; 8] = [
    ANNOTATION_BLUE,
    GREEN,
    0x00FF_00FF,
    0x00FF_FF00,
    0x00FF_7700,
    0x0000_FFFF,
    0x0077_0000,
    0x0000_7700,
];
/// In gray mode every shape is drawn black on white.
const GRAY_PALETTE: [u32; 1] = [BLACK];

/// A shape must cover at least this fraction of its own area inside the probe
/// rectangle to qualify as an inspection region.
const MIN_OVERLAP_FOR_INSPECT_REGION: f64 = 0.6;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerOptions {
    /// Gradient-magnitude threshold for the luminance map.
    pub edge_threshold: i32,
    /// Discard discovered shapes smaller than this.
    pub min_shape_pixels: usize,
    /// Erase the canvas to the background color before drawing features.
    pub outlines_only: bool,
    /// Fill the area between a shape's borders with the interior color.
    pub draw_shape_interiors: bool,
    /// Black shapes on white with light-gray interiors, for printouts.
    /// Implies `draw_shape_interiors`.
    pub draw_interior_as_gray: bool,
    /// Overlay every cross-section span in red.
    pub draw_scanlines: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            edge_threshold: EDGE_DETECTION_THRESHOLD,
            min_shape_pixels: MIN_PIXELS_IN_USEFUL_SHAPE,
            outlines_only: false,
            draw_shape_interiors: false,
            draw_interior_as_gray: false,
            draw_scanlines: false,
        }
    }
}

/// How an inspection region's rectangle is positioned on the image.
///
/// The four offsets are interpreted per variant; every mode validates them
/// against the image dimensions before creating the region.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum InspectRegionPlacement {
    /// Offsets grow outward from the image center.
    RelativeToMiddle {
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    },
    /// Offsets shrink inward from the image edges.
    RelativeToEdges {
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    },
    /// Offsets are absolute pixel coordinates.
    Absolute {
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    },
    /// Adopt the largest discovered shape mostly inside the probe rectangle.
    FromEdgeDetection {
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    },
}

impl InspectRegionPlacement {
    fn offsets(&self) -> (i32, i32, i32, i32) {
        match *self {
            InspectRegionPlacement::RelativeToMiddle {
                top,
                bottom,
                left,
                right,
            }
            | InspectRegionPlacement::RelativeToEdges {
                top,
                bottom,
                left,
                right,
            }
            | InspectRegionPlacement::Absolute {
                top,
                bottom,
                left,
                right,
            }
            | InspectRegionPlacement::FromEdgeDetection {
                top,
                bottom,
                left,
                right,
            } => (top, bottom, left, right),
        }
    }
}

/// One analysis session: the source bitmap plus everything derived from it.
#[derive(Debug)]
pub struct CellImage {
    image: RasterImage,
    luminance: LuminanceMap,
    grid: PixelGrid,
    shapes: Vec<Shape>,
    inspect_regions: Vec<Shape>,
    next_region_id: u32,
}

impl CellImage {
    /// Run the luminance and shape-discovery stages over `image`.
    pub fn analyze(image: RasterImage, options: &AnalyzerOptions) -> Result<Self, String> {
        let luminance = LuminanceMap::from_source(&image, options.edge_threshold)?;
        let scan = discover_shapes(
            &luminance,
            &ShapeScanOptions {
                edge_threshold: options.edge_threshold,
                min_shape_pixels: options.min_shape_pixels,
            },
        );
        let next_region_id = scan.shapes.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        debug!(
            "analyzed {}x{} image: {} shapes in {:.2}ms",
            image.width(),
            image.height(),
            scan.shapes.len(),
            scan.elapsed_ms
        );
        Ok(Self {
            image,
            luminance,
            grid: scan.grid,
            shapes: scan.shapes,
            inspect_regions: Vec::new(),
            next_region_id,
        })
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn luminance(&self) -> &LuminanceMap {
        &self.luminance
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn inspect_regions(&self) -> &[Shape] {
        &self.inspect_regions
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Remove a discovered shape, releasing its claimed pixels.
    pub fn delete_shape(&mut self, id: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        if self.shapes.len() == before {
            return false;
        }
        self.grid.clear_shape(id);
        true
    }

    /// Create an inspection region and return a reference to it.
    ///
    /// Rectangle modes build a new rectangle shape from the placement's
    /// offsets, clamped to the image. `FromEdgeDetection` instead adopts a
    /// copy of the largest discovered shape whose area lies mostly inside the
    /// probe rectangle, and fails when no shape qualifies.
    pub fn create_inspect_region(
        &mut self,
        placement: InspectRegionPlacement,
    ) -> Result<&Shape, String> {
        let (top, bottom, left, right) = placement.offsets();
        let width = self.image.width();
        let height = self.image.height();
        if top < 0
            || top >= height
            || bottom < 0
            || bottom >= height
            || left < 0
            || left >= width
            || right < 0
            || right >= width
            || left > right
            || top > bottom
        {
            return Err(format!(
                "inspect offsets (top={top}, bottom={bottom}, left={left}, right={right}) \
                 invalid for {width}x{height} image"
            ));
        }

        let region = match placement {
            InspectRegionPlacement::RelativeToMiddle { .. } => {
                let middle_x = width / 2;
                let middle_y = height / 2;
                self.new_rectangle_region(BoundingBox {
                    left: middle_x - left,
                    right: middle_x + right,
                    top: middle_y - top,
                    bottom: middle_y + bottom,
                })
            }
            InspectRegionPlacement::RelativeToEdges { .. } => {
                self.new_rectangle_region(BoundingBox {
                    left,
                    right: width - 1 - right,
                    top,
                    bottom: height - 1 - bottom,
                })
            }
            InspectRegionPlacement::Absolute { .. } => self.new_rectangle_region(BoundingBox {
                left,
                right,
                top,
                bottom,
            }),
            InspectRegionPlacement::FromEdgeDetection { .. } => {
                let mut best: Option<&Shape> = None;
                let mut best_area = 0i64;
                for shape in &self.shapes {
                    if shape.compute_overlap(top, bottom, left, right)
                        < MIN_OVERLAP_FOR_INSPECT_REGION
                    {
                        continue;
                    }
                    let area = shape.area_in_pixels();
                    if best.is_none() || area > best_area {
                        best = Some(shape);
                        best_area = area;
                    }
                }
                best.cloned().ok_or_else(|| {
                    format!(
                        "no shape overlaps the probe rectangle \
                         ({left},{top})-({right},{bottom}) by at least {MIN_OVERLAP_FOR_INSPECT_REGION}"
                    )
                })?
            }
        };

        self.inspect_regions.push(region);
        Ok(self
            .inspect_regions
            .last()
            .ok_or("inspect region list unexpectedly empty")?)
    }

    fn new_rectangle_region(&mut self, mut bounds: BoundingBox) -> Shape {
        bounds.left = bounds.left.clamp(0, self.image.width() - 1);
        bounds.right = bounds.right.clamp(0, self.image.width() - 1);
        bounds.top = bounds.top.clamp(0, self.image.height() - 1);
        bounds.bottom = bounds.bottom.clamp(0, self.image.height() - 1);
        let id = ShapeId(self.next_region_id);
        self.next_region_id += 1;
        Shape::new_rectangle(id, bounds)
    }

    /// Run line detection over this session's edge map.
    ///
    /// When `annotate` is set, the returned raster is a copy of the source
    /// image with the supporting pixels of every kept line painted over it.
    pub fn detect_lines(
        &self,
        options: &LineOptions,
        annotate: bool,
    ) -> Result<(LineDetectionResult, Option<RasterImage>), String> {
        let edges = render_edge_image(&self.luminance);
        if annotate {
            let mut canvas = self.image.clone();
            let result =
                detect_lines(&edges, &self.luminance, None, options, Some(&mut canvas))?;
            Ok((result, Some(canvas)))
        } else {
            let result = detect_lines(&edges, &self.luminance, None, options, None)?;
            Ok((result, None))
        }
    }

    /// Render detected lines as solid segments over a copy of the source.
    pub fn render_lines(&self, result: &LineDetectionResult) -> Result<RasterImage, String> {
        let mut canvas = self.image.clone();
        for line in &result.lines {
            draw::draw_line(&mut canvas, line.point_a, line.point_b, ANNOTATION_BLUE)?;
        }
        Ok(canvas)
    }

    /// Render the discovered shapes as an annotated raster.
    ///
    /// Shapes cycle through a color palette; each gets its border pixels and
    /// bounding box drawn. Dangling border pixels are highlighted in red.
    /// Interiors and scanline overlays follow the option flags.
    pub fn render_features(&self, options: &AnalyzerOptions) -> Result<RasterImage, String> {
        let mut draw_interiors = options.draw_shape_interiors;
        let (background, interior_color, palette): (u32, u32, &[u32]) =
            if options.draw_interior_as_gray {
                draw_interiors = true;
                (WHITE, LIGHT_GRAY, &GRAY_PALETTE)
            } else {
                (BLACK, GREEN, &COLOR_PALETTE)
            };

        let mut canvas = if options.outlines_only {
            RasterImage::like(&self.image, background)
        } else {
            self.image.clone()
        };

        if draw_interiors {
            for shape in &self.shapes {
                self.fill_interior(&mut canvas, shape, interior_color)?;
            }
        }

        for (index, shape) in self.shapes.iter().enumerate() {
            let color = palette[index % palette.len()];
            draw::draw_shape(&mut canvas, shape, color)?;
            draw::draw_bounding_box(&mut canvas, &shape.bounds, color)?;
        }

        for y in 0..self.image.height() {
            for x in 0..self.image.width() {
                if let Some(state) = self.grid.get(x, y) {
                    if state.dangling_border {
                        canvas.set_pixel(x, y, HIGHLIGHT_RED)?;
                    }
                }
            }
        }

        if options.draw_scanlines {
            for shape in &self.shapes {
                draw::draw_scanlines(&mut canvas, shape, HIGHLIGHT_RED)?;
            }
        }

        Ok(canvas)
    }

    /// Paint the pixels between a shape's borders, leaving claimed border
    /// pixels for the outline pass.
    fn fill_interior(
        &self,
        canvas: &mut RasterImage,
        shape: &Shape,
        color: u32,
    ) -> Result<(), String> {
        if shape.feature_type != FeatureType::Region {
            return Ok(());
        }
        for cross in &shape.cross_sections {
            for x in cross.start_x..=cross.stop_x {
                let claimed = self
                    .grid
                    .get(x, cross.y)
                    .map(|state| state.interior)
                    .unwrap_or(false);
                if !claimed && canvas.contains(x, cross.y) {
                    canvas.set_pixel(x, cross.y, color)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_block(w: usize, h: usize, left: i32, top: i32, size: i32) -> RasterImage {
        let mut img = RasterImage::filled(w, h, WHITE);
        for y in top..top + size {
            for x in left..left + size {
                img.set_pixel(x, y, BLACK).unwrap();
            }
        }
        img
    }

    #[test]
    fn analyze_finds_the_block_outline() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        assert_eq!(cell.shapes().len(), 1);
        let shape = &cell.shapes()[0];
        assert!(shape.bounds.contains(25, 25));
    }

    #[test]
    fn delete_shape_releases_grid_claims() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let mut cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let id = cell.shapes()[0].id;
        let claimed = |cell: &CellImage| {
            let mut n = 0;
            for y in 0..60 {
                for x in 0..60 {
                    if cell.grid.get(x, y).map(|s| s.interior).unwrap_or(false) {
                        n += 1;
                    }
                }
            }
            n
        };
        assert!(claimed(&cell) > 0);
        assert!(cell.delete_shape(id));
        assert_eq!(claimed(&cell), 0);
        assert!(!cell.delete_shape(id));
    }

    #[test]
    fn absolute_inspect_region_keeps_its_coordinates() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let mut cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let region = cell
            .create_inspect_region(InspectRegionPlacement::Absolute {
                top: 5,
                bottom: 30,
                left: 10,
                right: 40,
            })
            .unwrap();
        assert_eq!(region.feature_type, FeatureType::Rectangle);
        assert_eq!(region.bounds.left, 10);
        assert_eq!(region.bounds.bottom, 30);
        assert_eq!(cell.inspect_regions().len(), 1);
    }

    #[test]
    fn middle_relative_region_centers_on_the_image() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let mut cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let region = cell
            .create_inspect_region(InspectRegionPlacement::RelativeToMiddle {
                top: 10,
                bottom: 10,
                left: 10,
                right: 10,
            })
            .unwrap();
        assert_eq!(region.bounds.left, 20);
        assert_eq!(region.bounds.right, 40);
        assert_eq!(region.bounds.top, 20);
        assert_eq!(region.bounds.bottom, 40);
    }

    #[test]
    fn edge_relative_region_insets_from_the_borders() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let mut cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let region = cell
            .create_inspect_region(InspectRegionPlacement::RelativeToEdges {
                top: 5,
                bottom: 8,
                left: 4,
                right: 6,
            })
            .unwrap();
        assert_eq!(region.bounds.left, 4);
        assert_eq!(region.bounds.right, 53);
        assert_eq!(region.bounds.top, 5);
        assert_eq!(region.bounds.bottom, 51);
    }

    #[test]
    fn zero_edge_offsets_cover_the_whole_image() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let mut cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let region = cell
            .create_inspect_region(InspectRegionPlacement::RelativeToEdges {
                top: 0,
                bottom: 0,
                left: 0,
                right: 0,
            })
            .unwrap();
        assert_eq!(region.bounds.left, 0);
        assert_eq!(region.bounds.right, 59);
        assert_eq!(region.bounds.top, 0);
        assert_eq!(region.bounds.bottom, 59);
    }

    #[test]
    fn invalid_offsets_are_rejected() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let mut cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        assert!(cell
            .create_inspect_region(InspectRegionPlacement::Absolute {
                top: 10,
                bottom: 5,
                left: 0,
                right: 10,
            })
            .is_err());
        assert!(cell
            .create_inspect_region(InspectRegionPlacement::Absolute {
                top: 0,
                bottom: 10,
                left: 0,
                right: 60,
            })
            .is_err());
    }

    #[test]
    fn edge_detection_region_adopts_the_overlapping_shape() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let mut cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let discovered_id = cell.shapes()[0].id;
        let region = cell
            .create_inspect_region(InspectRegionPlacement::FromEdgeDetection {
                top: 15,
                bottom: 40,
                left: 15,
                right: 40,
            })
            .unwrap();
        assert_eq!(region.id, discovered_id);
        assert_eq!(region.feature_type, FeatureType::Region);

        // A probe far from the block matches nothing.
        assert!(cell
            .create_inspect_region(InspectRegionPlacement::FromEdgeDetection {
                top: 50,
                bottom: 59,
                left: 50,
                right: 59,
            })
            .is_err());
    }

    #[test]
    fn render_features_paints_the_outline() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let options = AnalyzerOptions {
            outlines_only: true,
            ..AnalyzerOptions::default()
        };
        let canvas = cell.render_features(&options).unwrap();

        let mut painted = 0;
        for y in 0..60 {
            for x in 0..60 {
                if canvas.get_pixel(x, y).unwrap() != BLACK {
                    painted += 1;
                }
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn gray_mode_renders_black_on_white() {
        let img = image_with_block(60, 60, 20, 20, 12);
        let cell = CellImage::analyze(img, &AnalyzerOptions::default()).unwrap();
        let options = AnalyzerOptions {
            outlines_only: true,
            draw_interior_as_gray: true,
            ..AnalyzerOptions::default()
        };
        let canvas = cell.render_features(&options).unwrap();
        assert_eq!(canvas.get_pixel(0, 0).unwrap(), WHITE);
    }
}
