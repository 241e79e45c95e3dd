#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analyzer;
pub mod config;
pub mod image;
pub mod lines;
pub mod luminance;
pub mod numeric;
pub mod shapes;

// --- High-level re-exports -------------------------------------------------

// Main entry points: one-call analysis session + the stage functions.
pub use crate::analyzer::{AnalyzerOptions, CellImage, InspectRegionPlacement};
pub use crate::lines::{detect_lines, Line, LineDetectionResult, LineOptions};
pub use crate::luminance::{render_edge_image, LuminanceMap, EDGE_DETECTION_THRESHOLD};
pub use crate::shapes::{discover_shapes, Shape, ShapeId, ShapeScanOptions, ShapeScanResult};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use cellscan::prelude::*;
///
/// # fn main() -> Result<(), String> {
/// let image = cellscan::image::io::load_raster_image("cells.png".as_ref())?;
/// let analysis = CellImage::analyze(image, &AnalyzerOptions::default())?;
/// println!("{} shapes", analysis.shapes().len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{PixelSource, RasterImage};
    pub use crate::{
        detect_lines, discover_shapes, render_edge_image, AnalyzerOptions, CellImage,
        InspectRegionPlacement, Line, LineDetectionResult, LineOptions, LuminanceMap, Shape,
        ShapeId, ShapeScanOptions,
    };
}
