pub mod io;
pub mod raster;
pub mod traits;

pub use self::raster::{RasterImage, ANNOTATION_BLUE, BLACK, HIGHLIGHT_RED, WHITE};
pub use self::traits::{luminance_of, PixelSource, Rgb};
