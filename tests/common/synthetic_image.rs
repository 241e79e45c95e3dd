use cellscan::prelude::*;

/// White canvas with one filled black square.
pub fn block_image(width: usize, height: usize, left: i32, top: i32, size: i32) -> RasterImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = RasterImage::filled(width, height, 0x00FF_FFFF);
    for y in top..top + size {
        for x in left..left + size {
            img.set_pixel(x, y, 0).unwrap();
        }
    }
    img
}

/// White canvas with a one-pixel-tall black run on row `y`.
pub fn horizontal_line_image(
    width: usize,
    height: usize,
    y: i32,
    x0: i32,
    x1: i32,
) -> RasterImage {
    let mut img = RasterImage::filled(width, height, 0x00FF_FFFF);
    for x in x0..=x1 {
        img.set_pixel(x, y, 0).unwrap();
    }
    img
}
