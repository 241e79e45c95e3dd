//! Raster drawing for analysis overlays.
use crate::image::PixelSource;
use crate::shapes::{BoundingBox, FeatureType, Point, Shape};

/// Lines flatter than this are walked along X, steeper ones along Y, so the
/// drawn path never leaves gaps on its long axis.
const MAX_SLOPE_FOR_PATH_WALKING: f64 = 5.0;

/// Draw the segment from `a` to `b` by walking its long axis.
///
/// The short-axis coordinate accumulates the slope and may skip or repeat,
/// which keeps every long-axis position covered. Both endpoints are set
/// explicitly since rounding can step past them.
pub fn draw_line(
    target: &mut impl PixelSource,
    a: Point,
    b: Point,
    color: u32,
) -> Result<(), String> {
    if a.x == b.x && a.y == b.y {
        return set_if_inside(target, a.x, a.y, color);
    }

    let slope = f64::from(a.y - b.y) / f64::from(a.x - b.x);
    if slope > -MAX_SLOPE_FOR_PATH_WALKING && slope < MAX_SLOPE_FOR_PATH_WALKING {
        let (start, end) = if a.x < b.x { (a, b) } else { (b, a) };
        let slope = f64::from(end.y - start.y) / f64::from(end.x - start.x);
        let mut float_y = f64::from(start.y);
        for x in start.x..=end.x {
            set_if_inside(target, x, float_y as i32, color)?;
            float_y = (float_y + slope).clamp(0.0, f64::from(target.height() - 1));
        }
        set_if_inside(target, start.x, start.y, color)?;
        set_if_inside(target, end.x, end.y, color)?;
    } else {
        let (start, end) = if a.y < b.y { (a, b) } else { (b, a) };
        let inverse = f64::from(end.x - start.x) / f64::from(end.y - start.y);
        let mut float_x = f64::from(start.x);
        for y in start.y..=end.y {
            set_if_inside(target, float_x as i32, y, color)?;
            float_x = (float_x + inverse).clamp(0.0, f64::from(target.width() - 1));
        }
        set_if_inside(target, start.x, start.y, color)?;
        set_if_inside(target, end.x, end.y, color)?;
    }
    Ok(())
}

/// Draw the four edges of an inclusive box, skipping parts outside the image.
pub fn draw_bounding_box(
    target: &mut impl PixelSource,
    bounds: &BoundingBox,
    color: u32,
) -> Result<(), String> {
    for x in bounds.left..=bounds.right {
        set_if_inside(target, x, bounds.top, color)?;
        set_if_inside(target, x, bounds.bottom, color)?;
    }
    for y in bounds.top..=bounds.bottom {
        set_if_inside(target, bounds.left, y, color)?;
        set_if_inside(target, bounds.right, y, color)?;
    }
    Ok(())
}

/// Draw a shape: rectangles as their box edges, regions as their point list.
pub fn draw_shape(
    target: &mut impl PixelSource,
    shape: &Shape,
    color: u32,
) -> Result<(), String> {
    match shape.feature_type {
        FeatureType::Rectangle => draw_bounding_box(target, &shape.bounds, color),
        FeatureType::Region => {
            for p in &shape.points {
                set_if_inside(target, p.x, p.y, color)?;
            }
            Ok(())
        }
    }
}

/// Paint every cross-section span of a region shape.
pub fn draw_scanlines(
    target: &mut impl PixelSource,
    shape: &Shape,
    color: u32,
) -> Result<(), String> {
    for cross in &shape.cross_sections {
        for x in cross.start_x..=cross.stop_x {
            set_if_inside(target, x, cross.y, color)?;
        }
    }
    Ok(())
}

#[inline]
fn set_if_inside(
    target: &mut impl PixelSource,
    x: i32,
    y: i32,
    color: u32,
) -> Result<(), String> {
    if target.contains(x, y) {
        target.set_pixel(x, y, color)?;
    }
    Ok(())
}
