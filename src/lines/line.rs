use serde::{Deserialize, Serialize};

use crate::image::{PixelSource, ANNOTATION_BLUE};
use crate::shapes::Point;

/// A detected line segment in slope-intercept form, with the edge pixels
/// that support it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub point_a: Point,
    pub point_b: Point,
    pub slope: f64,
    pub y_intercept: f64,
    /// Angle between the line and the horizontal axis, in radians.
    pub angle_with_horizontal: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pixels: Vec<Point>,
}

impl Line {
    /// Build a line from two endpoints, deriving the analytic form.
    pub fn from_endpoints(point_a: Point, point_b: Point) -> Self {
        let mut line = Line {
            point_a,
            point_b,
            ..Line::default()
        };
        line.recompute_from_endpoints();
        line
    }

    /// Re-derive slope, intercept, and angle after the endpoints move.
    ///
    /// A vertical pair gets its run nudged to one pixel so the slope stays
    /// finite; near-vertical segments are walked by Y when drawn, so the
    /// distortion never shows.
    pub fn recompute_from_endpoints(&mut self) {
        let mut delta_x = self.point_b.x - self.point_a.x;
        if delta_x == 0 {
            delta_x = 1;
        }
        let delta_y = self.point_b.y - self.point_a.y;
        self.slope = f64::from(delta_y) / f64::from(delta_x);
        self.y_intercept = f64::from(self.point_a.y) - self.slope * f64::from(self.point_a.x);
        self.angle_with_horizontal = 1.0f64.atan2(self.slope);
    }

    /// Euclidean length between the endpoints.
    pub fn length(&self) -> f64 {
        self.point_a.distance_to(&self.point_b)
    }

    /// Supporting pixels per unit of length. Short or empty lines score 0.
    pub fn pixel_density(&self) -> f64 {
        let length = self.length();
        if length <= 0.0 {
            return 0.0;
        }
        self.pixels.len() as f64 / length
    }

    /// Paint the supporting pixels onto `target` in the annotation color.
    pub fn draw_to_image(&self, target: &mut impl PixelSource) -> Result<(), String> {
        for pixel in &self.pixels {
            if target.contains(pixel.x, pixel.y) {
                target.set_pixel(pixel.x, pixel.y, ANNOTATION_BLUE)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytic_form_from_endpoints() {
        let line = Line::from_endpoints(Point::new(2, 4), Point::new(6, 12));
        assert_eq!(line.slope, 2.0);
        assert_eq!(line.y_intercept, 0.0);
        assert!((line.length() - 80.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn vertical_endpoints_keep_a_finite_slope() {
        let line = Line::from_endpoints(Point::new(5, 0), Point::new(5, 10));
        assert_eq!(line.slope, 10.0);
        assert!(line.slope.is_finite());
    }

    #[test]
    fn horizontal_line_angle() {
        let line = Line::from_endpoints(Point::new(0, 7), Point::new(10, 7));
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.y_intercept, 7.0);
        assert!((line.angle_with_horizontal - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn density_counts_supporting_pixels() {
        let mut line = Line::from_endpoints(Point::new(0, 0), Point::new(10, 0));
        line.pixels = (0..=10).map(|x| Point::new(x, 0)).collect();
        assert!((line.pixel_density() - 1.1).abs() < 1e-9);
    }
}
