//! Straight-line detection on edge rasters.
//!
//! The stage is a gradient-guided Hough transform: [`detect_lines`] votes
//! black edge pixels into a (rho, theta) accumulator, collapses neighboring
//! winners that describe the same physical edge, and returns [`Line`] values
//! in slope-intercept form together with their supporting pixels.
mod accumulator;
mod detector;
mod line;
mod options;

pub use detector::{detect_lines, DetectionStats, LineDetectionResult};
pub use line::Line;
pub use options::LineOptions;
