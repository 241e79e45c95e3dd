use serde::{Deserialize, Serialize};

/// Tunables for the Hough line detector.
///
/// The angle window has a lot of effect on result quality: a wider sweep
/// costs time and accumulator space but finds noticeably more lines. π/8
/// found almost no lines on test images, π/4 missed some, π/2/4 found almost
/// all of them, so that is the default.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineOptions {
    /// Minimum accumulator votes for a cell to yield a candidate line.
    pub min_votes_for_real_line: i32,
    /// Minimum collected-pixels-per-length ratio for a new line.
    pub min_pixel_density: f64,
    /// Distance tolerance for intercepts and start points when merging.
    pub min_point_resolution: f64,
    /// Slope tolerance when deciding two candidates are the same line.
    pub angle_resolution: f64,
    /// Largest X gap bridged when combining adjacent dashes into one line.
    pub max_gap_between_dashes: i32,
    /// Lines shorter than this are dropped by the post-filter.
    pub min_useful_line_length: f64,
    /// Theta quantization step in radians (0.01 rad is about half a degree).
    pub angle_increment: f64,
    /// Half-width of the theta sweep around each pixel's gradient angle.
    pub angle_window: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            min_votes_for_real_line: 90,
            min_pixel_density: 0.2,
            min_point_resolution: 10.0,
            angle_resolution: 0.4,
            max_gap_between_dashes: 10,
            min_useful_line_length: 50.0,
            angle_increment: 0.01,
            angle_window: std::f64::consts::FRAC_PI_2 / 4.0,
        }
    }
}

impl LineOptions {
    /// Preset for images of soft, irregular outlines rather than crisp
    /// geometry: far fewer votes and much shorter lines qualify.
    pub fn squishy_blobs() -> Self {
        Self {
            min_votes_for_real_line: 10,
            min_useful_line_length: 5.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants() {
        let opts = LineOptions::default();
        assert_eq!(opts.min_votes_for_real_line, 90);
        assert_eq!(opts.max_gap_between_dashes, 10);
        assert_eq!(opts.min_useful_line_length, 50.0);
        assert_eq!(opts.angle_increment, 0.01);
        assert_eq!(opts.angle_window, std::f64::consts::FRAC_PI_2 / 4.0);
    }

    #[test]
    fn squishy_preset_loosens_vote_and_length_limits() {
        let opts = LineOptions::squishy_blobs();
        assert_eq!(opts.min_votes_for_real_line, 10);
        assert_eq!(opts.min_useful_line_length, 5.0);
        assert_eq!(opts.min_point_resolution, 10.0);
    }
}
