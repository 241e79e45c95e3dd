//! Hough-transform line detection over an edge raster.
//!
//! Voting runs over every black pixel of the edge image. Each pixel gets a
//! gradient angle from the source luminance map, and votes only for the
//! (rho, theta) cells within an angular window around that angle instead of
//! the full theta sweep. Extraction walks the accumulator, merges cells that
//! describe the same physical line, then gathers the supporting edge pixels
//! along each kept line and filters by density and length.
use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::image::{PixelSource, RasterImage, BLACK};
use crate::luminance::LuminanceMap;
use crate::numeric::{floats_close, quantize};
use crate::shapes::BoundingBox;

use super::accumulator::{PossibleLine, VoteGrid};
use super::line::Line;
use super::options::LineOptions;

/// Counters describing one detection pass.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStats {
    /// Accumulator cells that received at least one vote.
    pub num_possible_lines: usize,
    /// Cells that cleared the vote minimum.
    pub num_with_min_votes: usize,
    /// Candidates absorbed into an already-recorded line.
    pub num_duplicates: usize,
    /// Lines surviving the density and length filters.
    pub num_lines: usize,
}

#[derive(Clone, Debug, Default)]
pub struct LineDetectionResult {
    pub lines: Vec<Line>,
    pub stats: DetectionStats,
    pub elapsed_ms: f64,
}

/// Offsets probed around the analytic Y when gathering supporting pixels.
/// Pixelation puts the drawn pixel one row off the ideal line about half the
/// time, so the exact row and both neighbors all count.
const PROBE_OFFSETS: [i32; 3] = [0, 1, -1];

/// Detect line segments in `edges`, a black-on-white edge raster.
///
/// `map` must be the luminance table the edge raster was rendered from; it
/// supplies the gradient angles that narrow each pixel's vote window. `bounds`
/// restricts the pass to a region, defaulting to the whole image. When
/// `annotate` is given, the supporting pixels of every kept line are painted
/// onto it in the annotation color.
pub fn detect_lines(
    edges: &RasterImage,
    map: &LuminanceMap,
    bounds: Option<BoundingBox>,
    options: &LineOptions,
    mut annotate: Option<&mut RasterImage>,
) -> Result<LineDetectionResult, String> {
    if edges.width() != map.width() || edges.height() != map.height() {
        return Err(format!(
            "edge raster {}x{} does not match luminance map {}x{}",
            edges.width(),
            edges.height(),
            map.width(),
            map.height()
        ));
    }

    let start = Instant::now();
    let bounds = bounds.unwrap_or(BoundingBox {
        left: 0,
        right: edges.width() - 1,
        top: 0,
        bottom: edges.height() - 1,
    });
    if bounds.left < 0
        || bounds.top < 0
        || bounds.right >= edges.width()
        || bounds.bottom >= edges.height()
    {
        return Err(format!(
            "detection bounds ({},{})-({},{}) exceed the {}x{} image",
            bounds.left,
            bounds.top,
            bounds.right,
            bounds.bottom,
            edges.width(),
            edges.height()
        ));
    }

    // Rho comes from absolute pixel coordinates, so the accumulator spans the
    // whole image diagonal even when the scan is restricted to a sub-region.
    let mut grid = VoteGrid::new(edges.width(), edges.height(), options);

    for y in bounds.top..=bounds.bottom {
        for x in bounds.left..=bounds.right {
            if edges.get_pixel(x, y)? != BLACK {
                continue;
            }
            let angle = gradient_angle(map, x, y, &grid, options);

            // Sweep only the window around the measured gradient angle.
            let mut theta = (angle - options.angle_window).max(grid.min_theta());
            let end_theta = (angle + options.angle_window).min(grid.max_theta());
            while theta < end_theta {
                let rho = (f64::from(x) * theta.cos() - f64::from(y) * theta.sin())
                    .clamp(grid.min_rho(), grid.max_rho());
                grid.cell_mut(rho, theta).track_endpoint(x, y);
                theta += options.angle_increment;
            }
        }
    }

    let mut stats = DetectionStats::default();
    let mut lines: Vec<Line> = Vec::new();

    let mut theta = grid.min_theta();
    while theta < grid.max_theta() {
        let mut rho = grid.min_rho();
        while rho <= grid.max_rho() {
            let cell = grid.cell_mut(rho, theta);
            if cell.votes > 0 {
                stats.num_possible_lines += 1;
            }
            if cell.votes >= options.min_votes_for_real_line && !cell.recorded {
                cell.recorded = true;
                stats.num_with_min_votes += 1;
                let candidate = *cell;
                record_one_line(&candidate, edges, options, &mut lines, &mut stats)?;
            }
            rho += 1.0;
        }
        theta += options.angle_increment;
    }
    // The accumulator scales with the image diagonal; release it before the
    // remaining per-line work.
    drop(grid);

    lines.retain(|line| line.length() >= options.min_useful_line_length);
    stats.num_lines = lines.len();

    // Annotation is a side output; a failed pixel write must not discard the
    // detected lines.
    if let Some(target) = annotate.as_deref_mut() {
        for line in &lines {
            if let Err(err) = line.draw_to_image(target) {
                debug!("skipping annotation for one line: {err}");
            }
        }
    }

    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
    debug!(
        "line detection: voted={} candidates={} merged={} kept={} in {:.2}ms",
        stats.num_possible_lines,
        stats.num_with_min_votes,
        stats.num_duplicates,
        stats.num_lines,
        elapsed_ms
    );

    Ok(LineDetectionResult {
        lines,
        stats,
        elapsed_ms,
    })
}

/// Gradient angle at an edge pixel, normalized to the accumulator's theta
/// range and snapped to the angle increment.
fn gradient_angle(
    map: &LuminanceMap,
    x: i32,
    y: i32,
    grid: &VoteGrid,
    options: &LineOptions,
) -> f64 {
    let above = i32::from(map.luminance(x, y - 1));
    let below = i32::from(map.luminance(x, y + 1));
    let left = i32::from(map.luminance(x - 1, y));
    let right = i32::from(map.luminance(x + 1, y));
    let above_left = i32::from(map.luminance(x - 1, y - 1));
    let above_right = i32::from(map.luminance(x + 1, y - 1));
    let below_left = i32::from(map.luminance(x - 1, y + 1));
    let below_right = i32::from(map.luminance(x + 1, y + 1));

    let row_gradient =
        (2 * below + below_left + below_right) - (2 * above + above_left + above_right);
    let col_gradient =
        (2 * left + above_left + below_left) - (2 * right + above_right + below_right);

    let mut angle = f64::from(row_gradient).atan2(f64::from(col_gradient));
    if angle >= grid.max_theta() {
        angle -= grid.theta_modulo();
    } else if angle < grid.min_theta() {
        angle += grid.theta_modulo();
    }
    quantize(angle, options.angle_increment).clamp(grid.min_theta(), grid.max_theta())
}

/// Turn one winning accumulator cell into a line, or fold it into a line
/// already recorded for the same physical edge.
fn record_one_line(
    candidate: &PossibleLine,
    edges: &RasterImage,
    options: &LineOptions,
    lines: &mut Vec<Line>,
    stats: &mut DetectionStats,
) -> Result<(), String> {
    let incoming = Line::from_endpoints(candidate.point_a, candidate.point_b);

    // Neighboring accumulator cells describe the same edge with slightly
    // different (rho, theta); fold the candidate into every line it matches
    // rather than stopping at the first.
    let mut merged = false;
    for existing in lines.iter_mut() {
        if !floats_close(existing.slope, incoming.slope, options.angle_resolution) {
            continue;
        }
        if !floats_close(
            existing.y_intercept,
            incoming.y_intercept,
            options.min_point_resolution,
        ) {
            continue;
        }
        if !spans_touch(existing, &incoming, options) {
            continue;
        }

        if incoming.point_a.x < existing.point_a.x {
            existing.point_a = incoming.point_a;
        }
        if incoming.point_b.x > existing.point_b.x {
            existing.point_b = incoming.point_b;
        }
        existing.recompute_from_endpoints();
        merged = true;
    }
    if merged {
        stats.num_duplicates += 1;
        return Ok(());
    }

    let mut line = incoming;
    line.pixels = gather_supporting_pixels(&line, edges)?;
    if line.pixel_density() < options.min_pixel_density {
        return Ok(());
    }
    lines.push(line);
    Ok(())
}

/// Whether two near-parallel lines overlap in X, sit within the dash gap, or
/// start within the point resolution of each other.
fn spans_touch(existing: &Line, incoming: &Line, options: &LineOptions) -> bool {
    let (lo, hi) = (incoming.point_a.x, incoming.point_b.x);
    if (existing.point_a.x >= lo && existing.point_a.x <= hi)
        || (existing.point_b.x >= lo && existing.point_b.x <= hi)
    {
        return true;
    }
    let max_gap = options.max_gap_between_dashes;
    if (existing.point_a.x - incoming.point_b.x).abs() <= max_gap {
        return true;
    }
    if (existing.point_b.x - incoming.point_a.x).abs() <= max_gap {
        return true;
    }
    existing.point_a.distance_to(&incoming.point_a) <= options.min_point_resolution
}

/// Walk the analytic line between the endpoints and collect the edge pixels
/// lying on or one row off it.
fn gather_supporting_pixels(
    line: &Line,
    edges: &RasterImage,
) -> Result<Vec<crate::shapes::Point>, String> {
    let mut pixels = Vec::new();
    for x in line.point_a.x..=line.point_b.x {
        let ideal_y = (line.slope * f64::from(x) + line.y_intercept).trunc() as i32;
        for offset in PROBE_OFFSETS {
            let y = ideal_y + offset;
            if !edges.contains(x, y) {
                continue;
            }
            if edges.get_pixel(x, y)? == BLACK {
                pixels.push(crate::shapes::Point::new(x, y));
            }
        }
    }
    Ok(pixels)
}
