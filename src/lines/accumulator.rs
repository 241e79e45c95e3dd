//! Dense Hough vote accumulator indexed by quantized (rho, theta).
use super::options::LineOptions;
use crate::numeric::round_to_i32;
use crate::shapes::Point;

/// One accumulator cell: a vote count, the lexicographic min/max endpoints
/// seen so far (a cheap proxy for the segment's extent), and a flag keeping
/// the extraction pass from emitting the same cell twice.
#[derive(Clone, Copy, Debug, Default)]
pub struct PossibleLine {
    pub votes: i32,
    pub point_a: Point,
    pub point_b: Point,
    pub recorded: bool,
}

impl PossibleLine {
    /// Fold one voting pixel into the cell's endpoint pair.
    pub fn track_endpoint(&mut self, x: i32, y: i32) {
        if self.votes == 0 {
            self.point_a = Point::new(x, y);
            self.point_b = Point::new(x, y);
        } else {
            if x < self.point_a.x || (x == self.point_a.x && y < self.point_a.y) {
                self.point_a = Point::new(x, y);
            }
            if x > self.point_b.x || (x == self.point_b.x && y > self.point_b.y) {
                self.point_b = Point::new(x, y);
            }
        }
        self.votes += 1;
    }
}

/// The vote array for one detection pass over a bounding box.
///
/// Rho spans the box diagonal in both signs at unit resolution; theta spans
/// `[-π/2, π/2)` at `angle_increment` resolution. The array is dense and
/// proportional to `diagonal * angle_buckets`, which can reach tens of MB on
/// a megapixel image, so the detector drops it as soon as extraction ends.
#[derive(Debug)]
pub struct VoteGrid {
    cells: Vec<PossibleLine>,
    min_rho: f64,
    max_rho: f64,
    min_theta: f64,
    max_theta: f64,
    angle_increment: f64,
    num_angle_values: usize,
}

impl VoteGrid {
    pub fn new(width: i32, height: i32, options: &LineOptions) -> Self {
        let min_theta = -std::f64::consts::FRAC_PI_2;
        let max_theta = std::f64::consts::FRAC_PI_2;
        let num_angle_values = ((max_theta - min_theta) / options.angle_increment) as usize;

        // The longest possible line is the diagonal across the box.
        let max_rho =
            f64::from(width * width + height * height).sqrt().trunc();
        let min_rho = -max_rho;
        let num_length_values = (2.0 * max_rho) as usize;

        let len = (num_length_values + 1) * (num_angle_values + 1);
        Self {
            cells: vec![PossibleLine::default(); len],
            min_rho,
            max_rho,
            min_theta,
            max_theta,
            angle_increment: options.angle_increment,
            num_angle_values,
        }
    }

    #[inline]
    pub fn min_rho(&self) -> f64 {
        self.min_rho
    }

    #[inline]
    pub fn max_rho(&self) -> f64 {
        self.max_rho
    }

    #[inline]
    pub fn min_theta(&self) -> f64 {
        self.min_theta
    }

    #[inline]
    pub fn max_theta(&self) -> f64 {
        self.max_theta
    }

    /// Width of the valid theta range.
    #[inline]
    pub fn theta_modulo(&self) -> f64 {
        self.max_theta - self.min_theta
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Linear index of the cell for (rho, theta).
    ///
    /// Rounding means distinct computed (rho, theta) pairs can share a cell;
    /// the extraction pass relies on the `recorded` flag and the merge step
    /// to remove the duplicates this creates.
    #[inline]
    pub fn index(&self, rho: f64, theta: f64) -> usize {
        let rho_offset = round_to_i32(rho - self.min_rho).max(0) as usize;
        let theta_offset =
            round_to_i32((theta - self.min_theta) / self.angle_increment).max(0) as usize;
        let index = rho_offset * self.num_angle_values + theta_offset;
        debug_assert!(
            index < self.cells.len(),
            "vote index {index} out of {} (rho={rho}, theta={theta})",
            self.cells.len()
        );
        index
    }

    #[inline]
    pub fn cell_mut(&mut self, rho: f64, theta: f64) -> &mut PossibleLine {
        let index = self.index(rho, theta);
        &mut self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_array_sizing() {
        let options = LineOptions::default();
        let grid = VoteGrid::new(100, 60, &options);

        let diagonal = f64::from(100 * 100 + 60 * 60).sqrt().trunc();
        let num_length_values = (2.0 * diagonal) as usize;
        let num_angle_values =
            (std::f64::consts::PI / options.angle_increment) as usize;
        assert_eq!(
            grid.len(),
            (num_length_values + 1) * (num_angle_values + 1)
        );
    }

    #[test]
    fn every_swept_index_is_in_bounds() {
        let options = LineOptions::default();
        let grid = VoteGrid::new(64, 48, &options);

        let mut theta = grid.min_theta();
        while theta < grid.max_theta() {
            let mut rho = grid.min_rho();
            while rho <= grid.max_rho() {
                assert!(grid.index(rho, theta) < grid.len());
                rho += 1.0;
            }
            theta += options.angle_increment;
        }
    }

    #[test]
    fn endpoint_tracking_is_lexicographic() {
        let mut cell = PossibleLine::default();
        cell.track_endpoint(5, 5);
        cell.track_endpoint(3, 9);
        cell.track_endpoint(7, 1);
        cell.track_endpoint(3, 2);

        assert_eq!(cell.votes, 4);
        assert_eq!((cell.point_a.x, cell.point_a.y), (3, 2));
        assert_eq!((cell.point_b.x, cell.point_b.y), (7, 1));
    }
}
