use super::shape::ShapeId;

/// Per-pixel bookkeeping written during shape discovery.
///
/// `interior` marks a pixel claimed by some flood fill; it survives even when
/// an undersized shape is dropped, so a pixel can never seed a second shape.
/// `dangling_border` marks a claimed pixel with at most one connected
/// same-shape neighbor (an endpoint of a thin border).
#[derive(Clone, Copy, Debug, Default)]
pub struct PixelState {
    pub interior: bool,
    pub dangling_border: bool,
    pub shape: Option<ShapeId>,
}

/// Dense grid of pixel states, one per cell of the analyzed image.
#[derive(Clone, Debug)]
pub struct PixelGrid {
    w: usize,
    h: usize,
    cells: Vec<PixelState>,
}

impl PixelGrid {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            cells: vec![PixelState::default(); w * h],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.w as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.h as i32
    }

    /// State at (x, y), or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&PixelState> {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return None;
        }
        Some(&self.cells[y as usize * self.w + x as usize])
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut PixelState> {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return None;
        }
        Some(&mut self.cells[y as usize * self.w + x as usize])
    }

    /// Reset every cell claimed by `id`, dropping its flags and back reference.
    pub fn clear_shape(&mut self, id: ShapeId) {
        for cell in &mut self.cells {
            if cell.shape == Some(id) {
                *cell = PixelState::default();
            }
        }
    }

    /// Drop the back references of `id` but keep the cells claimed.
    ///
    /// Used when an undersized shape is discarded mid-scan: its pixels must
    /// not reseed another shape, but nothing should point at a dead id.
    pub fn orphan_shape(&mut self, id: ShapeId) {
        for cell in &mut self.cells {
            if cell.shape == Some(id) {
                cell.shape = None;
            }
        }
    }
}
