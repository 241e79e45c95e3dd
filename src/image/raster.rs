//! Owned packed-RGB raster in row-major layout (stride == width).
//!
//! This is the working canvas for the whole pipeline: the decoded input
//! bitmap, the rendered edge map, and any annotation overlays are all
//! `RasterImage`s behind the `PixelSource` trait.
use super::traits::PixelSource;
use image::RgbImage;

/// Packed pixel for a fully black (edge) pixel.
pub const BLACK: u32 = 0x0000_0000;
/// Packed pixel for a fully white (background) pixel.
pub const WHITE: u32 = 0x00FF_FFFF;
/// Color used when annotating detected line pixels onto a source image.
pub const ANNOTATION_BLUE: u32 = 0x0000_00FF;
/// Color used for highlighted pixels and inspection overlays.
pub const HIGHLIGHT_RED: u32 = 0x00FF_0000;

#[derive(Clone, Debug)]
pub struct RasterImage {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Number of u32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order, one packed `0x00RRGGBB` per pixel
    pub data: Vec<u32>,
}

impl RasterImage {
    /// Construct a black canvas of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, BLACK)
    }

    /// Construct a canvas pre-filled with one packed color.
    pub fn filled(w: usize, h: usize, fill: u32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![fill; w * h],
        }
    }

    /// Same-size canvas pre-filled with `fill`, used when rendering detection
    /// results to a side image.
    pub fn like(other: &impl PixelSource, fill: u32) -> Self {
        Self::filled(other.width() as usize, other.height() as usize, fill)
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let w = img.width() as usize;
        let h = img.height() as usize;
        let mut out = Self::new(w, h);
        for (x, y, px) in img.enumerate_pixels() {
            let [r, g, b] = px.0;
            let packed = (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b);
            let i = out.idx(x as usize, y as usize);
            out.data[i] = packed;
        }
        out
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let mut out = RgbImage::new(self.w as u32, self.h as u32);
        for y in 0..self.h {
            for x in 0..self.w {
                let v = self.data[self.idx(x, y)];
                let rgb = self.parse_pixel(v);
                out.put_pixel(x as u32, y as u32, image::Rgb([rgb.r, rgb.g, rgb.b]));
            }
        }
        out
    }
}

impl PixelSource for RasterImage {
    #[inline]
    fn width(&self) -> i32 {
        self.w as i32
    }

    #[inline]
    fn height(&self) -> i32 {
        self.h as i32
    }

    #[inline]
    fn get_pixel(&self, x: i32, y: i32) -> Result<u32, String> {
        if !self.contains(x, y) {
            return Err(format!(
                "pixel ({x}, {y}) outside {}x{} image",
                self.w, self.h
            ));
        }
        Ok(self.data[self.idx(x as usize, y as usize)])
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, value: u32) -> Result<(), String> {
        if !self.contains(x, y) {
            return Err(format!(
                "pixel ({x}, {y}) outside {}x{} image",
                self.w, self.h
            ));
        }
        let i = self.idx(x as usize, y as usize);
        self.data[i] = value;
        Ok(())
    }
}
