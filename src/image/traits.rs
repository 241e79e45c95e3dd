/// Decoded 8-bit channels of one packed pixel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Capability interface for anything image-like the pipeline can read from or
/// draw into: a decoded bitmap, a rendered edge map, an annotation overlay.
///
/// Coordinates are strict: `get_pixel`/`set_pixel` fail outside
/// `[0, width) × [0, height)`. Pixel packing is a property of the source;
/// the default impls assume `0x00RRGGBB`.
pub trait PixelSource {
    /// Image width in pixels
    fn width(&self) -> i32;
    /// Image height in pixels
    fn height(&self) -> i32;

    fn get_pixel(&self, x: i32, y: i32) -> Result<u32, String>;
    fn set_pixel(&mut self, x: i32, y: i32, value: u32) -> Result<(), String>;

    /// Decompose a packed pixel into its color channels.
    fn parse_pixel(&self, value: u32) -> Rgb {
        Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Pack a grayscale value into a pixel with equal channels.
    fn gray_to_pixel(&self, gray: u8) -> u32 {
        let g = u32::from(gray);
        (g << 16) | (g << 8) | g
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }
}

/// Weighted grayscale luminance of one pixel, in `[0, 255]`.
///
/// The same formula is used by the gradient table and by shape statistics so
/// thresholds stay comparable across the pipeline.
#[inline]
pub fn luminance_of(rgb: Rgb) -> u8 {
    let lum = 0.30 * f64::from(rgb.r) + 0.59 * f64::from(rgb.g) + 0.11 * f64::from(rgb.b);
    lum.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::RasterImage;

    #[test]
    fn parse_pixel_roundtrips_gray() {
        let img = RasterImage::new(1, 1);
        let packed = img.gray_to_pixel(0x7F);
        let rgb = img.parse_pixel(packed);
        assert_eq!(rgb, Rgb { r: 0x7F, g: 0x7F, b: 0x7F });
    }

    #[test]
    fn luminance_weights_sum_to_one() {
        for gray in [0u8, 1, 35, 128, 255] {
            let rgb = Rgb { r: gray, g: gray, b: gray };
            assert_eq!(luminance_of(rgb), gray);
        }
    }
}
